use anchor_lang::prelude::*;

#[event]
pub struct AssetInitialized {
    pub asset: Pubkey,
    pub asset_mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[event]
pub struct Minted {
    pub asset: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    /// Mint supply after the mint.
    pub supply: u64,
}

#[event]
pub struct Burned {
    pub asset: Pubkey,
    pub from: Pubkey,
    pub amount: u64,
    pub supply: u64,
}

#[event]
pub struct GatekeeperUpdated {
    pub asset: Pubkey,
    pub old_gatekeeper: Option<Pubkey>,
    pub new_gatekeeper: Option<Pubkey>,
}

#[event]
pub struct MetadataUpdated {
    pub asset: Pubkey,
    pub name: String,
    pub symbol: String,
}

#[event]
pub struct AuthorityTransferred {
    pub asset: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
}

#[event]
pub struct TransferChecked {
    pub asset: Pubkey,
    pub counterparty: Pubkey,
    pub amount: u64,
    pub gated: bool,
}
