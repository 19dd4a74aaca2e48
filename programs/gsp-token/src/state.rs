use anchor_lang::prelude::*;

#[account]
#[derive(InitSpace, Default)]
pub struct AssetConfig {
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    /// Gate state consulted on transfers, none while ungated.
    pub gatekeeper: Option<Pubkey>,
    #[max_len(32)]
    pub name: String,
    #[max_len(10)]
    pub symbol: String,
    pub decimals: u8,
    pub bump: u8,
    pub _reserved: [u8; 32],
}
