use crate::state::WhitelistSource;
use anchor_lang::prelude::*;

#[event]
pub struct GateInitialized {
    pub gate: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub max_address_cap: u64,
}

#[event]
pub struct LockChanged {
    pub gate: Pubkey,
    pub locked: bool,
}

#[event]
pub struct MaxAddressCapUpdated {
    pub gate: Pubkey,
    pub old_cap: u64,
    pub new_cap: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    GatedAsset,
    Pool,
    Oracle,
}

#[event]
pub struct BindingUpdated {
    pub gate: Pubkey,
    pub binding: Binding,
    pub old: Pubkey,
    pub new: Pubkey,
}

#[event]
pub struct SelfWhitelistToggled {
    pub gate: Pubkey,
    pub disabled: bool,
}

#[event]
pub struct AllowedWhitelistIndexUpdated {
    pub gate: Pubkey,
    pub allowed_whitelist_index: Option<u64>,
}

#[event]
pub struct OwnershipTransferred {
    pub gate: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
}

#[event]
pub struct Whitelisted {
    pub gate: Pubkey,
    pub account: Pubkey,
    pub index: u64,
    pub source: WhitelistSource,
}

#[event]
pub struct PaymentReceived {
    pub gate: Pubkey,
    pub sender: Pubkey,
    pub amount: u64,
}

#[event]
pub struct ContributionRecorded {
    pub gate: Pubkey,
    pub account: Pubkey,
    pub amount_in: u64,
    pub quote: u64,
    pub contributed: u64,
}
