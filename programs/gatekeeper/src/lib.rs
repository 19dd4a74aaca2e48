use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod state;

use instructions::*;
use state::WhitelistResult;

declare_id!("GateKeeper1111111111111111111111111111111111");

#[program]
pub mod gsp_gatekeeper {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, max_address_cap: u64) -> Result<()> {
        instructions::initialize::handler(ctx, max_address_cap)
    }

    pub fn set_locked(ctx: Context<GateAdmin>, locked: bool) -> Result<()> {
        instructions::admin::set_locked(ctx, locked)
    }

    pub fn set_max_address_cap(ctx: Context<GateAdmin>, max_address_cap: u64) -> Result<()> {
        instructions::admin::set_max_address_cap(ctx, max_address_cap)
    }

    pub fn set_oracle(ctx: Context<GateAdmin>, oracle: Pubkey) -> Result<()> {
        instructions::admin::set_oracle(ctx, oracle)
    }

    pub fn set_pool(ctx: Context<GateAdmin>, pool: Pubkey) -> Result<()> {
        instructions::admin::set_pool(ctx, pool)
    }

    pub fn set_gated_asset(ctx: Context<GateAdmin>, gated_asset: Pubkey) -> Result<()> {
        instructions::admin::set_gated_asset(ctx, gated_asset)
    }

    pub fn set_self_whitelist_disabled(ctx: Context<GateAdmin>, disabled: bool) -> Result<()> {
        instructions::admin::set_self_whitelist_disabled(ctx, disabled)
    }

    pub fn set_allowed_whitelist_index(
        ctx: Context<GateAdmin>,
        allowed_whitelist_index: Option<u64>,
    ) -> Result<()> {
        instructions::admin::set_allowed_whitelist_index(ctx, allowed_whitelist_index)
    }

    pub fn transfer_ownership(ctx: Context<GateAdmin>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_ownership(ctx, new_authority)
    }

    pub fn add_whitelisted(ctx: Context<AddWhitelisted>, address: Pubkey) -> Result<WhitelistResult> {
        instructions::whitelist::add(ctx, address)
    }

    pub fn add_batch_whitelisted<'info>(
        ctx: Context<'_, '_, 'info, 'info, AddBatchWhitelisted<'info>>,
        addresses: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::whitelist::add_batch(ctx, addresses)
    }

    pub fn receive_payment(ctx: Context<ReceivePayment>, amount: u64) -> Result<WhitelistResult> {
        instructions::payment::handler(ctx, amount)
    }

    /// Invoked by the gated asset on every transfer. `counterparty` is the
    /// owner of the receiving token account.
    pub fn check_and_record(
        ctx: Context<CheckAndRecord>,
        counterparty: Pubkey,
        amount_in: u64,
    ) -> Result<()> {
        instructions::check::handler(ctx, counterparty, amount_in)
    }

    pub fn is_whitelisted(ctx: Context<WhitelistView>, address: Pubkey) -> Result<bool> {
        instructions::view::is_whitelisted(ctx, address)
    }

    pub fn contributed(ctx: Context<WhitelistView>, address: Pubkey) -> Result<u64> {
        instructions::view::contributed(ctx, address)
    }
}
