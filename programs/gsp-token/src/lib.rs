use anchor_lang::prelude::*;
use spl_discriminator::SplDiscriminate;
use spl_transfer_hook_interface::instruction::ExecuteInstruction;

pub mod constants;
pub mod error;
pub mod events;
pub mod hook;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("GspToken111111111111111111111111111111111111");

#[program]
pub mod gsp_token {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        name: String,
        symbol: String,
        decimals: u8,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, name, symbol, decimals)
    }

    pub fn initialize_extra_account_meta_list(
        ctx: Context<InitializeExtraAccountMetaList>,
    ) -> Result<()> {
        instructions::extra_metas::handler(ctx)
    }

    pub fn mint(ctx: Context<Mint>, amount: u64) -> Result<()> {
        instructions::mint::handler(ctx, amount)
    }

    pub fn burn(ctx: Context<Burn>, amount: u64) -> Result<()> {
        instructions::burn::handler(ctx, amount)
    }

    pub fn set_gatekeeper(ctx: Context<SetGatekeeper>, gatekeeper: Option<Pubkey>) -> Result<()> {
        instructions::admin::set_gatekeeper(ctx, gatekeeper)
    }

    pub fn set_name_and_symbol(ctx: Context<Admin>, name: String, symbol: String) -> Result<()> {
        instructions::admin::set_name_and_symbol(ctx, name, symbol)
    }

    pub fn transfer_authority(ctx: Context<Admin>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority(ctx, new_authority)
    }

    /// Token-2022 calls this on every transfer of the mint.
    #[instruction(discriminator = ExecuteInstruction::SPL_DISCRIMINATOR_SLICE)]
    pub fn transfer_hook(ctx: Context<TransferHook>, amount: u64) -> Result<()> {
        instructions::transfer_hook::handler(ctx, amount)
    }
}
