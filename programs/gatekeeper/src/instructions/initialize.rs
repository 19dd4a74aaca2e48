use crate::constants::GATE_SEED;
use crate::events::GateInitialized;
use crate::state::GateState;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + GateState::INIT_SPACE,
        seeds = [GATE_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub state: Account<'info, GateState>,

    /// CHECK: Mint of the gated asset, only used as a seed
    pub asset_mint: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, max_address_cap: u64) -> Result<()> {
    let state = &mut ctx.accounts.state;

    state.authority = ctx.accounts.authority.key();
    state.asset_mint = ctx.accounts.asset_mint.key();
    state.gated_asset = Pubkey::default();
    state.pool = Pubkey::default();
    state.oracle = Pubkey::default();
    state.locked = true;
    state.self_whitelist_disabled = false;
    state.max_address_cap = max_address_cap;
    state.allowed_whitelist_index = None;
    state.whitelist_count = 0;
    state.native_received = 0;
    state.bump = ctx.bumps.state;

    msg!("Gate initialized for mint {}", state.asset_mint);
    emit!(GateInitialized {
        gate: state.key(),
        authority: state.authority,
        asset_mint: state.asset_mint,
        max_address_cap,
    });
    Ok(())
}
