use crate::error::GatedAssetError;
use crate::events::*;
use crate::math::update_supply;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::{self, Burn as SplBurn};
use anchor_spl::token_interface::{Mint as TokenMint, TokenAccount, TokenInterface};

#[derive(Accounts)]
pub struct Burn<'info> {
    pub authority: Signer<'info>,

    #[account(
        has_one = authority @ GatedAssetError::Unauthorized,
        has_one = asset_mint
    )]
    pub config: Account<'info, AssetConfig>,

    #[account(mut)]
    pub asset_mint: InterfaceAccount<'info, TokenMint>,

    #[account(
        mut,
        token::mint = asset_mint,
        token::authority = authority
    )]
    pub from: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Burn>, amount: u64) -> Result<()> {
    require!(amount > 0, GatedAssetError::ZeroAmount);

    let supply = update_supply(ctx.accounts.asset_mint.supply, amount, false)?;
    let config = &ctx.accounts.config;

    let cpi_accounts = SplBurn {
        mint: ctx.accounts.asset_mint.to_account_info(),
        from: ctx.accounts.from.to_account_info(),
        authority: ctx.accounts.authority.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token_2022::burn(cpi_ctx, amount)?;

    emit!(Burned {
        asset: config.key(),
        from: ctx.accounts.from.key(),
        amount,
        supply,
    });
    Ok(())
}
