use crate::constants::ASSET_SEED;
use crate::error::GatedAssetError;
use crate::events::*;
use crate::math::update_supply;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::{self, MintTo};
use anchor_spl::token_interface::{Mint as TokenMint, TokenAccount, TokenInterface};

#[derive(Accounts)]
pub struct Mint<'info> {
    pub authority: Signer<'info>,

    #[account(
        has_one = authority @ GatedAssetError::Unauthorized,
        has_one = asset_mint
    )]
    pub config: Account<'info, AssetConfig>,

    #[account(mut)]
    pub asset_mint: InterfaceAccount<'info, TokenMint>,

    #[account(mut, token::mint = asset_mint)]
    pub recipient: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Mint>, amount: u64) -> Result<()> {
    require!(amount > 0, GatedAssetError::ZeroAmount);

    let supply = update_supply(ctx.accounts.asset_mint.supply, amount, true)?;
    let config = &ctx.accounts.config;

    let asset_mint_key = config.asset_mint;
    let authority_seeds = &[ASSET_SEED, asset_mint_key.as_ref(), &[config.bump]];
    let signer = &[&authority_seeds[..]];

    let cpi_accounts = MintTo {
        mint: ctx.accounts.asset_mint.to_account_info(),
        to: ctx.accounts.recipient.to_account_info(),
        authority: config.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token_2022::mint_to(cpi_ctx, amount)?;

    emit!(Minted {
        asset: config.key(),
        recipient: ctx.accounts.recipient.key(),
        amount,
        supply,
    });
    Ok(())
}
