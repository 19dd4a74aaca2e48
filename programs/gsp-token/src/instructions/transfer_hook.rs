use crate::constants::{ASSET_SEED, EXTRA_ACCOUNT_METAS_SEED};
use crate::error::GatedAssetError;
use crate::events::TransferChecked;
use crate::hook::{route_transfer, Route};
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::spl_token_2022::{
    extension::{
        transfer_hook::TransferHookAccount, BaseStateWithExtensionsMut, PodStateWithExtensionsMut,
    },
    pod::PodAccount,
};
use anchor_spl::token_interface::{Mint, TokenAccount};
use gsp_gatekeeper::program::GspGatekeeper;
use gsp_oracle_module::program::GspOracleModule;

/// Accounts of the SPL `Execute` instruction. The first five are fixed by
/// the interface, the rest come from the extra-account-meta list.
#[derive(Accounts)]
pub struct TransferHook<'info> {
    #[account(token::mint = mint)]
    pub source_token: InterfaceAccount<'info, TokenAccount>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(token::mint = mint)]
    pub destination_token: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: Source owner or delegate, already verified by Token-2022
    pub owner: UncheckedAccount<'info>,

    /// CHECK: Extra account meta list
    #[account(
        seeds = [EXTRA_ACCOUNT_METAS_SEED, mint.key().as_ref()],
        bump
    )]
    pub extra_account_meta_list: UncheckedAccount<'info>,

    #[account(
        seeds = [ASSET_SEED, mint.key().as_ref()],
        bump = config.bump
    )]
    pub config: Account<'info, AssetConfig>,

    pub gatekeeper_program: Program<'info, GspGatekeeper>,

    /// CHECK: Compared with the bound gatekeeper before use
    pub gate: UncheckedAccount<'info>,

    /// CHECK: Validated by the gatekeeper against the counterparty
    #[account(mut)]
    pub whitelist_entry: UncheckedAccount<'info>,

    pub oracle_program: Program<'info, GspOracleModule>,

    /// CHECK: Validated by the gatekeeper against its bound oracle
    pub price_feed: UncheckedAccount<'info>,
}

fn check_is_transferring(ctx: &Context<TransferHook>) -> Result<()> {
    let source_info = ctx.accounts.source_token.to_account_info();
    let mut data = source_info.try_borrow_mut_data()?;
    let mut account = PodStateWithExtensionsMut::<PodAccount>::unpack(*data)?;
    let extension = account.get_extension_mut::<TransferHookAccount>()?;
    require!(
        bool::from(extension.transferring),
        GatedAssetError::NotTransferring
    );
    Ok(())
}

pub fn handler(ctx: Context<TransferHook>, amount: u64) -> Result<()> {
    check_is_transferring(&ctx)?;

    let config = &ctx.accounts.config;
    let counterparty = ctx.accounts.destination_token.owner;
    let route = route_transfer(config, &config.key(), &counterparty, &ctx.accounts.gate.key())?;
    if route == Route::Ungated {
        emit!(TransferChecked {
            asset: config.key(),
            counterparty,
            amount,
            gated: false,
        });
        return Ok(());
    }

    let asset_mint_key = config.asset_mint;
    let authority_seeds = &[ASSET_SEED, asset_mint_key.as_ref(), &[config.bump]];
    let signer = &[&authority_seeds[..]];

    let cpi_accounts = gsp_gatekeeper::cpi::accounts::CheckAndRecord {
        caller: config.to_account_info(),
        state: ctx.accounts.gate.to_account_info(),
        entry: ctx.accounts.whitelist_entry.to_account_info(),
        price_feed: ctx.accounts.price_feed.to_account_info(),
        oracle_program: ctx.accounts.oracle_program.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.gatekeeper_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    gsp_gatekeeper::cpi::check_and_record(cpi_ctx, counterparty, amount)?;

    emit!(TransferChecked {
        asset: config.key(),
        counterparty,
        amount,
        gated: true,
    });
    Ok(())
}
