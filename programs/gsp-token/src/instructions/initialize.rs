use crate::constants::*;
use crate::error::GatedAssetError;
use crate::events::*;
use crate::math::{validate_decimals, validate_metadata};
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token_2022::spl_token_2022::extension::{
    transfer_hook::TransferHook as TransferHookExtension, BaseStateWithExtensions,
    StateWithExtensions,
};
use anchor_spl::token_2022::spl_token_2022::state::Mint as SplMint;
use anchor_spl::token_2022::Token2022;
use anchor_spl::token_interface::Mint;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + AssetConfig::INIT_SPACE,
        seeds = [ASSET_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub config: Account<'info, AssetConfig>,

    #[account(mint::token_program = token_program)]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Program<'info, Token2022>,
    pub system_program: Program<'info, System>,
}

/// Takes over an existing Token-2022 mint whose mint authority was handed
/// to the config PDA and whose transfer hook points at this program.
pub fn handler(ctx: Context<Initialize>, name: String, symbol: String, decimals: u8) -> Result<()> {
    validate_metadata(&name, &symbol)?;
    validate_decimals(decimals, ctx.accounts.asset_mint.decimals)?;

    let config_key = ctx.accounts.config.key();
    require!(
        ctx.accounts.asset_mint.mint_authority == COption::Some(config_key),
        GatedAssetError::InvalidMintAuthority
    );
    {
        let mint_info = ctx.accounts.asset_mint.to_account_info();
        let data = mint_info.try_borrow_data()?;
        let mint = StateWithExtensions::<SplMint>::unpack(&data[..])?;
        let hook = mint.get_extension::<TransferHookExtension>()?;
        require!(
            Option::<Pubkey>::from(hook.program_id) == Some(crate::ID),
            GatedAssetError::HookNotConfigured
        );
    }

    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.asset_mint = ctx.accounts.asset_mint.key();
    config.gatekeeper = None;
    config.name = name.clone();
    config.symbol = symbol.clone();
    config.decimals = decimals;
    config.bump = ctx.bumps.config;

    emit!(AssetInitialized {
        asset: config_key,
        asset_mint: config.asset_mint,
        name,
        symbol,
        decimals,
    });
    Ok(())
}
