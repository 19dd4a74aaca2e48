use crate::constants::EXTRA_ACCOUNT_METAS_SEED;
use crate::error::GatedAssetError;
use crate::hook::extra_account_metas;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;
use spl_tlv_account_resolution::state::ExtraAccountMetaList;
use spl_transfer_hook_interface::instruction::ExecuteInstruction;

#[derive(Accounts)]
pub struct InitializeExtraAccountMetaList<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        has_one = authority @ GatedAssetError::Unauthorized,
        has_one = asset_mint
    )]
    pub config: Account<'info, AssetConfig>,

    /// CHECK: Validation account, written through ExtraAccountMetaList::init
    #[account(
        init,
        payer = authority,
        space = ExtraAccountMetaList::size_of(extra_account_metas()?.len())?,
        seeds = [EXTRA_ACCOUNT_METAS_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub extra_account_meta_list: AccountInfo<'info>,

    pub asset_mint: InterfaceAccount<'info, Mint>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeExtraAccountMetaList>) -> Result<()> {
    let metas = extra_account_metas()?;
    let mut data = ctx.accounts.extra_account_meta_list.try_borrow_mut_data()?;
    ExtraAccountMetaList::init::<ExecuteInstruction>(&mut data, &metas)?;

    msg!("Extra account metas written for {}", ctx.accounts.asset_mint.key());
    Ok(())
}
