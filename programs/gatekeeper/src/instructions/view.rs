use crate::ledger;
use crate::state::*;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct WhitelistView<'info> {
    pub state: Account<'info, GateState>,

    /// CHECK: May not exist; checked against the PDA of the queried address
    pub entry: UncheckedAccount<'info>,
}

pub fn is_whitelisted(ctx: Context<WhitelistView>, address: Pubkey) -> Result<bool> {
    let entry = WhitelistEntry::load(&ctx.accounts.entry, &ctx.accounts.state.key(), &address)?;
    Ok(ledger::is_whitelisted(entry.as_ref()))
}

pub fn contributed(ctx: Context<WhitelistView>, address: Pubkey) -> Result<u64> {
    let entry = WhitelistEntry::load(&ctx.accounts.entry, &ctx.accounts.state.key(), &address)?;
    Ok(entry.map_or(0, |e| e.contributed))
}
