use crate::constants::WHITELIST_SEED;
use crate::events::{PaymentReceived, Whitelisted};
use crate::ledger;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

#[derive(Accounts)]
pub struct ReceivePayment<'info> {
    #[account(mut)]
    pub sender: Signer<'info>,

    #[account(mut)]
    pub state: Account<'info, GateState>,

    #[account(
        init_if_needed,
        payer = sender,
        space = 8 + WhitelistEntry::INIT_SPACE,
        seeds = [WHITELIST_SEED, state.key().as_ref(), sender.key().as_ref()],
        bump
    )]
    pub entry: Account<'info, WhitelistEntry>,

    pub system_program: Program<'info, System>,
}

/// Self whitelisting: the sender pays `amount` lamports into the gate and
/// is admitted. The lamports stay with the gate.
pub fn handler(ctx: Context<ReceivePayment>, amount: u64) -> Result<WhitelistResult> {
    ledger::accept_payment(&mut ctx.accounts.state, amount)?;

    let sender = ctx.accounts.sender.key();
    let gate = ctx.accounts.state.key();
    let now = Clock::get()?.unix_timestamp;
    let result = ledger::admit(
        &mut ctx.accounts.state,
        &mut ctx.accounts.entry,
        sender,
        ctx.bumps.entry,
        WhitelistSource::SelfPayment,
        now,
    )?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.sender.to_account_info(),
                to: ctx.accounts.state.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(PaymentReceived {
        gate,
        sender,
        amount,
    });
    if let WhitelistResult::Added { index } = result {
        emit!(Whitelisted {
            gate,
            account: sender,
            index,
            source: WhitelistSource::SelfPayment,
        });
    }
    Ok(result)
}
