use crate::constants::WHITELIST_SEED;
use crate::error::GatekeeperError;
use crate::events::Whitelisted;
use crate::ledger;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

#[derive(Accounts)]
#[instruction(address: Pubkey)]
pub struct AddWhitelisted<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ GatekeeperError::NotOwner
    )]
    pub state: Account<'info, GateState>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + WhitelistEntry::INIT_SPACE,
        seeds = [WHITELIST_SEED, state.key().as_ref(), address.as_ref()],
        bump
    )]
    pub entry: Account<'info, WhitelistEntry>,

    pub system_program: Program<'info, System>,
}

/// Entry PDAs are passed as remaining accounts, in the order of `addresses`.
#[derive(Accounts)]
pub struct AddBatchWhitelisted<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ GatekeeperError::NotOwner
    )]
    pub state: Account<'info, GateState>,

    pub system_program: Program<'info, System>,
}

pub fn add(ctx: Context<AddWhitelisted>, address: Pubkey) -> Result<WhitelistResult> {
    let now = Clock::get()?.unix_timestamp;
    let gate = ctx.accounts.state.key();
    let result = ledger::admit(
        &mut ctx.accounts.state,
        &mut ctx.accounts.entry,
        address,
        ctx.bumps.entry,
        WhitelistSource::Owner,
        now,
    )?;

    if let WhitelistResult::Added { index } = result {
        emit!(Whitelisted {
            gate,
            account: address,
            index,
            source: WhitelistSource::Owner,
        });
    }
    Ok(result)
}

pub fn add_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, AddBatchWhitelisted<'info>>,
    addresses: Vec<Pubkey>,
) -> Result<()> {
    ledger::validate_batch(addresses.len(), ctx.remaining_accounts.len())?;

    let now = Clock::get()?.unix_timestamp;
    let gate = ctx.accounts.state.key();
    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();

    for (address, info) in addresses.iter().zip(ctx.remaining_accounts.iter()) {
        let (expected, bump) = WhitelistEntry::address(&gate, address);
        require_keys_eq!(info.key(), expected, GatekeeperError::InvalidWhitelistEntry);

        let mut entry = match WhitelistEntry::load(info, &gate, address)? {
            Some(entry) => entry,
            None => {
                let bump_seed = [bump];
                let seeds: &[&[u8]] = &[WHITELIST_SEED, gate.as_ref(), address.as_ref(), &bump_seed];
                create_entry_account(&payer, info, &system_program, seeds)?;
                WhitelistEntry::default()
            }
        };

        let result = ledger::admit(
            &mut ctx.accounts.state,
            &mut entry,
            *address,
            bump,
            WhitelistSource::Batch,
            now,
        )?;
        if let WhitelistResult::Added { index } = result {
            entry.store(info)?;
            emit!(Whitelisted {
                gate,
                account: *address,
                index,
                source: WhitelistSource::Batch,
            });
        }
    }

    msg!("Batch of {} processed, {} whitelisted", addresses.len(), ctx.accounts.state.whitelist_count);
    Ok(())
}

/// Allocates an entry PDA owned by this program. A PDA that already holds
/// lamports cannot go through `create_account`, so it is topped up,
/// allocated and assigned instead.
fn create_entry_account<'info>(
    payer: &AccountInfo<'info>,
    entry: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    seeds: &[&[u8]],
) -> Result<()> {
    let space = 8 + WhitelistEntry::INIT_SPACE;
    let rent = Rent::get()?.minimum_balance(space);
    let signer = &[seeds];
    let current = entry.lamports();

    if current == 0 {
        system_program::create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: entry.clone(),
                },
                signer,
            ),
            rent,
            space as u64,
            &crate::ID,
        )?;
        return Ok(());
    }

    let top_up = rent.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                Transfer {
                    from: payer.clone(),
                    to: entry.clone(),
                },
            ),
            top_up,
        )?;
    }
    system_program::allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            Allocate {
                account_to_allocate: entry.clone(),
            },
            signer,
        ),
        space as u64,
    )?;
    system_program::assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            Assign {
                account_to_assign: entry.clone(),
            },
            signer,
        ),
        &crate::ID,
    )?;
    Ok(())
}
