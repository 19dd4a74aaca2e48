//! Whitelist and contribution rules, free of account plumbing.
//!
//! Instruction handlers load accounts, call into these functions, then
//! persist whatever they mutated. The oracle is reached through
//! [`PriceQuoter`] so the decision path can be driven by test doubles.

use crate::constants::MAX_BATCH_WHITELIST;
use crate::error::GatekeeperError;
use crate::state::{GateState, WhitelistEntry, WhitelistResult, WhitelistSource};
use anchor_lang::prelude::*;

/// Converts gated asset atoms into reference units.
pub trait PriceQuoter {
    fn quote(&mut self, amount_in: u64) -> Result<u64>;
}

/// Admits `account` into the whitelist. Re-admitting is a no-op that keeps
/// the original index and timestamp.
pub fn admit(
    gate: &mut GateState,
    entry: &mut WhitelistEntry,
    account: Pubkey,
    bump: u8,
    source: WhitelistSource,
    now: i64,
) -> Result<WhitelistResult> {
    if entry.index != 0 {
        return Ok(WhitelistResult::AlreadyWhitelisted);
    }

    let index = gate
        .whitelist_count
        .checked_add(1)
        .ok_or(GatekeeperError::MathOverflow)?;
    gate.whitelist_count = index;

    entry.account = account;
    entry.index = index;
    entry.whitelisted_at = now;
    entry.source = source;
    entry.bump = bump;

    Ok(WhitelistResult::Added { index })
}

pub fn accept_payment(gate: &mut GateState, amount: u64) -> Result<()> {
    require!(
        !gate.self_whitelist_disabled,
        GatekeeperError::SelfWhitelistDisabled
    );
    require!(amount > 0, GatekeeperError::ZeroPayment);

    gate.native_received = gate
        .native_received
        .checked_add(amount)
        .ok_or(GatekeeperError::MathOverflow)?;
    Ok(())
}

pub fn validate_batch(len: usize, entries_len: usize) -> Result<()> {
    require!(
        len > 0 && len <= MAX_BATCH_WHITELIST && len == entries_len,
        GatekeeperError::InvalidBatch
    );
    Ok(())
}

pub fn is_whitelisted(entry: Option<&WhitelistEntry>) -> bool {
    entry.is_some_and(|e| e.index != 0)
}

pub fn authorize(gate: &GateState, caller: &Pubkey) -> Result<()> {
    require_keys_eq!(
        *caller,
        gate.gated_asset,
        GatekeeperError::NotAuthorizedCaller
    );
    Ok(())
}

fn within_tier(gate: &GateState, entry: &WhitelistEntry) -> bool {
    gate.allowed_whitelist_index
        .map_or(true, |allowed| entry.index <= allowed)
}

/// Caller and lock checks, the part of the purchase check that needs no
/// ledger state.
pub fn ensure_open(gate: &GateState, caller: &Pubkey) -> Result<()> {
    authorize(gate, caller)?;
    require!(!gate.locked, GatekeeperError::Locked);
    Ok(())
}

/// Membership, quote and cap checks for an open gate. On success the quoted
/// amount is added to `entry` and the new total returned.
///
/// The quoter is only consulted for a member, and the entry is written after
/// every check has passed, so a failure leaves it untouched.
pub fn record_contribution<Q: PriceQuoter>(
    gate: &GateState,
    entry: Option<&mut WhitelistEntry>,
    amount_in: u64,
    quoter: &mut Q,
) -> Result<u64> {
    let entry = match entry {
        Some(entry) if entry.index != 0 && within_tier(gate, entry) => entry,
        _ => return err!(GatekeeperError::NotWhitelisted),
    };

    let quote = quoter.quote(amount_in)?;
    let projected = entry.contributed.checked_add(quote);

    require!(
        entry.contributed < gate.max_address_cap,
        GatekeeperError::AlreadyContributed
    );
    let projected = projected
        .filter(|total| *total <= gate.max_address_cap)
        .ok_or(GatekeeperError::MaxAddressCapOverflow)?;

    entry.contributed = projected;
    Ok(projected)
}

pub fn check_and_record<Q: PriceQuoter>(
    gate: &GateState,
    caller: &Pubkey,
    entry: Option<&mut WhitelistEntry>,
    amount_in: u64,
    quoter: &mut Q,
) -> Result<u64> {
    ensure_open(gate, caller)?;
    record_contribution(gate, entry, amount_in, quoter)
}
