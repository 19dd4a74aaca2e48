//! Fuzz tests for whitelist admission
//!
//! Mixes owner additions, batch additions and paid self whitelisting and
//! checks that indices are dense, assigned once, and that tiering admits
//! exactly the entries up to the allowed index.

use anchor_lang::prelude::*;
use gsp_gatekeeper::constants::MAX_BATCH_WHITELIST;
use gsp_gatekeeper::error::GatekeeperError;
use gsp_gatekeeper::ledger::{self, PriceQuoter};
use gsp_gatekeeper::state::{GateState, WhitelistEntry, WhitelistResult, WhitelistSource};
use std::collections::HashMap;
use trident::prelude::*;

#[derive(Debug, Arbitrary)]
pub enum WhitelistOp {
    Add(u8),
    Batch(Vec<u8>),
    Pay { holder: u8, lamports: u64 },
    ToggleSelfWhitelist,
}

#[derive(Debug, Arbitrary)]
pub struct WhitelistInput {
    pub operations: Vec<WhitelistOp>,
    pub allowed_whitelist_index: Option<u8>,
}

#[fuzz]
pub fn fuzz_whitelist(input: WhitelistInput) -> Result<()> {
    if input.operations.is_empty() || input.operations.len() > 100 {
        return Ok(());
    }

    let holders: Vec<Pubkey> = (0..16).map(|_| Pubkey::new_unique()).collect();
    let mut gate = GateState {
        max_address_cap: u64::MAX,
        ..GateState::default()
    };
    let mut entries: HashMap<Pubkey, WhitelistEntry> = HashMap::new();

    for op in &input.operations {
        match op {
            WhitelistOp::Add(idx) => {
                let holder = holders[*idx as usize % holders.len()];
                add(&mut gate, &mut entries, holder, WhitelistSource::Owner)?;
            }
            WhitelistOp::Batch(idxs) => {
                if ledger::validate_batch(idxs.len(), idxs.len()).is_err() {
                    assert!(idxs.is_empty() || idxs.len() > MAX_BATCH_WHITELIST);
                    continue;
                }
                for idx in idxs {
                    let holder = holders[*idx as usize % holders.len()];
                    add(&mut gate, &mut entries, holder, WhitelistSource::Batch)?;
                }
            }
            WhitelistOp::Pay { holder, lamports } => {
                let holder = holders[*holder as usize % holders.len()];
                let received = gate.native_received;
                match ledger::accept_payment(&mut gate, *lamports) {
                    Ok(()) => {
                        assert_eq!(gate.native_received, received + lamports);
                        add(&mut gate, &mut entries, holder, WhitelistSource::SelfPayment)?;
                    }
                    Err(err) => {
                        assert_eq!(gate.native_received, received);
                        let code = parse_anchor_error(&err);
                        if gate.self_whitelist_disabled {
                            assert_eq!(code, Some(u32::from(GatekeeperError::SelfWhitelistDisabled)));
                        } else if *lamports == 0 {
                            assert_eq!(code, Some(u32::from(GatekeeperError::ZeroPayment)));
                        } else {
                            assert_eq!(code, Some(u32::from(GatekeeperError::MathOverflow)));
                        }
                    }
                }
            }
            WhitelistOp::ToggleSelfWhitelist => {
                gate.self_whitelist_disabled = !gate.self_whitelist_disabled;
            }
        }
    }

    // Indices are 1..=count with no gaps or repeats
    let mut indices: Vec<u64> = entries.values().map(|e| e.index).collect();
    indices.sort_unstable();
    let expected: Vec<u64> = (1..=gate.whitelist_count).collect();
    assert_eq!(indices, expected);

    // Tiering admits exactly the entries up to the allowed index
    gate.allowed_whitelist_index = input.allowed_whitelist_index.map(u64::from);
    gate.gated_asset = Pubkey::new_unique();
    for entry in entries.values_mut() {
        let index = entry.index;
        let result = ledger::check_and_record(&gate, &gate.gated_asset, Some(entry), 1, &mut ZeroQuote);
        let admitted = gate.allowed_whitelist_index.map_or(true, |max| index <= max);
        assert_eq!(result.is_ok(), admitted, "Entry {} tiering mismatch", index);
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

struct ZeroQuote;

impl PriceQuoter for ZeroQuote {
    fn quote(&mut self, _amount_in: u64) -> Result<u64> {
        Ok(0)
    }
}

fn add(
    gate: &mut GateState,
    entries: &mut HashMap<Pubkey, WhitelistEntry>,
    holder: Pubkey,
    source: WhitelistSource,
) -> Result<()> {
    let count = gate.whitelist_count;
    let entry = entries.entry(holder).or_default();
    let existing = entry.index;

    match ledger::admit(gate, entry, holder, 255, source, 0)? {
        WhitelistResult::Added { index } => {
            assert_eq!(existing, 0);
            assert_eq!(index, count + 1);
        }
        WhitelistResult::AlreadyWhitelisted => {
            assert_ne!(existing, 0);
            assert_eq!(entry.index, existing);
            assert_eq!(gate.whitelist_count, count);
        }
    }
    Ok(())
}

fn parse_anchor_error(error: &Error) -> Option<u32> {
    match error {
        Error::AnchorError(e) => Some(e.error_code_number),
        Error::ProgramError(_) => None,
    }
}
