//! Fuzz tests for contribution accounting
//!
//! Drives the gate ledger with arbitrary transfer sequences and checks that
//! no address ever ends above the cap and that failed checks leave the
//! entry untouched.

use anchor_lang::prelude::*;
use gsp_gatekeeper::error::GatekeeperError;
use gsp_gatekeeper::ledger::{self, PriceQuoter};
use gsp_gatekeeper::state::{GateState, WhitelistEntry, WhitelistSource};
use trident::prelude::*;

#[derive(Debug, Arbitrary)]
pub struct SaleInput {
    pub max_address_cap: u64,
    pub locked: bool,
    pub whitelisted: bool,
    pub quotes: Vec<u64>,
}

#[fuzz]
pub fn fuzz_contribution_sequence(input: SaleInput) -> Result<()> {
    if input.quotes.is_empty() || input.quotes.len() > 64 {
        return Ok(());
    }

    let ctx = setup_gate(input.max_address_cap, input.locked);
    let holder = Pubkey::new_unique();
    let mut entry = WhitelistEntry::default();
    let mut gate = ctx.gate.clone();
    if input.whitelisted {
        ledger::admit(&mut gate, &mut entry, holder, 255, WhitelistSource::Owner, 0)?;
    }

    for (i, &quote) in input.quotes.iter().enumerate() {
        let before = entry.contributed;
        let mut quoter = Quote(quote);
        let result = ledger::check_and_record(&gate, &ctx.caller, Some(&mut entry), 1, &mut quoter);

        match result {
            Ok(total) => {
                assert!(!input.locked, "Transfer {} passed a locked gate", i);
                assert!(input.whitelisted, "Transfer {} passed without whitelist", i);
                assert_eq!(total, before + quote);
                assert!(total <= gate.max_address_cap);
            }
            Err(err) => {
                assert_eq!(entry.contributed, before, "Failed transfer {} changed the ledger", i);
                let code = parse_anchor_error(&err);
                if input.locked {
                    assert_eq!(code, Some(u32::from(GatekeeperError::Locked)));
                } else if !input.whitelisted {
                    assert_eq!(code, Some(u32::from(GatekeeperError::NotWhitelisted)));
                } else if before >= gate.max_address_cap {
                    assert_eq!(code, Some(u32::from(GatekeeperError::AlreadyContributed)));
                } else {
                    assert_eq!(code, Some(u32::from(GatekeeperError::MaxAddressCapOverflow)));
                }
            }
        }
    }

    assert!(entry.contributed <= gate.max_address_cap);
    Ok(())
}

/// Any caller other than the bound asset is rejected before the lock is read.
#[fuzz]
pub fn fuzz_unauthorized_caller(locked: bool, amount_in: u64) -> Result<()> {
    let ctx = setup_gate(u64::MAX, locked);
    let mut entry = WhitelistEntry::default();
    let mut quoter = Quote(amount_in);

    let result = ledger::check_and_record(
        &ctx.gate,
        &Pubkey::new_unique(),
        Some(&mut entry),
        amount_in,
        &mut quoter,
    );

    let code = result.err().as_ref().and_then(parse_anchor_error);
    assert_eq!(code, Some(u32::from(GatekeeperError::NotAuthorizedCaller)));
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

struct Quote(u64);

impl PriceQuoter for Quote {
    fn quote(&mut self, _amount_in: u64) -> Result<u64> {
        Ok(self.0)
    }
}

struct GateContext {
    gate: GateState,
    caller: Pubkey,
}

fn setup_gate(max_address_cap: u64, locked: bool) -> GateContext {
    let caller = Pubkey::new_unique();
    let gate = GateState {
        authority: Pubkey::new_unique(),
        asset_mint: Pubkey::new_unique(),
        gated_asset: caller,
        locked,
        max_address_cap,
        ..GateState::default()
    };
    GateContext { gate, caller }
}

fn parse_anchor_error(error: &Error) -> Option<u32> {
    match error {
        Error::AnchorError(e) => Some(e.error_code_number),
        Error::ProgramError(_) => None,
    }
}
