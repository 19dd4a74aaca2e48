use crate::error::GatekeeperError;
use crate::events::ContributionRecorded;
use crate::ledger::{self, PriceQuoter};
use crate::state::*;
use anchor_lang::prelude::*;
use gsp_oracle_module::program::GspOracleModule;
use gsp_oracle_module::PriceFeed;

#[derive(Accounts)]
pub struct CheckAndRecord<'info> {
    /// The gated asset identity, a PDA of the asset program.
    pub caller: Signer<'info>,

    pub state: Account<'info, GateState>,

    /// CHECK: Counterparty whitelist entry, may not exist; checked against the PDA in the handler
    #[account(mut)]
    pub entry: UncheckedAccount<'info>,

    /// CHECK: Checked against the bound oracle before quoting
    pub price_feed: UncheckedAccount<'info>,

    pub oracle_program: Program<'info, GspOracleModule>,
}

/// Quotes through the oracle program, once the supplied feed is proven to
/// be the one bound to this gate and its pool.
struct OracleQuoter<'a, 'info> {
    gate: &'a GateState,
    price_feed: &'a AccountInfo<'info>,
    oracle_program: &'a AccountInfo<'info>,
}

impl OracleQuoter<'_, '_> {
    /// The feed must be the bound one, priced for this asset's mint and
    /// pool, and administered by the gate owner.
    fn verify_feed(&self) -> Result<()> {
        require_keys_eq!(
            self.price_feed.key(),
            self.gate.oracle,
            GatekeeperError::OracleMismatch
        );
        require_keys_eq!(
            *self.price_feed.owner,
            gsp_oracle_module::ID,
            GatekeeperError::OracleMismatch
        );
        let feed = {
            let data = self.price_feed.try_borrow_data()?;
            PriceFeed::try_deserialize(&mut &data[..])?
        };
        require_keys_eq!(feed.pool, self.gate.pool, GatekeeperError::PoolMismatch);
        require_keys_eq!(
            feed.base_mint,
            self.gate.asset_mint,
            GatekeeperError::ForeignOracle
        );
        require_keys_eq!(
            feed.authority,
            self.gate.authority,
            GatekeeperError::ForeignOracle
        );
        Ok(())
    }
}

impl PriceQuoter for OracleQuoter<'_, '_> {
    fn quote(&mut self, amount_in: u64) -> Result<u64> {
        self.verify_feed()?;

        let cpi_ctx = CpiContext::new(
            self.oracle_program.clone(),
            gsp_oracle_module::cpi::accounts::Quote {
                price_feed: self.price_feed.clone(),
            },
        );
        Ok(gsp_oracle_module::cpi::quote(cpi_ctx, amount_in)?.get())
    }
}

pub fn handler(ctx: Context<CheckAndRecord>, counterparty: Pubkey, amount_in: u64) -> Result<()> {
    let state = &ctx.accounts.state;
    let gate = state.key();
    ledger::ensure_open(state, &ctx.accounts.caller.key())?;

    let entry_info = ctx.accounts.entry.to_account_info();
    let mut entry = WhitelistEntry::load(&entry_info, &gate, &counterparty)?;
    let previous = entry.as_ref().map_or(0, |e| e.contributed);

    let price_feed = ctx.accounts.price_feed.to_account_info();
    let oracle_program = ctx.accounts.oracle_program.to_account_info();
    let mut quoter = OracleQuoter {
        gate: state,
        price_feed: &price_feed,
        oracle_program: &oracle_program,
    };
    let contributed = ledger::record_contribution(state, entry.as_mut(), amount_in, &mut quoter)?;

    if let Some(entry) = &entry {
        entry.store(&entry_info)?;
    }

    emit!(ContributionRecorded {
        gate,
        account: counterparty,
        amount_in,
        quote: contributed - previous,
        contributed,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    fn error_code(err: Error) -> Option<u32> {
        match err {
            Error::AnchorError(e) => Some(e.error_code_number),
            Error::ProgramError(_) => None,
        }
    }

    struct Fixture {
        gate: GateState,
        feed_key: Pubkey,
        feed: PriceFeed,
    }

    impl Fixture {
        fn new() -> Self {
            let authority = Pubkey::new_unique();
            let asset_mint = Pubkey::new_unique();
            let pool = Pubkey::new_unique();
            let feed_key = Pubkey::new_unique();
            let gate = GateState {
                authority,
                asset_mint,
                pool,
                oracle: feed_key,
                ..GateState::default()
            };
            let feed = PriceFeed {
                authority,
                pool,
                base_mint: asset_mint,
                price_x64: 1 << 64,
                is_active: true,
                ..PriceFeed::default()
            };
            Self {
                gate,
                feed_key,
                feed,
            }
        }

        fn verify(&self, owner: &Pubkey) -> Result<()> {
            let mut data = vec![0u8; 8 + PriceFeed::INIT_SPACE];
            let mut dst: &mut [u8] = &mut data;
            self.feed.try_serialize(&mut dst)?;

            let mut lamports = 1;
            let feed_info = AccountInfo::new(
                &self.feed_key,
                false,
                false,
                &mut lamports,
                &mut data,
                owner,
                false,
                0,
            );
            let program_key = gsp_oracle_module::ID;
            let mut program_lamports = 1;
            let mut program_data: Vec<u8> = vec![];
            let loader = Pubkey::default();
            let program_info = AccountInfo::new(
                &program_key,
                false,
                false,
                &mut program_lamports,
                &mut program_data,
                &loader,
                true,
                0,
            );

            OracleQuoter {
                gate: &self.gate,
                price_feed: &feed_info,
                oracle_program: &program_info,
            }
            .verify_feed()
        }
    }

    #[test]
    fn test_bound_feed_verifies() {
        let fixture = Fixture::new();
        assert!(fixture.verify(&gsp_oracle_module::ID).is_ok());
    }

    #[test]
    fn test_unbound_feed_rejected() {
        let mut fixture = Fixture::new();
        fixture.gate.oracle = Pubkey::new_unique();
        let err = fixture.verify(&gsp_oracle_module::ID).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatekeeperError::OracleMismatch)));
    }

    #[test]
    fn test_feed_owned_by_other_program_rejected() {
        let fixture = Fixture::new();
        let err = fixture.verify(&Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatekeeperError::OracleMismatch)));
    }

    #[test]
    fn test_feed_for_other_pool_rejected() {
        let mut fixture = Fixture::new();
        fixture.feed.pool = Pubkey::new_unique();
        let err = fixture.verify(&gsp_oracle_module::ID).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatekeeperError::PoolMismatch)));
    }

    #[test]
    fn test_feed_created_by_stranger_rejected() {
        let mut fixture = Fixture::new();
        fixture.feed.authority = Pubkey::new_unique();
        let err = fixture.verify(&gsp_oracle_module::ID).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatekeeperError::ForeignOracle)));
    }

    #[test]
    fn test_feed_for_other_mint_rejected() {
        let mut fixture = Fixture::new();
        fixture.feed.base_mint = Pubkey::new_unique();
        let err = fixture.verify(&gsp_oracle_module::ID).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatekeeperError::ForeignOracle)));
    }
}
