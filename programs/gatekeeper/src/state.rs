use crate::constants::{GATE_SEED, WHITELIST_SEED};
use crate::error::GatekeeperError;
use anchor_lang::prelude::*;

#[account]
#[derive(InitSpace, Default)]
pub struct GateState {
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    /// Identity allowed to call `check_and_record`.
    pub gated_asset: Pubkey,
    pub pool: Pubkey,
    /// Bound price feed account.
    pub oracle: Pubkey,
    pub locked: bool,
    pub self_whitelist_disabled: bool,
    /// Reference units.
    pub max_address_cap: u64,
    pub allowed_whitelist_index: Option<u64>,
    pub whitelist_count: u64,
    /// Lamports captured through self whitelisting.
    pub native_received: u64,
    pub bump: u8,
    pub _reserved: [u8; 32],
}

impl GateState {
    pub fn address(asset_mint: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[GATE_SEED, asset_mint.as_ref()], &crate::ID)
    }
}

/// Whitelist membership and contribution ledger for one address.
#[account]
#[derive(InitSpace, Default)]
pub struct WhitelistEntry {
    pub account: Pubkey,
    /// 1-based admission order, 0 until admitted.
    pub index: u64,
    /// Reference units, never decreases.
    pub contributed: u64,
    pub whitelisted_at: i64,
    pub source: WhitelistSource,
    pub bump: u8,
}

impl WhitelistEntry {
    pub fn address(gate: &Pubkey, account: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[WHITELIST_SEED, gate.as_ref(), account.as_ref()], &crate::ID)
    }

    /// Reads the entry of `account` from `info`, `None` when it was never created.
    pub fn load(info: &AccountInfo, gate: &Pubkey, account: &Pubkey) -> Result<Option<Self>> {
        let (expected, _) = Self::address(gate, account);
        require_keys_eq!(info.key(), expected, GatekeeperError::InvalidWhitelistEntry);
        if info.data_is_empty() || *info.owner != crate::ID {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        let entry = Self::try_deserialize(&mut &data[..])?;
        Ok(Some(entry))
    }

    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        require_keys_eq!(*info.owner, crate::ID, GatekeeperError::InvalidWhitelistEntry);
        let mut data = info.try_borrow_mut_data()?;
        let mut dst: &mut [u8] = &mut data;
        self.try_serialize(&mut dst)?;
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum WhitelistSource {
    #[default]
    Owner,
    Batch,
    SelfPayment,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhitelistResult {
    Added { index: u64 },
    AlreadyWhitelisted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_account<'a>(
        key: &'a Pubkey,
        owner: &'a Pubkey,
        lamports: &'a mut u64,
        data: &'a mut [u8],
    ) -> AccountInfo<'a> {
        AccountInfo::new(key, false, true, lamports, data, owner, false, 0)
    }

    #[test]
    fn test_load_missing_entry() {
        let gate = Pubkey::new_unique();
        let holder = Pubkey::new_unique();
        let (key, _) = WhitelistEntry::address(&gate, &holder);
        let system = Pubkey::default();
        let mut lamports = 0;
        let mut data: Vec<u8> = vec![];
        let info = entry_account(&key, &system, &mut lamports, &mut data);

        let entry = WhitelistEntry::load(&info, &gate, &holder).expect("should load");
        assert!(entry.is_none());
    }

    #[test]
    fn test_load_rejects_foreign_entry() {
        let gate = Pubkey::new_unique();
        let holder = Pubkey::new_unique();
        let (key, _) = WhitelistEntry::address(&gate, &Pubkey::new_unique());
        let mut lamports = 0;
        let mut data: Vec<u8> = vec![];
        let info = entry_account(&key, &crate::ID, &mut lamports, &mut data);

        assert!(WhitelistEntry::load(&info, &gate, &holder).is_err());
    }

    #[test]
    fn test_store_then_load() {
        let gate = Pubkey::new_unique();
        let holder = Pubkey::new_unique();
        let (key, bump) = WhitelistEntry::address(&gate, &holder);
        let mut lamports = 1;
        let mut data = vec![0u8; 8 + WhitelistEntry::INIT_SPACE];
        let info = entry_account(&key, &crate::ID, &mut lamports, &mut data);

        let entry = WhitelistEntry {
            account: holder,
            index: 3,
            contributed: 2_500,
            whitelisted_at: 1_700_000_000,
            source: WhitelistSource::Batch,
            bump,
        };
        entry.store(&info).expect("should store");

        let loaded = WhitelistEntry::load(&info, &gate, &holder)
            .expect("should load")
            .expect("entry should exist");
        assert_eq!(loaded.account, holder);
        assert_eq!(loaded.index, 3);
        assert_eq!(loaded.contributed, 2_500);
        assert_eq!(loaded.source, WhitelistSource::Batch);
    }
}
