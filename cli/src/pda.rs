//! Addresses of the protocol accounts for one gated mint.

use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use gsp_gatekeeper::state::{GateState, WhitelistEntry};
use solana_sdk::pubkey::Pubkey;

pub fn gate(mint: &Pubkey) -> Pubkey {
    GateState::address(mint).0
}

pub fn whitelist_entry(gate: &Pubkey, account: &Pubkey) -> Pubkey {
    WhitelistEntry::address(gate, account).0
}

pub fn asset_config(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[gsp_token::constants::ASSET_SEED, mint.as_ref()], &gsp_token::ID).0
}

pub fn extra_account_metas(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[gsp_token::constants::EXTRA_ACCOUNT_METAS_SEED, mint.as_ref()],
        &gsp_token::ID,
    )
    .0
}

pub fn price_feed(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[gsp_oracle_module::PRICE_FEED_SEED, mint.as_ref()],
        &gsp_oracle_module::ID,
    )
    .0
}

pub fn token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &anchor_spl::token_2022::ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_per_gate_and_account() {
        let mint = Pubkey::new_unique();
        let gate = gate(&mint);
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        assert_ne!(whitelist_entry(&gate, &a), whitelist_entry(&gate, &b));
        assert_ne!(
            whitelist_entry(&gate, &a),
            whitelist_entry(&super::gate(&Pubkey::new_unique()), &a)
        );
    }

    #[test]
    fn test_addresses_match_program_seeds() {
        let mint = Pubkey::new_unique();
        let (expected_gate, _) = Pubkey::find_program_address(
            &[gsp_gatekeeper::constants::GATE_SEED, mint.as_ref()],
            &gsp_gatekeeper::ID,
        );
        assert_eq!(gate(&mint), expected_gate);
        assert_ne!(asset_config(&mint), extra_account_metas(&mint));
        assert_ne!(price_feed(&mint), gate(&mint));
    }
}
