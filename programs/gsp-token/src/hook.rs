//! Extra accounts Token-2022 forwards to the transfer hook.
//!
//! Execute accounts 0..=4 are fixed by the interface: source, mint,
//! destination, source owner, extra-account-meta list. The entries below
//! resolve to indices 5..=10 and must stay in the order `TransferHook`
//! declares them.

use crate::constants::ASSET_SEED;
use crate::error::GatedAssetError;
use crate::state::AssetConfig;
use anchor_lang::prelude::*;
use gsp_gatekeeper::constants::{GATE_SEED, WHITELIST_SEED};
use gsp_gatekeeper::state::GateState;
use gsp_oracle_module::PRICE_FEED_SEED;
use spl_tlv_account_resolution::{account::ExtraAccountMeta, seeds::Seed};

const MINT_INDEX: u8 = 1;
const DESTINATION_INDEX: u8 = 2;
const GATEKEEPER_PROGRAM_INDEX: u8 = 6;
const GATE_INDEX: u8 = 7;
const ORACLE_PROGRAM_INDEX: u8 = 9;

/// Owner field of an SPL token account.
const TOKEN_ACCOUNT_OWNER_OFFSET: u8 = 32;

pub fn extra_account_metas() -> Result<Vec<ExtraAccountMeta>> {
    Ok(vec![
        // 5: asset config
        ExtraAccountMeta::new_with_seeds(
            &[
                Seed::Literal {
                    bytes: ASSET_SEED.to_vec(),
                },
                Seed::AccountKey { index: MINT_INDEX },
            ],
            false,
            false,
        )?,
        // 6
        ExtraAccountMeta::new_with_pubkey(&gsp_gatekeeper::ID, false, false)?,
        // 7: gate state, derivable before the gate exists
        ExtraAccountMeta::new_external_pda_with_seeds(
            GATEKEEPER_PROGRAM_INDEX,
            &[
                Seed::Literal {
                    bytes: GATE_SEED.to_vec(),
                },
                Seed::AccountKey { index: MINT_INDEX },
            ],
            false,
            false,
        )?,
        // 8: whitelist entry of the destination owner
        ExtraAccountMeta::new_external_pda_with_seeds(
            GATEKEEPER_PROGRAM_INDEX,
            &[
                Seed::Literal {
                    bytes: WHITELIST_SEED.to_vec(),
                },
                Seed::AccountKey { index: GATE_INDEX },
                Seed::AccountData {
                    account_index: DESTINATION_INDEX,
                    data_index: TOKEN_ACCOUNT_OWNER_OFFSET,
                    length: 32,
                },
            ],
            false,
            true,
        )?,
        // 9
        ExtraAccountMeta::new_with_pubkey(&gsp_oracle_module::ID, false, false)?,
        // 10: price feed for this mint
        ExtraAccountMeta::new_external_pda_with_seeds(
            ORACLE_PROGRAM_INDEX,
            &[
                Seed::Literal {
                    bytes: PRICE_FEED_SEED.to_vec(),
                },
                Seed::AccountKey { index: MINT_INDEX },
            ],
            false,
            false,
        )?,
    ])
}

/// True when `owner` is the asset itself, either its config PDA or its mint.
pub fn is_asset_owned(owner: &Pubkey, config: &Pubkey, mint: &Pubkey) -> bool {
    owner == config || owner == mint
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No gatekeeper bound, the transfer is final as is.
    Ungated,
    /// The bound gate must record the counterparty's contribution.
    Gated,
}

/// Decides how a transfer to `counterparty` proceeds. The asset-destination
/// guard applies whether or not a gate is bound.
pub fn route_transfer(
    config: &AssetConfig,
    config_key: &Pubkey,
    counterparty: &Pubkey,
    gate: &Pubkey,
) -> Result<Route> {
    require!(
        !is_asset_owned(counterparty, config_key, &config.asset_mint),
        GatedAssetError::TransferToAsset
    );
    let Some(gatekeeper) = config.gatekeeper else {
        return Ok(Route::Ungated);
    };
    require_keys_eq!(*gate, gatekeeper, GatedAssetError::GatekeeperMismatch);
    Ok(Route::Gated)
}

/// A gate may be bound only if it is the one derived for this mint and its
/// owner is the asset authority.
pub fn check_gate_binding(config: &AssetConfig, gate_key: &Pubkey, gate: &GateState) -> Result<()> {
    let (expected, _) = GateState::address(&config.asset_mint);
    require_keys_eq!(*gate_key, expected, GatedAssetError::GatekeeperMismatch);
    require_keys_eq!(
        gate.asset_mint,
        config.asset_mint,
        GatedAssetError::GatekeeperMismatch
    );
    require_keys_eq!(
        gate.authority,
        config.authority,
        GatedAssetError::ForeignGatekeeper
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_tlv_account_resolution::state::ExtraAccountMetaList;
    use spl_transfer_hook_interface::instruction::ExecuteInstruction;

    const EXTERNAL_PDA_FLAG: u8 = 1 << 7;

    #[test]
    fn test_extra_account_layout() {
        let metas = extra_account_metas().expect("should build metas");
        assert_eq!(metas.len(), 6);

        // config is a PDA of this program
        assert_eq!(metas[0].discriminator, 1);
        assert_eq!(metas[1].discriminator, 0);
        assert_eq!(metas[1].address_config, gsp_gatekeeper::ID.to_bytes());
        assert_eq!(metas[2].discriminator, EXTERNAL_PDA_FLAG + GATEKEEPER_PROGRAM_INDEX);
        assert_eq!(metas[3].discriminator, EXTERNAL_PDA_FLAG + GATEKEEPER_PROGRAM_INDEX);
        assert_eq!(metas[4].address_config, gsp_oracle_module::ID.to_bytes());
        assert_eq!(metas[5].discriminator, EXTERNAL_PDA_FLAG + ORACLE_PROGRAM_INDEX);
    }

    #[test]
    fn test_only_entry_is_writable() {
        let metas = extra_account_metas().expect("should build metas");
        for (i, meta) in metas.iter().enumerate() {
            assert!(!bool::from(meta.is_signer));
            assert_eq!(bool::from(meta.is_writable), i == 3, "meta {i}");
        }
    }

    #[test]
    fn test_metas_fit_validation_account() {
        let metas = extra_account_metas().expect("should build metas");
        let size = ExtraAccountMetaList::size_of(metas.len()).expect("should size");
        let mut data = vec![0u8; size];
        ExtraAccountMetaList::init::<ExecuteInstruction>(&mut data, &metas).expect("should init");
    }

    fn error_code(err: anchor_lang::error::Error) -> Option<u32> {
        match err {
            anchor_lang::error::Error::AnchorError(e) => Some(e.error_code_number),
            anchor_lang::error::Error::ProgramError(_) => None,
        }
    }

    fn asset(gatekeeper: bool) -> (Pubkey, AssetConfig) {
        let asset_mint = Pubkey::new_unique();
        let config = AssetConfig {
            authority: Pubkey::new_unique(),
            asset_mint,
            gatekeeper: gatekeeper.then(|| GateState::address(&asset_mint).0),
            ..AssetConfig::default()
        };
        (Pubkey::new_unique(), config)
    }

    #[test]
    fn test_ungated_transfer_passes() {
        let (key, config) = asset(false);
        let route = route_transfer(&config, &key, &Pubkey::new_unique(), &Pubkey::new_unique());
        assert_eq!(route.expect("should route"), Route::Ungated);
    }

    #[test]
    fn test_bound_gate_is_consulted() {
        let (key, config) = asset(true);
        let gate = GateState::address(&config.asset_mint).0;
        let route = route_transfer(&config, &key, &Pubkey::new_unique(), &gate);
        assert_eq!(route.expect("should route"), Route::Gated);
    }

    #[test]
    fn test_wrong_gate_account_rejected() {
        let (key, config) = asset(true);
        let err = route_transfer(&config, &key, &Pubkey::new_unique(), &Pubkey::new_unique())
            .unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatedAssetError::GatekeeperMismatch)));
    }

    #[test]
    fn test_transfer_to_asset_rejected_before_gate_lookup() {
        for gated in [false, true] {
            let (key, config) = asset(gated);
            // a wrong gate account must not mask the destination check
            let stray_gate = Pubkey::new_unique();
            for destination in [key, config.asset_mint] {
                let err = route_transfer(&config, &key, &destination, &stray_gate).unwrap_err();
                assert_eq!(error_code(err), Some(u32::from(GatedAssetError::TransferToAsset)));
            }
        }
    }

    #[test]
    fn test_gate_binding_requires_asset_authority() {
        let (_, config) = asset(false);
        let gate_key = GateState::address(&config.asset_mint).0;
        let mut gate = GateState {
            authority: config.authority,
            asset_mint: config.asset_mint,
            ..GateState::default()
        };
        assert!(check_gate_binding(&config, &gate_key, &gate).is_ok());

        // created first by someone else
        gate.authority = Pubkey::new_unique();
        let err = check_gate_binding(&config, &gate_key, &gate).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatedAssetError::ForeignGatekeeper)));
    }

    #[test]
    fn test_gate_binding_requires_derived_address() {
        let (_, config) = asset(false);
        let gate = GateState {
            authority: config.authority,
            asset_mint: config.asset_mint,
            ..GateState::default()
        };
        let err = check_gate_binding(&config, &Pubkey::new_unique(), &gate).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatedAssetError::GatekeeperMismatch)));
    }

    #[test]
    fn test_is_asset_owned() {
        let config = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert!(is_asset_owned(&config, &config, &mint));
        assert!(is_asset_owned(&mint, &config, &mint));
        assert!(!is_asset_owned(&Pubkey::new_unique(), &config, &mint));
    }
}
