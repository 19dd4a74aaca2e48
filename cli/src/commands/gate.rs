use crate::error::CliError;
use crate::pda;
use crate::session::Session;
use crate::status::{EntryStatus, GateStatus};
use anchor_lang::{InstructionData, ToAccountMetas};
use gsp_gatekeeper::constants::MAX_BATCH_WHITELIST;
use gsp_gatekeeper::state::{GateState, WhitelistEntry};
use gsp_oracle_module::PriceFeed;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

fn admin_accounts(session: &Session, gate: Pubkey) -> gsp_gatekeeper::accounts::GateAdmin {
    gsp_gatekeeper::accounts::GateAdmin {
        authority: session.payer(),
        state: gate,
    }
}

fn admin_instruction(session: &Session, gate: Pubkey, args: impl InstructionData) -> Instruction {
    Instruction {
        program_id: gsp_gatekeeper::ID,
        accounts: admin_accounts(session, gate).to_account_metas(None),
        data: args.data(),
    }
}

fn send_admin(
    session: &Session,
    action: &str,
    args: impl InstructionData,
) -> Result<(), CliError> {
    let gate = pda::gate(&session.mint()?);
    let signature = session
        .gatekeeper()?
        .request()
        .accounts(admin_accounts(session, gate))
        .args(args)
        .send()?;
    session.report(action, signature);
    Ok(())
}

pub fn init(session: &Session, max_address_cap: u64) -> Result<(), CliError> {
    let mint = session.mint()?;
    let gate = pda::gate(&mint);
    let signature = session
        .gatekeeper()?
        .request()
        .accounts(gsp_gatekeeper::accounts::Initialize {
            authority: session.payer(),
            state: gate,
            asset_mint: mint,
            system_program: anchor_lang::system_program::ID,
        })
        .args(gsp_gatekeeper::instruction::Initialize { max_address_cap })
        .send()?;
    tracing::info!(%gate, %mint, max_address_cap, "gate created, locked until opened");
    session.report("gate initialized", signature);
    Ok(())
}

pub fn set_locked(session: &Session, locked: bool) -> Result<(), CliError> {
    let action = if locked { "gate locked" } else { "gate unlocked" };
    send_admin(session, action, gsp_gatekeeper::instruction::SetLocked { locked })
}

pub fn set_cap(session: &Session, max_address_cap: u64) -> Result<(), CliError> {
    send_admin(
        session,
        "max address cap updated",
        gsp_gatekeeper::instruction::SetMaxAddressCap { max_address_cap },
    )
}

pub fn set_oracle(session: &Session, oracle: Option<Pubkey>) -> Result<(), CliError> {
    let oracle = match oracle {
        Some(oracle) => oracle,
        None => pda::price_feed(&session.mint()?),
    };
    send_admin(session, "oracle bound", gsp_gatekeeper::instruction::SetOracle { oracle })
}

pub fn set_pool(session: &Session, pool: Pubkey) -> Result<(), CliError> {
    send_admin(session, "pool bound", gsp_gatekeeper::instruction::SetPool { pool })
}

pub fn set_gated_asset(session: &Session, gated_asset: Option<Pubkey>) -> Result<(), CliError> {
    let gated_asset = match gated_asset {
        Some(asset) => asset,
        None => pda::asset_config(&session.mint()?),
    };
    send_admin(
        session,
        "gated asset bound",
        gsp_gatekeeper::instruction::SetGatedAsset { gated_asset },
    )
}

/// Binds the gated asset, oracle and pool in one transaction, all derived
/// from the mint and its price feed.
pub fn bind(session: &Session) -> Result<(), CliError> {
    let mint = session.mint()?;
    let gate = pda::gate(&mint);
    let price_feed = pda::price_feed(&mint);
    let feed: PriceFeed = session.fetch_required(&price_feed)?;

    let signature = session
        .gatekeeper()?
        .request()
        .instruction(admin_instruction(
            session,
            gate,
            gsp_gatekeeper::instruction::SetGatedAsset {
                gated_asset: pda::asset_config(&mint),
            },
        ))
        .instruction(admin_instruction(
            session,
            gate,
            gsp_gatekeeper::instruction::SetOracle { oracle: price_feed },
        ))
        .accounts(admin_accounts(session, gate))
        .args(gsp_gatekeeper::instruction::SetPool { pool: feed.pool })
        .send()?;
    session.report("gate bound to asset, oracle and pool", signature);
    Ok(())
}

pub fn set_self_whitelist_disabled(session: &Session, disabled: bool) -> Result<(), CliError> {
    send_admin(
        session,
        if disabled { "self whitelist disabled" } else { "self whitelist enabled" },
        gsp_gatekeeper::instruction::SetSelfWhitelistDisabled { disabled },
    )
}

pub fn set_tier(session: &Session, allowed_whitelist_index: Option<u64>) -> Result<(), CliError> {
    send_admin(
        session,
        "allowed whitelist index updated",
        gsp_gatekeeper::instruction::SetAllowedWhitelistIndex {
            allowed_whitelist_index,
        },
    )
}

pub fn transfer_ownership(session: &Session, new_authority: Pubkey) -> Result<(), CliError> {
    send_admin(
        session,
        "ownership transferred",
        gsp_gatekeeper::instruction::TransferOwnership { new_authority },
    )
}

pub fn add(session: &Session, address: Pubkey) -> Result<(), CliError> {
    let gate = pda::gate(&session.mint()?);
    let signature = session
        .gatekeeper()?
        .request()
        .accounts(gsp_gatekeeper::accounts::AddWhitelisted {
            authority: session.payer(),
            state: gate,
            entry: pda::whitelist_entry(&gate, &address),
            system_program: anchor_lang::system_program::ID,
        })
        .args(gsp_gatekeeper::instruction::AddWhitelisted { address })
        .send()?;
    session.report("address whitelisted", signature);
    Ok(())
}

/// Splits `addresses` into batches the program accepts.
pub fn batches(addresses: &[Pubkey]) -> Vec<&[Pubkey]> {
    addresses.chunks(MAX_BATCH_WHITELIST).collect()
}

pub fn batch_instruction(authority: Pubkey, gate: Pubkey, addresses: &[Pubkey]) -> Instruction {
    let mut accounts = gsp_gatekeeper::accounts::AddBatchWhitelisted {
        authority,
        state: gate,
        system_program: anchor_lang::system_program::ID,
    }
    .to_account_metas(None);
    accounts.extend(
        addresses
            .iter()
            .map(|address| AccountMeta::new(pda::whitelist_entry(&gate, address), false)),
    );

    Instruction {
        program_id: gsp_gatekeeper::ID,
        accounts,
        data: gsp_gatekeeper::instruction::AddBatchWhitelisted {
            addresses: addresses.to_vec(),
        }
        .data(),
    }
}

pub fn add_batch(session: &Session, addresses: &[Pubkey]) -> Result<(), CliError> {
    if addresses.is_empty() {
        return Err(CliError::InvalidArg("no addresses given".to_string()));
    }
    let gate = pda::gate(&session.mint()?);
    for (i, batch) in batches(addresses).into_iter().enumerate() {
        let ix = batch_instruction(session.payer(), gate, batch);
        let signature = session.send_with_signers(&[ix], &[])?;
        tracing::debug!(batch = i, size = batch.len(), "batch sent");
        session.report(&format!("batch {} whitelisted ({} addresses)", i + 1, batch.len()), signature);
    }
    Ok(())
}

/// Self whitelisting by paying lamports into the gate.
pub fn pay(session: &Session, lamports: u64) -> Result<(), CliError> {
    let gate = pda::gate(&session.mint()?);
    let sender = session.payer();
    let signature = session
        .gatekeeper()?
        .request()
        .accounts(gsp_gatekeeper::accounts::ReceivePayment {
            sender,
            state: gate,
            entry: pda::whitelist_entry(&gate, &sender),
            system_program: anchor_lang::system_program::ID,
        })
        .args(gsp_gatekeeper::instruction::ReceivePayment { amount: lamports })
        .send()?;
    session.report("payment received", signature);
    Ok(())
}

pub fn status(session: &Session) -> Result<(), CliError> {
    let gate = pda::gate(&session.mint()?);
    let state: GateState = session.fetch_required(&gate)?;
    session.show(&GateStatus::new(&gate, &state), GateStatus::render)
}

pub fn check(session: &Session, address: Pubkey) -> Result<(), CliError> {
    let gate = pda::gate(&session.mint()?);
    let state: GateState = session.fetch_required(&gate)?;
    let entry: Option<WhitelistEntry> = session.fetch(&pda::whitelist_entry(&gate, &address))?;
    session.show(&EntryStatus::new(&address, entry.as_ref(), &state), EntryStatus::render)
}
