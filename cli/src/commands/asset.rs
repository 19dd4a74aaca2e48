use crate::error::CliError;
use crate::pda;
use crate::session::Session;
use crate::status::AssetStatus;
use crate::units::parse_amount;
use anchor_lang::{InstructionData, ToAccountMetas};
use anchor_spl::associated_token::spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use gsp_token::state::AssetConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_instruction;
use spl_token_2022::extension::{ExtensionType, StateWithExtensions};
use spl_token_2022::state::Mint;

fn program_err(e: impl std::fmt::Display) -> CliError {
    CliError::InvalidArg(e.to_string())
}

fn admin(session: &Session, mint: &Pubkey) -> gsp_token::accounts::Admin {
    gsp_token::accounts::Admin {
        authority: session.payer(),
        config: pda::asset_config(mint),
    }
}

/// Instructions creating a Token-2022 mint whose transfer hook is this
/// protocol and whose mint authority is the asset config PDA.
pub fn mint_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    rent: u64,
) -> Result<Vec<Instruction>, CliError> {
    let space = ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::TransferHook])
        .map_err(program_err)?;
    let config = pda::asset_config(mint);

    Ok(vec![
        system_instruction::create_account(payer, mint, rent, space as u64, &spl_token_2022::ID),
        spl_token_2022::extension::transfer_hook::instruction::initialize(
            &spl_token_2022::ID,
            mint,
            Some(*payer),
            Some(gsp_token::ID),
        )
        .map_err(program_err)?,
        spl_token_2022::instruction::initialize_mint2(
            &spl_token_2022::ID,
            mint,
            &config,
            None,
            decimals,
        )
        .map_err(program_err)?,
    ])
}

/// Reference mint and staleness of a price feed created with the mint.
pub struct FeedParams {
    pub quote_mint: Pubkey,
    pub max_staleness: i64,
}

/// Creates the gate, and optionally the price feed, of a mint that does not
/// exist yet. Sent in the mint's own transaction, no one else can derive
/// and claim these addresses first. The feed starts without a pool.
pub fn claim_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    max_address_cap: u64,
    feed: Option<&FeedParams>,
) -> Vec<Instruction> {
    let mut ixs = vec![Instruction {
        program_id: gsp_gatekeeper::ID,
        accounts: gsp_gatekeeper::accounts::Initialize {
            authority: *payer,
            state: pda::gate(mint),
            asset_mint: *mint,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None),
        data: gsp_gatekeeper::instruction::Initialize { max_address_cap }.data(),
    }];

    if let Some(feed) = feed {
        ixs.push(Instruction {
            program_id: gsp_oracle_module::ID,
            accounts: gsp_oracle_module::accounts::InitializePriceFeed {
                authority: *payer,
                price_feed: pda::price_feed(mint),
                pool: Pubkey::default(),
                base_mint: *mint,
                quote_mint: feed.quote_mint,
                system_program: anchor_lang::system_program::ID,
            }
            .to_account_metas(None),
            data: gsp_oracle_module::instruction::InitializePriceFeed {
                base_is_token0: *mint < feed.quote_mint,
                max_staleness: feed.max_staleness,
            }
            .data(),
        });
    }
    ixs
}

pub fn create_mint(
    session: &Session,
    decimals: u8,
    max_address_cap: u64,
    feed: Option<FeedParams>,
) -> Result<(), CliError> {
    let mint = Keypair::new();
    let space = ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::TransferHook])
        .map_err(program_err)?;
    let rent = session.rpc().get_minimum_balance_for_rent_exemption(space)?;
    let payer = session.payer();
    let mut ixs = mint_instructions(&payer, &mint.pubkey(), decimals, rent)?;
    ixs.extend(claim_instructions(&payer, &mint.pubkey(), max_address_cap, feed.as_ref()));

    let signature = session.send_with_signers(&ixs, &[&mint])?;
    tracing::info!(
        mint = %mint.pubkey(),
        decimals,
        with_feed = feed.is_some(),
        "mint created with its gate"
    );
    session.report(&format!("mint {} created", mint.pubkey()), signature);
    Ok(())
}

pub fn init(session: &Session, name: String, symbol: String, decimals: u8) -> Result<(), CliError> {
    let mint = session.mint()?;
    let signature = session
        .token()?
        .request()
        .accounts(gsp_token::accounts::Initialize {
            authority: session.payer(),
            config: pda::asset_config(&mint),
            asset_mint: mint,
            token_program: spl_token_2022::ID,
            system_program: anchor_lang::system_program::ID,
        })
        .args(gsp_token::instruction::Initialize {
            name,
            symbol,
            decimals,
        })
        .send()?;
    session.report("asset initialized", signature);
    Ok(())
}

pub fn init_hook(session: &Session) -> Result<(), CliError> {
    let mint = session.mint()?;
    let signature = session
        .token()?
        .request()
        .accounts(gsp_token::accounts::InitializeExtraAccountMetaList {
            authority: session.payer(),
            config: pda::asset_config(&mint),
            extra_account_meta_list: pda::extra_account_metas(&mint),
            asset_mint: mint,
            system_program: anchor_lang::system_program::ID,
        })
        .args(gsp_token::instruction::InitializeExtraAccountMetaList {})
        .send()?;
    session.report("transfer hook accounts written", signature);
    Ok(())
}

/// Mints to `account`, or to the associated account of `owner` which is
/// created when missing.
pub fn mint_to(
    session: &Session,
    owner: Option<Pubkey>,
    account: Option<Pubkey>,
    amount: &str,
) -> Result<(), CliError> {
    let mint = session.mint()?;
    let config: AssetConfig = session.fetch_required(&pda::asset_config(&mint))?;
    let amount = parse_amount(amount, config.decimals)?;

    let recipient = match (account, owner) {
        (Some(account), _) => account,
        (None, Some(owner)) => pda::token_account(&owner, &mint),
        (None, None) => return Err(CliError::InvalidArg("pass --to or --account".to_string())),
    };
    let program = session.token()?;
    let mut builder = program.request();
    if let (None, Some(owner)) = (account, owner) {
        builder = builder.instruction(create_associated_token_account_idempotent(
            &session.payer(),
            &owner,
            &mint,
            &spl_token_2022::ID,
        ));
    }
    let signature = builder
        .accounts(gsp_token::accounts::Mint {
            authority: session.payer(),
            config: pda::asset_config(&mint),
            asset_mint: mint,
            recipient,
            token_program: spl_token_2022::ID,
        })
        .args(gsp_token::instruction::Mint { amount })
        .send()?;
    session.report(&format!("minted {amount} atoms to {recipient}"), signature);
    Ok(())
}

pub fn burn(session: &Session, amount: &str) -> Result<(), CliError> {
    let mint = session.mint()?;
    let config: AssetConfig = session.fetch_required(&pda::asset_config(&mint))?;
    let amount = parse_amount(amount, config.decimals)?;

    let signature = session
        .token()?
        .request()
        .accounts(gsp_token::accounts::Burn {
            authority: session.payer(),
            config: pda::asset_config(&mint),
            asset_mint: mint,
            from: pda::token_account(&session.payer(), &mint),
            token_program: spl_token_2022::ID,
        })
        .args(gsp_token::instruction::Burn { amount })
        .send()?;
    session.report(&format!("burned {amount} atoms"), signature);
    Ok(())
}

pub fn set_gatekeeper(session: &Session, unbind: bool) -> Result<(), CliError> {
    let mint = session.mint()?;
    let gatekeeper = (!unbind).then(|| pda::gate(&mint));
    let signature = session
        .token()?
        .request()
        .accounts(gsp_token::accounts::SetGatekeeper {
            authority: session.payer(),
            config: pda::asset_config(&mint),
            gate: gatekeeper,
        })
        .args(gsp_token::instruction::SetGatekeeper { gatekeeper })
        .send()?;
    session.report(if unbind { "gatekeeper unbound" } else { "gatekeeper bound" }, signature);
    Ok(())
}

pub fn set_metadata(session: &Session, name: String, symbol: String) -> Result<(), CliError> {
    let mint = session.mint()?;
    let signature = session
        .token()?
        .request()
        .accounts(admin(session, &mint))
        .args(gsp_token::instruction::SetNameAndSymbol { name, symbol })
        .send()?;
    session.report("metadata updated", signature);
    Ok(())
}

pub fn transfer_authority(session: &Session, new_authority: Pubkey) -> Result<(), CliError> {
    let mint = session.mint()?;
    let signature = session
        .token()?
        .request()
        .accounts(admin(session, &mint))
        .args(gsp_token::instruction::TransferAuthority { new_authority })
        .send()?;
    session.report("authority transferred", signature);
    Ok(())
}

pub fn show(session: &Session) -> Result<(), CliError> {
    let mint = session.mint()?;
    let address = pda::asset_config(&mint);
    let config: AssetConfig = session.fetch_required(&address)?;
    // read from the mint, holders can burn without going through the asset
    let mint_data = session.rpc().get_account_data(&mint)?;
    let supply = StateWithExtensions::<Mint>::unpack(&mint_data)
        .map_err(|e| CliError::InvalidAccountData(e.to_string()))?
        .base
        .supply;
    session.show(&AssetStatus::new(&address, &config, supply), |status| {
        format!(
            "Asset config:  {}\nAuthority:     {}\nMint:          {}\nGatekeeper:    {}\nName:          {}\nSymbol:        {}\nDecimals:      {}\nTotal supply:  {}",
            status.config,
            status.authority,
            status.asset_mint,
            status.gatekeeper.as_deref().unwrap_or("none"),
            status.name,
            status.symbol,
            status.decimals,
            status.total_supply,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mint_instructions_hand_authority_to_config() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ixs = mint_instructions(&payer, &mint, 6, 1_000_000).expect("should build");

        assert_eq!(ixs.len(), 3);
        assert_eq!(ixs[0].program_id, solana_sdk::system_program::ID);
        assert_eq!(ixs[1].program_id, spl_token_2022::ID);
        assert_eq!(ixs[2].program_id, spl_token_2022::ID);
        // mint authority is the config PDA, not the payer
        assert!(ixs[2].data.windows(32).any(|w| w == pda::asset_config(&mint).as_ref()));
        assert!(!ixs[2].data.windows(32).any(|w| w == payer.as_ref()));
    }

    #[test]
    fn test_claim_instructions_create_gate_and_feed() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let feed = FeedParams {
            quote_mint: Pubkey::new_unique(),
            max_staleness: 300,
        };
        let ixs = claim_instructions(&payer, &mint, 1_000, Some(&feed));

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, gsp_gatekeeper::ID);
        assert_eq!(ixs[0].accounts[1].pubkey, pda::gate(&mint));
        assert_eq!(ixs[1].program_id, gsp_oracle_module::ID);
        assert_eq!(ixs[1].accounts[1].pubkey, pda::price_feed(&mint));
        for ix in &ixs {
            assert_eq!(ix.accounts[0].pubkey, payer);
            assert!(ix.accounts[0].is_signer);
        }

        assert_eq!(claim_instructions(&payer, &mint, 1_000, None).len(), 1);
    }
}
