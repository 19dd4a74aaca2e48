use crate::error::CliError;
use crate::pda;
use crate::session::Session;
use crate::status::FeedStatus;
use crate::units::{format_amount, parse_price_x64};
use gsp_oracle_module::{pricing, PriceFeed};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

fn feed_admin(session: &Session, price_feed: Pubkey) -> gsp_oracle_module::accounts::FeedAdmin {
    gsp_oracle_module::accounts::FeedAdmin {
        authority: session.payer(),
        price_feed,
    }
}

pub fn init(
    session: &Session,
    pool: Pubkey,
    quote_mint: Pubkey,
    base_is_token0: Option<bool>,
    max_staleness: i64,
) -> Result<(), CliError> {
    let base_mint = session.mint()?;
    // pools order their tokens by address
    let base_is_token0 = base_is_token0.unwrap_or(base_mint < quote_mint);
    let price_feed = pda::price_feed(&base_mint);

    let signature = session
        .oracle()?
        .request()
        .accounts(gsp_oracle_module::accounts::InitializePriceFeed {
            authority: session.payer(),
            price_feed,
            pool,
            base_mint,
            quote_mint,
            system_program: anchor_lang::system_program::ID,
        })
        .args(gsp_oracle_module::instruction::InitializePriceFeed {
            base_is_token0,
            max_staleness,
        })
        .send()?;
    tracing::info!(%price_feed, %pool, base_is_token0, "price feed created");
    session.report("price feed initialized", signature);
    Ok(())
}

pub fn update(session: &Session, price: &str) -> Result<(), CliError> {
    let price_x64 = parse_price_x64(price)?;
    let price_feed = pda::price_feed(&session.mint()?);
    let signature = session
        .oracle()?
        .request()
        .accounts(feed_admin(session, price_feed))
        .args(gsp_oracle_module::instruction::UpdatePrice { price_x64 })
        .send()?;
    tracing::debug!(price_x64, "price published");
    session.report("price updated", signature);
    Ok(())
}

pub fn set_active(session: &Session, active: bool) -> Result<(), CliError> {
    let price_feed = pda::price_feed(&session.mint()?);
    let signature = session
        .oracle()?
        .request()
        .accounts(feed_admin(session, price_feed))
        .args(gsp_oracle_module::instruction::SetActive { active })
        .send()?;
    session.report(if active { "feed activated" } else { "feed deactivated" }, signature);
    Ok(())
}

pub fn set_max_staleness(session: &Session, max_staleness: i64) -> Result<(), CliError> {
    let price_feed = pda::price_feed(&session.mint()?);
    let signature = session
        .oracle()?
        .request()
        .accounts(feed_admin(session, price_feed))
        .args(gsp_oracle_module::instruction::SetMaxStaleness { max_staleness })
        .send()?;
    session.report("max staleness updated", signature);
    Ok(())
}

pub fn set_pool(session: &Session, pool: Pubkey) -> Result<(), CliError> {
    let price_feed = pda::price_feed(&session.mint()?);
    let signature = session
        .oracle()?
        .request()
        .accounts(feed_admin(session, price_feed))
        .args(gsp_oracle_module::instruction::SetPool { pool })
        .send()?;
    tracing::info!(%price_feed, %pool, "feed rebound, publish a fresh price");
    session.report("feed pool updated", signature);
    Ok(())
}

/// The gate only quotes from a feed run by its own owner, so this follows
/// a gate ownership transfer.
pub fn transfer_authority(session: &Session, new_authority: Pubkey) -> Result<(), CliError> {
    let price_feed = pda::price_feed(&session.mint()?);
    let signature = session
        .oracle()?
        .request()
        .accounts(feed_admin(session, price_feed))
        .args(gsp_oracle_module::instruction::TransferAuthority { new_authority })
        .send()?;
    session.report("feed authority transferred", signature);
    Ok(())
}

pub fn show(session: &Session) -> Result<(), CliError> {
    let address = pda::price_feed(&session.mint()?);
    let feed: PriceFeed = session.fetch_required(&address)?;
    session.show(&FeedStatus::new(&address, &feed), |status| {
        format!(
            "Price feed:     {}\nPool:           {}\nBase mint:      {}\nQuote mint:     {}\nBase is token0: {}\nPrice:          {}\nLast update:    {}\nMax staleness:  {}s\nActive:         {}",
            status.price_feed,
            status.pool,
            status.base_mint,
            status.quote_mint,
            status.base_is_token0,
            status.price,
            status.last_update.as_deref().unwrap_or("never"),
            status.max_staleness_secs,
            status.active,
        )
    })
}

#[derive(Debug, Serialize)]
struct QuoteView {
    amount_in: u64,
    amount_out: u64,
    reference_units: String,
}

/// Quotes off-chain with the same arithmetic the gate relies on.
pub fn quote(session: &Session, amount_in: u64) -> Result<(), CliError> {
    let feed: PriceFeed = session.fetch_required(&pda::price_feed(&session.mint()?))?;
    let now = chrono::Utc::now().timestamp();
    let amount_out = pricing::quote_feed(&feed, amount_in, now)
        .map_err(|e| CliError::InvalidArg(format!("quote failed: {e}")))?;

    let view = QuoteView {
        amount_in,
        amount_out,
        reference_units: format_amount(amount_out, crate::status::REFERENCE_DECIMALS),
    };
    session.show(&view, |v| format!("{} atoms -> {} reference units", v.amount_in, v.reference_units))
}
