use crate::{OracleError, PriceFeed};
use anchor_lang::prelude::*;

/// 1.0 in Q64.64.
pub const Q64: u128 = 1 << 64;

/// Pools order their tokens by address, so the declared orientation must
/// agree with the mint ordering.
pub fn validate_orientation(
    base_mint: &Pubkey,
    quote_mint: &Pubkey,
    base_is_token0: bool,
) -> Result<()> {
    require_keys_neq!(*base_mint, *quote_mint, OracleError::OrientationMismatch);
    require!(
        (base_mint < quote_mint) == base_is_token0,
        OracleError::OrientationMismatch
    );
    Ok(())
}

/// Converts base atoms to quote atoms given the pool-native price
/// (token1 per token0, Q64.64). `None` on a zero price or if the result
/// does not fit in a u64.
pub fn convert(amount_in: u64, price_x64: u128, base_is_token0: bool) -> Option<u64> {
    if price_x64 == 0 {
        return None;
    }
    let amount = amount_in as u128;
    let out = if base_is_token0 {
        let whole = price_x64 >> 64;
        let frac = price_x64 & (Q64 - 1);
        amount.checked_mul(whole)?.checked_add((amount * frac) >> 64)?
    } else {
        (amount << 64) / price_x64
    };
    u64::try_from(out).ok()
}

pub fn ensure_fresh(last_update: i64, now: i64, max_staleness: i64) -> Result<()> {
    let age = now
        .checked_sub(last_update)
        .ok_or(OracleError::MathOverflow)?;
    require!(age <= max_staleness, OracleError::StalePrice);
    Ok(())
}

pub fn quote_feed(feed: &PriceFeed, amount_in: u64, now: i64) -> Result<u64> {
    require!(feed.is_active, OracleError::FeedInactive);
    require!(feed.price_x64 > 0, OracleError::NoObservation);
    ensure_fresh(feed.last_update, now, feed.max_staleness)?;
    convert(amount_in, feed.price_x64, feed.base_is_token0)
        .ok_or(OracleError::MathOverflow.into())
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

    fn live_feed(price_x64: u128, base_is_token0: bool) -> PriceFeed {
        PriceFeed {
            base_is_token0,
            price_x64,
            last_update: 1_000,
            max_staleness: 60,
            is_active: true,
            ..PriceFeed::default()
        }
    }

    #[test]
    fn test_convert_identity_price() {
        assert_eq!(convert(12_345, Q64, true), Some(12_345));
        assert_eq!(convert(12_345, Q64, false), Some(12_345));
    }

    #[test]
    fn test_convert_fractional_price() {
        // 0.25 reference atoms per asset atom
        let quarter = Q64 / 4;
        assert_eq!(convert(1_000, quarter, true), Some(250));
        // base is token1: price is base per reference, so invert
        assert_eq!(convert(1_000, quarter, false), Some(4_000));
    }

    #[test]
    fn test_convert_whole_and_fraction() {
        // 2.5 reference atoms per asset atom
        let price = 2 * Q64 + Q64 / 2;
        assert_eq!(convert(10, price, true), Some(25));
    }

    #[test]
    fn test_convert_rejects_zero_price_and_overflow() {
        assert_eq!(convert(1, 0, true), None);
        assert_eq!(convert(u64::MAX, 2 * Q64, true), None);
        assert_eq!(convert(u64::MAX, Q64 / 2, false), None);
    }

    #[test]
    fn test_validate_orientation() {
        let low = Pubkey::new_from_array([1u8; 32]);
        let high = Pubkey::new_from_array([2u8; 32]);
        assert!(validate_orientation(&low, &high, true).is_ok());
        assert!(validate_orientation(&high, &low, false).is_ok());

        let err = validate_orientation(&low, &high, false).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(OracleError::OrientationMismatch)));
        assert!(validate_orientation(&low, &low, true).is_err());
    }

    #[test]
    fn test_quote_feed_live() {
        let feed = live_feed(Q64 / 4, true);
        assert_eq!(quote_feed(&feed, 1_000_000, 1_030).expect("should quote"), 250_000);
    }

    #[test]
    fn test_quote_feed_stale() {
        let feed = live_feed(Q64, true);
        assert!(quote_feed(&feed, 1, 1_060).is_ok());
        let err = quote_feed(&feed, 1, 1_061).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(OracleError::StalePrice)));
    }

    #[test]
    fn test_quote_feed_without_observation() {
        let feed = live_feed(0, true);
        let err = quote_feed(&feed, 1, 1_000).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(OracleError::NoObservation)));
    }

    #[test]
    fn test_quote_feed_inactive() {
        let mut feed = live_feed(Q64, true);
        feed.is_active = false;
        let err = quote_feed(&feed, 1, 1_000).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(OracleError::FeedInactive)));
    }
}
