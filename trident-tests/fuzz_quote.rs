//! Fuzz tests for price conversion
//!
//! The conversion must never panic and must agree with a direct u128
//! computation whenever the result fits in a u64.

use anchor_lang::prelude::*;
use gsp_oracle_module::pricing::{convert, quote_feed, Q64};
use gsp_oracle_module::{OracleError, PriceFeed};
use trident::prelude::*;

#[derive(Debug, Arbitrary)]
pub struct ConvertInput {
    pub amount_in: u64,
    pub price_x64: u128,
    pub base_is_token0: bool,
}

#[fuzz]
pub fn fuzz_convert(input: ConvertInput) -> Result<()> {
    let out = convert(input.amount_in, input.price_x64, input.base_is_token0);

    if input.price_x64 == 0 {
        assert_eq!(out, None);
        return Ok(());
    }

    if input.base_is_token0 {
        // floor(amount * price / 2^64), split to stay inside u128
        let amount = input.amount_in as u128;
        let whole = (input.price_x64 >> 64).checked_mul(amount);
        let frac = ((input.price_x64 & (Q64 - 1)) * amount) >> 64;
        let expected = whole
            .and_then(|w| w.checked_add(frac))
            .and_then(|v| u64::try_from(v).ok());
        assert_eq!(out, expected);
    } else {
        let expected = u64::try_from(((input.amount_in as u128) << 64) / input.price_x64).ok();
        assert_eq!(out, expected);
    }
    Ok(())
}

#[fuzz]
pub fn fuzz_staleness(last_update: i64, age: u16, max_staleness: u16, amount_in: u32) -> Result<()> {
    if max_staleness == 0 || last_update > i64::MAX - age as i64 {
        return Ok(());
    }
    let feed = PriceFeed {
        price_x64: Q64,
        base_is_token0: true,
        last_update,
        max_staleness: max_staleness as i64,
        is_active: true,
        ..PriceFeed::default()
    };

    let result = quote_feed(&feed, amount_in as u64, last_update + age as i64);
    if age <= max_staleness {
        assert_eq!(result.ok(), Some(amount_in as u64));
    } else {
        let code = result.err().as_ref().and_then(parse_anchor_error);
        assert_eq!(code, Some(u32::from(OracleError::StalePrice)));
    }
    Ok(())
}

fn parse_anchor_error(error: &Error) -> Option<u32> {
    match error {
        Error::AnchorError(e) => Some(e.error_code_number),
        Error::ProgramError(_) => None,
    }
}
