use crate::error::CliError;

/// Parses a decimal UI amount such as `1.25` into atoms.
pub fn parse_amount(value: &str, decimals: u8) -> Result<u64, CliError> {
    let invalid = || CliError::InvalidArg(format!("invalid amount: {value}"));
    let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > decimals as usize {
        return Err(CliError::InvalidArg(format!(
            "{value} has more than {decimals} decimal places"
        )));
    }

    let scale = 10u64.checked_pow(decimals as u32).ok_or_else(invalid)?;
    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac_atoms: u64 = if frac.is_empty() {
        0
    } else {
        let digits: u64 = frac.parse().map_err(|_| invalid())?;
        digits * 10u64.pow((decimals as usize - frac.len()) as u32)
    };

    whole
        .checked_mul(scale)
        .and_then(|atoms| atoms.checked_add(frac_atoms))
        .ok_or_else(invalid)
}

pub fn format_amount(atoms: u64, decimals: u8) -> String {
    if decimals == 0 {
        return atoms.to_string();
    }
    let scale = 10u64.pow(decimals as u32);
    let frac = format!("{:0width$}", atoms % scale, width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        (atoms / scale).to_string()
    } else {
        format!("{}.{}", atoms / scale, frac)
    }
}

/// Parses a decimal price (token1 atoms per token0 atom) into Q64.64.
pub fn parse_price_x64(value: &str) -> Result<u128, CliError> {
    let invalid = || CliError::InvalidArg(format!("invalid price: {value}"));
    let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
    if frac.len() > 19 {
        return Err(CliError::InvalidArg(format!("{value} has too many decimal places")));
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac_x64 = if frac.is_empty() {
        0
    } else {
        let digits: u128 = frac.parse().map_err(|_| invalid())?;
        (digits << 64) / 10u128.pow(frac.len() as u32)
    };

    let price = u64::try_from(whole)
        .map(|w| ((w as u128) << 64) | frac_x64)
        .map_err(|_| invalid())?;
    if price == 0 {
        return Err(CliError::InvalidArg("price must be greater than zero".to_string()));
    }
    Ok(price)
}

pub fn format_price_x64(price_x64: u128) -> String {
    let whole = price_x64 >> 64;
    let frac = price_x64 & (u64::MAX as u128);
    // nine places is plenty for display
    let frac_digits = (frac * 1_000_000_000) >> 64;
    format!("{whole}.{frac_digits:09}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsp_oracle_module::pricing::Q64;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1", 6).unwrap(), 1_000_000);
        assert_eq!(parse_amount("1.25", 6).unwrap(), 1_250_000);
        assert_eq!(parse_amount(".5", 6).unwrap(), 500_000);
        assert_eq!(parse_amount("10000", 6).unwrap(), 10_000_000_000);
        assert_eq!(parse_amount("42", 0).unwrap(), 42);
    }

    #[test]
    fn test_parse_amount_rejects() {
        assert!(parse_amount("", 6).is_err());
        assert!(parse_amount("1.0000001", 6).is_err());
        assert!(parse_amount("abc", 6).is_err());
        assert!(parse_amount("-1", 6).is_err());
        assert!(parse_amount("18446744073709551615", 6).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_250_000, 6), "1.25");
        assert_eq!(format_amount(10_000_000_000, 6), "10000");
        assert_eq!(format_amount(1, 6), "0.000001");
        assert_eq!(format_amount(7, 0), "7");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price_x64("1").unwrap(), Q64);
        assert_eq!(parse_price_x64("0.25").unwrap(), Q64 / 4);
        assert_eq!(parse_price_x64("2.5").unwrap(), 2 * Q64 + Q64 / 2);
        assert!(parse_price_x64("0").is_err());
        assert!(parse_price_x64("x").is_err());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price_x64(Q64 / 4), "0.250000000");
        assert_eq!(format_price_x64(3 * Q64), "3.000000000");
    }
}
