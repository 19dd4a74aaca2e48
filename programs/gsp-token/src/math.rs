use crate::constants::{MAX_DECIMALS, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH};
use crate::error::GatedAssetError;
use anchor_lang::prelude::*;

pub fn safe_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(GatedAssetError::MathOverflow.into())
}

pub fn safe_sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or(GatedAssetError::MathOverflow.into())
}

pub fn update_supply(current: u64, amount: u64, increase: bool) -> Result<u64> {
    if increase {
        safe_add(current, amount)
    } else {
        safe_sub(current, amount)
    }
}

pub fn validate_metadata(name: &str, symbol: &str) -> Result<()> {
    require!(name.len() <= MAX_NAME_LENGTH, GatedAssetError::NameTooLong);
    require!(
        symbol.len() <= MAX_SYMBOL_LENGTH,
        GatedAssetError::SymbolTooLong
    );
    Ok(())
}

pub fn validate_decimals(decimals: u8, mint_decimals: u8) -> Result<()> {
    require!(
        decimals <= MAX_DECIMALS && decimals == mint_decimals,
        GatedAssetError::InvalidDecimals
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_add() {
        assert_eq!(safe_add(100, 200).expect("should add"), 300);
        assert!(safe_add(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_safe_sub() {
        assert_eq!(safe_sub(300, 100).expect("should subtract"), 200);
        assert!(safe_sub(100, 300).is_err());
    }

    #[test]
    fn test_update_supply() {
        assert_eq!(update_supply(100, 50, true).expect("should increase"), 150);
        assert_eq!(update_supply(100, 50, false).expect("should decrease"), 50);
        assert!(update_supply(10, 50, false).is_err());
    }

    #[test]
    fn test_validate_metadata() {
        assert!(validate_metadata("Gated Sale Token", "GST").is_ok());
        assert!(validate_metadata(&"n".repeat(MAX_NAME_LENGTH + 1), "GST").is_err());
        assert!(validate_metadata("Gated Sale Token", "SYMBOLTOOLONG").is_err());
    }

    #[test]
    fn test_validate_decimals() {
        assert!(validate_decimals(6, 6).is_ok());
        assert!(validate_decimals(6, 9).is_err());
        assert!(validate_decimals(10, 10).is_err());
    }
}
