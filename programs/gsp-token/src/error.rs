use anchor_lang::prelude::*;

#[error_code]
pub enum GatedAssetError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Not authorized for this action")]
    Unauthorized,
    #[msg("Cannot transfer to the asset itself")]
    TransferToAsset,
    #[msg("Hook invoked outside of a token transfer")]
    NotTransferring,
    #[msg("Gate account is not the bound gatekeeper")]
    GatekeeperMismatch,
    #[msg("Mint authority must be the asset config")]
    InvalidMintAuthority,
    #[msg("Mint transfer hook does not point at this program")]
    HookNotConfigured,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Name too long (max 32 chars)")]
    NameTooLong,
    #[msg("Symbol too long (max 10 chars)")]
    SymbolTooLong,
    #[msg("Invalid decimals - must be <= 9 and match the mint")]
    InvalidDecimals,
    #[msg("Gate is not run by the asset authority")]
    ForeignGatekeeper,
}
