use anchor_lang::prelude::*;

#[error_code]
pub enum GatekeeperError {
    #[msg("Caller is not the owner")]
    NotOwner,
    #[msg("Caller is not the bound gated asset")]
    NotAuthorizedCaller,
    #[msg("Sale is locked")]
    Locked,
    #[msg("Self whitelisting is disabled")]
    SelfWhitelistDisabled,
    #[msg("Address is not whitelisted")]
    NotWhitelisted,
    #[msg("Address has already contributed up to the cap")]
    AlreadyContributed,
    #[msg("Contribution would exceed the max address cap")]
    MaxAddressCapOverflow,
    #[msg("Payment must be greater than zero")]
    ZeroPayment,
    #[msg("Price feed is not the bound oracle")]
    OracleMismatch,
    #[msg("Price feed is bound to a different pool")]
    PoolMismatch,
    #[msg("Whitelist entry does not belong to this address")]
    InvalidWhitelistEntry,
    #[msg("Batch is empty, too large, or does not match the supplied entries")]
    InvalidBatch,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Price feed is not run by the gate owner for this asset")]
    ForeignOracle,
}
