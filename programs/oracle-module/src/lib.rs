use anchor_lang::prelude::*;

pub mod pricing;

declare_id!("GspPriceFeed11111111111111111111111111111111");

pub const PRICE_FEED_SEED: &[u8] = b"price_feed";

#[program]
pub mod gsp_oracle_module {
    use super::*;

    pub fn initialize_price_feed(
        ctx: Context<InitializePriceFeed>,
        base_is_token0: bool,
        max_staleness: i64,
    ) -> Result<()> {
        require!(max_staleness > 0, OracleError::InvalidStaleness);
        let base_mint = ctx.accounts.base_mint.key();
        let quote_mint = ctx.accounts.quote_mint.key();
        pricing::validate_orientation(&base_mint, &quote_mint, base_is_token0)?;

        let price_feed = &mut ctx.accounts.price_feed;
        price_feed.authority = ctx.accounts.authority.key();
        price_feed.pool = ctx.accounts.pool.key();
        price_feed.base_mint = base_mint;
        price_feed.quote_mint = quote_mint;
        price_feed.base_is_token0 = base_is_token0;
        price_feed.price_x64 = 0;
        price_feed.last_update = 0;
        price_feed.max_staleness = max_staleness;
        price_feed.is_active = true;
        price_feed.bump = ctx.bumps.price_feed;

        emit!(PriceFeedInitialized {
            price_feed: price_feed.key(),
            pool: price_feed.pool,
            base_mint,
            quote_mint,
            base_is_token0,
        });
        Ok(())
    }

    /// Publishes the pool's observed price, token1 atoms per token0 atom in Q64.64.
    pub fn update_price(ctx: Context<FeedAdmin>, price_x64: u128) -> Result<()> {
        require!(price_x64 > 0, OracleError::InvalidPrice);
        let price_feed = &mut ctx.accounts.price_feed;
        price_feed.price_x64 = price_x64;
        price_feed.last_update = Clock::get()?.unix_timestamp;

        emit!(PriceUpdated {
            price_feed: price_feed.key(),
            price_x64,
            last_update: price_feed.last_update,
        });
        Ok(())
    }

    pub fn set_active(ctx: Context<FeedAdmin>, active: bool) -> Result<()> {
        let price_feed = &mut ctx.accounts.price_feed;
        price_feed.is_active = active;

        emit!(PriceFeedStatusChanged {
            price_feed: price_feed.key(),
            is_active: active,
            max_staleness: price_feed.max_staleness,
        });
        Ok(())
    }

    pub fn set_max_staleness(ctx: Context<FeedAdmin>, max_staleness: i64) -> Result<()> {
        require!(max_staleness > 0, OracleError::InvalidStaleness);
        let price_feed = &mut ctx.accounts.price_feed;
        price_feed.max_staleness = max_staleness;

        emit!(PriceFeedStatusChanged {
            price_feed: price_feed.key(),
            is_active: price_feed.is_active,
            max_staleness,
        });
        Ok(())
    }

    /// Rebinds the feed to a pool, e.g. once liquidity is seeded after the
    /// feed was created alongside the mint.
    pub fn set_pool(ctx: Context<FeedAdmin>, pool: Pubkey) -> Result<()> {
        let price_feed = &mut ctx.accounts.price_feed;
        let old_pool = std::mem::replace(&mut price_feed.pool, pool);
        // observations were taken from the old pool
        price_feed.price_x64 = 0;
        price_feed.last_update = 0;

        emit!(PriceFeedPoolChanged {
            price_feed: price_feed.key(),
            old_pool,
            new_pool: pool,
        });
        Ok(())
    }

    pub fn transfer_authority(ctx: Context<FeedAdmin>, new_authority: Pubkey) -> Result<()> {
        let price_feed = &mut ctx.accounts.price_feed;
        let old_authority = std::mem::replace(&mut price_feed.authority, new_authority);

        emit!(PriceFeedAuthorityTransferred {
            price_feed: price_feed.key(),
            old_authority,
            new_authority,
        });
        Ok(())
    }

    /// Converts `amount_in` atoms of the gated asset into reference-unit atoms.
    pub fn quote(ctx: Context<Quote>, amount_in: u64) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let amount_out = pricing::quote_feed(&ctx.accounts.price_feed, amount_in, now)?;
        msg!("Quoted {} -> {}", amount_in, amount_out);
        Ok(amount_out)
    }
}

#[derive(Accounts)]
pub struct InitializePriceFeed<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        init,
        payer = authority,
        space = 8 + PriceFeed::INIT_SPACE,
        seeds = [PRICE_FEED_SEED, base_mint.key().as_ref()],
        bump
    )]
    pub price_feed: Account<'info, PriceFeed>,
    /// CHECK: AMM pool the observations are taken from
    pub pool: UncheckedAccount<'info>,
    /// CHECK: Gated asset mint, the quoted side
    pub base_mint: UncheckedAccount<'info>,
    /// CHECK: Reference unit mint
    pub quote_mint: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct FeedAdmin<'info> {
    pub authority: Signer<'info>,
    #[account(
        mut,
        has_one = authority @ OracleError::Unauthorized
    )]
    pub price_feed: Account<'info, PriceFeed>,
}

#[derive(Accounts)]
pub struct Quote<'info> {
    pub price_feed: Account<'info, PriceFeed>,
}

#[account]
#[derive(InitSpace, Default)]
pub struct PriceFeed {
    pub authority: Pubkey,
    pub pool: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_is_token0: bool,
    pub price_x64: u128,
    pub last_update: i64,
    pub max_staleness: i64,
    pub is_active: bool,
    pub bump: u8,
}

#[error_code]
pub enum OracleError {
    #[msg("Not authorized for this price feed")]
    Unauthorized,
    #[msg("Price must be greater than zero")]
    InvalidPrice,
    #[msg("Max staleness must be greater than zero")]
    InvalidStaleness,
    #[msg("Pool orientation does not match the mint ordering")]
    OrientationMismatch,
    #[msg("Price feed is inactive")]
    FeedInactive,
    #[msg("No price observation published yet")]
    NoObservation,
    #[msg("Price observation is stale")]
    StalePrice,
    #[msg("Arithmetic overflow")]
    MathOverflow,
}

#[event]
pub struct PriceFeedInitialized {
    pub price_feed: Pubkey,
    pub pool: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_is_token0: bool,
}

#[event]
pub struct PriceUpdated {
    pub price_feed: Pubkey,
    pub price_x64: u128,
    pub last_update: i64,
}

#[event]
pub struct PriceFeedStatusChanged {
    pub price_feed: Pubkey,
    pub is_active: bool,
    pub max_staleness: i64,
}

#[event]
pub struct PriceFeedPoolChanged {
    pub price_feed: Pubkey,
    pub old_pool: Pubkey,
    pub new_pool: Pubkey,
}

#[event]
pub struct PriceFeedAuthorityTransferred {
    pub price_feed: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
}
