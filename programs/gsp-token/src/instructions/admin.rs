use crate::error::GatedAssetError;
use crate::events::*;
use crate::hook::check_gate_binding;
use crate::math::validate_metadata;
use crate::state::*;
use anchor_lang::prelude::*;
use gsp_gatekeeper::state::GateState;

#[derive(Accounts)]
pub struct Admin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ GatedAssetError::Unauthorized
    )]
    pub config: Account<'info, AssetConfig>,
}

#[derive(Accounts)]
pub struct SetGatekeeper<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ GatedAssetError::Unauthorized
    )]
    pub config: Account<'info, AssetConfig>,

    /// Required when binding.
    pub gate: Option<Account<'info, GateState>>,
}

/// Binds the asset to the gate derived for its mint, or unbinds it.
pub fn set_gatekeeper(ctx: Context<SetGatekeeper>, gatekeeper: Option<Pubkey>) -> Result<()> {
    let config = &mut ctx.accounts.config;
    if let Some(gatekeeper) = gatekeeper {
        let gate = ctx
            .accounts
            .gate
            .as_ref()
            .ok_or(GatedAssetError::GatekeeperMismatch)?;
        require_keys_eq!(gate.key(), gatekeeper, GatedAssetError::GatekeeperMismatch);
        check_gate_binding(config, &gatekeeper, gate)?;
    }

    let old_gatekeeper = config.gatekeeper;
    config.gatekeeper = gatekeeper;

    emit!(GatekeeperUpdated {
        asset: config.key(),
        old_gatekeeper,
        new_gatekeeper: gatekeeper,
    });
    Ok(())
}

pub fn set_name_and_symbol(ctx: Context<Admin>, name: String, symbol: String) -> Result<()> {
    validate_metadata(&name, &symbol)?;
    let config = &mut ctx.accounts.config;
    config.name = name.clone();
    config.symbol = symbol.clone();

    emit!(MetadataUpdated {
        asset: config.key(),
        name,
        symbol,
    });
    Ok(())
}

pub fn transfer_authority(ctx: Context<Admin>, new_authority: Pubkey) -> Result<()> {
    let config = &mut ctx.accounts.config;
    let old_authority = config.authority;
    config.authority = new_authority;

    emit!(AuthorityTransferred {
        asset: config.key(),
        old_authority,
        new_authority,
    });
    Ok(())
}
