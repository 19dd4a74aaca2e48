use crate::error::GatekeeperError;
use crate::events::*;
use crate::state::GateState;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct GateAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ GatekeeperError::NotOwner
    )]
    pub state: Account<'info, GateState>,
}

pub fn set_locked(ctx: Context<GateAdmin>, locked: bool) -> Result<()> {
    let state = &mut ctx.accounts.state;
    state.locked = locked;

    emit!(LockChanged {
        gate: state.key(),
        locked,
    });
    Ok(())
}

pub fn set_max_address_cap(ctx: Context<GateAdmin>, max_address_cap: u64) -> Result<()> {
    let state = &mut ctx.accounts.state;
    let old_cap = state.max_address_cap;
    state.max_address_cap = max_address_cap;

    emit!(MaxAddressCapUpdated {
        gate: state.key(),
        old_cap,
        new_cap: max_address_cap,
    });
    Ok(())
}

fn rebind(state: &mut Account<GateState>, binding: Binding, new: Pubkey) {
    let slot = match binding {
        Binding::GatedAsset => &mut state.gated_asset,
        Binding::Pool => &mut state.pool,
        Binding::Oracle => &mut state.oracle,
    };
    let old = std::mem::replace(slot, new);

    emit!(BindingUpdated {
        gate: state.key(),
        binding,
        old,
        new,
    });
}

pub fn set_oracle(ctx: Context<GateAdmin>, oracle: Pubkey) -> Result<()> {
    rebind(&mut ctx.accounts.state, Binding::Oracle, oracle);
    Ok(())
}

pub fn set_pool(ctx: Context<GateAdmin>, pool: Pubkey) -> Result<()> {
    rebind(&mut ctx.accounts.state, Binding::Pool, pool);
    Ok(())
}

pub fn set_gated_asset(ctx: Context<GateAdmin>, gated_asset: Pubkey) -> Result<()> {
    rebind(&mut ctx.accounts.state, Binding::GatedAsset, gated_asset);
    Ok(())
}

pub fn set_self_whitelist_disabled(ctx: Context<GateAdmin>, disabled: bool) -> Result<()> {
    let state = &mut ctx.accounts.state;
    state.self_whitelist_disabled = disabled;

    emit!(SelfWhitelistToggled {
        gate: state.key(),
        disabled,
    });
    Ok(())
}

pub fn set_allowed_whitelist_index(
    ctx: Context<GateAdmin>,
    allowed_whitelist_index: Option<u64>,
) -> Result<()> {
    let state = &mut ctx.accounts.state;
    state.allowed_whitelist_index = allowed_whitelist_index;

    emit!(AllowedWhitelistIndexUpdated {
        gate: state.key(),
        allowed_whitelist_index,
    });
    Ok(())
}

pub fn transfer_ownership(ctx: Context<GateAdmin>, new_authority: Pubkey) -> Result<()> {
    let state = &mut ctx.accounts.state;
    let old_authority = state.authority;
    state.authority = new_authority;

    emit!(OwnershipTransferred {
        gate: state.key(),
        old_authority,
        new_authority,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;
    use std::collections::BTreeSet;

    fn error_code(err: Error) -> Option<u32> {
        match err {
            Error::AnchorError(e) => Some(e.error_code_number),
            Error::ProgramError(_) => None,
        }
    }

    /// Resolves `GateAdmin` for a gate owned by `owner` with `signer` signing.
    fn resolve_admin(owner: Pubkey, signer: Pubkey) -> Result<()> {
        let (state_key, bump) = GateState::address(&Pubkey::new_unique());
        let gate = GateState {
            authority: owner,
            bump,
            ..GateState::default()
        };
        let mut state_data = vec![0u8; 8 + GateState::INIT_SPACE];
        let mut dst: &mut [u8] = &mut state_data;
        gate.try_serialize(&mut dst)?;

        let system = Pubkey::default();
        let program_id = crate::ID;
        let mut signer_lamports = 1;
        let mut signer_data: Vec<u8> = vec![];
        let mut state_lamports = 1;
        let infos = [
            AccountInfo::new(
                &signer,
                true,
                false,
                &mut signer_lamports,
                &mut signer_data,
                &system,
                false,
                0,
            ),
            AccountInfo::new(
                &state_key,
                false,
                true,
                &mut state_lamports,
                &mut state_data,
                &program_id,
                false,
                0,
            ),
        ];
        let mut accounts: &[AccountInfo] = &infos;
        GateAdmin::try_accounts(
            &program_id,
            &mut accounts,
            &[],
            &mut GateAdminBumps::default(),
            &mut BTreeSet::new(),
        )?;
        Ok(())
    }

    #[test]
    fn test_owner_passes_admin_check() {
        let owner = Pubkey::new_unique();
        assert!(resolve_admin(owner, owner).is_ok());
    }

    #[test]
    fn test_non_owner_rejected() {
        let err = resolve_admin(Pubkey::new_unique(), Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), Some(u32::from(GatekeeperError::NotOwner)));
    }
}
