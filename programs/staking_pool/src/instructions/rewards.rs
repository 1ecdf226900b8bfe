use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::{DistributeRewards, RewardsDistributedEvent};

// =============================================================================
// REWARDS - Out-of-schedule reward distribution
// =============================================================================
// Unconditional variant of the epoch-reward branch: credits the same
// per-staker percentage without upkeep gating and without touching the
// lifecycle state or the transition timestamp. Restricted to the pool
// authority.

pub fn handler(ctx: Context<DistributeRewards>) -> Result<()> {
    require!(
        ctx.accounts.authority.key() == ctx.accounts.pool.authority,
        ErrorCode::Unauthorized
    );

    let pool = &mut ctx.accounts.pool;
    let total_credited = pool.apply_rewards()?;

    emit!(RewardsDistributedEvent {
        distributed_at: Clock::get()?.unix_timestamp,
        staker_count: pool.staker_count() as u32,
        total_credited,
    });

    msg!(
        "Manual rewards distributed: stakers={}, credited={}",
        pool.staker_count(),
        total_credited
    );

    Ok(())
}
