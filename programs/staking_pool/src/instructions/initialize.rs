use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::{Pool, PoolState};
use crate::{Initialize, PoolInitializedEvent};

// =============================================================================
// INITIALIZE INSTRUCTION HANDLER
// =============================================================================
// Creates the singleton Pool account and its vault, fixing every pool
// parameter for the rest of the pool's life. The account validation
// (including vault creation) is defined in lib.rs.
//

/// Initialize the staking pool.
///
/// # Arguments
/// * `ctx` - The validated accounts context
/// * `minimum_stake` - Smallest acceptable single deposit, in base units
/// * `reward_interval` - Seconds between reward epochs
/// * `pool_lifetime` - Seconds until the pool force-settles
/// * `reward_percent` - Whole-number percent credited per epoch (0-100)
/// * `capacity` - Maximum total tracked value the pool accepts
pub fn handler(
    ctx: Context<Initialize>,
    minimum_stake: u64,
    reward_interval: i64,
    pool_lifetime: i64,
    reward_percent: u8,
    capacity: u64,
) -> Result<()> {
    Pool::validate_params(
        minimum_stake,
        reward_interval,
        pool_lifetime,
        reward_percent,
        capacity,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let pool = &mut ctx.accounts.pool;

    // Store the bump seed - used later when the Pool PDA signs vault transfers
    pool.bump = ctx.bumps.pool;

    pool.authority = ctx.accounts.authority.key();
    pool.stake_mint = ctx.accounts.stake_mint.key();

    pool.minimum_stake = minimum_stake;
    pool.capacity = capacity;
    pool.reward_interval = reward_interval;
    pool.end_time = now
        .checked_add(pool_lifetime)
        .ok_or(ErrorCode::MathOverflow)?;
    pool.reward_percent = reward_percent;

    pool.state = PoolState::Open;
    pool.created_at = now;
    pool.last_transition_ts = now;
    pool.stakers = Vec::new();

    emit!(PoolInitializedEvent {
        authority: pool.authority,
        stake_mint: pool.stake_mint,
        minimum_stake,
        capacity,
        reward_interval,
        end_time: pool.end_time,
        reward_percent,
    });

    msg!("Staking pool initialized");
    msg!("Authority: {}", pool.authority);
    msg!("Stake mint: {}", pool.stake_mint);
    msg!("Minimum stake: {}", pool.minimum_stake);
    msg!("Capacity: {}", pool.capacity);
    msg!("Reward interval: {} s", pool.reward_interval);
    msg!("End time: {}", pool.end_time);
    msg!("Reward percent: {}", pool.reward_percent);

    Ok(())
}
