use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{EnterPool, PoolClosedEvent, StakingEnterEvent};

// =============================================================================
// ENTER POOL - Deposit into the staking ledger
// =============================================================================
// Admission is bounded by the capacity cap: the deposit must clear the
// minimum stake, the pool must still be open, and the post-deposit total
// must not exceed capacity. A deposit that lands the total exactly at
// capacity closes the pool to further admission.

/// Deposit `amount` of the stake mint into the pool.
///
/// # Arguments
/// * `amount` - Deposit size in base units of the stake mint
pub fn handler(ctx: Context<EnterPool>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let staker = ctx.accounts.staker.key();

    // Admission checks and ledger update; a failed token transfer below
    // aborts the instruction and discards this along with it.
    let reached_capacity = ctx.accounts.pool.enter(staker, amount, now)?;

    // Move the stake into the vault
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.staker_token_account.to_account_info(),
            to: ctx.accounts.vault.to_account_info(),
            authority: ctx.accounts.staker.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    let total_staked = ctx.accounts.pool.total_staked();

    emit!(StakingEnterEvent {
        staker,
        amount,
        total_staked,
    });

    if reached_capacity {
        emit!(PoolClosedEvent {
            total_staked,
            closed_at: now,
        });
        msg!("Pool reached capacity and is now closed to deposits");
    }

    msg!(
        "Stake entered: staker={}, amount={}, total={}",
        staker,
        amount,
        total_staked
    );

    Ok(())
}
