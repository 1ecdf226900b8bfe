use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::constants::POOL_SEED;
use crate::errors::ErrorCode;
use crate::state::{Pool, UpkeepAction};
use crate::{PerformUpkeep, PoolSettledEvent, RewardsDistributedEvent, WithdrawalEvent};

// =============================================================================
// PERFORM UPKEEP - Execute a due transition
// =============================================================================
// The mutating half of the check/execute pair. Re-validates the upkeep
// predicate, then either credits the epoch reward to every staker or, once
// the pool's lifetime has elapsed, pays out and zeroes every claim and
// closes the pool.
//
// Settlement expects one token account per roster entry in
// remaining_accounts, in roster order, each owned by that staker and holding
// the stake mint. A single failed payout aborts the whole instruction, so a
// failed settlement pays nobody.

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    match ctx.accounts.pool.begin_upkeep(now)? {
        UpkeepAction::EpochRewards => distribute_epoch_rewards(ctx, now),
        UpkeepAction::Settlement => settle(ctx, now),
    }
}

/// Branch A: credit every staker with the per-epoch percentage.
/// The pool stays open; the vault is assumed funded for the credit.
fn distribute_epoch_rewards<'info>(
    ctx: Context<'_, '_, '_, 'info, PerformUpkeep<'info>>,
    now: i64,
) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let total_credited = pool.apply_rewards()?;

    emit!(RewardsDistributedEvent {
        distributed_at: now,
        staker_count: pool.staker_count() as u32,
        total_credited,
    });

    msg!(
        "Epoch rewards distributed: stakers={}, credited={}",
        pool.staker_count(),
        total_credited
    );

    Ok(())
}

/// Branch B: pay out and zero every claim in roster order, then close.
fn settle<'info>(ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>, now: i64) -> Result<()> {
    let staker_count = ctx.accounts.pool.staker_count();
    require!(
        ctx.remaining_accounts.len() == staker_count,
        ErrorCode::MissingStakerAccount
    );

    let stake_mint = ctx.accounts.pool.stake_mint;
    let pool_seeds = &[POOL_SEED, &[ctx.accounts.pool.bump]];
    let signer_seeds = &[&pool_seeds[..]];

    let mut total_paid: u64 = 0;
    for index in 0..staker_count {
        let staker = ctx.accounts.pool.stakers[index].staker;

        // Each destination must be a token account of the stake mint owned
        // by the staker at this roster position.
        let destination_info = &ctx.remaining_accounts[index];
        let destination = Account::<TokenAccount>::try_from(destination_info)?;
        require!(destination.owner == staker, ErrorCode::InvalidStakerAccount);
        require!(destination.mint == stake_mint, ErrorCode::InvalidMint);

        let amount = ctx.accounts.pool.take_payout(index);
        if amount == 0 {
            continue;
        }

        let transfer_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: destination_info.clone(),
                authority: ctx.accounts.pool.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(transfer_ctx, amount)?;

        total_paid = total_paid
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        emit!(WithdrawalEvent { staker, amount });
    }

    Pool::close(&mut ctx.accounts.pool);

    emit!(PoolSettledEvent {
        settled_at: now,
        staker_count: staker_count as u32,
        total_paid,
    });

    msg!(
        "Pool settled: stakers={}, paid={}",
        staker_count,
        total_paid
    );

    Ok(())
}
