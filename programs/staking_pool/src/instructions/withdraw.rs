use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::POOL_SEED;
use crate::{Withdraw, WithdrawalEvent};

// =============================================================================
// WITHDRAW - Draw down the caller's own claim
// =============================================================================
// Allowed in any lifecycle state. The ledger is debited before the vault
// transfer is attempted; a failed transfer aborts the instruction and the
// debit is discarded with it, so the tracked balance and the vault can
// never disagree.

/// Withdraw `amount` from the caller's tracked claim.
///
/// # Arguments
/// * `amount` - Withdrawal size in base units of the stake mint
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let staker = ctx.accounts.staker.key();

    ctx.accounts.pool.debit(&staker, amount)?;

    // Pool PDA signs the transfer out of the vault
    let pool_seeds = &[POOL_SEED, &[ctx.accounts.pool.bump]];
    let signer_seeds = &[&pool_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault.to_account_info(),
            to: ctx.accounts.staker_token_account.to_account_info(),
            authority: ctx.accounts.pool.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(WithdrawalEvent { staker, amount });

    msg!(
        "Withdrawal: staker={}, amount={}, remaining={}",
        staker,
        amount,
        ctx.accounts.pool.staker_amount(&staker)
    );

    Ok(())
}
