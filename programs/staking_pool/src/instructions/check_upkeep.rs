use anchor_lang::prelude::*;

use crate::CheckUpkeep;

// =============================================================================
// CHECK UPKEEP - Read-only upkeep probe
// =============================================================================
// Returns whether a scheduled transition is due, via return data. Any party
// may poll this before spending a transaction on perform_upkeep; the mutating
// side re-validates the same predicate.

pub fn handler(ctx: Context<CheckUpkeep>) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;
    let due = ctx.accounts.pool.upkeep_needed(now);
    msg!("Upkeep check: now={}, due={}", now, due);
    Ok(due)
}
