use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::errors::ErrorCode;
use crate::{Fund, PoolFundedEvent};

// =============================================================================
// FUND - Add value to the vault without joining the ledger
// =============================================================================
// Reward credits and settlement draw on the vault, so someone has to top it
// up beyond the tracked deposits. Anyone may fund; the transfer buys no
// claim, which is why the vault's raw balance can exceed the tracked total.

/// Transfer `amount` of the stake mint into the vault with no ledger credit.
///
/// # Arguments
/// * `amount` - Funding size in base units of the stake mint
pub fn handler(ctx: Context<Fund>, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InvalidAmount);

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.funder_token_account.to_account_info(),
            to: ctx.accounts.vault.to_account_info(),
            authority: ctx.accounts.funder.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(PoolFundedEvent {
        funder: ctx.accounts.funder.key(),
        amount,
    });

    msg!(
        "Vault funded: funder={}, amount={}",
        ctx.accounts.funder.key(),
        amount
    );

    Ok(())
}
