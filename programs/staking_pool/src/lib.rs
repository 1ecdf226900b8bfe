use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

// =============================================================================
// MODULE DECLARATIONS
// =============================================================================
// These modules organize our code into logical components.
//

/// Constants module: PDA seeds, ledger limits
pub mod constants;

/// Error codes returned by our program
pub mod errors;

/// Instruction handlers: initialize, enter_pool, perform_upkeep, etc.
pub mod instructions;

/// Account state structures: Pool, StakeEntry
pub mod state;

// Re-export errors for easier access
pub use errors::ErrorCode;

use crate::constants::*;
use crate::state::*;

// =============================================================================
// PROGRAM ID
// =============================================================================
// This is the unique address of our deployed program on Solana.
//

declare_id!("9XjXYmL9TLB3FuszEuXCTkjC6a4vHZ5TPWczyNMLKHRg");

// Staking Pool - a time-boxed pooled-staking ledger.
//
// Participants deposit the stake mint into a shared vault, bounded by a
// capacity cap. While the pool is open, every elapsed reward interval lets
// anyone trigger an epoch that credits each staker a fixed percentage of
// their claim. Once the pool's lifetime is over, the next upkeep pays every
// claim back out and closes the pool. Upkeep is reactive: an external caller
// polls check_upkeep and, when due, calls perform_upkeep, which re-validates
// the same predicate before mutating anything.

#[program]
pub mod staking_pool {
    use super::*;

    /// Create the singleton pool and its vault.
    /// All parameters are immutable for the pool's whole life.
    ///
    /// # Arguments
    /// * `minimum_stake` - Smallest acceptable single deposit, in base units
    /// * `reward_interval` - Seconds between reward epochs
    /// * `pool_lifetime` - Seconds until the pool force-settles
    /// * `reward_percent` - Whole-number percent credited per epoch (0-100)
    /// * `capacity` - Maximum total tracked value the pool accepts
    pub fn initialize(
        ctx: Context<Initialize>,
        minimum_stake: u64,
        reward_interval: i64,
        pool_lifetime: i64,
        reward_percent: u8,
        capacity: u64,
    ) -> Result<()> {
        instructions::initialize::handler(
            ctx,
            minimum_stake,
            reward_interval,
            pool_lifetime,
            reward_percent,
            capacity,
        )
    }

    /// Deposit into the pool. Fails below the minimum stake, once the pool
    /// is closed, or past the capacity cap. Landing exactly at capacity
    /// closes the pool to further deposits.
    ///
    /// # Arguments
    /// * `amount` - Deposit size in base units of the stake mint
    pub fn enter_pool(ctx: Context<EnterPool>, amount: u64) -> Result<()> {
        instructions::enter_pool::handler(ctx, amount)
    }

    /// Read-only upkeep probe: is a transition due right now?
    /// Freely pollable by anyone; the result is returned as return data.
    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<bool> {
        instructions::check_upkeep::handler(ctx)
    }

    /// Execute a due transition: an epoch reward while the pool lifetime
    /// remains, a terminal settlement once it is over. Fails with
    /// UpkeepNotNeeded when nothing is due.
    ///
    /// Settlement requires one stake-mint token account per roster entry in
    /// remaining_accounts, in roster order.
    pub fn perform_upkeep<'info>(
        ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>,
    ) -> Result<()> {
        instructions::perform_upkeep::handler(ctx)
    }

    /// Credit the epoch reward to every staker outside the schedule.
    /// Restricted to the pool authority; leaves the lifecycle state and the
    /// upkeep timestamp untouched.
    pub fn rewards(ctx: Context<DistributeRewards>) -> Result<()> {
        instructions::rewards::handler(ctx)
    }

    /// Withdraw from the caller's own claim, in any lifecycle state.
    ///
    /// # Arguments
    /// * `amount` - Withdrawal size in base units of the stake mint
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Top up the vault without joining the ledger. Reward credits and
    /// settlement draw on this headroom.
    ///
    /// # Arguments
    /// * `amount` - Funding size in base units of the stake mint
    pub fn fund(ctx: Context<Fund>, amount: u64) -> Result<()> {
        instructions::fund::handler(ctx, amount)
    }
}

// =============================================================================
// INITIALIZE INSTRUCTION ACCOUNTS
// =============================================================================

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The wallet paying for account creation (rent).
    /// Must sign the transaction.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Authority for the out-of-schedule reward trigger.
    /// CHECK: This can be any valid public key - stored as Pool.authority
    pub authority: UncheckedAccount<'info>,

    /// The main Pool account - the ledger and state machine.
    /// PDA derived from seeds: ["pool"]
    /// Space calculation defined in Pool::SIZE
    #[account(
        init,
        payer = payer,
        space = Pool::SIZE,
        seeds = [POOL_SEED],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// The mint the pool is denominated in.
    /// The address is stored in Pool during initialization.
    pub stake_mint: Box<Account<'info, Mint>>,

    /// Vault token account holding every deposit plus any reward funding.
    /// PDA seeds: ["vault"], owned by the Pool PDA.
    #[account(
        init,
        payer = payer,
        seeds = [VAULT_SEED],
        bump,
        token::mint = stake_mint,
        token::authority = pool,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// Required for creating accounts
    pub system_program: Program<'info, System>,

    /// Required for creating token accounts
    pub token_program: Program<'info, Token>,
}

// =============================================================================
// ENTER POOL INSTRUCTION ACCOUNTS
// =============================================================================

#[derive(Accounts)]
pub struct EnterPool<'info> {
    /// The depositing wallet; signs the transfer into the vault.
    pub staker: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        token::mint = pool.stake_mint,
        token::authority = pool,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// The staker's own token account the deposit is drawn from.
    #[account(
        mut,
        constraint = staker_token_account.owner == staker.key() @ ErrorCode::InvalidStakerAccount,
        constraint = staker_token_account.mint == pool.stake_mint @ ErrorCode::InvalidMint,
    )]
    pub staker_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

// =============================================================================
// CHECK UPKEEP INSTRUCTION ACCOUNTS
// =============================================================================

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    /// Read-only: the predicate never mutates the pool.
    #[account(
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,
}

// =============================================================================
// PERFORM UPKEEP INSTRUCTION ACCOUNTS
// =============================================================================
// Permissionless: the upkeep predicate is the only gate.
// remaining_accounts carries the settlement destinations (one stake-mint
// token account per roster entry, in roster order); the epoch-reward branch
// ignores it.

#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        token::mint = pool.stake_mint,
        token::authority = pool,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

// =============================================================================
// DISTRIBUTE REWARDS INSTRUCTION ACCOUNTS
// =============================================================================

#[derive(Accounts)]
pub struct DistributeRewards<'info> {
    /// Must match Pool.authority; checked in the handler.
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,
}

// =============================================================================
// WITHDRAW INSTRUCTION ACCOUNTS
// =============================================================================

#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The withdrawing staker; only their own claim can be drawn down.
    pub staker: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        token::mint = pool.stake_mint,
        token::authority = pool,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// Where the withdrawal is paid out.
    #[account(
        mut,
        constraint = staker_token_account.owner == staker.key() @ ErrorCode::InvalidStakerAccount,
        constraint = staker_token_account.mint == pool.stake_mint @ ErrorCode::InvalidMint,
    )]
    pub staker_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

// =============================================================================
// FUND INSTRUCTION ACCOUNTS
// =============================================================================

#[derive(Accounts)]
pub struct Fund<'info> {
    /// Anyone may fund the vault.
    pub funder: Signer<'info>,

    #[account(
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        token::mint = pool.stake_mint,
        token::authority = pool,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// The funder's token account the contribution is drawn from.
    #[account(
        mut,
        constraint = funder_token_account.owner == funder.key() @ ErrorCode::InvalidStakerAccount,
        constraint = funder_token_account.mint == pool.stake_mint @ ErrorCode::InvalidMint,
    )]
    pub funder_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

// =============================================================================
// EVENTS
// =============================================================================

/// Emitted once at pool creation with the full immutable parameter set
#[event]
pub struct PoolInitializedEvent {
    pub authority: Pubkey,
    pub stake_mint: Pubkey,
    pub minimum_stake: u64,
    pub capacity: u64,
    pub reward_interval: i64,
    pub end_time: i64,
    pub reward_percent: u8,
}

#[event]
pub struct StakingEnterEvent {
    pub staker: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
}

/// Emitted when a deposit lands the pool exactly at capacity.
/// External watchers can stop submitting deposits once they see this.
#[event]
pub struct PoolClosedEvent {
    pub total_staked: u64,
    pub closed_at: i64,
}

#[event]
pub struct RewardsDistributedEvent {
    pub distributed_at: i64,
    pub staker_count: u32,
    pub total_credited: u64,
}

/// One per successful payout, from both the withdraw path and settlement
#[event]
pub struct WithdrawalEvent {
    pub staker: Pubkey,
    pub amount: u64,
}

/// Emitted after terminal settlement has paid out every claim
#[event]
pub struct PoolSettledEvent {
    pub settled_at: i64,
    pub staker_count: u32,
    pub total_paid: u64,
}

#[event]
pub struct PoolFundedEvent {
    pub funder: Pubkey,
    pub amount: u64,
}
