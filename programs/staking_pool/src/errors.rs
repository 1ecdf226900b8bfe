use anchor_lang::prelude::*;

// =============================================================================
// ERROR CODES
// =============================================================================
// These are custom errors that our program can return.
//

#[error_code]
pub enum ErrorCode {
    // =========================================================================
    // ADMISSION ERRORS
    // =========================================================================
    /// Deposit is smaller than the pool's minimum stake
    #[msg("Deposit below the minimum stake")]
    BelowMinimumStake,

    /// Deposit would push the tracked total past the pool's capacity
    #[msg("Pool is at capacity")]
    PoolFull,

    /// Pool is closed - no further deposits are accepted
    #[msg("Pool is not open")]
    PoolNotOpen,

    /// A first-time depositor would exceed the fixed roster size
    #[msg("Staker roster is full")]
    StakerLimitReached,

    // =========================================================================
    // UPKEEP ERRORS
    // =========================================================================
    /// Upkeep was executed while the upkeep condition does not hold
    #[msg("Upkeep is not needed")]
    UpkeepNotNeeded,

    // =========================================================================
    // BALANCE ERRORS
    // =========================================================================
    /// Withdrawal exceeds the caller's tracked balance
    #[msg("Insufficient balance")]
    InsufficientBalance,

    // =========================================================================
    // AUTHORIZATION ERRORS
    // =========================================================================
    /// Caller is not authorized to perform this action
    #[msg("Unauthorized")]
    Unauthorized,

    // =========================================================================
    // INPUT VALIDATION ERRORS
    // =========================================================================
    /// Amount must be greater than zero
    #[msg("Invalid amount")]
    InvalidAmount,

    /// Interval or lifetime must be a positive number of seconds
    #[msg("Invalid duration")]
    InvalidDuration,

    /// Reward percentage must be between 0 and 100
    #[msg("Invalid reward percentage (must be 0-100)")]
    InvalidRewardPercent,

    /// Token account does not belong to the expected staker
    #[msg("Invalid staker token account")]
    InvalidStakerAccount,

    /// Token mint address doesn't match the pool's stake mint
    #[msg("Invalid token mint")]
    InvalidMint,

    /// Settlement requires one token account per roster entry, in roster order
    #[msg("Missing staker token account for settlement")]
    MissingStakerAccount,

    // =========================================================================
    // ARITHMETIC ERRORS
    // =========================================================================
    /// Math overflow
    #[msg("Math overflow")]
    MathOverflow,
}
