// =============================================================================
// PDA SEEDS
// =============================================================================
// PDA (Program Derived Address) seeds are used to derive deterministic addresses.

/// Seed for the main pool account (singleton)
pub const POOL_SEED: &[u8] = b"pool";

/// Seed for the vault token account holding all staked value
pub const VAULT_SEED: &[u8] = b"vault";

// =============================================================================
// LEDGER LIMITS
// =============================================================================

/// Maximum number of distinct stakers the roster can hold.
/// The Pool account is sized from this at creation; see Pool::SIZE.
pub const MAX_STAKERS: usize = 64;

/// Reward percentage is a whole-number percent, capped at 100
pub const MAX_REWARD_PERCENT: u8 = 100;
