// =============================================================================
// STATE MODULE
// =============================================================================
// This module contains the account structures (state) for the staking pool.
//

// Re-export the state structs for easy importing
// Usage: `use crate::state::{Pool, PoolState, StakeEntry, UpkeepAction};`

mod pool;

pub use pool::*;
