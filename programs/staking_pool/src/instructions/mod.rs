// =============================================================================
// INSTRUCTIONS MODULE
// =============================================================================
// This module contains all the instruction handlers for the staking pool.
//

pub mod check_upkeep;
pub mod enter_pool;
pub mod fund;
pub mod initialize;
pub mod perform_upkeep;
pub mod rewards;
pub mod withdraw;

// Note: Account structs (like Initialize, EnterPool, Withdraw) are defined in
// lib.rs for Anchor's IDL generation. Only handlers are defined in this module.
