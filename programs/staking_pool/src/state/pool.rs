use anchor_lang::prelude::*;

use crate::constants::{MAX_REWARD_PERCENT, MAX_STAKERS};
use crate::errors::ErrorCode;

// =============================================================================
// POOL ACCOUNT
// =============================================================================
// The Pool is the central state account for the whole program.
// There is only ONE Pool account, derived from the seed "pool".
//
// All parameters are fixed at initialization; the only mutable pieces are the
// lifecycle state, the upkeep timestamp, and the staker ledger. Every state
// transition goes through the methods below so the machine can be exercised
// without a runtime.

/// Lifecycle state of the pool.
/// `Open` accepts deposits; `Closed` is terminal for admission.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PoolState {
    Open,
    Closed,
}

/// One roster entry: a staker and their current tracked claim.
/// Entries are appended in first-deposit order and never removed,
/// so roster index is a stable participant identifier.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct StakeEntry {
    /// The staker's wallet
    pub staker: Pubkey,
    /// The staker's current claim, in base units of the stake mint
    pub amount: u64,
}

impl StakeEntry {
    /// Size in bytes: 32 + 8 = 40
    pub const SIZE: usize = 32 + 8;
}

/// Central state account for the staking pool.
/// PDA derived with seeds: ["pool"]
#[account]
pub struct Pool {
    /// Authority that can trigger an out-of-schedule reward distribution.
    pub authority: Pubkey,

    /// SPL mint the pool is denominated in. All deposits, rewards and
    /// payouts are in base units of this mint.
    pub stake_mint: Pubkey,

    // =========================================================================
    // IMMUTABLE PARAMETERS (set once at initialization)
    // =========================================================================
    /// Smallest acceptable single deposit
    pub minimum_stake: u64,

    /// Maximum total tracked value the pool accepts
    pub capacity: u64,

    /// Seconds between reward epochs while the pool is open
    pub reward_interval: i64,

    /// Unix timestamp after which the pool force-settles
    pub end_time: i64,

    /// Whole-number reward percent applied per epoch (0-100)
    pub reward_percent: u8,

    // =========================================================================
    // MUTABLE STATE
    // =========================================================================
    /// Lifecycle state
    pub state: PoolState,

    /// Unix timestamp the pool was created
    pub created_at: i64,

    /// Unix timestamp of the last admission event or upkeep execution.
    /// Never decreases.
    pub last_transition_ts: i64,

    /// Staker ledger, in first-deposit order. No duplicate keys.
    pub stakers: Vec<StakeEntry>,

    /// PDA bump seed, used when the pool signs vault transfers
    pub bump: u8,
}

impl Pool {
    /// Size of the Pool account in bytes.
    /// Used when creating the account: space = Pool::SIZE
    ///
    /// Calculation:
    /// - 8 bytes: Anchor discriminator (automatically added)
    /// - 32 bytes: authority (Pubkey)
    /// - 32 bytes: stake_mint (Pubkey)
    /// - 8 bytes: minimum_stake (u64)
    /// - 8 bytes: capacity (u64)
    /// - 8 bytes: reward_interval (i64)
    /// - 8 bytes: end_time (i64)
    /// - 1 byte: reward_percent (u8)
    /// - 1 byte: state (PoolState)
    /// - 8 bytes: created_at (i64)
    /// - 8 bytes: last_transition_ts (i64)
    /// - 4 + MAX_STAKERS * 40 bytes: stakers (Vec<StakeEntry>)
    /// - 1 byte: bump (u8)
    pub const SIZE: usize = 8 + // discriminator
        32 +  // authority
        32 +  // stake_mint
        8 +   // minimum_stake
        8 +   // capacity
        8 +   // reward_interval
        8 +   // end_time
        1 +   // reward_percent
        1 +   // state
        8 +   // created_at
        8 +   // last_transition_ts
        4 + (MAX_STAKERS * StakeEntry::SIZE) + // stakers
        1; // bump

    /// Validate initialization parameters.
    /// Rejected here so a misconfigured pool can never exist.
    pub fn validate_params(
        minimum_stake: u64,
        reward_interval: i64,
        pool_lifetime: i64,
        reward_percent: u8,
        capacity: u64,
    ) -> Result<()> {
        require!(minimum_stake > 0, ErrorCode::InvalidAmount);
        require!(capacity >= minimum_stake, ErrorCode::InvalidAmount);
        require!(reward_interval > 0, ErrorCode::InvalidDuration);
        require!(pool_lifetime > 0, ErrorCode::InvalidDuration);
        require!(
            reward_percent <= MAX_REWARD_PERCENT,
            ErrorCode::InvalidRewardPercent
        );
        Ok(())
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    /// Sum of all tracked claims.
    /// May be smaller than the raw vault balance when the vault is over-funded.
    pub fn total_staked(&self) -> u64 {
        self.stakers
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.amount))
    }

    /// Roster index of a staker, if they have ever deposited
    pub fn staker_index(&self, staker: &Pubkey) -> Option<usize> {
        self.stakers.iter().position(|e| e.staker == *staker)
    }

    /// A staker's current tracked claim (0 for unknown stakers)
    pub fn staker_amount(&self, staker: &Pubkey) -> u64 {
        self.staker_index(staker)
            .map(|i| self.stakers[i].amount)
            .unwrap_or(0)
    }

    /// Staker at a roster index, in first-deposit order
    pub fn staker_at(&self, index: usize) -> Option<Pubkey> {
        self.stakers.get(index).map(|e| e.staker)
    }

    /// Number of roster entries
    pub fn staker_count(&self) -> usize {
        self.stakers.len()
    }

    pub fn is_open(&self) -> bool {
        self.state == PoolState::Open
    }

    // =========================================================================
    // UPKEEP DECISION
    // =========================================================================

    /// Pure upkeep predicate: is a scheduled transition due at `now`?
    ///
    /// True only while the pool is open, has at least one staker with a
    /// non-zero total, AND either a reward epoch has elapsed since the last
    /// transition or the pool's lifetime is over. Never mutates; safe to
    /// call arbitrarily often by any party.
    pub fn upkeep_needed(&self, now: i64) -> bool {
        self.state == PoolState::Open
            && !self.stakers.is_empty()
            && self.total_staked() > 0
            && (now.saturating_sub(self.last_transition_ts) >= self.reward_interval
                || now >= self.end_time)
    }

    /// Has the pool's lifetime elapsed at `now`?
    pub fn settlement_due(&self, now: i64) -> bool {
        now >= self.end_time
    }

    // =========================================================================
    // STATE TRANSITIONS
    // =========================================================================

    /// Admit a deposit of `amount` from `staker` at time `now`.
    ///
    /// Returns `true` when this deposit lands the pool exactly at capacity,
    /// which closes it to further admission.
    pub fn enter(&mut self, staker: Pubkey, amount: u64, now: i64) -> Result<bool> {
        require!(amount >= self.minimum_stake, ErrorCode::BelowMinimumStake);

        let new_total = self
            .total_staked()
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        require!(new_total <= self.capacity, ErrorCode::PoolFull);
        require!(self.state == PoolState::Open, ErrorCode::PoolNotOpen);

        match self.staker_index(&staker) {
            Some(i) => {
                self.stakers[i].amount = self.stakers[i]
                    .amount
                    .checked_add(amount)
                    .ok_or(ErrorCode::MathOverflow)?;
            }
            None => {
                require!(
                    self.stakers.len() < MAX_STAKERS,
                    ErrorCode::StakerLimitReached
                );
                self.stakers.push(StakeEntry { staker, amount });
            }
        }

        self.last_transition_ts = now;

        if new_total == self.capacity {
            self.state = PoolState::Closed;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Re-validate the upkeep condition and record the transition time.
    /// Returns which branch the caller must execute.
    pub fn begin_upkeep(&mut self, now: i64) -> Result<UpkeepAction> {
        require!(self.upkeep_needed(now), ErrorCode::UpkeepNotNeeded);
        self.last_transition_ts = now;
        if self.settlement_due(now) {
            Ok(UpkeepAction::Settlement)
        } else {
            Ok(UpkeepAction::EpochRewards)
        }
    }

    /// Credit every roster entry with `floor(amount * reward_percent / 100)`.
    /// Returns the total credited. Does not touch `state` or the
    /// transition timestamp; the source of reward value is the vault.
    pub fn apply_rewards(&mut self) -> Result<u64> {
        let percent = self.reward_percent;
        let mut total_credited: u64 = 0;
        for entry in self.stakers.iter_mut() {
            let credit = Self::reward_for(entry.amount, percent);
            entry.amount = entry
                .amount
                .checked_add(credit)
                .ok_or(ErrorCode::MathOverflow)?;
            total_credited = total_credited
                .checked_add(credit)
                .ok_or(ErrorCode::MathOverflow)?;
        }
        Ok(total_credited)
    }

    /// Per-entry epoch reward, floored
    pub fn reward_for(amount: u64, percent: u8) -> u64 {
        ((amount as u128 * percent as u128) / 100) as u64
    }

    /// Debit `amount` from a staker's claim.
    /// The roster entry stays in place; a zeroed entry keeps its index.
    pub fn debit(&mut self, staker: &Pubkey, amount: u64) -> Result<()> {
        let i = self
            .staker_index(staker)
            .ok_or(ErrorCode::InsufficientBalance)?;
        let entry = &mut self.stakers[i];
        require!(amount <= entry.amount, ErrorCode::InsufficientBalance);
        entry.amount -= amount;
        Ok(())
    }

    /// Zero the claim at a roster index and return what it held.
    /// Settlement pays each claim out through the vault right after taking it;
    /// an aborted settlement discards the zeroing along with everything else.
    pub fn take_payout(&mut self, index: usize) -> u64 {
        let amount = self.stakers[index].amount;
        self.stakers[index].amount = 0;
        amount
    }

    /// Close the pool to further admission
    pub fn close(&mut self) {
        self.state = PoolState::Closed;
    }
}

/// Which branch a due upkeep must execute
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UpkeepAction {
    /// Credit the per-epoch reward percentage to every staker
    EpochRewards,
    /// Pay out and zero every claim, then close the pool
    Settlement,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Base units of a 9-decimals mint: 0.01 = 10_000_000
    const UNIT: u64 = 1_000_000_000;
    const CENTI: u64 = UNIT / 100;

    fn pk(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    fn open_pool(
        minimum_stake: u64,
        capacity: u64,
        reward_interval: i64,
        lifetime: i64,
        reward_percent: u8,
    ) -> Pool {
        Pool {
            authority: pk(0xAA),
            stake_mint: pk(0xBB),
            minimum_stake,
            capacity,
            reward_interval,
            end_time: lifetime,
            reward_percent,
            state: PoolState::Open,
            created_at: 0,
            last_transition_ts: 0,
            stakers: Vec::new(),
            bump: 255,
        }
    }

    #[test]
    fn third_deposit_reaches_capacity_and_closes_the_pool() {
        let mut pool = open_pool(CENTI, 3 * CENTI, 30, 600, 5);

        assert!(!pool.enter(pk(1), CENTI, 1).unwrap());
        assert!(!pool.enter(pk(2), CENTI, 2).unwrap());
        assert!(pool.enter(pk(3), CENTI, 3).unwrap());

        assert_eq!(pool.state, PoolState::Closed);
        assert_eq!(pool.total_staked(), 3 * CENTI);

        let err = pool.enter(pk(4), CENTI, 4).unwrap_err();
        assert_eq!(err, ErrorCode::PoolFull.into());
        assert_eq!(pool.staker_count(), 3);
        assert_eq!(pool.total_staked(), 3 * CENTI);
    }

    #[test]
    fn overfull_deposit_is_rejected_without_any_ledger_change() {
        let mut pool = open_pool(CENTI, 3 * CENTI, 30, 600, 5);
        pool.enter(pk(1), CENTI, 1).unwrap();
        pool.enter(pk(2), CENTI, 2).unwrap();

        let err = pool.enter(pk(3), 2 * CENTI, 3).unwrap_err();
        assert_eq!(err, ErrorCode::PoolFull.into());
        assert_eq!(pool.staker_count(), 2);
        assert_eq!(pool.staker_amount(&pk(1)), CENTI);
        assert_eq!(pool.staker_amount(&pk(2)), CENTI);
        assert_eq!(pool.state, PoolState::Open);
    }

    #[test]
    fn deposits_below_minimum_are_rejected() {
        let mut pool = open_pool(CENTI, 3 * CENTI, 30, 600, 5);

        let err = pool.enter(pk(1), 0, 1).unwrap_err();
        assert_eq!(err, ErrorCode::BelowMinimumStake.into());

        let err = pool.enter(pk(1), CENTI - 1, 1).unwrap_err();
        assert_eq!(err, ErrorCode::BelowMinimumStake.into());

        assert_eq!(pool.staker_count(), 0);
        assert_eq!(pool.total_staked(), 0);
        assert_eq!(pool.last_transition_ts, 0);
    }

    #[test]
    fn settled_pool_rejects_deposits_as_not_open() {
        let mut pool = open_pool(CENTI, UNIT, 30, 60, 5);
        pool.enter(pk(1), CENTI, 0).unwrap();

        assert_eq!(pool.begin_upkeep(61).unwrap(), UpkeepAction::Settlement);
        pool.take_payout(0);
        pool.close();

        let err = pool.enter(pk(2), CENTI, 62).unwrap_err();
        assert_eq!(err, ErrorCode::PoolNotOpen.into());
    }

    #[test]
    fn repeat_deposit_reuses_the_roster_entry() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 5);
        pool.enter(pk(1), CENTI, 1).unwrap();
        pool.enter(pk(1), CENTI, 2).unwrap();

        assert_eq!(pool.staker_count(), 1);
        assert_eq!(pool.staker_amount(&pk(1)), 2 * CENTI);
        assert_eq!(pool.staker_at(0), Some(pk(1)));
    }

    #[test]
    fn roster_is_bounded() {
        let mut pool = open_pool(1, u64::MAX / 2, 30, 600, 5);
        for i in 0..MAX_STAKERS {
            pool.enter(pk(i as u8), 1, 0).unwrap();
        }
        let err = pool.enter(pk(MAX_STAKERS as u8), 1, 0).unwrap_err();
        assert_eq!(err, ErrorCode::StakerLimitReached.into());

        // an existing staker can still top up
        pool.enter(pk(0), 1, 0).unwrap();
        assert_eq!(pool.staker_amount(&pk(0)), 2);
    }

    #[test]
    fn upkeep_fires_after_one_reward_interval() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 5);
        pool.enter(pk(1), CENTI, 0).unwrap();

        assert!(!pool.upkeep_needed(29));
        assert!(pool.upkeep_needed(30));
        assert!(pool.upkeep_needed(31));

        assert_eq!(pool.begin_upkeep(31).unwrap(), UpkeepAction::EpochRewards);
        pool.apply_rewards().unwrap();

        assert_eq!(pool.staker_amount(&pk(1)), 10_500_000); // 0.0105
        assert_eq!(pool.state, PoolState::Open);
        assert_eq!(pool.last_transition_ts, 31);
    }

    #[test]
    fn upkeep_predicate_is_pure_and_deterministic() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 5);
        pool.enter(pk(1), CENTI, 0).unwrap();

        let snapshot = pool.stakers.clone();
        for _ in 0..100 {
            assert!(pool.upkeep_needed(31));
            assert!(!pool.upkeep_needed(29));
        }
        assert_eq!(pool.last_transition_ts, 0);
        assert_eq!(pool.state, PoolState::Open);
        assert_eq!(pool.stakers.len(), snapshot.len());
        assert_eq!(pool.total_staked(), CENTI);
    }

    #[test]
    fn upkeep_requires_stakers_and_a_nonzero_total() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 5);
        assert!(!pool.upkeep_needed(1000)); // empty roster

        pool.enter(pk(1), CENTI, 0).unwrap();
        pool.debit(&pk(1), CENTI).unwrap();
        assert!(!pool.upkeep_needed(1000)); // roster entry with zero claim
    }

    #[test]
    fn end_of_life_settles_all_claims_and_closes() {
        let mut pool = open_pool(CENTI, UNIT, 30, 60, 5);
        pool.enter(pk(1), CENTI, 0).unwrap();
        pool.enter(pk(2), CENTI, 1).unwrap();

        assert!(pool.upkeep_needed(61));
        assert_eq!(pool.begin_upkeep(61).unwrap(), UpkeepAction::Settlement);

        assert_eq!(pool.take_payout(0), CENTI);
        assert_eq!(pool.take_payout(1), CENTI);
        pool.close();

        assert_eq!(pool.staker_amount(&pk(1)), 0);
        assert_eq!(pool.staker_amount(&pk(2)), 0);
        assert_eq!(pool.total_staked(), 0);
        assert_eq!(pool.state, PoolState::Closed);
        assert_eq!(pool.last_transition_ts, 61);
    }

    #[test]
    fn settlement_takes_precedence_when_both_conditions_hold() {
        let mut pool = open_pool(CENTI, UNIT, 30, 60, 5);
        pool.enter(pk(1), CENTI, 0).unwrap();

        // 61s past the last transition: epoch boundary AND end of life
        assert_eq!(pool.begin_upkeep(61).unwrap(), UpkeepAction::Settlement);
    }

    #[test]
    fn premature_upkeep_is_rejected_and_changes_nothing() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 5);
        pool.enter(pk(1), CENTI, 5).unwrap();

        let err = pool.begin_upkeep(20).unwrap_err();
        assert_eq!(err, ErrorCode::UpkeepNotNeeded.into());
        assert_eq!(pool.last_transition_ts, 5);
        assert_eq!(pool.staker_amount(&pk(1)), CENTI);
        assert_eq!(pool.state, PoolState::Open);
    }

    #[test]
    fn rewards_floor_toward_zero() {
        assert_eq!(Pool::reward_for(19, 5), 0);
        assert_eq!(Pool::reward_for(20, 5), 1);
        assert_eq!(Pool::reward_for(10_000_000, 5), 500_000);
        assert_eq!(Pool::reward_for(u64::MAX, 100), u64::MAX);
        assert_eq!(Pool::reward_for(0, 100), 0);
    }

    #[test]
    fn manual_rewards_credit_every_staker() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 10);
        pool.enter(pk(1), CENTI, 0).unwrap();
        pool.enter(pk(2), 2 * CENTI, 1).unwrap();

        let credited = pool.apply_rewards().unwrap();
        assert_eq!(credited, 3_000_000);
        assert_eq!(pool.staker_amount(&pk(1)), 11_000_000);
        assert_eq!(pool.staker_amount(&pk(2)), 22_000_000);
        assert_eq!(pool.last_transition_ts, 1);
        assert_eq!(pool.state, PoolState::Open);
    }

    #[test]
    fn debit_rejects_overdraws_without_touching_the_entry() {
        let mut pool = open_pool(CENTI, UNIT, 30, 600, 5);
        pool.enter(pk(1), CENTI, 0).unwrap();

        let err = pool.debit(&pk(1), CENTI + 1).unwrap_err();
        assert_eq!(err, ErrorCode::InsufficientBalance.into());
        assert_eq!(pool.staker_amount(&pk(1)), CENTI);

        let err = pool.debit(&pk(2), 1).unwrap_err();
        assert_eq!(err, ErrorCode::InsufficientBalance.into());

        pool.debit(&pk(1), CENTI).unwrap();
        assert_eq!(pool.staker_amount(&pk(1)), 0);
    }

    #[test]
    fn withdrawal_is_allowed_after_capacity_closure() {
        let mut pool = open_pool(CENTI, 2 * CENTI, 30, 600, 5);
        pool.enter(pk(1), 2 * CENTI, 0).unwrap();
        assert_eq!(pool.state, PoolState::Closed);

        pool.debit(&pk(1), CENTI).unwrap();
        assert_eq!(pool.staker_amount(&pk(1)), CENTI);
    }

    #[test]
    fn parameter_validation_rejects_misconfiguration() {
        assert!(Pool::validate_params(CENTI, 30, 60, 5, 3 * CENTI).is_ok());
        assert!(Pool::validate_params(CENTI, 30, 60, 0, 3 * CENTI).is_ok());
        assert!(Pool::validate_params(CENTI, 30, 60, 100, 3 * CENTI).is_ok());

        let err = Pool::validate_params(0, 30, 60, 5, UNIT).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidAmount.into());
        let err = Pool::validate_params(CENTI, 0, 60, 5, UNIT).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidDuration.into());
        let err = Pool::validate_params(CENTI, 30, 0, 5, UNIT).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidDuration.into());
        let err = Pool::validate_params(CENTI, 30, 60, 101, UNIT).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidRewardPercent.into());
        let err = Pool::validate_params(UNIT, 30, 60, 5, CENTI).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidAmount.into());
    }

    proptest! {
        #[test]
        fn admission_never_exceeds_capacity(
            deposits in prop::collection::vec((0u8..8, 0u64..60_000_000), 0..48)
        ) {
            let mut pool = open_pool(CENTI, 10 * CENTI, 30, 600, 5);
            for (who, amount) in deposits {
                let _ = pool.enter(pk(who), amount, 0);
                prop_assert!(pool.total_staked() <= pool.capacity);
            }
        }

        #[test]
        fn rejected_deposits_leave_the_ledger_untouched(
            amount in 0u64..200_000_000
        ) {
            let mut pool = open_pool(CENTI, 3 * CENTI, 30, 600, 5);
            pool.enter(pk(1), CENTI, 0).unwrap();
            let before = pool.staker_amount(&pk(1));

            if pool.enter(pk(2), amount, 1).is_err() {
                prop_assert_eq!(pool.staker_amount(&pk(1)), before);
                prop_assert_eq!(pool.staker_amount(&pk(2)), 0);
                prop_assert_eq!(pool.staker_count(), 1);
            }
        }
    }
}
