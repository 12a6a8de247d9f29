use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    constants::{
        ACTIVATION_COST_INDEX, FEE_SHARE_DIVISOR_INDEX, MAX_TIERS, MIN_FEE, N_TIER_FIELDS,
        TIER_LEN, WITHDRAWAL_COST_INDEX,
    },
    error::{IncentivesError, TierScheduleError},
};

/// One integrator loyalty tier
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    /// Divisor applied to the filled quote amount for the integrator's share.
    /// Smaller divisor means a larger share.
    pub fee_share_divisor: u64,

    /// Cumulative utility asset cost to reach this tier
    pub activation_cost: u64,

    /// Utility asset cost of one fee withdrawal at this tier
    pub withdrawal_cost: u64,
}

/// Ordered, validated tier schedule. Tier 0 is the entry tier.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct TierSchedule {
    tiers: Vec<Tier>,
}

impl TierSchedule {
    /// Serialized size at full capacity
    pub const MAX_LEN: usize = 4 + MAX_TIERS * TIER_LEN;

    /// Validate raw `[fee_share_divisor, activation_cost, withdrawal_cost]` triples
    /// against the schedule invariants, stopping at the first violation.
    ///
    /// Each tier is compared to the previous one, tier 0 to sentinels:
    /// divisor and withdrawal cost start at `u64::MAX`, activation cost at 0.
    pub fn validate(
        raw_tiers: &[Vec<u64>],
        taker_fee_divisor: u64,
    ) -> Result<Self, TierScheduleError> {
        if raw_tiers.is_empty() {
            return Err(TierScheduleError::new(IncentivesError::EmptyTierSchedule, 0));
        }
        if raw_tiers.len() > MAX_TIERS {
            return Err(TierScheduleError::new(IncentivesError::TooManyTiers, MAX_TIERS));
        }

        let mut divisor_prev = u64::MAX;
        let mut activation_prev = 0u64;
        let mut withdrawal_prev = u64::MAX;
        let mut tiers = Vec::with_capacity(raw_tiers.len());

        for (i, fields) in raw_tiers.iter().enumerate() {
            if fields.len() != N_TIER_FIELDS {
                return Err(TierScheduleError::new(IncentivesError::WrongFieldCount, i));
            }
            let tier = Tier {
                fee_share_divisor: fields[FEE_SHARE_DIVISOR_INDEX],
                activation_cost: fields[ACTIVATION_COST_INDEX],
                withdrawal_cost: fields[WITHDRAWAL_COST_INDEX],
            };

            if tier.fee_share_divisor >= divisor_prev {
                return Err(TierScheduleError::new(IncentivesError::FeeShareDivisorTooLarge, i));
            }
            if tier.fee_share_divisor < taker_fee_divisor {
                return Err(TierScheduleError::new(IncentivesError::FeeShareDivisorTooSmall, i));
            }
            if i == 0 && tier.activation_cost == 0 {
                return Err(TierScheduleError::new(IncentivesError::ActivationFeeTooSmall, i));
            }
            if tier.activation_cost <= activation_prev {
                return Err(TierScheduleError::new(IncentivesError::ActivationFeeNotIncreasing, i));
            }
            if tier.withdrawal_cost >= withdrawal_prev {
                return Err(TierScheduleError::new(IncentivesError::WithdrawalFeeNotDecreasing, i));
            }
            if tier.withdrawal_cost <= MIN_FEE {
                return Err(TierScheduleError::new(IncentivesError::WithdrawalFeeTooSmall, i));
            }

            divisor_prev = tier.fee_share_divisor;
            activation_prev = tier.activation_cost;
            withdrawal_prev = tier.withdrawal_cost;
            tiers.push(tier);
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tier at `index`, or `InvalidTier` if the schedule is shorter
    pub fn tier(&self, index: u8) -> Result<&Tier, IncentivesError> {
        self.tiers
            .get(index as usize)
            .ok_or(IncentivesError::InvalidTier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tiers() -> Vec<Vec<u64>> {
        vec![vec![4000, 1000, 10000], vec![3000, 5000, 5000]]
    }

    fn expect_err(raw: &[Vec<u64>], taker_fee_divisor: u64) -> TierScheduleError {
        TierSchedule::validate(raw, taker_fee_divisor).unwrap_err()
    }

    #[test]
    fn test_valid_schedule_keeps_fields_in_order() {
        let schedule = TierSchedule::validate(&two_tiers(), 2000).unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(
            schedule.tiers()[0],
            Tier { fee_share_divisor: 4000, activation_cost: 1000, withdrawal_cost: 10000 }
        );
        assert_eq!(
            schedule.tiers()[1],
            Tier { fee_share_divisor: 3000, activation_cost: 5000, withdrawal_cost: 5000 }
        );
    }

    #[test]
    fn test_fee_share_divisor_equal_to_taker_divisor_is_allowed() {
        let raw = vec![vec![2000, 1, 2]];
        assert!(TierSchedule::validate(&raw, 2000).is_ok());
    }

    #[test]
    fn test_empty_schedule() {
        let err = expect_err(&[], 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::EmptyTierSchedule, 0));
    }

    #[test]
    fn test_wrong_field_count() {
        let raw = vec![vec![4000, 1000, 10000], vec![3000, 5000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::WrongFieldCount, 1));

        let raw = vec![vec![4000, 1000, 10000, 7]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::WrongFieldCount, 0));
    }

    #[test]
    fn test_fee_share_divisor_must_strictly_decrease() {
        let raw = vec![vec![4000, 1000, 10000], vec![4000, 5000, 5000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::FeeShareDivisorTooLarge, 1));
    }

    #[test]
    fn test_fee_share_divisor_sentinel_rejects_max() {
        let raw = vec![vec![u64::MAX, 1000, 10000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::FeeShareDivisorTooLarge, 0));
    }

    #[test]
    fn test_fee_share_divisor_below_taker_divisor() {
        let raw = vec![vec![4000, 1000, 10000], vec![1999, 5000, 5000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::FeeShareDivisorTooSmall, 1));
    }

    #[test]
    fn test_activation_fee_zero_at_entry_tier() {
        let raw = vec![vec![4000, 0, 10000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::ActivationFeeTooSmall, 0));
    }

    #[test]
    fn test_activation_fee_must_increase() {
        let raw = vec![vec![4000, 1000, 10000], vec![3000, 1000, 5000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::ActivationFeeNotIncreasing, 1));
    }

    #[test]
    fn test_withdrawal_fee_must_decrease() {
        let raw = vec![vec![4000, 1000, 10000], vec![3000, 5000, 10000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::WithdrawalFeeNotDecreasing, 1));
    }

    #[test]
    fn test_withdrawal_fee_must_exceed_min_fee() {
        let raw = vec![vec![4000, 1000, 10000], vec![3000, 5000, MIN_FEE]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::WithdrawalFeeTooSmall, 1));
    }

    #[test]
    fn test_first_violation_wins() {
        // Tier 1 breaks both the divisor and the withdrawal ordering; divisor is checked first
        let raw = vec![vec![4000, 1000, 10000], vec![5000, 5000, 20000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::FeeShareDivisorTooLarge, 1));

        // Tier 1 is bad, tier 2 is also bad; only tier 1 is reported
        let raw = vec![vec![4000, 1000, 10000], vec![3000, 500, 5000], vec![3000, 100, 9000]];
        let err = expect_err(&raw, 2000);
        assert_eq!(err, TierScheduleError::new(IncentivesError::ActivationFeeNotIncreasing, 1));
    }

    #[test]
    fn test_too_many_tiers() {
        let raw: Vec<Vec<u64>> = (0..=MAX_TIERS as u64)
            .map(|i| vec![1_000_000 - i, 1 + i, 10_000 - i])
            .collect();
        let err = expect_err(&raw, 1);
        assert_eq!(err, TierScheduleError::new(IncentivesError::TooManyTiers, MAX_TIERS));

        assert!(TierSchedule::validate(&raw[..MAX_TIERS], 1).is_ok());
    }

    #[test]
    fn test_tier_lookup() {
        let schedule = TierSchedule::validate(&two_tiers(), 2000).unwrap();
        assert_eq!(schedule.tier(1).unwrap().activation_cost, 5000);
        assert_eq!(schedule.tier(2).unwrap_err(), IncentivesError::InvalidTier);
    }
}
