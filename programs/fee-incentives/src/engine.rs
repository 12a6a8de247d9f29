use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;

use crate::{
    error::IncentivesError,
    state::{IncentiveParameters, TierSchedule},
};

/// Split of one fill's taker fee
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeOutcome {
    /// Total deducted from the taker's proceeds
    pub nominal_fee: u64,
    pub protocol_share: u64,
    pub integrator_share: u64,
}

/// Side of the taker's fill
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

/// Fee arithmetic. Every function is a pure function of its arguments.
pub struct IncentiveEngine;

impl IncentiveEngine {
    /// `quote_amount_filled / taker_fee_divisor`, truncating
    pub fn nominal_fee(quote_amount_filled: u64, taker_fee_divisor: u64) -> Result<u64, IncentivesError> {
        quote_amount_filled
            .checked_div(taker_fee_divisor)
            .ok_or(IncentivesError::TakerFeeDivisorTooSmall)
    }

    /// Split the taker fee of a fill between protocol and integrator.
    ///
    /// With no integrator the protocol keeps the whole nominal fee. Otherwise the
    /// integrator receives `quote_amount_filled / fee_share_divisor` of its tier.
    /// Every tier divisor is at least the taker divisor, so the integrator share
    /// never exceeds the nominal fee.
    pub fn assess(
        params: &IncentiveParameters,
        quote_amount_filled: u64,
        integrator_tier: Option<u8>,
    ) -> Result<FeeOutcome, IncentivesError> {
        let nominal_fee = Self::nominal_fee(quote_amount_filled, params.taker_fee_divisor)?;

        let integrator_share = match integrator_tier {
            Some(tier) => {
                let fee_share_divisor = params.tier(tier)?.fee_share_divisor;
                quote_amount_filled / fee_share_divisor
            }
            None => 0,
        };
        debug_assert!(integrator_share <= nominal_fee);

        Ok(FeeOutcome {
            nominal_fee,
            protocol_share: nominal_fee - integrator_share,
            integrator_share,
        })
    }

    /// Utility cost of moving from `current_tier` to `target_tier`.
    /// Upgrades go exactly one tier at a time.
    pub fn upgrade_cost(
        schedule: &TierSchedule,
        current_tier: u8,
        target_tier: u8,
    ) -> Result<u64, IncentivesError> {
        if current_tier.checked_add(1) != Some(target_tier) {
            msg!("Cannot upgrade from tier {} to tier {}", current_tier, target_tier);
            return Err(IncentivesError::TierSkip);
        }
        let target = schedule.tier(target_tier)?;
        let current = schedule.tier(current_tier)?;
        target
            .activation_cost
            .checked_sub(current.activation_cost)
            .ok_or(IncentivesError::ArithmeticOverflow)
    }

    /// Largest quote amount a taker can match within `max_quote_delta_user`.
    ///
    /// A buy pays quote plus fee, so `match + match / divisor <= delta`.
    /// A sell receives quote minus fee, so `match - match / divisor >= delta`.
    pub fn max_quote_match(
        direction: Direction,
        taker_fee_divisor: u64,
        max_quote_delta_user: u64,
    ) -> Result<u64, IncentivesError> {
        let denominator = match direction {
            Direction::Buy => (taker_fee_divisor as u128) + 1,
            Direction::Sell => (taker_fee_divisor as u128)
                .checked_sub(1)
                .filter(|d| *d > 0)
                .ok_or(IncentivesError::ArithmeticOverflow)?,
        };
        let max_quote_match = (taker_fee_divisor as u128) * (max_quote_delta_user as u128) / denominator;
        u64::try_from(max_quote_match).map_err(|_| IncentivesError::MaxQuoteMatchOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::pubkey::Pubkey;

    fn params(tiers: &[Vec<u64>]) -> IncentiveParameters {
        IncentiveParameters {
            admin: Pubkey::new_unique(),
            settlement_authority: Pubkey::new_unique(),
            utility_mint: Pubkey::new_unique(),
            market_registration_fee: 1000,
            custodian_registration_fee: 1000,
            taker_fee_divisor: 2000,
            tier_schedule: TierSchedule::validate(tiers, 2000).unwrap(),
            bump: 255,
        }
    }

    fn reference_params() -> IncentiveParameters {
        params(&[vec![4000, 1000, 10000], vec![3000, 5000, 5000]])
    }

    #[test]
    fn test_assess_reference_fill() {
        let params = reference_params();

        let tier0 = IncentiveEngine::assess(&params, 1_000_000, Some(0)).unwrap();
        assert_eq!(
            tier0,
            FeeOutcome { nominal_fee: 500, protocol_share: 250, integrator_share: 250 }
        );

        let tier1 = IncentiveEngine::assess(&params, 1_000_000, Some(1)).unwrap();
        assert_eq!(
            tier1,
            FeeOutcome { nominal_fee: 500, protocol_share: 167, integrator_share: 333 }
        );
    }

    #[test]
    fn test_assess_without_integrator() {
        let outcome = IncentiveEngine::assess(&reference_params(), 1_000_000, None).unwrap();
        assert_eq!(
            outcome,
            FeeOutcome { nominal_fee: 500, protocol_share: 500, integrator_share: 0 }
        );
    }

    #[test]
    fn test_sub_unit_fill_rounds_to_zero() {
        let outcome = IncentiveEngine::assess(&reference_params(), 1999, Some(1)).unwrap();
        assert_eq!(outcome, FeeOutcome::default());
    }

    #[test]
    fn test_shares_always_sum_to_nominal_fee() {
        let params = params(&[
            vec![10000, 1, 100],
            vec![8333, 2, 90],
            vec![7692, 3, 80],
            vec![7143, 4, 70],
            vec![2000, 5, 60],
        ]);
        let amounts = [0, 1, 1999, 2000, 7691, 123_456_789, u64::MAX / 3, u64::MAX];

        for &amount in &amounts {
            for tier in 0..params.tier_schedule.len() as u8 {
                let outcome = IncentiveEngine::assess(&params, amount, Some(tier)).unwrap();
                assert!(outcome.integrator_share <= outcome.nominal_fee);
                assert_eq!(
                    outcome.integrator_share + outcome.protocol_share,
                    outcome.nominal_fee
                );
            }
        }
    }

    #[test]
    fn test_assess_is_deterministic() {
        let params = reference_params();
        let first = IncentiveEngine::assess(&params, 987_654_321, Some(1)).unwrap();
        let second = IncentiveEngine::assess(&params, 987_654_321, Some(1)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assess_unknown_tier() {
        assert_eq!(
            IncentiveEngine::assess(&reference_params(), 1_000_000, Some(2)),
            Err(IncentivesError::InvalidTier)
        );
    }

    #[test]
    fn test_upgrade_cost() {
        let params = reference_params();
        let schedule = &params.tier_schedule;

        assert_eq!(IncentiveEngine::upgrade_cost(schedule, 0, 1).unwrap(), 4000);
        assert_eq!(IncentiveEngine::upgrade_cost(schedule, 0, 2), Err(IncentivesError::TierSkip));
        assert_eq!(IncentiveEngine::upgrade_cost(schedule, 1, 1), Err(IncentivesError::TierSkip));
        assert_eq!(IncentiveEngine::upgrade_cost(schedule, 1, 2), Err(IncentivesError::InvalidTier));
        assert_eq!(IncentiveEngine::upgrade_cost(schedule, u8::MAX, 0), Err(IncentivesError::TierSkip));
    }

    #[test]
    fn test_max_quote_match() {
        // Buy: 2000 * 2001 / 2001
        assert_eq!(IncentiveEngine::max_quote_match(Direction::Buy, 2000, 2001).unwrap(), 2000);
        // Sell: 2000 * 1999 / 1999
        assert_eq!(IncentiveEngine::max_quote_match(Direction::Sell, 2000, 1999).unwrap(), 2000);

        let buy = IncentiveEngine::max_quote_match(Direction::Buy, 2000, 1_000_000).unwrap();
        assert!(buy + buy / 2000 <= 1_000_000);

        assert_eq!(
            IncentiveEngine::max_quote_match(Direction::Sell, 2000, u64::MAX),
            Err(IncentivesError::MaxQuoteMatchOverflow)
        );
        assert_eq!(
            IncentiveEngine::max_quote_match(Direction::Sell, 1, 100),
            Err(IncentivesError::ArithmeticOverflow)
        );
        assert_eq!(IncentiveEngine::max_quote_match(Direction::Buy, 1, 100).unwrap(), 50);
    }
}
