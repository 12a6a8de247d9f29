use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    account_validation::DISCRIMINATOR_SIZE,
    engine::IncentiveEngine,
    error::IncentivesError,
    state::{ProgramAccount, TierSchedule},
};

/// Integrator tier and accrued fee share for one market
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct IntegratorFeeLedger {
    pub integrator: Pubkey,
    pub market_id: u64,
    pub quote_mint: Pubkey,
    /// Starts at 0, only raised by `apply_upgrade`
    pub tier: u8,
    pub balance: u64,
    pub bump: u8,
}

impl ProgramAccount for IntegratorFeeLedger {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = [73, 78, 84, 71, 95, 70, 69, 69]; // "INTG_FEE"

    const LEN: usize = DISCRIMINATOR_SIZE +
        32 + // integrator
        8 + // market_id
        32 + // quote_mint
        1 + // tier
        8 + // balance
        1; // bump
}

impl IntegratorFeeLedger {
    pub fn new(integrator: Pubkey, market_id: u64, quote_mint: Pubkey, bump: u8) -> Self {
        Self {
            integrator,
            market_id,
            quote_mint,
            tier: 0,
            balance: 0,
            bump,
        }
    }

    pub fn check_quote_mint(&self, quote_mint: &Pubkey) -> Result<(), IncentivesError> {
        if self.quote_mint != *quote_mint {
            msg!(
                "Integrator ledger for market {} settles in {}, got {}",
                self.market_id,
                self.quote_mint,
                quote_mint
            );
            return Err(IncentivesError::QuoteAssetMismatch);
        }
        Ok(())
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), IncentivesError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(IncentivesError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Check an upgrade to `target_tier` paid with `utility_payment`.
    /// Returns the required cost; the ledger is not touched.
    pub fn check_upgrade(
        &self,
        schedule: &TierSchedule,
        target_tier: u8,
        utility_payment: u64,
    ) -> Result<u64, IncentivesError> {
        let required = IncentiveEngine::upgrade_cost(schedule, self.tier, target_tier)?;
        if utility_payment < required {
            msg!(
                "Upgrade to tier {} costs {}, offered {}",
                target_tier,
                required,
                utility_payment
            );
            return Err(IncentivesError::InsufficientUtilityPayment);
        }
        Ok(required)
    }

    pub fn apply_upgrade(&mut self, target_tier: u8) {
        self.tier = target_tier;
    }

    /// Check a withdrawal paid with `utility_payment`. Returns the withdrawal cost.
    pub fn check_withdrawal(
        &self,
        schedule: &TierSchedule,
        utility_payment: u64,
    ) -> Result<u64, IncentivesError> {
        let cost = schedule.tier(self.tier)?.withdrawal_cost;
        if utility_payment < cost {
            msg!(
                "Withdrawal at tier {} costs {}, offered {}",
                self.tier,
                cost,
                utility_payment
            );
            return Err(IncentivesError::InsufficientUtilityPayment);
        }
        Ok(cost)
    }

    /// Zero the balance and return what it held
    pub fn take_balance(&mut self) -> u64 {
        std::mem::take(&mut self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> TierSchedule {
        TierSchedule::validate(
            &[
                vec![4000, 1000, 10000],
                vec![3000, 5000, 5000],
                vec![2500, 9000, 2500],
            ],
            2000,
        )
        .unwrap()
    }

    fn ledger() -> IntegratorFeeLedger {
        IntegratorFeeLedger::new(Pubkey::new_unique(), 3, Pubkey::new_unique(), 255)
    }

    #[test]
    fn test_new_ledger_starts_at_entry_tier() {
        let ledger = ledger();
        assert_eq!(ledger.tier, 0);
        assert_eq!(ledger.balance, 0);
    }

    #[test]
    fn test_upgrade_requires_activation_cost_difference() {
        let mut ledger = ledger();
        let schedule = schedule();

        assert_eq!(
            ledger.check_upgrade(&schedule, 1, 3999),
            Err(IncentivesError::InsufficientUtilityPayment)
        );
        assert_eq!(ledger.tier, 0);

        assert_eq!(ledger.check_upgrade(&schedule, 1, 4000).unwrap(), 4000);
        ledger.apply_upgrade(1);
        assert_eq!(ledger.tier, 1);

        assert_eq!(ledger.check_upgrade(&schedule, 2, 10_000).unwrap(), 4000);
    }

    #[test]
    fn test_upgrade_rejects_tier_skip_regardless_of_payment() {
        let ledger = ledger();
        assert_eq!(
            ledger.check_upgrade(&schedule(), 2, u64::MAX),
            Err(IncentivesError::TierSkip)
        );
        assert_eq!(
            ledger.check_upgrade(&schedule(), 0, u64::MAX),
            Err(IncentivesError::TierSkip)
        );
    }

    #[test]
    fn test_upgrade_past_last_tier() {
        let mut ledger = ledger();
        ledger.apply_upgrade(2);
        assert_eq!(
            ledger.check_upgrade(&schedule(), 3, u64::MAX),
            Err(IncentivesError::InvalidTier)
        );
    }

    #[test]
    fn test_withdrawal_cost_follows_tier() {
        let mut ledger = ledger();
        ledger.apply_upgrade(1);
        ledger.credit(800).unwrap();

        assert_eq!(
            ledger.check_withdrawal(&schedule(), 4999),
            Err(IncentivesError::InsufficientUtilityPayment)
        );
        assert_eq!(ledger.balance, 800);

        assert_eq!(ledger.check_withdrawal(&schedule(), 5000).unwrap(), 5000);
        assert_eq!(ledger.take_balance(), 800);
        assert_eq!(ledger.balance, 0);
    }
}
