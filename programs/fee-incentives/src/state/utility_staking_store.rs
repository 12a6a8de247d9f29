use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    account_validation::DISCRIMINATOR_SIZE,
    error::IncentivesError,
    state::ProgramAccount,
};

/// Staked utility asset for one utility mint.
/// Tokens sit in the treasury authority's associated token account for the mint.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct UtilityStakingStore {
    pub utility_mint: Pubkey,
    pub balance: u64,
    pub bump: u8,
}

impl ProgramAccount for UtilityStakingStore {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = [85, 84, 73, 76, 95, 83, 84, 75]; // "UTIL_STK"

    const LEN: usize = DISCRIMINATOR_SIZE + 32 + 8 + 1;
}

impl UtilityStakingStore {
    pub fn new(utility_mint: Pubkey, bump: u8) -> Self {
        Self {
            utility_mint,
            balance: 0,
            bump,
        }
    }

    pub fn deposit(&mut self, amount: u64) -> Result<(), IncentivesError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(IncentivesError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Debit `amount`, or the whole balance when `None`. Returns the amount debited.
    pub fn withdraw(&mut self, amount: Option<u64>) -> Result<u64, IncentivesError> {
        let amount = amount.unwrap_or(self.balance);
        if amount > self.balance {
            msg!("Requested {} utility units, store holds {}", amount, self.balance);
            return Err(IncentivesError::InsufficientFeeBalance);
        }
        self.balance -= amount;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_withdraw() {
        let mut store = UtilityStakingStore::new(Pubkey::new_unique(), 250);
        store.deposit(4000).unwrap();
        store.deposit(5000).unwrap();
        assert_eq!(store.balance, 9000);

        assert_eq!(store.withdraw(Some(1000)).unwrap(), 1000);
        assert_eq!(store.withdraw(Some(9000)), Err(IncentivesError::InsufficientFeeBalance));
        assert_eq!(store.withdraw(None).unwrap(), 8000);
        assert_eq!(store.balance, 0);
    }

    #[test]
    fn test_deposit_overflow() {
        let mut store = UtilityStakingStore::new(Pubkey::new_unique(), 250);
        store.deposit(u64::MAX).unwrap();
        assert_eq!(store.deposit(1), Err(IncentivesError::ArithmeticOverflow));
        assert_eq!(store.balance, u64::MAX);
    }
}
