use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    account_validation::DISCRIMINATOR_SIZE,
    error::IncentivesError,
    state::ProgramAccount,
};

/// Protocol's share of taker fees for one market
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProtocolFeeLedger {
    pub market_id: u64,
    /// Quote mint of the market, fixed at first fee event
    pub quote_mint: Pubkey,
    pub balance: u64,
    pub bump: u8,
}

impl ProtocolFeeLedger {
    pub fn new(market_id: u64, quote_mint: Pubkey, bump: u8) -> Self {
        Self {
            market_id,
            quote_mint,
            balance: 0,
            bump,
        }
    }

    pub fn check_quote_mint(&self, quote_mint: &Pubkey) -> Result<(), IncentivesError> {
        if self.quote_mint != *quote_mint {
            msg!(
                "Market {} settles in {}, got {}",
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

    /// Debit `amount`, or the whole balance when `None`. Returns the amount debited.
    pub fn withdraw(&mut self, amount: Option<u64>) -> Result<u64, IncentivesError> {
        let amount = amount.unwrap_or(self.balance);
        if amount > self.balance {
            msg!(
                "Requested {} from market {}, ledger holds {}",
                amount,
                self.market_id,
                self.balance
            );
            return Err(IncentivesError::InsufficientFeeBalance);
        }
        self.balance -= amount;
        Ok(amount)
    }
}

impl ProgramAccount for ProtocolFeeLedger {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = [80, 82, 79, 84, 95, 70, 69, 69]; // "PROT_FEE"

    const LEN: usize = DISCRIMINATOR_SIZE + 8 + 32 + 8 + 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_partial_withdraw() {
        let mut ledger = ProtocolFeeLedger::new(7, Pubkey::new_unique(), 255);
        ledger.credit(250).unwrap();
        ledger.credit(167).unwrap();
        assert_eq!(ledger.balance, 417);

        assert_eq!(ledger.withdraw(Some(500)), Err(IncentivesError::InsufficientFeeBalance));
        assert_eq!(ledger.withdraw(Some(17)).unwrap(), 17);
        assert_eq!(ledger.withdraw(None).unwrap(), 400);
        assert_eq!(ledger.balance, 0);
    }

    #[test]
    fn test_quote_mint_is_pinned() {
        let quote_mint = Pubkey::new_unique();
        let ledger = ProtocolFeeLedger::new(1, quote_mint, 255);
        assert!(ledger.check_quote_mint(&quote_mint).is_ok());
        assert_eq!(
            ledger.check_quote_mint(&Pubkey::new_unique()),
            Err(IncentivesError::QuoteAssetMismatch)
        );
    }
}
