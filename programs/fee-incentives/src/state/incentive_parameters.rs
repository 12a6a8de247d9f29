use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    account_validation::DISCRIMINATOR_SIZE,
    constants::{MIN_DIVISOR, MIN_FEE},
    error::IncentivesError,
    state::{ProgramAccount, Tier, TierSchedule},
};

/// Active incentive configuration. Singleton PDA, created by the first
/// `SetParameters` and replaced wholesale by every later one.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct IncentiveParameters {
    /// Program upgrade authority at creation; the only key allowed to reconfigure
    pub admin: Pubkey,

    /// Only signer allowed to report fills
    pub settlement_authority: Pubkey,

    /// Mint of the utility asset that pays for tiers, withdrawals and registrations
    pub utility_mint: Pubkey,

    /// Utility units charged to register a market
    pub market_registration_fee: u64,

    /// Utility units charged to register a custodian
    pub custodian_registration_fee: u64,

    /// Nominal fee is `quote_amount_filled / taker_fee_divisor`
    pub taker_fee_divisor: u64,

    pub tier_schedule: TierSchedule,

    pub bump: u8,
}

impl ProgramAccount for IncentiveParameters {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = [73, 78, 67, 95, 80, 65, 82, 77]; // "INC_PARM"

    const LEN: usize = DISCRIMINATOR_SIZE +
        32 + // admin
        32 + // settlement_authority
        32 + // utility_mint
        8 + // market_registration_fee
        8 + // custodian_registration_fee
        8 + // taker_fee_divisor
        TierSchedule::MAX_LEN +
        1; // bump
}

impl IncentiveParameters {
    /// Check the flat fees and divisor against their protocol minimums
    pub fn validate_flat_fees(
        market_registration_fee: u64,
        custodian_registration_fee: u64,
        taker_fee_divisor: u64,
    ) -> Result<(), IncentivesError> {
        if market_registration_fee < MIN_FEE {
            msg!("Market registration fee {} below minimum {}", market_registration_fee, MIN_FEE);
            return Err(IncentivesError::MarketRegistrationFeeTooSmall);
        }
        if custodian_registration_fee < MIN_FEE {
            msg!("Custodian registration fee {} below minimum {}", custodian_registration_fee, MIN_FEE);
            return Err(IncentivesError::CustodianRegistrationFeeTooSmall);
        }
        if taker_fee_divisor < MIN_DIVISOR {
            msg!("Taker fee divisor {} below minimum {}", taker_fee_divisor, MIN_DIVISOR);
            return Err(IncentivesError::TakerFeeDivisorTooSmall);
        }
        Ok(())
    }

    /// A replacement schedule may not drop tiers integrators may already hold
    pub fn check_replacement_schedule(&self, replacement: &TierSchedule) -> Result<(), IncentivesError> {
        if replacement.len() < self.tier_schedule.len() {
            msg!(
                "Replacement schedule has {} tiers, current has {}",
                replacement.len(),
                self.tier_schedule.len()
            );
            return Err(IncentivesError::FewerTiers);
        }
        Ok(())
    }

    pub fn tier(&self, index: u8) -> Result<&Tier, IncentivesError> {
        self.tier_schedule.tier(index)
    }

    /// Registration fee owed for `kind`
    pub fn registration_fee(&self, kind: RegistrationKind) -> u64 {
        match kind {
            RegistrationKind::Market => self.market_registration_fee,
            RegistrationKind::Custodian => self.custodian_registration_fee,
        }
    }

    pub fn is_admin(&self, key: &Pubkey) -> bool {
        self.admin == *key
    }

    pub fn is_settlement_authority(&self, key: &Pubkey) -> bool {
        self.settlement_authority == *key
    }
}

/// What a registration fee is being paid for
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    Market,
    Custodian,
}
