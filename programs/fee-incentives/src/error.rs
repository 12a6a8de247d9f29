use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, FromPrimitive, PartialEq, Eq)]
pub enum IncentivesError {
    #[error("Caller is not the protocol administrator")]
    NotAuthorized = 0,

    #[error("Utility asset is not an initialized mint")]
    AssetNotInitialized = 1,

    #[error("Tier schedule is empty")]
    EmptyTierSchedule = 2,

    #[error("Tier does not have exactly three fields")]
    WrongFieldCount = 3,

    #[error("Fee share divisor does not decrease")]
    FeeShareDivisorTooLarge = 4,

    #[error("Fee share divisor is below the taker fee divisor")]
    FeeShareDivisorTooSmall = 5,

    #[error("Activation fee does not increase")]
    ActivationFeeNotIncreasing = 6,

    #[error("Activation fee is too small")]
    ActivationFeeTooSmall = 7,

    #[error("Withdrawal fee does not decrease")]
    WithdrawalFeeNotDecreasing = 8,

    #[error("Withdrawal fee is too small")]
    WithdrawalFeeTooSmall = 9,

    #[error("Tier upgrades must go one tier at a time")]
    TierSkip = 10,

    #[error("Insufficient utility asset payment")]
    InsufficientUtilityPayment = 11,

    #[error("Market registration fee is too small")]
    MarketRegistrationFeeTooSmall = 12,

    #[error("Custodian registration fee is too small")]
    CustodianRegistrationFeeTooSmall = 13,

    #[error("Taker fee divisor is too small")]
    TakerFeeDivisorTooSmall = 14,

    #[error("Too many tiers")]
    TooManyTiers = 15,

    #[error("New schedule has fewer tiers than the current one")]
    FewerTiers = 16,

    #[error("Tier does not exist")]
    InvalidTier = 17,

    #[error("Wrong utility asset")]
    InvalidUtilityAsset = 18,

    #[error("Quote asset does not match the market")]
    QuoteAssetMismatch = 19,

    #[error("Account not initialized")]
    NotInitialized = 20,

    #[error("Invalid PDA")]
    InvalidPda = 21,

    #[error("Insufficient fee balance")]
    InsufficientFeeBalance = 22,

    #[error("Max quote match overflows u64")]
    MaxQuoteMatchOverflow = 23,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 24,

    #[error("Invalid instruction")]
    InvalidInstruction = 25,
}

impl PrintProgramError for IncentivesError {
    fn print<E>(&self) {
        use solana_program::msg;
        msg!("IncentivesError: {}", self);
    }
}

impl From<IncentivesError> for ProgramError {
    fn from(e: IncentivesError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for IncentivesError {
    fn type_of() -> &'static str {
        "IncentivesError"
    }
}

/// Tier schedule rejection, naming the first offending tier
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("{kind} (tier {tier})")]
pub struct TierScheduleError {
    pub kind: IncentivesError,
    pub tier: usize,
}

impl TierScheduleError {
    pub fn new(kind: IncentivesError, tier: usize) -> Self {
        Self { kind, tier }
    }
}

impl From<TierScheduleError> for ProgramError {
    fn from(e: TierScheduleError) -> Self {
        solana_program::msg!("Tier schedule rejected: {}", e);
        e.kind.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn test_error_codes_round_trip_through_program_error() {
        let err: ProgramError = IncentivesError::TierSkip.into();
        assert_eq!(err, ProgramError::Custom(10));

        let decoded = IncentivesError::from_u32(11).unwrap();
        assert_eq!(decoded, IncentivesError::InsufficientUtilityPayment);
    }

    #[test]
    fn test_tier_schedule_error_keeps_kind() {
        let err = TierScheduleError::new(IncentivesError::WithdrawalFeeTooSmall, 2);
        assert_eq!(err.to_string(), "Withdrawal fee is too small (tier 2)");

        let program_err: ProgramError = err.into();
        assert_eq!(program_err, ProgramError::Custom(9));
    }
}
