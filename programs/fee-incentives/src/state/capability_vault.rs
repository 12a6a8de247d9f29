use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    account_validation::DISCRIMINATOR_SIZE,
    cpi,
    error::IncentivesError,
    pda::{seeds, TreasuryAuthorityPDA},
    state::ProgramAccount,
};

/// Custody record for the treasury credential. Created exactly once, lazily,
/// by the first successful `SetParameters`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CapabilityVault {
    /// PDA that owns every protocol token account
    pub treasury_authority: Pubkey,
    pub treasury_bump: u8,
    pub bump: u8,
}

impl ProgramAccount for CapabilityVault {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = [67, 65, 80, 95, 86, 65, 76, 84]; // "CAP_VALT"

    const LEN: usize = DISCRIMINATOR_SIZE + 32 + 1 + 1;
}

impl CapabilityVault {
    pub fn new(program_id: &Pubkey, bump: u8) -> Self {
        let (treasury_authority, treasury_bump) = TreasuryAuthorityPDA::derive(program_id);
        Self {
            treasury_authority,
            treasury_bump,
            bump,
        }
    }

    /// Borrow the treasury credential. `treasury_info` must be the stored authority.
    pub(crate) fn capability(&self, treasury_info: &AccountInfo) -> Result<TreasuryCapability, ProgramError> {
        if *treasury_info.key != self.treasury_authority {
            msg!(
                "Treasury authority mismatch. Expected: {}, Actual: {}",
                self.treasury_authority,
                treasury_info.key
            );
            return Err(IncentivesError::InvalidPda.into());
        }
        Ok(TreasuryCapability {
            authority: self.treasury_authority,
            bump: self.treasury_bump,
        })
    }
}

/// Authority to move tokens out of protocol custody.
/// Only obtainable from a stored [`CapabilityVault`]; not `Clone`, not `Copy`.
#[derive(Debug)]
pub struct TreasuryCapability {
    authority: Pubkey,
    bump: u8,
}

impl TreasuryCapability {
    pub fn authority(&self) -> &Pubkey {
        &self.authority
    }

    /// Transfer `amount` out of a treasury-owned token account
    pub fn transfer<'a>(
        &self,
        token_program: &AccountInfo<'a>,
        source: &AccountInfo<'a>,
        destination: &AccountInfo<'a>,
        treasury_info: &AccountInfo<'a>,
        amount: u64,
    ) -> ProgramResult {
        if *treasury_info.key != self.authority {
            return Err(IncentivesError::InvalidPda.into());
        }
        cpi::transfer_signed(
            token_program,
            source,
            destination,
            treasury_info,
            amount,
            &[seeds::TREASURY_AUTHORITY, &[self.bump]],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_records_treasury_pda() {
        let program_id = Pubkey::new_unique();
        let vault = CapabilityVault::new(&program_id, 254);
        let (expected, expected_bump) = TreasuryAuthorityPDA::derive(&program_id);

        assert_eq!(vault.treasury_authority, expected);
        assert_eq!(vault.treasury_bump, expected_bump);
    }

    #[test]
    fn test_capability_requires_matching_treasury() {
        let program_id = Pubkey::new_unique();
        let vault = CapabilityVault::new(&program_id, 254);

        let owner = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data: Vec<u8> = vec![];
        let wrong_key = Pubkey::new_unique();
        let wrong = AccountInfo::new(&wrong_key, false, false, &mut lamports, &mut data, &owner, false, 0);
        assert_eq!(
            vault.capability(&wrong).unwrap_err(),
            ProgramError::from(IncentivesError::InvalidPda)
        );

        let mut lamports = 0u64;
        let mut data: Vec<u8> = vec![];
        let treasury_key = vault.treasury_authority;
        let treasury = AccountInfo::new(&treasury_key, false, false, &mut lamports, &mut data, &owner, false, 0);
        let capability = vault.capability(&treasury).unwrap();
        assert_eq!(capability.authority(), &treasury_key);
    }
}
