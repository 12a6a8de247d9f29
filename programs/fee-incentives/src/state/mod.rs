pub mod capability_vault;
pub mod incentive_parameters;
pub mod integrator_fee_ledger;
pub mod protocol_fee_ledger;
pub mod tier_schedule;
pub mod utility_staking_store;

pub use capability_vault::*;
pub use incentive_parameters::*;
pub use integrator_fee_ledger::*;
pub use protocol_fee_ledger::*;
pub use tier_schedule::*;
pub use utility_staking_store::*;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::account_validation::{validate_discriminator, validate_owner, DISCRIMINATOR_SIZE};

/// Program-owned account layout: 8-byte discriminator followed by the borsh body.
/// `LEN` covers the discriminator and the largest body the account can hold.
pub trait ProgramAccount: BorshSerialize + BorshDeserialize + Sized {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE];
    const LEN: usize;

    fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        validate_discriminator(data, &Self::DISCRIMINATOR)?;
        let mut body = &data[DISCRIMINATOR_SIZE..];
        Self::deserialize(&mut body).map_err(|_| ProgramError::InvalidAccountData)
    }

    fn pack(&self, dst: &mut [u8]) -> ProgramResult {
        if dst.len() < DISCRIMINATOR_SIZE {
            return Err(ProgramError::AccountDataTooSmall);
        }
        dst[..DISCRIMINATOR_SIZE].copy_from_slice(&Self::DISCRIMINATOR);
        let mut body = &mut dst[DISCRIMINATOR_SIZE..];
        self.serialize(&mut body).map_err(|e| {
            msg!("Account serialization failed: {}", e);
            ProgramError::AccountDataTooSmall
        })
    }

    /// Read an existing account owned by `program_id`
    fn load(info: &AccountInfo, program_id: &Pubkey) -> Result<Self, ProgramError> {
        validate_owner(info, program_id)?;
        let data = info.try_borrow_data()?;
        Self::unpack(&data)
    }

    fn save(&self, info: &AccountInfo) -> ProgramResult {
        let mut data = info.try_borrow_mut_data()?;
        self.pack(&mut data)
    }
}

/// True once the account has been allocated by this program
pub fn account_exists(info: &AccountInfo, program_id: &Pubkey) -> bool {
    info.owner == program_id && !info.data_is_empty()
}
