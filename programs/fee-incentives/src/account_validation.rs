//! Account checks shared by every instruction handler

use solana_program::{
    account_info::AccountInfo,
    bpf_loader_upgradeable::{self, UpgradeableLoaderState},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    program_utils::limited_deserialize,
    pubkey::Pubkey,
};

use crate::error::IncentivesError;

/// Account discriminator size (8 bytes like Anchor)
pub const DISCRIMINATOR_SIZE: usize = 8;

/// Validate that an account is owned by the expected program
pub fn validate_owner(account: &AccountInfo, expected_owner: &Pubkey) -> ProgramResult {
    if account.owner != expected_owner {
        msg!(
            "Account owner mismatch. Expected: {}, Actual: {}",
            expected_owner,
            account.owner
        );
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Validate that an account is a signer
pub fn validate_signer(account: &AccountInfo) -> ProgramResult {
    if !account.is_signer {
        msg!("Account {} must be a signer", account.key);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Validate that an account is writable
pub fn validate_writable(account: &AccountInfo) -> ProgramResult {
    if !account.is_writable {
        msg!("Account {} must be writable", account.key);
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Validate that an account sits at the expected derived address
pub fn validate_pda(account: &AccountInfo, expected_key: &Pubkey) -> ProgramResult {
    if account.key != expected_key {
        msg!(
            "PDA mismatch. Expected: {}, Actual: {}",
            expected_key,
            account.key
        );
        return Err(IncentivesError::InvalidPda.into());
    }
    Ok(())
}

/// Validate account discriminator
pub fn validate_discriminator(
    account_data: &[u8],
    expected_discriminator: &[u8; DISCRIMINATOR_SIZE],
) -> ProgramResult {
    if account_data.len() < DISCRIMINATOR_SIZE {
        msg!("Account data too small for discriminator");
        return Err(ProgramError::InvalidAccountData);
    }

    let discriminator = &account_data[..DISCRIMINATOR_SIZE];
    if discriminator != expected_discriminator {
        msg!("Invalid account discriminator");
        return Err(ProgramError::InvalidAccountData);
    }

    Ok(())
}

/// Validate system program
pub fn validate_system_program(account: &AccountInfo) -> ProgramResult {
    if account.key != &solana_program::system_program::id() {
        msg!("Invalid system program");
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Validate token program
pub fn validate_token_program(account: &AccountInfo) -> ProgramResult {
    if account.key != &spl_token::id() {
        msg!("Invalid token program");
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Validate associated token program
pub fn validate_associated_token_program(account: &AccountInfo) -> ProgramResult {
    if account.key != &spl_associated_token_account::id() {
        msg!("Invalid associated token program");
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Validate that `mint_info` holds an initialized SPL mint
pub fn validate_mint(mint_info: &AccountInfo) -> ProgramResult {
    if mint_info.owner != &spl_token::id() {
        msg!("Mint {} is not owned by the token program", mint_info.key);
        return Err(IncentivesError::AssetNotInitialized.into());
    }
    let data = mint_info.try_borrow_data()?;
    if spl_token::state::Mint::unpack(&data).is_err() {
        msg!("Mint {} is not initialized", mint_info.key);
        return Err(IncentivesError::AssetNotInitialized.into());
    }
    Ok(())
}

/// Validate that `token_info` is the treasury's token account for `mint`
pub fn validate_treasury_token_account(
    token_info: &AccountInfo,
    treasury_authority: &Pubkey,
    mint: &Pubkey,
) -> ProgramResult {
    let expected =
        spl_associated_token_account::get_associated_token_address(treasury_authority, mint);
    validate_pda(token_info, &expected)
}

/// Validate that `authority` is the upgrade authority recorded in this
/// program's program data account
pub fn validate_upgrade_authority(
    program_data_info: &AccountInfo,
    program_id: &Pubkey,
    authority: &Pubkey,
) -> ProgramResult {
    let expected = Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0;
    validate_pda(program_data_info, &expected)?;
    validate_owner(program_data_info, &bpf_loader_upgradeable::id())?;

    let data = program_data_info.try_borrow_data()?;
    let metadata_len = UpgradeableLoaderState::size_of_programdata_metadata();
    if data.len() < metadata_len {
        msg!("Program data account too small");
        return Err(ProgramError::InvalidAccountData);
    }
    let state: UpgradeableLoaderState = limited_deserialize(&data[..metadata_len], metadata_len as u64)
        .map_err(|_| ProgramError::InvalidAccountData)?;

    match state {
        UpgradeableLoaderState::ProgramData {
            upgrade_authority_address: Some(upgrade_authority),
            ..
        } if upgrade_authority == *authority => Ok(()),
        UpgradeableLoaderState::ProgramData {
            upgrade_authority_address,
            ..
        } => {
            msg!(
                "Signer {} is not the upgrade authority {:?}",
                authority,
                upgrade_authority_address
            );
            Err(IncentivesError::NotAuthorized.into())
        }
        _ => {
            msg!("Account {} is not a program data account", program_data_info.key);
            Err(ProgramError::InvalidAccountData)
        }
    }
}
