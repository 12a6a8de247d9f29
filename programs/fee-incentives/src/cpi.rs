//! Cross-program invocations: account creation and token movement

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};
use spl_token::instruction as token_instruction;

/// Allocate a program-owned PDA of `space` bytes, funded by `payer`.
/// An address that already holds lamports is topped up to rent exemption,
/// then allocated and assigned under the PDA signature.
pub fn create_pda_account<'a>(
    program_id: &Pubkey,
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let rent_lamports = Rent::get()?.minimum_balance(space);
    let current_lamports = new_account.lamports();

    if current_lamports == 0 {
        invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                rent_lamports,
                space as u64,
                program_id,
            ),
            &[payer.clone(), new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
    } else {
        let top_up = rent_lamports.saturating_sub(current_lamports);
        if top_up > 0 {
            invoke(
                &system_instruction::transfer(payer.key, new_account.key, top_up),
                &[payer.clone(), new_account.clone(), system_program.clone()],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(new_account.key, space as u64),
            &[new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(new_account.key, program_id),
            &[new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
        msg!("Adopted pre-funded account {} ({} lamports)", new_account.key, current_lamports);
    }

    msg!("Created account {} ({} bytes)", new_account.key, space);
    Ok(())
}

/// Create the treasury's associated token account for `mint` unless it exists
pub fn create_treasury_token_account<'a>(
    payer: &AccountInfo<'a>,
    token_account: &AccountInfo<'a>,
    treasury_authority: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
    associated_token_program: &AccountInfo<'a>,
) -> ProgramResult {
    invoke(
        &spl_associated_token_account::instruction::create_associated_token_account_idempotent(
            payer.key,
            treasury_authority.key,
            mint.key,
            token_program.key,
        ),
        &[
            payer.clone(),
            token_account.clone(),
            treasury_authority.clone(),
            mint.clone(),
            system_program.clone(),
            token_program.clone(),
            associated_token_program.clone(),
        ],
    )
}

/// Transfer tokens authorized by a transaction signer
pub fn transfer<'a>(
    token_program: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    invoke(
        &token_instruction::transfer(
            token_program.key,
            source.key,
            destination.key,
            authority.key,
            &[],
            amount,
        )?,
        &[
            source.clone(),
            destination.clone(),
            authority.clone(),
            token_program.clone(),
        ],
    )
}

/// Transfer tokens authorized by a program PDA
pub fn transfer_signed<'a>(
    token_program: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    invoke_signed(
        &token_instruction::transfer(
            token_program.key,
            source.key,
            destination.key,
            authority.key,
            &[],
            amount,
        )?,
        &[
            source.clone(),
            destination.clone(),
            authority.clone(),
            token_program.clone(),
        ],
        &[signer_seeds],
    )
}
