use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    account_validation::{
        validate_associated_token_program, validate_mint, validate_pda, validate_signer,
        validate_system_program, validate_token_program, validate_treasury_token_account,
        validate_upgrade_authority, validate_writable,
    },
    cpi,
    engine::IncentiveEngine,
    error::IncentivesError,
    instruction::IncentivesInstruction,
    pda::{
        seeds, CapabilityVaultPDA, IncentiveParametersPDA, IntegratorFeeLedgerPDA,
        ProtocolFeeLedgerPDA, TreasuryAuthorityPDA, UtilityStakingStorePDA,
    },
    state::{
        account_exists, CapabilityVault, IncentiveParameters, IntegratorFeeLedger,
        ProgramAccount, ProtocolFeeLedger, RegistrationKind, TierSchedule, TreasuryCapability,
        UtilityStakingStore,
    },
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = IncentivesInstruction::unpack(instruction_data)?;

        match instruction {
            IncentivesInstruction::SetParameters {
                settlement_authority,
                market_registration_fee,
                custodian_registration_fee,
                taker_fee_divisor,
                tiers,
            } => {
                msg!("Instruction: SetParameters");
                Self::process_set_parameters(
                    program_id,
                    accounts,
                    settlement_authority,
                    market_registration_fee,
                    custodian_registration_fee,
                    taker_fee_divisor,
                    &tiers,
                )
            }
            IncentivesInstruction::AssessTakerFee {
                market_id,
                quote_amount_filled,
                integrator,
            } => {
                msg!("Instruction: AssessTakerFee");
                Self::process_assess_taker_fee(
                    program_id,
                    accounts,
                    market_id,
                    quote_amount_filled,
                    integrator,
                )
            }
            IncentivesInstruction::UpgradeIntegratorTier {
                market_id,
                target_tier,
                utility_payment,
            } => {
                msg!("Instruction: UpgradeIntegratorTier");
                Self::process_upgrade_integrator_tier(
                    program_id,
                    accounts,
                    market_id,
                    target_tier,
                    utility_payment,
                )
            }
            IncentivesInstruction::WithdrawIntegratorFees {
                market_id,
                utility_payment,
            } => {
                msg!("Instruction: WithdrawIntegratorFees");
                Self::process_withdraw_integrator_fees(program_id, accounts, market_id, utility_payment)
            }
            IncentivesInstruction::DepositRegistrationFee {
                kind,
                utility_payment,
            } => {
                msg!("Instruction: DepositRegistrationFee");
                Self::process_deposit_registration_fee(program_id, accounts, kind, utility_payment)
            }
            IncentivesInstruction::WithdrawProtocolFees { market_id, amount } => {
                msg!("Instruction: WithdrawProtocolFees");
                Self::process_withdraw_protocol_fees(program_id, accounts, market_id, amount)
            }
            IncentivesInstruction::WithdrawUtilityFees { amount } => {
                msg!("Instruction: WithdrawUtilityFees");
                Self::process_withdraw_utility_fees(program_id, accounts, amount)
            }
        }
    }

    /// Validate and install a new parameter set. Nothing is created or written
    /// until every check has passed.
    fn process_set_parameters(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        settlement_authority: Pubkey,
        market_registration_fee: u64,
        custodian_registration_fee: u64,
        taker_fee_divisor: u64,
        tiers: &[Vec<u64>],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let admin_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let treasury_info = next_account_info(account_info_iter)?;
        let utility_mint_info = next_account_info(account_info_iter)?;
        let store_info = next_account_info(account_info_iter)?;
        let utility_vault_info = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;
        let associated_token_program = next_account_info(account_info_iter)?;
        let program_data_info = next_account_info(account_info_iter)?;

        validate_signer(admin_info)?;
        validate_writable(params_info)?;
        validate_writable(vault_info)?;
        validate_writable(store_info)?;
        validate_writable(utility_vault_info)?;
        validate_system_program(system_program)?;
        validate_token_program(token_program)?;
        validate_associated_token_program(associated_token_program)?;

        let (params_key, params_bump) = IncentiveParametersPDA::derive(program_id);
        validate_pda(params_info, &params_key)?;
        let (vault_key, vault_bump) = CapabilityVaultPDA::derive(program_id);
        validate_pda(vault_info, &vault_key)?;
        let (treasury_key, _) = TreasuryAuthorityPDA::derive(program_id);
        validate_pda(treasury_info, &treasury_key)?;
        let (store_key, store_bump) = UtilityStakingStorePDA::derive(program_id, utility_mint_info.key);
        validate_pda(store_info, &store_key)?;
        validate_treasury_token_account(utility_vault_info, &treasury_key, utility_mint_info.key)?;

        let existing = if account_exists(params_info, program_id) {
            let existing = IncentiveParameters::load(params_info, program_id)?;
            if !existing.is_admin(admin_info.key) {
                msg!("Signer {} is not the administrator {}", admin_info.key, existing.admin);
                return Err(IncentivesError::NotAuthorized.into());
            }
            Some(existing)
        } else {
            validate_upgrade_authority(program_data_info, program_id, admin_info.key)?;
            None
        };

        IncentiveParameters::validate_flat_fees(
            market_registration_fee,
            custodian_registration_fee,
            taker_fee_divisor,
        )?;
        let tier_schedule = TierSchedule::validate(tiers, taker_fee_divisor)?;
        if let Some(existing) = &existing {
            existing.check_replacement_schedule(&tier_schedule)?;
        }
        validate_mint(utility_mint_info)?;

        let vault = if account_exists(vault_info, program_id) {
            CapabilityVault::load(vault_info, program_id)?
        } else {
            cpi::create_pda_account(
                program_id,
                admin_info,
                vault_info,
                system_program,
                CapabilityVault::LEN,
                &[seeds::CAPABILITY_VAULT, &[vault_bump]],
            )?;
            let vault = CapabilityVault::new(program_id, vault_bump);
            vault.save(vault_info)?;
            msg!("Capability vault created, treasury authority {}", vault.treasury_authority);
            vault
        };
        let capability = vault.capability(treasury_info)?;

        Self::provision_utility_store(
            program_id,
            &capability,
            admin_info,
            utility_mint_info,
            store_info,
            store_bump,
            utility_vault_info,
            treasury_info,
            system_program,
            token_program,
            associated_token_program,
        )?;

        let params = IncentiveParameters {
            admin: *admin_info.key,
            settlement_authority,
            utility_mint: *utility_mint_info.key,
            market_registration_fee,
            custodian_registration_fee,
            taker_fee_divisor,
            tier_schedule,
            bump: params_bump,
        };
        if existing.is_none() {
            cpi::create_pda_account(
                program_id,
                admin_info,
                params_info,
                system_program,
                IncentiveParameters::LEN,
                &[seeds::INCENTIVE_PARAMETERS, &[params_bump]],
            )?;
        }
        params.save(params_info)?;

        msg!(
            "Incentive parameters set: utility mint {}, settlement authority {}, taker fee divisor {}, {} tiers",
            params.utility_mint,
            params.settlement_authority,
            params.taker_fee_divisor,
            params.tier_schedule.len()
        );
        Ok(())
    }

    /// Create the staking store and utility vault for a mint unless both exist
    #[allow(clippy::too_many_arguments)]
    fn provision_utility_store<'a>(
        program_id: &Pubkey,
        capability: &TreasuryCapability,
        payer: &AccountInfo<'a>,
        utility_mint_info: &AccountInfo<'a>,
        store_info: &AccountInfo<'a>,
        store_bump: u8,
        utility_vault_info: &AccountInfo<'a>,
        treasury_info: &AccountInfo<'a>,
        system_program: &AccountInfo<'a>,
        token_program: &AccountInfo<'a>,
        associated_token_program: &AccountInfo<'a>,
    ) -> ProgramResult {
        validate_treasury_token_account(utility_vault_info, capability.authority(), utility_mint_info.key)?;

        if !account_exists(store_info, program_id) {
            cpi::create_pda_account(
                program_id,
                payer,
                store_info,
                system_program,
                UtilityStakingStore::LEN,
                &[seeds::UTILITY_STAKING_STORE, utility_mint_info.key.as_ref(), &[store_bump]],
            )?;
            UtilityStakingStore::new(*utility_mint_info.key, store_bump).save(store_info)?;
            msg!("Utility staking store created for {}", utility_mint_info.key);
        }

        if utility_vault_info.data_is_empty() {
            cpi::create_treasury_token_account(
                payer,
                utility_vault_info,
                treasury_info,
                utility_mint_info,
                system_program,
                token_program,
                associated_token_program,
            )?;
        }
        Ok(())
    }

    /// Split one fill's taker fee, move it into custody and credit the ledgers
    fn process_assess_taker_fee(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
        quote_amount_filled: u64,
        integrator: Option<Pubkey>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let settlement_authority = next_account_info(account_info_iter)?;
        let settlement_token_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let treasury_info = next_account_info(account_info_iter)?;
        let quote_mint_info = next_account_info(account_info_iter)?;
        let fee_vault_info = next_account_info(account_info_iter)?;
        let protocol_ledger_info = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;
        let associated_token_program = next_account_info(account_info_iter)?;

        validate_signer(settlement_authority)?;
        validate_writable(fee_vault_info)?;
        validate_writable(protocol_ledger_info)?;
        validate_system_program(system_program)?;
        validate_token_program(token_program)?;
        validate_associated_token_program(associated_token_program)?;

        let params = Self::load_parameters(program_id, params_info)?;
        if !params.is_settlement_authority(settlement_authority.key) {
            msg!(
                "Signer {} is not the settlement authority {}",
                settlement_authority.key,
                params.settlement_authority
            );
            return Err(IncentivesError::NotAuthorized.into());
        }
        let vault = Self::load_vault(program_id, vault_info)?;
        validate_pda(treasury_info, &vault.treasury_authority)?;
        validate_treasury_token_account(fee_vault_info, &vault.treasury_authority, quote_mint_info.key)?;
        validate_mint(quote_mint_info)?;

        let (protocol_key, protocol_bump) = ProtocolFeeLedgerPDA::derive(program_id, market_id);
        validate_pda(protocol_ledger_info, &protocol_key)?;
        let protocol_exists = account_exists(protocol_ledger_info, program_id);
        let mut protocol_ledger = if protocol_exists {
            let ledger = ProtocolFeeLedger::load(protocol_ledger_info, program_id)?;
            ledger.check_quote_mint(quote_mint_info.key)?;
            ledger
        } else {
            ProtocolFeeLedger::new(market_id, *quote_mint_info.key, protocol_bump)
        };

        let mut integrator_entry = match integrator {
            Some(integrator) => {
                let ledger_info = next_account_info(account_info_iter)?;
                validate_writable(ledger_info)?;
                let (ledger_key, ledger_bump) =
                    IntegratorFeeLedgerPDA::derive(program_id, &integrator, market_id);
                validate_pda(ledger_info, &ledger_key)?;
                let exists = account_exists(ledger_info, program_id);
                let ledger = if exists {
                    let ledger = IntegratorFeeLedger::load(ledger_info, program_id)?;
                    ledger.check_quote_mint(quote_mint_info.key)?;
                    ledger
                } else {
                    IntegratorFeeLedger::new(integrator, market_id, *quote_mint_info.key, ledger_bump)
                };
                Some((ledger_info, ledger, exists))
            }
            None => None,
        };

        let outcome = IncentiveEngine::assess(
            &params,
            quote_amount_filled,
            integrator_entry.as_ref().map(|(_, ledger, _)| ledger.tier),
        )?;
        protocol_ledger.credit(outcome.protocol_share)?;
        if let Some((_, ledger, _)) = integrator_entry.as_mut() {
            ledger.credit(outcome.integrator_share)?;
        }

        if !protocol_exists {
            cpi::create_pda_account(
                program_id,
                settlement_authority,
                protocol_ledger_info,
                system_program,
                ProtocolFeeLedger::LEN,
                &[seeds::PROTOCOL_FEE_LEDGER, &market_id.to_le_bytes(), &[protocol_bump]],
            )?;
        }
        if let Some((ledger_info, ledger, false)) = integrator_entry.as_ref() {
            cpi::create_pda_account(
                program_id,
                settlement_authority,
                ledger_info,
                system_program,
                IntegratorFeeLedger::LEN,
                &[
                    seeds::INTEGRATOR_FEE_LEDGER,
                    ledger.integrator.as_ref(),
                    &market_id.to_le_bytes(),
                    &[ledger.bump],
                ],
            )?;
            msg!("Integrator {} registered for market {} at tier 0", ledger.integrator, market_id);
        }
        if fee_vault_info.data_is_empty() {
            cpi::create_treasury_token_account(
                settlement_authority,
                fee_vault_info,
                treasury_info,
                quote_mint_info,
                system_program,
                token_program,
                associated_token_program,
            )?;
        }

        if outcome.nominal_fee > 0 {
            cpi::transfer(
                token_program,
                settlement_token_info,
                fee_vault_info,
                settlement_authority,
                outcome.nominal_fee,
            )?;
        }
        protocol_ledger.save(protocol_ledger_info)?;
        if let Some((ledger_info, ledger, _)) = integrator_entry.as_ref() {
            ledger.save(ledger_info)?;
        }

        msg!(
            "Market {} fill {}: nominal fee {}, protocol {}, integrator {}",
            market_id,
            quote_amount_filled,
            outcome.nominal_fee,
            outcome.protocol_share,
            outcome.integrator_share
        );
        Self::return_value(&outcome)
    }

    /// Raise an integrator's tier by one, staking the utility payment
    fn process_upgrade_integrator_tier(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
        target_tier: u8,
        utility_payment: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let integrator_info = next_account_info(account_info_iter)?;
        let integrator_utility_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let store_info = next_account_info(account_info_iter)?;
        let utility_vault_info = next_account_info(account_info_iter)?;
        let ledger_info = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;

        validate_signer(integrator_info)?;
        validate_writable(store_info)?;
        validate_writable(ledger_info)?;
        validate_token_program(token_program)?;

        let params = Self::load_parameters(program_id, params_info)?;
        let vault = Self::load_vault(program_id, vault_info)?;
        let mut store = Self::load_utility_store(program_id, store_info, &params.utility_mint)?;
        validate_treasury_token_account(utility_vault_info, &vault.treasury_authority, &params.utility_mint)?;
        let mut ledger = Self::load_integrator_ledger(program_id, ledger_info, integrator_info.key, market_id)?;

        let required = ledger.check_upgrade(&params.tier_schedule, target_tier, utility_payment)?;
        store.deposit(utility_payment)?;

        cpi::transfer(
            token_program,
            integrator_utility_info,
            utility_vault_info,
            integrator_info,
            utility_payment,
        )?;
        ledger.apply_upgrade(target_tier);
        ledger.save(ledger_info)?;
        store.save(store_info)?;

        msg!(
            "Integrator {} upgraded to tier {} on market {} (cost {}, paid {})",
            integrator_info.key,
            target_tier,
            market_id,
            required,
            utility_payment
        );
        Ok(())
    }

    /// Pay the tier's withdrawal cost and take the integrator's whole balance
    fn process_withdraw_integrator_fees(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
        utility_payment: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let integrator_info = next_account_info(account_info_iter)?;
        let integrator_utility_info = next_account_info(account_info_iter)?;
        let destination_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let treasury_info = next_account_info(account_info_iter)?;
        let store_info = next_account_info(account_info_iter)?;
        let utility_vault_info = next_account_info(account_info_iter)?;
        let ledger_info = next_account_info(account_info_iter)?;
        let fee_vault_info = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;

        validate_signer(integrator_info)?;
        validate_writable(store_info)?;
        validate_writable(ledger_info)?;
        validate_token_program(token_program)?;

        let params = Self::load_parameters(program_id, params_info)?;
        let vault = Self::load_vault(program_id, vault_info)?;
        let capability = vault.capability(treasury_info)?;
        let mut store = Self::load_utility_store(program_id, store_info, &params.utility_mint)?;
        validate_treasury_token_account(utility_vault_info, capability.authority(), &params.utility_mint)?;
        let mut ledger = Self::load_integrator_ledger(program_id, ledger_info, integrator_info.key, market_id)?;
        validate_treasury_token_account(fee_vault_info, capability.authority(), &ledger.quote_mint)?;

        let withdrawal_cost = ledger.check_withdrawal(&params.tier_schedule, utility_payment)?;
        store.deposit(withdrawal_cost)?;
        let amount = ledger.take_balance();

        cpi::transfer(
            token_program,
            integrator_utility_info,
            utility_vault_info,
            integrator_info,
            withdrawal_cost,
        )?;
        if amount > 0 {
            capability.transfer(token_program, fee_vault_info, destination_info, treasury_info, amount)?;
        }
        ledger.save(ledger_info)?;
        store.save(store_info)?;

        msg!(
            "Integrator {} withdrew {} from market {} (withdrawal cost {})",
            integrator_info.key,
            amount,
            market_id,
            withdrawal_cost
        );
        Self::return_value(&amount)
    }

    /// Stake a market or custodian registration fee
    fn process_deposit_registration_fee(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        kind: RegistrationKind,
        utility_payment: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let payer_utility_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let store_info = next_account_info(account_info_iter)?;
        let utility_vault_info = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;

        validate_signer(payer_info)?;
        validate_writable(store_info)?;
        validate_token_program(token_program)?;

        let params = Self::load_parameters(program_id, params_info)?;
        let vault = Self::load_vault(program_id, vault_info)?;
        let mut store = Self::load_utility_store(program_id, store_info, &params.utility_mint)?;
        validate_treasury_token_account(utility_vault_info, &vault.treasury_authority, &params.utility_mint)?;

        let fee = params.registration_fee(kind);
        if utility_payment < fee {
            msg!("{:?} registration costs {}, offered {}", kind, fee, utility_payment);
            return Err(IncentivesError::InsufficientUtilityPayment.into());
        }
        store.deposit(utility_payment)?;

        cpi::transfer(
            token_program,
            payer_utility_info,
            utility_vault_info,
            payer_info,
            utility_payment,
        )?;
        store.save(store_info)?;

        msg!("{:?} registration fee of {} staked", kind, utility_payment);
        Ok(())
    }

    /// Admin withdrawal of a market's protocol fee share
    fn process_withdraw_protocol_fees(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        market_id: u64,
        amount: Option<u64>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let admin_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let treasury_info = next_account_info(account_info_iter)?;
        let ledger_info = next_account_info(account_info_iter)?;
        let fee_vault_info = next_account_info(account_info_iter)?;
        let destination_info = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;

        validate_signer(admin_info)?;
        validate_writable(ledger_info)?;
        validate_token_program(token_program)?;

        let params = Self::load_parameters(program_id, params_info)?;
        Self::check_admin(&params, admin_info)?;
        let vault = Self::load_vault(program_id, vault_info)?;
        let capability = vault.capability(treasury_info)?;

        let (ledger_key, _) = ProtocolFeeLedgerPDA::derive(program_id, market_id);
        validate_pda(ledger_info, &ledger_key)?;
        let mut ledger = Self::load_existing::<ProtocolFeeLedger>(program_id, ledger_info)?;
        validate_treasury_token_account(fee_vault_info, capability.authority(), &ledger.quote_mint)?;

        let withdrawn = ledger.withdraw(amount)?;
        if withdrawn > 0 {
            capability.transfer(token_program, fee_vault_info, destination_info, treasury_info, withdrawn)?;
        }
        ledger.save(ledger_info)?;

        msg!("Withdrew {} protocol fees from market {}", withdrawn, market_id);
        Self::return_value(&withdrawn)
    }

    /// Admin withdrawal from a utility staking store (any mint ever configured)
    fn process_withdraw_utility_fees(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: Option<u64>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let admin_info = next_account_info(account_info_iter)?;
        let params_info = next_account_info(account_info_iter)?;
        let vault_info = next_account_info(account_info_iter)?;
        let treasury_info = next_account_info(account_info_iter)?;
        let store_info = next_account_info(account_info_iter)?;
        let utility_vault_info = next_account_info(account_info_iter)?;
        let destination_info = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;

        validate_signer(admin_info)?;
        validate_writable(store_info)?;
        validate_token_program(token_program)?;

        let params = Self::load_parameters(program_id, params_info)?;
        Self::check_admin(&params, admin_info)?;
        let vault = Self::load_vault(program_id, vault_info)?;
        let capability = vault.capability(treasury_info)?;

        let mut store = Self::load_existing::<UtilityStakingStore>(program_id, store_info)?;
        let (store_key, _) = UtilityStakingStorePDA::derive(program_id, &store.utility_mint);
        validate_pda(store_info, &store_key)?;
        validate_treasury_token_account(utility_vault_info, capability.authority(), &store.utility_mint)?;

        let withdrawn = store.withdraw(amount)?;
        if withdrawn > 0 {
            capability.transfer(token_program, utility_vault_info, destination_info, treasury_info, withdrawn)?;
        }
        store.save(store_info)?;

        msg!("Withdrew {} utility units of {}", withdrawn, store.utility_mint);
        Self::return_value(&withdrawn)
    }

    fn check_admin(params: &IncentiveParameters, admin_info: &AccountInfo) -> ProgramResult {
        if !params.is_admin(admin_info.key) {
            msg!("Signer {} is not the administrator {}", admin_info.key, params.admin);
            return Err(IncentivesError::NotAuthorized.into());
        }
        Ok(())
    }

    fn load_existing<T: ProgramAccount>(program_id: &Pubkey, info: &AccountInfo) -> Result<T, ProgramError> {
        if !account_exists(info, program_id) {
            msg!("Account {} not initialized", info.key);
            return Err(IncentivesError::NotInitialized.into());
        }
        T::load(info, program_id)
    }

    fn load_parameters(program_id: &Pubkey, params_info: &AccountInfo) -> Result<IncentiveParameters, ProgramError> {
        let (params_key, _) = IncentiveParametersPDA::derive(program_id);
        validate_pda(params_info, &params_key)?;
        Self::load_existing(program_id, params_info)
    }

    fn load_vault(program_id: &Pubkey, vault_info: &AccountInfo) -> Result<CapabilityVault, ProgramError> {
        let (vault_key, _) = CapabilityVaultPDA::derive(program_id);
        validate_pda(vault_info, &vault_key)?;
        Self::load_existing(program_id, vault_info)
    }

    fn load_utility_store(
        program_id: &Pubkey,
        store_info: &AccountInfo,
        utility_mint: &Pubkey,
    ) -> Result<UtilityStakingStore, ProgramError> {
        let (store_key, _) = UtilityStakingStorePDA::derive(program_id, utility_mint);
        if *store_info.key != store_key {
            msg!("Store {} does not hold the utility asset {}", store_info.key, utility_mint);
            return Err(IncentivesError::InvalidUtilityAsset.into());
        }
        Self::load_existing(program_id, store_info)
    }

    fn load_integrator_ledger(
        program_id: &Pubkey,
        ledger_info: &AccountInfo,
        integrator: &Pubkey,
        market_id: u64,
    ) -> Result<IntegratorFeeLedger, ProgramError> {
        let (ledger_key, _) = IntegratorFeeLedgerPDA::derive(program_id, integrator, market_id);
        validate_pda(ledger_info, &ledger_key)?;
        Self::load_existing(program_id, ledger_info)
    }

    fn return_value<T: BorshSerialize>(value: &T) -> ProgramResult {
        let data = value
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)?;
        set_return_data(&data);
        Ok(())
    }
}
