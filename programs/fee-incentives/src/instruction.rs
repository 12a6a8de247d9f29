use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    bpf_loader_upgradeable, system_program,
};

use crate::{
    error::IncentivesError,
    pda::{
        treasury_token_account, CapabilityVaultPDA, IncentiveParametersPDA,
        IntegratorFeeLedgerPDA, ProtocolFeeLedgerPDA, TreasuryAuthorityPDA,
        UtilityStakingStorePDA,
    },
    state::RegistrationKind,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum IncentivesInstruction {
    /// Configure (or reconfigure) incentive parameters. The first call must be
    /// signed by the program's upgrade authority, later ones by the stored admin.
    /// Accounts:
    /// 0. `[signer, writable]` Admin (payer on first call)
    /// 1. `[writable]` Incentive parameters PDA
    /// 2. `[writable]` Capability vault PDA
    /// 3. `[]` Treasury authority PDA
    /// 4. `[]` Utility mint
    /// 5. `[writable]` Utility staking store PDA for the mint
    /// 6. `[writable]` Utility vault (treasury token account for the mint)
    /// 7. `[]` System program
    /// 8. `[]` Token program
    /// 9. `[]` Associated token program
    /// 10. `[]` Program data account of this program
    SetParameters {
        /// Only signer allowed to assess taker fees
        settlement_authority: Pubkey,
        market_registration_fee: u64,
        custodian_registration_fee: u64,
        taker_fee_divisor: u64,
        /// `[fee_share_divisor, activation_cost, withdrawal_cost]` per tier
        tiers: Vec<Vec<u64>>,
    },

    /// Assess the taker fee of one fill and split it between ledgers
    /// Accounts:
    /// 0. `[signer, writable]` Configured settlement authority (payer for new ledgers)
    /// 1. `[writable]` Settlement token account (source of the fee)
    /// 2. `[]` Incentive parameters PDA
    /// 3. `[]` Capability vault PDA
    /// 4. `[]` Treasury authority PDA
    /// 5. `[]` Quote mint
    /// 6. `[writable]` Market fee vault (treasury token account for the quote mint)
    /// 7. `[writable]` Protocol fee ledger PDA for the market
    /// 8. `[]` System program
    /// 9. `[]` Token program
    /// 10. `[]` Associated token program
    /// 11. `[writable]` Integrator fee ledger PDA (only with an integrator)
    AssessTakerFee {
        market_id: u64,
        quote_amount_filled: u64,
        integrator: Option<Pubkey>,
    },

    /// Move an integrator up one tier for a market
    /// Accounts:
    /// 0. `[signer]` Integrator
    /// 1. `[writable]` Integrator utility token account
    /// 2. `[]` Incentive parameters PDA
    /// 3. `[]` Capability vault PDA
    /// 4. `[writable]` Utility staking store PDA
    /// 5. `[writable]` Utility vault
    /// 6. `[writable]` Integrator fee ledger PDA
    /// 7. `[]` Token program
    UpgradeIntegratorTier {
        market_id: u64,
        target_tier: u8,
        utility_payment: u64,
    },

    /// Withdraw an integrator's accrued fees for a market
    /// Accounts:
    /// 0. `[signer]` Integrator
    /// 1. `[writable]` Integrator utility token account
    /// 2. `[writable]` Integrator quote token account (destination)
    /// 3. `[]` Incentive parameters PDA
    /// 4. `[]` Capability vault PDA
    /// 5. `[]` Treasury authority PDA
    /// 6. `[writable]` Utility staking store PDA
    /// 7. `[writable]` Utility vault
    /// 8. `[writable]` Integrator fee ledger PDA
    /// 9. `[writable]` Market fee vault
    /// 10. `[]` Token program
    WithdrawIntegratorFees {
        market_id: u64,
        utility_payment: u64,
    },

    /// Pay a market or custodian registration fee in the utility asset
    /// Accounts:
    /// 0. `[signer]` Payer
    /// 1. `[writable]` Payer utility token account
    /// 2. `[]` Incentive parameters PDA
    /// 3. `[]` Capability vault PDA
    /// 4. `[writable]` Utility staking store PDA
    /// 5. `[writable]` Utility vault
    /// 6. `[]` Token program
    DepositRegistrationFee {
        kind: RegistrationKind,
        utility_payment: u64,
    },

    /// Withdraw the protocol's fee share of a market (admin only)
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[]` Incentive parameters PDA
    /// 2. `[]` Capability vault PDA
    /// 3. `[]` Treasury authority PDA
    /// 4. `[writable]` Protocol fee ledger PDA
    /// 5. `[writable]` Market fee vault
    /// 6. `[writable]` Destination quote token account
    /// 7. `[]` Token program
    WithdrawProtocolFees {
        market_id: u64,
        /// `None` withdraws the whole balance
        amount: Option<u64>,
    },

    /// Withdraw staked utility asset (admin only)
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[]` Incentive parameters PDA
    /// 2. `[]` Capability vault PDA
    /// 3. `[]` Treasury authority PDA
    /// 4. `[writable]` Utility staking store PDA
    /// 5. `[writable]` Utility vault for the store's mint
    /// 6. `[writable]` Destination utility token account
    /// 7. `[]` Token program
    WithdrawUtilityFees {
        /// `None` withdraws the whole balance
        amount: Option<u64>,
    },
}

impl IncentivesInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| IncentivesError::InvalidInstruction.into())
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut data = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.serialize(&mut data);
        data
    }
}

// Helper functions to create instructions

#[allow(clippy::too_many_arguments)]
pub fn set_parameters(
    program_id: &Pubkey,
    admin: &Pubkey,
    utility_mint: &Pubkey,
    settlement_authority: &Pubkey,
    market_registration_fee: u64,
    custodian_registration_fee: u64,
    taker_fee_divisor: u64,
    tiers: Vec<Vec<u64>>,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (treasury, _) = TreasuryAuthorityPDA::derive(program_id);
    let (store, _) = UtilityStakingStorePDA::derive(program_id, utility_mint);

    let accounts = vec![
        AccountMeta::new(*admin, true),
        AccountMeta::new(params, false),
        AccountMeta::new(vault, false),
        AccountMeta::new_readonly(treasury, false),
        AccountMeta::new_readonly(*utility_mint, false),
        AccountMeta::new(store, false),
        AccountMeta::new(treasury_token_account(program_id, utility_mint), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        AccountMeta::new_readonly(Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0, false),
    ];

    let data = IncentivesInstruction::SetParameters {
        settlement_authority: *settlement_authority,
        market_registration_fee,
        custodian_registration_fee,
        taker_fee_divisor,
        tiers,
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

pub fn assess_taker_fee(
    program_id: &Pubkey,
    settlement_authority: &Pubkey,
    settlement_token_account: &Pubkey,
    quote_mint: &Pubkey,
    market_id: u64,
    quote_amount_filled: u64,
    integrator: Option<Pubkey>,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (treasury, _) = TreasuryAuthorityPDA::derive(program_id);
    let (protocol_ledger, _) = ProtocolFeeLedgerPDA::derive(program_id, market_id);

    let mut accounts = vec![
        AccountMeta::new(*settlement_authority, true),
        AccountMeta::new(*settlement_token_account, false),
        AccountMeta::new_readonly(params, false),
        AccountMeta::new_readonly(vault, false),
        AccountMeta::new_readonly(treasury, false),
        AccountMeta::new_readonly(*quote_mint, false),
        AccountMeta::new(treasury_token_account(program_id, quote_mint), false),
        AccountMeta::new(protocol_ledger, false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
    ];
    if let Some(integrator) = integrator {
        let (integrator_ledger, _) = IntegratorFeeLedgerPDA::derive(program_id, &integrator, market_id);
        accounts.push(AccountMeta::new(integrator_ledger, false));
    }

    let data = IncentivesInstruction::AssessTakerFee {
        market_id,
        quote_amount_filled,
        integrator,
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

pub fn upgrade_integrator_tier(
    program_id: &Pubkey,
    integrator: &Pubkey,
    integrator_utility_account: &Pubkey,
    utility_mint: &Pubkey,
    market_id: u64,
    target_tier: u8,
    utility_payment: u64,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (store, _) = UtilityStakingStorePDA::derive(program_id, utility_mint);
    let (ledger, _) = IntegratorFeeLedgerPDA::derive(program_id, integrator, market_id);

    let accounts = vec![
        AccountMeta::new_readonly(*integrator, true),
        AccountMeta::new(*integrator_utility_account, false),
        AccountMeta::new_readonly(params, false),
        AccountMeta::new_readonly(vault, false),
        AccountMeta::new(store, false),
        AccountMeta::new(treasury_token_account(program_id, utility_mint), false),
        AccountMeta::new(ledger, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    let data = IncentivesInstruction::UpgradeIntegratorTier {
        market_id,
        target_tier,
        utility_payment,
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw_integrator_fees(
    program_id: &Pubkey,
    integrator: &Pubkey,
    integrator_utility_account: &Pubkey,
    integrator_quote_account: &Pubkey,
    utility_mint: &Pubkey,
    quote_mint: &Pubkey,
    market_id: u64,
    utility_payment: u64,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (treasury, _) = TreasuryAuthorityPDA::derive(program_id);
    let (store, _) = UtilityStakingStorePDA::derive(program_id, utility_mint);
    let (ledger, _) = IntegratorFeeLedgerPDA::derive(program_id, integrator, market_id);

    let accounts = vec![
        AccountMeta::new_readonly(*integrator, true),
        AccountMeta::new(*integrator_utility_account, false),
        AccountMeta::new(*integrator_quote_account, false),
        AccountMeta::new_readonly(params, false),
        AccountMeta::new_readonly(vault, false),
        AccountMeta::new_readonly(treasury, false),
        AccountMeta::new(store, false),
        AccountMeta::new(treasury_token_account(program_id, utility_mint), false),
        AccountMeta::new(ledger, false),
        AccountMeta::new(treasury_token_account(program_id, quote_mint), false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    let data = IncentivesInstruction::WithdrawIntegratorFees {
        market_id,
        utility_payment,
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

pub fn deposit_registration_fee(
    program_id: &Pubkey,
    payer: &Pubkey,
    payer_utility_account: &Pubkey,
    utility_mint: &Pubkey,
    kind: RegistrationKind,
    utility_payment: u64,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (store, _) = UtilityStakingStorePDA::derive(program_id, utility_mint);

    let accounts = vec![
        AccountMeta::new_readonly(*payer, true),
        AccountMeta::new(*payer_utility_account, false),
        AccountMeta::new_readonly(params, false),
        AccountMeta::new_readonly(vault, false),
        AccountMeta::new(store, false),
        AccountMeta::new(treasury_token_account(program_id, utility_mint), false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    let data = IncentivesInstruction::DepositRegistrationFee {
        kind,
        utility_payment,
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

pub fn withdraw_protocol_fees(
    program_id: &Pubkey,
    admin: &Pubkey,
    quote_mint: &Pubkey,
    destination: &Pubkey,
    market_id: u64,
    amount: Option<u64>,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (treasury, _) = TreasuryAuthorityPDA::derive(program_id);
    let (ledger, _) = ProtocolFeeLedgerPDA::derive(program_id, market_id);

    let accounts = vec![
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new_readonly(params, false),
        AccountMeta::new_readonly(vault, false),
        AccountMeta::new_readonly(treasury, false),
        AccountMeta::new(ledger, false),
        AccountMeta::new(treasury_token_account(program_id, quote_mint), false),
        AccountMeta::new(*destination, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    let data = IncentivesInstruction::WithdrawProtocolFees { market_id, amount };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

pub fn withdraw_utility_fees(
    program_id: &Pubkey,
    admin: &Pubkey,
    utility_mint: &Pubkey,
    destination: &Pubkey,
    amount: Option<u64>,
) -> Instruction {
    let (params, _) = IncentiveParametersPDA::derive(program_id);
    let (vault, _) = CapabilityVaultPDA::derive(program_id);
    let (treasury, _) = TreasuryAuthorityPDA::derive(program_id);
    let (store, _) = UtilityStakingStorePDA::derive(program_id, utility_mint);

    let accounts = vec![
        AccountMeta::new_readonly(*admin, true),
        AccountMeta::new_readonly(params, false),
        AccountMeta::new_readonly(vault, false),
        AccountMeta::new_readonly(treasury, false),
        AccountMeta::new(store, false),
        AccountMeta::new(treasury_token_account(program_id, utility_mint), false),
        AccountMeta::new(*destination, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    let data = IncentivesInstruction::WithdrawUtilityFees { amount };

    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_rejects_garbage() {
        assert_eq!(
            IncentivesInstruction::unpack(&[200]),
            Err(ProgramError::from(IncentivesError::InvalidInstruction))
        );
        assert!(IncentivesInstruction::unpack(&[]).is_err());
    }

    #[test]
    fn test_set_parameters_carries_raw_tiers() {
        let program_id = Pubkey::new_unique();
        let settlement_authority = Pubkey::new_unique();
        let ix = set_parameters(
            &program_id,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &settlement_authority,
            1000,
            500,
            2000,
            vec![vec![4000, 1000, 10000], vec![3000, 5000]],
        );

        assert_eq!(ix.accounts.len(), 11);
        assert_eq!(
            ix.accounts[10].pubkey,
            Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
        );
        match IncentivesInstruction::unpack(&ix.data).unwrap() {
            IncentivesInstruction::SetParameters { tiers, taker_fee_divisor, settlement_authority: authority, .. } => {
                assert_eq!(taker_fee_divisor, 2000);
                assert_eq!(authority, settlement_authority);
                // Arity is checked by the program, not by the encoding
                assert_eq!(tiers[1].len(), 2);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }

    #[test]
    fn test_assess_appends_integrator_ledger() {
        let program_id = Pubkey::new_unique();
        let integrator = Pubkey::new_unique();
        let without = assess_taker_fee(
            &program_id,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            9,
            1_000_000,
            None,
        );
        let with = assess_taker_fee(
            &program_id,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            9,
            1_000_000,
            Some(integrator),
        );

        assert_eq!(without.accounts.len(), 11);
        assert_eq!(with.accounts.len(), 12);
        assert_eq!(
            with.accounts[11].pubkey,
            IntegratorFeeLedgerPDA::derive(&program_id, &integrator, 9).0
        );
    }
}
