//! Program Derived Address (PDA) derivation functions
//!
//! Singletons use a bare seed; ledgers are keyed by market and by
//! (integrator, market) so disjoint fills never touch the same account.

use solana_program::pubkey::Pubkey;

/// PDA seed constants
pub mod seeds {
    pub const INCENTIVE_PARAMETERS: &[u8] = b"incentive_parameters";
    pub const CAPABILITY_VAULT: &[u8] = b"capability_vault";
    pub const TREASURY_AUTHORITY: &[u8] = b"treasury_authority";
    pub const UTILITY_STAKING_STORE: &[u8] = b"utility_staking_store";
    pub const PROTOCOL_FEE_LEDGER: &[u8] = b"protocol_fee_ledger";
    pub const INTEGRATOR_FEE_LEDGER: &[u8] = b"integrator_fee_ledger";
}

#[derive(Debug, Clone)]
pub struct IncentiveParametersPDA;
impl IncentiveParametersPDA {
    pub fn derive(program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::INCENTIVE_PARAMETERS], program_id)
    }
}

#[derive(Debug, Clone)]
pub struct CapabilityVaultPDA;
impl CapabilityVaultPDA {
    pub fn derive(program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::CAPABILITY_VAULT], program_id)
    }
}

/// Owner of every protocol token account. Has no data of its own.
#[derive(Debug, Clone)]
pub struct TreasuryAuthorityPDA;
impl TreasuryAuthorityPDA {
    pub fn derive(program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[seeds::TREASURY_AUTHORITY], program_id)
    }
}

#[derive(Debug, Clone)]
pub struct UtilityStakingStorePDA;
impl UtilityStakingStorePDA {
    pub fn derive(program_id: &Pubkey, utility_mint: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[seeds::UTILITY_STAKING_STORE, utility_mint.as_ref()],
            program_id,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProtocolFeeLedgerPDA;
impl ProtocolFeeLedgerPDA {
    pub fn derive(program_id: &Pubkey, market_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[seeds::PROTOCOL_FEE_LEDGER, &market_id.to_le_bytes()],
            program_id,
        )
    }
}

#[derive(Debug, Clone)]
pub struct IntegratorFeeLedgerPDA;
impl IntegratorFeeLedgerPDA {
    pub fn derive(program_id: &Pubkey, integrator: &Pubkey, market_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                seeds::INTEGRATOR_FEE_LEDGER,
                integrator.as_ref(),
                &market_id.to_le_bytes(),
            ],
            program_id,
        )
    }
}

/// Treasury-owned token account holding `mint` (utility vault or market fee vault)
pub fn treasury_token_account(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (treasury_authority, _) = TreasuryAuthorityPDA::derive(program_id);
    spl_associated_token_account::get_associated_token_address(&treasury_authority, mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledgers_are_keyed_independently() {
        let program_id = Pubkey::new_unique();
        let integrator = Pubkey::new_unique();

        let (market_1, _) = ProtocolFeeLedgerPDA::derive(&program_id, 1);
        let (market_2, _) = ProtocolFeeLedgerPDA::derive(&program_id, 2);
        assert_ne!(market_1, market_2);

        let (integrator_1, _) = IntegratorFeeLedgerPDA::derive(&program_id, &integrator, 1);
        let (integrator_2, _) = IntegratorFeeLedgerPDA::derive(&program_id, &integrator, 2);
        let (other_1, _) = IntegratorFeeLedgerPDA::derive(&program_id, &Pubkey::new_unique(), 1);
        assert_ne!(integrator_1, integrator_2);
        assert_ne!(integrator_1, other_1);
        assert_ne!(integrator_1, market_1);
    }

    #[test]
    fn test_singletons_are_stable() {
        let program_id = Pubkey::new_unique();
        assert_eq!(
            IncentiveParametersPDA::derive(&program_id),
            IncentiveParametersPDA::derive(&program_id)
        );
        assert_ne!(
            CapabilityVaultPDA::derive(&program_id).0,
            TreasuryAuthorityPDA::derive(&program_id).0
        );
    }
}
