//! Protocol-wide limits for incentive configuration

/// Smallest flat fee (registration fees, withdrawal costs) accepted by configuration.
/// Keeps every fee strictly non-free.
pub const MIN_FEE: u64 = 1;

/// Smallest taker fee divisor accepted by configuration, rules out division by zero
pub const MIN_DIVISOR: u64 = 1;

/// Fields per raw tier: fee share divisor, activation cost, withdrawal cost
pub const N_TIER_FIELDS: usize = 3;

/// Position of each field inside a raw tier
pub const FEE_SHARE_DIVISOR_INDEX: usize = 0;
pub const ACTIVATION_COST_INDEX: usize = 1;
pub const WITHDRAWAL_COST_INDEX: usize = 2;

/// Maximum number of tiers in a schedule (tier indices fit in a u8)
pub const MAX_TIERS: usize = 255;

/// Serialized size of one tier (three u64 fields)
pub const TIER_LEN: usize = 8 * N_TIER_FIELDS;
