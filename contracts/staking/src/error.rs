use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 500,
    InvalidAmount = 501,
    InsufficientStake = 502,
    Unauthorized = 503,
    InsufficientRewardLiquidity = 504,
    AdminNotSet = 505,
}
