use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ttl::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};

pub const ADMIN: Symbol = symbol_short!("ADMIN");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token being staked; rewards are paid in the same token
    pub staked_token: Address,
    /// Reserve holding the reward budget (e.g. a liquidity pair).
    /// Claims are rejected when its balance cannot cover the pending amount.
    pub reward_source: Address,
}
const CONFIG: Symbol = symbol_short!("CONFIG");

pub fn get_config(env: &Env) -> Config {
    let config = env
        .storage()
        .persistent()
        .get(&CONFIG)
        .expect("Staking: Config not set");
    env.storage().persistent().extend_ttl(
        &CONFIG,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );

    config
}

pub fn save_config(env: &Env, config: Config) {
    env.storage().persistent().set(&CONFIG, &config);
    env.storage().persistent().extend_ttl(
        &CONFIG,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserInfo {
    /// The amount of tokens currently staked by this user
    pub amount: i128,
    /// The reward debt is a mechanism to determine how much a user has already been credited
    /// in terms of staking rewards. Whenever a user stakes or unstakes, the debt is recomputed
    /// from the accumulated reward per share, so only rewards accrued after the change remain
    /// claimable. When claiming, this debt determines how much the user is actually paid.
    pub reward_debt: u128,
}

/// Missing entries read as the all-zero record; records are never deleted,
/// a fully withdrawn user simply persists at zero amount.
pub fn get_user_info(env: &Env, key: &Address) -> UserInfo {
    let user_info = match env.storage().persistent().get::<_, UserInfo>(key) {
        Some(user_info) => user_info,
        None => UserInfo {
            amount: 0i128,
            reward_debt: 0u128,
        },
    };
    env.storage().persistent().has(&key).then(|| {
        env.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    });

    user_info
}

pub fn save_user_info(env: &Env, key: &Address, user_info: &UserInfo) {
    env.storage().persistent().set(key, user_info);
    env.storage().persistent().extend_ttl(
        key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub mod utils {
    use crate::error::ContractError;

    use super::*;

    use crate::ttl::{INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};
    use soroban_sdk::{log, panic_with_error, ConversionError, TryFromVal, Val};

    #[derive(Clone, Copy)]
    #[repr(u32)]
    pub enum DataKey {
        TotalStaked = 0,
        Distribution = 1,
        Initialized = 2,
    }

    impl TryFromVal<Env, DataKey> for Val {
        type Error = ConversionError;

        fn try_from_val(_env: &Env, v: &DataKey) -> Result<Self, Self::Error> {
            Ok((*v as u32).into())
        }
    }

    pub fn is_initialized(e: &Env) -> bool {
        e.storage()
            .instance()
            .get(&DataKey::Initialized)
            .unwrap_or(false)
    }

    pub fn set_initialized(e: &Env) {
        e.storage().instance().set(&DataKey::Initialized, &true);
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn save_admin(e: &Env, address: &Address) {
        e.storage().instance().set(&ADMIN, &address);
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn get_admin(e: &Env) -> Address {
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        e.storage().instance().get(&ADMIN).unwrap_or_else(|| {
            log!(e, "Staking: Admin not set");
            panic_with_error!(&e, ContractError::AdminNotSet)
        })
    }

    pub fn init_total_staked(e: &Env) {
        e.storage().persistent().set(&DataKey::TotalStaked, &0i128);
        e.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn increase_total_staked(e: &Env, amount: &i128) {
        let count = get_total_staked_counter(e);
        e.storage()
            .persistent()
            .set(&DataKey::TotalStaked, &(count + amount));

        e.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn decrease_total_staked(e: &Env, amount: &i128) {
        let count = get_total_staked_counter(e);
        e.storage()
            .persistent()
            .set(&DataKey::TotalStaked, &(count - amount));

        e.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn get_total_staked_counter(env: &Env) -> i128 {
        let total_staked = env
            .storage()
            .persistent()
            .get(&DataKey::TotalStaked)
            .expect("Staking: Total staked not set");
        env.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );

        total_staked
    }
}
