use soroban_sdk::{contracttype, Env};

use crate::storage::{utils, UserInfo};
use crate::ttl::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};

/// Fixed-point scale for `acc_reward_per_share`. Rewards per staked unit are
/// tracked scaled up by 10^12 so that integer division keeps sub-unit
/// precision; the truncated remainder is dust that stays unclaimed.
pub const SHARE_SCALE: u128 = 1_000_000_000_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Distribution {
    /// Reward units released per ledger sequence across all stakers;
    /// admin mutable
    pub reward_per_block: i128,
    /// Cumulative reward per staked unit since inception, scaled by
    /// [`SHARE_SCALE`]; never decreases
    pub acc_reward_per_share: u128,
    /// Ledger sequence at which the accumulator was last brought current
    pub last_reward_block: u64,
}

pub fn get_distribution(env: &Env) -> Distribution {
    let distribution = env
        .storage()
        .persistent()
        .get(&utils::DataKey::Distribution)
        .expect("Staking: Distribution not set");
    env.storage().persistent().extend_ttl(
        &utils::DataKey::Distribution,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );

    distribution
}

pub fn save_distribution(env: &Env, distribution: &Distribution) {
    env.storage()
        .persistent()
        .set(&utils::DataKey::Distribution, distribution);
    env.storage().persistent().extend_ttl(
        &utils::DataKey::Distribution,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

/// Two-point reward form: total reward released between two ledger
/// sequences at the given rate. An inverted range yields zero, never a
/// negative reward.
pub fn calculate_reward(reward_per_block: i128, from_block: u64, to_block: u64) -> u128 {
    if to_block <= from_block {
        return 0;
    }
    (to_block - from_block) as u128 * reward_per_block as u128
}

/// Reward debt baseline for a user holding `amount` at the given
/// accumulator value.
pub fn reward_debt_for(amount: i128, acc_reward_per_share: u128) -> u128 {
    amount as u128 * acc_reward_per_share / SHARE_SCALE
}

/// Reward accrued by the user since their last baseline. Requires a settled
/// accumulator; the subtraction underflows (and aborts) otherwise.
pub fn pending_reward(user_info: &UserInfo, acc_reward_per_share: u128) -> i128 {
    (reward_debt_for(user_info.amount, acc_reward_per_share) - user_info.reward_debt) as i128
}

/// Core accumulator step. Brings the distribution current with
/// `current_block`; a no-op when the ledger has not advanced, which also
/// clamps a clock that claims to have gone backwards. With nothing staked
/// the interval's reward is forfeited, not banked - only the block cursor
/// moves.
fn advance(distribution: &mut Distribution, current_block: u64, total_staked: i128) {
    if current_block <= distribution.last_reward_block {
        return;
    }
    if total_staked > 0 {
        let reward = calculate_reward(
            distribution.reward_per_block,
            distribution.last_reward_block,
            current_block,
        );
        // Truncating division; the lost remainder is dust by design
        distribution.acc_reward_per_share += reward * SHARE_SCALE / total_staked as u128;
    }
    distribution.last_reward_block = current_block;
}

/// Settles the accumulator to the current ledger sequence and persists it.
/// Every state-mutating entry point runs this first.
pub fn update_rewards(env: &Env) -> Distribution {
    let mut distribution = get_distribution(env);
    let settled_block = distribution.last_reward_block;

    advance(
        &mut distribution,
        env.ledger().sequence() as u64,
        utils::get_total_staked_counter(env),
    );

    if distribution.last_reward_block != settled_block {
        save_distribution(env, &distribution);
    }
    distribution
}

/// Same advance as [`update_rewards`] on a scratch copy, without
/// persisting. Read-only queries must report the state a settlement
/// running now would produce.
pub fn settled_view(env: &Env) -> Distribution {
    let mut distribution = get_distribution(env);
    advance(
        &mut distribution,
        env.ledger().sequence() as u64,
        utils::get_total_staked_counter(env),
    );
    distribution
}
