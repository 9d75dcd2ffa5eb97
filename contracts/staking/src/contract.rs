use soroban_sdk::{
    contract, contractimpl, contractmeta, log, token, Address, BytesN, Env,
};

use crate::{
    distribution::{
        calculate_reward, get_distribution, pending_reward, reward_debt_for, save_distribution,
        settled_view, update_rewards, Distribution,
    },
    error::ContractError,
    msg::ConfigResponse,
    storage::{
        get_config, get_user_info, save_config, save_user_info,
        utils::{self, get_admin},
        Config, UserInfo,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Single pool token staking with per-block reward accrual"
);

#[contract]
pub struct Staking;

pub trait StakingTrait {
    // Sets the staked token, the initial emission rate and the reserve
    // backing reward payouts
    fn initialize(
        env: Env,
        admin: Address,
        staked_token: Address,
        reward_per_block: i128,
        reward_source: Address,
    ) -> Result<(), ContractError>;

    fn stake(env: Env, sender: Address, tokens: i128) -> Result<(), ContractError>;

    fn un_stake(env: Env, sender: Address, tokens: i128) -> Result<(), ContractError>;

    fn claim(env: Env, sender: Address) -> Result<(), ContractError>;

    // Permissionless settlement poke; brings the accumulator current with
    // the present ledger sequence
    fn distribute_reward(env: Env);

    fn set_reward_per_block(
        env: Env,
        sender: Address,
        new_rate: i128,
    ) -> Result<(), ContractError>;

    // QUERIES

    fn query_config(env: Env) -> ConfigResponse;

    fn query_admin(env: Env) -> Address;

    fn query_total_staked(env: Env) -> i128;

    fn query_reward_per_block(env: Env) -> i128;

    fn query_acc_reward_per_share(env: Env) -> u128;

    fn query_last_reward_block(env: Env) -> u64;

    fn query_user_info(env: Env, address: Address) -> UserInfo;

    fn query_reward(env: Env, from_block: u64, to_block: u64) -> u128;

    fn query_pending_reward(env: Env, address: Address) -> i128;
}

#[contractimpl]
impl StakingTrait for Staking {
    fn initialize(
        env: Env,
        admin: Address,
        staked_token: Address,
        reward_per_block: i128,
        reward_source: Address,
    ) -> Result<(), ContractError> {
        if utils::is_initialized(&env) {
            log!(
                &env,
                "Staking: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_block < 0 {
            log!(&env, "Staking: Initialize: reward per block cannot be negative");
            return Err(ContractError::InvalidAmount);
        }

        utils::set_initialized(&env);

        env.events()
            .publish(("initialize", "staking contract"), &staked_token);

        let config = Config {
            staked_token,
            reward_source,
        };
        save_config(&env, config);

        utils::save_admin(&env, &admin);
        utils::init_total_staked(&env);
        save_distribution(
            &env,
            &Distribution {
                reward_per_block,
                acc_reward_per_share: 0u128,
                last_reward_block: env.ledger().sequence() as u64,
            },
        );

        Ok(())
    }

    fn stake(env: Env, sender: Address, tokens: i128) -> Result<(), ContractError> {
        sender.require_auth();

        if tokens <= 0 {
            log!(&env, "Staking: Stake: Trying to stake {} tokens", tokens);
            return Err(ContractError::InvalidAmount);
        }

        let distribution = update_rewards(&env);
        let config = get_config(&env);

        let staked_token_client = token::Client::new(&env, &config.staked_token);
        staked_token_client.transfer(&sender, &env.current_contract_address(), &tokens);

        let mut user_info = get_user_info(&env, &sender);
        user_info.amount += tokens;
        // Rebaseline the whole holding at the settled accumulator; nothing
        // is pending for this user immediately after a stake change
        user_info.reward_debt =
            reward_debt_for(user_info.amount, distribution.acc_reward_per_share);
        save_user_info(&env, &sender, &user_info);
        utils::increase_total_staked(&env, &tokens);

        env.events().publish(("stake", "user"), &sender);
        env.events().publish(("stake", "amount"), tokens);

        Ok(())
    }

    fn un_stake(env: Env, sender: Address, tokens: i128) -> Result<(), ContractError> {
        sender.require_auth();

        if tokens <= 0 {
            log!(&env, "Staking: Unstake: Trying to unstake {} tokens", tokens);
            return Err(ContractError::InvalidAmount);
        }

        let distribution = update_rewards(&env);
        let config = get_config(&env);

        let mut user_info = get_user_info(&env, &sender);
        if tokens > user_info.amount {
            log!(
                &env,
                "Staking: Unstake: Trying to unstake {} tokens with only {} staked",
                tokens,
                user_info.amount
            );
            return Err(ContractError::InsufficientStake);
        }

        let staked_token_client = token::Client::new(&env, &config.staked_token);
        staked_token_client.transfer(&env.current_contract_address(), &sender, &tokens);

        user_info.amount -= tokens;
        user_info.reward_debt =
            reward_debt_for(user_info.amount, distribution.acc_reward_per_share);
        save_user_info(&env, &sender, &user_info);
        utils::decrease_total_staked(&env, &tokens);

        env.events().publish(("unstake", "user"), &sender);
        env.events().publish(("unstake", "amount"), tokens);

        Ok(())
    }

    fn claim(env: Env, sender: Address) -> Result<(), ContractError> {
        sender.require_auth();

        let distribution = update_rewards(&env);
        let config = get_config(&env);

        let mut user_info = get_user_info(&env, &sender);
        let pending = pending_reward(&user_info, distribution.acc_reward_per_share);

        let staked_token_client = token::Client::new(&env, &config.staked_token);
        if staked_token_client.balance(&config.reward_source) < pending {
            log!(
                &env,
                "Staking: Claim: Reward source cannot cover {} pending reward",
                pending
            );
            return Err(ContractError::InsufficientRewardLiquidity);
        }

        // A zero claim is a harmless no-op; the baseline still resets
        if pending > 0 {
            staked_token_client.transfer(&env.current_contract_address(), &sender, &pending);
        }

        user_info.reward_debt =
            reward_debt_for(user_info.amount, distribution.acc_reward_per_share);
        save_user_info(&env, &sender, &user_info);

        env.events().publish(("claim", "user"), &sender);
        env.events().publish(("claim", "amount"), pending);

        Ok(())
    }

    fn distribute_reward(env: Env) {
        update_rewards(&env);
    }

    fn set_reward_per_block(
        env: Env,
        sender: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        if sender != get_admin(&env) {
            log!(&env, "Staking: Set reward per block: Not authorized");
            return Err(ContractError::Unauthorized);
        }
        if new_rate < 0 {
            log!(
                &env,
                "Staking: Set reward per block: rate cannot be negative"
            );
            return Err(ContractError::InvalidAmount);
        }

        // Settle first so reward accrued under the old rate is locked into
        // the accumulator and never retroactively recomputed
        let mut distribution = update_rewards(&env);
        distribution.reward_per_block = new_rate;
        save_distribution(&env, &distribution);

        env.events()
            .publish(("set_reward_per_block", "new rate"), new_rate);

        Ok(())
    }

    // QUERIES

    fn query_config(env: Env) -> ConfigResponse {
        ConfigResponse {
            config: get_config(&env),
        }
    }

    fn query_admin(env: Env) -> Address {
        get_admin(&env)
    }

    fn query_total_staked(env: Env) -> i128 {
        utils::get_total_staked_counter(&env)
    }

    fn query_reward_per_block(env: Env) -> i128 {
        get_distribution(&env).reward_per_block
    }

    fn query_acc_reward_per_share(env: Env) -> u128 {
        get_distribution(&env).acc_reward_per_share
    }

    fn query_last_reward_block(env: Env) -> u64 {
        get_distribution(&env).last_reward_block
    }

    fn query_user_info(env: Env, address: Address) -> UserInfo {
        get_user_info(&env, &address)
    }

    fn query_reward(env: Env, from_block: u64, to_block: u64) -> u128 {
        calculate_reward(get_distribution(&env).reward_per_block, from_block, to_block)
    }

    fn query_pending_reward(env: Env, address: Address) -> i128 {
        let distribution = settled_view(&env);
        pending_reward(
            &get_user_info(&env, &address),
            distribution.acc_reward_per_share,
        )
    }
}

#[contractimpl]
impl Staking {
    #[allow(dead_code)]
    pub fn update(env: Env, new_wasm_hash: BytesN<32>) {
        let admin = get_admin(&env);
        admin.require_auth();

        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }
}
