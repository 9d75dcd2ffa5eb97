use soroban_sdk::{testutils::Address as _, Address, Env};

use super::setup::{
    advance_blocks, deploy_staking_contract, deploy_token_contract, ONE_TOKEN, REWARD_PER_BLOCK,
};

use crate::{error::ContractError, storage::UserInfo};

#[test]
fn stake_simple() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    token_admin.mint(&user, &(10_000 * ONE_TOKEN));
    staking.stake(&user, &(10_000 * ONE_TOKEN));

    assert_eq!(token.balance(&user), 0);
    assert_eq!(token.balance(&staking.address), 10_000 * ONE_TOKEN);
    assert_eq!(staking.query_total_staked(), 10_000 * ONE_TOKEN);
    assert_eq!(
        staking.query_user_info(&user),
        UserInfo {
            amount: 10_000 * ONE_TOKEN,
            reward_debt: 0,
        }
    );
    // Nothing is pending right after a stake change
    assert_eq!(staking.query_pending_reward(&user), 0);
}

#[test]
fn first_stake_settles_accumulator() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    // Blocks pass with nobody staked; the first stake only moves the block
    // cursor, the accumulator stays at zero
    advance_blocks(&env, 25);

    token_admin.mint(&user, &(50_000 * ONE_TOKEN));
    staking.stake(&user, &(50_000 * ONE_TOKEN));

    assert_eq!(staking.query_last_reward_block(), 25);
    assert_eq!(staking.query_acc_reward_per_share(), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #501)")]
fn stake_zero_tokens_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, _) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    staking.stake(&user, &0);
}

#[test]
#[should_panic]
fn stake_without_token_balance_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, _) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    staking.stake(&user, &(10_000 * ONE_TOKEN));
}

#[test]
fn unstake_more_than_staked_fails_and_changes_nothing() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    token_admin.mint(&user, &(50_000 * ONE_TOKEN));
    staking.stake(&user, &(50_000 * ONE_TOKEN));

    let result = staking.try_un_stake(&user, &(600_000 * ONE_TOKEN));
    assert_eq!(result, Err(Ok(ContractError::InsufficientStake)));

    assert_eq!(token.balance(&user), 0);
    assert_eq!(token.balance(&staking.address), 50_000 * ONE_TOKEN);
    assert_eq!(staking.query_total_staked(), 50_000 * ONE_TOKEN);
    assert_eq!(staking.query_user_info(&user).amount, 50_000 * ONE_TOKEN);
}

#[test]
fn unstake_releases_tokens() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    token_admin.mint(&user, &(50_000 * ONE_TOKEN));
    staking.stake(&user, &(50_000 * ONE_TOKEN));
    staking.un_stake(&user, &(20_000 * ONE_TOKEN));

    assert_eq!(token.balance(&user), 20_000 * ONE_TOKEN);
    assert_eq!(token.balance(&staking.address), 30_000 * ONE_TOKEN);
    assert_eq!(staking.query_total_staked(), 30_000 * ONE_TOKEN);
    assert_eq!(staking.query_user_info(&user).amount, 30_000 * ONE_TOKEN);
    assert_eq!(staking.query_pending_reward(&user), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #501)")]
fn unstake_zero_tokens_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    token_admin.mint(&user, &(10_000 * ONE_TOKEN));
    staking.stake(&user, &(10_000 * ONE_TOKEN));
    staking.un_stake(&user, &0);
}

#[test]
fn total_staked_is_conserved_across_users() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let user2 = Address::generate(&env);
    let user3 = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (_, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token_admin.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    token_admin.mint(&user, &(10_000 * ONE_TOKEN));
    token_admin.mint(&user2, &(20_000 * ONE_TOKEN));
    token_admin.mint(&user3, &(30_000 * ONE_TOKEN));

    staking.stake(&user, &(10_000 * ONE_TOKEN));
    advance_blocks(&env, 3);
    staking.stake(&user2, &(20_000 * ONE_TOKEN));
    advance_blocks(&env, 3);
    staking.stake(&user3, &(30_000 * ONE_TOKEN));
    advance_blocks(&env, 3);
    staking.un_stake(&user2, &(5_000 * ONE_TOKEN));
    staking.un_stake(&user, &(10_000 * ONE_TOKEN));

    let sum = staking.query_user_info(&user).amount
        + staking.query_user_info(&user2).amount
        + staking.query_user_info(&user3).amount;
    assert_eq!(staking.query_total_staked(), sum);
    assert_eq!(sum, 45_000 * ONE_TOKEN);
}

#[test]
fn full_withdrawal_keeps_user_record_at_zero() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let reward_source = Address::generate(&env);
    let (token, token_admin) = deploy_token_contract(&env, &admin);

    let staking = deploy_staking_contract(
        &env,
        admin,
        &token.address,
        &reward_source,
        &REWARD_PER_BLOCK,
    );

    token_admin.mint(&user, &(10_000 * ONE_TOKEN));
    staking.stake(&user, &(10_000 * ONE_TOKEN));
    staking.un_stake(&user, &(10_000 * ONE_TOKEN));

    // The record persists at zero instead of being deleted
    assert_eq!(
        staking.query_user_info(&user),
        UserInfo {
            amount: 0,
            reward_debt: 0,
        }
    );
    assert_eq!(token.balance(&user), 10_000 * ONE_TOKEN);

    // Staking again reuses the same record
    staking.stake(&user, &(10_000 * ONE_TOKEN));
    assert_eq!(staking.query_user_info(&user).amount, 10_000 * ONE_TOKEN);
}
