//! Implementations of the deploy script commands

use std::str::FromStr;

use alloy::{
    primitives::{aliases::U24, Address, U256},
    sol_types::SolValue,
};
use tracing::info;

use crate::{
    cli::{
        BootstrapPoolArgs, CreatePositionArgs, DeployManagerArgs, DeployTokenArgs,
        RemoveLiquidityArgs, VerifyArgs,
    },
    constants::{
        MANAGER_CONTRACT_KEY, MANAGER_VERIFICATION_DELAY_MS, POOL_CONTRACT_KEY,
        TOKEN_CONTRACT_KEY, TOKEN_VERIFICATION_DELAY_MS,
    },
    errors::ScriptError,
    price::encode_sqrt_ratio_x96,
    solidity::{Erc20, UniswapV3Factory, UniswapV3Manager, UniswapV3Pool},
    utils::{
        call_helper, deploy_contract, parse_addr, parse_addr_from_deployments_file,
        parse_position_id, parse_token_amount, read_artifact_bytecode, send_tx,
        wait_for_indexing, write_deployed_address, Wallet,
    },
    verify::{submit_verification, VerificationRequest},
};

/// Deploy the token contract, record its address, and submit it for
/// verification once the explorer has had time to index it
pub(crate) async fn deploy_token(
    args: DeployTokenArgs,
    client: Wallet,
    rpc_url: &str,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let bytecode = read_artifact_bytecode(&args.artifact)?;
    let address = deploy_contract(&client, bytecode, &[] /* constructor_args */).await?;

    info!("token deployed at {address:#x}");
    write_deployed_address(deployments_path, TOKEN_CONTRACT_KEY, address)?;

    wait_for_indexing(TOKEN_VERIFICATION_DELAY_MS).await;
    submit_verification(&VerificationRequest {
        address,
        contract: &args.contract,
        constructor_args: &[],
        etherscan_api_key: &args.etherscan_api_key,
        rpc_url,
    });

    Ok(())
}

/// Deploy the position manager wrapper contract, record its address, and
/// submit it for verification
pub(crate) async fn deploy_manager(
    args: DeployManagerArgs,
    client: Wallet,
    rpc_url: &str,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let position_manager = parse_addr(&args.position_manager)?;
    let constructor_args = position_manager.abi_encode();

    let bytecode = read_artifact_bytecode(&args.artifact)?;
    let address = deploy_contract(&client, bytecode, &constructor_args).await?;

    info!("manager deployed at {address:#x}");
    write_deployed_address(deployments_path, MANAGER_CONTRACT_KEY, address)?;

    wait_for_indexing(MANAGER_VERIFICATION_DELAY_MS).await;
    submit_verification(&VerificationRequest {
        address,
        contract: &args.contract,
        constructor_args: &constructor_args,
        etherscan_api_key: &args.etherscan_api_key,
        rpc_url,
    });

    Ok(())
}

/// Mint and approve the pool tokens, then create and initialize the pool if
/// it does not already exist.
///
/// Every transaction is awaited to its receipt before the next is issued,
/// so the on-chain state advances in a fixed order. An existing pool is
/// left untouched: no second creation is attempted and it is never
/// re-initialized.
pub(crate) async fn bootstrap_pool(
    args: BootstrapPoolArgs,
    client: Wallet,
    deployer: Address,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let token0_addr = parse_addr(&args.token0)?;
    let token1_addr = parse_addr(&args.token1)?;
    let factory_addr = parse_addr(&args.factory)?;
    let spender = parse_addr(&args.position_manager)?;
    let fee =
        U24::try_from(args.fee).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let token0 = Erc20::new(token0_addr, client.clone());
    let token1 = Erc20::new(token1_addr, client.clone());

    let decimals0 = call_helper(token0.decimals()).await?;
    let decimals1 = call_helper(token1.decimals()).await?;
    let amount0 = parse_token_amount(&args.amount0, decimals0)?;
    let amount1 = parse_token_amount(&args.amount1, decimals1)?;

    send_tx(token0.mint(deployer, amount0)).await?;
    send_tx(token1.mint(deployer, amount1)).await?;
    send_tx(token0.approve(spender, amount0)).await?;
    send_tx(token1.approve(spender, amount1)).await?;
    info!("minted and approved");

    let factory = UniswapV3Factory::new(factory_addr, client.clone());
    let mut pool_addr = call_helper(factory.getPool(token0_addr, token1_addr, fee)).await?;

    if pool_addr == Address::ZERO {
        info!("creating pool");
        send_tx(factory.createPool(token0_addr, token1_addr, fee)).await?;
        pool_addr = call_helper(factory.getPool(token0_addr, token1_addr, fee)).await?;

        // Only the run that created the pool sets its starting price
        let sqrt_price = encode_sqrt_ratio_x96(amount1, amount0)?;
        let pool = UniswapV3Pool::new(pool_addr, client.clone());
        send_tx(pool.initialize(sqrt_price)).await?;
        info!("pool created and initialized at {pool_addr:#x}");
    } else {
        info!("pool already exists at {pool_addr:#x}");
    }

    write_deployed_address(deployments_path, POOL_CONTRACT_KEY, pool_addr)?;

    Ok(())
}

/// Open a liquidity position through the manager, extracting the position
/// id from the creation receipt
pub(crate) async fn create_position(
    args: CreatePositionArgs,
    client: Wallet,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let manager_addr = match &args.manager {
        Some(addr) => parse_addr(addr)?,
        None => parse_addr_from_deployments_file(deployments_path, MANAGER_CONTRACT_KEY)?,
    };
    let pool_addr = parse_addr(&args.pool)?;

    let token0 = Erc20::new(parse_addr(&args.token0)?, client.clone());
    let token1 = Erc20::new(parse_addr(&args.token1)?, client.clone());

    let decimals0 = call_helper(token0.decimals()).await?;
    let decimals1 = call_helper(token1.decimals()).await?;
    let amount0 = parse_token_amount(&args.amount0, decimals0)?;
    let amount1 = parse_token_amount(&args.amount1, decimals1)?;

    send_tx(token0.approve(manager_addr, amount0)).await?;
    send_tx(token1.approve(manager_addr, amount1)).await?;

    let manager = UniswapV3Manager::new(manager_addr, client.clone());
    let receipt = send_tx(manager.createPosition(
        pool_addr,
        amount0,
        amount1,
        args.position_type,
    ))
    .await?;

    let position_id = parse_position_id(receipt.logs())?;
    info!("created position {position_id}");

    let position = call_helper(manager.positionInfo(position_id)).await?;
    info!(
        "position ticks [{}, {}], pool tick {}",
        position.tickLower, position.tickUpper, position.currentTick
    );

    Ok(())
}

/// Remove the liquidity held by a position
pub(crate) async fn remove_liquidity(
    args: RemoveLiquidityArgs,
    client: Wallet,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let manager_addr = match &args.manager {
        Some(addr) => parse_addr(addr)?,
        None => parse_addr_from_deployments_file(deployments_path, MANAGER_CONTRACT_KEY)?,
    };
    let position_id = U256::from_str(&args.position_id)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let manager = UniswapV3Manager::new(manager_addr, client);
    send_tx(manager.removeLiquidity(position_id)).await?;
    info!("removed liquidity from position {position_id}");

    Ok(())
}

/// Submit an already-deployed contract for verification
pub(crate) fn verify_deployed(args: VerifyArgs, rpc_url: &str) -> Result<(), ScriptError> {
    let address = parse_addr(&args.address)?;
    let constructor_args = match &args.constructor_args {
        Some(hex_str) => hex::decode(hex_str.trim_start_matches("0x"))
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?,
        None => Vec::new(),
    };

    submit_verification(&VerificationRequest {
        address,
        contract: &args.contract,
        constructor_args: &constructor_args,
        etherscan_api_key: &args.etherscan_api_key,
        rpc_url,
    });

    Ok(())
}
