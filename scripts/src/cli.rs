//! Definitions of CLI arguments and commands for the deploy scripts

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{
        bootstrap_pool, create_position, deploy_manager, deploy_token, remove_liquidity,
        verify_deployed,
    },
    constants::{NONFUNGIBLE_POSITION_MANAGER_ADDRESS, UNISWAP_V3_FACTORY_ADDRESS},
    errors::ScriptError,
    utils::Wallet,
};

/// The CLI for the deploy scripts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = "PRIVATE_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to the `deployments.json` file in which deployed addresses are
    /// recorded
    #[arg(long, default_value = "deployments.json")]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy script commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the token contract and submit it for verification
    DeployToken(DeployTokenArgs),
    /// Deploy the position manager wrapper contract and submit it for
    /// verification
    DeployManager(DeployManagerArgs),
    /// Mint and approve the pool tokens, then create and initialize the
    /// liquidity pool if it does not already exist
    BootstrapPool(BootstrapPoolArgs),
    /// Open a liquidity position through the manager contract
    CreatePosition(CreatePositionArgs),
    /// Remove the liquidity held by a position
    RemoveLiquidity(RemoveLiquidityArgs),
    /// Submit an already-deployed contract for verification
    Verify(VerifyArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        client: Wallet,
        deployer: Address,
        rpc_url: &str,
        deployments_path: &str,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployToken(args) => {
                deploy_token(args, client, rpc_url, deployments_path).await
            }
            Command::DeployManager(args) => {
                deploy_manager(args, client, rpc_url, deployments_path).await
            }
            Command::BootstrapPool(args) => {
                bootstrap_pool(args, client, deployer, deployments_path).await
            }
            Command::CreatePosition(args) => {
                create_position(args, client, deployments_path).await
            }
            Command::RemoveLiquidity(args) => {
                remove_liquidity(args, client, deployments_path).await
            }
            Command::Verify(args) => verify_deployed(args, rpc_url),
        }
    }
}

/// Deploy the token contract
#[derive(Args)]
pub struct DeployTokenArgs {
    /// Path to the token's compilation artifact
    #[arg(short, long)]
    pub artifact: String,

    /// The contract identifier, in `path:name` form, under which the token
    /// is submitted for verification
    #[arg(short, long, default_value = "contracts/Token.sol:Token")]
    pub contract: String,

    /// The block-explorer API key
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: String,
}

/// Deploy the position manager wrapper contract
#[derive(Args)]
pub struct DeployManagerArgs {
    /// Path to the manager's compilation artifact
    #[arg(short, long)]
    pub artifact: String,

    /// The contract identifier, in `path:name` form, under which the
    /// manager is submitted for verification
    #[arg(
        short,
        long,
        default_value = "contracts/UniswapV3Manager.sol:UniswapV3Manager"
    )]
    pub contract: String,

    /// Address of the nonfungible position manager the wrapper delegates
    /// to, the manager's single constructor argument
    #[arg(long, default_value = NONFUNGIBLE_POSITION_MANAGER_ADDRESS)]
    pub position_manager: String,

    /// The block-explorer API key
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: String,
}

/// Bootstrap the liquidity pool for a token pair
#[derive(Args)]
pub struct BootstrapPoolArgs {
    /// Address of the first pool token
    #[arg(long)]
    pub token0: String,

    /// Address of the second pool token
    #[arg(long)]
    pub token1: String,

    /// The pool fee tier, in hundredths of a basis point
    #[arg(short, long, default_value_t = 3000)]
    pub fee: u32,

    /// The amount of token0 to mint and approve, in whole tokens
    #[arg(long, default_value = "10000")]
    pub amount0: String,

    /// The amount of token1 to mint and approve, in whole tokens
    #[arg(long, default_value = "10000")]
    pub amount1: String,

    /// Address of the Uniswap V3 factory
    #[arg(long, default_value = UNISWAP_V3_FACTORY_ADDRESS)]
    pub factory: String,

    /// Address of the nonfungible position manager approved to spend the
    /// minted tokens
    #[arg(long, default_value = NONFUNGIBLE_POSITION_MANAGER_ADDRESS)]
    pub position_manager: String,
}

/// Open a liquidity position through the manager contract
#[derive(Args)]
pub struct CreatePositionArgs {
    /// Address of the manager contract; read from the deployments file when
    /// omitted
    #[arg(short, long)]
    pub manager: Option<String>,

    /// Address of the pool to open the position in
    #[arg(long)]
    pub pool: String,

    /// Address of the first pool token
    #[arg(long)]
    pub token0: String,

    /// Address of the second pool token
    #[arg(long)]
    pub token1: String,

    /// The amount of token0 to deposit, in whole tokens
    #[arg(long, default_value = "100")]
    pub amount0: String,

    /// The amount of token1 to deposit, in whole tokens
    #[arg(long, default_value = "100")]
    pub amount1: String,

    /// The tick-range placement of the position: 0 straddles the current
    /// tick, 1 sits entirely above it, 2 entirely below
    #[arg(short, long, default_value_t = 0)]
    pub position_type: u8,
}

/// Remove the liquidity held by a position
#[derive(Args)]
pub struct RemoveLiquidityArgs {
    /// Address of the manager contract; read from the deployments file when
    /// omitted
    #[arg(short, long)]
    pub manager: Option<String>,

    /// The id of the position to remove liquidity from
    #[arg(long)]
    pub position_id: String,
}

/// Submit an already-deployed contract for verification
#[derive(Args)]
pub struct VerifyArgs {
    /// The deployed contract address
    #[arg(short, long)]
    pub address: String,

    /// The contract identifier, in `path:name` form
    #[arg(short, long)]
    pub contract: String,

    /// The ABI-encoded constructor arguments the contract was deployed
    /// with, in hex form
    #[arg(long)]
    pub constructor_args: Option<String>,

    /// The block-explorer API key
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: String,
}
