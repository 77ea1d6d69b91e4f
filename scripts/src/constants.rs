//! Constants used in the deploy scripts

use alloy::primitives::{b256, B256};

/// The canonical Uniswap V3 factory address, identical across the
/// networks these scripts target
pub const UNISWAP_V3_FACTORY_ADDRESS: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";

/// The canonical Uniswap V3 nonfungible position manager address
pub const NONFUNGIBLE_POSITION_MANAGER_ADDRESS: &str =
    "0xC36442b4a4522E871399CD717aBDD847Ab11FE88";

/// The delay, in milliseconds, to wait after deploying the token contract
/// before submitting it for verification
pub const TOKEN_VERIFICATION_DELAY_MS: u64 = 10_000;

/// The delay, in milliseconds, to wait after deploying the manager contract
/// before submitting it for verification.
///
/// The manager takes longer for the explorer to index, so this delay is
/// longer than the token's.
pub const MANAGER_VERIFICATION_DELAY_MS: u64 = 50_000;

/// The topic emitted by the manager when a position is created.
///
/// The receipt log carrying this topic holds the new position id as its
/// first data word.
pub const POSITION_CREATED_EVENT_TOPIC: B256 =
    b256!("a6002b91967bd5507bbfeefa7d745c79e1e21cc2961c38928b1144b7a9a81ece");

/// The name of the `forge` command
pub const FORGE_COMMAND: &str = "forge";

/// The name of the forge subcommand that submits a contract to the
/// block-explorer verification service
pub const VERIFY_CONTRACT_COMMAND: &str = "verify-contract";

/// The substring, matched case-insensitively, by which the verification
/// service signals that a contract has already been verified
pub const ALREADY_VERIFIED_PATTERN: &str = "already verified";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The token contract key in the `deployments.json` file
pub const TOKEN_CONTRACT_KEY: &str = "token_contract";

/// The manager contract key in the `deployments.json` file
pub const MANAGER_CONTRACT_KEY: &str = "manager_contract";

/// The pool contract key in the `deployments.json` file
pub const POOL_CONTRACT_KEY: &str = "pool_contract";

/// The bytecode key in a compilation artifact
pub const BYTECODE_KEY: &str = "bytecode";

/// The key holding the bytecode hex string in artifacts that nest the
/// bytecode under an object
pub const BYTECODE_OBJECT_KEY: &str = "object";
