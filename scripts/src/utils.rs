//! Utilities for the deploy scripts.

use std::{fs, io::Read, path::PathBuf, str::FromStr, time::Duration};

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::{Ethereum, TransactionBuilder},
    primitives::{
        utils::parse_units,
        Address, Bytes, TxHash, U256,
    },
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Log, TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use json::JsonValue;
use tracing::info;

use crate::{
    constants::{BYTECODE_KEY, BYTECODE_OBJECT_KEY, DEPLOYMENTS_KEY, POSITION_CREATED_EVENT_TOPIC},
    errors::ScriptError,
};

/// The provider type with which contract instances are constructed
pub type Wallet = DynProvider<Ethereum>;

/// The call builder type produced by the contract instances in this crate
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a Wallet, C, Ethereum>;

/// Sets up the RPC client with which all chain calls are made, signing with
/// the given private key.
///
/// Returns the client along with the deployer address derived from the key.
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<(Wallet, Address), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok((DynProvider::new(provider), deployer))
}

/// Parse a whole-token amount into base units using the token's decimals
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256, ScriptError> {
    let parsed = parse_units(amount, decimals)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
    Ok(parsed.get_absolute())
}

/// Parse an address from a hex string.
///
/// All addresses cross into the scripts through this single boundary, so a
/// pool lookup and a pool creation made with the same CLI inputs always use
/// byte-identical keys.
pub fn parse_addr(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

// ----------------
// | Transactions |
// ----------------

/// Send a transaction, wait for its receipt, and ensure it did not revert
pub async fn send_tx<C: CallDecoder>(
    tx: ScriptCallBuilder<'_, C>,
) -> Result<TransactionReceipt, ScriptError> {
    let pending_tx = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(receipt)
}

/// Send a view call and return the decoded result
pub async fn call_helper<C: CallDecoder + Unpin>(
    call: ScriptCallBuilder<'_, C>,
) -> Result<C::CallOutput, ScriptError> {
    call.call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// Deploy a contract from its creation bytecode and ABI-encoded constructor
/// arguments, returning the deployed address
pub async fn deploy_contract(
    client: &Wallet,
    mut bytecode: Vec<u8>,
    constructor_args: &[u8],
) -> Result<Address, ScriptError> {
    bytecode.extend_from_slice(constructor_args);

    let tx = TransactionRequest::default().with_deploy_code(Bytes::from(bytecode));
    let receipt = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    deployed_address(receipt.status(), receipt.contract_address, receipt.transaction_hash)
}

/// Extract the deployed address from a creation receipt's outcome.
///
/// A reverted creation is fatal even when the node populates the contract
/// address on the receipt.
fn deployed_address(
    status: bool,
    contract_address: Option<Address>,
    tx_hash: TxHash,
) -> Result<Address, ScriptError> {
    if !status {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment transaction {tx_hash:#x} reverted"
        )));
    }

    contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment("deployment receipt has no contract address".to_string())
    })
}

/// Extract the position id from the receipt logs of a position creation
/// transaction, matching on the position-created event topic
pub fn parse_position_id(logs: &[Log]) -> Result<U256, ScriptError> {
    let log = logs
        .iter()
        .find(|log| log.inner.data.topics().first() == Some(&POSITION_CREATED_EVENT_TOPIC))
        .ok_or_else(|| {
            ScriptError::ContractInteraction(
                "no position creation event found in receipt logs".to_string(),
            )
        })?;

    let data = &log.inner.data.data;
    if data.len() < 32 {
        return Err(ScriptError::ContractInteraction(
            "position creation event data too short".to_string(),
        ));
    }

    Ok(U256::from_be_slice(&data[..32]))
}

/// Suspend the calling sequence for at least the given number of
/// milliseconds.
///
/// Used between deployment and verification so the block explorer has time
/// to index the new contract.
pub async fn wait_for_indexing(delay_ms: u64) {
    info!("waiting {delay_ms}ms for the explorer to index the deployment...");
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

// ---------
// | Files |
// ---------

/// Parse a JSON file into a [`JsonValue`]
pub fn get_json_from_file(file_path: &str) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    fs::File::open(file_path)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Read the creation bytecode from a compilation artifact.
///
/// Accepts both artifact shapes in circulation: a plain hex string under
/// the bytecode key, or an object nesting the hex string under `object`.
pub fn read_artifact_bytecode(file_path: &str) -> Result<Vec<u8>, ScriptError> {
    let artifact = get_json_from_file(file_path)?;
    parse_artifact_bytecode(&artifact)
}

/// Extract the creation bytecode from a parsed compilation artifact
fn parse_artifact_bytecode(artifact: &JsonValue) -> Result<Vec<u8>, ScriptError> {
    let bytecode = &artifact[BYTECODE_KEY];
    let hex_str = if bytecode.is_string() {
        bytecode.as_str()
    } else {
        bytecode[BYTECODE_OBJECT_KEY].as_str()
    }
    .ok_or_else(|| {
        ScriptError::ArtifactParsing("could not find bytecode in artifact".to_string())
    })?;

    hex::decode(hex_str.trim_start_matches("0x"))
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
}

/// Parse the address stored under the given contract key in the
/// deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadFile(
                    "could not parse contract address from deployments file".to_string(),
                )
            })?,
    )
    .map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Record a deployed contract address under the given key in the
/// deployments file
pub fn write_deployed_address(
    file_path: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !PathBuf::from(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use alloy::primitives::{address, Log as PrimitiveLog, LogData, B256};

    use super::*;

    /// A test address
    const TEST_ADDRESS: Address = address!("95088c53F62b6E53142eB2002b0c0661B9853156");

    /// Build an RPC log with the given topic and data words
    fn rpc_log(topic: B256, data: Vec<u8>) -> Log {
        Log {
            inner: PrimitiveLog {
                address: Address::ZERO,
                data: LogData::new_unchecked(vec![topic], Bytes::from(data)),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_deployments_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("deployments_{}.json", std::process::id()));
        let path_str = path.to_str().unwrap();

        write_deployed_address(path_str, "token_contract", TEST_ADDRESS).unwrap();
        let parsed = parse_addr_from_deployments_file(path_str, "token_contract").unwrap();
        assert_eq!(parsed, TEST_ADDRESS);

        // A second write must not clobber the first key
        write_deployed_address(path_str, "pool_contract", Address::ZERO).unwrap();
        let parsed = parse_addr_from_deployments_file(path_str, "token_contract").unwrap();
        assert_eq!(parsed, TEST_ADDRESS);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_deployments_key() {
        let path = std::env::temp_dir().join(format!("deployments_miss_{}.json", std::process::id()));
        let path_str = path.to_str().unwrap();

        write_deployed_address(path_str, "token_contract", TEST_ADDRESS).unwrap();
        assert!(parse_addr_from_deployments_file(path_str, "manager_contract").is_err());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_artifact_bytecode_string_shape() {
        let artifact = json::parse(r#"{ "bytecode": "0x6001600101" }"#).unwrap();
        assert_eq!(
            parse_artifact_bytecode(&artifact).unwrap(),
            vec![0x60, 0x01, 0x60, 0x01, 0x01]
        );
    }

    #[test]
    fn test_artifact_bytecode_object_shape() {
        let artifact = json::parse(r#"{ "bytecode": { "object": "0x6002" } }"#).unwrap();
        assert_eq!(parse_artifact_bytecode(&artifact).unwrap(), vec![0x60, 0x02]);
    }

    #[test]
    fn test_artifact_bytecode_missing() {
        let artifact = json::parse(r#"{ "abi": [] }"#).unwrap();
        assert!(parse_artifact_bytecode(&artifact).is_err());

        let artifact = json::parse(r#"{ "bytecode": "0xzz" }"#).unwrap();
        assert!(parse_artifact_bytecode(&artifact).is_err());
    }

    #[test]
    fn test_parse_position_id() {
        let position_id = U256::from(42u64);
        let logs = vec![
            // An unrelated log ahead of the one we want
            rpc_log(B256::ZERO, vec![0xff; 32]),
            rpc_log(
                POSITION_CREATED_EVENT_TOPIC,
                position_id.to_be_bytes::<32>().to_vec(),
            ),
        ];

        assert_eq!(parse_position_id(&logs).unwrap(), position_id);
    }

    #[test]
    fn test_parse_position_id_missing() {
        let logs = vec![rpc_log(B256::ZERO, vec![0u8; 32])];
        assert!(parse_position_id(&logs).is_err());
        assert!(parse_position_id(&[]).is_err());
    }

    #[test]
    fn test_deployed_address() {
        assert_eq!(
            deployed_address(true, Some(TEST_ADDRESS), TxHash::ZERO).unwrap(),
            TEST_ADDRESS,
        );
    }

    #[test]
    fn test_reverted_deployment_is_fatal() {
        // Some nodes populate the contract address on a reverted creation
        // receipt; the revert must still abort the deployment
        assert!(deployed_address(false, Some(TEST_ADDRESS), TxHash::ZERO).is_err());
    }

    #[test]
    fn test_deployment_without_address_is_fatal() {
        assert!(deployed_address(true, None, TxHash::ZERO).is_err());
    }

    #[test]
    fn test_parse_token_amount() {
        let expected = U256::from(10_000u64) * U256::from(10u8).pow(U256::from(18u8));
        assert_eq!(parse_token_amount("10000", 18).unwrap(), expected);

        assert_eq!(parse_token_amount("1", 0).unwrap(), U256::from(1u8));
        assert!(parse_token_amount("not a number", 18).is_err());
    }

    #[tokio::test]
    async fn test_wait_for_indexing_duration() {
        let requested = 50u64;
        let start = Instant::now();
        wait_for_indexing(requested).await;
        assert!(start.elapsed() >= Duration::from_millis(requested));
    }
}
