//! Best-effort submission of deployed contracts to the block-explorer
//! verification service.
//!
//! A script's success is never gated on verification: whatever the service
//! answers, the outcome is logged and execution continues.

use std::process::Command;

use alloy::primitives::Address;
use tracing::{info, warn};

use crate::constants::{ALREADY_VERIFIED_PATTERN, FORGE_COMMAND, VERIFY_CONTRACT_COMMAND};

/// A request to verify a deployed contract's source against its on-chain
/// bytecode
pub struct VerificationRequest<'a> {
    /// The deployed contract address
    pub address: Address,
    /// The contract identifier, in `path:name` form
    pub contract: &'a str,
    /// The ABI-encoded constructor arguments the contract was deployed with
    pub constructor_args: &'a [u8],
    /// The block-explorer API key
    pub etherscan_api_key: &'a str,
    /// The RPC URL of the network the contract is deployed on
    pub rpc_url: &'a str,
}

/// The classified result of a verification submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The service accepted and confirmed the submission
    Verified,
    /// The service reported the contract as already verified, which callers
    /// treat the same as a success
    AlreadyVerified,
    /// Any other failure, carrying the service's output
    Failed(String),
}

/// Submit a deployed contract for verification and classify the service's
/// response.
///
/// Failures are logged and returned, never propagated as errors.
pub fn submit_verification(request: &VerificationRequest<'_>) -> VerificationOutcome {
    let mut cmd = Command::new(FORGE_COMMAND);
    cmd.arg(VERIFY_CONTRACT_COMMAND)
        .arg(format!("{:#x}", request.address))
        .arg(request.contract)
        .arg("--rpc-url")
        .arg(request.rpc_url)
        .arg("--etherscan-api-key")
        .arg(request.etherscan_api_key)
        .arg("--watch");

    if !request.constructor_args.is_empty() {
        cmd.arg("--constructor-args")
            .arg(format!("0x{}", hex::encode(request.constructor_args)));
    }

    let outcome = match cmd.output() {
        Ok(output) => {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            classify_verification_output(output.status.success(), &combined)
        }
        Err(e) => VerificationOutcome::Failed(e.to_string()),
    };

    match &outcome {
        VerificationOutcome::Verified => {
            info!("contract {:#x} verified", request.address);
        }
        VerificationOutcome::AlreadyVerified => {
            info!("Already verified!");
        }
        VerificationOutcome::Failed(msg) => {
            warn!("verification of {:#x} failed: {}", request.address, msg);
        }
    }

    outcome
}

/// Classify the output of a verification submission
pub fn classify_verification_output(success: bool, output: &str) -> VerificationOutcome {
    if success {
        VerificationOutcome::Verified
    } else if is_already_verified(output) {
        VerificationOutcome::AlreadyVerified
    } else {
        VerificationOutcome::Failed(output.trim().to_string())
    }
}

/// Whether a failure message signals that the contract is already verified.
///
/// This is the single place the service's wording is matched against; call
/// sites only ever see the classified outcome.
fn is_already_verified(message: &str) -> bool {
    message.to_lowercase().contains(ALREADY_VERIFIED_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_classifies_as_verified() {
        assert_eq!(
            classify_verification_output(true, "Contract successfully verified"),
            VerificationOutcome::Verified,
        );
    }

    #[test]
    fn test_already_verified_is_absorbed() {
        for message in [
            "Contract is already verified",
            "Contract source code Already Verified!",
            "ALREADY VERIFIED",
        ] {
            assert_eq!(
                classify_verification_output(false, message),
                VerificationOutcome::AlreadyVerified,
                "message: {message}",
            );
        }
    }

    #[test]
    fn test_repeat_classification_is_stable() {
        // A resubmission for a verified contract must classify the same way
        // every time it is attempted
        let message = "Contract is already verified";
        let first = classify_verification_output(false, message);
        let second = classify_verification_output(false, message);
        assert_eq!(first, second);
        assert_eq!(second, VerificationOutcome::AlreadyVerified);
    }

    #[test]
    fn test_other_failures_are_reported() {
        let outcome = classify_verification_output(false, "  rate limit exceeded \n");
        assert_eq!(
            outcome,
            VerificationOutcome::Failed("rate limit exceeded".to_string()),
        );
    }
}
