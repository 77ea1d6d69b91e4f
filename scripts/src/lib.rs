//! Scripts for deploying the token & position manager contracts and
//! bootstrapping their Uniswap V3 liquidity pool.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod price;
mod solidity;
pub mod utils;
pub mod verify;
