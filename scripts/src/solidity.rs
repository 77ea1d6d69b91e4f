//! Definitions of the Solidity interfaces called during deployment

use alloy::{network::Ethereum, sol};

use crate::utils::Wallet;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function mint(address account, uint256 amount) external;
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
    }
}

sol! {
    #[sol(rpc)]
    interface IUniswapV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
        function createPool(address tokenA, address tokenB, uint24 fee) external returns (address pool);
    }
}

sol! {
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function initialize(uint160 sqrtPriceX96) external;
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked);
    }
}

sol! {
    #[sol(rpc)]
    interface IUniswapV3Manager {
        function nonfungiblePositionManager() external view returns (address);
        function createPosition(address pool, uint256 amount0, uint256 amount1, uint8 positionType) external returns (uint256 tokenId);
        function positionInfo(uint256 tokenId) external view returns (int24 tickLower, int24 tickUpper, uint128 liquidity, int24 currentTick);
        function removeLiquidity(uint256 tokenId) external;
    }
}

/// An ERC20 instance with default generics
pub type Erc20 = IERC20::IERC20Instance<Wallet, Ethereum>;

/// A Uniswap V3 factory instance with default generics
pub type UniswapV3Factory = IUniswapV3Factory::IUniswapV3FactoryInstance<Wallet, Ethereum>;

/// A Uniswap V3 pool instance with default generics
pub type UniswapV3Pool = IUniswapV3Pool::IUniswapV3PoolInstance<Wallet, Ethereum>;

/// A position manager wrapper instance with default generics
pub type UniswapV3Manager = IUniswapV3Manager::IUniswapV3ManagerInstance<Wallet, Ethereum>;
