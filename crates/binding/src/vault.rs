//! Yearn V3 vault bindings.
//!
//! The vault is never called directly from the origin chain. These bindings
//! exist to encode the calls the destination MulticallHandler executes.

use alloy_sol_types::sol;

sol! {
    /// ERC-4626 style Yearn V3 vault
    #[sol(rpc)]
    interface IYearnVault {
        /// Deposit `assets` and mint shares to `receiver`
        function deposit(uint256 assets, address receiver) external returns (uint256);
    }
}
