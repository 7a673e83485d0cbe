//! Across Protocol contract bindings.
//!
//! Includes:
//! - SpokePool (deposit entry point on the origin chain, fill events on the destination)
//! - MulticallHandler instruction set (the payload carried in a deposit message)

use alloy_sol_types::sol;

sol! {
    /// SpokePool - Main contract on each chain for deposits and fills
    #[sol(rpc)]
    #[allow(clippy::too_many_arguments)]
    interface ISpokePool {
        /// Emitted when funds are deposited (V3 current format with bytes32)
        /// See: https://github.com/across-protocol/contracts/blob/master/contracts/interfaces/V3SpokePoolInterface.sol
        event FundsDeposited(
            bytes32 inputToken,
            bytes32 outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 indexed destinationChainId,
            uint256 indexed depositId,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes32 indexed depositor,
            bytes32 recipient,
            bytes32 exclusiveRelayer,
            bytes message
        );

        /// Emitted when a relay is filled on the destination chain
        event FilledRelay(
            bytes32 inputToken,
            bytes32 outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 repaymentChainId,
            uint256 indexed originChainId,
            uint256 indexed depositId,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes32 exclusiveRelayer,
            bytes32 indexed relayer,
            bytes32 depositor,
            bytes32 recipient,
            bytes32 messageHash,
            V3RelayExecutionEventInfo relayExecutionInfo
        );

        /// Deposit V3 function
        function depositV3(
            address depositor,
            address recipient,
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 destinationChainId,
            address exclusiveRelayer,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes calldata message
        ) external payable;
    }

    /// Fill type for relay execution
    enum FillType {
        FastFill,
        ReplacedSlowFill,
        SlowFill
    }

    /// Relay execution event info
    struct V3RelayExecutionEventInfo {
        bytes32 updatedRecipient;
        bytes32 updatedMessageHash;
        uint256 updatedOutputAmount;
        FillType fillType;
    }

    /// A single call executed by the destination MulticallHandler.
    /// See: https://github.com/across-protocol/contracts/blob/master/contracts/handlers/MulticallHandler.sol
    #[derive(Debug, PartialEq, Eq)]
    struct Call {
        address target;
        bytes callData;
        uint256 value;
    }

    /// Ordered call list plus the address that receives leftover funds
    /// when any call fails.
    #[derive(Debug, PartialEq, Eq)]
    struct Instructions {
        Call[] calls;
        address fallbackRecipient;
    }
}
