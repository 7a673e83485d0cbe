//! Relay quotes for Across deposits.
//!
//! A quote carries the relay fee and the exclusivity terms that must be copied
//! into the `depositV3` call. Quotes are fetched per deposit and never cached.

pub mod across;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
mod serde_helpers;

use alloy_primitives::{Address, Bytes, U256};
use std::future::Future;
use thiserror::Error;

pub use across::AcrossQuoteClient;

/// Errors that can occur while fetching a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The endpoint could not be reached.
    #[error("Network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-2xx status.
    #[error("Quote API returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not the expected JSON.
    #[error("Failed to decode quote: {0}")]
    Decode(String),
    /// A field was present but not usable.
    #[error("Invalid quote field {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Parameters of a proposed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Input token on the origin chain
    pub token: Address,
    /// Input amount in the token's smallest unit
    pub amount: U256,
    /// Origin chain ID
    pub origin_chain_id: u64,
    /// Destination chain ID
    pub destination_chain_id: u64,
    /// Encoded message executed on the destination chain
    pub message: Bytes,
    /// Destination recipient (the message handler)
    pub recipient: Address,
}

/// Fee and deadline terms for a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayQuote {
    /// Total relay fee in the input token's smallest unit
    pub total_relay_fee: U256,
    /// Relayer with exclusive fill rights (zero for none)
    pub exclusive_relayer: Address,
    /// Quote timestamp (unix seconds), passed as `quoteTimestamp`
    pub timestamp: u32,
    /// End of the exclusivity window, passed as `exclusivityDeadline`
    pub exclusivity_deadline: u32,
}

/// Source of relay quotes.
pub trait QuoteSource: Send + Sync {
    /// Fetch a quote for the proposed transfer.
    fn fetch_quote(
        &self,
        request: &QuoteRequest,
    ) -> impl Future<Output = Result<RelayQuote, QuoteError>> + Send;
}

impl<Q: QuoteSource> QuoteSource for &Q {
    fn fetch_quote(
        &self,
        request: &QuoteRequest,
    ) -> impl Future<Output = Result<RelayQuote, QuoteError>> + Send {
        (**self).fetch_quote(request)
    }
}
