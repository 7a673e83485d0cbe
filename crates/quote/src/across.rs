//! Client for the Across `suggested-fees` endpoint.
//!
//! See: https://docs.across.to/reference/api-reference#suggested-fees

use crate::{
    serde_helpers::string_or_number, QuoteError, QuoteRequest, QuoteSource, RelayQuote,
};
use alloy_primitives::{Address, U256};
use serde::Deserialize;
use tracing::{debug, info};

/// HTTP client for Across relay quotes.
#[derive(Debug, Clone)]
pub struct AcrossQuoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl AcrossQuoteClient {
    /// Creates a client for the API rooted at `base_url` (e.g. "https://app.across.to/api").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn suggested_fees_url(&self) -> String {
        format!("{}/suggested-fees", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, request: &QuoteRequest) -> reqwest::RequestBuilder {
        self.client.get(self.suggested_fees_url()).query(&[
            ("token", request.token.to_string()),
            ("originChainId", request.origin_chain_id.to_string()),
            ("destinationChainId", request.destination_chain_id.to_string()),
            ("amount", request.amount.to_string()),
            ("message", request.message.to_string()),
            ("recipient", request.recipient.to_string()),
        ])
    }
}

impl QuoteSource for AcrossQuoteClient {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<RelayQuote, QuoteError> {
        debug!(
            token = %request.token,
            amount = %request.amount,
            origin_chain_id = request.origin_chain_id,
            destination_chain_id = request.destination_chain_id,
            message_len = request.message.len(),
            "Requesting suggested fees"
        );

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(QuoteError::Status { status, body });
        }

        let body: SuggestedFees = response
            .json()
            .await
            .map_err(|e| QuoteError::Decode(e.to_string()))?;

        let quote = RelayQuote::try_from(body)?;

        info!(
            total_relay_fee = %quote.total_relay_fee,
            exclusive_relayer = %quote.exclusive_relayer,
            timestamp = quote.timestamp,
            exclusivity_deadline = quote.exclusivity_deadline,
            "Received relay quote"
        );

        Ok(quote)
    }
}

/// The subset of the `suggested-fees` response the deposit needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedFees {
    total_relay_fee: FeeComponent,
    exclusive_relayer: Address,
    #[serde(deserialize_with = "string_or_number")]
    timestamp: String,
    #[serde(deserialize_with = "string_or_number")]
    exclusivity_deadline: String,
    #[serde(default)]
    is_amount_too_low: bool,
}

#[derive(Debug, Deserialize)]
struct FeeComponent {
    #[serde(deserialize_with = "string_or_number")]
    total: String,
}

impl TryFrom<SuggestedFees> for RelayQuote {
    type Error = QuoteError;

    fn try_from(fees: SuggestedFees) -> Result<Self, Self::Error> {
        if fees.is_amount_too_low {
            return Err(QuoteError::InvalidField {
                field: "isAmountTooLow",
                value: "true".to_string(),
            });
        }

        let total_relay_fee = U256::from_str_radix(&fees.total_relay_fee.total, 10).map_err(|_| {
            QuoteError::InvalidField {
                field: "totalRelayFee.total",
                value: fees.total_relay_fee.total.clone(),
            }
        })?;

        Ok(Self {
            total_relay_fee,
            exclusive_relayer: fees.exclusive_relayer,
            timestamp: parse_u32("timestamp", &fees.timestamp)?,
            exclusivity_deadline: parse_u32("exclusivityDeadline", &fees.exclusivity_deadline)?,
        })
    }
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, QuoteError> {
    value.parse().map_err(|_| QuoteError::InvalidField {
        field,
        value: value.to_string(),
    })
}
