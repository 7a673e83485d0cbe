//! Fixed-answer [`QuoteSource`] for tests.

use crate::{QuoteError, QuoteRequest, QuoteSource, RelayQuote};
use std::sync::Mutex;

/// Returns the same quote for every request and records the requests.
#[derive(Debug)]
pub struct MockQuoteSource {
    quote: Option<RelayQuote>,
    requests: Mutex<Vec<QuoteRequest>>,
}

impl MockQuoteSource {
    /// Always answer with `quote`.
    pub fn new(quote: RelayQuote) -> Self {
        Self {
            quote: Some(quote),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with a network error.
    pub fn failing() -> Self {
        Self {
            quote: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<QuoteRequest> {
        self.requests
            .lock()
            .expect("mock quote lock poisoned")
            .clone()
    }
}

impl QuoteSource for MockQuoteSource {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<RelayQuote, QuoteError> {
        self.requests
            .lock()
            .expect("mock quote lock poisoned")
            .push(request.clone());

        self.quote
            .clone()
            .ok_or_else(|| QuoteError::Network("mock quote source is failing".to_string()))
    }
}
