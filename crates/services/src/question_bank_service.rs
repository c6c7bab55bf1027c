use reqwest::Client;
use tracing::{info, warn};

use quiz_core::model::QuestionBank;

use crate::config::QuestionSource;
use crate::error::QuestionSourceError;

/// Result of loading the bank, noting whether the built-in question was used.
#[derive(Debug, Clone)]
pub struct LoadedBank {
    pub bank: QuestionBank,
    pub used_fallback: bool,
}

/// Fetches the question bank from a file or URL.
#[derive(Clone)]
pub struct QuestionBankService {
    client: Client,
    source: QuestionSource,
}

impl QuestionBankService {
    #[must_use]
    pub fn new(source: QuestionSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    /// Fetch and parse the bank.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` for I/O, HTTP or parse failures.
    pub async fn fetch(&self) -> Result<QuestionBank, QuestionSourceError> {
        let raw = match &self.source {
            QuestionSource::File(path) => tokio::fs::read_to_string(path).await?,
            QuestionSource::Url(url) => {
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(QuestionSourceError::HttpStatus(response.status()));
                }
                response.text().await?
            }
        };
        Ok(QuestionBank::from_json_str(&raw)?)
    }

    /// Fetch the bank, substituting the built-in question on any failure.
    pub async fn load_or_fallback(&self) -> LoadedBank {
        match self.fetch().await {
            Ok(bank) => {
                info!(count = bank.len(), "loaded question bank");
                LoadedBank {
                    bank,
                    used_fallback: false,
                }
            }
            Err(err) => {
                warn!(error = %err, source = ?self.source, "question bank unavailable, using fallback question");
                LoadedBank {
                    bank: QuestionBank::fallback(),
                    used_fallback: true,
                }
            }
        }
    }
}
