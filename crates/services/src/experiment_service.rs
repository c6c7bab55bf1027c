use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use quiz_core::model::{Arm, ArmLabels, ExperimentAssignment, UserKey, VariantLabel};

use crate::config::FlagServiceConfig;
use crate::error::AssignmentError;

/// External decision service that buckets a user into an arm.
#[async_trait]
pub trait AssignmentProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `AssignmentError` when the decision cannot be obtained.
    async fn assign(&self, key: &UserKey) -> Result<Arm, AssignmentError>;
}

/// Always answers with the same arm.
#[derive(Clone, Copy, Debug)]
pub struct FixedAssignmentProvider(pub Arm);

#[async_trait]
impl AssignmentProvider for FixedAssignmentProvider {
    async fn assign(&self, _key: &UserKey) -> Result<Arm, AssignmentError> {
        Ok(self.0)
    }
}

/// Evaluates a boolean flag over HTTP; `false` is arm A.
#[derive(Clone)]
pub struct HttpAssignmentProvider {
    client: Client,
    config: FlagServiceConfig,
}

impl HttpAssignmentProvider {
    #[must_use]
    pub fn new(config: FlagServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct FlagRequest<'a> {
    flag: &'a str,
    key: &'a str,
}

#[derive(Debug, Deserialize)]
struct FlagResponse {
    value: bool,
}

#[async_trait]
impl AssignmentProvider for HttpAssignmentProvider {
    async fn assign(&self, key: &UserKey) -> Result<Arm, AssignmentError> {
        let url = format!("{}/evaluate", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.client_key)
            .json(&FlagRequest {
                flag: &self.config.flag_name,
                key: key.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AssignmentError::HttpStatus(response.status()));
        }

        let body: FlagResponse = response.json().await?;
        Ok(Arm::from_flag(body.value))
    }
}

/// Write-once view of the experiment assignment shared with the controller.
#[derive(Clone, Default)]
pub struct AssignmentHandle {
    inner: Arc<OnceLock<ExperimentAssignment>>,
}

impl AssignmentHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<&ExperimentAssignment> {
        self.inner.get()
    }

    /// Assigned label, or `control` until the assignment arrives.
    #[must_use]
    pub fn variant(&self) -> VariantLabel {
        self.inner
            .get()
            .map_or_else(VariantLabel::control, |a| a.variant().clone())
    }

    /// Returns `false` if an assignment was already recorded.
    pub fn set(&self, assignment: ExperimentAssignment) -> bool {
        self.inner.set(assignment).is_ok()
    }
}

/// Resolves the experiment assignment at most once per process.
#[derive(Clone)]
pub struct ExperimentService {
    provider: Option<Arc<dyn AssignmentProvider>>,
    labels: ArmLabels,
    handle: AssignmentHandle,
}

impl ExperimentService {
    #[must_use]
    pub fn new(provider: Arc<dyn AssignmentProvider>, labels: ArmLabels) -> Self {
        Self {
            provider: Some(provider),
            labels,
            handle: AssignmentHandle::new(),
        }
    }

    /// No decision service configured: everyone stays on `control`.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: None,
            labels: ArmLabels::default(),
            handle: AssignmentHandle::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: Option<FlagServiceConfig>, labels: ArmLabels) -> Self {
        match config {
            Some(config) => Self::new(Arc::new(HttpAssignmentProvider::new(config)), labels),
            None => Self::disabled(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> AssignmentHandle {
        self.handle.clone()
    }

    /// Ask the provider once. Failures and a disabled experiment leave the
    /// handle unresolved, so callers keep using the control label.
    pub async fn resolve(&self, key: &UserKey) -> Option<ExperimentAssignment> {
        if let Some(existing) = self.handle.get() {
            return Some(existing.clone());
        }
        let Some(provider) = self.provider.as_ref() else {
            info!("hint experiment disabled, using control hints");
            return None;
        };

        match provider.assign(key).await {
            Ok(arm) => {
                let assignment = ExperimentAssignment::new(key.clone(), arm, &self.labels);
                if self.handle.set(assignment) {
                    if let Some(assigned) = self.handle.get() {
                        info!(variant = %assigned.variant(), "assigned hint variant");
                    }
                }
                self.handle.get().cloned()
            }
            Err(err) => {
                warn!(error = %err, "experiment assignment failed, using control hints");
                None
            }
        }
    }
}
