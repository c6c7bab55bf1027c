use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Label used before an assignment arrives and as the selection fallback.
pub const CONTROL_VARIANT: &str = "control";

/// Experiment arm chosen by the external decision service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arm {
    A,
    B,
}

impl Arm {
    /// Map the boolean flag served by the decision service onto an arm.
    #[must_use]
    pub fn from_flag(enabled: bool) -> Self {
        if enabled { Arm::B } else { Arm::A }
    }
}

/// The hint-variant label matched against `VariantHints::variant`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantLabel(String);

impl VariantLabel {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn control() -> Self {
        Self(CONTROL_VARIANT.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VariantLabel {
    fn default() -> Self {
        Self::control()
    }
}

impl fmt::Display for VariantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which label each arm uses in the hint data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArmLabels {
    a: VariantLabel,
    b: VariantLabel,
}

impl ArmLabels {
    #[must_use]
    pub fn new(a: VariantLabel, b: VariantLabel) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn label_for(&self, arm: Arm) -> &VariantLabel {
        match arm {
            Arm::A => &self.a,
            Arm::B => &self.b,
        }
    }
}

impl Default for ArmLabels {
    fn default() -> Self {
        Self::new(VariantLabel::new("claude"), VariantLabel::new("chatgpt"))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserKeyError {
    #[error("user key must not be empty")]
    Empty,
}

/// Anonymous, persisted per-install identifier used for consistent bucketing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// # Errors
    ///
    /// Returns `UserKeyError::Empty` for blank input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, UserKeyError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserKeyError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved experiment membership for this install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentAssignment {
    user_key: UserKey,
    arm: Arm,
    variant: VariantLabel,
}

impl ExperimentAssignment {
    #[must_use]
    pub fn new(user_key: UserKey, arm: Arm, labels: &ArmLabels) -> Self {
        Self {
            user_key,
            arm,
            variant: labels.label_for(arm).clone(),
        }
    }

    #[must_use]
    pub fn user_key(&self) -> &UserKey {
        &self.user_key
    }

    #[must_use]
    pub fn arm(&self) -> Arm {
        self.arm
    }

    #[must_use]
    pub fn variant(&self) -> &VariantLabel {
        &self.variant
    }
}
