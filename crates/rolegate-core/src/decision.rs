use std::fmt;

/// Outcome of one authorization check.
///
/// Only produced when a policy evaluated its rule; failures to evaluate are
/// errors, never a denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    allowed: bool,
    explanation: String,
}

impl Decision {
    pub fn allow(explanation: impl Into<String>) -> Self {
        Self {
            allowed: true,
            explanation: explanation.into(),
        }
    }

    pub fn deny(explanation: impl Into<String>) -> Self {
        Self {
            allowed: false,
            explanation: explanation.into(),
        }
    }

    /// Build from an already computed verdict.
    pub fn new(allowed: bool, explanation: impl Into<String>) -> Self {
        Self {
            allowed,
            explanation: explanation.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.allowed { "allowed" } else { "denied" };
        write!(f, "{verdict}: {}", self.explanation)
    }
}
