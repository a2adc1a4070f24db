//! Error taxonomy for the zap pipeline
//!
//! Three failure families matter to a caller deciding whether to re-plan:
//! local validation (`InvalidInput`), a guard tripping on-chain
//! (`StaleQuote`), and a failed round trip (`Transport`).
//!
//! Created: 2026-10-19

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZapError {
    /// Rejected locally before any network interaction. Nothing was submitted.
    #[error("invalid input: {context}")]
    InvalidInput { context: String },

    /// The embedded expected-return / LP guard did not hold at execution time.
    /// The batch was aborted as a whole; re-plan from a fresh snapshot.
    #[error("stale quote: {guard} guard failed at step {step} ({log})")]
    StaleQuote {
        step: String,
        guard: String,
        log: String,
    },

    /// Query or submission round trip failed, or the response was malformed.
    #[error("transport failure during {stage}: {message}")]
    Transport { stage: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ZapError {
    pub fn invalid(context: impl Into<String>) -> Self {
        ZapError::InvalidInput {
            context: context.into(),
        }
    }

    pub fn transport(stage: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ZapError::Transport {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// True when re-planning against a fresh snapshot may succeed.
    pub fn is_retryable_with_replan(&self) -> bool {
        matches!(self, ZapError::StaleQuote { .. } | ZapError::Transport { .. })
    }
}

pub type ZapResult<T> = std::result::Result<T, ZapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = ZapError::StaleQuote {
            step: "swap".to_string(),
            guard: "expected_return".to_string(),
            log: "message index: 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("expected_return"));
        assert!(msg.contains("swap"));
    }

    #[test]
    fn test_replan_classification() {
        assert!(!ZapError::invalid("zero reserve").is_retryable_with_replan());
        assert!(ZapError::transport("pool query", "timeout").is_retryable_with_replan());
        assert!(!ZapError::Config("missing pair".into()).is_retryable_with_replan());
    }
}
