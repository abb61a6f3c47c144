//! Error types for the deploy transaction builder
//!
//! Callers use `is_retryable()` to tell a flaky network or chain condition
//! from a fatal build problem, and `category()` for logging.

use thiserror::Error;

/// Error type for building, signing and submitting deploy transactions
#[derive(Error, Debug)]
pub enum DeployError {
    /// HTTP transport failure talking to an external service
    #[error("Network error ({service}): {reason}")]
    Network {
        /// The external service that failed
        service: String,
        reason: String,
    },

    /// Off-chain metadata or image upload failed
    ///
    /// The metadata URI is a hard prerequisite of the metadata instruction,
    /// so this aborts the build. `retryable` is set for transport failures
    /// and 5xx/429 answers only.
    #[error("Upload failed: {reason}")]
    Upload { reason: String, retryable: bool },

    /// The chain rejected or failed to confirm the transaction
    #[error("Transaction rejected by chain: {0}")]
    ChainRejected(String),

    /// Optional data was unavailable and a fallback could not be applied
    #[error("Partial data: {0}")]
    PartialData(String),

    /// Caller-supplied parameters cannot be expressed on chain
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Trade-construction API answered with a non-success status
    #[error("External trade API returned status {status}")]
    ExternalTrade {
        /// HTTP status code returned
        status: u16,
    },

    /// An external response could not be decoded
    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse {
        service: String,
        reason: String,
    },

    /// The externally built transaction held no instruction for the launch program
    #[error("No create instruction for program {program} in external transaction")]
    MissingCreateInstruction {
        /// The launch program id searched for
        program: String,
    },

    /// Failed to build an instruction for a specific program
    #[error("Instruction build error (program={program}): {reason}")]
    InstructionBuild {
        /// The program the instruction targets
        program: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// Signing failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Configuration or validation error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// RPC client error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Wrapped error from external crates
    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl DeployError {
    /// Check if this error is potentially retryable
    ///
    /// Returns `true` if retrying the whole deploy might succeed,
    /// `false` if the error is fatal or non-retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            // Transient failures that may succeed on retry
            Self::Network { .. } => true,
            Self::Rpc(_) => true,
            Self::Upload { retryable, .. } => *retryable,
            Self::ExternalTrade { status } => *status >= 500 || *status == 429,

            // Non-retryable failures
            Self::ChainRejected(_) => false,
            Self::PartialData(_) => false,
            Self::InvalidRequest(_) => false,
            Self::InvalidResponse { .. } => false,
            Self::MissingCreateInstruction { .. } => false,
            Self::InstructionBuild { .. } => false,
            Self::Signing(_) => false,
            Self::Configuration(_) => false,
            Self::External(_) => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Upload { .. } => "upload",
            Self::ChainRejected(_) => "chain",
            Self::PartialData(_) => "partial_data",
            Self::InvalidRequest(_) => "request",
            Self::ExternalTrade { .. } => "external_trade",
            Self::InvalidResponse { .. } => "response",
            Self::MissingCreateInstruction { .. } => "external_trade",
            Self::InstructionBuild { .. } => "instruction",
            Self::Signing(_) => "signing",
            Self::Configuration(_) => "config",
            Self::Rpc(_) => "rpc",
            Self::External(_) => "external",
        }
    }
}

// Convenience constructors for common error scenarios
impl DeployError {
    pub fn network(service: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Network {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// Upload failure that may succeed when repeated
    pub fn upload_transient(reason: impl std::fmt::Display) -> Self {
        Self::Upload {
            reason: reason.to_string(),
            retryable: true,
        }
    }

    /// Upload failure that repeating the same request cannot fix
    pub fn upload_rejected(reason: impl std::fmt::Display) -> Self {
        Self::Upload {
            reason: reason.to_string(),
            retryable: false,
        }
    }

    /// Non-success HTTP answer from an upload endpoint
    pub fn upload_status(context: &str, status: u16) -> Self {
        let reason = format!("{} returned status {}", context, status);
        if status >= 500 || status == 429 {
            Self::upload_transient(reason)
        } else {
            Self::upload_rejected(reason)
        }
    }

    pub fn invalid_response(service: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidResponse {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    pub fn instruction_failed(program: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InstructionBuild {
            program: program.into(),
            reason: reason.to_string(),
        }
    }

    pub fn rpc(reason: impl std::fmt::Display) -> Self {
        Self::Rpc(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeployError::upload_rejected("metadata uri empty");
        assert_eq!(err.to_string(), "Upload failed: metadata uri empty");

        let err = DeployError::instruction_failed("spl_token", "overflow");
        assert_eq!(
            err.to_string(),
            "Instruction build error (program=spl_token): overflow"
        );

        let err = DeployError::ExternalTrade { status: 400 };
        assert_eq!(err.to_string(), "External trade API returned status 400");
    }

    #[test]
    fn test_error_retryability() {
        assert!(DeployError::network("trade", "reset").is_retryable());
        assert!(DeployError::Rpc("timeout".to_string()).is_retryable());
        assert!(DeployError::ExternalTrade { status: 503 }.is_retryable());

        assert!(!DeployError::ExternalTrade { status: 400 }.is_retryable());
        assert!(!DeployError::ChainRejected("custom program error".to_string()).is_retryable());
        assert!(!DeployError::InvalidRequest("overflow".to_string()).is_retryable());
        assert!(!DeployError::MissingCreateInstruction { program: "p".into() }.is_retryable());
    }

    #[test]
    fn test_upload_retryability_by_cause() {
        assert!(DeployError::upload_transient("connection reset").is_retryable());
        assert!(DeployError::upload_status("pinning", 502).is_retryable());
        assert!(DeployError::upload_status("pinning", 429).is_retryable());

        assert!(!DeployError::upload_status("image download", 404).is_retryable());
        assert!(!DeployError::upload_status("metadata upload", 400).is_retryable());
        assert!(!DeployError::upload_rejected("image url required for pinning").is_retryable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(DeployError::upload_transient("x").category(), "upload");
        assert_eq!(DeployError::ChainRejected("x".into()).category(), "chain");
        assert_eq!(DeployError::PartialData("x".into()).category(), "partial_data");
        assert_eq!(
            DeployError::invalid_response("trade", "bad blob").category(),
            "response"
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: DeployError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, DeployError::External(_)));
        assert!(!err.is_retryable());
    }
}
