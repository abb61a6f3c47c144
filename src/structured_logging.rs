//! Structured logging for deploy flows

use uuid::Uuid;

/// Logger carrying one context id through a deploy
#[derive(Debug, Clone)]
pub struct DeployLogger {
    context_id: String,
}

impl DeployLogger {
    pub fn new(context_id: String) -> Self {
        Self { context_id }
    }

    /// Logger with a fresh random context id
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn log_decimals_resolved(&self, source_mint: &str, decimals: u8) {
        tracing::debug!(
            context_id = %self.context_id,
            source_mint = %source_mint,
            decimals = %decimals,
            "Decimals resolved"
        );
    }

    pub fn log_deploy_attempt(&self, symbol: &str, strategy: &str, instructions: usize) {
        tracing::info!(
            context_id = %self.context_id,
            symbol = %symbol,
            strategy = %strategy,
            instructions = %instructions,
            "Submitting deploy transaction"
        );
    }

    pub fn log_deploy_success(&self, mint: &str, sig: &str, latency_ms: u64) {
        tracing::info!(
            context_id = %self.context_id,
            mint = %mint,
            signature = %sig,
            latency_ms = %latency_ms,
            "Deploy confirmed"
        );
    }

    pub fn log_deploy_failure(&self, symbol: &str, category: &str, error: &str, latency_ms: u64) {
        tracing::warn!(
            context_id = %self.context_id,
            symbol = %symbol,
            category = %category,
            error = %error,
            latency_ms = %latency_ms,
            "Deploy failed"
        );
    }
}

impl Default for DeployLogger {
    fn default() -> Self {
        Self::generate()
    }
}
