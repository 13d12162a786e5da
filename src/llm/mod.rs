//! LLM collaborator contract (spec §6.1/§9): a strict post-processor for
//! `text_to_sigma`, never consulted during `sigma_to_spl`/`spl_to_sigma`.
//! This crate ships no adapter that performs network I/O; wiring a real one
//! in is left to the embedding application.

use crate::error::{Error, Result};

/// Generate a Sigma rule draft from free text, given some surrounding
/// context (e.g. a target logsource hint).
pub trait LlmAdapter: Send + Sync {
    fn generate(&self, prompt: &str, context: &str) -> Result<String>;
}

/// The only implementation this crate ships: always unavailable. Correct
/// default for `text_to_sigma` without a configured adapter — a silent
/// no-op there would be worse than a clear error.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLlmAdapter;

impl LlmAdapter for NullLlmAdapter {
    fn generate(&self, _prompt: &str, _context: &str) -> Result<String> {
        Err(Error::LlmUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_adapter_is_always_unavailable() {
        let err = NullLlmAdapter.generate("prompt", "context").unwrap_err();
        assert!(matches!(err, Error::LlmUnavailable));
    }
}
