//! Process-wide provider selection.
//!
//! The registry holds a fixed, ordered candidate list of platform
//! resolvers. On first use it probes `is_supported()` in order and
//! publishes the first match through a publish-once cell; the binding
//! then holds for the remainder of the process's life - no rebinding, no
//! per-call re-evaluation. An unsupported OS surfaces at first use, never
//! at load time.

use once_cell::sync::{Lazy, OnceCell};
use proclens_common::{ProcError, ProcResult};
use tracing::debug;

use crate::platform::{self, Provider};

pub struct ProviderRegistry {
    candidates: Vec<Box<dyn Provider>>,
    // Index of the bound candidate. OnceCell gives the publish-once
    // guarantee: concurrent first uses converge on one winner, and every
    // thread observes it fully initialized without steady-state locking.
    bound: OnceCell<usize>,
}

impl ProviderRegistry {
    /// Registry over the build target's default candidate list.
    pub fn new() -> Self {
        Self::with_candidates(platform::default_candidates())
    }

    /// Registry over an explicit candidate list. Exists so tests can
    /// inject counting probes and assert binding idempotence.
    pub fn with_candidates(candidates: Vec<Box<dyn Provider>>) -> Self {
        Self {
            candidates,
            bound: OnceCell::new(),
        }
    }

    /// The bound resolver, binding on first call.
    pub fn provider(&self) -> ProcResult<&dyn Provider> {
        let idx = self.bound.get_or_try_init(|| {
            for (i, candidate) in self.candidates.iter().enumerate() {
                if candidate.is_supported() {
                    debug!(provider = candidate.name(), "bound platform provider");
                    return Ok(i);
                }
            }
            Err(ProcError::unsupported(
                "provider binding",
                "no platform resolver supports this OS",
            ))
        })?;

        Ok(self.candidates[*idx].as_ref())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Lazy<ProviderRegistry> = Lazy::new(ProviderRegistry::new);

/// The process-wide registry instance.
pub fn global() -> &'static ProviderRegistry {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_binds() {
        let registry = ProviderRegistry::new();
        let provider = registry.provider().unwrap();
        assert!(!provider.name().is_empty());
    }

    #[test]
    fn test_global_registry_is_bound_once() {
        let first = global().provider().unwrap().name();
        let second = global().provider().unwrap().name();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_candidate_list_is_unsupported() {
        let registry = ProviderRegistry::with_candidates(Vec::new());
        let err = registry.provider().err().unwrap();
        assert!(err.is_unsupported());
    }
}
