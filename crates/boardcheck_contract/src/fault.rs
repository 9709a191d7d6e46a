//! Collection of uncaught faults raised by a page.
//!
//! The log is handed to the page before it loads, so faults raised during
//! loading are captured too. The harness tolerates none of them.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Where a fault was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FaultSource {
    /// An error-level console message.
    Console,
    /// An uncaught error inside the page.
    PageError,
    /// A panic escaped a capability call.
    Panic,
    /// A capability call failed outside its result contract.
    Capability,
}

/// One uncaught fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// Where it was observed.
    pub origin: FaultSource,
    /// What it said.
    pub message: String,
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.origin, self.message)
    }
}

/// Shared, append-only fault listener.
#[derive(Debug, Clone, Default)]
pub struct FaultLog {
    faults: Arc<Mutex<Vec<Fault>>>,
}

impl FaultLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fault.
    pub fn record(&self, origin: FaultSource, message: impl Into<String>) {
        let fault = Fault {
            origin,
            message: message.into(),
        };
        warn!(%fault, "Fault recorded");
        self.lock().push(fault);
    }

    /// Returns all faults recorded so far.
    pub fn snapshot(&self) -> Vec<Fault> {
        self.lock().clone()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Fault>> {
        // A poisoned log still holds every fault pushed before the panic.
        self.faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let log = FaultLog::new();
        let listener = log.clone();
        listener.record(FaultSource::Console, "boom");
        assert!(!log.is_empty());
        assert_eq!(log.snapshot()[0].to_string(), "[console] boom");
    }
}
