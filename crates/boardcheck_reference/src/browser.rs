//! Launcher for reference pages.

use crate::hub::RoomHub;
use crate::page::{ReferencePage, Shared};
use async_trait::async_trait;
use boardcheck_contract::{Browser, BrowserContext, FaultLog, TargetError};
use derive_new::new;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default pause before the AI replies.
pub const DEFAULT_AI_DELAY: Duration = Duration::from_millis(250);

/// Opens isolated contexts of the reference game.
#[derive(Debug, Clone, new)]
pub struct ReferenceBrowser {
    /// Pause before the AI replies.
    ai_delay: Duration,
}

impl Default for ReferenceBrowser {
    fn default() -> Self {
        Self::new(DEFAULT_AI_DELAY)
    }
}

impl ReferenceBrowser {
    /// Returns the AI reply delay.
    pub fn ai_delay(&self) -> Duration {
        self.ai_delay
    }
}

#[async_trait]
impl Browser for ReferenceBrowser {
    type Context = ReferenceContext;

    #[instrument(skip(self))]
    async fn new_context(&self) -> Result<ReferenceContext, TargetError> {
        debug!("Opening context");
        Ok(ReferenceContext {
            hub: Arc::new(RoomHub::new()),
            ai_delay: self.ai_delay,
            next_id: AtomicU64::new(1),
            pages: Mutex::new(Vec::new()),
        })
    }
}

/// Pages sharing one room hub.
#[derive(Debug)]
pub struct ReferenceContext {
    hub: Arc<RoomHub>,
    ai_delay: Duration,
    next_id: AtomicU64,
    pages: Mutex<Vec<Weak<Shared>>>,
}

#[async_trait]
impl BrowserContext for ReferenceContext {
    type Page = ReferencePage;

    #[instrument(skip(self, faults))]
    async fn new_page(&self, faults: FaultLog) -> Result<ReferencePage, TargetError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let page = ReferencePage::open(id, Arc::clone(&self.hub), faults, self.ai_delay);
        self.pages
            .lock()
            .map_err(|_| TargetError::Fault("context page list poisoned".to_string()))?
            .push(Arc::downgrade(page.shared()));
        debug!(page = id, "Opened page");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn close(&self) -> Result<(), TargetError> {
        let pages = std::mem::take(
            &mut *self
                .pages
                .lock()
                .map_err(|_| TargetError::Fault("context page list poisoned".to_string()))?,
        );
        let mut open = 0;
        for page in pages.iter().filter_map(Weak::upgrade) {
            page.shutdown();
            open += 1;
        }
        self.hub.close_all();
        info!(open, "Context closed");
        Ok(())
    }
}
