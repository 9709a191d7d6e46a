//! Driver helpers wrapping one page of a target.
//!
//! Every capability call goes through [`Driver::call`], which turns a panic
//! or a [`TargetError::Fault`] into a recorded hard fault. Every rendered
//! state is parsed and checked against the snapshot invariants, and every
//! accepted move against the transition invariants.

use crate::config::Timing;
use crate::expect::{ensure, violated};
use crate::{DeadlineExceeded, FaultReport, HarnessError};
use boardcheck_contract::{
    BrowserContext, Capabilities, FaultLog, FaultSource, GameConfig, GameTarget, InvariantSet,
    MoveDescriptor, MoveOutcome, PageSurface, Selector, Snapshot, SnapshotInvariants,
    StateSnapshot, TargetError, Transition, TransitionInvariants,
};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// One loaded page plus its fault listener.
pub struct Driver<P> {
    page: P,
    faults: FaultLog,
    timing: Timing,
}

impl<P> std::fmt::Debug for Driver<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("faults", &self.faults)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// One-line summary of a snapshot for error messages.
pub fn summarize(state: &StateSnapshot) -> String {
    format!(
        "phase={} currentPlayer={} turnNumber={} validMoves={}",
        state.phase,
        state.current_player,
        state.turn_number,
        state.valid_moves.len()
    )
}

impl<P: GameTarget + PageSurface> Driver<P> {
    /// Opens a page in `context` with a fresh fault listener and loads it.
    #[instrument(skip(context, timing))]
    pub async fn open<C>(context: &C, timing: Timing) -> Result<Self, HarnessError>
    where
        C: BrowserContext<Page = P>,
    {
        let faults = FaultLog::new();
        let page = context.new_page(faults.clone()).await?;
        let driver = Self::new(page, faults, timing);
        driver.call("load", driver.page.load()).await?;
        debug!("Page opened and loaded");
        Ok(driver)
    }

    /// Wraps an already opened page. `faults` must be the page's listener.
    pub fn new(page: P, faults: FaultLog, timing: Timing) -> Self {
        Self {
            page,
            faults,
            timing,
        }
    }

    /// The page under test.
    pub fn page(&self) -> &P {
        &self.page
    }

    /// The page's fault listener.
    pub fn faults(&self) -> &FaultLog {
        &self.faults
    }

    /// Deadlines in effect.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Entry points the page reports.
    pub fn capabilities(&self) -> Capabilities {
        self.page.capabilities()
    }

    fn fault_report(&self) -> HarnessError {
        HarnessError::Faults(FaultReport {
            faults: self.faults.snapshot(),
        })
    }

    /// Runs one capability call, recording panics and faults.
    pub async fn call<T, F>(&self, what: &str, call: F) -> Result<T, HarnessError>
    where
        F: Future<Output = Result<T, TargetError>>,
    {
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(TargetError::Fault(message))) => {
                self.faults
                    .record(FaultSource::Capability, format!("{}: {}", what, message));
                Err(self.fault_report())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(call = what, %message, "Capability panicked");
                self.faults
                    .record(FaultSource::Panic, format!("{} panicked: {}", what, message));
                Err(self.fault_report())
            }
        }
    }

    /// Fails if any hard fault has been recorded.
    pub fn expect_no_faults(&self) -> Result<(), HarnessError> {
        if self.faults.is_empty() {
            Ok(())
        } else {
            Err(self.fault_report())
        }
    }

    /// Reads, parses and checks the current state.
    pub async fn state(&self) -> Result<StateSnapshot, HarnessError> {
        let text = self
            .call("render_state_to_text", self.page.render_state_to_text())
            .await?;
        let state = StateSnapshot::parse(&text)?;
        SnapshotInvariants::check_all(&state).map_err(|v| violated("rendered state", v))?;
        Ok(state)
    }

    /// Starts a game after validating its configuration.
    #[instrument(skip(self, config), fields(mode = %config.mode()))]
    pub async fn start(&self, config: &GameConfig) -> Result<(), HarnessError> {
        config.validate().map_err(TargetError::from)?;
        self.call("start_game", self.page.start_game(config)).await
    }

    /// Attempts a move without judging the outcome.
    #[instrument(skip(self), fields(mv = %mv))]
    pub async fn attempt(&self, mv: &MoveDescriptor) -> Result<MoveOutcome, HarnessError> {
        let outcome = self
            .call("perform_move", self.page.perform_move(mv))
            .await?;
        debug!(success = outcome.success, "Move attempted");
        Ok(outcome)
    }

    /// Plays a move that must be accepted and returns the state after it.
    pub async fn play(&self, mv: &MoveDescriptor) -> Result<StateSnapshot, HarnessError> {
        let before = self.state().await?;
        let outcome = self.attempt(mv).await?;
        ensure(outcome.success, || {
            format!(
                "move {} was rejected: {}",
                mv,
                outcome.rejection_reason().unwrap_or("<no error>")
            )
        })?;

        let after = match outcome.state {
            Some(after) => {
                SnapshotInvariants::check_all(&after)
                    .map_err(|v| violated("returned state", v))?;
                after
            }
            None => self.state().await?,
        };

        let transition = Transition { before, after };
        TransitionInvariants::check_all(&transition)
            .map_err(|v| violated(&format!("move {}", mv), v))?;
        Ok(transition.after)
    }

    /// Plays the first valid move of the current state.
    pub async fn play_first_valid(&self) -> Result<StateSnapshot, HarnessError> {
        let state = self.state().await?;
        let mv = state.first_valid_move().cloned();
        let Some(mv) = mv else {
            return Err(crate::AssertionFailure::new(format!(
                "no valid move available ({})",
                summarize(&state)
            ))
            .into());
        };
        self.play(&mv).await
    }

    /// Polls the state until `predicate` holds or `deadline` passes.
    #[instrument(skip(self, predicate))]
    pub async fn wait_until<F>(
        &self,
        condition: &str,
        deadline: Duration,
        predicate: F,
    ) -> Result<StateSnapshot, HarnessError>
    where
        F: Fn(&StateSnapshot) -> bool,
    {
        let started = Instant::now();
        loop {
            let state = self.state().await?;
            if predicate(&state) {
                debug!(waited_ms = started.elapsed().as_millis() as u64, "Condition met");
                return Ok(state);
            }

            let elapsed = started.elapsed();
            if elapsed >= deadline {
                return Err(DeadlineExceeded {
                    condition: condition.to_string(),
                    deadline,
                    last_seen: summarize(&state),
                }
                .into());
            }
            tokio::time::sleep(self.timing.poll_interval().min(deadline - elapsed)).await;
        }
    }

    /// Lets the page settle before it is observed.
    pub async fn settle(&self) {
        tokio::time::sleep(self.timing.settle()).await;
    }

    /// Applies a snapshot from a peer.
    pub async fn receive_state(&self, state: &StateSnapshot) -> Result<(), HarnessError> {
        self.call("receive_state", self.page.receive_state(state))
            .await
    }

    /// Restricts a snapshot to one seat.
    pub async fn player_view(
        &self,
        state: &StateSnapshot,
        player_id: usize,
    ) -> Result<StateSnapshot, HarnessError> {
        let view = self
            .call("player_view", self.page.player_view(state, player_id))
            .await?;
        SnapshotInvariants::check_all(&view).map_err(|v| violated("player view", v))?;
        Ok(view)
    }

    /// Returns true if an element matching `selector` is visible.
    pub async fn is_visible(&self, selector: &Selector) -> Result<bool, HarnessError> {
        self.call("is_visible", self.page.is_visible(selector)).await
    }

    /// Clicks the element matching `selector`.
    pub async fn click(&self, selector: &Selector) -> Result<(), HarnessError> {
        self.call("click", self.page.click(selector)).await
    }

    /// Reads a root styling token.
    pub async fn style_token(&self, name: &str) -> Result<Option<String>, HarnessError> {
        self.call("style_token", self.page.style_token(name)).await
    }

    /// Reads the computed body font family.
    pub async fn body_font_family(&self) -> Result<String, HarnessError> {
        self.call("body_font_family", self.page.body_font_family())
            .await
    }

    /// Captures a visual snapshot.
    pub async fn capture(&self) -> Result<Snapshot, HarnessError> {
        self.call("capture", self.page.capture()).await
    }
}
