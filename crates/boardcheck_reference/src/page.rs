//! A loaded page of the reference game.
//!
//! The page owns one [`GameState`] behind a mutex. Background work (AI
//! replies, split-session reception) runs on tokio tasks tagged with the
//! game epoch; starting or resetting a game bumps the epoch and aborts them.

use crate::ai::SimpleAi;
use crate::game::{self, GameState};
use crate::hub::{Envelope, PageId, RoomHub, SyncMessage};
use crate::screen::{self, BODY_FONT, Element, THEME};
use async_trait::async_trait;
use boardcheck_contract::{
    Capabilities, FaultLog, FaultSource, GameConfig, GameTarget, Mode, MoveDescriptor,
    MoveOutcome, PageSurface, Phase, PlayerSeat, Selector, Snapshot, StateSnapshot, TargetError,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct PageState {
    loaded: bool,
    game: GameState,
    epoch: u64,
    link: Option<broadcast::Sender<Envelope>>,
}

impl PageState {
    fn publish(&self, from: PageId) {
        if let Some(link) = &self.link {
            let message = SyncMessage::State(self.game.render_for_sync());
            if link.send(Envelope { from, message }).is_err() {
                debug!("No peers listening");
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct Shared {
    id: PageId,
    hub: Arc<RoomHub>,
    faults: FaultLog,
    ai_delay: Duration,
    state: Mutex<PageState>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, PageState>, TargetError> {
        self.state.lock().map_err(|_| {
            self.faults
                .record(FaultSource::PageError, "page state lock poisoned");
            TargetError::Fault("page state lock poisoned".to_string())
        })
    }

    fn loaded(&self) -> Result<MutexGuard<'_, PageState>, TargetError> {
        let state = self.lock()?;
        if state.loaded {
            Ok(state)
        } else {
            Err(TargetError::NotLoaded)
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task).abort_handle();
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    fn abort_tasks(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|p| p.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    /// Stops background work and leaves any room.
    pub(crate) fn shutdown(&self) {
        self.abort_tasks();
        if let Ok(mut state) = self.state.lock() {
            state.link = None;
        }
    }

    fn schedule_ai(self: &Arc<Self>, epoch: u64) {
        let shared = Arc::clone(self);
        self.spawn(async move {
            loop {
                tokio::time::sleep(shared.ai_delay).await;
                if !shared.ai_step(epoch) {
                    break;
                }
            }
        });
    }

    /// Plays one AI move. Returns true if the AI is to move again.
    fn ai_step(&self, epoch: u64) -> bool {
        let Ok(mut state) = self.lock() else {
            return false;
        };
        if state.epoch != epoch || !state.game.ai_to_move() {
            return false;
        }

        let Some(cell) = SimpleAi.choose(&state.game) else {
            return false;
        };
        if let Err(e) = state.game.place(cell) {
            self.faults
                .record(FaultSource::PageError, format!("AI move failed: {}", e));
            return false;
        }

        info!(%cell, turn = state.game.turn_number(), "AI moved");
        state.publish(self.id);
        state.game.ai_to_move()
    }

    fn listen(self: &Arc<Self>, mut receiver: broadcast::Receiver<Envelope>, epoch: u64) {
        let shared = Arc::clone(self);
        self.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(envelope) if envelope.from == shared.id => {}
                    Ok(envelope) => shared.on_envelope(envelope, epoch),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Dropped peer messages");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    fn on_envelope(&self, envelope: Envelope, epoch: u64) {
        let Ok(mut state) = self.lock() else {
            return;
        };
        if state.epoch != epoch {
            return;
        }

        match envelope.message {
            SyncMessage::Join => {
                if state.game.room_code().is_some() && state.game.local_player_id() == 0 {
                    debug!(peer = envelope.from, "Peer joined, sending state");
                    state.publish(self.id);
                }
            }
            SyncMessage::State(snapshot) => {
                if snapshot.turn_number < state.game.turn_number() {
                    debug!(
                        theirs = snapshot.turn_number,
                        ours = state.game.turn_number(),
                        "Ignoring stale peer state"
                    );
                    return;
                }
                match GameState::from_snapshot(&snapshot, state.game.local_player_id()) {
                    Ok(game) => {
                        debug!(turn = game.turn_number(), "Applied peer state");
                        state.game = game;
                    }
                    Err(e) => self.faults.record(
                        FaultSource::PageError,
                        format!("Unreadable peer state: {}", e.message),
                    ),
                }
            }
        }
    }
}

/// One page of the reference game.
#[derive(Debug)]
pub struct ReferencePage {
    shared: Arc<Shared>,
}

impl ReferencePage {
    /// Opens a page attached to a context's room hub.
    pub fn open(id: PageId, hub: Arc<RoomHub>, faults: FaultLog, ai_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                id,
                hub,
                faults,
                ai_delay,
                state: Mutex::new(PageState::default()),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Opens a page with its own private hub.
    pub fn standalone(faults: FaultLog, ai_delay: Duration) -> Self {
        Self::open(0, Arc::new(RoomHub::new()), faults, ai_delay)
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    #[instrument(skip(self))]
    fn reset(&self) -> Result<(), TargetError> {
        self.shared.abort_tasks();
        let mut state = self.shared.loaded()?;
        state.epoch += 1;
        state.game = GameState::lobby();
        state.link = None;
        info!("Returned to lobby");
        Ok(())
    }
}

impl Drop for ReferencePage {
    fn drop(&mut self) {
        self.shared.shutdown();
    }
}

fn lobby_config(mode: &Mode) -> Option<GameConfig> {
    match mode {
        Mode::Local => Some(GameConfig::local(vec![
            PlayerSeat::human("Player 1"),
            PlayerSeat::human("Player 2"),
        ])),
        Mode::Ai => Some(GameConfig::ai(vec![
            PlayerSeat::human("Player"),
            PlayerSeat::ai("Bot"),
        ])),
        Mode::LocalSplit => Some(GameConfig::split_host(vec![
            PlayerSeat::human("Host"),
            PlayerSeat::human("Guest"),
        ])),
        Mode::Other(_) => None,
    }
}

#[async_trait]
impl GameTarget for ReferencePage {
    #[instrument(skip(self), fields(page = self.shared.id))]
    async fn load(&self) -> Result<(), TargetError> {
        let mut state = self.shared.lock()?;
        state.loaded = true;
        state.game = GameState::lobby();
        info!("Page loaded");
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    async fn render_state_to_text(&self) -> Result<String, TargetError> {
        let state = self.shared.loaded()?;
        state
            .game
            .render()
            .to_text()
            .map_err(|e| TargetError::Fault(e.message))
    }

    #[instrument(skip(self), fields(page = self.shared.id, mv = %mv))]
    async fn perform_move(&self, mv: &MoveDescriptor) -> Result<MoveOutcome, TargetError> {
        let (outcome, ai_epoch) = {
            let mut state = self.shared.loaded()?;
            match state.game.apply(mv) {
                Ok(()) => {
                    state.publish(self.shared.id);
                    let ai_epoch = state.game.ai_to_move().then_some(state.epoch);
                    (MoveOutcome::accepted(state.game.render()), ai_epoch)
                }
                Err(e) => {
                    debug!(error = %e, "Move rejected");
                    (MoveOutcome::rejected(e.to_string(), state.game.render()), None)
                }
            }
        };

        if let Some(epoch) = ai_epoch {
            self.shared.schedule_ai(epoch);
        }
        Ok(outcome)
    }

    #[instrument(skip(self, config), fields(page = self.shared.id, mode = %config.mode()))]
    async fn start_game(&self, config: &GameConfig) -> Result<(), TargetError> {
        self.shared.abort_tasks();

        let room_code = if config.is_host() {
            Some(self.shared.hub.fresh_code())
        } else {
            config.room_code().cloned()
        };
        let game = GameState::start(config, room_code.clone())?;

        let (epoch, receiver, ai_first) = {
            let mut state = self.shared.loaded()?;
            state.epoch += 1;
            state.game = game;
            state.link = None;

            let receiver = room_code.as_ref().map(|code| {
                let (sender, receiver) = self.shared.hub.join(code);
                if !config.is_host() {
                    let join = Envelope {
                        from: self.shared.id,
                        message: SyncMessage::Join,
                    };
                    if sender.send(join).is_err() {
                        debug!("No host listening yet");
                    }
                }
                state.link = Some(sender);
                receiver
            });
            (state.epoch, receiver, state.game.ai_to_move())
        };

        if let Some(receiver) = receiver {
            self.shared.listen(receiver, epoch);
        }
        if ai_first {
            self.shared.schedule_ai(epoch);
        }
        Ok(())
    }

    #[instrument(skip(self, snapshot), fields(page = self.shared.id, turn = snapshot.turn_number))]
    async fn receive_state(&self, snapshot: &StateSnapshot) -> Result<(), TargetError> {
        let mut state = self.shared.loaded()?;
        let local = if state.game.phase() == Phase::Lobby {
            snapshot.local_player_id
        } else {
            state.game.local_player_id()
        };
        state.game = GameState::from_snapshot(snapshot, local)
            .map_err(|e| TargetError::Fault(format!("Unreadable state: {}", e.message)))?;
        debug!("State received");
        Ok(())
    }

    async fn player_view(
        &self,
        snapshot: &StateSnapshot,
        player_id: usize,
    ) -> Result<StateSnapshot, TargetError> {
        self.shared.loaded()?;
        game::player_view(snapshot, player_id).map_err(|e| TargetError::Fault(e.message))
    }
}

#[async_trait]
impl PageSurface for ReferencePage {
    async fn is_visible(&self, selector: &Selector) -> Result<bool, TargetError> {
        let state = self.shared.loaded()?;
        Ok(screen::find_visible(state.game.phase(), selector).is_some())
    }

    #[instrument(skip(self), fields(page = self.shared.id, selector = %selector))]
    async fn click(&self, selector: &Selector) -> Result<(), TargetError> {
        let element = {
            let state = self.shared.loaded()?;
            screen::find_visible(state.game.phase(), selector)
        };

        match element {
            None => Err(TargetError::ElementNotFound(selector.to_string())),
            Some(Element::NewGame) => self.reset(),
            Some(Element::ModeButton(mode)) => match lobby_config(&mode) {
                Some(config) => self.start_game(&config).await,
                None => Err(TargetError::Unsupported(format!("mode {}", mode))),
            },
            Some(_) => Ok(()),
        }
    }

    async fn style_token(&self, name: &str) -> Result<Option<String>, TargetError> {
        self.shared.loaded()?;
        Ok(THEME
            .iter()
            .find(|(token, _)| *token == name)
            .map(|(_, value)| value.to_string()))
    }

    async fn body_font_family(&self) -> Result<String, TargetError> {
        self.shared.loaded()?;
        Ok(BODY_FONT.to_string())
    }

    async fn capture(&self) -> Result<Snapshot, TargetError> {
        let state = self.shared.loaded()?;
        Ok(Snapshot {
            bytes: screen::render_page(&state.game).into_bytes(),
            extension: "txt".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> ReferencePage {
        ReferencePage::standalone(FaultLog::new(), Duration::from_millis(10))
    }

    async fn state(page: &ReferencePage) -> StateSnapshot {
        StateSnapshot::parse(&page.render_state_to_text().await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_render_before_load_fails() {
        let page = page();
        assert_eq!(page.render_state_to_text().await, Err(TargetError::NotLoaded));
    }

    #[tokio::test]
    async fn test_new_game_returns_to_lobby() {
        let page = page();
        page.load().await.unwrap();
        page.click(&Selector::mode_button(&Mode::Local)).await.unwrap();
        assert_eq!(state(&page).await.phase, Phase::Playing);

        page.click(&Selector::new_game()).await.unwrap();
        assert_eq!(state(&page).await.phase, Phase::Lobby);
        assert!(page.click(&Selector::new_game()).await.is_err());
    }

    #[tokio::test]
    async fn test_ai_replies() {
        let page = page();
        page.load().await.unwrap();
        page.start_game(&GameConfig::ai(vec![
            PlayerSeat::human("Human"),
            PlayerSeat::ai("Bot"),
        ]))
        .await
        .unwrap();

        let outcome = page
            .perform_move(&MoveDescriptor::new(json!({"row": 0, "col": 0})))
            .await
            .unwrap();
        assert!(outcome.success);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let after = state(&page).await;
        assert_eq!(after.turn_number, 2);
        assert_eq!(after.current_player, 0);
    }

    #[tokio::test]
    async fn test_reset_cancels_pending_ai() {
        let page = ReferencePage::standalone(FaultLog::new(), Duration::from_millis(100));
        page.load().await.unwrap();
        page.start_game(&GameConfig::ai(vec![
            PlayerSeat::human("Human"),
            PlayerSeat::ai("Bot"),
        ]))
        .await
        .unwrap();
        page.perform_move(&MoveDescriptor::new(json!({"row": 0, "col": 0})))
            .await
            .unwrap();
        page.click(&Selector::new_game()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        let after = state(&page).await;
        assert_eq!(after.phase, Phase::Lobby);
        assert_eq!(after.turn_number, 0);
    }
}
