//! In-context broadcast rooms for split sessions.
//!
//! Pages opened in one context share a hub, the way tabs of one browser
//! profile share a broadcast channel. Every member of a room sees every
//! message, including its own, so receivers filter by sender.

use boardcheck_contract::{RoomCode, StateSnapshot};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

/// Room code alphabet without look-alike characters.
const ROOM_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ROOM_CODE_LEN: usize = 4;
const ROOM_CAPACITY: usize = 64;

/// Identifies a page within a context.
pub type PageId = u64;

/// Message exchanged between split-session peers.
#[derive(Debug, Clone)]
pub enum SyncMessage {
    /// A guest arrived and wants the current state.
    Join,
    /// Authoritative state after a change.
    State(StateSnapshot),
}

/// A message and its sender.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Sending page.
    pub from: PageId,
    /// Payload.
    pub message: SyncMessage,
}

/// Broadcast rooms keyed by room code.
#[derive(Debug, Default)]
pub struct RoomHub {
    rooms: Mutex<HashMap<RoomCode, broadcast::Sender<Envelope>>>,
}

impl RoomHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a code not currently in use.
    #[instrument(skip(self))]
    pub fn fresh_code(&self) -> RoomCode {
        let mut rng = rand::thread_rng();
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| ROOM_ALPHABET[rng.gen_range(0..ROOM_ALPHABET.len())] as char)
                .collect();
            let code = RoomCode::new(code);
            if !self.lock().contains_key(&code) {
                debug!(%code, "Generated room code");
                return code;
            }
        }
    }

    /// Joins a room, creating it if needed.
    #[instrument(skip(self))]
    pub fn join(&self, code: &RoomCode) -> (broadcast::Sender<Envelope>, broadcast::Receiver<Envelope>) {
        let mut rooms = self.lock();
        let sender = rooms
            .entry(code.clone())
            .or_insert_with(|| {
                info!(%code, "Opening room");
                broadcast::channel(ROOM_CAPACITY).0
            })
            .clone();
        let receiver = sender.subscribe();
        (sender, receiver)
    }

    /// Drops every room. Receivers see the channel close once pages release
    /// their senders.
    #[instrument(skip(self))]
    pub fn close_all(&self) {
        let mut rooms = self.lock();
        info!(count = rooms.len(), "Closing rooms");
        rooms.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RoomCode, broadcast::Sender<Envelope>>> {
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_use_alphabet() {
        let hub = RoomHub::new();
        let code = hub.fresh_code();
        assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
        assert!(code.as_str().bytes().all(|b| ROOM_ALPHABET.contains(&b)));
    }

    #[tokio::test]
    async fn test_members_share_messages() {
        let hub = RoomHub::new();
        let code = RoomCode::new("ABCD");
        let (host_tx, _host_rx) = hub.join(&code);
        let (_guest_tx, mut guest_rx) = hub.join(&code);

        host_tx
            .send(Envelope {
                from: 1,
                message: SyncMessage::Join,
            })
            .unwrap();

        let envelope = guest_rx.recv().await.unwrap();
        assert_eq!(envelope.from, 1);
        assert!(matches!(envelope.message, SyncMessage::Join));
    }
}
