//! Reference target for the boardcheck harness.
//!
//! A small tic-tac-toe that implements every capability of the contract:
//! local, AI and split-session modes, a hidden per-seat reserve (`hand`),
//! per-player views and a headless page surface. It is the fixture the
//! harness tests and CLI run against.
//!
//! Moves are `{"row": r, "col": c}` objects; anything else is rejected.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ai;
mod board;
mod browser;
mod game;
mod hub;
mod page;
mod screen;

pub use ai::SimpleAi;
pub use board::{Board, Cell, Mark, SIZE, StateError};
pub use browser::{DEFAULT_AI_DELAY, ReferenceBrowser, ReferenceContext};
pub use game::{GameState, MoveError, Outcome, PRIVATE_FIELD, Seat, player_view};
pub use hub::{Envelope, PageId, RoomHub, SyncMessage};
pub use page::ReferencePage;
pub use screen::{BODY_FONT, Element, THEME};
