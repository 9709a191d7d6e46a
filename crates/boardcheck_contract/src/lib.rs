//! Capability contract for board game conformance testing.
//!
//! A game under test is a black box. This crate describes the minimal surface
//! it must expose so that a harness can drive it:
//!
//! - **Capabilities**: [`GameTarget`] (render, move, start, and the optional
//!   receive/view operations) and [`PageSurface`] (visible elements, styling,
//!   snapshots)
//! - **Launching**: [`Browser`] and [`BrowserContext`] open isolated pages
//! - **State schema**: [`StateSnapshot`] and the [`Phase`]/[`Mode`] enums
//! - **Configuration**: [`GameConfig`], a validated tagged variant
//! - **Invariants**: composable checks over snapshots and transitions
//!
//! # Example
//!
//! ```
//! use boardcheck_contract::{GameConfig, Mode, PlayerSeat};
//!
//! let config = GameConfig::local(vec![PlayerSeat::human("Alice"), PlayerSeat::human("Bob")]);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.mode(), Mode::Local);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod fault;
mod invariants;
mod mode;
mod moves;
mod phase;
mod snapshot;
mod surface;
mod target;

pub use config::{ConfigError, GameConfig, PlayerSeat, RoomCode, SplitRole, WireConfig};
pub use fault::{Fault, FaultLog, FaultSource};
pub use invariants::{
    CurrentPlayerInRange, Invariant, InvariantSet, InvariantViolation, PhaseNeverRegresses,
    SnapshotInvariants, TerminalHasNoMoves, Transition, TransitionInvariants, TurnAdvancesByOne,
    WinnerOnlyWhenOver,
};
pub use mode::Mode;
pub use moves::{MoveDescriptor, MoveOutcome};
pub use phase::Phase;
pub use snapshot::{PlayerRecord, SnapshotError, StateSnapshot};
pub use surface::{PageSurface, Selector, Snapshot};
pub use target::{Browser, BrowserContext, Capabilities, GameTarget, TargetError};
