//! First-class invariants over state snapshots.
//!
//! Invariants are logical properties every conforming target must uphold.
//! Snapshot invariants hold for any single rendered state; transition
//! invariants hold for the states before and after an accepted move.

use crate::{Phase, StateSnapshot};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Snapshots on either side of one accepted move.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State before the move.
    pub before: StateSnapshot,
    /// State after the move.
    pub after: StateSnapshot,
}

/// Invariant: once a game is running there are at least two seats, and both
/// the active and the viewing seat exist.
pub struct CurrentPlayerInRange;

impl Invariant<StateSnapshot> for CurrentPlayerInRange {
    fn holds(state: &StateSnapshot) -> bool {
        if state.phase == Phase::Lobby {
            return true;
        }
        state.players.len() >= 2
            && state.player(state.current_player).is_some()
            && state.player(state.local_player_id).is_some()
    }

    fn description() -> &'static str {
        "At least two seats exist and currentPlayer/localPlayerId index one of them"
    }
}

/// Invariant: `winner` stays null until the game is over.
pub struct WinnerOnlyWhenOver;

impl Invariant<StateSnapshot> for WinnerOnlyWhenOver {
    fn holds(state: &StateSnapshot) -> bool {
        state.phase == Phase::GameOver || state.winner.is_none()
    }

    fn description() -> &'static str {
        "winner is null unless the phase is gameOver"
    }
}

/// Invariant: a finished game offers no moves.
pub struct TerminalHasNoMoves;

impl Invariant<StateSnapshot> for TerminalHasNoMoves {
    fn holds(state: &StateSnapshot) -> bool {
        !state.phase.is_terminal() || state.valid_moves.is_empty()
    }

    fn description() -> &'static str {
        "validMoves is empty once the phase is gameOver"
    }
}

/// Invariant: each accepted move advances the turn counter by exactly one.
pub struct TurnAdvancesByOne;

impl Invariant<Transition> for TurnAdvancesByOne {
    fn holds(t: &Transition) -> bool {
        t.before.turn_number.checked_add(1) == Some(t.after.turn_number)
    }

    fn description() -> &'static str {
        "turnNumber increases by exactly 1 per accepted move"
    }
}

/// Invariant: phases only move forward, one step at a time.
pub struct PhaseNeverRegresses;

impl Invariant<Transition> for PhaseNeverRegresses {
    fn holds(t: &Transition) -> bool {
        t.before.phase.may_advance_to(t.after.phase)
    }

    fn description() -> &'static str {
        "Phase follows lobby -> playing -> gameOver without skipping or regressing"
    }
}

/// Every single-snapshot invariant.
pub type SnapshotInvariants = (CurrentPlayerInRange, WinnerOnlyWhenOver, TerminalHasNoMoves);

/// Every transition invariant.
pub type TransitionInvariants = (TurnAdvancesByOne, PhaseNeverRegresses);
