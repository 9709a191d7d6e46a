//! Rules and state of the reference game.
//!
//! One [`GameState`] holds the complete truth for a page, including each
//! seat's hidden reserve. Snapshots are always rendered for a specific
//! viewer and never include another seat's reserve.

use crate::board::{Board, Cell, Mark, StateError};
use boardcheck_contract::{
    GameConfig, Mode, MoveDescriptor, Phase, PlayerRecord, RoomCode, StateSnapshot, TargetError,
};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument, warn};

/// Name of the private per-seat field.
pub const PRIVATE_FIELD: &str = "hand";

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    /// Display name.
    pub name: String,
    /// True if the AI plays this seat.
    pub is_ai: bool,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The seat won.
    Winner(usize),
    /// The board filled up.
    Draw,
}

impl Outcome {
    fn to_json(self) -> Value {
        match self {
            Outcome::Winner(seat) => json!(seat),
            Outcome::Draw => json!("draw"),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(|seat| Outcome::Winner(seat as usize)),
            Value::String(s) if s == "draw" => Some(Outcome::Draw),
            _ => None,
        }
    }
}

/// Reasons a move is refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// No game has been started.
    #[display("No game in progress")]
    NotStarted,

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The descriptor is not a `{row, col}` object.
    #[display("Malformed move: {}", _0)]
    Malformed(String),

    /// The cell is off the board.
    #[display("Cell {} is off the board", _0)]
    OutOfBounds(Cell),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(Cell),

    /// This client does not control the active seat.
    #[display("Not your turn: waiting for player {}", _0)]
    NotYourTurn(usize),
}

impl std::error::Error for MoveError {}

/// Complete state of one page's game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    phase: Phase,
    mode: Option<Mode>,
    seats: Vec<Seat>,
    board: Board,
    current_player: usize,
    local_player_id: usize,
    turn_number: u32,
    outcome: Option<Outcome>,
    room_code: Option<RoomCode>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::lobby()
    }
}

impl GameState {
    /// State shown before any game starts.
    pub fn lobby() -> Self {
        Self {
            phase: Phase::Lobby,
            mode: None,
            seats: Vec::new(),
            board: Board::new(),
            current_player: 0,
            local_player_id: 0,
            turn_number: 0,
            outcome: None,
            room_code: None,
        }
    }

    /// Starts a game from a validated configuration.
    #[instrument(skip(config, room_code), fields(mode = %config.mode()))]
    pub fn start(config: &GameConfig, room_code: Option<RoomCode>) -> Result<Self, TargetError> {
        config.validate()?;

        if config.players().len() != 2 {
            warn!(count = config.players().len(), "Unsupported seat count");
            return Err(TargetError::Config(format!(
                "Tic-tac-toe seats exactly 2 players, got {}",
                config.players().len()
            )));
        }
        if let Mode::Other(name) = config.mode() {
            return Err(TargetError::Unsupported(format!("mode {}", name)));
        }

        let state = Self {
            phase: Phase::Playing,
            mode: Some(config.mode()),
            seats: config
                .players()
                .iter()
                .map(|p| Seat {
                    name: p.name.clone(),
                    is_ai: p.is_ai,
                })
                .collect(),
            board: Board::new(),
            current_player: 0,
            local_player_id: config.local_player_id(),
            turn_number: 0,
            outcome: None,
            room_code,
        };

        info!(local = state.local_player_id, "Game started");
        Ok(state)
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the mode.
    pub fn mode(&self) -> Option<&Mode> {
        self.mode.as_ref()
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the seats.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Returns the active seat.
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// Returns the viewing client's seat.
    pub fn local_player_id(&self) -> usize {
        self.local_player_id
    }

    /// Returns the accepted move count.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Returns the outcome once over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns the split-session room, if any.
    pub fn room_code(&self) -> Option<&RoomCode> {
        self.room_code.as_ref()
    }

    /// Returns true if the AI plays the active seat.
    pub fn ai_to_move(&self) -> bool {
        self.phase == Phase::Playing
            && self
                .seats
                .get(self.current_player)
                .is_some_and(|seat| seat.is_ai)
    }

    /// Returns true if this client may move for the active seat.
    pub fn viewer_may_move(&self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        match self.mode {
            Some(Mode::LocalSplit) => self.current_player == self.local_player_id,
            Some(Mode::Ai) => !self.ai_to_move(),
            _ => true,
        }
    }

    /// Marks the given seat still holds.
    pub fn reserve(&self, seat: usize) -> usize {
        let mark = Mark::for_seat(seat);
        mark.starting_reserve().saturating_sub(self.board.count(mark))
    }

    /// Parses a move descriptor into a cell.
    pub fn parse_move(mv: &MoveDescriptor) -> Result<Cell, MoveError> {
        if !mv.as_value().is_object() {
            return Err(MoveError::Malformed(format!(
                "expected an object with row and col, got {}",
                mv
            )));
        }
        serde_json::from_value::<Cell>(mv.as_value().clone())
            .map_err(|e| MoveError::Malformed(e.to_string()))
    }

    /// Applies a move submitted by this client.
    #[instrument(skip(self), fields(turn = self.turn_number, player = self.current_player))]
    pub fn apply(&mut self, mv: &MoveDescriptor) -> Result<(), MoveError> {
        match self.phase {
            Phase::Lobby => return Err(MoveError::NotStarted),
            Phase::GameOver => return Err(MoveError::GameOver),
            Phase::Playing => {}
        }

        let cell = Self::parse_move(mv)?;
        if !cell.in_bounds() {
            return Err(MoveError::OutOfBounds(cell));
        }
        if !self.viewer_may_move() {
            return Err(MoveError::NotYourTurn(self.current_player));
        }
        self.place(cell)
    }

    /// Places the active seat's mark, bypassing viewer checks (AI and replay).
    pub fn place(&mut self, cell: Cell) -> Result<(), MoveError> {
        if self.phase != Phase::Playing {
            return Err(MoveError::GameOver);
        }
        if !cell.in_bounds() {
            return Err(MoveError::OutOfBounds(cell));
        }
        if !self.board.is_empty(cell) {
            return Err(MoveError::Occupied(cell));
        }

        let mark = Mark::for_seat(self.current_player);
        self.board.set(cell, mark);
        self.turn_number += 1;

        if let Some(winner) = self.board.winner() {
            info!(winner = winner.seat(), "Game won");
            self.phase = Phase::GameOver;
            self.outcome = Some(Outcome::Winner(winner.seat()));
        } else if self.board.is_full() {
            info!("Game drawn");
            self.phase = Phase::GameOver;
            self.outcome = Some(Outcome::Draw);
        } else {
            self.current_player = (self.current_player + 1) % self.seats.len();
        }

        debug!(%cell, %mark, turn = self.turn_number, "Mark placed");
        Ok(())
    }

    /// Cells legal for the active seat, regardless of who views.
    pub fn legal_cells(&self) -> Vec<Cell> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        self.board.empty_cells().collect()
    }

    /// Renders the state as this client sees it.
    pub fn render(&self) -> StateSnapshot {
        let valid_moves = if self.viewer_may_move() {
            cells_to_moves(self.legal_cells())
        } else {
            Vec::new()
        };
        self.snapshot(Some(self.local_player_id), valid_moves)
    }

    /// Renders the state with every reserve visible, for peer sync.
    pub fn render_for_sync(&self) -> StateSnapshot {
        self.snapshot(None, Vec::new())
    }

    fn snapshot(&self, viewer: Option<usize>, valid_moves: Vec<MoveDescriptor>) -> StateSnapshot {
        let players = self
            .seats
            .iter()
            .enumerate()
            .map(|(id, seat)| {
                let mut fields = Map::new();
                if viewer.is_none_or(|v| v == id) {
                    fields.insert(PRIVATE_FIELD.to_string(), json!(self.reserve(id)));
                }
                fields.insert("mark".to_string(), json!(Mark::for_seat(id).to_string()));
                PlayerRecord {
                    id,
                    name: seat.name.clone(),
                    is_ai: seat.is_ai,
                    fields,
                }
            })
            .collect();

        StateSnapshot {
            phase: self.phase,
            mode: self.mode.clone(),
            current_player: self.current_player,
            local_player_id: self.local_player_id,
            turn_number: self.turn_number,
            players,
            board: self.board.to_json(),
            winner: self.outcome.map(Outcome::to_json),
            valid_moves,
            room_code: self.room_code.clone(),
        }
    }

    /// Rebuilds full state from a snapshot, viewed from `local_player_id`.
    ///
    /// Reserves are recomputed from the board, so hidden fields in the
    /// snapshot are not needed.
    #[instrument(skip(snapshot), fields(turn = snapshot.turn_number))]
    pub fn from_snapshot(
        snapshot: &StateSnapshot,
        local_player_id: usize,
    ) -> Result<Self, StateError> {
        let board = if snapshot.phase == Phase::Lobby {
            Board::new()
        } else {
            Board::from_json(&snapshot.board)?
        };

        let seats: Vec<Seat> = snapshot
            .players
            .iter()
            .map(|p| Seat {
                name: p.name.clone(),
                is_ai: p.is_ai,
            })
            .collect();

        if snapshot.phase != Phase::Lobby {
            if seats.len() != 2 {
                return Err(StateError::new(format!(
                    "expected 2 players, got {}",
                    seats.len()
                )));
            }
            if snapshot.current_player >= seats.len() {
                return Err(StateError::new(format!(
                    "current player {} out of range",
                    snapshot.current_player
                )));
            }
        }

        let outcome = match &snapshot.winner {
            Some(value) => Some(
                Outcome::from_json(value)
                    .ok_or_else(|| StateError::new(format!("unreadable winner {}", value)))?,
            ),
            None if snapshot.phase == Phase::GameOver => Some(Outcome::Draw),
            None => None,
        };

        Ok(Self {
            phase: snapshot.phase,
            mode: snapshot.mode.clone(),
            seats,
            board,
            current_player: snapshot.current_player,
            local_player_id,
            turn_number: snapshot.turn_number,
            outcome,
            room_code: snapshot.room_code.clone(),
        })
    }
}

/// Restricts a snapshot to what `player_id` may see.
#[instrument(skip(snapshot))]
pub fn player_view(
    snapshot: &StateSnapshot,
    player_id: usize,
) -> Result<StateSnapshot, StateError> {
    let mut view = snapshot.clone();
    view.local_player_id = player_id;

    let board = if snapshot.phase == Phase::Lobby {
        Board::new()
    } else {
        Board::from_json(&snapshot.board)?
    };

    for player in &mut view.players {
        if player.id == player_id {
            let mark = Mark::for_seat(player.id);
            let reserve = mark.starting_reserve().saturating_sub(board.count(mark));
            player.fields.insert(PRIVATE_FIELD.to_string(), json!(reserve));
        } else {
            player.strip_fields(&[PRIVATE_FIELD]);
        }
    }

    view.valid_moves = if snapshot.phase == Phase::Playing && snapshot.current_player == player_id {
        cells_to_moves(board.empty_cells().collect())
    } else {
        Vec::new()
    };

    Ok(view)
}

fn cells_to_moves(cells: Vec<Cell>) -> Vec<MoveDescriptor> {
    cells
        .into_iter()
        .map(|cell| MoveDescriptor::new(json!({"row": cell.row, "col": cell.col})))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardcheck_contract::PlayerSeat;

    fn local_game() -> GameState {
        let config = GameConfig::local(vec![PlayerSeat::human("Alice"), PlayerSeat::human("Bob")]);
        GameState::start(&config, None).unwrap()
    }

    fn mv(row: usize, col: usize) -> MoveDescriptor {
        MoveDescriptor::new(json!({"row": row, "col": col}))
    }

    #[test]
    fn test_start_is_deterministic() {
        let game = local_game();
        let snapshot = game.render();
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.turn_number, 0);
        assert_eq!(snapshot.valid_moves.len(), 9);
        assert!(snapshot.winner.is_none());
    }

    #[test]
    fn test_three_seats_rejected() {
        let config = GameConfig::local(vec![
            PlayerSeat::human("A"),
            PlayerSeat::human("B"),
            PlayerSeat::human("C"),
        ]);
        assert!(matches!(
            GameState::start(&config, None),
            Err(TargetError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_shapes() {
        let mut game = local_game();
        for bad in [json!(null), json!(42), json!("bad"), json!({}), json!({"invalid": true})] {
            let err = game.apply(&MoveDescriptor::new(bad)).unwrap_err();
            assert!(matches!(err, MoveError::Malformed(_)));
        }
        assert_eq!(game.turn_number(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut game = local_game();
        let err = game.apply(&mv(999, 999)).unwrap_err();
        assert_eq!(err, MoveError::OutOfBounds(Cell::new(999, 999)));
    }

    #[test]
    fn test_occupied_rejected() {
        let mut game = local_game();
        game.apply(&mv(1, 1)).unwrap();
        assert_eq!(game.apply(&mv(1, 1)).unwrap_err(), MoveError::Occupied(Cell::new(1, 1)));
    }

    #[test]
    fn test_win_ends_game() {
        let mut game = local_game();
        for (r, c) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game.apply(&mv(r, c)).unwrap();
        }
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.outcome(), Some(Outcome::Winner(0)));
        assert_eq!(game.apply(&mv(2, 2)).unwrap_err(), MoveError::GameOver);
        assert!(game.render().valid_moves.is_empty());
    }

    #[test]
    fn test_other_reserve_hidden() {
        let snapshot = local_game().render();
        assert!(snapshot.players[0].has_field(PRIVATE_FIELD));
        assert!(!snapshot.players[1].has_field(PRIVATE_FIELD));
    }

    #[test]
    fn test_player_view_for_waiting_seat() {
        let mut game = local_game();
        game.apply(&mv(0, 0)).unwrap();
        let view = player_view(&game.render(), 0).unwrap();
        assert!(view.valid_moves.is_empty());
        assert_eq!(view.players[0].fields[PRIVATE_FIELD], json!(4));

        let view = player_view(&game.render(), 1).unwrap();
        assert_eq!(view.valid_moves.len(), 8);
        assert!(!view.players[0].has_field(PRIVATE_FIELD));
    }

    #[test]
    fn test_snapshot_rebuild() {
        let mut game = local_game();
        game.apply(&mv(2, 2)).unwrap();
        let rebuilt = GameState::from_snapshot(&game.render(), 0).unwrap();
        assert_eq!(rebuilt, game);
    }

    #[test]
    fn test_snapshot_with_one_seat_is_a_state_error() {
        let mut snapshot = local_game().render();
        snapshot.players.truncate(1);
        let err = GameState::from_snapshot(&snapshot, 0).unwrap_err();
        assert!(err.message.contains("expected 2 players"), "{}", err);
        assert!(err.file.ends_with("game.rs"), "{}", err.file);
        assert!(player_view(&snapshot, 0).is_ok());
    }

    #[test]
    fn test_player_view_rejects_unreadable_board() {
        let mut snapshot = local_game().render();
        snapshot.board = json!("not a board");
        let err = player_view(&snapshot, 0).unwrap_err();
        assert!(err.to_string().starts_with("State error: board is not an array"));
    }
}
