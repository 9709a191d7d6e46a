//! Board, marks and cells for the reference tic-tac-toe target.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Side length of the board.
pub const SIZE: usize = 3;

/// A rendered state could not be read back into game state.
#[derive(Debug, Clone, Display, Error)]
#[display("State error: {} at {}:{}", message, file, line)]
pub struct StateError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StateError {
    /// Creates a new state error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Placed by seat 0 (moves first).
    X,
    /// Placed by seat 1.
    O,
}

impl Mark {
    /// Returns the mark a seat plays.
    pub fn for_seat(seat: usize) -> Self {
        if seat % 2 == 0 { Mark::X } else { Mark::O }
    }

    /// Returns the seat that plays this mark.
    pub fn seat(self) -> usize {
        match self {
            Mark::X => 0,
            Mark::O => 1,
        }
    }

    /// Number of marks this side holds before the first move.
    pub fn starting_reserve(self) -> usize {
        match self {
            Mark::X => 5,
            Mark::O => 4,
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text {
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            _ => None,
        }
    }
}

/// A board coordinate. Also the exact shape of a move descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cell {
    /// Row, 0 at the top.
    pub row: usize,
    /// Column, 0 at the left.
    pub col: usize,
}

impl Cell {
    /// Creates a cell.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns true if the cell lies on the board.
    pub fn in_bounds(self) -> bool {
        self.row < SIZE && self.col < SIZE
    }

    fn index(self) -> usize {
        self.row * SIZE + self.col
    }

    fn from_index(index: usize) -> Self {
        Self::new(index / SIZE, index % SIZE)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 3x3 board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    squares: [Option<Mark>; SIZE * SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mark at an in-bounds cell.
    pub fn get(&self, cell: Cell) -> Option<Mark> {
        self.squares.get(cell.index()).copied().flatten()
    }

    /// Returns true if the in-bounds cell holds no mark.
    pub fn is_empty(&self, cell: Cell) -> bool {
        cell.in_bounds() && self.get(cell).is_none()
    }

    /// Places a mark. The caller has checked bounds and emptiness.
    pub(crate) fn set(&mut self, cell: Cell, mark: Mark) {
        self.squares[cell.index()] = Some(mark);
    }

    /// Iterates over empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, sq)| sq.is_none())
            .map(|(i, _)| Cell::from_index(i))
    }

    /// Checks if the board is full.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    /// Counts the marks of one side.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares.iter().filter(|sq| **sq == Some(mark)).count()
    }

    /// Returns the side holding three in a row, if any.
    pub fn winner(&self) -> Option<Mark> {
        const LINES: [[usize; 3]; 8] = [
            // Rows
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            // Columns
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            // Diagonals
            [0, 4, 8],
            [2, 4, 6],
        ];

        LINES.iter().find_map(|[a, b, c]| {
            let sq = self.squares[*a];
            if sq.is_some() && sq == self.squares[*b] && sq == self.squares[*c] {
                sq
            } else {
                None
            }
        })
    }

    /// Rows of `"X"`, `"O"` or null.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.squares
                .chunks(SIZE)
                .map(|row| {
                    Value::Array(
                        row.iter()
                            .map(|sq| match sq {
                                Some(mark) => Value::String(mark.to_string()),
                                None => Value::Null,
                            })
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    /// Parses the form produced by [`Board::to_json`].
    pub fn from_json(value: &Value) -> Result<Self, StateError> {
        let Some(rows) = value.as_array() else {
            return Err(StateError::new("board is not an array".to_string()));
        };
        if rows.len() != SIZE {
            return Err(StateError::new(format!("board has {} rows", rows.len())));
        }

        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            let Some(cols) = row.as_array().filter(|cols| cols.len() == SIZE) else {
                return Err(StateError::new(format!("row {} is not {} squares", r, SIZE)));
            };
            for (c, square) in cols.iter().enumerate() {
                match square {
                    Value::Null => {}
                    Value::String(text) => {
                        let Some(mark) = Mark::parse(text) else {
                            return Err(StateError::new(format!(
                                "unknown mark {:?} at ({}, {})",
                                text, r, c
                            )));
                        };
                        board.set(Cell::new(r, c), mark);
                    }
                    other => {
                        return Err(StateError::new(format!(
                            "unexpected square {} at ({}, {})",
                            other, r, c
                        )));
                    }
                }
            }
        }
        Ok(board)
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        self.squares
            .chunks(SIZE)
            .map(|row| {
                row.iter()
                    .map(|sq| sq.map_or_else(|| ".".to_string(), |m| m.to_string()))
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n-+-+-\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_win() {
        let mut board = Board::new();
        for col in 0..3 {
            board.set(Cell::new(1, col), Mark::O);
        }
        assert_eq!(board.winner(), Some(Mark::O));
    }

    #[test]
    fn test_diagonal_win() {
        let mut board = Board::new();
        board.set(Cell::new(0, 2), Mark::X);
        board.set(Cell::new(1, 1), Mark::X);
        board.set(Cell::new(2, 0), Mark::X);
        assert_eq!(board.winner(), Some(Mark::X));
    }

    #[test]
    fn test_no_winner_on_empty_board() {
        assert_eq!(Board::new().winner(), None);
        assert_eq!(Board::new().empty_cells().count(), 9);
    }

    #[test]
    fn test_json_round_trip() {
        let mut board = Board::new();
        board.set(Cell::new(0, 0), Mark::X);
        board.set(Cell::new(2, 1), Mark::O);
        let parsed = Board::from_json(&board.to_json()).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_unknown_mark_rejected() {
        let value = serde_json::json!([["Z", null, null], [null, null, null], [null, null, null]]);
        let err = Board::from_json(&value).unwrap_err();
        assert!(err.message.contains("unknown mark"), "{}", err);
        assert!(err.file.ends_with("board.rs"), "{}", err.file);
    }

    #[test]
    fn test_out_of_bounds_cell() {
        assert!(!Cell::new(999, 999).in_bounds());
        assert!(!Board::new().is_empty(Cell::new(3, 0)));
    }
}
