//! Simple AI opponent.

use crate::board::{Board, Cell, Mark};
use crate::game::GameState;
use tracing::{debug, instrument};

/// Simple AI: wins if it can, blocks if it must, otherwise takes the centre
/// or the first empty square.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAi;

impl SimpleAi {
    /// Picks a cell for the active seat, or None if no move is legal.
    #[instrument(skip(self, game), fields(seat = game.current_player()))]
    pub fn choose(&self, game: &GameState) -> Option<Cell> {
        let cells = game.legal_cells();
        let mine = Mark::for_seat(game.current_player());
        let theirs = Mark::for_seat(game.current_player() + 1);

        let choice = completes_line(game.board(), &cells, mine)
            .or_else(|| completes_line(game.board(), &cells, theirs))
            .or_else(|| cells.iter().copied().find(|c| *c == Cell::new(1, 1)))
            .or_else(|| cells.first().copied());

        debug!(?choice, "AI chose cell");
        choice
    }
}

fn completes_line(board: &Board, cells: &[Cell], mark: Mark) -> Option<Cell> {
    cells.iter().copied().find(|cell| {
        let mut trial = board.clone();
        trial.set(*cell, mark);
        trial.winner() == Some(mark)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardcheck_contract::{GameConfig, MoveDescriptor, PlayerSeat};
    use serde_json::json;

    fn ai_game() -> GameState {
        let config = GameConfig::ai(vec![PlayerSeat::human("Human"), PlayerSeat::ai("Bot")]);
        GameState::start(&config, None).unwrap()
    }

    fn play(game: &mut GameState, row: usize, col: usize) {
        game.apply(&MoveDescriptor::new(json!({"row": row, "col": col})))
            .unwrap();
    }

    #[test]
    fn test_takes_centre_first() {
        let mut game = ai_game();
        play(&mut game, 0, 0);
        assert_eq!(SimpleAi.choose(&game), Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_blocks_open_line() {
        let mut game = ai_game();
        play(&mut game, 0, 0);
        game.place(Cell::new(1, 1)).unwrap();
        play(&mut game, 0, 1);
        assert_eq!(SimpleAi.choose(&game), Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_human_cannot_move_for_ai() {
        let mut game = ai_game();
        play(&mut game, 0, 0);
        let err = game
            .apply(&MoveDescriptor::new(json!({"row": 2, "col": 2})))
            .unwrap_err();
        assert!(err.to_string().contains("Not your turn"));
    }
}
