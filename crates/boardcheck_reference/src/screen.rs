//! Headless screen model: which elements a phase shows, the theme, and a
//! text rendering used as the page capture.

use crate::game::GameState;
use boardcheck_contract::{Mode, Phase, Selector};

/// Root styling tokens.
pub const THEME: [(&str, &str); 3] = [
    ("--color-bg", "#1b1d23"),
    ("--color-surface", "#262a33"),
    ("--color-accent", "#e0a526"),
];

/// Body typeface list.
pub const BODY_FONT: &str = "\"Inter\", system-ui, sans-serif";

/// Elements the page can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Lobby container.
    Lobby,
    /// Lobby button selecting a mode.
    ModeButton(Mode),
    /// Board container.
    Board,
    /// Whose-turn indicator.
    CurrentPlayer,
    /// Return-to-lobby control.
    NewGame,
}

impl Element {
    /// Selectors this element answers to.
    pub fn aliases(&self) -> Vec<String> {
        match self {
            Element::Lobby => vec!["#lobby".into(), "[data-screen=\"lobby\"]".into()],
            Element::ModeButton(mode) => vec![format!("[data-mode=\"{}\"]", mode)],
            Element::Board => vec!["#board".into(), ".board".into(), "[data-board]".into()],
            Element::CurrentPlayer => {
                vec!["#current-player".into(), "[data-current-player]".into()]
            }
            Element::NewGame => vec!["#new-game-btn".into(), "[data-action=\"new-game\"]".into()],
        }
    }
}

/// Elements visible in a phase.
pub fn visible_elements(phase: Phase) -> Vec<Element> {
    match phase {
        Phase::Lobby => vec![
            Element::Lobby,
            Element::ModeButton(Mode::Local),
            Element::ModeButton(Mode::Ai),
            Element::ModeButton(Mode::LocalSplit),
        ],
        Phase::Playing => vec![Element::Board, Element::CurrentPlayer, Element::NewGame],
        Phase::GameOver => vec![Element::Board, Element::NewGame],
    }
}

/// Finds the visible element a selector points at.
pub fn find_visible(phase: Phase, selector: &Selector) -> Option<Element> {
    visible_elements(phase)
        .into_iter()
        .find(|element| selector.matches(&element.aliases()))
}

/// Text rendering of the whole page.
pub fn render_page(game: &GameState) -> String {
    let mut out = String::new();
    out.push_str(&format!("== boardcheck reference :: {} ==\n", game.phase()));

    match game.phase() {
        Phase::Lobby => {
            out.push_str("[ Local ] [ AI ] [ Split tab ]\n");
        }
        phase => {
            if let Some(mode) = game.mode() {
                out.push_str(&format!("mode: {}\n", mode));
            }
            if let Some(code) = game.room_code() {
                out.push_str(&format!("room: {}\n", code));
            }
            for (id, seat) in game.seats().iter().enumerate() {
                let marker = if phase == Phase::Playing && id == game.current_player() {
                    ">"
                } else {
                    " "
                };
                out.push_str(&format!("{} {} {}\n", marker, id, seat.name));
            }
            out.push('\n');
            out.push_str(&game.board().display());
            out.push_str(&format!("\n\nturn {}\n", game.turn_number()));
            if let Some(outcome) = game.outcome() {
                out.push_str(&format!("result: {:?}\n", outcome));
            }
            out.push_str("[ New game ]\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_hides_board() {
        assert!(find_visible(Phase::Lobby, &Selector::lobby()).is_some());
        assert!(find_visible(Phase::Lobby, &Selector::board()).is_none());
    }

    #[test]
    fn test_playing_shows_controls() {
        assert_eq!(find_visible(Phase::Playing, &Selector::new_game()), Some(Element::NewGame));
        assert!(find_visible(Phase::Playing, &Selector::current_player()).is_some());
        assert!(find_visible(Phase::GameOver, &Selector::current_player()).is_none());
    }
}
