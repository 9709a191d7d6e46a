//! The observable page surface: elements, styling and visual snapshots.
//!
//! None of this is driven by the harness beyond a single click; it exists so
//! assertions can check that the target renders a minimal, themed UI.

use crate::{Mode, TargetError};
use async_trait::async_trait;

/// A list of alternative element selectors; any one match counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<String>,
}

impl Selector {
    /// Builds a selector from alternatives such as `#lobby` or `[data-board]`.
    pub fn any<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }

    /// Lobby container.
    pub fn lobby() -> Self {
        Self::any(["#lobby", "[data-screen=\"lobby\"]"])
    }

    /// Board container.
    pub fn board() -> Self {
        Self::any(["#board", ".board", "[data-board]"])
    }

    /// Current-player indicator.
    pub fn current_player() -> Self {
        Self::any(["#current-player", "[data-current-player]"])
    }

    /// "New game" control.
    pub fn new_game() -> Self {
        Self::any(["#new-game-btn", "[data-action=\"new-game\"]"])
    }

    /// Lobby button that picks a mode.
    pub fn mode_button(mode: &Mode) -> Self {
        Self::any([format!("[data-mode=\"{}\"]", mode)])
    }

    /// Returns the alternatives.
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Returns true if any alternative equals one of the element's aliases.
    pub fn matches<S: AsRef<str>>(&self, aliases: &[S]) -> bool {
        self.alternatives
            .iter()
            .any(|alt| aliases.iter().any(|alias| alias.as_ref() == alt))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.alternatives.join(", "))
    }
}

/// A captured visual snapshot of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Encoded image (or text rendering) bytes.
    pub bytes: Vec<u8>,
    /// File extension matching the encoding, without the dot.
    pub extension: String,
}

/// Read-mostly access to what the page shows.
#[async_trait]
pub trait PageSurface: Send + Sync {
    /// Returns true if an element matching the selector is visible.
    async fn is_visible(&self, selector: &Selector) -> Result<bool, TargetError>;

    /// Clicks the visible element matching the selector.
    async fn click(&self, selector: &Selector) -> Result<(), TargetError>;

    /// Returns a styling token defined on the document root, such as `--color-bg`.
    async fn style_token(&self, name: &str) -> Result<Option<String>, TargetError>;

    /// Returns the computed typeface list of the document body.
    async fn body_font_family(&self) -> Result<String, TargetError>;

    /// Captures the full page.
    async fn capture(&self) -> Result<Snapshot, TargetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_alternative_matches() {
        let selector = Selector::board();
        assert!(selector.matches(&["[data-board]"]));
        assert!(!selector.matches(&["#lobby"]));
    }

    #[test]
    fn test_mode_button_selector() {
        let selector = Selector::mode_button(&Mode::Local);
        assert_eq!(selector.to_string(), "[data-mode=\"local\"]");
    }
}
