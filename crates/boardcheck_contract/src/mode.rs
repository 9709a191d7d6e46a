//! Game modes. The set is open: targets may define their own.

use serde::{Deserialize, Serialize};

/// Game mode selected at start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    /// All seats are played from one client.
    Local,
    /// One or more seats are driven by the target's AI.
    Ai,
    /// Two local contexts simulate networked peers.
    LocalSplit,
    /// Any mode the harness has no special knowledge of.
    Other(String),
}

impl Mode {
    /// Returns the wire name of this mode.
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Local => "local",
            Mode::Ai => "ai",
            Mode::LocalSplit => "local-split",
            Mode::Other(name) => name,
        }
    }
}

impl From<String> for Mode {
    fn from(name: String) -> Self {
        match name.as_str() {
            "local" => Mode::Local,
            "ai" => Mode::Ai,
            "local-split" => Mode::LocalSplit,
            _ => Mode::Other(name),
        }
    }
}

impl From<&str> for Mode {
    fn from(name: &str) -> Self {
        Mode::from(name.to_string())
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_modes_parse() {
        assert_eq!(Mode::from("local-split"), Mode::LocalSplit);
        assert_eq!(Mode::from("ai"), Mode::Ai);
    }

    #[test]
    fn test_unknown_mode_is_kept() {
        let mode: Mode = serde_json::from_str("\"hotseat-3p\"").unwrap();
        assert_eq!(mode, Mode::Other("hotseat-3p".to_string()));
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"hotseat-3p\"");
    }
}
