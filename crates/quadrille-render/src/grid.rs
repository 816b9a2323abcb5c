//! Grid-paper background modes.

use serde::{Deserialize, Serialize};

/// Background ruling of the paper.
///
/// Persisted with the user's settings under its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    /// Square ruling.
    #[default]
    Basic,
    /// Squares with center plus marks.
    Plus,
    /// Cross ruling.
    Cross,
    /// Rice-character ruling (squares with diagonals).
    Rice,
}

impl GridMode {
    /// Cycle to the next grid mode.
    pub fn next(self) -> Self {
        match self {
            GridMode::Basic => GridMode::Plus,
            GridMode::Plus => GridMode::Cross,
            GridMode::Cross => GridMode::Rice,
            GridMode::Rice => GridMode::Basic,
        }
    }

    /// Display name for this grid mode.
    pub fn name(self) -> &'static str {
        match self {
            GridMode::Basic => "Basic",
            GridMode::Plus => "Plus",
            GridMode::Cross => "Cross",
            GridMode::Rice => "Rice",
        }
    }

    /// Parse a persisted mode name. Unknown names yield `None` rather than
    /// a silent default.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(GridMode::Basic),
            "plus" => Some(GridMode::Plus),
            "cross" => Some(GridMode::Cross),
            "rice" => Some(GridMode::Rice),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_visits_every_mode() {
        let mut mode = GridMode::Basic;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, GridMode::Basic);
        assert_eq!(
            seen,
            vec![GridMode::Basic, GridMode::Plus, GridMode::Cross, GridMode::Rice]
        );
    }

    #[test]
    fn test_from_name_roundtrip() {
        for mode in [GridMode::Basic, GridMode::Plus, GridMode::Cross, GridMode::Rice] {
            assert_eq!(GridMode::from_name(&mode.name().to_lowercase()), Some(mode));
        }
        assert_eq!(GridMode::from_name("dotted"), None);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&GridMode::Rice).unwrap();
        assert_eq!(json, "\"rice\"");
    }
}
