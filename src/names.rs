//! Player display names

use serde::{Deserialize, Serialize};

use crate::sim::Side;

/// Fallback used when a name field is blank
pub fn default_name(side: Side) -> String {
    format!("Player {}", side.number())
}

/// Coloured square shown before each name
pub fn badge(side: Side) -> &'static str {
    match side {
        Side::One => "🟦",
        Side::Two => "🟥",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    names: [String; 2],
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self {
            names: [default_name(Side::One), default_name(Side::Two)],
        }
    }
}

impl PlayerNames {
    /// Take raw field text; surrounding whitespace is dropped and a blank
    /// entry falls back to the default name
    pub fn set(&mut self, side: Side, raw: &str) {
        let trimmed = raw.trim();
        self.names[side.index()] = if trimmed.is_empty() {
            default_name(side)
        } else {
            trimmed.to_string()
        };
    }

    pub fn get(&self, side: Side) -> &str {
        &self.names[side.index()]
    }

    /// Badge + name, as shown in the status labels and name displays
    pub fn label(&self, side: Side) -> String {
        format!("{} {}", badge(side), self.get(side))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let names = PlayerNames::default();
        assert_eq!(names.get(Side::One), "Player 1");
        assert_eq!(names.label(Side::Two), "🟥 Player 2");
    }

    #[test]
    fn test_set_trims_and_falls_back() {
        let mut names = PlayerNames::default();
        names.set(Side::One, "  Ada ");
        assert_eq!(names.label(Side::One), "🟦 Ada");

        names.set(Side::One, "   ");
        assert_eq!(names.get(Side::One), "Player 1");
    }

    #[test]
    fn test_reset() {
        let mut names = PlayerNames::default();
        names.set(Side::Two, "Grace");
        names.reset();
        assert_eq!(names, PlayerNames::default());
    }
}
