//! # Feature: Persona Modes
//!
//! Tone selection for generated replies. A fixed set of modes maps to
//! preamble templates loaded from prompt/*.md files at compile time. The
//! distinguished owner identity always receives the deferential owner
//! preamble, whatever mode is selected.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Owner preamble takes priority over the per-user mode
//! - 1.0.0: Initial release with 5 modes

use std::fmt;

const OWNER_PREAMBLE: &str = include_str!("../../../prompt/owner.md");
const STANDARD_PREAMBLE: &str = include_str!("../../../prompt/standard.md");
const SELF_DEPRECATING_PREAMBLE: &str = include_str!("../../../prompt/self_deprecating.md");
const ARGUMENTATIVE_PREAMBLE: &str = include_str!("../../../prompt/argumentative.md");
const TAUNTING_PREAMBLE: &str = include_str!("../../../prompt/taunting.md");
const REVERENT_PREAMBLE: &str = include_str!("../../../prompt/reverent.md");

/// Reply tone for a user's conversational turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Standard,
    SelfDeprecating,
    Argumentative,
    Taunting,
    Reverent,
}

impl Mode {
    /// All known modes, in display order.
    pub const fn all() -> [Mode; 5] {
        [
            Mode::Standard,
            Mode::SelfDeprecating,
            Mode::Argumentative,
            Mode::Taunting,
            Mode::Reverent,
        ]
    }

    /// Canonical key used in commands and configuration.
    pub const fn key(&self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::SelfDeprecating => "self-deprecating",
            Mode::Argumentative => "argumentative",
            Mode::Taunting => "taunting",
            Mode::Reverent => "reverent",
        }
    }

    /// Parse a user-supplied mode key. Trims and case-folds before matching;
    /// unknown keys return `None`.
    pub fn from_key(key: &str) -> Option<Mode> {
        match key.trim().to_lowercase().as_str() {
            "standard" => Some(Mode::Standard),
            "self-deprecating" => Some(Mode::SelfDeprecating),
            "argumentative" => Some(Mode::Argumentative),
            "taunting" => Some(Mode::Taunting),
            "reverent" => Some(Mode::Reverent),
            _ => None,
        }
    }

    /// Comma-separated list of valid keys, for guidance messages.
    pub fn available_keys() -> String {
        Mode::all()
            .iter()
            .map(|m| m.key())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn preamble(&self) -> &'static str {
        match self {
            Mode::Standard => STANDARD_PREAMBLE,
            Mode::SelfDeprecating => SELF_DEPRECATING_PREAMBLE,
            Mode::Argumentative => ARGUMENTATIVE_PREAMBLE,
            Mode::Taunting => TAUNTING_PREAMBLE,
            Mode::Reverent => REVERENT_PREAMBLE,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Select the preamble for a prompt build.
///
/// The owner identity wins over the mode; everyone else gets the template
/// for their selected mode.
pub fn preamble_for(mode: Mode, is_owner: bool) -> &'static str {
    if is_owner {
        OWNER_PREAMBLE
    } else {
        mode.preamble()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_accepts_all_canonical_keys() {
        for mode in Mode::all() {
            assert_eq!(Mode::from_key(mode.key()), Some(mode));
        }
    }

    #[test]
    fn test_from_key_normalizes_input() {
        assert_eq!(Mode::from_key("  Taunting  "), Some(Mode::Taunting));
        assert_eq!(Mode::from_key("SELF-DEPRECATING"), Some(Mode::SelfDeprecating));
    }

    #[test]
    fn test_from_key_rejects_unknown() {
        assert_eq!(Mode::from_key("polite"), None);
        assert_eq!(Mode::from_key(""), None);
    }

    #[test]
    fn test_default_mode_is_standard() {
        assert_eq!(Mode::default(), Mode::Standard);
    }

    #[test]
    fn test_owner_overrides_every_mode() {
        for mode in Mode::all() {
            assert_eq!(preamble_for(mode, true), OWNER_PREAMBLE);
        }
    }

    #[test]
    fn test_preambles_loaded_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for mode in Mode::all() {
            let preamble = preamble_for(mode, false);
            assert!(preamble.len() > 100, "preamble for {mode} should be substantial");
            assert!(seen.insert(preamble), "preamble for {mode} duplicates another mode");
        }
    }

    #[test]
    fn test_available_keys_lists_all() {
        let keys = Mode::available_keys();
        assert!(keys.contains("standard"));
        assert!(keys.contains("reverent"));
    }
}
