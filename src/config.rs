//! Server settings read from the environment.
//!
//! HOST (default 0.0.0.0), PORT (8080), STATIC_DIR (frontend bundle, optional), and the
//! default scoring: SCORE_MATCH_WIN (3), SCORE_MATCH_LOSS (0), SCORE_SET_WON (0),
//! SCORE_SET_LOST (0).

use crate::models::ScoringRules;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<String>,
    pub scoring: ScoringRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: None,
            scoring: ScoringRules::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let scoring = ScoringRules {
            match_win: parse_or(&lookup, "SCORE_MATCH_WIN", defaults.scoring.match_win),
            match_loss: parse_or(&lookup, "SCORE_MATCH_LOSS", defaults.scoring.match_loss),
            set_won: parse_or(&lookup, "SCORE_SET_WON", defaults.scoring.set_won),
            set_lost: parse_or(&lookup, "SCORE_SET_LOST", defaults.scoring.set_lost),
        };
        Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            static_dir: lookup("STATIC_DIR").filter(|d| !d.trim().is_empty()),
            scoring,
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring {}={:?}: not a valid value, using {}", key, raw, default);
            default
        }),
    }
}
