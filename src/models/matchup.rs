//! Matchup request model.
//!
//! A request asks for two distinct teams to meet once during the season,
//! optionally naming which of them should host.
//!
//! # Canonical Form
//! Requests are unordered: `A vs B` and `B vs A` denote the same matchup.
//! [`MatchupRequest::pairing`] yields a [`Pairing`] with the lexicographically
//! smaller name first, which is the key used for duplicate detection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::team::trimmed;

/// How binding a home preference is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PreferenceStrength {
    /// Used as the starting orientation; may be flipped to restore balance.
    #[default]
    Soft,
    /// Fixed orientation, never flipped by the balance optimizer.
    Forced,
}

/// A requested host for a matchup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HomePreference {
    /// Team that wants to host.
    #[serde(deserialize_with = "trimmed")]
    pub team: String,
    /// Whether the preference may be overridden.
    #[serde(default)]
    pub strength: PreferenceStrength,
}

impl HomePreference {
    /// Advisory preference.
    pub fn soft(team: impl Into<String>) -> Self {
        Self {
            team: team.into().trim().to_string(),
            strength: PreferenceStrength::Soft,
        }
    }

    /// Binding preference.
    pub fn forced(team: impl Into<String>) -> Self {
        Self {
            team: team.into().trim().to_string(),
            strength: PreferenceStrength::Forced,
        }
    }

    /// Whether the preference is binding.
    #[inline]
    pub fn is_forced(&self) -> bool {
        self.strength == PreferenceStrength::Forced
    }
}

/// Canonical unordered team pair (`first <= second`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pairing {
    /// Lexicographically smaller team name.
    pub first: String,
    /// Lexicographically larger team name.
    pub second: String,
}

impl Pairing {
    /// Creates the canonical pairing of two names.
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Whether `team` is one of the two sides.
    pub fn contains(&self, team: &str) -> bool {
        self.first == team || self.second == team
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

/// A request for two teams to play each other once.
///
/// # Example
/// ```
/// use u_season::models::{HomePreference, MatchupRequest};
///
/// let a = MatchupRequest::new("Clemson", "Penn State")
///     .with_preference(HomePreference::soft("Clemson"));
/// let b = MatchupRequest::new("Penn State", "Clemson");
/// assert_eq!(a.pairing(), b.pairing());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupRequest {
    /// First listed team (default host when no preference is given).
    #[serde(deserialize_with = "trimmed")]
    pub team: String,
    /// Second listed team.
    #[serde(deserialize_with = "trimmed")]
    pub opponent: String,
    /// Requested host, if any.
    #[serde(default)]
    pub home: Option<HomePreference>,
}

impl MatchupRequest {
    /// Creates a request without a home preference.
    pub fn new(team: impl Into<String>, opponent: impl Into<String>) -> Self {
        Self {
            team: team.into().trim().to_string(),
            opponent: opponent.into().trim().to_string(),
            home: None,
        }
    }

    /// Sets the home preference.
    pub fn with_preference(mut self, preference: HomePreference) -> Self {
        self.home = Some(preference);
        self
    }

    /// Asks for `team` to host, overridable for balance.
    pub fn prefer_home(self, team: impl Into<String>) -> Self {
        self.with_preference(HomePreference::soft(team))
    }

    /// Requires `team` to host.
    pub fn force_home(self, team: impl Into<String>) -> Self {
        self.with_preference(HomePreference::forced(team))
    }

    /// Canonical pairing used for duplicate detection.
    pub fn pairing(&self) -> Pairing {
        Pairing::new(&self.team, &self.opponent)
    }

    /// Whether both sides name the same team.
    pub fn is_self_matchup(&self) -> bool {
        self.team == self.opponent
    }
}

impl fmt::Display for MatchupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.team, self.opponent)
    }
}
