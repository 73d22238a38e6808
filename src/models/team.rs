//! Team model.
//!
//! A team is a participant identified by its unique name. Teams may carry
//! blocked weeks: slots already taken by fixed (e.g. conference) games, in
//! which no requested matchup can be placed.
//!
//! # Availability
//! A week `w` is available to a team iff `w < season_length` and `w` is not
//! in `blocked_weeks`. Blocked weeks beyond the season are ignored.
//!
//! # Carried Balance
//! `home_balance` is the team's home-minus-away count from games already
//! fixed outside the requests. The balance optimizer orients requested
//! games to offset it, so the season total is what gets balanced.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// A team taking part in the season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team name (trimmed).
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    /// Weeks in which the team cannot play a requested game.
    #[serde(default)]
    pub blocked_weeks: BTreeSet<usize>,
    /// Home minus away from already fixed games.
    #[serde(default)]
    pub home_balance: i64,
}

impl Team {
    /// Creates a team that is available every week.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            blocked_weeks: BTreeSet::new(),
            home_balance: 0,
        }
    }

    /// Sets the carried home-minus-away count.
    pub fn with_home_balance(mut self, balance: i64) -> Self {
        self.home_balance = balance;
        self
    }

    /// Blocks a single week.
    pub fn with_blocked_week(mut self, week: usize) -> Self {
        self.blocked_weeks.insert(week);
        self
    }

    /// Blocks every week in `[start, end)`.
    pub fn with_blocked_range(mut self, weeks: Range<usize>) -> Self {
        self.blocked_weeks.extend(weeks);
        self
    }

    /// Whether the team can play in `week` of a season of `season_length` weeks.
    #[inline]
    pub fn is_available(&self, week: usize, season_length: usize) -> bool {
        week < season_length && !self.blocked_weeks.contains(&week)
    }

    /// Number of weeks the team can play in a season of `season_length` weeks.
    pub fn available_weeks(&self, season_length: usize) -> usize {
        let blocked = self.blocked_weeks.range(..season_length).count();
        season_length - blocked
    }
}

/// Deserializes a team name, trimming surrounding whitespace the way the
/// constructors do.
pub(super) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(name.trim().to_string())
}

impl From<&str> for Team {
    fn from(name: &str) -> Self {
        Team::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_name_trimmed() {
        let team = Team::new("  Penn State ");
        assert_eq!(team.name, "Penn State");
        assert!(team.blocked_weeks.is_empty());
        assert_eq!(team.home_balance, 0);
    }

    #[test]
    fn test_home_balance_builder() {
        let team = Team::new("Rutgers").with_home_balance(4);
        assert_eq!(team.home_balance, 4);
    }

    #[test]
    fn test_json_name_trimmed() {
        let team: Team = serde_json::from_str(r#"{"name": " Oregon  ", "home_balance": -2}"#).unwrap();
        assert_eq!(team, Team::new("Oregon").with_home_balance(-2));
    }

    #[test]
    fn test_availability() {
        let team = Team::new("Utah").with_blocked_week(1).with_blocked_range(4..6);
        assert!(team.is_available(0, 8));
        assert!(!team.is_available(1, 8));
        assert!(!team.is_available(4, 8));
        assert!(!team.is_available(5, 8));
        assert!(team.is_available(6, 8));
        // Outside the season
        assert!(!team.is_available(8, 8));
    }

    #[test]
    fn test_available_weeks_ignores_out_of_season_blocks() {
        let team = Team::new("Kansas").with_blocked_week(2).with_blocked_week(20);
        assert_eq!(team.available_weeks(4), 3);
        assert_eq!(team.available_weeks(0), 0);
    }
}
