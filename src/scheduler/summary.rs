//! Home/away balance metrics.
//!
//! Computes fairness indicators from a finalized schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Max imbalance | max over teams of \|carried + home − away\| |
//! | Total imbalance | Σ over teams of \|carried + home − away\| |
//! | Balanced teams | teams at the best achievable imbalance ([`TeamRecord::best_imbalance`]) |
//! | Honored preferences | requested hosts that got the home game |
//! | Overridden preferences | requested hosts moved away for balance |
//! | Weeks used | distinct weeks holding at least one game |

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{Schedule, TeamRecord};

/// Balance indicators of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// Largest single-team imbalance.
    pub max_imbalance: usize,
    /// Sum of all team imbalances.
    pub total_imbalance: usize,
    /// Teams whose imbalance equals their best achievable value.
    pub balanced_teams: usize,
    /// Teams in the season.
    pub team_count: usize,
    /// Preferences whose team hosts.
    pub preferences_honored: usize,
    /// Preferences whose team visits.
    pub preferences_overridden: usize,
    /// Distinct weeks with games.
    pub weeks_used: usize,
    /// Per-team records.
    pub records: BTreeMap<String, TeamRecord>,
}

impl BalanceSummary {
    /// Computes indicators from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let records = schedule.records().clone();
        let max_imbalance = records.values().map(TeamRecord::imbalance).max().unwrap_or(0);
        let total_imbalance = records.values().map(TeamRecord::imbalance).sum();
        let balanced_teams = records.values().filter(|r| r.is_balanced()).count();

        let mut preferences_honored = 0;
        let mut preferences_overridden = 0;
        for game in schedule.games() {
            match game.preference_honored() {
                Some(true) => preferences_honored += 1,
                Some(false) => preferences_overridden += 1,
                None => {}
            }
        }

        let weeks_used = schedule
            .games()
            .iter()
            .map(|g| g.week)
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            max_imbalance,
            total_imbalance,
            balanced_teams,
            team_count: records.len(),
            preferences_honored,
            preferences_overridden,
            weeks_used,
            records,
        }
    }

    /// Whether every team reached the best achievable imbalance.
    pub fn is_optimal(&self) -> bool {
        self.balanced_teams == self.team_count
    }

    /// Teams not at the bound, by name.
    pub fn unbalanced_teams(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(_, r)| !r.is_balanced())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HomePreference, ScheduledGame};

    fn game(week: usize, home: &str, away: &str, preferred: Option<&str>) -> ScheduledGame {
        ScheduledGame {
            week,
            home: home.into(),
            away: away.into(),
            request_index: week,
            preference: preferred.map(HomePreference::soft),
        }
    }

    #[test]
    fn test_balanced_summary() {
        let s = Schedule::from_games(
            3,
            ["A", "B", "C"],
            vec![
                game(0, "A", "B", Some("A")),
                game(1, "B", "C", Some("C")),
                game(2, "C", "A", None),
            ],
        );
        let kpi = BalanceSummary::calculate(&s);
        assert_eq!(kpi.max_imbalance, 0);
        assert_eq!(kpi.total_imbalance, 0);
        assert_eq!(kpi.balanced_teams, 3);
        assert!(kpi.is_optimal());
        assert_eq!(kpi.preferences_honored, 1);
        assert_eq!(kpi.preferences_overridden, 1);
        assert_eq!(kpi.weeks_used, 3);
        assert!(kpi.unbalanced_teams().is_empty());
    }

    #[test]
    fn test_unbalanced_summary() {
        let s = Schedule::from_games(
            2,
            ["A", "B", "C"],
            vec![game(0, "A", "B", None), game(1, "A", "C", None)],
        );
        let kpi = BalanceSummary::calculate(&s);
        assert_eq!(kpi.max_imbalance, 2);
        // A: 2, B: 1, C: 1
        assert_eq!(kpi.total_imbalance, 4);
        assert_eq!(kpi.balanced_teams, 2);
        assert!(!kpi.is_optimal());
        assert_eq!(kpi.unbalanced_teams(), vec!["A"]);
    }

    #[test]
    fn test_carried_balance_counts() {
        // B carries +2; visiting twice levels it
        let s = Schedule::from_games(
            2,
            ["A", "B", "C"],
            vec![game(0, "A", "B", None), game(1, "C", "B", None)],
        )
        .with_prior_balances([("B", 2)]);
        let kpi = BalanceSummary::calculate(&s);
        assert_eq!(kpi.records["B"].season_balance(), 0);
        assert_eq!(kpi.max_imbalance, 1);
        assert_eq!(kpi.total_imbalance, 2);
        assert!(kpi.is_optimal());

        // Same games without the carry leave B two games away
        let s = Schedule::from_games(
            2,
            ["A", "B", "C"],
            vec![game(0, "A", "B", None), game(1, "C", "B", None)],
        );
        assert_eq!(BalanceSummary::calculate(&s).unbalanced_teams(), vec!["B"]);
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::from_games(0, std::iter::empty(), Vec::new());
        let kpi = BalanceSummary::calculate(&s);
        assert_eq!(kpi.max_imbalance, 0);
        assert_eq!(kpi.team_count, 0);
        assert_eq!(kpi.weeks_used, 0);
        assert!(kpi.is_optimal());
    }
}
