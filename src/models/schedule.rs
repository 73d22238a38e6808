//! Schedule (solution) model.
//!
//! A schedule is the finalized result of a run: every requested matchup
//! bound to one week with a host and a visitor. It is produced only by the
//! balance optimizer, so any `Schedule` value is complete and oriented.
//!
//! # Invariants
//! - For every team and week, at most one game references the team.
//! - Games are ordered by week, then by the order their requests were given.
//! - `records` holds one entry per team in the season, including teams
//!   without games.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::{HomePreference, Pairing};

/// Which side of a game a team is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Venue {
    /// Hosting team.
    Home,
    /// Visiting team.
    Away,
}

impl Venue {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }
}

/// A matchup bound to a week and an orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledGame {
    /// Week index in `[0, season_length)`.
    pub week: usize,
    /// Hosting team.
    pub home: String,
    /// Visiting team.
    pub away: String,
    /// Position of the originating request in the input.
    pub request_index: usize,
    /// Home preference carried over from the request.
    pub preference: Option<HomePreference>,
}

impl ScheduledGame {
    /// Whether `team` plays in this game.
    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// Opponent of `team`, or `None` if `team` does not play.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home == team {
            Some(&self.away)
        } else if self.away == team {
            Some(&self.home)
        } else {
            None
        }
    }

    /// Side `team` plays on, or `None` if `team` does not play.
    pub fn venue_for(&self, team: &str) -> Option<Venue> {
        if self.home == team {
            Some(Venue::Home)
        } else if self.away == team {
            Some(Venue::Away)
        } else {
            None
        }
    }

    /// Canonical pairing of the two teams.
    pub fn pairing(&self) -> Pairing {
        Pairing::new(&self.home, &self.away)
    }

    /// Whether the requested host got the home game.
    ///
    /// Returns `None` when the request named no host.
    pub fn preference_honored(&self) -> Option<bool> {
        self.preference.as_ref().map(|p| p.team == self.home)
    }
}

/// Smallest season imbalance reachable by orienting `games` games on top
/// of a carried `prior` (home minus away).
pub(crate) fn balance_bound(prior: i64, games: usize) -> usize {
    let reach = games as i64;
    if prior >= reach {
        (prior - reach) as usize
    } else if prior <= -reach {
        (-prior - reach) as usize
    } else {
        (prior + reach).rem_euclid(2) as usize
    }
}

/// Home/away tally of one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    /// Games requested (and scheduled).
    pub games: usize,
    /// Games hosted.
    pub home: usize,
    /// Games visited.
    pub away: usize,
    /// Home minus away carried in from fixed games.
    pub prior_balance: i64,
}

impl TeamRecord {
    /// Season home minus away, carried balance included.
    #[inline]
    pub fn season_balance(&self) -> i64 {
        self.prior_balance + self.home as i64 - self.away as i64
    }

    /// `|season_balance|`.
    #[inline]
    pub fn imbalance(&self) -> usize {
        self.season_balance().unsigned_abs() as usize
    }

    /// Best imbalance the scheduled games could reach: `games % 2` without
    /// a carried balance, `|prior| - games` when the carry is too large to
    /// offset.
    #[inline]
    pub fn best_imbalance(&self) -> usize {
        balance_bound(self.prior_balance, self.games)
    }

    /// Whether the imbalance equals the best achievable value.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.imbalance() == self.best_imbalance()
    }
}

/// A finalized season schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    season_length: usize,
    games: Vec<ScheduledGame>,
    records: BTreeMap<String, TeamRecord>,
}

impl Schedule {
    /// Builds a schedule from oriented games, ordering them and tallying
    /// records for every team in `teams`.
    pub(crate) fn from_games<'a>(
        season_length: usize,
        teams: impl IntoIterator<Item = &'a str>,
        mut games: Vec<ScheduledGame>,
    ) -> Self {
        games.sort_by_key(|g| (g.week, g.request_index));

        let mut records: BTreeMap<String, TeamRecord> = teams
            .into_iter()
            .map(|t| (t.to_string(), TeamRecord::default()))
            .collect();
        for game in &games {
            let home = records.entry(game.home.clone()).or_default();
            home.games += 1;
            home.home += 1;
            let away = records.entry(game.away.clone()).or_default();
            away.games += 1;
            away.away += 1;
        }

        Self {
            season_length,
            games,
            records,
        }
    }

    /// Records the carried balance of each named team.
    pub(crate) fn with_prior_balances<'a>(
        mut self,
        balances: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Self {
        for (team, balance) in balances {
            if let Some(record) = self.records.get_mut(team) {
                record.prior_balance = balance;
            }
        }
        self
    }

    /// Number of weeks in the season.
    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// All games, ordered by week.
    pub fn games(&self) -> &[ScheduledGame] {
        &self.games
    }

    /// Number of scheduled games.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Games played in `week`.
    pub fn games_in_week(&self, week: usize) -> Vec<&ScheduledGame> {
        self.games.iter().filter(|g| g.week == week).collect()
    }

    /// Games involving `team`, ordered by week.
    pub fn games_for_team(&self, team: &str) -> Vec<&ScheduledGame> {
        self.games.iter().filter(|g| g.involves(team)).collect()
    }

    /// The game scheduled for a pairing.
    pub fn game_for(&self, pairing: &Pairing) -> Option<&ScheduledGame> {
        self.games.iter().find(|g| &g.pairing() == pairing)
    }

    /// Home/away record for `team`.
    pub fn record(&self, team: &str) -> Option<&TeamRecord> {
        self.records.get(team)
    }

    /// Records of all teams, keyed by name.
    pub fn records(&self) -> &BTreeMap<String, TeamRecord> {
        &self.records
    }

    /// Largest single-team imbalance (0 for an empty schedule).
    pub fn max_imbalance(&self) -> usize {
        self.records
            .values()
            .map(TeamRecord::imbalance)
            .max()
            .unwrap_or(0)
    }

    /// `(team, week)` slots holding more than one game.
    ///
    /// Always empty for schedules produced by the engine.
    pub fn double_bookings(&self) -> Vec<(String, usize)> {
        let mut slots: HashMap<(&str, usize), usize> = HashMap::new();
        for g in &self.games {
            *slots.entry((g.home.as_str(), g.week)).or_insert(0) += 1;
            *slots.entry((g.away.as_str(), g.week)).or_insert(0) += 1;
        }
        let mut clashes: Vec<(String, usize)> = slots
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|((team, week), _)| (team.to_string(), week))
            .collect();
        clashes.sort();
        clashes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(week: usize, home: &str, away: &str, request_index: usize) -> ScheduledGame {
        ScheduledGame {
            week,
            home: home.into(),
            away: away.into(),
            request_index,
            preference: None,
        }
    }

    fn sample_schedule() -> Schedule {
        Schedule::from_games(
            2,
            ["A", "B", "C", "D", "E"],
            vec![
                game(1, "C", "A", 2),
                game(0, "A", "B", 0),
                game(1, "B", "D", 3),
                game(0, "D", "C", 1),
            ],
        )
    }

    #[test]
    fn test_games_ordered_by_week() {
        let s = sample_schedule();
        let order: Vec<usize> = s.games().iter().map(|g| g.request_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(s.game_count(), 4);
        assert_eq!(s.season_length(), 2);
    }

    #[test]
    fn test_records() {
        let s = sample_schedule();
        let a = s.record("A").unwrap();
        assert_eq!((a.games, a.home, a.away), (2, 1, 1));
        assert!(a.is_balanced());
        // Team without games still has a record
        let e = s.record("E").unwrap();
        assert_eq!(e.games, 0);
        assert!(e.is_balanced());
        assert!(s.record("Z").is_none());
        assert_eq!(s.max_imbalance(), 0);
    }

    #[test]
    fn test_views() {
        let s = sample_schedule();
        assert_eq!(s.games_in_week(0).len(), 2);
        assert_eq!(s.games_in_week(5).len(), 0);
        let a_games = s.games_for_team("A");
        assert_eq!(a_games.len(), 2);
        assert_eq!(a_games[0].opponent_of("A"), Some("B"));
        assert_eq!(a_games[1].venue_for("A"), Some(Venue::Away));
        assert!(s.game_for(&Pairing::new("B", "A")).is_some());
        assert!(s.game_for(&Pairing::new("A", "D")).is_none());
    }

    #[test]
    fn test_double_bookings_detected() {
        let s = Schedule::from_games(1, ["A", "B", "C"], vec![game(0, "A", "B", 0), game(0, "A", "C", 1)]);
        assert_eq!(s.double_bookings(), vec![("A".to_string(), 0)]);
        assert!(sample_schedule().double_bookings().is_empty());
    }

    #[test]
    fn test_preference_honored() {
        let mut g = game(0, "A", "B", 0);
        assert_eq!(g.preference_honored(), None);
        g.preference = Some(HomePreference::soft("A"));
        assert_eq!(g.preference_honored(), Some(true));
        g.preference = Some(HomePreference::soft("B"));
        assert_eq!(g.preference_honored(), Some(false));
    }

    #[test]
    fn test_record_imbalance() {
        let r = TeamRecord {
            games: 3,
            home: 2,
            away: 1,
            ..Default::default()
        };
        assert_eq!(r.imbalance(), 1);
        assert!(r.is_balanced());
        let r = TeamRecord {
            games: 4,
            home: 3,
            away: 1,
            ..Default::default()
        };
        assert!(!r.is_balanced());
        assert_eq!(Venue::Home.opposite(), Venue::Away);
    }

    #[test]
    fn test_prior_balance_counts_toward_imbalance() {
        // +2 carried, both requested games away: level season
        let r = TeamRecord {
            games: 2,
            home: 0,
            away: 2,
            prior_balance: 2,
        };
        assert_eq!(r.season_balance(), 0);
        assert!(r.is_balanced());

        // Carry larger than the games can offset
        let r = TeamRecord {
            games: 1,
            home: 0,
            away: 1,
            prior_balance: 4,
        };
        assert_eq!(r.imbalance(), 3);
        assert_eq!(r.best_imbalance(), 3);
        assert!(r.is_balanced());
    }

    #[test]
    fn test_balance_bound() {
        assert_eq!(balance_bound(0, 3), 1);
        assert_eq!(balance_bound(0, 4), 0);
        assert_eq!(balance_bound(-1, 3), 0);
        assert_eq!(balance_bound(5, 2), 3);
        assert_eq!(balance_bound(-6, 2), 4);
        assert_eq!(balance_bound(3, 0), 3);
    }

    #[test]
    fn test_with_prior_balances() {
        let s = sample_schedule().with_prior_balances([("A", 2), ("Z", 1)]);
        let a = s.record("A").unwrap();
        assert_eq!(a.prior_balance, 2);
        assert_eq!(a.imbalance(), 2);
        assert!(!a.is_balanced());
        assert_eq!(s.max_imbalance(), 2);
        assert!(s.record("Z").is_none());
    }
}
