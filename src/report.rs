//! Read-only views of a finalized schedule.
//!
//! Two projections are offered:
//! - per team: ordered `(week, opponent, venue)` fixtures
//! - per week: the games played that week (every week of the season is
//!   present, possibly empty)
//!
//! Rendering for a particular chat platform is left to the caller; the
//! `Display` implementation is a plain-text listing by week.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Schedule, ScheduledGame, Venue};

/// One game from a team's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamFixture {
    /// Week index.
    pub week: usize,
    /// Opposing team.
    pub opponent: String,
    /// Whether the team hosts.
    pub venue: Venue,
}

impl fmt::Display for TeamFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.venue {
            Venue::Home => write!(f, "week {}: vs {}", self.week, self.opponent),
            Venue::Away => write!(f, "week {}: at {}", self.week, self.opponent),
        }
    }
}

/// Projections over a [`Schedule`].
///
/// # Example
/// ```
/// use u_season::report::ScheduleReport;
/// use u_season::scheduler::{SeasonRequest, SeasonScheduler};
///
/// let request = SeasonRequest::new(1)
///     .with_teams(["A", "B"])
///     .with_matchup("A", "B");
/// let schedule = SeasonScheduler::new().schedule(&request).unwrap();
///
/// let report = ScheduleReport::new(&schedule);
/// assert_eq!(report.fixtures_for("B")[0].to_string(), "week 0: at A");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScheduleReport<'a> {
    schedule: &'a Schedule,
}

impl<'a> ScheduleReport<'a> {
    /// Wraps a schedule.
    pub fn new(schedule: &'a Schedule) -> Self {
        Self { schedule }
    }

    /// Fixtures of one team ordered by week. Empty for unknown teams.
    pub fn fixtures_for(&self, team: &str) -> Vec<TeamFixture> {
        self.schedule
            .games()
            .iter()
            .filter_map(|g| {
                Some(TeamFixture {
                    week: g.week,
                    opponent: g.opponent_of(team)?.to_string(),
                    venue: g.venue_for(team)?,
                })
            })
            .collect()
    }

    /// Fixtures of every team, keyed by name. Teams without games map to
    /// an empty list.
    pub fn by_team(&self) -> BTreeMap<String, Vec<TeamFixture>> {
        let mut view: BTreeMap<String, Vec<TeamFixture>> = self
            .schedule
            .records()
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        for g in self.schedule.games() {
            for (team, opponent, venue) in [
                (&g.home, &g.away, Venue::Home),
                (&g.away, &g.home, Venue::Away),
            ] {
                view.entry(team.clone()).or_default().push(TeamFixture {
                    week: g.week,
                    opponent: opponent.clone(),
                    venue,
                });
            }
        }
        view
    }

    /// Games of every week in `[0, season_length)`.
    pub fn by_week(&self) -> BTreeMap<usize, Vec<&'a ScheduledGame>> {
        let mut view: BTreeMap<usize, Vec<&'a ScheduledGame>> = (0..self.schedule.season_length())
            .map(|w| (w, Vec::new()))
            .collect();
        for g in self.schedule.games() {
            view.entry(g.week).or_default().push(g);
        }
        view
    }

    /// Games of one week in request order. Empty outside the season.
    pub fn games_in_week(&self, week: usize) -> Vec<&'a ScheduledGame> {
        self.schedule.games_in_week(week)
    }

    /// Teams without a game in `week`, by name.
    pub fn idle_teams(&self, week: usize) -> Vec<&'a str> {
        let schedule = self.schedule;
        schedule
            .records()
            .keys()
            .filter(|name| !schedule.games().iter().any(|g| g.week == week && g.involves(name)))
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Display for ScheduleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (week, games) in self.by_week() {
            writeln!(f, "Week {week}")?;
            if games.is_empty() {
                writeln!(f, "  (no games)")?;
            }
            for g in games {
                writeln!(f, "  {} at {}", g.away, g.home)?;
            }
        }
        Ok(())
    }
}
