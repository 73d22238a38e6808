//! End-to-end season scheduling.
//!
//! # Algorithm
//!
//! 1. Validate input and build the constraint graph.
//! 2. Assign weeks (greedy edge colouring with bounded backtracking).
//! 3. Orient games for home/away balance.
//!
//! Every run owns its graph, search state, and counters; nothing is shared
//! between calls, so independent runs may execute on separate threads.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{BalanceOptimizer, WeekAssigner};
use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::graph::ConstraintGraph;
use crate::models::{MatchupRequest, Schedule, Team};

/// Input container for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRequest {
    /// Participating teams, unique by name.
    pub teams: Vec<Team>,
    /// Requested matchups.
    pub requests: Vec<MatchupRequest>,
    /// Number of weeks available.
    pub season_length: usize,
}

impl SeasonRequest {
    /// Creates an empty request for a season of `season_length` weeks.
    pub fn new(season_length: usize) -> Self {
        Self {
            season_length,
            ..Default::default()
        }
    }

    /// Adds a team.
    pub fn with_team(mut self, team: impl Into<Team>) -> Self {
        self.teams.push(team.into());
        self
    }

    /// Adds several teams available every week.
    pub fn with_teams<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams.extend(names.into_iter().map(Team::new));
        self
    }

    /// Adds a matchup request.
    pub fn with_request(mut self, request: MatchupRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Adds a request for `team` to play `opponent`.
    pub fn with_matchup(self, team: &str, opponent: &str) -> Self {
        self.with_request(MatchupRequest::new(team, opponent))
    }
}

/// Runs the full scheduling pipeline.
///
/// # Example
///
/// ```
/// use u_season::scheduler::{SeasonRequest, SeasonScheduler};
///
/// let request = SeasonRequest::new(2)
///     .with_teams(["A", "B", "C", "D"])
///     .with_matchup("A", "B")
///     .with_matchup("C", "D")
///     .with_matchup("A", "C")
///     .with_matchup("B", "D");
///
/// let schedule = SeasonScheduler::new().schedule(&request).unwrap();
/// assert_eq!(schedule.game_count(), 4);
/// assert_eq!(schedule.max_imbalance(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeasonScheduler {
    config: SchedulerConfig,
}

impl SeasonScheduler {
    /// Creates a scheduler with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules a season.
    ///
    /// # Errors
    /// Any [`ScheduleError`] raised by validation or week assignment,
    /// unchanged.
    pub fn schedule(&self, request: &SeasonRequest) -> Result<Schedule, ScheduleError> {
        self.schedule_parts(&request.teams, &request.requests, request.season_length)
    }

    /// Schedules a season from its parts.
    pub fn schedule_parts(
        &self,
        teams: &[Team],
        requests: &[MatchupRequest],
        season_length: usize,
    ) -> Result<Schedule, ScheduleError> {
        self.config.validate()?;
        let graph = ConstraintGraph::build(teams, requests, season_length, &self.config)?;
        let weeks = WeekAssigner::from_config(&self.config).assign(&graph)?;
        let schedule = BalanceOptimizer::from_config(&self.config).orient(&graph, &weeks);

        info!(
            games = schedule.game_count(),
            weeks = season_length,
            backtracks = weeks.backtracks(),
            max_imbalance = schedule.max_imbalance(),
            "season scheduled"
        );
        Ok(schedule)
    }
}
