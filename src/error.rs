//! Error types for season scheduling.
//!
//! Every failure is detected by one pipeline stage and returned unmodified
//! to the caller. No stage degrades to a partial schedule.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::models::Pairing;

/// A scheduling failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A scheduler limit is unusable.
    #[error("invalid scheduler configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The team set lists the same name twice.
    #[error("team '{team}' is listed more than once")]
    DuplicateTeam { team: String },

    /// A request pairs a team with itself.
    #[error("team '{team}' cannot be matched against itself")]
    SelfMatchup { team: String },

    /// A request references a team outside the team set.
    #[error("request '{request}' references unknown team '{team}'")]
    UnknownTeam { team: String, request: String },

    /// A request names a host that is not one of its two teams.
    #[error("request '{request}' prefers '{team}' at home, but '{team}' is not playing")]
    InvalidPreference { team: String, request: String },

    /// The same unordered pair was requested more than once.
    #[error("matchup {pairing} was requested more than once")]
    DuplicateRequest { pairing: Pairing },

    /// A team asked for more games than the configured limit.
    #[error("team '{team}' requested {games} games, the limit is {limit}")]
    TooManyRequests {
        team: String,
        games: usize,
        limit: usize,
    },

    /// A team has more games than weeks it can play in.
    #[error("team '{team}' needs {games} weeks but only {available_weeks} are available")]
    InfeasibleSeasonLength {
        team: String,
        games: usize,
        available_weeks: usize,
    },

    /// Backtracking could not place every matchup.
    #[error("no valid week assignment: {0}")]
    UnsatisfiableSchedule(ConflictReport),
}

/// Fieldless classification of [`ScheduleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleErrorKind {
    InvalidConfig,
    DuplicateTeam,
    SelfMatchup,
    UnknownTeam,
    InvalidPreference,
    DuplicateRequest,
    TooManyRequests,
    InfeasibleSeasonLength,
    UnsatisfiableSchedule,
}

impl ScheduleError {
    /// Classification for matching without destructuring.
    pub fn kind(&self) -> ScheduleErrorKind {
        match self {
            ScheduleError::InvalidConfig { .. } => ScheduleErrorKind::InvalidConfig,
            ScheduleError::DuplicateTeam { .. } => ScheduleErrorKind::DuplicateTeam,
            ScheduleError::SelfMatchup { .. } => ScheduleErrorKind::SelfMatchup,
            ScheduleError::UnknownTeam { .. } => ScheduleErrorKind::UnknownTeam,
            ScheduleError::InvalidPreference { .. } => ScheduleErrorKind::InvalidPreference,
            ScheduleError::DuplicateRequest { .. } => ScheduleErrorKind::DuplicateRequest,
            ScheduleError::TooManyRequests { .. } => ScheduleErrorKind::TooManyRequests,
            ScheduleError::InfeasibleSeasonLength { .. } => {
                ScheduleErrorKind::InfeasibleSeasonLength
            }
            ScheduleError::UnsatisfiableSchedule(_) => ScheduleErrorKind::UnsatisfiableSchedule,
        }
    }

    /// Whether the failure comes from malformed input rather than from the
    /// season being too tight.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            ScheduleError::InfeasibleSeasonLength { .. } | ScheduleError::UnsatisfiableSchedule(_)
        )
    }
}

/// Why a week could not host a matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BlockReason {
    /// The team already plays `opponent` that week.
    Playing { opponent: String },
    /// The week is blocked on the team's calendar.
    Unavailable,
    /// Using the week would leave `pairing` without any common free week.
    StarvesMatchup { pairing: Pairing },
    /// The week fits but was already tried; every continuation from it
    /// failed. Recorded against the first team of the matchup.
    Exhausted,
}

/// One obstacle in one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBlock {
    /// Week index.
    pub week: usize,
    /// Team the obstacle belongs to.
    pub team: String,
    /// What occupies the week.
    pub reason: BlockReason,
}

/// Diagnostic for an unsatisfiable season.
///
/// Describes the last matchup the search failed to place and what blocked
/// each week for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    /// Matchup that could not be placed.
    pub pairing: Pairing,
    /// Obstacles per week, ordered by week.
    pub blocks: Vec<WeekBlock>,
    /// Backtrack steps spent.
    pub backtracks: usize,
    /// `true` if every alternative was tried (the season is provably
    /// uncolourable); `false` if the backtrack cap stopped the search.
    pub exhaustive: bool,
}

impl ConflictReport {
    /// Weeks in which `team` blocked the matchup.
    pub fn weeks_blocked_by(&self, team: &str) -> Vec<usize> {
        let mut weeks: Vec<usize> = self
            .blocks
            .iter()
            .filter(|b| b.team == team)
            .map(|b| b.week)
            .collect();
        weeks.dedup();
        weeks
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot place {}", self.pairing)?;
        for block in &self.blocks {
            match &block.reason {
                BlockReason::Playing { opponent } => write!(
                    f,
                    "; week {}: {} plays {}",
                    block.week, block.team, opponent
                )?,
                BlockReason::Unavailable => {
                    write!(f, "; week {}: {} unavailable", block.week, block.team)?
                }
                BlockReason::StarvesMatchup { pairing } => write!(
                    f,
                    "; week {}: {} would leave {} without a week",
                    block.week, block.team, pairing
                )?,
                BlockReason::Exhausted => {
                    write!(f, "; week {}: tried, no completion", block.week)?
                }
            }
        }
        if self.exhaustive {
            write!(f, " (search exhausted after {} backtracks)", self.backtracks)
        } else {
            write!(f, " (backtrack limit {} reached)", self.backtracks)
        }
    }
}
