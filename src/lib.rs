//! Season scheduling for the U-Engine ecosystem.
//!
//! Builds a season from requested out-of-conference matchups: every request
//! is placed in exactly one week, no team plays twice in a week, and hosts
//! are chosen so each team's home and away counts differ by at most one.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Team`, `MatchupRequest`, `Schedule`,
//!   `ScheduledGame`, `TeamRecord`)
//! - **`graph`**: Input validation and the request graph (degrees, availability)
//! - **`scheduler`**: Week assignment, home/away balancing, pipeline facade, KPIs
//! - **`report`**: Per-team and per-week views of a schedule
//! - **`config`**: Search and optimizer limits
//! - **`error`**: Failure taxonomy with diagnostics
//!
//! # Example
//!
//! ```
//! use u_season::report::ScheduleReport;
//! use u_season::scheduler::{SeasonRequest, SeasonScheduler};
//!
//! let request = SeasonRequest::new(2)
//!     .with_teams(["A", "B", "C", "D"])
//!     .with_matchup("A", "B")
//!     .with_matchup("C", "D")
//!     .with_matchup("A", "C")
//!     .with_matchup("B", "D");
//!
//! let schedule = SeasonScheduler::new().schedule(&request)?;
//! let report = ScheduleReport::new(&schedule);
//! assert_eq!(report.fixtures_for("A").len(), 2);
//! # Ok::<(), u_season::ScheduleError>(())
//! ```
//!
//! # References
//!
//! - Vizing (1964), "On an estimate of the chromatic class of a p-graph"
//! - de Werra (1981), "Scheduling in sports"
//! - Kendall et al. (2010), "Scheduling in sports: An annotated bibliography"

pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod report;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use error::{ConflictReport, ScheduleError, ScheduleErrorKind};
