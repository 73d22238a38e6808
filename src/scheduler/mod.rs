//! Season scheduling engine and balance metrics.
//!
//! # Stages
//!
//! - [`WeekAssigner`]: places every requested matchup in a week so that no
//!   team plays twice in one week (edge colouring of the request graph).
//! - [`BalanceOptimizer`]: decides hosts to even out home and away games.
//! - [`SeasonScheduler`]: runs validation and both stages in sequence.
//!
//! # KPI
//!
//! [`BalanceSummary`] reports imbalance and preference statistics for a
//! finished schedule.
//!
//! # References
//!
//! - Vizing (1964), edge colouring bounds
//! - de Werra (1981), "Scheduling in sports"

mod assign;
mod balance;
mod season;
mod summary;

pub use assign::{WeekAssigner, WeekAssignment};
pub use balance::BalanceOptimizer;
pub use season::{SeasonRequest, SeasonScheduler};
pub use summary::BalanceSummary;
