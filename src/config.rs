//! Scheduler configuration.
//!
//! All limits are per run. Defaults are sized so that realistic seasons
//! (dozens of teams, a handful of requests each) finish well within them.

use serde::{Deserialize, Serialize};

use crate::ScheduleError;

/// Default cap on backtrack steps in the week assignment search.
pub const DEFAULT_MAX_BACKTRACKS: usize = 100_000;

/// Default cap on single game flips in the balance optimizer.
pub const DEFAULT_MAX_BALANCE_ITERATIONS: usize = 10_000;

/// Tunable limits for a scheduling run.
///
/// # Example
/// ```
/// use u_season::SchedulerConfig;
///
/// let config = SchedulerConfig::default()
///     .with_max_backtracks(500)
///     .with_max_requests_per_team(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Backtrack steps allowed before the search gives up.
    pub max_backtracks: usize,
    /// Reject weeks that leave a neighbouring matchup with no common week.
    pub forward_check: bool,
    /// Single game flips allowed before the optimizer stops. An alternating
    /// path of `k` games costs `k`.
    pub max_balance_iterations: usize,
    /// Upper bound on requests per team. `None` = unlimited.
    pub max_requests_per_team: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
            forward_check: true,
            max_balance_iterations: DEFAULT_MAX_BALANCE_ITERATIONS,
            max_requests_per_team: None,
        }
    }
}

impl SchedulerConfig {
    /// Sets the backtrack cap.
    pub fn with_max_backtracks(mut self, max_backtracks: usize) -> Self {
        self.max_backtracks = max_backtracks;
        self
    }

    /// Enables or disables forward checking.
    pub fn with_forward_check(mut self, enabled: bool) -> Self {
        self.forward_check = enabled;
        self
    }

    /// Sets the optimizer flip cap.
    pub fn with_max_balance_iterations(mut self, iterations: usize) -> Self {
        self.max_balance_iterations = iterations;
        self
    }

    /// Limits how many games a single team may request.
    pub fn with_max_requests_per_team(mut self, limit: usize) -> Self {
        self.max_requests_per_team = Some(limit);
        self
    }

    /// Checks that the limits are usable.
    ///
    /// A zero backtrack cap is allowed (pure greedy assignment); a zero
    /// flip cap or request limit is not.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.max_balance_iterations == 0 {
            return Err(ScheduleError::InvalidConfig {
                reason: "max_balance_iterations must be positive".into(),
            });
        }
        if self.max_requests_per_team == Some(0) {
            return Err(ScheduleError::InvalidConfig {
                reason: "max_requests_per_team must be positive when set".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SchedulerConfig::default();
        assert_eq!(c.max_backtracks, DEFAULT_MAX_BACKTRACKS);
        assert_eq!(c.max_balance_iterations, DEFAULT_MAX_BALANCE_ITERATIONS);
        assert!(c.forward_check);
        assert_eq!(c.max_requests_per_team, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = SchedulerConfig::default()
            .with_max_backtracks(0)
            .with_forward_check(false)
            .with_max_balance_iterations(5)
            .with_max_requests_per_team(4);
        assert_eq!(c.max_backtracks, 0);
        assert!(!c.forward_check);
        assert_eq!(c.max_balance_iterations, 5);
        assert_eq!(c.max_requests_per_team, Some(4));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        assert!(SchedulerConfig::default()
            .with_max_balance_iterations(0)
            .validate()
            .is_err());
        assert!(SchedulerConfig::default()
            .with_max_requests_per_team(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SchedulerConfig = serde_json::from_str(r#"{"max_backtracks": 12}"#).unwrap();
        assert_eq!(c.max_backtracks, 12);
        assert_eq!(c.max_balance_iterations, DEFAULT_MAX_BALANCE_ITERATIONS);
        assert!(c.forward_check);
    }
}
