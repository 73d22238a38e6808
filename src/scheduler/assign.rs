//! Week assignment by greedy edge colouring with bounded backtracking.
//!
//! # Algorithm
//!
//! 1. Order games by decreasing max endpoint degree, then decreasing summed
//!    degree, then request order. Busy teams have the fewest spare weeks,
//!    so their games go first.
//! 2. Give each game the lowest week in which both teams are available and
//!    not yet playing.
//! 3. Forward check: a week is rejected if it leaves an unplaced game of
//!    either team with no common free week.
//! 4. When no week fits, pop the most recent choice point, release its week
//!    and resume that game from the following week.
//!
//! The search keeps its state explicitly (busy matrix plus a stack of
//! choice points) so the backtrack budget can be enforced exactly. It is a
//! single chronological depth-first pass that spends the whole budget in one
//! run; there are no restarts with growing budgets. When the stack empties
//! before the budget does, the search was exhaustive and the failure proves
//! that no assignment exists.
//!
//! # Complexity
//! Each placement attempt is O(W) for the week scan plus O(d · W) for the
//! forward check, where W = weeks and d = max degree. The number of attempts
//! is bounded by the backtrack cap.
//!
//! # Reference
//! Vizing (1964), "On an estimate of the chromatic class of a p-graph"

use std::cmp::Reverse;
use tracing::{debug, trace, warn};

use crate::error::{BlockReason, ConflictReport, ScheduleError, WeekBlock};
use crate::graph::{ConstraintGraph, TeamIndex};

/// Weeks chosen for every game of a graph (indexed like
/// [`ConstraintGraph::games`]). Orientation is not decided yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekAssignment {
    weeks: Vec<usize>,
    backtracks: usize,
}

impl WeekAssignment {
    /// Week of game `game`.
    pub fn week_of(&self, game: usize) -> usize {
        self.weeks[game]
    }

    /// Weeks of all games in request order.
    pub fn weeks(&self) -> &[usize] {
        &self.weeks
    }

    /// Backtrack steps the search needed.
    pub fn backtracks(&self) -> usize {
        self.backtracks
    }
}

/// A choice point: `game` currently holds `week`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    game: usize,
    week: usize,
}

/// Mutable search state for one run.
struct SearchState<'g> {
    graph: &'g ConstraintGraph,
    /// team → week → game occupying the slot
    busy: Vec<Vec<Option<usize>>>,
    week_of: Vec<Option<usize>>,
    forward_check: bool,
}

impl<'g> SearchState<'g> {
    fn new(graph: &'g ConstraintGraph, forward_check: bool) -> Self {
        Self {
            graph,
            busy: vec![vec![None; graph.season_length()]; graph.team_count()],
            week_of: vec![None; graph.game_count()],
            forward_check,
        }
    }

    #[inline]
    fn is_free(&self, team: TeamIndex, week: usize) -> bool {
        self.graph.team(team).is_available(week) && self.busy[team][week].is_none()
    }

    #[inline]
    fn fits(&self, game: usize, week: usize) -> bool {
        let g = self.graph.game(game);
        self.is_free(g.first, week) && self.is_free(g.second, week)
    }

    fn place(&mut self, game: usize, week: usize) {
        let g = self.graph.game(game);
        self.busy[g.first][week] = Some(game);
        self.busy[g.second][week] = Some(game);
        self.week_of[game] = Some(week);
    }

    fn release(&mut self, game: usize) {
        if let Some(week) = self.week_of[game].take() {
            let g = self.graph.game(game);
            self.busy[g.first][week] = None;
            self.busy[g.second][week] = None;
        }
    }

    fn has_common_week(&self, game: usize) -> bool {
        (0..self.graph.season_length()).any(|w| self.fits(game, w))
    }

    /// First unplaced game sharing a team with `game` that has no week left.
    fn starved_neighbour(&self, game: usize) -> Option<(TeamIndex, usize)> {
        for team in self.graph.game(game).endpoints() {
            for &other in self.graph.incident(team) {
                if other != game && self.week_of[other].is_none() && !self.has_common_week(other) {
                    return Some((team, other));
                }
            }
        }
        None
    }

    /// Why every week is closed to `game` in the current state. Weeks below
    /// `tried_below` that still fit were placed earlier and abandoned after
    /// every continuation failed.
    fn conflict(
        &mut self,
        game: usize,
        tried_below: usize,
        backtracks: usize,
        exhaustive: bool,
    ) -> ConflictReport {
        let graph = self.graph;
        let edge = graph.game(game);
        let mut blocks = Vec::new();

        for week in 0..graph.season_length() {
            let mut blocked = false;
            for team in edge.endpoints() {
                let reason = if !graph.team(team).is_available(week) {
                    BlockReason::Unavailable
                } else if let Some(other) = self.busy[team][week] {
                    BlockReason::Playing {
                        opponent: graph.team(graph.game(other).other(team)).name.clone(),
                    }
                } else {
                    continue;
                };
                blocked = true;
                blocks.push(WeekBlock {
                    week,
                    team: graph.team(team).name.clone(),
                    reason,
                });
            }
            if blocked {
                continue;
            }
            let starved = if self.forward_check {
                self.place(game, week);
                let starved = self.starved_neighbour(game);
                self.release(game);
                starved
            } else {
                None
            };
            if let Some((team, other)) = starved {
                blocks.push(WeekBlock {
                    week,
                    team: graph.team(team).name.clone(),
                    reason: BlockReason::StarvesMatchup {
                        pairing: graph.pairing(other),
                    },
                });
            } else if week < tried_below {
                blocks.push(WeekBlock {
                    week,
                    team: graph.team(edge.first).name.clone(),
                    reason: BlockReason::Exhausted,
                });
            }
        }

        ConflictReport {
            pairing: graph.pairing(game),
            blocks,
            backtracks,
            exhaustive,
        }
    }
}

/// Assigns every game of a constraint graph to a week.
///
/// # Example
/// ```
/// use u_season::graph::ConstraintGraph;
/// use u_season::models::{MatchupRequest, Team};
/// use u_season::scheduler::WeekAssigner;
/// use u_season::SchedulerConfig;
///
/// let teams: Vec<Team> = ["A", "B", "C", "D"].into_iter().map(Team::new).collect();
/// let requests = vec![
///     MatchupRequest::new("A", "B"),
///     MatchupRequest::new("C", "D"),
///     MatchupRequest::new("A", "C"),
///     MatchupRequest::new("B", "D"),
/// ];
/// let config = SchedulerConfig::default();
/// let graph = ConstraintGraph::build(&teams, &requests, 2, &config).unwrap();
/// let weeks = WeekAssigner::from_config(&config).assign(&graph).unwrap();
/// assert_eq!(weeks.weeks(), &[0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct WeekAssigner {
    max_backtracks: usize,
    forward_check: bool,
}

impl WeekAssigner {
    /// Creates an assigner with default limits.
    pub fn new() -> Self {
        Self::from_config(&crate::SchedulerConfig::default())
    }

    /// Takes the search limits from a config.
    pub fn from_config(config: &crate::SchedulerConfig) -> Self {
        Self {
            max_backtracks: config.max_backtracks,
            forward_check: config.forward_check,
        }
    }

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

    /// Finds a week for every game.
    ///
    /// # Errors
    /// [`ScheduleError::UnsatisfiableSchedule`] when the search is exhausted
    /// or the backtrack cap is reached. The report describes the deepest
    /// dead end the search ran into.
    pub fn assign(&self, graph: &ConstraintGraph) -> Result<WeekAssignment, ScheduleError> {
        let order = Self::order(graph);
        debug!(games = order.len(), "assigning weeks");

        let mut state = SearchState::new(graph, self.forward_check);
        let mut stack: Vec<Frame> = Vec::with_capacity(order.len());
        let mut next_week = 0;
        let mut backtracks = 0;
        let mut deepest: Option<(usize, ConflictReport)> = None;

        while stack.len() < order.len() {
            let game = order[stack.len()];
            if let Some(week) = self.next_fit(&mut state, game, next_week) {
                stack.push(Frame { game, week });
                next_week = 0;
                continue;
            }

            // Dead end: remember the deepest one for diagnostics
            if deepest.as_ref().map_or(true, |(depth, _)| stack.len() >= *depth) {
                deepest = Some((stack.len(), state.conflict(game, next_week, backtracks, false)));
            }

            let frame = match stack.pop() {
                Some(frame) if backtracks < self.max_backtracks => frame,
                popped => {
                    let exhaustive = popped.is_none();
                    let mut report = deepest
                        .map(|(_, report)| report)
                        .unwrap_or_else(|| state.conflict(game, next_week, backtracks, exhaustive));
                    report.backtracks = backtracks;
                    report.exhaustive = exhaustive;
                    warn!(
                        backtracks,
                        exhaustive,
                        matchup = %report.pairing,
                        "week assignment failed"
                    );
                    return Err(ScheduleError::UnsatisfiableSchedule(report));
                }
            };
            state.release(frame.game);
            backtracks += 1;
            next_week = frame.week + 1;
            trace!(
                backtracks,
                depth = stack.len(),
                game = frame.game,
                week = frame.week,
                "backtrack"
            );
        }

        let mut weeks = vec![0; graph.game_count()];
        for frame in &stack {
            weeks[frame.game] = frame.week;
        }
        debug!(backtracks, "weeks assigned");
        Ok(WeekAssignment { weeks, backtracks })
    }

    /// Lowest week at or after `from` that fits `game`; places it there.
    fn next_fit(&self, state: &mut SearchState<'_>, game: usize, from: usize) -> Option<usize> {
        for week in from..state.graph.season_length() {
            if !state.fits(game, week) {
                continue;
            }
            state.place(game, week);
            if !self.forward_check || state.starved_neighbour(game).is_none() {
                return Some(week);
            }
            state.release(game);
        }
        None
    }

    /// Placement order: busiest endpoints first, request order on ties.
    fn order(graph: &ConstraintGraph) -> Vec<usize> {
        let mut order: Vec<usize> = (0..graph.game_count()).collect();
        order.sort_by_key(|&g| {
            let [a, b] = graph.game(g).endpoints();
            let (da, db) = (graph.team(a).degree, graph.team(b).degree);
            (Reverse(da.max(db)), Reverse(da + db), g)
        });
        order
    }
}

impl Default for WeekAssigner {
    fn default() -> Self {
        Self::new()
    }
}
