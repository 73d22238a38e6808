//! Home/away orientation by local search.
//!
//! # Algorithm
//!
//! 1. Orient every game: forced host, else preferred host, else the first
//!    listed team. Each team's surplus starts from its carried
//!    `home_balance`, so fixed games outside the requests are offset too.
//! 2. Take the first team (by name) whose season `|home - away| >= 2`.
//! 3. Breadth-first search from it along games it hosts (or visits, when it
//!    has an away surplus) for a team with the opposite surplus. Flip every
//!    game on the path found. Intermediate teams keep their balance; the
//!    start team moves 2 toward zero and the end team ends at most 1 away.
//!    A path of one game is the plain single flip.
//! 4. Repeat until no team can be improved or the flip cap is spent. The
//!    cap counts single game flips, so a path of length 3 costs 3.
//!
//! Each path lowers Σ(home − away)² by at least 4, so the loop terminates.
//! Without forced preferences or carried balances a path always exists
//! from an unbalanced team, giving the best possible result: imbalance 0
//! for an even number of games and 1 for an odd number. Carried balances
//! can put a team out of reach of that bound (a +4 team with one game ends
//! at +3 at best); such teams are reported against
//! [`TeamRecord::best_imbalance`](crate::models::TeamRecord::best_imbalance).
//!
//! # Determinism
//! Teams are visited in name order; each team's games are explored with
//! unpreferred games first, then by week and request order.
//!
//! # Reference
//! Hakimi (1965), "On the degrees of the vertices of a directed graph";
//! balanced orientations via alternating paths.

use std::collections::VecDeque;
use tracing::{debug, warn};

use super::WeekAssignment;
use crate::config::SchedulerConfig;
use crate::graph::{ConstraintGraph, TeamIndex};
use crate::models::{balance_bound, Schedule, ScheduledGame};

/// Chooses the host of every week-assigned game.
#[derive(Debug, Clone)]
pub struct BalanceOptimizer {
    max_iterations: usize,
}

/// Orientation state for one run.
struct Orientation<'g> {
    graph: &'g ConstraintGraph,
    home_of: Vec<TeamIndex>,
    /// home − away per team
    surplus: Vec<i64>,
}

impl<'g> Orientation<'g> {
    fn initial(graph: &'g ConstraintGraph) -> Self {
        let mut surplus: Vec<i64> = graph.teams().iter().map(|t| t.home_balance).collect();
        let home_of: Vec<TeamIndex> = graph
            .games()
            .iter()
            .map(|g| {
                let home = g.preferred_home.unwrap_or(g.first);
                surplus[home] += 1;
                surplus[g.other(home)] -= 1;
                home
            })
            .collect();
        Self {
            graph,
            home_of,
            surplus,
        }
    }

    fn flip(&mut self, game: usize) {
        let home = self.home_of[game];
        let away = self.graph.game(game).other(home);
        self.home_of[game] = away;
        self.surplus[home] -= 2;
        self.surplus[away] += 2;
    }

    /// Shortest chain of flippable games from `start` to a team with the
    /// opposite surplus, following games in which the current team holds
    /// the same side as `start`'s surplus.
    fn improving_path(&self, start: TeamIndex, adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
        let sign = self.surplus[start].signum();
        let mut reached_by: Vec<Option<usize>> = vec![None; self.graph.team_count()];
        let mut visited = vec![false; self.graph.team_count()];
        visited[start] = true;

        let mut queue = VecDeque::from([start]);
        while let Some(team) = queue.pop_front() {
            for &game in &adjacency[team] {
                let hosts = self.home_of[game] == team;
                // Surplus home: leave through hosted games; surplus away: through visits
                if hosts != (sign > 0) {
                    continue;
                }
                let next = self.graph.game(game).other(team);
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                reached_by[next] = Some(game);

                if self.surplus[next] * sign <= -1 {
                    return Some(self.trace_back(start, next, &reached_by));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn trace_back(
        &self,
        start: TeamIndex,
        end: TeamIndex,
        reached_by: &[Option<usize>],
    ) -> Vec<usize> {
        let mut path = Vec::new();
        let mut team = end;
        while team != start {
            let Some(game) = reached_by[team] else {
                break;
            };
            path.push(game);
            team = self.graph.game(game).other(team);
        }
        path.reverse();
        path
    }
}

impl BalanceOptimizer {
    /// Creates an optimizer with the default flip cap.
    pub fn new() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }

    /// Takes the flip cap from a config.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            max_iterations: config.max_balance_iterations,
        }
    }

    /// Sets the flip cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Orients every game and returns the finalized schedule.
    ///
    /// Never fails: if the cap is reached (or forced hosts make the bound
    /// unreachable) the best orientation found is returned.
    pub fn orient(&self, graph: &ConstraintGraph, weeks: &WeekAssignment) -> Schedule {
        let mut state = Orientation::initial(graph);
        let adjacency = Self::adjacency(graph, weeks);

        let mut by_name: Vec<TeamIndex> = (0..graph.team_count()).collect();
        by_name.sort_by(|&a, &b| graph.team(a).name.cmp(&graph.team(b).name));

        let mut flips = 0;
        'search: loop {
            for &team in &by_name {
                if state.surplus[team].abs() < 2 {
                    continue;
                }
                let Some(path) = state.improving_path(team, &adjacency) else {
                    continue;
                };
                if flips + path.len() > self.max_iterations {
                    break 'search;
                }
                for &game in &path {
                    state.flip(game);
                }
                flips += path.len();
                continue 'search;
            }
            break;
        }

        let unbalanced = by_name
            .iter()
            .filter(|&&t| {
                let node = graph.team(t);
                state.surplus[t].unsigned_abs() as usize
                    != balance_bound(node.home_balance, node.degree)
            })
            .count();
        if unbalanced > 0 {
            warn!(
                unbalanced,
                flips,
                cap = self.max_iterations,
                "balance bound not reached"
            );
        } else {
            debug!(flips, "orientation balanced");
        }

        let overridden = graph
            .games()
            .iter()
            .enumerate()
            .filter(|(i, g)| g.preferred_home.is_some_and(|p| p != state.home_of[*i]))
            .count();
        if overridden > 0 {
            warn!(overridden, "soft home preferences overridden for balance");
        }

        let games = graph
            .games()
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let home = state.home_of[i];
                ScheduledGame {
                    week: weeks.week_of(i),
                    home: graph.team(home).name.clone(),
                    away: graph.team(g.other(home)).name.clone(),
                    request_index: g.request_index,
                    preference: g.preference.clone(),
                }
            })
            .collect();

        Schedule::from_games(
            graph.season_length(),
            graph.teams().iter().map(|t| t.name.as_str()),
            games,
        )
        .with_prior_balances(graph.teams().iter().map(|t| (t.name.as_str(), t.home_balance)))
    }

    /// Flippable games per team: unpreferred before soft-preferred, then by
    /// week and request order. Forced games are left out.
    fn adjacency(graph: &ConstraintGraph, weeks: &WeekAssignment) -> Vec<Vec<usize>> {
        (0..graph.team_count())
            .map(|team| {
                let mut games: Vec<usize> = graph
                    .incident(team)
                    .iter()
                    .copied()
                    .filter(|&g| !graph.game(g).forced)
                    .collect();
                games.sort_by_key(|&g| (graph.game(g).preference.is_some(), weeks.week_of(g), g));
                games
            })
            .collect()
    }
}

impl Default for BalanceOptimizer {
    fn default() -> Self {
        Self::new()
    }
}
