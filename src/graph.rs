//! Constraint graph construction and input validation.
//!
//! Turns teams and matchup requests into the request graph consumed by the
//! scheduler: teams are vertices, requests are edges, weeks are colours.
//! Validation runs before any search and fails fast on the first problem:
//!
//! 1. Duplicate team names
//! 2. Self matchups
//! 3. Requests naming unknown teams
//! 4. Home preferences naming a team outside the request
//! 5. Duplicate unordered pairs
//! 6. Teams over the configured request limit
//! 7. Teams with more games than playable weeks (pigeonhole)
//!
//! # Reference
//! Vizing (1964): a simple graph of maximum degree Δ needs Δ or Δ + 1 colours,
//! so `season_length >= Δ` is necessary but not sufficient.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::models::{HomePreference, MatchupRequest, Pairing, Team};

/// Position of a team in the graph (input order).
pub type TeamIndex = usize;

/// A vertex: one team with its degree and weekly availability.
#[derive(Debug, Clone)]
pub struct TeamNode {
    /// Team name.
    pub name: String,
    /// Number of requested games.
    pub degree: usize,
    /// Home minus away carried in from fixed games.
    pub home_balance: i64,
    available: Vec<bool>,
}

impl TeamNode {
    /// Whether the team can play in `week`.
    #[inline]
    pub fn is_available(&self, week: usize) -> bool {
        self.available.get(week).copied().unwrap_or(false)
    }

    /// Number of playable weeks.
    pub fn available_weeks(&self) -> usize {
        self.available.iter().filter(|&&a| a).count()
    }
}

/// An edge: one requested matchup.
#[derive(Debug, Clone)]
pub struct GameEdge {
    /// First listed team.
    pub first: TeamIndex,
    /// Second listed team.
    pub second: TeamIndex,
    /// Position of the request in the input.
    pub request_index: usize,
    /// Preference as requested.
    pub preference: Option<HomePreference>,
    /// Resolved index of the preferred host.
    pub preferred_home: Option<TeamIndex>,
    /// Whether the preferred host is binding.
    pub forced: bool,
}

impl GameEdge {
    /// Both endpoints.
    #[inline]
    pub fn endpoints(&self) -> [TeamIndex; 2] {
        [self.first, self.second]
    }

    /// Endpoint opposite `team`.
    #[inline]
    pub fn other(&self, team: TeamIndex) -> TeamIndex {
        if team == self.first {
            self.second
        } else {
            self.first
        }
    }

    /// Whether `team` is an endpoint.
    #[inline]
    pub fn touches(&self, team: TeamIndex) -> bool {
        self.first == team || self.second == team
    }
}

/// Validated request graph for one scheduling run.
///
/// Read-only once built. All indices are stable for the run.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    season_length: usize,
    teams: Vec<TeamNode>,
    index: HashMap<String, TeamIndex>,
    games: Vec<GameEdge>,
    incident: Vec<Vec<usize>>,
}

impl ConstraintGraph {
    /// Validates input and builds the graph.
    ///
    /// # Errors
    /// Returns the first problem found, in the order listed in the module
    /// documentation.
    pub fn build(
        teams: &[Team],
        requests: &[MatchupRequest],
        season_length: usize,
        config: &SchedulerConfig,
    ) -> Result<Self, ScheduleError> {
        // Vertices
        let mut index = HashMap::with_capacity(teams.len());
        let mut nodes = Vec::with_capacity(teams.len());
        for team in teams {
            if index.insert(team.name.clone(), nodes.len()).is_some() {
                return Err(ScheduleError::DuplicateTeam {
                    team: team.name.clone(),
                });
            }
            nodes.push(TeamNode {
                name: team.name.clone(),
                degree: 0,
                home_balance: team.home_balance,
                available: (0..season_length)
                    .map(|w| team.is_available(w, season_length))
                    .collect(),
            });
        }

        // Edges
        let mut seen: HashSet<Pairing> = HashSet::with_capacity(requests.len());
        let mut games = Vec::with_capacity(requests.len());
        for (request_index, request) in requests.iter().enumerate() {
            if request.is_self_matchup() {
                return Err(ScheduleError::SelfMatchup {
                    team: request.team.clone(),
                });
            }
            let first = lookup(&index, &request.team, request)?;
            let second = lookup(&index, &request.opponent, request)?;

            let preferred_home = match &request.home {
                None => None,
                Some(pref) if pref.team == request.team => Some(first),
                Some(pref) if pref.team == request.opponent => Some(second),
                Some(pref) => {
                    return Err(ScheduleError::InvalidPreference {
                        team: pref.team.clone(),
                        request: request.to_string(),
                    })
                }
            };

            let pairing = request.pairing();
            if seen.contains(&pairing) {
                return Err(ScheduleError::DuplicateRequest { pairing });
            }
            seen.insert(pairing);

            games.push(GameEdge {
                first,
                second,
                request_index,
                preference: request.home.clone(),
                preferred_home,
                forced: request.home.as_ref().is_some_and(HomePreference::is_forced),
            });
        }

        let mut incident = vec![Vec::new(); nodes.len()];
        for (g, game) in games.iter().enumerate() {
            for t in game.endpoints() {
                nodes[t].degree += 1;
                incident[t].push(g);
            }
        }

        if let Some(limit) = config.max_requests_per_team {
            if let Some(node) = nodes.iter().find(|n| n.degree > limit) {
                return Err(ScheduleError::TooManyRequests {
                    team: node.name.clone(),
                    games: node.degree,
                    limit,
                });
            }
        }

        // Pigeonhole: report the team with the largest shortfall
        let mut worst: Option<(&TeamNode, usize)> = None;
        for node in &nodes {
            let available = node.available_weeks();
            if node.degree > available {
                let shortfall = node.degree - available;
                if worst.map_or(true, |(w, a)| shortfall > w.degree - a) {
                    worst = Some((node, available));
                }
            }
        }
        if let Some((node, available_weeks)) = worst {
            return Err(ScheduleError::InfeasibleSeasonLength {
                team: node.name.clone(),
                games: node.degree,
                available_weeks,
            });
        }

        let graph = Self {
            season_length,
            teams: nodes,
            index,
            games,
            incident,
        };
        debug!(
            teams = graph.team_count(),
            games = graph.game_count(),
            weeks = season_length,
            max_degree = graph.max_degree(),
            "constraint graph built"
        );
        Ok(graph)
    }

    /// Number of weeks.
    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// Number of teams.
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Number of requested games.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// All teams in input order.
    pub fn teams(&self) -> &[TeamNode] {
        &self.teams
    }

    /// All games in request order.
    pub fn games(&self) -> &[GameEdge] {
        &self.games
    }

    /// Team at `index`.
    pub fn team(&self, index: TeamIndex) -> &TeamNode {
        &self.teams[index]
    }

    /// Game at `index`.
    pub fn game(&self, index: usize) -> &GameEdge {
        &self.games[index]
    }

    /// Index of a team by name.
    pub fn team_index(&self, name: &str) -> Option<TeamIndex> {
        self.index.get(name).copied()
    }

    /// Games touching `team`, in request order.
    pub fn incident(&self, team: TeamIndex) -> &[usize] {
        &self.incident[team]
    }

    /// Degree of the busiest team (0 for no games).
    pub fn max_degree(&self) -> usize {
        self.teams.iter().map(|t| t.degree).max().unwrap_or(0)
    }

    /// Canonical pairing of a game.
    pub fn pairing(&self, game: usize) -> Pairing {
        let g = &self.games[game];
        Pairing::new(&self.teams[g.first].name, &self.teams[g.second].name)
    }

    /// Per-team degree keyed by name.
    pub fn degrees(&self) -> HashMap<&str, usize> {
        self.teams
            .iter()
            .map(|t| (t.name.as_str(), t.degree))
            .collect()
    }
}

fn lookup(
    index: &HashMap<String, TeamIndex>,
    name: &str,
    request: &MatchupRequest,
) -> Result<TeamIndex, ScheduleError> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| ScheduleError::UnknownTeam {
            team: name.to_string(),
            request: request.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleErrorKind;

    fn teams(names: &[&str]) -> Vec<Team> {
        names.iter().map(|&n| Team::new(n)).collect()
    }

    fn build(
        teams: &[Team],
        requests: &[MatchupRequest],
        weeks: usize,
    ) -> Result<ConstraintGraph, ScheduleError> {
        ConstraintGraph::build(teams, requests, weeks, &SchedulerConfig::default())
    }

    #[test]
    fn test_valid_graph() {
        let t = teams(&["A", "B", "C", "D"]);
        let r = vec![
            MatchupRequest::new("A", "B"),
            MatchupRequest::new("C", "D"),
            MatchupRequest::new("A", "C").prefer_home("C"),
        ];
        let g = build(&t, &r, 2).unwrap();
        assert_eq!(g.team_count(), 4);
        assert_eq!(g.game_count(), 3);
        assert_eq!(g.max_degree(), 2);
        assert_eq!(g.degrees()["A"], 2);
        assert_eq!(g.degrees()["D"], 1);
        assert_eq!(g.incident(0), &[0, 2]);
        assert_eq!(g.game(2).preferred_home, Some(2));
        assert!(!g.game(2).forced);
        assert_eq!(g.pairing(2), Pairing::new("C", "A"));
        assert_eq!(g.team_index("C"), Some(2));
        assert_eq!(g.game(2).other(0), 2);
    }

    #[test]
    fn test_unknown_team() {
        let t = teams(&["A", "B", "C"]);
        let r = vec![MatchupRequest::new("A", "B"), MatchupRequest::new("C", "Z")];
        let err = build(&t, &r, 4).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnknownTeam {
                team: "Z".into(),
                request: "C vs Z".into()
            }
        );
    }

    #[test]
    fn test_duplicate_reversed_pair() {
        let t = teams(&["A", "B"]);
        let r = vec![MatchupRequest::new("A", "B"), MatchupRequest::new("B", "A")];
        let err = build(&t, &r, 4).unwrap_err();
        assert_eq!(err.kind(), ScheduleErrorKind::DuplicateRequest);
    }

    #[test]
    fn test_duplicate_same_pair() {
        let t = teams(&["A", "B"]);
        let r = vec![MatchupRequest::new("A", "B"), MatchupRequest::new("A", "B")];
        let err = build(&t, &r, 4).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::DuplicateRequest {
                pairing: Pairing::new("A", "B")
            }
        );
    }

    #[test]
    fn test_triangle_in_one_week() {
        let t = teams(&["A", "B", "C"]);
        let r = vec![
            MatchupRequest::new("A", "B"),
            MatchupRequest::new("B", "C"),
            MatchupRequest::new("A", "C"),
        ];
        let err = build(&t, &r, 1).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InfeasibleSeasonLength {
                team: "A".into(),
                games: 2,
                available_weeks: 1
            }
        );
    }

    #[test]
    fn test_blocked_weeks_count_against_capacity() {
        let t = vec![
            Team::new("A").with_blocked_week(0),
            Team::new("B"),
            Team::new("C"),
        ];
        let r = vec![MatchupRequest::new("A", "B"), MatchupRequest::new("A", "C")];
        let err = build(&t, &r, 2).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InfeasibleSeasonLength {
                team: "A".into(),
                games: 2,
                available_weeks: 1
            }
        );
        // Blocks outside the season are ignored
        let t = vec![Team::new("A").with_blocked_week(9), Team::new("B"), Team::new("C")];
        assert!(build(&t, &r, 2).is_ok());
    }

    #[test]
    fn test_worst_shortfall_reported() {
        let t = vec![
            Team::new("A"),
            Team::new("B").with_blocked_range(0..2),
            Team::new("C"),
        ];
        let r = vec![MatchupRequest::new("A", "B"), MatchupRequest::new("A", "C")];
        let err = build(&t, &r, 2).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InfeasibleSeasonLength {
                team: "B".into(),
                games: 1,
                available_weeks: 0
            }
        );
    }

    #[test]
    fn test_duplicate_team() {
        let t = teams(&["A", "B", "A"]);
        let err = build(&t, &[], 1).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateTeam { team: "A".into() });
    }

    #[test]
    fn test_self_matchup() {
        let t = teams(&["A", "B"]);
        let err = build(&t, &[MatchupRequest::new("B", "B")], 1).unwrap_err();
        assert_eq!(err.kind(), ScheduleErrorKind::SelfMatchup);
    }

    #[test]
    fn test_invalid_preference() {
        let t = teams(&["A", "B", "C"]);
        let r = vec![MatchupRequest::new("A", "B").force_home("C")];
        let err = build(&t, &r, 1).unwrap_err();
        assert_eq!(err.kind(), ScheduleErrorKind::InvalidPreference);
    }

    #[test]
    fn test_request_limit() {
        let t = teams(&["A", "B", "C", "D"]);
        let r = vec![
            MatchupRequest::new("A", "B"),
            MatchupRequest::new("A", "C"),
            MatchupRequest::new("A", "D"),
        ];
        let config = SchedulerConfig::default().with_max_requests_per_team(2);
        let err = ConstraintGraph::build(&t, &r, 5, &config).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::TooManyRequests {
                team: "A".into(),
                games: 3,
                limit: 2
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let g = build(&[], &[], 0).unwrap();
        assert_eq!(g.team_count(), 0);
        assert_eq!(g.game_count(), 0);
        assert_eq!(g.max_degree(), 0);
    }

    #[test]
    fn test_forced_preference_resolved() {
        let t = teams(&["A", "B"]);
        let r = vec![MatchupRequest::new("A", "B").force_home("B")];
        let g = build(&t, &r, 1).unwrap();
        assert_eq!(g.game(0).preferred_home, Some(1));
        assert!(g.game(0).forced);
        assert!(g.team(0).is_available(0));
        assert!(!g.team(0).is_available(1));
    }

    #[test]
    fn test_home_balance_carried() {
        let t = vec![Team::new("A").with_home_balance(-2), Team::new("B")];
        let g = build(&t, &[MatchupRequest::new("A", "B")], 1).unwrap();
        assert_eq!(g.team(0).home_balance, -2);
        assert_eq!(g.team(1).home_balance, 0);
    }
}
