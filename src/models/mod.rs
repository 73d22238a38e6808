//! Season scheduling domain models.
//!
//! Provides the input types (teams and matchup requests) and the finalized
//! output type (schedule of oriented games).
//!
//! # Domain Mappings
//!
//! | u-season | Graph view | Front end |
//! |----------|------------|--------------------|
//! | Team | Vertex | Team named in a user's display name |
//! | MatchupRequest | Edge | One line of a team's request list |
//! | Week | Edge colour | Open week on the team's calendar |
//! | ScheduledGame | Coloured, oriented edge | Reported fixture |

mod matchup;
mod schedule;
mod team;

pub use matchup::{HomePreference, MatchupRequest, Pairing, PreferenceStrength};
pub(crate) use schedule::balance_bound;
pub use schedule::{Schedule, ScheduledGame, TeamRecord, Venue};
pub use team::Team;
