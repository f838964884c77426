//! Timeline buckets and playback direction.

use crate::season::Season;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A `(year, season)` time bucket.
///
/// Steps order year-major, then by season in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimelineStep {
    pub year: i32,
    pub season: Season,
}

impl TimelineStep {
    pub fn new(year: i32, season: Season) -> Self {
        Self { year, season }
    }

    /// ISO date this step starts on.
    pub fn start_date(&self) -> String {
        self.season.start_date(self.year)
    }
}

impl fmt::Display for TimelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

/// Build the full ordered step sequence for a set of years.
///
/// The result is the cartesian product of the distinct years (ascending) with
/// the four seasons, flattened year-major. Duplicate years collapse.
///
/// # Examples
///
/// ```
/// use bloomscope_types::season::Season;
/// use bloomscope_types::timeline::{build_steps, TimelineStep};
///
/// let steps = build_steps([2001, 2000, 2001]);
/// assert_eq!(steps.len(), 8);
/// assert_eq!(steps[0], TimelineStep::new(2000, Season::Spring));
/// assert_eq!(steps[7], TimelineStep::new(2001, Season::Winter));
/// ```
pub fn build_steps<I>(years: I) -> Vec<TimelineStep>
where
    I: IntoIterator<Item = i32>,
{
    let years: BTreeSet<i32> = years.into_iter().collect();
    years
        .into_iter()
        .flat_map(|year| Season::ALL.into_iter().map(move |season| TimelineStep::new(year, season)))
        .collect()
}

/// Direction of a timeline step or of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}
