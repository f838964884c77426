//! Timeline position and the playback state machine.

use crate::compute::points::DisplayPoint;
use crate::engine::filter::FilterComposer;
use crate::engine::playback::{TimerCommand, TimerId, Transition};
use crate::engine::registry::DatasetRegistry;
use bloomscope_types::record::{Record, RecordKey};
use bloomscope_types::timeline::{Direction, TimelineStep, build_steps};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state. While playing, exactly one timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing { direction: Direction, timer: TimerId },
}

impl PlaybackState {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing { direction, .. } => Some(*direction),
        }
    }
}

/// Which timeline controls are usable at the current position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    pub label: Option<String>,
    pub can_step_backward: bool,
    pub can_step_forward: bool,
    pub can_play_backward: bool,
    pub can_play_forward: bool,
    /// Direction to highlight as active, if playing.
    pub active_direction: Option<Direction>,
}

/// Records and points visible at the current step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet {
    pub records: Vec<Record>,
    pub points: Vec<DisplayPoint>,
}

#[derive(Debug, Clone)]
pub struct TimelineEngine {
    steps: Vec<TimelineStep>,
    current: usize,
    playback: PlaybackState,
    interval: Duration,
    next_timer: u64,
}

impl TimelineEngine {
    pub fn new(interval: Duration) -> Self {
        Self {
            steps: Vec::new(),
            current: 0,
            playback: PlaybackState::Idle,
            interval,
            next_timer: 0,
        }
    }

    /// Rebuild the step sequence for a new dataset.
    ///
    /// Playback stops. The position opens at `start` when it is one of the new
    /// steps, else at the first step.
    pub fn rebuild<I>(&mut self, years: I, start: Option<TimelineStep>) -> Transition
    where
        I: IntoIterator<Item = i32>,
    {
        let mut transition = self.pause();
        self.steps = build_steps(years);
        self.current = start
            .and_then(|step| self.position_of(&step))
            .unwrap_or(0);
        transition.changed = true;

        log::debug!(
            "Timeline rebuilt with {} steps, opening at {:?}",
            self.steps.len(),
            self.current_step()
        );
        transition
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<TimelineStep> {
        self.steps.get(self.current).copied()
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, PlaybackState::Playing { .. })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn position_of(&self, step: &TimelineStep) -> Option<usize> {
        self.steps.binary_search(step).ok()
    }

    fn neighbor(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => {
                let next = self.current + 1;
                (next < self.steps.len()).then_some(next)
            }
            Direction::Backward => self.current.checked_sub(1),
        }
    }

    /// Move one step. At the bound this is a no-op, except that playback in
    /// the same direction stops.
    pub fn step(&mut self, direction: Direction) -> Transition {
        match self.neighbor(direction) {
            Some(next) => {
                self.current = next;
                Transition::changed()
            }
            None if self.playback.direction() == Some(direction) => {
                log::debug!("Reached the {} bound; pausing", direction);
                self.pause()
            }
            None => Transition::unchanged(),
        }
    }

    /// Start playing, or switch direction without passing through idle.
    pub fn play(&mut self, direction: Direction) -> Transition {
        if self.steps.is_empty() {
            return Transition::unchanged();
        }
        let mut transition = match self.playback {
            PlaybackState::Playing { direction: current, .. } if current == direction => {
                return Transition::unchanged();
            }
            PlaybackState::Playing { timer, .. } => {
                Transition::changed().with_timer(TimerCommand::Cancel(timer))
            }
            PlaybackState::Idle => Transition::changed(),
        };

        self.next_timer += 1;
        let timer = TimerId::new(self.next_timer);
        self.playback = PlaybackState::Playing { direction, timer };
        transition.timers.push(TimerCommand::Arm {
            id: timer,
            period: self.interval,
        });
        log::debug!("Playing {} on {}", direction, timer);
        transition
    }

    /// Stop playback. Idempotent.
    pub fn pause(&mut self) -> Transition {
        match std::mem::replace(&mut self.playback, PlaybackState::Idle) {
            PlaybackState::Playing { timer, .. } => {
                log::debug!("Paused; cancelling {}", timer);
                Transition::changed().with_timer(TimerCommand::Cancel(timer))
            }
            PlaybackState::Idle => Transition::unchanged(),
        }
    }

    /// Handle a timer tick. Returns `None` for ticks from any timer other
    /// than the one currently armed.
    pub fn tick(&mut self, timer: TimerId) -> Option<Transition> {
        match self.playback {
            PlaybackState::Playing {
                direction,
                timer: armed,
            } if armed == timer => Some(self.step(direction)),
            _ => {
                log::trace!("Ignoring stale tick from {}", timer);
                None
            }
        }
    }

    /// Move directly to `step`. Unknown steps are ignored.
    pub fn jump_to(&mut self, step: &TimelineStep) -> Transition {
        match self.position_of(step) {
            Some(index) if index != self.current => {
                self.current = index;
                Transition::changed()
            }
            _ => Transition::unchanged(),
        }
    }

    pub fn controls(&self) -> ControlState {
        let has_steps = !self.steps.is_empty();
        let can_backward = has_steps && self.current > 0;
        let can_forward = has_steps && self.current + 1 < self.steps.len();
        ControlState {
            label: self.current_step().map(|step| step.to_string()),
            can_step_backward: can_backward,
            can_step_forward: can_forward,
            can_play_backward: can_backward,
            can_play_forward: can_forward,
            active_direction: self.playback.direction(),
        }
    }

    /// Records and points visible at the current step.
    ///
    /// Depends only on the registry contents, the filter state and the current
    /// position. The user-location marker is always included.
    pub fn recompute(&self, registry: &DatasetRegistry, filters: &FilterComposer) -> VisibleSet {
        let records: Vec<Record> = match self.current_step() {
            Some(step) => filters
                .effective_spatial_subset(registry)
                .into_iter()
                .filter(|record| filters.matches(record, &step))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let keys: FxHashSet<RecordKey> = records.iter().map(Record::key).collect();
        let mut points: Vec<DisplayPoint> = registry
            .points()
            .iter()
            .filter(|point| point.key().is_some_and(|key| keys.contains(key)))
            .cloned()
            .collect();
        points.extend(registry.user_location().cloned());

        log::trace!(
            "Recomputed {} records, {} points at {:?}",
            records.len(),
            points.len(),
            self.current_step()
        );
        VisibleSet { records, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloomscope_types::season::Season;

    const PERIOD: Duration = Duration::from_millis(500);

    fn engine(years: &[i32]) -> TimelineEngine {
        let mut engine = TimelineEngine::new(PERIOD);
        let _ = engine.rebuild(years.iter().copied(), None);
        engine
    }

    fn armed(transition: &Transition) -> TimerId {
        transition
            .timers
            .iter()
            .find_map(|cmd| match cmd {
                TimerCommand::Arm { id, .. } => Some(*id),
                TimerCommand::Cancel(_) => None,
            })
            .unwrap()
    }

    #[test]
    fn test_rebuild_opens_at_start_step() {
        let mut engine = TimelineEngine::new(PERIOD);
        let _ = engine.rebuild([1999, 2000, 2001], Some(TimelineStep::new(2000, Season::Spring)));
        assert_eq!(engine.steps().len(), 12);
        assert_eq!(engine.current_index(), 4);

        let _ = engine.rebuild([2010], Some(TimelineStep::new(2000, Season::Spring)));
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn test_step_clamps() {
        let mut engine = engine(&[2000]);
        assert!(!engine.step(Direction::Backward).changed);
        assert_eq!(engine.current_index(), 0);

        for _ in 0..3 {
            assert!(engine.step(Direction::Forward).changed);
        }
        assert!(!engine.step(Direction::Forward).changed);
        assert_eq!(engine.current_index(), 3);
    }

    #[test]
    fn test_play_same_direction_is_noop() {
        let mut engine = engine(&[2000]);
        let first = engine.play(Direction::Forward);
        assert_eq!(first.timers.len(), 1);
        let again = engine.play(Direction::Forward);
        assert!(!again.changed);
        assert!(again.timers.is_empty());
    }

    #[test]
    fn test_switch_direction_cancels_then_arms() {
        let mut engine = engine(&[2000]);
        let forward = armed(&engine.play(Direction::Forward));
        let switch = engine.play(Direction::Backward);

        assert_eq!(switch.timers[0], TimerCommand::Cancel(forward));
        let backward = armed(&switch);
        assert_ne!(forward, backward);
        assert_eq!(engine.playback().direction(), Some(Direction::Backward));

        assert!(engine.tick(forward).is_none());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut engine = engine(&[2000]);
        let timer = armed(&engine.play(Direction::Forward));
        let paused = engine.pause();
        assert_eq!(paused.timers.as_slice(), &[TimerCommand::Cancel(timer)]);
        assert!(!engine.pause().changed);
        assert!(engine.tick(timer).is_none());
    }

    #[test]
    fn test_auto_pause_at_bounds() {
        let mut engine = engine(&[2000]);
        let timer = armed(&engine.play(Direction::Forward));
        for expected in 1..=3 {
            let _ = engine.tick(timer).unwrap();
            assert_eq!(engine.current_index(), expected);
        }
        let last = engine.tick(timer).unwrap();
        assert_eq!(last.timers.as_slice(), &[TimerCommand::Cancel(timer)]);
        assert_eq!(engine.playback(), PlaybackState::Idle);
        assert_eq!(engine.current_index(), 3);
    }

    #[test]
    fn test_manual_step_at_bound_pauses_matching_playback() {
        let mut engine = engine(&[2000]);
        let _ = engine.play(Direction::Backward);
        let _ = engine.step(Direction::Backward);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_play_on_empty_timeline() {
        let mut engine = TimelineEngine::new(PERIOD);
        assert!(!engine.play(Direction::Forward).changed);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_rebuild_cancels_playback() {
        let mut engine = engine(&[2000]);
        let timer = armed(&engine.play(Direction::Forward));
        let rebuilt = engine.rebuild([2001], None);
        assert_eq!(rebuilt.timers.as_slice(), &[TimerCommand::Cancel(timer)]);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_jump_to() {
        let mut engine = engine(&[2000, 2001]);
        assert!(engine.jump_to(&TimelineStep::new(2001, Season::Fall)).changed);
        assert_eq!(engine.current_index(), 6);
        assert!(!engine.jump_to(&TimelineStep::new(1990, Season::Fall)).changed);
        assert_eq!(engine.current_index(), 6);
    }

    #[test]
    fn test_controls() {
        let mut engine = engine(&[2000]);
        let controls = engine.controls();
        assert_eq!(controls.label.as_deref(), Some("Spring 2000"));
        assert!(!controls.can_step_backward && !controls.can_play_backward);
        assert!(controls.can_step_forward && controls.can_play_forward);

        let _ = engine.play(Direction::Forward);
        assert_eq!(engine.controls().active_direction, Some(Direction::Forward));

        let _ = engine.jump_to(&TimelineStep::new(2000, Season::Winter));
        let controls = engine.controls();
        assert!(!controls.can_step_forward && !controls.can_play_forward);
        assert!(controls.can_step_backward);

        assert_eq!(TimelineEngine::new(PERIOD).controls(), ControlState::default());
    }
}
