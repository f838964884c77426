//! Playback timers.
//!
//! The timeline engine never owns a real timer. It hands out [`TimerCommand`]s
//! and the session forwards them to a [`TickScheduler`]. Each armed timer gets
//! a fresh [`TimerId`]; ticks carrying any other id are stale and ignored, so a
//! cancelled timer can never move the timeline even if a tick is already in
//! flight.

use smallvec::SmallVec;
use std::fmt;
use std::time::Duration;

/// Identity of one armed playback timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A timer side effect requested by the timeline engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start a repeating tick with the given period.
    Arm { id: TimerId, period: Duration },
    /// Stop the timer. It must never deliver another tick.
    Cancel(TimerId),
}

/// Outcome of a timeline operation.
#[must_use = "timer commands must be applied to a scheduler"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Whether the position or playback state changed.
    pub changed: bool,
    pub timers: SmallVec<[TimerCommand; 2]>,
}

impl Transition {
    pub(crate) fn unchanged() -> Self {
        Self::default()
    }

    pub(crate) fn changed() -> Self {
        Self {
            changed: true,
            timers: SmallVec::new(),
        }
    }

    pub(crate) fn with_timer(mut self, command: TimerCommand) -> Self {
        self.timers.push(command);
        self
    }

    /// Forward the timer commands to a scheduler, in order.
    pub fn apply<S: TickScheduler + ?Sized>(&self, scheduler: &mut S) {
        for command in &self.timers {
            match *command {
                TimerCommand::Arm { id, period } => scheduler.arm(id, period),
                TimerCommand::Cancel(id) => scheduler.cancel(id),
            }
        }
    }
}

/// Host-side owner of real periodic timers.
///
/// An armed timer delivers `Command::Tick(id)` back into the session every
/// `period` until cancelled. Cancelling an unknown id is a no-op.
pub trait TickScheduler {
    fn arm(&mut self, id: TimerId, period: Duration);
    fn cancel(&mut self, id: TimerId);
}

impl<T: TickScheduler + ?Sized> TickScheduler for Box<T> {
    fn arm(&mut self, id: TimerId, period: Duration) {
        (**self).arm(id, period)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

/// Scheduler that only records requests. The caller fires ticks by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    active: Vec<(TimerId, Duration)>,
    history: Vec<TimerCommand>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers armed and not yet cancelled.
    pub fn active(&self) -> &[(TimerId, Duration)] {
        &self.active
    }

    /// The single active timer, if exactly one is armed.
    pub fn current(&self) -> Option<TimerId> {
        match self.active.as_slice() {
            [(id, _)] => Some(*id),
            _ => None,
        }
    }

    /// Every command received, in order.
    pub fn history(&self) -> &[TimerCommand] {
        &self.history
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self, id: TimerId, period: Duration) {
        self.history.push(TimerCommand::Arm { id, period });
        self.active.push((id, period));
    }

    fn cancel(&mut self, id: TimerId) {
        self.history.push(TimerCommand::Cancel(id));
        self.active.retain(|(active, _)| *active != id);
    }
}
