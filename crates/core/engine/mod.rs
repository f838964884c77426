//! The filter-composition and timeline-playback engine.
//!
//! [`Session`] owns one [`DatasetRegistry`], one [`FilterComposer`] and one
//! [`TimelineEngine`]. Hosts feed it [`Command`]s; every command that changes
//! state triggers exactly one recompute, published to all renderers and
//! metrics sinks.

mod filter;
mod playback;
mod registry;
mod timeline;
mod view;

pub use filter::FilterComposer;
pub use playback::{ManualScheduler, TickScheduler, TimerCommand, TimerId, Transition};
pub use registry::DatasetRegistry;
pub use timeline::{ControlState, PlaybackState, TimelineEngine, VisibleSet};
pub use view::{ColoredPoint, MetricsSink, RenderFrame, Renderer, ViewState};

use crate::config::Config;
use crate::error::{BloomError, Result};
use crate::source::{PredictionOutcome, PredictionQuery};
use bloomscope_types::config::{ColorMode, DisplayMode};
use bloomscope_types::record::Record;
use bloomscope_types::stats::VisibleStats;
use bloomscope_types::timeline::{Direction, TimelineStep};
use geo::Point;

/// A discrete UI event.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleFamily { family: String, checked: bool },
    ToggleGenus { genus: String, checked: bool },
    SelectFamilies(Vec<String>),
    SelectGenera(Vec<String>),
    /// Records inside a user-drawn region, or `None` to clear.
    SetSpatialSelection(Option<Vec<Record>>),
    /// Records inside a selected map area, or `None` to clear.
    SetAreaSelection(Option<Vec<Record>>),
    Step(Direction),
    Play(Direction),
    Pause,
    /// Delivered by the tick scheduler for an armed timer.
    Tick(TimerId),
    JumpTo(TimelineStep),
    SetColorMode(ColorMode),
    SetDisplayMode(DisplayMode),
    SetUserLocation(Option<Point<f64>>),
}

/// Coordinates the engine components and publishes views.
pub struct Session<S: TickScheduler> {
    config: Config,
    registry: DatasetRegistry,
    filters: FilterComposer,
    timeline: TimelineEngine,
    scheduler: S,
    color_mode: ColorMode,
    display_mode: DisplayMode,
    renderers: Vec<Box<dyn Renderer>>,
    sinks: Vec<Box<dyn MetricsSink>>,
    view: ViewState,
}

impl<S: TickScheduler> Session<S> {
    /// Create an empty session. Nothing is published until data is loaded.
    pub fn new(config: Config, scheduler: S) -> Result<Self> {
        config.validate().map_err(BloomError::Config)?;
        let registry = DatasetRegistry::new(&config);
        let timeline = TimelineEngine::new(config.playback_interval());
        let mut session = Self {
            config,
            registry,
            filters: FilterComposer::new(),
            timeline,
            scheduler,
            color_mode: ColorMode::default(),
            display_mode: DisplayMode::default(),
            renderers: Vec::new(),
            sinks: Vec::new(),
            view: ViewState::default(),
        };
        session.view = session.compute_view();
        Ok(session)
    }

    pub fn add_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    pub fn add_metrics_sink(&mut self, sink: Box<dyn MetricsSink>) {
        self.sinks.push(sink);
    }

    pub(crate) fn set_modes(&mut self, color_mode: ColorMode, display_mode: DisplayMode) {
        self.color_mode = color_mode;
        self.display_mode = display_mode;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn filters(&self) -> &FilterComposer {
        &self.filters
    }

    pub fn timeline(&self) -> &TimelineEngine {
        &self.timeline
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// The last published view.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Replace the active dataset.
    ///
    /// On success filters reset, playback stops and the timeline is rebuilt
    /// at the configured start step. On failure nothing changes.
    pub fn load_dataset(&mut self, records: Vec<Record>) -> Result<usize> {
        self.replace_dataset(records, None)
    }

    /// Load the response to a prediction query.
    ///
    /// An empty response is [`PredictionOutcome::NoResults`] and leaves the
    /// active dataset in place. Otherwise the timeline opens at the query's
    /// start step.
    pub fn load_predictions(
        &mut self,
        query: &PredictionQuery,
        records: Vec<Record>,
    ) -> Result<PredictionOutcome> {
        if records.is_empty() {
            log::info!("No predictions for {} at {:?}", query.start, query.area);
            return Ok(PredictionOutcome::NoResults);
        }
        let loaded = self.replace_dataset(records, Some(query.start))?;
        Ok(PredictionOutcome::Loaded(loaded))
    }

    fn replace_dataset(&mut self, records: Vec<Record>, start: Option<TimelineStep>) -> Result<usize> {
        let loaded = self.registry.load(records)?;
        self.filters.reset();
        let start = start.or(self.config.start_step);
        let transition = self.timeline.rebuild(self.registry.years(), start);
        transition.apply(&mut self.scheduler);
        self.publish();
        Ok(loaded)
    }

    /// Apply one UI event and return the resulting view.
    ///
    /// Ticks from cancelled timers are ignored and publish nothing. The only
    /// failure is an invalid user location, which changes nothing.
    pub fn dispatch(&mut self, command: Command) -> Result<&ViewState> {
        let changed = match command {
            Command::ToggleFamily { family, checked } => {
                self.filters.toggle_family(&self.registry, &family, checked);
                true
            }
            Command::ToggleGenus { genus, checked } => {
                self.filters.toggle_genus(&self.registry, &genus, checked);
                true
            }
            Command::SelectFamilies(families) => {
                self.filters.set_family_selection(&self.registry, families);
                true
            }
            Command::SelectGenera(genera) => {
                self.filters.set_genus_selection(&self.registry, genera);
                true
            }
            Command::SetSpatialSelection(records) => {
                self.filters.set_spatial_selection(records);
                true
            }
            Command::SetAreaSelection(records) => {
                self.filters.set_area_selection(records);
                true
            }
            Command::Step(direction) => {
                let transition = self.timeline.step(direction);
                self.apply(transition)
            }
            Command::Play(direction) => {
                let transition = self.timeline.play(direction);
                self.apply(transition)
            }
            Command::Pause => {
                let transition = self.timeline.pause();
                self.apply(transition)
            }
            Command::Tick(timer) => match self.timeline.tick(timer) {
                Some(transition) => self.apply(transition),
                None => false,
            },
            Command::JumpTo(step) => {
                let transition = self.timeline.jump_to(&step);
                self.apply(transition)
            }
            Command::SetColorMode(mode) => {
                let changed = self.color_mode != mode;
                self.color_mode = mode;
                changed
            }
            Command::SetDisplayMode(mode) => {
                let changed = self.display_mode != mode;
                self.display_mode = mode;
                changed
            }
            Command::SetUserLocation(position) => {
                self.registry.set_user_location(position)?;
                true
            }
        };

        if changed {
            self.publish();
        }
        Ok(&self.view)
    }

    fn apply(&mut self, transition: Transition) -> bool {
        transition.apply(&mut self.scheduler);
        transition.changed
    }

    fn compute_view(&self) -> ViewState {
        let visible = self.timeline.recompute(&self.registry, &self.filters);
        let stats = VisibleStats::from_records(&visible.records);
        let frame = RenderFrame::build(
            &visible,
            self.registry.palette(),
            self.timeline.current_step(),
            self.color_mode,
            self.display_mode,
            self.registry.is_prediction_set(),
            self.timeline.controls(),
        );
        ViewState {
            revision: self.view.revision,
            visible,
            frame,
            stats,
        }
    }

    fn publish(&mut self) {
        let mut view = self.compute_view();
        view.revision += 1;
        self.view = view;

        for renderer in &mut self.renderers {
            renderer.render(&self.view.frame);
        }
        for sink in &mut self.sinks {
            sink.update(&self.view.visible.records, &self.view.stats);
        }
        log::debug!(
            "Published revision {}: {} records visible at {:?}",
            self.view.revision,
            self.view.visible.records.len(),
            self.view.frame.step
        );
    }
}

impl<S: TickScheduler> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("records", &self.registry.len())
            .field("step", &self.timeline.current_step())
            .field("playback", &self.timeline.playback())
            .field("revision", &self.view.revision)
            .finish()
    }
}
