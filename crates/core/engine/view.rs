//! What the session publishes after every recompute.

use crate::compute::points::{DisplayPoint, Palette};
use crate::engine::timeline::{ControlState, VisibleSet};
use bloomscope_types::config::{ColorMode, DisplayMode};
use bloomscope_types::record::Record;
use bloomscope_types::stats::VisibleStats;
use bloomscope_types::timeline::TimelineStep;

/// A display point with its color under the active color mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredPoint {
    pub point: DisplayPoint,
    pub color: String,
}

/// Everything a renderer needs to draw one view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub step: Option<TimelineStep>,
    pub points: Vec<ColoredPoint>,
    pub display_mode: DisplayMode,
    pub color_mode: ColorMode,
    /// Shows the prediction indicator when set.
    pub is_prediction_set: bool,
    pub controls: ControlState,
}

impl RenderFrame {
    pub(crate) fn build(
        visible: &VisibleSet,
        palette: &Palette,
        step: Option<TimelineStep>,
        color_mode: ColorMode,
        display_mode: DisplayMode,
        is_prediction_set: bool,
        controls: ControlState,
    ) -> Self {
        let points = visible
            .points
            .iter()
            .map(|point| ColoredPoint {
                color: palette.color_for(point, color_mode).to_string(),
                point: point.clone(),
            })
            .collect();
        Self {
            step,
            points,
            display_mode,
            color_mode,
            is_prediction_set,
            controls,
        }
    }
}

/// The current published view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Incremented on every publish.
    pub revision: u64,
    pub visible: VisibleSet,
    pub frame: RenderFrame,
    pub stats: VisibleStats,
}

impl ViewState {
    pub fn records(&self) -> &[Record] {
        &self.visible.records
    }

    pub fn points(&self) -> &[DisplayPoint] {
        &self.visible.points
    }

    pub fn step(&self) -> Option<TimelineStep> {
        self.frame.step
    }

    pub fn controls(&self) -> &ControlState {
        &self.frame.controls
    }
}

/// Draws published frames. Sends nothing back into the session.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

impl<F> Renderer for F
where
    F: FnMut(&RenderFrame),
{
    fn render(&mut self, frame: &RenderFrame) {
        self(frame)
    }
}

/// Receives the visible records after every recompute.
pub trait MetricsSink {
    fn update(&mut self, records: &[Record], stats: &VisibleStats);
}

impl<F> MetricsSink for F
where
    F: FnMut(&[Record], &VisibleStats),
{
    fn update(&mut self, records: &[Record], stats: &VisibleStats) {
        self(records, stats)
    }
}
