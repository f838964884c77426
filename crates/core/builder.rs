//! Session builder
//!
//! Collects configuration, display modes and output collaborators before the
//! host supplies its tick scheduler.

use crate::config::Config;
use crate::engine::{MetricsSink, Renderer, Session, TickScheduler};
use crate::error::Result;
use bloomscope_types::config::{ColorMode, DisplayMode};

/// Builder for a [`Session`].
#[derive(Default)]
pub struct SessionBuilder {
    config: Config,
    color_mode: ColorMode,
    display_mode: DisplayMode,
    renderers: Vec<Box<dyn Renderer>>,
    sinks: Vec<Box<dyn MetricsSink>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn renderer<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    pub fn metrics_sink<M: MetricsSink + 'static>(mut self, sink: M) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Build the session around the host's scheduler.
    ///
    /// Fails with `Config` when the configuration does not validate.
    pub fn build<S: TickScheduler>(self, scheduler: S) -> Result<Session<S>> {
        let mut session = Session::new(self.config, scheduler)?;
        session.set_modes(self.color_mode, self.display_mode);
        for renderer in self.renderers {
            session.add_renderer(renderer);
        }
        for sink in self.sinks {
            session.add_metrics_sink(sink);
        }
        Ok(session)
    }
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("color_mode", &self.color_mode)
            .field("display_mode", &self.display_mode)
            .field("renderers", &self.renderers.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
