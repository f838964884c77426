//! Filter-composition and timeline-playback engine for geo-tagged flowering
//! records.
//!
//! ## Features
//! - **Dataset registry**: loaded records, distinct families and genera, genus→family map
//! - **Filter composition**: taxonomy selections, spatial and map-area restrictions
//! - **Timeline playback**: seasonal steps, play/pause/step state machine with cancellable timers
//! - **Ingestion**: GeoJSON feature collections from files or, with `http`, remote URLs
//! - **Predictions**: request building for the bloom prediction service
//!
//! ## Playback timers
//! The engine never sleeps or spawns. Starting playback asks the host's
//! [`TickScheduler`] to arm a timer, and the host feeds `Command::Tick(id)`
//! back through [`Session::dispatch`]. Ticks from cancelled timers are ignored.
//!
//! ```rust
//! use bloomscope::prelude::*;
//! use geo::Point;
//!
//! let mut session = SessionBuilder::new().build(ManualScheduler::new())?;
//! session.load_dataset(vec![
//!     Record::new("Apocynaceae", "Asclepias", 2000, Season::Spring, 3.0, Point::new(-99.1, 19.4)),
//!     Record::new("Nymphalidae", "Danaus", 2000, Season::Summer, 1.0, Point::new(-100.3, 19.6)),
//! ])?;
//! assert_eq!(session.view().records().len(), 1);
//!
//! session.dispatch(Command::Play(Direction::Forward))?;
//! let timer = session.scheduler().current().unwrap();
//! session.dispatch(Command::Tick(timer))?;
//! assert_eq!(session.view().step(), Some(TimelineStep::new(2000, Season::Summer)));
//! # Ok::<(), bloomscope::BloomError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod source;

pub use builder::SessionBuilder;
pub use config::{Config, PointStyle};
pub use engine::{
    Command, ControlState, DatasetRegistry, FilterComposer, ManualScheduler, MetricsSink,
    PlaybackState, RenderFrame, Renderer, Session, TickScheduler, TimelineEngine, TimerId,
    ViewState, VisibleSet,
};
pub use error::{BloomError, Result};

pub use geo::{Point, Polygon};

pub use bloomscope_types::{
    ColorMode, Direction, DisplayMode, MapArea, Record, RecordKey, Season, TimelineStep,
    VisibleStats,
};

pub use compute::geojson;
pub use compute::validation;

pub use source::{
    AreaOfInterest, DatasetCatalog, PredictionOutcome, PredictionQuery, load_dataset_file,
};
#[cfg(feature = "http")]
pub use source::HttpSource;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{BloomError, Result, Session, SessionBuilder};

    pub use crate::{Command, ManualScheduler, RenderFrame, TickScheduler, TimerId, ViewState};

    pub use crate::{ColorMode, Direction, DisplayMode, MapArea, Record, Season, TimelineStep};

    pub use crate::{Point, Polygon};

    pub use crate::{Config, PointStyle};

    pub use crate::{AreaOfInterest, PredictionOutcome, PredictionQuery};

    pub use crate::{geojson, validation};
}
