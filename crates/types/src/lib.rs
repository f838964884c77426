//! # bloomscope-types
//!
//! Plain data types shared by the bloomscope engine and its hosts:
//!
//! - **Records**: `Record` and its composite identity `RecordKey`
//! - **Time**: `Season`, `TimelineStep`, `Direction`
//! - **Areas**: `MapArea` bounding boxes
//! - **Display**: `ColorMode`, `DisplayMode`, `VisibleStats`
//!
//! All types are serializable with Serde and use the `geo` crate's primitives
//! for locations and footprints.
//!
//! ## Examples
//!
//! ```rust
//! use bloomscope_types::record::Record;
//! use bloomscope_types::season::Season;
//! use bloomscope_types::timeline::TimelineStep;
//! use geo::Point;
//!
//! let record = Record::new("Apocynaceae", "Asclepias", 2000, Season::Spring, 3.2, Point::new(-99.1, 19.4));
//! assert_eq!(record.step(), TimelineStep::new(2000, Season::Spring));
//! ```

pub mod bbox;
pub mod config;
pub mod record;
pub mod season;
pub mod stats;
pub mod timeline;

pub use bbox::MapArea;
pub use config::{ColorMode, DisplayMode};
pub use record::{Record, RecordKey};
pub use season::{ParseSeasonError, Season};
pub use stats::VisibleStats;
pub use timeline::{Direction, TimelineStep, build_steps};
