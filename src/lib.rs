// Library exports for parcoord

pub mod data;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod plot;
pub mod style;
pub mod ticks;
pub mod validate;

pub use data::{Dataset, Kind, Value};
pub use error::PlotError;
pub use graph::{AxisSurface, LegendEntry, PngSurface, RecordingSurface};
pub use mapping::{Mapper, Tick, TickPolicy};
pub use plot::{plot, plot_on, AxisLayout, PlotHandle, PlotLayout, PlotOptions};
pub use style::{style_for, LineKind, Marker, PlotStyle};
pub use validate::validate;
