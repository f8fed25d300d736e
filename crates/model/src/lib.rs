pub use serde_with;

pub mod elevation;
pub mod path;
pub mod point;
pub mod suggestion;

pub use elevation::{ElevationObservation, ElevationSample};
pub use path::{Path, SketchGeometry};
pub use point::{GeoPoint, ProjectedPoint, SpatialReference};
pub use suggestion::{GeocodeCandidate, ResolutionKey, SuggestionCandidate};
