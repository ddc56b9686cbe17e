//! WGS84 to Stereo 70 projection.
//!
//! [`project`] is the entry point used by the rest of the crate. It never
//! fails: any numerical problem is logged and reported as the `{0, 0}`
//! sentinel. [`try_project`] exposes the same transform with the failure
//! kept as an [`Error::Projection`](crate::Error::Projection).
//!
//! The datum shift and the oblique stereographic projection are computed by
//! `proj4rs` from the PROJ string of [`Stereo70`].

pub mod custom;
pub mod datum;
pub mod epsg;
pub mod stereo70;
pub mod transformer;

use std::sync::OnceLock;

use rayon::prelude::*;
use tracing::error;

use crate::error::{Error, Result};
use crate::types::{GeographicCoordinate, ProjectedCoordinate};

pub use custom::{ProjectionBuilder, ProjectionDefinition};
pub use datum::{Datum, Helmert};
pub use stereo70::Stereo70;
pub use transformer::Transformer;
#[cfg(feature = "proj-backend")]
pub use transformer::ProjTransformer;

static STEREO_70: OnceLock<std::result::Result<Transformer, String>> = OnceLock::new();

fn stereo70() -> Result<&'static Transformer> {
    STEREO_70
        .get_or_init(|| Transformer::stereo70().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|msg| Error::Projection(msg.clone()))
}

/// Projects a WGS84 coordinate onto the Stereo 70 grid.
///
/// Returns [`ProjectedCoordinate::SENTINEL`] if the transform fails for any
/// reason, including NaN or infinite input.
pub fn project(latitude: f64, longitude: f64) -> ProjectedCoordinate {
    try_project(latitude, longitude).unwrap_or_else(|e| {
        error!(latitude, longitude, error = %e, "Stereo 70 projection failed");
        ProjectedCoordinate::SENTINEL
    })
}

/// Projects a WGS84 coordinate onto the Stereo 70 grid, reporting failures
pub fn try_project(latitude: f64, longitude: f64) -> Result<ProjectedCoordinate> {
    stereo70()?.transform(GeographicCoordinate::new(latitude, longitude))
}

/// Converts a Stereo 70 coordinate back to WGS84
pub fn unproject(easting: f64, northing: f64) -> Result<GeographicCoordinate> {
    stereo70()?.transform_inverse(ProjectedCoordinate::new(easting, northing))
}

/// Projects many coordinates in parallel; failed entries become the sentinel
pub fn project_many(coords: &[GeographicCoordinate]) -> Vec<ProjectedCoordinate> {
    coords
        .par_iter()
        .map(|coord| project(coord.latitude, coord.longitude))
        .collect()
}
