//! geoshare - WGS84 to Stereo 70 projection for location sharing
//!
//! geoshare converts GPS positions to the Romanian national grid
//! (Stereo 70, EPSG:31700), composes share messages for a position and
//! asks an AI service for a short description of the surroundings.
//!
//! # Examples
//!
//! ## Projecting a position
//!
//! ```
//! use geoshare::project;
//!
//! let grid = geoshare::project(44.4268, 26.1025);
//! assert!((grid.easting - 587_932.46).abs() < 1.0);
//! assert!((grid.northing - 325_798.36).abs() < 1.0);
//!
//! // Invalid input yields the {0, 0} sentinel instead of an error
//! assert!(project(f64::NAN, 26.1025).is_sentinel());
//! ```
//!
//! ## Sharing a fix
//!
//! ```
//! use geoshare::{format, LocationFix, SharePayload};
//!
//! let fix = LocationFix::new(44.4268, 26.1025, 12.0);
//! let grid = fix.projected.unwrap();
//! println!("N: {} m", format::meters(grid.northing));
//!
//! let payload = SharePayload::new(&fix, None);
//! assert!(payload.whatsapp_url.starts_with("https://wa.me/?text="));
//! ```

pub mod analysis;
pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod projection;
pub mod session;
pub mod share;
pub mod types;

pub use error::{Error, Result};
pub use projection::{project, project_many, try_project, unproject, Transformer};
pub use session::{LocationError, LocationProvider, Session};
pub use share::SharePayload;
pub use types::{AccuracyReading, GeographicCoordinate, LocationFix, ProjectedCoordinate};
