//! Core data types for geoshare

use serde::{Deserialize, Serialize};

use crate::projection;

/// A point on the WGS84 ellipsoid, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicCoordinate {
    /// Latitude in degrees, nominally in [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, nominally in [-180, 180]
    pub longitude: f64,
}

impl GeographicCoordinate {
    /// Creates a new geographic coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Projects this coordinate onto the Stereo 70 grid
    pub fn to_stereo70(&self) -> ProjectedCoordinate {
        projection::project(self.latitude, self.longitude)
    }
}

/// Radius of the uncertainty circle of a position fix, in meters
pub type AccuracyReading = f64;

/// Planar Stereo 70 coordinate, in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCoordinate {
    /// X, measured eastward from the false origin
    pub easting: f64,
    /// Y, measured northward from the false origin
    pub northing: f64,
}

impl ProjectedCoordinate {
    /// Returned by [`projection::project`] when the transform fails
    pub const SENTINEL: ProjectedCoordinate = ProjectedCoordinate {
        easting: 0.0,
        northing: 0.0,
    };

    /// Creates a new projected coordinate
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    /// Returns true for the `{0, 0}` failure sentinel
    pub fn is_sentinel(&self) -> bool {
        self.easting == 0.0 && self.northing == 0.0
    }
}

/// One acquired device position together with its grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: GeographicCoordinate,
    pub accuracy: AccuracyReading,
    pub projected: Option<ProjectedCoordinate>,
}

impl LocationFix {
    /// Creates a fix and projects it right away
    pub fn new(latitude: f64, longitude: f64, accuracy: AccuracyReading) -> Self {
        let coordinate = GeographicCoordinate::new(latitude, longitude);
        Self {
            coordinate,
            accuracy,
            projected: Some(coordinate.to_stereo70()),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert!(ProjectedCoordinate::SENTINEL.is_sentinel());
        assert!(!ProjectedCoordinate::new(500000.0, 0.0).is_sentinel());
    }

    #[test]
    fn test_location_fix_projects_on_creation() {
        let fix = LocationFix::new(44.4268, 26.1025, 12.0);
        let projected = fix.projected.unwrap();
        assert!((projected.easting - 587932.46).abs() < 1.0);
        assert!((projected.northing - 325798.36).abs() < 1.0);
        assert_eq!(fix.accuracy, 12.0);
        assert_eq!(fix.latitude(), 44.4268);
        assert_eq!(fix.longitude(), 26.1025);
    }

    #[test]
    fn test_serialization_field_names() {
        let coord = ProjectedCoordinate::new(1.5, 2.5);
        let json = serde_json::to_value(coord).unwrap();
        assert_eq!(json["easting"], 1.5);
        assert_eq!(json["northing"], 2.5);
    }
}
