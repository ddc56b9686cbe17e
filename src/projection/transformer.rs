use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::error::{Error, Result};
use crate::projection::custom::ProjectionDefinition;
use crate::projection::datum::{Datum, Helmert};
use crate::projection::stereo70::Stereo70;
use crate::types::{GeographicCoordinate, ProjectedCoordinate};

/// Transforms WGS84 geographic coordinates onto a projected grid
#[derive(Debug, Clone)]
pub struct Transformer {
    source: Proj,
    target: Proj,
    target_datum: Datum,
    definition: ProjectionDefinition,
}

impl Transformer {
    /// Creates the WGS84 to Stereo 70 transformer
    pub fn stereo70() -> Result<Self> {
        Self::from_definition(Stereo70::definition()?)
    }

    /// Creates a transformer from a custom PROJ string
    pub fn from_proj_string(proj_string: &str) -> Result<Self> {
        Self::from_definition(ProjectionDefinition::from_proj4(proj_string)?)
    }

    /// Creates a transformer onto the grid described by `definition`
    pub fn from_definition(definition: ProjectionDefinition) -> Result<Self> {
        let source = Proj::from_proj_string(&format!(
            "+proj=longlat {} +no_defs",
            Datum::WGS84.to_proj_string()
        ))
        .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))?;

        let target = Proj::from_proj_string(&definition.to_proj4())
            .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))?;

        if target.is_latlong() || target.is_geocent() {
            return Err(Error::Projection(format!(
                "+proj={} is not a projected grid",
                definition.projection_type()
            )));
        }

        Ok(Self {
            source,
            target,
            target_datum: datum_of(&definition),
            definition,
        })
    }

    /// Transforms a coordinate from WGS84 to the grid
    pub fn transform(&self, coord: GeographicCoordinate) -> Result<ProjectedCoordinate> {
        if !coord.latitude.is_finite() || !coord.longitude.is_finite() {
            return Err(Error::Projection(format!(
                "non-finite input latitude={}, longitude={}",
                coord.latitude, coord.longitude
            )));
        }

        // proj4rs takes geographic coordinates in radians
        let mut point = (coord.longitude.to_radians(), coord.latitude.to_radians(), 0.0);
        transform(&self.source, &self.target, &mut point)
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        if !point.0.is_finite() || !point.1.is_finite() {
            return Err(Error::Projection(format!(
                "no grid position for latitude={}, longitude={}",
                coord.latitude, coord.longitude
            )));
        }

        Ok(ProjectedCoordinate::new(point.0, point.1))
    }

    /// Transforms multiple coordinates in bulk, failing on the first error
    pub fn transform_many(&self, coords: &[GeographicCoordinate]) -> Result<Vec<ProjectedCoordinate>> {
        coords.iter()
            .map(|&coord| self.transform(coord))
            .collect()
    }

    /// Transforms a grid coordinate back to WGS84
    pub fn transform_inverse(&self, coord: ProjectedCoordinate) -> Result<GeographicCoordinate> {
        if !coord.easting.is_finite() || !coord.northing.is_finite() {
            return Err(Error::Projection(format!(
                "non-finite input easting={}, northing={}",
                coord.easting, coord.northing
            )));
        }

        let mut point = (coord.easting, coord.northing, 0.0);
        transform(&self.target, &self.source, &mut point)
            .map_err(|e| Error::Projection(format!("Inverse transformation failed: {}", e)))?;

        let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return Err(Error::Projection(format!(
                "no geographic position for easting={}, northing={}",
                coord.easting, coord.northing
            )));
        }

        Ok(GeographicCoordinate::new(lat, lon))
    }

    /// Returns the datum of the grid
    pub fn target_datum(&self) -> Datum {
        self.target_datum
    }

    /// Returns the projection definition
    pub fn definition(&self) -> &ProjectionDefinition {
        &self.definition
    }
}

fn datum_of(definition: &ProjectionDefinition) -> Datum {
    match (definition.datum(), definition.ellipsoid(), definition.towgs84()) {
        (Some("WGS84"), _, _) | (None, Some("WGS84") | None, None) => Datum::WGS84,
        (None, Some("krass"), Some(helmert)) if helmert == Helmert::STEREO_70 => {
            Datum::DealulPiscului1970
        }
        _ => Datum::Custom,
    }
}

/// Same transformation delegated to the PROJ library
#[cfg(feature = "proj-backend")]
pub struct ProjTransformer {
    proj: proj::Proj,
}

#[cfg(feature = "proj-backend")]
impl ProjTransformer {
    /// Creates the WGS84 to Stereo 70 transformer through PROJ
    pub fn stereo70() -> Result<Self> {
        let from = crate::projection::epsg::authority(crate::projection::epsg::WGS84);
        let to = Stereo70::proj4()?;

        let proj = proj::Proj::new_known_crs(&from, &to, None)
            .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))?;

        Ok(Self { proj })
    }

    /// Transforms a coordinate from WGS84 to the grid
    pub fn transform(&self, coord: GeographicCoordinate) -> Result<ProjectedCoordinate> {
        let result = self.proj.convert((coord.longitude, coord.latitude))
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        if !result.0.is_finite() || !result.1.is_finite() {
            return Err(Error::Projection(format!(
                "PROJ returned ({}, {})",
                result.0, result.1
            )));
        }

        Ok(ProjectedCoordinate::new(result.0, result.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo70_transformer() {
        let transformer = Transformer::stereo70().unwrap();
        assert_eq!(transformer.target_datum(), Datum::DealulPiscului1970);
        assert_eq!(transformer.definition().projection_type(), "sterea");
    }

    #[test]
    fn test_bucharest() {
        let transformer = Transformer::stereo70().unwrap();
        let projected = transformer
            .transform(GeographicCoordinate::new(44.4268, 26.1025))
            .unwrap();

        assert!((projected.easting - 587_932.46).abs() < 0.05, "{:?}", projected);
        assert!((projected.northing - 325_798.36).abs() < 0.05, "{:?}", projected);
    }

    #[test]
    fn test_transform_many() {
        let transformer = Transformer::stereo70().unwrap();
        let coords = vec![
            GeographicCoordinate::new(45.7489, 21.2087),
            GeographicCoordinate::new(46.7712, 23.6236),
            GeographicCoordinate::new(47.1585, 27.6014),
            GeographicCoordinate::new(44.1598, 28.6348),
        ];

        let projected = transformer.transform_many(&coords).unwrap();
        assert_eq!(projected.len(), 4);
        // Timisoara, Cluj-Napoca, Iasi, Constanta
        assert!((projected[0].easting - 205_266.65).abs() < 0.05);
        assert!((projected[0].northing - 479_107.93).abs() < 0.05);
        assert!((projected[1].easting - 395_042.84).abs() < 0.05);
        assert!((projected[1].northing - 586_624.62).abs() < 0.05);
        assert!((projected[2].easting - 697_365.20).abs() < 0.05);
        assert!((projected[2].northing - 632_011.98).abs() < 0.05);
        assert!((projected[3].easting - 790_851.18).abs() < 0.05);
        assert!((projected[3].northing - 302_063.88).abs() < 0.05);
    }

    #[test]
    fn test_transform_many_fails_on_nan() {
        let transformer = Transformer::stereo70().unwrap();
        let coords = vec![
            GeographicCoordinate::new(45.0, 25.0),
            GeographicCoordinate::new(f64::NAN, 25.0),
        ];
        assert!(transformer.transform_many(&coords).is_err());
    }

    #[test]
    fn test_inverse() {
        let transformer = Transformer::stereo70().unwrap();
        let geo = transformer
            .transform_inverse(ProjectedCoordinate::new(500_000.0, 500_000.0))
            .unwrap();

        assert!((geo.latitude - 45.999_954_3).abs() < 1e-6);
        assert!((geo.longitude - 24.998_088_1).abs() < 1e-6);

        assert!(transformer
            .transform_inverse(ProjectedCoordinate::new(f64::NAN, 500_000.0))
            .is_err());
    }

    #[test]
    fn test_oblique_stereographic_worked_example() {
        // Amersfoort / RD New, the worked example for the oblique
        // stereographic method in EPSG Guidance Note 7-2.
        let transformer = Transformer::from_proj_string(
            "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel",
        )
        .unwrap();
        assert_eq!(transformer.target_datum(), Datum::Custom);

        let projected = transformer
            .transform(GeographicCoordinate::new(53.0, 6.0))
            .unwrap();
        assert!((projected.easting - 196_105.283).abs() < 1e-3, "{:?}", projected);
        assert!((projected.northing - 557_057.739).abs() < 1e-3, "{:?}", projected);
    }

    #[test]
    fn test_from_proj_string_without_towgs84() {
        let transformer = Transformer::from_proj_string(
            "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=WGS84",
        )
        .unwrap();
        assert_eq!(transformer.target_datum(), Datum::WGS84);

        let projected = transformer
            .transform(GeographicCoordinate::new(52.15616055555555, 5.38763888888889))
            .unwrap();
        assert!((projected.easting - 155_000.0).abs() < 1e-6);
        assert!((projected.northing - 463_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_other_projected_grids() {
        let transformer = Transformer::from_proj_string("+proj=utm +zone=35 +datum=WGS84").unwrap();
        assert_eq!(transformer.target_datum(), Datum::WGS84);

        // Central meridian of zone 35 is 27E, mapped to the 500 km false easting.
        let projected = transformer
            .transform(GeographicCoordinate::new(45.0, 27.0))
            .unwrap();
        assert!((projected.easting - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_unusable_definitions() {
        assert!(Transformer::from_proj_string("+proj=longlat +datum=WGS84").is_err());
        assert!(Transformer::from_proj_string("+proj=nosuchprojection +ellps=WGS84").is_err());
        assert!(Transformer::from_proj_string("+proj=sterea +ellps=nosuchellipsoid").is_err());
    }

    #[cfg(feature = "proj-backend")]
    #[test]
    fn test_matches_proj() {
        let ours = Transformer::stereo70().unwrap();
        let theirs = ProjTransformer::stereo70().unwrap();

        for &(lat, lon) in &[(44.4268, 26.1025), (47.1585, 27.6014), (45.7489, 21.2087)] {
            let coord = GeographicCoordinate::new(lat, lon);
            let a = ours.transform(coord).unwrap();
            let b = theirs.transform(coord).unwrap();
            assert!((a.easting - b.easting).abs() < 0.05);
            assert!((a.northing - b.northing).abs() < 0.05);
        }
    }
}
