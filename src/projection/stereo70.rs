use crate::error::Result;
use crate::projection::custom::{ProjectionBuilder, ProjectionDefinition};
use crate::projection::datum::Helmert;

/// Romanian national grid on the Dealul Piscului 1970 datum
pub struct Stereo70;

impl Stereo70 {
    pub const LATITUDE_OF_ORIGIN: f64 = 46.0;
    pub const LONGITUDE_OF_ORIGIN: f64 = 25.0;
    pub const SCALE_FACTOR: f64 = 0.99975;
    pub const FALSE_EASTING: f64 = 500_000.0;
    pub const FALSE_NORTHING: f64 = 500_000.0;
    pub const ELLIPSOID: &'static str = "krass";
    pub const HELMERT: Helmert = Helmert::STEREO_70;

    /// Projection definition of the grid
    pub fn definition() -> Result<ProjectionDefinition> {
        ProjectionBuilder::new()
            .projection_type("sterea")
            .latitude_of_origin(Self::LATITUDE_OF_ORIGIN)
            .central_meridian(Self::LONGITUDE_OF_ORIGIN)
            .scale_factor(Self::SCALE_FACTOR)
            .false_easting(Self::FALSE_EASTING)
            .false_northing(Self::FALSE_NORTHING)
            .ellipsoid(Self::ELLIPSOID)
            .towgs84(Self::HELMERT)
            .units("m")
            .no_defs()
            .build()
    }

    /// PROJ4 string of the grid
    pub fn proj4() -> Result<String> {
        Ok(Self::definition()?.to_proj4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proj4_string() {
        assert_eq!(
            Stereo70::proj4().unwrap(),
            "+proj=sterea +lat_0=46 +lon_0=25 +k=0.99975 +x_0=500000 +y_0=500000 +ellps=krass +towgs84=2.329,-147.042,-92.08,0.309,-0.325,-0.497,5.69 +units=m +no_defs"
        );
    }
}
