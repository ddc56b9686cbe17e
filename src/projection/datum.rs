use crate::error::{Error, Result};

/// Seven-parameter Helmert transformation in the PROJ `+towgs84` convention.
///
/// Translations are in meters, rotations in arc seconds and the scale
/// correction in parts per million.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmert {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub ppm: f64,
}

impl Helmert {
    /// Dealul Piscului 1970 to WGS84
    pub const STEREO_70: Helmert = Helmert {
        dx: 2.329,
        dy: -147.042,
        dz: -92.08,
        rx: 0.309,
        ry: -0.325,
        rz: -0.497,
        ppm: 5.69,
    };

    /// Parses the comma separated value of a `+towgs84=` parameter
    pub fn from_towgs84(value: &str) -> Result<Self> {
        let values = value
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|e| {
                    Error::InvalidInput(format!("Invalid towgs84 value '{}': {}", part, e))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            [dx, dy, dz] => Ok(Self {
                dx: *dx,
                dy: *dy,
                dz: *dz,
                rx: 0.0,
                ry: 0.0,
                rz: 0.0,
                ppm: 0.0,
            }),
            [dx, dy, dz, rx, ry, rz, ppm] => Ok(Self {
                dx: *dx,
                dy: *dy,
                dz: *dz,
                rx: *rx,
                ry: *ry,
                rz: *rz,
                ppm: *ppm,
            }),
            _ => Err(Error::InvalidInput(format!(
                "towgs84 expects 3 or 7 values, got {}",
                values.len()
            ))),
        }
    }

    /// Renders the parameters as a `+towgs84=` value
    pub fn to_towgs84(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.dx, self.dy, self.dz, self.rx, self.ry, self.rz, self.ppm
        )
    }
}

/// Geodetic datums known to this crate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Datum {
    WGS84,
    /// Dealul Piscului 1970, the datum of the Stereo 70 grid
    DealulPiscului1970,
    Custom,
}

impl Datum {
    /// Converts datum to PROJ string representation
    pub fn to_proj_string(&self) -> String {
        match self {
            Datum::WGS84 => "+datum=WGS84".to_string(),
            Datum::DealulPiscului1970 => format!(
                "+ellps=krass +towgs84={}",
                Helmert::STEREO_70.to_towgs84()
            ),
            Datum::Custom => String::new(),
        }
    }
}
