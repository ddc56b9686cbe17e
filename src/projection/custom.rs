use crate::error::{Error, Result};
use crate::projection::datum::Helmert;

/// A PROJ style projection definition
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionDefinition {
    proj_type: String,
    ellipsoid: Option<String>,
    datum: Option<String>,
    towgs84: Option<Helmert>,
    parameters: Vec<(String, String)>,
    no_defs: bool,
}

impl ProjectionDefinition {
    /// Parses a PROJ4 string such as `+proj=sterea +lat_0=46 ...`
    pub fn from_proj4(proj4_string: &str) -> Result<Self> {
        let mut builder = ProjectionBuilder::new();

        for token in proj4_string.split_whitespace() {
            let token = token.strip_prefix('+').ok_or_else(|| {
                Error::InvalidInput(format!("Expected '+key=value', got '{}'", token))
            })?;
            let (key, value) = token.split_once('=').unwrap_or((token, ""));

            builder = match key {
                "proj" => builder.projection_type(value),
                "ellps" => builder.ellipsoid(value),
                "datum" => builder.datum(value),
                "towgs84" => builder.towgs84(Helmert::from_towgs84(value)?),
                "no_defs" => builder.no_defs(),
                _ => builder.parameter(key, value),
            };
        }

        builder.build()
    }

    /// Returns the projection definition string
    pub fn to_proj4(&self) -> String {
        let mut parts = vec![format!("+proj={}", self.proj_type)];

        for (key, value) in &self.parameters {
            if key == "units" {
                continue;
            }
            parts.push(Self::render(key, value));
        }

        if let Some(ref ellipsoid) = self.ellipsoid {
            parts.push(format!("+ellps={}", ellipsoid));
        }

        if let Some(ref datum) = self.datum {
            parts.push(format!("+datum={}", datum));
        }

        if let Some(ref helmert) = self.towgs84 {
            parts.push(format!("+towgs84={}", helmert.to_towgs84()));
        }

        if let Some(units) = self.parameter("units") {
            parts.push(format!("+units={}", units));
        }

        if self.no_defs {
            parts.push("+no_defs".to_string());
        }

        parts.join(" ")
    }

    fn render(key: &str, value: &str) -> String {
        if value.is_empty() {
            format!("+{}", key)
        } else {
            format!("+{}={}", key, value)
        }
    }

    pub fn projection_type(&self) -> &str {
        &self.proj_type
    }

    pub fn ellipsoid(&self) -> Option<&str> {
        self.ellipsoid.as_deref()
    }

    pub fn datum(&self) -> Option<&str> {
        self.datum.as_deref()
    }

    pub fn towgs84(&self) -> Option<Helmert> {
        self.towgs84
    }

    /// Raw value of a `+key=value` parameter
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for creating projection definitions
pub struct ProjectionBuilder {
    proj_type: Option<String>,
    ellipsoid: Option<String>,
    datum: Option<String>,
    towgs84: Option<Helmert>,
    parameters: Vec<(String, String)>,
    no_defs: bool,
}

impl ProjectionBuilder {
    /// Creates a new projection builder
    pub fn new() -> Self {
        Self {
            proj_type: None,
            ellipsoid: None,
            datum: None,
            towgs84: None,
            parameters: Vec::new(),
            no_defs: false,
        }
    }

    /// Sets the projection type (e.g., "sterea", "tmerc")
    pub fn projection_type(mut self, proj_type: &str) -> Self {
        self.proj_type = Some(proj_type.to_string());
        self
    }

    /// Sets the ellipsoid (e.g., "krass", "WGS84")
    pub fn ellipsoid(mut self, ellipsoid: &str) -> Self {
        self.ellipsoid = Some(ellipsoid.to_string());
        self
    }

    /// Sets the datum (e.g., "WGS84")
    pub fn datum(mut self, datum: &str) -> Self {
        self.datum = Some(datum.to_string());
        self
    }

    /// Sets the seven-parameter shift to WGS84
    pub fn towgs84(mut self, helmert: Helmert) -> Self {
        self.towgs84 = Some(helmert);
        self
    }

    /// Adds a custom parameter
    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push((key.to_string(), value.to_string()));
        self
    }

    /// Sets the latitude of origin
    pub fn latitude_of_origin(self, lat: f64) -> Self {
        self.parameter("lat_0", &lat.to_string())
    }

    /// Sets the central meridian
    pub fn central_meridian(self, lon: f64) -> Self {
        self.parameter("lon_0", &lon.to_string())
    }

    /// Sets the scale factor
    pub fn scale_factor(self, k: f64) -> Self {
        self.parameter("k", &k.to_string())
    }

    /// Sets the false easting
    pub fn false_easting(self, x: f64) -> Self {
        self.parameter("x_0", &x.to_string())
    }

    /// Sets the false northing
    pub fn false_northing(self, y: f64) -> Self {
        self.parameter("y_0", &y.to_string())
    }

    /// Sets the units (e.g., "m", "ft", "us-ft")
    pub fn units(self, units: &str) -> Self {
        self.parameter("units", units)
    }

    pub fn no_defs(mut self) -> Self {
        self.no_defs = true;
        self
    }

    /// Builds the projection definition
    pub fn build(self) -> Result<ProjectionDefinition> {
        let proj_type = self
            .proj_type
            .ok_or_else(|| Error::Projection("Projection type is required".to_string()))?;

        Ok(ProjectionDefinition {
            proj_type,
            ellipsoid: self.ellipsoid,
            datum: self.datum,
            towgs84: self.towgs84,
            parameters: self.parameters,
            no_defs: self.no_defs,
        })
    }
}

impl Default for ProjectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
