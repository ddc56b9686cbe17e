//! EPSG codes of the coordinate reference systems this crate works with

/// WGS 84 geographic, the frame of GPS and browser geolocation
pub const WGS84: u16 = 4326;

/// Dealul Piscului 1970 / Stereo 70
pub const STEREO_70: u16 = 31700;

/// `EPSG:<code>` authority string
pub fn authority(code: u16) -> String {
    format!("EPSG:{}", code)
}
