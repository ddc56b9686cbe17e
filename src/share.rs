//! Share message composition.
//!
//! Builds the text and links handed to messaging, mail and map targets.
//! Opening those targets is left to the caller.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::format::fixed;
use crate::types::{GeographicCoordinate, LocationFix};

/// Characters left as-is by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const SHARE_SUBJECT: &str = "My Current Location";

/// Everything a share sheet needs for one fix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePayload {
    pub subject: String,
    pub text: String,
    pub maps_link: String,
    pub embed_link: String,
    pub whatsapp_url: String,
}

impl SharePayload {
    pub fn new(fix: &LocationFix, description: Option<&str>) -> Self {
        let text = share_text(fix, description);
        Self {
            subject: SHARE_SUBJECT.to_string(),
            maps_link: maps_link(&fix.coordinate),
            embed_link: maps_embed_link(&fix.coordinate),
            whatsapp_url: whatsapp_url(&text),
            text,
        }
    }

    /// `mailto:` link carrying this payload
    pub fn mailto(&self, recipient: &str) -> String {
        mailto_url(recipient, &self.subject, &self.text)
    }
}

/// Percent-encodes with `encodeURIComponent` semantics
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Google Maps search link for a coordinate
pub fn maps_link(coord: &GeographicCoordinate) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        coord.latitude, coord.longitude
    )
}

/// Embeddable Google Maps view, zoom 16
pub fn maps_embed_link(coord: &GeographicCoordinate) -> String {
    format!(
        "https://maps.google.com/maps?q={},{}&z=16&output=embed",
        coord.latitude, coord.longitude
    )
}

/// Human readable message describing a fix
pub fn share_text(fix: &LocationFix, description: Option<&str>) -> String {
    let mut text = format!(
        "I'm currently at:\nLat: {}\nLong: {}",
        fixed(fix.latitude(), 6),
        fixed(fix.longitude(), 6)
    );

    if let Some(projected) = fix.projected {
        text.push_str(&format!(
            "\n\nStereo 70 (RO):\nN: {} m\nE: {} m",
            fixed(projected.northing, 2),
            fixed(projected.easting, 2)
        ));
    }

    text.push_str("\n\n");
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        text.push_str(&format!("Context: {}\n\n", description));
    }
    text.push_str(&format!("View on Maps: {}", maps_link(&fix.coordinate)));

    text
}

pub fn whatsapp_url(text: &str) -> String {
    format!("https://wa.me/?text={}", encode_component(text))
}

pub fn mailto_url(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_component(subject),
        encode_component(body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectedCoordinate;

    fn bucharest() -> LocationFix {
        LocationFix {
            coordinate: GeographicCoordinate::new(44.4268, 26.1025),
            accuracy: 10.0,
            projected: Some(ProjectedCoordinate::new(587_932.4623, 325_798.3586)),
        }
    }

    #[test]
    fn test_share_text_full() {
        let text = share_text(&bucharest(), Some("Piata Universitatii"));
        assert_eq!(
            text,
            "I'm currently at:\nLat: 44.426800\nLong: 26.102500\n\n\
             Stereo 70 (RO):\nN: 325798.36 m\nE: 587932.46 m\n\n\
             Context: Piata Universitatii\n\n\
             View on Maps: https://www.google.com/maps/search/?api=1&query=44.4268,26.1025"
        );
    }

    #[test]
    fn test_share_text_without_projection_or_context() {
        let mut fix = bucharest();
        fix.projected = None;

        let text = share_text(&fix, None);
        assert!(!text.contains("Stereo 70"));
        assert!(!text.contains("Context:"));
        assert!(text.ends_with("\n\nView on Maps: https://www.google.com/maps/search/?api=1&query=44.4268,26.1025"));
    }

    #[test]
    fn test_share_text_rounds_ties_up() {
        let mut fix = bucharest();
        fix.projected = Some(ProjectedCoordinate::new(500_000.125, 400_000.375));

        let text = share_text(&fix, None);
        assert!(text.contains("N: 400000.38 m\nE: 500000.13 m"), "{}", text);
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("I'm (here)!"), "I'm%20(here)!");
        assert_eq!(encode_component("line\nbreak"), "line%0Abreak");
        assert_eq!(encode_component("Piața"), "Pia%C8%9Ba");
    }

    #[test]
    fn test_whatsapp_url() {
        assert_eq!(whatsapp_url("Hi there"), "https://wa.me/?text=Hi%20there");
    }

    #[test]
    fn test_mailto_url() {
        assert_eq!(
            mailto_url("friend@example.com", SHARE_SUBJECT, "Lat: 1"),
            "mailto:friend@example.com?subject=My%20Current%20Location&body=Lat%3A%201"
        );
    }

    #[test]
    fn test_payload() {
        let payload = SharePayload::new(&bucharest(), None);
        assert_eq!(payload.subject, SHARE_SUBJECT);
        assert!(payload.whatsapp_url.starts_with("https://wa.me/?text=I'm%20currently%20at%3A%0ALat%3A%2044.426800"));
        assert_eq!(
            payload.embed_link,
            "https://maps.google.com/maps?q=44.4268,26.1025&z=16&output=embed"
        );
        assert!(payload.mailto("a@b.ro").starts_with("mailto:a@b.ro?subject=My%20Current%20Location&body="));
    }
}
