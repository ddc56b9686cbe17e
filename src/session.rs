//! Location analysis workflow.
//!
//! A [`Session`] sequences "acquire position", "project", "ask for context"
//! and keeps two independent status machines, one for the position and one
//! for the analysis. Each step is an ordinary `async fn`: it can be retried by
//! calling it again and cancelled by dropping the future.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{ContextAnalyzer, LocationAnalysis};
use crate::share::SharePayload;
use crate::types::{AccuracyReading, LocationFix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Raw reading handed over by a position source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: AccuracyReading,
}

/// Why a position could not be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
    Unknown,
}

impl LocationError {
    /// Message shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "User denied the request for Geolocation.",
            LocationError::PositionUnavailable => "Location information is unavailable.",
            LocationError::Timeout => "The request to get user location timed out.",
            LocationError::Unsupported => "Geolocation is not supported by your browser.",
            LocationError::Unknown => "An unknown error occurred.",
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for LocationError {}

/// Source of device positions
pub trait LocationProvider {
    fn current_position(&self) -> impl Future<Output = Result<RawPosition, LocationError>> + Send;
}

/// A position that is already known, e.g. typed in by the user
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub RawPosition);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<RawPosition, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    location_status: LocationStatus,
    analysis_status: AnalysisStatus,
    fix: Option<LocationFix>,
    analysis: Option<LocationAnalysis>,
    error_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            location_status: LocationStatus::Idle,
            analysis_status: AnalysisStatus::Idle,
            fix: None,
            analysis: None,
            error_message: None,
        }
    }

    pub fn location_status(&self) -> LocationStatus {
        self.location_status
    }

    pub fn analysis_status(&self) -> AnalysisStatus {
        self.analysis_status
    }

    /// Most recent fix; kept until the next successful acquisition
    pub fn fix(&self) -> Option<&LocationFix> {
        self.fix.as_ref()
    }

    pub fn analysis(&self) -> Option<&LocationAnalysis> {
        self.analysis.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Acquires a new position, projects it and asks for its context
    pub async fn refresh<P, A>(&mut self, provider: &P, analyzer: &A)
    where
        P: LocationProvider,
        A: ContextAnalyzer,
    {
        if self.locate(provider).await {
            self.analyze(analyzer).await;
        }
    }

    /// Acquires a new position; returns true on success
    pub async fn locate<P: LocationProvider>(&mut self, provider: &P) -> bool {
        self.location_status = LocationStatus::Loading;
        self.error_message = None;
        self.analysis_status = AnalysisStatus::Idle;
        self.analysis = None;

        match provider.current_position().await {
            Ok(position) => {
                let fix = LocationFix::new(position.latitude, position.longitude, position.accuracy);
                info!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    accuracy = position.accuracy,
                    "position acquired"
                );
                self.fix = Some(fix);
                self.location_status = LocationStatus::Success;
                true
            }
            Err(e) => {
                warn!(error = %e, "position unavailable");
                self.location_status = LocationStatus::Error;
                self.error_message = Some(e.message().to_string());
                false
            }
        }
    }

    /// Requests context for the current fix; also serves as "try again"
    pub async fn analyze<A: ContextAnalyzer>(&mut self, analyzer: &A) {
        let Some(fix) = self.fix.filter(|_| self.location_status == LocationStatus::Success) else {
            return;
        };

        self.analysis_status = AnalysisStatus::Loading;
        self.analysis = None;

        match analyzer.analyze(fix.latitude(), fix.longitude()).await {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.analysis_status = AnalysisStatus::Success;
            }
            Err(e) => {
                warn!(error = %e, "context analysis failed");
                self.analysis_status = AnalysisStatus::Error;
            }
        }
    }

    /// Share data for the current fix, once a position is known
    pub fn share_payload(&self) -> Option<SharePayload> {
        if self.location_status != LocationStatus::Success {
            return None;
        }
        let fix = self.fix.as_ref()?;
        let description = self.analysis.as_ref().map(|a| a.description.as_str());
        Some(SharePayload::new(fix, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::GroundingSource;
    use crate::error::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing(LocationError);

    impl LocationProvider for Failing {
        async fn current_position(&self) -> std::result::Result<RawPosition, LocationError> {
            Err(self.0)
        }
    }

    #[derive(Default)]
    struct Scripted {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl ContextAnalyzer for Scripted {
        async fn analyze(&self, latitude: f64, _longitude: f64) -> Result<LocationAnalysis> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(Error::Analysis("unavailable".to_string()));
            }
            Ok(LocationAnalysis {
                description: format!("near {}", latitude),
                sources: vec![GroundingSource {
                    uri: "https://example.ro".to_string(),
                    title: "Example".to_string(),
                }],
            })
        }
    }

    fn bucharest() -> FixedLocation {
        FixedLocation(RawPosition {
            latitude: 44.4268,
            longitude: 26.1025,
            accuracy: 15.0,
        })
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        assert_eq!(session.location_status(), LocationStatus::Idle);
        assert_eq!(session.analysis_status(), AnalysisStatus::Idle);
        assert!(session.fix().is_none());
        assert!(session.share_payload().is_none());
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let mut session = Session::new();
        let analyzer = Scripted::default();

        session.refresh(&bucharest(), &analyzer).await;

        assert_eq!(session.location_status(), LocationStatus::Success);
        assert_eq!(session.analysis_status(), AnalysisStatus::Success);
        let fix = session.fix().unwrap();
        assert!((fix.projected.unwrap().easting - 587_932.46).abs() < 1.0);
        assert_eq!(session.analysis().unwrap().description, "near 44.4268");

        let payload = session.share_payload().unwrap();
        assert!(payload.text.contains("Context: near 44.4268"));
        assert!(payload.text.contains("Stereo 70 (RO)"));
    }

    #[tokio::test]
    async fn test_location_failure() {
        let mut session = Session::new();
        let analyzer = Scripted::default();

        session.refresh(&Failing(LocationError::PermissionDenied), &analyzer).await;

        assert_eq!(session.location_status(), LocationStatus::Error);
        assert_eq!(session.analysis_status(), AnalysisStatus::Idle);
        assert_eq!(
            session.error_message(),
            Some("User denied the request for Geolocation.")
        );
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
        assert!(session.share_payload().is_none());
    }

    #[tokio::test]
    async fn test_analysis_failure_then_retry() {
        let mut session = Session::new();
        let analyzer = Scripted {
            fail_first: true,
            ..Default::default()
        };

        session.refresh(&bucharest(), &analyzer).await;
        assert_eq!(session.location_status(), LocationStatus::Success);
        assert_eq!(session.analysis_status(), AnalysisStatus::Error);
        assert!(session.analysis().is_none());

        // Share stays available without the context line
        let payload = session.share_payload().unwrap();
        assert!(!payload.text.contains("Context:"));

        session.analyze(&analyzer).await;
        assert_eq!(session.analysis_status(), AnalysisStatus::Success);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_analyze_without_fix_is_noop() {
        let mut session = Session::new();
        let analyzer = Scripted::default();

        session.analyze(&analyzer).await;
        assert_eq!(session.analysis_status(), AnalysisStatus::Idle);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_resets_previous_analysis() {
        let mut session = Session::new();
        let analyzer = Scripted::default();
        session.refresh(&bucharest(), &analyzer).await;
        assert!(session.analysis().is_some());

        session.locate(&Failing(LocationError::Timeout)).await;
        assert!(session.analysis().is_none());
        assert_eq!(session.analysis_status(), AnalysisStatus::Idle);
        assert_eq!(
            session.error_message(),
            Some("The request to get user location timed out.")
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LocationStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(
            serde_json::to_string(&AnalysisStatus::Loading).unwrap(),
            "\"LOADING\""
        );
    }
}
