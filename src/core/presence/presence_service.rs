// Presence control - what the bot shows as its status line, and the
// online/offline signal sent to the external status dashboard.
//
// The platform call and the HTTP call are both behind traits, so this module
// stays free of serenity and reqwest.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_ACTIVITY_TEXT: &str = "TXRP Code:XFjOS | $help for commands";
pub const DEFAULT_STREAM_URL: &str = "https://txrp-utilities.lovable.app/";

// ============================================================================
// DOMAIN MODELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMode {
    Online,
    Idle,
    #[default]
    DoNotDisturb,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Use: online / idle / dnd")]
pub struct ParseStatusModeError;

impl FromStr for StatusMode {
    type Err = ParseStatusModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "idle" => Ok(Self::Idle),
            "dnd" => Ok(Self::DoNotDisturb),
            _ => Err(ParseStatusModeError),
        }
    }
}

impl fmt::Display for StatusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::DoNotDisturb => "dnd",
        };
        f.write_str(name)
    }
}

/// Everything shown on the bot's profile. Published as a streaming activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceState {
    pub activity_text: String,
    pub stream_url: String,
    pub status_mode: StatusMode,
}

impl Default for PresenceState {
    fn default() -> Self {
        Self {
            activity_text: DEFAULT_ACTIVITY_TEXT.to_string(),
            stream_url: DEFAULT_STREAM_URL.to_string(),
            status_mode: StatusMode::default(),
        }
    }
}

// ============================================================================
// PORTS
// ============================================================================

/// Something that can show a presence on the platform (the gateway connection).
pub trait PresenceSink: Send + Sync {
    fn publish(&self, state: &PresenceState);
}

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Status webhook request failed: {0}")]
    Transport(String),

    #[error("Status webhook rejected the update with HTTP {0}")]
    Rejected(u16),
}

/// Reports online/offline to the external dashboard.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn report(&self, is_online: bool) -> Result<(), StatusError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Owns the process-wide presence state. One instance lives in the framework
/// data and every owner command goes through it.
pub struct PresenceController<R: StatusReporter> {
    state: RwLock<PresenceState>,
    /// `None` when no webhook secret is configured.
    reporter: Option<R>,
}

impl<R: StatusReporter> PresenceController<R> {
    pub fn new(initial: PresenceState, reporter: Option<R>) -> Self {
        Self {
            state: RwLock::new(initial),
            reporter,
        }
    }

    pub async fn current(&self) -> PresenceState {
        self.state.read().await.clone()
    }

    /// Push the current state to the platform without changing it.
    pub async fn apply(&self, sink: &dyn PresenceSink) {
        let state = self.state.read().await;
        sink.publish(&state);
    }

    pub async fn set_activity(&self, sink: &dyn PresenceSink, text: impl Into<String>) {
        self.update(sink, |state| state.activity_text = text.into()).await;
    }

    pub async fn set_stream_url(&self, sink: &dyn PresenceSink, url: impl Into<String>) {
        self.update(sink, |state| state.stream_url = url.into()).await;
    }

    pub async fn set_status_mode(&self, sink: &dyn PresenceSink, mode: StatusMode) {
        self.update(sink, |state| state.status_mode = mode).await;
    }

    async fn update(&self, sink: &dyn PresenceSink, change: impl FnOnce(&mut PresenceState)) {
        let mut state = self.state.write().await;
        change(&mut state);
        tracing::info!(
            activity = %state.activity_text,
            url = %state.stream_url,
            mode = %state.status_mode,
            "Presence updated"
        );
        sink.publish(&state);
    }

    /// Tell the dashboard whether the bot is up. Never fails and never retries:
    /// problems are logged and dropped.
    pub async fn notify_online_status(&self, is_online: bool) {
        let Some(reporter) = &self.reporter else {
            tracing::debug!("No webhook secret configured, skipping status report");
            return;
        };

        match reporter.report(is_online).await {
            Ok(()) => tracing::info!(is_online, "Web status updated"),
            Err(e) => tracing::error!(is_online, "Webhook error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<PresenceState>>,
    }

    impl PresenceSink for RecordingSink {
        fn publish(&self, state: &PresenceState) {
            self.published.lock().unwrap().push(state.clone());
        }
    }

    #[derive(Clone, Default)]
    struct CountingReporter {
        calls: Arc<Mutex<Vec<bool>>>,
        fail: bool,
    }

    #[async_trait]
    impl StatusReporter for CountingReporter {
        async fn report(&self, is_online: bool) -> Result<(), StatusError> {
            self.calls.lock().unwrap().push(is_online);
            if self.fail {
                Err(StatusError::Rejected(500))
            } else {
                Ok(())
            }
        }
    }

    struct PanickingReporter;

    #[async_trait]
    impl StatusReporter for PanickingReporter {
        async fn report(&self, _: bool) -> Result<(), StatusError> {
            panic!("reporter should not be called");
        }
    }

    #[test]
    fn status_mode_parsing() {
        assert_eq!("online".parse(), Ok(StatusMode::Online));
        assert_eq!("IDLE".parse(), Ok(StatusMode::Idle));
        assert_eq!("dnd".parse(), Ok(StatusMode::DoNotDisturb));
        assert_eq!("invisible".parse::<StatusMode>(), Err(ParseStatusModeError));
        assert_eq!(ParseStatusModeError.to_string(), "Use: online / idle / dnd");
    }

    #[test]
    fn defaults_match_startup_presence() {
        let state = PresenceState::default();
        assert_eq!(state.status_mode, StatusMode::DoNotDisturb);
        assert_eq!(state.stream_url, DEFAULT_STREAM_URL);
        assert!(state.activity_text.contains("$help"));
    }

    #[tokio::test]
    async fn every_mutation_is_published_immediately() {
        let controller: PresenceController<CountingReporter> =
            PresenceController::new(PresenceState::default(), None);
        let sink = RecordingSink::default();

        controller.set_activity(&sink, "Patrolling").await;
        controller.set_stream_url(&sink, "https://example.com/live").await;
        controller.set_status_mode(&sink, StatusMode::Idle).await;

        let published = sink.published.lock().unwrap();
        assert_eq!(published.len(), 3);
        assert_eq!(published[0].activity_text, "Patrolling");
        assert_eq!(published[1].stream_url, "https://example.com/live");
        // Later updates carry the earlier fields along.
        assert_eq!(published[2].activity_text, "Patrolling");
        assert_eq!(published[2].status_mode, StatusMode::Idle);

        assert_eq!(controller.current().await, published[2]);
    }

    #[tokio::test]
    async fn apply_publishes_without_changing_state() {
        let controller: PresenceController<CountingReporter> =
            PresenceController::new(PresenceState::default(), None);
        let sink = RecordingSink::default();

        controller.apply(&sink).await;

        assert_eq!(
            sink.published.lock().unwrap().as_slice(),
            &[PresenceState::default()]
        );
    }

    #[tokio::test]
    async fn notify_without_reporter_is_a_no_op() {
        let controller: PresenceController<PanickingReporter> =
            PresenceController::new(PresenceState::default(), None);

        controller.notify_online_status(true).await;
        controller.notify_online_status(false).await;
    }

    #[tokio::test]
    async fn notify_reports_once_per_call() {
        let reporter = CountingReporter::default();
        let calls = Arc::clone(&reporter.calls);
        let controller = PresenceController::new(PresenceState::default(), Some(reporter));

        controller.notify_online_status(true).await;
        controller.notify_online_status(false).await;

        assert_eq!(*calls.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn notify_swallows_reporter_failures() {
        let reporter = CountingReporter {
            fail: true,
            ..Default::default()
        };
        let calls = Arc::clone(&reporter.calls);
        let controller = PresenceController::new(PresenceState::default(), Some(reporter));

        controller.notify_online_status(true).await;

        // One attempt, no retry.
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
