// This module handles bot presence and lifecycle events.
//
// Everything here is Discord-layer glue that adapts the core presence state
// into the primitives expected by serenity (ActivityData, OnlineStatus).

use crate::core::presence::{PresenceSink, PresenceState, StatusMode};
use crate::discord::Data;
use poise::serenity_prelude as serenity;

fn online_status(mode: StatusMode) -> serenity::OnlineStatus {
    match mode {
        StatusMode::Online => serenity::OnlineStatus::Online,
        StatusMode::Idle => serenity::OnlineStatus::Idle,
        StatusMode::DoNotDisturb => serenity::OnlineStatus::DoNotDisturb,
    }
}

fn activity(state: &PresenceState) -> serenity::ActivityData {
    // serenity validates the stream URL up front. A bad URL still shows the
    // text, just without the streaming badge.
    serenity::ActivityData::streaming(state.activity_text.clone(), state.stream_url.as_str())
        .unwrap_or_else(|e| {
            tracing::warn!(url = %state.stream_url, "Invalid stream URL: {}", e);
            serenity::ActivityData::playing(state.activity_text.clone())
        })
}

impl PresenceSink for serenity::Context {
    fn publish(&self, state: &PresenceState) {
        self.set_presence(Some(activity(state)), online_status(state.status_mode));
    }
}

/// Called once the bot is ready: show the configured presence and tell the
/// status dashboard we are up.
pub async fn on_ready(ctx: &serenity::Context, data: &Data) {
    data.presence.apply(ctx).await;
    data.presence.notify_online_status(true).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_modes_map_to_platform_statuses() {
        assert_eq!(
            online_status(StatusMode::Online),
            serenity::OnlineStatus::Online
        );
        assert_eq!(online_status(StatusMode::Idle), serenity::OnlineStatus::Idle);
        assert_eq!(
            online_status(StatusMode::DoNotDisturb),
            serenity::OnlineStatus::DoNotDisturb
        );
    }

    #[test]
    fn presence_is_published_as_a_stream() {
        let data = activity(&PresenceState::default());
        assert_eq!(data.kind, serenity::ActivityType::Streaming);
        assert_eq!(data.name, crate::core::presence::DEFAULT_ACTIVITY_TEXT);
        assert!(data.url.is_some());
    }

    #[test]
    fn invalid_url_falls_back_to_playing() {
        let state = PresenceState {
            stream_url: "not a url".to_string(),
            ..PresenceState::default()
        };
        let data = activity(&state);
        assert_eq!(data.kind, serenity::ActivityType::Playing);
        assert_eq!(data.name, state.activity_text);
    }
}
