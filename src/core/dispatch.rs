// Alert dispatch - turns trigger events into one outbound SOS message.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::debounce::Debounce;
use super::model::{GeoPoint, TriggerEvent};
use super::session::SessionState;

/// Messaging collaborator: hands one text message to the platform transport.
///
/// Fire-and-forget; no delivery confirmation is surfaced and this core does
/// not retry. A transport failure comes back as
/// [`DispatchError::MessagingFailed`].
pub trait MessageSender {
    fn send_text(&mut self, number: &str, body: &str) -> Result<(), String>;
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no emergency contact configured")]
    NoContactConfigured,
    #[error("no location fix available")]
    NoLocationAvailable,
    #[error("messaging failed: {0}")]
    MessagingFailed(String),
}

/// Alert dispatch configuration - persisted in settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Minimum interval between two outbound alerts, across all trigger
    /// sources.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Leading phrase of the alert body.
    #[serde(default = "default_help_phrase")]
    pub help_phrase: String,
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_help_phrase() -> String {
    "I need help".to_string()
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            help_phrase: default_help_phrase(),
        }
    }
}

/// One alert that went out, for logging and the outbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    /// "fall" or "voice"
    pub cause: String,
    pub number: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// How a trigger was handled. Suppression is deliberate, not an error.
#[derive(Debug)]
pub enum DispatchOutcome {
    Sent(AlertRecord),
    /// The SOS toggle is off.
    SosDisabled,
    /// An alert already went out within the debounce window.
    Debounced,
}

/// Consumes trigger events and emits at most one outbound alert per debounce
/// window.
pub struct AlertDispatcher {
    config: AlertConfig,
    debounce: Debounce,
}

impl AlertDispatcher {
    pub fn new(config: AlertConfig) -> Self {
        let window = Duration::from_millis(config.debounce_ms);
        Self {
            config,
            debounce: Debounce::new(window),
        }
    }

    /// Preconditions, in order: SOS enabled, contact configured, location
    /// available, debounce window open. The window is only consumed by an
    /// actual send attempt, so a failed precondition does not mask the next
    /// trigger.
    pub fn dispatch(
        &mut self,
        event: &TriggerEvent,
        session: &SessionState,
        sender: &mut dyn MessageSender,
    ) -> Result<DispatchOutcome, DispatchError> {
        if !session.sos_enabled() {
            return Ok(DispatchOutcome::SosDisabled);
        }

        let contact = session
            .contact()
            .ok_or(DispatchError::NoContactConfigured)?;
        let fix = session
            .last_fix()
            .ok_or(DispatchError::NoLocationAvailable)?;

        if !self.debounce.ready(event.at) {
            return Ok(DispatchOutcome::Debounced);
        }
        self.debounce.mark(event.at);

        let body = format_alert_body(&self.config.help_phrase, fix);
        sender
            .send_text(contact.number(), &body)
            .map_err(DispatchError::MessagingFailed)?;

        Ok(DispatchOutcome::Sent(AlertRecord {
            cause: event.source.kind().to_string(),
            number: contact.number().to_string(),
            body,
            sent_at: Utc::now(),
        }))
    }
}

/// Help phrase plus a map link embedding the coordinates.
pub fn format_alert_body(help_phrase: &str, fix: GeoPoint) -> String {
    format!(
        "{}. My current location is: http://maps.google.com/?q={},{}",
        help_phrase, fix.lat, fix.lon
    )
}
