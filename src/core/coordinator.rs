use std::time::Instant;

use super::dispatch::{AlertConfig, AlertDispatcher, AlertRecord, DispatchOutcome, MessageSender};
use super::fall::{FallConfig, FallDetector};
use super::feeds::FeedBatch;
use super::model::{Contact, TriggerEvent, TriggerSource};
use super::session::SessionState;
use super::voice::PhraseMatcher;
use super::zones::{StaticZoneClassifier, ZoneClassifier};

/// Result of one coordinator tick.
pub struct CoordinatorOutput {
    /// Alerts that actually went out.
    pub alerts: Vec<AlertRecord>,
    /// Transient user notices (failed dispatches, zone info). Nothing here is
    /// fatal; the next tick proceeds regardless.
    pub notices: Vec<String>,
}

/// Single-threaded orchestration of the safety pipeline: fixes update the
/// session, samples run through the fall detector, transcripts through the
/// phrase matcher, and every resulting trigger goes to the dispatcher.
pub struct Coordinator {
    fall: FallDetector,
    matcher: PhraseMatcher,
    dispatcher: AlertDispatcher,
    session: SessionState,
    zones: Box<dyn ZoneClassifier>,
}

impl Coordinator {
    pub fn new(fall: FallConfig, alert: AlertConfig, keywords: &[String]) -> Self {
        Self::with_zone_classifier(fall, alert, keywords, Box::new(StaticZoneClassifier))
    }

    pub fn with_zone_classifier(
        fall: FallConfig,
        alert: AlertConfig,
        keywords: &[String],
        zones: Box<dyn ZoneClassifier>,
    ) -> Self {
        Self {
            fall: FallDetector::new(fall),
            matcher: PhraseMatcher::new(keywords),
            dispatcher: AlertDispatcher::new(alert),
            session: SessionState::new(),
            zones,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn set_sos_enabled(&mut self, enabled: bool) {
        self.session.set_sos_enabled(enabled);
    }

    pub fn set_voice_automation(&mut self, enabled: bool) {
        self.session.set_voice_automation(enabled);
    }

    pub fn set_contact(&mut self, contact: Option<Contact>) {
        self.session.set_contact(contact);
    }

    pub fn tick(
        &mut self,
        batch: &FeedBatch,
        sender: &mut dyn MessageSender,
    ) -> CoordinatorOutput {
        self.tick_at(batch, sender, Instant::now())
    }

    pub fn tick_at(
        &mut self,
        batch: &FeedBatch,
        sender: &mut dyn MessageSender,
        now: Instant,
    ) -> CoordinatorOutput {
        let mut output = CoordinatorOutput {
            alerts: Vec::new(),
            notices: Vec::new(),
        };

        // 1. Location fixes
        for fix in &batch.fixes {
            if self.session.record_fix(*fix) {
                // First fix of the session: classify the surroundings once
                for zone in self.zones.classify(*fix) {
                    output.notices.push(format!(
                        "{} zone at {:.4},{:.4} ({}m)",
                        zone.kind.display_name(),
                        zone.center.lat,
                        zone.center.lon,
                        zone.radius_m as u64,
                    ));
                }
            }
        }

        // 2. Accelerometer samples
        for sample in &batch.samples {
            if let Some(event) = self.fall.process_at(sample, now) {
                self.route(&event, sender, &mut output);
            }
        }

        // 3. Finalized transcripts (only while voice automation is on)
        if self.session.voice_automation() {
            for transcript in &batch.transcripts {
                if let Some(phrase) = self.matcher.match_transcript(transcript) {
                    let event = TriggerEvent {
                        source: TriggerSource::Voice { phrase },
                        at: now,
                    };
                    self.route(&event, sender, &mut output);
                }
            }
        }

        output
    }

    /// Dispatch one trigger. Failures become notices; they never escape the
    /// tick.
    fn route(
        &mut self,
        event: &TriggerEvent,
        sender: &mut dyn MessageSender,
        output: &mut CoordinatorOutput,
    ) {
        match self.dispatcher.dispatch(event, &self.session, sender) {
            Ok(DispatchOutcome::Sent(record)) => {
                log::info!("{} alert sent to {}", record.cause, record.number);
                output.alerts.push(record);
            }
            Ok(DispatchOutcome::SosDisabled) => {
                log::debug!("{} trigger suppressed: SOS disabled", event.source.kind());
            }
            Ok(DispatchOutcome::Debounced) => {
                log::debug!("{} trigger debounced", event.source.kind());
            }
            Err(e) => {
                output
                    .notices
                    .push(format!("Alert not sent ({}): {}", event.source.kind(), e));
            }
        }
    }
}
