//! Speech-session supervision.
//!
//! Platform recognizers stop after every utterance: each batch of final
//! results, every error, and end-of-speech all terminate the session. To keep
//! listening continuously the session has to be started again after each of
//! those callbacks. That restart policy lives here, as an explicit state
//! machine, instead of being scattered across recognition callbacks.

/// External speech-recognition collaborator.
///
/// Both calls are fire-and-forget; the recognizer reports back through
/// terminal callbacks, delivered to [`SpeechSupervisor::handle`].
pub trait SpeechControl {
    fn start_listening(&mut self);
    fn stop_listening(&mut self);
}

/// Terminal callbacks of a recognition session. Each one ends the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechSignal {
    /// Finalized transcripts for the last utterance.
    Results(Vec<String>),
    /// Recognizer error code. Expected and recoverable.
    Error(i32),
    EndOfSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Listening,
    /// Between a terminal callback and the next `start_listening` call.
    Restarting,
}

/// Keeps a recognition session alive while voice automation is enabled.
pub struct SpeechSupervisor {
    phase: SessionPhase,
    automation: bool,
}

impl SpeechSupervisor {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            automation: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn automation(&self) -> bool {
        self.automation
    }

    /// Enable or disable voice automation, starting or stopping the session
    /// to match.
    pub fn set_automation(&mut self, enabled: bool, control: &mut dyn SpeechControl) {
        self.automation = enabled;
        if enabled {
            if self.phase == SessionPhase::Idle {
                control.start_listening();
                self.phase = SessionPhase::Listening;
            }
        } else {
            control.stop_listening();
            self.phase = SessionPhase::Idle;
        }
    }

    /// Process a terminal callback.
    ///
    /// Returns the finalized transcripts carried by a `Results` signal (empty
    /// for the other signals). While automation is on, every terminal signal
    /// restarts the session; errors are never surfaced past this point.
    pub fn handle(&mut self, signal: SpeechSignal, control: &mut dyn SpeechControl) -> Vec<String> {
        let transcripts = match signal {
            SpeechSignal::Results(transcripts) => transcripts,
            SpeechSignal::Error(code) => {
                log::debug!("speech session ended with error {code}, restarting");
                Vec::new()
            }
            SpeechSignal::EndOfSpeech => Vec::new(),
        };

        if self.automation {
            self.phase = SessionPhase::Restarting;
            control.start_listening();
            self.phase = SessionPhase::Listening;
        } else {
            self.phase = SessionPhase::Idle;
        }

        transcripts
    }
}

impl Default for SpeechSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingControl {
        starts: usize,
        stops: usize,
    }

    impl SpeechControl for RecordingControl {
        fn start_listening(&mut self) {
            self.starts += 1;
        }

        fn stop_listening(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_enabling_automation_starts_listening() {
        let mut control = RecordingControl::default();
        let mut supervisor = SpeechSupervisor::new();

        supervisor.set_automation(true, &mut control);
        assert_eq!(control.starts, 1);
        assert_eq!(supervisor.phase(), SessionPhase::Listening);
    }

    #[test]
    fn test_every_terminal_signal_restarts_while_enabled() {
        let mut control = RecordingControl::default();
        let mut supervisor = SpeechSupervisor::new();
        supervisor.set_automation(true, &mut control);

        supervisor.handle(SpeechSignal::EndOfSpeech, &mut control);
        supervisor.handle(SpeechSignal::Error(7), &mut control);
        supervisor.handle(SpeechSignal::Results(vec!["hi".to_string()]), &mut control);

        // 1 initial start + 3 restarts
        assert_eq!(control.starts, 4);
        assert_eq!(supervisor.phase(), SessionPhase::Listening);
    }

    #[test]
    fn test_results_are_passed_through() {
        let mut control = RecordingControl::default();
        let mut supervisor = SpeechSupervisor::new();
        supervisor.set_automation(true, &mut control);

        let transcripts = supervisor.handle(
            SpeechSignal::Results(vec!["I need help".to_string()]),
            &mut control,
        );
        assert_eq!(transcripts, vec!["I need help".to_string()]);
    }

    #[test]
    fn test_no_restart_while_disabled() {
        let mut control = RecordingControl::default();
        let mut supervisor = SpeechSupervisor::new();

        supervisor.handle(SpeechSignal::EndOfSpeech, &mut control);
        assert_eq!(control.starts, 0);
        assert_eq!(supervisor.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_disabling_automation_stops_the_session() {
        let mut control = RecordingControl::default();
        let mut supervisor = SpeechSupervisor::new();
        supervisor.set_automation(true, &mut control);

        supervisor.set_automation(false, &mut control);
        assert_eq!(control.stops, 1);
        assert_eq!(supervisor.phase(), SessionPhase::Idle);

        // Terminal callbacks arriving after teardown do not revive it
        supervisor.handle(SpeechSignal::EndOfSpeech, &mut control);
        assert_eq!(control.starts, 1);
    }
}
