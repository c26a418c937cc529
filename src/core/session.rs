use super::model::{Contact, GeoPoint};

/// Session-scoped user state: the SOS and voice-automation toggles, the
/// selected contact, and the most recent GPS fix.
///
/// Mutated only through the named setters; there is exactly one owner (the
/// coordinator), so no locking is needed.
#[derive(Debug, Default)]
pub struct SessionState {
    sos_enabled: bool,
    voice_automation: bool,
    contact: Option<Contact>,
    last_fix: Option<GeoPoint>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sos_enabled(&self) -> bool {
        self.sos_enabled
    }

    pub fn set_sos_enabled(&mut self, enabled: bool) {
        self.sos_enabled = enabled;
    }

    pub fn voice_automation(&self) -> bool {
        self.voice_automation
    }

    pub fn set_voice_automation(&mut self, enabled: bool) {
        self.voice_automation = enabled;
    }

    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    pub fn set_contact(&mut self, contact: Option<Contact>) {
        self.contact = contact;
    }

    pub fn last_fix(&self) -> Option<GeoPoint> {
        self.last_fix
    }

    /// Record the newest fix. Returns true when it is the first fix of the
    /// session (for run-once-on-first-fix hooks).
    pub fn record_fix(&mut self, fix: GeoPoint) -> bool {
        let first = self.last_fix.is_none();
        self.last_fix = Some(fix);
        first
    }
}
