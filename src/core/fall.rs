// Fall detection from raw accelerometer samples.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::debounce::Debounce;
use super::model::{AccelSample, TriggerEvent, TriggerSource};

/// Fall detection configuration - persisted in settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallConfig {
    /// Net magnitude (gravity removed) above which a sample counts as a fall.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Minimum interval between two emitted fall triggers.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_threshold() -> f32 {
    5.0
}

fn default_debounce_ms() -> u64 {
    2000
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Turns the sample stream into discrete fall triggers.
///
/// Pure in (sample, debounce state): no side effects besides advancing the
/// last-trigger instant. The first over-threshold sample always fires.
pub struct FallDetector {
    config: FallConfig,
    debounce: Debounce,
}

impl FallDetector {
    pub fn new(config: FallConfig) -> Self {
        let window = Duration::from_millis(config.debounce_ms);
        Self {
            config,
            debounce: Debounce::new(window),
        }
    }

    pub fn process(&mut self, sample: &AccelSample) -> Option<TriggerEvent> {
        self.process_at(sample, Instant::now())
    }

    pub fn process_at(&mut self, sample: &AccelSample, now: Instant) -> Option<TriggerEvent> {
        let magnitude = sample.net_magnitude();
        if magnitude <= self.config.threshold {
            return None;
        }
        if !self.debounce.try_fire(now) {
            return None;
        }
        Some(TriggerEvent {
            source: TriggerSource::Fall { magnitude },
            at: now,
        })
    }
}
