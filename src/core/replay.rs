use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use super::model::AccelSample;
use super::trace::{self, AccelRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Replays a recorded accelerometer trace against the wall clock.
///
/// Each `tick` advances simulated time by the elapsed real time (scaled by
/// the playback speed) and emits every record that became due. Feeding the
/// emitted samples into the coordinator reproduces an incident offline.
pub struct TraceReplay {
    records: Vec<AccelRecord>,
    cursor: usize,
    state: PlaybackState,
    speed: f64,
    sim_time: Duration,
    last_update: Instant,
}

impl TraceReplay {
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let records = trace::read_full_accel(path)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<AccelRecord>) -> Self {
        let start = records.first().map_or(Duration::ZERO, |r| r.offset);
        Self {
            records,
            cursor: 0,
            state: PlaybackState::Paused,
            speed: 1.0,
            sim_time: start,
            last_update: Instant::now(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn set_state(&mut self, state: PlaybackState) {
        // Reset the wall-clock anchor so a resume doesn't jump forward
        self.last_update = Instant::now();
        self.state = state;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Trace length from first to last record.
    pub fn duration(&self) -> Duration {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last.offset.saturating_sub(first.offset),
            _ => Duration::ZERO,
        }
    }

    /// Jump to an offset from the start of the trace.
    pub fn seek(&mut self, offset: Duration) {
        let start = self.records.first().map_or(Duration::ZERO, |r| r.offset);
        self.sim_time = start + offset;
        self.cursor = self
            .records
            .iter()
            .position(|r| r.offset >= self.sim_time)
            .unwrap_or(self.records.len());
        self.last_update = Instant::now();
    }

    pub fn finished(&self) -> bool {
        self.cursor >= self.records.len()
    }

    /// Advance simulated time and emit the records that became due.
    pub fn tick(&mut self) -> Vec<AccelSample> {
        let now = Instant::now();
        let elapsed_wall = now.duration_since(self.last_update);
        self.last_update = now;

        if self.state == PlaybackState::Paused {
            return Vec::new();
        }

        let elapsed_sim = Duration::from_secs_f64(elapsed_wall.as_secs_f64() * self.speed);
        self.sim_time += elapsed_sim;

        let mut due = Vec::new();
        while let Some(record) = self.records.get(self.cursor) {
            if record.offset <= self.sim_time {
                due.push(record.sample);
                self.cursor += 1;
            } else {
                break;
            }
        }
        due
    }
}
