//! File-backed stands-ins for the platform event sources.
//!
//! Each feed is a line-oriented trace file under one directory: accelerometer
//! samples, finalized speech transcripts, and GPS fixes. Attaching a feed is
//! the equivalent of registering a platform listener; detaching unregisters.

use std::io;
use std::path::{Path, PathBuf};

use super::model::{AccelSample, GeoPoint};
use super::speech::SpeechControl;
use super::trace::{self, LineTailer};

pub const ACCEL_LOG: &str = "accel.log";
pub const SPEECH_LOG: &str = "speech.log";
pub const GPS_LOG: &str = "gps.log";

/// Per-tick batches drained from the feeds.
#[derive(Debug, Default)]
pub struct FeedBatch {
    pub samples: Vec<AccelSample>,
    pub transcripts: Vec<String>,
    pub fixes: Vec<GeoPoint>,
}

impl FeedBatch {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.transcripts.is_empty() && self.fixes.is_empty()
    }
}

/// Tails the three trace feeds of a trace directory.
pub struct FeedWatcher {
    dir: PathBuf,
    accel: Option<LineTailer>,
    speech: Option<LineTailer>,
    gps: Option<LineTailer>,
}

impl FeedWatcher {
    /// Attach to whichever trace files exist under `dir`.
    /// Returns status messages, one per feed.
    pub fn attach(dir: &Path) -> (Self, Vec<String>) {
        let mut messages = Vec::new();

        let mut open = |name: &str| -> Option<LineTailer> {
            let path = dir.join(name);
            match LineTailer::open(&path) {
                Ok(tailer) => {
                    messages.push(format!("Attached to {name}"));
                    Some(tailer)
                }
                Err(e) => {
                    messages.push(format!("No {name} feed: {e}"));
                    None
                }
            }
        };

        let accel = open(ACCEL_LOG);
        let speech = open(SPEECH_LOG);
        let gps = open(GPS_LOG);

        (
            Self {
                dir: dir.to_path_buf(),
                accel,
                speech,
                gps,
            },
            messages,
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Poll all attached feeds once. A read error on one feed is logged and
    /// does not stop the others.
    pub fn poll(&mut self) -> FeedBatch {
        let mut batch = FeedBatch::default();

        if let Some(lines) = read_feed(&mut self.accel, ACCEL_LOG) {
            batch.samples = lines
                .iter()
                .filter_map(|line| trace::parse_accel_line(line))
                .map(|record| record.sample)
                .collect();
        }

        if let Some(lines) = read_feed(&mut self.speech, SPEECH_LOG) {
            batch.transcripts = lines
                .into_iter()
                .filter(|line| !line.trim().is_empty())
                .collect();
        }

        if let Some(lines) = read_feed(&mut self.gps, GPS_LOG) {
            batch.fixes = lines
                .iter()
                .filter_map(|line| trace::parse_fix_line(line))
                .map(|record| record.point)
                .collect();
        }

        batch
    }

    /// Unregister from every feed.
    pub fn detach(&mut self) {
        self.accel = None;
        self.speech = None;
        self.gps = None;
    }

    /// Re-read every attached feed from the start.
    pub fn rewind_all(&mut self) -> io::Result<()> {
        for tailer in [&mut self.accel, &mut self.speech, &mut self.gps]
            .into_iter()
            .flatten()
        {
            tailer.rewind()?;
        }
        Ok(())
    }
}

fn read_feed(slot: &mut Option<LineTailer>, name: &str) -> Option<Vec<String>> {
    let tailer = slot.as_mut()?;
    match tailer.read_new_lines() {
        Ok(lines) => Some(lines),
        Err(e) => {
            log::warn!("Error reading {name}: {e}");
            None
        }
    }
}

/// The speech feed doubles as the recognizer session: starting a session
/// attaches the transcript tailer, stopping it detaches.
impl SpeechControl for FeedWatcher {
    fn start_listening(&mut self) {
        if self.speech.is_none() {
            match LineTailer::open(self.dir.join(SPEECH_LOG)) {
                Ok(tailer) => self.speech = Some(tailer),
                Err(e) => log::warn!("Cannot open {SPEECH_LOG}: {e}"),
            }
        }
    }

    fn stop_listening(&mut self) {
        self.speech = None;
    }
}
