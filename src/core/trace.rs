use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::model::{AccelSample, GeoPoint};

/// Tails a text file: opens at the current end and returns only lines
/// appended afterwards.
pub struct LineTailer {
    file: File,
    position: u64,
    path: PathBuf,
}

impl LineTailer {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)?;
        let metadata = file.metadata()?;
        let position = metadata.len();
        Ok(Self {
            file,
            position,
            path: path_ref.to_path_buf(),
        })
    }

    pub fn read_new_lines(&mut self) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();

        self.file.seek(SeekFrom::Start(self.position))?;
        let mut reader = BufReader::new(&self.file);
        let mut buffer = String::new();

        loop {
            buffer.clear();
            let bytes_read = reader.read_line(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            self.position += bytes_read as u64;
            let line = buffer.trim_end_matches(&['\r', '\n'][..]).to_string();
            lines.push(line);
        }

        Ok(lines)
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        self.position = 0;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One timestamped accelerometer record from a trace file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelRecord {
    /// Offset from the start of the trace.
    pub offset: Duration,
    pub sample: AccelSample,
}

/// One timestamped GPS record from a trace file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixRecord {
    pub offset: Duration,
    pub point: GeoPoint,
}

/// Parse an accelerometer trace line: `millis,x,y,z`.
pub fn parse_accel_line(line: &str) -> Option<AccelRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let parts: Vec<_> = trimmed.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return None;
    }

    let millis: u64 = parts[0].parse().ok()?;
    let x: f32 = parts[1].parse().ok()?;
    let y: f32 = parts[2].parse().ok()?;
    let z: f32 = parts[3].parse().ok()?;

    Some(AccelRecord {
        offset: Duration::from_millis(millis),
        sample: AccelSample::new(x, y, z),
    })
}

/// Parse a GPS trace line: `millis,lat,lon`.
pub fn parse_fix_line(line: &str) -> Option<FixRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let parts: Vec<_> = trimmed.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }

    let millis: u64 = parts[0].parse().ok()?;
    let lat: f64 = parts[1].parse().ok()?;
    let lon: f64 = parts[2].parse().ok()?;

    Some(FixRecord {
        offset: Duration::from_millis(millis),
        point: GeoPoint::new(lat, lon),
    })
}

/// Read a whole accelerometer trace, for replay.
pub fn read_full_accel(path: impl AsRef<Path>) -> io::Result<Vec<AccelRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for line_result in reader.lines() {
        let line = line_result?;
        if let Some(record) = parse_accel_line(&line) {
            records.push(record);
        }
    }

    Ok(records)
}
