//! Reader for WFDB records as distributed by PhysioNet.
//!
//! A record is a text header (`<name>.hea`) describing one or more signals and
//! the binary data file(s) holding their samples. Only format 16 is decoded:
//! little-endian two's-complement 16-bit samples, with the signals that share
//! a data file interleaved frame by frame.
//!
//! ```text
//! 0743 2 1000 933820
//! 0743.dat 16 19288.4144(-22050)/mV 16 0 -3357 0 0 ECG
//! 0743.dat 16 594.1943(-53203)/mmHg 16 0 12012 0 0 NIBP
//! ```
//!
//! Digital samples are converted with `(digital - baseline) / gain`.

use std::{
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use crate::{Channel, SampleWindow, SignalError};

/// Sample rate assumed when the record line omits it.
pub const DEFAULT_SAMPLE_RATE: f64 = 250.0;
/// ADC gain assumed when a signal line omits it or gives zero.
pub const DEFAULT_GAIN: f64 = 200.0;
/// Physical unit assumed when a signal line omits it.
pub const DEFAULT_UNITS: &str = "mV";

const FORMAT_16: u16 = 16;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum WfdbError {
    #[display("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("header has no record line")]
    MissingRecordLine,
    #[display("invalid record line: {line:?}")]
    InvalidRecordLine { line: String },
    #[display("invalid signal line {index}: {line:?}")]
    InvalidSignalLine { index: usize, line: String },
    #[display("header declares {declared} signals but describes {found}")]
    SignalCountMismatch { declared: usize, found: usize },
    #[display("unsupported storage format {format:?} (only format 16 is supported)")]
    UnsupportedFormat { format: String },
    #[display("requested {requested} frames but the record holds only {available}")]
    WindowExceedsRecord { requested: usize, available: usize },
    #[display("signal '{label}' not found in record")]
    UnknownSignal { label: String },
    #[from]
    Window(SignalError),
}

/// Parsed record header.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    /// Frames per second.
    pub sample_rate: f64,
    /// Total frames, if the header declares it.
    pub num_frames: Option<usize>,
    pub signals: Vec<SignalSpec>,
}

/// One signal line of a record header.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSpec {
    pub file_name: String,
    pub format: u16,
    /// Byte offset of the first sample within the data file.
    pub byte_offset: u64,
    /// ADC units per physical unit.
    pub gain: f64,
    /// Digital value corresponding to zero physical units.
    pub baseline: i32,
    pub units: String,
    pub adc_zero: i32,
    pub description: String,
}

impl SignalSpec {
    /// Converts a stored sample to physical units.
    #[must_use]
    pub fn to_physical(&self, digital: i16) -> f64 {
        (f64::from(digital) - f64::from(self.baseline)) / self.gain
    }

    /// Channel descriptor named after the signal description.
    #[must_use]
    pub fn channel(&self, index: usize) -> Channel {
        let label = if self.description.is_empty() {
            format!("sig{index}")
        } else {
            self.description.clone()
        };
        Channel::new(label, self.units.clone())
    }
}

impl Record {
    /// Reads and parses a header file.
    pub fn read_header<P>(path: P) -> Result<Self, WfdbError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WfdbError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse_header(&text)
    }

    /// Parses header text. Comment (`#`) and blank lines are skipped.
    pub fn parse_header(text: &str) -> Result<Self, WfdbError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let record_line = lines.next().ok_or(WfdbError::MissingRecordLine)?;
        let (name, declared, sample_rate, num_frames) = parse_record_line(record_line)
            .ok_or_else(|| WfdbError::InvalidRecordLine {
                line: record_line.to_owned(),
            })?;

        let signals = lines
            .take(declared)
            .enumerate()
            .map(|(index, line)| parse_signal_line(index, line))
            .collect::<Result<Vec<_>, _>>()?;
        if signals.len() != declared {
            return Err(WfdbError::SignalCountMismatch {
                declared,
                found: signals.len(),
            });
        }

        Ok(Self {
            name,
            sample_rate,
            num_frames,
            signals,
        })
    }

    /// Number of frames spanning `seconds` at the record's sample rate.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn frames_for_seconds(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate).max(0.0) as usize
    }

    /// Reads the first `frames` frames of every signal, in header order.
    ///
    /// Data files are resolved relative to `dir`. The window is never
    /// truncated: if the header or the data file holds fewer frames,
    /// [`WfdbError::WindowExceedsRecord`] is returned.
    pub fn read_window(&self, dir: &Path, frames: usize) -> Result<Vec<SampleWindow>, WfdbError> {
        if let Some(available) = self.num_frames
            && frames > available
        {
            return Err(WfdbError::WindowExceedsRecord {
                requested: frames,
                available,
            });
        }

        let mut columns = vec![Vec::new(); self.signals.len()];
        for (file_name, members) in self.file_groups() {
            let path = dir.join(file_name);
            let decoded = self.read_group(&path, &members, frames)?;
            for (member, column) in members.into_iter().zip(decoded) {
                columns[member] = column;
            }
        }

        log::debug!(
            "decoded {frames} frames of {} signals from record {}",
            self.signals.len(),
            self.name
        );

        self.signals
            .iter()
            .zip(columns)
            .enumerate()
            .map(|(index, (spec, samples))| {
                SampleWindow::new(spec.channel(index), self.sample_rate, samples)
                    .map_err(WfdbError::from)
            })
            .collect()
    }

    /// Index of the signal whose description equals `label` (ASCII case-insensitive).
    pub fn signal_index(&self, label: &str) -> Result<usize, WfdbError> {
        self.signals
            .iter()
            .position(|spec| spec.description.eq_ignore_ascii_case(label))
            .ok_or_else(|| WfdbError::UnknownSignal {
                label: label.to_owned(),
            })
    }

    /// Signals grouped by data file, in order of first appearance.
    fn file_groups(&self) -> Vec<(&str, Vec<usize>)> {
        let mut groups: Vec<(&str, Vec<usize>)> = vec![];
        for (index, spec) in self.signals.iter().enumerate() {
            match groups.iter().position(|(name, _)| *name == spec.file_name) {
                Some(pos) => groups[pos].1.push(index),
                None => groups.push((spec.file_name.as_str(), vec![index])),
            }
        }
        groups
    }

    fn read_group(
        &self,
        path: &Path,
        members: &[usize],
        frames: usize,
    ) -> Result<Vec<Vec<f64>>, WfdbError> {
        let io_error = |source| WfdbError::Io {
            path: path.to_owned(),
            source,
        };
        let specs = members.iter().map(|&i| &self.signals[i]).collect::<Vec<_>>();
        let offset = specs[0].byte_offset;
        let frame_bytes = 2 * specs.len();

        let file = File::open(path).map_err(io_error)?;
        let file_len = file.metadata().map_err(io_error)?.len();
        let available = usize::try_from(file_len.saturating_sub(offset)).unwrap_or(usize::MAX)
            / frame_bytes;
        if frames > available {
            return Err(WfdbError::WindowExceedsRecord {
                requested: frames,
                available,
            });
        }

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(offset)).map_err(io_error)?;

        let mut columns = vec![Vec::with_capacity(frames); specs.len()];
        let mut frame = vec![0_u8; frame_bytes];
        for _ in 0..frames {
            reader.read_exact(&mut frame).map_err(io_error)?;
            for ((spec, column), bytes) in specs
                .iter()
                .zip(&mut columns)
                .zip(frame.chunks_exact(2))
            {
                let digital = i16::from_le_bytes([bytes[0], bytes[1]]);
                column.push(spec.to_physical(digital));
            }
        }
        Ok(columns)
    }
}

/// `name[/segments] nsig [fs[/counter][(base)] [nsamp ...]]`
fn parse_record_line(line: &str) -> Option<(String, usize, f64, Option<usize>)> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    if name.contains('/') {
        // Multi-segment records are not supported.
        return None;
    }
    let num_signals = fields.next()?.parse().ok()?;
    let sample_rate = match fields.next() {
        Some(token) => {
            let rate = token.split(['/', '(']).next()?.parse::<f64>().ok()?;
            if rate > 0.0 { rate } else { DEFAULT_SAMPLE_RATE }
        }
        None => DEFAULT_SAMPLE_RATE,
    };
    let num_frames = match fields.next() {
        Some(token) => Some(token.parse::<usize>().ok()?).filter(|&n| n > 0),
        None => None,
    };
    Some((name.to_owned(), num_signals, sample_rate, num_frames))
}

/// `file format[+offset] gain[(baseline)][/units] adcres adczero initval checksum blocksize description`
fn parse_signal_line(index: usize, line: &str) -> Result<SignalSpec, WfdbError> {
    let invalid = || WfdbError::InvalidSignalLine {
        index,
        line: line.to_owned(),
    };
    let fields = line.split_whitespace().collect::<Vec<_>>();
    let [file_name, format_token, rest @ ..] = fields.as_slice() else {
        return Err(invalid());
    };

    let (format, byte_offset) = parse_format(format_token)?;

    let gain_token = rest.first().copied();
    let adc_zero = match rest.get(2) {
        Some(token) => token.parse::<i32>().map_err(|_| invalid())?,
        None => 0,
    };
    let (gain, baseline, units) = match gain_token {
        Some(token) => parse_gain(token, adc_zero).ok_or_else(invalid)?,
        None => (DEFAULT_GAIN, adc_zero, DEFAULT_UNITS.to_owned()),
    };
    let description = rest.get(6..).map(|words| words.join(" ")).unwrap_or_default();

    Ok(SignalSpec {
        file_name: (*file_name).to_owned(),
        format,
        byte_offset,
        gain,
        baseline,
        units,
        adc_zero,
        description,
    })
}

fn parse_format(token: &str) -> Result<(u16, u64), WfdbError> {
    let unsupported = || WfdbError::UnsupportedFormat {
        format: token.to_owned(),
    };
    // Samples-per-frame (`x`) and skew (`:`) modifiers change the data layout.
    if token.contains(['x', ':']) {
        return Err(unsupported());
    }
    let (format, offset) = match token.split_once('+') {
        Some((format, offset)) => (format, offset.parse::<u64>().map_err(|_| unsupported())?),
        None => (token, 0),
    };
    match format.parse::<u16>() {
        Ok(FORMAT_16) => Ok((FORMAT_16, offset)),
        _ => Err(unsupported()),
    }
}

/// `gain[(baseline)][/units]`
fn parse_gain(token: &str, adc_zero: i32) -> Option<(f64, i32, String)> {
    let (value, units) = match token.split_once('/') {
        Some((value, units)) => (value, units.to_owned()),
        None => (token, DEFAULT_UNITS.to_owned()),
    };
    let (gain, baseline) = match value.split_once('(') {
        Some((gain, baseline)) => (gain, baseline.strip_suffix(')')?.parse::<i32>().ok()?),
        None => (value, adc_zero),
    };
    let gain = gain.parse::<f64>().ok()?;
    let gain = if gain == 0.0 { DEFAULT_GAIN } else { gain };
    Some((gain, baseline, units))
}
