//! Tab-separated text export of a captured window.
//!
//! ```text
//! # DAQ capture - 20250821_083605
//! # Fs=1000 Hz, Duration=10 s, Device=Dev4/ai0
//! # Time[s]	Amplitude[V]
//! 0.000000	0.012345
//! 0.001000	0.013001
//! ```

use std::io::{self, BufRead, Write};

use crate::{Channel, SampleWindow, SignalError};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TextFormatError {
    #[display("I/O error: {_0}")]
    #[from]
    Io(io::Error),
    #[display("line {line_number}: cannot parse {line:?} as a time/amplitude pair")]
    InvalidRow { line_number: usize, line: String },
    #[display("sample rate is neither in the header nor derivable from the time column")]
    MissingSampleRate,
    #[display("{_0}")]
    #[from]
    Window(SignalError),
}

/// Metadata written above the sample rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureHeader {
    /// Free-form capture time, e.g. `20250821_083605`.
    pub timestamp: String,
    pub device: String,
}

/// A window read back from a text export.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCapture {
    /// Present when the export carried the standard header.
    pub header: Option<CaptureHeader>,
    pub window: SampleWindow,
}

/// Writes `window` with a commented header and one `time\tvalue` row per sample.
pub fn write_capture<W>(
    mut writer: W,
    header: &CaptureHeader,
    window: &SampleWindow,
) -> io::Result<()>
where
    W: Write,
{
    writeln!(writer, "# DAQ capture - {}", header.timestamp)?;
    writeln!(
        writer,
        "# Fs={} Hz, Duration={} s, Device={}",
        window.sample_rate(),
        window.duration(),
        header.device
    )?;
    writeln!(writer, "# Time[s]\tAmplitude[{}]", window.channel().unit)?;
    for (t, value) in window.time_axis().zip(window.samples()) {
        writeln!(writer, "{t:.6}\t{value:.6}")?;
    }
    writer.flush()
}

/// Reads an export produced by [`write_capture`] (or any two-column
/// tab/whitespace-separated file with `#` comments).
///
/// The sample rate comes from the `Fs=` header field when present, otherwise
/// from the spacing of the first two time stamps.
pub fn read_capture<R>(reader: R, label: &str) -> Result<TextCapture, TextFormatError>
where
    R: BufRead,
{
    let mut timestamp = None;
    let mut device = None;
    let mut sample_rate = None;
    let mut unit = None;
    let mut times = vec![];
    let mut samples = vec![];

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            if let Some(ts) = comment.strip_prefix("DAQ capture - ") {
                timestamp = Some(ts.to_owned());
            } else if comment.starts_with("Fs=") {
                for field in comment.split(',').map(str::trim) {
                    if let Some(fs) = field.strip_prefix("Fs=") {
                        sample_rate = fs.trim_end_matches("Hz").trim().parse::<f64>().ok();
                    } else if let Some(name) = field.strip_prefix("Device=") {
                        device = Some(name.to_owned());
                    }
                }
            } else if let Some((_, rest)) = comment.split_once("Amplitude[") {
                unit = rest.split_once(']').map(|(unit, _)| unit.to_owned());
            }
            continue;
        }

        let mut fields = line.split_whitespace().map(str::parse::<f64>);
        let (Some(Ok(t)), Some(Ok(value)), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(TextFormatError::InvalidRow {
                line_number: index + 1,
                line: line.to_owned(),
            });
        };
        times.push(t);
        samples.push(value);
    }

    let sample_rate = match (sample_rate, times.as_slice()) {
        (Some(fs), _) => fs,
        (None, [t0, t1, ..]) if t1 > t0 => 1.0 / (t1 - t0),
        (None, _) => return Err(TextFormatError::MissingSampleRate),
    };

    let header = timestamp.map(|timestamp| CaptureHeader {
        timestamp,
        device: device.unwrap_or_default(),
    });
    let channel = Channel::new(label, unit.unwrap_or_else(|| "V".to_owned()));
    let window = SampleWindow::new(channel, sample_rate, samples)?;
    Ok(TextCapture { header, window })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> CaptureHeader {
        CaptureHeader {
            timestamp: "20250821_083605".to_owned(),
            device: "Dev4/ai0".to_owned(),
        }
    }

    #[test]
    fn test_written_layout() {
        let window =
            SampleWindow::new(Channel::new("DAQ", "V"), 1000.0, vec![0.5, -0.25]).unwrap();
        let mut out = vec![];
        write_capture(&mut out, &header(), &window).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# DAQ capture - 20250821_083605\n\
             # Fs=1000 Hz, Duration=0.002 s, Device=Dev4/ai0\n\
             # Time[s]\tAmplitude[V]\n\
             0.000000\t0.500000\n\
             0.001000\t-0.250000\n"
        );
    }

    #[test]
    fn test_read_back_written_capture() {
        let window = SampleWindow::new(
            Channel::new("DAQ", "V"),
            250.0,
            vec![0.1, 0.2, -0.3, 0.45, 1.0],
        )
        .unwrap();
        let mut out = vec![];
        write_capture(&mut out, &header(), &window).unwrap();

        let capture = read_capture(out.as_slice(), "DAQ").unwrap();
        assert_eq!(capture.header, Some(header()));
        assert_eq!(capture.window, window);
    }

    #[test]
    fn test_sample_rate_from_time_column() {
        let text = "0.00\t1.0\n0.01\t2.0\n0.02\t3.0\n";
        let capture = read_capture(text.as_bytes(), "sig").unwrap();
        assert!(capture.header.is_none());
        assert!((capture.window.sample_rate() - 100.0).abs() < 1e-9);
        assert_eq!(capture.window.channel().unit, "V");
        assert_eq!(capture.window.samples(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_invalid_rows() {
        let err = read_capture("0.0\t1.0\n0.1 oops\n".as_bytes(), "sig").unwrap_err();
        assert!(matches!(
            err,
            TextFormatError::InvalidRow { line_number: 2, .. }
        ));
        let err = read_capture("0.0\t1.0\t2.0\n".as_bytes(), "sig").unwrap_err();
        assert!(matches!(err, TextFormatError::InvalidRow { .. }));
    }

    #[test]
    fn test_missing_sample_rate() {
        let err = read_capture("0.0\t1.0\n".as_bytes(), "sig").unwrap_err();
        assert!(matches!(err, TextFormatError::MissingSampleRate));
    }
}
