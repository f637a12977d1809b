use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::report::AnalysisReport;

/// Destination of a JSON report: a file, or stdout when the path is `-`.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn is_stdout_path(path: &Path) -> bool {
        path.as_os_str() == "-"
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if Self::is_stdout_path(path) {
            return Ok(Output::Stdout {
                writer: io::stdout().lock(),
            });
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Pretty-prints `value` followed by a newline and flushes.
    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to finish writing {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Reads an analysis report previously written with `--output`.
pub fn read_report_file<P>(path: P) -> anyhow::Result<AnalysisReport>
where
    P: AsRef<Path>,
{
    read_json_file("report", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_is_stdout() {
        assert!(Output::is_stdout_path(Path::new("-")));
        assert!(!Output::is_stdout_path(Path::new("report.json")));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        let mut output = Output::create(&path).unwrap();
        output.write_json(&vec![1.5, -2.0]).unwrap();
        drop(output);

        let values: Vec<f64> = read_json_file("values", &path).unwrap();
        assert_eq!(values, vec![1.5, -2.0]);

        let err = read_json_file::<Vec<f64>, _>("values", dir.path().join("missing.json"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open values file"));
    }
}
