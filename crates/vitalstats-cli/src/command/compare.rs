use std::path::PathBuf;

use crate::{report::Comparison, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// JSON reports written with `--output`
    #[arg(required = true, num_args = 2..)]
    reports: Vec<PathBuf>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let reports = arg
        .reports
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            let report = util::read_report_file(path)?;
            log::info!(
                "Loaded report of {} ({} channels) from {}",
                report.source,
                report.channels.len(),
                path.display()
            );
            Ok((name, report))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    println!("Comparison of {} reports", reports.len());
    println!("{}\n", "=".repeat(60));
    print!("{}", Comparison { reports: &reports });
    Ok(())
}
