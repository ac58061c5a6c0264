use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::collect::AssetInfo;
use crate::size_string::make_best_size_string;

pub const REPORT_FILE_NAME: &str = "AssetInvestigatorReport.txt";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("the empty list can not be exported")]
    EmptyList,

    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Default report location inside `project_dir`.
pub fn default_report_path(project_dir: impl AsRef<Path>) -> PathBuf {
    project_dir.as_ref().join(REPORT_FILE_NAME)
}

/// Writes one `{path}=> {memory size}` line per asset, replacing any existing file.
pub fn export_report(assets: &[AssetInfo], path: impl AsRef<Path>) -> Result<(), ReportError> {
    if assets.is_empty() {
        return Err(ReportError::EmptyList);
    }

    let path = path.as_ref();
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);

    for asset in assets {
        writeln!(
            writer,
            "{}=> {}",
            asset.path,
            make_best_size_string(asset.size.memory, true)
        )
        .map_err(io_err)?;
    }

    writer.flush().map_err(io_err)?;

    info!(path = %path.display(), assets = assets.len(), "exported report");

    Ok(())
}
