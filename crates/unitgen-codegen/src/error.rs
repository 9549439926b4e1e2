use std::path::PathBuf;

use thiserror::Error;
use unitgen_ir::ConvertError;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("invalid Go package name '{0}': expected a lower-case identifier that is not a keyword")]
    InvalidPackage(String),

    #[error("invalid file stem '{0}': expected a plain file name without extension or separators")]
    InvalidStem(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
