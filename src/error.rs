use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the footprint library index
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("footprint path not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
