use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the simulator and its window host.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("unknown policy '{0}' (expected cautious, risky or timid)")]
    UnknownPolicy(String),

    #[error("invalid argument {flag}: {reason}")]
    InvalidArgument { flag: String, reason: String },

    #[error("failed to read font file {path}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {0} does not contain a usable font")]
    FontParse(PathBuf),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixel surface error: {0}")]
    Surface(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, SimulatorError>;
