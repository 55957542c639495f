//! Logging utilities.
//!
//! Centralizes logger initialization. Engine code logs through the `log`
//! facade only; `env_logger` is installed once by the binary.

mod init;

pub use init::{init_logging, LoggingConfig};
