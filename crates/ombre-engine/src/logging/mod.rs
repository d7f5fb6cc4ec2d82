//! Logging setup.
//!
//! Library code only uses the `log` macros; binaries call [`init_logging`]
//! once to install `env_logger` as the backend.

mod init;

pub use init::{init_logging, LoggingConfig};
