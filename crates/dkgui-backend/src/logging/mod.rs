//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only uses the `log`
//! facade; hosts call [`init_logging`] early in `main`.

mod init;

pub use init::{LoggingConfig, init_logging};
