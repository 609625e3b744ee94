use std::path::PathBuf;

use thiserror::Error;

use crate::device::DeviceError;

/// Startup failures while loading shader binaries.
///
/// Shader binaries are build artifacts bundled with the application, so any
/// of these means a broken bundle rather than a runtime condition.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader binary {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader binary {0} is empty")]
    Empty(String),

    #[error("code memory exhausted: {needed:#x} bytes needed, budget is {budget:#x}")]
    BudgetExceeded { needed: u32, budget: u32 },

    #[error("code memory size {size:#x} is not a multiple of {alignment:#x}")]
    UnalignedBudget { size: u32, alignment: u32 },

    #[error(transparent)]
    Device(#[from] DeviceError),
}
