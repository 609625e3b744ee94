use thiserror::Error;

use super::MemBlock;

/// Errors reported by a [`GpuDevice`](super::GpuDevice) implementation.
///
/// On the target hardware most of these indicate a corrupt build or a logic
/// error in the caller; they are fatal for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("memory block size {size:#x} is not a multiple of {alignment:#x}")]
    UnalignedBlockSize { size: u32, alignment: u32 },

    #[error("offset {offset:#x} is not aligned to {alignment:#x}")]
    Misaligned { offset: u32, alignment: u32 },

    #[error("memory block {0:?} was destroyed or replaced")]
    StaleBlock(MemBlock),

    #[error("memory block {0:?} is still referenced by queued work")]
    BlockInUse(MemBlock),

    #[error("range {offset:#x}+{size:#x} exceeds block {block:?} of {capacity:#x} bytes")]
    OutOfBounds {
        block: MemBlock,
        offset: u32,
        size: u32,
        capacity: u32,
    },

    #[error("block {0:?} is not CPU visible")]
    NotCpuVisible(MemBlock),

    #[error("unknown {0} handle")]
    UnknownHandle(&'static str),

    #[error("swapchain needs at least one image")]
    EmptySwapchain,

    #[error("slot {slot} was not acquired before present")]
    NotAcquired { slot: u32 },

    #[error("{what} of {count} elements does not fit a 32-bit byte size")]
    SizeOverflow { what: &'static str, count: usize },

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
