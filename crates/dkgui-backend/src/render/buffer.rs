use crate::device::{BufferRange, DeviceError, GpuContext, GpuDevice, MemBlock, MemBlockFlags, align};

/// Grow-only streaming buffer for per-frame geometry.
///
/// When a frame needs more room than the current block, the block is
/// replaced wholesale by one of `align(max(2 * required, min_size))` bytes.
/// The doubling keeps the number of replacements logarithmic in the peak
/// size.
#[derive(Debug, Default)]
pub struct DynamicBuffer {
    block: Option<MemBlock>,
    capacity: u32,
    reallocations: u32,
}

impl DynamicBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes room for `required` bytes. Returns whether the block was replaced.
    ///
    /// Replacement waits for the queue to go idle first, since the old block
    /// may still be read by submitted work.
    pub fn ensure<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
        required: u32,
        min_size: u32,
    ) -> Result<bool, DeviceError> {
        if self.block.is_some() && required <= self.capacity {
            return Ok(false);
        }

        let size = align(
            required.saturating_mul(2).max(min_size),
            gpu.limits().memblock_alignment,
        );
        if let Some(old) = self.block.take() {
            gpu.wait_idle()?;
            gpu.destroy_block(old)?;
        }
        let (block, capacity) = gpu.create_block(size, MemBlockFlags::STREAMING)?;
        log::debug!(
            "dynamic buffer grown: {} -> {} bytes ({} needed)",
            self.capacity,
            capacity,
            required
        );

        self.block = Some(block);
        self.capacity = capacity;
        self.reallocations += 1;
        Ok(true)
    }

    /// Copies `bytes` at `offset`. The buffer must have been sized by `ensure`.
    pub fn write<D: GpuDevice>(
        &self,
        gpu: &mut GpuContext<D>,
        offset: u32,
        bytes: &[u8],
    ) -> Result<(), DeviceError> {
        let block = self.block.ok_or(DeviceError::UnknownHandle("dynamic buffer"))?;
        gpu.write_block(block, offset, bytes)
    }

    /// The whole block, if one has been allocated.
    #[inline]
    pub fn range(&self) -> Option<BufferRange> {
        self.block.map(|b| BufferRange::whole(b, self.capacity))
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn reallocations(&self) -> u32 {
        self.reallocations
    }

    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        match self.block {
            Some(block) => gpu.destroy_block(block),
            None => Ok(()),
        }
    }
}
