use super::align::align;
use super::{
    CmdList, DeviceError, DeviceLimits, GpuDevice, MemBlock, MemBlockDesc, MemBlockFlags, Queue,
    Swapchain,
};

/// Owns the root device and the single graphics queue.
///
/// All other GPU objects are created through this context and must be
/// destroyed before [`GpuContext::destroy`] hands the device back.
pub struct GpuContext<D: GpuDevice> {
    device: D,
    queue: Queue,
    limits: DeviceLimits,
}

impl<D: GpuDevice> GpuContext<D> {
    /// Takes ownership of `device` and creates the graphics queue.
    pub fn new(mut device: D) -> Result<Self, DeviceError> {
        let limits = device.limits();
        let queue = device.create_queue()?;
        log::debug!("graphics queue {:?} created", queue);
        Ok(Self { device, queue, limits })
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[inline]
    pub fn queue(&self) -> Queue {
        self.queue
    }

    #[inline]
    pub fn limits(&self) -> DeviceLimits {
        self.limits
    }

    /// Creates a memory block of at least `size` bytes.
    ///
    /// The size is rounded up to the device block alignment; the returned
    /// value is the actual capacity.
    pub fn create_block(
        &mut self,
        size: u32,
        flags: MemBlockFlags,
    ) -> Result<(MemBlock, u32), DeviceError> {
        let size = align(size.max(1), self.limits.memblock_alignment);
        let block = self.device.create_mem_block(&MemBlockDesc { size, flags })?;
        Ok((block, size))
    }

    #[inline]
    pub fn destroy_block(&mut self, block: MemBlock) -> Result<(), DeviceError> {
        self.device.destroy_mem_block(block)
    }

    /// Copies `bytes` into a CPU-visible block at `offset`.
    pub fn write_block(
        &mut self,
        block: MemBlock,
        offset: u32,
        bytes: &[u8],
    ) -> Result<(), DeviceError> {
        let mem = self.device.mem_block_cpu_mut(block)?;
        let start = offset as usize;
        let end = start + bytes.len();
        if end > mem.len() {
            return Err(DeviceError::OutOfBounds {
                block,
                offset,
                size: bytes.len() as u32,
                capacity: mem.len() as u32,
            });
        }
        mem[start..end].copy_from_slice(bytes);
        Ok(())
    }

    #[inline]
    pub fn submit(&mut self, list: &CmdList) -> Result<(), DeviceError> {
        self.device.submit_commands(self.queue, list)
    }

    #[inline]
    pub fn wait_idle(&mut self) -> Result<(), DeviceError> {
        self.device.wait_idle(self.queue)
    }

    #[inline]
    pub fn acquire(&mut self, swapchain: Swapchain) -> Result<u32, DeviceError> {
        self.device.acquire_image(self.queue, swapchain)
    }

    #[inline]
    pub fn present(&mut self, swapchain: Swapchain, slot: u32) -> Result<(), DeviceError> {
        self.device.present_image(self.queue, swapchain, slot)
    }

    /// Waits for the queue to drain, destroys it and returns the device.
    ///
    /// Every block and swapchain created through this context must already be
    /// destroyed; the device itself is released by dropping it.
    pub fn destroy(mut self) -> Result<D, DeviceError> {
        self.device.wait_idle(self.queue)?;
        self.device.destroy_queue(self.queue)?;
        Ok(self.device)
    }
}
