use crate::device::{CmdBuf, DeviceError, GpuContext, GpuDevice};

use super::DynamicBuffer;

/// Resources owned by one swapchain slot.
///
/// A slot is only written after it has been acquired again, at which point
/// the GPU has finished the frame previously recorded into it.
#[derive(Debug)]
pub struct FrameSlot {
    pub cmdbuf: CmdBuf,
    pub vertices: DynamicBuffer,
    pub indices: DynamicBuffer,
}

impl FrameSlot {
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        cmd_mem_size: u32,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            cmdbuf: CmdBuf::create(gpu, cmd_mem_size)?,
            vertices: DynamicBuffer::new(),
            indices: DynamicBuffer::new(),
        })
    }

    #[inline]
    pub fn reallocations(&self) -> u32 {
        self.vertices.reallocations() + self.indices.reallocations()
    }

    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        self.cmdbuf.destroy(gpu)?;
        self.vertices.destroy(gpu)?;
        self.indices.destroy(gpu)
    }
}
