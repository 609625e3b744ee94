use super::{CmdList, Command, DeviceError, GpuContext, GpuDevice, MemBlock, MemBlockFlags};

#[derive(Debug, Copy, Clone)]
struct Chunk {
    block: MemBlock,
    capacity: u32,
}

/// Command buffer backed by one or more CPU-written memory chunks.
///
/// Commands never straddle chunks; when the current chunk is full the next
/// one is used, and a new chunk is allocated if none is left. Chunks are kept
/// for the lifetime of the buffer and reused after [`CmdBuf::clear`].
#[derive(Debug)]
pub struct CmdBuf {
    chunks: Vec<Chunk>,
    chunk_size: u32,
    current: usize,
    offset: u32,
    commands: Vec<Command>,
}

impl CmdBuf {
    /// Creates a command buffer with one chunk of `chunk_size` bytes.
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        chunk_size: u32,
    ) -> Result<Self, DeviceError> {
        let (block, capacity) = gpu.create_block(chunk_size, MemBlockFlags::STREAMING)?;
        Ok(Self {
            chunks: vec![Chunk { block, capacity }],
            chunk_size: capacity,
            current: 0,
            offset: 0,
            commands: Vec::new(),
        })
    }

    /// Discards recorded commands and rewinds to the first chunk.
    ///
    /// The caller must know that lists finished from this buffer are no
    /// longer executing.
    pub fn clear(&mut self) {
        self.current = 0;
        self.offset = 0;
        self.commands.clear();
    }

    /// Records `cmd`, allocating another chunk if the remaining memory is too small.
    pub fn push<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
        cmd: Command,
    ) -> Result<(), DeviceError> {
        let need = cmd.footprint();
        if self.offset + need > self.chunks[self.current].capacity {
            self.current += 1;
            self.offset = 0;
            if self.current == self.chunks.len() || self.chunks[self.current].capacity < need {
                let (block, capacity) =
                    gpu.create_block(self.chunk_size.max(need), MemBlockFlags::STREAMING)?;
                log::debug!(
                    "command buffer grew to {} chunks ({} bytes)",
                    self.chunks.len() + 1,
                    self.capacity() + capacity
                );
                self.chunks.insert(self.current, Chunk { block, capacity });
            }
        }
        self.offset += need;
        self.commands.push(cmd);
        Ok(())
    }

    /// Closes the commands recorded since the previous finish into a list.
    ///
    /// Their memory stays reserved until the next [`CmdBuf::clear`].
    pub fn finish_list(&mut self) -> CmdList {
        CmdList::new(std::mem::take(&mut self.commands))
    }

    /// Total bytes of backing memory.
    pub fn capacity(&self) -> u32 {
        self.chunks.iter().map(|c| c.capacity).sum()
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Releases every chunk. The queue must be idle.
    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        for chunk in self.chunks {
            gpu.destroy_block(chunk.block)?;
        }
        Ok(())
    }
}

/// Short-lived pairing of a command buffer with the context it allocates from.
pub struct Encoder<'a, D: GpuDevice> {
    gpu: &'a mut GpuContext<D>,
    buf: &'a mut CmdBuf,
}

impl<'a, D: GpuDevice> Encoder<'a, D> {
    #[inline]
    pub fn new(gpu: &'a mut GpuContext<D>, buf: &'a mut CmdBuf) -> Self {
        Self { gpu, buf }
    }

    #[inline]
    pub fn push(&mut self, cmd: Command) -> Result<(), DeviceError> {
        self.buf.push(self.gpu, cmd)
    }

    #[inline]
    pub fn gpu(&mut self) -> &mut GpuContext<D> {
        self.gpu
    }

    /// Finishes the pending commands and submits them to the queue.
    pub fn submit(&mut self) -> Result<(), DeviceError> {
        let list = self.buf.finish_list();
        self.gpu.submit(&list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessDevice;

    #[test]
    fn grows_by_chunks_when_full() {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let mut buf = CmdBuf::create(&mut gpu, 0x1000).unwrap();
        assert_eq!(buf.chunk_count(), 1);

        // Two 4-byte commands per iteration fill the first chunk exactly.
        for _ in 0..(0x1000 / 8) {
            buf.push(&mut gpu, Command::DiscardDepthStencil).unwrap();
            buf.push(&mut gpu, Command::DiscardDepthStencil).unwrap();
        }
        assert_eq!(buf.chunk_count(), 1);

        buf.push(&mut gpu, Command::DiscardDepthStencil).unwrap();
        assert_eq!(buf.chunk_count(), 2);
        assert_eq!(buf.capacity(), 0x2000);
    }

    #[test]
    fn clear_reuses_existing_chunks() {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let mut buf = CmdBuf::create(&mut gpu, 0x1000).unwrap();
        for _ in 0..2000 {
            buf.push(&mut gpu, Command::DiscardDepthStencil).unwrap();
        }
        let chunks = buf.chunk_count();
        buf.clear();
        for _ in 0..2000 {
            buf.push(&mut gpu, Command::DiscardDepthStencil).unwrap();
        }
        assert_eq!(buf.chunk_count(), chunks);
    }

    #[test]
    fn finish_list_takes_pending_commands() {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let mut buf = CmdBuf::create(&mut gpu, 0x1000).unwrap();
        buf.push(&mut gpu, Command::DiscardDepthStencil).unwrap();
        assert_eq!(buf.finish_list().len(), 1);
        assert!(buf.finish_list().is_empty());
    }
}
