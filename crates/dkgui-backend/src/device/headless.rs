//! CPU reference implementation of [`GpuDevice`].
//!
//! Memory blocks live in host memory, commands are validated and applied as
//! they are submitted (uniform pushes and buffer-to-image copies write real
//! bytes), and every submitted list is kept for inspection. Work stays "in
//! flight" until the slot it was recorded for is acquired again or the queue
//! is waited on, which is when destroying a block it references becomes legal.

use std::collections::HashSet;

use super::align::{align, is_aligned};
use super::state::{IndexFormat, ShaderStage};
use super::{
    BufferRange, CmdList, Command, DeviceError, DeviceLimits, GpuDevice, Image, ImageFlags,
    ImageLayout, ImageLayoutDesc, MemBlock, MemBlockDesc, MemBlockFlags, Queue, Swapchain,
};

/// Limits of the console GPU the headless device stands in for.
pub const CONSOLE_LIMITS: DeviceLimits = DeviceLimits {
    memblock_alignment: 0x1000,
    shader_code_alignment: 0x100,
    shader_code_unusable_size: 0x100,
    uniform_buffer_alignment: 0x100,
    sampler_descriptor_alignment: 0x20,
    image_descriptor_alignment: 0x20,
};

const PITCH_ALIGNMENT: u32 = 64;
const ROW_ALIGNMENT: u32 = 8;
const RENDER_TARGET_ALIGNMENT: u32 = 0x20000;
const TEXTURE_ALIGNMENT: u32 = 0x200;

const SHADER_MAGIC: &[u8; 4] = b"DKSH";

#[derive(Debug)]
struct BlockData {
    flags: MemBlockFlags,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct BlockSlot {
    generation: u32,
    data: Option<BlockData>,
}

#[derive(Debug)]
struct SwapchainData {
    images: Vec<Image>,
    next: u32,
    acquired: Option<u32>,
}

/// Work submitted but not yet known to have completed.
#[derive(Debug)]
struct InFlight {
    slot: Option<u32>,
    blocks: HashSet<MemBlock>,
}

/// One submitted command list, as recorded by the headless device.
#[derive(Debug, Clone)]
pub struct Submission {
    pub queue: Queue,
    /// Swapchain slot acquired when the list was submitted.
    pub slot: Option<u32>,
    pub list: CmdList,
}

/// Bindings that persist on the queue between submissions.
#[derive(Debug, Default)]
struct QueueState {
    index_buffer: Option<(IndexFormat, BufferRange)>,
    vertex_buffer: Option<BufferRange>,
    sampler_count: u32,
    image_count: u32,
}

#[derive(Debug)]
pub struct HeadlessDevice {
    limits: DeviceLimits,
    blocks: Vec<BlockSlot>,
    free_ids: Vec<u32>,
    swapchains: Vec<Option<SwapchainData>>,
    queues: Vec<bool>,
    state: QueueState,
    in_flight: Vec<InFlight>,
    acquired: Option<u32>,
    submissions: Vec<Submission>,
    presented: Vec<u32>,
    idle_waits: u32,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::with_limits(CONSOLE_LIMITS)
    }

    pub fn with_limits(limits: DeviceLimits) -> Self {
        Self {
            limits,
            blocks: Vec::new(),
            free_ids: Vec::new(),
            swapchains: Vec::new(),
            queues: Vec::new(),
            state: QueueState::default(),
            in_flight: Vec::new(),
            acquired: None,
            submissions: Vec::new(),
            presented: Vec::new(),
            idle_waits: 0,
        }
    }

    /// A stand-in shader binary: the headless device never executes code.
    pub fn placeholder_shader(stage: ShaderStage, size: usize) -> Vec<u8> {
        let mut code = vec![0u8; size.max(8)];
        code[..4].copy_from_slice(SHADER_MAGIC);
        code[4] = match stage {
            ShaderStage::Vertex => 0,
            ShaderStage::Fragment => 4,
        };
        code
    }

    /// Every list submitted so far, oldest first.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Drains the submission log.
    pub fn take_submissions(&mut self) -> Vec<Submission> {
        std::mem::take(&mut self.submissions)
    }

    /// Iterates every command of every logged submission in order.
    pub fn submitted_commands(&self) -> impl Iterator<Item = &Command> {
        self.submissions.iter().flat_map(|s| s.list.commands())
    }

    /// Slots in the order they were presented.
    pub fn presented(&self) -> &[u32] {
        &self.presented
    }

    pub fn idle_waits(&self) -> u32 {
        self.idle_waits
    }

    pub fn live_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.data.is_some()).count()
    }

    pub fn live_swapchains(&self) -> usize {
        self.swapchains.iter().filter(|s| s.is_some()).count()
    }

    /// Raw contents of any live block, including GPU-only ones.
    pub fn block_bytes(&self, block: MemBlock) -> Option<&[u8]> {
        self.block_data(block).ok().map(|d| d.bytes.as_slice())
    }

    pub fn block_flags(&self, block: MemBlock) -> Option<MemBlockFlags> {
        self.block_data(block).ok().map(|d| d.flags)
    }

    fn block_data(&self, block: MemBlock) -> Result<&BlockData, DeviceError> {
        self.blocks
            .get(block.id as usize)
            .filter(|slot| slot.generation == block.generation)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(DeviceError::StaleBlock(block))
    }

    fn block_data_mut(&mut self, block: MemBlock) -> Result<&mut BlockData, DeviceError> {
        self.blocks
            .get_mut(block.id as usize)
            .filter(|slot| slot.generation == block.generation)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(DeviceError::StaleBlock(block))
    }

    fn check_range(&self, range: &BufferRange) -> Result<(), DeviceError> {
        let capacity = self.block_data(range.block)?.bytes.len() as u32;
        if range.end() > capacity {
            return Err(DeviceError::OutOfBounds {
                block: range.block,
                offset: range.offset,
                size: range.size,
                capacity,
            });
        }
        Ok(())
    }

    fn check_image(&self, image: &Image) -> Result<(), DeviceError> {
        if !is_aligned(image.offset, image.layout.alignment) {
            return Err(DeviceError::Misaligned {
                offset: image.offset,
                alignment: image.layout.alignment,
            });
        }
        self.check_range(&BufferRange::new(image.block, image.offset, image.layout.size))
    }

    fn check_queue(&self, queue: Queue) -> Result<(), DeviceError> {
        match self.queues.get(queue.0 as usize) {
            Some(true) => Ok(()),
            _ => Err(DeviceError::UnknownHandle("queue")),
        }
    }

    fn swapchain_mut(&mut self, swapchain: Swapchain) -> Result<&mut SwapchainData, DeviceError> {
        self.swapchains
            .get_mut(swapchain.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(DeviceError::UnknownHandle("swapchain"))
    }

    /// Validates and applies one command, adding the blocks it references to `touched`.
    fn execute(&mut self, cmd: &Command, touched: &mut HashSet<MemBlock>) -> Result<(), DeviceError> {
        match cmd {
            Command::BindRenderTargets { color, depth } => {
                self.check_image(color)?;
                touched.insert(color.block);
                if let Some(depth) = depth {
                    self.check_image(depth)?;
                    touched.insert(depth.block);
                }
            }
            Command::BindShaders(shaders) => {
                for shader in shaders {
                    let range = BufferRange::new(shader.block, shader.offset, shader.size);
                    self.check_range(&range)?;
                    touched.insert(shader.block);
                }
            }
            Command::BindUniformBuffer { range, .. } => {
                self.check_range(range)?;
                touched.insert(range.block);
            }
            Command::PushConstants { range, offset, data } => {
                self.check_range(range)?;
                if offset + data.len() as u32 > range.size {
                    return Err(DeviceError::InvalidCommand(format!(
                        "push of {} bytes at {offset} overflows uniform range of {}",
                        data.len(),
                        range.size
                    )));
                }
                let start = (range.offset + offset) as usize;
                let mem = &mut self.block_data_mut(range.block)?.bytes;
                mem[start..start + data.len()].copy_from_slice(data);
                touched.insert(range.block);
            }
            Command::BindVertexBuffer { range, .. } => {
                self.check_range(range)?;
                self.state.vertex_buffer = Some(*range);
                touched.insert(range.block);
            }
            Command::BindIndexBuffer { format, range } => {
                self.check_range(range)?;
                self.state.index_buffer = Some((*format, *range));
                touched.insert(range.block);
            }
            Command::BindSamplerDescriptorSet { range, count } => {
                self.check_range(range)?;
                self.state.sampler_count = *count;
                touched.insert(range.block);
            }
            Command::BindImageDescriptorSet { range, count } => {
                self.check_range(range)?;
                self.state.image_count = *count;
                touched.insert(range.block);
            }
            Command::BindTextures { textures, .. } => {
                for t in textures {
                    if t.image >= self.state.image_count || t.sampler >= self.state.sampler_count {
                        return Err(DeviceError::InvalidCommand(format!(
                            "texture binding {t:?} outside bound descriptor sets"
                        )));
                    }
                }
            }
            Command::DrawIndexed {
                index_count,
                first_index,
                ..
            } => {
                let Some((format, range)) = self.state.index_buffer else {
                    return Err(DeviceError::InvalidCommand("draw without index buffer".into()));
                };
                let Some(vertices) = self.state.vertex_buffer else {
                    return Err(DeviceError::InvalidCommand("draw without vertex buffer".into()));
                };
                // Re-validate: the bound buffers may have been replaced since binding.
                self.check_range(&range)?;
                self.check_range(&vertices)?;
                touched.insert(range.block);
                touched.insert(vertices.block);
                let available = range.size / format.size();
                if first_index + index_count > available {
                    return Err(DeviceError::InvalidCommand(format!(
                        "draw reads indices {first_index}..{} of {available}",
                        first_index + index_count
                    )));
                }
            }
            Command::CopyBufferToImage { src, dst, .. } => {
                self.check_range(src)?;
                self.check_image(dst)?;
                let len = src.size.min(dst.layout.size) as usize;
                let bytes = {
                    let from = &self.block_data(src.block)?.bytes;
                    from[src.offset as usize..src.offset as usize + len].to_vec()
                };
                let to = &mut self.block_data_mut(dst.block)?.bytes;
                let start = dst.offset as usize;
                to[start..start + len].copy_from_slice(&bytes);
                touched.insert(src.block);
                touched.insert(dst.block);
            }
            Command::SetViewports(_)
            | Command::SetScissors(_)
            | Command::ClearColor { .. }
            | Command::ClearDepthStencil { .. }
            | Command::DiscardDepthStencil
            | Command::BindRasterizerState(_)
            | Command::BindColorState(_)
            | Command::BindColorWriteState(_)
            | Command::BindBlendStates { .. }
            | Command::BindDepthStencilState(_)
            | Command::BindVertexAttribs(_)
            | Command::BindVertexBufferLayouts(_)
            | Command::Barrier(_) => {}
        }
        Ok(())
    }
}

impl GpuDevice for HeadlessDevice {
    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn create_mem_block(&mut self, desc: &MemBlockDesc) -> Result<MemBlock, DeviceError> {
        if desc.size == 0 || !is_aligned(desc.size, self.limits.memblock_alignment) {
            return Err(DeviceError::UnalignedBlockSize {
                size: desc.size,
                alignment: self.limits.memblock_alignment,
            });
        }
        let data = BlockData {
            flags: desc.flags,
            bytes: vec![0; desc.size as usize],
        };
        let id = match self.free_ids.pop() {
            Some(id) => id,
            None => {
                self.blocks.push(BlockSlot::default());
                (self.blocks.len() - 1) as u32
            }
        };
        let slot = &mut self.blocks[id as usize];
        slot.data = Some(data);
        Ok(MemBlock {
            id,
            generation: slot.generation,
        })
    }

    fn destroy_mem_block(&mut self, block: MemBlock) -> Result<(), DeviceError> {
        self.block_data(block)?;
        if self.in_flight.iter().any(|w| w.blocks.contains(&block)) {
            return Err(DeviceError::BlockInUse(block));
        }
        let slot = &mut self.blocks[block.id as usize];
        slot.data = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_ids.push(block.id);
        Ok(())
    }

    fn mem_block_size(&self, block: MemBlock) -> Result<u32, DeviceError> {
        Ok(self.block_data(block)?.bytes.len() as u32)
    }

    fn mem_block_cpu_mut(&mut self, block: MemBlock) -> Result<&mut [u8], DeviceError> {
        let data = self.block_data_mut(block)?;
        if !data.flags.cpu_visible() {
            return Err(DeviceError::NotCpuVisible(block));
        }
        Ok(&mut data.bytes)
    }

    fn image_layout(&self, desc: &ImageLayoutDesc) -> ImageLayout {
        let pitch = align(desc.width * desc.format.bytes_per_pixel(), PITCH_ALIGNMENT);
        let rows = align(desc.height, ROW_ALIGNMENT);
        let alignment = if desc
            .flags
            .intersects(ImageFlags::USAGE_RENDER | ImageFlags::HW_COMPRESSION)
        {
            RENDER_TARGET_ALIGNMENT
        } else {
            TEXTURE_ALIGNMENT
        };
        ImageLayout {
            desc: *desc,
            size: pitch * rows,
            alignment,
        }
    }

    fn create_swapchain(&mut self, images: &[Image]) -> Result<Swapchain, DeviceError> {
        if images.is_empty() {
            return Err(DeviceError::EmptySwapchain);
        }
        for image in images {
            self.check_image(image)?;
        }
        self.swapchains.push(Some(SwapchainData {
            images: images.to_vec(),
            next: 0,
            acquired: None,
        }));
        Ok(Swapchain((self.swapchains.len() - 1) as u32))
    }

    fn destroy_swapchain(&mut self, swapchain: Swapchain) -> Result<(), DeviceError> {
        self.swapchain_mut(swapchain)?;
        self.swapchains[swapchain.0 as usize] = None;
        Ok(())
    }

    fn create_queue(&mut self) -> Result<Queue, DeviceError> {
        self.queues.push(true);
        Ok(Queue((self.queues.len() - 1) as u32))
    }

    fn destroy_queue(&mut self, queue: Queue) -> Result<(), DeviceError> {
        self.check_queue(queue)?;
        self.queues[queue.0 as usize] = false;
        Ok(())
    }

    fn acquire_image(&mut self, queue: Queue, swapchain: Swapchain) -> Result<u32, DeviceError> {
        self.check_queue(queue)?;
        let chain = self.swapchain_mut(swapchain)?;
        let slot = chain.next;
        chain.next = (chain.next + 1) % chain.images.len() as u32;
        chain.acquired = Some(slot);
        // The slot's previous frame has been presented, so its work is done.
        self.in_flight.retain(|w| w.slot != Some(slot));
        self.acquired = Some(slot);
        Ok(slot)
    }

    fn submit_commands(&mut self, queue: Queue, list: &CmdList) -> Result<(), DeviceError> {
        self.check_queue(queue)?;
        let mut touched = HashSet::new();
        for cmd in list.commands() {
            self.execute(cmd, &mut touched)?;
        }
        self.in_flight.push(InFlight {
            slot: self.acquired,
            blocks: touched,
        });
        self.submissions.push(Submission {
            queue,
            slot: self.acquired,
            list: list.clone(),
        });
        Ok(())
    }

    fn present_image(
        &mut self,
        queue: Queue,
        swapchain: Swapchain,
        slot: u32,
    ) -> Result<(), DeviceError> {
        self.check_queue(queue)?;
        let chain = self.swapchain_mut(swapchain)?;
        if chain.acquired != Some(slot) {
            return Err(DeviceError::NotAcquired { slot });
        }
        chain.acquired = None;
        self.acquired = None;
        self.presented.push(slot);
        Ok(())
    }

    fn wait_idle(&mut self, queue: Queue) -> Result<(), DeviceError> {
        self.check_queue(queue)?;
        self.in_flight.clear();
        self.idle_waits += 1;
        Ok(())
    }
}
