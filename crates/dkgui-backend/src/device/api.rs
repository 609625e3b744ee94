use super::{CmdList, DeviceError, Image, ImageLayout, ImageLayoutDesc, MemBlock, MemBlockDesc};

/// Alignment requirements and fixed sizes published by the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Granularity of memory block sizes.
    pub memblock_alignment: u32,
    /// Alignment of each shader's offset inside a code block.
    pub shader_code_alignment: u32,
    /// Tail of every code block that prefetching may read past the last shader.
    pub shader_code_unusable_size: u32,
    pub uniform_buffer_alignment: u32,
    pub sampler_descriptor_alignment: u32,
    pub image_descriptor_alignment: u32,
}

/// Handle to a command queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Queue(pub u32);

/// Handle to a presentable swapchain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Swapchain(pub u32);

/// The low-level graphics API the backend drives.
///
/// Mirrors an explicit-memory console API: the caller owns every allocation,
/// lays images out inside memory blocks itself and is responsible for not
/// freeing memory that queued work still reads. Apart from `acquire_image`
/// (which blocks until a slot retires) and `wait_idle`, queue operations are
/// asynchronous from the CPU's point of view.
pub trait GpuDevice {
    fn limits(&self) -> DeviceLimits;

    fn create_mem_block(&mut self, desc: &MemBlockDesc) -> Result<MemBlock, DeviceError>;

    fn destroy_mem_block(&mut self, block: MemBlock) -> Result<(), DeviceError>;

    fn mem_block_size(&self, block: MemBlock) -> Result<u32, DeviceError>;

    /// CPU view of a CPU-visible block. Writes become visible to commands
    /// submitted afterwards.
    fn mem_block_cpu_mut(&mut self, block: MemBlock) -> Result<&mut [u8], DeviceError>;

    /// Computes size and alignment for an image; does not allocate.
    fn image_layout(&self, desc: &ImageLayoutDesc) -> ImageLayout;

    fn create_swapchain(&mut self, images: &[Image]) -> Result<Swapchain, DeviceError>;

    fn destroy_swapchain(&mut self, swapchain: Swapchain) -> Result<(), DeviceError>;

    fn create_queue(&mut self) -> Result<Queue, DeviceError>;

    fn destroy_queue(&mut self, queue: Queue) -> Result<(), DeviceError>;

    /// Blocks until a swapchain image can be rendered to and returns its slot.
    fn acquire_image(&mut self, queue: Queue, swapchain: Swapchain) -> Result<u32, DeviceError>;

    fn submit_commands(&mut self, queue: Queue, list: &CmdList) -> Result<(), DeviceError>;

    fn present_image(
        &mut self,
        queue: Queue,
        swapchain: Swapchain,
        slot: u32,
    ) -> Result<(), DeviceError>;

    /// Blocks until all work submitted to `queue` has completed.
    fn wait_idle(&mut self, queue: Queue) -> Result<(), DeviceError>;
}
