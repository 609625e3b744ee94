use bitflags::bitflags;

bitflags! {
    /// Caching and usage flags of a memory block.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct MemBlockFlags: u32 {
        const CPU_UNCACHED = 1 << 0;
        const CPU_CACHED   = 1 << 1;
        const GPU_CACHED   = 1 << 2;
        /// Block may hold shader code.
        const CODE         = 1 << 3;
        /// Block may back images.
        const IMAGE        = 1 << 4;
    }
}

impl MemBlockFlags {
    /// Flags for CPU-written, GPU-read streaming data (commands, vertices, uniforms).
    pub const STREAMING: Self = Self::CPU_UNCACHED.union(Self::GPU_CACHED);

    /// Flags for GPU-only image storage.
    pub const IMAGE_STORAGE: Self = Self::GPU_CACHED.union(Self::IMAGE);

    #[inline]
    pub fn cpu_visible(self) -> bool {
        self.intersects(Self::CPU_UNCACHED | Self::CPU_CACHED)
    }
}

/// Handle to a device memory block.
///
/// `id` names a slot in the device's block arena; `generation` is bumped every
/// time that slot is reused, so a handle kept past `destroy_mem_block` is
/// detected instead of silently aliasing the replacement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MemBlock {
    pub id: u32,
    pub generation: u32,
}

/// Parameters for `GpuDevice::create_mem_block`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemBlockDesc {
    /// Size in bytes; must be a multiple of `DeviceLimits::memblock_alignment`.
    pub size: u32,
    pub flags: MemBlockFlags,
}

/// A byte range inside a memory block, as referenced by commands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferRange {
    pub block: MemBlock,
    pub offset: u32,
    pub size: u32,
}

impl BufferRange {
    #[inline]
    pub const fn new(block: MemBlock, offset: u32, size: u32) -> Self {
        Self { block, offset, size }
    }

    #[inline]
    pub const fn whole(block: MemBlock, size: u32) -> Self {
        Self::new(block, 0, size)
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.offset + self.size
    }
}
