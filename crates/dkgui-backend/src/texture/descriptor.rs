use bytemuck::{Pod, Zeroable};

use crate::device::state::{Filter, Sampler, WrapMode};
use crate::device::{
    BufferRange, DeviceError, GpuContext, GpuDevice, Image, MemBlock, MemBlockFlags, align,
};

use super::TextureError;

/// Size of one encoded descriptor.
pub const DESCRIPTOR_SIZE: u32 = 32;

/// Encoded image descriptor.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct ImageDescriptor {
    pub block_id: u32,
    pub block_generation: u32,
    pub offset: u32,
    pub width: u32,
    pub height: u32,
    pub format: u32,
    _reserved: [u32; 2],
}

impl ImageDescriptor {
    pub fn new(image: &Image) -> Self {
        Self {
            block_id: image.block.id,
            block_generation: image.block.generation,
            offset: image.offset,
            width: image.width(),
            height: image.height(),
            format: image.format().code(),
            _reserved: [0; 2],
        }
    }
}

/// Encoded sampler descriptor.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SamplerDescriptor {
    pub min_filter: u32,
    pub mag_filter: u32,
    pub wrap_u: u32,
    pub wrap_v: u32,
    _reserved: [u32; 4],
}

impl SamplerDescriptor {
    pub fn new(sampler: &Sampler) -> Self {
        let filter = |f: Filter| match f {
            Filter::Nearest => 0,
            Filter::Linear => 1,
        };
        let wrap = |w: WrapMode| match w {
            WrapMode::Repeat => 0,
            WrapMode::ClampToEdge => 1,
        };
        Self {
            min_filter: filter(sampler.min_filter),
            mag_filter: filter(sampler.mag_filter),
            wrap_u: wrap(sampler.wrap_u),
            wrap_v: wrap(sampler.wrap_v),
            _reserved: [0; 4],
        }
    }
}

const _: () = assert!(size_of::<ImageDescriptor>() == DESCRIPTOR_SIZE as usize);
const _: () = assert!(size_of::<SamplerDescriptor>() == DESCRIPTOR_SIZE as usize);

/// Typed, bounds-checked view over the descriptor memory block.
///
/// Layout: `capacity` sampler descriptors at offset 0, then `capacity` image
/// descriptors starting at the next image-descriptor-aligned offset.
#[derive(Debug)]
pub struct DescriptorTable {
    block: MemBlock,
    capacity: u32,
    image_offset: u32,
}

impl DescriptorTable {
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        capacity: u32,
    ) -> Result<Self, DeviceError> {
        let limits = gpu.limits();
        let samplers_end = align(capacity * DESCRIPTOR_SIZE, limits.sampler_descriptor_alignment);
        let image_offset = align(samplers_end, limits.image_descriptor_alignment);
        let size = image_offset + capacity * DESCRIPTOR_SIZE;
        let (block, _) = gpu.create_block(size, MemBlockFlags::STREAMING)?;
        Ok(Self {
            block,
            capacity,
            image_offset,
        })
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn sampler_range(&self) -> BufferRange {
        BufferRange::new(self.block, 0, self.capacity * DESCRIPTOR_SIZE)
    }

    pub fn image_range(&self) -> BufferRange {
        BufferRange::new(self.block, self.image_offset, self.capacity * DESCRIPTOR_SIZE)
    }

    pub fn write_sampler<D: GpuDevice>(
        &self,
        gpu: &mut GpuContext<D>,
        index: u32,
        descriptor: &SamplerDescriptor,
    ) -> Result<(), TextureError> {
        let offset = self.record_offset(0, index)?;
        gpu.write_block(self.block, offset, bytemuck::bytes_of(descriptor))?;
        Ok(())
    }

    pub fn write_image<D: GpuDevice>(
        &self,
        gpu: &mut GpuContext<D>,
        index: u32,
        descriptor: &ImageDescriptor,
    ) -> Result<(), TextureError> {
        let offset = self.record_offset(self.image_offset, index)?;
        gpu.write_block(self.block, offset, bytemuck::bytes_of(descriptor))?;
        Ok(())
    }

    pub fn read_sampler<D: GpuDevice>(
        &self,
        gpu: &mut GpuContext<D>,
        index: u32,
    ) -> Result<SamplerDescriptor, TextureError> {
        self.read(gpu, self.record_offset(0, index)?)
    }

    pub fn read_image<D: GpuDevice>(
        &self,
        gpu: &mut GpuContext<D>,
        index: u32,
    ) -> Result<ImageDescriptor, TextureError> {
        self.read(gpu, self.record_offset(self.image_offset, index)?)
    }

    /// Records sit at 32-byte offsets inside a byte buffer, so reads must not
    /// assume the slice is aligned for `T`.
    fn read<T: Pod, D: GpuDevice>(
        &self,
        gpu: &mut GpuContext<D>,
        offset: u32,
    ) -> Result<T, TextureError> {
        let mem = gpu.device_mut().mem_block_cpu_mut(self.block)?;
        let start = offset as usize;
        Ok(bytemuck::pod_read_unaligned(
            &mem[start..start + DESCRIPTOR_SIZE as usize],
        ))
    }

    fn record_offset(&self, base: u32, index: u32) -> Result<u32, TextureError> {
        if index >= self.capacity {
            return Err(TextureError::DescriptorOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok(base + index * DESCRIPTOR_SIZE)
    }

    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        gpu.destroy_block(self.block)
    }
}
