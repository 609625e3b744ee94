use crate::device::state::Sampler;
use crate::device::{
    BufferRange, CmdBuf, Command, DeviceError, Encoder, GpuContext, GpuDevice, Image, ImageFlags,
    ImageFormat, ImageLayoutDesc, MemBlock, MemBlockFlags,
};
use crate::gui::TextureId;

use super::TextureError;
use super::descriptor::{DescriptorTable, ImageDescriptor, SamplerDescriptor};

const UPLOAD_CMD_SIZE: u32 = 0x1000;

/// A live texture, identified by its descriptor slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    #[inline]
    pub fn descriptor_index(self) -> u32 {
        self.0
    }
}

/// What the recorder needs to know about a bound texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub descriptor_index: u32,
    /// Single-channel alpha texture (font atlas); sampled as white × alpha.
    pub is_alpha: bool,
}

#[derive(Debug)]
struct Entry {
    block: MemBlock,
    image: Image,
}

/// Owns the descriptor table and every uploaded texture.
///
/// Slots are handed out in order and never reused; the table is sized once
/// at startup.
#[derive(Debug)]
pub struct TextureManager {
    table: DescriptorTable,
    upload: CmdBuf,
    entries: Vec<Entry>,
}

impl TextureManager {
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        capacity: u32,
    ) -> Result<Self, TextureError> {
        let table = DescriptorTable::create(gpu, capacity)?;
        let upload = CmdBuf::create(gpu, UPLOAD_CMD_SIZE)?;
        Ok(Self {
            table,
            upload,
            entries: Vec::new(),
        })
    }

    /// Binds the sampler and image descriptor sets. Done once at startup; the
    /// bindings persist on the queue.
    pub fn bind_descriptors<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
    ) -> Result<(), DeviceError> {
        self.upload.clear();
        let mut enc = Encoder::new(gpu, &mut self.upload);
        enc.push(Command::BindSamplerDescriptorSet {
            range: self.table.sampler_range(),
            count: self.table.capacity(),
        })?;
        enc.push(Command::BindImageDescriptorSet {
            range: self.table.image_range(),
            count: self.table.capacity(),
        })?;
        enc.submit()
    }

    /// Uploads `pixels` as a new sampled texture.
    ///
    /// `width * height` bytes are taken as 8-bit alpha, `width * height * 4`
    /// as RGBA8. Blocks until the copy has completed.
    pub fn create_texture<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage { width, height });
        }
        let texels = width as usize * height as usize;
        let format = if pixels.len() == texels {
            ImageFormat::R8Unorm
        } else if pixels.len() == texels * 4 {
            ImageFormat::Rgba8Unorm
        } else {
            return Err(TextureError::InvalidPixelData {
                len: pixels.len(),
                width,
                height,
            });
        };
        let index = self.entries.len() as u32;
        if index == self.table.capacity() {
            return Err(TextureError::TableFull {
                capacity: self.table.capacity(),
            });
        }

        let layout = gpu.device().image_layout(&ImageLayoutDesc {
            format,
            flags: ImageFlags::USAGE_SAMPLED,
            width,
            height,
        });
        let (block, _) = gpu.create_block(layout.aligned_size(), MemBlockFlags::IMAGE_STORAGE)?;
        let image = Image::new(layout, block, 0)?;

        if let Err(e) = self.upload(gpu, pixels, image) {
            let _ = gpu.destroy_block(block);
            return Err(e);
        }

        self.table
            .write_image(gpu, index, &ImageDescriptor::new(&image))?;
        self.table
            .write_sampler(gpu, index, &SamplerDescriptor::new(&Sampler::LINEAR_CLAMP))?;
        self.entries.push(Entry { block, image });

        log::debug!(
            "texture {} uploaded: {}x{} {:?}",
            index,
            width,
            height,
            format
        );
        Ok(TextureHandle(index))
    }

    /// Stages `pixels` in a scratch block and copies them into `image`.
    fn upload<D: GpuDevice>(
        &mut self,
        gpu: &mut GpuContext<D>,
        pixels: &[u8],
        image: Image,
    ) -> Result<(), TextureError> {
        let (scratch, _) = gpu.create_block(pixels.len() as u32, MemBlockFlags::CPU_CACHED)?;
        gpu.write_block(scratch, 0, pixels)?;

        self.upload.clear();
        let copied = {
            let mut enc = Encoder::new(gpu, &mut self.upload);
            enc.push(Command::CopyBufferToImage {
                src: BufferRange::new(scratch, 0, pixels.len() as u32),
                dst: image,
                row_pitch: image.width() * image.format().bytes_per_pixel(),
            })
            .and_then(|()| enc.submit())
        };
        let idle = gpu.wait_idle();
        gpu.destroy_block(scratch)?;
        copied?;
        idle?;
        Ok(())
    }

    #[inline]
    pub fn texture_id(&self, handle: TextureHandle) -> TextureId {
        TextureId::from_descriptor_index(handle.0)
    }

    /// Resolves a GUI texture id to a live texture.
    pub fn lookup(&self, id: TextureId) -> Option<TextureInfo> {
        let index = id.descriptor_index()?;
        let entry = self.entries.get(index as usize)?;
        Some(TextureInfo {
            descriptor_index: index,
            is_alpha: entry.image.format() == ImageFormat::R8Unorm,
        })
    }

    /// Number of live textures.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }

    /// Releases every texture and the descriptor table. The queue must be idle.
    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        for entry in self.entries {
            gpu.destroy_block(entry.block)?;
        }
        self.upload.destroy(gpu)?;
        self.table.destroy(gpu)
    }
}
