use crate::config::SWAPCHAIN_SLOTS;
use crate::device::{
    DeviceError, GpuContext, GpuDevice, Image, ImageFlags, ImageFormat, ImageLayoutDesc, MemBlock,
    MemBlockFlags, Swapchain,
};

/// Framebuffers, the shared depth buffer and the presentable swapchain.
///
/// All framebuffers live in one block at `slot * stride`; the depth buffer
/// has its own block and is reused by every slot since frames never overlap
/// on the GPU's depth usage.
#[derive(Debug)]
pub struct SwapchainResources {
    width: u32,
    height: u32,
    depth_block: MemBlock,
    framebuffer_block: MemBlock,
    depth: Image,
    framebuffers: [Image; SWAPCHAIN_SLOTS],
    swapchain: Swapchain,
}

impl SwapchainResources {
    pub fn create<D: GpuDevice>(
        gpu: &mut GpuContext<D>,
        width: u32,
        height: u32,
    ) -> Result<Self, DeviceError> {
        let depth_layout = gpu.device().image_layout(&ImageLayoutDesc {
            format: ImageFormat::Z24S8,
            flags: ImageFlags::USAGE_RENDER | ImageFlags::HW_COMPRESSION,
            width,
            height,
        });
        let color_layout = gpu.device().image_layout(&ImageLayoutDesc {
            format: ImageFormat::Rgba8Unorm,
            flags: ImageFlags::USAGE_RENDER | ImageFlags::USAGE_PRESENT | ImageFlags::HW_COMPRESSION,
            width,
            height,
        });

        let (depth_block, _) =
            gpu.create_block(depth_layout.aligned_size(), MemBlockFlags::IMAGE_STORAGE)?;
        let depth = Image::new(depth_layout, depth_block, 0)?;

        let stride = color_layout.aligned_size();
        let (framebuffer_block, _) = gpu.create_block(
            stride * SWAPCHAIN_SLOTS as u32,
            MemBlockFlags::IMAGE_STORAGE,
        )?;

        let mut framebuffers = [depth; SWAPCHAIN_SLOTS];
        for (i, fb) in framebuffers.iter_mut().enumerate() {
            *fb = Image::new(color_layout, framebuffer_block, i as u32 * stride)?;
        }

        let swapchain = gpu.device_mut().create_swapchain(&framebuffers)?;
        log::info!(
            "swapchain created: {}x{}, {} slots, {} bytes per framebuffer",
            width,
            height,
            SWAPCHAIN_SLOTS,
            stride
        );

        Ok(Self {
            width,
            height,
            depth_block,
            framebuffer_block,
            depth,
            framebuffers,
            swapchain,
        })
    }

    #[inline]
    pub fn swapchain(&self) -> Swapchain {
        self.swapchain
    }

    #[inline]
    pub fn depth(&self) -> Image {
        self.depth
    }

    /// Framebuffer presented for `slot`.
    #[inline]
    pub fn framebuffer(&self, slot: u32) -> Option<Image> {
        self.framebuffers.get(slot as usize).copied()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Destroys the swapchain, then the memory behind its images.
    /// The queue must be idle.
    pub fn destroy<D: GpuDevice>(self, gpu: &mut GpuContext<D>) -> Result<(), DeviceError> {
        gpu.device_mut().destroy_swapchain(self.swapchain)?;
        gpu.destroy_block(self.framebuffer_block)?;
        gpu.destroy_block(self.depth_block)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{HeadlessDevice, is_aligned};

    #[test]
    fn framebuffers_are_packed_at_aligned_stride() {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let res = SwapchainResources::create(&mut gpu, 1280, 720).unwrap();

        let fb0 = res.framebuffer(0).unwrap();
        let fb1 = res.framebuffer(1).unwrap();
        assert_eq!(fb0.offset, 0);
        assert_eq!(fb1.offset, fb0.layout.aligned_size());
        assert!(is_aligned(fb1.offset, fb1.layout.alignment));
        assert_eq!(fb0.format(), ImageFormat::Rgba8Unorm);
        assert_eq!(res.depth().format(), ImageFormat::Z24S8);
        assert!(res.framebuffer(SWAPCHAIN_SLOTS as u32).is_none());
    }

    #[test]
    fn framebuffer_block_holds_every_slot() {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let res = SwapchainResources::create(&mut gpu, 1280, 720).unwrap();
        let fb = res.framebuffer(0).unwrap();
        let size = gpu.device().mem_block_size(fb.block).unwrap();
        assert!(size >= fb.layout.aligned_size() * SWAPCHAIN_SLOTS as u32);
    }

    #[test]
    fn destroy_releases_swapchain_and_blocks() {
        let mut gpu = GpuContext::new(HeadlessDevice::new()).unwrap();
        let res = SwapchainResources::create(&mut gpu, 640, 480).unwrap();
        assert_eq!(gpu.device().live_swapchains(), 1);
        assert_eq!(gpu.device().live_blocks(), 2);

        res.destroy(&mut gpu).unwrap();
        assert_eq!(gpu.device().live_swapchains(), 0);
        assert_eq!(gpu.device().live_blocks(), 0);
    }
}
