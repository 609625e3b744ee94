use anyhow::{Context, Result};

use crate::config::{BackendConfig, SWAPCHAIN_SLOTS};
use crate::coords::Vec2;
use crate::device::state::ShaderStage;
use crate::device::{GpuContext, GpuDevice};
use crate::font::{FontService, load_system_fonts};
use crate::gui::{BackendFlags, BackendInfo, DrawData, GuiIo, TextureId};
use crate::input::{EventSink, HidSource, InputBridge};
use crate::render::{FrameRecorder, FrameStats, Pipeline, UniformBlock};
use crate::shader::CodeArena;
use crate::swapchain::SwapchainResources;
use crate::texture::{TextureHandle, TextureManager, load_jpeg};
use crate::time::FrameClock;

/// Name reported to the GUI library.
pub const RENDERER_NAME: &str = "dkgui";

/// The renderer backend: owns every GPU resource and drives the frame loop.
///
/// Lifecycle: [`Backend::init`] once, then per frame [`Backend::new_frame`],
/// [`Backend::update_pad`] and [`Backend::render_draw_data`], and finally
/// [`Backend::shutdown`], which hands the device back.
pub struct Backend<D: GpuDevice> {
    gpu: GpuContext<D>,
    code: CodeArena,
    targets: SwapchainResources,
    textures: TextureManager,
    recorder: FrameRecorder,
    input: InputBridge,
    clock: FrameClock,
    display_size: Vec2,
    font: TextureHandle,
    background: Option<TextureHandle>,
}

impl<D: GpuDevice> Backend<D> {
    /// Registers the shared system fonts with `io`, creates every GPU
    /// resource and uploads the resulting font atlas.
    ///
    /// Any failure here is fatal for the application; resources created
    /// before the failure are released with the device.
    pub fn init(
        device: D,
        config: BackendConfig,
        io: &mut impl GuiIo,
        fonts: &impl FontService,
    ) -> Result<Self> {
        Self::with_clock(device, config, io, fonts, FrameClock::new())
    }

    /// Like [`Backend::init`], with an explicit frame clock (e.g. fixed-step).
    pub fn with_clock(
        device: D,
        config: BackendConfig,
        io: &mut impl GuiIo,
        fonts: &impl FontService,
        clock: FrameClock,
    ) -> Result<Self> {
        anyhow::ensure!(
            config.display_width > 0 && config.display_height > 0,
            "display has zero size"
        );
        anyhow::ensure!(
            config.descriptor_capacity > 0,
            "descriptor table needs room for the font atlas"
        );

        let display_size = Vec2::new(config.display_width as f32, config.display_height as f32);
        io.set_backend_info(BackendInfo {
            renderer_name: RENDERER_NAME,
            flags: BackendFlags::HAS_GAMEPAD
                | BackendFlags::RENDERER_HAS_VTX_OFFSET
                | BackendFlags::IS_TOUCH_SCREEN
                | BackendFlags::NAV_ENABLE_GAMEPAD,
        });
        io.set_display_size(display_size, Vec2::splat(1.0));
        load_system_fonts(fonts, io).context("failed to load system fonts")?;

        let mut gpu = GpuContext::new(device).context("failed to create graphics queue")?;

        let mut code = CodeArena::create(&mut gpu, config.code_mem_size)
            .context("failed to allocate shader code memory")?;
        let vertex = code
            .load(&mut gpu, ShaderStage::Vertex, &config.vertex_shader)
            .with_context(|| format!("failed to load vertex shader {}", config.vertex_shader))?;
        let fragment = code
            .load(&mut gpu, ShaderStage::Fragment, &config.fragment_shader)
            .with_context(|| format!("failed to load fragment shader {}", config.fragment_shader))?;

        let targets =
            SwapchainResources::create(&mut gpu, config.display_width, config.display_height)
                .context("failed to create swapchain")?;

        let uniforms = UniformBlock::create(&mut gpu, config.uniform_mem_size)
            .context("failed to allocate uniform memory")?;
        let pipeline = Pipeline {
            vertex,
            fragment,
            uniforms,
            clear_color: config.clear_color,
            width: config.display_width,
            height: config.display_height,
        };
        let recorder = FrameRecorder::create(
            &mut gpu,
            pipeline,
            SWAPCHAIN_SLOTS,
            config.cmd_mem_size,
            config.min_buffer_size,
        )
        .context("failed to create frame slots")?;

        let mut textures = TextureManager::create(&mut gpu, config.descriptor_capacity)
            .context("failed to allocate descriptor table")?;
        let font = {
            let atlas = io.font_atlas();
            anyhow::ensure!(
                atlas.width > 0 && atlas.height > 0,
                "font atlas was not built"
            );
            textures
                .create_texture(&mut gpu, atlas.pixels, atlas.width, atlas.height)
                .context("failed to upload font atlas")?
        };
        textures
            .bind_descriptors(&mut gpu)
            .context("failed to bind descriptor sets")?;
        gpu.wait_idle().context("failed to wait for startup uploads")?;
        io.set_font_texture(textures.texture_id(font));

        let background = match &config.background {
            Some(path) => {
                let image = load_jpeg(path)
                    .with_context(|| format!("failed to load background {}", path.display()))?;
                let handle = textures
                    .create_texture(&mut gpu, &image.pixels, image.width, image.height)
                    .context("failed to upload background")?;
                Some(handle)
            }
            None => None,
        };

        log::info!(
            "backend initialized: {}x{}, {} swapchain slots, {} bytes of shader code",
            config.display_width,
            config.display_height,
            SWAPCHAIN_SLOTS,
            code.used()
        );

        Ok(Self {
            gpu,
            code,
            targets,
            textures,
            recorder,
            input: InputBridge::new(),
            clock,
            display_size,
            font,
            background,
        })
    }

    /// Waits for the GPU, destroys every resource in reverse dependency order
    /// and returns the device.
    pub fn shutdown(self) -> Result<D> {
        let Self {
            mut gpu,
            code,
            targets,
            textures,
            recorder,
            ..
        } = self;

        gpu.wait_idle().context("failed to drain queue at shutdown")?;
        let pipeline = recorder
            .release_slots(&mut gpu)
            .context("failed to release frame slots")?;
        textures
            .destroy(&mut gpu)
            .context("failed to release textures")?;
        pipeline
            .uniforms
            .destroy(&mut gpu)
            .context("failed to release uniform memory")?;
        code.destroy(&mut gpu)
            .context("failed to release shader code memory")?;
        targets
            .destroy(&mut gpu)
            .context("failed to release swapchain")?;
        let device = gpu.destroy().context("failed to destroy graphics queue")?;

        log::info!("backend shut down");
        Ok(device)
    }

    /// Feeds display size and delta time to the GUI.
    pub fn new_frame(&mut self, io: &mut impl GuiIo) {
        io.set_display_size(self.display_size, Vec2::splat(1.0));
        io.set_delta_time(self.clock.tick().dt);
    }

    /// Records, submits and presents the GUI's draw data.
    pub fn render_draw_data(&mut self, draw_data: &DrawData) -> Result<FrameStats> {
        self.recorder
            .render(&mut self.gpu, &self.targets, &self.textures, draw_data)
            .context("failed to render frame")
    }

    /// Polls pad and touch input into `sink`. Returns the buttons released
    /// since the previous poll.
    pub fn update_pad(&mut self, hid: &mut impl HidSource, sink: &mut impl EventSink) -> u64 {
        self.input.poll(hid, sink)
    }

    /// Uploads a user texture (8-bit alpha or RGBA8). Blocks until done.
    pub fn create_texture(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<TextureHandle> {
        let handle = self
            .textures
            .create_texture(&mut self.gpu, pixels, width, height)
            .context("failed to create texture")?;
        Ok(handle)
    }

    #[inline]
    pub fn texture_id(&self, handle: TextureHandle) -> TextureId {
        self.textures.texture_id(handle)
    }

    #[inline]
    pub fn font_texture(&self) -> TextureId {
        self.textures.texture_id(self.font)
    }

    /// The decoded background, if one was configured.
    #[inline]
    pub fn background_texture(&self) -> Option<TextureId> {
        self.background.map(|h| self.textures.texture_id(h))
    }

    #[inline]
    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    #[inline]
    pub fn device(&self) -> &D {
        self.gpu.device()
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        self.gpu.device_mut()
    }
}
