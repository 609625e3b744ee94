use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use dkgui_backend::config::BackendConfig;
use dkgui_backend::coords::{ClipRect, ColorRgba, Vec2};
use dkgui_backend::core::{Backend, RENDERER_NAME};
use dkgui_backend::device::state::{Scissor, ShaderStage};
use dkgui_backend::device::{Command, HeadlessDevice, Submission};
use dkgui_backend::font::{FontService, SharedFontKind};
use dkgui_backend::gui::{
    BackendFlags, BackendInfo, DrawData, DrawList, FontAtlas, FontAtlasFlags, FontSource, GuiIo,
    TextureId,
};
use dkgui_backend::input::{
    EventSink, HidSource, InputEvent, InputFrame, MouseButton, NavKey, PadButtons, TouchPoint,
};
use dkgui_backend::shader::ShaderCode;
use dkgui_backend::time::FrameClock;

// ── fixtures ──────────────────────────────────────────────────────────────

struct StubGui {
    info: Option<BackendInfo>,
    display: Vec2,
    dt: f32,
    font: TextureId,
    atlas: Vec<u8>,
    fonts: Vec<(usize, bool)>,
    atlas_flags: FontAtlasFlags,
    input: InputFrame,
}

impl StubGui {
    fn new() -> Self {
        Self {
            info: None,
            display: Vec2::zero(),
            dt: 0.0,
            font: TextureId::NONE,
            atlas: vec![0xFF; 64 * 32],
            fonts: Vec::new(),
            atlas_flags: FontAtlasFlags::empty(),
            input: InputFrame::default(),
        }
    }
}

impl EventSink for StubGui {
    fn add_key_event(&mut self, key: NavKey, down: bool) {
        self.input.add_key_event(key, down);
    }

    fn add_mouse_pos_event(&mut self, x: f32, y: f32) {
        self.input.add_mouse_pos_event(x, y);
    }

    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        self.input.add_mouse_button_event(button, down);
    }
}

impl GuiIo for StubGui {
    fn set_backend_info(&mut self, info: BackendInfo) {
        self.info = Some(info);
    }

    fn set_display_size(&mut self, size: Vec2, _framebuffer_scale: Vec2) {
        self.display = size;
    }

    fn set_delta_time(&mut self, dt: f32) {
        self.dt = dt;
    }

    fn add_font_from_memory(&mut self, font: FontSource<'_>) {
        self.fonts.push((font.data.len(), font.merge));
    }

    fn set_font_atlas_flags(&mut self, flags: FontAtlasFlags) {
        self.atlas_flags = flags;
    }

    fn font_atlas(&mut self) -> FontAtlas<'_> {
        FontAtlas {
            pixels: &self.atlas,
            width: 64,
            height: 32,
        }
    }

    fn set_font_texture(&mut self, id: TextureId) {
        self.font = id;
    }
}

#[derive(Debug, thiserror::Error)]
#[error("font service not initialized")]
struct FontServiceDown;

/// Shared fonts with fake TrueType payloads; `None` means the service fails.
struct SharedFonts(Option<[Vec<u8>; 3]>);

impl SharedFonts {
    fn available() -> Self {
        Self(Some([vec![1; 16], vec![2; 8], vec![3; 32]]))
    }
}

impl FontService for SharedFonts {
    type Error = FontServiceDown;

    fn shared_font(&self, kind: SharedFontKind) -> Result<&[u8], FontServiceDown> {
        let fonts = self.0.as_ref().ok_or(FontServiceDown)?;
        let index = match kind {
            SharedFontKind::Standard => 0,
            SharedFontKind::NintendoExt => 1,
            SharedFontKind::ChineseSimplified => 2,
        };
        Ok(&fonts[index])
    }
}

#[derive(Default)]
struct ScriptedHid {
    held: u64,
    touch: Option<TouchPoint>,
}

impl HidSource for ScriptedHid {
    fn held_buttons(&mut self) -> u64 {
        self.held
    }

    fn touch(&mut self) -> Option<TouchPoint> {
        self.touch
    }
}

fn config() -> BackendConfig {
    BackendConfig {
        vertex_shader: ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Vertex, 0x180)),
        fragment_shader: ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Fragment, 0x120)),
        ..BackendConfig::default()
    }
}

fn init(config: BackendConfig, gui: &mut StubGui) -> anyhow::Result<Backend<HeadlessDevice>> {
    Backend::init(HeadlessDevice::new(), config, gui, &SharedFonts::available())
}

fn backend(gui: &mut StubGui) -> Backend<HeadlessDevice> {
    let mut backend = init(config(), gui).unwrap();
    backend.device_mut().take_submissions();
    backend
}

fn quad(list: &mut DrawList, clip: ClipRect, texture: TextureId) {
    list.add_quad(
        clip.min,
        clip.max,
        Vec2::zero(),
        Vec2::splat(1.0),
        ColorRgba::white(),
        clip,
        texture,
    );
}

fn commands(subs: &[Submission]) -> impl Iterator<Item = &Command> {
    subs.iter().flat_map(|s| s.list.commands())
}

fn bound_images(subs: &[Submission]) -> Vec<u32> {
    commands(subs)
        .filter_map(|c| match c {
            Command::BindTextures { textures, .. } => Some(textures[0].image),
            _ => None,
        })
        .collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dkgui-{}-{name}", std::process::id()))
}

// ── init ──────────────────────────────────────────────────────────────────

#[test]
fn init_configures_gui_io() {
    let mut gui = StubGui::new();
    let backend = backend(&mut gui);

    let info = gui.info.unwrap();
    assert_eq!(info.renderer_name, RENDERER_NAME);
    assert!(info.flags.contains(
        BackendFlags::HAS_GAMEPAD | BackendFlags::RENDERER_HAS_VTX_OFFSET | BackendFlags::IS_TOUCH_SCREEN
    ));
    assert_eq!(gui.display, Vec2::new(1280.0, 720.0));
    assert_eq!(gui.font, backend.font_texture());
    assert_eq!(gui.font.descriptor_index(), Some(0));
    assert!(backend.background_texture().is_none());
}

#[test]
fn init_registers_system_fonts_before_atlas() {
    let mut gui = StubGui::new();
    backend(&mut gui);
    assert_eq!(gui.fonts, [(16, false), (8, true), (32, true)]);
    assert_eq!(gui.atlas_flags, FontAtlasFlags::NO_POWER_OF_TWO_HEIGHT);
}

#[test]
fn font_service_failure_fails_init() {
    let mut gui = StubGui::new();
    let err = Backend::init(HeadlessDevice::new(), config(), &mut gui, &SharedFonts(None))
        .err()
        .unwrap();
    let message = format!("{err:#}");
    assert!(message.contains("failed to load system fonts"));
    assert!(message.contains("font service not initialized"));
    assert!(gui.fonts.is_empty());
    assert!(gui.font.descriptor_index().is_none());
}

#[test]
fn missing_shader_file_fails_init() {
    let mut gui = StubGui::new();
    let config = BackendConfig {
        vertex_shader: ShaderCode::File(PathBuf::from("/nonexistent/imgui_vsh.dksh")),
        ..config()
    };
    let err = init(config, &mut gui)
        .err()
        .unwrap();
    assert!(format!("{err:#}").contains("imgui_vsh.dksh"));
}

#[test]
fn shader_code_over_budget_fails_init() {
    let mut gui = StubGui::new();
    let config = BackendConfig {
        code_mem_size: 0x1000,
        vertex_shader: ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Vertex, 0xE00)),
        ..config()
    };
    assert!(init(config, &mut gui).is_err());
}

#[test]
fn background_jpeg_becomes_a_texture() {
    let path = temp_path("background.jpg");
    let img = image::RgbImage::from_pixel(32, 16, image::Rgb([10, 20, 30]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    std::fs::write(&path, bytes).unwrap();

    let mut gui = StubGui::new();
    let config = BackendConfig {
        background: Some(path.clone()),
        ..config()
    };
    let backend = init(config, &mut gui).unwrap();
    std::fs::remove_file(&path).unwrap();

    let bg = backend.background_texture().unwrap();
    assert_eq!(bg.descriptor_index(), Some(1));
}

// ── frames ────────────────────────────────────────────────────────────────

#[test]
fn empty_draw_data_clears_and_presents() {
    let mut gui = StubGui::new();
    let mut backend = backend(&mut gui);
    let stats = backend
        .render_draw_data(&DrawData::new(Vec2::new(1280.0, 720.0)))
        .unwrap();
    let subs = backend.device_mut().take_submissions();

    assert_eq!(stats.draw_calls, 0);
    assert_eq!(subs.len(), 2);
    let clear = BackendConfig::default().clear_color;
    assert!(commands(&subs).any(|c| *c == Command::ClearColor { target: 0, color: clear }));
    assert_eq!(backend.device().presented(), &[0]);
}

#[test]
fn single_quad_draws_once_with_one_texture_bind() {
    let mut gui = StubGui::new();
    let mut backend = backend(&mut gui);
    let mut data = DrawData::new(Vec2::new(1280.0, 720.0));
    let mut list = DrawList::new();
    quad(&mut list, ClipRect::new(0.0, 0.0, 100.0, 100.0), gui.font);
    data.lists.push(list);

    let stats = backend.render_draw_data(&data).unwrap();
    let subs = backend.device_mut().take_submissions();

    let draws: Vec<_> = commands(&subs)
        .filter_map(|c| match c {
            Command::DrawIndexed {
                index_count,
                first_index,
                vertex_offset,
                ..
            } => Some((*index_count, *first_index, *vertex_offset)),
            _ => None,
        })
        .collect();
    assert_eq!(draws, [(6, 0, 0)]);
    assert_eq!(stats.texture_binds, 1);
    assert_eq!(bound_images(&subs), [0]);
}

#[test]
fn two_lists_with_user_texture_bind_twice() {
    let mut gui = StubGui::new();
    let mut backend = backend(&mut gui);
    let user = backend.create_texture(&[0x40; 4 * 4 * 4], 4, 4).unwrap();
    let user = backend.texture_id(user);
    backend.device_mut().take_submissions();

    let mut data = DrawData::new(Vec2::new(1280.0, 720.0));
    let mut a = DrawList::new();
    quad(&mut a, ClipRect::new(0.0, 0.0, 640.0, 360.0), gui.font);
    let mut b = DrawList::new();
    quad(&mut b, ClipRect::new(640.0, 360.0, 1280.0, 720.0), user);
    data.lists.extend([a, b]);

    let stats = backend.render_draw_data(&data).unwrap();
    let subs = backend.device_mut().take_submissions();

    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.texture_binds, 2);
    assert_eq!(bound_images(&subs), [0, 1]);
    let scissors: Vec<_> = commands(&subs[1..])
        .filter_map(|c| match c {
            Command::SetScissors(s) => Some(s[0]),
            _ => None,
        })
        .collect();
    assert_eq!(
        scissors,
        [Scissor::new(0, 0, 640, 360), Scissor::new(640, 360, 640, 360)]
    );
}

#[test]
fn frames_alternate_slots_and_reuse_buffers() {
    let mut gui = StubGui::new();
    let mut backend = backend(&mut gui);
    let mut data = DrawData::new(Vec2::new(1280.0, 720.0));
    let mut list = DrawList::new();
    for i in 0..200 {
        let o = i as f32;
        quad(&mut list, ClipRect::new(o, o, o + 10.0, o + 10.0), gui.font);
    }
    data.lists.push(list);

    let mut reallocations = 0;
    for _ in 0..10 {
        reallocations += backend.render_draw_data(&data).unwrap().reallocations;
    }
    assert_eq!(reallocations, 4);
    assert_eq!(backend.device().presented(), &[0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
}

// ── per-frame io and input ────────────────────────────────────────────────

#[test]
fn new_frame_reports_display_and_fixed_delta() {
    let mut gui = StubGui::new();
    let mut backend = Backend::with_clock(
        HeadlessDevice::new(),
        config(),
        &mut gui,
        &SharedFonts::available(),
        FrameClock::fixed(Duration::from_millis(16)),
    )
    .unwrap();
    gui.display = Vec2::zero();

    backend.new_frame(&mut gui);
    assert_eq!(gui.display, Vec2::new(1280.0, 720.0));
    assert!((gui.dt - 0.016).abs() < 1e-6);
}

#[test]
fn plus_release_is_reported_to_host_and_gui() {
    let mut gui = StubGui::new();
    let mut backend = backend(&mut gui);
    let mut hid = ScriptedHid {
        held: PadButtons::PLUS.bits(),
        touch: Some(TouchPoint { x: 5.0, y: 6.0 }),
    };

    assert_eq!(backend.update_pad(&mut hid, &mut gui), 0);
    hid.held = 0;
    hid.touch = None;
    let up = backend.update_pad(&mut hid, &mut gui);

    assert_ne!(up & PadButtons::PLUS.bits(), 0);
    assert_eq!(
        gui.input.events,
        [
            InputEvent::PointerMoved { x: 5.0, y: 6.0 },
            InputEvent::PointerButton { button: MouseButton::Left, down: true },
            InputEvent::Key { key: NavKey::GamepadStart, down: true },
            InputEvent::PointerButton { button: MouseButton::Left, down: false },
            InputEvent::Key { key: NavKey::GamepadStart, down: false },
        ]
    );
}

// ── teardown ──────────────────────────────────────────────────────────────

#[test]
fn shutdown_releases_every_block() {
    let mut gui = StubGui::new();
    let mut backend = backend(&mut gui);
    let mut data = DrawData::new(Vec2::new(1280.0, 720.0));
    let mut list = DrawList::new();
    quad(&mut list, ClipRect::new(0.0, 0.0, 100.0, 100.0), gui.font);
    data.lists.push(list);
    backend.render_draw_data(&data).unwrap();
    backend.render_draw_data(&data).unwrap();

    let device = backend.shutdown().unwrap();
    assert_eq!(device.live_blocks(), 0);
    assert_eq!(device.live_swapchains(), 0);
}

#[test]
fn texture_table_overflow_is_an_error() {
    let mut gui = StubGui::new();
    let config = BackendConfig {
        descriptor_capacity: 2,
        ..config()
    };
    let mut backend = init(config, &mut gui).unwrap();
    backend.create_texture(&[0; 4], 2, 2).unwrap();
    assert!(backend.create_texture(&[0; 4], 2, 2).is_err());
}
