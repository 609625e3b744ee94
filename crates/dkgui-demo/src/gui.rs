use dkgui_backend::coords::{ClipRect, ColorRgba, Vec2};
use dkgui_backend::gui::{
    BackendInfo, DrawCmd, DrawData, DrawList, FontAtlas, FontAtlasFlags, FontSource, GuiIo,
    TextureId,
};
use dkgui_backend::input::{EventSink, MouseButton, NavKey};

const ATLAS_W: u32 = 128;
const ATLAS_H: u32 = 64;
const GLYPH: u32 = 8;

/// Atlas region that is fully opaque, used for solid fills.
const WHITE_UV: (Vec2, Vec2) = (Vec2::new(0.0, 0.0), Vec2::new(1.0 / 128.0, 1.0 / 64.0));

/// Minimal stand-in for the immediate-mode GUI library.
///
/// Keeps a procedural glyph atlas, a cursor steered by the D-pad and touch,
/// and emits one window's worth of draw data per frame.
pub struct DemoGui {
    atlas: Vec<u8>,
    font: TextureId,
    display: Vec2,
    elapsed: f32,
    cursor: Vec2,
    pressed: bool,
    activations: u32,
}

impl DemoGui {
    pub fn new() -> Self {
        Self {
            atlas: procedural_atlas(),
            font: TextureId::NONE,
            display: Vec2::zero(),
            elapsed: 0.0,
            cursor: Vec2::new(200.0, 200.0),
            pressed: false,
            activations: 0,
        }
    }

    #[inline]
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Lays out the frame.
    pub fn frame(&self) -> DrawData {
        let mut data = DrawData::new(self.display);
        let screen = ClipRect::new(0.0, 0.0, self.display.x, self.display.y);

        let mut window = DrawList::new();
        let origin = Vec2::new(80.0, 60.0);
        let size = Vec2::new(420.0, 240.0);
        let body = ClipRect::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y);
        self.fill(&mut window, origin, origin + size, ColorRgba::new(0.06, 0.06, 0.06, 0.94), body);
        self.fill(
            &mut window,
            origin,
            Vec2::new(origin.x + size.x, origin.y + 20.0),
            ColorRgba::new(0.16, 0.29, 0.48, 1.0),
            body,
        );
        self.text(&mut window, origin + Vec2::new(6.0, 6.0), "Hello, world!", body);
        let seconds = format!("t = {:.2}s", self.elapsed);
        self.text(&mut window, origin + Vec2::new(6.0, 30.0), &seconds, body);
        data.lists.push(window);

        let mut overlay = DrawList::new();
        overlay.commands.push(DrawCmd::ResetRenderState);
        let color = if self.pressed {
            ColorRgba::new(1.0, 0.8, 0.2, 1.0)
        } else {
            ColorRgba::white()
        };
        self.fill(&mut overlay, self.cursor, self.cursor + Vec2::splat(12.0), color, screen);
        data.lists.push(overlay);

        data
    }

    fn fill(&self, list: &mut DrawList, min: Vec2, max: Vec2, color: ColorRgba, clip: ClipRect) {
        list.add_quad(min, max, WHITE_UV.0, WHITE_UV.1, color, clip, self.font);
    }

    fn text(&self, list: &mut DrawList, at: Vec2, text: &str, clip: ClipRect) {
        let cols = ATLAS_W / GLYPH;
        let (du, dv) = (GLYPH as f32 / ATLAS_W as f32, GLYPH as f32 / ATLAS_H as f32);
        for (i, ch) in text.bytes().enumerate() {
            // Cell 0 is the white fill; glyph cells follow.
            let cell = 1 + (ch as u32 % (cols * (ATLAS_H / GLYPH) - 1));
            let uv = Vec2::new((cell % cols) as f32 * du, (cell / cols) as f32 * dv);
            let min = at + Vec2::new(i as f32 * GLYPH as f32, 0.0);
            list.add_quad(
                min,
                min + Vec2::splat(GLYPH as f32),
                uv,
                uv + Vec2::new(du, dv),
                ColorRgba::white(),
                clip,
                self.font,
            );
        }
    }
}

/// 8-bit alpha atlas: an opaque cell followed by patterned glyph cells.
fn procedural_atlas() -> Vec<u8> {
    let mut pixels = vec![0u8; (ATLAS_W * ATLAS_H) as usize];
    for y in 0..ATLAS_H {
        for x in 0..ATLAS_W {
            let cell = (y / GLYPH) * (ATLAS_W / GLYPH) + x / GLYPH;
            let (cx, cy) = (x % GLYPH, y % GLYPH);
            let on = cell == 0 || ((cx + cy + cell) % 3 == 0 && cx < GLYPH - 1 && cy < GLYPH - 1);
            if on {
                pixels[(y * ATLAS_W + x) as usize] = 0xFF;
            }
        }
    }
    pixels
}

impl EventSink for DemoGui {
    fn add_key_event(&mut self, key: NavKey, down: bool) {
        if !down {
            return;
        }
        let step = 16.0;
        match key {
            NavKey::GamepadDpadLeft => self.cursor.x -= step,
            NavKey::GamepadDpadRight => self.cursor.x += step,
            NavKey::GamepadDpadUp => self.cursor.y -= step,
            NavKey::GamepadDpadDown => self.cursor.y += step,
            NavKey::GamepadFaceDown => self.activations += 1,
            _ => {}
        }
        log::debug!("key down: {key}");
    }

    fn add_mouse_pos_event(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        if button == MouseButton::Left {
            self.pressed = down;
            if !down {
                self.activations += 1;
            }
        }
    }
}

impl GuiIo for DemoGui {
    fn set_backend_info(&mut self, info: BackendInfo) {
        log::info!("renderer backend: {} ({:?})", info.renderer_name, info.flags);
    }

    fn set_display_size(&mut self, size: Vec2, _framebuffer_scale: Vec2) {
        self.display = size;
    }

    fn set_delta_time(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    fn add_font_from_memory(&mut self, font: FontSource<'_>) {
        log::debug!(
            "font: {} bytes at {}px, {:?}{}",
            font.data.len(),
            font.size_px,
            font.glyph_ranges,
            if font.merge { " (merged)" } else { "" }
        );
    }

    fn set_font_atlas_flags(&mut self, flags: FontAtlasFlags) {
        log::debug!("font atlas flags: {flags:?}");
    }

    fn font_atlas(&mut self) -> FontAtlas<'_> {
        FontAtlas {
            pixels: &self.atlas,
            width: ATLAS_W,
            height: ATLAS_H,
        }
    }

    fn set_font_texture(&mut self, id: TextureId) {
        self.font = id;
    }
}
