mod fonts;
mod gui;
mod hid;

use std::time::Duration;

use anyhow::{Context, Result};
use dkgui_backend::config::BackendConfig;
use dkgui_backend::core::Backend;
use dkgui_backend::device::HeadlessDevice;
use dkgui_backend::device::state::ShaderStage;
use dkgui_backend::input::PadButtons;
use dkgui_backend::logging::{LoggingConfig, init_logging};
use dkgui_backend::shader::ShaderCode;
use dkgui_backend::time::FrameClock;

use fonts::DemoFonts;
use gui::DemoGui;
use hid::ScriptedHid;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // The headless device never runs shader code; any well-formed blob will do.
    let config = BackendConfig {
        vertex_shader: ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Vertex, 0x400)),
        fragment_shader: ShaderCode::Bytes(HeadlessDevice::placeholder_shader(ShaderStage::Fragment, 0x300)),
        background: std::env::var_os("DKGUI_BACKGROUND").map(Into::into),
        ..BackendConfig::default()
    };

    let fonts = match std::env::var_os("DKGUI_FONT_DIR") {
        Some(dir) => DemoFonts::from_dir(dir.as_ref()).context("failed to read shared fonts")?,
        None => DemoFonts::placeholder(),
    };

    let mut gui = DemoGui::new();
    let mut backend = Backend::with_clock(
        HeadlessDevice::new(),
        config,
        &mut gui,
        &fonts,
        FrameClock::fixed(Duration::from_micros(16_667)),
    )
    .context("failed to initialize renderer backend")?;
    let mut hid = ScriptedHid::demo();

    let mut frames = 0u32;
    let mut draws = 0u64;
    loop {
        let released = backend.update_pad(&mut hid, &mut gui);
        if released & PadButtons::PLUS.bits() != 0 {
            break;
        }

        backend.new_frame(&mut gui);
        let draw_data = gui.frame();
        let stats = backend.render_draw_data(&draw_data)?;
        if stats.reallocations > 0 {
            log::debug!("frame {frames}: geometry buffers grown ({stats:?})");
        }
        draws += u64::from(stats.draw_calls);
        frames += 1;
    }

    let device = backend.shutdown()?;
    log::info!(
        "exit requested after {} frames ({} draws, {} presented, {} activations, {} blocks leaked)",
        frames,
        draws,
        device.presented().len(),
        gui.activations(),
        device.live_blocks()
    );
    Ok(())
}
