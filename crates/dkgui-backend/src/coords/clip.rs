use crate::device::state::Scissor;

use super::Vec2;

/// Clip rectangle as produced by the GUI: `min`/`max` corners in display pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClipRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ClipRect {
    #[inline]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            min: Vec2::new(x1, y1),
            max: Vec2::new(x2, y2),
        }
    }

    /// Converts to an unsigned framebuffer scissor.
    ///
    /// The rect is made relative to `display_pos`, scaled by `fb_scale` and
    /// clamped to the `fb_width` × `fb_height` framebuffer. Returns `None` when
    /// nothing of it remains visible; the draw should then be skipped.
    pub fn to_scissor(
        self,
        display_pos: Vec2,
        fb_scale: Vec2,
        fb_width: u32,
        fb_height: u32,
    ) -> Option<Scissor> {
        let min = (self.min - display_pos).scale(fb_scale);
        let max = (self.max - display_pos).scale(fb_scale);

        let x0 = (min.x.max(0.0) as u32).min(fb_width);
        let y0 = (min.y.max(0.0) as u32).min(fb_height);
        let x1 = (max.x.max(0.0) as u32).min(fb_width);
        let y1 = (max.y.max(0.0) as u32).min(fb_height);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Scissor::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec2 = Vec2::new(0.0, 0.0);
    const UNIT: Vec2 = Vec2::new(1.0, 1.0);

    // ── conversion ────────────────────────────────────────────────────────

    #[test]
    fn interior_rect_maps_to_pixels() {
        let s = ClipRect::new(10.0, 20.0, 110.0, 70.0).to_scissor(ORIGIN, UNIT, 1280, 720);
        assert_eq!(s, Some(Scissor::new(10, 20, 100, 50)));
    }

    #[test]
    fn fractional_bounds_truncate() {
        let s = ClipRect::new(10.7, 20.2, 30.9, 40.5).to_scissor(ORIGIN, UNIT, 1280, 720);
        assert_eq!(s, Some(Scissor::new(10, 20, 20, 20)));
    }

    #[test]
    fn display_pos_and_scale_apply() {
        let s = ClipRect::new(110.0, 60.0, 160.0, 110.0)
            .to_scissor(Vec2::new(100.0, 50.0), Vec2::splat(2.0), 1280, 720);
        assert_eq!(s, Some(Scissor::new(20, 20, 100, 100)));
    }

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn clamps_to_framebuffer() {
        let s = ClipRect::new(-50.0, -10.0, 2000.0, 900.0).to_scissor(ORIGIN, UNIT, 1280, 720);
        assert_eq!(s, Some(Scissor::new(0, 0, 1280, 720)));
    }

    #[test]
    fn empty_or_offscreen_is_none() {
        assert_eq!(ClipRect::new(5.0, 5.0, 5.0, 50.0).to_scissor(ORIGIN, UNIT, 1280, 720), None);
        assert_eq!(
            ClipRect::new(1300.0, 0.0, 1400.0, 10.0).to_scissor(ORIGIN, UNIT, 1280, 720),
            None
        );
        assert_eq!(ClipRect::new(-20.0, 0.0, -10.0, 10.0).to_scissor(ORIGIN, UNIT, 1280, 720), None);
    }
}
