/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn from_unorm8([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Packs to the 4×unorm8 layout used by GUI vertices.
    #[inline]
    pub fn to_unorm8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unorm8_endpoints_are_exact() {
        assert_eq!(ColorRgba::white().to_unorm8(), [255; 4]);
        assert_eq!(ColorRgba::black().to_unorm8(), [0, 0, 0, 255]);
        assert_eq!(ColorRgba::from_unorm8([255, 0, 0, 255]), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn out_of_range_channels_saturate() {
        assert_eq!(ColorRgba::new(2.0, -1.0, 0.5, 1.0).to_unorm8(), [255, 0, 128, 255]);
    }
}
