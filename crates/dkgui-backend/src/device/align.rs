/// Rounds `size` up to the next multiple of `boundary`.
///
/// `boundary` must be a power of two. Every memory block size and every
/// image/code offset goes through this before it reaches the device.
#[inline]
pub const fn align(size: u32, boundary: u32) -> u32 {
    debug_assert!(boundary.is_power_of_two());
    (size + boundary - 1) & !(boundary - 1)
}

/// Returns true if `value` is a multiple of `boundary` (a power of two).
#[inline]
pub const fn is_aligned(value: u32, boundary: u32) -> bool {
    debug_assert!(boundary.is_power_of_two());
    value & (boundary - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: [u32; 8] = [1, 2, 4, 32, 256, 0x1000, 0x10000, 0x20000];

    #[test]
    fn already_aligned_is_identity() {
        assert_eq!(align(0x1000, 0x1000), 0x1000);
        assert_eq!(align(0, 256), 0);
    }

    #[test]
    fn rounds_up_to_boundary() {
        assert_eq!(align(1, 256), 256);
        assert_eq!(align(257, 256), 512);
        assert_eq!(align(4097, 0x1000), 0x2000);
    }

    #[test]
    fn result_is_smallest_multiple_not_below_size() {
        for &b in &BOUNDARIES {
            for s in [0u32, 1, 2, 3, 31, 33, 255, 1000, 4095, 4096, 70_001, 1 << 20] {
                let a = align(s, b);
                assert!(a >= s, "align({s}, {b}) = {a} < size");
                assert_eq!(a % b, 0, "align({s}, {b}) = {a} not a multiple");
                assert!(a < s + b, "align({s}, {b}) = {a} overshoots");
                assert!(is_aligned(a, b));
            }
        }
    }

    #[test]
    fn is_aligned_rejects_odd_offsets() {
        assert!(!is_aligned(0x1001, 0x1000));
        assert!(is_aligned(0x3000, 0x1000));
    }
}
