//! Small interpolation helpers shared by the sculpting and blending passes.

/// Linear interpolation from `a` to `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `v` between `a` and `b`, clamped to `[0, 1]`.
/// A degenerate range (`a == b`) yields `0.0`.
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((v - a) / (b - a)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_lerp_degenerate_range() {
        assert_eq!(inverse_lerp(3.0, 3.0, 3.0), 0.0);
        assert_eq!(inverse_lerp(3.0, 3.0, 10.0), 0.0);
    }

    #[test]
    fn test_inverse_lerp_clamps() {
        assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
        assert_eq!(inverse_lerp(0.0, 10.0, -5.0), 0.0);
        assert_eq!(inverse_lerp(0.0, 10.0, 50.0), 1.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
    }
}
