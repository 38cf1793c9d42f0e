//! Pure interpolation helpers for scroll-driven values

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Position of `value` on the ramp from `low` to `high`, clamped to [0.0, 1.0]
///
/// A degenerate ramp (`low >= high`) is a step at `high`.
#[inline]
pub fn ramp(low: f64, high: f64, value: f64) -> f64 {
    if value >= high {
        return 1.0;
    }
    if value <= low {
        return 0.0;
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 70.0, 1.0) - 70.0).abs() < 0.001);
    }

    #[test]
    fn test_ramp_clamps() {
        assert_eq!(ramp(-120.0, 0.0, 10.0), 1.0);
        assert_eq!(ramp(-120.0, 0.0, -500.0), 0.0);
        assert!((ramp(-120.0, 0.0, -60.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_ramp_is_step() {
        assert_eq!(ramp(5.0, 5.0, 4.9), 0.0);
        assert_eq!(ramp(5.0, 5.0, 5.0), 1.0);
    }
}
