use super::ProgressionError;

/// Recomputed rep targets are clamped into the hypertrophy band
pub const MIN_VOLUME_REPS: u32 = 8;
pub const MAX_VOLUME_REPS: u32 = 12;

/// Reps at `new_load` that keep sets × reps × load roughly where it was at
/// the previous load, clamped to [`MIN_VOLUME_REPS`]..=[`MAX_VOLUME_REPS`].
/// A set count of zero is treated as one set
pub fn volume_preserving_reps(
    previous_load: f64,
    previous_reps: u32,
    new_load: f64,
    set_count: u32,
) -> Result<u32, ProgressionError> {
    if !new_load.is_finite() || new_load <= 0.0 {
        return Err(ProgressionError::InvalidLoad { load: new_load });
    }

    let sets = f64::from(set_count.max(1));
    let previous_volume = sets * f64::from(previous_reps) * previous_load;
    let reps = (previous_volume / (sets * new_load)).round();

    // Negative or NaN volumes saturate to 0 and get clamped up
    Ok((reps as u32).clamp(MIN_VOLUME_REPS, MAX_VOLUME_REPS))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_small_load_increase_keeps_volume_close() {
        let reps = volume_preserving_reps(100.0, 10, 105.0, 3).unwrap();
        assert!((MIN_VOLUME_REPS..=MAX_VOLUME_REPS).contains(&reps));

        let original = 3.0 * 10.0 * 100.0;
        let new = 3.0 * f64::from(reps) * 105.0;
        assert!((new - original).abs() / original <= 0.15, "volume drifted to {new}");
    }

    #[test]
    fn test_clamps_to_hypertrophy_band() {
        // 15 reps at 100 is 15.7 reps at 95.5, clamped down
        assert_eq!(volume_preserving_reps(100.0, 15, 95.5, 3).unwrap(), 12);
        // 5 reps at 100 is 4.8 reps at 105, clamped up
        assert_eq!(volume_preserving_reps(100.0, 5, 105.0, 3).unwrap(), 8);
    }

    #[test]
    fn test_set_count_cancels_out() {
        assert_eq!(
            volume_preserving_reps(100.0, 15, 105.0, 1).unwrap(),
            volume_preserving_reps(100.0, 15, 105.0, 5).unwrap()
        );
        assert_eq!(volume_preserving_reps(100.0, 11, 105.0, 0).unwrap(), 10);
    }

    #[test]
    fn test_non_positive_new_load_is_rejected() {
        assert_eq!(
            volume_preserving_reps(100.0, 10, 0.0, 3),
            Err(ProgressionError::InvalidLoad { load: 0.0 })
        );
        assert!(volume_preserving_reps(100.0, 10, -2.5, 3).is_err());
        assert!(volume_preserving_reps(100.0, 10, f64::NAN, 3).is_err());
    }
}
