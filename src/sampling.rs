/// How sample offsets are paced across a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SamplingMode {
    /// Evenly spaced day offsets, for a linear time axis.
    #[default]
    Linear,
    /// Offsets dense near the window start and sparse toward its end, so
    /// samples look evenly spread on a logarithmic time axis.
    PowerScaled,
}

impl SamplingMode {
    pub fn for_axis(log_x: bool) -> Self {
        if log_x { SamplingMode::PowerScaled } else { SamplingMode::Linear }
    }
}

/// Exponent applied to the sample index in power-scaled mode. Lower values
/// spread samples further toward the start at the cost of end resolution.
pub const POWER_SCALE_EXPONENT: f64 = 0.8;

/// Number of samples to draw for a window ending `days_through_end` days
/// after genesis.
///
/// Resolution never exceeds one sample per calendar day of history and never
/// exceeds the caller's budget.
pub fn point_budget(max_points: usize, days_through_end: i64) -> usize {
    if days_through_end <= 0 {
        return 0;
    }
    max_points.min(days_through_end as usize)
}

/// Generates `num_points` fractional day offsets across `[0, total_days]`.
///
/// Linear mode spaces them as `i / (n - 1) * total_days`. Power-scaled mode
/// maps `i` through `i^0.8`, rescales linearly into `[ln 1, ln total_days]`
/// and exponentiates, so its first offset is day 1.
///
/// A budget of one point yields the single offset `0`; zero points or an
/// empty window yield nothing.
///
/// # Arguments
/// * `num_points` - Number of offsets to produce.
/// * `total_days` - Length of the window in days.
/// * `mode` - Linear or power-scaled pacing.
///
/// # Returns
/// * `Vec<f64>` - Non-decreasing offsets in days from the window start.
pub fn sample_offsets(num_points: usize, total_days: i64, mode: SamplingMode) -> Vec<f64> {
    if num_points == 0 || total_days <= 0 {
        return Vec::new();
    }
    if num_points == 1 {
        return vec![0.0];
    }

    let total = total_days as f64;
    let last_index = (num_points - 1) as f64;

    match mode {
        SamplingMode::Linear => (0..num_points)
            .map(|i| (i as f64 / last_index) * total)
            .collect(),
        SamplingMode::PowerScaled => {
            let min_v = 1f64.ln();
            let max_v = total.ln();
            let min_p = 0f64;
            let scale = (max_v - min_v)
                / (last_index.powf(POWER_SCALE_EXPONENT) - min_p.powf(POWER_SCALE_EXPONENT));
            (0..num_points)
                .map(|i| {
                    let stretched = (i as f64).powf(POWER_SCALE_EXPONENT) - min_p.powf(POWER_SCALE_EXPONENT);
                    (min_v + scale * stretched).exp()
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_capped_by_history() {
        assert_eq!(point_budget(800, 5000), 800);
        assert_eq!(point_budget(800, 42), 42);
        assert_eq!(point_budget(800, 0), 0);
        assert_eq!(point_budget(800, -5), 0);
    }

    #[test]
    fn linear_offsets_span_the_window() {
        let offsets = sample_offsets(10, 9, SamplingMode::Linear);
        assert_eq!(offsets.len(), 10);
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[9] - 9.0).abs() < 1e-12);
        for pair in offsets.windows(2) {
            assert!((pair[1] - pair[0] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn power_scaled_offsets_are_denser_near_start() {
        let offsets = sample_offsets(500, 5000, SamplingMode::PowerScaled);
        assert_eq!(offsets.len(), 500);
        assert!((offsets[0] - 1.0).abs() < 1e-12);
        assert!((offsets[499] - 5000.0).abs() < 1e-6);
        for pair in offsets.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        let early_gap = offsets[11] - offsets[10];
        let late_gap = offsets[491] - offsets[490];
        assert!(early_gap < late_gap);
    }

    #[test]
    fn degenerate_budgets_do_not_divide_by_zero() {
        assert_eq!(sample_offsets(1, 1, SamplingMode::Linear), vec![0.0]);
        assert_eq!(sample_offsets(1, 30, SamplingMode::PowerScaled), vec![0.0]);
        assert!(sample_offsets(0, 30, SamplingMode::Linear).is_empty());
        assert!(sample_offsets(5, 0, SamplingMode::PowerScaled).is_empty());
    }

    #[test]
    fn single_day_window_in_power_mode_collapses_to_day_one() {
        let offsets = sample_offsets(2, 1, SamplingMode::PowerScaled);
        assert!(offsets.iter().all(|o| (*o - 1.0).abs() < 1e-12));
    }
}
