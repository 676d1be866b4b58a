/// Number of ticks requested from the nice-tick generators.
pub const TARGET_X_TICKS: usize = 6;

/// Minimum gap between kept X ticks, as a fraction of the domain.
pub const MIN_X_TICK_SPACING: f64 = 0.05;

/// Log-axis Y ticks must be at least this ratio apart.
pub const MIN_Y_TICK_RATIO: f64 = 2.0;

/// Genesis followed by each block subsidy halving.
pub const HALVING_EPOCHS: [(i32, u32, u32); 5] = [
    (2009, 1, 3),
    (2012, 11, 28),
    (2016, 7, 9),
    (2020, 5, 11),
    (2024, 4, 20),
];

pub fn halving_epoch_days() -> Vec<chrono::NaiveDate> {
    HALVING_EPOCHS
        .iter()
        .filter_map(|&(y, m, d)| chrono::NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

/// Span between two consecutive halvings, in plot X coordinates and clipped
/// to the visible domain.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EpochRange {
    /// 0 for the genesis epoch, 1 after the first halving, and so on.
    pub epoch: usize,
    pub start_x: f64,
    pub end_x: f64,
}

/// Maps each halving epoch to a clipped X range. Epochs entirely outside
/// `[min_x, max_x]` are dropped; the current epoch runs to `max_x`.
pub fn epoch_ranges(min_x: f64, max_x: f64, to_x: impl Fn(chrono::NaiveDate) -> f64) -> Vec<EpochRange> {
    let starts: Vec<f64> = halving_epoch_days().into_iter().map(to_x).collect();
    starts
        .iter()
        .enumerate()
        .filter_map(|(epoch, &start)| {
            let end = starts.get(epoch + 1).copied().unwrap_or(max_x.max(start));
            if end < min_x || start > max_x {
                return None;
            }
            Some(EpochRange {
                epoch,
                start_x: start.max(min_x),
                end_x: end.min(max_x),
            })
        })
        .collect()
}

/// Step of roughly `count` nice ticks over `[start, stop]`: 1, 2 or 5 times a
/// power of ten.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count.max(1) as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Nice linear ticks inside `[start, stop]`.
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !(stop > start) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let step = tick_step(start, stop, count);
    let first = (start / step).ceil() as i64;
    let last = (stop / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Base-10 log ticks inside `[start, stop]`: every `k * 10^p` for `k` in 1..=9
/// when the domain covers few decades, only powers of ten otherwise.
pub fn log_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !(start > 0.0) || !(stop > start) || !stop.is_finite() {
        return Vec::new();
    }
    let low = start.log10().floor() as i32;
    let high = stop.log10().ceil() as i32;
    let multiples: &[f64] = if ((high - low) as usize) < count {
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
    } else {
        &[1.0]
    };
    let mut ticks = Vec::new();
    for p in low..=high {
        let base = 10f64.powi(p);
        for k in multiples {
            let t = k * base;
            if t >= start && t <= stop {
                ticks.push(t);
            }
        }
    }
    ticks
}

/// X axis tick values: both domain edges plus about six nice ticks, thinned
/// so no two are closer than 5 % of the domain. The upper edge always
/// survives, replacing a neighbour that sits too close to it.
pub fn x_ticks(min_x: f64, max_x: f64, log_x: bool) -> Vec<f64> {
    if !(max_x > min_x) {
        return vec![min_x];
    }
    let inner = if log_x {
        log_ticks(min_x, max_x, TARGET_X_TICKS)
    } else {
        linear_ticks(min_x, max_x, TARGET_X_TICKS)
    };

    let min_gap = (max_x - min_x) * MIN_X_TICK_SPACING;
    let mut kept = vec![min_x];
    for value in inner {
        if let Some(&last) = kept.last() {
            if value - last >= min_gap {
                kept.push(value);
            }
        }
    }
    let has_inner = kept.len() > 1;
    match kept.last_mut() {
        Some(last) if has_inner && max_x - *last < min_gap => *last = max_x,
        _ => kept.push(max_x),
    }
    kept.dedup();
    kept
}

/// Log Y axis tick values: the observed extremes and every power of ten
/// between them, keeping only values at least twice their predecessor.
pub fn log_y_ticks(lowest: f64, highest: f64) -> Vec<f64> {
    let mut candidates = vec![lowest];
    candidates.extend(
        (0..10)
            .map(|i| 10f64.powi(i))
            .filter(|v| *v > lowest && *v < highest),
    );
    candidates.push(highest);

    let mut ticks = Vec::with_capacity(candidates.len());
    for (i, value) in candidates.iter().enumerate() {
        if i == 0 || value / candidates[i - 1] >= MIN_Y_TICK_RATIO {
            ticks.push(*value);
        }
    }
    ticks
}
