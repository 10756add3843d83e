//! Dead-band conditioner.
//!
//! The analog front-end idles in a noisy band around mid-scale. Any raw
//! sample strictly inside `(100, 150)` is collapsed to 125 so the plotted
//! baseline is flat; everything else passes through untouched.

use crate::config::{MonitorConfig, DEAD_BAND_HIGH, DEAD_BAND_LOW, DEAD_BAND_VALUE};
use crate::sample::Sample;

/// Condition a raw sample with the stock dead-band.
#[inline]
pub const fn condition(sample: Sample) -> Sample {
    collapse(sample, DEAD_BAND_LOW, DEAD_BAND_HIGH, DEAD_BAND_VALUE)
}

/// Condition a raw sample with the dead-band from `config`.
#[inline]
pub const fn condition_with(config: &MonitorConfig, sample: Sample) -> Sample {
    collapse(
        sample,
        config.dead_band_low,
        config.dead_band_high,
        config.dead_band_value,
    )
}

#[inline]
const fn collapse(sample: Sample, low: Sample, high: Sample, value: Sample) -> Sample {
    if sample > low && sample < high {
        value
    } else {
        sample
    }
}
