//! Measure barlines.

use crate::model::{Barline, StaffConfig, TimeSignature};
use super::notes::{proportional_x, ticks_per_measure};
use super::staff::{staff_bottom_y, staff_top_y};

/// One barline at every measure boundary in `(0, max_tick]`.
///
/// Barlines sit on the proportional time axis; they never appear at tick 0.
pub fn barlines(
    time_signature: Option<&TimeSignature>,
    max_tick: u32,
    config: &StaffConfig,
) -> Vec<Barline> {
    let measure_ticks = ticks_per_measure(time_signature);
    let y_top = staff_top_y(config);
    let y_bottom = staff_bottom_y(config);

    (1..=max_tick / measure_ticks)
        .map(|measure_number| {
            let tick = measure_number * measure_ticks;
            Barline {
                measure_number,
                tick,
                x: proportional_x(tick, config),
                y_top,
                y_bottom,
                width: config.barline_width,
            }
        })
        .collect()
}
