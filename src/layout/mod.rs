//! Staff layout: converts notes, a clef, and display config into final
//! pixel geometry.
//!
//! Every function here is pure: the same inputs always produce the same
//! geometry, and nothing is cached between calls. The drawing layer is
//! expected to paint the result without recomputing any coordinate.

mod barlines;
mod constants;
mod ledger;
mod notes;
mod pitch;
mod staff;
mod viewport;

use log::debug;

use crate::error::LayoutError;
use crate::model::*;

pub use barlines::barlines;
pub use ledger::ledger_lines;
pub use notes::{layout_notes, min_note_width, DurationClass};
pub use pitch::{map_pitch, resolve_accidental};
pub use staff::{clef_position, position_to_y, staff_lines, time_signature_position};
pub use viewport::visible_range;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Lay out one staff.
///
/// A missing time signature means 4/4. An invalid one is rejected here,
/// before it can reach any tick-derived coordinate.
pub fn compute_layout(
    notes: &[Note],
    clef: ClefType,
    time_signature: Option<&TimeSignature>,
    config: &StaffConfig,
) -> Result<LayoutGeometry, LayoutError> {
    if let Some(ts) = time_signature {
        ts.validate()?;
    }

    let max_tick = notes.iter().map(Note::end_tick).max().unwrap_or(0);
    let total_width = config.content_start_x() + max_tick as f64 * config.pixels_per_tick;
    let total_height = config.viewport_height;

    let staff_lines = staff_lines(total_width, config);
    let clef_glyph = clef_position(clef, config);
    let time_signature_glyphs = time_signature.map(|ts| time_signature_position(ts, config));

    let positioned = layout_notes(notes, clef, config, time_signature);
    let ledger_lines = ledger_lines(&positioned, config);
    let barlines = barlines(time_signature, max_tick, config);
    let visible_range = visible_range(&positioned, config);

    debug!(
        "layout: {} notes, {} barlines, {} ledger lines, {:.1}x{:.1}px, visible {}..{}",
        positioned.len(),
        barlines.len(),
        ledger_lines.len(),
        total_width,
        total_height,
        visible_range.start_idx,
        visible_range.end_idx,
    );

    Ok(LayoutGeometry {
        notes: positioned,
        staff_lines,
        barlines,
        ledger_lines,
        clef: clef_glyph,
        time_signature: time_signature_glyphs,
        total_width,
        total_height,
        visible_range,
    })
}
