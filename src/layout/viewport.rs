//! Viewport windowing: which notes are on screen.

use crate::model::{NotePosition, StaffConfig, VisibleRange};

/// Index range of notes within `[scroll_x - render_buffer, scroll_x + viewport_width + render_buffer]`.
///
/// `notes` must be sorted by x, which `layout_notes` guarantees. The start is
/// found by binary search; the end by scanning forward over the visible notes.
pub fn visible_range(notes: &[NotePosition], config: &StaffConfig) -> VisibleRange {
    let min_x = config.scroll_x - config.render_buffer;
    let max_x = config.scroll_x + config.viewport_width + config.render_buffer;

    let start_idx = notes.partition_point(|n| n.x < min_x);
    let end_idx = notes[start_idx..]
        .iter()
        .position(|n| n.x > max_x)
        .map_or(notes.len(), |offset| start_idx + offset);

    VisibleRange { start_idx, end_idx }
}
