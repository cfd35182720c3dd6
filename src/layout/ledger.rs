//! Ledger lines for notes above or below the five-line staff.

use crate::model::{LedgerLine, NotePosition, StaffConfig};
use super::constants::*;
use super::staff::position_to_y;

/// Staff positions of the ledger lines a note at `staff_position` needs,
/// ordered outward from the staff. A note in a space stops at the last
/// line between it and the staff.
pub(super) fn ledger_positions(staff_position: i32) -> impl Iterator<Item = i32> {
    let distance = staff_position.abs() - STAFF_TOP_POSITION;
    let count = if distance > 0 { distance / 2 } else { 0 };
    let sign = staff_position.signum();
    (1..=count).map(move |k| sign * (STAFF_TOP_POSITION + 2 * k))
}

/// Ledger line segments for every note outside the staff, in note order.
pub fn ledger_lines(notes: &[NotePosition], config: &StaffConfig) -> Vec<LedgerLine> {
    let half_width = config.staff_space * LEDGER_LINE_SPACES / 2.0;

    notes
        .iter()
        .flat_map(|n| ledger_positions(n.staff_position).map(move |pos| (n, pos)))
        .enumerate()
        .map(|(seq, (n, pos))| LedgerLine {
            id: format!("ledger-{seq}"),
            note_id: n.note.id.clone(),
            staff_position: pos,
            y: position_to_y(pos, config),
            x_start: n.x - half_width,
            x_end: n.x + half_width,
            stroke_width: LEDGER_LINE_WIDTH,
        })
        .collect()
}
