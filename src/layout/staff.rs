//! Staff geometry: staff position → y, the five staff lines, the clef and
//! the time signature.

use crate::model::{
    ClefPosition, ClefType, StaffConfig, StaffLine, TimeSignature, TimeSignaturePosition,
};
use super::constants::*;

/// Vertical pixel coordinate of a staff position.
///
/// The middle line sits at half the viewport height; adjacent lines are two
/// positions (one staff space) apart, and higher positions are further up.
pub fn position_to_y(staff_position: i32, config: &StaffConfig) -> f64 {
    config.viewport_height / 2.0 - (staff_position as f64 / 2.0) * config.staff_space
}

/// y of the top staff line.
pub(super) fn staff_top_y(config: &StaffConfig) -> f64 {
    position_to_y(STAFF_TOP_POSITION, config)
}

/// y of the bottom staff line.
pub(super) fn staff_bottom_y(config: &StaffConfig) -> f64 {
    position_to_y(STAFF_BOTTOM_POSITION, config)
}

/// The five staff lines, numbered 1–5 from the bottom, spanning `[0, total_width]`.
pub fn staff_lines(total_width: f64, config: &StaffConfig) -> [StaffLine; 5] {
    STAFF_LINE_POSITIONS
        .map(|pos| StaffLine {
            line_number: (pos / 2 + 3) as u8,
            staff_position: pos,
            y: position_to_y(pos, config),
            x_start: 0.0,
            x_end: total_width,
            stroke_width: STAFF_LINE_WIDTH,
        })
}

/// Placement of the clef glyph at the start of the staff.
///
/// Every clef is centered on the staff's middle line; per-clef vertical
/// offsets are not applied.
pub fn clef_position(clef: ClefType, config: &StaffConfig) -> ClefPosition {
    ClefPosition {
        clef,
        codepoint: clef_codepoint(clef),
        x: config.margin_left / 2.0,
        y: position_to_y(0, config),
        font_size: config.glyph_font_size(),
    }
}

/// Placement of the time signature, centered in the right half of the clef column.
///
/// The numerator is centered on the fourth line and the denominator on the
/// second; multi-digit numbers are spelled out one SMuFL digit per glyph.
pub fn time_signature_position(
    time_signature: &TimeSignature,
    config: &StaffConfig,
) -> TimeSignaturePosition {
    TimeSignaturePosition {
        time_signature: *time_signature,
        numerator_glyphs: digit_glyphs(time_signature.numerator),
        denominator_glyphs: digit_glyphs(time_signature.denominator),
        x: config.content_start_x() - config.clef_width / 4.0,
        numerator_y: position_to_y(TIME_SIGNATURE_NUMERATOR_POSITION, config),
        denominator_y: position_to_y(TIME_SIGNATURE_DENOMINATOR_POSITION, config),
        font_size: config.glyph_font_size(),
    }
}

fn digit_glyphs(value: u32) -> String {
    value
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .filter_map(|d| char::from_u32(TIME_SIGNATURE_DIGIT_ZERO + d))
        .collect()
}

fn clef_codepoint(clef: ClefType) -> char {
    match clef {
        ClefType::Treble => G_CLEF,
        ClefType::Bass => F_CLEF,
        ClefType::Alto | ClefType::Tenor => C_CLEF,
    }
}
