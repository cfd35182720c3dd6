//! Shared constants for the layout engine (pixels unless noted).

use crate::model::TICKS_PER_QUARTER;

// ── Timing ──────────────────────────────────────────────────────────
pub(super) const DEFAULT_TICKS_PER_MEASURE: u32 = TICKS_PER_QUARTER * 4; // 4/4

// Duration thresholds for glyph selection (ticks)
pub(super) const WHOLE_TICKS: u32 = TICKS_PER_QUARTER * 4;
pub(super) const HALF_TICKS: u32 = TICKS_PER_QUARTER * 2;
pub(super) const QUARTER_TICKS: u32 = TICKS_PER_QUARTER;
pub(super) const EIGHTH_TICKS: u32 = TICKS_PER_QUARTER / 2;
pub(super) const SIXTEENTH_TICKS: u32 = TICKS_PER_QUARTER / 4;
pub(super) const THIRTY_SECOND_TICKS: u32 = TICKS_PER_QUARTER / 8;
pub(super) const SIXTY_FOURTH_TICKS: u32 = TICKS_PER_QUARTER / 16;

// ── Staff dimensions ────────────────────────────────────────────────
pub(super) const STAFF_LINE_WIDTH: f64 = 1.0;
pub(super) const LEDGER_LINE_WIDTH: f64 = 1.0;
pub(super) const LEDGER_LINE_SPACES: f64 = 2.5; // ledger length in staff spaces
pub(super) const STAFF_TOP_POSITION: i32 = 4;
pub(super) const STAFF_BOTTOM_POSITION: i32 = -4;
pub(super) const STAFF_LINE_POSITIONS: [i32; 5] = [-4, -2, 0, 2, 4]; // bottom to top

// ── Spacing ─────────────────────────────────────────────────────────
pub(super) const BARLINE_CLEARANCE_FACTOR: f64 = 1.5; // × min_note_spacing after a barline
pub(super) const THIRTY_SECOND_WIDTH_FACTOR: f64 = 2.5;
pub(super) const SIXTY_FOURTH_WIDTH_FACTOR: f64 = 3.5;
pub(super) const HUNDRED_TWENTY_EIGHTH_WIDTH_FACTOR: f64 = 4.0;
pub(super) const ACCIDENTAL_OFFSET_SPACES: f64 = 1.45; // accidental center, left of the notehead center

// ── Time signature ──────────────────────────────────────────────────
pub(super) const TIME_SIGNATURE_NUMERATOR_POSITION: i32 = 2;
pub(super) const TIME_SIGNATURE_DENOMINATOR_POSITION: i32 = -2;

// ── SMuFL codepoints ────────────────────────────────────────────────
pub(super) const G_CLEF: char = '\u{E050}';
pub(super) const F_CLEF: char = '\u{E062}';
pub(super) const C_CLEF: char = '\u{E05C}';

pub(super) const TIME_SIGNATURE_DIGIT_ZERO: u32 = 0xE080; // timeSig0..timeSig9

pub(super) const NOTE_WHOLE: char = '\u{E1D2}';
pub(super) const NOTE_HALF_UP: char = '\u{E1D3}';
pub(super) const NOTE_HALF_DOWN: char = '\u{E1D4}';
pub(super) const NOTE_QUARTER_UP: char = '\u{E1D5}';
pub(super) const NOTE_QUARTER_DOWN: char = '\u{E1D6}';
pub(super) const NOTE_8TH_UP: char = '\u{E1D7}';
pub(super) const NOTE_8TH_DOWN: char = '\u{E1D8}';
pub(super) const NOTE_16TH_UP: char = '\u{E1D9}';
pub(super) const NOTE_16TH_DOWN: char = '\u{E1DA}';
pub(super) const NOTE_32ND_UP: char = '\u{E1DB}';
pub(super) const NOTE_32ND_DOWN: char = '\u{E1DC}';
pub(super) const NOTE_64TH_UP: char = '\u{E1DD}';
pub(super) const NOTE_64TH_DOWN: char = '\u{E1DE}';
pub(super) const NOTE_128TH_UP: char = '\u{E1DF}';
pub(super) const NOTE_128TH_DOWN: char = '\u{E1E0}';
