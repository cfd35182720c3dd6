//! Data model for the staff layout engine.
//!
//! Inputs (notes, clef, time signature, display config) and the geometry
//! records produced from them. Every coordinate is in pixels, y grows
//! downward, and every output record is created fresh on each layout pass.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Fixed timing resolution: ticks per quarter note.
pub const TICKS_PER_QUARTER: u32 = 960;

/// Largest time-signature denominator accepted (a 256th-note beat).
pub const MAX_DENOMINATOR: u32 = 256;

// ═══════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════

/// A single note supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque identifier, carried through to the output unchanged
    pub id: String,
    /// MIDI pitch (60 = middle C)
    pub pitch: u8,
    /// Onset in ticks (960 per quarter note)
    pub start_tick: u32,
    /// Length in ticks
    pub duration_ticks: u32,
}

impl Note {
    pub fn new(id: impl Into<String>, pitch: u8, start_tick: u32, duration_ticks: u32) -> Self {
        Self {
            id: id.into(),
            pitch,
            start_tick,
            duration_ticks,
        }
    }

    /// Tick at which the note stops sounding.
    pub fn end_tick(&self) -> u32 {
        self.start_tick.saturating_add(self.duration_ticks)
    }
}

/// Clef in effect for the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClefType {
    #[default]
    Treble,
    Bass,
    Alto,
    Tenor,
}

/// Time signature, e.g. 3/4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Beats per measure (e.g., 3 in 3/4)
    pub numerator: u32,
    /// Beat unit as a power of two (e.g., 4 in 3/4)
    pub denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    /// Reject signatures that would produce a meaningless measure length.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.ticks_per_measure().is_none() {
            return Err(LayoutError::InvalidTimeSignature {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    /// `960 × (4 / denominator) × numerator`, or `None` if the signature is invalid.
    pub fn ticks_per_measure(&self) -> Option<u32> {
        let valid = self.numerator > 0
            && self.denominator.is_power_of_two()
            && self.denominator <= MAX_DENOMINATOR;
        if !valid {
            return None;
        }
        (TICKS_PER_QUARTER * 4)
            .checked_mul(self.numerator)
            .map(|ticks| ticks / self.denominator)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// Display configuration for one layout pass.
///
/// Deserializes from partial JSON: any missing key takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffConfig {
    /// Height of the drawing surface; the staff's middle line sits at half of it
    pub viewport_height: f64,
    /// Distance between adjacent staff lines (2 staff-position units)
    pub staff_space: f64,
    /// Space to the left of the clef
    pub margin_left: f64,
    /// Horizontal room reserved for the clef glyph
    pub clef_width: f64,
    /// Proportional spacing rate
    pub pixels_per_tick: f64,
    /// Base minimum gap between consecutive notes
    pub min_note_spacing: f64,
    /// Glyph point size = `staff_space × glyph_font_size_multiplier`
    pub glyph_font_size_multiplier: f64,
    pub barline_width: f64,
    /// Left edge of the visible viewport
    pub scroll_x: f64,
    pub viewport_width: f64,
    /// Extra margin on both sides of the viewport when windowing notes
    pub render_buffer: f64,
}

impl Default for StaffConfig {
    fn default() -> Self {
        Self {
            viewport_height: 200.0,
            staff_space: 10.0,
            margin_left: 60.0,
            clef_width: 40.0,
            pixels_per_tick: 0.1,
            min_note_spacing: 20.0,
            glyph_font_size_multiplier: 4.0,
            barline_width: 1.0,
            scroll_x: 0.0,
            viewport_width: 1200.0,
            render_buffer: 200.0,
        }
    }
}

impl StaffConfig {
    /// Parse a (possibly partial) JSON object into a config.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Left edge of the note area: `margin_left + clef_width`.
    pub fn content_start_x(&self) -> f64 {
        self.margin_left + self.clef_width
    }

    /// Point size for musical glyphs.
    pub fn glyph_font_size(&self) -> f64 {
        self.staff_space * self.glyph_font_size_multiplier
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Outputs
// ═══════════════════════════════════════════════════════════════════════

/// Accidental marking drawn before a notehead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    /// SMuFL codepoint for the accidental glyph.
    pub fn codepoint(self) -> char {
        match self {
            Accidental::Sharp => '\u{E262}',
            Accidental::Flat => '\u{E260}',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StemDirection {
    Up,
    Down,
}

impl StemDirection {
    /// Notes below the middle line get upward stems.
    pub fn for_staff_position(staff_position: i32) -> Self {
        if staff_position < 0 {
            StemDirection::Up
        } else {
            StemDirection::Down
        }
    }
}

/// A note with its final coordinates and glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotePosition {
    /// The input note, unchanged
    #[serde(flatten)]
    pub note: Note,
    /// Horizontal notehead anchor
    pub x: f64,
    /// Vertical notehead anchor
    pub y: f64,
    /// Half-line units from the middle line (even = line, odd = space)
    pub staff_position: i32,
    /// SMuFL codepoint of the precomposed note glyph
    pub glyph_codepoint: char,
    pub font_size: f64,
    pub accidental: Option<Accidental>,
    /// Horizontal anchor of the accidental glyph (same y as the notehead)
    pub accidental_x: Option<f64>,
}

impl NotePosition {
    pub fn stem_direction(&self) -> StemDirection {
        StemDirection::for_staff_position(self.staff_position)
    }
}

/// One of the five staff lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffLine {
    /// 1 (bottom) to 5 (top)
    pub line_number: u8,
    pub staff_position: i32,
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClefPosition {
    pub clef: ClefType,
    pub codepoint: char,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

/// Stacked time-signature digits drawn between the clef and the first note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSignaturePosition {
    pub time_signature: TimeSignature,
    /// SMuFL digit glyphs for the top number, left to right
    pub numerator_glyphs: String,
    pub denominator_glyphs: String,
    pub x: f64,
    pub numerator_y: f64,
    pub denominator_y: f64,
    pub font_size: f64,
}

/// A short staff extension drawn for a note outside the five lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Unique within one layout pass
    pub id: String,
    /// Id of the note this segment belongs to
    pub note_id: String,
    pub staff_position: i32,
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub stroke_width: f64,
}

/// Vertical measure divider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barline {
    /// 1-based number of the measure this barline closes
    pub measure_number: u32,
    pub tick: u32,
    pub x: f64,
    /// Top staff line
    pub y_top: f64,
    /// Bottom staff line
    pub y_bottom: f64,
    pub width: f64,
}

/// Half-open index range `[start_idx, end_idx)` of notes to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.end_idx.saturating_sub(self.start_idx)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start_idx..self.end_idx
    }
}

/// Everything a drawing layer needs for one staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    /// Ordered by ascending start tick (and therefore by x)
    pub notes: Vec<NotePosition>,
    /// Bottom to top
    pub staff_lines: [StaffLine; 5],
    pub barlines: Vec<Barline>,
    pub ledger_lines: Vec<LedgerLine>,
    pub clef: ClefPosition,
    /// Present only when a time signature was supplied
    pub time_signature: Option<TimeSignaturePosition>,
    pub total_width: f64,
    pub total_height: f64,
    pub visible_range: VisibleRange,
}

impl LayoutGeometry {
    /// The notes inside the visible window; empty if the range is out of bounds.
    pub fn visible_notes(&self) -> &[NotePosition] {
        self.notes.get(self.visible_range.as_range()).unwrap_or(&[])
    }
}
