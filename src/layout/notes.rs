//! Note scheduling: horizontal spacing, vertical placement, and glyph choice.

use crate::model::*;
use super::constants::*;
use super::pitch::{map_pitch, resolve_accidental};
use super::staff::position_to_y;

/// Rhythmic value a duration is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationClass {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    HundredTwentyEighth,
}

impl DurationClass {
    /// Classify a duration by the longest value it reaches.
    pub fn from_ticks(duration_ticks: u32) -> Self {
        match duration_ticks {
            d if d >= WHOLE_TICKS => DurationClass::Whole,
            d if d >= HALF_TICKS => DurationClass::Half,
            d if d >= QUARTER_TICKS => DurationClass::Quarter,
            d if d >= EIGHTH_TICKS => DurationClass::Eighth,
            d if d >= SIXTEENTH_TICKS => DurationClass::Sixteenth,
            d if d >= THIRTY_SECOND_TICKS => DurationClass::ThirtySecond,
            d if d >= SIXTY_FOURTH_TICKS => DurationClass::SixtyFourth,
            _ => DurationClass::HundredTwentyEighth,
        }
    }

    /// SMuFL precomposed note glyph; the whole note has no stem variant.
    pub fn codepoint(self, stem: StemDirection) -> char {
        let up = stem == StemDirection::Up;
        match self {
            DurationClass::Whole => NOTE_WHOLE,
            DurationClass::Half => if up { NOTE_HALF_UP } else { NOTE_HALF_DOWN },
            DurationClass::Quarter => if up { NOTE_QUARTER_UP } else { NOTE_QUARTER_DOWN },
            DurationClass::Eighth => if up { NOTE_8TH_UP } else { NOTE_8TH_DOWN },
            DurationClass::Sixteenth => if up { NOTE_16TH_UP } else { NOTE_16TH_DOWN },
            DurationClass::ThirtySecond => if up { NOTE_32ND_UP } else { NOTE_32ND_DOWN },
            DurationClass::SixtyFourth => if up { NOTE_64TH_UP } else { NOTE_64TH_DOWN },
            DurationClass::HundredTwentyEighth => if up { NOTE_128TH_UP } else { NOTE_128TH_DOWN },
        }
    }

    /// Multiple of `min_note_spacing` this value needs; more flags, more room.
    pub fn width_factor(self) -> f64 {
        match self {
            DurationClass::ThirtySecond => THIRTY_SECOND_WIDTH_FACTOR,
            DurationClass::SixtyFourth => SIXTY_FOURTH_WIDTH_FACTOR,
            DurationClass::HundredTwentyEighth => HUNDRED_TWENTY_EIGHTH_WIDTH_FACTOR,
            _ => 1.0,
        }
    }
}

/// Horizontal room a note of `duration_ticks` needs from its neighbour.
pub fn min_note_width(duration_ticks: u32, config: &StaffConfig) -> f64 {
    config.min_note_spacing * DurationClass::from_ticks(duration_ticks).width_factor()
}

/// Measure length in ticks, falling back to 4/4 when absent or invalid.
pub(super) fn ticks_per_measure(time_signature: Option<&TimeSignature>) -> u32 {
    time_signature
        .and_then(TimeSignature::ticks_per_measure)
        .unwrap_or(DEFAULT_TICKS_PER_MEASURE)
}

/// x for `tick` on a purely proportional time axis.
pub(super) fn proportional_x(tick: u32, config: &StaffConfig) -> f64 {
    config.content_start_x() + tick as f64 * config.pixels_per_tick
}

/// Accidental anchor for a notehead at `note_x`, scaled with the staff size.
pub(super) fn accidental_x(note_x: f64, config: &StaffConfig) -> f64 {
    note_x - config.staff_space * ACCIDENTAL_OFFSET_SPACES
}

/// Position every note on the staff.
///
/// Output is sorted by start tick (stable, so simultaneous notes keep their
/// input order). Each note lands at its proportional x unless that would
/// crowd its predecessor; notes on a measure boundary are pushed clear of
/// the barline drawn there.
pub fn layout_notes(
    notes: &[Note],
    clef: ClefType,
    config: &StaffConfig,
    time_signature: Option<&TimeSignature>,
) -> Vec<NotePosition> {
    if notes.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by_key(|n| n.start_tick);

    let measure_ticks = ticks_per_measure(time_signature);
    let font_size = config.glyph_font_size();

    let mut previous_x = config.content_start_x() - config.min_note_spacing;
    let mut previous_duration: Option<u32> = None;

    sorted
        .into_iter()
        .map(|note| {
            let staff_position = map_pitch(note.pitch, clef);

            let mut target_x = proportional_x(note.start_tick, config);
            if note.start_tick > 0 && note.start_tick % measure_ticks == 0 {
                target_x += config.min_note_spacing * BARLINE_CLEARANCE_FACTOR;
            }

            let own_width = min_note_width(note.duration_ticks, config);
            let min_width = previous_duration
                .map_or(own_width, |d| own_width.max(min_note_width(d, config)));

            let mut x = target_x.max(previous_x + min_width);
            // The sum can round below the required gap when read back as a difference
            while x - previous_x < min_width {
                x = x.next_up();
            }
            previous_x = x;
            previous_duration = Some(note.duration_ticks);

            let stem = StemDirection::for_staff_position(staff_position);
            let accidental = resolve_accidental(note.pitch, clef);
            NotePosition {
                note: note.clone(),
                x,
                y: position_to_y(staff_position, config),
                staff_position,
                glyph_codepoint: DurationClass::from_ticks(note.duration_ticks).codepoint(stem),
                font_size,
                accidental,
                accidental_x: accidental.map(|_| accidental_x(x, config)),
            }
        })
        .collect()
}
