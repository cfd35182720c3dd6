//! Pitch → staff position mapping and accidental resolution.
//!
//! Each clef owns a fixed table of the natural (white-key) pitches across the
//! whole MIDI range, paired with their staff position. The clef's middle-line
//! pitch sits at position 0 and every diatonic step moves one position.
//! Chromatic pitches are not in the table; they take the position of the
//! nearest natural *below* them, so C#4 shares C4's line and carries a sharp.

use crate::model::{Accidental, ClefType};

/// Natural pitches in 0..=127: ten full octaves plus C–G of the eleventh.
const NATURAL_COUNT: usize = 75;

/// Semitone offsets of C D E F G A B within an octave.
const NATURAL_SEMITONES: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Pitch classes spelled with a sharp: C#, D#, F#, G#, A#.
const SHARP_PITCH_CLASSES: [u8; 5] = [1, 3, 6, 8, 10];

/// Natural pitches of one clef, ascending, with their staff positions.
pub(super) struct DiatonicTable {
    entries: [(u8, i32); NATURAL_COUNT],
}

impl DiatonicTable {
    /// Build the table so that `middle_line_pitch` lands on position 0.
    /// `middle_line_pitch` must be a natural.
    const fn build(middle_line_pitch: u8) -> Self {
        let mut middle_index = 0;
        let mut i = 0;
        while i < NATURAL_COUNT {
            if natural_at(i) == middle_line_pitch {
                middle_index = i;
            }
            i += 1;
        }

        let mut entries = [(0u8, 0i32); NATURAL_COUNT];
        let mut i = 0;
        while i < NATURAL_COUNT {
            entries[i] = (natural_at(i), i as i32 - middle_index as i32);
            i += 1;
        }
        Self { entries }
    }

    /// Position of the largest tabulated pitch ≤ `pitch`.
    fn position(&self, pitch: u8) -> i32 {
        // entries[0] is pitch 0, so at least one entry always qualifies.
        let idx = self.entries.partition_point(|&(p, _)| p <= pitch);
        self.entries[idx.saturating_sub(1)].1
    }

    fn contains(&self, pitch: u8) -> bool {
        self.entries
            .binary_search_by_key(&pitch, |&(p, _)| p)
            .is_ok()
    }
}

/// The `index`-th natural pitch counting up from MIDI 0 (C-1).
const fn natural_at(index: usize) -> u8 {
    (index / 7 * 12) as u8 + NATURAL_SEMITONES[index % 7]
}

static TREBLE_TABLE: DiatonicTable = DiatonicTable::build(71); // B4
static BASS_TABLE: DiatonicTable = DiatonicTable::build(50); // D3
static ALTO_TABLE: DiatonicTable = DiatonicTable::build(60); // C4
static TENOR_TABLE: DiatonicTable = DiatonicTable::build(57); // A3

fn table(clef: ClefType) -> &'static DiatonicTable {
    match clef {
        ClefType::Treble => &TREBLE_TABLE,
        ClefType::Bass => &BASS_TABLE,
        ClefType::Alto => &ALTO_TABLE,
        ClefType::Tenor => &TENOR_TABLE,
    }
}

/// Staff position of `pitch` under `clef`, in half-line units from the middle line.
///
/// Chromatic pitches round *down* to the nearest natural; they are never
/// interpolated.
pub fn map_pitch(pitch: u8, clef: ClefType) -> i32 {
    table(clef).position(pitch)
}

/// Accidental to draw for `pitch`, or `None` for a natural.
///
/// Not key-signature aware: sharp for pitch classes C# D# F# G# A#, flat
/// for any other pitch outside the clef's natural table.
pub fn resolve_accidental(pitch: u8, clef: ClefType) -> Option<Accidental> {
    if table(clef).contains(pitch) {
        return None;
    }
    if SHARP_PITCH_CLASSES.contains(&(pitch % 12)) {
        Some(Accidental::Sharp)
    } else {
        Some(Accidental::Flat)
    }
}
