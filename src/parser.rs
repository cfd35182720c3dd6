//! MusicXML import. Reads one staff of one part into tick-based notes.
//!
//! Only what the layout engine consumes is extracted: pitches, onsets and
//! durations (converted to 960 ticks per quarter), the first clef, and the
//! first time signature. Anything beyond a single voice on a single staff is
//! skipped with a warning.

use log::warn;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::model::*;

/// The notes and staff attributes read from a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedStaff {
    /// Id of the part the notes came from (e.g., "P1")
    pub part_id: String,
    /// Work or movement title, if any
    pub title: Option<String>,
    pub clef: ClefType,
    pub time_signature: Option<TimeSignature>,
    pub notes: Vec<Note>,
}

/// Parse a MusicXML XML string, importing the first part.
pub fn parse_musicxml(xml: &str) -> Result<ImportedStaff, LayoutError> {
    // MusicXML files include a DOCTYPE declaration, so we must allow DTDs
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| LayoutError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "score-partwise" {
        return Err(LayoutError::UnsupportedFormat(format!(
            "root element '{}', only 'score-partwise' is supported",
            root.tag_name().name()
        )));
    }

    let mut title = None;
    let mut first_part = None;
    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "work" => {
                if let Some(t) = find_child(&child, "work-title").and_then(|n| text_of(&n)) {
                    title = Some(t);
                }
            }
            "movement-title" => {
                // <work-title> takes priority
                if title.is_none() {
                    title = text_of(&child);
                }
            }
            "part" => {
                if first_part.is_none() {
                    first_part = Some(child);
                }
            }
            _ => {}
        }
    }

    let part = first_part
        .ok_or_else(|| LayoutError::UnsupportedFormat("no <part> element".to_string()))?;
    let part_id = part.attribute("id").unwrap_or("P1").to_string();

    let mut reader = PartReader::new(&part_id);
    for measure in part.children().filter(|n| n.is_element() && n.tag_name().name() == "measure") {
        reader.read_measure(&measure);
    }
    reader.report_skipped();

    let clef = reader.clef.unwrap_or_default();
    let time_signature = reader.time_signature;
    let notes = reader.notes;

    Ok(ImportedStaff {
        part_id,
        title,
        clef,
        time_signature,
        notes,
    })
}

// ─── Part ────────────────────────────────────────────────────────────

/// Running state while walking a part's measures in document order.
struct PartReader<'a> {
    part_id: &'a str,
    /// Divisions per quarter note; `None` until the first <divisions>
    divisions: Option<u32>,
    /// Absolute cursor in ticks
    position: u32,
    /// Furthest tick reached in the current measure
    measure_end: u32,
    /// The one voice we import (first voice seen on staff 1)
    voice: Option<String>,
    clef: Option<ClefType>,
    time_signature: Option<TimeSignature>,
    notes: Vec<Note>,
    skipped_notes: usize,
    /// Chord members after the first notehead; one staff line of notes cannot stack them
    skipped_chord_tones: usize,
}

impl<'a> PartReader<'a> {
    fn new(part_id: &'a str) -> Self {
        Self {
            part_id,
            divisions: None,
            position: 0,
            measure_end: 0,
            voice: None,
            clef: None,
            time_signature: None,
            notes: Vec::new(),
            skipped_notes: 0,
            skipped_chord_tones: 0,
        }
    }

    fn read_measure(&mut self, node: &Node) {
        let measure_start = self.measure_end.max(self.position);
        self.position = measure_start;
        self.measure_end = measure_start;

        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "attributes" => self.read_attributes(&child),
                "note" => self.read_note(&child),
                "backup" => {
                    let ticks = self.duration_ticks(&child);
                    self.position = self.position.saturating_sub(ticks).max(measure_start);
                }
                "forward" => {
                    let ticks = self.duration_ticks(&child);
                    self.advance(ticks);
                }
                _ => {}
            }
        }
    }

    fn advance(&mut self, ticks: u32) {
        self.position = self.position.saturating_add(ticks);
        self.measure_end = self.measure_end.max(self.position);
    }

    // ─── Attributes ──────────────────────────────────────────────────

    fn read_attributes(&mut self, node: &Node) {
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "divisions" => {
                    match parse_u32(&child) {
                        Some(d) if d > 0 => self.divisions = Some(d),
                        _ => warn!("{}: ignoring invalid <divisions>", self.part_id),
                    }
                }
                "time" => {
                    let ts = parse_time(&child);
                    match self.time_signature {
                        None => self.time_signature = Some(ts),
                        Some(current) if current != ts => {
                            warn!(
                                "{}: time signature change to {}/{} ignored",
                                self.part_id, ts.numerator, ts.denominator
                            );
                        }
                        Some(_) => {}
                    }
                }
                "clef" => {
                    let staff = child.attribute("number").unwrap_or("1");
                    if staff != "1" {
                        continue;
                    }
                    let clef = parse_clef(&child, self.part_id);
                    match self.clef {
                        None => self.clef = Some(clef),
                        Some(current) if current != clef => {
                            warn!("{}: clef change to {:?} ignored", self.part_id, clef);
                        }
                        Some(_) => {}
                    }
                }
                _ => {}
            }
        }
    }

    // ─── Note ────────────────────────────────────────────────────────

    fn read_note(&mut self, node: &Node) {
        let mut pitch = None;
        let mut is_chord = false;
        let mut is_grace = false;
        let mut is_rest = false;
        let mut staff = None;
        let mut voice = None;

        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "pitch" => pitch = Some(parse_pitch(&child)),
                "chord" => is_chord = true,
                "grace" => is_grace = true,
                "rest" => is_rest = true,
                "staff" => staff = text_of(&child),
                "voice" => voice = text_of(&child),
                _ => {}
            }
        }

        // Grace notes take no time and are not laid out
        if is_grace {
            return;
        }

        let duration = self.duration_ticks(node);
        // Chord members take no time of their own
        let onset = self.position;
        if !is_chord {
            self.advance(duration);
        }

        if is_rest {
            return;
        }
        let Some(pitch) = pitch else {
            return;
        };

        if staff.as_deref().unwrap_or("1") != "1" {
            self.skipped_notes += 1;
            return;
        }
        let voice = voice.unwrap_or_else(|| "1".to_string());
        if *self.voice.get_or_insert_with(|| voice.clone()) != voice {
            self.skipped_notes += 1;
            return;
        }
        if is_chord {
            self.skipped_chord_tones += 1;
            return;
        }

        let id = format!("{}-{}", self.part_id, self.notes.len());
        self.notes.push(Note::new(id, pitch, onset, duration));
    }

    /// Convert the `<duration>` child of `node` to ticks, rounding to nearest.
    fn duration_ticks(&mut self, node: &Node) -> u32 {
        let Some(duration) = find_child(node, "duration").and_then(|n| parse_u32(&n)) else {
            return 0;
        };
        let divisions = match self.divisions {
            Some(d) => d,
            None => {
                warn!("{}: <duration> before <divisions>, assuming 1 per quarter", self.part_id);
                self.divisions = Some(1);
                1
            }
        };
        let ticks = (duration as u64 * TICKS_PER_QUARTER as u64 + divisions as u64 / 2)
            / divisions as u64;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    fn report_skipped(&self) {
        if self.skipped_chord_tones > 0 {
            warn!(
                "{}: skipped {} chord tones, keeping the first notehead of each chord",
                self.part_id, self.skipped_chord_tones
            );
        }
        if self.skipped_notes > 0 {
            warn!(
                "{}: skipped {} notes outside staff 1 / voice {}",
                self.part_id,
                self.skipped_notes,
                self.voice.as_deref().unwrap_or("1")
            );
        }
    }
}

fn parse_time(node: &Node) -> TimeSignature {
    let mut ts = TimeSignature::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "beats" => ts.numerator = parse_u32(&child).unwrap_or(4),
            "beat-type" => ts.denominator = parse_u32(&child).unwrap_or(4),
            _ => {}
        }
    }
    ts
}

fn parse_clef(node: &Node, part_id: &str) -> ClefType {
    let sign = find_child(node, "sign").and_then(|n| text_of(&n));
    let line = find_child(node, "line").and_then(|n| parse_u32(&n));

    match (sign.as_deref(), line) {
        (Some("G"), None | Some(2)) => ClefType::Treble,
        (Some("F"), None | Some(4)) => ClefType::Bass,
        (Some("C"), None | Some(3)) => ClefType::Alto,
        (Some("C"), Some(4)) => ClefType::Tenor,
        (sign, line) => {
            warn!("{part_id}: unsupported clef {sign:?} on line {line:?}, using treble");
            ClefType::Treble
        }
    }
}

/// MIDI number of a <pitch> element (middle C = C4 = 60), clamped to 0..=127.
fn parse_pitch(node: &Node) -> u8 {
    let mut step = 0;
    let mut octave = 4;
    let mut alter = 0.0;
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "step" => {
                step = match text_of(&child).as_deref() {
                    Some("C") => 0,
                    Some("D") => 2,
                    Some("E") => 4,
                    Some("F") => 5,
                    Some("G") => 7,
                    Some("A") => 9,
                    Some("B") => 11,
                    _ => 0,
                };
            }
            "octave" => octave = parse_i32(&child).unwrap_or(4),
            "alter" => alter = parse_f64(&child).unwrap_or(0.0),
            _ => {}
        }
    }
    let midi = (octave + 1) * 12 + step + alter.round() as i32;
    midi.clamp(0, 127) as u8
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn find_child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn text_of(node: &Node) -> Option<String> {
    node.text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn parse_u32(node: &Node) -> Option<u32> {
    node.text().and_then(|t| t.trim().parse().ok())
}

fn parse_i32(node: &Node) -> Option<i32> {
    node.text().and_then(|t| t.trim().parse().ok())
}

fn parse_f64(node: &Node) -> Option<f64> {
    node.text().and_then(|t| t.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(measures: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part-list><score-part id="P1"><part-name>Flute</part-name></score-part></part-list>
  <part id="P1">{measures}</part>
</score-partwise>"#
        )
    }

    fn note(step: &str, octave: i32, duration: u32) -> String {
        format!(
            "<note><pitch><step>{step}</step><octave>{octave}</octave></pitch>\
             <duration>{duration}</duration><voice>1</voice></note>"
        )
    }

    #[test]
    fn pitch_to_midi() {
        let xml = score(&format!(
            r#"<measure number="1"><attributes><divisions>1</divisions></attributes>
               {}<note><pitch><step>F</step><alter>1</alter><octave>4</octave></pitch><duration>1</duration></note>
               <note><pitch><step>B</step><alter>-1</alter><octave>3</octave></pitch><duration>1</duration></note></measure>"#,
            note("C", 4, 1)
        ));
        let staff = parse_musicxml(&xml).unwrap();
        let pitches: Vec<u8> = staff.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![60, 66, 58]);
    }

    #[test]
    fn durations_convert_to_960_ppq() {
        let xml = score(&format!(
            r#"<measure number="1"><attributes><divisions>2</divisions></attributes>{}{}{}</measure>"#,
            note("C", 4, 2),
            note("D", 4, 1),
            note("E", 4, 3),
        ));
        let staff = parse_musicxml(&xml).unwrap();
        let timing: Vec<(u32, u32)> = staff.notes.iter().map(|n| (n.start_tick, n.duration_ticks)).collect();
        assert_eq!(timing, vec![(0, 960), (960, 480), (1440, 1440)]);
    }

    #[test]
    fn triplet_durations_round_to_nearest_tick() {
        let xml = score(&format!(
            r#"<measure number="1"><attributes><divisions>3</divisions></attributes>{}</measure>"#,
            note("C", 4, 1)
        ));
        let staff = parse_musicxml(&xml).unwrap();
        assert_eq!(staff.notes[0].duration_ticks, 320);
    }

    #[test]
    fn chords_keep_their_first_notehead() {
        let xml = score(&format!(
            r#"<measure number="1"><attributes><divisions>1</divisions></attributes>
               {}<note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>2</duration><voice>1</voice></note>
               <note><chord/><pitch><step>G</step><octave>4</octave></pitch><duration>2</duration><voice>1</voice></note>
               {}</measure>"#,
            note("C", 4, 2),
            note("D", 4, 1),
        ));
        let staff = parse_musicxml(&xml).unwrap();
        let summary: Vec<(&str, u8, u32)> = staff
            .notes
            .iter()
            .map(|n| (n.id.as_str(), n.pitch, n.start_tick))
            .collect();
        assert_eq!(summary, vec![("P1-0", 60, 0), ("P1-1", 62, 1920)]);
    }

    #[test]
    fn clef_and_time_are_read() {
        let xml = score(
            r#"<measure number="1"><attributes><divisions>1</divisions>
                 <time><beats>3</beats><beat-type>8</beat-type></time>
                 <clef><sign>C</sign><line>4</line></clef></attributes></measure>"#,
        );
        let staff = parse_musicxml(&xml).unwrap();
        assert_eq!(staff.clef, ClefType::Tenor);
        assert_eq!(staff.time_signature, Some(TimeSignature::new(3, 8)));
        assert!(staff.notes.is_empty());
    }

    #[test]
    fn rejects_timewise_documents() {
        let err = parse_musicxml("<score-timewise/>").unwrap_err();
        assert!(matches!(err, LayoutError::UnsupportedFormat(_)));
        assert!(matches!(parse_musicxml("<score"), Err(LayoutError::Xml(_))));
    }
}
