//! Import tests: MusicXML and MXL in, geometry out.

use pretty_assertions::assert_eq;
use stafflayout::*;
use std::io::Write;

const MELODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <work><work-title>Little Tune</work-title></work>
  <part-list>
    <score-part id="P1"><part-name>Cello</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>2</divisions>
        <key><fifths>0</fifths></key>
        <time><beats>3</beats><beat-type>4</beat-type></time>
        <clef><sign>F</sign><line>4</line></clef>
      </attributes>
      <note><pitch><step>C</step><octave>3</octave></pitch><duration>2</duration><voice>1</voice><type>quarter</type></note>
      <note><rest/><duration>2</duration><voice>1</voice><type>quarter</type></note>
      <note><pitch><step>F</step><alter>1</alter><octave>3</octave></pitch><duration>1</duration><voice>1</voice><type>eighth</type></note>
      <note><pitch><step>A</step><octave>3</octave></pitch><duration>1</duration><voice>1</voice><type>eighth</type></note>
      <backup><duration>6</duration></backup>
      <note><pitch><step>C</step><octave>2</octave></pitch><duration>6</duration><voice>2</voice><type>half</type><dot/></note>
    </measure>
    <measure number="2">
      <note><grace/><pitch><step>B</step><octave>3</octave></pitch><voice>1</voice><type>eighth</type></note>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration><voice>1</voice><type>half</type></note>
      <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>4</duration><voice>1</voice><type>half</type></note>
      <forward><duration>2</duration></forward>
    </measure>
    <measure number="3">
      <note><pitch><step>G</step><octave>2</octave></pitch><duration>6</duration><voice>1</voice><type>half</type><dot/></note>
    </measure>
  </part>
</score-partwise>"#;

#[test]
fn imports_a_single_voice() {
    let staff = parse_musicxml(MELODY).expect("Failed to parse melody");

    assert_eq!(staff.part_id, "P1");
    assert_eq!(staff.title.as_deref(), Some("Little Tune"));
    assert_eq!(staff.clef, ClefType::Bass);
    assert_eq!(staff.time_signature, Some(TimeSignature::new(3, 4)));

    let summary: Vec<(u8, u32, u32)> = staff
        .notes
        .iter()
        .map(|n| (n.pitch, n.start_tick, n.duration_ticks))
        .collect();
    assert_eq!(
        summary,
        vec![
            (48, 0, 960),     // C3
            (54, 1920, 480),  // F#3 after the rest
            (57, 2400, 480),  // A3
            (60, 2880, 1920), // C4, measure 2 (grace note and chord tone E4 skipped)
            (43, 5760, 2880), // G2, measure 3 after <forward>
        ]
    );

    let ids: Vec<&str> = staff.notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["P1-0", "P1-1", "P1-2", "P1-3", "P1-4"]);
}

#[test]
fn imported_staff_lays_out_with_its_own_clef_and_meter() {
    let staff = parse_musicxml(MELODY).unwrap();
    let cfg = StaffConfig::default();
    let geometry = layout_staff(&staff, &cfg).unwrap();

    assert_eq!(geometry.clef.clef, ClefType::Bass);
    assert_eq!(geometry.clef.codepoint, '\u{E062}');
    let meter = geometry.time_signature.as_ref().expect("3/4 from the score");
    assert_eq!(meter.numerator_glyphs, "\u{E083}");
    assert_eq!(meter.denominator_glyphs, "\u{E084}");

    // 3/4 measures; the last note ends at tick 8640
    let ticks: Vec<u32> = geometry.barlines.iter().map(|b| b.tick).collect();
    assert_eq!(ticks, vec![2880, 5760, 8640]);

    // C3 in bass clef is in the second space from the bottom
    assert_eq!(geometry.notes[0].staff_position, -1);
    // F#3 shares F3's line and carries a sharp
    assert_eq!(geometry.notes[1].staff_position, 2);
    assert_eq!(geometry.notes[1].accidental, Some(Accidental::Sharp));
    assert!(geometry.notes[1].accidental_x.is_some_and(|x| x < geometry.notes[1].x));
    // Middle C sits one ledger line above the bass staff
    assert_eq!(geometry.notes[3].staff_position, 6);
    assert_eq!(
        geometry.ledger_lines.iter().filter(|l| l.note_id == "P1-3").count(),
        1
    );
}

#[test]
fn bytes_to_json_pipeline() {
    let json = layout_bytes_to_json(MELODY.as_bytes(), Some("musicxml"), Some(r#"{"staff_space": 8.0}"#))
        .expect("pipeline should succeed");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["notes"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["staff_lines"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["notes"][0]["id"], "P1-0");
    assert_eq!(value["notes"][0]["start_tick"], 0);
    assert_eq!(value["clef"]["font_size"], 32.0);

    let geometry: LayoutGeometry = serde_json::from_str(&json).unwrap();
    assert_eq!(geometry.notes.len(), 5);
}

#[test]
fn format_is_detected_without_extension() {
    let from_hint = parse_bytes(MELODY.as_bytes(), Some("xml")).unwrap();
    let sniffed = parse_bytes(MELODY.as_bytes(), None).unwrap();
    assert_eq!(from_hint, sniffed);
}

fn build_mxl(with_container: bool) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        if with_container {
            zip.start_file("META-INF/container.xml", options).unwrap();
            zip.write_all(
                br#"<?xml version="1.0"?>
<container><rootfiles><rootfile full-path="score/tune.xml"/></rootfiles></container>"#,
            )
            .unwrap();
        }
        zip.start_file("score/tune.xml", options).unwrap();
        zip.write_all(MELODY.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf.into_inner()
}

#[test]
fn reads_compressed_musicxml() {
    let expected = parse_musicxml(MELODY).unwrap();

    let with_container = build_mxl(true);
    assert_eq!(parse_mxl(&with_container).unwrap(), expected);
    assert_eq!(parse_bytes(&with_container, None).unwrap(), expected);

    let without_container = build_mxl(false);
    assert_eq!(parse_bytes(&without_container, Some("mxl")).unwrap(), expected);
}

#[test]
fn garbage_is_rejected() {
    assert!(matches!(parse_mxl(b"not a zip"), Err(LayoutError::Archive(_))));
    assert!(matches!(
        parse_bytes(b"<opus/>", Some("xml")),
        Err(LayoutError::UnsupportedFormat(_))
    ));
    assert!(matches!(parse_file("/nonexistent/score.musicxml"), Err(LayoutError::Io(_))));
}
