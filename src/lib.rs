//! stafflayout: single-staff music notation layout engine.
//!
//! Converts notes (MIDI pitch plus 960-PPQ timing), a clef, an optional
//! time signature, and display config into final pixel geometry: staff
//! lines, clef glyph, positioned note glyphs, ledger lines, barlines, and
//! the index range of notes inside the viewport.
//!
//! # Example
//! ```
//! use stafflayout::{compute_layout, ClefType, Note, StaffConfig, TimeSignature};
//!
//! let notes = vec![
//!     Note::new("n1", 60, 0, 960),
//!     Note::new("n2", 64, 960, 960),
//! ];
//! let geometry = compute_layout(
//!     &notes,
//!     ClefType::Treble,
//!     Some(&TimeSignature::new(4, 4)),
//!     &StaffConfig::default(),
//! ).unwrap();
//! assert_eq!(geometry.notes[0].staff_position, -6);
//! assert_eq!(geometry.ledger_lines.len(), 1);
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod mxl;
pub mod parser;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use error::LayoutError;
pub use layout::*;
pub use model::*;
pub use mxl::parse_mxl;
pub use parser::{parse_musicxml, ImportedStaff};

/// Import a MusicXML file from a file path.
/// Automatically detects format based on file extension:
/// - `.musicxml` or `.xml` → uncompressed MusicXML
/// - `.mxl` → compressed MXL (ZIP archive)
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ImportedStaff, LayoutError> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| LayoutError::Io(format!("failed to read '{}': {e}", path.display())))?;

    parse_bytes(&data, path.extension().and_then(|e| e.to_str()))
}

/// Import MusicXML from raw bytes with an optional format hint.
/// If `extension` is None, tries to auto-detect the format.
pub fn parse_bytes(data: &[u8], extension: Option<&str>) -> Result<ImportedStaff, LayoutError> {
    match extension {
        Some("mxl") => parse_mxl(data),
        Some("musicxml") | Some("xml") => {
            let xml = std::str::from_utf8(data)
                .map_err(|e| LayoutError::Xml(format!("invalid UTF-8: {e}")))?;
            parse_musicxml(xml)
        }
        _ => {
            // Auto-detect: try as XML first, then as MXL
            if let Ok(xml) = std::str::from_utf8(data) {
                if xml.trim_start().starts_with('<') {
                    return parse_musicxml(xml);
                }
            }
            parse_mxl(data)
        }
    }
}

/// Lay out an imported staff with its own clef and time signature.
pub fn layout_staff(staff: &ImportedStaff, config: &StaffConfig) -> Result<LayoutGeometry, LayoutError> {
    compute_layout(&staff.notes, staff.clef, staff.time_signature.as_ref(), config)
}

/// Serialize layout geometry to JSON for a drawing layer across an FFI boundary.
pub fn layout_to_json(geometry: &LayoutGeometry) -> Result<String, LayoutError> {
    Ok(serde_json::to_string(geometry)?)
}

/// Import MusicXML bytes, lay them out, and return the geometry as JSON.
///
/// `config_json` is a (possibly partial) `StaffConfig` object; `None` uses
/// the defaults.
pub fn layout_bytes_to_json(
    data: &[u8],
    extension: Option<&str>,
    config_json: Option<&str>,
) -> Result<String, LayoutError> {
    let config = match config_json {
        Some(json) => StaffConfig::from_json(json)?,
        None => StaffConfig::default(),
    };
    let staff = parse_bytes(data, extension)?;
    let geometry = layout_staff(&staff, &config)?;
    layout_to_json(&geometry)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for iOS (static library) and other native hosts
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Import MusicXML bytes and return the layout geometry as a JSON C string.
/// The caller must free the returned string with `stafflayout_free_string`.
/// Returns null on any error.
///
/// # Safety
/// `data` must point to `len` valid bytes. `extension` and `config_json`
/// may be null; otherwise they must be valid null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn stafflayout_layout_bytes(
    data: *const u8,
    len: usize,
    extension: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    if data.is_null() || len == 0 {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    let ext = if extension.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(extension) }.to_str().ok()
    };
    let config = if config_json.is_null() {
        None
    } else {
        match unsafe { CStr::from_ptr(config_json) }.to_str() {
            Ok(s) => Some(s),
            Err(_) => return std::ptr::null_mut(),
        }
    };

    match layout_bytes_to_json(bytes, ext, config) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("stafflayout_layout_bytes failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by stafflayout functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a stafflayout function, or null.
#[no_mangle]
pub unsafe extern "C" fn stafflayout_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
