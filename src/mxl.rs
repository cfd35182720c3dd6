//! Compressed MusicXML (.mxl) support.
//!
//! An .mxl file is a ZIP archive whose `META-INF/container.xml` names the
//! root MusicXML file. Archives without a container fall back to the first
//! `.xml`/`.musicxml` entry outside `META-INF/`.

use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::LayoutError;
use crate::parser::{self, ImportedStaff};

/// Read and import a .mxl file from raw bytes.
pub fn parse_mxl(data: &[u8]) -> Result<ImportedStaff, LayoutError> {
    let xml = extract_musicxml_from_mxl(data)?;
    parser::parse_musicxml(&xml)
}

/// Extract the root MusicXML document from .mxl bytes.
pub fn extract_musicxml_from_mxl(data: &[u8]) -> Result<String, LayoutError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| LayoutError::Archive(format!("failed to open archive: {e}")))?;

    let root_file_path = find_root_file(&mut archive)?;

    let mut root_file = archive.by_name(&root_file_path).map_err(|e| {
        LayoutError::Archive(format!("root file '{root_file_path}' not found: {e}"))
    })?;

    let mut xml = String::new();
    root_file
        .read_to_string(&mut xml)
        .map_err(|e| LayoutError::Archive(format!("failed to read '{root_file_path}': {e}")))?;

    Ok(xml)
}

fn find_root_file(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<String, LayoutError> {
    let container_xml = match archive.by_name("META-INF/container.xml") {
        Ok(mut container_file) => {
            let mut xml = String::new();
            container_file
                .read_to_string(&mut xml)
                .map_err(|e| LayoutError::Archive(format!("failed to read container.xml: {e}")))?;
            Some(xml)
        }
        Err(_) => None,
    };

    if let Some(xml) = container_xml {
        let doc = roxmltree::Document::parse(&xml)
            .map_err(|e| LayoutError::Xml(format!("container.xml: {e}")))?;

        return doc
            .descendants()
            .filter(|n| n.tag_name().name() == "rootfile")
            .find_map(|n| n.attribute("full-path").map(str::to_string))
            .ok_or_else(|| LayoutError::Archive("no rootfile in container.xml".to_string()));
    }

    let names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .collect();

    names
        .iter()
        .find(|name| {
            !name.starts_with("META-INF/")
                && (name.ends_with(".xml") || name.ends_with(".musicxml"))
        })
        .cloned()
        .ok_or_else(|| LayoutError::Archive(format!("no MusicXML file in archive: {names:?}")))
}
