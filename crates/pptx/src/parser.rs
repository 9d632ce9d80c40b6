//! PPTX file parser implementation.

use deck_core::{Error, ExtractedSlide, Presentation, Result, Shape, Table};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Elements that count as shapes when they are direct children of `p:spTree`.
const SHAPE_ELEMENTS: &[&[u8]] = &[
    b"sp",
    b"grpSp",
    b"graphicFrame",
    b"cxnSp",
    b"pic",
    b"contentPart",
];

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Open and parse the PPTX file at `path`.
    pub fn open(&self, path: &Path) -> Result<Presentation> {
        let file = File::open(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        self.parse(BufReader::new(file), &filename)
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("{}: {} slides", filename, slide_order.len());

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Get the slide part paths in presentation order.
    ///
    /// The order comes from `p:sldIdLst` in presentation.xml; each entry's
    /// relationship id is resolved through presentation.xml.rels.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PART)?;
        let relationships = parse_relationships(&rels_content)?;

        let presentation_content = self.read_file_from_archive(archive, PRESENTATION_PART)?;
        let slide_ids = parse_slide_id_list(&presentation_content)?;

        slide_ids
            .iter()
            .map(|rel_id| match relationships.get(rel_id) {
                Some(rel) if rel.rel_type.ends_with("/slide") => {
                    Ok(resolve_part_path("ppt", &rel.target))
                }
                Some(rel) => Err(Error::PptxParseError(format!(
                    "Relationship '{}' is not a slide ({})",
                    rel_id, rel.rel_type
                ))),
                None => Err(Error::PptxParseError(format!(
                    "Slide relationship '{}' not found",
                    rel_id
                ))),
            })
            .collect()
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<ExtractedSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = ExtractedSlide::new(slide_number);

        for shape in extract_shapes_from_xml(&content)
            .map_err(|e| Error::XmlError(format!("{}: {}", slide_path, e)))?
        {
            slide.add_shape(shape);
        }

        log::debug!(
            "Parsed {} as slide {} ({} shapes)",
            slide_path,
            slide_number,
            slide.shapes.len()
        );

        Ok(slide)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of a `.rels` part.
#[derive(Debug)]
struct Relationship {
    rel_type: String,
    target: String,
}

/// Parse a relationships part into a map keyed by relationship id.
fn parse_relationships(xml_content: &str) -> Result<HashMap<String, Relationship>> {
    let mut relationships = HashMap::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel = Relationship {
                    rel_type: String::new(),
                    target: String::new(),
                };

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr_value(&attr),
                        b"Type" => rel.rel_type = attr_value(&attr),
                        b"Target" => rel.target = attr_value(&attr),
                        _ => {}
                    }
                }

                relationships.insert(id, rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Collect the relationship ids of `p:sldId` entries in document order.
fn parse_slide_id_list(xml_content: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // The unprefixed `id` is the numeric slide id; the
                // relationship id is the namespaced `r:id`.
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| {
                        attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id"
                    })
                    .map(|attr| attr_value(&attr));

                match rel_id {
                    Some(id) => ids.push(id),
                    None => {
                        return Err(Error::PptxParseError(
                            "Slide entry without a relationship id".to_string(),
                        ))
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Accumulates the text of a text body: paragraphs joined by newlines.
#[derive(Debug, Default)]
struct TextCollector {
    paragraphs: Vec<String>,
    current: Option<String>,
    in_text: bool,
}

impl TextCollector {
    fn start_paragraph(&mut self) {
        self.current = Some(String::new());
    }

    fn end_paragraph(&mut self) {
        if let Some(paragraph) = self.current.take() {
            self.paragraphs.push(paragraph);
        }
        self.in_text = false;
    }

    fn push_text(&mut self, text: &str) {
        if self.in_text {
            if let Some(ref mut paragraph) = self.current {
                paragraph.push_str(text);
            }
        }
    }

    fn line_break(&mut self) {
        if let Some(ref mut paragraph) = self.current {
            paragraph.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.end_paragraph();
        self.paragraphs.join("\n")
    }
}

/// A top-level shape being read.
#[derive(Debug)]
enum ShapeBuilder {
    /// `p:sp`: text from its text body, empty when it has none.
    Text(TextCollector),

    /// `p:graphicFrame`: becomes a table if it holds an `a:tbl`.
    Frame {
        table: Option<Table>,
        row: Option<Vec<String>>,
        cell: Option<TextCollector>,
    },

    /// Anything else; its contents are skipped.
    Other,
}

impl ShapeBuilder {
    fn for_element(name: &[u8]) -> Self {
        match name {
            b"sp" => ShapeBuilder::Text(TextCollector::default()),
            b"graphicFrame" => ShapeBuilder::Frame {
                table: None,
                row: None,
                cell: None,
            },
            _ => ShapeBuilder::Other,
        }
    }

    /// The collector that text events should go to, if any.
    fn collector(&mut self) -> Option<&mut TextCollector> {
        match self {
            ShapeBuilder::Text(collector) => Some(collector),
            ShapeBuilder::Frame { cell, .. } => cell.as_mut(),
            ShapeBuilder::Other => None,
        }
    }

    fn start(&mut self, name: &[u8]) {
        if let ShapeBuilder::Frame { table, row, cell } = self {
            match name {
                b"tbl" => *table = Some(Table::default()),
                b"tr" if table.is_some() => *row = Some(Vec::new()),
                b"tc" if row.is_some() => *cell = Some(TextCollector::default()),
                _ => {}
            }
        }

        if let Some(collector) = self.collector() {
            match name {
                b"p" => collector.start_paragraph(),
                b"t" => collector.in_text = true,
                _ => {}
            }
        }
    }

    fn end(&mut self, name: &[u8]) {
        if let Some(collector) = self.collector() {
            match name {
                b"p" => collector.end_paragraph(),
                b"t" => collector.in_text = false,
                _ => {}
            }
        }

        if let ShapeBuilder::Frame { table, row, cell } = self {
            match name {
                b"tc" => {
                    if let (Some(row), Some(cell)) = (row.as_mut(), cell.take()) {
                        row.push(cell.finish());
                    }
                }
                b"tr" => {
                    if let (Some(table), Some(row)) = (table.as_mut(), row.take()) {
                        table.rows.push(row);
                    }
                }
                _ => {}
            }
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if let ShapeBuilder::Frame { row: Some(row), .. } = self {
            if name == b"tc" {
                row.push(String::new());
                return;
            }
        }

        if let Some(collector) = self.collector() {
            match name {
                b"p" => {
                    collector.start_paragraph();
                    collector.end_paragraph();
                }
                b"br" => collector.line_break(),
                _ => {}
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(collector) = self.collector() {
            collector.push_text(text);
        }
    }

    fn finish(self) -> Shape {
        match self {
            ShapeBuilder::Text(collector) => Shape::Text(collector.finish()),
            ShapeBuilder::Frame {
                table: Some(table), ..
            } => Shape::Table(table),
            ShapeBuilder::Frame { table: None, .. } | ShapeBuilder::Other => Shape::Other,
        }
    }
}

/// Extract the top-level shapes of a slide in stored order.
///
/// Group shapes are reported as `Shape::Other`; their children are not
/// visited.
fn extract_shapes_from_xml(xml_content: &str) -> std::result::Result<Vec<Shape>, quick_xml::Error> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    // Open elements below p:spTree; None until the tree starts.
    let mut tree_depth: Option<usize> = None;
    let mut current: Option<ShapeBuilder> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                match tree_depth {
                    None => {
                        if local == b"spTree" {
                            tree_depth = Some(0);
                        }
                    }
                    Some(ref mut depth) => {
                        if *depth == 0 && is_shape_element(e) {
                            current = Some(ShapeBuilder::for_element(local));
                        } else if let Some(ref mut shape) = current {
                            shape.start(local);
                        }
                        *depth += 1;
                    }
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                match tree_depth {
                    Some(0) if is_shape_element(e) => {
                        shapes.push(ShapeBuilder::for_element(local).finish());
                    }
                    Some(_) => {
                        if let Some(ref mut shape) = current {
                            shape.empty(local);
                        }
                    }
                    None => {}
                }
            }
            Event::Text(ref e) => {
                if let Some(ref mut shape) = current {
                    let text = e.unescape()?;
                    shape.text(&text);
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                match tree_depth {
                    Some(0) => {
                        if local == b"spTree" {
                            tree_depth = None;
                        }
                    }
                    Some(ref mut depth) => {
                        *depth -= 1;
                        if *depth == 0 {
                            if let Some(shape) = current.take() {
                                shapes.push(shape.finish());
                            }
                        } else if let Some(ref mut shape) = current {
                            shape.end(local);
                        }
                    }
                    None => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

fn is_shape_element(e: &BytesStart<'_>) -> bool {
    let name = e.name();
    SHAPE_ELEMENTS.contains(&local_name(name.as_ref()))
}

fn attr_value(attr: &Attribute<'_>) -> String {
    String::from_utf8_lossy(&attr.value).to_string()
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets (leading '/') are taken from the package root.
fn resolve_part_path(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
