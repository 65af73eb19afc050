// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Work-item file parsing.
//!
//! Reads `<work-item><field id="...">...</field></work-item>` documents into a
//! field mapping. Two fields carry nested structure:
//! - `testSteps`: every element with a `text-type` attribute inside the
//!   `item id="steps"` subtree, in document order (steps and expected results
//!   alternate; the cache splits them)
//! - `linkedWorkItems`: the text of every `item id="workItem"` element

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{FieldValue, RawFields, RecordError};

const ROOT_ELEMENT: &[u8] = b"work-item";
const FIELD_ELEMENT: &[u8] = b"field";
const ITEM_ELEMENT: &[u8] = b"item";

/// Fields whose content is a list rather than text.
const LIST_FIELDS: &[&str] = &["testSteps", "linkedWorkItems"];

/// Read and parse the work item at `path`.
pub fn parse_record_file(path: &Path) -> Result<RawFields, RecordError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RecordError::NotFound(path.to_path_buf())
        } else {
            RecordError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_record_xml(&content).map_err(|message| RecordError::Xml {
        path: path.to_path_buf(),
        message,
    })
}

/// Field currently being read.
struct OpenField {
    name: String,
    depth: usize,
    text: String,
    lines: Vec<String>,
    /// Depth of the `item id="steps"` element, while inside it.
    steps_depth: Option<usize>,
    /// Depth and text of the list entry being captured.
    capture: Option<(usize, String)>,
}

impl OpenField {
    fn new(name: String, depth: usize) -> Self {
        Self {
            name,
            depth,
            text: String::new(),
            lines: Vec::new(),
            steps_depth: None,
            capture: None,
        }
    }

    fn is_list(&self) -> bool {
        LIST_FIELDS.contains(&self.name.as_str())
    }

    /// Whether a nested element at `depth` is a list entry to capture.
    fn captures(&self, element: &BytesStart<'_>) -> bool {
        if element.name().as_ref() != ITEM_ELEMENT {
            return false;
        }
        match self.name.as_str() {
            "testSteps" => {
                self.steps_depth.is_some() && attribute(element, "text-type").is_some()
            }
            "linkedWorkItems" => attribute(element, "id").as_deref() == Some("workItem"),
            _ => false,
        }
    }

    fn open_child(&mut self, element: &BytesStart<'_>, depth: usize) {
        if self.name == "testSteps"
            && element.name().as_ref() == ITEM_ELEMENT
            && attribute(element, "id").as_deref() == Some("steps")
        {
            self.steps_depth = Some(depth);
        }
        if self.capture.is_none() && self.captures(element) {
            self.capture = Some((depth, String::new()));
        }
    }

    fn push_text(&mut self, text: &str, depth: usize) {
        if let Some((_, buf)) = self.capture.as_mut() {
            buf.push_str(text);
        } else if depth == self.depth {
            self.text.push_str(text);
        }
    }

    fn close_child(&mut self, depth: usize) {
        if let Some((capture_depth, _)) = self.capture
            && capture_depth == depth
            && let Some((_, text)) = self.capture.take()
        {
            self.lines.push(text);
        }
        if self.steps_depth == Some(depth) {
            self.steps_depth = None;
        }
    }

    fn finish(self) -> (String, FieldValue) {
        let value = if self.is_list() {
            FieldValue::Lines(self.lines)
        } else if self.text.is_empty() {
            FieldValue::Null
        } else {
            FieldValue::Text(self.text)
        };
        (self.name, value)
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse work-item XML content into raw fields.
pub fn parse_record_xml(xml: &str) -> Result<RawFields, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut fields = RawFields::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut field: Option<OpenField> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at byte {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(element) => {
                depth += 1;
                if depth == 1 {
                    if element.name().as_ref() != ROOT_ELEMENT {
                        return Err(format!(
                            "unexpected root element <{}>",
                            String::from_utf8_lossy(element.name().as_ref())
                        ));
                    }
                    seen_root = true;
                    continue;
                }
                match field.as_mut() {
                    Some(open) => open.open_child(&element, depth),
                    None if element.name().as_ref() == FIELD_ELEMENT => {
                        if let Some(name) = attribute(&element, "id") {
                            field = Some(OpenField::new(name, depth));
                        }
                    }
                    None => {}
                }
            }
            Event::Empty(element) => {
                if depth == 0 {
                    return Err("work item has no content".to_string());
                }
                match field.as_mut() {
                    Some(open) => {
                        // Self-closing entries still occupy a slot in the list.
                        open.open_child(&element, depth + 1);
                        open.close_child(depth + 1);
                    }
                    None if element.name().as_ref() == FIELD_ELEMENT => {
                        if let Some(name) = attribute(&element, "id") {
                            let value = if LIST_FIELDS.contains(&name.as_str()) {
                                FieldValue::Lines(Vec::new())
                            } else {
                                FieldValue::Null
                            };
                            fields.insert(name, value);
                        }
                    }
                    None => {}
                }
            }
            Event::Text(text) => {
                if let Some(open) = field.as_mut() {
                    let text = text
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    open.push_text(&text, depth);
                }
            }
            Event::CData(data) => {
                if let Some(open) = field.as_mut() {
                    open.push_text(&String::from_utf8_lossy(&data.into_inner()), depth);
                }
            }
            Event::End(_) => {
                if let Some(mut open) = field.take() {
                    if depth == open.depth {
                        let (name, value) = open.finish();
                        fields.insert(name, value);
                    } else {
                        open.close_child(depth);
                        field = Some(open);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err("missing <work-item> root".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document".to_string());
    }
    Ok(fields)
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
