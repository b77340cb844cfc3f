//! Event-driven decoder for `package.xml`.
//!
//! The decoder reads exactly the shape it expects: a `Package` root holding
//! `types` blocks (each with one `name` and any number of `members`) and an
//! optional `version`. Elements it does not know are skipped whole. Element
//! names are matched on their local part, so a namespace prefix on the root
//! is accepted.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::document::{OneOrMany, PackageDocument, TypeBlock};
use crate::error::{CodecError, CodecResult};

const ROOT: &str = "Package";
const TYPES: &str = "types";
const NAME: &str = "name";
const MEMBERS: &str = "members";
const VERSION: &str = "version";

/// Decode a manifest into its typed representation.
///
/// Blank `members` fields are dropped and a missing `name` decodes to an
/// empty string; neither is an error. Anything that prevents reading the
/// expected shape is, and no partial document is returned.
pub fn decode(raw: &str) -> CodecResult<PackageDocument> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let doc = Decoder { reader }.document()?;
    debug!(
        types = doc.types.len(),
        members = doc.member_count(),
        "decoded manifest"
    );
    Ok(doc)
}

struct Decoder<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Decoder<'a> {
    /// Next event that carries structure or content.
    fn next(&mut self) -> CodecResult<Event<'a>> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|err| self.malformed(err.to_string()))?;
            match event {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                other => return Ok(other),
            }
        }
    }

    fn malformed(&self, message: impl Into<String>) -> CodecError {
        CodecError::Xml {
            position: self.reader.buffer_position() as u64,
            message: message.into(),
        }
    }

    fn document(mut self) -> CodecResult<PackageDocument> {
        loop {
            match self.next()? {
                Event::Start(start) => {
                    expect_root(&start)?;
                    let doc = self.package()?;
                    self.expect_end_of_input()?;
                    return Ok(doc);
                }
                Event::Empty(start) => {
                    expect_root(&start)?;
                    self.expect_end_of_input()?;
                    return Ok(PackageDocument::default());
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                    return Err(self.malformed(format!("unexpected closing tag </{name}>")));
                }
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed("text outside the root element"));
                }
                Event::Eof => return Err(CodecError::MissingRoot),
                _ => {}
            }
        }
    }

    fn expect_end_of_input(&mut self) -> CodecResult<()> {
        match self.next()? {
            Event::Eof => Ok(()),
            Event::Start(_) | Event::Empty(_) => {
                Err(self.malformed("more than one root element"))
            }
            _ => Err(self.malformed("content after the root element")),
        }
    }

    fn package(&mut self) -> CodecResult<PackageDocument> {
        let mut version = None;
        let mut types = Vec::new();

        loop {
            match self.next()? {
                Event::Start(start) => {
                    let element = local_name(&start);
                    match element.as_str() {
                        TYPES => types.push(self.type_block()?),
                        VERSION => {
                            let text = self.text(VERSION)?;
                            set_once(&mut version, text, ROOT, VERSION)?;
                        }
                        _ => self.skip(&element)?,
                    }
                }
                Event::Empty(start) => {
                    let element = local_name(&start);
                    match element.as_str() {
                        TYPES => types.push(TypeBlock::default()),
                        VERSION => set_once(&mut version, String::new(), ROOT, VERSION)?,
                        _ => debug!(element = %element, "skipping empty element"),
                    }
                }
                Event::End(_) => {
                    return Ok(PackageDocument {
                        version: version.filter(|v| !v.is_empty()),
                        types,
                    });
                }
                Event::Eof => return Err(unclosed(ROOT)),
                _ => {}
            }
        }
    }

    fn type_block(&mut self) -> CodecResult<TypeBlock> {
        let mut name = None;
        let mut members = OneOrMany::Absent;

        loop {
            match self.next()? {
                Event::Start(start) => {
                    let element = local_name(&start);
                    match element.as_str() {
                        NAME => {
                            let text = self.text(NAME)?;
                            set_once(&mut name, text, TYPES, NAME)?;
                        }
                        MEMBERS => members.push(self.text(MEMBERS)?),
                        _ => self.skip(&element)?,
                    }
                }
                Event::Empty(start) => {
                    let element = local_name(&start);
                    match element.as_str() {
                        NAME => set_once(&mut name, String::new(), TYPES, NAME)?,
                        MEMBERS => members.push(String::new()),
                        _ => debug!(element = %element, "skipping empty element"),
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unclosed(TYPES)),
                _ => {}
            }
        }

        Ok(TypeBlock {
            name: name.unwrap_or_default(),
            members: members
                .into_list()
                .into_iter()
                .filter(|member| !member.is_empty())
                .collect(),
        })
    }

    /// Read the text content of a leaf element up to its closing tag.
    fn text(&mut self, element: &str) -> CodecResult<String> {
        let mut text = String::new();

        loop {
            match self.next()? {
                Event::Text(content) => {
                    let unescaped = content.unescape().map_err(|err| CodecError::InvalidText {
                        element: element.to_string(),
                        message: err.to_string(),
                    })?;
                    text.push_str(&unescaped);
                }
                Event::CData(content) => {
                    let bytes = content.into_inner();
                    let decoded =
                        std::str::from_utf8(&bytes).map_err(|err| CodecError::InvalidText {
                            element: element.to_string(),
                            message: err.to_string(),
                        })?;
                    text.push_str(decoded);
                }
                Event::Start(child) | Event::Empty(child) => {
                    return Err(CodecError::UnexpectedElement {
                        parent: element.to_string(),
                        element: local_name(&child),
                    });
                }
                Event::End(_) => return Ok(text.trim().to_string()),
                Event::Eof => return Err(unclosed(element)),
                _ => {}
            }
        }
    }

    /// Consume an unknown element and everything nested in it.
    fn skip(&mut self, element: &str) -> CodecResult<()> {
        debug!(element, "skipping unknown element");
        let mut depth = 1usize;
        while depth > 0 {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(unclosed(element)),
                _ => {}
            }
        }
        Ok(())
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn expect_root(start: &BytesStart<'_>) -> CodecResult<()> {
    let found = local_name(start);
    if found == ROOT {
        Ok(())
    } else {
        Err(CodecError::UnexpectedRoot { found })
    }
}

fn unclosed(element: &str) -> CodecError {
    CodecError::UnclosedElement {
        element: element.to_string(),
    }
}

fn set_once(slot: &mut Option<String>, value: String, parent: &str, field: &str) -> CodecResult<()> {
    if slot.is_some() {
        return Err(CodecError::DuplicateField {
            parent: parent.to_string(),
            field: field.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}
