//! Canonical manifest encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decode;
use crate::document::PackageDocument;
use crate::error::CodecResult;

/// Namespace of the Salesforce Metadata API.
pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

/// API version written when the caller does not supply one.
pub const DEFAULT_API_VERSION: &str = "60.0";

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const INDENT: &str = "    ";

/// Settings the encoder needs from its caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Value of the root `<version>` element.
    pub version: String,
    /// `xmlns` of the root element; `None` omits the attribute.
    pub namespace: Option<String>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_API_VERSION.to_string(),
            namespace: Some(METADATA_NAMESPACE.to_string()),
        }
    }
}

/// Decodes manifests and encodes merged entries back to XML.
#[derive(Clone, Debug, Default)]
pub struct DescriptorCodec {
    options: EncodeOptions,
}

impl DescriptorCodec {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// Decode one manifest. See [`decode::decode`].
    pub fn decode(raw: &str) -> CodecResult<PackageDocument> {
        decode::decode(raw)
    }

    /// Render `(type, members)` entries in the order given.
    ///
    /// The caller owns ordering. Layout is fixed: four-space indentation,
    /// `members` before `name` in each block, `version` last, a trailing
    /// newline. Entries with a blank name or no members are left out.
    pub fn encode(&self, entries: &[(String, Vec<String>)]) -> String {
        Manifest {
            options: &self.options,
            entries,
        }
        .to_string()
    }

    /// Render a decoded document as-is, keeping its block order.
    pub fn encode_document(&self, doc: &PackageDocument) -> String {
        let entries: Vec<(String, Vec<String>)> = doc
            .types
            .iter()
            .filter(|block| !block.is_blank())
            .map(|block| (block.name.clone(), block.members.clone()))
            .collect();
        self.encode(&entries)
    }
}

/// Entries bound to the options they are rendered with.
struct Manifest<'a> {
    options: &'a EncodeOptions,
    entries: &'a [(String, Vec<String>)],
}

impl fmt::Display for Manifest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{DECLARATION}")?;
        match &self.options.namespace {
            Some(ns) => writeln!(f, r#"<Package xmlns="{}">"#, xml_escape(ns))?,
            None => writeln!(f, "<Package>")?,
        }

        for (name, members) in self.entries {
            let name = name.trim();
            let mut members = members
                .iter()
                .map(|member| member.trim())
                .filter(|member| !member.is_empty())
                .peekable();
            if name.is_empty() || members.peek().is_none() {
                continue;
            }

            writeln!(f, "{INDENT}<types>")?;
            for member in members {
                writeln!(f, "{INDENT}{INDENT}<members>{}</members>", xml_escape(member))?;
            }
            writeln!(f, "{INDENT}{INDENT}<name>{}</name>", xml_escape(name))?;
            writeln!(f, "{INDENT}</types>")?;
        }

        writeln!(f, "{INDENT}<version>{}</version>", xml_escape(&self.options.version))?;
        writeln!(f, "</Package>")
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
