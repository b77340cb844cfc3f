//! The merge engine.
//!
//! [`MergeEngine`] owns a case-folding registry from type name to
//! [`MemberSet`]. Entries go in through [`MergeEngine::add_entry`], either
//! directly or from decoded manifests; [`MergeEngine::render`] produces the
//! canonical manifest without touching the model, so it can be called any
//! number of times while entries keep arriving.

use std::fmt;
use std::path::{Path, PathBuf};

use apex_codec::{DescriptorCodec, EncodeOptions, PackageDocument};
use apex_registry::{compare_folded, sort_folded, CaseFoldingRegistry};
use tracing::{debug, info};

use crate::error::{MergeError, MergeResult};
use crate::members::MemberSet;
use crate::source::{DescriptorSource, FsSource};
use crate::summary::{CategorySummary, MergeSummary};

/// Merges manifests into one canonical manifest.
///
/// Mutation needs `&mut self`, so inserts are serialized by construction.
/// Decoding is independent of the engine: callers that want to decode in
/// parallel can call [`DescriptorCodec::decode`] themselves and feed the
/// results through [`MergeEngine::add_document`].
pub struct MergeEngine {
    registry: CaseFoldingRegistry<String, MemberSet>,
    codec: DescriptorCodec,
    source: Box<dyn DescriptorSource>,
    merged: Vec<PathBuf>,
}

impl fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeEngine")
            .field("categories", &self.registry.len())
            .field("codec", &self.codec)
            .field("merged", &self.merged)
            .finish()
    }
}

impl MergeEngine {
    /// An engine that reads manifests from the filesystem.
    pub fn new(options: EncodeOptions) -> Self {
        Self::with_source(options, FsSource)
    }

    /// An engine that reads manifests through `source`.
    pub fn with_source(options: EncodeOptions, source: impl DescriptorSource + 'static) -> Self {
        Self {
            registry: CaseFoldingRegistry::new(),
            codec: DescriptorCodec::new(options),
            source: Box::new(source),
            merged: Vec::new(),
        }
    }

    // ---------------------------------------------------------------
    // Accumulation
    // ---------------------------------------------------------------

    /// Add one member to one type.
    ///
    /// Both values are trimmed; if either is then empty the call does
    /// nothing. The type is created on first use. Returns `true` if the
    /// model changed.
    pub fn add_entry(&mut self, category: &str, member: &str) -> bool {
        let category = category.trim();
        let member = member.trim();
        if category.is_empty() || member.is_empty() {
            return false;
        }

        self.registry
            .get_or_insert_with(category.to_string(), MemberSet::new)
            .insert(member)
    }

    /// Add every entry of a decoded manifest. Returns how many changed the model.
    pub fn add_document(&mut self, doc: &PackageDocument) -> usize {
        let mut added = 0;
        for block in &doc.types {
            if block.is_blank() {
                debug!(
                    name = %block.name,
                    members = block.members.len(),
                    "skipping blank type block"
                );
                continue;
            }
            for member in &block.members {
                if self.add_entry(&block.name, member) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Read, decode, and merge each manifest in order.
    ///
    /// Stops at the first file that cannot be read or decoded and returns an
    /// error naming it. Files merged before it stay merged.
    pub fn concat<I, P>(&mut self, paths: I) -> MergeResult<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            let raw = self.source.read(path).map_err(|source| MergeError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let doc = DescriptorCodec::decode(&raw).map_err(|source| MergeError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            let added = self.add_document(&doc);
            self.merged.push(path.to_path_buf());
            debug!(path = %path.display(), types = doc.types.len(), added, "merged manifest");
        }

        info!(
            files = self.merged.len(),
            categories = self.category_count(),
            "merge complete"
        );
        Ok(())
    }

    /// Merge a single manifest.
    pub fn load(&mut self, path: impl AsRef<Path>) -> MergeResult<()> {
        self.concat([path])
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Manifests merged so far, in merge order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.merged
    }

    /// Returns `true` if at least one type holds at least one member.
    pub fn has_entries(&self) -> bool {
        self.registry.values().any(|members| !members.is_empty())
    }

    /// Number of non-empty types.
    pub fn category_count(&self) -> usize {
        self.registry
            .values()
            .filter(|members| !members.is_empty())
            .count()
    }

    /// Display names of non-empty types, sorted case-insensitively.
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        sort_folded(&mut names);
        names
    }

    /// Rendered members of `category` (any casing); empty if unknown.
    pub fn members_of(&self, category: &str) -> Vec<String> {
        self.registry
            .get(category.trim())
            .map(MemberSet::sorted)
            .unwrap_or_default()
    }

    /// The raw member set of `category` (any casing).
    pub fn member_set(&self, category: &str) -> Option<&MemberSet> {
        self.registry.get(category.trim())
    }

    /// The merged model in output order: types and members sorted
    /// case-insensitively, wildcard types collapsed to `["*"]`, empty types
    /// dropped.
    pub fn sorted_entries(&self) -> Vec<(String, Vec<String>)> {
        let mut entries: Vec<(String, Vec<String>)> = self
            .registry
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(name, members)| (name.clone(), members.sorted()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| compare_folded(a, b));
        entries
    }

    /// Render the merged manifest.
    pub fn render(&self) -> String {
        self.codec.encode(&self.sorted_entries())
    }

    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            sources: self.merged.clone(),
            categories: self
                .sorted_entries()
                .into_iter()
                .map(|(name, members)| CategorySummary {
                    name,
                    count: members.len(),
                    members,
                })
                .collect(),
        }
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new(EncodeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::WILDCARD;
    use crate::source::InMemorySource;
    use apex_codec::{CodecError, TypeBlock};
    use proptest::prelude::*;

    fn manifest(types: &[(&str, &[&str])]) -> String {
        let codec = DescriptorCodec::default();
        let entries: Vec<(String, Vec<String>)> = types
            .iter()
            .map(|(name, members)| {
                (name.to_string(), members.iter().map(|m| m.to_string()).collect())
            })
            .collect();
        codec.encode(&entries)
    }

    fn engine_with(files: &[(&str, String)]) -> MergeEngine {
        let mut source = InMemorySource::new();
        for (path, content) in files {
            source.insert(*path, content.clone());
        }
        MergeEngine::with_source(EncodeOptions::default(), source)
    }

    // ---- add_entry ----

    #[test]
    fn case_insensitive_identity() {
        let mut engine = MergeEngine::default();
        engine.add_entry("Foo", "a");
        engine.add_entry("foo", "b");

        assert_eq!(engine.category_names(), vec!["Foo"]);
        assert_eq!(engine.members_of("FOO"), vec!["a", "b"]);
    }

    #[test]
    fn entries_are_trimmed() {
        let mut engine = MergeEngine::default();
        assert!(engine.add_entry("  ApexClass ", " Foo  "));
        assert!(!engine.add_entry("ApexClass", "Foo"));
        assert_eq!(engine.category_names(), vec!["ApexClass"]);
        assert_eq!(engine.members_of("apexclass"), vec!["Foo"]);
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut engine = MergeEngine::default();
        assert!(!engine.add_entry("", "Foo"));
        assert!(!engine.add_entry("   ", "Foo"));
        assert!(!engine.add_entry("ApexClass", ""));
        assert!(!engine.add_entry("ApexClass", "  \t"));

        assert!(!engine.has_entries());
        assert!(engine.category_names().is_empty());
        assert!(engine.member_set("ApexClass").is_none());
        assert!(!engine.render().contains("<types>"));
    }

    #[test]
    fn wildcard_absorbs_later_members() {
        let mut engine = MergeEngine::default();
        engine.add_entry("CustomObject", WILDCARD);
        engine.add_entry("CustomObject", "Account");
        assert_eq!(engine.members_of("CustomObject"), vec!["*"]);
    }

    #[test]
    fn wildcard_wins_regardless_of_order() {
        let mut engine = MergeEngine::default();
        engine.add_entry("CustomObject", "Account");
        engine.add_entry("CustomObject", "Contact");
        engine.add_entry("CustomObject", WILDCARD);
        engine.add_entry("CustomObject", "Lead");

        assert_eq!(engine.members_of("CustomObject"), vec!["*"]);
        assert_eq!(engine.member_set("customobject").map(MemberSet::len), Some(1));
    }

    #[test]
    fn members_of_unknown_category_is_empty() {
        let engine = MergeEngine::default();
        assert!(engine.members_of("Nothing").is_empty());
    }

    // ---- concat ----

    #[test]
    fn merges_two_manifests() {
        let a = manifest(&[("ApexClass", &["Foo", "Bar"])]);
        let b = manifest(&[("ApexClass", &["bar", "Baz"]), ("ApexTrigger", &["*"])]);
        let mut engine = engine_with(&[("a.xml", a), ("b.xml", b)]);

        engine.concat(["a.xml", "b.xml"]).unwrap();

        assert_eq!(
            engine.sorted_entries(),
            vec![
                ("ApexClass".to_string(), vec!["Bar".to_string(), "Baz".into(), "Foo".into()]),
                ("ApexTrigger".to_string(), vec!["*".to_string()]),
            ]
        );
        assert_eq!(engine.sources(), &[PathBuf::from("a.xml"), PathBuf::from("b.xml")]);
        assert!(engine.has_entries());
    }

    #[test]
    fn parse_failure_names_file_and_keeps_earlier_merges() {
        let good = manifest(&[("Flow", &["Onboarding"])]);
        let mut engine = engine_with(&[
            ("good.xml", good),
            ("bad.xml", "<Package><types></Package>".to_string()),
        ]);

        let err = engine.concat(["good.xml", "bad.xml"]).unwrap_err();

        assert!(matches!(err, MergeError::Parse { source: CodecError::Xml { .. }, .. }));
        assert_eq!(err.path(), Path::new("bad.xml"));
        assert!(err.to_string().contains("bad.xml"));
        assert_eq!(engine.members_of("Flow"), vec!["Onboarding"]);
        assert_eq!(engine.sources(), &[PathBuf::from("good.xml")]);
    }

    #[test]
    fn read_failure_names_file() {
        let mut engine = engine_with(&[]);
        let err = engine.concat(["missing.xml"]).unwrap_err();
        assert!(matches!(err, MergeError::Read { .. }));
        assert_eq!(err.path(), Path::new("missing.xml"));
    }

    #[test]
    fn wrong_root_is_fatal() {
        let mut engine = engine_with(&[("obj.xml", "<CustomObject/>".to_string())]);
        let err = engine.load("obj.xml").unwrap_err();
        assert!(matches!(
            err,
            MergeError::Parse { source: CodecError::UnexpectedRoot { .. }, .. }
        ));
    }

    #[test]
    fn concat_accepts_no_files() {
        let mut engine = MergeEngine::default();
        engine.concat(Vec::<PathBuf>::new()).unwrap();
        assert!(!engine.has_entries());
        assert!(engine.sources().is_empty());
    }

    #[test]
    fn blocks_without_names_are_skipped() {
        let raw = "<Package><types><members>Orphan</members></types>\
                   <types><members>A</members><name>Named</name></types></Package>";
        let mut engine = engine_with(&[("p.xml", raw.to_string())]);
        engine.load("p.xml").unwrap();
        assert_eq!(engine.category_names(), vec!["Named"]);
    }

    #[test]
    fn blank_blocks_in_a_document_are_skipped() {
        let doc = PackageDocument {
            version: None,
            types: vec![
                TypeBlock { name: String::new(), members: vec!["Orphan".into()] },
                TypeBlock { name: "Empty".into(), members: vec![] },
                TypeBlock { name: "Flow".into(), members: vec!["Onboarding".into()] },
            ],
        };
        let mut engine = MergeEngine::default();
        assert_eq!(engine.add_document(&doc), 1);
        assert_eq!(engine.category_names(), vec!["Flow"]);
        assert!(engine.member_set("Empty").is_none());
    }

    #[test]
    fn wildcard_mid_stream_renders_like_wildcard_first() {
        let mut mid = MergeEngine::default();
        mid.add_entry("ApexClass", "Foo");
        mid.add_entry("ApexClass", WILDCARD);
        mid.add_entry("ApexClass", "Bar");
        let mut first = MergeEngine::default();
        first.add_entry("ApexClass", WILDCARD);
        first.add_entry("ApexClass", "Bar");
        first.add_entry("ApexClass", "Foo");
        assert_eq!(mid.render(), first.render());
    }

    #[test]
    fn empty_members_never_create_a_category() {
        let raw = "<Package><types><members> </members><name>Ghost</name></types></Package>";
        let mut engine = engine_with(&[("p.xml", raw.to_string())]);
        engine.load("p.xml").unwrap();

        assert!(engine.category_names().is_empty());
        assert!(!engine.render().contains("Ghost"));
    }

    #[test]
    fn reads_from_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");
        std::fs::write(&a, manifest(&[("Layout", &["Account-Account Layout"])])).unwrap();
        std::fs::write(&b, manifest(&[("layout", &["Contact-Contact Layout"])])).unwrap();

        let mut engine = MergeEngine::default();
        engine.concat([&a, &b]).unwrap();

        assert_eq!(
            engine.members_of("Layout"),
            vec!["Account-Account Layout", "Contact-Contact Layout"]
        );
    }

    // ---- render ----

    #[test]
    fn render_sorts_and_collapses() {
        let mut engine = MergeEngine::default();
        engine.add_entry("ApexTrigger", "Zed");
        engine.add_entry("ApexTrigger", "*");
        engine.add_entry("apexClass", "foo");
        engine.add_entry("ApexClass", "Bar");

        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Package xmlns="http://soap.sforce.com/2006/04/metadata">
    <types>
        <members>Bar</members>
        <members>foo</members>
        <name>apexClass</name>
    </types>
    <types>
        <members>*</members>
        <name>ApexTrigger</name>
    </types>
    <version>60.0</version>
</Package>
"#;
        assert_eq!(engine.render(), expected);
    }

    #[test]
    fn render_is_idempotent_and_reflects_later_entries() {
        let mut engine = MergeEngine::default();
        engine.add_entry("Flow", "A");
        let first = engine.render();
        assert_eq!(first, engine.render());

        engine.add_entry("Flow", "B");
        let second = engine.render();
        assert_ne!(first, second);
        assert!(second.contains("<members>B</members>"));
    }

    #[test]
    fn render_uses_supplied_version() {
        let mut engine = MergeEngine::new(EncodeOptions {
            version: "57.0".into(),
            namespace: None,
        });
        engine.add_entry("Flow", "A");
        let xml = engine.render();
        assert!(xml.contains("<version>57.0</version>"));
        assert!(xml.contains("<Package>"));
    }

    #[test]
    fn rendered_output_merges_back_to_the_same_model() {
        let mut engine = MergeEngine::default();
        engine.add_entry("CustomObject", "Account");
        engine.add_entry("CustomField", "Account.Name__c");
        engine.add_entry("Profile", "*");

        let mut again = engine_with(&[("out.xml", engine.render())]);
        again.load("out.xml").unwrap();
        assert_eq!(again.sorted_entries(), engine.sorted_entries());
        assert_eq!(again.render(), engine.render());
    }

    // ---- summary ----

    #[test]
    fn summary_lists_sorted_categories() {
        let mut engine = MergeEngine::default();
        engine.add_entry("Profile", "Admin");
        engine.add_entry("ApexClass", "B");
        engine.add_entry("ApexClass", "a");

        let summary = engine.summary();
        let names: Vec<&str> = summary.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ApexClass", "Profile"]);
        assert_eq!(summary.categories[0].members, vec!["a", "B"]);
        assert_eq!(summary.total_members(), 3);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["categories"][0]["count"], 2);
    }

    // ---- properties ----

    fn pairs() -> impl Strategy<Value = Vec<(String, String)>> {
        proptest::collection::vec(
            (
                prop::sample::select(vec!["ApexClass", "ApexTrigger", "Flow", "Layout", "Profile"]),
                prop_oneof![4 => "[a-z]{1,8}", 1 => Just(WILDCARD.to_string())],
            ),
            0..40,
        )
        .prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(category, member)| (category.to_string(), member))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn wildcard_absorption_is_sticky(
            before in proptest::collection::vec("[a-zA-Z]{1,8}", 0..10),
            after in proptest::collection::vec("[a-zA-Z]{1,8}", 0..10),
        ) {
            let mut engine = MergeEngine::default();
            for member in &before {
                engine.add_entry("T", member);
            }
            engine.add_entry("T", WILDCARD);
            for member in &after {
                engine.add_entry("T", member);
            }
            prop_assert_eq!(engine.members_of("T"), vec![WILDCARD.to_string()]);
        }

        #[test]
        fn render_is_independent_of_insertion_order(pairs in pairs()) {
            let mut forward = MergeEngine::default();
            for (category, member) in &pairs {
                forward.add_entry(category, member);
            }
            let mut backward = MergeEngine::default();
            for (category, member) in pairs.iter().rev() {
                backward.add_entry(category, member);
            }
            prop_assert_eq!(forward.render(), backward.render());
        }

        #[test]
        fn blank_members_never_surface(categories in proptest::collection::vec("[A-Z][a-z]{0,6}", 1..5)) {
            let mut engine = MergeEngine::default();
            for category in &categories {
                engine.add_entry(category, "   ");
                engine.add_entry(category, "");
            }
            prop_assert!(engine.category_names().is_empty());
            prop_assert!(!engine.has_entries());
        }
    }
}
