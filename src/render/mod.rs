//! Unified diff rendering for snapshot pairs.
//!
//! Each sub-document (configuration, relationships, supplementary
//! configuration) is pretty-printed and diffed line by line on its own, so
//! one snapshot pair yields up to three blocks.

use crate::model::Snapshot;
use crate::normalize::pretty_json;
use serde_json::{Map, Value};
use similar::{Algorithm, ChangeTag, DiffOp, TextDiff};

/// Default number of context lines around each change.
pub const DEFAULT_CONTEXT_LINES: usize = 10;

/// Names of the diffed sub-documents, as they appear in file headers.
pub const CONFIGURATION: &str = "configuration";
pub const RELATIONSHIPS: &str = "relationships";
pub const SUPPLEMENTARY: &str = "supplementaryConfiguration";

fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Role of a line within a unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// `---` / `+++` lines
    FileHeader,
    /// `@@ ... @@` lines
    HunkHeader,
    Context,
    Addition,
    Deletion,
}

impl LineClass {
    const fn color(self) -> &'static str {
        match self {
            Self::FileHeader => "bold",
            Self::HunkHeader => "cyan",
            Self::Addition => "green",
            Self::Deletion => "red",
            Self::Context => "",
        }
    }
}

/// One line of diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub class: LineClass,
    pub text: String,
}

impl DiffLine {
    fn new(class: LineClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }
}

/// The unified diff of one sub-document between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffBlock {
    /// Sub-document name (`configuration`, `relationships`, ...)
    pub document: String,
    pub lines: Vec<DiffLine>,
}

impl DiffBlock {
    /// True when the two documents were identical.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.count(LineClass::Addition)
    }

    pub fn deletions(&self) -> usize {
        self.count(LineClass::Deletion)
    }

    fn count(&self, class: LineClass) -> usize {
        self.lines.iter().filter(|l| l.class == class).count()
    }

    /// Render as text, one diff line per output line, no trailing newline.
    pub fn render(&self, color: bool) -> String {
        self.lines
            .iter()
            .map(|line| ansi_color(&line.text, line.class.color(), color))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `start,len` as difflib writes it in unified hunk headers.
fn format_range(start: usize, end: usize) -> String {
    let length = end - start;
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{start},0"),
        _ => format!("{},{length}", start + 1),
    }
}

fn hunk_header(group: &[DiffOp]) -> Option<String> {
    let first = group.first()?;
    let last = group.last()?;
    let old = format_range(first.old_range().start, last.old_range().end);
    let new = format_range(first.new_range().start, last.new_range().end);
    Some(format!("@@ -{old} +{new} @@"))
}

/// Produces unified diffs between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRenderer {
    /// Unchanged lines shown around each change
    pub context_lines: usize,
    /// Wrap lines in ANSI color codes
    pub color: bool,
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            color: false,
        }
    }
}

impl DiffRenderer {
    #[must_use]
    pub const fn new(context_lines: usize, color: bool) -> Self {
        Self {
            context_lines,
            color,
        }
    }

    /// Diff one named sub-document of two snapshots.
    ///
    /// Identical documents give an empty block without headers.
    pub fn render_document(
        &self,
        name: &str,
        older: &Snapshot,
        older_doc: &Value,
        newer: &Snapshot,
        newer_doc: &Value,
    ) -> DiffBlock {
        let mut block = DiffBlock {
            document: name.to_string(),
            lines: Vec::new(),
        };

        let old_text = pretty_json(older_doc);
        let new_text = pretty_json(newer_doc);
        if old_text == new_text {
            return block;
        }

        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(&old_text, &new_text);
        // Context beyond the longer document changes nothing and overflows
        // hunk arithmetic inside `similar`.
        let longest = old_text.lines().count().max(new_text.lines().count());
        let groups = diff.grouped_ops(self.context_lines.min(longest));
        if groups.is_empty() {
            return block;
        }

        block.lines.push(DiffLine::new(
            LineClass::FileHeader,
            format!("--- {}/{name}\t{}", older.arn, older.formatted_time()),
        ));
        block.lines.push(DiffLine::new(
            LineClass::FileHeader,
            format!("+++ {}/{name}\t{}", newer.arn, newer.formatted_time()),
        ));

        for group in &groups {
            if let Some(header) = hunk_header(group) {
                block.lines.push(DiffLine::new(LineClass::HunkHeader, header));
            }
            for op in group {
                for change in diff.iter_changes(op) {
                    let (class, marker) = match change.tag() {
                        ChangeTag::Equal => (LineClass::Context, ' '),
                        ChangeTag::Delete => (LineClass::Deletion, '-'),
                        ChangeTag::Insert => (LineClass::Addition, '+'),
                    };
                    let value = change.value();
                    let value = value.strip_suffix('\n').unwrap_or(value);
                    block.lines.push(DiffLine::new(class, format!("{marker}{value}")));
                }
            }
        }

        block
    }

    /// Diff every sub-document of a pair, dropping the unchanged ones.
    pub fn render_pair(&self, older: &Snapshot, newer: &Snapshot) -> Vec<DiffBlock> {
        let mut blocks = vec![
            self.render_document(
                CONFIGURATION,
                older,
                older.configuration.as_value(),
                newer,
                newer.configuration.as_value(),
            ),
            self.render_document(
                RELATIONSHIPS,
                older,
                &older.relationships,
                newer,
                &newer.relationships,
            ),
        ];

        if older.supplementary.is_some() || newer.supplementary.is_some() {
            let empty = Value::Object(Map::new());
            let doc = |snapshot: &Snapshot| {
                snapshot
                    .supplementary
                    .as_ref()
                    .map_or(&empty, |value| value.as_value())
                    .clone()
            };
            blocks.push(self.render_document(
                SUPPLEMENTARY,
                older,
                &doc(older),
                newer,
                &doc(newer),
            ));
        }

        blocks.retain(|block| !block.is_empty());
        blocks
    }

    /// Render a pair to text using this renderer's color setting.
    pub fn render_pair_text(&self, older: &Snapshot, newer: &Snapshot) -> String {
        self.render_pair(older, newer)
            .iter()
            .map(|block| block.render(self.color))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Shorthand for [`DiffRenderer::render_pair_text`].
pub fn render_diff(older: &Snapshot, newer: &Snapshot, context_lines: usize, color: bool) -> String {
    DiffRenderer::new(context_lines, color).render_pair_text(older, newer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, NormalizeOptions};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn snapshot(hour: u32, configuration: Value) -> Snapshot {
        Snapshot {
            capture_time: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            arn: "arn:aws:ec2:eu-west-1:123456789012:security-group/sg-1".to_string(),
            status: Some("OK".to_string()),
            configuration: normalize(&configuration, &NormalizeOptions::default()),
            relationships: json!([]),
            supplementary: None,
        }
    }

    #[test]
    fn test_identical_snapshots_render_nothing() {
        let s = snapshot(1, json!({"a": 1, "b": [1, 2]}));
        assert!(DiffRenderer::default().render_pair(&s, &s).is_empty());
        assert_eq!(render_diff(&s, &s, 3, true), "");
    }

    #[test]
    fn test_changed_value_block() {
        let older = snapshot(1, json!({"a": 1, "b": 3}));
        let newer = snapshot(2, json!({"b": 2, "a": 1}));
        let blocks = DiffRenderer::new(10, false).render_pair(&older, &newer);

        assert_eq!(blocks.len(), 1);
        let text = blocks[0].render(false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "--- arn:aws:ec2:eu-west-1:123456789012:security-group/sg-1/configuration\t2024-03-01 01:00:00",
                "+++ arn:aws:ec2:eu-west-1:123456789012:security-group/sg-1/configuration\t2024-03-01 02:00:00",
                "@@ -1,4 +1,4 @@",
                " {",
                "   \"a\": 1,",
                "-  \"b\": 3",
                "+  \"b\": 2",
                " }",
            ]
        );
        assert_eq!(blocks[0].additions(), 1);
        assert_eq!(blocks[0].deletions(), 1);
    }

    #[test]
    fn test_context_lines_limit_hunk() {
        let older = snapshot(1, json!({"a": 1, "b": 2, "c": 3, "d": 4, "e": 5}));
        let newer = snapshot(2, json!({"a": 1, "b": 2, "c": 30, "d": 4, "e": 5}));
        let block = &DiffRenderer::new(1, false).render_pair(&older, &newer)[0];
        let text = block.render(false);
        assert!(text.contains("@@ -3,3 +3,3 @@"), "{text}");
        assert!(!text.contains("\"a\""));
    }

    #[test]
    fn test_huge_context_shows_whole_document() {
        let older = snapshot(1, json!({"a": 1, "b": 3}));
        let newer = snapshot(2, json!({"a": 1, "b": 2}));
        assert_eq!(
            render_diff(&older, &newer, usize::MAX, false),
            render_diff(&older, &newer, 10, false)
        );
    }

    #[test]
    fn test_zero_context() {
        let older = snapshot(1, json!({"a": 1, "b": 2, "c": 3}));
        let newer = snapshot(2, json!({"a": 1, "b": 20, "c": 3}));
        let block = &DiffRenderer::new(0, false).render_pair(&older, &newer)[0];
        assert!(block.lines.iter().all(|l| l.class != LineClass::Context));
        assert!(block.render(false).contains("@@ -3 +3 @@"));
    }

    #[test]
    fn test_colors_by_line_class() {
        let older = snapshot(1, json!({"a": 1}));
        let newer = snapshot(2, json!({"a": 2}));
        let text = render_diff(&older, &newer, 10, true);
        assert!(text.contains("\x1b[1m--- "));
        assert!(text.contains("\x1b[36m@@"));
        assert!(text.contains("\x1b[31m-  \"a\": 1\x1b[0m"));
        assert!(text.contains("\x1b[32m+  \"a\": 2\x1b[0m"));
        assert!(text.contains("\n {\n"), "context is unstyled: {text:?}");
    }

    #[test]
    fn test_no_color_has_no_escapes() {
        let older = snapshot(1, json!({"a": 1}));
        let newer = snapshot(2, json!({"a": 2}));
        assert!(!render_diff(&older, &newer, 10, false).contains('\x1b'));
    }

    #[test]
    fn test_relationships_diffed_separately() {
        let older = snapshot(1, json!({"a": 1}));
        let mut newer = snapshot(2, json!({"a": 1}));
        newer.relationships = json!([{"resourceId": "vpc-1", "name": "Is contained in Vpc"}]);

        let blocks = DiffRenderer::default().render_pair(&older, &newer);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].document, RELATIONSHIPS);
        assert!(blocks[0].lines[0].text.ends_with("/relationships\t2024-03-01 01:00:00"));
    }

    #[test]
    fn test_supplementary_appears_when_added() {
        let older = snapshot(1, json!({"a": 1}));
        let mut newer = snapshot(2, json!({"a": 1}));
        newer.supplementary = Some(normalize(
            &json!({"Tags": {"env": "prod"}}),
            &NormalizeOptions::default(),
        ));

        let blocks = DiffRenderer::default().render_pair(&older, &newer);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].document, SUPPLEMENTARY);
        assert!(blocks[0].deletions() >= 1);
    }

    #[test]
    fn test_format_range_follows_difflib() {
        assert_eq!(format_range(0, 4), "1,4");
        assert_eq!(format_range(2, 3), "3");
        assert_eq!(format_range(5, 5), "5,0");
    }
}
