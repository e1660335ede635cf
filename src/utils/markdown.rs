//! Structural markdown rewriting.
//!
//! The body is parsed with pulldown-cmark and only the byte ranges the parser
//! reports are edited:
//!
//! - inline link and image destinations, through a [`LinkRewriter`]
//! - `<` / `>` inside table cells that contain a `<`
//!
//! Everything else (code blocks, code spans, prose) is copied through untouched.
//! Each destination is rewritten once from the original text, so a rewritten
//! link can never be matched again by another rule.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::{ops::Range, sync::OnceLock};

// ============================================================================
// Link rewriting rules
// ============================================================================

/// Maps a link destination to its new value; `None` keeps it unchanged.
pub trait LinkRewriter {
    fn rewrite(&self, dest: &str) -> Option<String>;
}

/// Rules for documents synced into the reference folder.
///
/// | Source link             | Output link                 |
/// |-------------------------|-----------------------------|
/// | `other.md`, `./other.md`| `./other.md`                |
/// | `../examples/x.json`    | `<examples_prefix>/x.json`  |
/// | `../spec/other.md`      | `./other.md`                |
/// | `examples/x.json`       | `<examples_prefix>/x.json`  |
pub struct SpecLinks<'a> {
    /// Specification folder name in the source tree
    pub spec_dir: &'a str,
    /// Examples folder name in the source tree
    pub examples_dir: &'a str,
    /// Link prefix from the reference folder to the examples folder
    pub examples_prefix: String,
}

impl LinkRewriter for SpecLinks<'_> {
    fn rewrite(&self, dest: &str) -> Option<String> {
        let (path, suffix) = split_target(dest)?;
        let path = path.strip_prefix("./").unwrap_or(path);

        // A link that leaves the spec folder only to re-enter it
        if let Some(rest) = strip_dir(path, &format!("../{}", self.spec_dir))
            && is_markdown_file(rest)
        {
            return Some(format!("./{rest}{suffix}"));
        }

        // `../examples/...`, or `examples/...` missing its parent hop
        let examples = strip_dir(path, &format!("../{}", self.examples_dir))
            .or_else(|| strip_dir(path, self.examples_dir));
        if let Some(rest) = examples {
            return Some(join_prefix(&self.examples_prefix, rest, suffix));
        }

        is_markdown_file(path).then(|| format!("./{path}{suffix}"))
    }
}

/// Rules for root documents (README, CONTRIBUTING, CHANGELOG) written to the docs root.
pub struct RootLinks<'a> {
    pub spec_dir: &'a str,
    pub examples_dir: &'a str,
    /// Link prefix from the docs root to the reference folder, e.g. `./specification`
    pub reference_prefix: String,
    /// Link prefix from the docs root to the examples folder, e.g. `./examples`
    pub examples_prefix: String,
    /// Overview file inside the reference folder
    pub reference_index: &'a str,
    /// Exact file references and their replacement targets
    pub cross_refs: Vec<(String, String)>,
}

impl LinkRewriter for RootLinks<'_> {
    fn rewrite(&self, dest: &str) -> Option<String> {
        let (path, suffix) = split_target(dest)?;
        let path = path.strip_prefix("./").unwrap_or(path);

        if let Some((_, target)) = self.cross_refs.iter().find(|(file, _)| file == path) {
            return Some(format!("{target}{suffix}"));
        }

        if let Some(rest) = strip_dir(path, self.spec_dir) {
            let rest = if rest.is_empty() { self.reference_index } else { rest };
            return Some(join_prefix(&self.reference_prefix, rest, suffix));
        }

        if let Some(rest) = strip_dir(path, self.examples_dir) {
            let rest = if rest.is_empty() { "index.md" } else { rest };
            return Some(join_prefix(&self.examples_prefix, rest, suffix));
        }

        None
    }
}

/// Split a relative destination into path and `#fragment`/`?query` suffix.
///
/// Returns `None` for destinations that must never be rewritten: URLs with a
/// scheme, absolute paths and pure fragments.
fn split_target(dest: &str) -> Option<(&str, &str)> {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    let scheme =
        SCHEME.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("valid scheme regex"));

    if dest.is_empty() || dest.starts_with(['#', '/']) || scheme.is_match(dest) {
        return None;
    }

    let cut = dest.find(['#', '?']).unwrap_or(dest.len());
    let (path, suffix) = dest.split_at(cut);
    (!path.is_empty()).then_some((path, suffix))
}

/// `path` below directory `dir`: `Some("")` for the directory itself.
fn strip_dir<'p>(path: &'p str, dir: &str) -> Option<&'p str> {
    match path.strip_prefix(dir)? {
        "" | "/" => Some(""),
        rest => rest.strip_prefix('/'),
    }
}

/// A plain `name.md` without directory components
fn is_markdown_file(path: &str) -> bool {
    !path.contains('/') && path.len() > ".md".len() && path.ends_with(".md")
}

fn join_prefix(prefix: &str, rest: &str, suffix: &str) -> String {
    if rest.is_empty() {
        format!("{prefix}/{suffix}")
    } else {
        format!("{prefix}/{rest}{suffix}")
    }
}

// ============================================================================
// Transformation
// ============================================================================

/// A replacement of `range` in the source text.
#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// A link whose end event has not been seen yet.
struct OpenLink<'a> {
    range: Range<usize>,
    link_type: LinkType,
    dest: CowStr<'a>,
    /// Furthest byte reached by the link text events
    text_end: usize,
}

/// Rewrite link destinations and optionally escape table cells.
pub fn transform(body: &str, links: &dyn LinkRewriter, escape_tables: bool) -> String {
    let mut edits = Vec::new();
    // Spans whose characters are never escaped: code spans, autolinks and
    // the `](dest "title")` tail of links
    let mut protected: Vec<Range<usize>> = Vec::new();
    let mut cells: Vec<Range<usize>> = Vec::new();
    let mut open: Vec<OpenLink> = Vec::new();

    let parser = Parser::new_ext(body, Options::ENABLE_TABLES);
    for (event, range) in parser.into_offset_iter() {
        if let Some(link) = open.last_mut()
            && !matches!(event, Event::End(TagEnd::Link | TagEnd::Image))
        {
            link.text_end = link.text_end.max(range.end);
        }

        match event {
            Event::Start(
                Tag::Link { link_type, dest_url, .. } | Tag::Image { link_type, dest_url, .. },
            ) => {
                let opener = if body[range.start..].starts_with('!') { 2 } else { 1 };
                open.push(OpenLink {
                    text_end: range.start + opener,
                    range,
                    link_type,
                    dest: dest_url,
                });
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                if let Some(link) = open.pop() {
                    if let Some(parent) = open.last_mut() {
                        parent.text_end = parent.text_end.max(link.range.end);
                    }
                    close_link(body, &link, links, &mut edits, &mut protected);
                }
            }
            Event::Code(_) => protected.push(range),
            Event::Start(Tag::TableCell) => cells.push(range),
            _ => {}
        }
    }

    if escape_tables {
        for cell in &cells {
            edits.extend(escape_cell(body, cell, &protected));
        }
    }

    apply_edits(body, edits)
}

/// Rewrite the destination of a finished link and protect its syntax.
///
/// The link text stays unprotected so table escaping still reaches it.
fn close_link(
    body: &str,
    link: &OpenLink,
    links: &dyn LinkRewriter,
    edits: &mut Vec<Edit>,
    protected: &mut Vec<Range<usize>>,
) {
    if matches!(link.link_type, LinkType::Autolink | LinkType::Email) {
        protected.push(link.range.clone());
        return;
    }
    let Some(tail) = link_tail(body, link) else {
        protected.push(link.range.clone());
        return;
    };

    if link.link_type == LinkType::Inline
        && let Some(text) = links.rewrite(&link.dest)
        && text != *link.dest
        && let Some(dest_range) = locate_destination(body, &tail, &link.dest)
    {
        edits.push(Edit { range: dest_range, text });
    }
    protected.push(tail);
}

/// Range from the `]` closing the link text to the end of the link.
fn link_tail(body: &str, link: &OpenLink) -> Option<Range<usize>> {
    let rest = body.get(link.text_end..link.range.end)?;
    let close = link.text_end + rest.find(']')?;
    Some(close..link.range.end)
}

/// Byte range of the raw destination inside an inline link `tail` (`](dest ...)`).
///
/// Destinations written differently from their parsed form (backslash escapes,
/// entities) are not located and stay unchanged.
fn locate_destination(body: &str, tail: &Range<usize>, dest: &str) -> Option<Range<usize>> {
    let source = body.get(tail.clone())?;
    let after = source.strip_prefix("](")?;
    let trimmed = after.trim_start();
    let mut start = 2 + (after.len() - trimmed.len());
    if trimmed.starts_with('<') {
        start += 1;
    }
    source[start..]
        .starts_with(dest)
        .then(|| tail.start + start..tail.start + start + dest.len())
}

/// Escape edits for a table cell containing `<` outside protected spans.
fn escape_cell(body: &str, cell: &Range<usize>, protected: &[Range<usize>]) -> Vec<Edit> {
    let is_protected = |pos: usize| protected.iter().any(|span| span.contains(&pos));

    let candidates: Vec<(usize, u8)> = body.as_bytes()[cell.clone()]
        .iter()
        .enumerate()
        .map(|(i, byte)| (cell.start + i, *byte))
        .filter(|(pos, byte)| matches!(byte, b'<' | b'>') && !is_protected(*pos))
        .collect();

    if !candidates.iter().any(|(_, byte)| *byte == b'<') {
        return Vec::new();
    }

    candidates
        .into_iter()
        .map(|(pos, byte)| Edit {
            range: pos..pos + 1,
            text: if byte == b'<' { "&lt;" } else { "&gt;" }.into(),
        })
        .collect()
}

/// Apply non-overlapping edits; an edit overlapping an earlier one is dropped.
fn apply_edits(body: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);

    let mut output = String::with_capacity(body.len() + edits.len() * 4);
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor {
            continue;
        }
        output.push_str(&body[cursor..edit.range.start]);
        output.push_str(&edit.text);
        cursor = edit.range.end;
    }
    output.push_str(&body[cursor..]);
    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_links() -> SpecLinks<'static> {
        SpecLinks {
            spec_dir: "spec",
            examples_dir: "examples",
            examples_prefix: "../examples".into(),
        }
    }

    fn root_links() -> RootLinks<'static> {
        RootLinks {
            spec_dir: "spec",
            examples_dir: "examples",
            reference_prefix: "./specification".into(),
            examples_prefix: "./examples".into(),
            reference_index: "index.md",
            cross_refs: vec![
                ("CONTRIBUTING.md".into(), "./contributing".into()),
                ("LICENSE".into(), "https://github.com/acme/spec/blob/main/LICENSE".into()),
            ],
        }
    }

    fn spec(body: &str) -> String {
        transform(body, &spec_links(), true)
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("a.md#x"), Some(("a.md", "#x")));
        assert_eq!(split_target("a.md?v=1"), Some(("a.md", "?v=1")));
        assert_eq!(split_target("https://x.dev/a.md"), None);
        assert_eq!(split_target("mailto:a@b.c"), None);
        assert_eq!(split_target("#section"), None);
        assert_eq!(split_target("/docs/a"), None);
        assert_eq!(split_target(""), None);
    }

    #[test]
    fn test_strip_dir() {
        assert_eq!(strip_dir("examples/a.json", "examples"), Some("a.json"));
        assert_eq!(strip_dir("examples", "examples"), Some(""));
        assert_eq!(strip_dir("examples/", "examples"), Some(""));
        assert_eq!(strip_dir("examples-old/a", "examples"), None);
    }

    #[test]
    fn test_spec_rules() {
        let links = spec_links();
        assert_eq!(links.rewrite("other-file.md").as_deref(), Some("./other-file.md"));
        assert_eq!(links.rewrite("./other-file.md#a").as_deref(), Some("./other-file.md#a"));
        assert_eq!(links.rewrite("../examples/foo.json").as_deref(), Some("../examples/foo.json"));
        assert_eq!(links.rewrite("../spec/other.md").as_deref(), Some("./other.md"));
        assert_eq!(links.rewrite("./examples/foo.json").as_deref(), Some("../examples/foo.json"));
        assert_eq!(links.rewrite("examples/calc/").as_deref(), Some("../examples/calc/"));
        assert_eq!(links.rewrite("../README.md"), None);
        assert_eq!(links.rewrite("schema.json"), None);
        assert_eq!(links.rewrite("https://example.com/x.md"), None);
    }

    #[test]
    fn test_spec_rules_with_nested_layout() {
        let links = SpecLinks {
            examples_prefix: "../../examples".into(),
            ..spec_links()
        };
        assert_eq!(
            links.rewrite("../examples/foo.json").as_deref(),
            Some("../../examples/foo.json")
        );
    }

    #[test]
    fn test_root_rules() {
        let links = root_links();
        assert_eq!(links.rewrite("spec/workflow.md").as_deref(), Some("./specification/workflow.md"));
        assert_eq!(links.rewrite("./spec/").as_deref(), Some("./specification/index.md"));
        assert_eq!(links.rewrite("examples/calculator/handlers.py").as_deref(), Some("./examples/calculator/handlers.py"));
        assert_eq!(links.rewrite("examples").as_deref(), Some("./examples/index.md"));
        assert_eq!(links.rewrite("CONTRIBUTING.md#setup").as_deref(), Some("./contributing#setup"));
        assert_eq!(
            links.rewrite("./LICENSE").as_deref(),
            Some("https://github.com/acme/spec/blob/main/LICENSE")
        );
        assert_eq!(links.rewrite("docs/other.md"), None);
    }

    // ------------------------------------------------------------------------
    // Link transformation
    // ------------------------------------------------------------------------

    #[test]
    fn test_transform_rewrites_inline_links() {
        let body = "See [other](other-file.md) and [data](../examples/foo.json).\n";
        assert_eq!(
            spec(body),
            "See [other](./other-file.md) and [data](../examples/foo.json).\n"
        );
    }

    #[test]
    fn test_transform_rewrites_images_and_titles() {
        let body = "![diagram](examples/flow.png \"Flow\")\n";
        assert_eq!(spec(body), "![diagram](../examples/flow.png \"Flow\")\n");
    }

    #[test]
    fn test_transform_angle_destination() {
        let body = "[x](<other.md>)\n";
        assert_eq!(spec(body), "[x](<./other.md>)\n");
    }

    #[test]
    fn test_transform_nested_image_link() {
        let body = "[![badge](examples/badge.svg)](other.md)\n";
        assert_eq!(spec(body), "[![badge](../examples/badge.svg)](./other.md)\n");
    }

    #[test]
    fn test_transform_leaves_code_alone() {
        let body = "```md\n[x](other.md)\n```\n\nInline `[y](other.md)` too.\n";
        assert_eq!(spec(body), body);
    }

    #[test]
    fn test_transform_no_double_rewrite() {
        // `./examples/` is both an erroneous pattern and a prefix of the output
        let body = "[a](./examples/a.json) [b](../examples/b.json)\n";
        let once = spec(body);
        assert_eq!(once, "[a](../examples/a.json) [b](../examples/b.json)\n");
    }

    #[test]
    fn test_transform_title_containing_bracket_paren() {
        let body = "[x](other.md \"see ](y\")\n";
        assert_eq!(spec(body), "[x](./other.md \"see ](y\")\n");
    }

    #[test]
    fn test_transform_reference_links_untouched() {
        let body = "[x][ref]\n\n[ref]: other.md\n";
        assert_eq!(spec(body), body);
    }

    // ------------------------------------------------------------------------
    // Table escaping
    // ------------------------------------------------------------------------

    #[test]
    fn test_escape_table_cell_with_lt() {
        let body = "| field | limit |\n|-------|-------|\n| size | <100 |\n";
        assert_eq!(
            spec(body),
            "| field | limit |\n|-------|-------|\n| size | &lt;100 |\n"
        );
    }

    #[test]
    fn test_escape_generic_type_in_cell() {
        let body = "| name | type |\n|---|---|\n| items | Array<Step> |\n";
        assert_eq!(
            spec(body),
            "| name | type |\n|---|---|\n| items | Array&lt;Step&gt; |\n"
        );
    }

    #[test]
    fn test_escape_link_text_in_cell() {
        let body = "| type | doc |\n|---|---|\n| [List<Step>](list.md) | items |\n";
        assert_eq!(
            spec(body),
            "| type | doc |\n|---|---|\n| [List&lt;Step&gt;](./list.md) | items |\n"
        );
    }

    #[test]
    fn test_escape_link_text_next_to_other_lt() {
        let body = "| a | b |\n|---|---|\n| [List<Step>](list.md) <100 | x |\n";
        assert_eq!(
            spec(body),
            "| a | b |\n|---|---|\n| [List&lt;Step&gt;](./list.md) &lt;100 | x |\n"
        );
    }

    #[test]
    fn test_link_destination_in_cell_not_escaped() {
        let body = "| a | b |\n|---|---|\n| [x](<other.md>) <1 | <https://x.dev> |\n";
        assert_eq!(
            spec(body),
            "| a | b |\n|---|---|\n| [x](<./other.md>) &lt;1 | <https://x.dev> |\n"
        );
    }

    #[test]
    fn test_cells_without_lt_untouched() {
        let body = "| op | meaning |\n|---|---|\n| a > b | greater |\n";
        assert_eq!(spec(body), body);
    }

    #[test]
    fn test_code_span_in_cell_untouched() {
        let body = "| type | note |\n|---|---|\n| `Map<K, V>` | keyed <unique> |\n";
        assert_eq!(
            spec(body),
            "| type | note |\n|---|---|\n| `Map<K, V>` | keyed &lt;unique&gt; |\n"
        );
    }

    #[test]
    fn test_lt_outside_tables_untouched() {
        let body = "Values must be <100 in prose.\n";
        assert_eq!(spec(body), body);
    }

    #[test]
    fn test_escape_disabled() {
        let body = "| a | b |\n|---|---|\n| x | <1 |\n";
        assert_eq!(transform(body, &spec_links(), false), body);
    }

    #[test]
    fn test_apply_edits_drops_overlaps() {
        let edits = vec![
            Edit { range: 0..3, text: "X".into() },
            Edit { range: 2..4, text: "Y".into() },
        ];
        assert_eq!(apply_edits("abcdef", edits), "Xdef");
    }
}
