//! Table of contents extraction
//!
//! Headings are read from the same pulldown-cmark event stream the renderer
//! uses, so anything inside a fenced or indented code block is never treated
//! as a heading, and the anchors here always match the `id`s in the HTML.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::markdown::parser_options;
use crate::helpers::html_escape;

/// Anchor used when a heading has no alphanumeric characters at all
const FALLBACK_ANCHOR: &str = "section";

/// One heading of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub anchor_id: String,
}

/// A heading together with the headings nested below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    #[serde(flatten)]
    pub entry: TocEntry,
    pub children: Vec<TocNode>,
}

/// Base anchor for a heading label: lowercase, runs of anything
/// non-alphanumeric collapsed to `-`, no leading or trailing `-`.
pub fn anchor_id(text: &str) -> String {
    let id = slug::slugify(text);
    if id.is_empty() {
        FALLBACK_ANCHOR.to_string()
    } else {
        id
    }
}

/// Hands out document-unique anchors.
///
/// The first heading keeps its base id; repeats get `-2`, `-3`, ... and any
/// candidate already taken by another heading is skipped.
#[derive(Debug, Default)]
pub struct AnchorSet {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = self.next_suffix.get(&base).copied().unwrap_or(2);
        loop {
            let candidate = format!("{}-{}", base, n);
            n += 1;
            if self.used.insert(candidate.clone()) {
                self.next_suffix.insert(base, n);
                return candidate;
            }
        }
    }
}

/// Text of an event as it contributes to a heading label. Raw HTML is
/// left out of labels and anchors.
pub(crate) fn label_fragment<'a>(event: &'a Event<'_>) -> Option<&'a str> {
    match event {
        Event::Text(text) | Event::Code(text) => Some(&**text),
        Event::SoftBreak | Event::HardBreak => Some(" "),
        _ => None,
    }
}

/// Collapse whitespace in an accumulated heading label
pub(crate) fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the ordered outline of a markdown document
pub fn build_toc(markdown: &str) -> Vec<TocEntry> {
    let mut anchors = AnchorSet::new();
    let mut entries = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, label)) = current.take() {
                    let text = normalize_label(&label);
                    let anchor_id = anchors.unique(anchor_id(&text));
                    entries.push(TocEntry {
                        level,
                        text,
                        anchor_id,
                    });
                }
            }
            _ => {
                if let Some((_, label)) = current.as_mut() {
                    if let Some(fragment) = label_fragment(&event) {
                        label.push_str(fragment);
                    }
                }
            }
        }
    }

    entries
}

/// Turn the flat outline into a tree. A heading becomes a child of the closest
/// preceding heading with a smaller level.
pub fn nest(entries: &[TocEntry]) -> Vec<TocNode> {
    fn attach(nodes: &mut Vec<TocNode>, entry: &TocEntry) {
        if let Some(last) = nodes.last_mut() {
            if entry.level > last.entry.level {
                attach(&mut last.children, entry);
                return;
            }
        }
        nodes.push(TocNode {
            entry: entry.clone(),
            children: Vec::new(),
        });
    }

    let mut roots = Vec::new();
    for entry in entries {
        attach(&mut roots, entry);
    }
    roots
}

/// Render the outline as nested `<ol class="toc">` markup, keeping headings up
/// to `max_depth`
pub fn render_toc_html(entries: &[TocEntry], max_depth: u8) -> String {
    fn render_nodes(html: &mut String, nodes: &[TocNode]) {
        for node in nodes {
            let entry = &node.entry;
            html.push_str(&format!(
                "<li class=\"toc-item toc-level-{}\"><a class=\"toc-link\" href=\"#{}\"><span class=\"toc-text\">{}</span></a>",
                entry.level,
                entry.anchor_id,
                html_escape(&entry.text)
            ));
            if !node.children.is_empty() {
                html.push_str("<ol class=\"toc-child\">");
                render_nodes(html, &node.children);
                html.push_str("</ol>");
            }
            html.push_str("</li>");
        }
    }

    let kept: Vec<TocEntry> = entries
        .iter()
        .filter(|e| e.level <= max_depth)
        .cloned()
        .collect();

    let mut html = r#"<ol class="toc">"#.to_string();
    render_nodes(&mut html, &nest(&kept));
    html.push_str("</ol>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(markdown: &str) -> Vec<String> {
        build_toc(markdown)
            .into_iter()
            .map(|e| e.anchor_id)
            .collect()
    }

    #[test]
    fn test_levels_and_text() {
        let toc = build_toc("# Intro\n\ntext\n\n## Getting *Started*\n\n### `cargo` Setup\n");
        assert_eq!(
            toc,
            vec![
                TocEntry {
                    level: 1,
                    text: "Intro".to_string(),
                    anchor_id: "intro".to_string()
                },
                TocEntry {
                    level: 2,
                    text: "Getting Started".to_string(),
                    anchor_id: "getting-started".to_string()
                },
                TocEntry {
                    level: 3,
                    text: "cargo Setup".to_string(),
                    anchor_id: "cargo-setup".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_anchor_id_normalization() {
        assert_eq!(anchor_id("Hello, World!"), "hello-world");
        assert_eq!(anchor_id("  --Rust & WebAssembly--  "), "rust-webassembly");
        assert_eq!(anchor_id("Step 2: Deploy"), "step-2-deploy");
        assert_eq!(anchor_id("!!!"), "section");
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let md = "## Overview\n\n## Overview\n\n## Overview\n";
        assert_eq!(anchors(md), vec!["overview", "overview-2", "overview-3"]);
    }

    #[test]
    fn test_suffix_skips_taken_ids() {
        let md = "## Overview 2\n\n## Overview\n\n## Overview\n";
        assert_eq!(anchors(md), vec!["overview-2", "overview", "overview-3"]);
    }

    #[test]
    fn test_headings_in_fenced_code_are_ignored() {
        let md = "# Real\n\n```bash\n# not a heading\n## neither\n```\n\n~~~\n# tilde fence\n~~~\n\n## Also Real\n";
        let toc = build_toc(md);
        let texts: Vec<_> = toc.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Real", "Also Real"]);
    }

    #[test]
    fn test_headings_in_indented_code_are_ignored() {
        let md = "Paragraph\n\n    # indented code\n\n# Heading\n";
        assert_eq!(anchors(md), vec!["heading"]);
    }

    #[test]
    fn test_inline_html_left_out_of_labels() {
        let toc = build_toc("### Use `cargo` <b>now</b>\n");
        assert_eq!(toc[0].text, "Use cargo now");
        assert_eq!(toc[0].anchor_id, "use-cargo-now");
    }

    #[test]
    fn test_setext_headings() {
        let toc = build_toc("Title\n=====\n\nSub\n---\n");
        assert_eq!(toc[0].level, 1);
        assert_eq!(toc[1].level, 2);
        assert_eq!(toc[1].anchor_id, "sub");
    }

    #[test]
    fn test_nest() {
        let toc = build_toc("# A\n## B\n### C\n## D\n# E\n");
        let tree = nest(&toc);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].children[0].entry.text, "C");
        assert_eq!(tree[1].entry.text, "E");
    }

    #[test]
    fn test_nest_starting_below_top_level() {
        let toc = build_toc("### Deep\n# Top\n");
        let tree = nest(&toc);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_render_toc_html() {
        let toc = build_toc("## One\n### Two <b>\n#### Too deep\n");
        let html = render_toc_html(&toc, 3);
        assert!(html.starts_with(r#"<ol class="toc">"#));
        assert!(html.contains(r##"href="#one""##));
        assert!(html.contains("Two &lt;b&gt;"));
        assert!(!html.contains("Too deep"));
    }
}
