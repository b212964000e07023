//! Markdown rendering with syntax highlighting and sanitization

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::toc::{anchor_id, label_fragment, normalize_label, AnchorSet};
use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// URL schemes that can execute code when followed
const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Parser options shared by the renderer and the table of contents builder.
/// Both must see the same headings, so they must parse identically.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_GFM
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    highlight: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
            highlight: true,
        }
    }

    /// Renderer that leaves code blocks unhighlighted
    pub fn plain() -> Self {
        Self {
            syntax_set: SyntaxSet::new(),
            theme_set: ThemeSet::new(),
            theme_name: String::new(),
            line_numbers: false,
            highlight: false,
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        if config.enable {
            Self::with_options(&config.theme, config.line_number)
        } else {
            Self::plain()
        }
    }

    /// Render markdown to HTML that is safe to inject into a page as-is.
    ///
    /// Raw HTML in the source comes out as escaped text, links and images with
    /// executable schemes point at `#`, and every heading carries the same
    /// anchor id that [`build_toc`](super::toc::build_toc) reports for it.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, parser_options());

        let mut events: Vec<Event> = Vec::new();
        let mut anchors = AnchorSet::new();
        // Some(lang) while inside a code block
        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();
        // (level, inner events, label) while inside a heading
        let mut heading: Option<(usize, Vec<Event>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    });
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_block.take() {
                        let highlighted = self.highlight_code(&code_block_content, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level as usize, Vec::new(), String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    // Inner events stay in the main stream so footnotes are numbered once
                    if let Some((level, inner, label)) = heading.take() {
                        let id = anchors.unique(anchor_id(&normalize_label(&label)));
                        events.push(Event::Html(CowStr::from(format!("<h{level} id=\"{id}\">"))));
                        events.extend(inner);
                        events.push(Event::Html(CowStr::from(format!("</h{level}>\n"))));
                    }
                }
                other => match heading.as_mut() {
                    Some((_, inner, label)) => {
                        if let Some(fragment) = label_fragment(&other) {
                            label.push_str(fragment);
                        }
                        inner.push(sanitize(other));
                    }
                    None => events.push(sanitize(other)),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        if !self.highlight {
            return plain_code_block(code, lang);
        }

        let token = lang.unwrap_or("text");
        let syntax = self
            .syntax_set
            .find_syntax_by_token(token)
            .or_else(|| self.syntax_set.find_syntax_by_extension(token))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain_code_block(code, lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    self.add_line_numbers(&highlighted, code.lines().count(), token)
                } else {
                    highlighted
                }
            }
            Err(e) => {
                tracing::debug!("Highlighting failed for {:?}: {}", token, e);
                plain_code_block(code, lang)
            }
        }
    }

    /// Add a line-number gutter next to highlighted code
    fn add_line_numbers(&self, highlighted: &str, line_count: usize, lang: &str) -> String {
        let gutter = (1..=line_count)
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            html_escape(lang),
            gutter,
            highlighted
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Neutralize anything in the event stream that could run script
fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url, false),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url, true),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>, image: bool) -> CowStr<'_> {
    // Browsers ignore whitespace and control characters inside the scheme
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let blocked = BLOCKED_SCHEMES.iter().any(|s| normalized.starts_with(s));
    let inline_image = image
        && normalized.starts_with("data:image/")
        && !normalized.starts_with("data:image/svg");

    if blocked && !inline_image {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::toc::build_toc;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_standard_constructs() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render(
            "* one\n* two\n\n*em* and **strong** [rust](https://www.rust-lang.org) ![logo](/img/logo.png)\n",
        );
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<em>em</em>"));
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains(r#"<a href="https://www.rust-lang.org">rust</a>"#));
        assert!(html.contains(r#"<img src="/img/logo.png" alt="logo" />"#));
    }

    #[test]
    fn test_render_code_block_highlighted() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("style="));
        assert!(!html.contains("```"));
    }

    #[test]
    fn test_render_code_block_plain() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("```rust\nlet x = a < b;\n```");
        assert!(html.contains(r#"<pre><code class="language-rust">let x = a &lt; b;"#));
    }

    #[test]
    fn test_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", true);
        let html = renderer.render("```python\na = 1\nb = 2\n```");
        assert!(html.contains(r#"<figure class="highlight python">"#));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }

    #[test]
    fn test_script_blocks_are_escaped() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("<script>alert('x')</script>\n\nafter");
        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn test_inline_html_is_escaped() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("Hello <img src=x onerror=alert(1)> there");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_executable_links_are_neutralized() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("[click](javascript:alert(1)) [b](JaVaScRiPt:void) [c](data:text/html,x)");
        assert!(!html.to_lowercase().contains("javascript:"));
        assert!(!html.contains("data:text/html"));
        assert_eq!(html.matches(r##"href="#""##).count(), 3);
    }

    #[test]
    fn test_inline_images_allowed() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("![dot](data:image/png;base64,AAAA)\n\n![svg](data:image/svg+xml,x)");
        assert!(html.contains("data:image/png;base64,AAAA"));
        assert!(!html.contains("data:image/svg"));
    }

    #[test]
    fn test_code_language_is_escaped() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("```\"><script>\nx\n```");
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_heading_ids_match_toc() {
        let markdown = "## Overview\n\ntext\n\n## Overview\n\n### Use `cargo` <b>now</b>\n";
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render(markdown);
        for entry in build_toc(markdown) {
            assert!(
                html.contains(&format!("id=\"{}\"", entry.anchor_id)),
                "missing anchor {}",
                entry.anchor_id
            );
        }
        assert!(html.contains(r#"<h2 id="overview-2">Overview</h2>"#));
        assert!(html.contains(r#"<h3 id="use-cargo-now">"#));
        assert!(html.contains("<code>cargo</code>"));
        assert!(html.contains("&lt;b&gt;now&lt;/b&gt;"));
    }

    #[test]
    fn test_footnote_in_heading_shares_numbering() {
        let renderer = MarkdownRenderer::plain();
        let html = renderer.render("Body[^b]\n\n## Title[^a]\n\n[^a]: First\n\n[^b]: Second\n");
        assert!(html.contains(r#"<h2 id="title">Title"#));
        assert!(html.contains(r##"<a href="#b">1</a>"##));
        assert!(html.contains(r##"<a href="#a">2</a>"##));
        assert!(!html.contains(r##"<a href="#a">1</a>"##));
    }

    #[test]
    fn test_render_is_deterministic() {
        let markdown = "# Title\n\n## Title\n\n```rust\nfn main() { println!(\"hi\"); }\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nText[^1]\n\n[^1]: Note\n";
        let renderer = MarkdownRenderer::new();
        let first = renderer.render(markdown);
        let second = renderer.render(markdown);
        assert_eq!(first, second);
        assert_eq!(first, MarkdownRenderer::new().render(markdown));
    }
}
