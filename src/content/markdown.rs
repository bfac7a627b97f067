//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

/// Markdown renderer with optional code block highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

impl MarkdownRenderer {
    /// Create a renderer that highlights with the default theme
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(highlight: &HighlightConfig) -> Self {
        let theme = if highlight.enable {
            let mut theme_set = ThemeSet::load_defaults();
            let theme = theme_set.themes.remove(&highlight.theme);
            if theme.is_none() {
                tracing::warn!(
                    "Unknown highlight theme {:?}, code blocks will not be highlighted",
                    highlight.theme
                );
            }
            theme
        } else {
            None
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front matter is split off beforehand, so no YAML metadata blocks here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        match &self.theme {
            Some(theme) => {
                let events = self.highlight_events(parser, theme);
                html::push_html(&mut html_output, events.into_iter())
            }
            None => html::push_html(&mut html_output, parser),
        }
        html_output
    }

    /// Replace fenced code blocks that name a language with highlighted HTML
    fn highlight_events<'a>(&self, parser: Parser<'a>, theme: &Theme) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut code_lang: Option<String> = None;
        let mut code = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang)))
                    if !lang.trim().is_empty() =>
                {
                    code_lang = lang.split_whitespace().next().map(str::to_string);
                    code.clear();
                }
                Event::Text(text) if code_lang.is_some() => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) if code_lang.is_some() => {
                    let lang = code_lang.take().unwrap_or_default();
                    events.push(Event::Html(CowStr::from(
                        self.highlight_code(&code, &lang, theme),
                    )));
                }
                other => events.push(other),
            }
        }

        events
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str, theme: &Theme) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(
                r#"<figure class="highlight language-{}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    html_escape(lang),
                    html_escape(code)
                )
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
