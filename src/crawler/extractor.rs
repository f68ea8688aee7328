//! HTML reference extraction
//!
//! Every tag may point somewhere: `<a href>`, `<link href>`, `<img src>`, `<script src>` and so
//! on. Each start tag (self-closing included) contributes at most one reference, read from its
//! first present attribute in [`REFERENCE_ATTRIBUTES`] order.
//!
//! Documents are tokenized, not tree-built: tags the HTML tree builder would drop or re-parent
//! (inside `<select>`, a second `<frameset>`, after `</html>`) still count.

use crate::url::resolve_reference;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, TagToken, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use std::collections::HashSet;
use url::Url;

/// Attributes inspected on every tag, in preference order
pub const REFERENCE_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// Extracts the deduplicated, absolute references of an HTML document
///
/// Relative values are resolved against `base`, the URL the document was fetched from. A value
/// that does not parse as a URL reference is skipped without affecting other tags. The result
/// keeps the first occurrence of each URL in document order.
///
/// # Example
///
/// ```
/// use sitegraph::crawler::extract_references;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><img src="logo.png"><a href="/about">Again</a>"#;
/// let base = Url::parse("https://site.test/").unwrap();
/// let refs = extract_references(html, &base);
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].as_str(), "https://site.test/about");
/// assert_eq!(refs[1].as_str(), "https://site.test/logo.png");
/// ```
pub fn extract_references(html: &str, base: &Url) -> Vec<Url> {
    let sink = ReferenceSink {
        base,
        references: Vec::new(),
    };
    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());

    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    unique_urls(tokenizer.sink.references)
}

/// Collects references from start tags as the tokenizer emits them
struct ReferenceSink<'a> {
    base: &'a Url,
    references: Vec<Url>,
}

impl ReferenceSink<'_> {
    fn record(&mut self, tag: &Tag) {
        let Some(raw) = REFERENCE_ATTRIBUTES.iter().find_map(|&name| {
            tag.attrs
                .iter()
                .find(|attr| &*attr.name.local == name)
                .map(|attr| &*attr.value)
        }) else {
            return;
        };

        match resolve_reference(self.base, raw) {
            Ok(url) => self.references.push(url),
            Err(e) => tracing::debug!("Skipping <{}> reference on {}: {}", tag.name, self.base, e),
        }
    }
}

impl TokenSink for ReferenceSink<'_> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            TagToken(tag) if tag.kind == TagKind::StartTag => {
                self.record(&tag);
                if tag.self_closing {
                    TokenSinkResult::Continue
                } else {
                    text_mode_after(&tag)
                }
            }
            _ => TokenSinkResult::Continue,
        }
    }
}

/// Tokenizer state after an opening tag whose content is text, not markup
///
/// Without a tree builder nobody else switches the tokenizer, so markup-looking text inside
/// `<script>` or `<textarea>` would otherwise be read as tags.
fn text_mode_after(tag: &Tag) -> TokenSinkResult<()> {
    match &*tag.name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Removes repeated URLs by canonical string, keeping the first occurrence
pub fn unique_urls(urls: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}
