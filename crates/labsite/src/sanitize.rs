//! HTML sanitization for fields coming from the data service.
//!
//! Every HTML-bearing field goes through [`sanitize`] before it reaches a template. Templates only accept
//! [`SafeHtml`] as raw markup, plain strings are always escaped by maud.
use std::collections::HashSet;
use std::sync::LazyLock;

use maud::Render;

static POLICY: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .add_generic_attributes(["class"])
        .add_tag_attributes("a", ["target"])
        .link_rel(Some("noopener noreferrer"));
    builder
});

static TEXT_ONLY: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    builder
});

/// Markup that went through the sanitizer and can be injected as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Render for SafeHtml {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}

/// Strips script execution vectors and unsafe attributes, keeping links and formatting.
pub fn sanitize(input: &str) -> SafeHtml {
    SafeHtml(POLICY.clean(input).to_string())
}

/// Text content of an HTML fragment, with tags dropped and entities decoded.
///
/// Meant for places that can't hold markup, like `<title>`. The result is escaped again by maud.
pub fn to_plain_text(input: &str) -> String {
    TEXT_ONLY
        .clean(input)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
