// uiconf-core/src/markup.rs
//! HTML normalization for comparing rendered markup in assertions

use regex::Regex;
use std::sync::LazyLock;

static TABLE_ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(\s?style="[^"]*")|(\s?data(-header)?(-cell)?(-row)?(-line)?="[^"]*")|(\s?class="ql-table(-header)?(-data)?(-cell)?(-line)?")"#,
    )
    .expect("table attribute pattern is valid")
});

/// Drop inline styles, table `data-*` attributes and `ql-table*` classes
pub fn strip_table_attributes(html: &str) -> String {
    TABLE_ATTRIBUTES.replace_all(html, "").into_owned()
}

/// Drop zero-width no-break spaces left around embeds
pub fn strip_embed_markers(html: &str) -> String {
    html.replace('\u{FEFF}', "")
}

/// Expected shape of a rendered link; unset parts are not checked
///
/// Each part is matched as literal text, so `.` or `?` in an href only match
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct LinkExpectation<'a> {
    pub href: Option<&'a str>,
    pub content: Option<&'a str>,
    pub after_link: Option<&'a str>,
}

impl LinkExpectation<'_> {
    /// Names of the parts that do not match `html`
    pub fn mismatches(&self, html: &str) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if let Some(href) = self.href
            && !html.contains(&format!("href=\"{}\"", href))
        {
            failed.push("href");
        }
        if let Some(content) = self.content
            && !html.contains(&format!(">{}</a>", content))
        {
            failed.push("content");
        }
        if let Some(after) = self.after_link
            && !html.contains(&format!("</a>{}</p>", after))
        {
            failed.push("afterLink");
        }
        failed
    }

    pub fn check(&self, html: &str) -> bool {
        self.mismatches(html).is_empty()
    }
}
