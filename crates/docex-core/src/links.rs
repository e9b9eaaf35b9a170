//! Rewriting of inline markdown links into relative file links.
//!
//! Exported documents live side by side as `{slug}.md`, so a link to another
//! document only needs its slug with a `.md` suffix:
//!
//! ```rust
//! use docex_core::links::normalize_links;
//!
//! assert_eq!(normalize_links("[Setup](doc:setup#linux)"), "[Setup](setup.md#linux)");
//! assert_eq!(normalize_links("[Logo](logo.png)"), "[Logo](logo.png)");
//! assert_eq!(normalize_links("[Site](https://example.com/a)"), "[Site](https://example.com/a)");
//! ```

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Scheme marker the platform uses for links to other documents.
pub const DOC_SCHEME: &str = "doc:";

/// Regex for markdown links: [text](url)
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Rewrite every `[text](target)` in `markdown` with [`normalize_target`].
///
/// Text outside links is untouched; link text is re-emitted as is.
pub fn normalize_links(markdown: &str) -> Cow<'_, str> {
    MARKDOWN_LINK_RE.replace_all(markdown, |caps: &Captures<'_>| {
        format!("[{}]({})", &caps[1], normalize_target(&caps[2]))
    })
}

/// Rewrite a single link target.
///
/// - a leading `doc:` marker is dropped
/// - the part before the first `#` gets `.md` appended when it is not an
///   `http:`/`https:` URL and its last `/` segment has no `.`
/// - the fragment, if any, is kept
pub fn normalize_target(target: &str) -> String {
    let target = target.strip_prefix(DOC_SCHEME).unwrap_or(target);
    let (base, fragment) = match target.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (target, None),
    };

    let mut out = String::with_capacity(target.len() + 3);
    out.push_str(base);
    if needs_md_suffix(base) {
        out.push_str(".md");
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn needs_md_suffix(base: &str) -> bool {
    if base.starts_with("http:") || base.starts_with("https:") {
        return false;
    }
    let last_segment = base.rsplit('/').next().unwrap_or(base);
    !last_segment.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_doc_links_become_relative_markdown() {
        assert_eq!(normalize_links("[text](doc:foo#bar)"), "[text](foo.md#bar)");
        assert_eq!(normalize_links("[See](doc:setup)"), "[See](setup.md)");
        assert_eq!(
            normalize_links("Read [A](doc:a) then [B](doc:b#step-2)."),
            "Read [A](a.md) then [B](b.md#step-2)."
        );
    }

    #[test]
    fn test_links_with_extension_are_unchanged() {
        assert_eq!(normalize_links("[text](image.png)"), "[text](image.png)");
        assert_eq!(normalize_links("![Chart](chart.png)"), "![Chart](chart.png)");
        assert_eq!(normalize_links("[Guide](docs/guide.md#top)"), "[Guide](docs/guide.md#top)");
    }

    #[test]
    fn test_absolute_urls_are_unchanged() {
        for link in [
            "[a](https://example.com/docs/page)",
            "[a](http://example.com)",
            "[a](https://example.com/page#frag)",
        ] {
            assert_eq!(normalize_links(link), link);
        }
    }

    #[test]
    fn test_relative_paths_use_last_segment() {
        assert_eq!(normalize_target("guides/intro"), "guides/intro.md");
        assert_eq!(normalize_target("v1.2/intro"), "v1.2/intro.md");
        assert_eq!(normalize_target("intro#a#b"), "intro.md#a#b");
    }

    #[test]
    fn test_anchor_only_targets() {
        // Empty base has no extension, so it gets the suffix too
        assert_eq!(normalize_target("#section"), ".md#section");
    }

    #[test]
    fn test_other_schemes_are_treated_as_paths() {
        assert_eq!(normalize_target("mailto:team@example.com"), "mailto:team@example.com");
        assert_eq!(normalize_target("ref:get-user"), "ref:get-user.md");
    }

    #[test]
    fn test_reference_style_and_bare_text_untouched() {
        let text = "See [the guide][guide] or visit https://example.com.\n\n[guide]: doc:intro";
        assert_eq!(normalize_links(text), text);
    }

    proptest! {
        #[test]
        fn test_text_without_links_is_identity(text in "[^\\[\\]()]{0,200}") {
            prop_assert_eq!(normalize_links(&text), text.as_str());
        }

        #[test]
        fn test_doc_slug_always_gets_md(slug in "[a-z0-9-]{1,40}", frag in "[a-z0-9-]{0,20}") {
            let input = if frag.is_empty() {
                format!("[x](doc:{slug})")
            } else {
                format!("[x](doc:{slug}#{frag})")
            };
            let expected = if frag.is_empty() {
                format!("[x]({slug}.md)")
            } else {
                format!("[x]({slug}.md#{frag})")
            };
            prop_assert_eq!(normalize_links(&input), expected.as_str());
        }
    }
}
