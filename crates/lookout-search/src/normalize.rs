//! Provider image normalization.
//!
//! Providers return images either as bare URL strings or as
//! `{url, description}` objects depending on the request flags. Records that
//! don't fit the expected shape are dropped, not reported.

use serde_json::Value;

use crate::types::SearchResultImage;

/// Replace every run of whitespace in a URL with `%20`.
///
/// Whitespace is the ECMAScript `\s` class (see [`is_url_whitespace`]). The
/// output never contains it, so applying this twice is the same as applying
/// it once.
pub fn sanitize_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut in_whitespace = false;
    for c in url.chars() {
        if is_url_whitespace(c) {
            if !in_whitespace {
                out.push_str("%20");
                in_whitespace = true;
            }
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

/// Whether `c` belongs to the ECMAScript `\s` class.
///
/// Unicode `White_Space` plus U+FEFF (byte order mark), minus U+0085 (next line).
pub fn is_url_whitespace(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        c => c.is_whitespace(),
    }
}

/// Normalize raw provider image records.
///
/// With `include_descriptions`, only objects carrying a string `url` and a
/// non-empty string `description` survive. Without it, each record yields a
/// bare image from either a URL string or an object's `url` field.
/// Order is preserved.
pub fn normalize_images(raw: Vec<Value>, include_descriptions: bool) -> Vec<SearchResultImage> {
    raw.into_iter()
        .filter_map(|value| normalize_image(value, include_descriptions))
        .collect()
}

fn normalize_image(value: Value, include_descriptions: bool) -> Option<SearchResultImage> {
    if include_descriptions {
        let url = value.get("url")?.as_str()?;
        let description = value.get("description")?.as_str()?;
        if description.is_empty() {
            return None;
        }
        return Some(SearchResultImage::Annotated {
            url: sanitize_url(url),
            description: description.to_string(),
        });
    }

    let url = match &value {
        Value::String(url) => url.as_str(),
        Value::Object(obj) => obj.get("url")?.as_str()?,
        _ => return None,
    };
    Some(SearchResultImage::Bare {
        url: sanitize_url(url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_replaces_whitespace_runs() {
        assert_eq!(sanitize_url("http://a.com/x y.png"), "http://a.com/x%20y.png");
        assert_eq!(sanitize_url("http://a.com/x \t\n y.png"), "http://a.com/x%20y.png");
        assert_eq!(sanitize_url(" lead"), "%20lead");
        assert_eq!(sanitize_url("http://a.com/clean.png"), "http://a.com/clean.png");
        assert_eq!(sanitize_url(""), "");
    }

    #[test]
    fn test_sanitize_uses_ecmascript_whitespace() {
        assert_eq!(sanitize_url("a\u{FEFF}b"), "a%20b");
        assert_eq!(sanitize_url("a\u{00A0}\u{2028}\u{3000}b"), "a%20b");
        assert_eq!(sanitize_url("a\u{0085}b"), "a\u{0085}b");
        assert_eq!(sanitize_url("a\u{200B}b"), "a\u{200B}b");
    }

    #[test]
    fn test_annotated_images_drop_missing_or_empty_descriptions() {
        let raw = vec![
            json!({"url": "http://a.com/x y.png", "description": "a cat"}),
            json!({"url": "http://b.com/z.png", "description": ""}),
            json!({"url": "http://c.com/w.png"}),
            json!({"url": "http://d.com/v.png", "description": null}),
            json!("http://e.com/bare.png"),
            json!(42),
        ];
        let images = normalize_images(raw, true);
        assert_eq!(
            images,
            vec![SearchResultImage::Annotated {
                url: "http://a.com/x%20y.png".to_string(),
                description: "a cat".to_string(),
            }]
        );
    }

    #[test]
    fn test_bare_images_are_wrapped_and_sanitized() {
        let raw = vec![
            json!("http://a.com/x y.png"),
            json!("http://b.com/z.png"),
            json!({"url": "http://c.com/w.png", "description": "ignored"}),
            json!(null),
        ];
        let images = normalize_images(raw, false);
        assert_eq!(
            images,
            vec![
                SearchResultImage::Bare {
                    url: "http://a.com/x%20y.png".to_string()
                },
                SearchResultImage::Bare {
                    url: "http://b.com/z.png".to_string()
                },
                SearchResultImage::Bare {
                    url: "http://c.com/w.png".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = vec![
            json!({"url": "http://1.com", "description": "one"}),
            json!({"url": "http://2.com", "description": ""}),
            json!({"url": "http://3.com", "description": "three"}),
        ];
        let urls: Vec<String> = normalize_images(raw, true)
            .iter()
            .map(|i| i.url().to_string())
            .collect();
        assert_eq!(urls, vec!["http://1.com", "http://3.com"]);
    }
}

/// Property-based tests for URL sanitization.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: sanitizing twice equals sanitizing once.
        #[test]
        fn sanitize_is_idempotent(url in "\\PC*[ \t\n]*\\PC*") {
            let once = sanitize_url(&url);
            prop_assert_eq!(sanitize_url(&once), once);
        }

        /// Property: sanitized output never contains whitespace.
        #[test]
        fn sanitize_removes_all_whitespace(url in any::<String>()) {
            let sanitized = sanitize_url(&url);
            prop_assert!(!sanitized.chars().any(is_url_whitespace));
        }

        /// Property: valid annotated records always survive with their description intact.
        #[test]
        fn annotated_records_keep_description(
            url in "[a-z:/. ]{1,40}",
            description in "[a-zA-Z ]{1,40}",
        ) {
            let raw = vec![serde_json::json!({"url": &url, "description": &description})];
            let expected_url = sanitize_url(&url);
            let images = normalize_images(raw, true);
            prop_assert_eq!(images.len(), 1);
            prop_assert_eq!(images[0].description(), Some(description.as_str()));
            prop_assert_eq!(images[0].url(), expected_url.as_str());
        }
    }
}
