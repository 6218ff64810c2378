//! Link resolution and form bodies.
//!
//! [URL Standard](https://url.spec.whatwg.org/)

use url::Url;
use url::form_urlencoded::byte_serialize;

/// Resolve `href` against the document URL.
///
/// Absolute references are returned as-is; relative ones (`/path`,
/// `path`, `../path`, `//host/path`) are joined onto `base`. Returns
/// `None` when the result is not a valid URL.
#[must_use]
pub fn resolve(href: &str, base: Option<&Url>) -> Option<Url> {
    match base {
        Some(base) => base.join(href.trim()).ok(),
        None => Url::parse(href.trim()).ok(),
    }
}

/// Turn a command-line argument into a URL.
///
/// Anything that already parses as an absolute URL is kept; other strings
/// are treated as filesystem paths and become `file://` URLs.
#[must_use]
pub fn from_user_input(input: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(input) {
        return Some(url);
    }
    let path = std::path::Path::new(input);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Url::from_file_path(absolute).ok()
}

/// Encode form fields as a `name=value&...` body.
///
/// Both the name and the value of every field are percent-encoded
/// (`application/x-www-form-urlencoded` serialization).
#[must_use]
pub fn encode_form<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .map(|(name, value)| {
            let name: String = byte_serialize(name.as_bytes()).collect();
            let value: String = byte_serialize(value.as_bytes()).collect();
            format!("{name}={value}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let base = Url::parse("http://example.org/dir/page.html").unwrap();
        let url = resolve("style.css", Some(&base)).unwrap();
        assert_eq!(url.as_str(), "http://example.org/dir/style.css");
    }

    #[test]
    fn test_resolve_absolute_path_and_parent() {
        let base = Url::parse("http://example.org/dir/sub/page.html").unwrap();
        assert_eq!(
            resolve("/top.js", Some(&base)).unwrap().as_str(),
            "http://example.org/top.js"
        );
        assert_eq!(
            resolve("../up.css", Some(&base)).unwrap().as_str(),
            "http://example.org/dir/up.css"
        );
    }

    #[test]
    fn test_resolve_absolute_url_ignores_base() {
        let base = Url::parse("http://example.org/").unwrap();
        let url = resolve("https://other.net/x", Some(&base)).unwrap();
        assert_eq!(url.as_str(), "https://other.net/x");
    }

    #[test]
    fn test_resolve_without_base_requires_absolute() {
        assert!(resolve("page.html", None).is_none());
        assert!(resolve("http://a.b/", None).is_some());
    }

    #[test]
    fn test_encode_form_percent_encodes_both_sides() {
        let body = encode_form([("first name", "Ann & Bo"), ("q", "a=b")]);
        assert_eq!(body, "first+name=Ann+%26+Bo&q=a%3Db");
    }

    #[test]
    fn test_encode_form_empty() {
        assert_eq!(encode_form([]), "");
    }

    #[test]
    fn test_from_user_input_keeps_urls() {
        let url = from_user_input("http://localhost:8000/").unwrap();
        assert_eq!(url.scheme(), "http");
    }
}
