//! The fetch collaborator.
//!
//! A [`Fetcher`] turns a URL (plus an optional form payload) into a
//! response body. Fetching is synchronous: the render pipeline blocks until
//! the body arrives or the fetch fails.
//!
//! Responses that declare a `transfer-encoding` or `content-encoding` are
//! rejected rather than decoded.
//!
//! TODO: Implement proper Fetch Standard (<https://fetch.spec.whatwg.org/>)

use std::time::Duration;

use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, TRANSFER_ENCODING};
use thiserror::Error;
use url::Url;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("sprig/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Why a fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL's scheme is neither `http`, `https`, nor `file`.
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    /// The HTTP client could not be built or the request failed in transit.
    #[error("request to {url} failed: {source}")]
    Request {
        /// The URL being fetched.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The response declared an encoding this renderer does not decode.
    #[error("response declares unsupported {header}")]
    DisallowedEncoding {
        /// The offending header name.
        header: &'static str,
    },

    /// Reading a `file://` URL failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Filesystem path derived from the URL.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Something that can fetch the body behind a URL.
///
/// When `payload` is present the request carries it as a form body
/// (`POST`); otherwise it is a plain `GET`.
pub trait Fetcher {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the resource cannot be retrieved or
    /// the response uses a disallowed encoding.
    fn fetch(&self, url: &Url, payload: Option<&str>) -> Result<String, FetchError>;
}

/// Blocking fetcher for `http`, `https`, and `file` URLs.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the default timeout and user agent.
    ///
    /// Cookies set by a server are kept for the fetcher's lifetime and sent
    /// back on later requests.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] if the HTTP client cannot be created.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_builder(client_builder())
    }

    fn with_builder(builder: reqwest::blocking::ClientBuilder) -> Result<Self, FetchError> {
        let client = builder.build().map_err(|source| FetchError::Request {
            url: String::new(),
            source,
        })?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &Url, payload: Option<&str>) -> Result<String, FetchError> {
        let request = match payload {
            Some(body) => self
                .client
                .post(url.clone())
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string()),
            None => self.client.get(url.clone()),
        };

        let response = request.send().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        // Error statuses still carry a page to render.
        if !response.status().is_success() {
            log::debug!("{url} answered with HTTP {}", response.status());
        }
        check_encodings(response.headers())?;

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url, payload: Option<&str>) -> Result<String, FetchError> {
        log::debug!("fetching {url}");
        match url.scheme() {
            "http" | "https" => self.fetch_http(url, payload),
            "file" => read_file(url),
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

fn client_builder() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .cookie_store(true)
}

/// Reject responses whose bytes would need decoding before use.
///
/// # Errors
///
/// Returns [`FetchError::DisallowedEncoding`] naming the first offending
/// header.
pub fn check_encodings(headers: &HeaderMap) -> Result<(), FetchError> {
    if headers.contains_key(TRANSFER_ENCODING) {
        return Err(FetchError::DisallowedEncoding {
            header: "transfer-encoding",
        });
    }
    if headers.contains_key(CONTENT_ENCODING) {
        return Err(FetchError::DisallowedEncoding {
            header: "content-encoding",
        });
    }
    Ok(())
}

fn read_file(url: &Url) -> Result<String, FetchError> {
    let path = url
        .to_file_path()
        .map_err(|()| FetchError::UnsupportedScheme(url.to_string()))?;
    std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use super::*;
    use reqwest::header::HeaderValue;

    /// A fetcher that ignores proxy settings, for talking to a local server.
    fn local_fetcher() -> HttpFetcher {
        HttpFetcher::with_builder(client_builder().no_proxy()).unwrap()
    }

    fn response(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n{headers}\r\n{body}",
            body.len()
        )
    }

    /// Answer one connection per response, in order, returning the request
    /// heads that were received.
    fn serve(responses: Vec<String>) -> (Url, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let server = thread::spawn(move || {
            responses
                .iter()
                .map(|response| {
                    let (mut stream, _) = listener.accept().unwrap();
                    let head = read_head(&mut stream);
                    stream.write_all(response.as_bytes()).unwrap();
                    head
                })
                .collect()
        });
        (url, server)
    }

    fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut byte = [0u8; 1];
        while !head.ends_with(b"\r\n\r\n") {
            if stream.read(&mut byte).unwrap() == 0 {
                break;
            }
            head.push(byte[0]);
        }
        String::from_utf8_lossy(&head).to_ascii_lowercase()
    }

    #[test]
    fn test_plain_response_is_accepted() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert!(check_encodings(&headers).is_ok());
    }

    #[test]
    fn test_content_encoding_is_rejected() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        let err = check_encodings(&headers).unwrap_err();
        assert!(matches!(
            err,
            FetchError::DisallowedEncoding {
                header: "content-encoding"
            }
        ));
    }

    #[test]
    fn test_transfer_encoding_is_rejected() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        assert!(check_encodings(&headers).is_err());
    }

    #[test]
    fn test_unsupported_scheme() {
        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse("ftp://example.org/file").unwrap();
        assert!(matches!(
            fetcher.fetch(&url, None),
            Err(FetchError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_file_url_is_read() {
        let dir = std::env::temp_dir().join("sprig-net-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("page.html");
        std::fs::write(&path, "<p>hello</p>").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::from_file_path(&path).unwrap();
        assert_eq!(fetcher.fetch(&url, None).unwrap(), "<p>hello</p>");
    }

    #[test]
    fn test_error_status_still_returns_body() {
        let (url, server) = serve(vec![response(
            "401 Unauthorized",
            "",
            "<h1>Invalid password</h1>",
        )]);
        let body = local_fetcher().fetch(&url, None).unwrap();
        assert_eq!(body, "<h1>Invalid password</h1>");
        let _ = server.join().unwrap();
    }

    #[test]
    fn test_cookies_are_sent_back() {
        let (url, server) = serve(vec![
            response("200 OK", "Set-Cookie: token=abc\r\n", "<p>hi</p>"),
            response("200 OK", "", "<p>again</p>"),
        ]);
        let fetcher = local_fetcher();
        assert_eq!(fetcher.fetch(&url, None).unwrap(), "<p>hi</p>");
        let next = url.join("add").unwrap();
        assert_eq!(fetcher.fetch(&next, None).unwrap(), "<p>again</p>");

        let heads = server.join().unwrap();
        assert!(!heads[0].contains("cookie:"));
        assert!(heads[1].contains("cookie: token=abc"));
    }

    #[test]
    fn test_encoded_response_is_rejected() {
        let (url, server) = serve(vec![response("200 OK", "Content-Encoding: gzip\r\n", "x")]);
        assert!(matches!(
            local_fetcher().fetch(&url, None),
            Err(FetchError::DisallowedEncoding { .. })
        ));
        let _ = server.join().unwrap();
    }
}
