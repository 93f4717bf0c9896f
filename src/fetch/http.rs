// src/fetch/http.rs
// =============================================================================
// The HTTP-fetch primitive shared by the search and detail stages.
//
// Key functionality:
// - Issues a single GET with a fixed browser-like User-Agent
// - Classifies failures into Timeout / NetworkFailure / UnexpectedStatus
// - Never retries: one failed fetch is final for that URL
// - Decodes bodies using the charset the server declared (Content-Type
//   header first, then a <meta> charset in the page, then UTF-8)
//
// The Transport trait is the seam between the pipeline and the network.
// Production code uses ReqwestTransport; tests plug in fakes that count
// calls or serve fixtures.
//
// Rust concepts:
// - Traits: Transport describes "something that can GET a URL"
// - async-trait: lets a trait have async methods usable as `dyn Transport`
// - Result<T, E>: every failure mode is a FetchError value, never a panic
// =============================================================================

use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::error::FetchError;

/// Fixed desktop-browser identity sent with every request.
/// The registry serves the same markup to this agent that it shows users.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// How far into the body we look for a <meta> charset declaration.
// HTML requires the declaration to sit within the first 1024 bytes.
const META_SNIFF_BYTES: usize = 1024;

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    /// Raw body bytes, exactly as received
    pub body: Bytes,
    /// Charset label from the Content-Type header, if the server sent one
    pub charset: Option<String>,
}

impl FetchResponse {
    // A 200 response with no declared charset (handy for fakes and tests)
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            charset: None,
        }
    }

    // Body decoded as text.
    //
    // The encoding is chosen in this order:
    //   1. charset from the Content-Type header
    //   2. charset declared by a <meta> tag near the top of the page
    //   3. UTF-8
    // A byte-order mark, when present, wins over all of these.
    // Bytes that are invalid in the chosen encoding become U+FFFD.
    pub fn text(&self) -> String {
        let encoding = self
            .charset
            .as_deref()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .or_else(|| sniff_meta_charset(&self.body))
            .unwrap_or(UTF_8);

        // decode() returns (text, encoding actually used, had_errors);
        // we only need the text
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }
}

/// Outcome of one fetch. Non-success statuses arrive as
/// `Err(FetchError::UnexpectedStatus(..))`, never as a panic or abort.
pub type FetchResult = Result<FetchResponse, FetchError>;

// Anything that can fetch a URL for us.
//
// `Send + Sync` means one transport can be shared (behind an Arc) by every
// in-flight detail page fetch.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> FetchResult;
}

// The real network transport.
//
// One Client is built up front and reused for every request so that
// connections to the registry are pooled across detail pages.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT) // sent as the User-Agent header on every request
            .redirect(reqwest::redirect::Policy::limited(5)) // follow up to 5 redirects
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> FetchResult {
        // .timeout() applies to this request only, overriding the client
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        // Any non-2xx status is reported, not followed up on
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        // Grab the charset before .bytes() consumes the response
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);

        // The timeout also covers reading the body, so a stalled body
        // still shows up as Timeout here.
        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
            charset,
        })
    }
}

// Maps a reqwest error onto our two transport failure kinds.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkFailure(error.to_string())
    }
}

// Extracts the charset parameter from a Content-Type header value.
//
// Example:
//   "text/html; charset=windows-1252" -> Some("windows-1252")
//   "text/html"                       -> None
fn charset_from_content_type(value: &str) -> Option<String> {
    let parsed: mime::Mime = value.parse().ok()?;
    parsed
        .get_param(mime::CHARSET)
        .map(|charset| charset.as_str().trim_matches('"').to_ascii_lowercase())
}

// Looks for `charset=` in the first bytes of the page. This covers both
// <meta charset="..."> and <meta http-equiv="Content-Type" content="...; charset=...">.
fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();

    Encoding::for_label(label.as_bytes())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Transport trait instead of calling reqwest directly?
//    - The Fetcher only needs "GET this URL", so it holds an Arc<dyn Transport>
//    - Tests swap in fakes that serve fixtures and count calls
//
// 2. What does #[async_trait] do?
//    - Plain traits with async fns can't be used as `dyn Trait` objects
//    - The macro rewrites them to return boxed futures, which can
//
// 3. What is Bytes?
//    - A reference-counted byte buffer: .clone() shares it, no copy
//    - The cache hands the same body to everyone who asks for a URL
//
// 4. Why keep the body as bytes and decode later?
//    - Pages are not always UTF-8; the charset comes from the headers or
//      the page itself, so text() decides once both are known
//    - encoding_rs does the actual decoding (it is what reqwest uses too)
//
// 5. What does map_err(categorize_error)? do?
//    - map_err converts reqwest::Error into our FetchError
//    - `?` then returns it early if the request failed
// -----------------------------------------------------------------------------
