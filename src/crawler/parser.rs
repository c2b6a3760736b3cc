//! Response body → HTML document

use crate::ParseError;
use scraper::Html;
use url::Url;

/// Decodes a fetched body and parses it into a queryable document
///
/// The HTML parser itself is error-tolerant, so the failures surfaced here
/// are the ones that leave nothing to query: an empty body or bytes that
/// are not UTF-8.
///
/// # Example
///
/// ```
/// use book_scout::crawler::parse_document;
/// use scraper::Selector;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/").unwrap();
/// let document = parse_document(&url, b"<html><body><h1>Hi</h1></body></html>").unwrap();
/// let heading = Selector::parse("h1").unwrap();
/// assert_eq!(document.select(&heading).count(), 1);
/// ```
pub fn parse_document(url: &Url, body: &[u8]) -> Result<Html, ParseError> {
    let text = std::str::from_utf8(body).map_err(|e| ParseError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(ParseError::Empty {
            url: url.to_string(),
        });
    }

    Ok(Html::parse_document(text))
}
