use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a "next" pagination href to an absolute URL
///
/// The catalog emits two link shapes:
///
/// | Shape | Example | Resolved against |
/// |-------|---------|------------------|
/// | Root-relative | `/catalogue/page-2.html` | the site base URL |
/// | Same-directory | `page-2.html` | the directory of the current page |
///
/// Root-relative links keep the base URL's path prefix, so a base of
/// `https://host/shop/` turns `/catalogue/page-2.html` into
/// `https://host/shop/catalogue/page-2.html`.
///
/// # Examples
///
/// ```
/// use book_scout::url::resolve_next_page;
/// use url::Url;
///
/// let base = Url::parse("https://books.toscrape.com/").unwrap();
/// let current = Url::parse(
///     "https://books.toscrape.com/catalogue/category/books/mystery_3/page-2.html",
/// ).unwrap();
///
/// let next = resolve_next_page(&current, "page-3.html", &base).unwrap();
/// assert_eq!(
///     next.as_str(),
///     "https://books.toscrape.com/catalogue/category/books/mystery_3/page-3.html"
/// );
/// ```
pub fn resolve_next_page(current: &Url, href: &str, base: &Url) -> UrlResult<Url> {
    let href = href.trim();

    let resolved = match href.strip_prefix('/') {
        Some(rooted) => join(base, rooted.trim_start_matches('/')),
        None => join(current, href),
    }?;

    Ok(strip_fragment(resolved))
}

/// Resolves a link found on `page` to an absolute http(s) URL
///
/// Returns None for links that should not be followed:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: and data: schemes
/// - anything that does not resolve to http or https
pub fn resolve_link(page: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = page.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(strip_fragment(absolute)),
        _ => None,
    }
}

/// Resolves a gallery image `src` (e.g. `../../media/cache/ab/cd.jpg`)
/// against the item page it was found on
pub fn resolve_image(page: &Url, reference: &str) -> UrlResult<Url> {
    join(page, reference.trim())
}

/// Parses the configured site base URL
///
/// Only http and https are accepted. A missing trailing slash is added so
/// relative joins land below the base path rather than beside it.
pub fn parse_base_url(raw: &str) -> UrlResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);

    Ok(strip_fragment(url))
}

/// File-name slug for a category: lowercase, spaces become underscores
///
/// ```
/// use book_scout::url::category_slug;
///
/// assert_eq!(category_slug("Historical Fiction"), "historical_fiction");
/// ```
pub fn category_slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

fn join(base: &Url, href: &str) -> UrlResult<Url> {
    base.join(href).map_err(|e| UrlError::Resolve {
        base: base.to_string(),
        href: href.to_string(),
        message: e.to_string(),
    })
}

fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://books.toscrape.com/";
    const CATEGORY: &str = "https://books.toscrape.com/catalogue/category/books/mystery_3/index.html";

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_directory_next_link() {
        let next = resolve_next_page(&url(CATEGORY), "page-2.html", &url(BASE)).unwrap();
        assert_eq!(
            next.as_str(),
            "https://books.toscrape.com/catalogue/category/books/mystery_3/page-2.html"
        );
    }

    #[test]
    fn test_same_directory_resolves_against_current_page_not_category_root() {
        let current = url("https://books.toscrape.com/catalogue/category/books/mystery_3/more/page-2.html");
        let next = resolve_next_page(&current, "page-3.html", &url(BASE)).unwrap();
        assert_eq!(
            next.as_str(),
            "https://books.toscrape.com/catalogue/category/books/mystery_3/more/page-3.html"
        );
    }

    #[test]
    fn test_root_relative_next_link() {
        let next =
            resolve_next_page(&url(CATEGORY), "/catalogue/page-2.html", &url(BASE)).unwrap();
        assert_eq!(next.as_str(), "https://books.toscrape.com/catalogue/page-2.html");
    }

    #[test]
    fn test_root_relative_keeps_base_path_prefix() {
        let base = url("https://example.com/shop/");
        let current = url("https://example.com/shop/catalogue/index.html");
        let next = resolve_next_page(&current, "/catalogue/page-2.html", &base).unwrap();
        assert_eq!(next.as_str(), "https://example.com/shop/catalogue/page-2.html");
    }

    #[test]
    fn test_item_link_matches_catalogue_path() {
        let item = resolve_link(
            &url("https://books.toscrape.com/catalogue/category/books/mystery_3/page-2.html"),
            "../../../the-past-never-ends_942/index.html",
        )
        .unwrap();
        assert_eq!(
            item.as_str(),
            "https://books.toscrape.com/catalogue/the-past-never-ends_942/index.html"
        );
    }

    #[test]
    fn test_resolve_link_skips_special_schemes() {
        let page = url(CATEGORY);
        assert!(resolve_link(&page, "javascript:void(0)").is_none());
        assert!(resolve_link(&page, "mailto:someone@example.com").is_none());
        assert!(resolve_link(&page, "#top").is_none());
        assert!(resolve_link(&page, "   ").is_none());
    }

    #[test]
    fn test_resolve_image_from_item_page() {
        let page = url("https://books.toscrape.com/catalogue/ready-player-one_209/index.html");
        let image = resolve_image(&page, "../../media/cache/b5/ab/b5ab.jpg").unwrap();
        assert_eq!(
            image.as_str(),
            "https://books.toscrape.com/media/cache/b5/ab/b5ab.jpg"
        );
    }

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let base = parse_base_url("https://example.com/shop").unwrap();
        assert_eq!(base.as_str(), "https://example.com/shop/");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(parse_base_url("not a url"), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Sequential Art"), "sequential_art");
        assert_eq!(category_slug("Add a comment"), "add_a_comment");
        assert_eq!(category_slug("Health/Fitness"), "health-fitness");
    }
}
