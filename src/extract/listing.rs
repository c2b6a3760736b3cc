use crate::extract::selector::{compile, FieldSelector, Read, Requirement};
use crate::extract::Field;
use crate::url::resolve_link;
use crate::ExtractionError;
use scraper::Html;
use url::Url;

const ITEM_LINK_CSS: &str = "article.product_pod h3 a";

/// The "next" pagination control; its absence marks the last page
pub const NEXT_PAGE: FieldSelector = FieldSelector {
    field: Field::NextPage,
    css: "li.next a",
    nth: 0,
    read: Read::Attr("href"),
    requirement: Requirement::Optional { sentinel: "" },
};

/// What one category listing page yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute item URLs, in page order
    pub items: Vec<Url>,
    /// Raw href of the "next" control, if the page has one
    pub next: Option<String>,
}

/// Extracts item links and the "next" href from a category listing page
///
/// Item hrefs (`../../../slug/index.html`) are resolved against `page_url`,
/// the URL the document was fetched from. The "next" href is returned as-is;
/// resolving it is the pagination walker's job since it depends on the link
/// shape.
pub fn extract_listing(document: &Html, page_url: &Url) -> Result<ListingPage, ExtractionError> {
    let link_selector = compile(Field::ItemLink, ITEM_LINK_CSS)?;

    let mut items = Vec::new();
    for anchor in document.select(&link_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        match resolve_link(page_url, href) {
            Some(url) => items.push(url),
            None => tracing::debug!("Skipping unresolvable item link '{}' on {}", href, page_url),
        }
    }

    let next = Some(NEXT_PAGE.extract(document)?).filter(|href| !href.is_empty());

    Ok(ListingPage { items, next })
}
