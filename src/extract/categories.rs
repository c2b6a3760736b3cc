use crate::extract::selector::{compile, element_text};
use crate::extract::Field;
use crate::records::CategoryIndex;
use crate::url::resolve_link;
use crate::ExtractionError;
use scraper::Html;
use url::Url;

const CATEGORY_LINK_CSS: &str = "div.side_categories a";

/// Builds the category index from the landing page's side navigation
///
/// The first anchor is the umbrella "Books" entry and is skipped. Hrefs
/// are resolved against `base`; anchors without a usable href or with an
/// empty name are ignored.
pub fn extract_categories(document: &Html, base: &Url) -> Result<CategoryIndex, ExtractionError> {
    let selector = compile(Field::CategoryLink, CATEGORY_LINK_CSS)?;

    let mut index = CategoryIndex::new();
    for anchor in document.select(&selector).skip(1) {
        let name = element_text(anchor);
        if name.is_empty() {
            continue;
        }

        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_link(base, href))
        else {
            tracing::debug!("Category '{}' has no usable link", name);
            continue;
        };

        if !index.insert(name.clone(), url) {
            tracing::debug!("Duplicate category '{}' ignored", name);
        }
    }

    Ok(index)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Landing page with the side category navigation
    pub(crate) fn landing_page(categories: &[(&str, &str)]) -> String {
        let items: String = categories
            .iter()
            .map(|(name, href)| {
                format!("<li>\n<a href=\"{href}\">\n    {name}\n</a>\n</li>")
            })
            .collect();

        format!(
            r#"<html><body><div class="side_categories"><ul class="nav nav-list"><li>
                <a href="catalogue/category/books_1/index.html">Books</a>
                <ul>{items}</ul>
            </li></ul></div></body></html>"#
        )
    }

    #[test]
    fn test_extract_categories_skips_umbrella_entry() {
        let base = Url::parse("https://books.toscrape.com/").unwrap();
        let doc = Html::parse_document(&landing_page(&[
            ("Travel", "catalogue/category/books/travel_2/index.html"),
            ("Mystery", "catalogue/category/books/mystery_3/index.html"),
        ]));

        let index = extract_categories(&doc, &base).unwrap();

        assert_eq!(index.len(), 2);
        let names: Vec<&str> = index.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Travel", "Mystery"]);
        assert_eq!(
            index.get("Mystery").unwrap().url.as_str(),
            "https://books.toscrape.com/catalogue/category/books/mystery_3/index.html"
        );
        assert!(index.get("Books").is_none());
    }

    #[test]
    fn test_extract_categories_without_navigation() {
        let base = Url::parse("https://books.toscrape.com/").unwrap();
        let doc = Html::parse_document("<html><body></body></html>");

        let index = extract_categories(&doc, &base).unwrap();
        assert!(index.is_empty());
    }
}
