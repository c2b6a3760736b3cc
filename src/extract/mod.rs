//! Field extraction from parsed catalog pages
//!
//! Three page kinds are understood:
//! - the landing page, which lists the categories (`categories`)
//! - a category listing page, with item links and an optional "next" link (`listing`)
//! - an item detail page, with the raw book fields (`detail`)
//!
//! Extraction is pure: a parsed document goes in, values come out. No
//! network or file I/O happens here.

pub(crate) mod categories;
pub(crate) mod detail;
pub(crate) mod listing;
pub mod selector;

pub use categories::extract_categories;
pub use detail::{extract_detail, INFO_TABLE_ROWS};
pub use listing::{extract_listing, ListingPage};

use std::fmt;

/// Every field the extractor and normalizer can report on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Category,
    Description,
    RatingWord,
    ImageReference,
    Upc,
    PriceIncludingTax,
    PriceExcludingTax,
    Availability,
    ItemLink,
    NextPage,
    CategoryLink,
}

impl Field {
    /// Name used in diagnostics and as the raw record key
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Category => "category",
            Self::Description => "product_description",
            Self::RatingWord => "review_rating",
            Self::ImageReference => "image_url",
            Self::Upc => "universal_product_code (upc)",
            Self::PriceIncludingTax => "price_including_tax",
            Self::PriceExcludingTax => "price_excluding_tax",
            Self::Availability => "number_available",
            Self::ItemLink => "item_link",
            Self::NextPage => "next_page",
            Self::CategoryLink => "category_link",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
