use crate::extract::selector::{compile, element_text, FieldSelector, Read, Requirement};
use crate::extract::Field;
use crate::records::{RawItemRecord, NO_DESCRIPTION, NO_IMAGE};
use crate::ExtractionError;
use scraper::Html;
use std::collections::HashMap;

pub const TITLE: FieldSelector = FieldSelector {
    field: Field::Title,
    css: "div.product_main h1",
    nth: 0,
    read: Read::Text,
    requirement: Requirement::Required,
};

/// Third breadcrumb anchor: Home / Books / <category>
pub const CATEGORY: FieldSelector = FieldSelector {
    field: Field::Category,
    css: "ul.breadcrumb a",
    nth: 2,
    read: Read::Text,
    requirement: Requirement::Required,
};

pub const RATING: FieldSelector = FieldSelector {
    field: Field::RatingWord,
    css: "div.product_main p.star-rating",
    nth: 0,
    read: Read::ClassTokenExcept("star-rating"),
    requirement: Requirement::Required,
};

pub const DESCRIPTION: FieldSelector = FieldSelector {
    field: Field::Description,
    css: "div#product_description + p",
    nth: 0,
    read: Read::Text,
    requirement: Requirement::Optional {
        sentinel: NO_DESCRIPTION,
    },
};

pub const IMAGE: FieldSelector = FieldSelector {
    field: Field::ImageReference,
    css: "div.item.active img",
    nth: 0,
    read: Read::Attr("src"),
    requirement: Requirement::Optional { sentinel: NO_IMAGE },
};

/// Info table rows (header text → field), all required
pub const INFO_TABLE_ROWS: [(&str, Field); 4] = [
    ("UPC", Field::Upc),
    ("Price (incl. tax)", Field::PriceIncludingTax),
    ("Price (excl. tax)", Field::PriceExcludingTax),
    ("Availability", Field::Availability),
];

const INFO_ROW_CSS: &str = "table.table-striped tr";

/// Extracts the raw book fields from an item detail page
///
/// Title, category and rating are required; a missing description or image
/// yields [`NO_DESCRIPTION`] / [`NO_IMAGE`]. Every info table row listed in
/// [`INFO_TABLE_ROWS`] is required.
pub fn extract_detail(document: &Html) -> Result<RawItemRecord, ExtractionError> {
    let title = TITLE.extract(document)?;
    let category = CATEGORY.extract(document)?;
    let rating_word = RATING.extract(document)?;
    let description = DESCRIPTION.extract(document)?;
    let image_reference = IMAGE.extract(document)?;

    let mut table = info_table(document)?;
    let mut take = |field: Field| -> Result<String, ExtractionError> {
        let header = INFO_TABLE_ROWS
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(header, _)| *header)
            .unwrap_or_default();
        table
            .remove(header)
            .ok_or(ExtractionError::MissingField { field })
    };

    Ok(RawItemRecord {
        upc: take(Field::Upc)?,
        price_including_tax: take(Field::PriceIncludingTax)?,
        price_excluding_tax: take(Field::PriceExcludingTax)?,
        availability: take(Field::Availability)?,
        title,
        category,
        description,
        rating_word,
        image_reference,
    })
}

/// Collects the product information table as header → value
fn info_table(document: &Html) -> Result<HashMap<String, String>, ExtractionError> {
    let row_selector = compile(Field::Upc, INFO_ROW_CSS)?;
    let header_selector = compile(Field::Upc, "th")?;
    let value_selector = compile(Field::Upc, "td")?;

    let mut rows = HashMap::new();
    for row in document.select(&row_selector) {
        let header = row.select(&header_selector).next().map(element_text);
        let value = row.select(&value_selector).next().map(element_text);

        if let (Some(header), Some(value)) = (header, value) {
            rows.entry(header).or_insert(value);
        }
    }

    Ok(rows)
}
