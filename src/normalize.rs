//! Field normalization: raw item text → typed [`BookRecord`]
//!
//! | Raw field | Rule | Typed field |
//! |-----------|------|-------------|
//! | rating word | `One`..`Five` → 1..5 | `review_rating: u8` |
//! | prices | strip `£`, parse float | `price_*: f64` |
//! | availability | `In stock (N available)` → N | `number_available: u32` |
//! | `universal_product_code (upc)` | renamed, value unchanged | `universal_product_code` |
//! | image reference | resolved against the page URL | `image_url: Option<String>` |
//!
//! Normalization is all-or-nothing: the first field that does not match its
//! shape fails the record with a [`NormalizationError`] naming the field and
//! the raw value.

use crate::extract::Field;
use crate::records::{BookRecord, RawItemRecord, NO_IMAGE};
use crate::url::resolve_image;
use crate::NormalizationError;
use url::Url;

/// Rating vocabulary, index + 1 is the numeric rating
pub const RATING_WORDS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

const CURRENCY_GLYPH: char = '£';
const STOCK_PREFIX: &str = "In stock (";
const STOCK_SUFFIX: &str = " available)";

/// Converts a raw record into a typed record
///
/// `page_url` is the item page the record was extracted from; it becomes
/// `product_page_url` and anchors the image reference.
pub fn normalize(raw: &RawItemRecord, page_url: &Url) -> Result<BookRecord, NormalizationError> {
    let review_rating = parse_rating(&raw.rating_word)?;
    let price_including_tax = parse_price(Field::PriceIncludingTax, &raw.price_including_tax)?;
    let price_excluding_tax = parse_price(Field::PriceExcludingTax, &raw.price_excluding_tax)?;
    let number_available = parse_availability(&raw.availability)?;

    let image_url = if raw.image_reference == NO_IMAGE {
        None
    } else {
        let url = resolve_image(page_url, &raw.image_reference)
            .map_err(|_| NormalizationError::new(Field::ImageReference, &raw.image_reference))?;
        Some(url.to_string())
    };

    Ok(BookRecord {
        product_page_url: page_url.to_string(),
        universal_product_code: raw.upc.clone(),
        title: raw.title.clone(),
        price_including_tax,
        price_excluding_tax,
        number_available,
        product_description: raw.description.clone(),
        category: raw.category.clone(),
        review_rating,
        image_url,
    })
}

/// Maps a rating word to 1..=5
pub fn parse_rating(word: &str) -> Result<u8, NormalizationError> {
    RATING_WORDS
        .iter()
        .position(|w| *w == word.trim())
        .map(|i| i as u8 + 1)
        .ok_or_else(|| NormalizationError::new(Field::RatingWord, word))
}

/// Inverse of [`parse_rating`]
pub fn rating_word(rating: u8) -> Option<&'static str> {
    RATING_WORDS.get(usize::from(rating).checked_sub(1)?).copied()
}

/// Parses a price such as `£51.77`; the currency glyph is optional
pub fn parse_price(field: Field, raw: &str) -> Result<f64, NormalizationError> {
    let number = raw.trim().trim_start_matches(CURRENCY_GLYPH).trim();

    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| NormalizationError::new(field, raw))
}

/// Parses `In stock (N available)` into N
pub fn parse_availability(raw: &str) -> Result<u32, NormalizationError> {
    raw.trim()
        .strip_prefix(STOCK_PREFIX)
        .and_then(|rest| rest.strip_suffix(STOCK_SUFFIX))
        .filter(|count| count.chars().all(|c| c.is_ascii_digit()))
        .and_then(|count| count.parse::<u32>().ok())
        .ok_or_else(|| NormalizationError::new(Field::Availability, raw))
}
