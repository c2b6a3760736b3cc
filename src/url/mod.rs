//! URL handling module for Book-Scout
//!
//! The catalog links pages together with relative hrefs of a few fixed
//! shapes. Everything here uses standard URL joining (RFC 3986) from the
//! `url` crate; the shapes the site emits are covered by tests in `resolve`.

mod resolve;

pub use resolve::{
    category_slug, parse_base_url, resolve_image, resolve_link, resolve_next_page,
};
