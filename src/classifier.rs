//! Book vs. generic product page classification.
//!
//! A page is a book page when its URL is a product-detail path and at least
//! one book signal is present in the DOM. Signals are checked in a fixed
//! order and the first hit decides; there is no scoring.

use serde::Serialize;
use url::Url;

use dom_query::Document;

use crate::cascade::{self, Step};
use crate::dom;
use crate::error::Result;
use crate::patterns;

/// Kind of product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageClassification {
    Book,
    Generic,
}

/// Classify `doc`, loaded from `page_url`.
///
/// `page_url` may be absolute or a bare path. Anything that is not a
/// product-detail path is `Generic` without looking at the DOM.
#[must_use]
pub fn classify(doc: &Document, page_url: &str) -> PageClassification {
    let Some(path) = url_path(page_url) else {
        return PageClassification::Generic;
    };
    if !patterns::PRODUCT_PATH.is_match(&path) {
        log::debug!("classifier: {path} is not a product page");
        return PageClassification::Generic;
    }

    let signals = [
        Step::new("breadcrumbs", breadcrumbs),
        Step::new("sub-nav", sub_nav),
        Step::new("books-nav-button", books_nav_button),
        Step::new("isbn", isbn),
        Step::new("publisher", publisher),
    ];
    if cascade::first_hit(doc, &signals).is_some() {
        PageClassification::Book
    } else {
        PageClassification::Generic
    }
}

fn url_path(page_url: &str) -> Option<String> {
    match Url::parse(page_url) {
        Ok(url) => Some(url.path().to_string()),
        Err(_) if page_url.starts_with('/') => Some(page_url.to_string()),
        Err(err) => {
            log::debug!("classifier: unusable page url {page_url:?}: {err}");
            None
        }
    }
}

fn mentions_books(doc: &Document, selector: &str) -> Result<Option<()>> {
    let found = dom::query_first(&dom::root(doc), selector)?;
    Ok(found
        .filter(|el| dom::text_content(el).to_lowercase().contains("books"))
        .map(|_| ()))
}

fn breadcrumbs(doc: &Document) -> Result<Option<()>> {
    mentions_books(doc, patterns::BREADCRUMBS)
}

fn sub_nav(doc: &Document) -> Result<Option<()>> {
    mentions_books(doc, patterns::SUB_NAV)
}

fn books_nav_button(doc: &Document) -> Result<Option<()>> {
    Ok(dom::query_first(&dom::root(doc), patterns::BOOKS_NAV_BUTTON)?.map(|_| ()))
}

fn any_cell_contains(doc: &Document, needle: &str) -> Result<bool> {
    let cells = dom::query(&dom::root(doc), patterns::TABLE_CELLS)?;
    Ok(dom::each(&cells)
        .iter()
        .any(|cell| dom::text_content(cell).contains(needle)))
}

fn isbn(doc: &Document) -> Result<Option<()>> {
    let body = dom::text_content(&dom::body(doc));
    let found = body.contains("ISBN-10") || body.contains("ISBN-13") || any_cell_contains(doc, "ISBN")?;
    Ok(found.then_some(()))
}

fn publisher(doc: &Document) -> Result<Option<()>> {
    let found = any_cell_contains(doc, "Publisher")?
        || patterns::PUBLISHER_LINE.is_match(&dom::text_content(&dom::body(doc)));
    Ok(found.then_some(()))
}
