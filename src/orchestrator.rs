//! Page outcome extraction.
//!
//! [`run`] turns one product page into exactly one [`ExtractionOutcome`]:
//! book pages with a title win first, then a named manufacturer, then a bare
//! brand. A manufacturer outranks a brand because it names the owner directly,
//! while a brand still needs an owner lookup.

use dom_query::Document;
use serde::Serialize;

use crate::cascade::{self, Step};
use crate::classifier::{self, PageClassification};
use crate::dom;
use crate::error::Result;
use crate::field::{self, capture, FieldLabel};
use crate::patterns;

/// Brand shown when a manufacturer is known but the brand is not.
pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// What a page says about who makes or publishes the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Book {
        title: String,
        publisher: Option<String>,
    },
    ManufacturerProduct {
        brand: String,
        manufacturer: String,
    },
    BrandOnly {
        brand: String,
    },
    NotFound,
}

impl ExtractionOutcome {
    /// Brand that still needs an owner lookup, if any.
    #[must_use]
    pub fn lookup_brand(&self) -> Option<&str> {
        match self {
            Self::BrandOnly { brand } => Some(brand),
            Self::Book { .. } | Self::ManufacturerProduct { .. } | Self::NotFound => None,
        }
    }
}

/// Extract the outcome for `doc`, loaded from `page_url`.
///
/// Read-only: running it twice on an unchanged document gives the same result.
#[must_use]
pub fn run(doc: &Document, page_url: &str) -> ExtractionOutcome {
    let classification = classifier::classify(doc, page_url);
    log::debug!("orchestrator: page classified as {classification:?}");

    if classification == PageClassification::Book {
        let title = find_title(doc);
        let publisher = field::extract_field(doc, FieldLabel::Publisher);
        if let Some(title) = title {
            return ExtractionOutcome::Book { title, publisher };
        }
        log::debug!("orchestrator: book page without a title, treating as generic");
    }

    let manufacturer = find_manufacturer(doc);
    let brand = find_brand(doc);

    let outcome = match (manufacturer, brand) {
        (Some(manufacturer), brand) => ExtractionOutcome::ManufacturerProduct {
            brand: brand.unwrap_or_else(|| UNKNOWN_BRAND.to_string()),
            manufacturer,
        },
        (None, Some(brand)) => ExtractionOutcome::BrandOnly { brand },
        (None, None) => ExtractionOutcome::NotFound,
    };
    log::info!("orchestrator: outcome {outcome:?}");
    outcome
}

/// Product title from the first matching title selector.
#[must_use]
pub fn find_title(doc: &Document) -> Option<String> {
    let root = dom::root(doc);
    patterns::TITLE_SELECTORS
        .iter()
        .filter_map(|selector| dom::try_first(&root, selector))
        .find_map(|el| dom::trimmed_text(&el))
}

/// Brand through the full brand cascade.
#[must_use]
pub fn find_brand(doc: &Document) -> Option<String> {
    field::extract_field(doc, FieldLabel::Brand)
}

/// Manufacturer, trying the product-details label layouts before the
/// generic field cascade.
#[must_use]
pub fn find_manufacturer(doc: &Document) -> Option<String> {
    let steps = [
        Step::new("bold-label", bold_label_manufacturer),
        Step::new("list-item", list_item_manufacturer),
        Step::new("field-cascade", field_manufacturer),
    ];
    cascade::first_hit(doc, &steps)
}

/// Values produced by matching our own loading message rather than the page.
fn is_placeholder(value: &str) -> bool {
    value.to_lowercase().ends_with("information...")
}

fn accept(value: String) -> Option<String> {
    if is_placeholder(&value) {
        log::debug!("orchestrator: ignoring placeholder manufacturer {value:?}");
        None
    } else {
        Some(value)
    }
}

fn bold_label_manufacturer(doc: &Document) -> Result<Option<String>> {
    let labels = dom::query(&dom::root(doc), patterns::BOLD_LABEL)?;

    for label in dom::each(&labels) {
        if !dom::text_content(&label).contains("Manufacturer") {
            continue;
        }

        let sibling = dom::next_element_sibling(&label)
            .filter(|next| dom::tag_name(next).as_deref() == Some("span"))
            .and_then(|next| dom::trimmed_text(&next));
        if let Some(value) = sibling.and_then(accept) {
            return Ok(Some(value));
        }

        let Some(item) = dom::closest(doc, &label, "li")? else {
            continue;
        };
        for span in dom::each(&dom::query(&item, "span")?) {
            if dom::same_node(&span, &label) || dom::text_content(&span).contains("Manufacturer") {
                continue;
            }
            if let Some(value) = dom::trimmed_text(&span).and_then(accept) {
                return Ok(Some(value));
            }
        }
    }
    Ok(None)
}

fn list_item_manufacturer(doc: &Document) -> Result<Option<String>> {
    let items = dom::query(&dom::root(doc), "li")?;
    for item in dom::each(&items) {
        let text = dom::text_content(&item);
        if !(text.contains("Manufacturer") && text.contains(':')) {
            continue;
        }
        if let Some(value) = capture(&patterns::MANUFACTURER_LINE, &text).and_then(accept) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn field_manufacturer(doc: &Document) -> Result<Option<String>> {
    Ok(field::extract_field(doc, FieldLabel::Manufacturer).and_then(accept))
}
