//! Labeled field extraction.
//!
//! [`extract_field`] finds the value printed next to a label such as
//! "Publisher" or "Brand" on a product page. Page layouts vary a lot, so the
//! value is searched for with a fixed cascade:
//!
//! 1. feature bullets (`Brand` only)
//! 2. table rows whose cells hold the label and then the value
//! 3. `Label: value` text inside known details sections
//! 4. `Label: value` text anywhere in the body
//! 5. structured vendor selectors
//!
//! The first non-empty value wins. Label matching is case-insensitive.

use std::fmt;

use dom_query::Document;
use regex::Regex;

use crate::cascade::{self, Step};
use crate::dom;
use crate::error::Result;
use crate::patterns;

/// A field that can be read off a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    Publisher,
    Manufacturer,
    Brand,
}

impl FieldLabel {
    /// Label as printed on pages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publisher => "Publisher",
            Self::Manufacturer => "Manufacturer",
            Self::Brand => "Brand",
        }
    }

    /// Lowercase form used for case-insensitive containment checks.
    #[must_use]
    pub const fn needle(self) -> &'static str {
        match self {
            Self::Publisher => "publisher",
            Self::Manufacturer => "manufacturer",
            Self::Brand => "brand",
        }
    }

    /// Whether `text` is exactly this label, ignoring case, surrounding
    /// whitespace and one trailing colon.
    #[must_use]
    pub fn is_exact(self, text: &str) -> bool {
        let text = text.trim();
        let text = text.strip_suffix(':').map_or(text, str::trim_end);
        text.eq_ignore_ascii_case(self.as_str())
    }

    fn line_pattern(self) -> &'static Regex {
        match self {
            Self::Publisher => &patterns::PUBLISHER_LINE,
            Self::Manufacturer => &patterns::MANUFACTURER_LINE,
            Self::Brand => &patterns::BRAND_LINE,
        }
    }

    fn structured_selectors(self) -> &'static [&'static str] {
        match self {
            Self::Publisher => patterns::PUBLISHER_SELECTORS,
            Self::Manufacturer => patterns::MANUFACTURER_SELECTORS,
            Self::Brand => patterns::BRAND_SELECTORS,
        }
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document plus the label being searched for.
pub(crate) struct FieldQuery<'d> {
    pub doc: &'d Document,
    pub label: FieldLabel,
}

/// Find the value for `label` on the page.
///
/// Never fails: a strategy that errors is skipped, and exhausting the
/// cascade yields `None`.
#[must_use]
pub fn extract_field(doc: &Document, label: FieldLabel) -> Option<String> {
    let query = FieldQuery { doc, label };
    let steps = [
        Step::new("feature-bullets", feature_bullets),
        Step::new("table-rows", table_rows),
        Step::new("labeled-sections", labeled_sections),
        Step::new("whole-page", whole_page),
        Step::new("structured-selectors", structured_selectors),
    ];
    let found = cascade::first_hit(&query, &steps);
    log::debug!("field: {label} -> {found:?}");
    found
}

/// First capture group of `re` in `text`, trimmed; `None` if blank.
pub(crate) fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

fn feature_bullets(q: &FieldQuery) -> Result<Option<String>> {
    if q.label != FieldLabel::Brand {
        return Ok(None);
    }

    let bullets = dom::query(&dom::root(q.doc), patterns::FEATURE_BULLETS)?;
    for bullet in dom::each(&bullets) {
        if let Some(brand) = capture(&patterns::BRAND_LINE, &dom::text_content(&bullet)) {
            return Ok(Some(brand));
        }
    }
    Ok(None)
}

fn table_rows(q: &FieldQuery) -> Result<Option<String>> {
    let needle = q.label.needle();

    let rows = dom::query(&dom::root(q.doc), "tr")?;
    for row in dom::each(&rows) {
        if !dom::text_content(&row).to_lowercase().contains(needle) {
            continue;
        }

        let cells = dom::each(&dom::query(&row, "td, th")?);
        for (i, cell) in cells.iter().enumerate() {
            let text = dom::text_content(cell);
            if q.label.is_exact(&text) {
                if let Some(value) = cells.get(i + 1).and_then(|next| dom::trimmed_text(next)) {
                    return Ok(Some(value));
                }
            } else if let Some(value) = capture(q.label.line_pattern(), &text) {
                return Ok(Some(value));
            }
        }
    }
    Ok(None)
}

fn labeled_sections(q: &FieldQuery) -> Result<Option<String>> {
    let root = dom::root(q.doc);
    let pattern = q.label.line_pattern();

    for selector in patterns::DETAILS_SECTIONS {
        if let Some(section) = dom::try_first(&root, selector) {
            if let Some(value) = capture(pattern, &dom::text_content(&section)) {
                return Ok(Some(value));
            }
        }
    }

    // Elements mentioning a details heading, in document order.
    let all = dom::query(&root, "body *")?;
    for el in dom::each(&all) {
        let text = dom::text_content(&el);
        let lower = text.to_lowercase();
        if !patterns::DETAILS_MARKERS.iter().any(|m| lower.contains(m)) {
            continue;
        }
        if let Some(value) = capture(pattern, &text) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn whole_page(q: &FieldQuery) -> Result<Option<String>> {
    let body = dom::body(q.doc);
    Ok(capture(q.label.line_pattern(), &dom::text_content(&body)))
}

fn structured_selectors(q: &FieldQuery) -> Result<Option<String>> {
    let root = dom::root(q.doc);
    Ok(q.label
        .structured_selectors()
        .iter()
        .filter_map(|selector| dom::try_first(&root, selector))
        .find_map(|el| dom::trimmed_text(&el)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        dom::parse(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn label_exact_match_accepts_colon_and_case() {
        assert!(FieldLabel::Brand.is_exact("Brand"));
        assert!(FieldLabel::Brand.is_exact("  brand: "));
        assert!(FieldLabel::Brand.is_exact("BRAND :"));
        assert!(!FieldLabel::Brand.is_exact("Brand Name"));
    }

    #[test]
    fn table_row_next_cell() {
        let d = doc("<table><tr><td>Publisher</td><td> Acme Press </td></tr></table>");
        assert_eq!(extract_field(&d, FieldLabel::Publisher), Some("Acme Press".to_string()));
    }

    #[test]
    fn table_row_header_cell() {
        let d = doc("<table><tr><th>Brand:</th><td>Nike</td></tr></table>");
        assert_eq!(extract_field(&d, FieldLabel::Brand), Some("Nike".to_string()));
    }

    #[test]
    fn table_row_inline_cell() {
        let d = doc("<table><tr><td>Manufacturer: Acme Corp</td></tr></table>");
        assert_eq!(extract_field(&d, FieldLabel::Manufacturer), Some("Acme Corp".to_string()));
    }

    #[test]
    fn table_row_outranks_details_section() {
        let d = doc(
            r#"<div id="detail-bullets">Publisher : Section Press</div>
               <table><tr><td>Publisher</td><td>Table Press</td></tr></table>"#,
        );
        assert_eq!(extract_field(&d, FieldLabel::Publisher), Some("Table Press".to_string()));
    }

    #[test]
    fn details_section_line() {
        let d = doc(
            r#"<div id="detailBullets_feature_div"><ul>
                 <li>Publisher : Acme Press (May 1, 2020)
                 </li><li>Language : English</li></ul></div>"#,
        );
        assert_eq!(
            extract_field(&d, FieldLabel::Publisher),
            Some("Acme Press (May 1, 2020)".to_string())
        );
    }

    #[test]
    fn product_details_heading_scopes_search() {
        let d = doc(
            "<section><h2>Product details</h2>\n<p>Manufacturer : Globex\n</p></section>",
        );
        assert_eq!(extract_field(&d, FieldLabel::Manufacturer), Some("Globex".to_string()));
    }

    #[test]
    fn first_details_section_wins() {
        let d = doc(
            "<div><h2>Product details</h2><p>Manufacturer : First\n</p></div>\
             <div><h2>Item details</h2><p>Manufacturer : Second\n</p></div>",
        );
        assert_eq!(extract_field(&d, FieldLabel::Manufacturer), Some("First".to_string()));
    }

    #[test]
    fn multi_line_cell_stops_at_line_end() {
        let d = doc("<table><tr><td>Brand: Nike\nColor: Red</td></tr></table>");
        assert_eq!(extract_field(&d, FieldLabel::Brand), Some("Nike".to_string()));
    }

    #[test]
    fn bullet_value_follows_the_labeled_colon() {
        let d = doc(
            r#"<div id="feature-bullets"><ul><li>Trusted brand quality. Brand: Nike</li></ul></div>"#,
        );
        assert_eq!(extract_field(&d, FieldLabel::Brand), Some("Nike".to_string()));
    }

    #[test]
    fn whole_page_fallback() {
        let d = doc("<div>Brand: Nike</div>");
        assert_eq!(extract_field(&d, FieldLabel::Brand), Some("Nike".to_string()));
    }

    #[test]
    fn structured_selector_fallback() {
        let d = doc(r#"<div class="po-brand"><span class="po-break-word"> Contoso </span></div>"#);
        assert_eq!(extract_field(&d, FieldLabel::Brand), Some("Contoso".to_string()));
    }

    #[test]
    fn feature_bullets_for_brand() {
        let d = doc(r#"<div id="feature-bullets"><ul><li>Made of steel</li><li>BRAND: Acme</li></ul></div>"#);
        assert_eq!(extract_field(&d, FieldLabel::Brand), Some("Acme".to_string()));
    }

    #[test]
    fn label_case_variants_match_identically() {
        for html in ["<li>Brand: Nike</li>", "<li>brand: Nike</li>", "<li>BRAND: Nike</li>"] {
            assert_eq!(extract_field(&doc(html), FieldLabel::Brand), Some("Nike".to_string()));
        }
    }

    #[test]
    fn missing_field_is_none() {
        let d = doc("<p>Just a description of the product.</p>");
        assert_eq!(extract_field(&d, FieldLabel::Publisher), None);
        assert_eq!(extract_field(&d, FieldLabel::Brand), None);
    }
}
