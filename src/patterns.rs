//! Compiled regex patterns and selector lists for product-page heuristics.
//!
//! Regexes are compiled once on first use with `LazyLock`. Selector lists are
//! ordered: earlier entries win.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Labeled-value patterns
// =============================================================================
//
// One pattern per label, shared by every strategy: the capture starts after
// `Label:` (whitespace allowed around the colon) and stops at the line end.

/// `Publisher : value` up to end of line.
pub static PUBLISHER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Publisher\s*:\s*([^\n\r]+)").expect("PUBLISHER_LINE regex")
});

/// `Manufacturer : value` up to end of line.
pub static MANUFACTURER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Manufacturer\s*:\s*([^\n\r]+)").expect("MANUFACTURER_LINE regex")
});

/// `Brand : value` up to end of line.
pub static BRAND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Brand\s*:\s*([^\n\r]+)").expect("BRAND_LINE regex")
});

/// Product-detail URL paths.
pub static PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(dp|gp/product)/").expect("PRODUCT_PATH regex")
});

// =============================================================================
// Classifier selectors
// =============================================================================

pub const BREADCRUMBS: &str = "#wayfinding-breadcrumbs_feature_div";
pub const SUB_NAV: &str = "#nav-subnav";
pub const BOOKS_NAV_BUTTON: &str = r#".nav-category-button[data-csa-c-content-id="nav_cs_books"]"#;
pub const TABLE_CELLS: &str = "tr td, tr th";

// =============================================================================
// Field extraction selectors
// =============================================================================

/// Containers scanned for `Label: value` text before the whole page is tried.
pub const DETAILS_SECTIONS: &[&str] = &[
    "#productDetails_detailBullets_sections1",
    "#productDetails_feature_div",
    "#detail-bullets",
    "#detailBullets_feature_div",
    ".a-section.a-spacing-small",
];

/// Headings that mark an element as a details section.
pub const DETAILS_MARKERS: &[&str] = &["product details", "product information", "item details"];

pub const FEATURE_BULLETS: &str = "#feature-bullets li, .feature li";

pub const PUBLISHER_SELECTORS: &[&str] = &[
    ".po-publisher .po-break-word",
    r#"[data-feature-name="publisher"] .a-offscreen"#,
];

pub const MANUFACTURER_SELECTORS: &[&str] = &[
    ".po-manufacturer .po-break-word",
    r#"[data-feature-name="manufacturer"] .a-offscreen"#,
];

pub const BRAND_SELECTORS: &[&str] = &[
    r#"[data-feature-name="brand"] .a-offscreen"#,
    ".po-brand .po-break-word",
    "#productDetails_detailBullets_sections1 .a-offscreen",
];

pub const BOLD_LABEL: &str = "span.a-text-bold";

pub const TITLE_SELECTORS: &[&str] = &[
    "#productTitle",
    ".product-title",
    r#"h1[data-automation-id="title"]"#,
    "h1.a-size-large",
    "h1",
];

// =============================================================================
// Insertion anchors
// =============================================================================

/// Price containers, tried before the generic "id contains price" scan.
pub const PRICE_CONTAINERS: &[&str] = &[
    "#corePriceDisplay_desktop_feature_div",
    "#corePrice_feature_div",
    "#acBadge_feature_div",
];

pub const PRICE_ELEMENTS: &[&str] = &[
    ".priceToPay",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    ".a-price",
];

/// Ancestors a bare price element is widened to.
pub const PRICE_SECTION: &str = r#"[data-feature-name], div[id$="_feature_div"], .a-section"#;

pub const SNAP_MARKER: &str = "snap ebt eligible";

pub const VARIANT_SELECTORS: &[&str] = &[
    "#variation_size_name",
    "#inline-twister-row-size_name",
    "#twister_feature_div",
];

pub const SIZE_MARKER: &str = "size:";

pub const ACCORDION_SELECTORS: &[&str] = &[
    "#apex_desktop_newAccordionRow",
    r#"[id^="newAccordionRow"]"#,
    ".a-accordion-row-container",
];

pub const PRODUCT_DETAILS_AREAS: &[&str] = &[
    "#feature-bullets",
    "#feature-bullets ul",
    ".a-unordered-list.a-vertical.a-spacing-mini",
    "#detailBullets_feature_div",
    "#productDetails_feature_div",
    ".a-section.a-spacing-medium.a-spacing-top-small",
    "#leftCol",
    "#centerCol .a-section:first-child",
    ".a-section.a-spacing-medium:first-child",
];

pub const PRIME_UPSELL: &str = "#primeUpsellDPMessage_feature_div, #prime-upsell";

pub const DESKTOP_BUYBOX: &str = "#desktop_buybox";

pub const BUYBOX_SELECTORS: &[&str] = &[
    "#buybox",
    "#rightCol",
    ".buybox-container",
    "#apex_desktop_newAccordionRow",
    r#"[cel_widget_id="dpx-buybox-container"]"#,
    r#"[data-feature-name="buybox"]"#,
    ".a-box.a-spacing-none",
];

pub const TITLE_ANCHOR: &str = "#productTitle, .product-title, h1";
