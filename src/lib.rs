//! # brand-owner-tracker
//!
//! Finds out who makes, publishes or owns the product on an Amazon-style
//! product page, and places a small status widget on the page saying so.
//!
//! A page pass classifies the page, reads the publisher, manufacturer and
//! brand out of the product details, looks up the owning company of a bare
//! brand, and writes the answer into the widget.
//!
//! ## Quick Start
//!
//! ```rust
//! use brand_owner_tracker::{dom, run, ExtractionOutcome};
//!
//! let html = r#"<html><body>
//!     <span id="productTitle">Trail Runner</span>
//!     <table><tr><th>Manufacturer</th><td>Acme Footwear</td></tr>
//!            <tr><th>Brand</th><td>Acme</td></tr></table>
//! </body></html>"#;
//!
//! let doc = dom::parse(html);
//! let outcome = run(&doc, "https://www.amazon.com/dp/B000000000");
//! assert_eq!(
//!     outcome,
//!     ExtractionOutcome::ManufacturerProduct {
//!         brand: "Acme".to_string(),
//!         manufacturer: "Acme Footwear".to_string(),
//!     }
//! );
//! ```
//!
//! ## Pieces
//!
//! - **Classification**: book page or generic page, from the URL and page signals
//! - **Field extraction**: one cascade of strategies per labeled field
//! - **Insertion**: where the widget goes, per layout preference
//! - **Owner lookup**: cached HTTP lookup of a brand's owning company
//! - **Tracker**: the full pass, from loading widget to final message

mod cascade;
mod error;
mod options;
mod patterns;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Page classification.
pub mod classifier;

/// Labeled field extraction.
pub mod field;

/// Outcome extraction.
pub mod orchestrator;

/// Widget placement.
pub mod insertion;

/// Status widget states and rendering.
pub mod display;

/// Brand owner lookup.
pub mod lookup;

/// Page decoding from raw bytes.
pub mod page;

/// Full page pass.
pub mod tracker;

// Public API - re-exports
pub use classifier::{classify, PageClassification};
pub use display::{DisplayHandle, LoadingKind, WidgetState};
pub use error::{Error, Result};
pub use field::{extract_field, FieldLabel};
pub use insertion::{insert, resolve, InsertionTarget, Position, Wrapper};
pub use lookup::{HttpOwnerLookup, NoLookup, OwnerLookup, OwnerLookupResult};
pub use options::{LayoutMode, Options, DEFAULT_LOOKUP_BASE_URL, LAYOUT_MODE_KEY};
pub use orchestrator::{run, ExtractionOutcome, UNKNOWN_BRAND};
pub use tracker::{TrackReport, Tracker};
