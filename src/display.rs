//! Status widget.
//!
//! The widget starts in a loading state and moves exactly once to one of four
//! result states. A [`DisplayHandle`] is created in the loading state,
//! inserted into the page, then consumed by [`DisplayHandle::update`], which
//! rewrites the widget's icon and text in place and hands back the new handle.

use dom_query::Document;
use serde::Serialize;

use crate::dom;
use crate::error::{Error, Result};
use crate::lookup::OwnerLookupResult;
use crate::orchestrator::ExtractionOutcome;

/// Message shown when the page yields nothing.
pub const NOT_FOUND_MESSAGE: &str = "No brand or publisher information found on this page";

const ICON_CLASS: &str = "brand-owner-icon";
const TEXT_CLASS: &str = "brand-owner-text";
const LOADING_CLASS: &str = "loading";

/// What the loading state says it is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingKind {
    Publisher,
    Manufacturer,
    Search,
    Owner,
}

/// Widget state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WidgetState {
    Loading {
        kind: LoadingKind,
    },
    Book {
        title: String,
        publisher: Option<String>,
    },
    Manufacturer {
        brand: String,
        manufacturer: String,
    },
    BrandOwner {
        brand: String,
        owner: Option<OwnerLookupResult>,
    },
    NotFound,
}

impl WidgetState {
    /// Final state for an extraction outcome and, for brand-only pages, the
    /// lookup answer.
    #[must_use]
    pub fn from_outcome(outcome: &ExtractionOutcome, owner: Option<OwnerLookupResult>) -> Self {
        match outcome {
            ExtractionOutcome::Book { title, publisher } => Self::Book {
                title: title.clone(),
                publisher: publisher.clone(),
            },
            ExtractionOutcome::ManufacturerProduct { brand, manufacturer } => Self::Manufacturer {
                brand: brand.clone(),
                manufacturer: manufacturer.clone(),
            },
            ExtractionOutcome::BrandOnly { brand } => Self::BrandOwner {
                brand: brand.clone(),
                owner,
            },
            ExtractionOutcome::NotFound => Self::NotFound,
        }
    }

    /// State name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Book { .. } => "book",
            Self::Manufacturer { .. } => "manufacturer",
            Self::BrandOwner { .. } => "brand_owner",
            Self::NotFound => "not_found",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading { .. })
    }

    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Loading { kind: LoadingKind::Publisher } | Self::Book { .. } => "📚",
            Self::Loading { kind: LoadingKind::Owner } => "⏳",
            Self::Loading { .. } | Self::Manufacturer { .. } | Self::BrandOwner { .. } => "🔍",
            Self::NotFound => "❓",
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Loading { kind } => match kind {
                LoadingKind::Publisher => "Loading publisher information...",
                LoadingKind::Manufacturer => "Loading manufacturer information...",
                LoadingKind::Search => "Looking for brand or publisher information...",
                LoadingKind::Owner => "Loading brand owning company...",
            }
            .to_string(),
            Self::Book { title, publisher: Some(publisher) } => {
                format!("{title} is published by {publisher}")
            }
            Self::Book { title, publisher: None } => {
                format!("{title} - publisher information not found")
            }
            Self::Manufacturer { brand, manufacturer } => {
                format!("The brand {brand} is manufactured by {manufacturer}")
            }
            Self::BrandOwner { brand, owner } => {
                match owner.as_ref().and_then(|o| o.owning_company_name.as_deref()) {
                    Some(company) if company != brand => {
                        format!("The brand {brand} is owned by {company}")
                    }
                    _ => format!("{brand} is its own company"),
                }
            }
            Self::NotFound => NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

/// The widget as placed on the page, carrying its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHandle {
    widget_id: String,
    state: WidgetState,
}

impl DisplayHandle {
    /// A new widget in the loading state. Nothing is inserted yet; see
    /// [`DisplayHandle::markup`].
    #[must_use]
    pub fn create(widget_id: &str, kind: LoadingKind) -> Self {
        Self {
            widget_id: widget_id.to_string(),
            state: WidgetState::Loading { kind },
        }
    }

    #[must_use]
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    #[must_use]
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// HTML for the widget in its loading state.
    #[must_use]
    pub fn markup(&self) -> String {
        format!(
            r#"<div id="{id}" class="brand-owner-info {LOADING_CLASS}"><div class="brand-owner-content"><span class="{ICON_CLASS}">{icon}</span><span class="{TEXT_CLASS}">{message}</span></div></div>"#,
            id = self.widget_id,
            icon = self.state.icon(),
            message = self.state.message(),
        )
    }

    /// Move the widget to `next` and rewrite it in `doc`.
    ///
    /// Only a loading widget can be updated, and only to a result state.
    /// When the widget is not in the document the state still advances and
    /// the miss is logged.
    pub fn update(self, doc: &Document, next: WidgetState) -> Result<Self> {
        if self.state.is_terminal() || !next.is_terminal() {
            return Err(Error::WidgetTransition {
                from: self.state.name(),
                to: next.name(),
            });
        }

        match dom::element_by_id(doc, &self.widget_id) {
            Some(widget) => {
                if let Some(icon) = dom::try_first(&widget, &format!(".{ICON_CLASS}")) {
                    dom::set_text(&icon, next.icon());
                }
                if let Some(text) = dom::try_first(&widget, &format!(".{TEXT_CLASS}")) {
                    dom::set_text(&text, &next.message());
                }
                dom::remove_class(&widget, LOADING_CLASS);
                log::info!("display: widget now {}", next.name());
            }
            None => log::warn!("display: widget #{} not on the page, nothing to update", self.widget_id),
        }

        Ok(Self {
            widget_id: self.widget_id,
            state: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(handle: &DisplayHandle) -> Document {
        dom::parse(&format!("<html><body>{}</body></html>", handle.markup()))
    }

    #[test]
    fn loading_markup_has_loading_class() {
        let handle = DisplayHandle::create("w", LoadingKind::Manufacturer);
        let doc = placed(&handle);
        let widget = doc.select("#w");
        assert!(widget.has_class("loading"));
        assert_eq!(
            doc.select("#w .brand-owner-text").text().to_string(),
            "Loading manufacturer information..."
        );
    }

    #[test]
    fn update_rewrites_text_and_clears_loading() {
        let handle = DisplayHandle::create("w", LoadingKind::Search);
        let doc = placed(&handle);

        let handle = handle.update(&doc, WidgetState::NotFound).unwrap();
        assert_eq!(handle.state(), &WidgetState::NotFound);
        assert_eq!(doc.select("#w .brand-owner-text").text().to_string(), NOT_FOUND_MESSAGE);
        assert_eq!(doc.select("#w .brand-owner-icon").text().to_string(), "❓");
        assert!(!doc.select("#w").has_class("loading"));
    }

    #[test]
    fn page_text_is_not_parsed_as_markup() {
        let handle = DisplayHandle::create("w", LoadingKind::Owner);
        let doc = placed(&handle);
        let state = WidgetState::BrandOwner {
            brand: "<b>Acme</b>".to_string(),
            owner: None,
        };
        handle.update(&doc, state).unwrap();
        assert!(doc.select("#w b").is_empty());
        assert_eq!(
            doc.select("#w .brand-owner-text").text().to_string(),
            "<b>Acme</b> is its own company"
        );
    }

    #[test]
    fn terminal_states_reject_updates() {
        let handle = DisplayHandle::create("w", LoadingKind::Search);
        let doc = placed(&handle);
        let handle = handle.update(&doc, WidgetState::NotFound).unwrap();

        let err = handle
            .update(&doc, WidgetState::Loading { kind: LoadingKind::Search })
            .unwrap_err();
        assert!(matches!(err, Error::WidgetTransition { from: "not_found", to: "loading" }));
    }

    #[test]
    fn loading_cannot_move_to_loading() {
        let handle = DisplayHandle::create("w", LoadingKind::Search);
        let doc = placed(&handle);
        assert!(handle
            .update(&doc, WidgetState::Loading { kind: LoadingKind::Owner })
            .is_err());
    }

    #[test]
    fn id_with_leading_digit_is_updated() {
        let handle = DisplayHandle::create("1badge", LoadingKind::Search);
        let doc = placed(&handle);
        handle.update(&doc, WidgetState::NotFound).unwrap();
        assert_eq!(doc.select(".brand-owner-text").text().to_string(), NOT_FOUND_MESSAGE);
        assert!(!doc.select(".brand-owner-info").has_class("loading"));
    }

    #[test]
    fn update_without_widget_still_advances() {
        let handle = DisplayHandle::create("w", LoadingKind::Search);
        let doc = dom::parse("<html><body></body></html>");
        let handle = handle.update(&doc, WidgetState::NotFound).unwrap();
        assert!(handle.state().is_terminal());
    }

    #[test]
    fn messages() {
        let book = WidgetState::Book { title: "My Book".into(), publisher: Some("Acme Press".into()) };
        assert_eq!(book.message(), "My Book is published by Acme Press");

        let untitled = WidgetState::Book { title: "My Book".into(), publisher: None };
        assert_eq!(untitled.message(), "My Book - publisher information not found");

        let made = WidgetState::Manufacturer { brand: "Nike".into(), manufacturer: "Nike Inc.".into() };
        assert_eq!(made.message(), "The brand Nike is manufactured by Nike Inc.");

        let owned = WidgetState::BrandOwner {
            brand: "Nike".into(),
            owner: Some(OwnerLookupResult {
                brand_name: "Nike".into(),
                owning_company_name: Some("Nike, Inc.".into()),
            }),
        };
        assert_eq!(owned.message(), "The brand Nike is owned by Nike, Inc.");

        let self_owned = WidgetState::BrandOwner {
            brand: "Patagonia".into(),
            owner: Some(OwnerLookupResult {
                brand_name: "Patagonia".into(),
                owning_company_name: Some("Patagonia".into()),
            }),
        };
        assert_eq!(self_owned.message(), "Patagonia is its own company");
    }

    #[test]
    fn outcome_maps_to_state() {
        let outcome = ExtractionOutcome::BrandOnly { brand: "Nike".into() };
        assert_eq!(
            WidgetState::from_outcome(&outcome, None),
            WidgetState::BrandOwner { brand: "Nike".into(), owner: None }
        );
        assert_eq!(
            WidgetState::from_outcome(&ExtractionOutcome::NotFound, None),
            WidgetState::NotFound
        );
    }
}
