//! One page pass.
//!
//! [`Tracker::process`] extracts the outcome, shows a loading widget, asks the
//! lookup for the owner of a bare brand, then moves the widget to its final
//! state. A page with nowhere to put the widget is still processed; the
//! report says the widget was not inserted.

use dom_query::Document;
use serde::Serialize;

use crate::display::{DisplayHandle, LoadingKind, WidgetState};
use crate::dom;
use crate::error::Result;
use crate::insertion;
use crate::lookup::{HttpOwnerLookup, OwnerLookup, OwnerLookupResult};
use crate::options::Options;
use crate::orchestrator::{self, ExtractionOutcome};

/// Result of one page pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackReport {
    pub outcome: ExtractionOutcome,
    pub owner: Option<OwnerLookupResult>,
    pub inserted: bool,
    pub state: WidgetState,
    pub message: String,
}

/// Runs page passes with fixed options and an owner lookup.
pub struct Tracker<L = HttpOwnerLookup> {
    options: Options,
    lookup: L,
}

impl Tracker<HttpOwnerLookup> {
    /// Tracker using the HTTP lookup configured in `options`.
    pub fn from_options(options: Options) -> Result<Self> {
        let lookup = HttpOwnerLookup::from_options(&options)?;
        Ok(Self { options, lookup })
    }
}

impl<L: OwnerLookup> Tracker<L> {
    pub fn new(options: Options, lookup: L) -> Self {
        Self { options, lookup }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Process `doc`, loaded from `page_url`, mutating it in place.
    ///
    /// The outcome is read before the widget goes in, so the widget's own
    /// text and wrapper never feed back into extraction.
    pub async fn process(&self, doc: &Document, page_url: &str) -> Result<TrackReport> {
        let widget_id = self.options.widget_id.as_str();

        // A previous pass leaves its widget behind.
        let root = dom::root(doc);
        if let Some(stale) = dom::element_by_id(doc, widget_id) {
            log::debug!("tracker: removing widget from an earlier pass");
            dom::remove(&stale);
        }
        dom::remove(&dom::query(&root, &format!(".{}", insertion::WRAPPER_CLASS))?);

        let outcome = orchestrator::run(doc, page_url);
        let handle = DisplayHandle::create(widget_id, loading_kind(&outcome));

        let inserted = match insertion::resolve(doc, self.options.layout_mode) {
            Some(target) => insertion::insert(doc, &target, &handle.markup(), widget_id),
            None => {
                log::warn!("tracker: no insertion point for the widget");
                false
            }
        };

        let owner = match outcome.lookup_brand() {
            Some(brand) => self.lookup.lookup(brand).await,
            None => None,
        };

        let handle = handle.update(doc, WidgetState::from_outcome(&outcome, owner.clone()))?;
        let state = handle.state().clone();
        let message = state.message();
        log::info!("tracker: {page_url}: {message}");

        Ok(TrackReport {
            outcome,
            owner,
            inserted,
            state,
            message,
        })
    }
}

fn loading_kind(outcome: &ExtractionOutcome) -> LoadingKind {
    match outcome {
        ExtractionOutcome::Book { .. } => LoadingKind::Publisher,
        ExtractionOutcome::ManufacturerProduct { .. } => LoadingKind::Manufacturer,
        ExtractionOutcome::BrandOnly { .. } => LoadingKind::Owner,
        ExtractionOutcome::NotFound => LoadingKind::Search,
    }
}
