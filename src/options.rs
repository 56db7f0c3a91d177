//! Configuration for the tracker.
//!
//! `Options` carries everything a page pass needs that is not on the page:
//! the stored layout preference, the owner lookup endpoint and the widget id.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Storage key of the layout preference.
pub const LAYOUT_MODE_KEY: &str = "layoutMode";

/// Default owner lookup service.
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://compass-ai-internal-api.com";

/// Where the widget is placed on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Under the price, or in the product details area.
    #[default]
    ProductDetails,
    /// In the buy box.
    Buybox,
}

impl LayoutMode {
    /// Stored value for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductDetails => "product-details",
            Self::Buybox => "buybox",
        }
    }

    /// Interpret a stored preference value.
    ///
    /// Missing or unrecognized values fall back to `ProductDetails`.
    #[must_use]
    pub fn from_preference(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_else(|| {
            log::debug!("options: layout preference {value:?} not recognized, using default");
            Self::default()
        })
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "product-details" => Ok(Self::ProductDetails),
            "buybox" => Ok(Self::Buybox),
            other => Err(Error::Config(format!("unknown layout mode {other:?}"))),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration options for a tracker pass.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use brand_owner_tracker::{LayoutMode, Options};
///
/// let options = Options {
///     layout_mode: LayoutMode::Buybox,
///     ..Options::default()
/// };
/// assert_eq!(options.widget_id, "brand-owner-info");
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Widget placement preference.
    ///
    /// Default: `LayoutMode::ProductDetails`
    pub layout_mode: LayoutMode,

    /// Base URL of the owner lookup service, without trailing slash.
    ///
    /// Default: `https://compass-ai-internal-api.com`
    pub lookup_base_url: String,

    /// Time allowed for one owner lookup request.
    ///
    /// Default: 10 seconds
    pub lookup_timeout: Duration,

    /// `id` attribute of the injected widget.
    ///
    /// Must be a valid CSS identifier.
    ///
    /// Default: `brand-owner-info`
    pub widget_id: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            lookup_timeout: Duration::from_secs(10),
            widget_id: "brand-owner-info".to_string(),
        }
    }
}

impl Options {
    /// Options with the layout taken from a stored preference value.
    #[must_use]
    pub fn with_stored_layout(mut self, stored: Option<&str>) -> Self {
        self.layout_mode = LayoutMode::from_preference(stored);
        self
    }
}
