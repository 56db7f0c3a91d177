//! Widget placement.
//!
//! [`resolve`] picks the anchor node the status widget is placed against, and
//! [`insert`] performs the placement. Both modes are ordered cascades of
//! layout heuristics. `ProductDetails` falls back to `Buybox`, and `Buybox`
//! ends with the document body, so any document with a body gets a target.

use dom_query::{Document, Selection};

use crate::cascade::{self, Step};
use crate::dom;
use crate::error::Result;
use crate::options::LayoutMode;
use crate::patterns;

/// Where the widget goes relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Preceding sibling of the anchor.
    Before,
    /// Following sibling of the anchor.
    AfterSibling,
    /// Last child of the anchor.
    AppendChild,
    /// First child of the anchor.
    PrependChild,
}

/// Extra class on every wrapper, so a later pass can find and drop it.
pub const WRAPPER_CLASS: &str = "brand-owner-wrapper";

/// Styling container placed around the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    Price,
    Details,
    Buybox,
}

impl Wrapper {
    /// Class list of the wrapping `div`.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Price => "a-section a-spacing-small brand-owner-price-wrapper",
            Self::Details => "a-section a-spacing-medium",
            Self::Buybox => "a-section a-spacing-small brand-owner-buybox-wrapper",
        }
    }
}

/// An anchor in the live document plus how to place the widget there.
///
/// Borrows the document, so it is recomputed on every pass rather than kept
/// across mutations.
#[derive(Clone)]
pub struct InsertionTarget<'a> {
    pub anchor: Selection<'a>,
    pub position: Position,
    pub wrapper: Option<Wrapper>,
}

impl<'a> InsertionTarget<'a> {
    fn new(anchor: Selection<'a>, position: Position, wrapper: Option<Wrapper>) -> Self {
        Self { anchor, position, wrapper }
    }
}

/// Find where the widget should go for `mode`.
///
/// `None` only when the document has no `<body>`.
#[must_use]
pub fn resolve(doc: &Document, mode: LayoutMode) -> Option<InsertionTarget<'_>> {
    match mode {
        LayoutMode::ProductDetails => {
            let steps = [
                Step::new("price-containers", price_containers),
                Step::new("price-id", price_id),
                Step::new("price-elements", price_elements),
                Step::new("snap-eligibility", snap_eligibility),
                Step::new("variant", variant),
                Step::new("accordion-row", accordion_row),
                Step::new("details-area", details_area),
            ];
            cascade::first_hit(doc, &steps).or_else(|| {
                log::debug!("insertion: no product-details anchor, falling back to buy box");
                resolve(doc, LayoutMode::Buybox)
            })
        }
        LayoutMode::Buybox => {
            let steps = [
                Step::new("prime-upsell", prime_upsell),
                Step::new("desktop-buybox", desktop_buybox),
                Step::new("buybox", buybox),
                Step::new("title", title),
                Step::new("body", body),
            ];
            cascade::first_hit(doc, &steps)
        }
    }
}

/// Place `widget_html` at `target`.
///
/// Returns whether an element with id `widget_id` is in the document
/// afterwards.
pub fn insert(doc: &Document, target: &InsertionTarget, widget_html: &str, widget_id: &str) -> bool {
    if target.anchor.is_empty() {
        log::warn!("insertion: anchor is no longer in the document");
        return false;
    }

    let html = match target.wrapper {
        Some(wrapper) => format!(r#"<div class="{} {WRAPPER_CLASS}">{widget_html}</div>"#, wrapper.class()),
        None => widget_html.to_string(),
    };

    match target.position {
        Position::Before => dom::insert_before(&target.anchor, &html),
        Position::AfterSibling => dom::insert_after(&target.anchor, &html),
        Position::AppendChild => dom::append_html(&target.anchor, &html),
        Position::PrependChild => dom::prepend_html(&target.anchor, &html),
    }

    let inserted = dom::element_by_id(doc, widget_id).is_some();
    if inserted {
        log::info!("insertion: widget placed ({:?}, {:?})", target.position, target.wrapper);
    } else {
        log::warn!("insertion: widget missing after {:?} insert", target.position);
    }
    inserted
}

fn after_price(anchor: Selection<'_>) -> InsertionTarget<'_> {
    InsertionTarget::new(anchor, Position::AfterSibling, Some(Wrapper::Price))
}

fn first_of<'a>(doc: &'a Document, selectors: &[&str]) -> Option<Selection<'a>> {
    let root = dom::root(doc);
    selectors.iter().find_map(|selector| dom::try_first(&root, selector))
}

/// Innermost element whose text satisfies `pred`, widened to its enclosing `div`.
fn text_anchor<'a>(
    doc: &'a Document,
    marker: &str,
    pred: fn(&str, &str) -> bool,
) -> Result<Option<Selection<'a>>> {
    let all = dom::query(&dom::root(doc), "body *")?;
    for el in dom::each(&all) {
        let text = dom::text_content(&el).trim().to_lowercase();
        if !pred(&text, marker) || dom::child_contains_text(&el, marker) {
            continue;
        }
        let widened = dom::closest(doc, &el, "div")?;
        return Ok(Some(widened.unwrap_or(el)));
    }
    Ok(None)
}

fn price_containers(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    Ok(first_of(doc, patterns::PRICE_CONTAINERS).map(after_price))
}

fn price_id(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    let with_id = dom::query(&dom::body(doc), "[id]")?;
    Ok(dom::each(&with_id)
        .into_iter()
        .find(|el| dom::id(el).is_some_and(|id| id.to_lowercase().contains("price")))
        .map(after_price))
}

fn price_elements(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    let Some(price) = first_of(doc, patterns::PRICE_ELEMENTS) else {
        return Ok(None);
    };
    let section = dom::closest(doc, &price, patterns::PRICE_SECTION)?;
    Ok(Some(after_price(section.unwrap_or(price))))
}

fn snap_eligibility(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    let anchor = text_anchor(doc, patterns::SNAP_MARKER, |text, marker| text.contains(marker))?;
    Ok(anchor.map(after_price))
}

fn variant(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    if let Some(found) = first_of(doc, patterns::VARIANT_SELECTORS) {
        return Ok(Some(after_price(found)));
    }
    let anchor = text_anchor(doc, patterns::SIZE_MARKER, |text, marker| text.starts_with(marker))?;
    Ok(anchor.map(after_price))
}

fn accordion_row(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    Ok(first_of(doc, patterns::ACCORDION_SELECTORS).map(after_price))
}

fn details_area(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    Ok(first_of(doc, patterns::PRODUCT_DETAILS_AREAS).map(|area| {
        let position = if dom::tag_name(&area).as_deref() == Some("ul") {
            Position::Before
        } else {
            Position::PrependChild
        };
        InsertionTarget::new(area, position, Some(Wrapper::Details))
    }))
}

fn mentions_prime(el: &Selection) -> bool {
    let id = dom::id(el).unwrap_or_default().to_lowercase();
    let class = dom::class_name(el).unwrap_or_default().to_lowercase();
    id.contains("prime") || class.contains("prime")
}

/// First descendant of `container` whose id or class mentions prime.
fn nested_prime<'a>(container: &Selection<'a>) -> Result<Option<Selection<'a>>> {
    let descendants = dom::query(container, "*")?;
    Ok(dom::each(&descendants).into_iter().find(mentions_prime))
}

fn prime_upsell(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    Ok(dom::query_first(&dom::root(doc), patterns::PRIME_UPSELL)?
        .map(|el| InsertionTarget::new(el, Position::AfterSibling, Some(Wrapper::Buybox))))
}

fn desktop_buybox(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    let Some(container) = dom::query_first(&dom::root(doc), patterns::DESKTOP_BUYBOX)? else {
        return Ok(None);
    };
    let target = match nested_prime(&container)? {
        Some(prime) => InsertionTarget::new(prime, Position::AfterSibling, Some(Wrapper::Buybox)),
        None => InsertionTarget::new(container, Position::AppendChild, Some(Wrapper::Buybox)),
    };
    Ok(Some(target))
}

fn buybox(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    let Some(container) = first_of(doc, patterns::BUYBOX_SELECTORS) else {
        return Ok(None);
    };
    let target = match nested_prime(&container)? {
        Some(prime) => InsertionTarget::new(prime, Position::AfterSibling, Some(Wrapper::Buybox)),
        None => InsertionTarget::new(container, Position::PrependChild, None),
    };
    Ok(Some(target))
}

fn title(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    Ok(dom::query_first(&dom::root(doc), patterns::TITLE_ANCHOR)?
        .map(|el| InsertionTarget::new(el, Position::AfterSibling, None)))
}

fn body(doc: &Document) -> Result<Option<InsertionTarget<'_>>> {
    let body = dom::body(doc);
    Ok((!body.is_empty()).then(|| InsertionTarget::new(body, Position::AppendChild, None)))
}
