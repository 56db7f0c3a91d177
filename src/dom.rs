//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query` used by the classifier, the extractors and the
//! insertion resolver. Selector queries go through [`query`] so that an
//! unparseable selector surfaces as [`Error::Selector`] instead of a panic.

// Re-export core types for external use
pub use dom_query::{Document, Matcher, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use crate::error::{Error, Result};

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Root element of the document (`<html>`), used as the base for queries.
#[inline]
#[must_use]
pub fn root(doc: &Document) -> Selection<'_> {
    doc.select("html")
}

/// The `<body>` element. Empty selection when the document has none.
#[inline]
#[must_use]
pub fn body(doc: &Document) -> Selection<'_> {
    doc.select("body")
}

// === Querying ===

/// Compile a selector, mapping parse failures to [`Error::Selector`].
pub fn matcher(selector: &str) -> Result<Matcher> {
    Matcher::new(selector).map_err(|e| Error::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// All descendants of `root` matching `selector`, in document order.
pub fn query<'a>(root: &Selection<'a>, selector: &str) -> Result<Selection<'a>> {
    let m = matcher(selector)?;
    Ok(root.select_matcher(&m))
}

/// First descendant of `root` matching `selector`, if any.
pub fn query_first<'a>(root: &Selection<'a>, selector: &str) -> Result<Option<Selection<'a>>> {
    let found = query(root, selector)?;
    Ok(found.nodes().first().map(|n| Selection::from(*n)))
}

/// Like [`query_first`], but a failing selector is logged and reads as a miss.
///
/// For loops over candidate selectors where one bad entry must not stop the rest.
#[must_use]
pub fn try_first<'a>(root: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    match query_first(root, selector) {
        Ok(found) => found,
        Err(err) => {
            log::debug!("dom: skipping candidate: {err}");
            None
        }
    }
}

/// Split a selection into one single-node selection per element.
#[must_use]
pub fn each<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|n| Selection::from(*n)).collect()
}

/// Nearest ancestor-or-self of `sel` that matches `selector` within `doc`.
pub fn closest<'a>(
    doc: &'a Document,
    sel: &Selection<'a>,
    selector: &str,
) -> Result<Option<Selection<'a>>> {
    let candidates = query(&root(doc), selector)?;
    let ids: Vec<_> = candidates.nodes().iter().map(|n| n.id).collect();

    let mut current = sel.nodes().first().copied();
    while let Some(node) = current {
        if ids.contains(&node.id) {
            return Ok(Some(Selection::from(node)));
        }
        current = node.parent();
    }
    Ok(None)
}

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// First element whose `id` attribute equals `id`.
///
/// Compares the attribute directly, so ids that are not valid CSS
/// identifiers (a leading digit, say) are still found.
#[must_use]
pub fn element_by_id<'a>(doc: &'a Document, id: &str) -> Option<Selection<'a>> {
    let candidates = root(doc).select("[id]");
    each(&candidates)
        .into_iter()
        .find(|el| el.attr("id").is_some_and(|v| &*v == id))
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Whether the first node of the selection is the same node as `other`'s.
#[must_use]
pub fn same_node(sel: &Selection, other: &Selection) -> bool {
    match (sel.nodes().first(), other.nodes().first()) {
        (Some(a), Some(b)) => a.id == b.id,
        _ => false,
    }
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Trimmed text content, or `None` when it is blank.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> Option<String> {
    let text = sel.text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// === Tree Navigation ===

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Whether any element child of `sel` also contains `needle` in its text.
///
/// Used to pick the innermost element carrying a text marker.
#[must_use]
pub fn child_contains_text(sel: &Selection, needle: &str) -> bool {
    each(&sel.children())
        .iter()
        .any(|c| c.text().to_lowercase().contains(needle))
}

// === Tree Manipulation ===

/// Insert `html` before the selection, as a preceding sibling.
#[inline]
pub fn insert_before(sel: &Selection, html: &str) {
    sel.before_html(html);
}

/// Insert `html` after the selection, as the following sibling.
#[inline]
pub fn insert_after(sel: &Selection, html: &str) {
    sel.after_html(html);
}

/// Append `html` as the last child.
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

/// Insert `html` as the first child.
#[inline]
pub fn prepend_html(sel: &Selection, html: &str) {
    sel.prepend_html(html);
}

/// Detach the selected nodes from the document.
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Replace the element's content with plain text.
#[inline]
pub fn set_text(sel: &Selection, text: &str) {
    sel.set_text(text);
}

/// Remove one class from the element's class list.
#[inline]
pub fn remove_class(sel: &Selection, class: &str) {
    sel.remove_class(class);
}
