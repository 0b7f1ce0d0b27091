//! Labeled-field extraction
//!
//! Catalog pages often render metadata as a label element followed by a value
//! element (`<th>Author</th><td>Jane Doe</td>`). [`FieldExtractor`] finds the
//! label by its exact text and reads the adjacent value. All lookups are safe on
//! an empty extractor: they return `None` or an empty list.

use crate::crawler::fetcher::{Document, PageFetcher};
use scraper::{ElementRef, Selector};

/// Read access to a loaded page plus sibling-based field lookups
pub trait FieldExtractor {
    /// The document lookups run against, `None` before any successful load
    fn document(&self) -> Option<&Document>;

    /// Finds the element right after the label `tag` whose text is exactly `key`
    ///
    /// Candidates are `tag` elements whose text contains `key`; among them the
    /// first (in document order) whose trimmed text equals `key` is the label.
    /// Its immediate next element sibling is returned if it matches
    /// `sibling_tag`. Invalid selectors find nothing.
    fn find_sibling(&self, tag: &str, key: &str, sibling_tag: &str) -> Option<ElementRef<'_>> {
        let document = self.document()?;
        let tag_selector = Selector::parse(tag).ok()?;
        let sibling_selector = Selector::parse(sibling_tag).ok()?;

        let label = document
            .html()
            .select(&tag_selector)
            .map(|element| (element, element_text(&element)))
            .filter(|(_, text)| text.contains(key))
            .find(|(_, text)| text.trim() == key)
            .map(|(element, _)| element)?;

        let sibling = label.next_siblings().find_map(ElementRef::wrap)?;
        sibling_selector.matches(&sibling).then_some(sibling)
    }

    /// Returns the trimmed text of [`find_sibling`](Self::find_sibling), if non-empty
    fn find_sibling_text(&self, tag: &str, key: &str, sibling_tag: &str) -> Option<String> {
        let sibling = self.find_sibling(tag, key, sibling_tag)?;
        let text = element_text(&sibling);
        let text = text.trim();

        (!text.is_empty()).then(|| text.to_string())
    }
}

impl FieldExtractor for Document {
    fn document(&self) -> Option<&Document> {
        Some(self)
    }
}

impl FieldExtractor for PageFetcher {
    fn document(&self) -> Option<&Document> {
        PageFetcher::document(self)
    }
}

/// Collects the text of each direct child of `element` matching `child_tag`
///
/// Children are visited in document order. A missing element or an invalid
/// selector yields an empty list.
pub fn reduce_children_to_text(element: Option<ElementRef<'_>>, child_tag: &str) -> Vec<String> {
    let Some(element) = element else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse(child_tag) else {
        return Vec::new();
    };

    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| selector.matches(child))
        .map(|child| element_text(&child))
        .collect()
}

/// Concatenated text content of an element and its descendants
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}
