//! Small traversal helpers over `scraper` element trees.

use scraper::{ElementRef, Selector};

/// Compiles a selector literal.
///
/// Only called with string constants from the adapter field maps, so a parse
/// failure is a programming error.
pub(crate) fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid CSS selector literal")
}

/// Direct element children with the given tag name, in document order.
pub(crate) fn child_elements<'a>(element: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == tag)
        .collect()
}

pub(crate) fn first_match<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Concatenated descendant text, trimmed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Trimmed text of the first match, or `None` when absent or blank.
pub(crate) fn text_at(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    first_match(element, selector)
        .map(text_of)
        .filter(|text| !text.is_empty())
}

pub(crate) fn attr_at<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
    attr: &str,
) -> Option<&'a str> {
    first_match(element, selector).and_then(|el| el.value().attr(attr))
}
