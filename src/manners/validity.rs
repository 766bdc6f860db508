//! Validity checks for feed-fetched and stored content resources.

use crate::content::ContentDoc;

/// Whether a feed resource can be stored or used to compose a post.
pub fn is_valid_feed_content_item(title: &str, origin: &str, link: &str) -> bool {
    !title.is_empty() && !origin.is_empty() && !link.is_empty()
}

/// Whether a document read back from the content store is usable.
///
/// An absent document, or one missing any of the three fields, is invalid.
pub fn is_valid_content_doc(doc: Option<&ContentDoc>) -> bool {
    let Some(doc) = doc else {
        return false;
    };
    match (&doc.title, &doc.origin, &doc.original_link) {
        (Some(title), Some(origin), Some(link)) => is_valid_feed_content_item(title, origin, link),
        _ => false,
    }
}
