//! Removal of non-content markup from extracted article HTML.
//!
//! Operates on a parsed tree, never on the raw string: text that merely
//! looks like a tag must survive, and nested or unclosed markup must not be
//! corrupted.

use kuchiki::NodeRef;
use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;

/// Elements that never carry article content.
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "iframe", "link", "aside"];

/// Strip boilerplate elements and comments, preserving everything else
/// verbatim. Idempotent.
pub fn sanitize(html: &str) -> String {
    let document = kuchiki::parse_html().one(html);

    for selector in STRIPPED_ELEMENTS {
        remove_all(&document, selector);
    }
    remove_comments(&document);

    match document.select_first("body") {
        Ok(body) => serialize_children(body.as_node()),
        Err(()) => serialize_children(&document),
    }
}

fn remove_all(document: &NodeRef, selector: &str) {
    // Collect before detaching: detaching the iterator's current node would
    // sever the traversal links it advances along.
    let matches: Vec<NodeRef> = document
        .select(selector)
        .map(|nodes| nodes.map(|m| m.as_node().clone()).collect())
        .unwrap_or_default();
    for node in matches {
        node.detach();
    }
}

fn remove_comments(document: &NodeRef) {
    let comments: Vec<NodeRef> = document
        .descendants()
        .comments()
        .map(|c| c.as_node().clone())
        .collect();
    for node in comments {
        node.detach();
    }
}

/// Inner HTML of a node: its children serialized in document order.
pub fn serialize_children(node: &NodeRef) -> String {
    let mut out = Vec::new();
    for child in node.children() {
        // Writing to a Vec cannot fail.
        let _ = child.serialize(&mut out);
    }
    String::from_utf8_lossy(&out).into_owned()
}
