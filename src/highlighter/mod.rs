//! Vocabulary highlighting over a parsed document tree.
//!
//! Matches are found in text nodes only. Attribute values, tag names and
//! the element structure are never touched, so arbitrary article markup
//! survives annotation intact.

use std::collections::HashMap;

use html5ever::{LocalName, QualName, local_name, namespace_url, ns};
use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::{Attribute, ExpandedName, NodeRef};
use regex::Regex;

use crate::analysis::types::VocabularyWord;
use crate::sanitizer::serialize_children;

/// Class carried by every annotation element, for the rendering layer.
pub const ANNOTATION_CLASS: &str = "vocab-term";

/// The annotated document, ready for display.
pub struct RenderTree {
    document: NodeRef,
}

impl RenderTree {
    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// Serialized body content of the tree.
    pub fn to_html(&self) -> String {
        match self.document.select_first("body") {
            Ok(body) => serialize_children(body.as_node()),
            Err(()) => serialize_children(&self.document),
        }
    }

    /// Concatenated text content, used as language-model input.
    pub fn text(&self) -> String {
        self.document.text_contents()
    }
}

/// Parse `html` and wrap every whole-word vocabulary occurrence in an
/// annotation element. An empty vocabulary is a pure passthrough parse.
pub fn render(html: &str, vocabulary: &[VocabularyWord]) -> RenderTree {
    let document = kuchiki::parse_html().one(html);

    let Some(pattern) = vocabulary_pattern(vocabulary) else {
        return RenderTree { document };
    };
    let lookup: HashMap<String, &VocabularyWord> = vocabulary
        .iter()
        .filter(|v| !v.word.trim().is_empty())
        .map(|v| (v.word.to_lowercase(), v))
        .collect();

    // Snapshot the text nodes first: annotation replaces nodes mid-walk.
    let text_nodes: Vec<_> = document.descendants().text_nodes().collect();
    for text_node in text_nodes {
        let text = text_node.borrow().clone();
        if text.trim().is_empty() {
            continue;
        }
        if in_unrenderable_context(text_node.as_node()) {
            continue;
        }
        annotate_text_node(text_node.as_node(), &text, &pattern, &lookup);
    }

    RenderTree { document }
}

/// One case-insensitive, word-boundary-anchored alternation over the whole
/// vocabulary. Longer words first so the alternation cannot shadow them.
/// `None` when there is nothing to match.
fn vocabulary_pattern(vocabulary: &[VocabularyWord]) -> Option<Regex> {
    let mut words: Vec<String> = vocabulary
        .iter()
        .map(|v| v.word.to_lowercase())
        .filter(|w| !w.trim().is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    words.dedup();

    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).ok()
}

/// Elements whose text can hold no markup.
fn in_unrenderable_context(node: &NodeRef) -> bool {
    node.ancestors().any(|a| {
        a.as_element()
            .is_some_and(|el| el.name.local.as_ref() == "title")
    })
}

fn annotate_text_node(
    node: &NodeRef,
    text: &str,
    pattern: &Regex,
    lookup: &HashMap<String, &VocabularyWord>,
) {
    let mut replacements: Vec<NodeRef> = Vec::new();
    let mut consumed = 0;

    for found in pattern.find_iter(text) {
        let Some(entry) = lookup.get(&found.as_str().to_lowercase()) else {
            continue;
        };
        if found.start() > consumed {
            replacements.push(NodeRef::new_text(&text[consumed..found.start()]));
        }
        replacements.push(annotation_element(found.as_str(), entry));
        consumed = found.end();
    }

    if replacements.is_empty() {
        return;
    }
    if consumed < text.len() {
        replacements.push(NodeRef::new_text(&text[consumed..]));
    }

    for replacement in replacements {
        node.insert_before(replacement);
    }
    node.detach();
}

/// `<mark class="vocab-term" data-term=... data-definition=...
/// data-usage-example=...>` around the matched token, keeping the source
/// text's casing as the visible content.
fn annotation_element(surface: &str, entry: &VocabularyWord) -> NodeRef {
    let element = NodeRef::new_element(
        QualName::new(None, ns!(html), local_name!("mark")),
        vec![
            attribute("class", ANNOTATION_CLASS),
            attribute("data-term", &entry.word),
            attribute("data-definition", &entry.definition),
            attribute("data-usage-example", &entry.usage_example),
        ],
    );
    element.append(NodeRef::new_text(surface));
    element
}

fn attribute(name: &str, value: &str) -> (ExpandedName, Attribute) {
    (
        ExpandedName::new(ns!(), LocalName::from(name)),
        Attribute {
            prefix: None,
            value: value.to_string(),
        },
    )
}
