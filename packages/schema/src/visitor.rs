use crate::types::{ComponentNode, ComponentRef, PageDocument, Replacement, ReplacementKind};

/// Visitor pattern for traversing the component tree of a page
///
/// Default implementations walk the whole tree from `PageDocument::child`.
/// Override specific visit_* methods to act on nodes. The default walk
/// assumes an acyclic tree; run `PageDocument::validate` first.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &PageDocument) {
        walk_document(self, doc);
    }

    fn visit_ref(&mut self, doc: &PageDocument, component_ref: &ComponentRef, parent: Option<&ComponentNode>) {
        walk_ref(self, doc, component_ref, parent);
    }

    fn visit_node(&mut self, doc: &PageDocument, node: &ComponentNode) {
        walk_node(self, doc, node);
    }

    fn visit_text(&mut self, _text: &str) {
        // Leaf, nothing to walk
    }

    fn visit_replacement(&mut self, _replacement: &Replacement) {
        // Variable and module replacements are leaves
    }

    /// Called for refs whose id is missing from `componentIndexes`
    fn visit_dangling(&mut self, _id: &str, _parent: Option<&ComponentNode>) {}
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &PageDocument) {
    visitor.visit_ref(doc, &doc.child, None);
}

pub fn walk_ref<V: Visitor>(
    visitor: &mut V,
    doc: &PageDocument,
    component_ref: &ComponentRef,
    parent: Option<&ComponentNode>,
) {
    if component_ref.is_text {
        visitor.visit_text(&component_ref.current);
        return;
    }

    if let Some(replacement) = &component_ref.replacement {
        if replacement.kind != ReplacementKind::Component {
            visitor.visit_replacement(replacement);
            return;
        }
    }

    match doc.resolve(component_ref) {
        Ok(node) => visitor.visit_node(doc, node),
        Err(err) => visitor.visit_dangling(err.id(), parent),
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, doc: &PageDocument, node: &ComponentNode) {
    for child in &node.children {
        visitor.visit_ref(doc, child, Some(node));
    }
}
