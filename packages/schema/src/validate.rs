use crate::error::RefError;
use crate::types::{ComponentId, ComponentNode, PageDocument};
use crate::visitor::{walk_document, walk_node, Visitor};

impl PageDocument {
    /// Check the structural invariant of the tree: every ref resolves and no
    /// node contains itself. Errors are reported in walk order.
    pub fn validate(&self) -> Vec<RefError> {
        let mut validator = RefValidator::default();
        walk_document(&mut validator, self);
        validator.errors
    }
}

#[derive(Default)]
struct RefValidator {
    path: Vec<ComponentId>,
    errors: Vec<RefError>,
}

impl Visitor for RefValidator {
    fn visit_node(&mut self, doc: &PageDocument, node: &ComponentNode) {
        if self.path.contains(&node.id) {
            self.errors.push(RefError::Cycle { id: node.id.clone() });
            return;
        }
        self.path.push(node.id.clone());
        walk_node(self, doc, node);
        self.path.pop();
    }

    fn visit_dangling(&mut self, id: &str, parent: Option<&ComponentNode>) {
        self.errors.push(RefError::Dangling {
            id: id.to_string(),
            parent: parent.map(|p| p.id.clone()),
        });
    }
}
