//! In-memory element tree

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::RwLock;

use super::Dom;
use super::ROOT_ID;
use crate::error::DomError;

/// An element to insert into a [`MemoryDom`].
///
/// # Example
///
/// ```
/// use dashboard_lib::dom::{Element, MemoryDom, ROOT_ID};
///
/// let dom = MemoryDom::new();
/// dom.append(ROOT_ID, Element::new("signup")).unwrap();
/// dom.append(
///     "signup",
///     Element::new("email")
///         .attr("name", "email")
///         .attr("data-validate", "required|email"),
/// )
/// .unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub value: String,
    pub text: String,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug)]
struct Node {
    element: Element,
    parent: Option<String>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: HashMap<String, Node>,
    /// Insertion order, which is document order for appended elements.
    order: Vec<String>,
}

impl Tree {
    fn is_descendant(&self, id: &str, ancestor: &str) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent.as_deref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(parent).and_then(|n| n.parent.as_deref());
        }
        false
    }
}

/// A thread-safe document held entirely in memory.
///
/// The root element (`:root`) always exists.
#[derive(Debug)]
pub struct MemoryDom {
    tree: RwLock<Tree>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut tree = Tree::default();
        tree.nodes.insert(
            ROOT_ID.to_string(),
            Node {
                element: Element::new(ROOT_ID),
                parent: None,
            },
        );
        tree.order.push(ROOT_ID.to_string());
        Self {
            tree: RwLock::new(tree),
        }
    }

    /// Appends `element` as the last child of `parent`.
    ///
    /// An element with the same id replaces the previous one in place.
    pub fn append(&self, parent: &str, element: Element) -> Result<(), DomError> {
        let mut tree = self.write();
        if !tree.nodes.contains_key(parent) {
            return Err(DomError::not_found(parent));
        }
        let id = element.id.clone();
        if !tree.nodes.contains_key(&id) {
            tree.order.push(id.clone());
        }
        tree.nodes.insert(
            id,
            Node {
                element,
                parent: Some(parent.to_string()),
            },
        );
        Ok(())
    }

    /// Returns a copy of an element.
    pub fn element(&self, id: &str) -> Option<Element> {
        self.read().nodes.get(id).map(|n| n.element.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tree> {
        self.tree
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tree> {
        self.tree
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_element<R>(&self, id: &str, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.read().nodes.get(id).map(|n| f(&n.element))
    }

    fn update<F>(&self, id: &str, f: F) -> Result<(), DomError>
    where
        F: FnOnce(&mut Element),
    {
        let mut tree = self.write();
        let node = tree
            .nodes
            .get_mut(id)
            .ok_or_else(|| DomError::not_found(id))?;
        f(&mut node.element);
        Ok(())
    }
}

impl Dom for MemoryDom {
    fn contains(&self, id: &str) -> bool {
        self.read().nodes.contains_key(id)
    }

    fn value(&self, id: &str) -> Option<String> {
        self.with_element(id, |e| e.value.clone())
    }

    fn set_value(&self, id: &str, value: &str) -> Result<(), DomError> {
        self.update(id, |e| e.value = value.to_string())
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.with_element(id, |e| e.attributes.get(name).cloned())
            .flatten()
    }

    fn set_attribute(&self, id: &str, name: &str, value: &str) -> Result<(), DomError> {
        self.update(id, |e| {
            e.attributes.insert(name.to_string(), value.to_string());
        })
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.with_element(id, |e| e.classes.contains(class))
            .unwrap_or(false)
    }

    fn add_classes(&self, id: &str, classes: &[&str]) -> Result<(), DomError> {
        self.update(id, |e| {
            for class in classes {
                e.classes.insert(class.to_string());
            }
        })
    }

    fn remove_classes(&self, id: &str, classes: &[&str]) -> Result<(), DomError> {
        self.update(id, |e| {
            for class in classes {
                e.classes.remove(*class);
            }
        })
    }

    fn text(&self, id: &str) -> Option<String> {
        self.with_element(id, |e| e.text.clone())
    }

    fn set_text(&self, id: &str, text: &str) -> Result<(), DomError> {
        self.update(id, |e| e.text = text.to_string())
    }

    fn descendants_with_attribute(&self, ancestor: &str, attribute: &str) -> Option<Vec<String>> {
        let tree = self.read();
        if !tree.nodes.contains_key(ancestor) {
            return None;
        }
        let ids = tree
            .order
            .iter()
            .filter(|id| {
                tree.nodes
                    .get(id.as_str())
                    .is_some_and(|n| n.element.attributes.contains_key(attribute))
                    && tree.is_descendant(id, ancestor)
            })
            .cloned()
            .collect();
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_exists() {
        let dom = MemoryDom::new();
        assert!(dom.contains(ROOT_ID));
    }

    #[test]
    fn test_append_to_missing_parent() {
        let dom = MemoryDom::new();
        assert_eq!(
            dom.append("nope", Element::new("x")),
            Err(DomError::not_found("nope"))
        );
    }

    #[test]
    fn test_descendants_in_document_order() {
        let dom = MemoryDom::new();
        dom.append(ROOT_ID, Element::new("form")).unwrap();
        dom.append("form", Element::new("group")).unwrap();
        dom.append("group", Element::new("b").attr("data-validate", "required"))
            .unwrap();
        dom.append("form", Element::new("a").attr("data-validate", "email"))
            .unwrap();
        dom.append("form", Element::new("plain")).unwrap();
        dom.append(ROOT_ID, Element::new("outside").attr("data-validate", "required"))
            .unwrap();

        assert_eq!(
            dom.descendants_with_attribute("form", "data-validate"),
            Some(vec!["b".to_string(), "a".to_string()])
        );
        assert_eq!(dom.descendants_with_attribute("missing", "data-validate"), None);
    }

    #[test]
    fn test_toggle_class() {
        let dom = MemoryDom::new();
        dom.toggle_class(ROOT_ID, "dark", true).unwrap();
        assert!(dom.has_class(ROOT_ID, "dark"));
        dom.toggle_class(ROOT_ID, "dark", false).unwrap();
        assert!(!dom.has_class(ROOT_ID, "dark"));
    }

    #[test]
    fn test_mutating_missing_element_fails() {
        let dom = MemoryDom::new();
        assert!(dom.set_text("ghost", "boo").is_err());
        assert_eq!(dom.text("ghost"), None);
    }
}
