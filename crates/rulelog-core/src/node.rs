//! Interned term values
//!
//! `Node` is the default, external representation of a constant: IRIs,
//! prefixed names, quoted literals and plain identifiers all become
//! interned strings. Engine code never depends on `Node` directly; it is
//! generic over [`TermValue`].

use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref NODE_POOL: RwLock<HashSet<Arc<str>>> = RwLock::new(HashSet::new());
}

/// Bound shared by every constant type the engines can run over.
pub trait TermValue: Clone + Eq + Hash + Ord + fmt::Debug + 'static {}

impl<T> TermValue for T where T: Clone + Eq + Hash + Ord + fmt::Debug + 'static {}

/// Interned string that reuses memory for identical values
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node(Arc<str>);

impl Node {
    /// Create a node, reusing the pooled allocation when one exists
    pub fn new(value: impl AsRef<str>) -> Self {
        let value = value.as_ref();

        {
            let pool = NODE_POOL.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(existing) = pool.get(value) {
                return Node(Arc::clone(existing));
            }
        }

        let mut pool = NODE_POOL.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = pool.get(value) {
            return Node(Arc::clone(existing));
        }
        let interned: Arc<str> = Arc::from(value);
        pool.insert(Arc::clone(&interned));
        Node(interned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the node holds a quoted literal (`"..."`)
    pub fn is_literal(&self) -> bool {
        self.0.len() >= 2 && self.0.starts_with('"') && self.0.ends_with('"')
    }

    /// True when both nodes share the same pooled allocation
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::new(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::new(s)
    }
}

impl From<&String> for Node {
    fn from(s: &String) -> Self {
        Node::new(s)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl Borrow<str> for Node {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Node::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_interning() {
        let n1 = Node::new("http://example.org/Dog");
        let n2 = Node::new(String::from("http://example.org/Dog"));
        assert_eq!(n1, n2);
        assert!(n1.ptr_eq(&n2));
    }

    #[test]
    fn test_node_len_and_empty() {
        assert_eq!(Node::new("hello").len(), 5);
        assert!(Node::new("").is_empty());
        assert!(!Node::new("x").is_empty());
    }

    #[test]
    fn test_node_literal_detection() {
        assert!(Node::new("\"abc\"").is_literal());
        assert!(!Node::new("abc").is_literal());
        assert!(!Node::new("\"").is_literal());
    }

    #[test]
    fn test_node_ordering() {
        let mut nodes = vec![Node::new("b"), Node::new("a"), Node::new("c")];
        nodes.sort();
        let names: Vec<&str> = nodes.iter().map(Node::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_node_serde() {
        let node = Node::new(":Animal");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, "\":Animal\"");
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
