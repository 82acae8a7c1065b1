//! Kind -> concrete fragment decoding
//!
//!     The model answers with a symbolic kind string; this module turns it
//!     into the minimal concrete subtree that kind stands for. Containers
//!     come with their delimiter tokens already in place (a BLOCK carries
//!     its braces from birth), so later splices land inside them.
//!
//!     The registry is closed: a kind either has a rule, is explicitly
//!     listed as unsupported, or is unknown. AFTER_LAST is reserved as the
//!     stop signal and never decodes to a fragment.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use treepath_core::kind::AFTER_LAST_KIND;
use treepath_core::tree::{NodeCategory, NodeId, SourceTree};

use crate::error::{DecodeError, RegistryError};

/// What a predicted kind decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A detached fragment was created in the tree; splice its root.
    Fragment(NodeId),
    /// The AFTER_LAST stop signal: close the open node instead.
    Stop,
}

/// A delimiter token, tag and text.
type Delimiter = (&'static str, &'static str);

#[derive(Debug, Clone, Copy)]
enum RuleEntry {
    /// A single childless element node.
    Bare,
    /// An element born with its opening and closing delimiter tokens.
    Delimited { open: Delimiter, close: Delimiter },
    /// Known to the host language but not synthesizable here.
    Unsupported,
}

/// Closed table of synthesis rules.
#[derive(Debug, Default)]
pub struct KindRegistry {
    rules: BTreeMap<String, RuleEntry>,
}

impl KindRegistry {
    pub fn new() -> Self {
        KindRegistry::default()
    }

    pub fn register_bare(&mut self, kind: &str) -> Result<(), RegistryError> {
        self.insert(kind, RuleEntry::Bare)
    }

    pub fn register_delimited(
        &mut self,
        kind: &str,
        open: Delimiter,
        close: Delimiter,
    ) -> Result<(), RegistryError> {
        self.insert(kind, RuleEntry::Delimited { open, close })
    }

    pub fn register_unsupported(&mut self, kind: &str) -> Result<(), RegistryError> {
        self.insert(kind, RuleEntry::Unsupported)
    }

    fn insert(&mut self, kind: &str, entry: RuleEntry) -> Result<(), RegistryError> {
        if kind == AFTER_LAST_KIND {
            return Err(RegistryError::ReservedKind(kind.to_string()));
        }
        if self.rules.contains_key(kind) {
            return Err(RegistryError::DuplicateKind(kind.to_string()));
        }
        self.rules.insert(kind.to_string(), entry);
        Ok(())
    }

    /// Decodes a predicted kind. Suffixed kinds ("REFERENCE_EXPRESSION x",
    /// "INTEGER_CONSTANT 100") carry their text past the first space.
    pub fn decode(&self, tree: &mut SourceTree, kind: &str) -> Result<DecodeOutcome, DecodeError> {
        if kind == AFTER_LAST_KIND {
            return Ok(DecodeOutcome::Stop);
        }

        let (tag, text) = match kind.split_once(' ') {
            Some((tag, text)) => (tag, text.trim_matches('"')),
            None => (kind, ""),
        };

        let entry = match self.rules.get(tag) {
            Some(RuleEntry::Unsupported) => {
                return Err(DecodeError::UnsupportedKind(kind.to_string()))
            }
            Some(&entry) => entry,
            None => return Err(DecodeError::UnknownKind(kind.to_string())),
        };

        let node = tree.new_detached(tag, text, NodeCategory::Element);
        if let RuleEntry::Delimited { open, close } = entry {
            let opening = tree.new_detached(open.0, open.1, NodeCategory::Token);
            tree.push_child(node, opening);
            let closing = tree.new_detached(close.0, close.1, NodeCategory::Token);
            tree.push_child(node, closing);
        }
        Ok(DecodeOutcome::Fragment(node))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

/// The demo grammar every session starts from. Hosts with a richer
/// language register their own rules instead.
pub fn default_registry() -> KindRegistry {
    let mut registry = KindRegistry::new();
    for tag in [
        "FILE",
        "CLASS",
        "FUN",
        "WHILE",
        "IF",
        "CONDITION",
        "THEN",
        "ELSE",
        "BODY",
        "CALL_EXPRESSION",
        "VALUE_ARGUMENT",
        "BINARY_EXPRESSION",
        "REFERENCE_EXPRESSION",
        "OPERATION_REFERENCE",
        "INTEGER_CONSTANT",
        "PROPERTY",
    ] {
        registry
            .register_bare(tag)
            .expect("static table has no duplicates");
    }

    let brace = (("LBRACE", "{"), ("RBRACE", "}"));
    let paren = (("LPAR", "("), ("RPAR", ")"));
    for (tag, (open, close)) in [
        ("BLOCK", brace),
        ("CLASS_BODY", brace),
        ("VALUE_PARAMETER_LIST", paren),
        ("VALUE_ARGUMENT_LIST", paren),
    ] {
        registry
            .register_delimited(tag, open, close)
            .expect("static table has no duplicates");
    }

    for tag in ["LAMBDA_EXPRESSION", "OBJECT_LITERAL", "WHEN"] {
        registry
            .register_unsupported(tag)
            .expect("static table has no duplicates");
    }
    registry
}

/// Shared instance of [`default_registry`].
pub static DEFAULT_REGISTRY: Lazy<KindRegistry> = Lazy::new(default_registry);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BLOCK", &["LBRACE", "RBRACE"])]
    #[case("CLASS_BODY", &["LBRACE", "RBRACE"])]
    #[case("VALUE_PARAMETER_LIST", &["LPAR", "RPAR"])]
    #[case("VALUE_ARGUMENT_LIST", &["LPAR", "RPAR"])]
    fn container_fragments_carry_their_delimiters(
        #[case] kind: &str,
        #[case] expected: &[&str],
    ) {
        let mut tree = SourceTree::with_root("FILE");
        let outcome = default_registry()
            .decode(&mut tree, kind)
            .expect("containers have rules");
        let DecodeOutcome::Fragment(node) = outcome else {
            panic!("expected a fragment");
        };

        let tags: Vec<_> = tree.children(node).iter().map(|&c| tree.tag(c)).collect();
        assert_eq!(tags, expected);
        assert_eq!(tree.parent(node), None);
    }

    #[test]
    fn suffixed_kind_carries_its_text() {
        let mut tree = SourceTree::with_root("FILE");
        let outcome = default_registry()
            .decode(&mut tree, "INTEGER_CONSTANT 100")
            .expect("INTEGER_CONSTANT has a rule");
        let DecodeOutcome::Fragment(node) = outcome else {
            panic!("expected a fragment");
        };
        assert_eq!(tree.tag(node), "INTEGER_CONSTANT");
        assert_eq!(tree.text(node), "100");
    }

    #[test]
    fn quoted_suffix_is_unwrapped() {
        let mut tree = SourceTree::with_root("FILE");
        let outcome = default_registry()
            .decode(&mut tree, "REFERENCE_EXPRESSION \"x\"")
            .expect("has a rule");
        let DecodeOutcome::Fragment(node) = outcome else {
            panic!("expected a fragment");
        };
        assert_eq!(tree.text(node), "x");
    }

    #[test]
    fn after_last_is_the_stop_signal() {
        let mut tree = SourceTree::with_root("FILE");
        let outcome = default_registry()
            .decode(&mut tree, AFTER_LAST_KIND)
            .expect("stop is not an error");
        assert_eq!(outcome, DecodeOutcome::Stop);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn unsupported_and_unknown_are_distinct_errors() {
        let mut tree = SourceTree::with_root("FILE");
        let registry = default_registry();
        assert!(matches!(
            registry.decode(&mut tree, "WHEN"),
            Err(DecodeError::UnsupportedKind(_))
        ));
        assert!(matches!(
            registry.decode(&mut tree, "GIBBERISH"),
            Err(DecodeError::UnknownKind(_))
        ));
    }

    #[test]
    fn kinds_lists_every_rule_but_never_the_stop_signal() {
        let registry = default_registry();
        let kinds: Vec<&str> = registry.kinds().collect();
        assert!(kinds.contains(&"WHILE"));
        assert!(kinds.contains(&"BLOCK"));
        assert!(kinds.contains(&"WHEN"));
        assert!(!kinds.contains(&AFTER_LAST_KIND));
        assert_eq!(kinds.len(), 23);
    }

    #[test]
    fn after_last_cannot_be_registered() {
        let mut registry = KindRegistry::new();
        assert!(matches!(
            registry.register_unsupported(AFTER_LAST_KIND),
            Err(RegistryError::ReservedKind(_))
        ));
    }
}
