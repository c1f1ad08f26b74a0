//! `@{key}` templates resolved through a [`SetTree`] of variables.
//!
//! A template's references become its children, each child's references its
//! grandchildren, and so on. Substitution then runs bottom-up so every
//! variable is fully resolved before its value is spliced into the parent.
//! A variable that references itself, directly or through others, is
//! rejected by the tree as a duplicate on its branch.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::arena::{NodeId, SetTree};
use crate::errors::TreeResult;

/// Key of the variable that holds the template being resolved.
pub const ROOT_KEY: &str = "root";

fn key_regex() -> &'static Regex {
    static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    KEY_REGEX.get_or_init(|| Regex::new(r"@\{([A-Za-z0-9]+)\}").expect("key pattern compiles"))
}

/// Keys referenced as `@{key}` in `text`, in order of appearance.
pub fn extract_keys(text: &str) -> Vec<String> {
    key_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The `@{key}` marker that refers to this variable.
    pub fn placeholder(&self) -> String {
        format!("@{{{}}}", self.key)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered set of known variables. Lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    variables: Vec<Variable>,
}

impl Dictionary {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    pub fn insert(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.variables.iter().find(|variable| variable.key == key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    /// Variables referenced by `variable`'s value. Unknown keys are skipped,
    /// repeated references are kept.
    pub fn references(&self, variable: &Variable) -> Vec<Variable> {
        extract_keys(&variable.value)
            .iter()
            .filter_map(|key| self.get(key))
            .cloned()
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| Variable::new(key, value))
                .collect(),
        )
    }
}

/// Replaces every `@{child.key}` in the parent's value with the child's value.
pub fn substitute(parent: &mut Variable, child: &Variable) {
    parent.value = parent.value.replace(&child.placeholder(), &child.value);
}

/// Rebuilds the reference tree below `node` from `dictionary`.
#[instrument(level = "debug", skip(tree, dictionary))]
pub fn expand(
    tree: &mut SetTree<Variable>,
    node: NodeId,
    dictionary: &Dictionary,
) -> TreeResult<()> {
    tree.regenerate(node, |_, variable| dictionary.references(variable))?;
    debug!(nodes = tree.iter_preorder(node).count(), "expanded references");
    Ok(())
}

/// Substitutes bottom-up and returns the resolved value of `node`.
///
/// Values in the tree are rewritten in place.
#[instrument(level = "debug", skip(tree))]
pub fn build(tree: &mut SetTree<Variable>, node: NodeId) -> String {
    tree.iterate_pairs_mut(node, substitute);
    tree.value(node)
        .map(|variable| variable.value.clone())
        .unwrap_or_default()
}

/// [`expand`] followed by [`build`].
pub fn resolve(
    tree: &mut SetTree<Variable>,
    node: NodeId,
    dictionary: &Dictionary,
) -> TreeResult<String> {
    expand(tree, node, dictionary)?;
    Ok(build(tree, node))
}

/// Resolves a standalone template string.
pub fn render(template: &str, dictionary: &Dictionary) -> TreeResult<String> {
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, template));
    let root = tree.root();
    resolve(&mut tree, root, dictionary)
}
