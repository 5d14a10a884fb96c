//! Rules and rule sets

use crate::error::RuleError;
use crate::node::TermValue;
use crate::relation::Rel;
use crate::rename::VarAlloc;
use crate::term::{Term, Var};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// One head relation derived from a conjunction of body relations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule<T> {
    label: Option<String>,
    head: Rel<T>,
    body: Vec<Rel<T>>,
}

impl<T: TermValue> Rule<T> {
    pub fn new(head: Rel<T>, body: Vec<Rel<T>>) -> Self {
        Self {
            label: None,
            head,
            body,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn head(&self) -> &Rel<T> {
        &self.head
    }

    pub fn body(&self) -> &[Rel<T>] {
        &self.body
    }

    /// Head variables missing from every body relation
    pub fn unbound_head_variables(&self) -> Vec<&Var> {
        self.head
            .variables()
            .into_iter()
            .filter(|var| !self.body.iter().any(|rel| rel.terms().iter().any(|t| t.as_var() == Some(*var))))
            .collect()
    }

    /// Replace every variable with a fresh one from `alloc`
    ///
    /// One mapping is shared by the head and all body relations, so the
    /// renamed rule keeps its variable sharing.
    pub fn rename(&self, alloc: &mut VarAlloc) -> Rule<T> {
        let mut mapping: HashMap<Var, Var> = HashMap::new();
        let mut rename_rel = |rel: &Rel<T>| {
            rel.map_terms(|term| match term {
                Term::Var(var) => Term::Var(mapping.entry(var.clone()).or_insert_with(|| alloc.fresh()).clone()),
                other => other.clone(),
            })
        };

        let head = rename_rel(&self.head);
        let body = self.body.iter().map(&mut rename_rel).collect();
        Rule {
            label: self.label.clone(),
            head,
            body,
        }
    }
}

impl<T: TermValue + fmt::Display> Rule<T> {
    /// Reject rules whose head would not be ground after a body match
    pub fn check_safety(&self) -> Result<(), RuleError> {
        if self.head.terms().iter().any(Term::is_any) {
            return Err(RuleError::WildcardInHead { rule: self.to_string() });
        }
        if let Some(var) = self.unbound_head_variables().first() {
            return Err(RuleError::UnsafeRule {
                rule: self.to_string(),
                variable: var.to_string(),
            });
        }
        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.body.is_empty() {
            f.write_str(" <- ")?;
            for (i, rel) in self.body.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", rel)?;
            }
        }
        f.write_str(" .")
    }
}

/// Frozen, ordered collection of rules plus its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet<T> {
    rules: Arc<[Rule<T>]>,
    facts: Arc<[Rel<T>]>,
    base: Option<String>,
    prefixes: BTreeMap<String, String>,
    imports: Vec<String>,
}

impl<T: TermValue> RuleSet<T> {
    pub fn builder() -> RuleSetBuilder<T> {
        RuleSetBuilder::new()
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule<T>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Ground facts embedded in the rule text
    pub fn facts(&self) -> &[Rel<T>] {
        &self.facts
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }
}

impl<T: TermValue> Default for RuleSet<T> {
    fn default() -> Self {
        RuleSetBuilder::new().freeze()
    }
}

impl<'a, T: TermValue> IntoIterator for &'a RuleSet<T> {
    type Item = &'a Rule<T>;
    type IntoIter = std::slice::Iter<'a, Rule<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Incremental builder; [`RuleSetBuilder::build`] validates and freezes
#[derive(Debug, Clone)]
pub struct RuleSetBuilder<T> {
    rules: Vec<Rule<T>>,
    facts: Vec<Rel<T>>,
    base: Option<String>,
    prefixes: BTreeMap<String, String>,
    imports: Vec<String>,
}

impl<T: TermValue> RuleSetBuilder<T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            facts: Vec::new(),
            base: None,
            prefixes: BTreeMap::new(),
            imports: Vec::new(),
        }
    }

    pub fn add(&mut self, rule: Rule<T>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn add_all(&mut self, rules: impl IntoIterator<Item = Rule<T>>) -> &mut Self {
        self.rules.extend(rules);
        self
    }

    pub fn add_fact(&mut self, fact: Rel<T>) -> &mut Self {
        self.facts.push(fact);
        self
    }

    pub fn base(&mut self, base: impl Into<String>) -> &mut Self {
        self.base = Some(base.into());
        self
    }

    pub fn prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) -> &mut Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    pub fn import(&mut self, iri: impl Into<String>) -> &mut Self {
        self.imports.push(iri.into());
        self
    }

    /// Number of rules added so far
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule<T>> {
        self.rules.iter()
    }

    fn freeze(self) -> RuleSet<T> {
        RuleSet {
            rules: self.rules.into(),
            facts: self.facts.into(),
            base: self.base,
            prefixes: self.prefixes,
            imports: self.imports,
        }
    }
}

impl<T: TermValue + fmt::Display> RuleSetBuilder<T> {
    /// Validate every rule and fact, then freeze
    pub fn build(self) -> Result<RuleSet<T>, RuleError> {
        for rule in &self.rules {
            rule.check_safety()?;
        }
        if let Some(fact) = self.facts.iter().find(|fact| !fact.is_ground()) {
            return Err(RuleError::NonGroundFact { fact: fact.to_string() });
        }

        tracing::debug!(rules = self.rules.len(), facts = self.facts.len(), "rule set built");
        Ok(self.freeze())
    }
}

impl<T: TermValue> Default for RuleSetBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
