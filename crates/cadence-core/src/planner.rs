//! Dependency-ordered release planning
//!
//! Orders packages so that every package is published after the packages it
//! depends on. A cycle reached through a required dependency aborts the plan.
//! A cycle reached through an optional or development dependency is tolerated
//! when it runs through the package currently being expanded; that edge is
//! dropped and the package is placed after its remaining dependencies. Any
//! other cycle aborts the plan.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Kind of dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Must be published first, cycles are fatal
    Required,
    /// Optional (peer-like) dependency
    Optional,
    /// Needed only for development
    Development,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
            Self::Development => write!(f, "development"),
        }
    }
}

/// A plannable item: a name plus three independent dependency lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyItem {
    /// Package name
    pub name: String,
    /// Required dependencies
    #[serde(default)]
    pub required: Vec<String>,
    /// Optional dependencies
    #[serde(default)]
    pub optional: Vec<String>,
    /// Development dependencies
    #[serde(default)]
    pub development: Vec<String>,
}

impl DependencyItem {
    /// Create an item without dependencies
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add required dependencies
    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add optional dependencies
    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add development dependencies
    pub fn development<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.development.extend(names.into_iter().map(Into::into));
        self
    }

    /// All edges, required first, each list in name order
    fn edges(&self) -> Vec<(&str, DependencyKind)> {
        let mut edges = Vec::new();
        for (names, kind) in [
            (&self.required, DependencyKind::Required),
            (&self.optional, DependencyKind::Optional),
            (&self.development, DependencyKind::Development),
        ] {
            let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            sorted.dedup();
            edges.extend(sorted.into_iter().map(|name| (name, kind)));
        }
        edges
    }
}

/// A dependency cycle as a contiguous path of package names.
///
/// The last name depends on the first. Serializes as the bare name list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle {
    pub path: Vec<String>,
}

impl Cycle {
    /// Create a cycle from its path
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a package is part of the cycle
    pub fn contains(&self, name: &str) -> bool {
        self.path.iter().any(|n| n == name)
    }

    /// Names along the cycle
    pub fn names(&self) -> &[String] {
        &self.path
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join(" -> "))?;
        if let Some(first) = self.path.first() {
            write!(f, " -> {}", first)?;
        }
        Ok(())
    }
}

/// Outcome of planning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlanResult {
    /// Every item appears after all in-set dependencies it has
    Sorted { order: Vec<String> },
    /// Planning aborted on an unresolvable cycle
    Circular { cycle: Cycle },
}

impl PlanResult {
    /// The publish order, if planning succeeded
    pub fn into_order(self) -> Option<Vec<String>> {
        match self {
            Self::Sorted { order } => Some(order),
            Self::Circular { .. } => None,
        }
    }

    /// Whether planning succeeded
    pub fn is_sorted(&self) -> bool {
        matches!(self, Self::Sorted { .. })
    }
}

/// Names already placed, in placement order.
///
/// Local to one planning run; never shared across runs.
#[derive(Debug, Default)]
struct Placement {
    order: Vec<String>,
    placed: HashSet<String>,
}

impl Placement {
    fn contains(&self, name: &str) -> bool {
        self.placed.contains(name)
    }

    fn place(&mut self, name: &str) {
        if self.placed.insert(name.to_string()) {
            self.order.push(name.to_string());
        }
    }
}

/// Compute a publish order for the given items
#[instrument(skip(items), fields(item_count = items.len()))]
pub fn plan_release_order(items: &[DependencyItem]) -> PlanResult {
    let planner = Planner::new(items);
    let mut placement = Placement::default();

    for &name in planner.items.keys() {
        let mut stack = Vec::new();
        if let Err(cycle) = planner.visit(name, &mut stack, &mut placement) {
            warn!(cycle = %cycle, "circular dependency detected");
            return PlanResult::Circular { cycle };
        }
    }

    info!(count = placement.order.len(), "release order planned");
    PlanResult::Sorted {
        order: placement.order,
    }
}

struct Planner<'a> {
    items: BTreeMap<&'a str, &'a DependencyItem>,
}

impl<'a> Planner<'a> {
    fn new(items: &'a [DependencyItem]) -> Self {
        // Later duplicates are ignored; manifests are merged before planning.
        let mut map = BTreeMap::new();
        for item in items {
            map.entry(item.name.as_str()).or_insert(item);
        }
        Self { items: map }
    }

    /// Depth-first post-order placement of `name` and its dependencies
    fn visit(
        &self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        placement: &mut Placement,
    ) -> Result<(), Cycle> {
        if placement.contains(name) {
            return Ok(());
        }
        let Some(&item) = self.items.get(name) else {
            return Ok(());
        };

        stack.push(name);
        let result = self.visit_dependencies(item, stack, placement);
        stack.pop();

        result?;
        debug!(package = name, "placed");
        placement.place(name);
        Ok(())
    }

    fn visit_dependencies(
        &self,
        item: &'a DependencyItem,
        stack: &mut Vec<&'a str>,
        placement: &mut Placement,
    ) -> Result<(), Cycle> {
        for (dep, kind) in item.edges() {
            let Some((&dep, _)) = self.items.get_key_value(dep) else {
                continue;
            };
            if placement.contains(dep) {
                continue;
            }

            let outcome = match stack.iter().position(|n| *n == dep) {
                Some(start) => Err(Cycle::new(stack[start..].iter().copied())),
                None => self.visit(dep, stack, placement),
            };

            if let Err(cycle) = outcome {
                if Self::tolerates(&item.name, kind, &cycle) {
                    debug!(
                        package = %item.name,
                        dependency = dep,
                        kind = %kind,
                        cycle = %cycle,
                        "dropping cycle through current package"
                    );
                    continue;
                }
                return Err(cycle);
            }
        }
        Ok(())
    }

    /// A non-required edge may drop a cycle that runs through the current item
    fn tolerates(current: &str, edge: DependencyKind, cycle: &Cycle) -> bool {
        edge != DependencyKind::Required && cycle.contains(current)
    }
}
