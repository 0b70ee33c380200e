// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Topological ordering of resources that depend on each other.
//!
//! Resources reference the resources they depend on by name and, optionally,
//! namespace. [`sort`] returns every resource after all of its dependencies, or a
//! [`DependencyError::CircularDependency`] listing every cycle in the graph.
//!
//! The ordering is computed with Tarjan's strongly connected components algorithm,
//! using an explicit work stack instead of recursion so large graphs cannot overflow
//! the call stack. References to resources that are not part of the input are
//! ignored.
//!
//! # Example
//!
//! ```rust
//! use reconcile_status::dependency::{sort, DependencyNode, DependencyReference};
//! use reconcile_status::object::NamespacedName;
//!
//! let nodes = vec![
//!     DependencyNode::new(NamespacedName::new("apps", "frontend"))
//!         .depends_on(DependencyReference::new("backend")),
//!     DependencyNode::new(NamespacedName::new("apps", "backend")),
//! ];
//!
//! let ordered = sort(&nodes).unwrap();
//! assert_eq!(ordered[0].name, "backend");
//! assert_eq!(ordered[1].name, "frontend");
//! ```

use crate::errors::DependencyError;
use crate::object::NamespacedName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Reference from a resource to a resource it depends on.
///
/// A missing namespace defaults to the namespace of the depending resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
}

impl DependencyReference {
    /// A reference to `name` in the depending resource's namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// A reference to `name` in the given namespace.
    #[must_use]
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    fn resolve(&self, default_namespace: &str) -> NamespacedName {
        let namespace = self
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(default_namespace);
        NamespacedName::new(namespace, self.name.clone())
    }
}

/// A resource that can be ordered by its dependencies.
pub trait Dependent {
    /// Namespace and name of the resource.
    fn key(&self) -> NamespacedName;

    /// The resources this resource depends on.
    fn dependencies(&self) -> Vec<DependencyReference>;
}

/// A plain graph vertex, for callers that do not have a resource type at hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    #[serde(flatten)]
    pub key: NamespacedName,
    #[serde(default)]
    pub depends_on: Vec<DependencyReference>,
}

impl DependencyNode {
    #[must_use]
    pub fn new(key: NamespacedName) -> Self {
        Self {
            key,
            depends_on: Vec::new(),
        }
    }

    /// Add a dependency, returning the node.
    #[must_use]
    pub fn depends_on(mut self, reference: DependencyReference) -> Self {
        self.depends_on.push(reference);
        self
    }
}

impl Dependent for DependencyNode {
    fn key(&self) -> NamespacedName {
        self.key.clone()
    }

    fn dependencies(&self) -> Vec<DependencyReference> {
        self.depends_on.clone()
    }
}

/// Adjacency list over vertex indices.
struct Graph {
    vertices: Vec<NamespacedName>,
    edges: Vec<Vec<usize>>,
}

impl Graph {
    fn build<D: Dependent>(objects: &[D]) -> Self {
        let mut vertices: Vec<NamespacedName> = Vec::with_capacity(objects.len());
        let mut index_of: HashMap<NamespacedName, usize> = HashMap::with_capacity(objects.len());

        for obj in objects {
            let key = obj.key();
            if !index_of.contains_key(&key) {
                index_of.insert(key.clone(), vertices.len());
                vertices.push(key);
            }
        }

        let mut edges = vec![Vec::new(); vertices.len()];
        for obj in objects {
            let key = obj.key();
            let Some(&from) = index_of.get(&key) else {
                continue;
            };
            for reference in obj.dependencies() {
                if let Some(&to) = index_of.get(&reference.resolve(&key.namespace)) {
                    edges[from].push(to);
                }
            }
        }

        Self { vertices, edges }
    }

    /// Strongly connected components, dependencies before dependents.
    ///
    /// Members of each component are listed in the order they were visited.
    fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.vertices.len();
        let mut index: Vec<Option<usize>> = vec![None; n];
        let mut low_link = vec![0usize; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut next_index = 0usize;
        let mut components = Vec::new();

        for root in 0..n {
            if index[root].is_some() {
                continue;
            }

            // (vertex, position of the next edge to explore)
            let mut work: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(frame) = work.last_mut() {
                let (v, position) = *frame;

                if index[v].is_none() {
                    index[v] = Some(next_index);
                    low_link[v] = next_index;
                    next_index += 1;
                    stack.push(v);
                    on_stack[v] = true;
                }

                if let Some(&w) = self.edges[v].get(position) {
                    frame.1 += 1;
                    match index[w] {
                        None => work.push((w, 0)),
                        Some(w_index) if on_stack[w] => low_link[v] = low_link[v].min(w_index),
                        Some(_) => {}
                    }
                    continue;
                }

                work.pop();
                if let Some(&(parent, _)) = work.last() {
                    low_link[parent] = low_link[parent].min(low_link[v]);
                }

                if index[v] == Some(low_link[v]) {
                    let mut component = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    component.reverse();
                    components.push(component);
                }
            }
        }

        components
    }

    fn is_cycle(&self, component: &[usize]) -> bool {
        match component {
            [single] => self.edges[*single].contains(single),
            _ => true,
        }
    }
}

/// Order `objects` so that every object comes after the objects it depends on.
///
/// # Errors
///
/// Returns [`DependencyError::CircularDependency`] listing every group of objects
/// that depend on each other, including objects that depend on themselves. No
/// ordering is returned in that case.
pub fn sort<D: Dependent>(objects: &[D]) -> Result<Vec<NamespacedName>, DependencyError> {
    let graph = Graph::build(objects);
    let components = graph.strongly_connected_components();

    let cycles: Vec<Vec<NamespacedName>> = components
        .iter()
        .filter(|component| graph.is_cycle(component))
        .map(|component| {
            component
                .iter()
                .map(|&i| graph.vertices[i].clone())
                .collect()
        })
        .collect();

    if !cycles.is_empty() {
        debug!(cycles = cycles.len(), "Dependency graph contains cycles");
        return Err(DependencyError::CircularDependency { cycles });
    }

    let ordered: Vec<NamespacedName> = components
        .into_iter()
        .flatten()
        .map(|i| graph.vertices[i].clone())
        .collect();

    debug!(objects = ordered.len(), "Sorted dependency graph");
    Ok(ordered)
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod dependency_tests;
