use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{
    entities::OwlClass,
    repositories::{ClassStore, StoreError},
    value_objects::Iri,
};

/// Local relation graph around one focal class, ready for visualisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl NeighborGraph {
    /// Returns the node with the supplied id.
    #[must_use]
    pub fn node(&self, id: &Iri) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }
}

/// Describes a vertex in the neighbor graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: Iri,
    pub label: String,
    pub description: String,
    pub relationship: Relationship,
}

/// Directed relation between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub source: Iri,
    pub target: Iri,
    #[serde(rename = "type")]
    pub relationship: Relationship,
}

/// How a node relates to the focal class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[serde(rename = "self")]
    Itself,
    SubClassOf,
    ParentClassOf,
    SeeAlso,
    IsDefinedBy,
}

/// Builds [`NeighborGraph`]s by looking up a focal class's direct relations.
///
/// Relations are processed in a fixed order: `sub_class_of`,
/// `parent_class_of`, `see_also`, `is_defined_by`. A node keeps the tag of
/// the first relation that introduced it. Relations pointing at IRIs missing
/// from the store produce neither node nor edge.
pub struct NeighborGraphBuilder<'a, S>
where
    S: ClassStore + ?Sized,
{
    store: &'a S,
}

impl<'a, S> NeighborGraphBuilder<'a, S>
where
    S: ClassStore + ?Sized,
{
    /// Creates a new builder reading relation targets from `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Materialises the one-hop graph around `focal`.
    pub fn build(&self, focal: &OwlClass) -> Result<NeighborGraph, StoreError> {
        let mut graph = GraphAccumulator::default();
        graph.add_node(focal, Relationship::Itself);

        for parent in &focal.sub_class_of {
            self.link(&mut graph, parent, Relationship::SubClassOf, |target| {
                (target.clone(), focal.iri.clone())
            })?;
        }
        for child in &focal.parent_class_of {
            self.link(&mut graph, child, Relationship::ParentClassOf, |target| {
                (focal.iri.clone(), target.clone())
            })?;
        }
        for related in &focal.see_also {
            self.link(&mut graph, related, Relationship::SeeAlso, |target| {
                (focal.iri.clone(), target.clone())
            })?;
        }
        if let Some(definer) = &focal.is_defined_by {
            self.link(&mut graph, definer, Relationship::IsDefinedBy, |target| {
                (focal.iri.clone(), target.clone())
            })?;
        }

        Ok(graph.finish())
    }

    fn link(
        &self,
        graph: &mut GraphAccumulator,
        target: &Iri,
        relationship: Relationship,
        direction: impl FnOnce(&Iri) -> (Iri, Iri),
    ) -> Result<(), StoreError> {
        let Some(class) = self.store.get(target)? else {
            return Ok(());
        };
        graph.add_node(&class, relationship);
        let (source, target) = direction(&class.iri);
        graph.add_edge(GraphEdge {
            source,
            target,
            relationship,
        });
        Ok(())
    }
}

#[derive(Default)]
struct GraphAccumulator {
    nodes: Vec<GraphNode>,
    positions: HashMap<Iri, usize>,
    edges: Vec<GraphEdge>,
    seen_edges: HashSet<GraphEdge>,
}

impl GraphAccumulator {
    fn add_node(&mut self, class: &OwlClass, relationship: Relationship) {
        if self.positions.contains_key(&class.iri) {
            return;
        }
        self.positions.insert(class.iri.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            id: class.iri.clone(),
            label: class.display_label().to_string(),
            description: class.summary(),
            relationship,
        });
    }

    fn add_edge(&mut self, edge: GraphEdge) {
        if self.seen_edges.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn finish(self) -> NeighborGraph {
        NeighborGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
