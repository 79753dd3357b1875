mod common;

use soli_graph::ontology::{
    ClassStore, InMemoryClassStore, NeighborGraphBuilder, Relationship,
};

use common::{class, iri};

fn focal_store() -> InMemoryClassStore {
    let mut focal = class("Focal").with_definition("The class under study");
    focal.add_parent(iri("Parent"));
    focal.add_parent(iri("GhostParent"));
    focal.add_child(iri("Child"));
    focal.add_child(iri("Shared"));
    focal.add_see_also(iri("Shared"));
    focal.add_see_also(iri("Related"));
    let focal = focal.with_is_defined_by(iri("Source"));

    InMemoryClassStore::new([
        focal,
        class("Parent"),
        class("Child"),
        class("Shared"),
        class("Related"),
        class("Source"),
    ])
}

#[test]
fn graph_has_exactly_one_self_node() {
    let store = focal_store();
    let focal = store.get(&iri("Focal")).unwrap().unwrap();
    let graph = NeighborGraphBuilder::new(&store).build(&focal).unwrap();

    let selves: Vec<_> = graph
        .nodes
        .iter()
        .filter(|node| node.relationship == Relationship::Itself)
        .collect();
    assert_eq!(selves.len(), 1);
    assert_eq!(selves[0].id, iri("Focal"));
    assert_eq!(selves[0].description, "Focal - The class under study");
}

#[test]
fn dangling_relations_produce_nothing() {
    let store = focal_store();
    let focal = store.get(&iri("Focal")).unwrap().unwrap();
    let graph = NeighborGraphBuilder::new(&store).build(&focal).unwrap();

    assert!(graph.node(&iri("GhostParent")).is_none());
    assert!(graph
        .edges
        .iter()
        .all(|edge| edge.source != iri("GhostParent") && edge.target != iri("GhostParent")));
}

#[test]
fn first_relationship_tag_wins() {
    let store = focal_store();
    let focal = store.get(&iri("Focal")).unwrap().unwrap();
    let graph = NeighborGraphBuilder::new(&store).build(&focal).unwrap();

    let shared = graph.node(&iri("Shared")).expect("shared node");
    assert_eq!(shared.relationship, Relationship::ParentClassOf);
    assert_eq!(graph.nodes.len(), 6);
}

#[test]
fn edges_follow_relation_direction() {
    let store = focal_store();
    let focal = store.get(&iri("Focal")).unwrap().unwrap();
    let graph = NeighborGraphBuilder::new(&store).build(&focal).unwrap();

    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|edge| {
            (
                edge.source.local_name(),
                edge.target.local_name(),
                edge.relationship,
            )
        })
        .collect();
    assert_eq!(
        edges,
        [
            ("Parent", "Focal", Relationship::SubClassOf),
            ("Focal", "Child", Relationship::ParentClassOf),
            ("Focal", "Shared", Relationship::ParentClassOf),
            ("Focal", "Shared", Relationship::SeeAlso),
            ("Focal", "Related", Relationship::SeeAlso),
            ("Focal", "Source", Relationship::IsDefinedBy),
        ]
    );
}

#[test]
fn graph_serializes_for_visualisation() {
    let store = InMemoryClassStore::new([
        {
            let mut focal = class("Focal");
            focal.add_parent(iri("Parent"));
            focal
        },
        class("Parent").with_definition("Broader class"),
    ]);
    let focal = store.get(&iri("Focal")).unwrap().unwrap();
    let graph = NeighborGraphBuilder::new(&store).build(&focal).unwrap();

    insta::assert_json_snapshot!(graph, @r###"
    {
      "nodes": [
        {
          "id": "https://soli.example.org/Focal",
          "label": "Focal",
          "description": "Focal",
          "relationship": "self"
        },
        {
          "id": "https://soli.example.org/Parent",
          "label": "Parent",
          "description": "Parent - Broader class",
          "relationship": "sub_class_of"
        }
      ],
      "edges": [
        {
          "source": "https://soli.example.org/Parent",
          "target": "https://soli.example.org/Focal",
          "type": "sub_class_of"
        }
      ]
    }
    "###);
}
