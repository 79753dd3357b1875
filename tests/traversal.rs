mod common;

use std::collections::HashSet;

use rstest::rstest;
use soli_graph::ontology::{traverse, Category, ClassStore, InMemoryClassStore, Iri};

use common::{area_of_law_store, class_with_children, iri, locals, service};

fn lattice() -> InMemoryClassStore {
    InMemoryClassStore::new([
        class_with_children("R1", &["A", "B"]),
        class_with_children("R2", &["B", "C"]),
        class_with_children("A", &["D", "Missing"]),
        class_with_children("B", &["D", "E"]),
        class_with_children("C", &["R1"]),
        class_with_children("D", &["F"]),
        class_with_children("E", &["B"]),
        class_with_children("F", &[]),
    ])
}

/// Shortest `parent_class_of` hop count from any root.
fn hop_distance(store: &InMemoryClassStore, roots: &[Iri], target: &Iri) -> Option<usize> {
    let mut frontier: Vec<Iri> = roots.iter().filter(|r| store.contains(r).unwrap()).cloned().collect();
    let mut seen: HashSet<Iri> = frontier.iter().cloned().collect();
    let mut depth = 0;
    while !frontier.is_empty() {
        if frontier.contains(target) {
            return Some(depth);
        }
        let mut next = Vec::new();
        for node in &frontier {
            if let Some(class) = store.get(node).unwrap() {
                for child in &class.parent_class_of {
                    if store.contains(child).unwrap() && seen.insert(child.clone()) {
                        next.push(child.clone());
                    }
                }
            }
        }
        frontier = next;
        depth += 1;
    }
    None
}

#[rstest]
fn results_are_unique_and_within_depth(#[values(0, 1, 2, 3, 4, 8)] depth: usize) {
    let store = lattice();
    let roots = [iri("R1"), iri("R2"), iri("Nope")];
    let result = traverse(&store, &roots, depth).expect("traverse");

    let unique: HashSet<_> = result.iter().map(|class| class.iri.clone()).collect();
    assert_eq!(unique.len(), result.len());
    for class in &result {
        let distance = hop_distance(&store, &roots, &class.iri).expect("reachable");
        assert!(distance <= depth, "{} at {distance} > {depth}", class.iri);
    }
}

#[rstest]
fn results_grow_with_depth(#[values(0, 1, 2, 3)] depth: usize) {
    let store = lattice();
    let roots = [iri("R2")];
    let shallow: HashSet<_> = traverse(&store, &roots, depth)
        .expect("traverse")
        .iter()
        .map(|class| class.iri.clone())
        .collect();
    let deep: HashSet<_> = traverse(&store, &roots, depth + 1)
        .expect("traverse")
        .iter()
        .map(|class| class.iri.clone())
        .collect();
    assert!(shallow.is_subset(&deep));
}

#[test]
fn two_node_cycle_emits_each_once() {
    let store = InMemoryClassStore::new([
        class_with_children("A", &["B"]),
        class_with_children("B", &["A"]),
    ]);
    let result = traverse(&store, &[iri("A")], 100).expect("traverse");
    assert_eq!(locals(&result), ["A", "B"]);
}

#[test]
fn area_of_law_depth_one_lists_root_and_children() {
    let service = service(area_of_law_store());
    let result = service
        .categorize(Category::AreaOfLaw, 1)
        .expect("categorize");
    assert_eq!(locals(&result), ["AreaOfLaw", "ContractLaw", "TaxLaw"]);
}

#[test]
fn every_category_is_traversable() {
    let service = service(area_of_law_store());
    for category in Category::ALL {
        let result = service.categorize(*category, 3).expect("categorize");
        if *category == Category::AreaOfLaw {
            assert_eq!(result.len(), 4);
        } else {
            assert!(result.is_empty(), "{category} should have no classes");
        }
    }
}
