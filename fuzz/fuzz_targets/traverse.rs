#![no_main]

use depgraph_core::{Graph, GraphError, HashGraph, build_order, find_cycles};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let graph: HashGraph<u8, ()> = data
        .chunks_exact(2)
        .map(|pair| (pair[0] % 12, pair[1] % 12, ()))
        .collect();

    let cyclic = !find_cycles(&graph).is_empty();
    assert_eq!(build_order(&graph).is_err(), cyclic);

    for root in graph.values() {
        let mut seen = Vec::new();
        let result = graph.traverse(root, true, None, |_, dest, (), _, _| {
            assert!(!seen.contains(dest), "visited {dest} twice");
            seen.push(*dest);
            true
        });
        match result {
            Ok(()) => {}
            Err(GraphError::Cyclic { .. }) => assert!(cyclic),
            Err(err) => panic!("unexpected error from a present root: {err}"),
        }
    }
});
