#![no_main]

use depgraph_core::{Graph, HashGraph};
use libfuzzer_sys::fuzz_target;

// Each op is three bytes: opcode, node a, node b. Node ids stay small so
// random input actually hits shared nodes and cycles.
fuzz_target!(|data: &[u8]| {
    let mut graph: HashGraph<u8, u8> = HashGraph::new();

    for op in data.chunks_exact(3) {
        let (a, b) = (op[1] % 16, op[2] % 16);
        match op[0] % 6 {
            0 => {
                graph.add_node(a);
            }
            1 | 2 => {
                graph.add_edge(a, b, op[0] % 3);
            }
            3 => {
                graph.remove_edge(&a, &b, &(op[0] % 3));
            }
            4 => {
                let before = graph.size();
                let self_loop = graph
                    .outbound_edges(&a)
                    .is_some_and(|edges| edges.iter().any(|e| e.destination() == &a));
                match graph.remove_node(&a) {
                    Ok(removed) => {
                        assert_eq!(graph.size(), before - removed.len());
                        assert!(!graph.contains(&a));
                    }
                    Err(_) => {
                        assert!(self_loop);
                        assert_eq!(graph.size(), before);
                    }
                }
            }
            _ => {
                let before = graph.size();
                let removed = graph.prune(&[a]);
                assert!(!removed.contains(&a));
                assert_eq!(graph.size(), before - removed.len());
            }
        }
    }

    // Every outbound edge is mirrored by an inbound edge on its destination.
    let mut outbound = 0;
    for value in graph.values() {
        let edges = graph.outbound_edges(value).expect("listed node exists");
        for edge in &edges {
            let inbound = graph
                .inbound_edges(edge.destination())
                .expect("destination exists");
            assert!(inbound.contains(edge));
        }
        outbound += edges.len();
    }
    assert_eq!(outbound, graph.edge_count());
});
