use negcycle_core::csr::GraphCSR;
use proptest::prelude::*;
use proptest::strategy::Strategy;

const NUM_NODES_STRATEGY: std::ops::Range<usize> = 1usize..10;

fn csr_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    NUM_NODES_STRATEGY.prop_flat_map(|num_nodes| {
        let edge_generator = (0usize..num_nodes, 0usize..num_nodes, -10.0f64..10.0);
        let edges_generator = prop::collection::vec(edge_generator, 0..50);

        (proptest::strategy::Just(num_nodes), edges_generator)
    })
}

proptest! {
    /// Property: node_pointers should be monotonic
    #[test]
    fn node_pointers_monotonic(
        (num_nodes, mut edges) in csr_strategy()
    ) {
        let csr = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        for i in 0..csr.num_nodes {
            prop_assert!(csr.node_pointers[i] <= csr.node_pointers[i + 1]);
        }
    }

    /// Property: edge_targets and edge_weights length consistency
    #[test]
    fn edge_arrays_length_consistent((num_nodes, mut edges) in csr_strategy()) {
        let csr = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        prop_assert_eq!(csr.edge_targets.len(), csr.edge_weights.len());
        prop_assert_eq!(csr.edge_targets.len(), csr.node_pointers[csr.num_nodes]);
    }

    /// Property: the edge iterator gives back exactly the input, grouped by source.
    #[test]
    fn edges_round_trip_in_source_order((num_nodes, edges) in csr_strategy()) {
        let mut input = edges.clone();
        let csr = GraphCSR::from_edges(num_nodes, &mut input).unwrap();

        let mut expected = edges;
        expected.sort_by_key(|e| e.0);

        prop_assert_eq!(csr.edges().collect::<Vec<_>>(), expected);
    }

    /// Property: nodes with no outgoing edges have node_pointers[i] == node_pointers[i+1]
    #[test]
    fn nodes_without_edges((num_nodes, mut edges) in csr_strategy()) {
        let csr = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();

        let mut has_edges = vec![false; num_nodes];
        for &(from, _, _) in &edges {
            has_edges[from] = true;
        }

        for (i, &has) in has_edges.iter().enumerate() {
            if !has {
                prop_assert_eq!(csr.node_pointers[i], csr.node_pointers[i + 1]);
            }
        }
    }

    /// Property: the virtual source adds one vertex and one zero edge per vertex.
    #[test]
    fn virtual_source_shape((num_nodes, mut edges) in csr_strategy()) {
        let csr = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        let (augmented, source) = csr.with_virtual_source();

        prop_assert_eq!(source, num_nodes);
        prop_assert_eq!(augmented.num_edges(), csr.num_edges() + num_nodes);
        prop_assert_eq!(augmented.outgoing(source).count(), num_nodes);
    }
}
