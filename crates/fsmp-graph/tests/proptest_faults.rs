//! Property tests: the liveness-mask view of a faulted graph must behave
//! exactly like the copy-and-remove graph it stands for.

use proptest::prelude::*;

use fsmp_graph::proptest_generators::arb_faulted_graph;
use fsmp_graph::triviality::common_neighbors;
use fsmp_graph::{classify, is_basic, is_conditionally_basic, GraphView};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn view_degrees_match_materialized_graph((graph, faults) in arb_faulted_graph(9, 3)) {
        let view = graph.with_faults(&faults);
        let copy = view.materialize();

        prop_assert_eq!(view.vertex_count(), copy.num_vertices());
        prop_assert_eq!(view.edge_count(), copy.num_edges());
        for v in view.vertices() {
            let copied = copy.vertex_id(graph.label(v)).expect("live vertex survives");
            prop_assert_eq!(view.degree(v), GraphView::degree(&copy, copied));
            prop_assert_eq!(view.degree(v), view.incident_edges(v).count());
        }
    }

    #[test]
    fn view_classification_matches_materialized_graph((graph, faults) in arb_faulted_graph(9, 3)) {
        let view = graph.with_faults(&faults);
        let copy = view.materialize();

        prop_assert_eq!(classify(&view), classify(&copy));
        prop_assert_eq!(is_basic(&view), is_basic(&copy));
        prop_assert_eq!(is_conditionally_basic(&view), is_conditionally_basic(&copy));
    }

    #[test]
    fn removed_elements_are_not_visible((graph, faults) in arb_faulted_graph(9, 3)) {
        let view = graph.with_faults(&faults);
        for &v in faults.vertices() {
            prop_assert!(!view.is_vertex_alive(v));
            prop_assert!(view.vertices().all(|live| live != v));
        }
        for &e in faults.edges() {
            prop_assert!(!view.is_edge_alive(e));
        }
        for e in view.edges() {
            let edge = view.endpoints(e);
            prop_assert!(view.is_vertex_alive(edge.u) && view.is_vertex_alive(edge.v));
        }
    }

    #[test]
    fn conditionally_basic_means_two_pendants_with_shared_hub((graph, faults) in arb_faulted_graph(9, 3)) {
        let view = graph.with_faults(&faults);
        if is_conditionally_basic(&view) {
            prop_assert!(!is_basic(&view));
            let pendants: Vec<_> = view.vertices().filter(|&v| view.degree(v) == 1).collect();
            prop_assert_eq!(pendants.len(), 2);
            prop_assert!(!common_neighbors(&view, pendants[0], pendants[1]).is_empty());
        }
    }
}
