//! Concurrent mutation and traversal over the mutable graph

mod common;

use affinity::{Graph, MutableGraph};
use common::{bought_together, catalog_schema, init_tracing, mutable_catalog, product};
use rand::Rng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn concurrent_inserts_land_exactly_once() {
    init_tracing();
    let graph = MutableGraph::new(catalog_schema());
    let writers = 8;
    let per_writer = 50;

    thread::scope(|scope| {
        for writer in 0..writers {
            let graph = &graph;
            scope.spawn(move || {
                let mut rng = rand::thread_rng();
                let source = product(writer);
                for i in 0..per_writer {
                    let target = product(1_000 + writer * per_writer + i);
                    let weight = rng.gen_range(0.0f32..1.0);
                    graph
                        .add_edge(&source, &target, &bought_together(), weight)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(graph.edge_count() as u32, writers * per_writer);
    assert_eq!(graph.node_count() as u32, writers + writers * per_writer);

    let mut edges = 0;
    graph.for_each_edge(|_| edges += 1);
    assert_eq!(edges, writers * per_writer);
}

#[test]
fn set_edges_is_old_list_or_new_list() {
    let graph = mutable_catalog(&[(1, 2, 0.5), (1, 3, 0.4), (1, 4, 0.3)]);
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let writer = {
            let graph = &graph;
            let stop = &stop;
            scope.spawn(move || {
                for round in 0..500 {
                    if round % 2 == 0 {
                        graph
                            .set_edges(
                                &product(1),
                                &bought_together(),
                                &[product(8), product(9)],
                                &[0.9, 0.8],
                            )
                            .unwrap();
                    } else {
                        graph
                            .set_edges(
                                &product(1),
                                &bought_together(),
                                &[product(2), product(3), product(4)],
                                &[0.5, 0.4, 0.3],
                            )
                            .unwrap();
                    }
                }
                stop.store(true, Ordering::Relaxed);
            })
        };

        for _ in 0..4 {
            let graph = &graph;
            let stop = &stop;
            scope.spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let traverser = graph
                        .prepare_traversal(product(1), bought_together())
                        .max_depth(0)
                        .build()
                        .unwrap();
                    let seen: HashSet<u32> =
                        traverser.traverse().map(|e| *e.end.key()).collect();
                    assert!(
                        seen == [2, 3, 4].into() || seen == [8, 9].into(),
                        "torn edge list observed: {:?}",
                        seen
                    );
                }
            });
        }

        writer.join().unwrap();
    });
}

#[test]
fn traversal_stays_consistent_while_other_nodes_mutate() {
    let graph = mutable_catalog(&[
        (1, 2, 0.9),
        (1, 3, 0.5),
        (2, 4, 0.8),
        (3, 5, 0.7),
    ]);
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let writer = {
            let graph = &graph;
            let stop = &stop;
            scope.spawn(move || {
                let mut rng = rand::thread_rng();
                // Churn an unrelated corner of the graph
                for i in 0..300 {
                    let from = product(100);
                    let to = product(200 + i % 10);
                    let weight = rng.gen_range(0.0f32..1.0);
                    match graph.add_edge(&from, &to, &bought_together(), weight) {
                        Ok(()) => {}
                        Err(_) => {
                            graph
                                .update_edge(&from, &to, &bought_together(), weight)
                                .unwrap();
                        }
                    }
                    graph.remove_edge(&from, &to, &bought_together()).unwrap();
                }
                stop.store(true, Ordering::Relaxed);
            })
        };

        for _ in 0..4 {
            let graph = &graph;
            let stop = &stop;
            scope.spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let traverser = graph
                        .prepare_traversal(product(1), bought_together())
                        .build()
                        .unwrap();
                    let mut seen = HashSet::new();
                    for edge in traverser.traverse() {
                        assert!(
                            seen.insert(*edge.end.key()),
                            "duplicate end node under concurrent mutation"
                        );
                    }
                    // The stable subgraph under node 1 is always reachable
                    assert!(seen.is_superset(&[2, 3, 4, 5].into()));
                }
            });
        }

        writer.join().unwrap();
    });
}

#[test]
fn stats_record_once_per_cursor_under_concurrency() {
    let graph = mutable_catalog(&[(1, 2, 0.9), (1, 3, 0.5), (2, 4, 0.8)]);
    let runs_per_thread = 25;
    let threads = 4;

    thread::scope(|scope| {
        for _ in 0..threads {
            let graph = &graph;
            scope.spawn(move || {
                for _ in 0..runs_per_thread {
                    let traverser = graph
                        .prepare_traversal(product(1), bought_together())
                        .build()
                        .unwrap();
                    // Abandon half-way: drop still records exactly once
                    let mut cursor = traverser.traverse();
                    let _ = cursor.next();
                }
            });
        }
    });

    let snapshot = graph.stats().snapshot();
    assert_eq!(snapshot.traversal_count, (threads * runs_per_thread) as u64);
    assert!(snapshot.max_edges_traversed <= 3);
}
