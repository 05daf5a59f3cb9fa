use retrace_models::stats::compute_topology;
use retrace_testutils::dataset::make_node;

#[test]
fn two_pairs_give_two_components() {
    let nodes = vec![
        make_node(1, 0.0, 0.0, 2.0),
        make_node(2, 1.0, 0.0, 2.0),
        make_node(3, 10.0, 10.0, 2.0),
        make_node(4, 11.0, 10.0, 2.0),
    ];
    let stats = compute_topology(&nodes, 2.0, 0, 0, 1.0);
    assert_eq!(stats.nodes, 4);
    assert_eq!(stats.max_degree, 1);
    assert_eq!(stats.avg_degree, 1.0);
    assert_eq!(stats.components, 2);
}

#[test]
fn exact_histogram_covers_every_degree() {
    // Chain of 4 nodes spaced 1.0 apart with radius 1.5: degrees 1,2,2,1,
    // plus an isolated node far away for a zero bin.
    let nodes = vec![
        make_node(1, 0.0, 0.0, 1.5),
        make_node(2, 1.0, 0.0, 1.5),
        make_node(3, 2.0, 0.0, 1.5),
        make_node(4, 3.0, 0.0, 1.5),
        make_node(5, 100.0, 100.0, 1.5),
    ];
    let stats = compute_topology(&nodes, 1.5, 0, 0, 1.0);
    assert_eq!(stats.max_degree, 2);
    assert_eq!(stats.degree_hist, vec![(0, 1), (1, 2), (2, 2)]);
    let total: u32 = stats.degree_hist.iter().map(|(_, count)| count).sum();
    assert_eq!(total as usize, nodes.len());
}

#[test]
fn histogram_bins_sum_to_node_count_for_max_degree_three() {
    // 4 nodes in a tight cluster: each sees the other 3.
    let nodes = vec![
        make_node(1, 0.0, 0.0, 5.0),
        make_node(2, 1.0, 0.0, 5.0),
        make_node(3, 0.0, 1.0, 5.0),
        make_node(4, 1.0, 1.0, 5.0),
    ];
    let stats = compute_topology(&nodes, 5.0, 0, 0, 1.0);
    assert_eq!(stats.max_degree, 3);
    assert_eq!(stats.degree_hist.len(), 4);
    let labels: Vec<u32> = stats.degree_hist.iter().map(|(k, _)| *k).collect();
    assert_eq!(labels, vec![0, 1, 2, 3]);
    let total: u32 = stats.degree_hist.iter().map(|(_, count)| count).sum();
    assert_eq!(total as usize, nodes.len());
}

#[test]
fn coarse_bins_kick_in_past_twelve() {
    // 14 nodes in one cluster: every degree is 13 > 12.
    let nodes: Vec<_> = (0..14)
        .map(|i| make_node(i as u64 + 1, (i % 4) as f64, (i / 4) as f64, 50.0))
        .collect();
    let stats = compute_topology(&nodes, 50.0, 0, 0, 1.0);
    assert_eq!(stats.max_degree, 13);
    // Bin width ceil(13/12) = 2, lower bounds 0,2,..,12.
    assert_eq!(stats.degree_hist.len(), 7);
    assert_eq!(stats.degree_hist[0].0, 0);
    assert_eq!(stats.degree_hist[6], (12, 14));
    let total: u32 = stats.degree_hist.iter().map(|(_, count)| count).sum();
    assert_eq!(total as usize, nodes.len());
}

#[test]
fn zero_radius_isolates_every_node() {
    let nodes = vec![
        make_node(1, 0.0, 0.0, 0.0),
        make_node(2, 0.0, 0.0, 0.0),
        make_node(3, 0.0, 0.0, 0.0),
    ];
    let stats = compute_topology(&nodes, 0.0, 0, 0, 1.0);
    assert_eq!(stats.max_degree, 0);
    assert_eq!(stats.components, 3);
    assert_eq!(stats.degree_hist, vec![(0, 3)]);
}

#[test]
fn empty_node_set_is_all_zeroes() {
    let stats = compute_topology(&[], 10.0, 3, 1, 2.0);
    assert_eq!(stats.nodes, 0);
    assert_eq!(stats.components, 0);
    assert!(stats.degree_hist.is_empty());
    assert_eq!(stats.msgs_started, 3);
    assert_eq!(stats.msgs_completed, 1);
}

#[test]
fn packet_rate_uses_simulated_clock() {
    let nodes = vec![make_node(1, 0.0, 0.0, 1.0)];
    let stats = compute_topology(&nodes, 1.0, 10, 4, 2.0);
    assert_eq!(stats.packet_rate, 2.0);
    // Zero clock must not divide by zero.
    let stats = compute_topology(&nodes, 1.0, 10, 4, 0.0);
    assert!(stats.packet_rate.is_finite());
}
