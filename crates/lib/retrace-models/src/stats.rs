use log::debug;
use serde::Serialize;

use retrace_core::node::Node;

use crate::space::GridIndex;

/// Guard against division by a zero simulated clock.
const PACKET_RATE_EPS: f64 = 1e-9;

/// Bin count used once exact per-degree bins would get too wide.
const COARSE_BINS: usize = 12;

/// Topology statistics derived from the live node set, cached by the
/// playback controller and refreshed on a wall-clock throttle.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct TopologyStats {
    pub nodes: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
    /// Pairs of (bin lower bound, count).
    pub degree_hist: Vec<(u32, u32)>,
    pub components: usize,
    pub msgs_started: u64,
    pub msgs_completed: u64,
    pub packet_rate: f64,
}

/// Computes degree statistics, the degree histogram and the number of
/// connected components for `nodes` under communication radius `radius`.
/// Message counters and the simulated clock are passed through so the
/// statistics block is self-contained for reporting.
pub fn compute_topology(
    nodes: &[Node],
    radius: f64,
    msgs_started: u64,
    msgs_completed: u64,
    time_sim: f64,
) -> TopologyStats {
    if nodes.is_empty() {
        return TopologyStats {
            msgs_started,
            msgs_completed,
            ..TopologyStats::default()
        };
    }

    let n = nodes.len();
    let packet_rate = msgs_completed as f64 / time_sim.max(PACKET_RATE_EPS);

    if radius <= 0.0 {
        // No radius: every node is isolated and forms its own component.
        return TopologyStats {
            nodes: n,
            avg_degree: 0.0,
            max_degree: 0,
            degree_hist: vec![(0, n as u32)],
            components: n,
            msgs_started,
            msgs_completed,
            packet_rate,
        };
    }

    let index = GridIndex::build(nodes, radius);
    let adjacency = index.adjacency(nodes);
    let degrees: Vec<usize> = adjacency.iter().map(|nbrs| nbrs.len()).collect();

    let avg_degree = degrees.iter().sum::<usize>() as f64 / n as f64;
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let degree_hist = degree_histogram(&degrees, max_degree);
    let components = count_components(&adjacency);
    debug!(
        "Topology recomputed: {} nodes, max degree {}, {} components",
        n, max_degree, components
    );

    TopologyStats {
        nodes: n,
        avg_degree,
        max_degree,
        degree_hist,
        components,
        msgs_started,
        msgs_completed,
        packet_rate,
    }
}

fn degree_histogram(degrees: &[usize], max_degree: usize) -> Vec<(u32, u32)> {
    let mut hist = Vec::new();
    if max_degree <= COARSE_BINS {
        for k in 0..=max_degree {
            let count = degrees.iter().filter(|d| **d == k).count();
            hist.push((k as u32, count as u32));
        }
    } else {
        let step = max_degree.div_ceil(COARSE_BINS).max(1);
        let mut k = 0;
        while k <= max_degree {
            let count = degrees.iter().filter(|d| **d >= k && **d < k + step).count();
            hist.push((k as u32, count as u32));
            k += step;
        }
    }
    hist
}

/// Counts maximal sets of mutually reachable nodes with an iterative
/// depth-first traversal, each node visited once.
fn count_components(adjacency: &[Vec<usize>]) -> usize {
    let n = adjacency.len();
    let mut seen = vec![false; n];
    let mut components = 0;
    let mut stack: Vec<usize> = Vec::new();
    for start in 0..n {
        if seen[start] {
            continue;
        }
        components += 1;
        seen[start] = true;
        stack.push(start);
        while let Some(u) = stack.pop() {
            for &v in &adjacency[u] {
                if !seen[v] {
                    seen[v] = true;
                    stack.push(v);
                }
            }
        }
    }
    components
}
