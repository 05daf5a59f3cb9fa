use hashbrown::HashMap;

use retrace_core::node::Node;

/// Cell coordinates of the uniform grid, from floor division of node
/// coordinates by the cell size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellId {
    x: i64,
    y: i64,
}

impl CellId {
    fn of(x: f64, y: f64, cell_size: f64) -> Self {
        Self {
            x: (x / cell_size).floor() as i64,
            y: (y / cell_size).floor() as i64,
        }
    }
}

/// Uniform-grid spatial index over one node set. Cell side is the
/// communication radius (floored to 1.0), so a neighbor query only has to
/// scan the node's own cell and the 8 adjacent ones.
///
/// The index is a snapshot of positions at build time; rebuild after moves.
#[derive(Clone, Debug)]
pub struct GridIndex {
    radius: f64,
    cell_size: f64,
    cells: HashMap<CellId, Vec<usize>>,
}

impl GridIndex {
    pub fn build(nodes: &[Node], radius: f64) -> Self {
        let cell_size = radius.max(1.0);
        let mut cells: HashMap<CellId, Vec<usize>> = HashMap::new();
        if radius > 0.0 {
            for (idx, node) in nodes.iter().enumerate() {
                cells
                    .entry(CellId::of(node.x, node.y, cell_size))
                    .or_default()
                    .push(idx);
            }
        }
        Self {
            radius,
            cell_size,
            cells,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Indices of all nodes within the communication radius of `idx`,
    /// excluding the node itself. Empty for a degenerate radius.
    pub fn neighbors(&self, nodes: &[Node], idx: usize) -> Vec<usize> {
        let mut found = Vec::new();
        if self.radius <= 0.0 {
            return found;
        }
        let node = &nodes[idx];
        let cell = CellId::of(node.x, node.y, self.cell_size);
        let radius_sq = self.radius * self.radius;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let key = CellId {
                    x: cell.x + dx,
                    y: cell.y + dy,
                };
                let Some(candidates) = self.cells.get(&key) else {
                    continue;
                };
                for &other in candidates {
                    if other == idx {
                        continue;
                    }
                    let m = &nodes[other];
                    let dist_sq = (node.x - m.x).powi(2) + (node.y - m.y).powi(2);
                    if dist_sq <= radius_sq {
                        found.push(other);
                    }
                }
            }
        }
        found
    }

    /// Per-node neighbor count, aligned with the node slice.
    pub fn degrees(&self, nodes: &[Node]) -> Vec<usize> {
        (0..nodes.len())
            .map(|idx| self.neighbors(nodes, idx).len())
            .collect()
    }

    /// Full adjacency, aligned with the node slice.
    pub fn adjacency(&self, nodes: &[Node]) -> Vec<Vec<usize>> {
        (0..nodes.len())
            .map(|idx| self.neighbors(nodes, idx))
            .collect()
    }
}
