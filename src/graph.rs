//! Disjunctive graph representation of an FJSP instance.
//!
//! # Layout
//!
//! Nodes live in a flat arena:
//! - node `0` is the synthetic source,
//! - node `op + 1` is operation `op` (global [`OperationId`]),
//! - node `n + 1` is the synthetic sink.
//!
//! Conjunctive edges are directed and fixed by the job routings:
//! `source → first`, `op → next`, `last → sink`. The weight of an edge is
//! the processing time of its tail (minimum candidate duration plus setup);
//! edges leaving the source weigh 0.
//!
//! Disjunctive edges are undirected resource conflicts: one edge per pair of
//! distinct operations per shared candidate machine. They are stored
//! machine-major, then by `(a, b)` with `a < b`.
//!
//! The graph is built once per instance and never mutated. It holds indices
//! only, so it can be shared read-only between threads and handed to
//! visualization collaborators through serde.
//!
//! # Reference
//! Roy & Sussmann (1964), "Les problèmes d'ordonnancement avec contraintes disjonctives"

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{mean_std, Instance, OperationId};
use crate::validation::validate_instance;

/// Node index in the graph arena.
pub type NodeIndex = usize;

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Synthetic start node.
    Source,
    /// A real operation.
    Operation {
        /// Global operation id.
        operation: OperationId,
        /// Parent job.
        job: usize,
        /// Position within the job.
        position: usize,
    },
    /// Synthetic end node.
    Sink,
}

/// A directed precedence edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjunctiveEdge {
    /// Tail node.
    pub from: NodeIndex,
    /// Head node.
    pub to: NodeIndex,
    /// Processing time of the tail (0 for the source).
    pub weight: i64,
}

/// An undirected machine-conflict edge between two operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisjunctiveEdge {
    /// Smaller operation id.
    pub a: OperationId,
    /// Larger operation id.
    pub b: OperationId,
    /// Shared candidate machine.
    pub machine: usize,
}

/// Scalar descriptors of a disjunctive graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphFeatures {
    /// Number of nodes including source and sink.
    pub num_nodes: usize,
    /// Number of conjunctive edges.
    pub num_conjunctive_edges: usize,
    /// Number of disjunctive edges (undirected).
    pub num_disjunctive_edges: usize,
    /// Mean out-degree, disjunctive edges counted in both directions.
    pub out_degree_mean: f64,
    /// Standard deviation of the out-degree.
    pub out_degree_std: f64,
}

/// Disjunctive graph of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisjunctiveGraph {
    nodes: Vec<NodeKind>,
    conjunctive: Vec<ConjunctiveEdge>,
    disjunctive: Vec<DisjunctiveEdge>,
    /// `disjunctive[conflict_offsets[m]..conflict_offsets[m + 1]]` are machine `m`'s edges.
    conflict_offsets: Vec<usize>,
    /// Operations eligible on each machine, ascending.
    machine_operations: Vec<Vec<OperationId>>,
    /// Job neighbours per operation: `(predecessor, successor)`.
    job_links: Vec<(Option<OperationId>, Option<OperationId>)>,
    /// Release time of each operation, used by [`lower_bound`](Self::lower_bound).
    releases: Vec<i64>,
}

impl DisjunctiveGraph {
    /// Builds the graph of an instance.
    ///
    /// Deterministic: the same instance always yields identical node and
    /// edge lists.
    ///
    /// # Errors
    /// [`Error::Validation`] if an operation has no candidate machine or a
    /// job's positions are not contiguous.
    pub fn build(instance: &Instance) -> Result<Self> {
        validate_instance(instance.machines(), instance.jobs()).map_err(Error::Validation)?;

        let n = instance.operation_count();
        let m = instance.machine_count();

        let mut nodes = Vec::with_capacity(n + 2);
        nodes.push(NodeKind::Source);
        nodes.extend(instance.operations().map(|(id, op)| NodeKind::Operation {
            operation: id,
            job: op.job,
            position: op.position,
        }));
        nodes.push(NodeKind::Sink);

        let sink = n + 1;
        let mut conjunctive = Vec::with_capacity(n + instance.job_count());
        let mut job_links = vec![(None, None); n];
        for job in 0..instance.job_count() {
            let range = instance.operations_of(job);
            if range.is_empty() {
                continue;
            }
            conjunctive.push(ConjunctiveEdge {
                from: 0,
                to: range.start + 1,
                weight: 0,
            });
            for op in range.clone() {
                let tail = instance.operation(op);
                let weight = tail.min_duration() + tail.setup_time;
                let next = op + 1;
                if next < range.end {
                    job_links[op].1 = Some(next);
                    job_links[next].0 = Some(op);
                    conjunctive.push(ConjunctiveEdge {
                        from: op + 1,
                        to: next + 1,
                        weight,
                    });
                } else {
                    conjunctive.push(ConjunctiveEdge {
                        from: op + 1,
                        to: sink,
                        weight,
                    });
                }
            }
        }

        let mut machine_operations = vec![Vec::new(); m];
        for (id, op) in instance.operations() {
            for option in &op.options {
                machine_operations[option.machine].push(id);
            }
        }

        let mut disjunctive = Vec::new();
        let mut conflict_offsets = Vec::with_capacity(m + 1);
        for (machine, ops) in machine_operations.iter_mut().enumerate() {
            ops.sort_unstable();
            conflict_offsets.push(disjunctive.len());
            for (i, &a) in ops.iter().enumerate() {
                for &b in &ops[i + 1..] {
                    disjunctive.push(DisjunctiveEdge { a, b, machine });
                }
            }
        }
        conflict_offsets.push(disjunctive.len());

        let releases = instance.operations().map(|(_, o)| o.release_time).collect();

        log::trace!(
            "built disjunctive graph for '{}': {} nodes, {} conjunctive, {} disjunctive edges",
            instance.name(),
            nodes.len(),
            conjunctive.len(),
            disjunctive.len()
        );

        Ok(Self {
            nodes,
            conjunctive,
            disjunctive,
            conflict_offsets,
            machine_operations,
            job_links,
            releases,
        })
    }

    /// All nodes, indexed by [`NodeIndex`].
    pub fn nodes(&self) -> &[NodeKind] {
        &self.nodes
    }

    /// Conjunctive edges, job by job in routing order.
    pub fn conjunctive_edges(&self) -> &[ConjunctiveEdge] {
        &self.conjunctive
    }

    /// Disjunctive edges, machine-major.
    pub fn disjunctive_edges(&self) -> &[DisjunctiveEdge] {
        &self.disjunctive
    }

    /// Number of operation nodes.
    pub fn operation_count(&self) -> usize {
        self.nodes.len() - 2
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machine_operations.len()
    }

    /// Source node index.
    pub fn source(&self) -> NodeIndex {
        0
    }

    /// Sink node index.
    pub fn sink(&self) -> NodeIndex {
        self.nodes.len() - 1
    }

    /// Node of an operation.
    #[inline]
    pub fn node_of(&self, op: OperationId) -> NodeIndex {
        op + 1
    }

    /// Operation of a node, `None` for source and sink.
    pub fn operation_at(&self, node: NodeIndex) -> Option<OperationId> {
        match self.nodes.get(node) {
            Some(NodeKind::Operation { operation, .. }) => Some(*operation),
            _ => None,
        }
    }

    /// Previous operation of the same job.
    #[inline]
    pub fn job_predecessor(&self, op: OperationId) -> Option<OperationId> {
        self.job_links[op].0
    }

    /// Next operation of the same job.
    #[inline]
    pub fn job_successor(&self, op: OperationId) -> Option<OperationId> {
        self.job_links[op].1
    }

    /// Disjunctive edges on one machine.
    pub fn conflicts_on(&self, machine: usize) -> &[DisjunctiveEdge] {
        &self.disjunctive[self.conflict_offsets[machine]..self.conflict_offsets[machine + 1]]
    }

    /// Operations that may run on a machine, ascending.
    pub fn operations_on(&self, machine: usize) -> &[OperationId] {
        &self.machine_operations[machine]
    }

    /// Longest source-to-sink path over conjunctive edges, honouring
    /// release times. Every feasible schedule's makespan is at least this.
    pub fn lower_bound(&self) -> i64 {
        let mut dist = vec![0i64; self.nodes.len()];
        for (op, &release) in self.releases.iter().enumerate() {
            dist[op + 1] = release;
        }
        // Edges are stored job by job in routing order, which is topological.
        for e in &self.conjunctive {
            let candidate = dist[e.from] + e.weight;
            if candidate > dist[e.to] {
                dist[e.to] = candidate;
            }
        }
        dist[self.sink()]
    }

    /// Computes scalar descriptors of the graph.
    pub fn features(&self) -> GraphFeatures {
        let mut out_degree = vec![0usize; self.nodes.len()];
        for e in &self.conjunctive {
            out_degree[e.from] += 1;
        }
        for e in &self.disjunctive {
            out_degree[e.a + 1] += 1;
            out_degree[e.b + 1] += 1;
        }
        let degrees: Vec<f64> = out_degree.iter().map(|&d| d as f64).collect();
        let (out_degree_mean, out_degree_std) = mean_std(&degrees);

        GraphFeatures {
            num_nodes: self.nodes.len(),
            num_conjunctive_edges: self.conjunctive.len(),
            num_disjunctive_edges: self.disjunctive.len(),
            out_degree_mean,
            out_degree_std,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, Operation};

    fn two_by_two() -> Instance {
        Instance::from_options(
            "two-by-two",
            2,
            vec![
                vec![vec![(0, 3), (1, 5)], vec![(0, 2), (1, 4)]],
                vec![vec![(0, 4), (1, 2)], vec![(0, 6), (1, 3)]],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_node_layout() {
        let g = DisjunctiveGraph::build(&two_by_two()).unwrap();
        assert_eq!(g.nodes().len(), 6);
        assert_eq!(g.nodes()[0], NodeKind::Source);
        assert_eq!(g.nodes()[5], NodeKind::Sink);
        assert_eq!(
            g.nodes()[3],
            NodeKind::Operation {
                operation: 2,
                job: 1,
                position: 0
            }
        );
        assert_eq!(g.node_of(2), 3);
        assert_eq!(g.operation_at(3), Some(2));
        assert_eq!(g.operation_at(0), None);
        assert_eq!(g.operation_count(), 4);
    }

    #[test]
    fn test_conjunctive_edges() {
        let g = DisjunctiveGraph::build(&two_by_two()).unwrap();
        let edges: Vec<(usize, usize, i64)> = g
            .conjunctive_edges()
            .iter()
            .map(|e| (e.from, e.to, e.weight))
            .collect();
        assert_eq!(
            edges,
            vec![(0, 1, 0), (1, 2, 3), (2, 5, 2), (0, 3, 0), (3, 4, 2), (4, 5, 3)]
        );
        assert_eq!(g.job_predecessor(1), Some(0));
        assert_eq!(g.job_predecessor(2), None);
        assert_eq!(g.job_successor(2), Some(3));
        assert_eq!(g.job_successor(3), None);
    }

    #[test]
    fn test_disjunctive_edges_machine_major() {
        let g = DisjunctiveGraph::build(&two_by_two()).unwrap();
        // 4 operations all eligible on both machines: C(4, 2) pairs per machine.
        assert_eq!(g.disjunctive_edges().len(), 12);
        assert_eq!(g.conflicts_on(0).len(), 6);
        assert!(g.conflicts_on(1).iter().all(|e| e.machine == 1));
        assert_eq!(
            g.conflicts_on(0)[0],
            DisjunctiveEdge {
                a: 0,
                b: 1,
                machine: 0
            }
        );
        assert!(g.disjunctive_edges().iter().all(|e| e.a < e.b));
        assert_eq!(g.operations_on(1), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_sparse_conflicts() {
        let inst = Instance::from_options(
            "sparse",
            3,
            vec![vec![vec![(0, 1)], vec![(1, 1)]], vec![vec![(2, 1)], vec![(0, 1), (1, 1)]]],
        )
        .unwrap();
        let g = DisjunctiveGraph::build(&inst).unwrap();
        let pairs: Vec<(usize, usize, usize)> = g
            .disjunctive_edges()
            .iter()
            .map(|e| (e.machine, e.a, e.b))
            .collect();
        assert_eq!(pairs, vec![(0, 0, 3), (1, 1, 3)]);
        assert!(g.conflicts_on(2).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let inst = two_by_two();
        assert_eq!(
            DisjunctiveGraph::build(&inst).unwrap(),
            DisjunctiveGraph::build(&inst).unwrap()
        );
    }

    #[test]
    fn test_lower_bound() {
        let g = DisjunctiveGraph::build(&two_by_two()).unwrap();
        // job 0: 3 + 2, job 1: 2 + 3
        assert_eq!(g.lower_bound(), 5);

        let inst = Instance::new(
            "released",
            1,
            vec![Job::new("J0")
                .with_operation(Operation::new(0, 0).with_option(0, 4).with_release(10).with_setup(1))
                .with_operation(Operation::new(0, 1).with_option(0, 2))],
        )
        .unwrap();
        assert_eq!(DisjunctiveGraph::build(&inst).unwrap().lower_bound(), 17);
    }

    #[test]
    fn test_features() {
        let f = DisjunctiveGraph::build(&two_by_two()).unwrap().features();
        assert_eq!(f.num_nodes, 6);
        assert_eq!(f.num_conjunctive_edges, 6);
        assert_eq!(f.num_disjunctive_edges, 12);
        // out-degrees: source 2, ops 1 + 6 each, sink 0
        assert!((f.out_degree_mean - 30.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_serde_round_trip() {
        let g = DisjunctiveGraph::build(&two_by_two()).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: DisjunctiveGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
