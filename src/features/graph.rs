//! Directed relation graph with degree, closeness and betweenness centrality.
//!
//! Only students that appear on at least one edge are nodes, so centrality
//! normalisation uses the relation's own node count rather than the class size.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::Edge;

#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    /// Student index of each node, in first-appearance order.
    nodes: Vec<usize>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
}

impl DiGraph {
    /// Builds the graph from an edge list; duplicates and self-loops are ignored.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut local: HashMap<usize, usize> = HashMap::new();
        let mut graph = DiGraph::default();
        let mut seen: HashSet<Edge> = HashSet::with_capacity(edges.len());

        for &(u, v) in edges {
            let lu = graph.node(&mut local, u);
            let lv = graph.node(&mut local, v);
            if u == v || !seen.insert((u, v)) {
                continue;
            }
            graph.out_adj[lu].push(lv);
            graph.in_adj[lv].push(lu);
        }
        graph
    }

    fn node(&mut self, local: &mut HashMap<usize, usize>, student: usize) -> usize {
        *local.entry(student).or_insert_with(|| {
            self.nodes.push(student);
            self.out_adj.push(Vec::new());
            self.in_adj.push(Vec::new());
            self.nodes.len() - 1
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Student index of local node `i`.
    pub(crate) fn student(&self, i: usize) -> usize {
        self.nodes[i]
    }

    pub(crate) fn in_degree(&self, i: usize) -> usize {
        self.in_adj[i].len()
    }

    pub(crate) fn out_degree(&self, i: usize) -> usize {
        self.out_adj[i].len()
    }

    /// BFS hop distances from `start` following `adj`.
    fn distances(adj: &[Vec<usize>], start: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; adj.len()];
        dist[start] = Some(0);
        let mut queue = VecDeque::from([start]);
        while let Some(x) = queue.pop_front() {
            let next = dist[x].unwrap_or(0) + 1;
            for &y in &adj[x] {
                if dist[y].is_none() {
                    dist[y] = Some(next);
                    queue.push_back(y);
                }
            }
        }
        dist
    }

    /// Incoming closeness with the Wasserman-Faust correction for
    /// disconnected graphs: `((r - 1) / total) * ((r - 1) / (n - 1))`, where `r`
    /// counts the nodes that can reach the target (itself included).
    pub fn closeness(&self) -> Vec<f64> {
        let n = self.node_count();
        (0..n)
            .map(|target| {
                let dist = Self::distances(&self.in_adj, target);
                let reached: Vec<usize> = dist.iter().flatten().copied().collect();
                let total: usize = reached.iter().sum();
                if total == 0 || n <= 1 {
                    return 0.0;
                }
                let r = (reached.len() - 1) as f64;
                (r / total as f64) * (r / (n - 1) as f64)
            })
            .collect()
    }

    /// Brandes betweenness, normalised by `1 / ((n - 1)(n - 2))` for n > 2.
    pub fn betweenness(&self) -> Vec<f64> {
        let n = self.node_count();
        let mut bc = vec![0.0f64; n];

        for s in 0..n {
            let mut stack = Vec::with_capacity(n);
            let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0f64; n];
            let mut dist: Vec<Option<usize>> = vec![None; n];
            sigma[s] = 1.0;
            dist[s] = Some(0);

            let mut queue = VecDeque::from([s]);
            while let Some(v) = queue.pop_front() {
                stack.push(v);
                let dv = dist[v].unwrap_or(0);
                for &w in &self.out_adj[v] {
                    if dist[w].is_none() {
                        dist[w] = Some(dv + 1);
                        queue.push_back(w);
                    }
                    if dist[w] == Some(dv + 1) {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                }
            }

            let mut delta = vec![0.0f64; n];
            while let Some(w) = stack.pop() {
                for &v in &preds[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    bc[w] += delta[w];
                }
            }
        }

        if n > 2 {
            let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
            for value in &mut bc {
                *value *= scale;
            }
        }
        bc
    }
}
