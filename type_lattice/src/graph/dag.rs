use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use super::{Cpo, CpoOrdering, GraphError};

/// A directed graph under construction. Nodes are deduplicated by value.
#[derive(Debug, Clone)]
pub struct DirectedAcyclicGraph<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    successors: Vec<Vec<usize>>,
}

impl<N> Default for DirectedAcyclicGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
        }
    }
}

impl<N: Clone + Eq + Hash + fmt::Debug> DirectedAcyclicGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its dense index. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        self.successors.push(Vec::new());
        i
    }

    /// Add the edge `from -> to`, i.e. `from < to`.
    pub fn add_edge(&mut self, from: &N, to: &N) -> Result<(), GraphError> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        if a == b {
            return Err(GraphError::SelfLoop(format!("{:?}", from)));
        }
        if !self.successors[a].contains(&b) {
            self.successors[a].push(b);
        }
        Ok(())
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    fn index_of(&self, node: &N) -> Result<usize, GraphError> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(format!("{:?}", node)))
    }

    /// Kahn's algorithm; ties broken by insertion order.
    fn topological_order(&self) -> Result<Vec<usize>, GraphError> {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        for succ in &self.successors {
            for &s in succ {
                in_degree[s] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_front() {
            order.push(i);
            for &s in &self.successors[i] {
                in_degree[s] -= 1;
                if in_degree[s] == 0 {
                    ready.push_back(s);
                }
            }
        }

        if order.len() < n {
            let stuck = (0..n).find(|&i| in_degree[i] > 0).unwrap_or(0);
            return Err(GraphError::Cyclic(format!("{:?}", self.nodes[stuck])));
        }
        Ok(order)
    }

    /// Nodes sorted so that every edge points forward.
    pub fn topological_sort(&self) -> Result<Vec<N>, GraphError> {
        Ok(self
            .topological_order()?
            .into_iter()
            .map(|i| self.nodes[i].clone())
            .collect())
    }

    /// Freeze the graph into a queryable partial order.
    pub fn into_cpo(self) -> Result<FiniteCpo<N>, GraphError> {
        let order = self.topological_order()?;
        let n = self.nodes.len();

        // reach[i][j] <=> i <= j. Filled in reverse topological order so that
        // every successor row is complete before it is merged.
        let mut reach = vec![vec![false; n]; n];
        for &i in order.iter().rev() {
            reach[i][i] = true;
            for &s in &self.successors[i] {
                for j in 0..n {
                    if reach[s][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }

        let mut rank = vec![0; n];
        for (position, &i) in order.iter().enumerate() {
            rank[i] = position;
        }

        let bottom = (0..n).find(|&i| reach[i].iter().all(|&r| r));
        let top = (0..n).find(|&j| (0..n).all(|i| reach[i][j]));

        Ok(FiniteCpo {
            nodes: self.nodes,
            index: self.index,
            reach,
            rank,
            bottom,
            top,
        })
    }
}

/// A finite partial order backed by its transitive closure.
///
/// Queries on nodes that are not part of the order are answered as
/// incomparable (or `None` for bounds).
#[derive(Debug, Clone)]
pub struct FiniteCpo<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    reach: Vec<Vec<bool>>,
    rank: Vec<usize>,
    bottom: Option<usize>,
    top: Option<usize>,
}

impl<N: Clone + Eq + Hash + fmt::Debug> FiniteCpo<N> {
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Position of `node` in a fixed topological order. Lower nodes have lower ranks.
    pub fn rank(&self, node: &N) -> Option<usize> {
        self.index.get(node).map(|&i| self.rank[i])
    }

    /// All nodes at or above `node`.
    pub fn up_set(&self, node: &N) -> Vec<N> {
        let Some(&i) = self.index.get(node) else {
            return Vec::new();
        };
        self.collect(|j| self.reach[i][j])
    }

    /// All nodes at or below `node`.
    pub fn down_set(&self, node: &N) -> Vec<N> {
        let Some(&j) = self.index.get(node) else {
            return Vec::new();
        };
        self.collect(|i| self.reach[i][j])
    }

    /// Sort `subset` so that lower nodes come first.
    pub fn sort_ascending(&self, subset: &[N]) -> Vec<N> {
        let mut sorted = subset.to_vec();
        sorted.sort_by_key(|n| self.rank(n).unwrap_or(usize::MAX));
        sorted
    }

    /// Whether every pair of nodes has a least upper and greatest lower bound.
    pub fn is_lattice(&self) -> bool {
        let n = self.nodes.len();
        (0..n).all(|a| {
            (a..n).all(|b| self.lub_index(&[a, b]).is_some() && self.glb_index(&[a, b]).is_some())
        })
    }

    fn collect(&self, include: impl Fn(usize) -> bool) -> Vec<N> {
        let mut picked: Vec<usize> = (0..self.nodes.len()).filter(|&k| include(k)).collect();
        picked.sort_by_key(|&k| self.rank[k]);
        picked.into_iter().map(|k| self.nodes[k].clone()).collect()
    }

    fn indices(&self, subset: &[N]) -> Option<Vec<usize>> {
        subset.iter().map(|n| self.index.get(n).copied()).collect()
    }

    fn lub_index(&self, members: &[usize]) -> Option<usize> {
        let n = self.nodes.len();
        let upper: Vec<usize> = (0..n)
            .filter(|&k| members.iter().all(|&m| self.reach[m][k]))
            .collect();
        upper
            .iter()
            .copied()
            .find(|&c| upper.iter().all(|&u| self.reach[c][u]))
    }

    fn glb_index(&self, members: &[usize]) -> Option<usize> {
        let n = self.nodes.len();
        let lower: Vec<usize> = (0..n)
            .filter(|&k| members.iter().all(|&m| self.reach[k][m]))
            .collect();
        lower
            .iter()
            .copied()
            .find(|&c| lower.iter().all(|&l| self.reach[l][c]))
    }
}

impl<N: Clone + Eq + Hash + fmt::Debug> Cpo for FiniteCpo<N> {
    type Element = N;

    fn bottom(&self) -> Option<N> {
        self.bottom.map(|i| self.nodes[i].clone())
    }

    fn top(&self) -> Option<N> {
        self.top.map(|i| self.nodes[i].clone())
    }

    fn compare(&self, a: &N, b: &N) -> CpoOrdering {
        let (Some(&i), Some(&j)) = (self.index.get(a), self.index.get(b)) else {
            return CpoOrdering::Incomparable;
        };
        match (self.reach[i][j], self.reach[j][i]) {
            (true, true) => CpoOrdering::Same,
            (true, false) => CpoOrdering::Lower,
            (false, true) => CpoOrdering::Higher,
            (false, false) => CpoOrdering::Incomparable,
        }
    }

    fn least_upper_bound(&self, a: &N, b: &N) -> Option<N> {
        self.least_upper_bound_of(&[a.clone(), b.clone()])
    }

    fn greatest_lower_bound(&self, a: &N, b: &N) -> Option<N> {
        self.greatest_lower_bound_of(&[a.clone(), b.clone()])
    }

    fn least_upper_bound_of(&self, subset: &[N]) -> Option<N> {
        let members = self.indices(subset)?;
        self.lub_index(&members).map(|i| self.nodes[i].clone())
    }

    fn greatest_lower_bound_of(&self, subset: &[N]) -> Option<N> {
        let members = self.indices(subset)?;
        self.glb_index(&members).map(|i| self.nodes[i].clone())
    }
}
