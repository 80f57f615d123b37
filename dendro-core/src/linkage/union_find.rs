//! Union-find (disjoint set union) used by single-linkage construction.
//!
//! Pairwise edges are processed in non-decreasing distance order; each merge
//! of two components creates a dendrogram node. `component_node` tracks the
//! dendrogram node currently representing each component root.

#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    pub(super) component_node: Vec<usize>,
}

impl DisjointSet {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            component_node: (0..n).collect(),
        }
    }

    pub(super) fn find(&mut self, mut item: usize) -> usize {
        let mut root = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[item] != root {
            let next = self.parent[item];
            self.parent[item] = root;
            item = next;
        }

        root
    }

    /// Joins the components of `left` and `right`, returning the surviving
    /// root.
    pub(super) fn union(&mut self, left: usize, right: usize) -> usize {
        let mut winner = self.find(left);
        let mut loser = self.find(right);
        if winner == loser {
            return winner;
        }
        if self.rank[winner] < self.rank[loser] {
            std::mem::swap(&mut winner, &mut loser);
        }
        self.parent[loser] = winner;
        if self.rank[winner] == self.rank[loser] {
            self.rank[winner] = self.rank[winner].saturating_add(1);
        }
        winner
    }
}
