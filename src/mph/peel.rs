/*
 * SPDX-FileCopyrightText: 2025 The mphash developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Acyclicity test for 3-hypergraphs by peeling.
//!
//! A 3-hypergraph is *peelable* (acyclic) if it is possible to remove all its
//! edges by repeatedly removing an edge containing a vertex of degree one. The
//! order in which edges are removed is the *peeling order*; an assignment of
//! labels visiting the edges in reverse peeling order is always possible.

use super::hash_tuple::R;
use std::slice::Iter;

/// The outcome of [`peel`].
#[derive(Debug)]
pub enum PeelResult {
    /// The hypergraph is acyclic.
    Acyclic(PeelOrder),
    /// The hypergraph contains a cycle (its 2-core is not empty).
    Cyclic {
        /// The number of edges peeled before the visit got stuck.
        peeled: usize,
    },
}

impl PeelResult {
    pub fn is_acyclic(&self) -> bool {
        matches!(self, PeelResult::Acyclic(_))
    }
}

/// A peeling order: each edge is stored with its *side*, that is, the
/// position, within the edge, of the degree-one vertex it was peeled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeelOrder {
    /// The peeled edges, in reverse peeling order.
    reversed_edges: Box<[u32]>,
    /// The sides, in peeling order.
    sides: Vec<u8>,
}

impl PeelOrder {
    pub fn len(&self) -> usize {
        self.sides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    /// Returns an iterator on pairs (edge index, side) in peeling order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.reversed_edges
            .iter()
            .rev()
            .zip(self.sides.iter())
            .map(|(&edge, &side)| (edge as usize, side as usize))
    }

    /// Returns an iterator on pairs (edge index, side) in reverse peeling
    /// order, which is the order in which labels must be assigned.
    pub fn iter_rev(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.reversed_edges
            .iter()
            .zip(self.sides.iter().rev())
            .map(|(&edge, &side)| (edge as usize, side as usize))
    }
}

/// A hypergraph represented compactly.
///
/// For each vertex we keep the degree and the XOR of the indices of the
/// incident edges: during the peeling visit we need to know the incident edge
/// of a vertex only when its degree is one, and in that case the XOR is the
/// index of the edge (see [“Cache-Oblivious Peeling of Random
/// Hypergraphs”](https://doi.org/10.1109/DCC.2014.48)).
///
/// The graph is random, so the maximum degree is *O*(log *n* / log log *n*),
/// and a byte is more than enough; a vertex reaching the maximum degree
/// causes the graph to be reported as cyclic.
///
/// When we peel an edge from a vertex, we just zero the degree, leaving the
/// edge information in place.
struct XorGraph {
    edges: Box<[u32]>,
    degrees: Box<[u8]>,
}

impl XorGraph {
    fn new(n: usize) -> XorGraph {
        XorGraph {
            edges: vec![0; n].into(),
            degrees: vec![0; n].into(),
        }
    }

    /// Adds an edge to a vertex, returning false if the degree overflows.
    #[inline(always)]
    fn add(&mut self, v: usize, edge: u32) -> bool {
        if self.degrees[v] == u8::MAX {
            return false;
        }
        self.degrees[v] += 1;
        self.edges[v] ^= edge;
        true
    }

    #[inline(always)]
    fn remove(&mut self, v: usize, edge: u32) {
        debug_assert!(self.degrees[v] > 0);
        self.degrees[v] -= 1;
        self.edges[v] ^= edge;
    }

    #[inline(always)]
    fn zero(&mut self, v: usize) {
        self.degrees[v] = 0;
    }

    #[inline(always)]
    fn edge_index(&self, v: usize) -> u32 {
        debug_assert!(self.degree(v) < 2);
        self.edges[v]
    }

    #[inline(always)]
    fn degree(&self, v: usize) -> u8 {
        self.degrees[v]
    }

    fn degrees(&self) -> std::iter::Copied<Iter<'_, u8>> {
        self.degrees.iter().copied()
    }
}

/// Two stacks in the same vector.
///
/// This struct implements a pair of stacks sharing the same memory. The lower
/// stack grows from the beginning of the vector, the upper stack grows from the
/// end of the vector. Since we use the lower stack for vertices to visit and
/// the upper stack for peeled edges, the sum of the lengths of the two stacks
/// cannot exceed the number of vertices.
#[derive(Debug)]
struct DoubleStack<V> {
    stack: Vec<V>,
    lower: usize,
    upper: usize,
}

impl<V: Default + Copy> DoubleStack<V> {
    fn new(n: usize) -> DoubleStack<V> {
        DoubleStack {
            stack: vec![V::default(); n],
            lower: 0,
            upper: n,
        }
    }
}

impl<V: Copy> DoubleStack<V> {
    #[inline(always)]
    fn push_lower(&mut self, v: V) {
        debug_assert!(self.lower < self.upper);
        self.stack[self.lower] = v;
        self.lower += 1;
    }

    #[inline(always)]
    fn push_upper(&mut self, v: V) {
        debug_assert!(self.lower < self.upper);
        self.upper -= 1;
        self.stack[self.upper] = v;
    }

    #[inline(always)]
    fn pop_lower(&mut self) -> Option<V> {
        if self.lower == 0 {
            None
        } else {
            self.lower -= 1;
            Some(self.stack[self.lower])
        }
    }

    fn upper_len(&self) -> usize {
        self.stack.len() - self.upper
    }

    /// Consumes the stack, returning the upper stack from its top.
    fn into_upper(mut self) -> Box<[V]> {
        self.stack.drain(..self.upper);
        self.stack.into_boxed_slice()
    }
}

/// Peels the hypergraph with `num_vertices` vertices and the given edges.
///
/// Vertices of degree one are preloaded in a visit stack. Each popped vertex
/// that has still degree one identifies an edge, which is removed from all its
/// vertices and appended to the peeling order; vertices whose degree drops to
/// one are pushed on the visit stack. The hypergraph is acyclic if and only if
/// all edges are peeled at the end of the visit.
///
/// The three vertices of each edge must be distinct, and `num_vertices` must
/// not exceed 2³².
pub fn peel(edges: &[[usize; R]], num_vertices: usize) -> PeelResult {
    debug_assert!(edges.len() <= u32::MAX as usize);
    let mut xor_graph = XorGraph::new(num_vertices);
    for (edge_index, edge) in edges.iter().enumerate() {
        debug_assert!(edge[0] != edge[1] && edge[0] != edge[2] && edge[1] != edge[2]);
        for &v in edge {
            if !xor_graph.add(v, edge_index as u32) {
                return PeelResult::Cyclic { peeled: 0 };
            }
        }
    }

    // The lower stack contains vertices to be visited. The upper stack
    // contains peeled edges.
    let mut double_stack = DoubleStack::<u32>::new(num_vertices);
    let mut sides = Vec::<u8>::with_capacity(edges.len());
    for (v, degree) in xor_graph.degrees().enumerate() {
        if degree == 1 {
            double_stack.push_lower(v as u32);
        }
    }

    while let Some(v) = double_stack.pop_lower() {
        let v = v as usize;
        if xor_graph.degree(v) == 0 {
            // Already peeled through another vertex of the same edge
            continue;
        }
        debug_assert_eq!(xor_graph.degree(v), 1);
        let edge_index = xor_graph.edge_index(v);
        xor_graph.zero(v);
        double_stack.push_upper(edge_index);

        let edge = &edges[edge_index as usize];
        let mut side = 0;
        for (s, &w) in edge.iter().enumerate() {
            if w == v {
                side = s;
                continue;
            }
            if xor_graph.degree(w) == 2 {
                double_stack.push_lower(w as u32);
            }
            xor_graph.remove(w, edge_index);
        }
        sides.push(side as u8);
    }

    if double_stack.upper_len() != edges.len() {
        return PeelResult::Cyclic {
            peeled: double_stack.upper_len(),
        };
    }

    PeelResult::Acyclic(PeelOrder {
        reversed_edges: double_stack.into_upper(),
        sides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks that `order` is a valid peeling order for `edges`: each edge,
    /// when removed, has its peeling vertex of degree one.
    fn check_order(edges: &[[usize; R]], num_vertices: usize, order: &PeelOrder) {
        let mut degree = vec![0_usize; num_vertices];
        for edge in edges {
            for &v in edge {
                degree[v] += 1;
            }
        }
        let mut seen = vec![false; edges.len()];
        for (edge_index, side) in order.iter() {
            assert!(!seen[edge_index]);
            seen[edge_index] = true;
            let edge = edges[edge_index];
            assert_eq!(degree[edge[side]], 1, "edge {} side {}", edge_index, side);
            for &v in &edge {
                degree[v] -= 1;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_empty() {
        let result = peel(&[], 6);
        match result {
            PeelResult::Acyclic(order) => assert!(order.is_empty()),
            PeelResult::Cyclic { .. } => panic!("The empty graph is acyclic"),
        }
    }

    #[test]
    fn test_chain() {
        // Each edge shares one vertex with the next one
        let edges = [[0, 4, 8], [1, 4, 9], [1, 5, 10], [2, 5, 11]];
        match peel(&edges, 12) {
            PeelResult::Acyclic(order) => {
                assert_eq!(order.len(), edges.len());
                check_order(&edges, 12, &order);
                let forward = order.iter().collect::<Vec<_>>();
                let mut backward = order.iter_rev().collect::<Vec<_>>();
                backward.reverse();
                assert_eq!(forward, backward);
            }
            PeelResult::Cyclic { .. } => panic!("A chain is acyclic"),
        }
    }

    #[test]
    fn test_duplicate_edge_is_cyclic() {
        let edges = [[0, 2, 4], [0, 2, 4]];
        match peel(&edges, 6) {
            PeelResult::Cyclic { peeled } => assert_eq!(peeled, 0),
            PeelResult::Acyclic(_) => panic!("Two equal edges form a cycle"),
        }
    }

    #[test]
    fn test_core_with_tail() {
        // The first two edges form a 2-core; the third one hangs off it
        let edges = [[0, 3, 6], [0, 3, 6], [1, 3, 7]];
        match peel(&edges, 9) {
            PeelResult::Cyclic { peeled } => assert_eq!(peeled, 1),
            PeelResult::Acyclic(_) => panic!("The graph has a non-empty 2-core"),
        }
    }

    #[test]
    fn test_random_sparse() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};
        let mut rng = SmallRng::seed_from_u64(0);
        let range = 1000;
        let mut acyclic = 0;
        for _ in 0..20 {
            let edges = (0..2000)
                .map(|_| {
                    [
                        rng.random_range(0..range),
                        rng.random_range(range..2 * range),
                        rng.random_range(2 * range..3 * range),
                    ]
                })
                .collect::<Vec<_>>();
            if let PeelResult::Acyclic(order) = peel(&edges, 3 * range) {
                check_order(&edges, 3 * range, &order);
                acyclic += 1;
            }
        }
        // Load 2/3 is well below the threshold, so most graphs are acyclic
        assert!(acyclic >= 10, "acyclic = {}", acyclic);
    }
}
