//! Merging of overlapping seed nodes into disjoint nodes

use fxhash::FxHashMap;
use tracing::debug;

use crate::topology::{NodeId, Place, PlaceSet, SchemeNode};

/// Union-find over seed indices, where the representative is always the smallest index
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(nb: usize) -> DisjointSets {
        DisjointSets {
            parent: (0..nb).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra < rb {
            self.parent[rb] = ra;
        } else if rb < ra {
            self.parent[ra] = rb;
        }
    }
}

/// Merge seeds that share at least one place, transitively
///
/// Returns the disjoint nodes and the translation from seed index to final node. Final nodes
/// are ordered by the smallest seed they contain, and keep the place order of their seeds.
/// Merging an already disjoint set of seeds keeps every seed as is.
pub fn merge_nodes(seeds: &[PlaceSet]) -> (Vec<SchemeNode>, Vec<NodeId>) {
    let mut sets = DisjointSets::new(seeds.len());
    let mut owner: FxHashMap<Place, usize> = FxHashMap::default();
    for (i, seed) in seeds.iter().enumerate() {
        for place in seed {
            match owner.get(place) {
                Some(&j) => sets.union(i, j),
                None => {
                    owner.insert(*place, i);
                }
            }
        }
    }

    let mut translation = Vec::with_capacity(seeds.len());
    let mut merged: Vec<PlaceSet> = Vec::new();
    for i in 0..seeds.len() {
        let root = sets.find(i);
        if root == i {
            translation.push(NodeId::new(merged.len()));
            merged.push(PlaceSet::default());
        } else {
            // Roots are smaller, hence already translated
            translation.push(translation[root]);
        }
        merged[translation[i].index()].extend(seeds[i].iter().copied());
    }
    debug!("Merged {} seeds into {} nodes", seeds.len(), merged.len());
    let nodes = merged
        .into_iter()
        .map(|places| SchemeNode::new(places.into_iter().collect()))
        .collect();
    (nodes, translation)
}
