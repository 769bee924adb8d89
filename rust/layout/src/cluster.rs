// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distance-threshold clustering of obstacle positions
//!
//! Two points within the threshold always share a cluster, transitively.
//! This is density clustering with a minimum cluster size of one: every
//! point gets a label and nothing is treated as noise.

use nalgebra::Point2;
use rustc_hash::FxHashMap;

/// Label every point; labels run `0..k` in order of first appearance
pub fn cluster(points: &[Point2<f64>], threshold: f64) -> Vec<usize> {
    let mut sets = DisjointSets::new(points.len());
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if (points[i] - points[j]).norm() <= threshold {
                sets.union(i, j);
            }
        }
    }

    let mut labels_by_root: FxHashMap<usize, usize> = FxHashMap::default();
    (0..points.len())
        .map(|i| {
            let root = sets.find(i);
            let next = labels_by_root.len();
            *labels_by_root.entry(root).or_insert(next)
        })
        .collect()
}

/// Number of distinct labels
pub fn cluster_count(labels: &[usize]) -> usize {
    labels.iter().max().map_or(0, |m| m + 1)
}

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
