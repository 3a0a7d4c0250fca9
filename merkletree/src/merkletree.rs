use rayon::prelude::*;
use rustc_hash::FxHashMap;
use sm3hash::{Sm3Digest, Sm3Engine};
use tracing::{debug, warn};

use crate::error::{MerkleError, Result};
use crate::merklenode::*;

/// Default number of items in a level below which hashing stays on the
/// calling thread.
pub const DEFAULT_MIN_PARALLEL_LEAVES: usize = 1024;

/// Controls how a tree is built. The resulting tree does not depend on these
/// options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Hash leaves and node pairs on the rayon thread pool.
    pub parallel: bool,
    /// Levels smaller than this are hashed sequentially even if `parallel`
    /// is set.
    pub min_parallel_leaves: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            parallel: true,
            min_parallel_leaves: DEFAULT_MIN_PARALLEL_LEAVES,
        }
    }
}

impl BuildOptions {
    pub fn sequential() -> Self {
        BuildOptions {
            parallel: false,
            ..Default::default()
        }
    }

    fn use_parallel(&self, items: usize) -> bool {
        self.parallel && items >= self.min_parallel_leaves.max(2)
    }
}

/// Where a leaf hash was first seen, and how many leaves share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LeafLookup {
    pub(crate) first: usize,
    pub(crate) count: usize,
}

/**
 * The tree is stored as an arena of nodes. Level `k` occupies the id range
 * `level_starts[k]..level_starts[k + 1]` (the last level is the root alone),
 * and leaf hashes are indexed for hash based proof lookups.
 */
#[derive(Clone)]
pub struct MerkleTree {
    pub(crate) nodes: Vec<MerkleNode>,
    pub(crate) level_starts: Vec<usize>,
    pub(crate) leaf_index: FxHashMap<Sm3Digest, LeafLookup>,
    pub(crate) engine: Sm3Engine,
}

impl MerkleTree {
    /**
     * Hashes every leaf content with `engine` and builds the tree over the
     * resulting digests, preserving leaf order.
     */
    pub fn build<T: AsRef<[u8]> + Sync>(
        engine: Sm3Engine,
        options: &BuildOptions,
        leaves: &[T],
    ) -> Result<MerkleTree> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }
        let hashes: Vec<Sm3Digest> = if options.use_parallel(leaves.len()) {
            leaves
                .par_iter()
                .map(|leaf| engine.hash(leaf.as_ref()))
                .collect::<std::result::Result<_, _>>()?
        } else {
            leaves
                .iter()
                .map(|leaf| engine.hash(leaf.as_ref()))
                .collect::<std::result::Result<_, _>>()?
        };
        MerkleTree::from_leaf_hashes(engine, options, hashes)
    }

    /**
     * Builds the tree over precomputed leaf digests.
     */
    pub fn from_leaf_hashes(
        engine: Sm3Engine,
        options: &BuildOptions,
        leaf_hashes: Vec<Sm3Digest>,
    ) -> Result<MerkleTree> {
        if leaf_hashes.is_empty() {
            return Err(MerkleError::EmptyInput);
        }
        let leaf_count = leaf_hashes.len();
        let mut tree = MerkleTree {
            nodes: Vec::with_capacity(2 * leaf_count),
            level_starts: vec![0],
            leaf_index: FxHashMap::default(),
            engine,
        };

        let mut duplicated = 0usize;
        for (idx, hash) in leaf_hashes.into_iter().enumerate() {
            tree.nodes.push(MerkleNode::leaf(idx, hash));
            tree.leaf_index
                .entry(hash)
                .and_modify(|lookup| {
                    lookup.count += 1;
                    duplicated += 1;
                })
                .or_insert(LeafLookup {
                    first: idx,
                    count: 1,
                });
        }
        if duplicated > 0 {
            warn!(
                "Merkle tree has {} leaves that duplicate an earlier leaf hash; those leaves can only be proven by index",
                duplicated
            );
        }

        while tree.level_len(tree.level_starts.len() - 1) > 1 {
            tree.merge_one_level(options)?;
        }
        debug!(
            "Built Merkle tree: {} leaves, depth {}, root {}",
            leaf_count,
            tree.depth(),
            tree.root_hash()
        );
        Ok(tree)
    }

    /**
     * Builds the level above the current top level.
     *
     * Nodes are paired left to right, `[n0, n1, n2, n3, n4]` producing
     * parents `[(n0, n1), (n2, n3), (n4, n4)]`. Pair hashes may be computed
     * in parallel, but parents are always appended in pairing order.
     */
    fn merge_one_level(&mut self, options: &BuildOptions) -> Result<()> {
        let start = self.level_starts[self.level_starts.len() - 1];
        let len = self.nodes.len() - start;

        let pairs: Vec<(MerkleNodeId, MerkleNodeId)> = (0..len)
            .step_by(2)
            .map(|i| {
                let left = start + i;
                let right = if i + 1 < len { left + 1 } else { left };
                (left, right)
            })
            .collect();

        let nodes = &self.nodes;
        let engine = self.engine;
        let hash_pair = |&(l, r): &(MerkleNodeId, MerkleNodeId)| {
            hash_node_pair(engine, nodes[l].hash(), nodes[r].hash())
        };
        let hashes: Vec<Sm3Digest> = if options.use_parallel(pairs.len()) {
            pairs.par_iter().map(hash_pair).collect::<Result<_>>()?
        } else {
            pairs.iter().map(hash_pair).collect::<Result<_>>()?
        };

        let parent_start = self.nodes.len();
        self.level_starts.push(parent_start);
        for (k, ((left, right), hash)) in pairs.into_iter().zip(hashes).enumerate() {
            let id = parent_start + k;
            self.nodes[left].set_parent(id);
            self.nodes[right].set_parent(id);
            self.nodes.push(MerkleNode::internal(id, hash, left, right));
        }
        Ok(())
    }

    /// Number of nodes in level `level` (0 is the leaf level).
    pub(crate) fn level_len(&self, level: usize) -> usize {
        let end = self
            .level_starts
            .get(level + 1)
            .copied()
            .unwrap_or(self.nodes.len());
        end - self.level_starts[level]
    }

    /// Ids of the nodes in level `level`, left to right.
    pub fn level(&self, level: usize) -> Option<std::ops::Range<MerkleNodeId>> {
        if level >= self.level_starts.len() {
            return None;
        }
        let start = self.level_starts[level];
        Some(start..start + self.level_len(level))
    }

    pub fn root(&self) -> &MerkleNode {
        // a tree always has at least one node
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn root_hash(&self) -> &Sm3Digest {
        self.root().hash()
    }

    pub fn leaf_count(&self) -> usize {
        self.level_len(0)
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.level_starts.len() - 1
    }

    pub fn node(&self, id: MerkleNodeId) -> Option<&MerkleNode> {
        self.nodes.get(id)
    }

    pub fn node_iterator(&self) -> impl Iterator<Item = &MerkleNode> {
        self.nodes.iter()
    }

    pub fn leaf_hashes(&self) -> Vec<Sm3Digest> {
        self.nodes[..self.leaf_count()]
            .iter()
            .map(|n| *n.hash())
            .collect()
    }

    /// Whether two or more leaves share a hash.
    pub fn has_duplicate_leaves(&self) -> bool {
        self.leaf_index.len() != self.leaf_count()
    }

    pub fn engine(&self) -> Sm3Engine {
        self.engine
    }
}
