use serde::{Deserialize, Serialize};
use sm3hash::{Sm3Digest, Sm3Engine};
use tracing::debug;

use crate::error::{MerkleError, Result};
use crate::merklenode::hash_node_pair;
use crate::merkletree::MerkleTree;

/// An inclusion proof for one leaf: the sibling hashes met on the way from
/// the leaf to the root, bottom level first.
///
/// The leaf index decides at every level whether the running hash is the
/// left or the right input, so a proof is only valid for the position it was
/// issued for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub leaf_index: usize,
    pub leaf_count: usize,
    pub siblings: Vec<Sm3Digest>,
}

/// Number of levels above the leaves in a tree with `leaf_count` leaves.
pub fn tree_depth(leaf_count: usize) -> usize {
    let mut depth = 0;
    let mut len = leaf_count;
    while len > 1 {
        len = len.div_ceil(2);
        depth += 1;
    }
    depth
}

/**
 * Recomputes the root from `leaf_hash` and `proof` and compares it with
 * `expected_root`.
 *
 * Returns false for an index out of range, a sibling count that does not
 * match the depth of a tree with `proof.leaf_count` leaves, or any altered
 * hash. A trailing node that was paired with itself must carry its own hash
 * as the sibling.
 */
pub fn verify(
    engine: Sm3Engine,
    leaf_hash: &Sm3Digest,
    proof: &InclusionProof,
    expected_root: &Sm3Digest,
) -> bool {
    if proof.leaf_index >= proof.leaf_count {
        return false;
    }
    if proof.siblings.len() != tree_depth(proof.leaf_count) {
        return false;
    }

    let mut index = proof.leaf_index;
    let mut len = proof.leaf_count;
    let mut current = *leaf_hash;
    for sibling in proof.siblings.iter() {
        let next = if index % 2 == 0 {
            if index + 1 == len && sibling != &current {
                return false;
            }
            hash_node_pair(engine, &current, sibling)
        } else {
            hash_node_pair(engine, sibling, &current)
        };
        current = match next {
            Ok(h) => h,
            Err(_) => return false,
        };
        index /= 2;
        len = len.div_ceil(2);
    }
    &current == expected_root
}

impl MerkleTree {
    /// Builds the inclusion proof of the leaf at `leaf_index`.
    pub fn prove_index(&self, leaf_index: usize) -> Result<InclusionProof> {
        let leaf_count = self.leaf_count();
        if leaf_index >= leaf_count {
            return Err(MerkleError::LeafIndexOutOfRange {
                index: leaf_index,
                count: leaf_count,
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut id = leaf_index;
        while let Some(parent) = self.nodes[id].parent() {
            // a node paired with itself is its own sibling
            let sibling = match self.nodes[parent].children() {
                Some((left, right)) if left == id => right,
                Some((left, _)) => left,
                None => break,
            };
            siblings.push(*self.nodes[sibling].hash());
            id = parent;
        }
        Ok(InclusionProof {
            leaf_index,
            leaf_count,
            siblings,
        })
    }

    /// Builds the inclusion proof for the unique leaf whose hash is
    /// `leaf_hash`.
    pub fn prove_inclusion(&self, leaf_hash: &Sm3Digest) -> Result<InclusionProof> {
        match self.leaf_index.get(leaf_hash) {
            None => Err(MerkleError::LeafNotFound(*leaf_hash)),
            Some(lookup) if lookup.count > 1 => {
                debug!(
                    "Refusing hash lookup for {}: shared by {} leaves",
                    leaf_hash, lookup.count
                );
                Err(MerkleError::AmbiguousLeaf {
                    hash: *leaf_hash,
                    count: lookup.count,
                })
            }
            Some(lookup) => self.prove_index(lookup.first),
        }
    }

    /// Verifies `proof` for `leaf_hash` against this tree's root.
    pub fn verify(&self, leaf_hash: &Sm3Digest, proof: &InclusionProof) -> bool {
        proof.leaf_count == self.leaf_count()
            && verify(self.engine, leaf_hash, proof, self.root_hash())
    }
}
