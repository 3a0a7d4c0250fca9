use sm3hash::{Sm3Digest, Sm3Engine, DIGEST_SIZE};

use crate::error::Result;

/// Index of a node in the tree's node arena. Leaves occupy ids
/// `0..leaf_count` in leaf order; each following level is appended after the
/// one below it.
pub type MerkleNodeId = usize;

/**************************************************************************/
/*                                                                        */
/*                               MerkleNode                               */
/*                                                                        */
/**************************************************************************/

/**
 * Represents an immutable node in a MerkleTree. A node without children is a
 * leaf. When a level has an odd number of nodes the last parent has the same
 * id as both its left and right child.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleNode {
    /// The Id of the current node.
    id: MerkleNodeId,
    /// The SM3 hash of the current node.
    hash: Sm3Digest,
    /// (left, right) children, None for leaves.
    children: Option<(MerkleNodeId, MerkleNodeId)>,
    /// None only for the root.
    parent: Option<MerkleNodeId>,
}

impl MerkleNode {
    pub(crate) fn leaf(id: MerkleNodeId, hash: Sm3Digest) -> MerkleNode {
        MerkleNode {
            id,
            hash,
            children: None,
            parent: None,
        }
    }

    pub(crate) fn internal(
        id: MerkleNodeId,
        hash: Sm3Digest,
        left: MerkleNodeId,
        right: MerkleNodeId,
    ) -> MerkleNode {
        MerkleNode {
            id,
            hash,
            children: Some((left, right)),
            parent: None,
        }
    }

    /// Gets the id of this node
    pub fn id(&self) -> MerkleNodeId {
        self.id
    }
    /// Gets the hash of this node
    pub fn hash(&self) -> &Sm3Digest {
        &self.hash
    }
    /// Gets the (left, right) children of this node
    pub fn children(&self) -> Option<(MerkleNodeId, MerkleNodeId)> {
        self.children
    }
    pub fn parent(&self) -> Option<MerkleNodeId> {
        self.parent
    }
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
    /// Whether this node was paired with itself.
    pub fn is_duplicated_pair(&self) -> bool {
        matches!(self.children, Some((l, r)) if l == r)
    }
    pub(crate) fn set_parent(&mut self, parent: MerkleNodeId) {
        self.parent = Some(parent);
    }
}

/**
 * Hashing method used to derive a parent node from its two children:
 * the SM3 digest of the 64 byte concatenation `left ‖ right`.
 */
pub fn hash_node_pair(engine: Sm3Engine, left: &Sm3Digest, right: &Sm3Digest) -> Result<Sm3Digest> {
    let mut buf = [0u8; 2 * DIGEST_SIZE];
    buf[..DIGEST_SIZE].copy_from_slice(left.as_bytes());
    buf[DIGEST_SIZE..].copy_from_slice(right.as_bytes());
    Ok(engine.hash(&buf)?)
}
