//! A binary Merkle tree over SM3 digests.
//!
//! Leaves are the SM3 digests of caller-provided byte sequences. Each
//! internal node is `SM3(left ‖ right)`. Levels are paired left to right and
//! a trailing node without a partner is paired with itself.
//!
//! ```ignore
//! let tree = MerkleTree::build(engine, &BuildOptions::default(), &leaves)?;
//! let proof = tree.prove_index(3)?;
//! assert!(verify(engine, &tree.leaf_hashes()[3], &proof, tree.root_hash()));
//! ```
//!
//! Pairing a lone node with itself means a tree over `[a, b, c]` has the same
//! root as a tree over `[a, b, c, c]`. Callers that need to distinguish the
//! two must commit to the leaf count separately (it is carried in every
//! [InclusionProof]).

#![cfg_attr(feature = "strict", deny(warnings))]

pub mod error;
mod merklenode;
mod merkletree;
mod merkletree_debug;
mod proof;

mod tests;

pub use crate::merklenode::{hash_node_pair, MerkleNode, MerkleNodeId};
pub use crate::merkletree::{BuildOptions, MerkleTree, DEFAULT_MIN_PARALLEL_LEAVES};
pub use crate::proof::{tree_depth, verify, InclusionProof};
pub use error::{MerkleError, Result};
