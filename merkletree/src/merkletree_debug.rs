use std::fmt;

use tracing::error;

use crate::merklenode::*;
use crate::merkletree::MerkleTree;

impl MerkleTree {
    pub fn print_node_details(&self, node: &MerkleNode) -> String {
        let mut ret = format!("Node {} hash {}\n", node.id(), node.hash());
        match node.children() {
            Some((l, r)) if l == r => ret.push_str(&format!("\tChild {l} paired with itself\n")),
            Some((l, r)) => ret.push_str(&format!("\tChildren {l}, {r}\n")),
            None => ret.push_str("\tLeaf\n"),
        }
        match node.parent() {
            Some(p) => ret.push_str(&format!("\tParent {p}\n")),
            None => ret.push_str("\tRoot\n"),
        }
        ret
    }

    /// if A has B as a parent, then B must have A as a child, and every node
    /// except the root has a parent.
    fn check_parent_invariant(&self) -> bool {
        let root_id = self.root().id();
        let mut ret = true;
        for node in self.node_iterator() {
            match node.parent() {
                Some(p) => match self.node(p).and_then(|n| n.children()) {
                    Some((l, r)) if l == node.id() || r == node.id() => {}
                    _ => {
                        error!("Parent {p} of Node {node:?} does not list it as a child");
                        ret = false;
                    }
                },
                None if node.id() != root_id => {
                    error!("Node {node:?} has no parent but is not the root");
                    ret = false;
                }
                None => {}
            }
        }
        ret
    }

    /// every internal node hash must be the hash of its children.
    fn check_hash_invariant(&self) -> bool {
        let mut ret = true;
        for node in self.node_iterator() {
            let Some((l, r)) = node.children() else {
                continue;
            };
            let (Some(left), Some(right)) = (self.node(l), self.node(r)) else {
                error!("Children of Node {node:?} do not exist");
                ret = false;
                continue;
            };
            match hash_node_pair(self.engine(), left.hash(), right.hash()) {
                Ok(h) if &h == node.hash() => {}
                Ok(h) => {
                    error!(
                        "Hash mismatch at Node {node:?}\n\
                        \tExpecting {:?}, got {h:?}",
                        node.hash()
                    );
                    ret = false;
                }
                Err(e) => {
                    error!("Unable to rehash Node {node:?}: {e}");
                    ret = false;
                }
            }
        }
        ret
    }

    /// every level halves (rounding up) and only the last pair of a level may
    /// be a node paired with itself.
    fn check_level_invariant(&self) -> bool {
        let mut ret = true;
        for level in 1..=self.depth() {
            let below = self.level_len(level - 1);
            let here = self.level_len(level);
            if here != below.div_ceil(2) {
                error!("Level {level} has {here} nodes, expected {}", below.div_ceil(2));
                ret = false;
            }
            let Some(range) = self.level(level) else {
                continue;
            };
            let last = range.end - 1;
            for id in range {
                let duplicated = self.nodes[id].is_duplicated_pair();
                let should_duplicate = id == last && below % 2 == 1;
                if duplicated != should_duplicate {
                    error!(
                        "Node {:?} duplicated pair flag is {duplicated}, expected {should_duplicate}",
                        self.nodes[id]
                    );
                    ret = false;
                }
            }
        }
        ret
    }

    /// Runs every structural check, logging each violation found.
    pub fn invariant_checks(&self) -> bool {
        self.check_parent_invariant() && self.check_level_invariant() && self.check_hash_invariant()
    }
}

impl fmt::Debug for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MerkleTree: {} leaves, depth {}, engine {}",
            self.leaf_count(),
            self.depth(),
            self.engine().strategy()
        )?;
        for node in self.node_iterator() {
            write!(f, "{}", self.print_node_details(node))?;
        }
        Ok(())
    }
}
