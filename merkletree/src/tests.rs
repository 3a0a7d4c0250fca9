#[cfg(test)]
mod component_tests {
    use rand::prelude::*;
    use sm3hash::{CompressionStrategy, Sm3Digest, Sm3Engine};
    use tracing_test::traced_test;

    use crate::*;

    fn leaves(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("leaf_{i}")).collect()
    }

    fn build(n: usize) -> MerkleTree {
        MerkleTree::build(Sm3Engine::default(), &BuildOptions::sequential(), &leaves(n)).unwrap()
    }

    fn flip_bit(digest: &Sm3Digest, byte: usize) -> Sm3Digest {
        let mut bytes = *digest.as_array();
        bytes[byte] ^= 0x01;
        Sm3Digest::from(bytes)
    }

    #[test]
    fn simple_test() {
        let engine = Sm3Engine::default();
        let tree = MerkleTree::build(engine, &BuildOptions::default(), &["hello world", "pikachu"])
            .unwrap();
        let h1 = engine.hash(b"hello world").unwrap();
        let h2 = engine.hash(b"pikachu").unwrap();

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_hashes(), vec![h1, h2]);
        assert_eq!(*tree.root_hash(), hash_node_pair(engine, &h1, &h2).unwrap());

        let root = tree.root();
        assert_eq!(root.children(), Some((0, 1)));
        assert_eq!(root.parent(), None);
        assert_eq!(tree.node(0).unwrap().parent(), Some(root.id()));
        assert!(tree.node(1).unwrap().is_leaf());
        assert!(tree.node(5).is_none());
        assert!(tree.invariant_checks());
    }

    #[test]
    fn odd_levels_duplicate_last_node() {
        let engine = Sm3Engine::default();
        let hashes: Vec<Sm3Digest> = leaves(3)
            .iter()
            .map(|l| engine.hash(l.as_bytes()).unwrap())
            .collect();
        let three =
            MerkleTree::from_leaf_hashes(engine, &BuildOptions::default(), hashes.clone()).unwrap();

        let mut padded = hashes.clone();
        padded.push(hashes[2]);
        let four = MerkleTree::from_leaf_hashes(engine, &BuildOptions::default(), padded).unwrap();
        assert_eq!(three.root_hash(), four.root_hash());
        assert!(three.node(4).unwrap().is_duplicated_pair());
        assert!(four.has_duplicate_leaves());

        // five leaves: the lone node is duplicated at two levels
        let five = build(5);
        let h: Vec<Sm3Digest> = five.leaf_hashes();
        let pair = |l: &Sm3Digest, r: &Sm3Digest| hash_node_pair(engine, l, r).unwrap();
        let n01 = pair(&h[0], &h[1]);
        let n23 = pair(&h[2], &h[3]);
        let n44 = pair(&h[4], &h[4]);
        let expected = pair(&pair(&n01, &n23), &pair(&n44, &n44));
        assert_eq!(*five.root_hash(), expected);
        assert_eq!(five.depth(), 3);
        assert!(five.invariant_checks());
    }

    #[test]
    fn single_leaf() {
        let tree = build(1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.root_hash(), &tree.leaf_hashes()[0]);
        let proof = tree.prove_index(0).unwrap();
        assert!(proof.siblings.is_empty());
        assert!(tree.verify(&tree.leaf_hashes()[0], &proof));
        assert!(tree.invariant_checks());
    }

    #[test]
    fn every_proof_verifies() {
        for n in 1..=17 {
            let tree = build(n);
            assert_eq!(tree.depth(), tree_depth(n));
            assert!(tree.invariant_checks(), "n = {n}");
            for (i, hash) in tree.leaf_hashes().iter().enumerate() {
                let proof = tree.prove_index(i).unwrap();
                assert_eq!(proof.siblings.len(), tree_depth(n));
                assert!(verify(tree.engine(), hash, &proof, tree.root_hash()));
                assert_eq!(tree.prove_inclusion(hash).unwrap(), proof);
            }
        }
    }

    #[test]
    fn altered_proofs_fail() {
        let tree = build(11);
        let engine = tree.engine();
        let root = tree.root_hash();
        for i in 0..tree.leaf_count() {
            let leaf = tree.leaf_hashes()[i];
            let proof = tree.prove_index(i).unwrap();

            assert!(!verify(engine, &flip_bit(&leaf, 7), &proof, root));
            assert!(!verify(engine, &leaf, &proof, &flip_bit(root, 31)));
            for s in 0..proof.siblings.len() {
                let mut bad = proof.clone();
                bad.siblings[s] = flip_bit(&bad.siblings[s], 0);
                assert!(!verify(engine, &leaf, &bad, root), "leaf {i} sibling {s}");
            }

            let mut short = proof.clone();
            short.siblings.pop();
            assert!(!verify(engine, &leaf, &short, root));

            let mut long = proof.clone();
            long.siblings.push(leaf);
            assert!(!verify(engine, &leaf, &long, root));

            let mut moved = proof.clone();
            moved.leaf_index = (i + 1) % tree.leaf_count();
            assert!(!verify(engine, &leaf, &moved, root));
        }
    }

    #[test]
    fn index_and_count_are_checked() {
        let tree = build(6);
        let leaf = tree.leaf_hashes()[2];
        let proof = tree.prove_index(2).unwrap();

        let mut out_of_range = proof.clone();
        out_of_range.leaf_index = 6;
        assert!(!verify(tree.engine(), &leaf, &out_of_range, tree.root_hash()));

        // same depth, different shape
        let mut other_count = proof.clone();
        other_count.leaf_count = 7;
        assert!(!tree.verify(&leaf, &other_count));

        assert_eq!(
            tree.prove_index(6),
            Err(MerkleError::LeafIndexOutOfRange { index: 6, count: 6 })
        );
    }

    #[test]
    fn empty_input() {
        let none: [&[u8]; 0] = [];
        assert_eq!(
            MerkleTree::build(Sm3Engine::default(), &BuildOptions::default(), &none).unwrap_err(),
            MerkleError::EmptyInput
        );
        assert_eq!(
            MerkleTree::from_leaf_hashes(Sm3Engine::default(), &BuildOptions::default(), vec![])
                .unwrap_err(),
            MerkleError::EmptyInput
        );
    }

    #[test]
    fn unknown_leaf() {
        let tree = build(4);
        let stranger = tree.engine().hash(b"not a leaf").unwrap();
        assert_eq!(
            tree.prove_inclusion(&stranger),
            Err(MerkleError::LeafNotFound(stranger))
        );
    }

    #[test]
    #[traced_test]
    fn duplicate_leaves_are_ambiguous() {
        let engine = Sm3Engine::default();
        let tree =
            MerkleTree::build(engine, &BuildOptions::default(), &["a", "b", "a", "c"]).unwrap();
        assert!(logs_contain("duplicate an earlier leaf hash"));
        assert!(tree.has_duplicate_leaves());

        let a = engine.hash(b"a").unwrap();
        assert_eq!(
            tree.prove_inclusion(&a),
            Err(MerkleError::AmbiguousLeaf { hash: a, count: 2 })
        );

        // each copy can still be proven by position
        for i in [0, 2] {
            let proof = tree.prove_index(i).unwrap();
            assert!(tree.verify(&a, &proof));
        }
        let b = engine.hash(b"b").unwrap();
        assert_eq!(tree.prove_inclusion(&b).unwrap().leaf_index, 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(42);
        let data: Vec<Vec<u8>> = (0..1000)
            .map(|_| {
                let mut v = vec![0u8; rng.gen_range(0..200)];
                rng.fill_bytes(&mut v);
                v
            })
            .collect();
        let parallel = BuildOptions {
            parallel: true,
            min_parallel_leaves: 1,
        };
        for strategy in CompressionStrategy::ALL {
            let engine = Sm3Engine::new(strategy);
            let a = MerkleTree::build(engine, &parallel, &data).unwrap();
            let b = MerkleTree::build(engine, &BuildOptions::sequential(), &data).unwrap();
            assert_eq!(a.root_hash(), b.root_hash(), "{strategy}");
            assert_eq!(a.leaf_hashes(), b.leaf_hashes());
            assert_eq!(a.prove_index(999).unwrap(), b.prove_index(999).unwrap());
        }
    }

    #[test]
    fn proofs_travel_with_bincode() {
        let tree = build(9);
        let proof = tree.prove_index(8).unwrap();
        let bytes = bincode::serialize(&proof).unwrap();
        let received: InclusionProof = bincode::deserialize(&bytes).unwrap();
        assert!(verify(
            Sm3Engine::default(),
            &tree.leaf_hashes()[8],
            &received,
            tree.root_hash()
        ));
    }

    #[test]
    fn depth_per_leaf_count() {
        let expected = [(1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (1024, 10), (1025, 11)];
        for (n, depth) in expected {
            assert_eq!(tree_depth(n), depth, "n = {n}");
        }
    }

    #[test]
    fn debug_output() {
        let tree = build(3);
        let printed = format!("{tree:?}");
        assert!(printed.starts_with("MerkleTree: 3 leaves, depth 2"));
        assert!(printed.contains("paired with itself"));
        assert!(printed.contains(&tree.root_hash().hex()));
    }
}
