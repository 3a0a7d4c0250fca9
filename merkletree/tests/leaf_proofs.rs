use merkletree::{tree_depth, verify, BuildOptions, MerkleError, MerkleTree};
use sm3hash::{CompressionStrategy, Sm3Engine};

const NUM_LEAVES: usize = 100_000;
const TARGET: usize = 12345;

fn leaves() -> Vec<String> {
    (0..NUM_LEAVES).map(|i| format!("leaf_{i}")).collect()
}

#[test]
fn large_tree_proves_a_leaf_by_hash() {
    let engine = Sm3Engine::new(CompressionStrategy::Unrolled);
    let tree = MerkleTree::build(engine, &BuildOptions::default(), &leaves()).unwrap();
    assert_eq!(tree.leaf_count(), NUM_LEAVES);
    assert_eq!(tree.depth(), 17);
    assert_eq!(tree_depth(NUM_LEAVES), 17);

    let leaf = engine.hash(format!("leaf_{TARGET}").as_bytes()).unwrap();
    let proof = tree.prove_inclusion(&leaf).unwrap();
    assert_eq!(proof.leaf_index, TARGET);
    assert_eq!(proof.leaf_count, NUM_LEAVES);
    assert_eq!(proof.siblings.len(), 17);
    assert!(verify(engine, &leaf, &proof, tree.root_hash()));

    // a proof checked against some other leaf fails
    let other = engine.hash(format!("leaf_{}", TARGET + 1).as_bytes()).unwrap();
    assert!(!verify(engine, &other, &proof, tree.root_hash()));

    // the last leaf sits on the duplicated edge of every odd level
    let last = tree.prove_index(NUM_LEAVES - 1).unwrap();
    assert!(tree.verify(&tree.leaf_hashes()[NUM_LEAVES - 1], &last));
}

#[test]
fn root_does_not_depend_on_strategy_or_threads() {
    let leaves: Vec<String> = leaves().into_iter().take(5000).collect();
    let reference =
        MerkleTree::build(Sm3Engine::default(), &BuildOptions::sequential(), &leaves).unwrap();
    let options = BuildOptions {
        parallel: true,
        min_parallel_leaves: 16,
    };
    for strategy in CompressionStrategy::ALL {
        let tree = MerkleTree::build(Sm3Engine::new(strategy), &options, &leaves).unwrap();
        assert_eq!(tree.root_hash(), reference.root_hash(), "{strategy}");
    }
}

#[test]
fn missing_leaf_is_reported() {
    let leaves: Vec<String> = leaves().into_iter().take(100).collect();
    let tree = MerkleTree::build(Sm3Engine::default(), &BuildOptions::default(), &leaves).unwrap();
    let absent = Sm3Engine::default().hash(b"leaf_100").unwrap();
    assert_eq!(
        tree.prove_inclusion(&absent),
        Err(MerkleError::LeafNotFound(absent))
    );
}
