//! Ordering and determinism properties of the section accumulator

use proptest::prelude::*;
use texreport::{Node, ScopeLevel, SectionAccumulator};

#[derive(Debug, Clone)]
enum Op {
    Emit(u32),
    Begin(usize),
    Flush(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Emit),
        2 => (0usize..=2).prop_map(Op::Begin),
        1 => (0usize..=3).prop_map(Op::Flush),
    ]
}

/// Replay operations, skipping scope openings that would be rejected
fn replay(ops: &[Op]) -> (Vec<Node>, Vec<u32>) {
    let mut acc = SectionAccumulator::new();
    let mut emitted = Vec::new();
    let mut titles = 0;
    for op in ops {
        match op {
            Op::Emit(n) => {
                acc.emit(Node::Raw(n.to_string()));
                emitted.push(*n);
            }
            Op::Begin(depth) => {
                if let Some(level) = ScopeLevel::from_depth(*depth) {
                    if *depth <= acc.depth() {
                        titles += 1;
                        acc.begin_scope(level, format!("s{}", titles), true).unwrap();
                    }
                }
            }
            Op::Flush(level) => acc.flush(*level),
        }
    }
    acc.flush(0);
    (acc.into_root().unwrap(), emitted)
}

/// Depth-first order of all raw content in the tree
fn content_order(nodes: &[Node], out: &mut Vec<u32>) {
    for node in nodes {
        match node {
            Node::Raw(text) => out.push(text.parse().unwrap()),
            Node::Scope(scope) => content_order(&scope.children, out),
            _ => {}
        }
    }
}

/// Every scope sits directly below a scope one level shallower
fn nesting_is_valid(nodes: &[Node], depth: usize) -> bool {
    nodes.iter().all(|node| match node {
        Node::Scope(scope) => {
            scope.level.depth() == depth && nesting_is_valid(&scope.children, depth + 1)
        }
        _ => true,
    })
}

proptest! {
    #[test]
    fn test_content_keeps_emission_order(ops in prop::collection::vec(op(), 0..60)) {
        let (root, emitted) = replay(&ops);
        let mut seen = Vec::new();
        content_order(&root, &mut seen);
        prop_assert_eq!(seen, emitted);
    }

    #[test]
    fn test_tree_nesting_is_valid(ops in prop::collection::vec(op(), 0..60)) {
        let (root, _) = replay(&ops);
        prop_assert!(nesting_is_valid(&root, 0));
    }

    #[test]
    fn test_replay_is_deterministic(ops in prop::collection::vec(op(), 0..60)) {
        prop_assert_eq!(replay(&ops).0, replay(&ops).0);
    }
}
