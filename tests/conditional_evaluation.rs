//! Evaluation scenarios: conditional acceptance, rejection, and memoization

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use pipegraph::{
    evaluate, Accept, Command, CommandStep, Conditional, GraphError, NodeId, Pipeline,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Predicate with a fixed outcome that counts its invocations
struct CountingPredicate {
    outcome: bool,
    calls: Arc<AtomicUsize>,
}

impl CountingPredicate {
    fn new(outcome: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl Accept for CountingPredicate {
    async fn accept(&self) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome)
    }
}

struct FailingPredicate;

#[async_trait]
impl Accept for FailingPredicate {
    async fn accept(&self) -> Result<bool> {
        Err(anyhow!("branch lookup failed"))
    }
}

/// Pipeline "P" from the walkthrough scenario: step A ("lint"), step B
/// ("test", depends on A), step C (no key, no dependencies), and a
/// conditional wrapping B added at the top level alongside C.
fn scenario(outcome: bool) -> (Pipeline, NodeId, NodeId, NodeId, Arc<AtomicUsize>) {
    let mut pipeline = Pipeline::new("P");
    let a = pipeline.add_step(CommandStep::new(vec![Command::new("yarn lint", 5)]).with_key("lint"));
    let b = pipeline.add_step(
        CommandStep::new(vec![Command::new("yarn test", 10)])
            .with_key("test")
            .depends_on(a),
    );
    let c = pipeline.add_step(CommandStep::new(vec![Command::new("yarn build", 5)]));

    let (predicate, calls) = CountingPredicate::new(outcome);
    let conditional = pipeline.add_conditional(Conditional::new(b, predicate));
    pipeline.add(conditional).add(c);

    (pipeline, a, b, c, calls)
}

#[tokio::test]
async fn test_accepted_conditional_substitutes_the_wrapped_step() {
    let (mut pipeline, a, b, c, calls) = scenario(true);

    evaluate(&mut pipeline).await.unwrap();

    assert_eq!(pipeline.steps(), &[b, c]);
    assert_eq!(pipeline.step(b).unwrap().dependencies, vec![a]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejected_conditional_removes_the_slot_entirely() {
    let (mut pipeline, _a, _b, c, calls) = scenario(false);

    evaluate(&mut pipeline).await.unwrap();

    assert_eq!(pipeline.steps(), &[c]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_evaluation_is_a_no_op_without_conditionals() {
    let mut pipeline = Pipeline::new("plain");
    let first = pipeline.add_step(CommandStep::new(vec![Command::new("make", 0)]).with_key("make"));
    let second = pipeline.add_step(
        CommandStep::new(vec![Command::new("make check", 0)])
            .with_key("check")
            .depends_on(first),
    );
    pipeline.add(first).add(second);

    evaluate(&mut pipeline).await.unwrap();

    assert_eq!(pipeline.steps(), &[first, second]);
    assert_eq!(pipeline.step(second).unwrap().dependencies, vec![first]);
}

#[tokio::test]
async fn test_conditional_reachable_from_two_edges_evaluates_once() {
    let mut pipeline = Pipeline::new("P");
    let wrapped =
        pipeline.add_step(CommandStep::new(vec![Command::new("yarn test", 10)]).with_key("test"));
    let (predicate, calls) = CountingPredicate::new(true);
    let conditional = pipeline.add_conditional(Conditional::new(wrapped, predicate));
    let dependent = pipeline.add_step(
        CommandStep::new(vec![Command::new("yarn deploy", 0)])
            .with_key("deploy")
            .depends_on(conditional),
    );
    // Same conditional node in a top-level slot and behind a dependency edge.
    pipeline.add(conditional).add(dependent);

    evaluate(&mut pipeline).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(pipeline.steps(), &[wrapped, dependent]);
    assert_eq!(pipeline.step(dependent).unwrap().dependencies, vec![wrapped]);
}

#[tokio::test]
async fn test_rejected_dependency_edge_is_removed_from_the_set() {
    let mut pipeline = Pipeline::new("P");
    let optional =
        pipeline.add_step(CommandStep::new(vec![Command::new("yarn bench", 0)]).with_key("bench"));
    let (predicate, _calls) = CountingPredicate::new(false);
    let conditional = pipeline.add_conditional(Conditional::new(optional, predicate));
    let kept = pipeline.add_step(CommandStep::new(vec![Command::new("yarn lint", 0)]).with_key("lint"));
    let top = pipeline.add_step(
        CommandStep::new(vec![Command::new("yarn release", 0)])
            .depends_on(conditional)
            .depends_on(kept),
    );
    pipeline.add(top);

    evaluate(&mut pipeline).await.unwrap();

    assert_eq!(pipeline.step(top).unwrap().dependencies, vec![kept]);
}

#[tokio::test]
async fn test_predicate_failure_propagates() {
    let mut pipeline = Pipeline::new("P");
    let wrapped = pipeline.add_step(CommandStep::new(vec![Command::new("yarn", 0)]));
    let conditional = pipeline.add_conditional(Conditional::new(wrapped, FailingPredicate));
    pipeline.add(conditional);

    let err = evaluate(&mut pipeline).await.unwrap_err();
    assert!(matches!(err, GraphError::Predicate(_)));
}
