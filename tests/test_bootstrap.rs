use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use fewshot::{
    BootstrapFewShot, CompileError, ConfigError, Example, FnMetric, FnStep, LmUsage, Optimizer,
    Pipeline, Prediction, example,
};

fn trainset(n: usize) -> Vec<Example> {
    (0..n)
        .map(|i| {
            example! {
                "question": "input" => format!("q{i}"),
                "answer": "output" => format!("a{i}"),
            }
        })
        .collect()
}

/// Deterministic "model": answers `q{i}` with `a{i}`.
fn solver() -> Pipeline {
    Pipeline::new().step(
        "solve",
        FnStep::new(|inputs| {
            let question = inputs.get("question", None);
            let answer = question.as_str().unwrap_or_default().replace('q', "a");
            Ok(Prediction::new(
                [("answer".to_string(), answer.into())],
                LmUsage::default(),
            ))
        }),
    )
}

fn exact_answer_metric()
-> FnMetric<impl Fn(&Example, &Prediction) -> anyhow::Result<f32> + Send + Sync> {
    FnMetric::new(|example, prediction| {
        Ok(if example.get("answer", None) == prediction.get("answer", None) {
            1.0
        } else {
            0.0
        })
    })
}

#[tokio::test]
async fn collects_first_k_demos_in_order() {
    // 10 examples, cap 4, everything passes: exactly the first 4, in order.
    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(4).build();
    let train = trainset(10);

    let compiled = compiler
        .compile(solver(), train.clone(), &exact_answer_metric())
        .await
        .unwrap();

    let demos = compiled.demos();
    assert_eq!(demos.len(), 4);
    for (demo, example) in demos.iter().zip(&train) {
        assert_eq!(&demo.example, example);
        assert_eq!(demo.prediction.get("answer", None), example.get("answer", None));
        assert_eq!(demo.trace.len(), 1);
    }
}

#[tokio::test]
async fn demo_set_never_exceeds_trainset() {
    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(4).build();
    let compiled = compiler
        .compile(solver(), trainset(3), &exact_answer_metric())
        .await
        .unwrap();

    assert_eq!(compiled.demos().len(), 3);
}

#[tokio::test]
async fn max_labeled_demos_is_a_second_cap() {
    let compiler = BootstrapFewShot::builder()
        .max_bootstrapped_demos(4)
        .max_labeled_demos(2)
        .build();
    let compiled = compiler
        .compile(solver(), trainset(10), &exact_answer_metric())
        .await
        .unwrap();

    assert_eq!(compiled.demos().len(), 2);
}

#[tokio::test]
async fn compile_is_deterministic() {
    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(4).build();
    let train = trainset(10);

    let first = compiler
        .compile(solver(), train.clone(), &exact_answer_metric())
        .await
        .unwrap();
    let second = compiler
        .compile(solver(), train, &exact_answer_metric())
        .await
        .unwrap();

    assert_eq!(first.demos(), second.demos());
}

#[tokio::test]
async fn rejected_examples_are_skipped() {
    // Metric accepts even-numbered questions only.
    let metric = FnMetric::new(|example: &Example, _: &Prediction| {
        let question = example.get("question", None);
        let index: usize = question.as_str().unwrap_or_default()[1..].parse()?;
        Ok(if index % 2 == 0 { 1.0 } else { 0.0 })
    });

    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(3).build();
    let compiled = compiler.compile(solver(), trainset(10), &metric).await.unwrap();

    let questions: Vec<_> = compiled
        .demos()
        .iter()
        .map(|demo| demo.example.get("question", None))
        .collect();
    assert_eq!(questions, vec!["q0", "q2", "q4"]);
}

#[tokio::test]
async fn program_failure_is_a_rejection_not_fatal() {
    let program = Pipeline::new().step(
        "solve",
        FnStep::new(|inputs| {
            let question = inputs.get("question", None);
            if question == "q1" {
                return Err(anyhow!("malformed output"));
            }
            let answer = question.as_str().unwrap_or_default().replace('q', "a");
            Ok(Prediction::new(
                [("answer".to_string(), answer.into())],
                LmUsage::default(),
            ))
        }),
    );

    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(3).build();
    let compiled = compiler
        .compile(program, trainset(4), &exact_answer_metric())
        .await
        .unwrap();

    let questions: Vec<_> = compiled
        .demos()
        .iter()
        .map(|demo| demo.example.get("question", None))
        .collect();
    assert_eq!(questions, vec!["q0", "q2", "q3"]);
}

#[tokio::test]
async fn retry_budget_recovers_flaky_examples() {
    // Fails the first attempt for every question, succeeds on the second.
    fn flaky() -> Pipeline {
        let seen = Mutex::new(HashSet::<String>::new());
        Pipeline::new().step(
            "solve",
            FnStep::new(move |inputs| {
                let question = inputs.get("question", None).to_string();
                if seen.lock().unwrap().insert(question.clone()) {
                    return Err(anyhow!("transient failure"));
                }
                let answer = inputs
                    .get("question", None)
                    .as_str()
                    .unwrap_or_default()
                    .replace('q', "a");
                Ok(Prediction::new(
                    [("answer".to_string(), answer.into())],
                    LmUsage::default(),
                ))
            }),
        )
    }

    let single_round = BootstrapFewShot::builder().max_rounds(1).build();
    let compiled = single_round
        .compile(flaky(), trainset(3), &exact_answer_metric())
        .await
        .unwrap();
    assert!(compiled.demos().is_empty());

    let two_rounds = BootstrapFewShot::builder().max_rounds(2).build();
    let compiled = two_rounds
        .compile(flaky(), trainset(3), &exact_answer_metric())
        .await
        .unwrap();
    assert_eq!(compiled.demos().len(), 3);
}

#[tokio::test]
async fn metric_failure_aborts_compilation() {
    let metric = FnMetric::new(|example: &Example, _: &Prediction| {
        if example.get("question", None) == "q2" {
            Err(anyhow!("oracle offline"))
        } else {
            Ok(1.0)
        }
    });

    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(10).build();
    let err = compiler
        .compile(solver(), trainset(10), &metric)
        .await
        .unwrap_err();

    match err {
        CompileError::Oracle(oracle) => assert_eq!(oracle.index, 2),
        other => panic!("expected oracle failure, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_rounds_is_a_config_error() {
    let compiler = BootstrapFewShot::builder().max_rounds(0).build();
    let err = compiler
        .compile(solver(), trainset(1), &exact_answer_metric())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CompileError::Config(ConfigError::ZeroRounds)
    ));
}

#[tokio::test]
async fn zero_demo_cap_runs_no_invocations() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let program = Pipeline::new().step(
        "solve",
        FnStep::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Prediction::new(
                [("answer".to_string(), "a0".into())],
                LmUsage::default(),
            ))
        }),
    );

    let compiler = BootstrapFewShot::builder().max_bootstrapped_demos(0).build();
    let compiled = compiler
        .compile(program, trainset(5), &exact_answer_metric())
        .await
        .unwrap();

    assert!(compiled.demos().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_demo_caps_are_harmless() {
    // Caps far beyond the trainset must not reserve memory up front.
    let compiler = BootstrapFewShot::builder()
        .max_bootstrapped_demos(usize::MAX)
        .max_labeled_demos(usize::MAX)
        .build();
    let compiled = compiler
        .compile(solver(), trainset(3), &exact_answer_metric())
        .await
        .unwrap();

    assert_eq!(compiled.demos().len(), 3);
}

#[tokio::test]
async fn threshold_is_configurable() {
    let soft_metric = FnMetric::new(|_: &Example, _: &Prediction| Ok(0.6));

    // Truthy convention: any positive score passes.
    let default_bar = BootstrapFewShot::builder().max_bootstrapped_demos(1).build();
    let compiled = default_bar
        .compile(solver(), trainset(1), &soft_metric)
        .await
        .unwrap();
    assert_eq!(compiled.demos().len(), 1);

    let high_bar = BootstrapFewShot::builder()
        .max_bootstrapped_demos(1)
        .metric_threshold(0.8)
        .build();
    let compiled = high_bar
        .compile(solver(), trainset(1), &soft_metric)
        .await
        .unwrap();
    assert!(compiled.demos().is_empty());

    let low_bar = BootstrapFewShot::builder()
        .max_bootstrapped_demos(1)
        .metric_threshold(0.5)
        .build();
    let compiled = low_bar
        .compile(solver(), trainset(1), &soft_metric)
        .await
        .unwrap();
    assert_eq!(compiled.demos().len(), 1);
}
