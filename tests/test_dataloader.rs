use fewshot::data::dataloader::{load_csv, load_json, save_csv, save_json};
use fewshot::example;
use rstest::*;

#[rstest]
fn test_jsonl_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.jsonl");
    let path = path.to_str().unwrap();

    let examples = vec![
        example! { "question": "input" => "q0", "answer": "output" => "a0" },
        example! { "question": "input" => "q1", "answer": "output" => "a1" },
    ];
    save_json(path, &examples, true).unwrap();

    let loaded = load_json(
        path,
        true,
        vec!["question".to_string()],
        vec!["answer".to_string()],
    )
    .unwrap();

    assert_eq!(loaded, examples);
    assert_eq!(loaded[0].input_keys(), ["question".to_string()]);
    assert_eq!(loaded[1].get("answer", None), "a1");
}

#[rstest]
fn test_json_array_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    let path = path.to_str().unwrap();

    let examples = vec![example! { "question": "input" => "q0", "answer": "output" => "a0" }];
    save_json(path, &examples, false).unwrap();

    let loaded = load_json(
        path,
        false,
        vec!["question".to_string()],
        vec![],
    )
    .unwrap();

    assert_eq!(loaded, examples);
    assert_eq!(loaded[0].output_keys(), ["answer".to_string()]);
}

#[rstest]
fn test_csv_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.csv");
    let path = path.to_str().unwrap();

    let examples = vec![
        example! { "question": "input" => "q0", "answer": "output" => "a0" },
        example! { "question": "input" => "q1", "answer": "output" => "a1" },
    ];
    save_csv(path, &examples, ',').unwrap();

    let loaded = load_csv(
        path,
        ',',
        vec!["question".to_string()],
        vec!["answer".to_string()],
    )
    .unwrap();

    assert_eq!(loaded, examples);
}

#[rstest]
fn test_save_empty_csv_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    save_csv(path.to_str().unwrap(), &[], ',').unwrap();
    assert!(!path.exists());
}
