use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use dataforge_core::{ParsedSchema, parse_schema};
use dataforge_generate::{FilePrefix, GenerateOptions, GenerationEngine, GenerationError};

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("dataforge_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn example_schema() -> Value {
    json!({"id": "int:rand(1,5)", "status": "str:[a,b]"})
}

fn options(out_dir: &Path, files_count: u64, lines: u64, workers: usize) -> GenerateOptions {
    GenerateOptions {
        out_dir: out_dir.to_path_buf(),
        file_name: "data".to_string(),
        prefix: FilePrefix::Count,
        files_count,
        lines_per_file: lines,
        workers,
        seed: Some(42),
    }
}

fn assert_example_line(line: &str) {
    let value: Value = serde_json::from_str(line).expect("line is json");
    let object = value.as_object().expect("line is an object");
    assert_eq!(object.len(), 2);
    let id = object.get("id").and_then(Value::as_i64).expect("id");
    assert!((1..=5).contains(&id));
    let status = object.get("status").and_then(Value::as_str).expect("status");
    assert!(status == "a" || status == "b");
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read out dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn console_output_has_one_json_object_per_line() {
    let schema = parse_schema(&example_schema()).expect("parse schema");
    let engine = GenerationEngine::new(options(Path::new("."), 0, 3, 1));

    let mut buffer = Vec::new();
    let stats = engine
        .write_console(&schema, &mut buffer)
        .expect("write console");

    let text = String::from_utf8(buffer).expect("utf8 output");
    assert_eq!(stats.lines, 3);
    assert_eq!(stats.bytes, text.len() as u64);
    assert!(text.ends_with('\n'));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        assert!(!line.contains(' '), "line should be compact: {line}");
        assert_example_line(line);
    }
}

#[test]
fn sequential_files_are_numbered_from_one() {
    let out_dir = temp_out_dir("sequential");
    let schema = parse_schema(&example_schema()).expect("parse schema");
    let engine = GenerationEngine::new(options(&out_dir, 3, 4, 1));

    let report = engine.generate_files(&schema).expect("generate files");

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.lines_written, 12);
    assert_eq!(
        sorted_names(&out_dir),
        vec!["1_data.json", "2_data.json", "3_data.json"]
    );
    for file in &report.files {
        let contents = fs::read_to_string(&file.path).expect("read file");
        assert_eq!(contents.len() as u64, file.bytes);
        assert_eq!(contents.lines().count(), 4);
        contents.lines().for_each(assert_example_line);
    }
}

#[tokio::test]
async fn parallel_files_cover_every_index_once() {
    let out_dir = temp_out_dir("parallel");
    let engine = GenerationEngine::new(options(&out_dir, 11, 2, 4));
    assert!(engine.should_parallelize());
    assert_eq!(engine.options().workers, 4);

    let report = engine
        .generate_files_parallel(&example_schema())
        .await
        .expect("parallel run");

    assert_eq!(report.workers, 4);
    let indices: Vec<u64> = report.files.iter().map(|file| file.index).collect();
    assert_eq!(indices, (1..=11).collect::<Vec<u64>>());

    let mut expected: Vec<String> = (1..=11).map(|index| format!("{index}_data.json")).collect();
    expected.sort();
    assert_eq!(sorted_names(&out_dir), expected);
    assert_eq!(report.lines_written, 22);
    assert_eq!(report.paths().count(), 11);
    assert!(report.paths().all(|path| path.starts_with(&out_dir) && path.is_file()));
}

#[tokio::test]
async fn seeded_output_does_not_depend_on_worker_count() {
    let raw = json!({"id": "int:rand", "code": "str:rand", "tier": "int:[1,2,3]"});
    let schema = parse_schema(&raw).expect("parse schema");

    let sequential_dir = temp_out_dir("seeded_seq");
    GenerationEngine::new(options(&sequential_dir, 5, 10, 1))
        .generate_files(&schema)
        .expect("sequential run");

    let parallel_dir = temp_out_dir("seeded_par");
    GenerationEngine::new(options(&parallel_dir, 5, 10, 3))
        .generate_files_parallel(&raw)
        .await
        .expect("parallel run");

    for index in 1..=5 {
        let name = format!("{index}_data.json");
        let left = fs::read_to_string(sequential_dir.join(&name)).expect("sequential file");
        let right = fs::read_to_string(parallel_dir.join(&name)).expect("parallel file");
        assert_eq!(left, right, "{name} differs");
    }
}

#[tokio::test]
async fn uuid_prefixed_files_are_unique() {
    let out_dir = temp_out_dir("uuid");
    let mut options = options(&out_dir, 6, 1, 2);
    options.prefix = FilePrefix::Uuid;
    options.seed = None;

    let report = GenerationEngine::new(options)
        .generate_files_parallel(&example_schema())
        .await
        .expect("parallel run");

    let names = sorted_names(&out_dir);
    assert_eq!(names.len(), 6);
    for name in names {
        let prefix = name.strip_suffix("_data.json").expect("suffix");
        assert!(uuid::Uuid::parse_str(prefix).is_ok(), "{prefix}");
    }
    assert_eq!(report.files.len(), 6);
}

#[test]
fn missing_output_directory_is_rejected() {
    let out_dir = temp_out_dir("missing").join("does_not_exist");
    let schema = ParsedSchema::from_pairs([("id", "int:rand")]).expect("parse schema");
    let engine = GenerationEngine::new(options(&out_dir, 2, 1, 1));

    let err = engine.generate_files(&schema).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidRequest(_)));
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn invalid_schema_fails_before_any_file_is_written() {
    let out_dir = temp_out_dir("invalid");
    let engine = GenerationEngine::new(options(&out_dir, 4, 1, 2));

    let err = engine
        .generate_files_parallel(&json!({"f": "int:[1,two,3]"}))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Schema(_)));
    assert!(sorted_names(&out_dir).is_empty());
}

#[test]
fn unwritable_target_fails_loudly() {
    let out_dir = temp_out_dir("blocked");
    fs::create_dir_all(out_dir.join("1_data.json")).expect("create blocking dir");
    let schema = ParsedSchema::from_pairs([("id", "int:rand")]).expect("parse schema");
    let engine = GenerationEngine::new(options(&out_dir, 1, 5, 1));

    let err = engine.generate_files(&schema).unwrap_err();
    assert!(matches!(err, GenerationError::Write { .. }), "{err:?}");
}

#[test]
fn console_lines_keep_schema_document_order() {
    let schema = parse_schema(&json!({"zeta": "int:1", "alpha": "int:2"})).expect("parse schema");
    let engine = GenerationEngine::new(options(Path::new("."), 0, 1, 1));

    let mut buffer = Vec::new();
    engine
        .write_console(&schema, &mut buffer)
        .expect("write console");
    assert_eq!(String::from_utf8(buffer).expect("utf8"), "{\"zeta\":1,\"alpha\":2}\n");
}

#[test]
fn huge_file_count_fails_on_first_write_instead_of_allocating() {
    let out_dir = temp_out_dir("huge_count");
    fs::create_dir_all(out_dir.join("1_d.json")).expect("create blocking dir");
    let schema = ParsedSchema::from_pairs([("id", "int:rand")]).expect("parse schema");
    let mut options = options(&out_dir, i64::MAX as u64, 1, 1);
    options.file_name = "d".to_string();

    let err = GenerationEngine::new(options)
        .generate_files(&schema)
        .unwrap_err();
    assert!(matches!(err, GenerationError::Write { .. }), "{err:?}");
}

#[tokio::test]
async fn failed_worker_does_not_stop_its_siblings() {
    let out_dir = temp_out_dir("worker_failure");
    fs::create_dir_all(out_dir.join("3_data.json")).expect("create blocking dir");
    let engine = GenerationEngine::new(options(&out_dir, 6, 2, 2));

    let err = engine
        .generate_files_parallel(&example_schema())
        .await
        .unwrap_err();

    match &err {
        GenerationError::Write { path, .. } => assert!(path.ends_with("3_data.json"), "{err:?}"),
        other => panic!("expected write error, got {other:?}"),
    }
    for index in [1, 2, 4, 5, 6] {
        let path = out_dir.join(format!("{index}_data.json"));
        assert!(path.is_file(), "{} should have been written", path.display());
    }
}
