use std::fs;

use sea_orm::EntityTrait;
use server::entity::problem;
use server::fixtures::{FixtureError, ImportSummary, import_dir, load_fixtures};

use crate::common::{PROBLEM_ID, TestApp};

fn write(dir: &std::path::Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test]
async fn imports_each_problem_directory() {
    let app = TestApp::spawn().await;
    let root = tempfile::tempdir().unwrap();
    write(&root.path().join("10"), "input.txt", "1 2\n3 4\n\n");
    write(&root.path().join("10"), "output.txt", "3\n7\n");
    write(&root.path().join("10"), "title.txt", "A + B\n");
    write(&root.path().join("11"), "input.txt", "x\ny\n");
    write(&root.path().join("notes"), "input.txt", "ignored\n");
    write(&root.path().join("12"), "README", "no fixtures here");

    let summary = import_dir(&app.db, root.path()).await.unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            problems: 2,
            test_cases: 4,
        }
    );

    let cases = load_fixtures(&app.db, 10).await.unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].stdin, "1 2");
    assert_eq!(cases[1].expected_output, "7");

    let titled = problem::Entity::find_by_id(10).one(&app.db).await.unwrap().unwrap();
    assert_eq!(titled.title, "A + B");
    let untitled = problem::Entity::find_by_id(11).one(&app.db).await.unwrap().unwrap();
    assert_eq!(untitled.title, "Problem 11");

    // No output.txt: every case expects empty output.
    let cases = load_fixtures(&app.db, 11).await.unwrap();
    assert!(cases.iter().all(|c| c.expected_output.is_empty()));
}

#[tokio::test]
async fn reimport_replaces_existing_cases() {
    let app = TestApp::spawn().await;
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join(PROBLEM_ID.to_string());
    write(&dir, "input.txt", "5\n");
    write(&dir, "output.txt", "10\n");

    import_dir(&app.db, root.path()).await.unwrap();

    let cases = load_fixtures(&app.db, PROBLEM_ID).await.unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].stdin, "5");
    assert_eq!(cases[0].expected_output, "10");
}

#[tokio::test]
async fn imported_fixtures_are_dispatched_in_file_order() {
    let app = TestApp::spawn().await;
    let root = tempfile::tempdir().unwrap();
    write(&root.path().join("20"), "input.txt", "c\na\nb\n");
    write(&root.path().join("20"), "output.txt", "C\nA\nB\n");
    import_dir(&app.db, root.path()).await.unwrap();

    app.orchestrator
        .create_submission(20, 71, "print(input().upper())")
        .await
        .unwrap();

    let dispatched = &app.judge.dispatches()[0].inputs;
    let stdins: Vec<&str> = dispatched.iter().map(|i| i.stdin.as_str()).collect();
    assert_eq!(stdins, ["c", "a", "b"]);
}

#[tokio::test]
async fn missing_directory_is_an_io_error() {
    let app = TestApp::spawn().await;
    let root = tempfile::tempdir().unwrap();

    let err = import_dir(&app.db, &root.path().join("absent"))
        .await
        .unwrap_err();

    assert!(matches!(err, FixtureError::Io { .. }));
}

#[tokio::test]
async fn unknown_problem_has_no_fixtures() {
    let app = TestApp::spawn().await;

    assert!(load_fixtures(&app.db, 404).await.unwrap().is_empty());
}
