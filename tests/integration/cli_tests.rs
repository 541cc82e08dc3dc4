//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// `:app` uses `:core`; `:feature:x` declares `:core` without touching it
fn create_project() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();

    write(
        root,
        "modgraph-project.json",
        r#"{
  "modules": [
    { "path": ":app", "dir": "app", "kind": "android-application" },
    { "path": ":feature:x", "dir": "feature/x", "kind": "jvm-library" },
    { "path": ":core", "dir": "core", "kind": "jvm-library" }
  ],
  "dependencies": [
    { "from": ":app", "to": ":feature:x", "configuration": "implementation" },
    { "from": ":app", "to": ":core", "configuration": "implementation" },
    { "from": ":feature:x", "to": ":core", "configuration": "api" }
  ]
}"#,
    );
    write(
        root,
        "app/src/main/kotlin/com/example/app/MainActivity.kt",
        "package com.example.app\n\nimport com.example.core.Clock\nimport com.example.feature.x.XScreen\n",
    );
    write(
        root,
        "feature/x/src/main/kotlin/com/example/feature/x/XScreen.kt",
        "package com.example.feature.x\n\nclass XScreen\n",
    );
    write(
        root,
        "core/src/main/kotlin/com/example/core/Clock.kt",
        "package com.example.core\n\nclass Clock\n",
    );

    temp
}

/// `:feature:x` reaches `:data:y` only through a use case in `:domain:z`
fn create_layered_project() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();

    write(
        root,
        "modgraph-project.json",
        r#"{
  "modules": [
    { "path": ":feature:x", "dir": "feature/x", "kind": "jvm-library" },
    { "path": ":domain:z", "dir": "domain/z", "kind": "jvm-library" },
    { "path": ":data:y", "dir": "data/y", "kind": "jvm-library" }
  ],
  "dependencies": [
    { "from": ":feature:x", "to": ":domain:z", "configuration": "implementation" },
    { "from": ":feature:x", "to": ":data:y", "configuration": "implementation" },
    { "from": ":domain:z", "to": ":data:y", "configuration": "implementation" }
  ]
}"#,
    );
    write(
        root,
        "feature/x/src/main/kotlin/com/app/feature/x/XViewModel.kt",
        "package com.app.feature.x\n\nimport com.app.domain.z.GetUserUseCase\n",
    );
    write(
        root,
        "domain/z/src/main/kotlin/com/app/domain/z/GetUserUseCase.kt",
        "package com.app.domain.z\n\nimport com.app.data.y.model.User\n\nclass GetUserUseCase\n",
    );
    write(
        root,
        "data/y/src/main/kotlin/com/app/data/y/model/User.kt",
        "package com.app.data.y.model\n\ndata class User(val name: String)\n",
    );

    temp
}

fn modgraph() -> Command {
    Command::cargo_bin("modgraph").unwrap()
}

#[test]
fn test_help() {
    modgraph()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--unused-deps"))
        .stdout(predicate::str::contains("--centrality-limit"));
}

#[test]
fn test_missing_project_model_fails() {
    let temp = tempfile::tempdir().unwrap();

    modgraph()
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project model found"));
}

#[test]
fn test_unused_dependency_fails_the_run() {
    let project = create_project();

    modgraph()
        .arg(project.path())
        .arg("--unused-deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Modules with unused dependencies"))
        .stderr(predicate::str::contains(":feature:x -> [:core]"));

    let output = project.path().join("build/modgraph");
    assert!(output.join("matching_modules_with_package.txt").exists());
    assert!(output.join("allowed_modules.json").exists());
}

#[test]
fn test_warn_only_dependency_passes() {
    let project = create_project();

    modgraph()
        .arg(project.path())
        .args(["--unused-deps", "--warn-only", ":core"])
        .assert()
        .success();
}

#[test]
fn test_graph_and_metrics_artifacts() {
    let project = create_project();

    modgraph()
        .arg(project.path())
        .args(["--graph", "--metrics", "--output-dir", "reports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Written:"));

    let output = project.path().join("reports");
    let dot = fs::read_to_string(output.join("dependency_graph.gv")).unwrap();
    assert!(dot.starts_with("strict digraph DependencyGraph {"));
    assert!(dot.contains("\":feature:x\" -> \":core\""));

    let centrality = fs::read_to_string(output.join("centrality.txt")).unwrap();
    assert!(centrality.contains(":core"));
    assert!(output.join("sorted_dependencies_in_depth.txt").exists());
    assert!(output.join("alphabetic_dependents_in_depth.json").exists());
}

#[test]
fn test_ignored_module_is_not_checked() {
    let project = create_project();

    modgraph()
        .arg(project.path())
        .args(["--unused-deps", "--ignore-module", ":feature:x", "--quiet"])
        .assert()
        .success();
}

#[test]
fn test_library_without_resources_fails() {
    let temp = tempfile::tempdir().unwrap();
    write(
        temp.path(),
        "modgraph-project.json",
        r#"{ "modules": [ { "path": ":logic", "dir": "logic", "kind": "android-library" } ] }"#,
    );
    write(temp.path(), "logic/src/main/kotlin/com/example/logic/Logic.kt", "class Logic\n");

    modgraph()
        .arg(temp.path())
        .arg("--unused-resources")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Modules to disable resources: :logic"));
}

#[test]
fn test_portability_writes_module_status() {
    let temp = tempfile::tempdir().unwrap();
    write(
        temp.path(),
        "modgraph-project.json",
        r#"{ "modules": [ { "path": ":util", "dir": "util", "kind": "android-library" } ] }"#,
    );
    write(temp.path(), "util/src/main/kotlin/com/example/util/Dates.kt", "import java.time.LocalDate\n");

    modgraph()
        .arg(temp.path())
        .arg("--portability")
        .assert()
        .success();

    let status = fs::read_to_string(temp.path().join("build/modgraph/module_status.txt")).unwrap();
    assert!(status.contains(":util"));
}

#[test]
fn test_verbose_traces_allowance_walk() {
    let project = create_layered_project();

    modgraph()
        .env_remove("RUST_LOG")
        .arg(project.path())
        .args(["--unused-deps", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("allows :data:y"));
}

#[test]
fn test_default_run_hides_allowance_walk() {
    let project = create_layered_project();

    modgraph()
        .env_remove("RUST_LOG")
        .arg(project.path())
        .arg("--unused-deps")
        .assert()
        .success()
        .stderr(predicate::str::contains("allows :data:y").not());
}

#[test]
fn test_quiet_portability_prints_nothing() {
    let temp = tempfile::tempdir().unwrap();
    write(
        temp.path(),
        "modgraph-project.json",
        r#"{ "modules": [ { "path": ":util", "dir": "util", "kind": "android-library" } ] }"#,
    );
    write(temp.path(), "util/src/main/kotlin/com/example/util/Dates.kt", "import java.time.LocalDate\n");

    modgraph()
        .arg(temp.path())
        .args(["--portability", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
