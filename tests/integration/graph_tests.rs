//! Graph construction tests against exported project models

use modgraph::config::Config;
use modgraph::graph::{EdgeTrait, GraphBuilder, ModuleKind, ProjectModel};
use modgraph::ModgraphError;
use std::fs;
use std::path::Path;

const MODEL: &str = r#"{
  "modules": [
    { "path": ":app", "dir": "app", "kind": "android-application" },
    { "path": ":feature:login", "dir": "feature/login", "kind": "android-library" },
    { "path": ":core:ui", "dir": "core/ui", "kind": "android-library",
      "namespace": "com.example.core.ui" },
    { "path": ":core:model", "dir": "core/model", "kind": "jvm-library" },
    { "path": ":shared", "dir": "shared", "kind": "multiplatform" },
    { "path": ":sample", "dir": "sample", "kind": "android-application" }
  ],
  "dependencies": [
    { "from": ":app", "to": ":feature:login", "configuration": "implementation" },
    { "from": ":feature:login", "to": ":core:ui", "configuration": "implementation" },
    { "from": ":feature:login", "to": ":core:ui", "configuration": "api" },
    { "from": ":feature:login", "to": ":core:model", "configuration": "implementation" },
    { "from": ":core:ui", "to": ":core:model", "configuration": "api" },
    { "from": ":sample", "to": ":core:ui", "configuration": "implementation" },
    { "from": ":core:model", "to": ":core:model", "configuration": "implementation" }
  ],
  "external_dependencies": [
    { "from": ":core:ui", "coordinate": "androidx.compose.ui:ui", "configuration": "api" },
    { "from": ":core:ui", "coordinate": "junit:junit", "configuration": "testImplementation" }
  ]
}"#;

fn write_model(root: &Path, contents: &str) -> ProjectModel {
    let path = root.join("modgraph-project.json");
    fs::write(&path, contents).unwrap();
    ProjectModel::from_default_locations(root).unwrap()
}

#[test]
fn test_model_root_anchors_module_dirs() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(temp.path(), MODEL);
    let graph = GraphBuilder::new(&Config::default())
        .build(&model, Path::new("elsewhere"))
        .unwrap();

    assert_eq!(graph.root_dir(), temp.path());
    assert_eq!(
        graph.module(":feature:login").unwrap().dir,
        temp.path().join("feature/login")
    );
    assert_eq!(
        graph.module(":core:ui").unwrap().namespace.as_deref(),
        Some("com.example.core.ui")
    );
}

#[test]
fn test_duplicate_edges_merge_traits() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(temp.path(), MODEL);
    let graph = GraphBuilder::new(&Config::default())
        .build(&model, temp.path())
        .unwrap();

    let traits = graph.traits(":feature:login", ":core:ui").unwrap();
    assert!(traits.is_api());
    assert_eq!(
        traits.iter().copied().collect::<Vec<_>>(),
        vec![EdgeTrait::Api, EdgeTrait::Implementation]
    );
    assert!(!graph.traits(":app", ":feature:login").unwrap().is_api());
    assert!(graph.traits(":core:model", ":core:model").is_none());
}

#[test]
fn test_ignored_module_and_its_edges_are_dropped() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(temp.path(), MODEL);
    let config = Config {
        ignored_modules: vec![":sample".to_string()],
        ..Config::default()
    };
    let graph = GraphBuilder::new(&config).build(&model, temp.path()).unwrap();

    assert!(!graph.contains(":sample"));
    assert_eq!(graph.module_count(), 5);
    let dependents: Vec<&str> = graph
        .direct_dependents(":core:ui")
        .into_iter()
        .map(|m| m.path.as_str())
        .collect();
    assert_eq!(dependents, vec![":feature:login"]);
}

#[test]
fn test_roots_leaves_and_isolated_modules() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(temp.path(), MODEL);
    let graph = GraphBuilder::new(&Config::default())
        .build(&model, temp.path())
        .unwrap();

    let roots: Vec<&str> = graph.roots().map(|m| m.path.as_str()).collect();
    let leaves: Vec<&str> = graph.leaves().map(|m| m.path.as_str()).collect();

    assert_eq!(roots, vec![":app", ":sample", ":shared"]);
    assert_eq!(leaves, vec![":core:model", ":shared"]);
}

#[test]
fn test_module_classification() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(temp.path(), MODEL);
    let graph = GraphBuilder::new(&Config::default())
        .build(&model, temp.path())
        .unwrap();

    let platform: Vec<&str> = graph.platform_modules().map(|m| m.path.as_str()).collect();
    assert_eq!(platform, vec![":app", ":core:ui", ":feature:login", ":sample"]);

    let resources: Vec<&str> = graph
        .resource_enabled_modules()
        .map(|m| m.path.as_str())
        .collect();
    assert_eq!(resources, vec![":core:ui", ":feature:login"]);

    assert_eq!(graph.jvm_modules().count(), 1);
    assert_eq!(graph.multiplatform_modules().count(), 1);
    assert_eq!(graph.module(":app").unwrap().kind, ModuleKind::AndroidApplication);
}

#[test]
fn test_only_compile_configurations_become_external_edges() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(temp.path(), MODEL);
    let graph = GraphBuilder::new(&Config::default())
        .build(&model, temp.path())
        .unwrap();

    assert_eq!(
        graph.external_dependencies(":core:ui"),
        vec!["androidx.compose.ui:ui"]
    );
    assert!(graph.external_dependencies(":app").is_empty());
}

#[test]
fn test_unknown_module_fails_before_building() {
    let temp = tempfile::tempdir().unwrap();
    let model = write_model(
        temp.path(),
        r#"{
  "modules": [ { "path": ":app", "dir": "app", "kind": "android-application" } ],
  "dependencies": [ { "from": ":app", "to": ":missing", "configuration": "implementation" } ]
}"#,
    );

    let err = GraphBuilder::new(&Config::default())
        .build(&model, temp.path())
        .unwrap_err();
    match err {
        ModgraphError::UnknownModule { origin, missing, .. } => {
            assert_eq!(origin, ":app");
            assert_eq!(missing, ":missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_yaml_model_from_build_directory() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp.path().join("build")).unwrap();
    let path = temp.path().join("build/model.yaml");
    fs::write(
        &path,
        "modules:\n  - path: \":core\"\n    dir: core\n    kind: jvm-library\n",
    )
    .unwrap();

    let model = ProjectModel::load(&path).unwrap();
    let graph = GraphBuilder::new(&Config::default())
        .build(&model, temp.path())
        .unwrap();
    assert_eq!(graph.module(":core").unwrap().dir, temp.path().join("core"));
}

#[test]
fn test_missing_model_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let err = ProjectModel::from_default_locations(temp.path()).unwrap_err();
    assert!(matches!(err, ModgraphError::ProjectModelMissing(_)));
}
