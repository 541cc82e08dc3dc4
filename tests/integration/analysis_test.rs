//! End-to-end analysis tests
//!
//! Each test lays out a small multi-module project in a temp directory,
//! builds the graph and runs the checks over the real file tree.

use modgraph::analysis::{
    Advisory, DependencyMetrics, ModuleStatus, PortabilityChecker, ResourceUsageDetector,
    TransitiveClosure, UnusedDependencyChecker,
};
use modgraph::config::{Config, UnusedConfig};
use modgraph::graph::{
    DependencyEntry, DependencyGraph, ExternalDependencyEntry, GraphBuilder, KindName, ModuleEntry,
    ProjectModel,
};
use modgraph::ModgraphError;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct TestProject {
    dir: TempDir,
    model: ProjectModel,
}

impl TestProject {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let model = ProjectModel {
            root: Some(dir.path().to_path_buf()),
            ..ProjectModel::default()
        };
        Self { dir, model }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn module(mut self, path: &str, kind: KindName) -> Self {
        let dir = path.trim_start_matches(':').replace(':', "/");
        self.model.modules.push(ModuleEntry::new(path, dir, kind));
        self
    }

    fn depends(mut self, from: &str, to: &str) -> Self {
        self.model
            .dependencies
            .push(DependencyEntry::new(from, to, "implementation"));
        self
    }

    fn library(mut self, from: &str, coordinate: &str) -> Self {
        self.model
            .external_dependencies
            .push(ExternalDependencyEntry::new(from, coordinate, "implementation"));
        self
    }

    fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    fn graph(&self, config: &Config) -> DependencyGraph {
        GraphBuilder::new(config).build(&self.model, self.root()).unwrap()
    }
}

// ============================================================================
// Unused dependencies
// ============================================================================

#[test]
fn test_aggregator_unused_dependency_is_exempt() {
    let project = TestProject::new()
        .module(":app", KindName::AndroidApplication)
        .module(":core", KindName::JvmLibrary)
        .depends(":app", ":core")
        .file("app/src/main/kotlin/com/app/MainActivity.kt", "package com.app\n\nclass MainActivity\n")
        .file("core/src/main/kotlin/com/app/core/Clock.kt", "package com.app.core\n\nclass Clock\n");

    let config = Config::default();
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));

    assert!(report.failures.is_empty());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_unreferenced_dependency_fails_the_run() {
    let project = TestProject::new()
        .module(":feature:x", KindName::AndroidLibrary)
        .module(":data:y", KindName::JvmLibrary)
        .depends(":feature:x", ":data:y")
        .file(
            "feature/x/src/main/kotlin/com/app/feature/x/XScreen.kt",
            "package com.app.feature.x\n\nclass XScreen\n",
        )
        .file(
            "data/y/src/main/kotlin/com/app/data/y/YRepository.kt",
            "package com.app.data.y\n\nclass YRepository\n",
        );

    let config = Config::default();
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));

    assert_eq!(
        report.failures.get(":feature:x"),
        Some(&BTreeSet::from([":data:y".to_string()]))
    );

    let err = report.into_result().unwrap_err();
    assert!(matches!(err, ModgraphError::UnusedDependencies(_)));
    assert!(err.to_string().contains(":feature:x -> [:data:y]"));
}

#[test]
fn test_model_flowing_through_use_case_is_allowed() {
    let project = TestProject::new()
        .module(":feature:x", KindName::AndroidLibrary)
        .module(":domain:z", KindName::JvmLibrary)
        .module(":data:y", KindName::JvmLibrary)
        .depends(":feature:x", ":domain:z")
        .depends(":feature:x", ":data:y")
        .depends(":domain:z", ":data:y")
        .file(
            "feature/x/src/main/kotlin/com/app/feature/x/XViewModel.kt",
            "package com.app.feature.x\n\nimport com.app.domain.z.GetUserUseCase\n\nclass XViewModel(val getUser: GetUserUseCase)\n",
        )
        .file(
            "domain/z/src/main/kotlin/com/app/domain/z/GetUserUseCase.kt",
            "package com.app.domain.z\n\nimport com.app.data.y.model.User\n\nclass GetUserUseCase { fun invoke(): User = TODO() }\n",
        )
        .file(
            "data/y/src/main/kotlin/com/app/data/y/model/User.kt",
            "package com.app.data.y.model\n\ndata class User(val name: String)\n",
        );

    let config = Config::default();
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(
        report.allowed.get(":feature:x"),
        Some(&BTreeSet::from([":data:y".to_string()]))
    );
}

#[test]
fn test_allowance_requires_search_in_depth() {
    let project = TestProject::new()
        .module(":screen:x", KindName::AndroidLibrary)
        .module(":domain:z", KindName::JvmLibrary)
        .module(":data:y", KindName::JvmLibrary)
        .depends(":screen:x", ":domain:z")
        .depends(":screen:x", ":data:y")
        .file(
            "screen/x/src/main/kotlin/com/app/screen/x/XViewModel.kt",
            "import com.app.domain.z.GetUserUseCase\n",
        )
        .file(
            "domain/z/src/main/kotlin/com/app/domain/z/GetUserUseCase.kt",
            "import com.app.data.y.model.User\n",
        )
        .file("data/y/src/main/kotlin/com/app/data/y/model/User.kt", "data class User(val name: String)\n");

    let config = Config::default();
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));
    assert!(report.failures.contains_key(":screen:x"));

    let config = Config {
        unused: UnusedConfig {
            search_in_depth: vec![":screen".to_string()],
            ..UnusedConfig::default()
        },
        ..Config::default()
    };
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));
    assert!(report.failures.is_empty());
}

#[test]
fn test_usage_from_layout_xml_counts() {
    let project = TestProject::new()
        .module(":feature:x", KindName::AndroidLibrary)
        .module(":designsystem", KindName::AndroidLibrary)
        .depends(":feature:x", ":designsystem")
        .file(
            "feature/x/src/main/res/layout/x_screen.xml",
            "<com.app.designsystem.PrimaryButton android:id=\"@+id/ok\" />\n",
        )
        .file(
            "designsystem/src/main/kotlin/com/app/designsystem/PrimaryButton.kt",
            "package com.app.designsystem\n",
        );

    let config = Config::default();
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));
    assert!(report.is_clean());
}

#[test]
fn test_warn_only_and_common_dirs() {
    let project = TestProject::new()
        .module(":feature:x", KindName::AndroidLibrary)
        .module(":core:log", KindName::JvmLibrary)
        .module(":core:ui", KindName::AndroidLibrary)
        .depends(":feature:x", ":core:log")
        .depends(":feature:x", ":core:ui")
        .file(
            "feature/x/src/main/kotlin/com/app/feature/x/XScreen.kt",
            "import com.app.core.ui.theme.AppTheme\n",
        )
        .file("core/log/src/main/kotlin/com/app/core/log/Log.kt", "object Log\n")
        .file("core/ui/src/main/kotlin/com/app/core/ui/theme/AppTheme.kt", "object AppTheme\n");

    let config = Config {
        unused: UnusedConfig {
            common_dirs: vec!["theme".to_string()],
            warn_only: vec![":core:log".to_string()],
            ..UnusedConfig::default()
        },
        ..Config::default()
    };
    let report = UnusedDependencyChecker::new(&config).check(&project.graph(&config));

    assert!(report.failures.is_empty());
    assert_eq!(
        report.warnings.get(":feature:x"),
        Some(&BTreeSet::from([":core:log".to_string()]))
    );
    assert_eq!(
        report.packages.get(":core:ui"),
        Some(&BTreeSet::from(["com.app.core.ui".to_string()]))
    );
}

#[test]
fn test_unused_check_is_idempotent() {
    let project = TestProject::new()
        .module(":feature:a", KindName::AndroidLibrary)
        .module(":feature:b", KindName::AndroidLibrary)
        .module(":data", KindName::JvmLibrary)
        .depends(":feature:a", ":data")
        .depends(":feature:b", ":data")
        .depends(":feature:a", ":feature:b")
        .file("feature/a/src/main/kotlin/com/app/feature/a/A.kt", "import com.app.data.Repo\n")
        .file("feature/b/src/main/kotlin/com/app/feature/b/B.kt", "class B\n")
        .file("data/src/main/kotlin/com/app/data/Repo.kt", "class Repo\n");

    let config = Config::default();
    let graph = project.graph(&config);
    let checker = UnusedDependencyChecker::new(&config);

    let first = checker.check(&graph);
    let second = checker.check(&graph);
    assert_eq!(first, second);
    assert_eq!(
        first.failures.get(":feature:a"),
        Some(&BTreeSet::from([":feature:b".to_string()]))
    );
    assert_eq!(
        first.failures.get(":feature:b"),
        Some(&BTreeSet::from([":data".to_string()]))
    );
}

// ============================================================================
// Portability
// ============================================================================

#[test]
fn test_module_without_platform_usage_is_flagged_portable() {
    let project = TestProject::new()
        .module(":feature:x", KindName::AndroidLibrary)
        .module(":util", KindName::AndroidLibrary)
        .depends(":feature:x", ":util")
        .library(":feature:x", "androidx.fragment:fragment-ktx")
        .library(":util", "org.jetbrains.kotlinx:kotlinx-coroutines-core")
        .file(
            "util/src/main/kotlin/com/app/util/Dates.kt",
            "package com.app.util\n\nimport java.time.LocalDate\n",
        );

    let config = Config::default();
    let report = PortabilityChecker::new(&config).check(&project.graph(&config));

    assert_eq!(report.status(":util"), Some(&ModuleStatus::CanBePortable));
    assert_eq!(report.status(":feature:x"), Some(&ModuleStatus::StrictPlatform));
    assert_eq!(report.advisories(), vec![Advisory::Portable(":util".to_string())]);
}

#[test]
fn test_jvm_modules_are_not_portability_candidates() {
    let project = TestProject::new()
        .module(":core", KindName::JvmLibrary)
        .file("core/src/main/kotlin/com/app/core/A.kt", "class A\n");

    let config = Config::default();
    let report = PortabilityChecker::new(&config).check(&project.graph(&config));
    assert!(report.statuses.is_empty());
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn test_library_without_resource_usage_fails() {
    let project = TestProject::new()
        .module(":logic", KindName::AndroidLibrary)
        .module(":ui", KindName::AndroidLibrary)
        .file("logic/src/main/kotlin/com/app/logic/Logic.kt", "class Logic\n")
        .file(
            "ui/src/main/kotlin/com/app/ui/Screen.kt",
            "import com.app.designsystem.R\n\nval icon = R.drawable.ic_close\n",
        );

    let config = Config::default();
    let report = ResourceUsageDetector::new(&config).check(&project.graph(&config));

    assert_eq!(report.modules_to_disable, vec![":logic".to_string()]);
    let err = report.into_result().unwrap_err();
    assert_eq!(err.to_string(), "Modules to disable resources: :logic");
}

// ============================================================================
// Closure & metrics
// ============================================================================

#[test]
fn test_closure_and_metrics_agree() {
    let project = TestProject::new()
        .module(":app", KindName::AndroidApplication)
        .module(":feature:a", KindName::AndroidLibrary)
        .module(":feature:b", KindName::AndroidLibrary)
        .module(":core", KindName::JvmLibrary)
        .depends(":app", ":feature:a")
        .depends(":app", ":feature:b")
        .depends(":feature:a", ":core")
        .depends(":feature:b", ":core");

    let config = Config::default();
    let graph = project.graph(&config);
    let closure = TransitiveClosure::new(&graph);
    let metrics = DependencyMetrics::compute(&graph);

    for module in graph.modules() {
        assert_eq!(
            metrics.alphabetic_dependencies()[&module.path],
            closure.dependencies(&module.path).len()
        );
    }
    assert_eq!(metrics.sorted_dependents()[0], (":core", 3));
    assert_eq!(metrics.centrality(1)[0].module, ":core");
}
