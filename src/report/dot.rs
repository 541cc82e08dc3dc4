//! Graphviz rendering of the module graph

use crate::config::{GraphConfig, ShowLegend};
use crate::graph::{top_level_segment, DependencyGraph, Module};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const HEADER: &str = "strict digraph DependencyGraph {\nratio=0.6;\nnode [shape=box fontsize=30 style=filled fillcolor=\"#B66FF5\"];\n";

/// Blend factor toward white applied to node colours
const LIGHTEN_FACTOR: f32 = 0.5;

/// Renders `strict digraph` documents for the whole project and for groups
pub struct DotRenderer<'a> {
    config: &'a GraphConfig,
}

impl<'a> DotRenderer<'a> {
    pub fn new(config: &'a GraphConfig) -> Self {
        Self { config }
    }

    /// Every module and every project edge
    pub fn render_root(&self, graph: &DependencyGraph) -> String {
        self.render(graph, None)
    }

    /// Modules whose path starts with `group`, and the edges between them
    pub fn render_group(&self, graph: &DependencyGraph, group: &str) -> String {
        self.render(graph, Some(group))
    }

    /// Write the root graph and one graph per configured group
    pub fn write_all(&self, graph: &DependencyGraph, output_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create {}", output_dir.display()))?;

        let mut written = Vec::new();

        let root_path = output_dir.join(&self.config.file_name);
        write_file(&root_path, &self.render_root(graph))?;
        info!("Project module dependency graph created at {}", root_path.display());
        written.push(root_path);

        for group in &self.config.groups {
            let path = output_dir.join(group_file_name(group));
            write_file(&path, &self.render_group(graph, group))?;
            info!("Group {} dependency graph created at {}", group, path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn render(&self, graph: &DependencyGraph, group: Option<&str>) -> String {
        let in_scope = |path: &str| group.map_or(true, |g| path.starts_with(g));
        let mut out = String::from(HEADER);
        let _ = writeln!(out, "rankdir={};", self.config.direction.rankdir());

        let modules: Vec<&Module> = graph.modules().filter(|m| in_scope(&m.path)).collect();

        if self.config.group_modules {
            let mut clusters: BTreeMap<&str, Vec<&Module>> = BTreeMap::new();
            for &module in &modules {
                clusters.entry(module.top_level_segment()).or_default().push(module);
            }
            for (segment, members) in clusters {
                let _ = writeln!(out, "subgraph \"cluster_{segment}\" {{");
                let _ = writeln!(out, "label=\"{segment}\";");
                for module in members {
                    out.push_str(&self.node_line(graph, module));
                }
                out.push_str("}\n");
            }
        } else {
            for &module in &modules {
                out.push_str(&self.node_line(graph, module));
            }
        }

        for (origin, target, traits) in graph.edges() {
            if !(in_scope(&origin.path) && in_scope(&target.path)) {
                continue;
            }
            if traits.is_api() {
                let _ = writeln!(
                    out,
                    "\"{}\" -> \"{}\" [style=bold label=\"api\"];",
                    origin.path, target.path
                );
            } else {
                let _ = writeln!(out, "\"{}\" -> \"{}\";", origin.path, target.path);
            }
        }

        let legend = match self.config.show_legend {
            ShowLegend::None => false,
            ShowLegend::OnlyInRootGraph => group.is_none(),
            ShowLegend::AllGraphs => true,
        };
        if legend {
            out.push_str(LEGEND);
        }

        out.push('}');
        out
    }

    fn node_line(&self, graph: &DependencyGraph, module: &Module) -> String {
        let color = module_color(&module.path, &self.config.trigger_names);
        match self.module_url(graph, module) {
            Some(url) => format!(
                "\"{}\" [style=filled fillcolor=\"{}\" URL=\"{}\" ];\n",
                module.path, color, url
            ),
            None => format!("\"{}\" [style=filled fillcolor=\"{}\" ];\n", module.path, color),
        }
    }

    /// `<repo>/blob/<branch>/<module dir>`
    fn module_url(&self, graph: &DependencyGraph, module: &Module) -> Option<String> {
        if !self.config.link_module_text {
            return None;
        }
        let repo = self.config.repo_url.as_deref()?.trim_end_matches('/');
        let relative = module.dir.strip_prefix(graph.root_dir()).ok()?;
        let relative = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{}/blob/{}/{}", repo, self.config.main_branch, relative))
    }
}

const LEGEND: &str = "subgraph cluster_legend {
label=\"Legend\";
node [shape=box fontsize=20 style=\"\"];
legend_consumer [label=\"consumer\"];
legend_dependency [label=\"dependency\"];
legend_consumer -> legend_dependency [label=\"implementation\"];
legend_api_consumer [label=\"consumer\"];
legend_api_dependency [label=\"dependency\"];
legend_api_consumer -> legend_api_dependency [style=bold label=\"api\"];
}
";

/// File name of a group graph: `:feature:auth` -> `graph_feature_auth.gv`
pub fn group_file_name(group: &str) -> String {
    format!("graph{}.gv", group.replace(':', "_"))
}

/// Fill colour of a module node.
///
/// Modules sharing a top-level segment share a colour; the first trigger
/// name contained in the path salts the hash so e.g. `impl` modules stand
/// out inside their group.
pub fn module_color(path: &str, trigger_names: &[String]) -> String {
    let group = top_level_segment(path);
    let trigger = trigger_names.iter().find(|t| path.contains(t.as_str()));
    let hash = match trigger {
        Some(t) => java_hash_code(&format!("{group}{t}")),
        None => java_hash_code(group),
    };

    let lighten = |c: i32| -> u8 {
        let c = c as f32;
        (c + (255.0 - c) * LIGHTEN_FACTOR).clamp(0.0, 255.0) as u8
    };
    let r = lighten((hash >> 16) & 0xFF);
    let g = lighten((hash >> 8) & 0xFF);
    let b = lighten(hash & 0xFF);

    format!("#{r:02X}{g:02X}{b:02X}")
}

/// `String.hashCode` of the JVM, so colours stay stable across tools
fn java_hash_code(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}
