//! render command - Build the example scene and emit DOT text
//!
//! Output routing: `--stdout` prints the DOT text directly; otherwise the
//! text lands in `--output PATH` or the next free `dot<N>.dot` in the
//! configured output directory. `--view` hands the written file to the
//! configured viewer, `--json` prints a machine-readable summary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::config::Config;
use crate::render::to_dot;
use crate::scene::{Scene, SceneSpec};
use crate::ui::output::{self, Verbosity};

/// Options for the render command.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Number of allocation types.
    pub types: usize,
    /// Number of blocks per type.
    pub blocks: usize,
    /// Number of objects per type.
    pub objects: usize,
    /// Explicit output path.
    pub output: Option<PathBuf>,
    /// Print to stdout instead of writing a file.
    pub stdout: bool,
    /// Launch the viewer on the written file.
    pub view: bool,
    /// Print a machine-readable summary.
    pub json: bool,
}

/// Machine-readable summary of a completed render.
#[derive(Debug, Serialize)]
struct RenderSummary<'a> {
    file: &'a Path,
    nodes: usize,
    bytes: usize,
}

/// Build the example scene and emit DOT text.
pub fn render(opts: RenderOptions, verbosity: Verbosity) -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let spec = SceneSpec {
        types: opts.types,
        blocks_per_type: opts.blocks,
        objects_per_type: opts.objects,
    };
    output::debug(
        format!(
            "building scene: {} type(s), {} block(s)/type, {} object(s)/type",
            spec.types, spec.blocks_per_type, spec.objects_per_type
        ),
        verbosity,
    );

    let diagram = Scene::build(&spec).context("failed to build the example scene")?;
    let dot = to_dot(&diagram).context("failed to render DOT text")?;

    if opts.stdout {
        print!("{dot}");
        return Ok(());
    }

    let path = match opts.output {
        Some(path) => path,
        None => {
            let dir = config
                .output_dir()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            next_output_path(&dir)
        }
    };
    fs::write(&path, &dot)
        .with_context(|| format!("failed to write DOT file '{}'", path.display()))?;

    if opts.json {
        let summary = RenderSummary {
            file: &path,
            nodes: diagram.node_count(),
            bytes: dot.len(),
        };
        println!(
            "{}",
            serde_json::to_string(&summary).context("failed to serialize render summary")?
        );
    } else {
        output::wrote(&path, verbosity);
    }

    if opts.view {
        launch_viewer(config.viewer(), &path, verbosity)?;
    }
    Ok(())
}

/// The next free `dot<N>.dot` in `dir`, counting from 1.
///
/// Existing files are skipped, never overwritten; the name depends only on
/// the directory contents.
fn next_output_path(dir: &Path) -> PathBuf {
    let mut n: u32 = 1;
    loop {
        let candidate = dir.join(format!("dot{n}.dot"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Hand the written file to the viewer without waiting for it.
///
/// A configured viewer command is split on whitespace (command plus fixed
/// arguments) and receives the file path as its final argument. With no
/// viewer configured, the system opener takes over.
fn launch_viewer(viewer: Option<&str>, path: &Path, verbosity: Verbosity) -> Result<()> {
    match viewer {
        Some(command_line) => {
            let mut parts = command_line.split_whitespace();
            let program = parts
                .next()
                .context("viewer command is blank after splitting")?;
            output::debug(format!("launching viewer: {command_line}"), verbosity);
            Command::new(program)
                .args(parts)
                .arg(path)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .with_context(|| format!("failed to launch viewer '{program}'"))?;
        }
        None => {
            output::debug("no viewer configured, using system opener", verbosity);
            open::that_detached(path)
                .with_context(|| format!("failed to open '{}'", path.display()))?;
        }
    }
    Ok(())
}
