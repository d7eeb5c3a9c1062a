//! Command dispatch: loads hierarchy files and runs the merge and queries

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{debug_draw, DebugPrimitive, TreeNodeConvert};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::NodeTree;
use crate::infrastructure::{HierarchyFile, Placement};

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match &cli.command {
        Some(Commands::Tree { file }) => cmd_tree(file),
        Some(Commands::Describe { file }) => cmd_describe(file),
        Some(Commands::Check { file }) => cmd_check(file),
        Some(Commands::Path { file, from, to }) => cmd_path(file, from, to),
        Some(Commands::Draw {
            file,
            hardpoints,
            blend_bones,
        }) => cmd_draw(file, settings, *hardpoints, *blend_bones),
        Some(Commands::Config { command }) => cmd_config(command, cli, &settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see 'skelmerge --help'".to_string(),
        )),
    }
}

/// Loads `file` and merges all its constituents, then hands the tree to `f`.
fn with_merged<T>(
    file: &Path,
    f: impl FnOnce(&HierarchyFile, &NodeTree<std::sync::Weak<Placement>>) -> CliResult<T>,
) -> CliResult<T> {
    let hierarchy = HierarchyFile::load(file)?;
    let mut instance = hierarchy.instance();
    let tree = instance.try_rebuild()?;
    debug!(
        "merged {} constituents into {} nodes",
        hierarchy.constituents.len(),
        tree.node_count()
    );
    f(&hierarchy, tree)
}

#[instrument]
fn cmd_tree(file: &Path) -> CliResult<()> {
    with_merged(file, |_, tree| {
        output::info(&tree.to_tree_string());
        Ok(())
    })
}

#[instrument]
fn cmd_describe(file: &Path) -> CliResult<()> {
    with_merged(file, |_, tree| {
        output::info(&tree.describe());
        Ok(())
    })
}

#[instrument]
fn cmd_check(file: &Path) -> CliResult<()> {
    with_merged(file, |hierarchy, tree| {
        tree.verify()?;
        output::success(&format!(
            "{} constituents merged: {} nodes, {} roots, depth {}",
            hierarchy.constituents.len(),
            tree.node_count(),
            tree.root_count(),
            tree.depth()
        ));
        for constituent in &hierarchy.constituents {
            output::success_detail(&constituent.name);
        }
        Ok(())
    })
}

#[instrument]
fn cmd_path(file: &Path, from: &str, to: &str) -> CliResult<()> {
    with_merged(file, |_, tree| {
        let lookup = |identifier: &str| {
            tree.node_index(identifier)
                .ok_or_else(|| CliError::InvalidArgs(format!("unknown bone: {identifier}")))
        };
        let start = lookup(from)?;
        let end = lookup(to)?;

        let path = tree.path_indices(start, end)?;
        output::info(
            &path
                .iter()
                .map(|&index| tree.node(index).identifier())
                .join(" -> "),
        );
        Ok(())
    })
}

#[instrument(skip(settings))]
fn cmd_draw(file: &Path, mut settings: Settings, hardpoints: bool, blend_bones: bool) -> CliResult<()> {
    settings.draw.draw_hardpoints |= hardpoints;
    settings.draw.draw_blend_bones |= blend_bones;

    with_merged(file, |_, tree| {
        let primitives = debug_draw(tree, &settings.draw, |_, handle| {
            handle.upgrade().and_then(|placement| *placement)
        });
        if primitives.len() < tree.node_count() {
            debug!(
                "{} of {} nodes not drawn",
                tree.node_count() - primitives.len(),
                tree.node_count()
            );
        }
        for primitive in &primitives {
            let identifier = tree.node(primitive.index()).identifier();
            match primitive {
                DebugPrimitive::RootMarker { position, .. } => {
                    output::action("root", &format!("{identifier} at {position}"));
                }
                DebugPrimitive::Bone { from, to, to_colour, .. } => {
                    output::detail(&format!(
                        "{identifier}: {from} -> {to} rgba{to_colour:?}"
                    ));
                }
            }
        }
        Ok(())
    })
}

fn cmd_config(command: &ConfigCommands, cli: &Cli, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config paths:");
            match global_config_path() {
                Some(path) => {
                    let status = if path.exists() { "exists" } else { "not found" };
                    output::detail(&format!("global: {} ({status})", path.display()));
                }
                None => output::detail("global: unavailable"),
            }
            match &cli.config {
                Some(path) => output::detail(&format!("local:  {}", path.display())),
                None => output::detail("local:  none"),
            }
            Ok(())
        }
    }
}
