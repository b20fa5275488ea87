//! Command dispatch: maps parsed arguments onto the directory service.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{LocationId, LocationType, LocationUpdate, NewLocation, SubtreeView};
use crate::infrastructure::di::ServiceContainer;

/// Forest wrapper so the export renders as `[[provinces]]` tables.
#[derive(Serialize)]
struct Export<'a> {
    provinces: &'a [SubtreeView],
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    // Commands that need no store
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => {
            let settings = Settings::load(cli.config.as_deref())?;
            return config_command(command, &settings);
        }
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings)?;
    run(&container, command)
}

#[instrument(skip(container))]
pub fn run(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let directory = &container.directory;
    match command {
        Commands::Add {
            name,
            code,
            location_type,
            parent,
        } => {
            let node = directory.insert(NewLocation {
                name: name.clone(),
                code: code.clone(),
                location_type: *location_type,
                parent_code: parent.clone(),
            })?;
            output::success(&format!("added {} ({})", node, node.id));
        }
        Commands::Show { code, id } => {
            let node = match (code, id) {
                (_, Some(id)) => directory.get_by_id(id)?,
                (Some(code), None) => directory.get_by_code(code)?,
                (None, None) => {
                    return Err(CliError::InvalidArgs("give a code or --id".to_string()))
                }
            };
            show(container, &node.code)?;
        }
        Commands::Children { code } => output::locations(&directory.children_of(code)?),
        Commands::Path { code } => output::info(&directory.location_path(code)?),
        Commands::Province { code } => output::info(&directory.province_of(code)?),
        Commands::Depth { code } => output::info(&directory.depth_of(code)?),
        Commands::Descendants { code } => output::locations(&directory.descendants_of(code)?),
        Commands::Tree { code } => {
            let views = match code {
                Some(code) => vec![directory.subtree_view(code)?],
                None => directory.full_forest()?,
            };
            if views.is_empty() {
                output::info("no provinces");
            }
            for view in &views {
                output::info(&view.to_tree_string());
            }
        }
        Commands::List { location_type } => {
            let nodes = match location_type {
                Some(t) => directory.by_type(*t)?,
                None => directory.all()?,
            };
            output::locations(&nodes);
        }
        Commands::Stats => {
            let stats = directory.statistics()?;
            output::header("Locations");
            for t in LocationType::ALL {
                output::detail(&format!("{:<10} {}", t.plural(), stats.count(t)));
            }
            output::detail(&format!("{:<10} {}", "total", stats.total));
        }
        Commands::Search { term } => output::locations(&directory.search_by_name(term)?),
        Commands::Check { parent, child_type } => {
            if directory.validate_hierarchy(parent, *child_type)? {
                output::success(&format!("{child_type} may be added below {parent}"));
            } else {
                output::failure(&format!("{child_type} may not be added below {parent}"));
            }
        }
        Commands::Rename {
            id,
            name,
            code,
            location_type,
            parent,
        } => {
            let node = directory.update(
                id,
                LocationUpdate {
                    name: name.clone(),
                    code: code.clone(),
                    location_type: *location_type,
                    parent_code: parent.clone(),
                },
            )?;
            output::success(&format!("renamed {}", node));
        }
        Commands::Delete { id } => {
            delete(container, id)?;
        }
        Commands::Export => {
            let forest = directory.full_forest()?;
            let text = toml::to_string_pretty(&Export {
                provinces: &forest,
            })
            .map_err(|e| ApplicationError::OperationFailed {
                context: "render export".to_string(),
                source: Box::new(e),
            })?;
            output::info(&text);
        }
        Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::Usage(
                "command does not use the directory".to_string(),
            ))
        }
    }
    Ok(())
}

fn show(container: &ServiceContainer, code: &str) -> CliResult<()> {
    let directory = &container.directory;
    let node = directory.get_by_code(code)?;
    let children = directory.children_of(code)?;
    debug!("show: {} with {} children", node.code, children.len());

    output::header(&node);
    output::detail(&format!("id:       {}", node.id));
    output::detail(&format!("path:     {}", directory.location_path(code)?));
    output::detail(&format!("depth:    {}", directory.depth_of(code)?));
    if let Some(label) = node.location_type.child_type().map(LocationType::plural) {
        output::detail(&format!("{:<9} {}", format!("{label}:"), children.len()));
    }
    Ok(())
}

fn delete(container: &ServiceContainer, id: &LocationId) -> CliResult<()> {
    let node = container.directory.get_by_id(id)?;
    container.directory.delete(id)?;
    output::success(&format!("deleted {}", node));
    Ok(())
}

fn config_command(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&format!("store:  {}", settings.store.path.display()));
        }
    }
    Ok(())
}
