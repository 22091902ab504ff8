//! Command dispatch

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::render::render_svg;
use crate::application::services::AssessmentService;
use crate::application::snapshot::to_json;
use crate::application::{sample_snapshot, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::maturity::Selection;
use crate::domain::{format_percent, parse_fraction, CriterionRow, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;

/// Label printed for the synthetic root in zoom replays.
const ROOT_FOCUS: &str = "(root)";
/// Zoom argument that stands for a click on the center circle.
const CENTER_CLICK: &str = "-";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, try `sunburst --help`".into(),
        ));
    };

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| crate::infrastructure::InfraError::io("current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Sample { output } => cmd_sample(&container, output.as_deref()),
        Commands::Show { file } => cmd_show(&container, file.as_deref()),
        Commands::Score { file } => cmd_score(&container, file.as_deref()),
        Commands::Select { file, id, level } => cmd_select(&container, file, id, *level),
        Commands::Weight { file, id, value } => cmd_weight(&container, file, id, value),
        Commands::Add {
            file,
            id,
            name,
            weight,
        } => cmd_add(&container, file, id, name, weight),
        Commands::Remove { file, id } => cmd_remove(&container, file, id),
        Commands::Rename {
            file,
            id,
            name,
            new_id,
        } => cmd_rename(&container, file, id, name.as_deref(), new_id.as_deref()),
        Commands::Import { table, output } => cmd_import(&container, table, output),
        Commands::Export { file } => cmd_export(&container, file.as_deref()),
        Commands::Render {
            file,
            output,
            focus,
            at,
        } => cmd_render(&container, file.as_deref(), output.as_deref(), focus, *at),
        Commands::Zoom { file, ids } => cmd_zoom(&container, file, ids),
        Commands::Tooltip { file, id } => cmd_tooltip(&container, file, id),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Explicit file argument, else the configured default file.
fn resolve_file(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| container.settings.default_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no snapshot file given and no default_file configured".into())
        })
}

fn load(container: &ServiceContainer, path: &Path) -> CliResult<AssessmentService> {
    let mut service = container.assessment();
    service.load(path)?;
    Ok(service)
}

fn parse_weight(text: &str) -> CliResult<f64> {
    let numeric = text.trim().trim_end_matches('%').trim().replace(',', ".");
    if numeric.parse::<f64>().is_err() {
        return Err(CliError::InvalidArgs(format!("not a weight: {text}")));
    }
    parse_fraction(text).ok_or_else(|| CliError::InvalidArgs(format!("not a weight: {text}")))
}

fn percent_or_dash(value: Option<f64>) -> String {
    value.map(format_percent).unwrap_or_else(|| "-".to_string())
}

#[instrument(skip(container))]
fn cmd_sample(container: &ServiceContainer, output: Option<&Path>) -> CliResult<()> {
    let json = to_json(&sample_snapshot())?;
    match output {
        Some(path) => {
            container
                .fs
                .write(path, &(json + "\n"))
                .with_path_context("write sample", path)?;
            output::success(&format!("Wrote sample table to {}", path.display()));
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_file(container, file)?;
    let service = load(container, &path)?;
    let chart = service.chart(container.settings.chart_settings());
    output::info(&chart.tree().to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_score(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_file(container, file)?;
    let service = load(container, &path)?;
    service.save(&path)?;
    let overall = service
        .chart(container.settings.chart_settings())
        .overall_score();
    output::action("Overall", &percent_or_dash(overall));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_select(container: &ServiceContainer, file: &Path, id: &str, level: usize) -> CliResult<()> {
    let index = level
        .checked_sub(1)
        .ok_or_else(|| CliError::InvalidArgs("maturity levels count from 1".into()))?;
    let mut service = load(container, file)?;
    let selection = service.select_maturity(id, index)?;
    service.save(file)?;
    match selection {
        Selection::Selected { score, .. } => {
            output::success(&format!("{id}: level {level} selected, score {}", format_percent(score)))
        }
        Selection::Cleared => output::success(&format!("{id}: selection cleared")),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_weight(container: &ServiceContainer, file: &Path, id: &str, value: &str) -> CliResult<()> {
    let weight = parse_weight(value)?;
    let mut service = load(container, file)?;
    service.set_weight(id, weight)?;
    service.save(file)?;
    output::success(&format!("{id}: weight {}", format_percent(weight)));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_add(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    name: &str,
    weight: &str,
) -> CliResult<()> {
    let weight = parse_weight(weight)?;
    let mut service = load(container, file)?;
    service.add_row(CriterionRow::new(id, name, weight))?;
    service.save(file)?;
    output::success(&format!("Added {id} {name}"));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_remove(container: &ServiceContainer, file: &Path, id: &str) -> CliResult<()> {
    let mut service = load(container, file)?;
    let removed = service.remove_row(id)?;
    service.save(file)?;
    output::success(&format!("Removed {} {}", removed.id, removed.name));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_rename(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    name: Option<&str>,
    new_id: Option<&str>,
) -> CliResult<()> {
    if name.is_none() && new_id.is_none() {
        return Err(CliError::InvalidArgs(
            "give --name, --new-id or both".into(),
        ));
    }
    let mut service = load(container, file)?;
    if let Some(name) = name {
        service.rename(id, name)?;
    }
    let id = match new_id {
        Some(new_id) => {
            service.change_id(id, new_id)?;
            new_id
        }
        None => id,
    };
    service.save(file)?;
    output::success(&format!("Updated {id}"));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_import(container: &ServiceContainer, table: &Path, output_path: &Path) -> CliResult<()> {
    let text = if table == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .with_path_context("read table", table)?;
        buf
    } else {
        container
            .fs
            .read_to_string(table)
            .with_path_context("read table", table)?
    };
    let mut service = container.assessment();
    service.import_table(&text)?;
    service.save(output_path)?;
    output::success(&format!(
        "Imported {} rows into {}",
        service.rows().len(),
        output_path.display()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_export(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_file(container, file)?;
    let service = load(container, &path)?;
    print!("{}", service.export_table());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_render(
    container: &ServiceContainer,
    file: Option<&Path>,
    output_path: Option<&Path>,
    focus: &[String],
    at: Option<u64>,
) -> CliResult<()> {
    let path = resolve_file(container, file)?;
    let service = load(container, &path)?;
    let settings = container.settings.chart_settings();
    let mut chart = service.chart(settings);

    let start = Instant::now();
    for id in focus {
        let landed = chart.activate(id, start)?;
        debug!("activated {} -> focus {:?}", id, landed);
    }
    let elapsed = at.map(Duration::from_millis).unwrap_or(settings.transition);
    let frame = chart.frame(start + elapsed);
    let svg = render_svg(&frame);

    match output_path {
        Some(out) => {
            container
                .fs
                .write(out, &svg)
                .with_path_context("write svg", out)?;
            output::success(&format!("Rendered {}", out.display()));
        }
        None => print!("{svg}"),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_zoom(container: &ServiceContainer, file: &Path, ids: &[String]) -> CliResult<()> {
    let service = load(container, file)?;
    let settings = container.settings.chart_settings();
    let mut chart = service.chart(settings);

    // one click per settled transition
    let step = settings.transition + Duration::from_millis(1);
    let mut now = Instant::now();
    for id in ids {
        let focus = if id == CENTER_CLICK {
            chart.activate_center(now).to_string()
        } else {
            chart.activate(id, now)?.to_string()
        };
        let shown = if focus.is_empty() { ROOT_FOCUS } else { focus.as_str() };
        output::detail(&format!("{id} -> {shown}"));
        now += step;
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tooltip(container: &ServiceContainer, file: &Path, id: &str) -> CliResult<()> {
    let service = load(container, file)?;
    let chart = service.chart(container.settings.chart_settings());
    let tooltip = chart
        .tooltip_data_for(id)
        .ok_or_else(|| crate::domain::DomainError::UnknownId(id.to_string()))?;
    let json = serde_json::to_string_pretty(&tooltip).map_err(|e| {
        crate::application::ApplicationError::OperationFailed {
            context: "serialize tooltip".into(),
            source: Box::new(e),
        }
    })?;
    output::info(&json);
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            print!("{}", Settings::template());
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(global) => output::detail(&format!(
                    "global: {}{}",
                    global.display(),
                    if global.exists() { "" } else { " (missing)" }
                )),
                None => output::warning("no home directory, global config disabled"),
            }
            let local = local_config_path(project_dir);
            output::detail(&format!(
                "local:  {}{}",
                local.display(),
                if local.exists() { "" } else { " (missing)" }
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_percent_text_when_parsing_weight_then_returns_fraction() {
        assert_eq!(parse_weight("40%").unwrap(), 0.4);
        assert_eq!(parse_weight("0.25").unwrap(), 0.25);
        assert_eq!(parse_weight("40").unwrap(), 0.4);
    }

    #[test]
    fn given_garbage_when_parsing_weight_then_invalid_args() {
        assert!(matches!(parse_weight("lots"), Err(CliError::InvalidArgs(_))));
        assert!(matches!(parse_weight(""), Err(CliError::InvalidArgs(_))));
    }
}
