use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use squad_matrix::binding::{MatrixBinding, PresentationState, Selection};
use squad_matrix::config::MatrixConfig;
use squad_matrix::matrix_export;
use squad_matrix::matrix_fetch::Scope;
use squad_matrix::matrix_html::render_table_html;
use squad_matrix::scale::ScaleKind;

struct Args {
    scope: Scope,
    xlsx: Option<PathBuf>,
    html: Option<PathBuf>,
    scale: Option<ScaleKind>,
}

fn main() -> Result<()> {
    env_logger::init();
    let config = MatrixConfig::load();
    let args = parse_args()?;

    let mut binding_config = config.binding();
    if let Some(scale) = args.scale {
        binding_config.scale = scale;
    }
    let mut binding = MatrixBinding::new(binding_config);
    let label = config.scope_label(&args.scope);
    let ticket = binding
        .select(Selection::scope(args.scope.clone(), label))
        .context("selection did not start a request")?;

    let source = config.matrix_source();
    let outcome = source.fetch(&ticket.scope);
    binding.resolve(&ticket, outcome);

    let title = binding.title().unwrap_or("Player Matrix").to_string();
    println!("{title}");
    let table = match binding.state() {
        PresentationState::Populated { table, .. } => table,
        PresentationState::Empty { .. } => {
            println!("No players for this selection; nothing exported");
            return Ok(());
        }
        PresentationState::Error { error, .. } => bail!("matrix request failed: {error}"),
        PresentationState::Idle | PresentationState::Loading { .. } => {
            bail!("matrix request did not resolve")
        }
    };
    println!("Players: {}", table.size());

    let xlsx = args.xlsx.or_else(|| {
        args.html
            .is_none()
            .then(|| matrix_export::default_export_path(&config.export_dir, &title))
    });
    if let Some(path) = xlsx {
        let report = matrix_export::export_matrix_xlsx(&path, &title, table)?;
        println!("Workbook: {} ({} cells)", report.path.display(), report.cells);
    }
    if let Some(path) = args.html {
        fs::write(&path, render_table_html(table))
            .with_context(|| format!("write html {}", path.display()))?;
        println!("HTML: {}", path.display());
    }

    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        scope: Scope::AllPlayers,
        xlsx: None,
        html: None,
        scale: None,
    };
    for arg in std::env::args().skip(1) {
        if let Some(raw) = arg.strip_prefix("--team=") {
            args.scope = Scope::parse(raw).with_context(|| format!("invalid team id {raw:?}"))?;
        } else if arg == "--all" {
            args.scope = Scope::AllPlayers;
        } else if let Some(path) = arg.strip_prefix("--xlsx=") {
            args.xlsx = non_empty_path(path);
        } else if let Some(path) = arg.strip_prefix("--html=") {
            args.html = non_empty_path(path);
        } else if let Some(raw) = arg.strip_prefix("--scale=") {
            args.scale = Some(ScaleKind::parse(raw).with_context(|| format!("unknown scale {raw:?}"))?);
        } else {
            bail!("unrecognized argument {arg:?}");
        }
    }
    Ok(args)
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
