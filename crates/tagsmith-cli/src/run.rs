//! One generation run: configuration, model, output.

use anyhow::Context;
use std::path::PathBuf;
use tagsmith_config::ConfigLoader;
use tagsmith_core::{Config, Model};
use tagsmith_engine::ModelBuilder;
use tracing::warn;

use crate::cli::Cli;

/// What a run did, for the closing summary.
#[derive(Debug)]
pub struct Outcome {
    pub model: Model,
    pub planned: Vec<PathBuf>,
    pub written: bool,
}

pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new().overrides(cli.overrides());
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    loader.load().context("failed to load configuration")
}

pub fn execute(cli: &Cli, config: &Config) -> anyhow::Result<Outcome> {
    let model = ModelBuilder::new(config)
        .build()
        .with_context(|| format!("failed to scan {}", config.input.dir.display()))?;

    for error in &model.errors {
        warn!(file = %error.file, line = error.line, "{}", error.message);
    }

    if cli.dump_model {
        let json = serde_json::to_string_pretty(&model).context("failed to serialize model")?;
        println!("{json}");
    }

    let file_name = &config.output.file_name;
    let (planned, written) = if cli.dry_run {
        let files = tagsmith_render::render_model(&model, file_name)
            .context("failed to render generated files")?;
        (files.into_iter().map(|f| f.path).collect(), false)
    } else {
        let paths = tagsmith_render::write_model(&model, file_name)
            .context("failed to write generated files")?;
        (paths, true)
    };

    Ok(Outcome {
        model,
        planned,
        written,
    })
}

/// Human summary printed after a run unless `--quiet` is set.
#[must_use]
pub fn summary(outcome: &Outcome) -> String {
    let model = &outcome.model;
    let mut lines = vec![format!(
        "scanned {} files: {} packages, {} structs, {} fields",
        model.files_scanned, model.packages_found, model.structs_found, model.fields_found
    )];
    let verb = if outcome.written { "wrote" } else { "would write" };
    lines.extend(outcome.planned.iter().map(|p| format!("{verb} {}", p.display())));
    if !model.errors.is_empty() {
        lines.push(format!("{} scan errors (see warnings above)", model.errors.len()));
    }
    lines.join("\n")
}
