//! Classforge CLI
//!
//! Runs the allocation engine over a JSON scenario file and prints the
//! resulting report as JSON on stdout. Logs go to stderr.
//!
//! ```text
//! classforge allocate   <scenario.json> [--config engine.yaml]
//! classforge reallocate <scenario.json> <student_id> <class> [--config engine.yaml]
//! classforge links      <scenario.json> [--config engine.yaml]
//! ```

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use classforge::model::{ClassId, StudentId};
use classforge::pipeline::run_cycle_blocking;
use classforge::realloc::ReallocationState;
use classforge::scenario::Scenario;
use classforge::utils::init_logging;
use classforge::EngineConfig;

const USAGE: &str = "usage:
  classforge allocate   <scenario.json> [--config <file>]
  classforge reallocate <scenario.json> <student_id> <class> [--config <file>]
  classforge links      <scenario.json> [--config <file>]";

/// Splits `--config <file>` out of the positional arguments.
fn parse_args(args: Vec<String>) -> Result<(Vec<String>, Option<String>)> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config = Some(iter.next().context("--config needs a file path")?);
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, config))
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(p) => EngineConfig::load(p).with_context(|| format!("loading config {}", p))?,
        None => EngineConfig::default(),
    };
    config.apply_env_overrides().context("applying CLASSFORGE_* overrides")?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging()?;

    let (positional, config_path) = parse_args(std::env::args().skip(1).collect())?;
    let Some(command) = positional.first() else {
        bail!("{}", USAGE);
    };
    let scenario_path = positional.get(1).with_context(|| format!("missing scenario path\n{}", USAGE))?;

    let config = load_config(config_path.as_deref())?;
    let scenario = Scenario::load(scenario_path).with_context(|| format!("loading scenario {}", scenario_path))?;
    let engine = Arc::new(scenario.build_engine(config).context("loading trained models")?);

    match command.as_str() {
        "allocate" => {
            let report = run_cycle_blocking(engine, scenario.cohort).await?;
            info!("Run {} complete", report.run_id);
            print_json(&report)?;
        }
        "reallocate" => {
            let student_id = positional.get(2).with_context(|| format!("missing student id\n{}", USAGE))?;
            let new_class: ClassId = positional
                .get(3)
                .with_context(|| format!("missing target class\n{}", USAGE))?
                .parse()
                .context("target class must be a non-negative integer")?;
            let student_id = StudentId::from(student_id.as_str());

            let report = tokio::task::spawn_blocking(move || {
                let state = ReallocationState::new(engine, scenario.cohort)?;
                state.reallocate(&student_id, new_class)
            })
            .await??;
            print_json(&report)?;
        }
        "links" => {
            let cohort = scenario.cohort;
            let rows = tokio::task::spawn_blocking(move || {
                let edges = engine.recompute_links(&cohort.embeddings, &cohort.assignment)?;
                Ok::<_, classforge::ClassforgeError>(edges.to_rows(&cohort.roster))
            })
            .await??;
            print_json(&rows)?;
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}
