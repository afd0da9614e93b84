use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use thiserror::Error;
use wf_blocks::{InitializeOutcome, TranslatorAdm1Asm1, TranslatorConfig};
use wf_core::{ensure_finite, k, m3pd, pa};
use wf_flowsheet::{Flowsheet, FlowsheetInterface};
use wf_properties::{Adm1Component, Adm1PropertyPackage, Asm1PropertyPackage, PropertyPackage};
use wf_solver::NewtonConfig;

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(about = "WasteFlow CLI - wastewater flowsheet translation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a digester effluent into an activated sludge feed
    Translate {
        /// Path to a JSON stream description; package defaults are used
        /// when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the flowsheet variable interface as JSON
    Interface {
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the component sets of both property packages
    Components,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("block error: {0}")]
    Block(#[from] wf_blocks::BlockError),

    #[error("value error: {0}")]
    Value(#[from] wf_core::WfError),

    #[error("unknown component symbol {0:?}")]
    UnknownComponent(String),

    #[error("initialization incomplete: {degrees_of_freedom} degrees of freedom")]
    Incomplete { degrees_of_freedom: i64 },
}

type CliResult<T> = Result<T, CliError>;

/// Inlet stream description accepted by `translate`.
///
/// Concentrations are keyed by component symbol; any component not listed
/// keeps the package default.
#[derive(Debug, Deserialize)]
struct StreamInput {
    flow_m3_per_day: f64,
    #[serde(default = "default_temperature_k")]
    temperature_k: f64,
    #[serde(default = "default_pressure_pa")]
    pressure_pa: f64,
    #[serde(default)]
    concentrations: BTreeMap<String, f64>,
}

fn default_temperature_k() -> f64 {
    308.15
}

fn default_pressure_pa() -> f64 {
    101_325.0
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Translate { input, output } => cmd_translate(input.as_deref(), output.as_deref()),
        Commands::Interface { output } => cmd_interface(output.as_deref()),
        Commands::Components => cmd_components(),
    }
}

fn build_translator() -> CliResult<TranslatorAdm1Asm1> {
    let flowsheet = Flowsheet::steady_state("sludge_train");
    Ok(TranslatorAdm1Asm1::new(
        "asm_translator",
        &flowsheet,
        TranslatorConfig::default(),
    )?)
}

fn cmd_translate(input: Option<&Path>, output: Option<&Path>) -> CliResult<()> {
    let stream: Option<StreamInput> = match input {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let mut block = build_translator()?;

    let inlet = block.inlet_mut(0);
    if let Some(stream) = &stream {
        inlet.fix_flow_vol(m3pd(ensure_finite(
            stream.flow_m3_per_day,
            "flow_m3_per_day",
        )?));
        inlet.fix_temperature(k(ensure_finite(stream.temperature_k, "temperature_k")?));
        inlet.fix_pressure(pa(ensure_finite(stream.pressure_pa, "pressure_pa")?));
        for (symbol, value) in &stream.concentrations {
            let c = Adm1Component::from_symbol(symbol)
                .ok_or_else(|| CliError::UnknownComponent(symbol.clone()))?;
            inlet.conc_mut(c).fix_at(ensure_finite(*value, symbol)?);
        }
    }
    // Anything not supplied is fixed at the package default.
    inlet.flow_vol.fix();
    inlet.temperature.fix();
    inlet.pressure.fix();
    inlet.fix_all_conc();

    let solve = match block.initialize(None, None, &NewtonConfig::default())? {
        InitializeOutcome::Solved(solve) => solve,
        InitializeOutcome::Incomplete { degrees_of_freedom } => {
            return Err(CliError::Incomplete { degrees_of_freedom });
        }
    };

    if solve.optimal {
        println!(
            "✓ Translation solved: {} ({} iterations)",
            solve.termination, solve.iterations
        );
    } else {
        println!(
            "Solver stopped: {} (residual {:.3e})",
            solve.termination, solve.residual_norm
        );
    }

    let report = block.report(solve, 0);
    write_json(&serde_json::to_string_pretty(&report)?, output, "Report")
}

fn cmd_interface(output: Option<&Path>) -> CliResult<()> {
    let block = build_translator()?;

    let mut interface = FlowsheetInterface::new("ADM1 to ASM1 translation").with_description(
        "Maps digester effluent state variables onto the activated sludge basis",
    );
    interface.extend(block.export_variables(0));

    write_json(&interface.to_json_pretty()?, output, "Interface")
}

fn cmd_components() -> CliResult<()> {
    for (name, symbols) in [
        (
            Adm1PropertyPackage.name(),
            Adm1PropertyPackage.component_symbols(),
        ),
        (
            Asm1PropertyPackage.name(),
            Asm1PropertyPackage.component_symbols(),
        ),
    ] {
        println!("{} components ({}):", name, symbols.len());
        for symbol in symbols {
            println!("  {symbol}");
        }
        println!();
    }
    Ok(())
}

fn write_json(json: &str, output: Option<&Path>, what: &str) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, json)?;
        println!("✓ {} written to {}", what, path.display());
    } else {
        println!("{json}");
    }
    Ok(())
}
