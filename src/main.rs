use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use calcgas::overlay::InputsPatch;
use calcgas::presets::{self, PRESETS};
use calcgas::store::InputStore;
use calcgas::supercompressibility::{self, GasComposition};
use calcgas::watch::Watcher;
use calcgas::{compute, report, Inputs, Outputs};
use clap::Parser;
use log::{debug, info, warn};
use serde_json::json;

/// Gas flow rate calculation from orifice meter chart readings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose. Prints a timestamped summary after each calculation.
    #[arg(short, long)]
    verbose: bool,

    /// Blue pen chart reading
    #[arg(long)]
    pluma_azul: Option<f64>,

    /// Red pen chart reading
    #[arg(long)]
    pluma_roja: Option<f64>,

    /// Orifice plate diameter (in)
    #[arg(long)]
    diametro_placa: Option<f64>,

    /// Meter run bore diameter (in)
    #[arg(long)]
    diametro_puente: Option<f64>,

    /// Static chart range (% of full scale)
    #[arg(long)]
    medidor_rango_estatico: Option<f64>,

    /// Differential chart range (% of full scale)
    #[arg(long, allow_negative_numbers = true)]
    medidor_rango_diferencial: Option<f64>,

    /// Flowing temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    temperaturac: Option<f64>,

    /// Gas specific gravity, relative to air
    #[arg(long)]
    gravgas: Option<f64>,

    /// Meter base constant
    #[arg(long)]
    fb: Option<f64>,

    /// Supercompressibility factor
    #[arg(long)]
    fpv: Option<f64>,

    /// Ratio of specific heats (k)
    #[arg(long)]
    relacion_calor_especifico: Option<f64>,

    /// Gas preset applied before the field flags, by key or name.
    #[arg(long)]
    preset: Option<String>,

    /// Lists the gas presets and exits.
    #[arg(long)]
    list_presets: bool,

    /// Derives FPV from an AGA8 detail characterization at flowing conditions.
    #[arg(long)]
    aga8_fpv: bool,

    /// JSON file of component mole fractions for --aga8-fpv. Defaults to sweet methane.
    #[arg(long, requires = "aga8_fpv")]
    composition: Option<PathBuf>,

    /// Watches a JSON inputs file and recalculates whenever it changes.
    #[arg(long)]
    watch: Option<PathBuf>,

    /// Debounce delay in milliseconds for --watch. Defaults to 400.
    #[arg(long, default_value_t = 400)]
    debounce: u64,

    /// Scan rate in milliseconds for --watch. Defaults to 250.
    #[arg(long, default_value_t = 250)]
    scan: u64,

    /// Stops --watch after this many scans.
    #[arg(long)]
    cycles: Option<u64>,

    /// Prints inputs and results as JSON.
    #[arg(long)]
    json: bool,

    /// Starts from the built-in defaults instead of the last saved inputs.
    #[arg(long)]
    reset: bool,

    /// Does not save the inputs after calculating.
    #[arg(long)]
    no_save: bool,

    /// Saved inputs file. Defaults to the platform data directory.
    #[arg(long)]
    state: Option<PathBuf>,
}

impl Args {
    fn field_flags(&self) -> InputsPatch {
        InputsPatch {
            pluma_azul: self.pluma_azul,
            pluma_roja: self.pluma_roja,
            diametro_placa: self.diametro_placa,
            diametro_puente: self.diametro_puente,
            medidor_rango_estatico: self.medidor_rango_estatico,
            medidor_rango_diferencial: self.medidor_rango_diferencial,
            temperaturac: self.temperaturac,
            gravgas: self.gravgas,
            fb: self.fb,
            fpv: self.fpv,
            relacion_calor_especifico: self.relacion_calor_especifico,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    info!(" [!] Parsed arguments.");

    if args.list_presets {
        for p in &PRESETS {
            println!(
                "{:<16} {:<22} gravgas = {:<7} k = {:<5} fpv = {}",
                p.key, p.name, p.gravgas, p.relacion_calor_especifico, p.fpv
            );
        }
        return Ok(());
    }

    let store = match &args.state {
        Some(path) => InputStore::new(path),
        None => InputStore::default_location()?,
    };

    let mut inputs = if args.reset {
        Inputs::default()
    } else {
        store.load()?
    };

    if let Some(name) = &args.preset {
        let preset = presets::find(name)
            .ok_or_else(|| anyhow!("unknown preset '{}' (see --list-presets)", name))?;
        inputs = preset.apply(inputs);
        info!(" [!] Applied preset {}.", preset.name);
    }

    inputs = args.field_flags().apply(inputs);

    let composition = if args.aga8_fpv {
        Some(load_composition(args.composition.as_ref())?)
    } else {
        None
    };

    match &args.watch {
        Some(path) => {
            info!(
                " [!] Watching {} (scan {} ms, debounce {} ms).",
                path.display(),
                args.scan,
                args.debounce
            );
            let mut watcher = Watcher::new(path, inputs, Duration::from_millis(args.debounce));
            watcher.run(
                Duration::from_millis(args.scan),
                args.cycles,
                |inputs, outputs| {
                    let (inputs, outputs) = match &composition {
                        Some(c) => match with_aga8_fpv(inputs, c) {
                            Ok(adjusted) => adjusted,
                            Err(e) => {
                                warn!("Keeping fpv = {}: {:#}", inputs.fpv, e);
                                (*inputs, *outputs)
                            }
                        },
                        None => (*inputs, *outputs),
                    };
                    if let Err(e) = print_results(&args, &inputs, &outputs) {
                        warn!("{:#}", e);
                    }
                    save(&args, &store, &inputs);
                },
            );
        }
        None => {
            let (inputs, outputs) = match &composition {
                Some(c) => with_aga8_fpv(&inputs, c)?,
                None => (inputs, compute(&inputs)),
            };
            print_results(&args, &inputs, &outputs)?;
            save(&args, &store, &inputs);
        }
    }

    Ok(())
}

fn load_composition(path: Option<&PathBuf>) -> Result<GasComposition> {
    let Some(path) = path else {
        return Ok(GasComposition::sweet_methane());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read composition {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse composition {}", path.display()))
}

/// Replaces fpv with the AGA8 value at the record's flowing pressure and
/// temperature and recalculates.
fn with_aga8_fpv(inputs: &Inputs, composition: &GasComposition) -> Result<(Inputs, Outputs)> {
    let flowing = compute(inputs);
    let fpv = supercompressibility::fpv(composition, flowing.pfipca, flowing.temperaturaf)
        .context("AGA8 supercompressibility")?;
    info!(
        " [!] AGA8 fpv = {} at {} psia, {} °F.",
        fpv, flowing.pfipca, flowing.temperaturaf
    );
    let inputs = Inputs { fpv, ..*inputs };
    Ok((inputs, compute(&inputs)))
}

fn print_results(args: &Args, inputs: &Inputs, outputs: &Outputs) -> Result<()> {
    debug!("{:?} -> {:?}", inputs, outputs);

    if args.json {
        let text = serde_json::to_string_pretty(&json!({
            "inputs": inputs,
            "outputs": outputs,
        }))?;
        println!("{}", text);
    } else {
        println!("{}", report::render(outputs));
    }

    if args.verbose {
        let now = chrono::Local::now();
        println!("[{}]    {}", now, report::summary(outputs));
    }
    Ok(())
}

fn save(args: &Args, store: &InputStore, inputs: &Inputs) {
    if args.no_save {
        return;
    }
    match store.save(inputs) {
        Ok(()) => info!(" [!] Saved inputs to {}.", store.path().display()),
        Err(e) => warn!("{}", e),
    }
}
