// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Headless galaxy runner
//!
//! Loads a scenario, replays its command script and renders every frame
//! with the raster sink. Frames are written to disk while export is
//! toggled on.

use anyhow::{Context, Result};
use clap::Parser;
use galaxy::{Command, Flow, RasterSink, ScriptedInput, Simulation, SimulationConfig};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(version, about = "Three-population gravitational N-body simulation")]
struct Args {
    /// Scenario file (TOML); defaults to the built-in reference galaxy
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many frames; runs until a scripted quit otherwise
    #[arg(short, long)]
    frames: Option<u64>,

    /// Override the directory exported frames are written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Override the random seed used for initial placement
    #[arg(long)]
    seed: Option<u64>,

    /// Start with frame export switched on
    #[arg(long)]
    export: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(dir) = &args.export_dir {
        config.display.export_dir = dir.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut input = ScriptedInput::new(config.script.iter().cloned());
    let mut sink = RasterSink::from_config(&config.display);
    let mut sim = Simulation::new(config).context("failed to build simulation")?;
    if args.export {
        sim.apply(Command::ToggleExport);
    }

    let start = Instant::now();
    let mut frames: u64 = 0;

    while args.frames.map_or(true, |max| frames < max) {
        if sim.run_frame(&mut input, &mut sink)? == Flow::Quit {
            break;
        }
        frames += 1;

        if frames.is_power_of_two() || frames % 1024 == 0 {
            log::info!(
                "frame {}: tick {}, {} stars at mass {}, {:.2?} elapsed",
                frames,
                sim.tick(),
                sim.stars().len(),
                sim.stars().mass(),
                start.elapsed(),
            );
            for population in [sim.stars(), sim.planets(), sim.comets()] {
                log::info!(
                    "  {} kinetic energy {:.6e}",
                    population.kind(),
                    population.kinetic_energy()
                );
            }
        }
    }

    log::info!(
        "Finished after {} frames ({} exported) in {:.2?}",
        frames,
        sink.exported(),
        start.elapsed()
    );

    Ok(())
}
