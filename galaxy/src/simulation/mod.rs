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
//! Simulation loop controller
//!
//! The controller owns the star, planet and comet populations and drives
//! one frame at a time:
//!
//! 1. Drain the frame's commands from the [`InputSource`] and apply them
//! 2. Unless paused, compute forces for all three populations
//! 3. Unless paused, integrate all three populations
//! 4. Unless paused, advance the tick counter
//! 5. Hand the current positions to the [`DisplaySink`]
//!
//! Forces for every population are computed before any population moves,
//! so planets see the star and comet positions of the start of the tick.

mod command;
mod display;

pub use command::{Command, CommandQueue, InputSource, ScriptedInput};
pub use display::{DisplaySink, Frame, Layer, NullSink, Style};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::gravity::Gravity;
use crate::integration::{Integrator, SemiImplicitEuler};
use crate::population::{Kind, Population};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Whether the loop should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running
    Continue,
    /// A quit command was received
    Quit,
}

/// Outcome of [`Simulation::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Frames handed to the display sink
    pub frames: u64,
    /// Physics ticks advanced (frames minus paused frames)
    pub ticks: u64,
    /// Whether the run ended on a quit command
    pub quit: bool,
}

/// Owner of the three populations and the per-frame sequencing
///
/// # Example
///
/// ```
/// use galaxy::{CommandQueue, NullSink, Simulation, SimulationConfig};
///
/// let config = SimulationConfig {
///     planet_count: 100,
///     seed: Some(1),
///     ..SimulationConfig::default()
/// };
/// let mut sim = Simulation::new(config).unwrap();
///
/// let summary = sim.run(&mut CommandQueue::new(), &mut NullSink, Some(3)).unwrap();
/// assert_eq!(summary.frames, 3);
/// assert_eq!(sim.tick(), 3);
/// ```
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    stars: Population,
    planets: Population,
    comets: Population,
    gravity: Gravity,
    integrator: SemiImplicitEuler,
    rng: StdRng,
    paused: bool,
    exporting: bool,
    tick: u64,
    frame: u64,
}

impl Simulation {
    /// Build the populations described by `config` and lay them out
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let stars = Population::new(
            Kind::Star,
            config.star_count,
            config.max_star_capacity,
            config.star_mass,
        )
        .with_mass_floor(config.mass_floor);
        let planets = Population::new(
            Kind::Planet,
            config.planet_count,
            config.planet_count,
            config.planet_mass,
        );
        let comets = Population::new(
            Kind::Comet,
            config.comet_count,
            config.comet_count,
            config.comet_mass,
        );

        let gravity = Gravity::new(config.gravitational_constant, config.softening);
        let integrator = SemiImplicitEuler::new(config.time_step);
        if let Err(warning) = integrator.validate_timestep() {
            log::warn!("{}", warning);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Simulation {
            config,
            stars,
            planets,
            comets,
            gravity,
            integrator,
            rng,
            paused: false,
            exporting: false,
            tick: 0,
            frame: 0,
        };
        sim.initialize_all();

        log::info!(
            "Galaxy ready: {} stars (capacity {}), {} planets, {} comets, h = {} ({})",
            sim.stars.len(),
            sim.stars.capacity(),
            sim.planets.len(),
            sim.comets.len(),
            sim.integrator.timestep(),
            sim.integrator.name(),
        );

        Ok(sim)
    }

    fn initialize_all(&mut self) {
        self.stars
            .initialize_distribution(&self.config.stars, &mut self.rng);
        self.planets
            .initialize_distribution(&self.config.planets, &mut self.rng);
        self.comets
            .initialize_distribution(&self.config.comets, &mut self.rng);
    }

    /// Configuration the simulation was built from
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Star population
    pub fn stars(&self) -> &Population {
        &self.stars
    }

    /// Planet population
    pub fn planets(&self) -> &Population {
        &self.planets
    }

    /// Comet population
    pub fn comets(&self) -> &Population {
        &self.comets
    }

    /// Mutable star population
    pub fn stars_mut(&mut self) -> &mut Population {
        &mut self.stars
    }

    /// Mutable planet population
    pub fn planets_mut(&mut self) -> &mut Population {
        &mut self.planets
    }

    /// Mutable comet population
    pub fn comets_mut(&mut self) -> &mut Population {
        &mut self.comets
    }

    /// Force evaluator
    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    /// Integrator
    pub fn integrator(&self) -> &SemiImplicitEuler {
        &self.integrator
    }

    /// Ticks advanced since start or the last reset
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Frames presented since start; unaffected by pause and reset
    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    /// Whether physics is frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether frames are being written to disk
    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Re-run initial placement for every population and restart the tick count
    ///
    /// Star count and mass keep their current values.
    pub fn reset(&mut self) {
        self.initialize_all();
        self.tick = 0;
        log::info!("Galaxy reset with {} stars", self.stars.len());
    }

    /// Apply a single command immediately
    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::TogglePause => {
                self.paused = !self.paused;
                log::info!("paused = {}", self.paused);
            }
            Command::ResetAll => self.reset(),
            Command::ToggleExport => {
                self.exporting = !self.exporting;
                log::info!("export = {}", self.exporting);
            }
            Command::AddStarAt(position) => {
                if self.stars.append(position) {
                    log::info!(
                        "Added one star to the galaxy at ({:.3}, {:.3})",
                        position.x,
                        position.y
                    );
                }
            }
            Command::IncreaseStarMass => {
                self.stars.adjust_mass(self.config.mass_step);
            }
            Command::DecreaseStarMass => {
                self.stars.adjust_mass(-self.config.mass_step);
            }
        }
        Flow::Continue
    }

    /// Recompute the forces of all three populations from the current positions
    pub fn compute_forces(&mut self) {
        self.gravity.compute_forces(&mut self.stars, &[]);
        self.gravity
            .compute_forces(&mut self.planets, &[&self.stars, &self.comets]);
        self.gravity.compute_forces(&mut self.comets, &[]);
    }

    /// Advance all three populations with the forces of the current tick
    pub fn integrate(&mut self) {
        self.integrator.integrate(&mut self.stars);
        self.integrator.integrate(&mut self.planets);
        self.integrator.integrate(&mut self.comets);
    }

    /// One physics tick regardless of the pause state
    pub fn step(&mut self) {
        self.compute_forces();
        self.integrate();
        self.tick += 1;
        log::trace!("tick {}", self.tick);
    }

    /// Draw calls for the current state
    pub fn frame(&self) -> Frame<'_> {
        let layers = [&self.stars, &self.planets, &self.comets]
            .into_iter()
            .map(|p| {
                let style = Style::for_kind(p.kind());
                Layer {
                    kind: p.kind(),
                    positions: p.positions(),
                    radius: style.radius,
                    color: style.color,
                }
            })
            .collect();

        Frame {
            tick: self.tick,
            export: self.exporting,
            layers,
        }
    }

    /// Run one frame: drain commands, step unless paused, present
    ///
    /// Returns [`Flow::Quit`] as soon as a quit command is drained; the
    /// frame is then neither stepped nor presented.
    pub fn run_frame<I, D>(&mut self, input: &mut I, sink: &mut D) -> Result<Flow>
    where
        I: InputSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        while let Some(command) = input.next_command(self.frame) {
            if self.apply(command) == Flow::Quit {
                log::info!("Quit requested at frame {}", self.frame);
                return Ok(Flow::Quit);
            }
        }

        if !self.paused {
            self.step();
        }

        sink.present(&self.frame())?;
        self.frame += 1;
        Ok(Flow::Continue)
    }

    /// Run frames until quit or until `max_frames` frames have been presented
    pub fn run<I, D>(
        &mut self,
        input: &mut I,
        sink: &mut D,
        max_frames: Option<u64>,
    ) -> Result<RunSummary>
    where
        I: InputSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        let mut summary = RunSummary::default();

        while max_frames.map_or(true, |max| summary.frames < max) {
            match self.run_frame(input, sink)? {
                Flow::Quit => {
                    summary.quit = true;
                    break;
                }
                Flow::Continue => {
                    summary.frames += 1;
                    // Commands are applied before stepping, so the pause
                    // state now is the one the frame ran under
                    if !self.paused {
                        summary.ticks += 1;
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec2;

    fn tiny() -> Simulation {
        let config = SimulationConfig {
            planet_count: 8,
            comet_count: 2,
            seed: Some(9),
            ..SimulationConfig::default()
        };
        Simulation::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimulationConfig {
            time_step: -1.0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_toggles_flip_back() {
        let mut sim = tiny();

        sim.apply(Command::TogglePause);
        sim.apply(Command::ToggleExport);
        assert!(sim.is_paused());
        assert!(sim.is_exporting());

        sim.apply(Command::TogglePause);
        sim.apply(Command::ToggleExport);
        assert!(!sim.is_paused());
        assert!(!sim.is_exporting());
    }

    #[test]
    fn test_quit_is_reported() {
        let mut sim = tiny();
        assert_eq!(sim.apply(Command::Quit), Flow::Quit);
        assert_eq!(sim.apply(Command::IncreaseStarMass), Flow::Continue);
    }

    #[test]
    fn test_step_ignores_pause() {
        let mut sim = tiny();
        sim.apply(Command::TogglePause);
        sim.step();
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_frame_reflects_export_and_tick() {
        let mut sim = tiny();
        sim.step();
        sim.apply(Command::ToggleExport);

        let frame = sim.frame();
        assert_eq!(frame.tick, 1);
        assert!(frame.export);
        assert_eq!(frame.layers.len(), 3);
        assert_eq!(frame.layers[1].positions.len(), 8);
    }

    #[test]
    fn test_planets_feel_comets() {
        let mut sim = tiny();
        sim.compute_forces();
        let before = sim.planets().forces().to_vec();

        sim.comets_mut().positions_mut()[0] = Vec2::new(0.5, 0.5);
        sim.compute_forces();

        assert_ne!(sim.planets().forces(), before.as_slice());
        assert!(sim.comets().forces().iter().all(|f| *f == Vec2::zero()));
    }
}
