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
//! Scenario configuration
//!
//! A scenario fixes population sizes, masses, initial layouts and the
//! timestep for a run. Every key has a default matching the reference
//! galaxy, so a configuration file only needs the keys it changes.
//!
//! # TOML format
//!
//! ```toml
//! star_count = 2
//! star_mass = 1000.0
//! max_star_capacity = 10
//! planet_count = 20000
//! planet_mass = 1.0
//! comet_count = 10
//! comet_mass = 100.0
//! time_step = 5e-5
//! seed = 42
//!
//! [stars]
//! center = [0.5, 0.5]
//! size = 0.2
//! speed = 10.0
//!
//! [display]
//! width = 800
//! height = 800
//! export_dir = "images"
//!
//! [[script]]
//! frame = 120
//! command = { add_star_at = [0.3, 0.7] }
//!
//! [[script]]
//! frame = 240
//! command = "increase_star_mass"
//! ```

use crate::error::{Error, Result};
use crate::gravity::{DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_SOFTENING};
use crate::population::{LayoutParams, DEFAULT_MASS_FLOOR};
use crate::simulation::Command;
use crate::vector::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output surface settings for the raster display sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Directory that exported frames are written to
    pub export_dir: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 800,
            height: 800,
            export_dir: PathBuf::from("images"),
        }
    }
}

/// A command replayed by the scripted input source at a given frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Frame number (0-based) on which the command is issued
    pub frame: u64,
    /// Command to issue
    pub command: Command,
}

/// Full description of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial number of stars
    pub star_count: usize,
    /// Mass shared by all stars
    pub star_mass: f64,
    /// Maximum number of stars; further additions are dropped
    pub max_star_capacity: usize,
    /// Number of planets
    pub planet_count: usize,
    /// Mass shared by all planets
    pub planet_mass: f64,
    /// Number of comets
    pub comet_count: usize,
    /// Mass shared by all comets
    pub comet_mass: f64,
    /// Fixed integration timestep `h`
    pub time_step: f64,
    /// Gravitational constant `G`
    pub gravitational_constant: f64,
    /// Softening length `ε`
    pub softening: f64,
    /// Lower bound for the star mass when it is adjusted
    pub mass_floor: f64,
    /// Amount added or removed by one mass command
    pub mass_step: f64,
    /// Seed for the planet placement RNG; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Star ring layout
    pub stars: LayoutParams,
    /// Planet disc layout
    pub planets: LayoutParams,
    /// Comet line layout (only `speed` is used)
    pub comets: LayoutParams,
    /// Raster sink settings
    pub display: DisplayConfig,
    /// Commands replayed by the scripted input source
    pub script: Vec<ScriptEntry>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            star_count: 2,
            star_mass: 1000.0,
            max_star_capacity: 10,
            planet_count: 20_000,
            planet_mass: 1.0,
            comet_count: 10,
            comet_mass: 100.0,
            time_step: 5e-5,
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            softening: DEFAULT_SOFTENING,
            mass_floor: DEFAULT_MASS_FLOOR,
            mass_step: 100.0,
            seed: None,
            stars: LayoutParams::new(Vec2::new(0.5, 0.5), 0.2, 10.0),
            planets: LayoutParams::new(Vec2::new(0.5, 0.5), 0.4, 10.0),
            comets: LayoutParams::new(Vec2::zero(), 0.0, 20.0),
            display: DisplayConfig::default(),
            script: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::invalid("config", e.to_string()))
    }

    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<()> {
        positive("star_mass", self.star_mass)?;
        positive("planet_mass", self.planet_mass)?;
        positive("comet_mass", self.comet_mass)?;
        positive("time_step", self.time_step)?;
        non_negative("gravitational_constant", self.gravitational_constant)?;
        positive("softening", self.softening)?;
        positive("mass_floor", self.mass_floor)?;
        non_negative("mass_step", self.mass_step)?;

        if self.star_count > self.max_star_capacity {
            return Err(Error::invalid(
                "star_count",
                format!(
                    "{} exceeds max_star_capacity {}",
                    self.star_count, self.max_star_capacity
                ),
            ));
        }

        if self.star_mass < self.mass_floor {
            return Err(Error::invalid(
                "star_mass",
                format!("{} is below mass_floor {}", self.star_mass, self.mass_floor),
            ));
        }

        for (field, params) in [
            ("stars", &self.stars),
            ("planets", &self.planets),
            ("comets", &self.comets),
        ] {
            if !params.center.is_valid() || !params.size.is_finite() || !params.speed.is_finite() {
                return Err(Error::invalid(field, "layout values must be finite"));
            }
        }

        for entry in &self.script {
            if let Command::AddStarAt(position) = entry.command {
                if !position.is_valid() {
                    return Err(Error::invalid(
                        "script",
                        format!("add_star_at position on frame {} must be finite", entry.frame),
                    ));
                }
            }
        }

        if self.display.width == 0 || self.display.height == 0 {
            return Err(Error::invalid("display", "canvas dimensions must be non-zero"));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, format!("{} must be positive and finite", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, format!("{} must be non-negative and finite", value)))
    }
}
