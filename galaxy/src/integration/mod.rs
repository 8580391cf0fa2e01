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
//! Numerical integration of population state
//!
//! Integrators advance velocity and position of a population from the
//! forces accumulated for the current tick. All forces of a tick are
//! computed before any population is integrated, so every population sees
//! the same instantaneous force field.
//!
//! # Timestep Guidelines
//!
//! - The timestep is fixed for the whole run; there is no adaptive stepping
//! - Too small: numerical precision issues and wasted computation
//! - Too large: instability, bodies flung out by close encounters
//! - The reference scenario uses h = 5e-5 in normalized screen units

use crate::error::{Error, Result};
use crate::population::Population;

mod euler;

pub use euler::SemiImplicitEuler;

/// Trait for numerical integration methods
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator
    fn timestep(&self) -> f64;

    /// Set the timestep for this integrator
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    fn set_timestep(&mut self, dt: f64);

    /// Validate the timestep for stability
    ///
    /// Returns a warning if the timestep might cause numerical issues.
    /// Extremely small timesteps may lead to precision loss, while large
    /// timesteps may cause instability.
    fn validate_timestep(&self) -> Result<()> {
        let dt = self.timestep();

        if dt <= 0.0 || !dt.is_finite() {
            return Err(Error::Timestep(format!(
                "invalid timestep {}, must be positive and finite",
                dt
            )));
        }

        if dt < 1e-9 {
            return Err(Error::Timestep(format!(
                "timestep {} is extremely small and may cause precision loss with f64",
                dt
            )));
        }

        if dt > 1.0 {
            return Err(Error::Timestep(format!(
                "timestep {} is large and may cause instability",
                dt
            )));
        }

        Ok(())
    }

    /// Advance every live body of `population` by one timestep
    ///
    /// Reads the forces accumulated for this tick and updates velocities and
    /// positions in place. Returns the number of bodies advanced.
    fn integrate(&self, population: &mut Population) -> usize;
}
