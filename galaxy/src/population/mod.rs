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
//! Body populations
//!
//! A population is a homogeneous set of point masses that share one scalar
//! mass. Storage for the maximum number of bodies is allocated up front and
//! a live `count` marks the prefix in use, so appending never reallocates
//! and every per-body loop is bounded by `count`.
//!
//! # Variants
//!
//! Stars, planets and comets differ only in how they are placed
//! ([`Layout`]) and in which forces they feel ([`ForcePolicy`]). Both are
//! tags carried by the population rather than separate types.

mod layout;

pub use layout::{Layout, LayoutParams, DISC_INNER_RADIUS, DISC_WIDTH};

use crate::vector::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default lower bound for a population's mass after adjustment
pub const DEFAULT_MASS_FLOOR: f64 = 100.0;

/// Which population a set of bodies represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Heavy, self-gravitating bodies laid out on a ring
    Star,
    /// Light test particles in a disc, pulled by stars and comets
    Planet,
    /// Ballistic bodies crossing the field in a straight line
    Comet,
}

impl Kind {
    /// Placement policy used by this population unless overridden
    pub fn default_layout(self) -> Layout {
        match self {
            Kind::Star => Layout::Ring,
            Kind::Planet => Layout::Disc,
            Kind::Comet => Layout::Line,
        }
    }

    /// Force policy used by this population unless overridden
    pub fn default_force_policy(self) -> ForcePolicy {
        match self {
            Kind::Star => ForcePolicy::SelfOnly,
            Kind::Planet => ForcePolicy::Coupled,
            Kind::Comet => ForcePolicy::Ballistic,
        }
    }

    /// Plural name used in log output
    pub fn label(self) -> &'static str {
        match self {
            Kind::Star => "stars",
            Kind::Planet => "planets",
            Kind::Comet => "comets",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which gravitational contributions a population accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcePolicy {
    /// Only members of the same population attract each other
    SelfOnly,
    /// Self-interaction plus one-way pull from the external populations
    Coupled,
    /// No forces at all; bodies keep their initial velocity
    Ballistic,
}

/// Fixed-capacity collection of bodies sharing one mass
///
/// # Examples
///
/// ```
/// use galaxy::{Kind, Population, Vec2};
///
/// let mut stars = Population::new(Kind::Star, 1, 2, 150.0);
/// assert!(stars.append(Vec2::new(0.1, 0.2)));
/// assert!(!stars.append(Vec2::new(0.3, 0.4))); // at capacity
/// assert_eq!(stars.len(), 2);
///
/// stars.adjust_mass(-100.0);
/// assert_eq!(stars.mass(), 100.0); // clamped to the floor
/// ```
#[derive(Debug, Clone)]
pub struct Population {
    kind: Kind,
    layout: Layout,
    force_policy: ForcePolicy,
    mass: f64,
    mass_floor: f64,
    count: usize,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    forces: Vec<Vec2>,
}

impl Population {
    /// Create a population with `count` bodies at the origin and room for `capacity`
    ///
    /// Bodies start at rest; call [`Population::initialize_distribution`] to
    /// lay them out.
    ///
    /// # Panics
    ///
    /// Panics if `count > capacity` or if `mass` is not positive and finite.
    pub fn new(kind: Kind, count: usize, capacity: usize, mass: f64) -> Self {
        assert!(
            count <= capacity,
            "Population count must not exceed its capacity"
        );
        assert!(
            mass > 0.0 && mass.is_finite(),
            "Population mass must be positive and finite"
        );

        Population {
            kind,
            layout: kind.default_layout(),
            force_policy: kind.default_force_policy(),
            mass,
            mass_floor: DEFAULT_MASS_FLOOR,
            count,
            positions: vec![Vec2::zero(); capacity],
            velocities: vec![Vec2::zero(); capacity],
            forces: vec![Vec2::zero(); capacity],
        }
    }

    /// Override the placement policy
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Override the force policy
    pub fn with_force_policy(mut self, policy: ForcePolicy) -> Self {
        self.force_policy = policy;
        self
    }

    /// Set the lower bound applied by [`Population::adjust_mass`]
    ///
    /// # Panics
    ///
    /// Panics if `floor` is not positive and finite.
    pub fn with_mass_floor(mut self, floor: f64) -> Self {
        assert!(
            floor > 0.0 && floor.is_finite(),
            "Mass floor must be positive and finite"
        );
        self.mass_floor = floor;
        self
    }

    /// Population variant
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Placement policy tag
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Force policy tag
    pub fn force_policy(&self) -> ForcePolicy {
        self.force_policy
    }

    /// Mass shared by every body
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Lower bound for the mass after adjustment
    pub fn mass_floor(&self) -> f64 {
        self.mass_floor
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the population has no live bodies
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of bodies
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// Whether another append would be dropped
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Positions of the live bodies
    pub fn positions(&self) -> &[Vec2] {
        &self.positions[..self.count]
    }

    /// Mutable positions of the live bodies
    pub fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.positions[..self.count]
    }

    /// Velocities of the live bodies
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities[..self.count]
    }

    /// Mutable velocities of the live bodies
    pub fn velocities_mut(&mut self) -> &mut [Vec2] {
        &mut self.velocities[..self.count]
    }

    /// Forces accumulated during the current tick
    pub fn forces(&self) -> &[Vec2] {
        &self.forces[..self.count]
    }

    /// Lay out all live bodies according to the population's placement policy
    ///
    /// Prior positions and velocities are overwritten and forces are zeroed.
    pub fn initialize_distribution<R: Rng + ?Sized>(&mut self, params: &LayoutParams, rng: &mut R) {
        let n = self.count;
        self.layout.place(
            &mut self.positions[..n],
            &mut self.velocities[..n],
            params,
            rng,
        );
        self.clear_forces();
    }

    /// Add one body at `position` with zero velocity and force
    ///
    /// Returns `false` without touching the population when it is already at
    /// capacity.
    pub fn append(&mut self, position: Vec2) -> bool {
        if self.is_full() {
            return false;
        }

        let i = self.count;
        self.positions[i] = position;
        self.velocities[i] = Vec2::zero();
        self.forces[i] = Vec2::zero();
        self.count += 1;
        true
    }

    /// Change the shared mass by `delta`, clamped to the mass floor
    ///
    /// Returns the new mass.
    pub fn adjust_mass(&mut self, delta: f64) -> f64 {
        self.mass = (self.mass + delta).max(self.mass_floor);
        log::info!("{} mass now: {}", self.kind, self.mass);
        self.mass
    }

    /// Zero the force of every live body
    pub fn clear_forces(&mut self) {
        self.forces[..self.count].fill(Vec2::zero());
    }

    /// Total kinetic energy, `Σ ½·m·|v|²`
    pub fn kinetic_energy(&self) -> f64 {
        let v_sq: f64 = self.velocities().iter().map(|v| v.length_squared()).sum();
        0.5 * self.mass * v_sq
    }

    /// Total linear momentum, `Σ m·v`
    pub fn momentum(&self) -> Vec2 {
        let v_sum = self
            .velocities()
            .iter()
            .fold(Vec2::zero(), |acc, v| acc + *v);
        v_sum * self.mass
    }

    #[cfg(test)]
    pub(crate) fn forces_mut(&mut self) -> &mut [Vec2] {
        &mut self.forces[..self.count]
    }

    // Positions read-only alongside the writable force buffer, for the evaluator.
    pub(crate) fn force_view(&mut self) -> (&[Vec2], &mut [Vec2]) {
        let n = self.count;
        (&self.positions[..n], &mut self.forces[..n])
    }

    // Positions, velocities and forces of the live prefix, for the integrator.
    pub(crate) fn state_view(&mut self) -> (&mut [Vec2], &mut [Vec2], &[Vec2]) {
        let n = self.count;
        (
            &mut self.positions[..n],
            &mut self.velocities[..n],
            &self.forces[..n],
        )
    }
}
