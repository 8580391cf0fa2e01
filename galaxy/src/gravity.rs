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
//! Softened Newtonian gravity across populations
//!
//! The evaluator computes, for every body of a target population, the net
//! pull of the other members of that population and of any external
//! populations the target is coupled to:
//!
//! **F_i = Σ_j G · m_P · m_j · (p_j − p_i) / (|p_j − p_i|² + ε²)^(3/2)**
//!
//! # Softening
//!
//! The softening length ε keeps the denominator away from zero, so two
//! coincident bodies contribute a zero force (the displacement in the
//! numerator vanishes) instead of NaN. The self pair `j == i` is skipped.
//!
//! # Parallel Computation
//!
//! Each body's sum is independent of every other body's, so with the
//! `parallel` feature the outer loop is split across the Rayon pool. The
//! inner loop runs over contiguous position slices and allocates nothing.
//!
//! # Coupling
//!
//! Coupling is one-way: a planet feels stars and comets, but computing
//! planet forces never writes to the star or comet populations. Sources are
//! taken by shared reference and only the target's force buffer is written.

use crate::population::{ForcePolicy, Population};
use crate::vector::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gravitational constant in simulation units
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 1.0;

/// Default softening length in normalized screen units
pub const DEFAULT_SOFTENING: f64 = 1e-2;

/// Read-only snapshot of another population used as a force source
#[derive(Debug, Clone, Copy)]
struct Source<'a> {
    positions: &'a [Vec2],
    mass: f64,
}

/// Softened pairwise gravity evaluator
///
/// Holds only the physical constants; it keeps no per-population state
/// between calls.
///
/// # Example
///
/// ```
/// use galaxy::{Gravity, Kind, Population, Vec2};
///
/// let gravity = Gravity::default();
/// let mut stars = Population::new(Kind::Star, 0, 2, 1000.0);
/// stars.append(Vec2::new(0.4, 0.5));
/// stars.append(Vec2::new(0.6, 0.5));
///
/// gravity.compute_forces(&mut stars, &[]);
/// assert!(stars.forces()[0].x > 0.0);
/// assert_eq!(stars.forces()[0], -stars.forces()[1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    g_constant: f64,
    softening: f64,
}

impl Gravity {
    /// Create an evaluator with the given gravitational constant and softening length
    ///
    /// A softening of zero gives plain unsoftened gravity, where coincident
    /// bodies produce NaN. [`SimulationConfig`](crate::SimulationConfig)
    /// only accepts a positive softening.
    ///
    /// # Panics
    ///
    /// Panics if either value is negative or not finite.
    pub fn new(g_constant: f64, softening: f64) -> Self {
        assert!(
            g_constant >= 0.0 && g_constant.is_finite(),
            "Gravitational constant must be non-negative and finite"
        );
        assert!(
            softening >= 0.0 && softening.is_finite(),
            "Softening factor must be non-negative and finite"
        );

        Gravity {
            g_constant,
            softening,
        }
    }

    /// Gravitational constant
    pub fn g_constant(&self) -> f64 {
        self.g_constant
    }

    /// Softening length ε
    pub fn softening(&self) -> f64 {
        self.softening
    }

    /// Force on a body of mass `m_target` at `target` from one of mass `m_source` at `source`
    ///
    /// Coincident positions yield the zero vector as long as ε > 0.
    #[inline]
    pub fn pairwise(&self, target: Vec2, m_target: f64, source: Vec2, m_source: f64) -> Vec2 {
        let diff = source - target;
        let r = (diff.length_squared() + self.softening * self.softening).sqrt();
        diff * (self.g_constant * m_target * m_source / (r * r * r))
    }

    /// Recompute the forces on every live body of `target`
    ///
    /// Forces are cleared first, then accumulated according to the target's
    /// [`ForcePolicy`]:
    ///
    /// - `SelfOnly`: members of `target` only; `external` is ignored
    /// - `Coupled`: members of `target` plus every population in `external`
    /// - `Ballistic`: nothing is accumulated
    ///
    /// Returns the number of bodies whose force was computed.
    pub fn compute_forces(&self, target: &mut Population, external: &[&Population]) -> usize {
        target.clear_forces();

        let sources: Vec<Source<'_>> = match target.force_policy() {
            ForcePolicy::Ballistic => return 0,
            ForcePolicy::SelfOnly => Vec::new(),
            ForcePolicy::Coupled => external
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| Source {
                    positions: p.positions(),
                    mass: p.mass(),
                })
                .collect(),
        };

        let mass = target.mass();
        let (positions, forces) = target.force_view();

        #[cfg(feature = "parallel")]
        {
            self.accumulate_parallel(positions, mass, &sources, forces);
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.accumulate_sequential(positions, mass, &sources, forces);
        }

        forces.len()
    }

    #[cfg(feature = "parallel")]
    fn accumulate_parallel(
        &self,
        positions: &[Vec2],
        mass: f64,
        sources: &[Source<'_>],
        forces: &mut [Vec2],
    ) {
        forces.par_iter_mut().enumerate().for_each(|(i, force)| {
            *force += self.net_force(i, positions, mass, sources);
        });
    }

    #[cfg(not(feature = "parallel"))]
    fn accumulate_sequential(
        &self,
        positions: &[Vec2],
        mass: f64,
        sources: &[Source<'_>],
        forces: &mut [Vec2],
    ) {
        for (i, force) in forces.iter_mut().enumerate() {
            *force += self.net_force(i, positions, mass, sources);
        }
    }

    // Sum over the body's own population, skipping itself, then over each source.
    fn net_force(&self, i: usize, positions: &[Vec2], mass: f64, sources: &[Source<'_>]) -> Vec2 {
        let p = positions[i];
        let mut total = Vec2::zero();

        for (j, &other) in positions.iter().enumerate() {
            if j != i {
                total += self.pairwise(p, mass, other, mass);
            }
        }

        for source in sources {
            for &other in source.positions {
                total += self.pairwise(p, mass, other, source.mass);
            }
        }

        total
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::new(DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_SOFTENING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Kind;

    fn population(kind: Kind, mass: f64, positions: &[Vec2]) -> Population {
        let mut p = Population::new(kind, 0, positions.len(), mass);
        for &pos in positions {
            p.append(pos);
        }
        p
    }

    #[test]
    fn test_default_constants() {
        let gravity = Gravity::default();
        assert_eq!(gravity.g_constant(), 1.0);
        assert_eq!(gravity.softening(), 1e-2);
    }

    #[test]
    #[should_panic(expected = "Gravitational constant must be non-negative and finite")]
    fn test_negative_g_panics() {
        Gravity::new(-1.0, DEFAULT_SOFTENING);
    }

    #[test]
    #[should_panic(expected = "Softening factor must be non-negative and finite")]
    fn test_negative_softening_panics() {
        Gravity::new(1.0, -1.0);
    }

    #[test]
    fn test_pairwise_matches_formula() {
        let gravity = Gravity::default();
        let f = gravity.pairwise(Vec2::zero(), 2.0, Vec2::new(0.3, 0.4), 5.0);

        let r = (0.25_f64 + 1e-4).sqrt();
        let expected = Vec2::new(0.3, 0.4) * (10.0 / (r * r * r));
        assert!((f - expected).length() < 1e-9);
    }

    #[test]
    fn test_pairwise_points_toward_source() {
        let gravity = Gravity::default();
        let f = gravity.pairwise(Vec2::new(0.5, 0.5), 1.0, Vec2::new(0.9, 0.5), 1.0);
        assert!(f.x > 0.0);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn test_coincident_pair_is_zero() {
        let gravity = Gravity::default();
        let p = Vec2::new(0.5, 0.5);
        let f = gravity.pairwise(p, 1000.0, p, 1000.0);
        assert_eq!(f, Vec2::zero());
    }

    #[test]
    fn test_self_only_ignores_external() {
        let gravity = Gravity::default();
        let mut stars = population(Kind::Star, 1000.0, &[Vec2::new(0.4, 0.5), Vec2::new(0.6, 0.5)]);
        let comets = population(Kind::Comet, 100.0, &[Vec2::new(0.5, 0.9)]);

        gravity.compute_forces(&mut stars, &[]);
        let alone = stars.forces().to_vec();

        gravity.compute_forces(&mut stars, &[&comets]);
        assert_eq!(stars.forces(), &alone[..]);
    }

    #[test]
    fn test_coupled_includes_sources() {
        let gravity = Gravity::default();
        let mut planets = population(Kind::Planet, 1.0, &[Vec2::new(0.5, 0.5)]);
        let stars = population(Kind::Star, 1000.0, &[Vec2::new(0.7, 0.5)]);

        let n = gravity.compute_forces(&mut planets, &[&stars]);
        assert_eq!(n, 1);

        let expected = gravity.pairwise(Vec2::new(0.5, 0.5), 1.0, Vec2::new(0.7, 0.5), 1000.0);
        assert_eq!(planets.forces()[0], expected);
    }

    #[test]
    fn test_ballistic_yields_zero() {
        let gravity = Gravity::default();
        let mut comets = population(
            Kind::Comet,
            100.0,
            &[Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.5)],
        );
        let stars = population(Kind::Star, 1000.0, &[Vec2::new(0.5, 0.5)]);

        let n = gravity.compute_forces(&mut comets, &[&stars]);
        assert_eq!(n, 0);
        assert!(comets.forces().iter().all(|f| *f == Vec2::zero()));
    }

    #[test]
    fn test_forces_do_not_carry_over() {
        let gravity = Gravity::default();
        let mut stars = population(Kind::Star, 1000.0, &[Vec2::new(0.4, 0.5), Vec2::new(0.6, 0.5)]);

        gravity.compute_forces(&mut stars, &[]);
        let first = stars.forces().to_vec();
        gravity.compute_forces(&mut stars, &[]);
        assert_eq!(stars.forces(), &first[..]);
    }

    #[test]
    fn test_appended_body_participates() {
        let gravity = Gravity::default();
        let mut stars = Population::new(Kind::Star, 0, 3, 1000.0);
        stars.append(Vec2::new(0.5, 0.5));

        gravity.compute_forces(&mut stars, &[]);
        assert_eq!(stars.forces()[0], Vec2::zero());

        stars.append(Vec2::new(0.5, 0.7));
        gravity.compute_forces(&mut stars, &[]);
        assert!(stars.forces()[0].y > 0.0);
        assert!(stars.forces()[1].y < 0.0);
    }
}
