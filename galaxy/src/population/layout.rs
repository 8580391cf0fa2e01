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
//! Placement policies for initial body distributions
//!
//! Each population variant lays its bodies out differently. The policy is a
//! plain enum so that the placement code is exhaustively matched instead of
//! dispatched through a trait object.

use crate::vector::Vec2;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Inner radius of the planet annulus, as a fraction of the layout size
pub const DISC_INNER_RADIUS: f64 = 0.6;

/// Radial width of the planet annulus, as a fraction of the layout size
pub const DISC_WIDTH: f64 = 0.4;

/// How a population places its bodies on (re)initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Equal angular spacing on a circle of radius `size` around `center`
    Ring,
    /// Random angle and area-weighted radius in the annulus `[0.6, 1.0]·size`
    Disc,
    /// Vertical line at `x = 0`, `y = i / count`, all moving along +x
    Line,
}

/// Geometry and speed handed to a placement policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Center of the distribution in normalized space
    pub center: Vec2,
    /// Scale applied to the unit radius of ring and disc layouts
    pub size: f64,
    /// Initial speed of every body
    pub speed: f64,
}

impl LayoutParams {
    /// Create a new parameter set
    pub fn new(center: Vec2, size: f64, speed: f64) -> Self {
        LayoutParams {
            center,
            size,
            speed,
        }
    }
}

impl Layout {
    /// Overwrite `positions` and `velocities` according to this policy
    ///
    /// Both slices must have the same length, which is taken as the body
    /// count. Ring and disc layouts place a lone body at the center at rest.
    pub fn place<R: Rng + ?Sized>(
        self,
        positions: &mut [Vec2],
        velocities: &mut [Vec2],
        params: &LayoutParams,
        rng: &mut R,
    ) {
        debug_assert_eq!(positions.len(), velocities.len());
        let count = positions.len();

        if count == 1 && self != Layout::Line {
            positions[0] = params.center;
            velocities[0] = Vec2::zero();
            return;
        }

        match self {
            Layout::Ring => {
                for (i, (pos, vel)) in positions.iter_mut().zip(velocities.iter_mut()).enumerate() {
                    let theta = TAU * i as f64 / count as f64;
                    let (p, v) = orbit_state(theta, 1.0, params);
                    *pos = p;
                    *vel = v;
                }
            }
            Layout::Disc => {
                let angle = Uniform::new(0.0, TAU);
                for (pos, vel) in positions.iter_mut().zip(velocities.iter_mut()) {
                    let theta = angle.sample(rng);
                    let radius = rng.gen::<f64>().sqrt() * DISC_WIDTH + DISC_INNER_RADIUS;
                    let (p, v) = orbit_state(theta, radius, params);
                    *pos = p;
                    *vel = v;
                }
            }
            Layout::Line => {
                let velocity = Vec2::new(params.speed, 0.0);
                for (i, (pos, vel)) in positions.iter_mut().zip(velocities.iter_mut()).enumerate() {
                    *pos = Vec2::new(0.0, i as f64 / count as f64);
                    *vel = velocity;
                }
            }
        }
    }
}

// Position on the circle and the counter-clockwise tangential velocity.
fn orbit_state(theta: f64, radius: f64, params: &LayoutParams) -> (Vec2, Vec2) {
    let dir = Vec2::from_angle(theta);
    (
        params.center + dir * (radius * params.size),
        dir.perp() * params.speed,
    )
}
