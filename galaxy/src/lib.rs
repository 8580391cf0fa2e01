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
//! # Galaxy
//!
//! A two-dimensional gravitational N-body simulation of three populations
//! of point masses in normalized screen space.
//!
//! ## Features
//!
//! - **Populations**: stars, planets and comets with shared per-population mass
//! - **Softened Gravity**: all-pairs O(n²) forces with a softening length
//! - **One-way Coupling**: planets feel stars and comets, never the reverse
//! - **Semi-implicit Euler**: fixed-step symplectic integration
//! - **Parallelization**: Optional Rayon integration for multi-threaded force evaluation
//! - **Headless Display**: software rasterizer with PNG frame export
//!
//! ## Example
//!
//! ```rust
//! use galaxy::{Gravity, Kind, Population, Vec2};
//! use galaxy::integration::{Integrator, SemiImplicitEuler};
//!
//! let mut stars = Population::new(Kind::Star, 2, 10, 1000.0);
//! stars.positions_mut()[0] = Vec2::new(0.4, 0.5);
//! stars.positions_mut()[1] = Vec2::new(0.6, 0.5);
//!
//! let gravity = Gravity::default();
//! let integrator = SemiImplicitEuler::new(5e-5);
//!
//! gravity.compute_forces(&mut stars, &[]);
//! integrator.integrate(&mut stars);
//!
//! // The two stars fall toward each other
//! assert!(stars.positions()[0].x > 0.4);
//! assert!(stars.positions()[1].x < 0.6);
//! ```

#![warn(missing_docs)]

/// Two-dimensional vector math
pub mod vector;

/// Error types
pub mod error;

/// Star, planet and comet storage and initial placement
pub mod population;

/// Softened pairwise gravity
pub mod gravity;

/// Numerical integration methods
pub mod integration;

/// Scenario configuration
pub mod config;

/// Frame loop controller, commands and display contract
pub mod simulation;

/// Software raster display sink
pub mod raster;

pub use config::{DisplayConfig, ScriptEntry, SimulationConfig};
pub use error::{Error, Result};
pub use gravity::Gravity;
pub use population::{ForcePolicy, Kind, Layout, LayoutParams, Population};
pub use raster::RasterSink;
pub use simulation::{
    Command, CommandQueue, DisplaySink, Flow, Frame, InputSource, Layer, NullSink, RunSummary,
    ScriptedInput, Simulation, Style,
};
pub use vector::Vec2;
