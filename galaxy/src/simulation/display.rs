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
//! Display collaborator contract
//!
//! The controller never draws. Each frame it hands a [`Frame`] to a
//! [`DisplaySink`]: one [`Layer`] per population, in draw order, with the
//! radius and color that distinguish the populations on screen.

use crate::error::Result;
use crate::population::Kind;
use crate::vector::Vec2;

/// Radius and packed `0xRRGGBB` color used to draw a population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Circle radius in pixels
    pub radius: u32,
    /// Packed RGB color
    pub color: u32,
}

impl Style {
    /// Style used for a population variant
    pub fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::Star => Style {
                radius: 10,
                color: 0xffd500,
            },
            Kind::Planet => Style {
                radius: 2,
                color: 0xffffff,
            },
            Kind::Comet => Style {
                radius: 4,
                color: 0x0000ff,
            },
        }
    }
}

/// One draw call: a set of circles sharing a radius and color
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    /// Population the positions belong to
    pub kind: Kind,
    /// Circle centers in normalized `[0,1]×[0,1]` space, y pointing up
    pub positions: &'a [Vec2],
    /// Circle radius in pixels
    pub radius: u32,
    /// Packed `0xRRGGBB` color
    pub color: u32,
}

/// Everything a sink needs to render and optionally persist one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// Simulation tick the positions correspond to
    pub tick: u64,
    /// Whether the frame should be written to disk
    pub export: bool,
    /// Draw calls in back-to-front order
    pub layers: Vec<Layer<'a>>,
}

/// Consumer of rendered frames
pub trait DisplaySink {
    /// Render and present one frame
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Sink that discards frames, for benchmarks and headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn present(&mut self, _frame: &Frame<'_>) -> Result<()> {
        Ok(())
    }
}
