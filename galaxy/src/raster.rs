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
//! Software raster display sink
//!
//! Draws each frame as filled circles on a black canvas and, when the frame
//! asks for it, saves the canvas as `output_{tick:05}.png` in the export
//! directory. Normalized coordinates have y pointing up; the canvas has
//! row 0 at the top, so y is flipped during rasterization.

use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::simulation::{DisplaySink, Frame};
use crate::vector::Vec2;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Display sink rendering into an in-memory RGB image
#[derive(Debug, Clone)]
pub struct RasterSink {
    canvas: RgbImage,
    export_dir: PathBuf,
    exported: u64,
}

impl RasterSink {
    /// Create a sink with a `width`×`height` canvas
    ///
    /// # Panics
    /// Panics if either dimension is zero
    pub fn new(width: u32, height: u32, export_dir: impl Into<PathBuf>) -> Self {
        assert!(width > 0 && height > 0, "Canvas dimensions must be non-zero");

        RasterSink {
            canvas: RgbImage::from_pixel(width, height, BACKGROUND),
            export_dir: export_dir.into(),
            exported: 0,
        }
    }

    /// Create a sink from display settings
    pub fn from_config(config: &DisplayConfig) -> Self {
        RasterSink::new(config.width, config.height, config.export_dir.clone())
    }

    /// Canvas holding the most recently presented frame
    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// Directory exported frames are written to
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Number of frames written to disk so far
    pub fn exported(&self) -> u64 {
        self.exported
    }

    /// Path an exported frame for `tick` is written to
    pub fn export_path(&self, tick: u64) -> PathBuf {
        self.export_dir.join(format!("output_{:05}.png", tick))
    }

    /// Rasterize a frame without exporting it
    pub fn render(&mut self, frame: &Frame<'_>) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = BACKGROUND;
        }

        for layer in &frame.layers {
            let color = unpack(layer.color);
            for &position in layer.positions {
                self.fill_circle(position, layer.radius, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: u32, color: Rgb<u8>) {
        if !center.is_valid() {
            return;
        }

        let (width, height) = self.canvas.dimensions();
        let cx = (center.x * f64::from(width)).round() as i64;
        let cy = ((1.0 - center.y) * f64::from(height)).round() as i64;
        let r = i64::from(radius);

        let x_min = cx.saturating_sub(r).max(0);
        let x_max = cx.saturating_add(r).min(i64::from(width) - 1);
        let y_min = cy.saturating_sub(r).max(0);
        let y_max = cy.saturating_add(r).min(i64::from(height) - 1);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    self.canvas.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    fn export(&mut self, tick: u64) -> Result<()> {
        std::fs::create_dir_all(&self.export_dir)?;
        let path = self.export_path(tick);
        self.canvas
            .save(&path)
            .map_err(|e| Error::Sink(Box::new(e)))?;
        self.exported += 1;
        log::debug!("Exported frame to {}", path.display());
        Ok(())
    }
}

impl DisplaySink for RasterSink {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.render(frame);
        if frame.export {
            self.export(frame.tick)?;
        }
        Ok(())
    }
}

fn unpack(color: u32) -> Rgb<u8> {
    Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
}
