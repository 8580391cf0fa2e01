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
//! Integration tests for the frame loop controller
//!
//! Drives `Simulation` through its input and display collaborators:
//! pause, reset, export, quit and scripted command timing.

use galaxy::{
    Command, CommandQueue, DisplaySink, Flow, Frame, Kind, RasterSink, ScriptEntry, ScriptedInput,
    Simulation, SimulationConfig, Vec2,
};
use std::path::PathBuf;

fn small_config() -> SimulationConfig {
    SimulationConfig {
        planet_count: 50,
        seed: Some(42),
        ..SimulationConfig::default()
    }
}

fn unique_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("galaxy-{}-{}", name, std::process::id()))
}

/// Sink that remembers what it was shown
#[derive(Debug, Default)]
struct Recorder {
    ticks: Vec<u64>,
    exports: Vec<bool>,
    layers: Vec<Vec<(Kind, usize, u32, u32)>>,
}

impl DisplaySink for Recorder {
    fn present(&mut self, frame: &Frame<'_>) -> galaxy::Result<()> {
        self.ticks.push(frame.tick);
        self.exports.push(frame.export);
        self.layers.push(
            frame
                .layers
                .iter()
                .map(|l| (l.kind, l.positions.len(), l.radius, l.color))
                .collect(),
        );
        Ok(())
    }
}

#[test]
fn test_frames_step_and_present() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut sink = Recorder::default();

    let summary = sim.run(&mut CommandQueue::new(), &mut sink, Some(4)).unwrap();

    assert_eq!(summary.frames, 4);
    assert_eq!(summary.ticks, 4);
    assert!(!summary.quit);
    assert_eq!(sim.tick(), 4);
    assert_eq!(sim.frame_number(), 4);
    assert_eq!(sink.ticks, vec![1, 2, 3, 4]);
    assert!(sink.exports.iter().all(|e| !e));
}

#[test]
fn test_layers_in_draw_order_with_styles() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut sink = Recorder::default();

    sim.run(&mut CommandQueue::new(), &mut sink, Some(1)).unwrap();

    assert_eq!(
        sink.layers[0],
        vec![
            (Kind::Star, 2, 10, 0xffd500),
            (Kind::Planet, 50, 2, 0xffffff),
            (Kind::Comet, 10, 4, 0x0000ff),
        ]
    );
}

#[test]
fn test_pause_freezes_state_but_presents() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut sink = Recorder::default();
    let stars = sim.stars().positions().to_vec();
    let planets = sim.planets().positions().to_vec();

    let mut input = CommandQueue::new();
    input.push(Command::TogglePause);
    let summary = sim.run(&mut input, &mut sink, Some(3)).unwrap();

    assert!(sim.is_paused());
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.ticks, 0);
    assert_eq!(sink.ticks, vec![0, 0, 0]);
    assert_eq!(sim.stars().positions(), stars.as_slice());
    assert_eq!(sim.planets().positions(), planets.as_slice());

    input.push(Command::TogglePause);
    sim.run(&mut input, &mut sink, Some(1)).unwrap();
    assert!(!sim.is_paused());
    assert_eq!(sim.tick(), 1);
}

#[test]
fn test_pause_midway_through_script() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut input = ScriptedInput::new([ScriptEntry {
        frame: 2,
        command: Command::TogglePause,
    }]);

    let summary = sim.run(&mut input, &mut galaxy::NullSink, Some(5)).unwrap();

    assert_eq!(summary.frames, 5);
    assert_eq!(summary.ticks, 2);
    assert_eq!(sim.tick(), 2);
}

#[test]
fn test_reset_restores_tick_and_ring() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let initial_stars = sim.stars().positions().to_vec();

    for _ in 0..5 {
        sim.step();
    }
    assert_eq!(sim.tick(), 5);
    assert_ne!(sim.stars().positions(), initial_stars.as_slice());

    assert_eq!(sim.apply(Command::ResetAll), Flow::Continue);

    assert_eq!(sim.tick(), 0);
    assert_eq!(sim.stars().positions(), initial_stars.as_slice());
    assert!(sim.stars().forces().iter().all(|f| *f == Vec2::zero()));
    assert_eq!(sim.planets().len(), 50);
}

#[test]
fn test_reset_keeps_star_count_and_mass() {
    let mut sim = Simulation::new(small_config()).unwrap();

    sim.apply(Command::AddStarAt(Vec2::new(0.2, 0.8)));
    sim.apply(Command::IncreaseStarMass);
    sim.apply(Command::ResetAll);

    assert_eq!(sim.stars().len(), 3);
    assert_eq!(sim.stars().mass(), 1100.0);

    // Three stars are re-laid on the ring
    let center = Vec2::new(0.5, 0.5);
    for pos in sim.stars().positions() {
        assert!(((*pos - center).length() - 0.2).abs() < 1e-12);
    }
}

#[test]
fn test_add_star_until_capacity() {
    let mut sim = Simulation::new(small_config()).unwrap();

    for i in 0..20 {
        sim.apply(Command::AddStarAt(Vec2::new(0.05 * i as f64, 0.5)));
    }

    assert_eq!(sim.stars().len(), 10);
    assert!(sim.stars().is_full());
    assert_eq!(sim.stars().positions()[2], Vec2::new(0.0, 0.5));
    assert_eq!(sim.stars().velocities()[9], Vec2::zero());
}

#[test]
fn test_star_mass_commands_respect_floor() {
    let mut sim = Simulation::new(small_config()).unwrap();

    sim.apply(Command::IncreaseStarMass);
    assert_eq!(sim.stars().mass(), 1100.0);

    for _ in 0..20 {
        sim.apply(Command::DecreaseStarMass);
    }
    assert_eq!(sim.stars().mass(), 100.0);
    assert_eq!(sim.planets().mass(), 1.0);
    assert_eq!(sim.comets().mass(), 100.0);
}

#[test]
fn test_quit_stops_before_presenting() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut sink = Recorder::default();
    let mut input = ScriptedInput::new([ScriptEntry {
        frame: 2,
        command: Command::Quit,
    }]);

    let summary = sim.run(&mut input, &mut sink, None).unwrap();

    assert!(summary.quit);
    assert_eq!(summary.frames, 2);
    assert_eq!(sink.ticks.len(), 2);
    assert_eq!(sim.tick(), 2);
}

#[test]
fn test_commands_after_quit_are_not_applied() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut input = CommandQueue::new();
    input.extend([Command::Quit, Command::IncreaseStarMass]);

    let flow = sim.run_frame(&mut input, &mut galaxy::NullSink).unwrap();

    assert_eq!(flow, Flow::Quit);
    assert_eq!(sim.stars().mass(), 1000.0);
    assert_eq!(sim.tick(), 0);
}

#[test]
fn test_scripted_star_arrives_on_its_frame() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut input = ScriptedInput::new([
        ScriptEntry {
            frame: 1,
            command: Command::AddStarAt(Vec2::new(0.25, 0.75)),
        },
        ScriptEntry {
            frame: 3,
            command: Command::AddStarAt(Vec2::new(0.75, 0.25)),
        },
    ]);
    let mut sink = Recorder::default();

    sim.run(&mut input, &mut sink, Some(4)).unwrap();

    let star_counts: Vec<usize> = sink.layers.iter().map(|layers| layers[0].1).collect();
    assert_eq!(star_counts, vec![2, 3, 3, 4]);
    assert_eq!(input.remaining(), 0);
}

#[test]
fn test_export_writes_png_frames() {
    let dir = unique_dir("export");
    let _ = std::fs::remove_dir_all(&dir);

    let mut config = small_config();
    config.display.width = 64;
    config.display.height = 64;
    config.display.export_dir = dir.clone();

    let mut sink = RasterSink::from_config(&config.display);
    let mut sim = Simulation::new(config).unwrap();
    let mut input = ScriptedInput::new([
        ScriptEntry {
            frame: 1,
            command: Command::ToggleExport,
        },
        ScriptEntry {
            frame: 3,
            command: Command::ToggleExport,
        },
    ]);

    sim.run(&mut input, &mut sink, Some(4)).unwrap();

    assert!(!sim.is_exporting());
    assert_eq!(sink.exported(), 2);
    assert!(!dir.join("output_00001.png").exists());
    assert!(dir.join("output_00002.png").exists());
    assert!(dir.join("output_00003.png").exists());
    assert!(!dir.join("output_00004.png").exists());

    let dimensions = image::image_dimensions(dir.join("output_00002.png")).unwrap();
    assert_eq!(dimensions, (64, 64));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_config_file_drives_simulation() {
    let path = unique_dir("config").with_extension("toml");
    std::fs::write(
        &path,
        r#"
star_count = 3
planet_count = 12
comet_count = 0
seed = 5

[[script]]
frame = 0
command = "increase_star_mass"
"#,
    )
    .unwrap();

    let config = SimulationConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut input = ScriptedInput::new(config.script.clone());
    let mut sim = Simulation::new(config).unwrap();
    sim.run(&mut input, &mut galaxy::NullSink, Some(2)).unwrap();

    assert_eq!(sim.stars().len(), 3);
    assert_eq!(sim.planets().len(), 12);
    assert!(sim.comets().is_empty());
    assert_eq!(sim.stars().mass(), 1100.0);
}

#[test]
fn test_same_seed_same_galaxy() {
    let a = Simulation::new(small_config()).unwrap();
    let b = Simulation::new(small_config()).unwrap();
    assert_eq!(a.planets().positions(), b.planets().positions());

    let other = Simulation::new(SimulationConfig {
        seed: Some(43),
        ..small_config()
    })
    .unwrap();
    assert_ne!(a.planets().positions(), other.planets().positions());
}

#[test]
fn test_forces_use_positions_from_start_of_tick() {
    let mut sim = Simulation::new(small_config()).unwrap();
    sim.step();

    let mut stars = sim.stars().clone();
    let mut planets = sim.planets().clone();
    let mut comets = sim.comets().clone();
    let gravity = *sim.gravity();
    gravity.compute_forces(&mut stars, &[]);
    gravity.compute_forces(&mut planets, &[&stars, &comets]);
    gravity.compute_forces(&mut comets, &[]);

    sim.step();

    assert_eq!(sim.stars().forces(), stars.forces());
    assert_eq!(sim.planets().forces(), planets.forces());
    assert_eq!(sim.comets().forces(), comets.forces());
    // Every population moved, so forces from end-of-tick positions would differ
    assert_ne!(sim.stars().positions(), stars.positions());
    assert_ne!(sim.comets().positions(), comets.positions());
}

fn all_finite(sim: &Simulation) -> bool {
    [sim.stars(), sim.planets(), sim.comets()]
        .into_iter()
        .all(|p| p.positions().iter().chain(p.velocities()).all(|v| v.is_valid()))
}

#[test]
fn test_mass_commands_stop_at_positive_floor() {
    let config = SimulationConfig {
        star_mass: 100.0,
        mass_floor: 50.0,
        ..small_config()
    };
    let mut sim = Simulation::new(config).unwrap();
    let mut input = CommandQueue::new();
    input.extend([Command::DecreaseStarMass, Command::DecreaseStarMass]);

    sim.run(&mut input, &mut galaxy::NullSink, Some(2)).unwrap();

    assert_eq!(sim.stars().mass(), 50.0);
    assert!(all_finite(&sim));
}

#[test]
fn test_star_added_on_top_of_star_stays_finite() {
    let mut sim = Simulation::new(small_config()).unwrap();
    let mut input = CommandQueue::new();
    input.push(Command::AddStarAt(sim.stars().positions()[0]));

    sim.run(&mut input, &mut galaxy::NullSink, Some(2)).unwrap();

    assert_eq!(sim.stars().len(), 3);
    assert!(all_finite(&sim));
}
