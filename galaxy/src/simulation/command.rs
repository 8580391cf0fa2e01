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
//! Discrete commands and the sources that produce them

use crate::config::ScriptEntry;
use crate::vector::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A discrete control event applied between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Stop the loop
    Quit,
    /// Freeze or resume the physics
    TogglePause,
    /// Re-run the initial placement of every population
    ResetAll,
    /// Start or stop writing frames to disk
    ToggleExport,
    /// Add a star at a normalized position
    AddStarAt(Vec2),
    /// Raise the star mass by one step
    IncreaseStarMass,
    /// Lower the star mass by one step, down to the floor
    DecreaseStarMass,
}

/// Producer of commands for each frame
///
/// The controller calls [`InputSource::next_command`] repeatedly at the
/// start of every frame until it returns `None`. Sources must yield a finite
/// number of commands per frame.
pub trait InputSource {
    /// Next pending command for `frame`, or `None` when the frame's commands are exhausted
    fn next_command(&mut self, frame: u64) -> Option<Command>;
}

/// FIFO of commands delivered on the next frame, whatever its number
///
/// # Example
///
/// ```
/// use galaxy::{Command, CommandQueue, InputSource};
///
/// let mut queue = CommandQueue::new();
/// queue.push(Command::TogglePause);
/// assert_eq!(queue.next_command(0), Some(Command::TogglePause));
/// assert_eq!(queue.next_command(0), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command
    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl InputSource for CommandQueue {
    fn next_command(&mut self, _frame: u64) -> Option<Command> {
        self.pending.pop_front()
    }
}

impl Extend<Command> for CommandQueue {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, iter: I) {
        self.pending.extend(iter);
    }
}

/// Replays configured commands on the frames they are scheduled for
///
/// Entries scheduled for a frame that has already passed are delivered on
/// the next polled frame, in frame order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    entries: VecDeque<ScriptEntry>,
}

impl ScriptedInput {
    /// Build a script; entries are sorted by frame, keeping the order of ties
    pub fn new(entries: impl IntoIterator<Item = ScriptEntry>) -> Self {
        let mut entries: Vec<ScriptEntry> = entries.into_iter().collect();
        entries.sort_by_key(|e| e.frame);
        ScriptedInput {
            entries: entries.into(),
        }
    }

    /// Number of entries not yet delivered
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_command(&mut self, frame: u64) -> Option<Command> {
        if self.entries.front()?.frame > frame {
            return None;
        }
        self.entries.pop_front().map(|e| e.command)
    }
}
