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
//! Error types for the fallible edges of the simulation
//!
//! The force and integration math never fails. Errors come from loading
//! configuration, from timestep validation, and from display sinks.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration loading and the collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text was not valid TOML for the scenario schema
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of its allowed range
    #[error("invalid configuration value for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending key
        field: &'static str,
        /// Human-readable description of the violated constraint
        reason: String,
    },

    /// The timestep is legal but likely to misbehave numerically
    #[error("timestep warning: {0}")]
    Timestep(String),

    /// A display sink failed to render or export a frame
    #[error("display sink error: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
