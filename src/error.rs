// Copyright 2024 Saptak Santra
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

//! Error types

use std::fmt;

/// ECS error type
#[derive(Debug, Clone)]
pub enum EcsError {
    /// Operation referenced an entity that is not currently alive.
    UnknownEntity,

    /// A system with this name is already registered.
    DuplicateSystem(String),

    /// A system declared a dependency that is not registered.
    MissingDependency { system: String, dependency: String },

    /// A cycle exists among system dependencies. The message contains the
    /// cycle path (e.g. `A -> B -> A`) plus each involved system's
    /// priority and declared dependencies.
    CircularDependency(String),

    /// A system's `initialize`, `update`, or `shutdown` returned an error.
    /// Caught at the scheduler boundary and logged; never surfaced to
    /// callers of `tick`.
    SystemExecutionFailure { system: String, message: String },

    /// An event listener returned an error from inside `drain`. Caught at
    /// the bus boundary and logged; never surfaced to callers of `drain`.
    ListenerFailure(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::UnknownEntity => write!(f, "unknown entity"),
            EcsError::DuplicateSystem(name) => write!(f, "duplicate system: {name}"),
            EcsError::MissingDependency { system, dependency } => {
                write!(f, "system '{system}' declares missing dependency '{dependency}'")
            }
            EcsError::CircularDependency(msg) => write!(f, "circular system dependency: {msg}"),
            EcsError::SystemExecutionFailure { system, message } => {
                write!(f, "system '{system}' failed: {message}")
            }
            EcsError::ListenerFailure(msg) => write!(f, "event listener failed: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
