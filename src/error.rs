// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for counter commands.
//!
//! All variants are recoverable: a failed command is reported to the
//! dispatcher and leaves the counter's value and history untouched.

use crate::base::{AssetId, CounterKey};
use thiserror::Error;

/// Counter command errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// Argument could not be parsed as a number, or was zero or negative
    #[error("value '{0}' is not a positive number")]
    InvalidNumber(String),

    /// Required amount argument is absent for refuel or calibrate
    #[error("missing '{0}' argument")]
    MissingArgument(&'static str),

    /// Rollback requested with nothing to restore
    #[error("no history available for rollback")]
    EmptyHistory,

    /// Command addressed a counter that is not registered
    #[error("no counter registered for '{0}'")]
    CounterNotFound(CounterKey),

    /// Command addressed an asset with no registered counters
    #[error("no counters registered for asset '{0}'")]
    AssetNotFound(AssetId),

    /// Command name is not one of reset/refuel/calibrate/rollback
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Quantity tag is not one of cost/fuel/charge/weight
    #[error("unknown unit kind '{0}'")]
    UnknownUnitKind(String),
}
