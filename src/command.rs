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

//! Command types for the counter state machine.
//!
//! Inbound calls arrive as a command name plus string-keyed arguments
//! ([`ServiceCall`]). The dispatch boundary turns them into the closed,
//! fully validated [`Command`] set, so the state machine only ever sees
//! amounts known to be strictly positive.

use crate::base::UnitKind;
use crate::error::CounterError;
use crate::validate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The four command names a counter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Reset,
    Refuel,
    Calibrate,
    Rollback,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reset => "reset",
            Self::Refuel => "refuel",
            Self::Calibrate => "calibrate",
            Self::Rollback => "rollback",
        };
        f.write_str(name)
    }
}

impl FromStr for CommandKind {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "refuel" => Ok(Self::Refuel),
            "calibrate" => Ok(Self::Calibrate),
            "rollback" => Ok(Self::Rollback),
            other => Err(CounterError::UnknownCommand(other.to_string())),
        }
    }
}

/// A raw inbound command: a name plus loosely typed string arguments.
///
/// One call may carry arguments for both counters of an asset (e.g. a
/// refuel names both `cost` and `fuel`); each counter extracts only the
/// key its [`UnitKind`] consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub kind: CommandKind,
    args: BTreeMap<String, String>,
}

impl ServiceCall {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            args: BTreeMap::new(),
        }
    }

    /// Builder-style argument attachment.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }

    /// Whether the call carries a non-blank value for `key`.
    pub fn has_arg(&self, key: &str) -> bool {
        self.arg(key).is_some_and(|v| !v.trim().is_empty())
    }
}

/// A validated command addressed to one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Refuel { amount: Decimal },
    Calibrate { amount: Decimal },
    Rollback,
}

impl Command {
    /// Extracts and validates this counter's command from a raw call.
    ///
    /// `kind` selects which argument key the counter reads; arguments
    /// addressed to the sibling counter are ignored.
    ///
    /// # Errors
    ///
    /// - [`CounterError::MissingArgument`] when refuel/calibrate lack the
    ///   counter's amount.
    /// - [`CounterError::InvalidNumber`] when the amount is present but
    ///   not a strictly positive number.
    pub fn from_call(call: &ServiceCall, kind: UnitKind) -> Result<Self, CounterError> {
        let arg_key = kind.arg_key();
        match call.kind {
            CommandKind::Reset => Ok(Self::Reset),
            CommandKind::Rollback => Ok(Self::Rollback),
            CommandKind::Refuel => {
                let amount = validate::require_positive(arg_key, call.arg(arg_key))?;
                Ok(Self::Refuel { amount })
            }
            CommandKind::Calibrate => {
                let amount = validate::require_positive(arg_key, call.arg(arg_key))?;
                Ok(Self::Calibrate { amount })
            }
        }
    }
}
