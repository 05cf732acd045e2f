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

//! Core identifier types for assets and counters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a tracked asset (a vehicle).
///
/// Wraps a `u32`. Each asset owns exactly one cost counter and one
/// quantity counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of quantity a counter accumulates.
///
/// `Cost` is the monetary counter every asset carries; the sibling
/// quantity counter is one of `Fuel`, `Charge`, or `Weight`, selected
/// when the asset is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Cost,
    Fuel,
    Charge,
    Weight,
}

impl UnitKind {
    /// The argument key this counter reads from an inbound service call.
    ///
    /// A counter ignores the argument addressed to its sibling: the cost
    /// counter only ever looks at `cost`, the fuel counter at `fuel`, etc.
    pub fn arg_key(&self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Fuel => "fuel",
            Self::Charge => "charge",
            Self::Weight => "weight",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arg_key())
    }
}

impl FromStr for UnitKind {
    type Err = crate::CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cost" => Ok(Self::Cost),
            "fuel" => Ok(Self::Fuel),
            "charge" => Ok(Self::Charge),
            "weight" => Ok(Self::Weight),
            other => Err(crate::CounterError::UnknownUnitKind(other.to_string())),
        }
    }
}

/// Stable identity of one counter: the owning asset plus the unit kind.
///
/// Used by the persistence layer to restore `current_value` across
/// restarts. Displays as `"{asset}_{kind}"`, e.g. `"7_fuel"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct CounterKey {
    pub asset: AssetId,
    pub kind: UnitKind,
}

impl CounterKey {
    pub fn new(asset: AssetId, kind: UnitKind) -> Self {
        Self { asset, kind }
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.asset, self.kind)
    }
}
