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

//! Per-counter display and dispatch metadata.
//!
//! The cost counter and the quantity counters share one state machine and
//! differ only in this profile: unit of measurement, display class, and
//! which argument key they consume from inbound calls.

use crate::base::UnitKind;
use serde::Serialize;

/// Display class of a counter, for whatever UI or telemetry layer wraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Monetary,
    Volume,
    Energy,
    Weight,
}

/// Whether a reading may legitimately decrease between observations.
///
/// Cost is `Total` (reset and rollback can lower it); the quantity
/// counters advertise `TotalIncreasing` like a physical meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Total,
    TotalIncreasing,
}

/// Fixed per-counter metadata, chosen at creation and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProfile {
    pub kind: UnitKind,
    pub unit: &'static str,
    pub device_class: DeviceClass,
    pub state_class: StateClass,
    pub icon: Option<&'static str>,
}

impl UnitProfile {
    /// Returns the canonical profile for a unit kind.
    pub fn for_kind(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Cost => Self {
                kind,
                unit: "EUR",
                device_class: DeviceClass::Monetary,
                state_class: StateClass::Total,
                icon: None,
            },
            UnitKind::Fuel => Self {
                kind,
                unit: "L",
                device_class: DeviceClass::Volume,
                state_class: StateClass::TotalIncreasing,
                icon: Some("mdi:gas-station"),
            },
            UnitKind::Charge => Self {
                kind,
                unit: "kWh",
                device_class: DeviceClass::Energy,
                state_class: StateClass::TotalIncreasing,
                icon: Some("mdi:ev-station"),
            },
            UnitKind::Weight => Self {
                kind,
                unit: "kg",
                device_class: DeviceClass::Weight,
                state_class: StateClass::TotalIncreasing,
                icon: Some("mdi:weight-kilogram"),
            },
        }
    }

    /// The argument key this counter reads from a service call.
    pub fn arg_key(&self) -> &'static str {
        self.kind.arg_key()
    }
}
