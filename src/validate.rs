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

//! Decimal parsing and validation for inbound command arguments.
//!
//! Amounts arrive as strings inside loosely typed service calls. They are
//! validated here, before the state machine ever sees them: refuel and
//! calibrate deltas represent physical quantities or money and must be
//! strictly positive. Arithmetic is exact decimal throughout so repeated
//! small additions never accumulate rounding drift.

use crate::error::CounterError;
use rust_decimal::Decimal;

/// Parses a caller-supplied string into a strictly positive decimal.
///
/// # Errors
///
/// Returns [`CounterError::InvalidNumber`] if the value cannot be parsed
/// as a number or is zero or negative.
pub fn parse_positive(raw: &str) -> Result<Decimal, CounterError> {
    let value = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| CounterError::InvalidNumber(raw.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(CounterError::InvalidNumber(raw.to_string()));
    }
    Ok(value)
}

/// Like [`parse_positive`], but for an optional argument.
///
/// # Errors
///
/// Returns [`CounterError::MissingArgument`] when the argument is absent
/// or blank, and [`CounterError::InvalidNumber`] when present but invalid.
pub fn require_positive(key: &'static str, raw: Option<&str>) -> Result<Decimal, CounterError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_positive(raw),
        _ => Err(CounterError::MissingArgument(key)),
    }
}
