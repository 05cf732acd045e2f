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

//! Property-based tests for the tracked counter.
//!
//! These tests verify invariants that should hold for any sequence of
//! commands.

use fuel_tracker_rs::{AssetId, Command, MAX_HISTORY, TrackedCounter, UnitKind};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.0001 to 1000 with 4 decimal places).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|ticks| Decimal::new(ticks, 4))
}

/// Generate an arbitrary counter command.
fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Reset),
        Just(Command::Rollback),
        arb_amount().prop_map(|amount| Command::Refuel { amount }),
        arb_amount().prop_map(|amount| Command::Calibrate { amount }),
    ]
}

fn counter() -> TrackedCounter {
    TrackedCounter::new(AssetId(1), UnitKind::Fuel)
}

// =============================================================================
// Counter Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// History never exceeds its capacity, whatever the command sequence.
    #[test]
    fn history_stays_bounded(
        commands in prop::collection::vec(arb_command(), 1..50),
    ) {
        let counter = counter();
        for command in commands {
            let _ = counter.apply(command);
            prop_assert!(counter.history_size() <= MAX_HISTORY);
        }
    }

    /// The value never goes negative: refuel and calibrate amounts are
    /// positive, reset yields zero, and rollback restores a prior value.
    #[test]
    fn value_never_negative(
        commands in prop::collection::vec(arb_command(), 1..50),
    ) {
        let counter = counter();
        for command in commands {
            let _ = counter.apply(command);
            prop_assert!(counter.value() >= Decimal::ZERO);
        }
    }

    /// `can_rollback` always agrees with the history size.
    #[test]
    fn can_rollback_tracks_history(
        commands in prop::collection::vec(arb_command(), 1..50),
    ) {
        let counter = counter();
        for command in commands {
            let _ = counter.apply(command);
            prop_assert_eq!(counter.can_rollback(), counter.history_size() > 0);
        }
    }
}

// =============================================================================
// Rollback Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Any single mutating command followed by rollback restores the
    /// pre-command value and history size.
    #[test]
    fn rollback_inverts_any_mutation(
        setup in prop::collection::vec(arb_amount(), 0..5),
        command in prop_oneof![
            Just(Command::Reset),
            arb_amount().prop_map(|amount| Command::Refuel { amount }),
            arb_amount().prop_map(|amount| Command::Calibrate { amount }),
        ],
    ) {
        let counter = counter();
        for amount in setup {
            counter.apply(Command::Refuel { amount }).unwrap();
        }
        let value_before = counter.value();
        let history_before = counter.history_size();

        counter.apply(command).unwrap();
        counter.apply(Command::Rollback).unwrap();

        prop_assert_eq!(counter.value(), value_before);
        prop_assert_eq!(counter.history_size(), history_before);
    }

    /// A failed rollback leaves the counter untouched.
    #[test]
    fn failed_rollback_mutates_nothing(
        amount in arb_amount(),
    ) {
        let counter = TrackedCounter::restore(AssetId(1), UnitKind::Fuel, amount);
        let result = counter.apply(Command::Rollback);

        prop_assert!(result.is_err());
        prop_assert_eq!(counter.value(), amount);
        prop_assert_eq!(counter.history_size(), 0);
    }
}

// =============================================================================
// Accumulation Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Sum of refuels equals the final value (exact decimal arithmetic).
    #[test]
    fn refuels_sum_exactly(
        amounts in prop::collection::vec(arb_amount(), 1..20),
    ) {
        let counter = counter();
        let mut expected = Decimal::ZERO;
        for amount in &amounts {
            counter.apply(Command::Refuel { amount: *amount }).unwrap();
            expected += *amount;
        }
        prop_assert_eq!(counter.value(), expected);
    }

    /// Calibrate always lands exactly on its amount, whatever came before.
    #[test]
    fn calibrate_lands_exactly(
        setup in prop::collection::vec(arb_command(), 0..10),
        target in arb_amount(),
    ) {
        let counter = counter();
        for command in setup {
            let _ = counter.apply(command);
        }
        counter.apply(Command::Calibrate { amount: target }).unwrap();
        prop_assert_eq!(counter.value(), target);
    }
}
