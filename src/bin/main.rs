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

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use fuel_tracker_rs::{
    AssetId, CommandKind, CounterKey, MemoryStore, Registry, ServiceCall, UnitKind, ValueStore,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Fuel Tracker - Process counter command CSV files
///
/// Reads commands from a CSV file and outputs counter states to stdout.
/// Supports reset, refuel, calibrate, and rollback. An optional state
/// file persists current values across runs (history is not persisted).
#[derive(Parser, Debug)]
#[command(name = "fuel-tracker-rs")]
#[command(about = "A counter engine that processes fuel tracking command CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with commands
    ///
    /// Expected format: command,asset,cost,quantity
    /// Example: cargo run -- commands.csv > counters.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Path to CSV state file (asset,kind,value), loaded before
    /// processing and rewritten afterwards
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Unit kind of the quantity counter created per asset
    /// (fuel, charge, or weight)
    #[arg(long, default_value = "fuel")]
    quantity: UnitKind,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.quantity == UnitKind::Cost {
        eprintln!("Error: --quantity must be fuel, charge, or weight");
        process::exit(1);
    }

    // Seed the store from the state file, if one exists yet.
    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &args.state
        && path.exists()
    {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error opening state file '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        if let Err(e) = load_state(BufReader::new(file), &store) {
            eprintln!("Error loading state: {}", e);
            process::exit(1);
        }
    }

    let registry = Registry::new(Arc::clone(&store) as Arc<dyn ValueStore>);

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // Process commands from CSV
    if let Err(e) = process_commands(BufReader::new(file), &registry, args.quantity) {
        eprintln!("Error processing commands: {}", e);
        process::exit(1);
    }

    // Rewrite the state file with the final values
    if let Some(path) = &args.state {
        let result = File::create(path)
            .map_err(csv::Error::from)
            .and_then(|f| write_state(&registry, f));
        if let Err(e) = result {
            eprintln!("Error writing state file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }

    // Write results to stdout
    if let Err(e) = write_snapshots(&registry, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `command, asset, cost, quantity`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    command: String,
    asset: u32,
    #[serde(default)]
    cost: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
}

impl CsvRecord {
    /// Converts a CSV record into a service call for the asset's pair.
    ///
    /// The `quantity` column is mapped to the argument key of the
    /// configured quantity kind. Amounts stay as strings; validation
    /// happens at the dispatch boundary.
    fn into_call(self, quantity_kind: UnitKind) -> Option<ServiceCall> {
        let kind = CommandKind::from_str(&self.command).ok()?;
        let mut call = ServiceCall::new(kind);
        if let Some(cost) = self.cost.filter(|v| !v.trim().is_empty()) {
            call = call.with_arg(UnitKind::Cost.arg_key(), cost);
        }
        if let Some(quantity) = self.quantity.filter(|v| !v.trim().is_empty()) {
            call = call.with_arg(quantity_kind.arg_key(), quantity);
        }
        Some(call)
    }
}

/// Raw CSV record of the state file.
///
/// Fields: `asset, kind, value`
#[derive(Debug, Deserialize)]
struct StateRecord {
    asset: u32,
    kind: UnitKind,
    value: Decimal,
}

/// Processes counter commands from a CSV reader.
///
/// Assets are registered on first sight, restoring any persisted values
/// from the registry's store. Malformed rows and failed commands are
/// skipped with a warning; processing never stops on a bad row.
///
/// # CSV Format
///
/// Expected columns: `command, asset, cost, quantity`
/// - `command`: reset, refuel, calibrate, or rollback
/// - `asset`: Asset ID (u32)
/// - `cost`: Monetary amount (refuel/calibrate only)
/// - `quantity`: Quantity amount (refuel/calibrate only)
///
/// # Example
///
/// ```csv
/// command,asset,cost,quantity
/// refuel,1,54.30,32.1
/// calibrate,1,,500
/// rollback,1,,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_commands<R: Read>(
    reader: R,
    registry: &Registry,
    quantity_kind: UnitKind,
) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let asset = AssetId(record.asset);
                let Some(call) = record.into_call(quantity_kind) else {
                    warn!("skipping record with unknown command");
                    continue;
                };

                if !registry.has_asset(asset) {
                    registry.add_asset(asset, quantity_kind);
                }

                // Failed commands are recoverable; keep going.
                if let Err(e) = registry.dispatch_asset(asset, &call) {
                    warn!(%asset, command = %call.kind, "skipping command: {}", e);
                }
            }
            Err(e) => {
                warn!("skipping malformed row: {}", e);
                continue;
            }
        }
    }

    Ok(())
}

/// Loads persisted counter values from a CSV state file into the store.
pub fn load_state<R: Read>(reader: R, store: &MemoryStore) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<StateRecord>() {
        let record = result?;
        let key = CounterKey::new(AssetId(record.asset), record.kind);
        store.persist(&key, record.value);
    }

    Ok(())
}

/// Writes every counter's current value as CSV state rows.
///
/// Values keep full precision; only the most recent value is written per
/// counter, never the history.
pub fn write_state<W: Write>(registry: &Registry, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["asset", "kind", "value"])?;

    for snapshot in registry.snapshots() {
        wtr.write_record([
            snapshot.key.asset.to_string(),
            snapshot.key.kind.to_string(),
            snapshot.value.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes counter snapshots to a CSV writer.
///
/// Outputs all counters sorted by key, with values rounded to 3 decimal
/// places.
///
/// # CSV Format
///
/// Columns: `asset, kind, unit, value, history_size, can_rollback`
///
/// # Example
///
/// ```csv
/// asset,kind,unit,value,history_size,can_rollback
/// 1,cost,EUR,54.30,1,true
/// 1,fuel,L,32.1,1,true
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_snapshots<W: Write>(registry: &Registry, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for snapshot in registry.snapshots() {
        wtr.serialize(&snapshot)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn key(asset: u32, kind: UnitKind) -> CounterKey {
        CounterKey::new(AssetId(asset), kind)
    }

    #[test]
    fn parse_simple_refuel() {
        let csv = "command,asset,cost,quantity\nrefuel,1,54.30,32.1\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(54.30));
        assert_eq!((*registry.get(&key(1, UnitKind::Fuel)).unwrap()).value(), dec!(32.1));
    }

    #[test]
    fn parse_refuel_then_rollback() {
        let csv = "command,asset,cost,quantity\n\
                   refuel,1,10,5\n\
                   refuel,1,20,8\n\
                   rollback,1,,\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(10));
        assert_eq!((*registry.get(&key(1, UnitKind::Fuel)).unwrap()).value(), dec!(5));
    }

    #[test]
    fn parse_calibrate_single_column() {
        // Calibrate with only the quantity column set touches only the
        // quantity counter.
        let csv = "command,asset,cost,quantity\n\
                   refuel,1,50,30\n\
                   calibrate,1,,500\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(50));
        assert_eq!((*registry.get(&key(1, UnitKind::Fuel)).unwrap()).value(), dec!(500));
    }

    #[test]
    fn parse_with_whitespace() {
        let csv = "command,asset,cost,quantity\n refuel , 1 , 10.0 , 5.0 \n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(10.0));
    }

    #[test]
    fn skip_malformed_rows() {
        let csv = "command,asset,cost,quantity\n\
                   refuel,1,10,5\n\
                   drain,1,10,5\n\
                   refuel,not-a-number,10,5\n\
                   refuel,2,20,8\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(10));
        assert_eq!((*registry.get(&key(2, UnitKind::Cost)).unwrap()).value(), dec!(20));
    }

    #[test]
    fn failed_commands_do_not_stop_processing() {
        let csv = "command,asset,cost,quantity\n\
                   rollback,1,,\n\
                   refuel,1,-5,abc\n\
                   refuel,1,15,7\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(15));
        assert_eq!((*registry.get(&key(1, UnitKind::Fuel)).unwrap()).value(), dec!(7));
    }

    #[test]
    fn quantity_column_maps_to_configured_kind() {
        let csv = "command,asset,cost,quantity\nrefuel,1,12,44\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Charge).unwrap();

        assert_eq!((*registry.get(&key(1, UnitKind::Charge)).unwrap()).value(), dec!(44));
        assert!(registry.get(&key(1, UnitKind::Fuel)).is_none());
    }

    #[test]
    fn state_round_trips_through_csv() {
        let commands = "command,asset,cost,quantity\nrefuel,1,54.30,32.1\n";
        let registry = Registry::in_memory();
        process_commands(Cursor::new(commands), &registry, UnitKind::Fuel).unwrap();

        let mut state = Vec::new();
        write_state(&registry, &mut state).unwrap();

        // A later run restores the persisted values; history starts empty.
        let store = MemoryStore::new();
        load_state(Cursor::new(state), &store).unwrap();
        assert_eq!(store.restore(&key(1, UnitKind::Cost)), Some(dec!(54.30)));
        assert_eq!(store.restore(&key(1, UnitKind::Fuel)), Some(dec!(32.1)));

        let restored = Registry::new(Arc::new(store));
        restored.add_asset(AssetId(1), UnitKind::Fuel);
        let counter = restored.get(&key(1, UnitKind::Fuel)).unwrap();
        assert_eq!((*counter).value(), dec!(32.1));
        assert!(!counter.can_rollback());
    }

    #[test]
    fn write_snapshots_to_csv() {
        let csv = "command,asset,cost,quantity\nrefuel,1,54.30,32.1\n";
        let registry = Registry::in_memory();
        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        let mut output = Vec::new();
        write_snapshots(&registry, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("asset,kind,unit,value,history_size,can_rollback"));
        assert!(output_str.contains("1,cost,EUR,54.30,1,true"));
        assert!(output_str.contains("1,fuel,L,32.1,1,true"));
    }

    #[test]
    fn multiple_assets() {
        let csv = "command,asset,cost,quantity\n\
                   refuel,3,10,1\n\
                   refuel,1,20,2\n\
                   refuel,2,30,3\n";
        let registry = Registry::in_memory();

        process_commands(Cursor::new(csv), &registry, UnitKind::Fuel).unwrap();

        assert_eq!(registry.snapshots().len(), 6);
        assert_eq!((*registry.get(&key(1, UnitKind::Cost)).unwrap()).value(), dec!(20));
        assert_eq!((*registry.get(&key(2, UnitKind::Cost)).unwrap()).value(), dec!(30));
        assert_eq!((*registry.get(&key(3, UnitKind::Cost)).unwrap()).value(), dec!(10));
    }
}
