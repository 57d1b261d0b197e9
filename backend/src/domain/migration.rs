//! Schema migration for persisted day records.
//!
//! Persisted records carry a `schemaVersion` tag. At load time every record
//! is upgraded through an explicit ordered step table until it reaches
//! [`CURRENT_SCHEMA_VERSION`]; adding a future version means appending one
//! step. Migration is all-or-nothing: any record that cannot be brought to
//! the current shape discards the whole state and the caller starts fresh.
//! It never raises to the caller and it is idempotent for already-current
//! records.

use serde_json::{Map, Value};
use shared::{AppState, DayRecord, CURRENT_SCHEMA_VERSION};
use tracing::{debug, warn};

/// Fields every record carries besides category values
const RESERVED_FIELDS: [&str; 4] = ["date", "dayType", "schemaVersion", "hasBeenEdited"];

struct MigrationStep {
    from_version: u32,
    apply: fn(&mut Map<String, Value>),
}

/// Ordered upgrade steps; each takes a record from `from_version` to
/// `from_version + 1`
const STEPS: &[MigrationStep] = &[
    MigrationStep { from_version: 1, apply: migrate_v1_to_v2 },
    MigrationStep { from_version: 2, apply: migrate_v2_to_v3 },
];

/// v1 recorded whole units per tap; v2 reinterprets taps as half-units, so
/// every value is halved. Runs the halving only when all values are plain
/// integers, which distinguishes genuine v1 data from records that already
/// hold half-unit values but lost their version tag.
fn migrate_v1_to_v2(record: &mut Map<String, Value>) {
    let all_integers = category_values(record).all(|v| v.fract() == 0.0);
    if all_integers {
        let keys: Vec<String> = record
            .keys()
            .filter(|k| !RESERVED_FIELDS.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in keys {
            if let Some(value) = record.get(&key).and_then(Value::as_f64) {
                if let Some(halved) = serde_json::Number::from_f64(value / 2.0) {
                    record.insert(key, Value::Number(halved));
                }
            }
        }
    }
    if !record.contains_key("dayType") {
        record.insert("dayType".to_string(), Value::String("normal".to_string()));
    }
}

/// v3 introduced the edited flag; pre-existing records are assumed
/// user-entered since the flag did not exist when they were written
fn migrate_v2_to_v3(record: &mut Map<String, Value>) {
    record
        .entry("hasBeenEdited".to_string())
        .or_insert(Value::Bool(true));
}

fn category_values<'a>(
    record: &'a Map<String, Value>,
) -> impl Iterator<Item = f64> + 'a {
    record
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .filter_map(|(_, value)| value.as_f64())
}

fn record_version(record: &Map<String, Value>) -> u32 {
    record
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        // The version tag was introduced after the first schema change, so
        // an untagged record is at the oldest version
        .unwrap_or(1)
}

/// Upgrade a raw record to the current schema version.
///
/// Returns `None` when the record is not an object, claims a version newer
/// than this build knows, or fails typed deserialization afterwards.
pub fn migrate_record(raw: Value) -> Option<DayRecord> {
    let Value::Object(mut record) = raw else {
        warn!("persisted day record is not an object, discarding");
        return None;
    };

    loop {
        let version = record_version(&record);
        if version == CURRENT_SCHEMA_VERSION {
            break;
        }
        if version > CURRENT_SCHEMA_VERSION {
            warn!(
                "day record claims schema version {} but current is {}, discarding",
                version, CURRENT_SCHEMA_VERSION
            );
            return None;
        }
        let Some(step) = STEPS.iter().find(|s| s.from_version == version) else {
            warn!("no migration step from schema version {}, discarding", version);
            return None;
        };
        debug!("migrating day record v{} -> v{}", version, version + 1);
        (step.apply)(&mut record);
        record.insert(
            "schemaVersion".to_string(),
            Value::Number((version + 1).into()),
        );
    }

    match serde_json::from_value::<DayRecord>(Value::Object(record)) {
        Ok(day) => Some(day),
        Err(err) => {
            warn!("migrated day record failed to deserialize: {}", err);
            None
        }
    }
}

/// Upgrade a whole persisted state document.
///
/// `currentDay` and every history entry migrate independently; if any of
/// them cannot reach the current schema the whole state is discarded and
/// the caller falls back to a freshly-initialized default.
pub fn migrate_state(raw: Value) -> Option<AppState> {
    let Value::Object(mut root) = raw else {
        warn!("persisted state is not an object, discarding");
        return None;
    };

    let current_raw = root.remove("currentDay")?;
    let Some(Value::Array(history_raw)) = root.remove("history") else {
        warn!("persisted state has no history array, discarding");
        return None;
    };

    let current_day = migrate_record(current_raw)?;
    let history = history_raw
        .into_iter()
        .map(migrate_record)
        .collect::<Option<Vec<DayRecord>>>()?;

    Some(AppState { current_day, history })
}
