//! Unit accounting: precision-aware increments and limit classification.
//!
//! All mutations round to the active precision step (half-units for plain
//! taps, quarter-units for fine adjustments) and silently reject anything
//! that would take a count negative. Limit classification and the
//! discretized unit display are computed here so the presentation layer
//! stays a thin wrapper.

use shared::{round_to_step, CategoryDefinition, DayRecord, DayType, TrackerConfig, BALANCE_EPSILON};
use tracing::debug;

/// Interaction mode selecting the unit step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Plain tap, standard increment (0.5 by default)
    Standard,
    /// Long-press fine adjustment (0.25 by default)
    Fine,
}

impl InputMode {
    pub fn step(&self, config: &TrackerConfig) -> f64 {
        match self {
            InputMode::Standard => config.standard_increment,
            InputMode::Fine => config.fine_increment,
        }
    }
}

/// Add one step to a category count. Returns whether the record changed.
pub fn increment(
    record: &mut DayRecord,
    category_id: &str,
    mode: InputMode,
    config: &TrackerConfig,
) -> bool {
    let step = mode.step(config);
    let next = record.unit_count(category_id) + step;
    record.set_unit_count(category_id, next, step)
}

/// Remove one step from a category count.
///
/// A decrement that would go below zero is a silent no-op.
pub fn decrement(
    record: &mut DayRecord,
    category_id: &str,
    mode: InputMode,
    config: &TrackerConfig,
) -> bool {
    let step = mode.step(config);
    let current = record.unit_count(category_id);
    if current < step {
        debug!(
            "decrement of {} rejected: {} below step {}",
            category_id, current, step
        );
        return false;
    }
    record.set_unit_count(category_id, current - step, step)
}

/// Where a count stands relative to the day's limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStanding {
    /// Over the limit for this day type
    Exceeded,
    /// Exactly at the limit
    Maxed,
    /// Under the limit, or a free day with no limit
    Within,
}

/// Classify a count against the category's limit for the day type.
///
/// Free days have no limit and never classify as exceeded or maxed.
pub fn classify(count: f64, category: &CategoryDefinition, day_type: DayType) -> CategoryStanding {
    match category.max_units.for_day_type(day_type) {
        None => CategoryStanding::Within,
        Some(limit) => {
            if count > limit {
                CategoryStanding::Exceeded
            } else if (count - limit).abs() < BALANCE_EPSILON {
                CategoryStanding::Maxed
            } else {
                CategoryStanding::Within
            }
        }
    }
}

/// Format a unit count for display with exact quarter-fraction fidelity.
///
/// Whole numbers drop the decimal; `.25`/`.75` keep two places; everything
/// else gets one place (so `2.25` renders as "2.25", never "2.3").
pub fn format_unit_count(value: f64) -> String {
    if value == value.floor() {
        return format!("{}", value as i64);
    }
    let cents = ((value - value.floor()) * 100.0).round() as i64;
    match cents {
        25 | 75 => format!("{:.2}", value),
        _ => format!("{:.1}", value),
    }
}

/// A count discretized into half-unit cells for rendering.
///
/// Each full unit is two cells; the presentation layer pairs cells into
/// circles. Cells beyond the day's limit are reported separately so they
/// can be drawn in the excess color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDisplay {
    /// Cells to draw for the in-limit region (filled or empty)
    pub total_halves: usize,
    /// How many of those are filled
    pub filled_halves: usize,
    /// Filled cells past the limit, zero on free days
    pub excess_halves: usize,
}

/// Discretize a count into the cell counts the history and tracking views
/// render.
///
/// Free days show every unit uncapped, sized to at least the normal-day
/// limit for visual reference; bounded days cap the filled region at the
/// limit and surface the remainder as excess.
pub fn unit_display(
    count: f64,
    category: &CategoryDefinition,
    day_type: DayType,
) -> UnitDisplay {
    let halves = |units: f64| (units * 2.0).round().max(0.0) as usize;

    match category.max_units.for_day_type(day_type) {
        None => {
            let display_max = category.max_units.normal.max(count.ceil());
            UnitDisplay {
                total_halves: halves(display_max),
                filled_halves: halves(count),
                excess_halves: 0,
            }
        }
        Some(limit) => UnitDisplay {
            total_halves: halves(limit),
            filled_halves: halves(count.min(limit)),
            excess_halves: halves((count - limit).max(0.0)),
        },
    }
}
