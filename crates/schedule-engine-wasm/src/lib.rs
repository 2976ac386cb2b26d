//! WASM bindings for schedule-engine.
//!
//! Lets the scheduling form preview the dates a recurrence will create before
//! it is submitted. All complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/schedule_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, Utc};
use schedule_engine::dst::{parse_timezone, resolve_local};
use schedule_engine::reminder::reminder_target_date;
use schedule_engine::{
    generate_occurrences, ical, DstPolicy, Occurrence, RecurrenceRequest, RecurrenceSpec,
    ScheduleError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Serialize)]
struct OccurrenceDto {
    /// Local date and time, `YYYY-MM-DDTHH:MM:SS`.
    local: String,
    /// RFC 3339 UTC instant, present when a timezone was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    utc: Option<String>,
}

impl From<&Occurrence> for OccurrenceDto {
    fn from(o: &Occurrence) -> Self {
        Self {
            local: o.at().format("%Y-%m-%dT%H:%M:%S").to_string(),
            utc: None,
        }
    }
}

#[derive(Serialize)]
struct PreviewDto {
    teams: usize,
    occurrences: Vec<OccurrenceDto>,
    /// Events that submitting the request would create (teams × occurrences).
    events_to_create: usize,
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    s.parse()
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

/// Expand occurrences and, if `timezone` is given, attach their UTC instants.
///
/// Each occurrence is resolved on its own, so one that cannot be placed in the
/// zone keeps `utc: None` instead of shifting its neighbours.
fn expand(
    spec: &RecurrenceSpec,
    timezone: Option<&str>,
) -> Result<Vec<OccurrenceDto>, ScheduleError> {
    let tz = timezone.map(parse_timezone).transpose()?;
    Ok(generate_occurrences(spec)?
        .iter()
        .map(|occurrence| {
            let mut dto = OccurrenceDto::from(occurrence);
            dto.utc = tz
                .and_then(|tz| resolve_local(occurrence.at(), tz, DstPolicy::ShiftForward))
                .map(|instant| instant.with_timezone(&Utc).to_rfc3339());
            dto
        })
        .collect())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a recurrence spec into its occurrences.
///
/// `spec_json` is a `RecurrenceSpec` object (`weekday`, `time_of_day`,
/// `range_start`, `range_end`, `period`). Returns a JSON array of
/// `{local, utc?}` objects.
///
/// # Arguments
/// - `spec_json` -- the recurrence spec as JSON
/// - `timezone` -- Optional IANA timezone (e.g., "Europe/Paris") for UTC instants
#[wasm_bindgen(js_name = "generateOccurrences")]
pub fn generate(spec_json: &str, timezone: Option<String>) -> Result<String, JsValue> {
    let spec: RecurrenceSpec = serde_json::from_str(spec_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid spec JSON: {}", e)))?;
    to_json(&expand(&spec, timezone.as_deref()).map_err(js_error)?)
}

/// Preview what submitting a recurrence request would create.
///
/// `request_json` has the same shape as the scheduling endpoint's body
/// (`type`, `dayOfWeek`, `time`, `teamIds`, `startDate`, `periodType`, ...).
/// Returns `{teams, occurrences, events_to_create}`.
#[wasm_bindgen(js_name = "previewRecurrence")]
pub fn preview_recurrence(request_json: &str, timezone: Option<String>) -> Result<String, JsValue> {
    let request = RecurrenceRequest::from_json(request_json).map_err(js_error)?;
    let spec = request.spec().map_err(js_error)?;
    let occurrences = expand(&spec, timezone.as_deref()).map_err(js_error)?;
    let teams = request.teams().len();

    to_json(&PreviewDto {
        teams,
        events_to_create: teams * occurrences.len(),
        occurrences,
    })
}

/// Render a recurrence spec as an RFC 5545 `DTSTART`/`RRULE` block.
///
/// Returns `undefined` when the range holds no occurrence.
#[wasm_bindgen(js_name = "toRRule")]
pub fn to_rrule(spec_json: &str) -> Result<Option<String>, JsValue> {
    let spec: RecurrenceSpec = serde_json::from_str(spec_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid spec JSON: {}", e)))?;
    ical::to_rrule(&spec).map_err(js_error)
}

/// The date whose events get reminders when running on `today` (`YYYY-MM-DD`).
#[wasm_bindgen(js_name = "reminderTargetDate")]
pub fn reminder_target(today: &str, days_before: u32) -> Result<String, JsValue> {
    let today = parse_date(today)?;
    reminder_target_date(today, u64::from(days_before))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| JsValue::from_str("Target date out of range"))
}
