//! Routine models as stored in the backend `workouts` table.
//!
//! A routine is a user's list of exercises for one weekday. Routines are
//! created and edited outside the execution core and are read-only input
//! to it; the only field the core ever changes is `status`.

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// One of the seven fixed weekday labels.
///
/// The serialized form is the label the backend stores in `day_of_week`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
pub enum DayOfWeek {
    #[serde(rename = "Segunda-feira")]
    Monday,
    #[serde(rename = "Terça-feira")]
    Tuesday,
    #[serde(rename = "Quarta-feira")]
    Wednesday,
    #[serde(rename = "Quinta-feira")]
    Thursday,
    #[serde(rename = "Sexta-feira")]
    Friday,
    #[serde(rename = "Sábado")]
    Saturday,
    #[serde(rename = "Domingo")]
    Sunday,
}

impl DayOfWeek {
    /// All weekdays, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// The label stored by the backend.
    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Segunda-feira",
            DayOfWeek::Tuesday => "Terça-feira",
            DayOfWeek::Wednesday => "Quarta-feira",
            DayOfWeek::Thursday => "Quinta-feira",
            DayOfWeek::Friday => "Sexta-feira",
            DayOfWeek::Saturday => "Sábado",
            DayOfWeek::Sunday => "Domingo",
        }
    }

    fn english(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    /// The weekday of the current local date.
    pub fn today() -> Self {
        chrono::Local::now().weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayError(pub String);

impl fmt::Display for ParseDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown day of week: {}", self.0)
    }
}

impl std::error::Error for ParseDayError {}

impl FromStr for DayOfWeek {
    type Err = ParseDayError;

    /// Accepts the backend label or the English name (full or three-letter),
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| {
                day.label().to_lowercase() == wanted
                    || day.english() == wanted
                    || day.english()[..3] == wanted
            })
            .ok_or_else(|| ParseDayError(s.to_string()))
    }
}

/// Lifecycle status of a routine.
///
/// The backend stores `"completed"` once a routine has been finalized and
/// leaves the column empty otherwise; both `null` and unknown strings read
/// back as `Pending`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum RoutineStatus {
    #[default]
    Pending,
    Completed,
}

impl<'de> Deserialize<'de> for RoutineStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("completed") => RoutineStatus::Completed,
            _ => RoutineStatus::Pending,
        })
    }
}

/// A single exercise inside a routine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ExerciseDefinition {
    pub name: String,

    /// Free-form grouping such as "upper", "lower", "cardio" or "core".
    #[serde(default)]
    pub category: String,

    /// Number of sets to perform. Always at least 1 for valid routines.
    pub sets: u32,

    /// Repetitions per set.
    pub reps: u32,

    /// Working weight in kilograms.
    #[serde(default)]
    pub weight: Option<f64>,

    /// Rest between sets in seconds, kept in its stored text form.
    ///
    /// Use [`ExerciseDefinition::rest_seconds`] to read it as a number.
    #[serde(default, deserialize_with = "deserialize_rest")]
    #[ts(type = "string")]
    pub rest: String,
}

impl ExerciseDefinition {
    /// Rest duration in whole seconds. See [`parse_rest`].
    pub fn rest_seconds(&self) -> u32 {
        parse_rest(&self.rest)
    }
}

/// Parse a rest duration the way the routine editor stores it.
///
/// Leading whitespace is skipped, an optional sign is accepted and the
/// leading run of digits is read; trailing text is ignored. Empty or
/// non-numeric input and negative values yield 0. Values beyond `u32::MAX`
/// saturate.
pub fn parse_rest(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(byte - b'0'));
    }

    if !seen_digit || negative {
        return 0;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Rest is usually text, but rows written by other clients may hold a number.
fn deserialize_rest<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRest {
        Text(String),
        Number(serde_json::Number),
        Missing,
    }

    Ok(match RawRest::deserialize(deserializer)? {
        RawRest::Text(text) => text,
        RawRest::Number(number) => number.to_string(),
        RawRest::Missing => String::new(),
    })
}

/// A user's routine for one weekday.
///
/// # Example
///
/// ```yaml
/// id: 6f1c8f0e-3b0e-4a51-9a55-0d1f0e2b7c11
/// user_email: ana@example.com
/// day_of_week: Segunda-feira
/// exercises:
///   - name: Bench Press
///     category: upper
///     sets: 3
///     reps: 10
///     weight: 40
///     rest: "60"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Routine {
    #[ts(type = "string")]
    pub id: Uuid,

    /// Owner identifier (the account e-mail).
    pub user_email: String,

    pub day_of_week: DayOfWeek,

    /// Ordered exercises. Execution progress is keyed by position here.
    pub exercises: Vec<ExerciseDefinition>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: RoutineStatus,
}

impl Routine {
    pub fn is_completed(&self) -> bool {
        self.status == RoutineStatus::Completed
    }
}

/// The editable part of a routine: its weekday and exercise list.
///
/// ```yaml
/// day_of_week: Quarta-feira
/// exercises:
///   - name: Leg Press
///     sets: 4
///     reps: 12
///     rest: "90"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct RoutineEdit {
    pub day_of_week: DayOfWeek,
    pub exercises: Vec<ExerciseDefinition>,
}
