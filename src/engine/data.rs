use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{self, Deserialize as _, Deserializer, Serializer};
use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Error as FmtError, Formatter};
use std::str::FromStr;
use thiserror::Error;
use time::error::{Format, Parse};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
  Low,
  Medium,
  High,
}

impl Priority {
  // Sort rank on deadline ties; independent of declaration order and of the
  // persisted name.
  pub const fn rank(self) -> u8 {
    match self {
      Self::High => 0,
      Self::Medium => 1,
      Self::Low => 2,
    }
  }

  pub const fn name(self) -> &'static str {
    match self {
      Self::Low => "LOW",
      Self::Medium => "MEDIUM",
      Self::High => "HIGH",
    }
  }
}

impl Display for Priority {
  fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), FmtError> {
    formatter.write_str(self.name())
  }
}

#[derive(Debug, Error)]
#[error("unknown priority `{0}`, expected low, medium or high")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
  type Err = ParsePriorityError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "low" => Ok(Self::Low),
      "medium" => Ok(Self::Medium),
      "high" => Ok(Self::High),
      _ => Err(ParsePriorityError(s.into())),
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Deadline(Date);

impl Deadline {
  #[must_use]
  pub const fn new(date: Date) -> Self {
    Self(date)
  }

  #[must_use]
  pub fn today_utc() -> Self {
    Self(OffsetDateTime::now_utc().date())
  }

  #[must_use]
  pub fn checked_add(self, duration: Duration) -> Option<Self> {
    self.0.checked_add(duration).map(Self)
  }

  #[must_use]
  pub const fn date(self) -> Date {
    self.0
  }
}

fn format_iso(date: Date) -> Result<String, Format> {
  date.format(format_description!("[year]-[month]-[day]"))
}

impl Display for Deadline {
  fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), FmtError> {
    match format_iso(self.0) {
      Ok(formatted) => formatter.write_str(&formatted),
      Err(_) => Err(FmtError),
    }
  }
}

impl FromStr for Deadline {
  type Err = Parse;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Date::parse(s, format_description!("[year]-[month]-[day]")).map(Self)
  }
}

impl serde::Serialize for Deadline {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match format_iso(self.0) {
      Ok(formatted) => serializer.serialize_str(&formatted),
      Err(e) => Err(S::Error::custom(e.to_string())),
    }
  }
}

impl<'de> serde::Deserialize<'de> for Deadline {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    match s.parse() {
      Ok(deadline) => Ok(deadline),
      Err(e) => Err(D::Error::custom(e.to_string())),
    }
  }
}

/// One to-do item. Everything except the completion flag is fixed at
/// construction; replacing a task means removing and re-adding it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Task {
  description: String,
  deadline: Deadline,
  priority: Priority,
  done: bool,
}

impl Task {
  pub fn new(description: impl Into<String>, deadline: Deadline, priority: Priority) -> Self {
    Self {
      description: description.into(),
      deadline,
      priority,
      done: false,
    }
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub const fn deadline(&self) -> Deadline {
    self.deadline
  }

  pub const fn priority(&self) -> Priority {
    self.priority
  }

  pub const fn is_done(&self) -> bool {
    self.done
  }

  pub fn set_done(&mut self, done: bool) {
    self.done = done;
  }

  /// Sort key: earlier deadlines first, higher priorities first on ties.
  /// This relation is coarser than equality, so `Task` deliberately has no
  /// `Ord` impl.
  pub const fn urgency(&self) -> (Deadline, u8) {
    (self.deadline, self.priority.rank())
  }

  pub fn cmp_urgency(&self, other: &Self) -> Ordering {
    self.urgency().cmp(&other.urgency())
  }
}

impl Display for Task {
  fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), FmtError> {
    if self.done {
      formatter.write_str("[DONE] ")?;
    }
    write!(
      formatter,
      "{} (due {}, {})",
      self.description, self.deadline, self.priority
    )
  }
}
