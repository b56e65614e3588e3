use chrono::{
  DateTime,
  Local,
  NaiveDate,
  NaiveDateTime
};

/// Format used by `<input type="datetime-local">` and the form fields.
pub const INPUT_FORMAT: &str =
  "%Y-%m-%dT%H:%M";
/// Format sent to the REST service.
pub const WIRE_FORMAT: &str =
  "%Y-%m-%dT%H:%M:%S";
/// Human readable format for rendered rows.
pub const DISPLAY_FORMAT: &str =
  "%Y-%m-%d %H:%M";

const NAIVE_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M"
];

const MS_PER_DAY: f64 =
  24.0 * 60.0 * 60.0 * 1000.0;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum DueMarker {
  Overdue,
  NearDue,
  Upcoming
}

impl DueMarker {
  pub fn classify(
    due: Option<NaiveDateTime>,
    now: NaiveDateTime,
    near_due_days: u32
  ) -> Self {
    let Some(due) = due else {
      return DueMarker::Upcoming;
    };

    let days = (due - now)
      .num_milliseconds()
      as f64
      / MS_PER_DAY;
    if days < 0.0 {
      DueMarker::Overdue
    } else if days
      <= f64::from(near_due_days)
    {
      DueMarker::NearDue
    } else {
      DueMarker::Upcoming
    }
  }

  pub fn css_class(
    self
  ) -> &'static str {
    match self {
      | DueMarker::Overdue => {
        "task-overdue"
      }
      | DueMarker::NearDue => {
        "task-near-due"
      }
      | DueMarker::Upcoming => {
        "task-upcoming"
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | DueMarker::Overdue => "overdue",
      | DueMarker::NearDue => {
        "near-due"
      }
      | DueMarker::Upcoming => {
        "upcoming"
      }
    }
  }
}

/// Parses the timestamp shapes the REST service and the form produce.
///
/// Offsets are converted to local time; naive values are taken as local
/// already. Returns `None` for blank or unrecognised input.
pub fn parse_timestamp(
  raw: &str
) -> Option<NaiveDateTime> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(parsed) =
    DateTime::parse_from_rfc3339(
      trimmed
    )
  {
    return Some(
      parsed
        .with_timezone(&Local)
        .naive_local()
    );
  }

  for format in NAIVE_FORMATS {
    if let Ok(parsed) =
      NaiveDateTime::parse_from_str(
        trimmed, format
      )
    {
      return Some(parsed);
    }
  }

  NaiveDate::parse_from_str(
    trimmed, "%Y-%m-%d"
  )
  .ok()
  .and_then(|date| {
    date.and_hms_opt(0, 0, 0)
  })
}

pub fn now_local() -> NaiveDateTime {
  Local::now().naive_local()
}

/// Value the due field starts with: today at midnight.
pub fn default_due_input(
  today: NaiveDate
) -> String {
  today
    .and_hms_opt(0, 0, 0)
    .map(|midnight| {
      midnight
        .format(INPUT_FORMAT)
        .to_string()
    })
    .unwrap_or_default()
}

pub fn format_input(
  value: Option<NaiveDateTime>
) -> String {
  value
    .map(|value| {
      value
        .format(INPUT_FORMAT)
        .to_string()
    })
    .unwrap_or_default()
}

pub fn format_display(
  value: Option<NaiveDateTime>
) -> String {
  value
    .map(|value| {
      value
        .format(DISPLAY_FORMAT)
        .to_string()
    })
    .unwrap_or_default()
}

/// Serde adapters for the timestamp fields of the REST payloads.
pub mod wire_date {
  use chrono::NaiveDateTime;
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  use super::{
    WIRE_FORMAT,
    parse_timestamp
  };

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum WireDate {
    Text(String),
    Extended {
      #[serde(rename = "$date")]
      date: String
    },
    Other(serde_json::Value)
  }

  pub fn serialize<S>(
    value: &Option<NaiveDateTime>,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    match value {
      | Some(value) => {
        serializer.serialize_str(
          &value
            .format(WIRE_FORMAT)
            .to_string()
        )
      }
      | None => {
        serializer.serialize_none()
      }
    }
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<Option<NaiveDateTime>, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw =
      Option::<WireDate>::deserialize(
        deserializer
      )?;
    Ok(match raw {
      | Some(WireDate::Text(text)) => {
        parse_timestamp(&text)
      }
      | Some(WireDate::Extended {
        date
      }) => parse_timestamp(&date),
      | Some(WireDate::Other(_))
      | None => None
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    Duration,
    NaiveDate,
    NaiveDateTime
  };

  use super::*;

  fn at(
    y: i32,
    m: u32,
    d: u32,
    h: u32,
    min: u32
  ) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .and_then(|date| {
        date.and_hms_opt(h, min, 0)
      })
      .expect("valid timestamp")
  }

  #[test]
  fn parses_form_and_server_shapes() {
    let expected = at(2025, 3, 9, 14, 30);
    assert_eq!(
      parse_timestamp("2025-03-09T14:30"),
      Some(expected)
    );
    assert_eq!(
      parse_timestamp(
        "2025-03-09T14:30:00"
      ),
      Some(expected)
    );
    assert_eq!(
      parse_timestamp(
        "2025-03-09T14:30:00.123456"
      )
      .map(|value| {
        value.format(INPUT_FORMAT).to_string()
      }),
      Some("2025-03-09T14:30".to_string())
    );
    assert_eq!(
      parse_timestamp("2025-03-09"),
      Some(at(2025, 3, 9, 0, 0))
    );
    assert!(
      parse_timestamp(
        "2025-03-09T14:30:00Z"
      )
      .is_some()
    );
  }

  #[test]
  fn blank_and_garbage_are_absent() {
    assert_eq!(parse_timestamp(""), None);
    assert_eq!(
      parse_timestamp("   "),
      None
    );
    assert_eq!(
      parse_timestamp("next tuesday"),
      None
    );
  }

  #[test]
  fn due_markers_follow_distance_from_now(
  ) {
    let now = at(2025, 6, 1, 12, 0);

    assert_eq!(
      DueMarker::classify(
        Some(now + Duration::days(3)),
        now,
        7
      ),
      DueMarker::NearDue
    );
    assert_eq!(
      DueMarker::classify(
        Some(now - Duration::days(1)),
        now,
        7
      ),
      DueMarker::Overdue
    );
    assert_eq!(
      DueMarker::classify(
        Some(now + Duration::days(30)),
        now,
        7
      ),
      DueMarker::Upcoming
    );
  }

  #[test]
  fn due_marker_edges() {
    let now = at(2025, 6, 1, 12, 0);

    assert_eq!(
      DueMarker::classify(
        Some(now + Duration::days(7)),
        now,
        7
      ),
      DueMarker::NearDue
    );
    assert_eq!(
      DueMarker::classify(
        Some(
          now + Duration::days(7)
            + Duration::minutes(1)
        ),
        now,
        7
      ),
      DueMarker::Upcoming
    );
    assert_eq!(
      DueMarker::classify(
        Some(now - Duration::seconds(1)),
        now,
        7
      ),
      DueMarker::Overdue
    );
    assert_eq!(
      DueMarker::classify(None, now, 7),
      DueMarker::Upcoming
    );
  }

  #[test]
  fn default_due_is_midnight_today() {
    let today =
      NaiveDate::from_ymd_opt(2025, 1, 5)
        .expect("valid date");
    assert_eq!(
      default_due_input(today),
      "2025-01-05T00:00"
    );
  }
}
