//! Sample events used when no snapshot exists yet.

use chrono::{Duration, NaiveDateTime};
use eventus_core::{City, Conference, Event, ValidationError};

/// Three upcoming events, dated relative to `now`.
pub fn sample_events(now: NaiveDateTime) -> Result<Vec<Event>, ValidationError> {
  let bogota = City::new("Bogotá", "Colombia", 4.711, -74.072, "")?;
  let medellin = City::new("Medellín", "Colombia", 6.2442, -75.5812, "")?;
  let quito = City::new("Quito", "Ecuador", -0.1807, -78.4678, "")?;

  Ok(vec![
    Event::conference(
      "Data Science in Health",
      now + Duration::days(10),
      bogota,
      350,
      Conference::new("Digital health")
        .with_speakers(["Dr. Ruiz", "Dr. Romero"])
        .with_modality("hybrid"),
    )?
    .with_attendance(320)?,
    Event::new(
      "Educational Robotics Workshop",
      now + Duration::days(30),
      medellin,
      120,
    )?
    .with_category("workshop")?
    .with_attendance(95)?,
    Event::conference(
      "Andean Renewable Energy Symposium",
      now + Duration::days(45),
      quito,
      200,
      Conference::new("Clean energy").with_speakers(["Eng. Pérez"]),
    )?
    .with_attendance(150)?,
  ])
}
