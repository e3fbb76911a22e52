//! Unit tests for the domain model and processing helpers.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use crate::{
  City, Conference, Event, ValidationError,
  event::{CONFERENCE_CATEGORY, EventRecord, VariantRecord},
  processing::{attendance_summary, events_between, filter_by_city, sort_by_date},
};

fn at(day: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2025, 3, day)
    .unwrap()
    .and_hms_opt(9, 30, 0)
    .unwrap()
}

fn quito() -> City { City::new("Quito", "Ecuador", -0.18, -78.46, "").unwrap() }

fn lima() -> City { City::new("Lima", "Perú", -12.04, -77.03, "").unwrap() }

// ─── City ────────────────────────────────────────────────────────────────────

#[test]
fn city_normalises_name_country_and_description() {
  let city = City::new(" bogotá ", " colombia ", 4.7, -74.0, "  capital ").unwrap();
  assert_eq!(city.name(), "Bogotá");
  assert_eq!(city.country(), "Colombia");
  assert_eq!(city.description(), "capital");
  assert_eq!(city.key(), "Bogotá|Colombia");
}

#[test]
fn city_record_roundtrip_keeps_description() {
  let original = City::new("Medellín", "Colombia", 6.2, -75.5, "ciudad").unwrap();
  let copy = City::from_record(original.to_record()).unwrap();
  assert_eq!(copy, original);
}

#[test]
fn city_set_description_trims() {
  let mut city = quito();
  city.set_description("  high altitude\n");
  assert_eq!(city.description(), "high altitude");
}

// ─── Event invariants ────────────────────────────────────────────────────────

#[test]
fn capacity_must_be_positive() {
  let err = Event::new("Talk", at(1), quito(), 0).unwrap_err();
  assert_eq!(err, ValidationError::InvalidCapacity(0));

  let err = Event::new("Talk", at(1), quito(), -3).unwrap_err();
  assert_eq!(err, ValidationError::InvalidCapacity(-3));
}

#[test]
fn attendance_cannot_exceed_capacity() {
  let mut event = Event::new("Talk", at(1), quito(), 100).unwrap();
  event.register_attendees(40).unwrap();
  assert_eq!(event.attendance(), 40);

  let err = event.register_attendees(70).unwrap_err();
  assert!(matches!(
    err,
    ValidationError::AttendanceOverCapacity { attendance: 110, capacity: 100 }
  ));
  assert_eq!(event.attendance(), 40);
}

#[test]
fn attendance_cannot_go_negative() {
  let mut event = Event::new("Talk", at(1), quito(), 10).unwrap();
  let err = event.register_attendees(-1).unwrap_err();
  assert_eq!(err, ValidationError::NegativeAttendance(-1));
}

#[test]
fn lowering_capacity_clamps_attendance() {
  let mut event = Event::new("Talk", at(1), quito(), 100)
    .unwrap()
    .with_attendance(60)
    .unwrap();

  event.set_capacity(40).unwrap();
  assert_eq!(event.capacity(), 40);
  assert_eq!(event.attendance(), 40);
  assert_eq!(event.available_slots(), 0);
}

#[test]
fn rejected_capacity_leaves_event_untouched() {
  let mut event = Event::new("Talk", at(1), quito(), 100)
    .unwrap()
    .with_attendance(60)
    .unwrap();

  assert!(event.set_capacity(0).is_err());
  assert_eq!(event.capacity(), 100);
  assert_eq!(event.attendance(), 60);
}

#[test]
fn plain_event_cannot_take_conference_category() {
  let err = Event::new("Talk", at(1), quito(), 10)
    .unwrap()
    .with_category(CONFERENCE_CATEGORY)
    .unwrap_err();
  assert!(matches!(err, ValidationError::ReservedCategory(_)));
}

#[test]
fn conference_category_is_fixed() {
  let mut event =
    Event::conference("Summit", at(1), lima(), 200, Conference::new("AI")).unwrap();
  assert_eq!(event.category(), CONFERENCE_CATEGORY);
  assert_eq!(event.set_category("workshop"), Err(ValidationError::CategoryFixed));
}

#[test]
fn conference_ignores_duplicate_speakers() {
  let mut event = Event::conference(
    "Summit",
    at(1),
    lima(),
    200,
    Conference::new("AI").with_speakers(["Dr. A"]),
  )
  .unwrap();

  let conference = event.as_conference_mut().unwrap();
  assert!(conference.add_speaker("Dr. B"));
  assert!(!conference.add_speaker("Dr. A"));
  assert_eq!(conference.speakers(), ["Dr. A", "Dr. B"]);
  assert_eq!(conference.modality(), "in person");
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[test]
fn conference_record_roundtrip() {
  let event = Event::conference(
    "Data Science in Health",
    at(10),
    lima(),
    350,
    Conference::new("Digital health")
      .with_speakers(["Dr. Ruiz", "Dr. Romero"])
      .with_modality("hybrid"),
  )
  .unwrap()
  .with_attendance(320)
  .unwrap();

  let record = event.to_record();
  assert!(matches!(record.variant, VariantRecord::Conference(_)));
  assert_eq!(record.category, CONFERENCE_CATEGORY);
  assert_eq!(Event::from_record(record).unwrap(), event);
}

#[test]
fn from_record_rejects_attendance_over_capacity() {
  let mut record = Event::new("Talk", at(1), quito(), 10).unwrap().to_record();
  record.attendance = 11;
  assert!(matches!(
    Event::from_record(record),
    Err(ValidationError::AttendanceOverCapacity { .. })
  ));
}

#[test]
fn record_json_carries_type_tag() {
  let event = Event::new("Robotics Workshop", at(5), quito(), 120)
    .unwrap()
    .with_category("workshop")
    .unwrap();

  let json = serde_json::to_value(event.to_record()).unwrap();
  assert_eq!(json["type"], "Event");
  assert_eq!(json["category"], "workshop");
  assert_eq!(json["city"]["name"], "Quito");
  assert_eq!(json["date"], "2025-03-05T09:30:00");

  let back: EventRecord = serde_json::from_value(json).unwrap();
  assert_eq!(Event::from_record(back).unwrap(), event);
}

#[test]
fn side_channel_only_for_conferences() {
  let plain = Event::new("Talk", at(1), quito(), 10).unwrap();
  assert_eq!(plain.side_channel().unwrap(), "{}");
  assert_eq!(
    VariantRecord::from_side_channel("general", Some("{}")).unwrap(),
    VariantRecord::Event
  );

  let conf = Event::conference(
    "Summit",
    at(1),
    lima(),
    50,
    Conference::new("Energy").with_speakers(["Eng. Pérez"]),
  )
  .unwrap();
  let extra = conf.side_channel().unwrap();
  let variant = VariantRecord::from_side_channel(CONFERENCE_CATEGORY, Some(extra.as_str())).unwrap();
  let VariantRecord::Conference(record) = variant else {
    panic!("expected conference variant");
  };
  assert_eq!(record.topic, "Energy");
  assert_eq!(record.speakers, ["Eng. Pérez"]);
}

#[test]
fn conference_side_channel_falls_back_to_defaults() {
  for extra in [None, Some(""), Some("{}")] {
    let variant = VariantRecord::from_side_channel(CONFERENCE_CATEGORY, extra).unwrap();
    let VariantRecord::Conference(record) = variant else {
      panic!("expected conference variant for {extra:?}");
    };
    assert_eq!(record.topic, "");
    assert!(record.speakers.is_empty());
    assert_eq!(record.modality, "in person");
  }
}

#[test]
fn conference_side_channel_must_be_json() {
  assert!(VariantRecord::from_side_channel(CONFERENCE_CATEGORY, Some("not json")).is_err());
}

// ─── Processing ──────────────────────────────────────────────────────────────

fn sample() -> Vec<Event> {
  vec![
    Event::new("B", at(20), lima(), 100).unwrap().with_attendance(50).unwrap(),
    Event::new("A", at(5), quito(), 50).unwrap().with_attendance(25).unwrap(),
    Event::new("C", at(12), lima(), 50).unwrap(),
  ]
}

#[test]
fn filter_by_city_is_case_insensitive() {
  let events = sample();
  let in_lima = filter_by_city(&events, "  LIMA ");
  assert_eq!(in_lima.len(), 2);
  assert!(in_lima.iter().all(|e| e.city().name() == "Lima"));
}

#[test]
fn sort_by_date_both_directions() {
  let events = sample();
  let asc: Vec<_> = sort_by_date(&events, false).iter().map(|e| e.title().to_owned()).collect();
  assert_eq!(asc, ["A", "C", "B"]);
  let desc: Vec<_> = sort_by_date(&events, true).iter().map(|e| e.title().to_owned()).collect();
  assert_eq!(desc, ["B", "C", "A"]);
}

#[test]
fn events_between_is_inclusive() {
  let events = sample();
  let hits = events_between(&events, at(5), at(12));
  assert_eq!(hits.len(), 2);
}

#[test]
fn summary_aggregates_attendance() {
  let summary = attendance_summary(&sample());
  assert_eq!(summary.total_events, 3);
  assert_eq!(summary.total_attendance, 75);
  assert_eq!(summary.total_capacity, 200);
  assert_eq!(summary.occupancy_pct, 37.5);
  assert_eq!(summary.cities, ["Lima", "Quito"]);

  let empty = attendance_summary(&[]);
  assert_eq!(empty.occupancy_pct, 0.0);
}

// ─── Properties ──────────────────────────────────────────────────────────────

proptest! {
  #[test]
  fn attendance_accepted_exactly_within_capacity(
    capacity in 1i64..500,
    attendance in -50i64..600,
  ) {
    let mut event = Event::new("Probe", at(1), quito(), capacity).unwrap();
    let accepted = event.set_attendance(attendance).is_ok();
    prop_assert_eq!(accepted, (0..=capacity).contains(&attendance));
    prop_assert!(event.attendance() <= event.capacity());
  }

  #[test]
  fn mutation_sequences_keep_invariant(
    ops in prop::collection::vec((0u8..3, -300i64..300), 1..40),
  ) {
    let mut event = Event::new("Probe", at(1), quito(), 100).unwrap();
    for (op, value) in ops {
      let before = (event.capacity(), event.attendance());
      let result = match op {
        0 => event.set_capacity(value),
        1 => event.set_attendance(value),
        _ => event.register_attendees(value),
      };
      if result.is_err() {
        prop_assert_eq!((event.capacity(), event.attendance()), before);
      }
      prop_assert!(event.capacity() >= 1);
      prop_assert!(event.attendance() <= event.capacity());
    }
  }
}
