use proptest::prelude::*;

use super::DayOffset;
use crate::Timestamp;

// 2024-03-10 00:00:00 +07:00
const MIDNIGHT_PLUS_7: u64 = 1_710_003_600;

#[test]
fn start_of_day_uses_local_midnight() {
    let offset = DayOffset::default();

    assert_eq!(
        offset.start_of_day(Timestamp(MIDNIGHT_PLUS_7)),
        Timestamp(MIDNIGHT_PLUS_7)
    );
    assert_eq!(
        offset.start_of_day(Timestamp(MIDNIGHT_PLUS_7 + 12 * 3600)),
        Timestamp(MIDNIGHT_PLUS_7)
    );
    assert_eq!(
        offset.start_of_day(Timestamp(MIDNIGHT_PLUS_7 - 1)),
        Timestamp(MIDNIGHT_PLUS_7 - 86_400)
    );
}

#[test]
fn last_and_first_second_fall_on_different_days() {
    let offset = DayOffset::default();
    let before = offset.start_of_day(Timestamp(MIDNIGHT_PLUS_7 - 1));
    let after = offset.start_of_day(Timestamp(MIDNIGHT_PLUS_7 + 1));

    assert_ne!(before, after);
    assert_eq!(after.0 - before.0, 86_400);
}

#[test]
fn utc_day_differs_from_plus_7_day() {
    assert_eq!(
        DayOffset::UTC.start_of_day(Timestamp(MIDNIGHT_PLUS_7)),
        Timestamp(MIDNIGHT_PLUS_7 - 17 * 3600)
    );
}

#[test]
fn parses_and_displays_offsets() {
    assert_eq!("7".parse::<DayOffset>().unwrap(), DayOffset::UTC_PLUS_7);
    assert_eq!("+7".parse::<DayOffset>().unwrap(), DayOffset::UTC_PLUS_7);
    assert_eq!(DayOffset::UTC_PLUS_7.to_string(), "+07:00");
    assert_eq!("-5".parse::<DayOffset>().unwrap().to_string(), "-05:00");
    assert!("30".parse::<DayOffset>().is_err());
    assert!("seven".parse::<DayOffset>().is_err());
}

proptest! {
    #[test]
    fn start_of_day_matches_calendar(ts in 86_400u64..4_000_000_000u64, hours in -12i8..=14i8) {
        let offset = DayOffset::from_hours(hours).unwrap();
        let start = offset.start_of_day(Timestamp(ts));

        prop_assert!(start.0 <= ts);
        prop_assert!(ts - start.0 < 86_400);
        prop_assert_eq!(offset.date(start), offset.date(Timestamp(ts)));
        prop_assert_ne!(offset.date(Timestamp(start.0 - 1)), offset.date(start));
    }
}
