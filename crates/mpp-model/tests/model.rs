use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mpp_model::{
    Day, DayType, Duration, ProjectCalendar, ProjectCalendars, RecurrenceType, RecurringData,
    TimeRange, TimephasedWork, WorkingTime,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
}

#[test]
fn work_week_overrides_base_pattern() {
    let mut calendar = ProjectCalendar::default_base();
    let week = calendar.add_work_week();
    week.name = Some("Summer".to_string());
    week.from = Some(date(2024, 7, 1));
    week.to = Some(date(2024, 8, 31));
    week.set_working_day(Day::Friday, DayType::NonWorking);
    week.set_working_day(Day::Saturday, DayType::Working);
    week.add_calendar_hours(Day::Saturday)
        .push(TimeRange::from_minutes(9 * 60, 3 * 60));

    // Friday inside the work week is off, Saturday is worked
    assert!(!calendar.is_working_date(date(2024, 7, 5)));
    assert_eq!(calendar.work_minutes(at(2024, 7, 6, 0), at(2024, 7, 7, 0)), 180.0);
    // Monday keeps the base pattern through a Default day
    assert_eq!(calendar.working_ranges(date(2024, 7, 8)).len(), 2);
    // Outside the work week Friday is worked again
    assert!(calendar.is_working_date(date(2024, 9, 6)));
}

#[test]
fn recurring_exception_applies_on_each_occurrence() {
    let mut calendar = ProjectCalendar::default_base();
    let exception = calendar.add_calendar_exception(date(2024, 1, 1), date(2024, 12, 31));
    let mut recurring = RecurringData::new(RecurrenceType::Monthly, date(2024, 1, 1));
    recurring.day_number = Some(15);
    recurring.finish_date = Some(date(2024, 12, 31));
    exception.recurring = Some(recurring);

    assert!(!calendar.is_working_date(date(2024, 2, 15)));
    assert!(calendar.is_working_date(date(2024, 2, 14)));
}

#[test]
fn calendars_serialize() {
    let mut calendars = ProjectCalendars::new();
    let mut base = ProjectCalendar::default_base();
    base.unique_id = Some(1);
    calendars.add(base);

    let json = serde_json::to_string(&calendars).expect("serialize calendars");
    let round: ProjectCalendars = serde_json::from_str(&json).expect("deserialize calendars");
    assert_eq!(round, calendars);
}

#[test]
fn timephased_work_serializes() {
    let span = TimephasedWork::new(
        at(2024, 1, 8, 8),
        at(2024, 1, 8, 17),
        Duration::hours(8.0),
        Duration::hours(8.0),
    );
    let json = serde_json::to_value(&span).expect("serialize span");
    assert_eq!(json["total_amount"]["units"], "Hours");
}

#[test]
fn default_properties_snapshot() {
    insta::assert_json_snapshot!(mpp_model::ProjectProperties::default(), @r#"
    {
      "minutes_per_day": 480,
      "minutes_per_week": 2400,
      "days_per_month": 20,
      "default_duration_units": "Days",
      "timephased_work_units": "Hours",
      "currency_digits": 2
    }
    "#);
}
