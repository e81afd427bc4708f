//! Property-based tests for working-time arithmetic.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use mpp_model::{ProjectCalendar, WorkingTime};
use proptest::prelude::*;

fn arb_instant() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..3_650, 0i64..(24 * 60)).prop_map(|(days, minutes)| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + ChronoDuration::days(days)
            + ChronoDuration::minutes(minutes)
    })
}

proptest! {
    #[test]
    fn add_work_is_inverse_of_work_minutes(start in arb_instant(), minutes in 0u32..20_000) {
        let calendar = ProjectCalendar::default_base();
        let finish = calendar.add_work(start, f64::from(minutes), false);
        let measured = calendar.work_minutes(start, finish);
        prop_assert!((measured - f64::from(minutes)).abs() < 1e-6);
    }

    #[test]
    fn next_work_start_is_working_time(from in arb_instant()) {
        let calendar = ProjectCalendar::default_base();
        let next = calendar.next_work_start(from).expect("default week has working time");
        prop_assert!(next >= from);
        prop_assert!(calendar.work_minutes(next, next + ChronoDuration::minutes(1)) > 0.0);
    }
}
