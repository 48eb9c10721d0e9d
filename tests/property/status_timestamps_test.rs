//! Property-based tests for status timestamps.
//!
//! For any sequence of status changes on a tracked page, each status's first
//! time is written once (at its first occurrence) and its last time equals the
//! time of its latest occurrence.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use pagetrack::managers::record_store::{RecordStore, RecordStoreTrait};
use pagetrack::services::clock::{Clock, ManualClock};
use pagetrack::services::identifier::IdentifierExtractor;
use pagetrack::services::status_tracker::StatusTracker;
use pagetrack::types::record::PageStatus;
use pagetrack::types::settings::DEFAULT_PATTERN;
use proptest::prelude::*;

const URL: &str = "https://bugs.example.org/show_bug.cgi?id=5";

fn arb_status() -> impl Strategy<Value = PageStatus> {
    prop_oneof![
        Just(PageStatus::Viewed),
        Just(PageStatus::Ignored),
        Just(PageStatus::Analyzing),
        Just(PageStatus::Solved),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn first_time_is_sticky_and_last_time_is_latest(
        changes in proptest::collection::vec((arb_status(), 1i64..5000), 1..12),
    ) {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        rt.block_on(async {
            let store = RecordStore::open_in_memory().await.expect("store");
            let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 0);
            let tracker = StatusTracker::new(&store, &clock);
            let extractor = IdentifierExtractor::new(DEFAULT_PATTERN).expect("pattern");

            tracker
                .record_visit(URL, &extractor, PageStatus::Viewed)
                .await
                .expect("visit");
            let created_at = clock.timestamp();

            let mut first: HashMap<PageStatus, String> = HashMap::new();
            let mut last: HashMap<PageStatus, String> = HashMap::new();
            first.insert(PageStatus::Viewed, created_at.clone());
            last.insert(PageStatus::Viewed, created_at);

            for (status, step) in &changes {
                clock.advance(*step);
                let now = clock.timestamp();
                assert!(tracker.set_status(URL, *status).await.expect("set_status"));
                first.entry(*status).or_insert_with(|| now.clone());
                last.insert(*status, now);
            }

            let record = store.get(URL).await.expect("get").expect("record");
            assert_eq!(record.status, changes.last().map(|(s, _)| *s));
            for status in PageStatus::ALL {
                let (first_field, last_field) = status.time_fields();
                assert_eq!(record.time(first_field), first.get(&status).map(String::as_str));
                assert_eq!(record.time(last_field), last.get(&status).map(String::as_str));
            }
        });
    }
}
