use chrono::{DateTime, Utc};

/// Whole seconds between `start` and `end`, floored. Used to derive
/// `time_taken` when a submission is first persisted without one.
pub fn elapsed_whole_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_milliseconds().div_euclid(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn elapsed_is_floored_to_whole_seconds() {
        let t0 = Utc::now();
        assert_eq!(elapsed_whole_seconds(t0, t0 + Duration::seconds(125)), 125);
        assert_eq!(
            elapsed_whole_seconds(t0, t0 + Duration::milliseconds(125_900)),
            125
        );
        assert_eq!(elapsed_whole_seconds(t0, t0), 0);
    }

    #[test]
    fn negative_interval_floors_downward() {
        let t0 = Utc::now();
        assert_eq!(
            elapsed_whole_seconds(t0, t0 - Duration::milliseconds(500)),
            -1
        );
    }
}
