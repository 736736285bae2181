#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz `--before`/`--after` parsing.
///
/// Every input must either parse or be rejected with an error, in both
/// naive-timezone modes; overflowing relative offsets must not panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let now = chrono::Utc::now();
        let _ = awslog::parse_time_bound(s, now, awslog::NaiveTimezone::Utc);
        let _ = awslog::parse_time_bound(s, now, awslog::NaiveTimezone::Local);
    }
});
