#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz configuration normalization.
///
/// Arbitrary UTF-8 is normalized both as a raw configuration string (the
/// form AWS Config delivers) and, when it parses, as a JSON document, with
/// and without sequence sorting. Normalizing twice must be a no-op.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for options in [awslog::NormalizeOptions::default(), awslog::NormalizeOptions::sorted()] {
            let once = awslog::normalize_value(&serde_json::Value::String(s.to_string()), &options);
            let twice = awslog::normalize_value(&once, &options);
            assert_eq!(once, twice);

            if let Ok(value) = serde_json::from_str::<serde_json::Value>(s) {
                let _ = awslog::normalize(&value, &options).to_pretty_string();
            }
        }
    }
});
