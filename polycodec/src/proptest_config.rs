use proptest::test_runner::Config;

/// Shared proptest settings, overridable with `PROPTEST_CASES`.
pub(crate) fn proptest_cfg() -> Config {
    Config {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|cases| cases.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..Config::default()
    }
}
