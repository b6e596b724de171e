use std::time::Duration;

use container_smoke::config::SmokeConfig;

#[test]
fn defaults_match_the_documented_budget() {
    let cfg = SmokeConfig::default();
    assert_eq!(cfg.runtime_program, "container");
    assert_eq!(cfg.poll.max_attempts, 30);
    assert_eq!(cfg.poll.interval, Duration::from_secs(2));
}

// Environment overrides are exercised end-to-end in the suite tests, where
// each child process gets its own environment.
