//! Sequential benchmark harness.
//!
//! Runs every registered strategy against one payload, one at a time, in
//! registration order. Timing uses the monotonic clock; a failing strategy
//! is recorded in place with a sentinel digest instead of aborting the run.

use crate::strategy::HashStrategy;
use crate::utils::Logger;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Reserved digest value recorded for a strategy that failed.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Outcome of one strategy invocation. `time_ms` is 0.0 when the strategy
/// failed and `hash` holds [`ERROR_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub hash: String,
    #[serde(rename = "time")]
    pub time_ms: f64,
}

impl BenchmarkResult {
    pub fn is_failure(&self) -> bool {
        self.hash == ERROR_SENTINEL
    }
}

/// One complete benchmark invocation: an RFC 3339 timestamp plus one result
/// per registered strategy, in registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRun {
    pub date: String,
    pub results: Vec<BenchmarkResult>,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no hash strategies registered")]
    EmptyRegistry,
}

/// Runs every strategy against `payload` and collects the results.
///
/// Strategies execute strictly sequentially so timings are not skewed by
/// contention, and the result order always equals the registration order.
/// An individual failure is logged to `logger` and recorded as
/// [`ERROR_SENTINEL`]; the run itself only fails on an empty registry.
pub fn run_benchmarks(
    payload: &[u8],
    strategies: &[Box<dyn HashStrategy>],
    logger: &Logger,
) -> Result<BenchmarkRun, HarnessError> {
    if strategies.is_empty() {
        return Err(HarnessError::EmptyRegistry);
    }

    let mut results = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let start = Instant::now();
        match strategy.compute_digest(payload) {
            Ok(hash) => {
                let time_ms = start.elapsed().as_secs_f64() * 1000.0;
                results.push(BenchmarkResult {
                    name: strategy.name().to_string(),
                    hash,
                    time_ms,
                });
            }
            Err(e) => {
                let _ = logger.log(&format!("Strategy failed: {} ({})", strategy.name(), e));
                results.push(BenchmarkResult {
                    name: strategy.name().to_string(),
                    hash: ERROR_SENTINEL.to_string(),
                    time_ms: 0.0,
                });
            }
        }
    }

    Ok(BenchmarkRun {
        date: Utc::now().to_rfc3339(),
        results,
    })
}

/// Returns a copy of `results` ordered by ascending digest length.
///
/// Groups algorithms by output size (128-bit before 256-bit before 512-bit)
/// for display. The sort is stable and leaves the input untouched, so a
/// persisted run keeps its registration order.
pub fn sort_by_digest_length(results: &[BenchmarkResult]) -> Vec<BenchmarkResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by_key(|r| r.hash.len());
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;
    use anyhow::anyhow;
    use std::fs;
    use tempfile::TempDir;

    struct FixedStrategy {
        name: &'static str,
        hash: &'static str,
    }

    impl HashStrategy for FixedStrategy {
        fn name(&self) -> &str {
            self.name
        }

        fn compute_digest(&self, _payload: &[u8]) -> anyhow::Result<String> {
            Ok(self.hash.to_string())
        }
    }

    struct FailingStrategy;

    impl HashStrategy for FailingStrategy {
        fn name(&self) -> &str {
            "B"
        }

        fn compute_digest(&self, _payload: &[u8]) -> anyhow::Result<String> {
            Err(anyhow!("backing library exploded"))
        }
    }

    fn test_logger() -> (TempDir, Logger, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.log").to_str().unwrap().to_string();
        (dir, Logger::new(&path), path)
    }

    #[test]
    fn test_result_count_and_order_match_registration() {
        let (_dir, logger, _) = test_logger();
        let strategies: Vec<Box<dyn HashStrategy>> = StrategyKind::all()
            .iter()
            .map(|kind| kind.build())
            .collect();

        let run = run_benchmarks(b"some payload", &strategies, &logger).unwrap();

        assert_eq!(run.results.len(), strategies.len());
        for (result, strategy) in run.results.iter().zip(&strategies) {
            assert_eq!(result.name, strategy.name());
        }
    }

    #[test]
    fn test_empty_payload_is_valid_input() {
        let (_dir, logger, _) = test_logger();
        let strategies = vec![StrategyKind::Md5.build()];

        let run = run_benchmarks(b"", &strategies, &logger).unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].hash, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_empty_registry_is_caller_misuse() {
        let (_dir, logger, _) = test_logger();
        let strategies: Vec<Box<dyn HashStrategy>> = vec![];

        let err = run_benchmarks(b"payload", &strategies, &logger).unwrap_err();
        assert!(matches!(err, HarnessError::EmptyRegistry));
    }

    #[test]
    fn test_failure_is_isolated_to_one_strategy() {
        let (_dir, logger, log_path) = test_logger();
        let strategies: Vec<Box<dyn HashStrategy>> = vec![
            Box::new(FixedStrategy {
                name: "A",
                hash: "deadbeef",
            }),
            Box::new(FailingStrategy),
        ];

        let run = run_benchmarks(b"payload", &strategies, &logger).unwrap();

        assert_eq!(run.results.len(), 2);
        assert_eq!(run.results[0].name, "A");
        assert_eq!(run.results[0].hash, "deadbeef");
        assert!(!run.results[0].is_failure());
        assert_eq!(run.results[1].name, "B");
        assert_eq!(run.results[1].hash, ERROR_SENTINEL);
        assert_eq!(run.results[1].time_ms, 0.0);
        assert!(run.results[1].is_failure());

        // Diagnostic detail lands in the log, not in the result.
        let log = fs::read_to_string(log_path).unwrap();
        assert!(log.contains("backing library exploded"));
    }

    #[test]
    fn test_pure_strategies_are_deterministic() {
        let (_dir, logger, _) = test_logger();
        let strategies: Vec<Box<dyn HashStrategy>> = StrategyKind::all()
            .iter()
            .map(|kind| kind.build())
            .collect();

        let first = run_benchmarks(b"fixed payload", &strategies, &logger).unwrap();
        let second = run_benchmarks(b"fixed payload", &strategies, &logger).unwrap();

        for (a, b) in first.results.iter().zip(&second.results) {
            assert_eq!(a.hash, b.hash);
        }
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let (_dir, logger, _) = test_logger();
        let strategies = vec![StrategyKind::Sha256.build()];
        let run = run_benchmarks(b"x", &strategies, &logger).unwrap();

        assert!(chrono::DateTime::parse_from_rfc3339(&run.date).is_ok());
    }

    fn result(name: &str, hash: &str) -> BenchmarkResult {
        BenchmarkResult {
            name: name.to_string(),
            hash: hash.to_string(),
            time_ms: 1.0,
        }
    }

    #[test]
    fn test_display_sort_orders_by_digest_length() {
        let results = vec![
            result("long", "aaaaaaaa"),
            result("short", "bbbb"),
            result("mid", "cccccc"),
        ];

        let sorted = sort_by_digest_length(&results);

        let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["short", "mid", "long"]);
        // Input order untouched.
        assert_eq!(results[0].name, "long");
    }

    #[test]
    fn test_display_sort_is_stable_and_idempotent() {
        let results = vec![
            result("first", "aaaa"),
            result("second", "bbbb"),
            result("third", "cc"),
        ];

        let once = sort_by_digest_length(&results);
        let twice = sort_by_digest_length(&once);

        assert_eq!(once, twice);
        // Equal lengths keep their original relative order.
        assert_eq!(once[1].name, "first");
        assert_eq!(once[2].name, "second");

        // Same multiset of entries either way.
        let mut original = results.clone();
        let mut sorted = once.clone();
        original.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(original, sorted);
    }
}
