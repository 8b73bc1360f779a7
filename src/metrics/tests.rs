use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use super::*;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn success_ms(ms: u64) -> ResultRecord {
    ResultRecord::success(Duration::from_millis(ms))
}

fn non_ok(status: u16) -> ResultRecord {
    ResultRecord::Failure(FailureReason::NonOkStatus { status })
}

fn network(message: &str) -> ResultRecord {
    ResultRecord::Failure(FailureReason::Network {
        message: message.to_owned(),
    })
}

#[test]
fn statistics_track_extrema_over_successes_only() -> Result<(), String> {
    let mut stats = RunStatistics::new();
    let ordinals: Vec<Option<u64>> = [success_ms(30), non_ok(500), success_ms(10), success_ms(20)]
        .iter()
        .map(|record| stats.record(record))
        .collect();

    if ordinals != vec![Some(1), None, Some(2), Some(3)] {
        return Err(format!("Unexpected ordinals: {:?}", ordinals));
    }
    if stats.best_nanos() != Some(10_000_000) || stats.worst_nanos() != Some(30_000_000) {
        return Err(format!(
            "Unexpected extrema: {:?} / {:?}",
            stats.best_nanos(),
            stats.worst_nanos()
        ));
    }
    if stats.average_nanos() != Some(20_000_000) {
        return Err(format!("Unexpected average: {:?}", stats.average_nanos()));
    }
    if stats.total() != 4 || stats.errors() != 1 || stats.network_errors() != 0 {
        return Err(format!("Unexpected counts: {:?}", stats));
    }
    Ok(())
}

#[test]
fn average_truncates_to_whole_nanos() -> Result<(), String> {
    let mut stats = RunStatistics::new();
    for nanos in [1_u64, 2, 2] {
        stats.record(&ResultRecord::Success {
            latency_nanos: nanos,
        });
    }
    if stats.latency_sum_nanos() != 5 || stats.average_nanos() != Some(1) {
        return Err(format!(
            "Expected sum 5 avg 1, got {} / {:?}",
            stats.latency_sum_nanos(),
            stats.average_nanos()
        ));
    }
    Ok(())
}

#[test]
fn statistics_without_successes_have_no_latency() -> Result<(), String> {
    let mut stats = RunStatistics::new();
    stats.record(&network("first"));
    stats.record(&network("second"));
    if stats.average_nanos().is_some() || stats.best_nanos().is_some() {
        return Err("Expected no latency statistics".to_owned());
    }
    if stats.first_network_error() != Some("first") || stats.network_errors() != 2 {
        return Err(format!("Unexpected network tracking: {:?}", stats));
    }
    Ok(())
}

#[test]
fn summary_line_formats_fixed_point() -> Result<(), String> {
    let mut stats = RunStatistics::new();
    stats.record(&success_ms(10));
    stats.record(&success_ms(20));
    stats.record(&non_ok(404));

    let summary = RunSummary::from_stats(&stats, Duration::from_millis(300));
    // 2 successes over 0.3s = 6.666.. rps, truncated.
    if summary.rps_x100 != 666 {
        return Err(format!("Unexpected rps_x100: {}", summary.rps_x100));
    }
    // 1 of 3 = 33.333..%, truncated.
    if summary.error_rate_x100 != 3_333 {
        return Err(format!("Unexpected error rate: {}", summary.error_rate_x100));
    }
    let expected = "Rps: 6.66 Avg: 15ms Worst: 20ms Best: 10ms Errors: 33.33%";
    if summary.summary_line() != expected {
        return Err(format!("Expected '{}', got '{}'", expected, summary.summary_line()));
    }
    if !summary.has_errors() {
        return Err("Expected errors to be reported".to_owned());
    }
    Ok(())
}

#[test]
fn summary_with_only_failures_prints_na() -> Result<(), String> {
    let mut stats = RunStatistics::new();
    for _ in 0..4 {
        stats.record(&network("refused"));
    }
    let summary = RunSummary::from_stats(&stats, Duration::from_millis(5));
    let expected = "Rps: 0.00 Avg: n/a Worst: n/a Best: n/a Errors: 100.00%";
    if summary.summary_line() != expected {
        return Err(format!("Expected '{}', got '{}'", expected, summary.summary_line()));
    }
    Ok(())
}

#[test]
fn summary_with_zero_elapsed_does_not_divide() -> Result<(), String> {
    let summary = RunSummary::from_stats(&RunStatistics::new(), Duration::ZERO);
    if summary.rps_x100 != 0 || summary.error_rate_x100 != 0 || summary.has_errors() {
        return Err(format!("Expected an empty summary, got {:?}", summary));
    }
    Ok(())
}

#[test]
fn format_latency_uses_duration_debug() -> Result<(), String> {
    let cases = [
        (Some(Duration::from_micros(10_500)), "10.5ms"),
        (Some(Duration::from_millis(1_200)), "1.2s"),
        (None, "n/a"),
    ];
    for (input, expected) in cases {
        let actual = format_latency(input);
        if actual != expected {
            return Err(format!("Expected {}, got {}", expected, actual));
        }
    }
    Ok(())
}

#[test]
fn advisory_points_at_echo() -> Result<(), String> {
    if !ERROR_ADVISORY.contains("--echo") {
        return Err("Advisory should mention --echo".to_owned());
    }
    Ok(())
}

#[test]
fn completion_tracker_counts_both_sides() -> Result<(), String> {
    run_async_test(async {
        let tracker = CompletionTracker::new();
        tracker.issue();
        tracker.issue();
        let progress = tracker.complete();
        if progress != (Progress { issued: 2, completed: 1 }) {
            return Err(format!("Unexpected progress: {:?}", progress));
        }

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_for_completed(2).await })
        };
        tracker.complete();
        let reached = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .map_err(|err| format!("Timed out waiting for completion: {}", err))?
            .map_err(|err| format!("Waiter join failed: {}", err))?;
        if !reached {
            return Err("Expected the target to be reached".to_owned());
        }
        Ok(())
    })
}

#[test]
fn latency_log_writes_truncated_millis() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale\n").map_err(|err| format!("seed failed: {}", err))?;

        let mut log = LatencyLog::create(&path)
            .await
            .map_err(|err| format!("create failed: {}", err))?;
        if log.path() != path.as_path() {
            return Err("Unexpected log path".to_owned());
        }
        log.append(1, 12_999_999)
            .await
            .map_err(|err| format!("append failed: {}", err))?;
        log.append(2, 500_000)
            .await
            .map_err(|err| format!("append failed: {}", err))?;
        log.finish()
            .await
            .map_err(|err| format!("finish failed: {}", err))?;

        let content =
            std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
        if content != "1,12\n2,0\n" {
            return Err(format!("Unexpected log content: {:?}", content));
        }
        Ok(())
    })
}

#[test]
fn aggregator_counts_and_logs_successes() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("agg.csv");
        let log = LatencyLog::create(&path)
            .await
            .map_err(|err| format!("create failed: {}", err))?;

        let (records_tx, records_rx) = mpsc::channel(4);
        let tracker = CompletionTracker::new();
        let handle = setup_aggregator(records_rx, Some(log), tracker.clone());

        for record in [success_ms(5), non_ok(503), success_ms(7), network("reset")] {
            records_tx
                .send(record)
                .await
                .map_err(|err| format!("send failed: {}", err))?;
        }
        drop(records_tx);

        let report = handle
            .await
            .map_err(|err| format!("aggregator join failed: {}", err))?;
        if report.stats.total() != 4 || report.stats.successes() != 2 {
            return Err(format!("Unexpected stats: {:?}", report.stats));
        }
        if report.last_completion.is_none() || report.log_error.is_some() {
            return Err(format!("Unexpected report: {:?}", report));
        }
        if tracker.progress().completed != 4 {
            return Err(format!("Unexpected progress: {:?}", tracker.progress()));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
        if content != "1,5\n2,7\n" {
            return Err(format!("Unexpected log content: {:?}", content));
        }
        Ok(())
    })
}

#[test]
fn latency_log_keeps_order_across_buffer_spills() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("spill.csv");
        let mut log = LatencyLog::create(&path)
            .await
            .map_err(|err| format!("create failed: {}", err))?;

        // ~9 bytes per line, so several 64 KiB spills happen before finish.
        for sequence in 1..=20_000_u64 {
            log.append(sequence, 3_000_000)
                .await
                .map_err(|err| format!("append {} failed: {}", sequence, err))?;
        }
        log.finish()
            .await
            .map_err(|err| format!("finish failed: {}", err))?;

        let content =
            std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
        let expected = (1..=20_000_u64).map(|sequence| format!("{},3\n", sequence));
        let expected: String = expected.collect();
        if content.len() <= 64 * 1024 {
            return Err(format!("Expected more than one buffer, got {} bytes", content.len()));
        }
        if content != expected {
            return Err("Latency log lines lost or reordered across spills".to_owned());
        }
        Ok(())
    })
}
