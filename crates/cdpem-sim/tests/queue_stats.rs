//! Long-run statistics of the M/M/1 simulator.

use cdpem_sim::{QueueConfig, simulate_queue, summarize_queue};

#[test]
fn stable_queue_approaches_theoretical_mean() {
    // ρ = 0.5 ⇒ long-run mean length ρ/(1−ρ) = 1
    let config = QueueConfig {
        arrival_rate: 0.5,
        service_rate: 1.0,
        horizon: 100_000.0,
        seed: Some(7),
    };
    let trace = simulate_queue(&config).unwrap();
    let summary = summarize_queue(&trace, &config);

    let expected = summary.theoretical_mean_length.unwrap();
    assert!((expected - 1.0).abs() < 1e-12);
    assert!(
        (summary.time_weighted_mean_length - expected).abs() < 0.15,
        "mean length {} too far from {}",
        summary.time_weighted_mean_length,
        expected
    );
}

#[test]
fn overloaded_queue_builds_up() {
    let config = QueueConfig {
        arrival_rate: 2.0,
        service_rate: 1.0,
        horizon: 2_000.0,
        seed: Some(3),
    };
    let trace = simulate_queue(&config).unwrap();
    let summary = summarize_queue(&trace, &config);
    assert!(!summary.is_stable());
    // Net growth rate λ − μ = 1 per unit time
    assert!(*trace.lengths.last().unwrap() > 1_000);
}
