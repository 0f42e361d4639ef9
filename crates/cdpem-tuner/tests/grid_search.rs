//! Grid search against direct evaluations of the closed loop.

use cdpem_controls::PidGains;
use cdpem_estimation::SystemMatrices;
use cdpem_sim::SimConfig;
use cdpem_tuner::{PolicyGrid, TuneRequest, evaluate_policy, tune};

#[test]
fn singleton_grid_matches_direct_evaluation() {
    let request = TuneRequest {
        grid: PolicyGrid::new(vec![0.6], vec![0.02], vec![0.1]),
        seed: Some(2024),
        ..TuneRequest::default()
    };
    let result = tune(&request).unwrap();

    let direct = evaluate_policy(&SimConfig {
        steps: request.steps,
        matrices: SystemMatrices::default(),
        gains: PidGains::new(0.6, 0.02, 0.1),
        target: request.target,
        channel_sigma: request.channel_sigma,
        seed: Some(2024),
    })
    .unwrap();

    assert_eq!(result.best_gains, Some(PidGains::new(0.6, 0.02, 0.1)));
    assert_eq!(result.best_loss, direct.loss);
    assert_eq!(result.best_history, Some(direct.history));
    assert_eq!(result.evaluated, 1);
}

#[test]
fn best_loss_is_minimum_over_grid() {
    let request = TuneRequest {
        steps: 60,
        seed: Some(5),
        ..TuneRequest::default()
    };
    let result = tune(&request).unwrap();
    assert_eq!(result.evaluated, 27);

    let best = result.best_gains.unwrap();
    for gains in request.grid.iter() {
        let loss = evaluate_policy(&SimConfig {
            steps: request.steps,
            matrices: request.matrices.clone(),
            gains,
            target: request.target,
            channel_sigma: request.channel_sigma,
            seed: Some(5),
        })
        .unwrap()
        .loss;
        assert!(result.best_loss <= loss);
        if gains == best {
            assert_eq!(loss, result.best_loss);
        }
    }
}

#[test]
fn entropy_seed_is_reported_and_replayable() {
    let request = TuneRequest {
        grid: PolicyGrid::new(vec![0.2, 1.0], vec![0.05], vec![0.0]),
        steps: 30,
        seed: None,
        ..TuneRequest::default()
    };
    let first = tune(&request).unwrap();
    let replay = tune(&TuneRequest {
        seed: Some(first.seed),
        ..request
    })
    .unwrap();

    assert_eq!(first, replay);
}

#[test]
fn zero_horizon_fails_before_any_result() {
    let request = TuneRequest {
        grid: PolicyGrid::new(vec![0.6], vec![0.0], vec![0.0]),
        steps: 0,
        seed: Some(1),
        ..TuneRequest::default()
    };
    assert!(tune(&request).is_err());
}
