//! Behavioural properties of complete runs.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};
use repairsim_simulation::{
    RepairConfig, RepairSimulation, RunOutcome, RunReport, SimulationError, Snapshot,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Run with exponential breakdown/repair times drawn from one seeded stream.
fn exponential_run(
    seed: u64,
    config: RepairConfig,
    mean_breakdown: f64,
    mean_repair: f64,
) -> Result<RunReport, SimulationError> {
    let rng = Rc::new(RefCell::new(ChaCha8Rng::seed_from_u64(seed)));
    let breakdown = Exp::new(1.0 / mean_breakdown).unwrap();
    let repair = Exp::new(1.0 / mean_repair).unwrap();

    let breakdown_rng = Rc::clone(&rng);
    let repair_rng = rng;
    RepairSimulation::new(
        config,
        move || breakdown.sample(&mut *breakdown_rng.borrow_mut()),
        move || repair.sample(&mut *repair_rng.borrow_mut()),
    )?
    .run()
}

fn captured(n_operating: usize, n_spares: usize) -> RepairConfig {
    RepairConfig::new(n_operating, n_spares)
        .with_capture_states(true)
        .with_horizon(1e6)
}

fn snap(time: f64, down: usize, waiting: usize, completion: Option<f64>) -> Snapshot {
    Snapshot {
        time,
        down,
        repair_queue_len: waiting,
        next_repair_completion: completion,
    }
}

#[test]
fn test_queue_invariant_holds_in_every_snapshot() {
    for seed in 0..50 {
        let report = exponential_run(seed, captured(5, 3), 10.0, 2.0).unwrap();
        for s in &report.snapshots {
            assert_eq!(
                s.repair_queue_len + s.in_service(),
                s.down,
                "seed {seed}: {s:?}"
            );
            if !s.repair_in_progress() {
                assert_eq!(s.down, 0, "seed {seed}: idle server with units down");
                assert!(s.next_repair_time().is_infinite());
            }
        }
    }
}

#[test]
fn test_server_never_idles_with_backlog() {
    for seed in 0..50 {
        let report = exponential_run(seed, captured(4, 2), 5.0, 4.0).unwrap();
        assert!(report
            .snapshots
            .iter()
            .filter(|s| s.repair_queue_len > 0)
            .all(|s| s.repair_in_progress()));
    }
}

#[test]
fn test_time_is_monotonic() {
    for seed in 0..50 {
        let report = exponential_run(seed, captured(3, 4), 8.0, 3.0).unwrap();
        assert!(report.snapshots.windows(2).all(|w| w[0].time <= w[1].time));
        assert!(report
            .snapshots
            .iter()
            .all(|s| s.next_repair_time() >= s.time));
    }
}

#[test]
fn test_run_stops_at_first_event_exceeding_spares() {
    for seed in 0..50 {
        let n_spares = 2;
        let report = exponential_run(seed, captured(3, n_spares), 6.0, 3.0).unwrap();
        if report.outcome == RunOutcome::HorizonReached {
            continue;
        }

        let (last, earlier) = report.snapshots.split_last().unwrap();
        assert_eq!(report.failure_time(), Some(last.time));
        assert_eq!(last.down, n_spares + 1);
        assert!(earlier.iter().all(|s| s.down <= n_spares));
        assert_eq!(report.events_processed as usize, report.snapshots.len() - 1);
    }
}

#[test]
fn test_fixed_generators_produce_exact_trace() {
    let config = RepairConfig::new(2, 3).with_capture_states(true);
    let report = RepairSimulation::new(config, || 1.0, || 3.0)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(
        report.snapshots,
        vec![
            snap(0.0, 0, 0, None),
            snap(1.0, 1, 0, Some(4.0)),
            snap(1.0, 2, 1, Some(4.0)),
            snap(2.0, 3, 2, Some(4.0)),
            snap(2.0, 4, 3, Some(4.0)),
        ]
    );
    assert_eq!(report.failure_time(), Some(2.0));
    assert_eq!(report.events_processed, 4);
}

#[test]
fn test_seeded_runs_replay_bit_for_bit() {
    let bits = |report: &RunReport| -> Vec<(u64, usize, usize, u64)> {
        report
            .snapshots
            .iter()
            .map(|s| {
                (
                    s.time.to_bits(),
                    s.down,
                    s.repair_queue_len,
                    s.next_repair_time().to_bits(),
                )
            })
            .collect()
    };

    for seed in [1, 7, 42] {
        let a = exponential_run(seed, captured(4, 3), 9.0, 2.5).unwrap();
        let b = exponential_run(seed, captured(4, 3), 9.0, 2.5).unwrap();
        assert_eq!(a.end_time.to_bits(), b.end_time.to_bits());
        assert_eq!(bits(&a), bits(&b));
    }
}

#[test]
fn test_single_unit_without_spares_fails_at_first_breakdown() {
    for breakdown in [0.25, 1.0, 1234.5] {
        let config = RepairConfig::new(1, 0).with_capture_states(true);
        let report = RepairSimulation::new(config, move || breakdown, || 10.0)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(report.failure_time(), Some(breakdown));
        assert_eq!(report.snapshots.last().map(|s| s.down), Some(1));
    }
}

#[test]
fn test_simultaneous_seeded_breakdowns_exhaust_spares() {
    // All three units are seeded at t = 10, so three go down at once.
    let config = RepairConfig::new(3, 2).with_capture_states(true);
    let report = RepairSimulation::new(config, || 10.0, || 1.0)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.failure_time(), Some(10.0));
    assert_eq!(report.events_processed, 3);
}

#[test]
fn test_fast_repairs_keep_at_most_one_unit_down() {
    // Staggered first breakdowns, then every unit fails 10 after its
    // replacement is installed. Each repair takes 1.
    let mut first = vec![16.0, 13.0, 10.0];
    let breakdown = move || first.pop().unwrap_or(10.0);
    let config = RepairConfig::new(3, 2).with_capture_states(true);

    let report = RepairSimulation::new(config, breakdown, || 1.0)
        .unwrap()
        .run_until(1_000.0)
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::HorizonReached);
    assert!(report.events_processed > 500);
    assert!(report.snapshots.iter().all(|s| s.down <= 1));
}

#[test]
fn test_invalid_repair_draw_surfaces_as_error() {
    let mut repairs = vec![f64::NAN, 1.0];
    let sim = RepairSimulation::new(RepairConfig::new(1, 5), || 2.0, move || {
        repairs.pop().unwrap_or(1.0)
    })
    .unwrap();

    // The first repair draw is fine, the second is NaN.
    let err = sim.run_until(100.0).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidDraw { value, .. } if value.is_nan()));
}
