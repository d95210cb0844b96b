use projectile_engine::{
    analytic_range, find_optimal_angle, integrate, sweep_angles, IntegratorConfig, LaunchLimits, LaunchParameters,
    PhysicalConstants, SearchConfig, TrajectoryError, TrajectoryService,
};
use proptest::prelude::*;

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "actual={actual}, expected={expected}, tolerance={tolerance}"
    );
}

fn optimum(speed: f64, constants: &PhysicalConstants, search: &SearchConfig) -> f64 {
    find_optimal_angle(speed, constants, search, &IntegratorConfig::default())
        .unwrap()
        .angle
}

#[test]
fn test_reference_regressions() {
    let service = TrajectoryService::default();
    let launch = LaunchParameters::new(45.0, 20.0);

    let numeric = service.compute_numeric(&launch, 0.01).unwrap();
    assert_close(numeric.range(), 32.1653, 1e-3);
    assert_close(numeric.max_height(), 11.0544, 1e-3);
    assert_close(numeric.flight_time(), 2.84, 1e-9);

    let analytic = service.compute_analytic(&launch).unwrap();
    assert_close(analytic.range(), 43.1378, 1e-3);

    let best = service.find_optimal_angle(20.0, &SearchConfig::default()).unwrap();
    assert_eq!(best.angle, 41.0);
    assert_close(best.max_range, 32.4521, 1e-3);
}

#[test]
fn test_numeric_converges_to_analytic_without_drag() {
    let constants = PhysicalConstants::default().without_drag();
    let config = IntegratorConfig::default().with_time_step(0.001);
    for angle in [10.0, 30.0, 45.0, 60.0, 80.0] {
        let launch = LaunchParameters::new(angle, 20.0);
        let exact = analytic_range(&launch, &constants);
        let numeric = integrate(&launch, &constants, &config).unwrap();
        let rel_err = (numeric.range() - exact).abs() / exact;
        assert!(rel_err < 0.01, "angle {angle}: relative error {rel_err}");
    }
}

#[test]
fn test_drag_free_ground_level_optimum_is_45() {
    let constants = PhysicalConstants::default().without_drag().with_launch_height(0.0);
    for step in [1.0, 0.5, 0.25] {
        let search = SearchConfig {
            angle_step_deg: step,
            time_step_s: 0.001,
            ..SearchConfig::default()
        };
        let angle = optimum(20.0, &constants, &search);
        assert!((angle - 45.0).abs() <= step, "step {step}: angle {angle}");
    }
}

#[test]
fn test_more_drag_shortens_numeric_range() {
    let config = IntegratorConfig::default();
    let launch = LaunchParameters::new(45.0, 20.0);
    let base = PhysicalConstants::default();

    let reference = integrate(&launch, &base, &config).unwrap().range();
    let dense = integrate(&launch, &base.with_air_density(2.45), &config).unwrap().range();
    let draggy = integrate(&launch, &base.with_drag_coefficient(0.94), &config).unwrap().range();

    assert_close(dense, 26.1362, 1e-3);
    assert!(dense < reference);
    // rho·Cd is all that matters, doubling either gives the same trajectory
    assert_eq!(dense, draggy);
}

#[test]
fn test_optimal_angle_decreases_with_air_density() {
    let search = SearchConfig::default();
    let angles: Vec<f64> = [0.0, 0.3, 0.6, 1.225, 2.45, 5.0, 10.0]
        .iter()
        .map(|&rho| optimum(20.0, &PhysicalConstants::default().with_air_density(rho), &search))
        .collect();

    assert!(angles.windows(2).all(|w| w[1] <= w[0]), "{angles:?}");
    assert_eq!(angles[3], 41.0);
    assert_eq!(angles[4], 38.0);
    assert!(angles[4] < angles[3]);
}

#[test]
fn test_optimal_angle_decreases_with_drag_coefficient() {
    let search = SearchConfig::default();
    let angles: Vec<f64> = [0.0, 0.2, 0.47, 0.94, 2.0]
        .iter()
        .map(|&cd| optimum(20.0, &PhysicalConstants::default().with_drag_coefficient(cd), &search))
        .collect();

    assert!(angles.windows(2).all(|w| w[1] <= w[0]), "{angles:?}");
    assert_eq!(angles, vec![44.0, 43.0, 41.0, 38.0, 36.0]);
}

#[test]
fn test_faster_launch_prefers_flatter_angle() {
    let constants = PhysicalConstants::default();
    let search = SearchConfig::default();
    assert_eq!(optimum(20.0, &constants, &search), 41.0);
    assert_eq!(optimum(50.0, &constants, &search), 36.0);
}

#[test]
fn test_zero_speed_everywhere() {
    let service = TrajectoryService::default();
    let launch = LaunchParameters::new(45.0, 0.0);
    let h = service.constants().launch_height;

    for result in [
        service.compute_numeric(&launch, 0.01).unwrap(),
        service.compute_analytic(&launch).unwrap(),
    ] {
        assert_eq!(result.len(), 1);
        assert_eq!(result.range(), 0.0);
        assert_eq!(result.max_height(), h);
        assert_eq!(result.flight_time(), 0.0);
    }

    let best = service.find_optimal_angle(0.0, &SearchConfig::default()).unwrap();
    assert_eq!(best.angle, 5.0);
    assert_eq!(best.max_range, 0.0);
}

#[test]
fn test_boundary_angles() {
    let service = TrajectoryService::default();

    let flat = service.compute_numeric(&LaunchParameters::new(0.0, 20.0), 0.01).unwrap();
    assert_close(flat.range(), 13.4860, 1e-3);
    let flat = service.compute_analytic(&LaunchParameters::new(0.0, 20.0)).unwrap();
    assert_close(flat.range(), 14.2784, 1e-3);

    for result in [
        service.compute_numeric(&LaunchParameters::new(90.0, 20.0), 0.01).unwrap(),
        service.compute_analytic(&LaunchParameters::new(90.0, 20.0)).unwrap(),
    ] {
        assert!(result.range().is_finite());
        assert!(result.range().abs() < 1e-9);
        assert!(result.max_height() > 15.0);
    }
}

#[test]
fn test_runaway_fails_whole_search() {
    let integrator = IntegratorConfig {
        max_distance_m: 10.0,
        ..IntegratorConfig::default()
    };
    let err = find_optimal_angle(20.0, &PhysicalConstants::default(), &SearchConfig::default(), &integrator)
        .unwrap_err();
    assert!(matches!(err, TrajectoryError::NonConvergence { .. }));
}

#[test]
fn test_service_shared_across_threads() {
    let service = TrajectoryService::default();
    let expected = service.compute_numeric(&LaunchParameters::new(45.0, 20.0), 0.01).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| service.compute_numeric(&LaunchParameters::new(45.0, 20.0), 0.01).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_numeric_is_idempotent(angle in 0.0f64..=90.0, speed in 0.0f64..=50.0) {
        let service = TrajectoryService::default();
        let launch = LaunchParameters::new(angle, speed);
        let a = service.compute_numeric(&launch, 0.01).unwrap();
        let b = service.compute_numeric(&launch, 0.01).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_numeric_samples_are_well_formed(angle in 0.0f64..=90.0, speed in 1.0f64..=50.0) {
        let constants = PhysicalConstants::default();
        let result = integrate(&LaunchParameters::new(angle, speed), &constants, &IntegratorConfig::default()).unwrap();
        let samples = result.samples();

        prop_assert_eq!(samples[0].x, 0.0);
        prop_assert_eq!(samples[0].y, constants.launch_height);
        prop_assert!(samples[..samples.len() - 1].iter().all(|s| s.y >= 0.0));
        prop_assert!(samples[samples.len() - 1].y < 0.0);
        prop_assert_eq!(samples[samples.len() - 1].x, result.range());
        prop_assert_eq!(result.flight_time(), (samples.len() - 1) as f64 * 0.01);
        prop_assert!(samples.iter().all(|s| s.x.is_finite() && s.y.is_finite()));
        prop_assert!(samples.windows(2).all(|w| w[1].x >= w[0].x));
    }

    #[test]
    fn prop_analytic_samples_stay_above_ground(angle in 0.0f64..=90.0, speed in 0.0f64..=50.0) {
        let service = TrajectoryService::default();
        let result = service.compute_analytic(&LaunchParameters::new(angle, speed)).unwrap();
        prop_assert!(!result.is_empty());
        prop_assert!(result.samples().iter().all(|s| s.y >= 0.0));
        prop_assert!(result.range() >= -1e-9);
        prop_assert!(result.max_height() >= service.constants().launch_height);
    }

    #[test]
    fn prop_drag_free_numeric_tracks_analytic(angle in 0.0f64..=85.0, speed in 5.0f64..=50.0) {
        let constants = PhysicalConstants::default().without_drag();
        let launch = LaunchParameters::new(angle, speed);
        let exact = analytic_range(&launch, &constants);
        let numeric = integrate(&launch, &constants, &IntegratorConfig::default().with_time_step(0.001)).unwrap();
        prop_assert!((numeric.range() - exact).abs() <= 0.01 * exact);
    }

    #[test]
    fn prop_sweep_grid_is_sorted_and_inclusive(lo in 0.0f64..45.0, span in 0.0f64..45.0, step in 0.05f64..5.0) {
        let hi = lo + span;
        let angles = sweep_angles(lo, hi, step).unwrap();
        prop_assert_eq!(angles[0], lo);
        prop_assert_eq!(*angles.last().unwrap(), hi);
        prop_assert!(angles.windows(2).all(|w| w[1] > w[0]));
        prop_assert!(angles.iter().all(|&a| a >= lo && a <= hi));
    }

    #[test]
    fn prop_clamp_lands_inside_limits(angle in -180.0f64..180.0, speed in -100.0f64..200.0) {
        let limits = LaunchLimits::interactive();
        let clamped = limits.clamp(&LaunchParameters::new(angle, speed));
        prop_assert!(limits.check(&clamped).is_ok());
        prop_assert_eq!(limits.clamp(&clamped), clamped);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_parallel_search_matches_sequential(speed in 5.0f64..=50.0) {
        let constants = PhysicalConstants::default();
        let sequential = SearchConfig { include_sweep: true, ..SearchConfig::default() };
        let parallel = SearchConfig { parallel: true, ..sequential };
        let a = find_optimal_angle(speed, &constants, &sequential, &IntegratorConfig::default()).unwrap();
        let b = find_optimal_angle(speed, &constants, &parallel, &IntegratorConfig::default()).unwrap();
        prop_assert_eq!(a, b);
    }
}
