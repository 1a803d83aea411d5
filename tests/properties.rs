use approx::{assert_abs_diff_eq, assert_relative_eq};
use braking_policy::simulation::{CAR_WIDTH, MAX_SPEED, WAIT_TIME};
use braking_policy::{
    BrakingSimulation, ColorBucket, FrameDriver, GaugeMapper, Pedal, Phase, Point, PolicyCatalog,
    PolicyMode, RandomSource, RngSource, SimulationState, ViewTransform,
};

/// Replays a fixed list of samples, cycling when exhausted.
struct Sequence {
    values: Vec<f64>,
    next: usize,
}

impl Sequence {
    fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for Sequence {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

fn state_with_gap(speed: f64, gap: f64) -> SimulationState {
    SimulationState {
        car_position: 50.0,
        obstacle_position: 50.0 + CAR_WIDTH + gap,
        speed,
        phase: Phase::Moving,
        wait_ticks_remaining: 0,
    }
}

fn allowed(from: Phase, to: Phase) -> bool {
    matches!(
        (from, to),
        (Phase::Moving, Phase::Moving)
            | (Phase::Moving, Phase::Braking)
            | (Phase::Braking, Phase::Braking)
            | (Phase::Braking, Phase::Waiting)
            | (Phase::Waiting, Phase::Waiting)
            | (Phase::Waiting, Phase::Moving)
    )
}

#[test]
fn speed_bound_and_phase_reachability_hold_for_every_policy() {
    let catalog = PolicyCatalog::new();
    for mode in PolicyMode::ALL {
        let policy = catalog.get(mode);
        let mut sim = BrakingSimulation::new();
        let mut rng = RngSource::seeded(mode as u64 + 11);
        let mut resets = 0;
        for _ in 0..20_000 {
            let before = sim.phase();
            let report = sim.step(&policy, &mut rng);
            let after = sim.phase();
            assert_eq!((report.from, report.to), (before, after));
            assert!(allowed(before, after), "{mode}: {before:?} -> {after:?}");
            assert!((0.0..=MAX_SPEED).contains(&sim.speed()));
            if before == Phase::Waiting && after == Phase::Moving {
                resets += 1;
            }
        }
        assert!(resets > 3, "{mode} never completed a cycle");
    }
}

#[test]
fn reset_postcondition() {
    let mut sim = BrakingSimulation::with_state(state_with_gap(77.0, 3.0));
    for sample in [0.0, 0.25, 0.5, 0.999_999] {
        sim.reset(&mut Sequence::new(&[sample]));
        let s = sim.state();
        assert_eq!(s.phase, Phase::Moving);
        assert_eq!(s.speed, 0.0);
        assert_eq!(s.car_position, 50.0);
        assert!(s.obstacle_position >= 300.0 && s.obstacle_position < 460.0);
        assert_relative_eq!(s.obstacle_position, 300.0 + 160.0 * sample);
    }
}

#[test]
fn reset_comes_wait_time_ticks_after_the_stop() {
    let policy = PolicyCatalog::new().get(PolicyMode::Timid);
    let mut sim = BrakingSimulation::with_state(SimulationState {
        phase: Phase::Braking,
        ..state_with_gap(3.0, 50.0)
    });
    let mut rng = Sequence::new(&[0.5]);
    sim.step(&policy, &mut rng);
    assert_eq!(sim.phase(), Phase::Waiting);

    // The stop tick counts towards the wait.
    let mut ticks = 1;
    while sim.phase() == Phase::Waiting {
        sim.step(&policy, &mut rng);
        ticks += 1;
    }
    assert_eq!(ticks, WAIT_TIME);
}

#[test]
fn cautious_brakes_at_speed_60_gap_40() {
    let policy = PolicyCatalog::new().get(PolicyMode::Cautious);
    let mut sim = BrakingSimulation::with_state(state_with_gap(60.0, 40.0));
    let report = sim.step(&policy, &mut Sequence::new(&[0.0]));
    assert_abs_diff_eq!(report.threshold, 28.0 + 3600.0 / 220.0 + 6.0, epsilon = 1e-12);
    assert_eq!(report.gap, 40.0);
    assert_eq!(report.pedal, Pedal::Brake);
    assert_eq!(sim.phase(), Phase::Braking);
    assert_eq!(sim.speed(), 57.0);
}

#[test]
fn risky_keeps_accelerating_at_speed_60_gap_40() {
    let policy = PolicyCatalog::new().get(PolicyMode::Risky);
    let mut sim = BrakingSimulation::with_state(state_with_gap(60.0, 40.0));
    let report = sim.step(&policy, &mut Sequence::new(&[0.0]));
    assert_abs_diff_eq!(report.threshold, -81.727_272, epsilon = 1e-5);
    assert_eq!(report.pedal, Pedal::Gas);
    assert_eq!(sim.phase(), Phase::Moving);
    assert_eq!(sim.speed(), 61.0);
    assert_abs_diff_eq!(sim.state().car_position, 50.0 + 61.0 * 0.02, epsilon = 1e-12);
}

#[test]
fn timid_brakes_earlier_than_cautious() {
    let catalog = PolicyCatalog::new();
    let first_brake_gap = |mode| {
        let policy = catalog.get(mode);
        let mut sim = BrakingSimulation::new();
        let mut rng = Sequence::new(&[0.5]);
        loop {
            let report = sim.step(&policy, &mut rng);
            if report.to == Phase::Braking {
                return report.gap;
            }
        }
    };
    let timid = first_brake_gap(PolicyMode::Timid);
    let cautious = first_brake_gap(PolicyMode::Cautious);
    let risky = first_brake_gap(PolicyMode::Risky);
    assert!(timid > cautious);
    assert!(cautious > risky);
    // Risky only reacts once past the obstacle.
    assert!(risky < 0.0);
}

#[test]
fn gauge_is_monotonic_below_jitter() {
    let gauge = GaugeMapper::default();
    let mut rng = Sequence::new(&[0.5]);
    let mut previous = gauge.map(0.0, &mut rng);
    let mut speed = 0.0;
    while speed <= 116.4 {
        let current = gauge.map(speed, &mut rng);
        assert!(current.arc_fraction >= previous.arc_fraction);
        assert!(current.needle_angle_deg >= previous.needle_angle_deg);
        previous = current;
        speed += 0.1;
    }
}

#[test]
fn gauge_color_thresholds() {
    let gauge = GaugeMapper::default();
    let mut rng = Sequence::new(&[0.5]);
    assert_eq!(gauge.map(65.9, &mut rng).color_bucket, ColorBucket::Low);
    assert_eq!(gauge.map(66.1, &mut rng).color_bucket, ColorBucket::Mid);
    assert_eq!(gauge.map(98.3, &mut rng).color_bucket, ColorBucket::Mid);
    assert_eq!(gauge.map(98.5, &mut rng).color_bucket, ColorBucket::High);
}

#[test]
fn gauge_jitter_uses_injected_randomness() {
    let gauge = GaugeMapper::default();
    let low = gauge.map(117.0, &mut Sequence::new(&[0.0]));
    let high = gauge.map(117.0, &mut Sequence::new(&[0.75]));
    let base = -135.0 + 270.0 * (117.0 / 120.0);
    assert_abs_diff_eq!(low.needle_angle_deg, base - 0.6, epsilon = 1e-9);
    assert_abs_diff_eq!(high.needle_angle_deg, base + 0.3, epsilon = 1e-9);
}

#[test]
fn coordinate_round_trip() {
    let samples = [
        (0.0, 0.0),
        (1.0, -1.0),
        (-37.25, 12.5),
        (1234.5, -987.0),
        (0.001, 49.9),
    ];
    for scale in [20.0, 33.3, 80.0, 151.0, 300.0] {
        let view = ViewTransform::new(Point::new(317.0, -42.5), scale);
        for (x, y) in samples {
            let screen = view.to_screen(x, y);
            let back = view.to_logical(screen.x, screen.y);
            assert_abs_diff_eq!(back.x, x, epsilon = 1e-9);
            assert_abs_diff_eq!(back.y, y, epsilon = 1e-9);

            // A viewport whose bottom-right corner is this point has it as right/bottom.
            let bounds = view.visible_bounds(screen.x, screen.y);
            assert_abs_diff_eq!(bounds.right, x, epsilon = 1e-9);
            assert_abs_diff_eq!(bounds.bottom, y, epsilon = 1e-9);
        }
    }
}

#[test]
fn zoom_clamps_after_repeated_events() {
    let mut view = ViewTransform::new(Point::new(0.0, 0.0), 80.0);
    for _ in 0..200 {
        view.zoom_by(1.0);
    }
    assert_eq!(view.scale(), 20.0);

    let mut view = ViewTransform::new(Point::new(0.0, 0.0), 80.0);
    for _ in 0..200 {
        view.zoom_by(-1.0);
    }
    assert_eq!(view.scale(), 300.0);
}

#[test]
fn frame_driver_runs_a_full_cycle() {
    let mut driver = FrameDriver::new(
        PolicyMode::Cautious,
        ViewTransform::centered(600.0, 640.0),
        GaugeMapper::default(),
        RngSource::seeded(42),
    );
    let mut seen_braking = false;
    let mut seen_waiting = false;
    for _ in 0..5_000 {
        let frame = driver.tick(600.0, 640.0);
        assert_eq!(frame.speed, driver.simulation().speed());
        assert_eq!(frame.gauge.readout, frame.speed.round() as i64);
        seen_braking |= frame.step.to == Phase::Braking;
        seen_waiting |= frame.step.to == Phase::Waiting;
        if seen_waiting && frame.step.to == Phase::Moving {
            return;
        }
    }
    panic!("no complete cycle (braking: {seen_braking}, waiting: {seen_waiting})");
}
