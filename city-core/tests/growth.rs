use city_core::{Config, GrowthEngine, StepOutcome, network::RoadKey};
use glam::Vec2;

fn engine(cfg: Config) -> GrowthEngine {
    GrowthEngine::new(cfg).expect("valid config")
}

fn presets() -> [Config; 3] {
    [Config::organic(), Config::enhanced(), Config::suburban()]
}

#[test]
fn nodes_respect_reject_distance() {
    for cfg in presets() {
        let reject = cfg.reject_distance;
        let mut e = engine(cfg.with_seed(123));
        e.run(300);

        let pos = e.graph().positions();
        assert!(pos.len() > 1);
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                let d = pos[i].distance(pos[j]);
                assert!(
                    d >= reject - 1e-6,
                    "nodes {i} and {j} are {d} apart (reject = {reject})"
                );
            }
        }
    }
}

#[test]
fn roads_are_unique_and_never_self_loops() {
    for cfg in presets() {
        let mut e = engine(cfg.with_seed(7));
        e.run(300);

        let mut keys = std::collections::HashSet::new();
        for road in e.roads() {
            assert_ne!(road.a(), road.b());
            assert!(road.a() < road.b());
            assert!(keys.insert(RoadKey::new(road.a(), road.b()).unwrap()));
            assert!(road.created_at <= e.current_time());
        }
        assert_eq!(keys.len(), e.road_count());
    }
}

#[test]
fn clock_advances_only_when_a_node_is_expanded() {
    let mut e = engine(Config::default().with_seed(99));
    for _ in 0..500 {
        let before = e.current_time();
        match e.step() {
            StepOutcome::Grew(_) => assert_eq!(e.current_time(), before + 1),
            StepOutcome::Reseeded(_) | StepOutcome::Idle => {
                assert_eq!(e.current_time(), before)
            }
        }
    }
}

#[test]
fn a_step_adds_at_most_three_nodes_and_roads() {
    for cfg in presets() {
        let mut e = engine(cfg.with_seed(2024));
        for _ in 0..300 {
            let (nodes, roads) = (e.node_count(), e.road_count());
            let outcome = e.step();
            assert!(e.node_count() - nodes <= 3);
            assert!(e.road_count() - roads <= 3);
            if let StepOutcome::Grew(report) = outcome {
                assert_eq!(e.node_count() - nodes, report.created.len());
            }
        }
    }
}

#[test]
fn first_step_from_seed_42() {
    let mut cfg = Config::default().with_seed(42);
    cfg.min_distance = 0.03;
    cfg.reject_distance = 0.03;
    cfg.merge_distance = 0.015;
    let mut e = engine(cfg);

    e.step();

    assert!((1..=4).contains(&e.node_count()));
    assert_eq!(e.road_count(), e.node_count() - 1);
    assert_eq!(e.current_time(), 1);
}

#[test]
fn growth_stays_local_to_the_origin() {
    let cfg = Config::default().with_seed(42);
    let bound = 200.0 * 2.0 * cfg.min_distance;
    let mut e = engine(cfg);
    e.run(200);

    for (id, p) in e.graph().positions().iter().enumerate() {
        assert!(
            p.distance(Vec2::ZERO) <= bound,
            "node {id} at {p:?} is beyond {bound}"
        );
    }
}

#[test]
fn equal_seeds_grow_identical_networks() {
    let mut a = engine(Config::suburban().with_seed(5));
    let mut b = engine(Config::suburban().with_seed(5));
    a.run(250);
    b.run(250);

    assert_eq!(a.graph().positions(), b.graph().positions());
    assert!(a.roads().eq(b.roads()));
    assert_eq!(a.stats(), b.stats());
}

#[test]
fn cadence_rebuild_matches_lazy_rebuild() {
    // The two presets differ only in their rebuild policy.
    let mut lazy = engine(Config::enhanced().with_seed(31));
    let mut cadence = engine(Config::organic().with_seed(31));
    lazy.run(250);
    cadence.run(250);

    assert_eq!(lazy.graph().positions(), cadence.graph().positions());
    assert_eq!(lazy.road_count(), cadence.road_count());
}

#[test]
fn road_age_tracks_the_clock() {
    let mut e = engine(Config::default().with_seed(8));
    e.run(50);
    let now = e.current_time();
    for road in e.roads() {
        assert_eq!(road.age(now), now - road.created_at);
    }
    // The first road is laid on the first step.
    let oldest = e.roads().next().expect("at least one road");
    assert_eq!(oldest.created_at, 1);
}
