//! Integration tests for the collision tick cycle.
//!
//! These drive a [`CollisionWorld`] through several steps the way a game
//! loop would: move bodies, step, then read monitors and contact events.

use std::f64::consts::FRAC_PI_4;

use hitbox_world::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn events_for(report: &StepReport, body: BodyId) -> Vec<&ContactEvent> {
    report.events.iter().filter(|e| e.body == body).collect()
}

// ---------------------------------------------------------------------------
// Movement over several ticks
// ---------------------------------------------------------------------------

#[test]
fn ball_rolling_into_wall() {
    init_tracing();
    let mut world = CollisionWorld::default();
    let ball = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let wall = world.spawn(Rect::new(5.0, -5.0, 2.0, 10.0)).unwrap();

    // Approaching: no contact until the ball's edge passes x = 5.
    for x in [1.0, 2.0, 3.0, 4.0] {
        world.set_pose(ball, Vec2::new(x, 0.0), 0.0).unwrap();
        let report = world.step();
        assert!(report.pairs.is_empty(), "no contact at x = {x}");
        assert_eq!(world.monitor(ball).unwrap().right(), None);
    }

    // First touch.
    world.set_pose(ball, Vec2::new(4.5, 0.0), 0.0).unwrap();
    let report = world.step();
    assert_eq!(report.pairs.len(), 1);
    assert_eq!(world.monitor(ball).unwrap().right(), Some(vec![wall]));
    assert_eq!(world.monitor(wall).unwrap().left(), Some(vec![ball]));

    let ball_events = events_for(&report, ball);
    assert!(ball_events
        .iter()
        .any(|e| e.view == Some(Direction::Right) && e.other == wall));
    assert!(ball_events.iter().all(|e| e.tick == report.tick));

    // Resting against the wall: contact persists, no new events.
    let report = world.step();
    assert_eq!(world.monitor(ball).unwrap().right(), Some(vec![wall]));
    assert!(report.events.is_empty());

    // Bounce back.
    world.set_pose(ball, Vec2::new(2.0, 0.0), 0.0).unwrap();
    world.step();
    assert_eq!(world.monitor(ball).unwrap().general(), None);
    assert_eq!(world.last_monitor(ball).unwrap().right(), Some(vec![wall]));
}

#[test]
fn landing_then_walking_off_a_ledge() {
    init_tracing();
    let mut world = CollisionWorld::default();
    let player = world.spawn(Rect::new(0.0, -3.0, 2.0, 2.0)).unwrap();
    let ledge = world.spawn(Rect::new(-10.0, 0.0, 12.0, 2.0)).unwrap();

    world.step();
    assert_eq!(world.monitor(player).unwrap().bottom(), None, "still falling");

    // Sink slightly into the ledge top.
    world.set_pose(player, Vec2::new(1.0, -0.9), 0.0).unwrap();
    world.step();
    assert_eq!(world.monitor(player).unwrap().bottom(), Some(vec![ledge]));
    assert_eq!(world.monitor(ledge).unwrap().top(), Some(vec![player]));

    // Walk right past the edge at x = 2.
    world.set_pose(player, Vec2::new(3.5, -0.9), 0.0).unwrap();
    world.step();
    assert_eq!(world.monitor(player).unwrap().bottom(), None);
}

#[test]
fn tilted_crate_touches_ground() {
    let mut world = CollisionWorld::default();
    // A 10x10 crate turned 45 degrees: its lowest corner sits at
    // y = 5 + 5 * sqrt(2) ~= 12.07.
    let crate_body = world
        .spawn(Rect::rotated(0.0, 0.0, 10.0, 10.0, FRAC_PI_4))
        .unwrap();
    let ground = world.spawn(Rect::new(-20.0, 12.0, 40.0, 5.0)).unwrap();

    world.step();
    assert_eq!(world.monitor(crate_body).unwrap().bottom(), Some(vec![ground]));

    world.set_shape(ground, Rect::new(-20.0, 12.2, 40.0, 5.0)).unwrap();
    world.step();
    assert_eq!(world.monitor(crate_body).unwrap().general(), None);
}

#[test]
fn diamond_against_circles() {
    let mut world = CollisionWorld::default();
    let diamond = world
        .spawn(Rect::rotated(0.0, 0.0, 10.0, 10.0, FRAC_PI_4))
        .unwrap();
    let far = world.spawn(Circle::new(20.0, 5.0, 3.0)).unwrap();
    let near = world.spawn(Circle::new(9.0, 5.0, 3.0)).unwrap();

    world.step();
    let monitor = world.monitor(diamond).unwrap();
    assert!(monitor.has(near));
    assert!(!monitor.has(far));
    assert_eq!(monitor.right(), Some(vec![near]));
}

// ---------------------------------------------------------------------------
// Liveness
// ---------------------------------------------------------------------------

#[test]
fn despawned_enemy_is_pruned() {
    init_tracing();
    let mut world = CollisionWorld::default();
    let player = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let enemy = world.spawn(Circle::new(1.5, 0.0, 1.0)).unwrap();

    world.step();
    assert!(world.monitor(player).unwrap().has(enemy));

    assert!(world.despawn(enemy));
    world.step();
    assert_eq!(world.monitor(player).unwrap().len(), 0);
    assert!(!world.last_monitor(player).unwrap().has(enemy));
    assert_eq!(world.body_count(), 1);
}

#[test]
fn recycled_handle_does_not_inherit_contacts() {
    let mut world = CollisionWorld::default();
    let player = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let enemy = world.spawn(Circle::new(1.5, 0.0, 1.0)).unwrap();
    world.step();

    world.despawn(enemy);
    let newcomer = world.spawn(Circle::new(100.0, 0.0, 1.0)).unwrap();
    assert_eq!(newcomer.index(), enemy.index());

    world.step();
    let monitor = world.monitor(player).unwrap();
    assert!(!monitor.has(enemy));
    assert!(!monitor.has(newcomer));
}

#[test]
fn stale_handles_report_errors() {
    let mut world = CollisionWorld::default();
    let body = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    world.despawn(body);

    let err = world.shape(body).unwrap_err();
    assert!(matches!(err, WorldError::StaleBody { body: b } if b == body));
    assert!(err.to_string().contains("does not exist"));
    assert!(world.duplicate(body).is_err());
    assert!(world.clear_contacts(body).is_err());
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn threshold_from_json_changes_views() {
    let config = CollisionConfig::from_json_str(r#"{ "direction_threshold": 0.9 }"#).unwrap();
    let mut world = CollisionWorld::new(config).unwrap();

    let a = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    // Diagonal contact: both normal components are ~0.707.
    let b = world.spawn(Circle::new(1.0, 1.0, 1.0)).unwrap();

    world.step();
    let monitor = world.monitor(a).unwrap();
    assert_eq!(monitor.general(), Some(vec![b]));
    assert_eq!(monitor.right(), None);
    assert_eq!(monitor.bottom(), None);

    let mut default_world = CollisionWorld::default();
    let a = default_world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let b = default_world.spawn(Circle::new(1.0, 1.0, 1.0)).unwrap();
    default_world.step();
    let monitor = default_world.monitor(a).unwrap();
    assert_eq!(monitor.right(), Some(vec![b]));
    assert_eq!(monitor.bottom(), Some(vec![b]));
}

#[test]
fn bad_config_is_rejected() {
    assert!(CollisionConfig::from_json_str(r#"{ "direction_threshold": "high" }"#).is_err());
    assert!(CollisionConfig::from_json_str(r#"{ "direction_threshold": 1.0 }"#).is_err());
}

// ---------------------------------------------------------------------------
// Report shape
// ---------------------------------------------------------------------------

#[test]
fn pairs_are_reported_in_handle_order() {
    let mut world = CollisionWorld::default();
    let ids: Vec<BodyId> = (0..4)
        .map(|i| world.spawn(Circle::new(i as f64, 0.0, 1.0)).unwrap())
        .collect();

    let report = world.step();
    let got: Vec<(BodyId, BodyId)> = report.pairs.iter().map(|p| (p.body_a, p.body_b)).collect();
    // Neighbours are 1 apart (overlap); two apart is tangent (no overlap).
    assert_eq!(got, vec![(ids[0], ids[1]), (ids[1], ids[2]), (ids[2], ids[3])]);
    for pair in &report.pairs {
        assert_eq!(pair.normal, RIGHT);
    }
}

#[test]
fn ticks_advance_once_per_step() {
    let mut world = CollisionWorld::default();
    for expected in 1..=3 {
        assert_eq!(world.step().tick, expected);
    }
    assert_eq!(world.tick(), 3);
}

#[test]
fn duplicated_body_collides_like_its_source() {
    let mut world = CollisionWorld::default();
    let player = world.spawn(Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let ground = world.spawn(Rect::new(-10.0, 1.9, 20.0, 5.0)).unwrap();
    world.step();

    let clone = world.duplicate(player).unwrap();
    world.step();
    assert_eq!(world.monitor(clone).unwrap().bottom(), Some(vec![ground]));
    // Clone and source overlap each other completely; neither normal is
    // guaranteed to be axis-aligned, but they see each other.
    assert!(world.monitor(player).unwrap().has(clone));
    assert!(world.monitor(clone).unwrap().has(player));
}

// ---------------------------------------------------------------------------
// Collide rules
// ---------------------------------------------------------------------------

#[test]
fn one_sided_rule_vetoes_contact_for_both_bodies() {
    init_tracing();
    let mut world = CollisionWorld::default();
    let player = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let bullet = world.spawn(Circle::new(0.5, 0.0, 0.25)).unwrap();
    let enemy = world.spawn(Circle::new(-1.0, 0.0, 1.0)).unwrap();

    // The player ignores its own bullet; the bullet has no rule.
    world.set_collide_rule(player, move |other| other != bullet).unwrap();
    assert!(!world.can_collide_with(player, bullet));
    assert!(!world.can_collide_with(bullet, player));
    assert!(world.can_collide_with(player, enemy));

    let report = world.step();
    assert!(report
        .pairs
        .iter()
        .all(|p| !(p.body_a == player && p.body_b == bullet)));
    assert!(!world.monitor(player).unwrap().has(bullet));
    assert!(!world.monitor(bullet).unwrap().has(player));
    assert!(world.monitor(player).unwrap().has(enemy));
}

#[test]
fn mutual_rules_must_both_accept() {
    let mut world = CollisionWorld::default();
    let a = world.spawn(Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let b = world.spawn(Rect::new(1.0, 0.0, 2.0, 2.0)).unwrap();

    world.set_collide_rule(a, move |other| other == b).unwrap();
    world.set_collide_rule(b, move |other| other == a).unwrap();
    world.step();
    assert!(world.monitor(a).unwrap().has(b));

    world.set_collide_rule(b, |_| false).unwrap();
    world.step();
    assert!(world.monitor(a).unwrap().is_empty());
    assert!(world.monitor(b).unwrap().is_empty());

    world.clear_collide_rule(b).unwrap();
    world.step();
    assert!(world.monitor(b).unwrap().has(a));
}

#[test]
fn queries_ignore_collide_rules() {
    let mut world = CollisionWorld::default();
    let ghost = world.spawn(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    world.set_collide_rule(ghost, |_| false).unwrap();

    let probe = Shape::from(Circle::new(2.0, 2.0, 1.0));
    assert_eq!(world.query_shape(&probe), vec![ghost]);
    assert_eq!(world.query_point(1.0, 1.0), vec![ghost]);
}

#[test]
fn duplicate_keeps_the_collide_rule() {
    let mut world = CollisionWorld::default();
    let wall = world.spawn(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    let turret = world.spawn(Circle::new(5.0, 5.0, 1.0)).unwrap();
    world.set_collide_rule(turret, move |other| other != wall).unwrap();

    let twin = world.duplicate(turret).unwrap();
    assert!(!world.can_collide_with(twin, wall));
    world.step();
    assert!(!world.monitor(wall).unwrap().has(twin));
    // The twins overlap each other and neither rule objects.
    assert!(world.monitor(twin).unwrap().has(turret));
}

#[test]
fn can_collide_with_respects_flag_and_liveness() {
    let mut world = CollisionWorld::default();
    let a = world.spawn(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let b = world.spawn(Circle::new(0.5, 0.0, 1.0)).unwrap();
    assert!(world.can_collide_with(a, b));
    assert!(!world.can_collide_with(a, a));

    world.set_can_collide(b, false).unwrap();
    assert!(!world.can_collide_with(a, b));

    world.set_can_collide(b, true).unwrap();
    world.despawn(b);
    assert!(!world.can_collide_with(a, b));
}
