//! End-to-end engine scenarios

use botfighters::Tuning;
use botfighters::sim::{
    Arena, GameEvent, GameState, Intent, Match, PlayerControl, Rect, Role, TickInput,
    is_obstacle_ahead, scan, tick,
};
use glam::Vec2;

fn input(id: u32, intent: Intent) -> TickInput {
    [(id, intent)].into_iter().collect()
}

#[test]
fn thrust_accelerates_up_to_max_speed() {
    let arena = Arena::open(1000.0, 1000.0);
    let mut state = GameState::with_crafts(
        1,
        Tuning::default(),
        [(Role::Player, Vec2::new(100.0, 100.0), 0.0)],
    );
    let thrust = input(
        1,
        Intent {
            thrust: 1.0,
            ..Intent::idle()
        },
    );

    let mut last_x = state.crafts[0].pos.x;
    for _ in 0..10 {
        tick(&mut state, &arena, &thrust).unwrap();
        let craft = &state.crafts[0];
        assert!(craft.vel.x <= 8.0);
        assert!(craft.pos.x > last_x);
        assert!((craft.pos.y - 100.0).abs() < 1e-3);
        last_x = craft.pos.x;
    }
    // Capped well before ten ticks of unit thrust
    assert_eq!(state.crafts[0].vel.x, 8.0);
}

#[test]
fn bullet_hits_target_ahead() {
    let arena = Arena::open(500.0, 500.0);
    let mut state = GameState::with_crafts(
        1,
        Tuning::default(),
        [
            (Role::Player, Vec2::new(0.0, 0.0), 0.0),
            (Role::Drone, Vec2::new(50.0, 0.0), 0.0),
        ],
    );
    let fire = input(
        1,
        Intent {
            fire: true,
            ..Intent::idle()
        },
    );

    tick(&mut state, &arena, &fire).unwrap();
    let budget = (50.0f32 / 15.0).ceil() as usize;
    let mut hit_at = None;
    for t in 1..budget {
        if state.crafts[1].hp < 100 {
            break;
        }
        tick(&mut state, &arena, &TickInput::new()).unwrap();
        if state.crafts[1].hp < 100 {
            hit_at = Some(t);
            assert!(state.projectiles.is_empty());
        }
    }

    assert!(hit_at.is_some(), "no hit within {budget} ticks");
    assert_eq!(state.crafts[1].hp, 90);
    assert_eq!(state.crafts[0].hp, 100);
    assert!(state.events.iter().any(|e| matches!(
        e,
        GameEvent::CraftHit {
            target: 2,
            shooter: 1,
            hp: 90
        }
    )));
}

#[test]
fn wall_blocks_line_of_sight() {
    let walls = [Rect::new(40.0, -10.0, 20.0, 100.0)];
    assert!(!scan(Vec2::ZERO, 0.0, Vec2::new(100.0, 0.0), &walls, 1000.0));
    assert!(is_obstacle_ahead(Vec2::ZERO, 0.0, &walls, 50.0));
}

#[test]
fn destroyed_drone_is_replaced_twice() {
    let arena = Arena::labyrinth();
    let tuning = Tuning::default();
    let mut state = GameState::with_crafts(
        4,
        tuning.clone(),
        [
            (Role::Player, Vec2::new(100.0, 100.0), 0.0),
            (Role::Drone, Vec2::new(130.0, 100.0), 0.0),
        ],
    );
    state.crafts[1].hp = tuning.bullet_damage;
    let fire = input(
        1,
        Intent {
            fire: true,
            ..Intent::idle()
        },
    );

    tick(&mut state, &arena, &fire).unwrap();

    assert_eq!(state.score[0], tuning.kill_bonus);
    assert!(state.craft(2).is_none());
    let drones: Vec<_> = state.crafts.iter().filter(|c| c.role == Role::Drone).collect();
    assert_eq!(drones.len(), 2);
    for drone in drones {
        assert_eq!(drone.hp, tuning.craft_max_hp);
        assert!((0.0..360.0).contains(&drone.heading));
        let inset = tuning.spawn_inset;
        assert!(drone.pos.x >= inset && drone.pos.x <= arena.width - inset);
        assert!(drone.pos.y >= inset && drone.pos.y <= arena.height - inset);
        let bounds = drone.bounds(tuning.craft_half_size);
        assert!(arena.walls.iter().all(|w| !bounds.overlaps(w)));
    }
    let destroyed = state
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::CraftDestroyed { id: 2, .. }))
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn agent_match_keeps_invariants() {
    let mut game =
        Match::new(21, Tuning::default(), Arena::labyrinth(), PlayerControl::Agent).unwrap();
    let arena = game.arena().clone();
    let tuning = game.state().tuning.clone();

    let summary = game
        .run(600, |snapshot| {
            for craft in &snapshot.crafts {
                let max = tuning.max_speed(craft.role);
                assert!(arena.contains(craft.pos()));
                assert!(craft.vx.abs() <= max && craft.vy.abs() <= max);
                assert!((0.0..360.0).contains(&craft.angle));
                assert!(craft.hp >= 0);
            }
            for p in &snapshot.projectiles {
                assert!(p.lifespan > 0);
            }
        })
        .unwrap();

    assert!(summary.ticks > 0);
    assert_eq!(summary.player_alive, !game.is_over());
}
