//! Combat systems are tested by injecting `CollisionStart` and `BombDetonated`
//! messages (and the player's `CollidingEntities`) directly and running the
//! systems once on a bare world.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::plugins::clock::Task;
use crate::plugins::enemies::{Actor, EnemyKind};
use crate::plugins::movement::{Direction, MovementSpec};

fn combat_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(EnemyRegistry::default());
    world.insert_resource(TickScheduler::default());
    world.insert_resource(Score::default());
    world.insert_resource(PlayerState::new(50, 2));
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<BombDetonated>>();
    world.init_resource::<Messages<ReleaseActor>>();
    world.init_resource::<Messages<CombatCue>>();
    world
}

fn write_collision(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart { collider1: a, collider2: b, body1: None, body2: None });
}

fn enemy(world: &mut World, kind: EnemyKind, direction: Direction) -> Entity {
    let e = world.spawn(Transform::default()).id();
    let movement = MovementSpec { direction, lane: 40.0, speed: 25.0 };
    let id = world
        .resource_mut::<EnemyRegistry>()
        .spawn(Actor::new(e, kind, movement));
    let handle = world
        .resource_mut::<TickScheduler>()
        .every(5, Task::EnemyVolley(id));
    if let Some(a) = world.resource_mut::<EnemyRegistry>().get_mut(id) {
        a.attach_shot_task(handle);
    }
    e
}

fn player_touching(world: &mut World, enemies: &[Entity]) -> Entity {
    let mut touching = CollidingEntities::default();
    for &e in enemies {
        touching.0.insert(e);
    }
    world.spawn((Player, Transform::default(), touching)).id()
}

fn bullet(world: &mut World, owner: ProjectileOwner) -> Entity {
    world.spawn(Projectile { owner }).id()
}

fn released(world: &mut World) -> Vec<Entity> {
    run_system_once(world, |mut r: MessageReader<ReleaseActor>| {
        r.read().map(|m| m.entity).collect::<Vec<_>>()
    })
}

fn cues(world: &mut World) -> Vec<CombatCue> {
    run_system_once(world, |mut r: MessageReader<CombatCue>| r.read().copied().collect::<Vec<_>>())
}

#[test]
fn bullet_kills_green_and_is_consumed() {
    let mut world = combat_world();
    let target = enemy(&mut world, EnemyKind::Green, Direction::Down);
    let shot = bullet(&mut world, ProjectileOwner::Player);

    write_collision(&mut world, shot, target);
    run_system_once(&mut world, resolve_player_bullet_hits);

    assert!(world.get_entity(shot).is_err());
    assert_eq!(world.resource::<Score>().0, 10);
    assert_eq!(released(&mut world), vec![target]);
    assert!(world.resource::<TickScheduler>().live_count() == 0);
}

#[test]
fn one_bullet_only_hits_once_per_tick() {
    let mut world = combat_world();
    let a = enemy(&mut world, EnemyKind::Big, Direction::Down);
    let b = enemy(&mut world, EnemyKind::Big, Direction::Down);
    let shot = bullet(&mut world, ProjectileOwner::Player);

    write_collision(&mut world, shot, a);
    write_collision(&mut world, b, shot);
    run_system_once(&mut world, resolve_player_bullet_hits);

    let reg = world.resource::<EnemyRegistry>();
    assert_eq!(reg.lookup(a).map(|x| x.hit_points()), Some(2));
    assert_eq!(reg.lookup(b).map(|x| x.hit_points()), Some(3));
}

#[test]
fn bullet_through_a_wreck_is_not_spent() {
    let mut world = combat_world();
    let target = enemy(&mut world, EnemyKind::Green, Direction::Down);
    if let Some(a) = world.resource_mut::<EnemyRegistry>().lookup_mut(target) {
        a.take_hit(HitSource::Area);
    }

    let shot = bullet(&mut world, ProjectileOwner::Player);
    write_collision(&mut world, shot, target);
    run_system_once(&mut world, resolve_player_bullet_hits);

    assert!(world.get_entity(shot).is_ok());
    assert_eq!(world.resource::<Score>().0, 0);
}

#[test]
fn crippled_enemy_starts_smoking() {
    let mut world = combat_world();
    let target = enemy(&mut world, EnemyKind::Big, Direction::Down);

    for _ in 0..2 {
        let shot = bullet(&mut world, ProjectileOwner::Player);
        write_collision(&mut world, shot, target);
    }
    run_system_once(&mut world, resolve_player_bullet_hits);

    // 3 -> 1: below half.
    assert!(world.get::<Smoking>(target).is_some());
}

#[test]
fn bomb_with_two_charges_destroys_big_exactly_once() {
    let mut world = combat_world();
    let big = enemy(&mut world, EnemyKind::Big, Direction::Down);
    let bomber = enemy(&mut world, EnemyKind::Bomber, Direction::Down);
    let enemy_shot = bullet(&mut world, ProjectileOwner::Enemy);
    let own_shot = bullet(&mut world, ProjectileOwner::Player);

    world.write_message(BombDetonated);
    run_system_once(&mut world, resolve_bomb);

    // A bullet landing in the same tick finds the wreck.
    let late = bullet(&mut world, ProjectileOwner::Player);
    write_collision(&mut world, late, big);
    run_system_once(&mut world, resolve_player_bullet_hits);

    assert_eq!(world.resource::<Score>().0, 30);
    assert_eq!(released(&mut world), vec![big]);

    let reg = world.resource::<EnemyRegistry>();
    assert_eq!(reg.lookup(bomber).map(|a| a.hit_points()), Some(9));

    assert!(world.get_entity(enemy_shot).is_err());
    assert!(world.get_entity(own_shot).is_ok());

    let destroyed = cues(&mut world)
        .into_iter()
        .filter(|c| matches!(c, CombatCue::Destroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn ramming_plane_hurts_player_and_knocks_back() {
    let mut world = combat_world();
    let plane = enemy(&mut world, EnemyKind::Red, Direction::Left);
    let player = player_touching(&mut world, &[plane]);

    run_system_once(&mut world, resolve_enemy_contact);

    assert_eq!(world.resource::<PlayerState>().life, 49);
    // Moving left on screen pushes the player left.
    let tf = world.get::<Transform>(player).unwrap();
    assert_eq!(tf.translation.truncate(), Vec2::new(-30.0, 0.0));
    // Contact damage is 1; Red has one hit point.
    assert_eq!(world.resource::<Score>().0, 10);
    assert_eq!(cues(&mut world)[0], CombatCue::LifeLost);
}

#[test]
fn ships_never_deal_contact_damage() {
    let mut world = combat_world();
    let ship = enemy(&mut world, EnemyKind::SmallShip, Direction::Down);
    let player = player_touching(&mut world, &[ship]);

    run_system_once(&mut world, resolve_enemy_contact);

    assert_eq!(world.resource::<PlayerState>().life, 50);
    assert_eq!(world.get::<Transform>(player).unwrap().translation, Vec3::ZERO);
    assert_eq!(
        world.resource::<EnemyRegistry>().lookup(ship).map(|a| a.hit_points()),
        Some(6)
    );
}

#[test]
fn plane_shot_down_in_the_same_tick_does_not_ram() {
    let mut world = combat_world();
    let plane = enemy(&mut world, EnemyKind::Red, Direction::Left);
    let player = player_touching(&mut world, &[plane]);
    let shot = bullet(&mut world, ProjectileOwner::Player);

    write_collision(&mut world, shot, plane);
    run_system_once(&mut world, resolve_player_bullet_hits);
    run_system_once(&mut world, resolve_enemy_contact);

    assert_eq!(world.resource::<PlayerState>().life, 50);
    assert_eq!(world.get::<Transform>(player).unwrap().translation, Vec3::ZERO);
    assert_eq!(world.resource::<Score>().0, 10);
    assert_eq!(released(&mut world), vec![plane]);
}

#[test]
fn bombed_plane_does_not_ram() {
    let mut world = combat_world();
    let plane = enemy(&mut world, EnemyKind::Big, Direction::Down);
    let player = player_touching(&mut world, &[plane]);

    world.write_message(BombDetonated);
    run_system_once(&mut world, resolve_bomb);
    run_system_once(&mut world, resolve_enemy_contact);

    assert_eq!(world.resource::<PlayerState>().life, 50);
    assert_eq!(world.get::<Transform>(player).unwrap().translation, Vec3::ZERO);
    assert_eq!(world.resource::<Score>().0, 30);
}

#[test]
fn pinning_plane_rams_every_tick_it_stays_in_contact() {
    let mut world = combat_world();
    let big = enemy(&mut world, EnemyKind::Big, Direction::Up);
    let player = player_touching(&mut world, &[big]);

    run_system_once(&mut world, resolve_enemy_contact);
    run_system_once(&mut world, resolve_enemy_contact);

    assert_eq!(world.resource::<PlayerState>().life, 48);
    assert_eq!(
        world.resource::<EnemyRegistry>().lookup(big).map(|a| a.hit_points()),
        Some(1)
    );
    // Up on screen is world +y, twice.
    let tf = world.get::<Transform>(player).unwrap();
    assert_eq!(tf.translation.truncate(), Vec2::new(0.0, 60.0));

    // Third contact destroys it; a fourth finds a wreck.
    run_system_once(&mut world, resolve_enemy_contact);
    run_system_once(&mut world, resolve_enemy_contact);
    assert_eq!(world.resource::<PlayerState>().life, 47);
    assert_eq!(world.resource::<Score>().0, 30);
}

#[test]
fn enemy_bullet_costs_weapon_level_before_life() {
    let mut world = combat_world();
    world.resource_mut::<PlayerState>().weapon_level = 2;
    let player = world.spawn((Player, Transform::default())).id();

    let first = bullet(&mut world, ProjectileOwner::Enemy);
    let second = bullet(&mut world, ProjectileOwner::Enemy);
    write_collision(&mut world, first, player);
    write_collision(&mut world, player, second);
    run_system_once(&mut world, resolve_enemy_bullet_hits);

    let state = world.resource::<PlayerState>().clone();
    assert_eq!(state.weapon_level, 1);
    assert_eq!(state.life, 49);
    assert!(world.get_entity(first).is_err());
    assert!(world.get_entity(second).is_err());
    assert_eq!(cues(&mut world), vec![CombatCue::ShieldHit, CombatCue::LifeLost]);
}

#[test]
fn player_bullet_does_not_hurt_player() {
    let mut world = combat_world();
    let player = world.spawn((Player, Transform::default())).id();
    let own = bullet(&mut world, ProjectileOwner::Player);

    write_collision(&mut world, own, player);
    run_system_once(&mut world, resolve_enemy_bullet_hits);
    run_system_once(&mut world, resolve_player_bullet_hits);

    assert_eq!(world.resource::<PlayerState>().life, 50);
    assert!(world.get_entity(own).is_ok());
}
