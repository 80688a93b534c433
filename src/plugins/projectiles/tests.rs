use avian2d::prelude::*;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

#[test]
fn requests_become_projectiles_with_owner_layers() {
    let mut world = World::new();
    world.init_resource::<Messages<SpawnProjectile>>();

    world.write_message(SpawnProjectile {
        owner: ProjectileOwner::Player,
        pos: Vec2::new(1.0, 2.0),
        vel: Vec2::new(0.0, 100.0),
        accel: Vec2::ZERO,
    });
    world.write_message(SpawnProjectile {
        owner: ProjectileOwner::Enemy,
        pos: Vec2::ZERO,
        vel: Vec2::new(-50.0, 0.0),
        accel: Vec2::new(-200.0, 0.0),
    });

    run_system_once(&mut world, spawn_requested_projectiles);

    let mut q = world.query::<(&Projectile, &CollisionLayers, &LinearVelocity, Option<&Acceleration>)>();
    let mut seen = q
        .iter(&world)
        .map(|(p, l, v, a)| (p.owner, *l, v.0, a.map(|a| a.0)))
        .collect::<Vec<_>>();
    seen.sort_by_key(|(owner, ..)| *owner == ProjectileOwner::Enemy);

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, ProjectileOwner::Player);
    assert_eq!(seen[0].1, player_bullet_layers());
    assert_eq!(seen[0].3, None);
    assert_eq!(seen[1].1, enemy_bullet_layers());
    assert_eq!(seen[1].2, Vec2::new(-50.0, 0.0));
    assert_eq!(seen[1].3, Some(Vec2::new(-200.0, 0.0)));
}
