use heart_battle::arena::BattleBox;
use heart_battle::entities::*;

use proptest::prelude::*;

fn arena() -> BattleBox {
    // interior x ∈ [1, 39), y ∈ [2, 20); centre (20, 11)
    BattleBox::new(0, 1, 40, 20)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── Body ──────────────────────────────────────────────────────────────────────

#[test]
fn body_cell_floors_continuous_position() {
    let b = Body::new(3.7, 5.2, 'x');
    assert_eq!(b.cell(), (3, 5));
    let b = Body::new(-0.2, 0.0, 'x');
    assert_eq!(b.cell(), (-1, 0));
}

#[test]
fn body_motion_is_normalized() {
    let b = Body::new(0.0, 0.0, 'x').with_motion(3.0, 4.0, 1.0);
    assert!(approx(b.dx, 0.6));
    assert!(approx(b.dy, 0.8));
}

#[test]
fn normalize_degenerate_is_zero() {
    assert_eq!(normalize(0.0, 0.0), (0.0, 0.0));
    assert_eq!(normalize(f32::NAN, 1.0), (0.0, 0.0));
}

#[test]
fn deactivate_is_idempotent() {
    let mut b = Body::new(1.0, 1.0, 'x');
    b.deactivate();
    b.deactivate();
    assert!(!b.is_active());
}

#[test]
fn within_uses_quantized_cells() {
    let a = Body::new(5.1, 5.9, 'a');
    let same_cell = Body::new(5.8, 5.0, 'b');
    let neighbour = Body::new(6.0, 5.5, 'c');
    assert!(a.within(&same_cell, 0));
    assert!(!a.within(&neighbour, 0));
    assert!(a.within(&neighbour, 1));
}

#[test]
fn inactive_bodies_never_collide() {
    let a = Body::new(5.0, 5.0, 'a');
    let mut b = Body::new(5.0, 5.0, 'b');
    b.deactivate();
    assert!(!a.within(&b, 3));
    assert!(!b.within(&a, 3));
}

// ── Heart ─────────────────────────────────────────────────────────────────────

#[test]
fn heart_diagonal_direction_is_normalized() {
    let mut h = Heart::new(20.0, 11.0, 10, 2.0);
    h.set_direction(1.0, 1.0);
    assert!(h.moving);
    assert!(approx(h.body.dx, std::f32::consts::FRAC_1_SQRT_2));
    assert!(approx(h.body.dy, std::f32::consts::FRAC_1_SQRT_2));
}

#[test]
fn heart_zero_direction_stops() {
    let mut h = Heart::new(20.0, 11.0, 10, 2.0);
    h.set_direction(0.0, 1.0);
    h.set_direction(0.0, 0.0);
    assert!(!h.moving);
    h.update(&arena());
    assert_eq!((h.body.x, h.body.y), (20.0, 11.0));
}

#[test]
fn heart_horizontal_motion_scaled_by_aspect_ratio() {
    let a = arena();
    let mut h = Heart::new(20.0, 11.0, 10, 2.0);
    h.set_direction(1.0, 0.0);
    h.update(&a);
    assert!(approx(h.body.x, 20.0 + HEART_SPEED * 2.0));
    assert!(approx(h.body.y, 11.0));

    h.set_direction(0.0, 1.0);
    h.update(&a);
    assert!(approx(h.body.y, 11.0 + HEART_SPEED));
}

#[test]
fn heart_clamped_inside_arena() {
    let a = arena();
    let mut h = Heart::new(38.9, 19.9, 10, 2.0);
    h.set_direction(1.0, 1.0);
    for _ in 0..5 {
        h.update(&a);
    }
    assert_eq!(h.body.cell(), (38, 19));
    assert!(a.contains(h.body.x, h.body.y));
}

#[test]
fn heart_take_damage_starts_grace_window() {
    let mut h = Heart::new(20.0, 11.0, 10, 2.0);
    assert!(h.take_damage(3));
    assert_eq!(h.health, 7);
    assert_eq!(h.invincibility_frames, INVINCIBILITY_FRAMES);
    assert!(h.is_invincible());
}

#[test]
fn heart_ignores_damage_while_invincible() {
    let mut h = Heart::new(20.0, 11.0, 10, 2.0);
    h.take_damage(1);
    let before = h.clone();
    for _ in 0..5 {
        assert!(!h.take_damage(4));
    }
    assert_eq!(h, before);
}

#[test]
fn heart_invincibility_decrements_each_update() {
    let a = arena();
    let mut h = Heart::new(20.0, 11.0, 10, 2.0);
    h.take_damage(1);
    h.update(&a);
    assert_eq!(h.invincibility_frames, INVINCIBILITY_FRAMES - 1);
    for _ in 0..INVINCIBILITY_FRAMES + 5 {
        h.update(&a);
    }
    assert_eq!(h.invincibility_frames, 0);
    assert!(h.take_damage(1));
}

#[test]
fn heart_health_clamps_at_zero_and_deactivates() {
    let mut h = Heart::new(20.0, 11.0, 2, 2.0);
    assert!(h.take_damage(5));
    assert_eq!(h.health, 0);
    assert!(!h.is_alive());
    assert!(!h.body.is_active());
}

#[test]
fn heart_zero_damage_is_noop() {
    let mut h = Heart::new(20.0, 11.0, 5, 2.0);
    assert!(!h.take_damage(0));
    assert_eq!(h.invincibility_frames, 0);
}

#[test]
fn heart_add_score_accumulates() {
    let mut h = Heart::new(20.0, 11.0, 5, 2.0);
    h.add_score(10);
    h.add_score(SCORE_PER_SPACESHIP);
    assert_eq!(h.score, 110);
    h.add_score(u32::MAX);
    assert_eq!(h.score, u32::MAX);
}

proptest! {
    #[test]
    fn take_damage_never_increases_health(start in 0u32..50, hits in proptest::collection::vec(0u32..10, 0..20)) {
        let a = arena();
        let mut h = Heart::new(20.0, 11.0, start, 2.0);
        let mut last = h.health;
        for amount in hits {
            h.take_damage(amount);
            prop_assert!(h.health <= last);
            last = h.health;
            h.update(&a);
        }
    }
}

// ── Spaceship ─────────────────────────────────────────────────────────────────

fn ship(x: f32, lane: f32, speed: f32, health: u32, cooldown: u32) -> Entity {
    Entity::spaceship(x, lane, speed, health, cooldown, 0.0)
}

#[test]
fn ship_moves_left() {
    let a = arena();
    let mut s = ship(30.0, 10.0, 0.2, 2, 5);
    s.update(&a);
    assert!(approx(s.body.x, 29.8));
    assert!(approx(s.body.y, 10.0));
}

#[test]
fn ship_oscillates_around_lane() {
    let a = arena();
    let mut s = Entity::spaceship(30.0, 10.0, 0.2, 2, 5, 1.0);
    let mut ys = Vec::new();
    for _ in 0..40 {
        s.update(&a);
        ys.push(s.body.y);
    }
    assert!(ys.iter().all(|&y| (y - 10.0).abs() <= 1.0 + 1e-4));
    assert!(ys.iter().any(|&y| y > 10.5));
    assert!(ys.iter().any(|&y| y < 9.5));
}

#[test]
fn ship_fires_only_after_cooldown() {
    let a = arena();
    let mut s = ship(30.0, 10.0, 0.2, 2, 5);
    assert!(!s.can_fire());
    for _ in 0..4 {
        s.update(&a);
    }
    assert!(!s.can_fire());
    s.update(&a);
    assert!(s.can_fire());
    s.reset_fire_cooldown();
    assert!(!s.can_fire());
    assert_eq!(s.ship().map(|sh| sh.fire_cooldown), Some(5));
}

#[test]
fn ship_destroyed_exactly_once() {
    let mut s = ship(30.0, 10.0, 0.2, 2, 5);
    assert!(!s.take_damage(1));
    assert!(s.is_active());
    assert!(s.take_damage(1));
    assert!(!s.is_active());
    assert!(!s.take_damage(1));
}

#[test]
fn ship_escapes_at_left_edge() {
    let a = arena();
    let mut s = ship(1.1, 10.0, 0.2, 2, 5);
    assert!(!s.has_reached_left(a.left()));
    s.update(&a);
    assert!(s.has_reached_left(a.left()));
    assert!(!s.is_active());
    assert_eq!(s.ship().map(|sh| sh.reached_left_edge), Some(true));
}

#[test]
fn ship_on_left_interior_edge_keeps_flying() {
    let a = arena();
    let mut s = ship(1.3, 10.0, 0.2, 2, 5);
    s.update(&a);
    assert!(!s.has_reached_left(a.left()));
    assert!(s.is_active());
    assert_eq!(s.ship().map(|sh| sh.reached_left_edge), Some(false));
}

#[test]
fn hazards_cannot_fire_or_take_damage() {
    let mut p = Entity::hazard(HazardKind::Projectile, 10.0, 10.0, (0.0, 10.0));
    assert!(!p.can_fire());
    assert!(!p.take_damage(5));
    assert!(p.is_active());
    assert!(!p.has_reached_left(100.0));
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[test]
fn hazard_tables() {
    assert_eq!(HazardKind::Laser.damage(), LASER_DAMAGE);
    assert_eq!(HazardKind::Projectile.score(), SCORE_PER_PROJECTILE);
    assert_eq!(HazardKind::Bomb.glyph(), BOMB_GLYPH);
    assert_eq!(SCORE_PER_SPACESHIP, 100);
}

#[test]
fn laser_flies_straight_left_regardless_of_target() {
    let l = Entity::hazard(HazardKind::Laser, 30.0, 10.0, (30.0, 0.0));
    assert_eq!((l.body.dx, l.body.dy), (-1.0, 0.0));
    assert_eq!(l.body.speed, LASER_SPEED);
    assert_eq!(l.hazard_kind(), Some(HazardKind::Laser));
}

#[test]
fn projectile_is_aimed() {
    let p = Entity::hazard(HazardKind::Projectile, 30.0, 11.0, (20.0, 11.0));
    assert!(approx(p.body.dx, -1.0));
    assert!(approx(p.body.dy, 0.0));
}

#[test]
fn laser_retired_past_margin() {
    let a = arena();
    let mut l = Entity::hazard(HazardKind::Laser, 1.5, 10.0, (0.0, 10.0));
    l.update(&a); // x = 0.5, inside the margin band
    assert!(l.is_active());
    l.update(&a); // x = -0.5, beyond it
    assert!(!l.is_active());
}

#[test]
fn bomb_counts_down_to_single_detonation() {
    let a = arena();
    let mut b = Entity::hazard(HazardKind::Bomb, 20.0, 11.0, (20.0, 11.0));
    for _ in 0..BOMB_TIMER - 1 {
        b.update(&a);
    }
    assert!(!b.is_detonating());
    assert_eq!(b.hit_radius(), 0);
    b.update(&a);
    assert!(b.is_detonating());
    assert_eq!(b.hit_radius(), BLAST_RADIUS);
    assert_eq!(b.glyph(), BLAST_GLYPH);

    let x = b.body.x;
    b.update(&a);
    assert_eq!(b.body.x, x);
}

#[test]
fn detonating_bomb_reaches_adjacent_cells() {
    let a = arena();
    let mut b = Entity::hazard(HazardKind::Bomb, 21.5, 12.5, (21.5, 12.5));
    b.body.speed = 0.0;
    if let EntityKind::Bomb { timer, .. } = &mut b.kind {
        *timer = 1;
    }
    let heart = Heart::new(20.5, 11.5, 5, 2.0);
    assert!(!b.collides_with(&heart.body));
    b.update(&a);
    assert!(b.collides_with(&heart.body));
}

#[test]
fn deactivated_entity_stays_inactive_after_update() {
    let a = arena();
    let mut p = Entity::hazard(HazardKind::Projectile, 10.0, 10.0, (0.0, 10.0));
    p.deactivate();
    let before = p.clone();
    p.update(&a);
    assert_eq!(p, before);
}

proptest! {
    #[test]
    fn ship_never_fires_twice_within_cooldown(cooldown in 1u32..20, frames in 1usize..200) {
        let a = arena();
        let mut s = Entity::spaceship(1_000.0, 10.0, 0.0, 2, cooldown, 0.0);
        let mut last_shot: Option<usize> = None;
        for frame in 0..frames {
            s.update(&a);
            if s.can_fire() {
                if let Some(prev) = last_shot {
                    prop_assert!(frame - prev >= cooldown as usize);
                }
                last_shot = Some(frame);
                s.reset_fire_cooldown();
            }
        }
    }
}
