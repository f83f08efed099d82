//! Property tests for geometry, visibility and resource bounds

use glam::Vec2;
use proptest::prelude::*;

use shadowcrawl::consts::SIM_DT;
use shadowcrawl::sim::{
    Ray, Simulation, TickInput, TileGrid, WallIndex, WallSegment, compute_visibility, intersect,
};
use shadowcrawl::{Arena, Settings};

const ARENA: &str = "\
####################
#@........#........#
#....A....#...a....#
#.........#........#
#...####.......+...#
#.......A..........#
#...a.....####..A..#
#..................#
####################
";

fn arena() -> Arena {
    Arena::from_ascii(ARENA).expect("test arena parses")
}

prop_compose! {
    fn arb_input()(
        dirs in prop::array::uniform4(any::<bool>()),
        aim in (0.0f32..640.0, 0.0f32..288.0),
        triggers in prop::array::uniform4(any::<bool>()),
    ) -> TickInput {
        TickInput {
            up: dirs[0],
            down: dirs[1],
            left: dirs[2],
            right: dirs[3],
            aim: Vec2::new(aim.0, aim.1),
            fire: triggers[0],
            reload: triggers[1],
            interact: triggers[2],
            use_medkit: triggers[3],
        }
    }
}

proptest! {
    #[test]
    fn intersection_matches_analytic_solution(
        p1 in (-500.0f32..500.0, -500.0f32..500.0),
        seg_angle in 0.0f32..std::f32::consts::TAU,
        seg_len in 10.0f32..300.0,
        u in 0.05f32..0.95,
        cross_angle in 0.3f32..2.8,
        t in 0.5f32..20.0,
        dir_len in 1.0f32..50.0,
    ) {
        let p1 = Vec2::new(p1.0, p1.1);
        let p2 = p1 + Vec2::from_angle(seg_angle) * seg_len;
        let segment = WallSegment::new(p1, p2);
        let expected = p1 + (p2 - p1) * u;

        // Direction well away from parallel to the segment
        let dir = Vec2::from_angle(seg_angle + cross_angle) * dir_len;
        let ray = Ray::new(expected - dir * t, dir);

        let hit = intersect(&ray, &segment);
        prop_assert!(hit.is_some());
        let hit = hit.unwrap();
        prop_assert!((hit.point - expected).length() < 0.05);
        prop_assert!((hit.t_ray - t).abs() < 1e-3 * t.max(1.0));
    }

    #[test]
    fn intersection_never_behind_origin(
        origin in (-200.0f32..200.0, -200.0f32..200.0),
        dir_angle in 0.0f32..std::f32::consts::TAU,
        a in (-200.0f32..200.0, -200.0f32..200.0),
        b in (-200.0f32..200.0, -200.0f32..200.0),
    ) {
        let ray = Ray::new(Vec2::new(origin.0, origin.1), Vec2::from_angle(dir_angle));
        let segment = WallSegment::new(Vec2::new(a.0, a.1), Vec2::new(b.0, b.1));
        if let Some(hit) = intersect(&ray, &segment) {
            prop_assert!(hit.t_ray >= -1e-4);
        }
    }

    #[test]
    fn visibility_stays_inside_radius(
        cell in (1usize..19, 1usize..8),
        radius in 40.0f32..600.0,
    ) {
        let arena = arena();
        prop_assume!(!arena.grid.tile(cell.0, cell.1).is_wall());
        let index = WallIndex::rebuild(&arena.grid);
        let viewpoint = TileGrid::cell_center(cell.0, cell.1);

        let poly = compute_visibility(&index, viewpoint, radius, 64);
        prop_assert!(poly.len() >= 64);
        for p in &poly.points {
            prop_assert!((*p - viewpoint).length() <= radius + 1e-3);
        }
    }

    #[test]
    fn resources_stay_in_bounds(
        inputs in prop::collection::vec(arb_input(), 1..200),
        seed in any::<u64>(),
    ) {
        let settings = Settings::default();
        let mut sim = Simulation::new(arena(), settings.clone(), seed);

        for input in &inputs {
            sim.advance(SIM_DT, input);
            let p = sim.player();
            prop_assert!(p.health >= 0 && p.health <= p.max_health);
            prop_assert!(p.ammo <= p.max_ammo);
            prop_assert!(p.inventory.medkits <= settings.max_medkits);
            prop_assert!(!sim.grid().blocks_disc(p.pos, p.radius));
        }
    }

    #[test]
    fn same_seed_same_outcome(
        inputs in prop::collection::vec(arb_input(), 1..100),
        seed in any::<u64>(),
    ) {
        let mut a = Simulation::new(arena(), Settings::default(), seed);
        let mut b = Simulation::new(arena(), Settings::default(), seed);
        for input in &inputs {
            let ea = a.advance(SIM_DT, input);
            let eb = b.advance(SIM_DT, input);
            prop_assert_eq!(ea, eb);
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}
