//! End-to-end scenarios driven through the public `Simulation` API

use glam::Vec2;

use shadowcrawl::consts::SIM_DT;
use shadowcrawl::sim::{
    ActorKind, AgentState, DisplayFields, EntityKind, Faction, GameEvent, PickupKind, Simulation,
    TickInput,
};
use shadowcrawl::{Arena, Settings};

fn sim_from(text: &str, settings: Settings) -> Simulation {
    let arena = Arena::from_ascii(text).expect("arena parses");
    Simulation::new(arena, settings, 2024)
}

fn aim_at(pos: Vec2) -> TickInput {
    TickInput {
        aim: pos,
        ..Default::default()
    }
}

#[test]
fn last_bullet_then_empty_click() {
    let settings = Settings {
        fire_spread: 0.0,
        start_ammo: 1,
        ..Default::default()
    };
    let mut sim = sim_from(
        "\
##########
#@.......#
#........#
##########
",
        settings,
    );
    let start = sim.player().pos;
    let fire = TickInput {
        fire: true,
        ..aim_at(start + Vec2::new(0.0, 10.0))
    };

    let events = sim.advance(SIM_DT, &fire);
    assert_eq!(sim.player().ammo, 0);
    assert!(matches!(events.as_slice(), [GameEvent::ShotFired { .. }]));

    let shots: Vec<_> = sim
        .state()
        .entities
        .iter()
        .filter_map(|e| match &e.kind {
            EntityKind::Projectile(p) => Some(p.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].faction, Faction::Player);
    assert!(shots[0].vel.x.abs() < 1e-3 && shots[0].vel.y > 0.0);

    let before = sim.snapshot().of_kind(ActorKind::Projectile).count();
    let events = sim.advance(SIM_DT, &fire);
    assert!(events.contains(&GameEvent::AmmoEmpty));
    assert!(sim.snapshot().of_kind(ActorKind::Projectile).count() <= before);
    assert_eq!(sim.player().ammo, 0);
}

#[test]
fn agent_aggroes_through_wall_but_cannot_pass_it() {
    // Agent 7 tiles (224 units) east of the player, a wall between them
    let mut sim = sim_from(
        "\
##############
#............#
#.@....#.A...#
#......#.....#
##############
",
        Settings::default(),
    );
    let agent_id = sim.state().entities[0].id;
    let start = sim.state().entities[0].pos;
    assert!((start.distance(sim.player().pos) - 224.0).abs() < 1e-3);

    sim.advance(SIM_DT, &aim_at(sim.player().pos));
    let agent = sim.state().entity(agent_id).unwrap();
    let EntityKind::Agent(a) = &agent.kind else {
        panic!("expected agent");
    };
    assert_eq!(a.state, AgentState::Chasing);
    assert!(agent.pos.x < start.x);

    for _ in 0..120 {
        sim.advance(SIM_DT, &aim_at(sim.player().pos));
    }
    let agent = sim.state().entity(agent_id).unwrap();
    // Stopped against the east face of the wall column (x = 256)
    assert!(agent.pos.x - agent.radius >= 256.0);
}

#[test]
fn walk_to_pickup_and_collect() {
    let settings = Settings {
        start_medkits: 0,
        ..Default::default()
    };
    let mut sim = sim_from(
        "\
####################
#@................+#
####################
",
        settings,
    );
    let target = sim
        .snapshot()
        .of_kind(ActorKind::Pickup)
        .next()
        .expect("medkit placed")
        .pos;

    let walk = TickInput {
        right: true,
        ..aim_at(target)
    };
    let mut picked = false;
    for _ in 0..600 {
        let interact = sim.player().pos.distance(target) < sim.settings().pickup_reach;
        let input = TickInput { interact, ..walk };
        let events = sim.advance(SIM_DT, &input);
        if events.contains(&GameEvent::ItemPickedUp {
            kind: PickupKind::Medkit,
        }) {
            picked = true;
            break;
        }
    }
    assert!(picked);
    assert_eq!(sim.player().inventory.medkits, 1);
    assert_eq!(sim.snapshot().of_kind(ActorKind::Pickup).count(), 0);
}

#[test]
fn agent_hidden_behind_wall_is_outside_visibility() {
    let mut sim = sim_from(
        "\
################
#..............#
#.@....#....A..#
#......#.......#
#..............#
################
",
        Settings::default(),
    );
    let poly = sim.compute_visibility().clone();
    let agent = sim.snapshot().of_kind(ActorKind::Agent).next().unwrap().pos;

    assert!(poly.contains(sim.player().pos + Vec2::new(40.0, 0.0)));
    assert!(!poly.contains(agent));
    for p in &poly.points {
        assert!(p.distance(poly.origin) <= sim.settings().view_radius + 1e-3);
    }
}

#[test]
fn shot_agent_drops_loot_and_reports_kill() {
    let settings = Settings {
        fire_spread: 0.0,
        loot_drop_chance: 1.0,
        agent_health: 10,
        ..Default::default()
    };
    let mut sim = sim_from(
        "\
####################
#@.................#
#..................#
#..........A.......#
####################
",
        settings,
    );
    let agent = sim.snapshot().of_kind(ActorKind::Agent).next().unwrap().pos;

    let mut fired = false;
    let mut killed = false;
    for _ in 0..240 {
        let target = sim
            .snapshot()
            .of_kind(ActorKind::Agent)
            .next()
            .map_or(agent, |e| e.pos);
        let input = TickInput {
            fire: !fired,
            ..aim_at(target)
        };
        fired = true;
        let events = sim.advance(SIM_DT, &input);
        if events.contains(&GameEvent::EntityKilled {
            kind: ActorKind::Agent,
        }) {
            killed = true;
            break;
        }
    }
    assert!(killed);
    assert_eq!(sim.player().kills, 1);
    let loot = sim.snapshot();
    let dropped = loot.of_kind(ActorKind::Pickup).next().unwrap();
    assert!(matches!(dropped.display, DisplayFields::Pickup { .. }));
    assert!(dropped.pos.distance(agent) < 1.0);
}
