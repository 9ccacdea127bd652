//! The built-in island and its scripted play-through.

use isle_actor::{
    ActionDescriptor, ActorClass, Control, LocationDef, Notification, PathDef, Session,
    TriggerDef, WorldScript,
};
use isle_math::Vec3;

use crate::frame::{Cue, ScheduledCue};

pub const CONTAINER: &str = "isle";
pub const HELICOPTER: &str = "Helicopter_Actor";
pub const SKATEBOARD: &str = "SkateBoard_Actor";
pub const PIZZA: &str = "Pizza_Actor";

/// A small island: a boardwalk for the skateboard, a helipad with a flight
/// loop over the bay, and the pizzeria.
#[must_use]
pub fn island_script(pizza_time_limit: Option<u32>) -> WorldScript {
    let mut pizza = ActionDescriptor::new(0x30, CONTAINER, PIZZA, ActorClass::Pizza)
        .with_location("pizzeria");
    pizza.duration = pizza_time_limit;

    WorldScript {
        paths: vec![
            PathDef {
                name: "boardwalk".into(),
                points: vec![
                    Vec3::new(-20.0, 0.0, 0.0),
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(0.0, 0.0, 30.0),
                ],
                triggers: vec![TriggerDef {
                    id: 1,
                    distance: 20.0,
                }],
            },
            PathDef {
                name: "bay_loop".into(),
                points: vec![
                    Vec3::new(40.0, 25.0, 0.0),
                    Vec3::new(120.0, 25.0, 0.0),
                    Vec3::new(120.0, 30.0, 80.0),
                    Vec3::new(40.0, 25.0, 80.0),
                    Vec3::new(40.0, 25.0, 0.0),
                ],
                triggers: Vec::new(),
            },
        ],
        locations: vec![
            LocationDef {
                name: "helipad".into(),
                position: Vec3::new(40.0, 0.0, -10.0),
                direction: Vec3::Z,
                up: Vec3::Y,
            },
            LocationDef {
                name: "pizzeria".into(),
                position: Vec3::new(-5.0, 0.0, 12.0),
                direction: Vec3::NEG_X,
                up: Vec3::Y,
            },
        ],
        actions: vec![
            ActionDescriptor::new(0x10, CONTAINER, SKATEBOARD, ActorClass::SkateBoard)
                .with_path("boardwalk")
                .with_speed(6.0),
            ActionDescriptor::new(0x20, CONTAINER, HELICOPTER, ActorClass::Helicopter)
                .with_location("helipad")
                .with_path("bay_loop")
                .with_speed(15.0),
            pizza,
        ],
    }
}

/// Input for a run over the built-in island: a skateboard ride, a flight
/// and a pizza delivery. Actors missing from the session are skipped.
#[must_use]
pub fn scenario(session: &Session) -> Vec<ScheduledCue> {
    let world = session.world();
    let mut cues = Vec::new();

    if let Some(skateboard) = world.find_id(CONTAINER, SKATEBOARD) {
        cues.push(ScheduledCue {
            frame: 5,
            cue: Cue::Post(Notification::click(skateboard)),
        });
    }

    if let Some(helicopter) = world.find_id(CONTAINER, HELICOPTER) {
        let post = |frame, notification| ScheduledCue {
            frame,
            cue: Cue::Post(notification),
        };
        cues.extend([
            post(10, Notification::click(helicopter)),
            post(12, Notification::control(helicopter, Control::Takeoff)),
            post(240, Notification::control(helicopter, Control::Land)),
            post(300, Notification::control(helicopter, Control::Exit)),
        ]);
    }

    if let Some(pizza) = world.find_id(CONTAINER, PIZZA) {
        cues.push(ScheduledCue {
            frame: 320,
            cue: Cue::StartPizza(pizza),
        });
    }
    cues
}

#[cfg(test)]
mod tests {
    use isle_actor::{Helicopter, Pizza};
    use isle_state::{Act1State, HelicopterState, PizzaMissionState};

    use super::*;
    use crate::config::AppConfig;
    use crate::frame::FrameLoop;

    #[test]
    fn test_island_loads() {
        let mut session = Session::default();
        let ids = session.load_script(&island_script(Some(40))).unwrap();
        assert_eq!(ids.len(), 3);
        let pizza = session.world().find_id(CONTAINER, PIZZA).unwrap();
        let pizza = session.actor::<Pizza>(pizza).unwrap();
        assert_eq!(pizza.time_limit(), 40);
        assert!(pizza.skateboard().is_some());
        assert_eq!(scenario(&session).len(), 6);
    }

    #[test]
    fn test_full_play_through() {
        let config = AppConfig {
            max_ticks: 600,
            realtime: false,
            ..AppConfig::default()
        };
        let mut session = Session::default();
        session
            .load_script(&island_script(config.pizza_time_limit))
            .unwrap();
        let cues = scenario(&session);
        let summary = FrameLoop::new(config, cues).run(&mut session);
        assert_eq!(summary.frames, 600);
        assert_eq!(summary.dropped, 0);

        let registry = session.game_state().registry();
        assert_eq!(
            *registry.get::<HelicopterState>().unwrap(),
            HelicopterState::default()
        );
        assert_eq!(
            registry.get::<Act1State>().unwrap().mission,
            Act1State::NO_MISSION
        );
        let mission = registry.get::<PizzaMissionState>().unwrap();
        assert!(!mission.active);
        assert_eq!(mission.entry(1).unwrap().attempts, 1);
        assert!(session.game_state().music_enabled());

        let helicopter = session.world().find_id(CONTAINER, HELICOPTER).unwrap();
        assert_eq!(
            session.world().get(helicopter).unwrap().transform().position(),
            Vec3::new(40.0, 0.0, -10.0)
        );
        assert!(session.actor::<Helicopter>(helicopter).unwrap().pending_animation().is_none());
    }
}
