use bevy::prelude::*;

use crate::{
    config::Settings, engine::Engine, life::Life, prelude::*, scheduler::Driver, state::SimState,
};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(SimState::Load), spawn_hud).add_systems(
            Update,
            update_hud.run_if(
                resource_changed::<Life>
                    .or(resource_changed::<Driver>)
                    .or(state_changed::<SimState>),
            ),
        );
    }
}

#[derive(Component)]
struct HudText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        HudText,
        Text::new(""),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(HUD_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(6.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn update_hud(
    life: Res<Life>,
    driver: Res<Driver>,
    state: Res<State<SimState>>,
    settings: Res<Settings>,
    mut hud: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = hud.get_single_mut() else {
        return;
    };
    text.0 = status_line(&life, status(*state.get(), &driver, &life), settings.resolution);
}

fn status(state: SimState, driver: &Driver, engine: &Engine) -> &'static str {
    match state {
        SimState::Load => "Loading",
        SimState::Running if driver.stop_requested() => "Stopping",
        SimState::Running => "Running",
        SimState::Paused if engine.is_stagnant() => "Stagnant",
        SimState::Paused => "Paused",
    }
}

fn status_line(engine: &Engine, status: &str, resolution: u32) -> String {
    format!(
        "Generation: {}   Live: {}   {}x{} @ {}px   [{}]",
        engine.generation(),
        engine.live_cells(),
        engine.width(),
        engine.height(),
        resolution,
        status
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{engine::StagnationThreshold, patterns::BLOCK};

    #[test]
    fn status_reflects_driver_and_engine() {
        let mut engine = Engine::new(6, 6, StagnationThreshold::Fixed(1));
        let mut driver = Driver::new(true);
        assert_eq!(status(SimState::Paused, &driver, &engine), "Paused");
        assert_eq!(status(SimState::Running, &driver, &engine), "Running");

        driver.request_stop();
        assert_eq!(status(SimState::Running, &driver, &engine), "Stopping");

        engine.stamp(&BLOCK, 1, 1);
        engine.step();
        assert_eq!(status(SimState::Paused, &driver, &engine), "Stagnant");
    }

    #[test]
    fn status_line_format() {
        let mut engine = Engine::new(40, 30, StagnationThreshold::default());
        engine.stamp(&BLOCK, 0, 0);
        engine.step();
        assert_eq!(
            status_line(&engine, "Paused", 20),
            "Generation: 1   Live: 4   40x30 @ 20px   [Paused]"
        );
    }
}
