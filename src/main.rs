use std::path::PathBuf;

use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
    window::WindowResolution,
};
use toroidal_life::{
    camera::CamPlugin, config::Settings, hud::HudPlugin, life::LifePlugin, prelude::SETTINGS_FILE,
    state::SimState,
};

fn main() {
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let loaded = Settings::load_optional(&settings_path);
    let settings = loaded
        .as_ref()
        .ok()
        .and_then(|settings| settings.clone())
        .unwrap_or_default();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(ImagePlugin::default_nearest())
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Game of Life".into(),
                    resizable: true,
                    focused: true,
                    present_mode: bevy::window::PresentMode::AutoNoVsync,
                    mode: bevy::window::WindowMode::Windowed,
                    resolution: WindowResolution::new(
                        settings.window_width,
                        settings.window_height,
                    ),
                    ..default()
                }),
                ..default()
            }),
    );
    // logging is only up once DefaultPlugins are in
    if let Err(err) = loaded {
        warn!("ignoring {}: {err}", settings_path.display());
    }

    app.add_plugins(MeshPickingPlugin)
        .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
        .insert_resource(settings)
        .init_state::<SimState>()
        .add_plugins((CamPlugin, LifePlugin, HudPlugin))
        .run();
}
