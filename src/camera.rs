use bevy::{input::common_conditions::input_just_pressed, prelude::*};
use bevy_pancam::{PanCam, PanCamPlugin};

use crate::{prelude::BG_COLOR, state::SimState};

pub struct CamPlugin;

impl Plugin for CamPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .insert_resource(ClearColor(BG_COLOR))
            .add_systems(OnEnter(SimState::Load), spawn_cam)
            .add_systems(
                Update,
                reset_view.run_if(input_just_pressed(KeyCode::Backspace)),
            );
    }
}

// Init
fn spawn_cam(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        // left mouse toggles cells, so panning is wheel-zoom only
        PanCam {
            grab_buttons: vec![],
            ..default()
        },
        // one world unit per window pixel, so the board tracks the window size
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::WindowSize,
            scale: 1.0,
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Msaa::Off,
    ));
}

/// Undo any zoom so the whole board is visible again.
fn reset_view(mut cams: Query<(&mut OrthographicProjection, &mut Transform), With<Camera2d>>) {
    for (mut projection, mut transform) in cams.iter_mut() {
        projection.scale = 1.0;
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }
}
