pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod hud;
pub mod life;
pub mod patterns;
pub mod scheduler;
pub mod state;

pub mod prelude {
    use bevy::{color::Color, math::Vec2};

    pub const SETTINGS_FILE: &str = "life.json";

    pub const UPDATE_INTERVAL_MS: u64 = 150;
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_WINDOW_SIZE: Vec2 = Vec2::new(800.0, 800.0);
    pub const BG_COLOR: Color = Color::srgb(0.0, 0.0, 0.0);

    pub const DEFAULT_RESOLUTION_PX: u32 = 20;
    pub const MIN_RESOLUTION_PX: u32 = 5;
    pub const MAX_RESOLUTION_PX: u32 = 80;
    pub const RESOLUTION_STEP_PX: u32 = 5;

    pub const BOARD_POS: Vec2 = Vec2::ZERO;
    pub const HUD_HEIGHT_PX: f32 = 32.0;
    pub const HUD_FONT_SIZE: f32 = 18.0;
    pub const HUD_TEXT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);

    pub const CELL_SCALE: Vec2 = Vec2::splat(0.9);
    pub const CELL_ALIVE_COLOR: Color = Color::srgb(0.05, 0.05, 0.05);
    pub const CELL_DEAD_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
    pub const CELL_HOVERED_ALIVE_COLOR: Color = Color::srgb(0.2, 0.4, 1.0);
    pub const CELL_HOVERED_DEAD_COLOR: Color = Color::srgb(0.7, 0.8, 1.0);
}
