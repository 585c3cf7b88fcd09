#![allow(clippy::type_complexity)]

use bevy::{
    input::common_conditions::input_just_pressed,
    math::{uvec2, vec2},
    picking::pointer::PointerButton,
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};

use crate::{
    config::{grid_dimensions, Settings},
    engine::{Engine, Grid},
    error::ConfigError,
    patterns::PATTERNS,
    prelude::*,
    scheduler::{Driver, Tick},
    state::SimState,
};

const PATTERN_KEYS: [KeyCode; 6] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
];

pub struct LifePlugin;

impl Plugin for LifePlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<Settings>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(Life(Engine::new(1, 1, settings.stagnation)))
            .insert_resource(Driver::new(settings.halt_on_stagnation))
            .insert_resource(Board::default())
            .insert_resource(Reseed(settings.seed))
            .insert_resource(Time::<Fixed>::from_duration(settings.step_interval()))
            .insert_resource(settings)
            .add_event::<RebuildBoard>()
            .add_systems(
                OnEnter(SimState::Load),
                (load_meshes_and_materials, spawn_board).chain(),
            )
            .add_systems(
                FixedUpdate,
                drive_life.run_if(in_state(SimState::Running)),
            )
            .add_systems(
                Update,
                (
                    toggle_running.run_if(
                        input_just_pressed(KeyCode::Enter)
                            .and(in_state(SimState::Running).or(in_state(SimState::Paused))),
                    ),
                    step_once.run_if(
                        input_just_pressed(KeyCode::Space).and(in_state(SimState::Paused)),
                    ),
                    handle_board_kbd.run_if(not(in_state(SimState::Load))),
                    request_rebuild_on_resize.run_if(not(in_state(SimState::Load))),
                    rebuild_board.run_if(on_event::<RebuildBoard>),
                    paint_cells.run_if(resource_changed::<Life>),
                )
                    .chain(),
            )
            .add_observer(toggle_cell_on_click)
            .add_observer(cells_set_hover_on::<Pointer<Over>>(true))
            .add_observer(cells_set_hover_on::<Pointer<Out>>(false));
    }
}

// ——> SYSTEMS

/// create the shared cell mesh and materials
fn load_meshes_and_materials(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // unit square, scaled per cell so a resolution change needs no new mesh
    let mesh = meshes.add(Rectangle::new(1.0, 1.0));
    commands.insert_resource(CellAssets {
        mesh,
        alive: materials.add(ColorMaterial::from_color(CELL_ALIVE_COLOR)),
        dead: materials.add(ColorMaterial::from_color(CELL_DEAD_COLOR)),
        hovered_alive: materials.add(ColorMaterial::from_color(CELL_HOVERED_ALIVE_COLOR)),
        hovered_dead: materials.add(ColorMaterial::from_color(CELL_HOVERED_DEAD_COLOR)),
    });
}

/// size the board to the window, seed the engine and spawn one entity per cell
fn spawn_board(
    mut commands: Commands,
    window: Query<&Window, With<PrimaryWindow>>,
    mut settings: ResMut<Settings>,
    assets: Res<CellAssets>,
    reseed: Res<Reseed>,
    mut board: ResMut<Board>,
    mut life: ResMut<Life>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    let surface = surface_size(&window, &settings);
    match Board::fit(surface, settings.resolution) {
        Ok(fitted) => *board = fitted,
        Err(err) => {
            settings.resolution = board.resolution();
            warn!(
                "{err}, using a {}x{} board at {}px",
                board.size.x, board.size.y, settings.resolution
            );
        }
    }

    life.initialize(board.size.x, board.size.y, reseed.0);
    spawn_cells(&mut commands, &board, life.cells_view(), &assets);
    info!(
        "spawned a {}x{} board with {} live cells (seed {})",
        board.size.x,
        board.size.y,
        life.live_cells(),
        reseed.0
    );

    next_state.set(SimState::Paused);
}

/// Returns an observer that keeps a cell's material in sync with the pointer hovering over it.
fn cells_set_hover_on<E>(
    hovered: bool,
) -> impl Fn(
    Trigger<E>,
    Commands,
    Query<(&CellIndex, &mut MeshMaterial2d<ColorMaterial>), With<Cell>>,
    Res<Life>,
    Res<CellAssets>,
) {
    move |trigger, mut commands, mut query, life, assets| {
        let entity = trigger.entity();
        if let Ok((idx, mut material)) = query.get_mut(entity) {
            material.0 = assets.material(life.cells_view().get_index(idx.0), hovered);
            if hovered {
                commands.entity(entity).try_insert(Hovered);
            } else {
                commands.entity(entity).remove::<Hovered>();
            }
        }
    }
}

fn toggle_cell_on_click(
    trigger: Trigger<Pointer<Down>>,
    query: Query<&CellIndex, With<Cell>>,
    mut life: ResMut<Life>,
) {
    if !toggles_cell(trigger.event().button) {
        return;
    }
    let Ok(idx) = query.get(trigger.entity()) else {
        return;
    };
    let (x, y) = life.cells_view().coord(idx.0);
    if let Err(err) = life.toggle_cell(x, y) {
        warn!("ignoring click: {err}");
    }
}

fn toggle_running(
    state: Res<State<SimState>>,
    mut next_state: ResMut<NextState<SimState>>,
    mut driver: ResMut<Driver>,
) {
    match state.get() {
        SimState::Paused => {
            driver.start();
            next_state.set(SimState::Running);
            info!("running");
        }
        // a second press before the pending stop was observed cancels it
        SimState::Running if driver.stop_requested() => driver.start(),
        SimState::Running => driver.request_stop(),
        SimState::Load => unreachable!(),
    }
}

fn drive_life(
    mut life: ResMut<Life>,
    mut driver: ResMut<Driver>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    match driver.tick(&mut life) {
        Tick::Stepped(result) => {
            debug!("generation {}: {} live", result.generation, result.live_cells);
        }
        Tick::Stagnated(result) => {
            info!(
                "population stuck at {} for {} generations, stopping at generation {}",
                result.live_cells,
                life.stagnant_generations(),
                result.generation
            );
            next_state.set(SimState::Paused);
        }
        Tick::Cancelled => {
            info!("stopped at generation {}", life.generation());
            next_state.set(SimState::Paused);
        }
    }
}

fn step_once(mut life: ResMut<Life>) {
    let result = life.step();
    debug!("stepped to generation {}: {} live", result.generation, result.live_cells);
}

fn handle_board_kbd(
    keys: Res<ButtonInput<KeyCode>>,
    mut life: ResMut<Life>,
    mut reseed: ResMut<Reseed>,
    mut settings: ResMut<Settings>,
    mut rebuild: EventWriter<RebuildBoard>,
) {
    if keys.just_pressed(KeyCode::KeyC) {
        life.clear();
        info!("cleared");
    }

    if keys.just_pressed(KeyCode::KeyR) {
        reseed.0 = reseed.0.wrapping_add(1);
        life.randomize(reseed.0);
        info!("randomized with seed {}: {} live", reseed.0, life.live_cells());
    }

    let resolution = if keys.just_pressed(KeyCode::Equal) {
        settings.resolution.saturating_add(RESOLUTION_STEP_PX)
    } else if keys.just_pressed(KeyCode::Minus) {
        settings.resolution.saturating_sub(RESOLUTION_STEP_PX)
    } else {
        settings.resolution
    }
    .clamp(MIN_RESOLUTION_PX, MAX_RESOLUTION_PX);
    if resolution != settings.resolution {
        settings.resolution = resolution;
        rebuild.send(RebuildBoard);
    }

    for (key, pattern) in PATTERN_KEYS.iter().zip(PATTERNS) {
        if keys.just_pressed(*key) {
            let (w, h) = pattern.extent();
            let x = life.width().saturating_sub(w) / 2;
            let y = life.height().saturating_sub(h) / 2;
            life.stamp(pattern, x, y);
            info!("stamped {} at ({x}, {y})", pattern.name);
        }
    }
}

fn request_rebuild_on_resize(
    mut resized: EventReader<WindowResized>,
    mut rebuild: EventWriter<RebuildBoard>,
) {
    if resized.read().last().is_some() {
        rebuild.send(RebuildBoard);
    }
}

/// respawn every cell after the window or the resolution changed
fn rebuild_board(
    mut commands: Commands,
    mut events: EventReader<RebuildBoard>,
    window: Query<&Window, With<PrimaryWindow>>,
    cells: Query<Entity, With<Cell>>,
    settings: Res<Settings>,
    assets: Res<CellAssets>,
    reseed: Res<Reseed>,
    mut board: ResMut<Board>,
    mut life: ResMut<Life>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    events.clear();

    let fitted = match Board::fit(surface_size(&window, &settings), settings.resolution) {
        Ok(fitted) => fitted,
        Err(err) => {
            warn!("keeping the current board: {err}");
            return;
        }
    };
    if fitted == *board {
        return;
    }
    *board = fitted;

    for entity in cells.iter() {
        commands.entity(entity).despawn();
    }
    life.initialize(board.size.x, board.size.y, reseed.0);
    spawn_cells(&mut commands, &board, life.cells_view(), &assets);
    info!(
        "rebuilt a {}x{} board at {}px per cell",
        board.size.x, board.size.y, settings.resolution
    );

    next_state.set(SimState::Paused);
}

fn paint_cells(
    life: Res<Life>,
    assets: Res<CellAssets>,
    mut cell_query: Query<
        (&CellIndex, &mut MeshMaterial2d<ColorMaterial>, Has<Hovered>),
        With<Cell>,
    >,
) {
    let grid = life.cells_view();
    for (idx, mut material, hovered) in cell_query.iter_mut() {
        let wanted = assets.material(grid.get_index(idx.0), hovered);
        if material.0 != wanted {
            material.0 = wanted;
        }
    }
}

// ——> HELPERS

/// only the primary button edits the board
#[inline]
fn toggles_cell(button: PointerButton) -> bool {
    button == PointerButton::Primary
}

fn surface_size(window: &Query<&Window, With<PrimaryWindow>>, settings: &Settings) -> Vec2 {
    window
        .get_single()
        .map(|window| vec2(window.width(), window.height()))
        .unwrap_or(vec2(settings.window_width, settings.window_height))
}

fn spawn_cells(commands: &mut Commands, board: &Board, grid: &Grid, assets: &CellAssets) {
    let cell_scale = (board.cell_size * board.cell_scale).extend(1.0);
    let cells_to_spawn = grid
        .iter()
        .enumerate()
        .map(|(idx, (x, y, alive))| {
            (
                Cell,
                CellIndex(idx),
                Mesh2d(assets.mesh.clone()),
                MeshMaterial2d(assets.material(alive, false)),
                Transform::from_translation(board.cell_coord_to_translation(uvec2(x, y)))
                    .with_scale(cell_scale),
            )
        })
        .collect::<Vec<_>>();
    commands.spawn_batch(cells_to_spawn);
}

// ——> COMPONENTS

#[derive(Component)]
#[require(Mesh2d)]
struct Cell;

/// Row-major index of the cell this entity draws.
#[derive(Component, Debug, Clone, Copy, Deref)]
struct CellIndex(usize);

#[derive(Component)]
struct Hovered;

// ——> RESOURCES & EVENTS

/// The automaton, shared by the input, driver and render systems.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct Life(pub Engine);

/// Seed used by the next randomize or rebuild.
#[derive(Resource, Debug, Clone, Copy)]
struct Reseed(u64);

#[derive(Event, Debug, Clone, Copy)]
struct RebuildBoard;

/// hold handles for the cell mesh and materials
#[derive(Resource, Clone)]
struct CellAssets {
    mesh: Handle<Mesh>,
    alive: Handle<ColorMaterial>,
    dead: Handle<ColorMaterial>,
    hovered_alive: Handle<ColorMaterial>,
    hovered_dead: Handle<ColorMaterial>,
}

impl CellAssets {
    fn material(&self, alive: bool, hovered: bool) -> Handle<ColorMaterial> {
        match (alive, hovered) {
            (true, false) => self.alive.clone(),
            (false, false) => self.dead.clone(),
            (true, true) => self.hovered_alive.clone(),
            (false, true) => self.hovered_dead.clone(),
        }
    }
}

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
struct Board {
    /// the center of the board
    center: Vec2,
    /// the amount of cells on each axis
    size: UVec2,
    /// the size of each individual cell
    cell_size: Vec2,
    /// scale of each individual cell (should be 0.0 - 1.0)
    cell_scale: Vec2,
}

impl Board {
    /// Lays the board out below the HUD strip of a `surface` sized window.
    fn fit(surface: Vec2, resolution: u32) -> Result<Self, ConfigError> {
        let (width, height) =
            grid_dimensions(surface.x, surface.y - HUD_HEIGHT_PX, resolution)?;
        Ok(Self {
            center: BOARD_POS - vec2(0.0, HUD_HEIGHT_PX * 0.5),
            size: uvec2(width, height),
            cell_size: Vec2::splat(resolution as f32),
            cell_scale: CELL_SCALE,
        })
    }

    /// pixels per cell edge
    #[inline]
    fn resolution(&self) -> u32 {
        self.cell_size.x as u32
    }

    /// computes full size of the board in pixels
    #[inline]
    fn pixel_size(&self) -> Vec2 {
        self.size.as_vec2() * self.cell_size
    }

    /// row 0 is drawn at the top
    #[inline]
    fn cell_coord_to_translation(&self, cell_coord: UVec2) -> Vec3 {
        let top_left = self.center + vec2(-0.5, 0.5) * self.pixel_size();
        (top_left
            + vec2(cell_coord.x as f32 + 0.5, -(cell_coord.y as f32 + 0.5)) * self.cell_size)
            .extend(10.0)
    }
}

impl Default for Board {
    fn default() -> Self {
        let cells = |extent: f32| ((extent / DEFAULT_RESOLUTION_PX as f32) as u32).max(1);
        Self {
            center: BOARD_POS - vec2(0.0, HUD_HEIGHT_PX * 0.5),
            size: uvec2(
                cells(DEFAULT_WINDOW_SIZE.x),
                cells(DEFAULT_WINDOW_SIZE.y - HUD_HEIGHT_PX),
            ),
            cell_size: Vec2::splat(DEFAULT_RESOLUTION_PX as f32),
            cell_scale: CELL_SCALE,
        }
    }
}
