//! Game rules that do not touch the GPU.

use cgmath::{MetricSpace, Point3};
use rand::{Rng, seq::SliceRandom};
use winit::keyboard::KeyCode;

use crate::{
    camera::{Camera, CameraMovement},
    error::LoadError,
    flow::KeyAction,
    records::{PlayerData, PlayerTable, format_time},
    scenes::game::hidden::HiddenObject,
};

/// Found objects needed to finish a game.
pub const OBJECTS_TO_FIND: usize = 5;
/// Distance below which the camera finds an object.
pub const FOUND_DISTANCE: f32 = 1.5;
pub const START_POSITION: [f32; 3] = [1.0, 1.0, 3.0];

/// Shuffle `points` and check that every hidden object gets one.
pub fn place_spawn_points<T>(
    points: &mut [T],
    hidden_objects: usize,
    rng: &mut impl Rng,
) -> Result<(), LoadError> {
    if points.len() < hidden_objects {
        return Err(LoadError::NotEnoughSpawnPoints {
            spawn_points: points.len(),
            hidden_objects,
        });
    }
    points.shuffle(rng);
    Ok(())
}

/// What one round of found detection turned up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detection {
    /// Indices of objects found this round, in object order.
    pub found: Vec<usize>,
    /// Set on the round that finds the last required object.
    pub completed: bool,
}

/// Counts found objects over one playthrough.
#[derive(Clone, Debug, Default)]
pub struct Hunt {
    found: usize,
}

impl Hunt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found(&self) -> usize {
        self.found
    }

    /// Mark every unfound object within [`FOUND_DISTANCE`] of `camera`.
    /// Object `i` sits at `spawn_points[i]`.
    pub fn detect<M>(
        &mut self,
        camera: Point3<f32>,
        objects: &mut [HiddenObject<M>],
        spawn_points: &[Point3<f32>],
    ) -> Detection {
        let mut detection = Detection::default();
        for (i, (object, spawn)) in objects.iter_mut().zip(spawn_points).enumerate() {
            if object.is_found() || camera.distance(*spawn) >= FOUND_DISTANCE {
                continue;
            }
            object.mark_found();
            detection.found.push(i);
            self.found += 1;
            if self.found == OBJECTS_TO_FIND {
                detection.completed = true;
            }
        }
        detection
    }
}

/// Camera, clock, input and records of a running game.
#[derive(Clone, Debug)]
pub struct GameState {
    pub camera: Camera,
    pub movement: CameraMovement,
    /// Seconds since the game started.
    pub elapsed: f32,
    pub show_leaderboard: bool,
    pub players: PlayerTable,
    pub hunt: Hunt,
    last_cursor: Option<(f32, f32)>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(START_POSITION),
            movement: CameraMovement::None,
            elapsed: 0.0,
            show_leaderboard: false,
            players: PlayerTable::new(),
            hunt: Hunt::new(),
            last_cursor: None,
        }
    }

    /// Advance the clock and move the camera.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.camera.advance(self.movement, dt);
    }

    pub fn timer_text(&self) -> String {
        format_time(self.elapsed)
    }

    pub fn process_key(&mut self, key: KeyCode, action: KeyAction) {
        match action {
            KeyAction::Release => self.movement = CameraMovement::None,
            KeyAction::Press => {
                if let Some(movement) = CameraMovement::from_key(key) {
                    self.movement = movement;
                } else if key == KeyCode::KeyP {
                    self.show_leaderboard = !self.show_leaderboard;
                }
            }
            KeyAction::Repeat => {}
        }
    }

    /// Turn the camera by the cursor motion since the last event. The first
    /// event only records the position.
    pub fn process_mouse_movement(&mut self, x: f32, y: f32) {
        let (last_x, last_y) = self.last_cursor.unwrap_or((x, y));
        self.last_cursor = Some((x, y));
        // Window y grows downwards.
        self.camera
            .process_mouse_movement(x - last_x, last_y - y, true);
    }

    pub fn process_mouse_scroll(&mut self, delta: f32) {
        self.camera.process_mouse_scroll(delta);
    }

    /// Merge the finished game of `name` into the records.
    pub fn record_finish(&mut self, name: &str) -> PlayerData {
        let player = PlayerData::new(name, self.elapsed);
        if !self.players.insert(player.clone()) {
            log::info!("{} did not beat their best time", name);
        }
        player
    }

    /// One `"<name>  <hh:mm:ss>"` line per record, ordered by name.
    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| format!("{}  {}", p.name, format_time(p.game_time)))
            .collect()
    }

    /// Upper bound on overlay draws this frame: the timer, one icon per
    /// hidden object and the leaderboard, which may gain a record this frame.
    pub fn overlay_draws(&self, hidden_objects: usize) -> usize {
        let leaderboard = if self.show_leaderboard {
            self.players.len() + 1
        } else {
            0
        };
        1 + hidden_objects + leaderboard
    }
}
