use std::f32::consts::TAU;

use bevy::math::{Quat, Vec2, Vec3};
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actions::MoveDirection;
use crate::config::{SessionConfig, approach};
use crate::coords::{Column, GridSize};
use crate::cube::{CubeId, CubeRegistry};
use crate::grid::GridIndex;
use crate::orientation::{OrientationKeyframes, snap_orientation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrabState {
    Settled,
    Grabbing,
    Held,
    Dropping,
}

/// Drives the arm: picks cubes out of the grid, carries them, and puts
/// them back. Ground and neighbour levels are computed when an episode
/// starts and stay fixed until it ends, reversals included.
#[derive(Debug, Clone)]
pub struct GrabDropController {
    state: GrabState,
    size: GridSize,
    target: Column,
    arm: Vec2,
    held: Option<CubeId>,
    episode_column: Column,
    ground_level: i32,
    neighbour_level: i32,
    lift: f32,
    grab_height: f32,
    spin_axis: Vec3,
    drop_start: Quat,
    keyframes: Option<OrientationKeyframes>,
}

impl GrabDropController {
    pub fn new(size: GridSize) -> Self {
        let target = size.centre_column();
        Self {
            state: GrabState::Settled,
            size,
            target,
            arm: Vec2::new(target.x as f32, target.z as f32),
            held: None,
            episode_column: target,
            ground_level: 0,
            neighbour_level: 0,
            lift: 0.0,
            grab_height: size.y as f32 + 0.5,
            spin_axis: Vec3::Y,
            drop_start: Quat::IDENTITY,
            keyframes: None,
        }
    }

    pub fn state(&self) -> GrabState {
        self.state
    }
    pub fn target(&self) -> Column {
        self.target
    }
    /// Continuous `(x, z)` of the arm, trailing the target column.
    pub fn arm_position(&self) -> Vec2 {
        self.arm
    }
    pub fn held(&self) -> Option<CubeId> {
        self.held
    }
    pub fn ground_level(&self) -> i32 {
        self.ground_level
    }
    pub fn neighbour_level(&self) -> i32 {
        self.neighbour_level
    }
    pub fn lift(&self) -> f32 {
        self.lift
    }
    pub fn grab_height(&self) -> f32 {
        self.grab_height
    }
    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }
    /// Un-rotation keyframes; only set while dropping.
    pub fn keyframes(&self) -> Option<OrientationKeyframes> {
        self.keyframes
    }

    /// 0 at ground level, 1 at grab height. 0 when nothing is held.
    pub fn lift_progress(&self) -> f32 {
        if self.held.is_none() {
            return 0.0;
        }
        let span = self.grab_height - self.ground_level as f32;
        ((self.lift - self.ground_level as f32) / span).clamp(0.0, 1.0)
    }

    pub fn arm_radius(&self, config: &SessionConfig) -> f32 {
        config.arm_radius_idle + self.lift_progress() * (config.arm_radius_grab - config.arm_radius_idle)
    }

    /// Whether the held cube is above every stack around the episode column.
    pub fn clear_of_neighbours(&self) -> bool {
        self.lift >= self.neighbour_level as f32
    }

    /// Moves the target column. A cube in transit finishes its episode at
    /// once, then a held cube follows the arm. Returns true if the grid
    /// changed.
    pub fn move_target(
        &mut self,
        dir: MoveDirection,
        yaw_bucket: i32,
        grid: &mut GridIndex,
        cubes: &mut CubeRegistry,
    ) -> bool {
        let mut grid_changed = false;
        match self.state {
            GrabState::Dropping => {
                self.settle(grid, cubes);
                grid_changed = true;
            }
            GrabState::Grabbing => {
                self.lift = self.grab_height;
                self.state = GrabState::Held;
            }
            GrabState::Settled | GrabState::Held => {}
        }

        self.target = self.size.clamp_column(dir.apply(self.target, yaw_bucket));
        if let Some(id) = self.held {
            let cube = cubes.get_mut(id);
            cube.position.x = self.target.x;
            cube.position.z = self.target.z;
        }
        self.assert_consistent();
        grid_changed
    }

    /// Grab, drop, or reverse the current episode. Returns true if the grid
    /// changed.
    pub fn activate<R: Rng + ?Sized>(
        &mut self,
        grid: &mut GridIndex,
        cubes: &mut CubeRegistry,
        rng: &mut R,
    ) -> bool {
        self.arm = Vec2::new(self.target.x as f32, self.target.z as f32);
        let grid_changed = match self.state {
            GrabState::Settled => self.start_grab(grid, cubes, rng),
            GrabState::Grabbing => {
                debug!("reversing grab at {:?}", self.episode_column);
                self.begin_unrotation(cubes);
                self.state = GrabState::Dropping;
                false
            }
            GrabState::Held => {
                self.start_drop(grid, cubes);
                false
            }
            GrabState::Dropping => {
                debug!("reversing drop at {:?}", self.episode_column);
                self.keyframes = None;
                self.state = GrabState::Grabbing;
                false
            }
        };
        self.assert_consistent();
        grid_changed
    }

    fn start_grab<R: Rng + ?Sized>(&mut self, grid: &mut GridIndex, cubes: &mut CubeRegistry, rng: &mut R) -> bool {
        let col = self.target;
        let Some(top) = grid.top_cube(col) else {
            trace!("grab ignored: column {:?} is empty", col);
            return false;
        };
        let at = col.at_height(top);
        let id = match grid.occupant(at) {
            Some(id) => id,
            None => panic!("top of column {:?} reported at {} but the cell is empty", col, top),
        };
        if !cubes.get(id).is_grabbable() {
            trace!("grab ignored: {:?} at {:?} cannot be moved", id, at);
            return false;
        }

        self.ground_level = top;
        self.neighbour_level = grid.neighbour_level(col, top);
        self.episode_column = col;
        grid.clear(at);
        self.held = Some(id);
        self.lift = top as f32;
        self.spin_axis = random_axis(rng);
        self.keyframes = None;
        self.state = GrabState::Grabbing;
        debug!(
            "grabbing {:?} from {:?} (neighbour level {})",
            id, at, self.neighbour_level
        );
        true
    }

    fn start_drop(&mut self, grid: &GridIndex, cubes: &CubeRegistry) {
        let col = self.target;
        let landing = grid.top_cube(col).map_or(0, |top| top + 1);
        if landing >= self.size.y {
            trace!("drop ignored: column {:?} is full", col);
            return;
        }
        self.ground_level = landing;
        self.neighbour_level = grid.neighbour_level(col, landing);
        self.episode_column = col;
        self.begin_unrotation(cubes);
        self.state = GrabState::Dropping;
        debug!(
            "dropping {:?} onto {:?} (neighbour level {})",
            self.held,
            col.at_height(landing),
            self.neighbour_level
        );
    }

    fn begin_unrotation(&mut self, cubes: &CubeRegistry) {
        if let Some(id) = self.held {
            self.drop_start = cubes.get(id).orientation;
            self.keyframes = Some(snap_orientation(self.drop_start));
        }
    }

    /// Advances lift, spin and arm interpolation by `dt` seconds. Returns
    /// true when a drop settled into the grid.
    pub fn advance(
        &mut self,
        dt: f32,
        config: &SessionConfig,
        grid: &mut GridIndex,
        cubes: &mut CubeRegistry,
    ) -> bool {
        let mut settled = false;
        if let Some(id) = self.held {
            let ground = self.ground_level as f32;
            let span = self.grab_height - ground;
            let step = config.lift_rate * dt;
            let delta = if self.state == GrabState::Dropping { -step } else { step };
            let t = (self.lift_progress() + delta).clamp(0.0, 1.0);
            self.lift = ground + t * span;

            let cube = cubes.get_mut(id);
            match (self.state, self.keyframes) {
                (GrabState::Dropping, Some(keyframes)) => {
                    let neighbour = self.neighbour_level as f32;
                    let w = ((self.lift - neighbour) / (self.grab_height - neighbour)).max(0.0);
                    cube.orientation = keyframes.sample(self.drop_start, w);
                }
                _ if self.lift >= self.neighbour_level as f32 => {
                    let spin = Quat::from_axis_angle(self.spin_axis, config.spin_speed * dt);
                    cube.orientation = (spin * cube.orientation).normalize();
                }
                _ => {}
            }

            if self.state == GrabState::Dropping && t == 0.0 {
                self.settle(grid, cubes);
                settled = true;
            } else if self.state == GrabState::Grabbing && t == 1.0 {
                self.state = GrabState::Held;
            }
        }

        let target = Vec2::new(self.target.x as f32, self.target.z as f32);
        self.arm.x = approach(self.arm.x, target.x, config.follow_factor, config.snap_epsilon);
        self.arm.y = approach(self.arm.y, target.y, config.follow_factor, config.snap_epsilon);
        self.assert_consistent();
        settled
    }

    fn settle(&mut self, grid: &mut GridIndex, cubes: &mut CubeRegistry) {
        let Some(id) = self.held.take() else {
            panic!("settle with no held cube");
        };
        let at = self.episode_column.at_height(self.ground_level);
        let cube = cubes.get_mut(id);
        cube.position = at;
        if let Some(keyframes) = self.keyframes.take() {
            cube.orientation = keyframes.rest();
        }
        grid.place(id, at);
        self.lift = self.ground_level as f32;
        self.state = GrabState::Settled;
        debug!("settled {:?} at {:?}", id, at);
    }

    fn assert_consistent(&self) {
        match (self.state, self.held) {
            (GrabState::Settled, Some(id)) => panic!("{:?} still held after settling", id),
            (GrabState::Settled, None) => {}
            (state, None) => panic!("arm is {:?} without a held cube", state),
            (_, Some(_)) => {}
        }
    }
}

/// Unit axis with components `sin(2πu)` for uniform `u`.
pub fn random_axis<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let mut component = || (rng.r#gen::<f32>() * TAU).sin();
    Vec3::new(component(), component(), component())
        .try_normalize()
        .unwrap_or(Vec3::Y)
}
