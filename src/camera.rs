use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::config::{SessionConfig, approach};

/// Camera targets the core tracks so it can interpret movement input.
/// View and projection math stay with the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub yaw: f32,
    pub target_yaw: f32,
    pub elevation: f32,
    pub target_elevation: f32,
    max_elevation: f32,
}

impl CameraRig {
    pub fn new(max_elevation: f32) -> Self {
        Self {
            yaw: 0.0,
            target_yaw: 0.0,
            elevation: 0.0,
            target_elevation: 0.0,
            max_elevation,
        }
    }

    /// Nearest quarter turn of the current yaw.
    pub fn yaw_bucket(&self) -> i32 {
        (self.yaw / FRAC_PI_2).round() as i32
    }

    pub fn rotate(&mut self, delta: f32) {
        self.target_yaw += delta;
    }

    pub fn pan(&mut self, delta: f32) {
        self.target_elevation += delta;
    }

    /// Keeps the target yaw in [-π, π], shifting the current yaw by the same
    /// turn so interpolation never spins the long way round.
    pub fn normalize(&mut self) {
        if self.target_yaw > PI {
            self.target_yaw -= TAU;
            self.yaw -= TAU;
        }
        if self.target_yaw < -PI {
            self.target_yaw += TAU;
            self.yaw += TAU;
        }
        self.target_elevation = self.target_elevation.clamp(0.0, self.max_elevation);
    }

    pub fn advance(&mut self, config: &SessionConfig) {
        self.yaw = approach(self.yaw, self.target_yaw, config.follow_factor, config.snap_epsilon);
        self.elevation = approach(
            self.elevation,
            self.target_elevation,
            config.follow_factor,
            config.snap_epsilon,
        );
    }
}
