//! Forklift kinematics: caller-paced integration of pose, wheel spin and lift.
//!
//! The vehicle performs no timing of its own. Every control primitive takes
//! the frame delta and moves the state by exactly that much; wheel spin is a
//! display quantity derived from the motion, never read back.

use crate::holder::{Grabber, Holder};
use crate::solid::Solid;
use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

pub const FRONT_RIGHT_WHEEL: usize = 0;
pub const FRONT_LEFT_WHEEL: usize = 1;
pub const BACK_RIGHT_WHEEL: usize = 2;
pub const BACK_LEFT_WHEEL: usize = 3;

const LEFT_WHEELS: [usize; 2] = [FRONT_LEFT_WHEEL, BACK_LEFT_WHEEL];
const RIGHT_WHEELS: [usize; 2] = [FRONT_RIGHT_WHEEL, BACK_RIGHT_WHEEL];

/// Lift mast height as a multiple of the cabin height.
const LIFT_HEIGHT_FACTOR: f32 = 4.5;
const LIFT_DOWN_FRACTION: f32 = 0.2;
const LIFT_UP_FRACTION: f32 = 0.9;
const LIFT_PANEL_THICKNESS: f32 = 0.5;

/// Configuration for the forklift.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkliftConfig {
    /// Units per second along the forward axis.
    pub movement_speed: f32,
    /// Radians per second of yaw.
    pub rotation_speed: f32,
    /// Units per second of lift travel.
    pub lift_speed: f32,
    pub cabin_length: f32,
    pub cabin_height: f32,
    pub cabin_width: f32,
    pub wheel_radius: f32,
    /// Scale applied to the whole vehicle.
    pub scale: Vec3,
    /// Reach of the grabber mounted on the lift panel.
    pub max_interaction_distance: f32,
    /// Initial world position.
    pub position: Vec3,
    /// Initial yaw in radians.
    pub yaw: f32,
}

impl Default for ForkliftConfig {
    fn default() -> Self {
        Self {
            movement_speed: 60.0,
            rotation_speed: 1.5,
            lift_speed: 20.0,
            cabin_length: 30.0,
            cabin_height: 10.0,
            cabin_width: 15.0,
            wheel_radius: 5.0,
            scale: Vec3::ONE,
            max_interaction_distance: 20.0,
            position: Vec3::ZERO,
            yaw: PI,
        }
    }
}

/// A drivable forklift carrying a [`Grabber`] on its lift panel.
pub struct Forklift {
    config: ForkliftConfig,
    position: Vec3,
    yaw: f32,
    wheel_spins: [f32; 4],
    lift_height: f32,
    lift_down_limit: f32,
    lift_up_limit: f32,
    grabber: Grabber<Solid>,
}

impl Forklift {
    /// Places the vehicle at the configured pose with the lift panel at half
    /// the mast height, clamped into its limits.
    pub fn new(config: ForkliftConfig) -> Self {
        let lift_height = config.cabin_height * LIFT_HEIGHT_FACTOR;
        let travel = lift_height + config.wheel_radius / 2.0;
        let lift_down_limit = travel * LIFT_DOWN_FRACTION;
        let lift_up_limit = travel * LIFT_UP_FRACTION;

        let mut forklift = Self {
            position: config.position,
            yaw: config.yaw,
            wheel_spins: [0.0; 4],
            lift_height: (lift_height * 0.5).clamp(lift_down_limit, lift_up_limit),
            lift_down_limit,
            lift_up_limit,
            grabber: Grabber::new(config.max_interaction_distance),
            config,
        };
        forklift.update_grabber_position();
        forklift
    }

    pub fn config(&self) -> &ForkliftConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// The vehicle's local forward axis (+X) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Accumulated wheel rotation in radians, indexed by the `*_WHEEL` constants.
    pub fn wheel_spins(&self) -> [f32; 4] {
        self.wheel_spins
    }

    pub fn lift_height(&self) -> f32 {
        self.lift_height
    }

    /// `(lowest, highest)` lift panel height.
    pub fn lift_limits(&self) -> (f32, f32) {
        (self.lift_down_limit, self.lift_up_limit)
    }

    pub fn grabber(&self) -> &Grabber<Solid> {
        &self.grabber
    }

    pub fn grabber_mut(&mut self) -> &mut Grabber<Solid> {
        &mut self.grabber
    }

    /// Root-mean-square of the horizontal scale factors.
    pub fn scale_factor(&self) -> f32 {
        let s = self.config.scale;
        ((s.x * s.x + s.z * s.z) / 2.0).sqrt()
    }

    /// Local-to-world transform of the vehicle.
    pub fn transform(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.config.scale, self.rotation(), self.position)
    }

    // --- DRIVING ---

    /// Drives along [`forward`](Self::forward) for `delta` seconds.
    pub fn move_forward(&mut self, delta: f32) {
        let distance = delta * self.config.movement_speed;
        self.position += self.forward() * distance;

        let spin = -distance / (self.config.wheel_radius * self.scale_factor());
        for wheel in &mut self.wheel_spins {
            *wheel += spin;
        }
        self.update_grabber_position();
    }

    pub fn move_backwards(&mut self, delta: f32) {
        self.move_forward(-delta);
    }

    /// Yaws counter-clockwise seen from above; the two sides spin opposite
    /// ways like a skid-steer.
    pub fn rotate_left(&mut self, delta: f32) {
        let angle = delta * self.config.rotation_speed;
        self.yaw += angle;

        let spin = angle * (self.config.cabin_width / 2.0) / self.config.wheel_radius;
        for i in LEFT_WHEELS {
            self.wheel_spins[i] += spin;
        }
        for i in RIGHT_WHEELS {
            self.wheel_spins[i] -= spin;
        }
        self.update_grabber_position();
    }

    pub fn rotate_right(&mut self, delta: f32) {
        self.rotate_left(-delta);
    }

    // --- LIFT ---

    /// Raises the panel; a negative `delta` lowers it instead.
    pub fn lift_up(&mut self, delta: f32) {
        if delta < 0.0 {
            return self.lift_down(-delta);
        }
        self.set_lift_height(self.lift_height + delta * self.config.lift_speed);
    }

    /// Lowers the panel; a negative `delta` raises it instead.
    pub fn lift_down(&mut self, delta: f32) {
        if delta < 0.0 {
            return self.lift_up(-delta);
        }
        self.set_lift_height(self.lift_height - delta * self.config.lift_speed);
    }

    fn set_lift_height(&mut self, height: f32) {
        self.lift_height = height.clamp(self.lift_down_limit, self.lift_up_limit);
        self.update_grabber_position();
    }

    // --- GRABBER ---

    /// Lets the grabber interact with the closest holder in reach.
    pub fn interact_grabber<'a, I>(&mut self, holders: I) -> bool
    where
        I: IntoIterator<Item = &'a mut Holder<Solid>>,
    {
        self.grabber.interact_closest(holders)
    }

    /// Grabber mount point in vehicle space: on top of the lift panel, which
    /// sits in front of the cabin.
    fn grabber_local_position(&self) -> Vec3 {
        let c = &self.config;
        Vec3::new(
            c.cabin_length * 0.75 + 0.5,
            c.wheel_radius / 2.0 + self.lift_height + LIFT_PANEL_THICKNESS / 2.0,
            0.0,
        )
    }

    fn update_grabber_position(&mut self) {
        let world = self
            .transform()
            .transform_point3(self.grabber_local_position());
        self.grabber.set_world_position(world);
    }
}
