//! Storage shelf: a grid of empty holders objects can be dropped onto.

use crate::holder::Holder;
use crate::solid::{Solid, SolidId};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Configuration for the shelf layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub rows: usize,
    pub columns: usize,
    /// Length of one storage space along the shelf.
    pub space_length: f32,
    /// Depth of one storage space.
    pub space_width: f32,
    /// Vertical distance between two storage levels.
    pub space_height: f32,
    /// Gap between the floor and the lowest base.
    pub bottom_padding: f32,
    /// Thickness of a base plank.
    pub base_height: f32,
    pub position: Vec3,
    /// Yaw in radians.
    pub yaw: f32,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 8,
            space_length: 24.0,
            space_width: 24.0,
            space_height: 36.0,
            bottom_padding: 10.0,
            base_height: 2.0,
            position: Vec3::new(100.0, 0.0, 0.0),
            yaw: FRAC_PI_2,
        }
    }
}

/// A storage shelf: a fixed grid of holders the forklift can drop onto.
pub struct Shelf {
    config: ShelfConfig,
    holders: Vec<Holder<Solid>>,
}

impl Shelf {
    /// Lays out `rows × columns` holders, column by column, centred along
    /// the shelf and resting on each base.
    pub fn new(config: ShelfConfig) -> Self {
        let rotation = Quat::from_rotation_y(config.yaw);
        let first_x = -0.5 * config.space_length * config.columns as f32 + config.space_length / 2.0;
        let first_y = config.bottom_padding + config.base_height;

        let mut holders = Vec::with_capacity(config.rows * config.columns);
        for i in 0..config.columns {
            for j in 0..config.rows {
                let local = Vec3::new(
                    first_x + i as f32 * config.space_length,
                    first_y + j as f32 * config.space_height,
                    0.0,
                );
                holders.push(Holder::new(config.position + rotation * local));
            }
        }
        Self { config, holders }
    }

    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    pub fn holders(&self) -> &[Holder<Solid>] {
        &self.holders
    }

    pub fn holders_mut(&mut self) -> &mut [Holder<Solid>] {
        &mut self.holders
    }

    /// Number of storage spaces currently occupied.
    pub fn stored(&self) -> usize {
        self.holders.iter().filter(|h| h.object().is_some()).count()
    }

    /// Releases everything stored on the shelf.
    pub fn shutdown(self) -> Vec<SolidId> {
        self.holders
            .into_iter()
            .filter_map(|mut h| h.clear())
            .map(Solid::dispose)
            .collect()
    }
}
