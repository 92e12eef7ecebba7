//! The 3D printer: a hand that lowers onto the build plate, then rises while
//! revealing the printed solid below it.
//!
//! Nothing is regenerated while printing. The solid is built up front with a
//! translucent material and a [`ClippingPlane`] that tracks the hand hides the
//! part above it. Once the hand passes the solid's height the caller's
//! material is swapped in and the holder unlocks so a grabber can take the
//! object.

use crate::error::GenerationError;
use crate::holder::{Hold, Holder};
use crate::mesh::Material;
use crate::profile::ShapeTag;
use crate::solid::{POINTS_PER_HEIGHT, Solid, SolidId, generate_solid};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for the printer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// World position of the printer base.
    pub position: Vec3,
    /// Offset of the build plate (the holder) from the base.
    pub holder_offset: Vec3,
    /// Hand speed in units per second while travelling.
    pub hand_speed: f32,
    /// Speed multiplier applied while the hand is printing.
    pub print_slowdown: f32,
    /// Resting height of the hand above the build plate.
    pub hand_max_height: f32,
    /// Requested heights are clamped to this.
    pub max_object_height: f32,
    /// Profile subdivisions per unit of printed height.
    pub divisions_per_unit_height: f32,
    /// Material shown while the object is being printed.
    pub print_material: Material,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-100.0, 0.0, 0.0),
            holder_offset: Vec3::new(0.0, 18.0, 0.0),
            hand_speed: 20.0,
            print_slowdown: 0.25,
            hand_max_height: 25.0,
            max_object_height: 20.0,
            divisions_per_unit_height: POINTS_PER_HEIGHT,
            print_material: Material {
                id: 1,
                color: Vec3::new(0.5, 0.627, 0.627),
                opacity: 0.5,
                clip_to_hand: true,
            },
        }
    }
}

/// Vertical travel direction of the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandDirection {
    Up,
    Down,
}

impl HandDirection {
    pub fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Observable phase of a print cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrinterPhase {
    /// Hand raised, nothing on the plate.
    Idle,
    /// Hand descending toward the plate.
    Lowering,
    /// Hand rising, solid revealed below it.
    Printing,
    /// Solid complete with its final material.
    Finished,
}

/// Animation state of the printer.
#[derive(Clone, Debug, PartialEq)]
pub struct PrinterState {
    pub is_printing: bool,
    /// Hand height above the build plate.
    pub hand_height: f32,
    pub direction: HandDirection,
    /// Height at which the current print completes.
    pub printed_object_height: Option<f32>,
    /// Material applied once the current print completes.
    pub pending_material: Option<Material>,
}

/// Render clipping plane: points with `normal · p + constant >= 0` are kept.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClippingPlane {
    pub normal: Vec3,
    pub constant: f32,
}

impl ClippingPlane {
    /// A plane keeping everything at or below `height`.
    pub fn below(height: f32) -> Self {
        Self {
            normal: Vec3::NEG_Y,
            constant: height,
        }
    }

    pub fn keeps(&self, point: Vec3) -> bool {
        self.normal.dot(point) + self.constant >= 0.0
    }
}

/// The printer: build-plate holder, moving hand and clipping plane.
///
/// Driven once per frame through [`Printer::animate`].
pub struct Printer {
    config: PrinterConfig,
    state: PrinterState,
    holder: Holder<Solid>,
    clipping_plane: ClippingPlane,
    released: Vec<SolidId>,
}

impl Printer {
    /// Creates an idle printer with the hand at `hand_max_height` and an
    /// empty, unlocked build plate.
    pub fn new(config: PrinterConfig) -> Self {
        let holder = Holder::new(config.position + config.holder_offset);
        let state = PrinterState {
            is_printing: false,
            hand_height: config.hand_max_height,
            direction: HandDirection::Up,
            printed_object_height: None,
            pending_material: None,
        };
        let clipping_plane = ClippingPlane::below(holder.world_position.y + state.hand_height);
        Self {
            config,
            state,
            holder,
            clipping_plane,
            released: Vec::new(),
        }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    pub fn state(&self) -> &PrinterState {
        &self.state
    }

    /// True while the hand rises over a visible solid.
    pub fn is_printing(&self) -> bool {
        self.state.is_printing
    }

    /// Hand height above the build plate.
    pub fn hand_height(&self) -> f32 {
        self.state.hand_height
    }

    /// Hand height in world space; the clipping plane sits here.
    pub fn hand_world_height(&self) -> f32 {
        self.holder.world_position.y + self.state.hand_height
    }

    pub fn clipping_plane(&self) -> ClippingPlane {
        self.clipping_plane
    }

    /// The solid on the build plate, if any.
    pub fn printed_object(&self) -> Option<&Solid> {
        self.holder.object()
    }

    pub fn phase(&self) -> PrinterPhase {
        if self.state.is_printing {
            PrinterPhase::Printing
        } else if self.state.direction == HandDirection::Down {
            PrinterPhase::Lowering
        } else if self.holder.has_object() {
            PrinterPhase::Finished
        } else {
            PrinterPhase::Idle
        }
    }

    /// Starts a new print, replacing whatever sits on the build plate.
    ///
    /// `height` is clamped to `max_object_height`. The previous object is
    /// released before the new one is installed; its id shows up in
    /// [`take_released`](Self::take_released). The hand starts descending
    /// from wherever it is.
    ///
    /// # Errors
    ///
    /// Propagates [`generate_solid`] failures; the printer is untouched then.
    pub fn print(
        &mut self,
        shape: ShapeTag,
        height: f32,
        twist_angle: f32,
        material: Material,
    ) -> Result<(), GenerationError> {
        let height = height.min(self.config.max_object_height);
        let mut solid = generate_solid(
            shape,
            twist_angle,
            height,
            self.config.divisions_per_unit_height,
            self.config.print_material.clone(),
        )?;
        solid.visible = false;

        let released = &mut self.released;
        self.holder
            .replace_with(solid, |previous| released.push(previous.dispose()));
        self.holder.set_lock(true);

        self.state.is_printing = false;
        self.state.direction = HandDirection::Down;
        self.state.printed_object_height = Some(height);
        self.state.pending_material = Some(material);
        tracing::info!(%shape, height, twist_angle, "print started");
        Ok(())
    }

    /// Advances the hand by one frame of `delta` seconds.
    pub fn animate(&mut self, delta: f32) {
        let speed = if self.state.is_printing {
            self.config.hand_speed * self.config.print_slowdown
        } else {
            self.config.hand_speed
        };
        self.state.hand_height += self.state.direction.sign() * delta * speed;

        match self.state.direction {
            HandDirection::Down if self.state.hand_height < 0.0 => self.start_printing(),
            HandDirection::Up
                if self.state.is_printing
                    && self
                        .state
                        .printed_object_height
                        .is_some_and(|target| self.state.hand_height > target) =>
            {
                self.finish_printing()
            }
            _ => {}
        }

        self.state.hand_height = self
            .state
            .hand_height
            .clamp(0.0, self.config.hand_max_height);
        self.clipping_plane = ClippingPlane::below(self.hand_world_height());
    }

    fn start_printing(&mut self) {
        self.state.is_printing = true;
        self.state.direction = HandDirection::Up;
        if let Some(solid) = self.holder.object_mut() {
            solid.visible = true;
        }
        tracing::debug!("printer hand reached the plate");
    }

    fn finish_printing(&mut self) {
        self.state.is_printing = false;
        if let (Some(material), Some(solid)) =
            (self.state.pending_material.take(), self.holder.object_mut())
        {
            solid.material = material;
        }
        self.holder.set_lock(false);
        tracing::info!(height = ?self.state.printed_object_height, "print finished");
    }

    /// The build plate.
    pub fn holder(&self) -> &Holder<Solid> {
        &self.holder
    }

    pub fn holder_mut(&mut self) -> &mut Holder<Solid> {
        &mut self.holder
    }

    /// Drains the ids of solids disposed since the last call.
    pub fn take_released(&mut self) -> Vec<SolidId> {
        std::mem::take(&mut self.released)
    }

    /// Releases the object on the plate, if any, and returns every pending id.
    pub fn shutdown(mut self) -> Vec<SolidId> {
        if let Some(solid) = self.holder.clear() {
            self.released.push(solid.dispose());
        }
        self.released
    }
}
