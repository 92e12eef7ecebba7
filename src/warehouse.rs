//! The per-frame driver tying printer, forklift and shelf together.
//!
//! A thin UI shell owns a [`Warehouse`], feeds it key events through an
//! [`InputState`], calls [`Warehouse::frame`] once per rendered frame and
//! forwards the panel's print button to [`Warehouse::trigger_print`].

use crate::config::SimulationConfig;
use crate::error::GenerationError;
use crate::forklift::Forklift;
use crate::holder::{Hold, Holder};
use crate::input::{InputState, PrintSettings};
use crate::mesh::Material;
use crate::printer::Printer;
use crate::profile::ShapeTag;
use crate::shelf::Shelf;
use crate::solid::{Solid, SolidId};
use std::iter;

/// The whole scene: printer, forklift and shelf, advanced one frame at a time.
pub struct Warehouse {
    config: SimulationConfig,
    printer: Printer,
    forklift: Forklift,
    shelf: Shelf,
    /// Material applied to finished prints.
    printed_material: Material,
}

impl Warehouse {
    /// Builds the scene described by `config`.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            printer: Printer::new(config.printer.clone()),
            forklift: Forklift::new(config.forklift.clone()),
            shelf: Shelf::new(config.shelf.clone()),
            printed_material: Material::default(),
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    pub fn printer_mut(&mut self) -> &mut Printer {
        &mut self.printer
    }

    pub fn forklift(&self) -> &Forklift {
        &self.forklift
    }

    pub fn forklift_mut(&mut self) -> &mut Forklift {
        &mut self.forklift
    }

    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    pub fn shelf_mut(&mut self) -> &mut Shelf {
        &mut self.shelf
    }

    pub fn set_printed_material(&mut self, material: Material) {
        self.printed_material = material;
    }

    /// Every holder the forklift's grabber can reach: the build plate, then
    /// the shelf spaces.
    pub fn holders_mut(&mut self) -> impl Iterator<Item = &mut Holder<Solid>> {
        iter::once(self.printer.holder_mut()).chain(self.shelf.holders_mut().iter_mut())
    }

    /// Runs one frame and returns the delta actually simulated.
    ///
    /// `raw_delta` is clamped to `[0, max_delta]`. Paired controls only act
    /// when exactly one key of the pair is held; the grab fires on the
    /// key-down edge. The caller clears `input`'s edges afterwards.
    pub fn frame(&mut self, raw_delta: f32, input: &InputState) -> f32 {
        let delta = raw_delta.clamp(0.0, self.config.max_delta);
        self.apply_controls(delta, input);
        self.printer.animate(delta);
        delta
    }

    fn apply_controls(&mut self, delta: f32, input: &InputState) {
        let keys = &self.config.controls;
        let pair = |a: &str, b: &str| (input.is_held(a), input.is_held(b));

        match pair(&keys.forward, &keys.backwards) {
            (true, false) => self.forklift.move_forward(delta),
            (false, true) => self.forklift.move_backwards(delta),
            _ => {}
        }
        match pair(&keys.left, &keys.right) {
            (true, false) => self.forklift.rotate_left(delta),
            (false, true) => self.forklift.rotate_right(delta),
            _ => {}
        }
        match pair(&keys.lift_up, &keys.lift_down) {
            (true, false) => self.forklift.lift_up(delta),
            (false, true) => self.forklift.lift_down(delta),
            _ => {}
        }

        if input.just_pressed(&keys.grab) {
            let Self {
                printer,
                forklift,
                shelf,
                ..
            } = self;
            let holders = iter::once(printer.holder_mut()).chain(shelf.holders_mut().iter_mut());
            forklift.interact_grabber(holders);
        }
    }

    /// Starts a print from the panel's settings.
    ///
    /// Failures are logged and returned; they never disturb the frame loop.
    pub fn trigger_print(&mut self, settings: &PrintSettings) -> Result<(), GenerationError> {
        let settings = settings.clamped();
        let result = settings.shape.parse::<ShapeTag>().and_then(|shape| {
            self.printer.print(
                shape,
                settings.height,
                settings.twist_angle,
                self.printed_material.clone(),
            )
        });
        if let Err(error) = &result {
            tracing::warn!(%error, shape = %settings.shape, "print request failed");
        }
        result
    }

    /// Ids of solids the renderer should free.
    pub fn take_released(&mut self) -> Vec<SolidId> {
        self.printer.take_released()
    }

    /// Tears the scene down, releasing every solid it still owns.
    pub fn shutdown(self) -> Vec<SolidId> {
        let Self {
            printer,
            mut forklift,
            shelf,
            ..
        } = self;
        let mut released = printer.shutdown();
        released.extend(shelf.shutdown());
        if let Some(solid) = forklift.grabber_mut().holder_mut().clear() {
            released.push(solid.dispose());
        }
        tracing::debug!(count = released.len(), "warehouse shut down");
        released
    }
}
