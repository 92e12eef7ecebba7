//! Single-slot attachment points and the grabber that moves objects between them.
//!
//! A [`Holder`] is a spatial anchor carrying at most one object. The
//! protocol is exposed through the [`Hold`] trait so that types embedding a
//! holder (the [`Grabber`], the printer) share one implementation.

use crate::error::{HolderError, Rejected};
use glam::Vec3;

/// A spatial anchor owning at most one object.
///
/// Created empty and unlocked. A locked holder refuses both attach and detach.
#[derive(Debug)]
pub struct Holder<T> {
    /// Where attached objects sit, in world space. Objects are attached at
    /// zero offset from this point.
    pub world_position: Vec3,
    slot: Option<T>,
    locked: bool,
}

impl<T> Default for Holder<T> {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl<T> Holder<T> {
    /// An empty, unlocked holder at `world_position`.
    pub fn new(world_position: Vec3) -> Self {
        Self {
            world_position,
            slot: None,
            locked: false,
        }
    }

    pub fn object(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn object_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut()
    }

    /// Swaps the held object regardless of the lock.
    ///
    /// The outgoing object (if any) is passed to `release` before `object`
    /// is installed.
    pub fn replace_with(&mut self, object: T, release: impl FnOnce(T)) {
        if let Some(previous) = self.slot.take() {
            release(previous);
        }
        self.slot = Some(object);
    }

    /// Empties the slot regardless of the lock.
    pub fn clear(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Puts back an object taken out during a failed transfer.
    fn restore(&mut self, object: T) {
        debug_assert!(self.slot.is_none());
        self.slot = Some(object);
    }
}

/// The holder protocol: `receive`, `give`, `has_object` and the lock.
pub trait Hold<T> {
    fn holder(&self) -> &Holder<T>;

    fn holder_mut(&mut self) -> &mut Holder<T>;

    /// Attaches `object` at the holder's origin.
    ///
    /// # Errors
    ///
    /// [`HolderError::Locked`] if locked, whatever the occupancy, otherwise
    /// [`HolderError::AlreadyHolding`] if occupied. The object is handed back
    /// inside the [`Rejected`].
    fn receive(&mut self, object: T) -> Result<(), Rejected<T>> {
        let holder = self.holder_mut();
        if holder.locked {
            return Err(Rejected {
                error: HolderError::Locked,
                object,
            });
        }
        if holder.slot.is_some() {
            return Err(Rejected {
                error: HolderError::AlreadyHolding,
                object,
            });
        }
        holder.slot = Some(object);
        Ok(())
    }

    /// Detaches and returns the held object, leaving the holder empty.
    ///
    /// # Errors
    ///
    /// [`HolderError::Locked`] if locked, whatever the occupancy, otherwise
    /// [`HolderError::Empty`] if there is nothing to give.
    fn give(&mut self) -> Result<T, HolderError> {
        let holder = self.holder_mut();
        if holder.locked {
            return Err(HolderError::Locked);
        }
        holder.slot.take().ok_or(HolderError::Empty)
    }

    fn has_object(&self) -> bool {
        self.holder().slot.is_some()
    }

    fn set_lock(&mut self, locked: bool) {
        self.holder_mut().locked = locked;
    }

    fn get_lock(&self) -> bool {
        self.holder().locked
    }
}

impl<T> Hold<T> for Holder<T> {
    fn holder(&self) -> &Holder<T> {
        self
    }

    fn holder_mut(&mut self) -> &mut Holder<T> {
        self
    }
}

/// A holder that reaches for the nearest other holder within range.
#[derive(Debug)]
pub struct Grabber<T> {
    holder: Holder<T>,
    max_interaction_distance: f32,
}

impl<T> Grabber<T> {
    /// An empty, unlocked grabber at the origin reaching up to
    /// `max_interaction_distance` (exclusive).
    pub fn new(max_interaction_distance: f32) -> Self {
        Self {
            holder: Holder::default(),
            max_interaction_distance,
        }
    }

    pub fn max_interaction_distance(&self) -> f32 {
        self.max_interaction_distance
    }

    pub fn world_position(&self) -> Vec3 {
        self.holder.world_position
    }

    pub fn set_world_position(&mut self, position: Vec3) {
        self.holder.world_position = position;
    }

    /// Interacts with the closest unlocked holder strictly within
    /// `max_interaction_distance`.
    ///
    /// Does nothing while the grabber itself is locked. On exact distance
    /// ties the holder that comes first in `holders` wins. The grabber cannot
    /// appear in `holders` since it is mutably borrowed here.
    ///
    /// Returns whether an object changed hands.
    pub fn interact_closest<'a, I>(&mut self, holders: I) -> bool
    where
        I: IntoIterator<Item = &'a mut Holder<T>>,
        T: 'a,
    {
        if self.holder.locked {
            return false;
        }
        let origin = self.holder.world_position;
        let mut closest: Option<&mut Holder<T>> = None;
        let mut closest_distance = f32::INFINITY;

        for holder in holders {
            let distance = origin.distance(holder.world_position);
            if distance < self.max_interaction_distance
                && distance < closest_distance
                && !holder.locked
            {
                closest_distance = distance;
                closest = Some(holder);
            }
        }

        match closest {
            Some(holder) => self.interact(holder),
            None => false,
        }
    }

    /// Gives the carried object to `holder`, or takes `holder`'s object when
    /// empty-handed.
    ///
    /// A refused transfer is an expected outcome of timing, not an error: it
    /// leaves both sides as they were and returns `false`.
    pub fn interact(&mut self, holder: &mut Holder<T>) -> bool {
        if self.has_object() {
            let object = match self.give() {
                Ok(object) => object,
                Err(error) => {
                    tracing::debug!(%error, "grabber cannot release its object");
                    return false;
                }
            };
            match holder.receive(object) {
                Ok(()) => {
                    tracing::debug!(at = ?holder.world_position, "grabber dropped object");
                    true
                }
                Err(rejected) => {
                    tracing::debug!(error = %rejected.error, "drop refused");
                    self.holder.restore(rejected.into_inner());
                    false
                }
            }
        } else {
            let object = match holder.give() {
                Ok(object) => object,
                Err(error) => {
                    tracing::debug!(%error, "nothing to pick up");
                    return false;
                }
            };
            match self.receive(object) {
                Ok(()) => {
                    tracing::debug!(from = ?holder.world_position, "grabber picked up object");
                    true
                }
                Err(rejected) => {
                    tracing::debug!(error = %rejected.error, "pick-up refused");
                    holder.restore(rejected.into_inner());
                    false
                }
            }
        }
    }
}

impl<T> Hold<T> for Grabber<T> {
    fn holder(&self) -> &Holder<T> {
        &self.holder
    }

    fn holder_mut(&mut self) -> &mut Holder<T> {
        &mut self.holder
    }
}
