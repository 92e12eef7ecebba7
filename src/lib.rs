//! # warehouse-sim
//!
//! The procedural geometry and animation core of a small warehouse
//! simulation: a 3D printer that extrudes parametric solids, a drivable
//! forklift with a grabber, and a storage shelf.
//!
//! Everything here is engine-agnostic. Solids come out as plain
//! [`MeshData`] buffers plus a [`Material`] description, and the per-frame
//! driver ([`Warehouse`]) consumes an explicit [`InputState`] snapshot, so a
//! renderer and a windowing shell can be plugged in around it (Bevy, three-d,
//! a web canvas) without the core knowing about them.

pub mod config;
pub mod error;
pub mod forklift;
pub mod holder;
pub mod input;
pub mod mesh;
pub mod printer;
pub mod profile;
pub mod shelf;
pub mod solid;
pub mod warehouse;

pub use config::*;
pub use error::*;
pub use forklift::*;
pub use holder::*;
pub use input::*;
pub use mesh::*;
pub use printer::*;
pub use profile::*;
pub use shelf::*;
pub use solid::*;
pub use warehouse::*;
