//! 2D geometry and collision core for an Asteroids-style game.
//!
//! Shapes carry local-space vertices and a transform; each tick they rebuild a
//! world-space vertex cache that the SAT collision test reads. Concave
//! polygons are ear-clipped into triangles once, at construction. Bodies wrap
//! shapes with motion state and toroidal screen wrap, and run as Bevy
//! components under [`simulation::GeometryPlugin`].

pub mod body;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod shape;
pub mod simulation;
pub mod triangulate;
