//! Nested-rectangle diagramming core.
//!
//! Rectangles are drawn with a lasso and moved by dragging. Containment
//! decides the hierarchy: a new or moved rectangle becomes the child of the
//! tightest rectangle around it, and a lasso adopts the top-level rectangles
//! it encloses.
//!
//! - [`geometry`]: containment and overlap predicates
//! - [`store`]: the copy-on-write rectangle store
//! - [`hierarchy`]: parent, descendant and nesting queries
//! - [`interaction`]: the pointer gesture state machine
//! - [`persistence`]: JSON in a key-value store
//! - [`settings`]: user configuration

pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod settings;
pub mod store;
