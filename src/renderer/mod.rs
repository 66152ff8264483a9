//! SVG rendering module
//!
//! The scene is turned into a declarative shape tree (`shapes`) which is then
//! serialized to SVG markup (`svg`).

pub mod shapes;
pub mod svg;

pub use shapes::{Clip, Node, Shape, Transform, build_scene};
pub use svg::{to_svg_document, to_svg_fragment};
