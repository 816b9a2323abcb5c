//! Rendering-side collaborators for the Quadrille drawing surface.
//!
//! Provides the retained scene model a backend renders from, plus the
//! grid-paper background modes. The interaction logic lives in
//! `quadrille-core`; this crate only owns strokes and decorative settings.

pub mod grid;
pub mod scene;

pub use grid::GridMode;
pub use scene::RetainedScene;
