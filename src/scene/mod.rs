//! Drawable bodies and the scenes that paint them
//!
//! A `Scene` keeps shared handles to bodies in insertion order and paints
//! them back to front. Bodies are plain data plus a pure `render`; nothing
//! here moves anything.

pub mod axes;
pub mod color_plot;
pub mod curve;
pub mod targets;

pub use axes::Axes;
pub use color_plot::ColorPlot;
pub use curve::Curve;
pub use targets::{Door, Office};

use std::cell::RefCell;
use std::rc::Rc;

use crate::renderer::{LogicalPoint, Surface, Transform};

/// Anything a scene can draw
pub trait Body {
    /// Logical anchor every other coordinate of the body is relative to
    fn origin(&self) -> LogicalPoint;

    fn render(&self, surface: &mut dyn Surface, transform: &Transform);
}

/// Shared, mutable body handle as stored by scenes
pub type SharedBody = Rc<RefCell<dyn Body>>;

/// Wrap a body for sharing between the session and its scenes
pub fn shared<B: Body>(body: B) -> Rc<RefCell<B>> {
    Rc::new(RefCell::new(body))
}

/// Insertion-ordered collection of bodies drawn through one transform
pub struct Scene {
    transform: Transform,
    bodies: Vec<SharedBody>,
}

impl Scene {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            bodies: Vec::new(),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Append a body; it draws over everything added before it
    pub fn add<B: Body + 'static>(&mut self, body: Rc<RefCell<B>>) {
        self.bodies.push(body);
    }

    /// Remove the first entry that is this very body; absent bodies are ignored
    pub fn remove<B: Body + 'static>(&mut self, body: &Rc<RefCell<B>>) {
        if let Some(idx) = self.position(body) {
            self.bodies.remove(idx);
        }
    }

    pub fn contains<B: Body + 'static>(&self, body: &Rc<RefCell<B>>) -> bool {
        self.position(body).is_some()
    }

    fn position<B: Body + 'static>(&self, body: &Rc<RefCell<B>>) -> Option<usize> {
        let target = Rc::as_ptr(body) as *const u8;
        self.bodies
            .iter()
            .position(|b| Rc::as_ptr(b) as *const u8 == target)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Clear the surface, then paint every body in insertion order
    pub fn render_all(&self, surface: &mut dyn Surface) {
        surface.clear();
        for body in &self.bodies {
            body.borrow().render(surface, &self.transform);
        }
    }
}
