//! The vector field abstraction consumed by streamline generators.

use crate::vector::Vector2;

/// A continuous 2-D vector field.
///
/// `None` means the position lies outside the field's valid domain.
pub trait VectorField {
    fn sample(&self, position: Vector2) -> Option<Vector2>;
}

impl<F> VectorField for F
where
    F: Fn(Vector2) -> Option<Vector2>,
{
    fn sample(&self, position: Vector2) -> Option<Vector2> {
        self(position)
    }
}
