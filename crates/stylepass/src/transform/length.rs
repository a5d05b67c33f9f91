//! Pixel to root-em conversion

use super::Transform;
use crate::config::DEFAULT_REM_BASE;
use crate::stylesheet::{ComponentValue, Dimension, Unit};
use crate::visit::{ComposedVisitor, Rewrite};

/// Rewrites `px` dimensions to `rem` by dividing by a fixed base.
///
/// - `0px` becomes a bare `0`.
/// - Any other unit is left alone, which also makes the pass idempotent.
/// - The division is plain `f64` division: `18px` is `1.125rem` at base 16.
///
/// # Example
///
/// ```
/// use stylepass::{ComponentValue, Dimension, LengthNormalizer, Rewrite, Unit};
///
/// let normalizer = LengthNormalizer::default();
/// assert_eq!(
///     normalizer.normalize(&Dimension::px(18.0)),
///     Rewrite::Replace(ComponentValue::dimension(1.125, Unit::Rem))
/// );
/// assert_eq!(normalizer.normalize(&Dimension::rem(2.0)), Rewrite::Unchanged);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthNormalizer {
    base: f64,
}

impl Default for LengthNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_REM_BASE)
    }
}

impl LengthNormalizer {
    /// Create a normalizer with the given pixels-per-rem base.
    pub fn new(base: f64) -> Self {
        Self { base }
    }

    /// Pixels per rem.
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Convert one dimension.
    pub fn normalize(&self, dim: &Dimension) -> Rewrite<ComponentValue> {
        match dim.unit {
            Unit::Px if dim.value == 0.0 => Rewrite::Replace(ComponentValue::number(0.0)),
            Unit::Px => Rewrite::Replace(ComponentValue::Dimension(Dimension::rem(
                dim.value / self.base,
            ))),
            _ => Rewrite::Unchanged,
        }
    }
}

impl Transform for LengthNormalizer {
    fn name(&self) -> &'static str {
        "length-normalizer"
    }

    fn register<'a>(&'a self, visitor: &mut ComposedVisitor<'a>) {
        visitor.on_dimension(self.name(), move |dim, _ctx| self.normalize(dim));
    }
}
