//! Rewrite passes over the style sheet
//!
//! Each pass implements [`Transform`] by registering handlers on a
//! [`ComposedVisitor`]. Passes hold only configuration and read-only
//! tables, so one instance can be registered on any number of visitors.

mod inject;
mod length;
mod root;

pub use inject::TokenInjector;
pub use length::LengthNormalizer;
pub use root::{insert_root_rule, root_custom_properties};

use crate::visit::ComposedVisitor;

/// A rewrite pass that can be composed with others into one traversal.
pub trait Transform {
    /// Name used in logs and handler listings.
    fn name(&self) -> &'static str;

    /// Register this pass's handlers. Handlers may borrow `self`.
    fn register<'a>(&'a self, visitor: &mut ComposedVisitor<'a>);
}
