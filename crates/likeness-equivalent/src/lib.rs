//! likeness-equivalent - Structural equivalence between runtime values.
//!
//! Two values are equivalent when they have the same shape, regardless of
//! collection order or numeric representation. On mismatch the check reports
//! where it happened (dotted member path) and what differed, as an
//! [`EquivalenceFailure`].
//!
//! # Example
//!
//! ```
//! use likeness_equivalent::{Equivalence, FailureKind};
//!
//! let engine = Equivalence::new();
//! assert!(engine.verify(Some(&vec![1_i32, 2, 2]), Some(&vec![2_i32, 1, 2]), true).is_ok());
//!
//! let failure = engine
//!     .verify(Some(&vec![1_i32, 2]), Some(&vec![1_i32, 2, 3]), true)
//!     .unwrap_err();
//! assert_eq!(failure.kind(), FailureKind::ExtraCollectionValue);
//! ```

mod engine;
mod failure;
mod render;

pub use engine::{Equivalence, EquivalenceBuilder, EquivalenceOptions};
pub use failure::{EquivalenceFailure, FailureKind, Side};
pub use render::{DebugRender, Render};
