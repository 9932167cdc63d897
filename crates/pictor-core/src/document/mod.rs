//! Narrow interfaces onto the host document model.
//!
//! The session never owns the document; it operates through these seams.
//! The document is a single shared mutable resource, so node references are
//! re-resolved at every mutation point instead of being held across await
//! points.

mod change;
mod model;
mod selection;

pub use change::DocumentChange;
pub use model::{DocumentModel, DocumentWriter};
pub use selection::{NodeId, Position, Selection, SelectionRange};
