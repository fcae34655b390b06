//! Citation resolution and reference list rendering.

pub mod list;
pub mod resolver;

pub use list::{CitationListBuilder, ReferenceList};
pub use resolver::{decode_record, CitationResolver, Resolution};
