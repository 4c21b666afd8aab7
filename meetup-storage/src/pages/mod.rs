//! Page data providers: path enumeration and view-model materialization.

pub mod enumerator;
pub mod materializer;

pub use enumerator::PathEnumerator;
pub use materializer::PageMaterializer;
