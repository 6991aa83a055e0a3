//! # baseline-parser
//!
//! Loads baseline JSON documents into typed [`BaselineTree`]s.
//!
//! Every token in a document is resolved through the coordinate model of
//! `baseline-types`; an unknown token, a missing level or an ambiguous
//! statistic kind fails the whole document with a [`BaselineError`] carrying
//! the JSON location. The innermost statistic object is split into test cases
//! by a [`LeafExtractor`], normally the document's
//! [`TestFamily`](baseline_types::TestFamily).

pub mod directory;
pub mod document;
pub mod error;
pub mod extract;
pub mod leaf;
pub mod tree;

pub use directory::BaselineDirectory;
pub use document::BaselineDocument;
pub use error::{BaselineError, ExtractError};
pub use extract::{Extracted, LeafExtractor};
pub use leaf::{BaselineLeaf, LeafValues};
pub use tree::{BaselineTree, CpuView};
