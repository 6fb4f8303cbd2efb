//! Virtual filesystem for RETROTERM.
//!
//! A read-only base tree generated from profile data, a writable overlay of
//! user files that always takes precedence, and the merged [`VirtualFs`]
//! view the shell navigates.

pub mod node;
pub mod overlay;
pub mod path;
pub mod profile;
pub mod tree;

pub use node::FsNode;
pub use overlay::OverlayStore;
pub use path::CanonicalPath;
pub use profile::{ProfileData, build_base_tree};
pub use tree::{Completion, LsFlags, VirtualFs};
