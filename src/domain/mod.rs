// Domain model and analysis engine for gomap.

pub mod aggregate;
pub mod analysis;
pub mod ast;
pub mod callgraph;
pub mod declaration;
pub mod dir_tree;
pub mod entry_point;
pub mod error;
pub mod extractor;
pub mod imports;
pub mod model;
pub mod registry;
pub mod resolver;
