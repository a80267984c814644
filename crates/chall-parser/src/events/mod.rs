mod rewrite;
mod scan;
mod tree;

pub use rewrite::rewrite_variable_blocks;
pub use scan::scan_events;
pub use tree::build_tree;
