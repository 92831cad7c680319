pub mod completions;
pub mod export;
pub mod search;
pub mod stats;
pub mod trace;
