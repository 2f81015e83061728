pub mod chain;
pub mod config;
pub mod differ;
pub mod identifier;
pub mod inject;
pub mod paths;
pub mod render;
pub mod section;
pub mod source;
pub mod tokens;
pub mod util;
pub mod versions;
pub mod warn;
