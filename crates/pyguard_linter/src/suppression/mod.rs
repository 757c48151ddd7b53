pub mod engine;
pub mod pragma;

pub use engine::apply_ignores;
pub use pragma::{parse_ignore_directives, IgnoreDirective};
