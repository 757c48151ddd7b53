//! Autofixers (C8). Each fixer is a pure `&str -> String` (or, for KW001,
//! `&str -> String` parameterized by config) transform operating on a
//! freshly re-parsed [`crate::ast::Module`] of its own input, so that
//! chaining them in [`pipeline::fix_all`] always sees a consistent tree.
//! Grounded on `original_source/fixers/`.

pub mod edits;
pub mod imp001;
pub mod kw001;
pub mod pipeline;
pub mod typ002;
pub mod typ003;
pub mod typ010;

pub use pipeline::fix_all;
