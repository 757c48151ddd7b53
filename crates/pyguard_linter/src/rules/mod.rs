pub mod exp001;
pub mod exp002;
pub mod imp001;
pub mod kw001;
pub mod ret001;
pub mod typ001;
pub mod typ002;
pub mod typ003;
pub mod typ010;

/// True for dunder names (`__init__`, `__repr__`, ...), matching the
/// exemption check shared by TYP001 and KW001.
pub(crate) fn is_dunder(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__") && name.len() > 4
}

/// True for "private by convention" single-leading-underscore names that
/// are not dunders.
pub(crate) fn is_private(name: &str) -> bool {
    name.starts_with('_') && !is_dunder(name)
}
