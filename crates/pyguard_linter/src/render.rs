//! Renders annotation expressions back to source text. Used by TYP010 to
//! quote both the legacy and modernized spelling of a type, and by its
//! fixer to splice the modernized text back into the file.

use crate::ast::{ConstantValue, Expr};

pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Name(n) => n.id.clone(),
        Expr::Attribute(a) => format!("{}.{}", render_expr(&a.value), a.attr),
        Expr::Subscript(s) => format!("{}[{}]", render_expr(&s.value), render_expr(&s.slice)),
        Expr::BinOp(b) => format!("{} | {}", render_expr(&b.left), render_expr(&b.right)),
        Expr::Tuple(t) => t
            .elts
            .iter()
            .map(render_expr)
            .collect::<Vec<_>>()
            .join(", "),
        Expr::Constant(c) => match &c.value {
            ConstantValue::None => "None".to_string(),
            ConstantValue::Bool(true) => "True".to_string(),
            ConstantValue::Bool(false) => "False".to_string(),
            ConstantValue::Str(s) => format!("\"{s}\""),
            ConstantValue::Other => "...".to_string(),
        },
        Expr::Call(c) => format!(
            "{}({})",
            render_expr(&c.func),
            c.args.iter().map(render_expr).collect::<Vec<_>>().join(", ")
        ),
        Expr::Other(_) => "...".to_string(),
    }
}
