//! Doc comment extraction.

use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// Joins the `///` lines of `attrs` into one paragraph.
///
/// Lines are trimmed and joined with single spaces; blank lines end the
/// paragraph so only the summary is kept. Returns `None` when no doc
/// comment is present.
pub(crate) fn doc_summary(attrs: &[Attribute]) -> Option<String> {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("doc")) {
        let Meta::NameValue(name_value) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) = &name_value.value
        else {
            continue;
        };
        let line = text.value();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        lines.push(trimmed.to_owned());
    }
    (!lines.is_empty()).then(|| lines.join(" "))
}
