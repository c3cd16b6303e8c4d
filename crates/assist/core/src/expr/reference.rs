//! Bracketed references inside N-value expressions.

use crate::item::{Constituent, ResolutionContext, strip_ruby};

/// One `[...]` occurrence in an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Exact source text including the brackets, used for substitution.
    pub raw: String,
    /// Trimmed text between the brackets.
    pub name: String,
}

impl Reference {
    /// Returns true if this is the item's own `[level]`.
    pub fn is_level(&self) -> bool {
        self.name.eq_ignore_ascii_case("level")
    }

    /// Resolves this reference to a positive level, if possible.
    ///
    /// `[level]` reads the invoking item's level and only applies to item
    /// types that carry one. Any other name is looked up among combo
    /// constituents, exact name first, then with ruby annotations stripped
    /// from both sides.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Option<f64> {
        if self.is_level() {
            if !ctx.kind.carries_level() {
                return None;
            }
            return ctx.level.as_ref()?.extract();
        }

        if ctx.kind != crate::item::ItemKind::Combo {
            return None;
        }

        find_constituent(&ctx.constituents, &self.name)?
            .level
            .as_ref()?
            .extract()
    }
}

fn find_constituent<'a>(constituents: &'a [Constituent], name: &str) -> Option<&'a Constituent> {
    if let Some(exact) = constituents.iter().find(|c| c.name == name) {
        return Some(exact);
    }

    let wanted = strip_ruby(name);
    constituents.iter().find(|c| strip_ruby(&c.name) == wanted)
}

/// Collects every non-empty, non-nested `[...]` in `expression`, in order.
///
/// An opening bracket with no closing bracket after it ends the scan; an
/// empty pair `[]` is skipped.
pub fn find_references(expression: &str) -> Vec<Reference> {
    let mut references = Vec::new();
    let mut rest = expression;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(']') else {
            break;
        };

        if close == 0 {
            rest = after_open;
            continue;
        }

        let inner = &after_open[..close];
        references.push(Reference {
            raw: format!("[{inner}]"),
            name: inner.trim().to_string(),
        });
        rest = &after_open[close + 1..];
    }

    references
}
