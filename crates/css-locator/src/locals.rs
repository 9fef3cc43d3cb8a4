//! Local token enumeration: which class names does a sheet itself declare?
//!
//! Implements the CSS Modules local-by-default rule over the parsed AST:
//! class selectors are local unless they appear under a `:global` scope,
//! either the functional form `:global(…)` or the bare switch `:global`
//! (undone by `:local`). The result is a *set of names*; occurrences are
//! filtered by name downstream, which accepts the known false positive where
//! a local name collides with a globally referenced one.

use css_parser::{Item, SelectorPart, Stylesheet};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Local,
    Global,
}

/// Returns the set of class names the sheet declares locally.
pub(crate) fn local_class_names(sheet: &Stylesheet) -> FxHashSet<SmolStr> {
    let mut names = FxHashSet::default();
    walk_items(&sheet.items, &mut names);
    names
}

fn walk_items(items: &[Item], names: &mut FxHashSet<SmolStr>) {
    for item in items {
        match item {
            Item::Rule(rule) => {
                for selector in &rule.selectors {
                    walk_parts(&selector.parts, Mode::Local, names);
                }
            }
            Item::AtRule(at) => {
                if let Some(nested) = &at.items {
                    walk_items(nested, names);
                }
            }
        }
    }
}

fn walk_parts(parts: &[SelectorPart], mut mode: Mode, names: &mut FxHashSet<SmolStr>) {
    for part in parts {
        match part {
            SelectorPart::Class(class) => {
                if mode == Mode::Local {
                    names.insert(class.name.clone());
                }
            }
            SelectorPart::Pseudo { name, args, .. } => {
                let scope = match name.as_str() {
                    "global" => Some(Mode::Global),
                    "local" => Some(Mode::Local),
                    _ => None,
                };
                match (scope, args) {
                    // `:global(…)` / `:local(…)` scope only their arguments.
                    (Some(scope), Some(inner)) => walk_parts(inner, scope, names),
                    // Bare `:global` / `:local` switch the rest of the
                    // selector.
                    (Some(scope), None) => mode = scope,
                    // Other functional pseudos (`:not`, `:is`, …) keep the
                    // surrounding mode for their arguments.
                    (None, Some(inner)) => walk_parts(inner, mode, names),
                    (None, None) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_parser::parse;

    fn locals(source: &str) -> Vec<String> {
        let sheet = parse(source).unwrap();
        let mut names: Vec<String> = local_class_names(&sheet)
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_plain_classes_are_local() {
        assert_eq!(locals(".a {} .b .c {}"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_global_fn_is_not_local() {
        assert_eq!(locals(":global(.header) .content {}"), vec!["content"]);
    }

    #[test]
    fn test_global_switch_scopes_rest_of_selector() {
        assert_eq!(locals(".a :global .b .c {}"), vec!["a"]);
    }

    #[test]
    fn test_local_switch_restores() {
        assert_eq!(locals(":global .a :local .b {}"), vec!["b"]);
    }

    #[test]
    fn test_local_fn_inside_global_switch() {
        assert_eq!(locals(":global .a:local(.b) {}"), vec!["b"]);
    }

    #[test]
    fn test_classes_inside_not_keep_mode() {
        assert_eq!(locals("li:not(.skip) {}"), vec!["skip"]);
        assert_eq!(locals(":global(li:not(.skip)) {}"), Vec::<String>::new());
    }

    #[test]
    fn test_nested_at_rules_are_walked() {
        assert_eq!(locals("@media screen { .wide {} }"), vec!["wide"]);
    }

    #[test]
    fn test_switch_resets_per_selector() {
        assert_eq!(locals(":global .a, .b {}"), vec!["b"]);
    }
}
