//! AST collection: the node streams the load engine consumes.

use css_parser::{
    parse_at_value, parse_composes, AtRule, AtValue, ClassSelector, Composes, Item, Stylesheet,
};

/// The constructs of one sheet, each stream in document order.
pub(crate) struct Collected<'a> {
    /// `@import` at-rules.
    pub imports: Vec<&'a AtRule>,
    /// Every class selector occurrence, including inside nested at-rules and
    /// pseudo-class arguments.
    pub classes: Vec<&'a ClassSelector>,
    /// Parsed `@value` at-rules paired with their rule for position lookup.
    pub values: Vec<(&'a AtRule, AtValue)>,
    /// Parsed `composes` declaration values.
    pub composes: Vec<Composes>,
}

/// Walks the AST once and buckets what the load engine needs.
pub(crate) fn collect(sheet: &Stylesheet) -> Collected<'_> {
    let mut collected = Collected {
        imports: Vec::new(),
        classes: Vec::new(),
        values: Vec::new(),
        composes: Vec::new(),
    };
    walk(&sheet.items, &mut collected);
    collected
}

fn walk<'a>(items: &'a [Item], collected: &mut Collected<'a>) {
    for item in items {
        match item {
            Item::Rule(rule) => {
                collected.classes.extend(rule.class_selectors());
                for declaration in &rule.declarations {
                    if declaration.property == "composes" || declaration.property == "compose-with"
                    {
                        if let Some(composes) = parse_composes(&declaration.value) {
                            collected.composes.push(composes);
                        }
                    }
                }
            }
            Item::AtRule(at) => {
                match at.name.as_str() {
                    "import" => collected.imports.push(at),
                    "value" => {
                        if let Some(value) = parse_at_value(&at.params) {
                            collected.values.push((at, value));
                        }
                    }
                    _ => {}
                }
                if let Some(nested) = &at.items {
                    walk(nested, collected);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_parser::parse;

    #[test]
    fn test_streams_preserve_document_order() {
        let source = r#"
@import "./first.css";
.block { color: red }
@value gap: 4px;
@media screen { .wide { composes: block } }
@import "./second.css";
"#;
        let sheet = parse(source).unwrap();
        let collected = collect(&sheet);

        assert_eq!(collected.imports.len(), 2);
        assert_eq!(collected.imports[0].params, "\"./first.css\"");
        assert_eq!(collected.imports[1].params, "\"./second.css\"");

        let names: Vec<_> = collected.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["block", "wide"]);

        assert_eq!(collected.values.len(), 1);
        assert_eq!(collected.composes.len(), 1);
    }

    #[test]
    fn test_unparseable_value_is_skipped() {
        let sheet = parse("@value ;").unwrap();
        let collected = collect(&sheet);
        assert!(collected.values.is_empty());
    }
}
