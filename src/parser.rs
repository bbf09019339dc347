use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::items::{AstDefinition, Field, TypeSpec};

const CLASS_SEPARATOR: &str = " : ";
const FIELD_SEPARATOR: char = ',';

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Parses a specification of the form `"Binary : Expr left, Token op, Expr right"`.
pub fn parse_spec(spec: &str) -> Result<TypeSpec> {
    let malformed = |reason: String| Error::MalformedSpecification {
        spec: spec.to_string(),
        reason,
    };

    let (class_name, field_list) = spec
        .split_once(CLASS_SEPARATOR)
        .ok_or_else(|| malformed("missing `:` between class name and fields".to_string()))?;

    let class_name = class_name.trim();
    if !is_identifier(class_name) {
        return Err(malformed(format!("`{}` is not a valid class name", class_name)));
    }

    let field_list = field_list.trim();
    if field_list.is_empty() {
        return Err(malformed("at least one field is required".to_string()));
    }

    let mut names = HashSet::new();
    let mut fields = vec![];

    for field in split_fields(field_list).map_err(&malformed)? {
        let field = parse_field(field).map_err(&malformed)?;

        if field.name == class_name {
            return Err(malformed(format!(
                "field `{}` has the same name as its class",
                field.name
            )));
        }

        if !names.insert(field.name.clone()) {
            return Err(malformed(format!("field `{}` is declared twice", field.name)));
        }

        fields.push(field);
    }

    Ok(TypeSpec {
        class_name: class_name.to_string(),
        fields,
    })
}

/// Parses every specification in order, stopping at the first malformed one.
pub fn parse_ast<S: AsRef<str>>(base_name: &str, specs: &[S]) -> Result<AstDefinition> {
    parse_ast_reserving(base_name, specs, &[])
}

/// Like [`parse_ast`], additionally rejecting base, class and field names
/// found in `reserved` (keywords and names the target output already uses).
pub fn parse_ast_reserving<S: AsRef<str>>(
    base_name: &str,
    specs: &[S],
    reserved: &[&str],
) -> Result<AstDefinition> {
    let base_name = base_name.trim();
    if !is_identifier(base_name) || reserved.contains(&base_name) {
        return Err(Error::InvalidBaseName(base_name.to_string()));
    }

    let mut seen = HashSet::new();
    let mut types = Vec::with_capacity(specs.len());

    for spec in specs {
        let spec = spec.as_ref();
        let parsed = parse_spec(spec)?;

        let clash = std::iter::once(&parsed.class_name)
            .chain(parsed.fields.iter().map(|field| &field.name))
            .find(|name| reserved.contains(&name.as_str()));

        if let Some(name) = clash {
            return Err(Error::MalformedSpecification {
                spec: spec.to_string(),
                reason: format!("`{}` is reserved in the generated output", name),
            });
        }

        if parsed.class_name == base_name {
            return Err(Error::MalformedSpecification {
                spec: spec.to_string(),
                reason: format!("`{}` cannot derive from itself", base_name),
            });
        }

        if !seen.insert(parsed.class_name.clone()) {
            return Err(Error::DuplicateClass(parsed.class_name));
        }

        types.push(parsed);
    }

    Ok(AstDefinition {
        base_name: base_name.to_string(),
        types,
    })
}

/// Splits on `", "` outside of any `<>`, `()`, `[]` or `{}` pair, so that
/// `std::map<std::string, Value> env` stays a single field.
fn split_fields(list: &str) -> Result<Vec<&str>, String> {
    let mut fields = vec![];
    let mut depth: usize = 0;
    let mut start = 0;

    let mut previous = None;

    for (index, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            // `->` of a trailing return type closes nothing
            '>' if previous == Some('-') => (),
            '>' | ')' | ']' | '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced `{}` in field list", c))?;
            }
            FIELD_SEPARATOR if depth == 0 && list[index + 1..].starts_with(' ') => {
                fields.push(&list[start..index]);
                start = index + 2;
            }
            _ => (),
        }

        previous = Some(c);
    }

    if depth != 0 {
        return Err("unclosed bracket in field list".to_string());
    }

    fields.push(&list[start..]);

    Ok(fields)
}

fn parse_field(field: &str) -> Result<Field, String> {
    let field = field.trim();

    // The type may span several tokens (`unsigned int`), the name is the last one
    let (ty, name) = field
        .rsplit_once(' ')
        .ok_or_else(|| format!("field `{}` has no space between type and name", field))?;

    let (ty, name) = (ty.trim(), name.trim());

    if ty.is_empty() {
        return Err(format!("field `{}` has an empty type", name));
    }

    if !is_identifier(name) {
        return Err(format!("`{}` is not a valid field name", name));
    }

    Ok(Field {
        ty: ty.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(ty: &str, name: &str) -> Field {
        Field {
            ty: ty.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn parses_class_name_and_fields_in_order() {
        let spec =
            parse_spec("Binary : std::shared_ptr<Expr> left, Token op, std::shared_ptr<Expr> right")
                .unwrap();

        assert_eq!(spec.class_name, "Binary");
        assert_eq!(
            spec.fields,
            vec![
                field("std::shared_ptr<Expr>", "left"),
                field("Token", "op"),
                field("std::shared_ptr<Expr>", "right"),
            ]
        );
    }

    #[test]
    fn trims_padded_class_names() {
        let spec = parse_spec("Grouping : std::shared_ptr<Expr> expression").unwrap();
        assert_eq!(spec.class_name, "Grouping");

        let spec = parse_spec("Unary    : Token op, std::shared_ptr<Expr> right").unwrap();
        assert_eq!(spec.class_name, "Unary");
        assert_eq!(spec.fields.len(), 2);
    }

    #[test]
    fn type_keeps_every_token_but_the_last() {
        let spec = parse_spec("Counter : unsigned long int count").unwrap();
        assert_eq!(spec.fields, vec![field("unsigned long int", "count")]);
    }

    #[test]
    fn commas_without_space_stay_in_the_type() {
        let spec = parse_spec("Literal : std::variant<double,std::string,std::monostate> value").unwrap();
        assert_eq!(
            spec.fields,
            vec![field("std::variant<double,std::string,std::monostate>", "value")]
        );
    }

    #[test]
    fn nested_comma_space_does_not_split_a_field() {
        let spec = parse_spec("Scope : std::map<std::string, int> env, Token name").unwrap();
        assert_eq!(
            spec.fields,
            vec![field("std::map<std::string, int>", "env"), field("Token", "name")]
        );
    }

    #[test]
    fn arrow_inside_a_type_is_not_a_closing_bracket() {
        let spec = parse_spec("Callback : std::function<auto(int) -> int> f, Token name").unwrap();
        assert_eq!(
            spec.fields,
            vec![field("std::function<auto(int) -> int>", "f"), field("Token", "name")]
        );
    }

    #[test]
    fn field_named_like_its_class_is_malformed() {
        let err = parse_spec("Value : Token Value").unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification { .. }));
        assert!(err.to_string().contains("same name as its class"));
    }

    #[test]
    fn reserved_names_are_rejected() {
        let reserved = ["class", "Visitor", "Token"];
        let parse = |spec: &str| parse_ast_reserving("Expr", &[spec], &reserved);

        assert!(matches!(parse("Call : Token class"), Err(Error::MalformedSpecification { .. })));
        assert!(matches!(parse("Visitor : Token op"), Err(Error::MalformedSpecification { .. })));
        assert!(matches!(parse("Token : Expr value"), Err(Error::MalformedSpecification { .. })));
        assert!(parse("Call : Token callee").is_ok());
        assert!(matches!(
            parse_ast_reserving("Visitor", &["Literal : Token value"], &reserved),
            Err(Error::InvalidBaseName(_))
        ));
    }

    #[test]
    fn missing_class_separator_is_malformed() {
        let err = parse_spec("Binary std::shared_ptr<Expr> left").unwrap_err();
        match err {
            Error::MalformedSpecification { spec, .. } => {
                assert_eq!(spec, "Binary std::shared_ptr<Expr> left")
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn field_without_name_is_malformed() {
        let err = parse_spec("Literal : Token").unwrap_err();
        assert!(matches!(err, Error::MalformedSpecification { .. }));
        assert!(err.to_string().contains("no space"));
    }

    #[test]
    fn rejects_invalid_names_and_duplicates() {
        assert!(parse_spec("Bad Name : Token op").is_err());
        assert!(parse_spec("Call : Token &op").is_err());
        assert!(parse_spec("Pair : Token a, Token a").is_err());
        assert!(parse_spec("Empty : ").is_err());
        assert!(parse_spec("Broken : std::vector<int>> items").is_err());
        assert!(parse_spec("Broken : std::vector<int items").is_err());
    }

    #[test]
    fn parse_ast_keeps_input_order() {
        let ast = parse_ast("Expr", &["Unary : Token op, Expr right", "Binary : Expr left, Token op, Expr right"])
            .unwrap();

        assert_eq!(ast.base_name, "Expr");
        let names: Vec<_> = ast.types.iter().map(|t| t.class_name.as_str()).collect();
        assert_eq!(names, ["Unary", "Binary"]);
    }

    #[test]
    fn parse_ast_stops_at_first_malformed_spec() {
        let err = parse_ast("Expr", &["Literal : Token value", "Oops", "Also wrong"]).unwrap_err();
        match err {
            Error::MalformedSpecification { spec, .. } => assert_eq!(spec, "Oops"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn parse_ast_validates_definition() {
        assert!(matches!(
            parse_ast("my expr", &["Literal : Token value"]),
            Err(Error::InvalidBaseName(_))
        ));
        assert!(matches!(
            parse_ast("Expr", &["Literal : Token value", "Literal : Token other"]),
            Err(Error::DuplicateClass(name)) if name == "Literal"
        ));
        assert!(matches!(
            parse_ast("Expr", &["Expr : Token value"]),
            Err(Error::MalformedSpecification { .. })
        ));
    }
}
