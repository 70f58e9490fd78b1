/// Quote a column or table reference as an SQL identifier.
///
/// Dotted references are quoted per segment (`users.name` becomes
/// `"users"."name"`) and a trailing `*` is kept bare. Anything that already
/// looks like an expression (whitespace, parentheses, quotes, operators) is
/// passed through untouched so callers can still hand in `COUNT(*)` or an
/// aliased table such as `users u`.
pub fn quote_ident(name: &str) -> String {
    if name.is_empty() || name == "*" || is_expression(name) {
        return name.to_string();
    }

    name.split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                format!("\"{part}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Qualify `column` with `table` and quote the result
pub fn qualified(table: &str, column: &str) -> String {
    if column.contains('.') || is_expression(table) {
        return quote_ident(column);
    }
    quote_ident(&format!("{table}.{column}"))
}

fn is_expression(name: &str) -> bool {
    name.chars().any(|c| {
        c.is_whitespace()
            || matches!(
                c,
                '(' | ')' | '"' | '\'' | '`' | '=' | '<' | '>' | ',' | '+' | '-' | '/' | ':' | ';'
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_dotted_identifiers() {
        assert_eq!(quote_ident("name"), "\"name\"");
        assert_eq!(quote_ident("users.name"), "\"users\".\"name\"");
        assert_eq!(quote_ident("users.*"), "\"users\".*");
        assert_eq!(quote_ident("*"), "*");
    }

    #[test]
    fn test_expressions_pass_through() {
        assert_eq!(quote_ident("COUNT(*)"), "COUNT(*)");
        assert_eq!(quote_ident("users u"), "users u");
        assert_eq!(quote_ident("\"already\""), "\"already\"");
    }

    #[test]
    fn test_qualified_column() {
        assert_eq!(qualified("users", "id"), "\"users\".\"id\"");
        assert_eq!(qualified("users", "langs.id"), "\"langs\".\"id\"");
        assert_eq!(qualified("users u", "id"), "\"id\"");
    }
}
