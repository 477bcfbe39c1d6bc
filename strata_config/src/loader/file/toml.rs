//! TOML files flattened into dotted names.

use ::toml::{Table, Value};

use super::{RawEntry, SourceError};

pub(super) fn parse(text: &str) -> Result<Vec<RawEntry>, SourceError> {
    let table: Table = ::toml::from_str(text)?;
    let mut entries = Vec::new();
    flatten(None, &table, &mut entries)?;
    Ok(entries)
}

fn flatten(prefix: Option<&str>, table: &Table, out: &mut Vec<RawEntry>) -> Result<(), SourceError> {
    for (key, value) in table {
        let name = prefix.map_or_else(|| key.clone(), |outer| format!("{outer}.{key}"));
        if let Value::Table(inner) = value {
            flatten(Some(&name), inner, out)?;
        } else {
            let text = render(&name, value)?;
            out.push(RawEntry::with_value(name, text));
        }
    }
    Ok(())
}

fn render(key: &str, value: &Value) -> Result<String, SourceError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Integer(number) => Ok(number.to_string()),
        Value::Float(number) => Ok(number.to_string()),
        Value::Boolean(flag) => Ok(flag.to_string()),
        Value::Datetime(stamp) => Ok(stamp.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Table(_) => Err(unsupported(key, item)),
                scalar => render(key, scalar),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.join(",")),
        Value::Table(_) => Err(unsupported(key, value)),
    }
}

fn unsupported(key: &str, value: &Value) -> SourceError {
    SourceError::Unsupported {
        key: key.to_owned(),
        kind: match value {
            Value::Table(_) => "table",
            _ => "nested array",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_become_dotted_names() {
        let text = r#"
            top = "x"

            [app.http]
            PORT = 8080
            ratio = 0.5
            enabled = true
            hosts = ["a", "b"]
            started = 2024-03-01T10:00:00
        "#;
        let entries = parse(text).expect("valid toml");
        assert_eq!(
            entries,
            vec![
                RawEntry::with_value("app.http.PORT", "8080"),
                RawEntry::with_value("app.http.enabled", "true"),
                RawEntry::with_value("app.http.hosts", "a,b"),
                RawEntry::with_value("app.http.ratio", "0.5"),
                RawEntry::with_value("app.http.started", "2024-03-01T10:00:00"),
                RawEntry::with_value("top", "x"),
            ]
        );
    }

    #[test]
    fn strings_keep_whitespace() {
        let entries = parse("name = \"  spaced  \"").expect("valid toml");
        assert_eq!(entries, vec![RawEntry::with_value("name", "  spaced  ")]);
    }

    #[test]
    fn arrays_of_tables_are_rejected() {
        let err = parse("[[servers]]\nname = \"a\"").expect_err("unsupported");
        assert!(matches!(err, SourceError::Unsupported { kind: "table", .. }), "{err}");
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(parse("key = "), Err(SourceError::Toml(_))));
    }
}
