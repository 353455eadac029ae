//! Go struct tag lookup.
//!
//! Follows the conventional `key:"value" key2:"value2"` format: keys are runs
//! of non-space, non-quote, non-colon characters, values are Go interpreted
//! string literals. Scanning stops at the first malformed pair, so keys after
//! a syntax error are invisible.

/// A borrowed struct tag (the content between the backticks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    #[must_use]
    pub const fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Value of `key`, if present and well formed. An empty value is still
    /// returned as `Some("")`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut tag = self.0;
        loop {
            tag = tag.trim_start_matches(' ');
            if tag.is_empty() {
                return None;
            }

            let bytes = tag.as_bytes();
            let mut i = 0;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                return None;
            }
            let name = &tag[..i];
            tag = &tag[i + 1..];

            let bytes = tag.as_bytes();
            let mut j = 1;
            while j < bytes.len() && bytes[j] != b'"' {
                if bytes[j] == b'\\' {
                    j += 1;
                }
                j += 1;
            }
            if j >= bytes.len() {
                return None;
            }
            let quoted = &tag[..=j];
            tag = &tag[j + 1..];

            if name == key {
                return unquote(quoted);
            }
        }
    }

    /// Value of `key` when present and not blank.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).filter(|v| !v.trim().is_empty())
    }
}

/// Decode a Go string literal: interpreted (`"..."`) or raw (`` `...` ``).
#[must_use]
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return Some(raw.replace('\r', ""));
    }
    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    'a' => '\u{07}',
                    'b' => '\u{08}',
                    'f' => '\u{0c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{0b}',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    'x' => hex_char(&mut chars, 2)?,
                    'u' => hex_char(&mut chars, 4)?,
                    'U' => hex_char(&mut chars, 8)?,
                    d @ '0'..='7' => {
                        let mut value = d.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        char::from_u32(value)?
                    }
                    _ => return None,
                };
                out.push(escaped);
            }
            other => out.push(other),
        }
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const TAG: &str = r#"json:"name,omitempty" xml:"n"  yaml:"" db:"user \"name\"""#;

    #[rstest]
    #[case("json", Some("name,omitempty"))]
    #[case("xml", Some("n"))]
    #[case("yaml", Some(""))]
    #[case("db", Some("user \"name\""))]
    #[case("toml", None)]
    #[case("nam", None)]
    fn looks_up_keys(#[case] key: &str, #[case] expected: Option<&str>) {
        assert_eq!(StructTag::new(TAG).lookup(key).as_deref(), expected);
    }

    #[test]
    fn get_treats_blank_values_as_absent() {
        let tag = StructTag::new(r#"json:"  " xml:"x""#);
        assert_eq!(tag.get("json"), None);
        assert_eq!(tag.get("xml").as_deref(), Some("x"));
    }

    #[test]
    fn scanning_stops_at_malformed_pair() {
        let tag = StructTag::new(r#"json:"a" broken xml:"b""#);
        assert_eq!(tag.lookup("json").as_deref(), Some("a"));
        assert_eq!(tag.lookup("xml"), None);
    }

    #[test]
    fn unterminated_value_is_not_found() {
        assert_eq!(StructTag::new(r#"json:"abc"#).lookup("json"), None);
    }

    #[rstest]
    #[case(r#""plain""#, Some("plain"))]
    #[case(r#""tab\there""#, Some("tab\there"))]
    #[case(r#""\x41é\101""#, Some("Aé\u{41}"))]
    #[case("`raw \\n`", Some("raw \\n"))]
    #[case(r#""bad\q""#, None)]
    #[case("noquotes", None)]
    fn unquotes_go_literals(#[case] literal: &str, #[case] expected: Option<&str>) {
        assert_eq!(unquote(literal).as_deref(), expected);
    }
}
