//! Decoding of quoted character and string literals.

/// Strips the surrounding `quote` characters from `literal` and resolves the
/// escape sequences `\b \n \r \t \' \" \\`.
pub(crate) fn unquote(literal: &str, quote: char) -> Result<String, String> {
    let body = literal
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .ok_or_else(|| format!("unterminated literal {}", literal))?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\'') => '\'',
            Some('"') => '"',
            Some('\\') => '\\',
            Some(other) => return Err(format!("invalid escape sequence '\\{}'", other)),
            None => return Err("dangling '\\' at end of literal".to_string()),
        };
        out.push(escaped);
    }
    Ok(out)
}

pub(crate) fn decode_character(literal: &str) -> Result<char, String> {
    let decoded = unquote(literal, '\'')?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("character literal {} must hold exactly one character", literal)),
    }
}

pub(crate) fn decode_string(literal: &str) -> Result<String, String> {
    unquote(literal, '"')
}
