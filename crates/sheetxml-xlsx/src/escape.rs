//! Text escaping for SpreadsheetML parts
//!
//! Besides XML entity escaping, Excel encodes characters that XML 1.0 cannot
//! carry (and carriage returns, which XML parsers normalize away) as
//! `_xHHHH_`. A literal underscore that would otherwise read as such a
//! sequence is written as `_x005F_`.

/// Decode `_xHHHH_` sequences. Malformed sequences are kept as-is.
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match escape_at(candidate) {
            Some(decoded) => {
                result.push(decoded);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Encode characters XML cannot carry as `_xHHHH_`
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for (i, c) in s.char_indices() {
        match c {
            '_' if escape_at(&s[i..]).is_some() => result.push_str("_x005F_"),
            '\t' | '\n' => result.push(c),
            c if (c as u32) < 0x20 => result.push_str(&format!("_x{:04X}_", c as u32)),
            c => result.push(c),
        }
    }

    result
}

/// The character encoded by a `_xHHHH_` sequence at the start of `s`
fn escape_at(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || !s.starts_with("_x") || bytes[6] != b'_' {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Escape XML special characters in text and attribute values
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_control_characters() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("col1_x0009_col2"), "col1\tcol2");
        assert_eq!(
            decode_excel_escapes("line1_x000D__x000A_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_escaped_underscore() {
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_leaves_partial_sequences() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("_xZZZZ_"), "_xZZZZ_");
        assert_eq!(decode_excel_escapes("plain_text"), "plain_text");
    }

    #[test]
    fn test_encode_then_decode() {
        for text in ["a\rb", "tab\tand\nnewline", "bell\u{7}", "_x0041_", "snake_case"] {
            assert_eq!(decode_excel_escapes(&encode_excel_escapes(text)), text);
        }
        assert_eq!(encode_excel_escapes("a\rb"), "a_x000D_b");
        assert_eq!(encode_excel_escapes("_x0041_"), "_x005F_x0041_");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;"
        );
    }
}
