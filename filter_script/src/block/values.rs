//! Value parsers for the text after an item keyword.
//!
//! Every parser returns `None` for malformed input; the caller skips the line.

use filter_data::{Color, DEFAULT_SOUND_VOLUME, FilterOperator, ItemKind, ItemRarity, NumericFilterPredicate};

use crate::lines::split_comment;

/// `[op] operand`, where a missing operator means `=`. `Rarity` operands may
/// be rarity names.
pub(super) fn parse_numeric(kind: ItemKind, rest: &str) -> Option<NumericFilterPredicate> {
    let (body, _comment) = split_comment(rest);
    let body = body.trim();
    let op_len = body
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '!'))
        .unwrap_or(body.len());
    let (op_text, operand_text) = body.split_at(op_len);
    let operator = if op_text.is_empty() {
        FilterOperator::Equal
    } else {
        FilterOperator::from_symbol(op_text)?
    };
    let operand_text = operand_text.trim();
    if operand_text.is_empty() || operand_text.contains(char::is_whitespace) {
        return None;
    }
    let operand = match operand_text.parse::<i32>() {
        Ok(value) => value,
        Err(_) if kind == ItemKind::Rarity => ItemRarity::from_name(operand_text)?.value(),
        Err(_) => return None,
    };
    Some(NumericFilterPredicate::new(operator, operand))
}

/// Bare words and double-quoted phrases. Quoted phrases keep their inner
/// spaces; an unterminated quote runs to the end of the line. A `#` outside
/// quotes starts a comment.
pub(super) fn parse_string_list(rest: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    let mut chars = rest.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '#' {
            break;
        }
        let mut token = String::new();
        if c == '"' {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '"' {
                    break;
                }
                token.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '"' || ch == '#' {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        if !token.is_empty() {
            values.push(token);
        }
    }

    (!values.is_empty()).then_some(values)
}

/// A single `True`/`False` token, any case.
pub(super) fn parse_boolean(rest: &str) -> Option<bool> {
    let (body, _comment) = split_comment(rest);
    let mut tokens = body.split_whitespace();
    let token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// `R G B [A] [# label]`.
pub(super) fn parse_color(rest: &str) -> Option<(Color, Option<String>)> {
    let (body, comment) = split_comment(rest);
    let components = body
        .split_whitespace()
        .map(|token| token.parse::<u8>().ok())
        .collect::<Option<Vec<u8>>>()?;
    let color = match components.as_slice() {
        [r, g, b] => Color::rgb(*r, *g, *b),
        [r, g, b, a] => Color::rgba(*r, *g, *b, *a),
        _ => return None,
    };
    let label = comment.map(str::trim).filter(|label| !label.is_empty()).map(str::to_string);
    Some((color, label))
}

/// A single integer token.
pub(super) fn parse_integer(rest: &str) -> Option<i32> {
    let (body, _comment) = split_comment(rest);
    let mut tokens = body.split_whitespace();
    let value = tokens.next()?.parse::<i32>().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(value)
}

/// `id [volume]`.
pub(super) fn parse_sound(rest: &str) -> Option<(String, u16)> {
    let (body, _comment) = split_comment(rest);
    let mut tokens = body.split_whitespace();
    let id = tokens.next()?.to_string();
    let volume = match tokens.next() {
        Some(token) => token.parse::<u16>().ok()?,
        None => DEFAULT_SOUND_VOLUME,
    };
    if tokens.next().is_some() {
        return None;
    }
    Some((id, volume))
}

/// The trailing comment of a presence-only line. Any value tokens before it
/// are ignored.
pub(super) fn parse_presence(rest: &str) -> Option<String> {
    let (_body, comment) = split_comment(rest);
    comment.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_operator_defaults_to_equal() {
        let explicit = parse_numeric(ItemKind::Quality, " = 15");
        let implicit = parse_numeric(ItemKind::Quality, " 15");
        assert_eq!(explicit, implicit);
        assert_eq!(implicit, Some(NumericFilterPredicate::new(FilterOperator::Equal, 15)));
    }

    #[test]
    fn numeric_accepts_glued_operators() {
        assert_eq!(
            parse_numeric(ItemKind::ItemLevel, " >=75"),
            Some(NumericFilterPredicate::new(FilterOperator::GreaterOrEqual, 75))
        );
        assert_eq!(
            parse_numeric(ItemKind::Sockets, " != 3 # not three"),
            Some(NumericFilterPredicate::new(FilterOperator::NotEqual, 3))
        );
    }

    #[test]
    fn numeric_rejects_malformed_values() {
        assert_eq!(parse_numeric(ItemKind::Quality, ""), None);
        assert_eq!(parse_numeric(ItemKind::Quality, " >"), None);
        assert_eq!(parse_numeric(ItemKind::Quality, " => 5"), None);
        assert_eq!(parse_numeric(ItemKind::Quality, " = high"), None);
        assert_eq!(parse_numeric(ItemKind::Quality, " 5 6"), None);
    }

    #[test]
    fn rarity_operands_may_be_names() {
        assert_eq!(
            parse_numeric(ItemKind::Rarity, " >= rare"),
            Some(NumericFilterPredicate::new(FilterOperator::GreaterOrEqual, 2))
        );
        assert_eq!(
            parse_numeric(ItemKind::Rarity, " Unique"),
            Some(NumericFilterPredicate::new(FilterOperator::Equal, 3))
        );
        assert_eq!(parse_numeric(ItemKind::Quality, " Unique"), None);
    }

    #[test]
    fn string_lists_mix_quoted_and_bare_words() {
        assert_eq!(
            parse_string_list(r#" "Test Class 1" TestOneWordClass"#),
            Some(vec!["Test Class 1".to_string(), "TestOneWordClass".to_string()])
        );
        assert_eq!(
            parse_string_list(r#" "Unterminated phrase"#),
            Some(vec!["Unterminated phrase".to_string()])
        );
        assert_eq!(parse_string_list(r#" Rings # trailing"#), Some(vec!["Rings".to_string()]));
        assert_eq!(parse_string_list(r#" "" "#), None);
        assert_eq!(parse_string_list(""), None);
    }

    #[test]
    fn booleans_are_case_insensitive_single_tokens() {
        assert_eq!(parse_boolean(" true"), Some(true));
        assert_eq!(parse_boolean(" TRUE"), Some(true));
        assert_eq!(parse_boolean(" False"), Some(false));
        assert_eq!(parse_boolean(" yes"), None);
        assert_eq!(parse_boolean(" True False"), None);
        assert_eq!(parse_boolean(""), None);
    }

    #[test]
    fn colours_take_three_or_four_components() {
        assert_eq!(parse_color(" 255 20 100"), Some((Color::rgba(255, 20, 100, 240), None)));
        assert_eq!(parse_color(" 65 0 255 12"), Some((Color::rgba(65, 0, 255, 12), None)));
        assert_eq!(
            parse_color(" 1 2 3 # Currency Text "),
            Some((Color::rgb(1, 2, 3), Some("Currency Text".to_string())))
        );
        assert_eq!(parse_color(" 1 2"), None);
        assert_eq!(parse_color(" 1 2 3 4 5"), None);
        assert_eq!(parse_color(" 1 2 300"), None);
    }

    #[test]
    fn sounds_default_their_volume() {
        assert_eq!(parse_sound(" 3"), Some(("3".to_string(), DEFAULT_SOUND_VOLUME)));
        assert_eq!(parse_sound(" ShAlchemy 200"), Some(("ShAlchemy".to_string(), 200)));
        assert_eq!(parse_sound(" 3 loud"), None);
        assert_eq!(parse_sound(""), None);
    }

    #[test]
    fn presence_keeps_only_the_comment() {
        assert_eq!(parse_presence(""), None);
        assert_eq!(parse_presence(" True # keep it quiet"), Some("keep it quiet".to_string()));
        assert_eq!(parse_presence(" #"), None);
    }

    #[test]
    fn integers_are_single_tokens() {
        assert_eq!(parse_integer(" 40"), Some(40));
        assert_eq!(parse_integer(" 40 41"), None);
        assert_eq!(parse_integer(" big"), None);
    }
}
