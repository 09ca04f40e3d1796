//! Formula preprocessing: rewrites cell formula syntax into a Rhai expression.

use super::deps::{expand_range, range_ref_re};

/// Rewrite formula text into a Rhai expression.
///
/// - Ranges like `A1:A3` become array literals `[A1, A2, A3]`.
/// - `^` becomes Rhai's power operator `**`.
/// - Integer literals become float literals so arithmetic never truncates.
///
/// String literals are passed through untouched.
pub fn preprocess_formula(formula: &str) -> String {
    let with_ranges = replace_outside_strings(formula, |seg| {
        range_ref_re()
            .replace_all(seg, |caps: &regex::Captures| match expand_range(&caps[1], &caps[2]) {
                Some(cells) => format!(
                    "[{}]",
                    cells
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                None => caps[0].to_string(),
            })
            .to_string()
    });

    replace_outside_strings(&with_ranges, |seg| {
        float_integer_literals(&seg.replace('^', "**"))
    })
}

/// Apply `replace` to every segment of `script` that is not inside a string literal.
fn replace_outside_strings(script: &str, replace: impl Fn(&str) -> String) -> String {
    let bytes = script.as_bytes();
    let mut out = String::with_capacity(script.len());
    let mut seg_start = 0;
    let mut in_string = false;
    let mut backslashes = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if b == b'\\' {
                backslashes += 1;
                i += 1;
                continue;
            }
            if b == b'"' && backslashes.is_multiple_of(2) {
                out.push_str(&script[seg_start..=i]);
                in_string = false;
                seg_start = i + 1;
            }
            backslashes = 0;
            i += 1;
            continue;
        }

        if b == b'"' {
            out.push_str(&replace(&script[seg_start..i]));
            in_string = true;
            seg_start = i;
            backslashes = 0;
        }
        i += 1;
    }

    if seg_start < script.len() {
        if in_string {
            out.push_str(&script[seg_start..]);
        } else {
            out.push_str(&replace(&script[seg_start..]));
        }
    }

    out
}

/// Append `.0` to bare integer literals.
///
/// Digits that are part of an identifier (`A1`), already a float (`1.5`, `1e3`),
/// part of a range (`1..3`) or an array index (`[0]`) are left alone.
fn float_integer_literals(seg: &str) -> String {
    let chars: Vec<char> = seg.chars().collect();
    let mut out = String::with_capacity(seg.len() + 8);
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let starts_literal = c.is_ascii_digit()
            && !prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == '.');
        if !starts_literal {
            out.push(c);
            i += 1;
            continue;
        }

        let start = i;
        i = skip_digits(&chars, i);
        let mut is_float = false;
        if chars.get(i) == Some(&'.') && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
            i = skip_digits(&chars, i + 1);
            is_float = true;
        }
        if let Some(end) = exponent_end(&chars, i) {
            i = end;
            is_float = true;
        }
        out.extend(&chars[start..i]);

        let next = chars.get(i).copied();
        let already_float = is_float || next.is_some_and(|n| n == '.' || n.is_ascii_alphabetic());
        let is_index = chars[..start]
            .iter()
            .rev()
            .find(|ch| !ch.is_whitespace())
            .is_some_and(|ch| *ch == '[');
        if !already_float && !is_index {
            out.push_str(".0");
        }
    }

    out
}

fn skip_digits(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
        i += 1;
    }
    i
}

/// End of an exponent suffix (`e3`, `E-3`, `e+3`) starting at `i`, if there is one.
fn exponent_end(chars: &[char], i: usize) -> Option<usize> {
    if !chars.get(i).is_some_and(|c| *c == 'e' || *c == 'E') {
        return None;
    }
    let mut j = i + 1;
    if chars.get(j).is_some_and(|c| *c == '+' || *c == '-') {
        j += 1;
    }
    if !chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(skip_digits(chars, j))
}
