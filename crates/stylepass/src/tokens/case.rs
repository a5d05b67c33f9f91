//! Kebab-casing of token path segments

/// Convert a name to kebab case.
///
/// Lower-cases, splits camelCase and acronym boundaries, and collapses
/// `_`, `.`, `-` and whitespace into single dashes. Digits never start a
/// new word, so `2xl` and `h1` survive unchanged.
///
/// ```
/// use stylepass::kebab_case;
///
/// assert_eq!(kebab_case("primaryHover"), "primary-hover");
/// assert_eq!(kebab_case("XMLHttp"), "xml-http");
/// assert_eq!(kebab_case("2xl"), "2xl");
/// ```
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            push_dash(&mut out);
            continue;
        }

        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let starts_word = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                // "XMLHttp": the H begins a word because the next char is lower
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if starts_word {
                push_dash(&mut out);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn push_dash(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(kebab_case("tabletLandscape"), "tablet-landscape");
        assert_eq!(kebab_case("primaryHoverBg"), "primary-hover-bg");
    }

    #[test]
    fn test_already_kebab() {
        assert_eq!(kebab_case("space-md"), "space-md");
    }

    #[test]
    fn test_separators_collapse() {
        assert_eq!(kebab_case("font_family"), "font-family");
        assert_eq!(kebab_case("color.light"), "color-light");
        assert_eq!(kebab_case("a  b"), "a-b");
        assert_eq!(kebab_case("a__b--c"), "a-b-c");
        assert_eq!(kebab_case("--x-"), "x");
    }

    #[test]
    fn test_upper_case_words() {
        assert_eq!(kebab_case("DEFAULT"), "default");
        assert_eq!(kebab_case("XMLHttpRequest"), "xml-http-request");
    }

    #[test]
    fn test_digits_do_not_split() {
        assert_eq!(kebab_case("2xl"), "2xl");
        assert_eq!(kebab_case("h1"), "h1");
        assert_eq!(kebab_case("space2Xl"), "space2-xl");
    }
}
