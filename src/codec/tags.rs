//! Tokens of the line format and value text forms
//!
//! ```text
//! <db.ID>2</db.ID><db.br/><db.Name>B<db.break/>C</db.Name><db.br/><db.IsActive>False</db.IsActive>
//! ```
//!
//! Scalar text forms follow what existing store files contain: booleans are
//! `True`/`False`, floats use shortest round-trip digits and switch to
//! `dE+XX` notation for large and small magnitudes.

/// Literal marker between encoded fields within a line
pub const FIELD_SEPARATOR: &str = "<db.br/>";

/// Literal marker substituted for newlines inside text values
pub const BREAK_SENTINEL: &str = "<db.break/>";

/// Line terminator written after each line
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Line terminator written after each line
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// `<db.NAME>`
pub fn open_tag(name: &str) -> String {
    format!("<db.{}>", name)
}

/// `</db.NAME>`
pub fn close_tag(name: &str) -> String {
    format!("</db.{}>", name)
}

/// `<db.NAME>text</db.NAME>`
pub fn wrap(name: &str, text: &str) -> String {
    format!("<db.{name}>{text}</db.{name}>")
}

/// Renders a bool the way store files spell it.
pub fn render_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Parses a bool, ignoring case and surrounding whitespace.
pub fn parse_bool(text: &str) -> Option<bool> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Renders a float with shortest round-trip digits.
///
/// Decimal exponents >= 15 or <= -5 use `dE+XX` / `dE-XX`.
pub fn render_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:e}", x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return format!("{}", x),
    };

    if (-4..15).contains(&exp) {
        format!("{}", x)
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", mantissa, sign, exp.abs())
    }
}

/// Parses a float in any of the forms `render_float` produces, plus the
/// usual Rust spellings.
pub fn parse_float(text: &str) -> Option<f64> {
    match text.trim() {
        "∞" | "+∞" | "Infinity" => Some(f64::INFINITY),
        "-∞" | "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        t => t.parse::<f64>().ok(),
    }
}

/// Parses an integer, ignoring surrounding whitespace.
pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(open_tag("ID"), "<db.ID>");
        assert_eq!(close_tag("ID"), "</db.ID>");
        assert_eq!(wrap("Name", "A"), "<db.Name>A</db.Name>");
    }

    #[test]
    fn test_bool_forms() {
        assert_eq!(render_bool(true), "True");
        assert_eq!(render_bool(false), "False");
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool(" false "), Some(false));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_float_fixed_range() {
        assert_eq!(render_float(1.5), "1.5");
        assert_eq!(render_float(19.234), "19.234");
        assert_eq!(render_float(18.224452), "18.224452");
        assert_eq!(render_float(-2.0), "-2");
        assert_eq!(render_float(0.0001), "0.0001");
        assert_eq!(render_float(100000000000000.0), "100000000000000");
    }

    #[test]
    fn test_float_scientific_range() {
        assert_eq!(render_float(1e15), "1E+15");
        assert_eq!(render_float(1.5e20), "1.5E+20");
        assert_eq!(render_float(0.00001), "1E-05");
        assert_eq!(render_float(-2.5e-7), "-2.5E-07");
        assert_eq!(render_float(1e300), "1E+300");
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(render_float(0.0), "0");
        assert_eq!(render_float(-0.0), "-0");
        assert_eq!(render_float(f64::INFINITY), "∞");
        assert_eq!(render_float(f64::NEG_INFINITY), "-∞");
        assert_eq!(render_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_float_parse_forms() {
        assert_eq!(parse_float("1.5E+20"), Some(1.5e20));
        assert_eq!(parse_float("1E-05"), Some(0.00001));
        assert_eq!(parse_float(" 2.5 "), Some(2.5));
        assert_eq!(parse_float("∞"), Some(f64::INFINITY));
        assert_eq!(parse_float("-∞"), Some(f64::NEG_INFINITY));
        assert!(parse_float("NaN").unwrap().is_nan());
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn test_float_text_round_trip() {
        for x in [1.5, 19.234, 1e15, 1.2345678901234567e-9, -3.75e100, 0.1 + 0.2] {
            assert_eq!(parse_float(&render_float(x)), Some(x), "{}", x);
        }
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int(" -7 "), Some(-7));
        assert_eq!(parse_int("4.2"), None);
    }
}
