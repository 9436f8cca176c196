//! CSS colour strings to terminal colours.

use crate::types::{Color, NamedColor};

/// Parse a canvas colour string.
///
/// Accepts the basic CSS keywords, `#rgb`, `#rrggbb` and `rgb(r, g, b)`
/// (`rgba` is accepted and its alpha dropped). Returns `None` for anything
/// else so the caller can keep its previous colour.
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(body);
    }
    keyword(&s)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
            Some(Color::Rgb {
                r: it.next()??,
                g: it.next()??,
                b: it.next()??,
            })
        }
        6 => Some(Color::Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}

fn parse_rgb_function(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    Some(Color::Rgb {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
    })
}

fn keyword(s: &str) -> Option<Color> {
    let named = match s {
        "black" => NamedColor::Black,
        "red" => NamedColor::Red,
        "green" | "lime" => NamedColor::Green,
        "yellow" => NamedColor::Yellow,
        "blue" => NamedColor::Blue,
        "magenta" | "fuchsia" => NamedColor::Magenta,
        "cyan" | "aqua" => NamedColor::Cyan,
        "white" => NamedColor::White,
        _ => {
            let (r, g, b) = match s {
                "gray" | "grey" => (128, 128, 128),
                "silver" => (192, 192, 192),
                "orange" => (255, 165, 0),
                "purple" => (128, 0, 128),
                "brown" => (165, 42, 42),
                "pink" => (255, 192, 203),
                "navy" => (0, 0, 128),
                "teal" => (0, 128, 128),
                "olive" => (128, 128, 0),
                "maroon" => (128, 0, 0),
                _ => return None,
            };
            return Some(Color::Rgb { r, g, b });
        }
    };
    Some(Color::Named(named))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(parse_color("red"), Some(Color::Named(NamedColor::Red)));
        assert_eq!(parse_color(" White "), Some(Color::Named(NamedColor::White)));
        assert_eq!(
            parse_color("orange"),
            Some(Color::Rgb {
                r: 255,
                g: 165,
                b: 0
            })
        );
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#f00"), Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(
            parse_color("#00FF7f"),
            Some(Color::Rgb {
                r: 0,
                g: 255,
                b: 127
            })
        );
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#ggg"), None);
    }

    #[test]
    fn rgb_function() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Color::Rgb { r: 1, g: 2, b: 3 }));
        assert_eq!(
            parse_color("rgba(300,0,0,0.5)"),
            Some(Color::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(parse_color("rgb(1,2)"), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_color("notacolor"), None);
        assert_eq!(parse_color(""), None);
    }
}
