/// Status LED markup.
///
/// [`render_led`] is the only thing display code needs: it turns a flag or a
/// counter into an `<img>` pointing at either the `led-off` icon or the
/// `{colour}-led-on` icon. The icons themselves are generated SVGs served by
/// the dashboard (see [`led_icon_svg`]).
use serde_json::Value;

use crate::api::types::{Flag, is_truthy};

/// Anything that can drive an LED.
pub trait LedSignal {
    fn is_lit(&self) -> bool;
}

impl LedSignal for bool {
    fn is_lit(&self) -> bool {
        *self
    }
}

impl LedSignal for Flag {
    fn is_lit(&self) -> bool {
        self.0
    }
}

macro_rules! impl_numeric_signal {
    ($($t:ty),*) => {
        $(impl LedSignal for $t {
            fn is_lit(&self) -> bool {
                *self != 0 as $t
            }
        })*
    };
}

impl_numeric_signal!(i32, i64, u32, u64, usize, f64);

impl LedSignal for &str {
    fn is_lit(&self) -> bool {
        is_truthy(&Value::String((*self).to_string()))
    }
}

impl LedSignal for &Value {
    fn is_lit(&self) -> bool {
        is_truthy(self)
    }
}

/// Colour and size of the LEDs a dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedStyle {
    pub colour: String,
    pub width: u32,
}

impl Default for LedStyle {
    fn default() -> Self {
        Self {
            colour: "green".to_string(),
            width: 20,
        }
    }
}

impl LedStyle {
    pub fn render(&self, value: impl LedSignal) -> String {
        render_led(value, &self.colour, self.width)
    }
}

/// Markup for a status LED: off for falsy/zero values, `{colour}-led-on`
/// otherwise, `width` pixels wide.
pub fn render_led(value: impl LedSignal, colour: &str, width: u32) -> String {
    let icon = if value.is_lit() {
        format!("{colour}-led-on")
    } else {
        "led-off".to_string()
    };
    format!(r#"<img width="{width}px" src="img/{icon}.svg">"#)
}

/// Fill colour for a named LED colour.
fn fill_for(colour: &str) -> Option<&'static str> {
    match colour {
        "green" => Some("#3fb950"),
        "red" => Some("#f85149"),
        "yellow" => Some("#d29922"),
        "blue" => Some("#58a6ff"),
        "orange" => Some("#fb8f44"),
        _ => None,
    }
}

/// SVG body for an icon name produced by [`render_led`] (`led-off`,
/// `green-led-on`, ...). `None` for unknown names.
pub fn led_icon_svg(name: &str) -> Option<String> {
    let (fill, glow) = if name == "led-off" {
        ("#484f58", false)
    } else {
        let colour = name.strip_suffix("-led-on")?;
        (fill_for(colour)?, true)
    };

    let halo = if glow {
        format!(r#"<circle cx="10" cy="10" r="9" fill="{fill}" opacity="0.35"/>"#)
    } else {
        String::new()
    };

    Some(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20">"#,
            "{halo}",
            r##"<circle cx="10" cy="10" r="6" fill="{fill}" stroke="#0d1117" stroke-width="1"/>"##,
            "</svg>"
        ),
        halo = halo,
        fill = fill
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_is_always_off() {
        for colour in ["green", "red", "purple"] {
            for width in [10, 20, 64] {
                let html = render_led(0, colour, width);
                assert!(html.contains("img/led-off.svg"), "{html}");
                assert!(html.contains(&format!("width=\"{width}px\"")));
                assert!(!html.contains(colour));
            }
        }
    }

    #[test]
    fn nonzero_is_coloured() {
        let html = render_led(7, "green", 20);
        assert_eq!(html, r#"<img width="20px" src="img/green-led-on.svg">"#);
        assert!(render_led(-1, "green", 20).contains("green-led-on"));
    }

    #[test]
    fn flags_and_json_values() {
        assert!(render_led(true, "red", 20).contains("red-led-on"));
        assert!(render_led(false, "red", 20).contains("led-off"));
        assert!(render_led(Flag(true), "blue", 20).contains("blue-led-on"));
        assert!(render_led(&json!("true"), "green", 20).contains("green-led-on"));
        assert!(render_led(&json!(null), "green", 20).contains("led-off"));
        assert!(render_led("0", "green", 20).contains("led-off"));
        assert!(render_led(0.0, "green", 20).contains("led-off"));
    }

    #[test]
    fn style_uses_its_colour_and_width() {
        let style = LedStyle {
            colour: "orange".into(),
            width: 12,
        };
        assert_eq!(style.render(1_u64), render_led(1, "orange", 12));
    }

    #[test]
    fn icon_svgs() {
        assert!(led_icon_svg("led-off").unwrap().starts_with("<svg"));
        assert!(led_icon_svg("green-led-on").unwrap().contains("#3fb950"));
        assert_eq!(led_icon_svg("purple-led-on"), None);
        assert_eq!(led_icon_svg("bogus"), None);
    }
}
