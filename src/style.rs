//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides convenience methods for applying ANSI
//! styling via the `colored` crate. Implementations for `&str` and `String`
//! are provided so string literals can be styled directly. Item rarity
//! colors live here too, keyed by [`Rarity`].

use colored::{ColoredString, Colorize};

use crate::item::Rarity;

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn entity_style(&self) -> ColoredString;
    fn hostile_style(&self) -> ColoredString;
    fn item_style(&self) -> ColoredString;
    fn rarity_style(&self, rarity: Rarity) -> ColoredString;
    fn location_titlebar_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn flavor_style(&self) -> ColoredString;
    fn event_style(&self) -> ColoredString;
    fn story_style(&self) -> ColoredString;
    fn achievement_style(&self) -> ColoredString;
    fn warning_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn status_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn entity_style(&self) -> ColoredString {
        self.truecolor(13, 130, 60).underline()
    }
    fn hostile_style(&self) -> ColoredString {
        self.truecolor(230, 80, 80).underline()
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn rarity_style(&self, rarity: Rarity) -> ColoredString {
        let (r, g, b) = rarity.color();
        self.truecolor(r, g, b)
    }
    fn location_titlebar_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10).underline()
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn flavor_style(&self) -> ColoredString {
        self.italic().truecolor(110, 220, 110)
    }
    fn event_style(&self) -> ColoredString {
        self.truecolor(150, 230, 30).dimmed()
    }
    fn story_style(&self) -> ColoredString {
        self.italic().truecolor(230, 230, 30)
    }
    fn achievement_style(&self) -> ColoredString {
        self.bold().truecolor(220, 40, 220)
    }
    fn warning_style(&self) -> ColoredString {
        self.truecolor(230, 160, 30)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn section_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(75, 80, 75)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn status_style(&self) -> ColoredString {
        self.truecolor(80, 180, 230)
    }
}

impl GameStyle for String {
    fn entity_style(&self) -> ColoredString {
        self.as_str().entity_style()
    }
    fn hostile_style(&self) -> ColoredString {
        self.as_str().hostile_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn rarity_style(&self, rarity: Rarity) -> ColoredString {
        self.as_str().rarity_style(rarity)
    }
    fn location_titlebar_style(&self) -> ColoredString {
        self.as_str().location_titlebar_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn flavor_style(&self) -> ColoredString {
        self.as_str().flavor_style()
    }
    fn event_style(&self) -> ColoredString {
        self.as_str().event_style()
    }
    fn story_style(&self) -> ColoredString {
        self.as_str().story_style()
    }
    fn achievement_style(&self) -> ColoredString {
        self.as_str().achievement_style()
    }
    fn warning_style(&self) -> ColoredString {
        self.as_str().warning_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn status_style(&self) -> ColoredString {
        self.as_str().status_style()
    }
}
