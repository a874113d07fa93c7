//! Display theme and the signal that publishes it.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ratatui::style::Color;

/// Display mode of the sky.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Night sky: moon and twinkling stars.
    #[default]
    Dark,
    /// Day sky: sun, birds and clouds.
    Light,
}

impl Theme {
    /// Get the opposite theme.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Background colour of the sky behind every primitive.
    pub fn sky_color(self) -> Color {
        match self {
            Theme::Dark => Color::Rgb(11, 15, 34),
            Theme::Light => Color::Rgb(186, 218, 244),
        }
    }

    /// Colour for foreground text drawn on top of the sky.
    pub fn text_color(self) -> Color {
        match self {
            Theme::Dark => Color::Rgb(241, 253, 254),
            Theme::Light => Color::Rgb(30, 41, 59),
        }
    }

    /// Get the display name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
struct Published {
    theme: Theme,
    version: u64,
}

/// Writable theme signal owned by the host.
///
/// Observers hold a [`ThemeWatch`] and pick up changes when they next poll.
/// Everything runs on the UI thread, so the signal is a shared `Cell`.
#[derive(Debug)]
pub struct ThemeSelector {
    shared: Rc<Cell<Published>>,
}

impl ThemeSelector {
    pub fn new(theme: Theme) -> Self {
        Self {
            shared: Rc::new(Cell::new(Published { theme, version: 0 })),
        }
    }

    /// Current theme.
    pub fn get(&self) -> Theme {
        self.shared.get().theme
    }

    /// Publish a theme. Setting the current theme again is not a change.
    pub fn set(&self, theme: Theme) {
        let current = self.shared.get();
        if current.theme != theme {
            self.shared.set(Published {
                theme,
                version: current.version + 1,
            });
        }
    }

    /// Flip between dark and light, returning the new theme.
    pub fn toggle(&self) -> Theme {
        let next = self.get().toggle();
        self.set(next);
        next
    }

    /// Create a read-only observer that has already seen the current value.
    pub fn watch(&self) -> ThemeWatch {
        ThemeWatch {
            shared: Rc::clone(&self.shared),
            seen: self.shared.get().version,
        }
    }
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

/// Read-only view of a [`ThemeSelector`].
#[derive(Debug)]
pub struct ThemeWatch {
    shared: Rc<Cell<Published>>,
    seen: u64,
}

impl ThemeWatch {
    /// Current theme.
    pub fn get(&self) -> Theme {
        self.shared.get().theme
    }

    /// Return the theme if it changed since the last poll.
    ///
    /// Several toggles between polls collapse into one notification carrying
    /// the latest value.
    pub fn changed(&mut self) -> Option<Theme> {
        let published = self.shared.get();
        if published.version == self.seen {
            return None;
        }
        self.seen = published.version;
        Some(published.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert!(Theme::default().is_dark());
    }

    #[test]
    fn test_watch_sees_changes_once() {
        let selector = ThemeSelector::new(Theme::Dark);
        let mut watch = selector.watch();
        assert_eq!(watch.changed(), None);

        selector.set(Theme::Light);
        assert_eq!(watch.changed(), Some(Theme::Light));
        assert_eq!(watch.changed(), None);
        assert_eq!(watch.get(), Theme::Light);
    }

    #[test]
    fn test_setting_same_theme_is_not_a_change() {
        let selector = ThemeSelector::new(Theme::Light);
        let mut watch = selector.watch();
        selector.set(Theme::Light);
        assert_eq!(watch.changed(), None);
    }

    #[test]
    fn test_multiple_toggles_report_latest() {
        let selector = ThemeSelector::new(Theme::Dark);
        let mut watch = selector.watch();
        selector.toggle();
        selector.toggle();
        selector.toggle();
        assert_eq!(watch.changed(), Some(Theme::Light));
    }
}
