//! Keybinding registry
//!
//! One table of shortcuts per [`AppMode`]. The nav bar shows the priority
//! entries; the help overlay lists everything grouped by section.

use crate::app::AppMode;
use std::collections::HashMap;

/// Help overlay grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingGroup {
    Navigation,
    Actions,
    General,
}

impl BindingGroup {
    fn title(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Actions => "Actions",
            Self::General => "General",
        }
    }
}

/// A keybinding as shown to the user
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub display: String,
    pub description: String,
    pub group: BindingGroup,
    /// Shown in the bottom nav bar
    pub in_nav: bool,
}

impl Keybinding {
    fn new(display: &str, description: &str, group: BindingGroup) -> Self {
        Self {
            display: display.to_string(),
            description: description.to_string(),
            group,
            in_nav: false,
        }
    }

    fn nav(mut self) -> Self {
        self.in_nav = true;
        self
    }
}

/// A titled block of the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    mode_bindings: HashMap<AppMode, Vec<Keybinding>>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    pub fn new() -> Self {
        use BindingGroup::{Actions, General, Navigation};

        let mut mode_bindings = HashMap::new();

        mode_bindings.insert(
            AppMode::BrandGate,
            vec![
                Keybinding::new("←/→", "Switch brand", Navigation).nav(),
                Keybinding::new("Enter", "Choose highlighted brand", Actions).nav(),
                Keybinding::new("a / i", "Choose AMD / Intel", Actions).nav(),
                Keybinding::new("Esc", "Close without choosing", General).nav(),
            ],
        );

        mode_bindings.insert(
            AppMode::Builder,
            vec![
                Keybinding::new("←/→", "Previous / next step", Navigation).nav(),
                Keybinding::new("↑/↓", "Move through parts", Navigation).nav(),
                Keybinding::new("1-8", "Jump to a step", Navigation),
                Keybinding::new("Home/End", "First / last part", Navigation),
                Keybinding::new("Enter", "Select part", Actions).nav(),
                Keybinding::new("+/-", "Change quantity", Actions).nav(),
                Keybinding::new("x", "Clear this step", Actions),
                Keybinding::new("f", "Cycle stock filter", Actions).nav(),
                Keybinding::new("/", "Search by name", Actions).nav(),
                Keybinding::new("b", "Change CPU brand", Actions),
                Keybinding::new("d", "Part details", Actions),
                Keybinding::new("a", "Build advisor", Actions),
                Keybinding::new("r", "Reset build", Actions),
                Keybinding::new("c", "Add to cart", Actions).nav(),
                Keybinding::new("?", "Toggle help", General).nav(),
                Keybinding::new("q", "Quit", General).nav(),
            ],
        );

        mode_bindings.insert(
            AppMode::Search,
            vec![
                Keybinding::new("type", "Filter by name", Actions).nav(),
                Keybinding::new("Backspace", "Delete character", Actions).nav(),
                Keybinding::new("Enter/Esc", "Back to parts", General).nav(),
            ],
        );

        mode_bindings.insert(
            AppMode::Details,
            vec![Keybinding::new("Esc/Enter", "Close details", General).nav()],
        );

        mode_bindings.insert(
            AppMode::Advisor,
            vec![
                Keybinding::new("type", "Ask about your build", Actions).nav(),
                Keybinding::new("Enter", "Send question", Actions).nav(),
                Keybinding::new("Esc", "Back to builder", General).nav(),
            ],
        );

        mode_bindings.insert(
            AppMode::Checkout,
            vec![
                Keybinding::new("p", "Enter promo code", Actions).nav(),
                Keybinding::new("Tab", "Change payment method", Actions).nav(),
                Keybinding::new("Esc/b", "Back to builder", Navigation).nav(),
                Keybinding::new("?", "Toggle help", General).nav(),
                Keybinding::new("q", "Quit", General).nav(),
            ],
        );

        mode_bindings.insert(
            AppMode::PromoInput,
            vec![
                Keybinding::new("type", "Promo code", Actions).nav(),
                Keybinding::new("Enter", "Apply (empty removes)", Actions).nav(),
                Keybinding::new("Esc", "Cancel", General).nav(),
            ],
        );

        Self { mode_bindings }
    }

    /// All bindings for a mode
    pub fn bindings(&self, mode: AppMode) -> &[Keybinding] {
        self.mode_bindings
            .get(&mode)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// (key, description) pairs for the nav bar
    pub fn nav_items(&self, mode: AppMode) -> Vec<(&str, &str)> {
        self.bindings(mode)
            .iter()
            .filter(|b| b.in_nav)
            .map(|b| (b.display.as_str(), b.description.as_str()))
            .collect()
    }

    /// Help overlay sections for a mode, empty groups omitted
    pub fn help_content(&self, mode: AppMode) -> Vec<HelpSection> {
        [
            BindingGroup::Navigation,
            BindingGroup::Actions,
            BindingGroup::General,
        ]
        .into_iter()
        .filter_map(|group| {
            let items: Vec<_> = self
                .bindings(mode)
                .iter()
                .filter(|b| b.group == group)
                .map(|b| (b.display.clone(), b.description.clone()))
                .collect();
            (!items.is_empty()).then(|| HelpSection {
                title: group.title().to_string(),
                items,
            })
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_has_cart_binding() {
        let ctx = KeybindingContext::new();
        assert!(
            ctx.nav_items(AppMode::Builder)
                .iter()
                .any(|(key, _)| *key == "c")
        );
    }

    #[test]
    fn test_help_sections_skip_empty_groups() {
        let ctx = KeybindingContext::new();
        let sections = ctx.help_content(AppMode::Details);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "General");
    }
}
