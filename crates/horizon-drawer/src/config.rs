//! Drawer configuration.
//!
//! A drawer's behavior is fixed at construction by a [`DrawerConfig`]. Callers
//! rarely build one directly; they pass [`DrawerOptions`], a set of optional
//! overrides, and the registry resolves the final record as
//! defaults ← node attributes ← caller overrides.
//!
//! Options can come from three places:
//!
//! - fluent setters on [`DrawerOptions`]
//! - any `serde` format, with camelCase keys (`{"swipeThreshold": 80}`)
//! - `data-*` attributes on the drawer's node (`data-swipe-threshold="80"`)
//!
//! # Example
//!
//! ```
//! use horizon_drawer::{DrawerConfig, DrawerOptions};
//!
//! let config = DrawerOptions::new()
//!     .backdrop(false)
//!     .swipe_threshold(60)
//!     .resolve();
//!
//! assert!(!config.backdrop);
//! assert_eq!(config.swipe_threshold, 60);
//! assert_eq!(config.animation_duration_ms, DrawerConfig::default().animation_duration_ms);
//! ```

use std::str::FromStr;
use std::time::Duration;

use horizon_drawer_core::{Element, Error, Result};
use serde::Deserialize;

/// Default minimum downward drag, in pixels, that closes the drawer on release.
pub const DEFAULT_SWIPE_THRESHOLD: u32 = 100;

/// Default show/hide transition length, in milliseconds.
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 300;

/// Resolved, immutable drawer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerConfig {
    /// Clicking the overlay outside the panel closes the drawer.
    pub backdrop: bool,
    /// Escape closes the drawer and Tab is trapped inside it.
    pub keyboard: bool,
    /// Minimum downward drag, in pixels, that closes the drawer on release.
    pub swipe_threshold: u32,
    /// Length of the show/hide transition. Zero completes transitions synchronously.
    pub animation_duration_ms: u64,
    /// Move focus into the drawer when it opens and restore it on close.
    pub auto_focus: bool,
    /// Open the drawer once the host document is ready.
    pub show_on_load: bool,
}

impl DrawerConfig {
    /// Start an empty set of overrides.
    ///
    /// ```
    /// use horizon_drawer::DrawerConfig;
    ///
    /// let config = DrawerConfig::builder().backdrop(false).resolve();
    /// assert!(!config.backdrop);
    /// assert!(config.keyboard);
    /// ```
    pub fn builder() -> DrawerOptions {
        DrawerOptions::new()
    }

    /// The transition length as a [`Duration`].
    #[inline]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            backdrop: true,
            keyboard: true,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            auto_focus: true,
            show_on_load: false,
        }
    }
}

/// Optional overrides for a [`DrawerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DrawerOptions {
    /// Overrides [`DrawerConfig::backdrop`].
    pub backdrop: Option<bool>,
    /// Overrides [`DrawerConfig::keyboard`].
    pub keyboard: Option<bool>,
    /// Overrides [`DrawerConfig::swipe_threshold`], in pixels.
    pub swipe_threshold: Option<u32>,
    /// Overrides [`DrawerConfig::animation_duration_ms`], in milliseconds.
    pub animation_duration: Option<u64>,
    /// Overrides [`DrawerConfig::auto_focus`].
    pub auto_focus: Option<bool>,
    /// Overrides [`DrawerConfig::show_on_load`].
    pub show_on_load: Option<bool>,
}

/// Attribute names read by [`DrawerOptions::from_attributes`].
pub mod attributes {
    pub const BACKDROP: &str = "data-backdrop";
    pub const KEYBOARD: &str = "data-keyboard";
    pub const SWIPE_THRESHOLD: &str = "data-swipe-threshold";
    pub const ANIMATION_DURATION: &str = "data-animation-duration";
    pub const AUTO_FOCUS: &str = "data-auto-focus";
    pub const SHOW_ON_LOAD: &str = "data-show-on-load";
}

impl DrawerOptions {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close on clicks outside the panel.
    pub fn backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = Some(backdrop);
        self
    }

    /// Close on Escape and trap Tab.
    pub fn keyboard(mut self, keyboard: bool) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Drag distance that closes the drawer.
    pub fn swipe_threshold(mut self, pixels: u32) -> Self {
        self.swipe_threshold = Some(pixels);
        self
    }

    /// Transition length in milliseconds.
    pub fn animation_duration(mut self, millis: u64) -> Self {
        self.animation_duration = Some(millis);
        self
    }

    /// Move focus into the drawer on open.
    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = Some(auto_focus);
        self
    }

    /// Open once the document is ready.
    pub fn show_on_load(mut self, show_on_load: bool) -> Self {
        self.show_on_load = Some(show_on_load);
        self
    }

    /// Read overrides from an element's `data-*` attributes.
    ///
    /// Missing attributes leave the option unset. Boolean attributes accept
    /// `true`, `false`, `1`, `0`, or an empty value (meaning `true`).
    pub fn from_attributes(element: &Element) -> Result<Self> {
        Ok(Self {
            backdrop: parse_flag(element, attributes::BACKDROP, "backdrop")?,
            keyboard: parse_flag(element, attributes::KEYBOARD, "keyboard")?,
            swipe_threshold: parse_number(element, attributes::SWIPE_THRESHOLD, "swipeThreshold")?,
            animation_duration: parse_number(
                element,
                attributes::ANIMATION_DURATION,
                "animationDuration",
            )?,
            auto_focus: parse_flag(element, attributes::AUTO_FOCUS, "autoFocus")?,
            show_on_load: parse_flag(element, attributes::SHOW_ON_LOAD, "showOnLoad")?,
        })
    }

    /// Layer `self` over `fallback`: options set here win.
    pub fn or(self, fallback: DrawerOptions) -> DrawerOptions {
        DrawerOptions {
            backdrop: self.backdrop.or(fallback.backdrop),
            keyboard: self.keyboard.or(fallback.keyboard),
            swipe_threshold: self.swipe_threshold.or(fallback.swipe_threshold),
            animation_duration: self.animation_duration.or(fallback.animation_duration),
            auto_focus: self.auto_focus.or(fallback.auto_focus),
            show_on_load: self.show_on_load.or(fallback.show_on_load),
        }
    }

    /// Apply the overrides to the defaults.
    pub fn resolve(&self) -> DrawerConfig {
        let defaults = DrawerConfig::default();
        DrawerConfig {
            backdrop: self.backdrop.unwrap_or(defaults.backdrop),
            keyboard: self.keyboard.unwrap_or(defaults.keyboard),
            swipe_threshold: self.swipe_threshold.unwrap_or(defaults.swipe_threshold),
            animation_duration_ms: self
                .animation_duration
                .unwrap_or(defaults.animation_duration_ms),
            auto_focus: self.auto_focus.unwrap_or(defaults.auto_focus),
            show_on_load: self.show_on_load.unwrap_or(defaults.show_on_load),
        }
    }
}

impl From<DrawerConfig> for DrawerOptions {
    fn from(config: DrawerConfig) -> Self {
        Self {
            backdrop: Some(config.backdrop),
            keyboard: Some(config.keyboard),
            swipe_threshold: Some(config.swipe_threshold),
            animation_duration: Some(config.animation_duration_ms),
            auto_focus: Some(config.auto_focus),
            show_on_load: Some(config.show_on_load),
        }
    }
}

fn parse_flag(element: &Element, attribute: &str, option: &str) -> Result<Option<bool>> {
    let Some(raw) = element.attribute(attribute) else {
        return Ok(None);
    };
    match raw.trim() {
        "" | "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(Error::invalid_option(option, raw)),
    }
}

fn parse_number<T: FromStr>(element: &Element, attribute: &str, option: &str) -> Result<Option<T>> {
    element
        .attribute(attribute)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| Error::invalid_option(option, raw))
        })
        .transpose()
}
