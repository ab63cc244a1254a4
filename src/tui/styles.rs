//! Color palette and preset styles.
//!
//! Warm cardiology palette: a heart-red primary on a slate background, with
//! the three risk bands mapped to green, amber and red.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskLevel;

/// Heartwise color palette.
pub struct HeartTheme;

impl HeartTheme {
    // === Brand ===

    /// Heart red (#E74C3C)
    pub const PRIMARY: Color = Color::Rgb(231, 76, 60);

    /// Soft coral for highlights (#F1948A)
    pub const PRIMARY_LIGHT: Color = Color::Rgb(241, 148, 138);

    /// Deep crimson for headers (#922B21)
    pub const PRIMARY_DARK: Color = Color::Rgb(146, 43, 33);

    // === Risk bands ===

    /// Green (#27AE60)
    pub const RISK_LOW: Color = Color::Rgb(39, 174, 96);

    /// Amber (#F39C12)
    pub const RISK_MODERATE: Color = Color::Rgb(243, 156, 18);

    /// Red (#E74C3C)
    pub const RISK_HIGH: Color = Color::Rgb(231, 76, 60);

    /// Blue (#3498DB)
    pub const INFO: Color = Color::Rgb(52, 152, 219);

    // === Surfaces & text ===

    pub const BG_DARK: Color = Color::Rgb(23, 32, 42); // #17202A
    pub const BORDER: Color = Color::Rgb(149, 165, 166); // #95A5A6
    pub const TEXT_PRIMARY: Color = Color::Rgb(236, 240, 241); // #ECF0F1
    pub const TEXT_SECONDARY: Color = Color::Rgb(189, 195, 199); // #BDC3C7
    pub const TEXT_MUTED: Color = Color::Rgb(127, 140, 141); // #7F8C8D

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::RISK_LOW)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::RISK_MODERATE)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::RISK_HIGH)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Highlighted table row / active tab
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Table header row
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// Style for a risk band (the terminal's `low`/`moderate`/`high` classes).
    #[must_use]
    pub fn risk_level(level: RiskLevel) -> Style {
        match level {
            RiskLevel::Low => Self::success(),
            RiskLevel::Moderate => Self::warning(),
            RiskLevel::High => Self::danger(),
        }
    }
}
