//! Shared UI styles - dim subway palette

use bevy::prelude::*;

/// Dark background for menus
pub const MENU_BACKGROUND: Color = Color::srgb(0.03, 0.04, 0.05);

/// Translucent backing for HUD panels
pub const PANEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.65);

pub const BUTTON_NORMAL: Color = Color::srgb(0.08, 0.09, 0.10);
pub const BUTTON_HOVERED: Color = Color::srgb(0.14, 0.16, 0.18);
pub const BUTTON_PRESSED: Color = Color::srgb(0.25, 0.10, 0.10);

pub const BUTTON_BORDER: Color = Color::srgb(0.22, 0.25, 0.28);

/// Accent color - sickly platform-light yellow
pub const ACCENT_COLOR: Color = Color::srgb(0.85, 0.80, 0.45);

/// Glitch red for the anomaly line
pub const ACCENT_RED: Color = Color::srgb(0.85, 0.15, 0.12);

pub const TEXT_COLOR: Color = Color::srgb(0.90, 0.90, 0.88);
pub const TEXT_MUTED: Color = Color::srgb(0.55, 0.57, 0.60);

/// Standard button style
pub fn button_style() -> Node {
    Node {
        width: Val::Px(280.0),
        height: Val::Px(55.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        margin: UiRect::all(Val::Px(8.0)),
        border: UiRect::all(Val::Px(2.0)),
        ..default()
    }
}

pub fn button_text_style() -> TextFont {
    TextFont {
        font_size: 22.0,
        ..default()
    }
}

pub fn title_text_style() -> TextFont {
    TextFont {
        font_size: 72.0,
        ..default()
    }
}
