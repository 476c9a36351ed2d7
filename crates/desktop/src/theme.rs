use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use maskguard_core::feedback::domain::feedback_entry::Correction;

use crate::settings::Appearance;

/// Resolve the iced Theme from appearance + high_contrast settings.
pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    let palette = match (is_dark, high_contrast) {
        (true, false) => dark_palette(),
        (false, false) => light_palette(),
        (true, true) => high_contrast_dark_palette(),
        (false, true) => high_contrast_light_palette(),
    };

    Theme::custom("MaskGuard", palette)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x0f, 0x17, 0x2a),
        text: color!(0xe2, 0xe8, 0xf0),
        primary: color!(0x25, 0x63, 0xeb),
        success: color!(0x22, 0xc5, 0x5e),
        warning: color!(0xf9, 0x73, 0x16),
        danger: color!(0xef, 0x44, 0x44),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf8, 0xfa, 0xfc),
        text: color!(0x0f, 0x17, 0x2a),
        primary: color!(0x25, 0x63, 0xeb),
        success: color!(0x16, 0xa3, 0x4a),
        warning: color!(0xea, 0x58, 0x0c),
        danger: color!(0xdc, 0x26, 0x26),
    }
}

fn high_contrast_dark_palette() -> Palette {
    Palette {
        background: color!(0x00, 0x00, 0x00),
        text: color!(0xff, 0xff, 0xff),
        primary: color!(0x6c, 0xb4, 0xff),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xd6, 0x0a),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn high_contrast_light_palette() -> Palette {
    Palette {
        background: color!(0xff, 0xff, 0xff),
        text: color!(0x00, 0x00, 0x00),
        primary: color!(0x00, 0x50, 0xd0),
        success: color!(0x24, 0x8a, 0x3d),
        warning: color!(0xb2, 0x5c, 0x00),
        danger: color!(0xd7, 0x00, 0x15),
    }
}

fn is_light(theme: &Theme) -> bool {
    let bg = theme.palette().background;
    bg.r * 0.299 + bg.g * 0.587 + bg.b * 0.114 > 0.5
}

/// Card background, one step off the window background.
pub fn surface_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    let shift = if is_light(theme) { -0.04 } else { 0.06 };
    Color {
        r: (bg.r + shift).clamp(0.0, 1.0),
        g: (bg.g + shift).clamp(0.0, 1.0),
        b: (bg.b + shift).clamp(0.0, 1.0),
        a: 1.0,
    }
}

pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.75,
        ..theme.palette().text
    }
}

pub fn tertiary_color(theme: &Theme) -> Color {
    Color {
        a: 0.5,
        ..theme.palette().text
    }
}

pub fn border_color(theme: &Theme) -> Color {
    Color {
        a: 0.12,
        ..theme.palette().text
    }
}

/// Badge tint for a correction kind in the review list.
pub fn correction_color(correction: Correction) -> Color {
    match correction {
        Correction::FalsePositive => color!(0xfb, 0x92, 0x3c),
        Correction::FalseNegative => color!(0xc0, 0x84, 0xfc),
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(target_os = "windows")]
    {
        // AppsUseLightTheme is 0x0 in dark mode.
        std::process::Command::new("reg")
            .args([
                "query",
                r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
                "/v",
                "AppsUseLightTheme",
            ])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("0x0"))
            .unwrap_or(true)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        true
    }
}
