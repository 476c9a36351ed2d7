use iced::widget::{column, row, text, Space};
use iced::{Alignment, Element};

use crate::app::{bold, scaled, Hover, Message};
use crate::widgets::action_button::{action_button, Tone};

use super::{accent, muted, section, tertiary};

const PARTNERS: &[&str] = &["G-TECH", "AURORA", "NEXUS", "QUANTUM"];

pub fn view<'a>(fs: f32, hovered: Option<Hover>) -> Element<'a, Message> {
    let cta = action_button(
        move || {
            text("Try Live Monitor \u{2192}")
                .size(scaled(16.0, fs))
                .font(bold())
                .into()
        },
        Some(Message::StartCamera),
        Tone::Primary,
        hovered == Some(Hover::HeroDemo),
        |h| Message::Hovered(Hover::HeroDemo, h),
        [16, 32],
    );

    let partners = row(PARTNERS
        .iter()
        .map(|name| {
            text(*name)
                .size(scaled(16.0, fs))
                .font(bold())
                .style(tertiary)
                .into()
        })
        .collect::<Vec<_>>())
    .spacing(40);

    section(
        column![
            Space::new().height(24),
            text("Next-Gen AI Vision for")
                .size(scaled(44.0, fs))
                .font(bold()),
            text("Public Safety Compliance")
                .size(scaled(44.0, fs))
                .font(bold())
                .style(accent),
            Space::new().height(20),
            text(
                "Multimodal vision intelligence delivering accurate, real-time face mask \
                 detection for modern workspaces and public venues."
            )
            .size(scaled(17.0, fs))
            .style(muted)
            .align_x(Alignment::Center),
            Space::new().height(32),
            cta,
            Space::new().height(48),
            partners,
        ]
        .align_x(Alignment::Center)
        .max_width(760),
    )
}
