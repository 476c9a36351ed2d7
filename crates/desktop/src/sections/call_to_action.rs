use iced::widget::{column, container, row, text, Space};
use iced::{Alignment, Element};

use crate::app::{bold, scaled, Hover, Message};
use crate::widgets::action_button::{action_button, Tone};

use super::{card_style, muted, section};

pub fn view<'a>(fs: f32, hovered: Option<Hover>) -> Element<'a, Message> {
    let start = action_button(
        move || text("Start Live Feed").size(scaled(17.0, fs)).font(bold()).into(),
        Some(Message::StartCamera),
        Tone::Primary,
        hovered == Some(Hover::CtaStart),
        |h| Message::Hovered(Hover::CtaStart, h),
        [16, 36],
    );
    let review = action_button(
        move || {
            text("Review Compliance Logs")
                .size(scaled(17.0, fs))
                .font(bold())
                .into()
        },
        Some(Message::OpenAdmin),
        Tone::Subtle,
        hovered == Some(Hover::CtaReview),
        |h| Message::Hovered(Hover::CtaReview, h),
        [16, 36],
    );

    section(
        container(
            column![
                text("Secure Your Premises Today")
                    .size(scaled(36.0, fs))
                    .font(bold()),
                Space::new().height(14),
                text("Connect your cameras to the vision engine for live safety compliance.")
                    .size(scaled(16.0, fs))
                    .style(muted),
                Space::new().height(32),
                row![start, review].spacing(16),
            ]
            .align_x(Alignment::Center),
        )
        .padding([56, 48])
        .style(card_style),
    )
}
