use iced::border::Border;
use iced::widget::{column, container, text, text_input, Space};
use iced::{Alignment, Color, Element, Length, Theme};

use crate::app::{bold, scaled, Hover, Message, DOCS_URL};
use crate::widgets::action_button::{action_button_fill, Tone};

use super::{card_style, danger, muted, tertiary};

/// Shown instead of the landing page until the engine has a usable key.
pub fn view<'a>(
    fs: f32,
    key_input: &'a str,
    error: Option<&'a str>,
    hovered: Option<Hover>,
) -> Element<'a, Message> {
    let lock = container(text("\u{1F512}").size(scaled(28.0, fs)))
        .width(scaled(72.0, fs))
        .height(scaled(72.0, fs))
        .center_x(Length::Shrink)
        .center_y(Length::Shrink)
        .style(|theme: &Theme| container::Style {
            background: Some(
                Color {
                    a: 0.15,
                    ..theme.palette().primary
                }
                .into(),
            ),
            border: Border {
                radius: 20.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    let key_field = text_input("Gemini API key", key_input)
        .on_input(Message::KeyInputChanged)
        .on_submit(Message::ActivateEngine)
        .secure(true)
        .padding(12)
        .size(scaled(14.0, fs));

    let activate = action_button_fill(
        move || {
            text("Activate Engine")
                .size(scaled(16.0, fs))
                .font(bold())
                .width(Length::Fill)
                .align_x(Alignment::Center)
                .into()
        },
        Some(Message::ActivateEngine),
        Tone::Primary,
        hovered == Some(Hover::Activate),
        |h| Message::Hovered(Hover::Activate, h),
        [14, 24],
    );

    let mut body = column![
        lock,
        Space::new().height(20),
        text("Initialize Vision Engine")
            .size(scaled(24.0, fs))
            .font(bold()),
        Space::new().height(8),
        text("To enable real-time safety monitoring, connect a vision engine key.")
            .size(scaled(14.0, fs))
            .style(muted)
            .align_x(Alignment::Center),
        Space::new().height(24),
        key_field,
        Space::new().height(12),
        activate,
    ]
    .align_x(Alignment::Center)
    .width(380);

    if let Some(message) = error {
        body = body.push(Space::new().height(10)).push(
            text(message)
                .size(scaled(13.0, fs))
                .style(danger)
                .align_x(Alignment::Center),
        );
    }

    body = body
        .push(Space::new().height(20))
        .push(
            text("Uses Gemini 3 Flash Vision for high-speed edge compliance.")
                .size(scaled(12.0, fs))
                .style(tertiary),
        )
        .push(
            iced::widget::button(text("Where do I get a key?").size(scaled(12.0, fs)))
                .on_press(Message::OpenUrl(DOCS_URL))
                .style(iced::widget::button::text),
        );

    container(container(body).padding(40).style(card_style))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
