use iced::widget::{button, checkbox, column, container, pick_list, row, slider, text, Space};
use iced::{Alignment, Element, Length};

use crate::app::{bold, scaled, Message, DOCS_URL};
use crate::settings::{Appearance, Settings};

use super::{muted, tertiary};

pub fn view<'a>(fs: f32, settings: &Settings) -> Element<'a, Message> {
    let about = column![
        text("MaskGuard Vision").size(scaled(16.0, fs)).font(bold()),
        Space::new().height(6),
        text("Computer vision for workplace safety compliance.")
            .size(scaled(13.0, fs))
            .style(muted),
        button(text("Powered by Gemini").size(scaled(12.0, fs)))
            .on_press(Message::OpenUrl(DOCS_URL))
            .padding([4, 0])
            .style(button::text),
    ]
    .width(Length::Fill);

    let display = column![
        text("DISPLAY").size(scaled(11.0, fs)).font(bold()).style(tertiary),
        Space::new().height(8),
        row![
            text("Mode").size(scaled(13.0, fs)),
            pick_list(Appearance::ALL, Some(settings.appearance), |a| {
                Message::AppearanceChanged(a)
            })
            .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(8),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(8),
        row![
            text("Text size").size(scaled(13.0, fs)),
            slider(0.8..=1.5, settings.font_scale, Message::FontScaleChanged)
                .step(0.05)
                .width(140),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ];

    container(
        column![
            row![about, display].spacing(40),
            Space::new().height(24),
            text("MaskGuard Computer Vision. Developed for safety compliance.")
                .size(scaled(12.0, fs))
                .style(tertiary),
        ]
        .max_width(1000),
    )
    .width(Length::Fill)
    .center_x(Length::Fill)
    .padding([32, 32])
    .into()
}
