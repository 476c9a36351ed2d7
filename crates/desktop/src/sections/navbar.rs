use iced::widget::{button, container, row, text, Space};
use iced::{Alignment, Element, Length};

use crate::app::{bold, scaled, Message, DOCS_URL};

use super::accent;

pub fn view<'a>(fs: f32, flagged: usize) -> Element<'a, Message> {
    let brand = row![
        text("\u{1F441}").size(scaled(20.0, fs)).style(accent),
        text("MaskGuard AI").size(scaled(18.0, fs)).font(bold()),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let logs_label = if flagged == 0 {
        "Review Logs".to_string()
    } else {
        format!("Review Logs ({flagged})")
    };

    let nav = row![
        button(text(logs_label).size(scaled(13.0, fs)))
            .on_press(Message::OpenAdmin)
            .padding([6, 14])
            .style(button::secondary),
        button(text("Docs").size(scaled(13.0, fs)))
            .on_press(Message::OpenUrl(DOCS_URL))
            .padding([6, 14])
            .style(button::text),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    container(
        row![brand, Space::new().width(Length::Fill), nav].align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .padding([14, 32])
    .into()
}
