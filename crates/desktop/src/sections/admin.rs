use std::collections::HashMap;

use iced::border::Border;
use iced::widget::{button, column, container, image, row, scrollable, text, Space};
use iced::{Alignment, Color, Element, Length, Theme};

use maskguard_core::feedback::domain::feedback_entry::FeedbackEntry;

use crate::app::{bold, disagreement_line, scaled, Hover, Message};
use crate::theme::correction_color;
use crate::widgets::action_button::{action_button, Tone};

use super::{card_style, muted, tertiary};

const THUMB_WIDTH: f32 = 160.0;
const THUMB_HEIGHT: f32 = 120.0;

/// Review overlay for flagged detections, drawn above the landing page.
pub fn view<'a>(
    fs: f32,
    entries: &'a [FeedbackEntry],
    thumbnails: &HashMap<String, image::Handle>,
    confirm_clear: bool,
    hovered: Option<Hover>,
) -> Element<'a, Message> {
    let actions: Element<'a, Message> = if confirm_clear {
        row![
            text("Clear all logged feedback?").size(scaled(13.0, fs)),
            button(text("Clear").size(scaled(13.0, fs)))
                .on_press(Message::ConfirmClearAll)
                .padding([6, 14])
                .style(button::danger),
            button(text("Cancel").size(scaled(13.0, fs)))
                .on_press(Message::CancelClearAll)
                .padding([6, 14])
                .style(button::secondary),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    } else {
        action_button(
            move || text("Clear All").size(scaled(13.0, fs)).font(bold()).into(),
            (!entries.is_empty()).then_some(Message::RequestClearAll),
            Tone::Danger,
            hovered == Some(Hover::ClearAll),
            |h| Message::Hovered(Hover::ClearAll, h),
            [8, 16],
        )
    };

    let header = row![
        column![
            text("Feedback Review Center")
                .size(scaled(22.0, fs))
                .font(bold()),
            text("Review flagged incidents for model fine-tuning.")
                .size(scaled(13.0, fs))
                .style(muted),
        ]
        .width(Length::Fill),
        actions,
        button(text("\u{2715}").size(scaled(16.0, fs)))
            .on_press(Message::CloseAdmin)
            .padding([6, 12])
            .style(button::text),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let body: Element<'a, Message> = if entries.is_empty() {
        container(
            text("No flagged detections found.")
                .size(scaled(15.0, fs))
                .style(tertiary),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    } else {
        scrollable(
            column(
                entries
                    .iter()
                    .map(|entry| entry_row(fs, entry, thumbnails.get(&entry.id)))
                    .collect::<Vec<_>>(),
            )
            .spacing(12),
        )
        .height(Length::Fill)
        .into()
    };

    let panel = container(column![header, Space::new().height(20), body])
        .padding(28)
        .width(Length::Fill)
        .max_width(820)
        .height(Length::Fill)
        .style(card_style);

    container(panel)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
        .center_x(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.7).into()),
            ..container::Style::default()
        })
        .into()
}

fn entry_row<'a>(
    fs: f32,
    entry: &'a FeedbackEntry,
    thumbnail: Option<&image::Handle>,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnail {
        Some(handle) => image(handle.clone())
            .width(THUMB_WIDTH)
            .height(THUMB_HEIGHT)
            .border_radius(8.0)
            .into(),
        None => container(text("No image").size(scaled(12.0, fs)).style(tertiary))
            .width(THUMB_WIDTH)
            .height(THUMB_HEIGHT)
            .center_x(THUMB_WIDTH)
            .center_y(THUMB_HEIGHT)
            .into(),
    };

    let tint = correction_color(entry.user_correction);
    let badge = container(
        text(entry.user_correction.label().to_uppercase())
            .size(scaled(10.0, fs))
            .font(bold())
            .color(tint),
    )
    .padding([2, 8])
    .style(move |_theme: &Theme| container::Style {
        background: Some(Color { a: 0.2, ..tint }.into()),
        border: Border {
            radius: 4.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    });

    let details = column![
        row![
            text(entry.recorded_at()).size(scaled(12.0, fs)).style(tertiary),
            Space::new().width(Length::Fill),
            badge,
        ]
        .align_y(Alignment::Center),
        Space::new().height(10),
        text(disagreement_line(entry)).size(scaled(14.0, fs)),
    ]
    .width(Length::Fill);

    container(row![picture, details].spacing(16).align_y(Alignment::Center))
        .padding(12)
        .width(Length::Fill)
        .style(|theme: &Theme| container::Style {
            background: Some(
                Color {
                    a: 0.04,
                    ..theme.palette().text
                }
                .into(),
            ),
            border: Border {
                radius: 12.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
}
