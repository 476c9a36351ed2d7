use iced::border::Border;
use iced::widget::{canvas, column, container, image, row, stack, text, Space};
use iced::{Alignment, Color, ContentFit, Element, Length, Theme};

use maskguard_core::feedback::domain::feedback_entry::Correction;
use maskguard_core::overlay::infrastructure::recording_surface::RecordingSurface;
use maskguard_core::shared::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH};

use crate::app::{bold, scaled, Hover, Message};
use crate::widgets::action_button::{action_button, action_button_fill, Tone};
use crate::widgets::overlay_canvas::OverlayCanvas;

use super::{card_style, danger, muted, section, tertiary};

/// Everything the live panel needs from the capture loop for one frame.
pub struct DemoState<'a> {
    pub streaming: bool,
    pub processing: bool,
    pub preview: Option<&'a image::Handle>,
    pub overlay: &'a RecordingSurface,
    pub error: Option<&'a str>,
    pub can_flag: bool,
    pub status: Option<String>,
    pub notice: Option<&'static str>,
}

pub fn view<'a>(fs: f32, state: DemoState<'a>, hovered: Option<Hover>) -> Element<'a, Message> {
    let viewport = if state.streaming {
        live_view(fs, &state)
    } else {
        idle_view(fs, state.error, hovered)
    };

    let viewport = container(viewport)
        .width(CAPTURE_WIDTH as f32)
        .height(CAPTURE_HEIGHT as f32)
        .clip(true)
        .style(|_theme: &Theme| container::Style {
            background: Some(Color::BLACK.into()),
            border: Border {
                radius: 16.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    let controls = controls(fs, &state, hovered);

    section(
        column![
            text("Live Analysis Center")
                .size(scaled(32.0, fs))
                .font(bold()),
            Space::new().height(8),
            text("Multi-face detection with real-time feedback flagging.")
                .size(scaled(15.0, fs))
                .style(muted),
            Space::new().height(28),
            container(column![viewport, Space::new().height(16), controls].width(
                CAPTURE_WIDTH as f32
            ))
            .padding(16)
            .style(card_style),
        ]
        .align_x(Alignment::Center),
    )
}

fn idle_view<'a>(fs: f32, error: Option<&'a str>, hovered: Option<Hover>) -> Element<'a, Message> {
    let activate = action_button(
        move || {
            text("Activate Camera Feed")
                .size(scaled(15.0, fs))
                .font(bold())
                .into()
        },
        Some(Message::StartCamera),
        Tone::Primary,
        hovered == Some(Hover::StartCamera),
        |h| Message::Hovered(Hover::StartCamera, h),
        [14, 28],
    );

    let mut body = column![
        text("\u{1F3A5}").size(scaled(36.0, fs)),
        Space::new().height(20),
        activate,
    ]
    .align_x(Alignment::Center);

    if let Some(message) = error {
        body = body
            .push(Space::new().height(14))
            .push(text(message).size(scaled(13.0, fs)).style(danger));
    }

    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn live_view<'a>(fs: f32, state: &DemoState<'a>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match state.preview {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Fill)
            .into(),
        None => container(text("Waiting for camera\u{2026}").size(scaled(14.0, fs)).style(tertiary))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    let overlay = canvas(OverlayCanvas::new(state.overlay.clone()))
        .width(Length::Fill)
        .height(Length::Fill);

    let mut badges = row![badge(fs, "\u{25CF} LIVE STREAMING", |theme| theme.palette().danger)]
        .spacing(8)
        .width(Length::Fill);
    if state.processing {
        badges = badges
            .push(Space::new().width(Length::Fill))
            .push(badge(fs, "Analyzing frame\u{2026}", |theme| theme.palette().primary));
    }

    stack![
        picture,
        overlay,
        container(badges).padding(14).width(Length::Fill),
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn badge<'a>(
    fs: f32,
    label: &'static str,
    tint: fn(&Theme) -> Color,
) -> Element<'a, Message> {
    container(
        text(label)
            .size(scaled(11.0, fs))
            .font(bold())
            .color(Color::WHITE),
    )
    .padding([4, 10])
    .style(move |theme: &Theme| container::Style {
        background: Some(Color { a: 0.85, ..tint(theme) }.into()),
        border: Border {
            radius: 100.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    })
    .into()
}

fn controls<'a>(fs: f32, state: &DemoState<'a>, hovered: Option<Hover>) -> Element<'a, Message> {
    let flag = |correction: Correction, target: Hover| {
        let enabled = state.can_flag.then_some(Message::Flag(correction));
        action_button_fill(
            move || {
                text(format!("Flag {}", correction.label()))
                    .size(scaled(13.0, fs))
                    .width(Length::Fill)
                    .align_x(Alignment::Center)
                    .into()
            },
            enabled,
            Tone::Subtle,
            hovered == Some(target),
            move |h| Message::Hovered(target, h),
            [10, 16],
        )
    };

    let verdict = match &state.status {
        Some(status) if !status.is_empty() => format!("Last verdict: {status}"),
        _ if state.streaming => "No faces in the last analyzed frame".to_string(),
        _ => "Camera inactive".to_string(),
    };

    let mut col = column![
        row![
            text("DIAGNOSTIC CONTROLS")
                .size(scaled(11.0, fs))
                .font(bold())
                .style(tertiary),
            Space::new().width(Length::Fill),
            text(verdict).size(scaled(12.0, fs)).style(muted),
        ]
        .align_y(Alignment::Center),
        Space::new().height(10),
        row![
            flag(Correction::FalsePositive, Hover::FlagPositive),
            flag(Correction::FalseNegative, Hover::FlagNegative),
        ]
        .spacing(10),
    ];

    if state.streaming {
        col = col.push(Space::new().height(10)).push(action_button_fill(
            move || {
                text("Terminate Feed")
                    .size(scaled(13.0, fs))
                    .font(bold())
                    .width(Length::Fill)
                    .align_x(Alignment::Center)
                    .into()
            },
            Some(Message::StopCamera),
            Tone::Danger,
            hovered == Some(Hover::StopCamera),
            |h| Message::Hovered(Hover::StopCamera, h),
            [10, 16],
        ));
    }

    if let Some(notice) = state.notice {
        col = col.push(Space::new().height(10)).push(
            text(notice)
                .size(scaled(13.0, fs))
                .style(|theme: &Theme| text::Style {
                    color: Some(theme.palette().success),
                }),
        );
    }

    col.into()
}
