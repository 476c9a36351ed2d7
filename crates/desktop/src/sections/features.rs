use iced::widget::{column, container, row, text, Space};
use iced::{Alignment, Element, Length};

use crate::app::{bold, scaled, Message};

use super::{accent, card_style, muted, section};

struct Feature {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        icon: "\u{1F4A1}",
        title: "Multimodal Analysis",
        description: "Built on multimodal visual processing for reliability in varying light.",
    },
    Feature {
        icon: "\u{26A1}",
        title: "Edge Optimization",
        description: "Low-latency inference for monitoring high-traffic entry points.",
    },
    Feature {
        icon: "\u{2714}",
        title: "Compliance Reporting",
        description: "Flagged incidents are logged for institutional safety audits.",
    },
];

pub fn view<'a>(fs: f32) -> Element<'a, Message> {
    let cards = row(FEATURES
        .iter()
        .map(|f| {
            container(
                column![
                    text(f.icon).size(scaled(24.0, fs)).style(accent),
                    Space::new().height(14),
                    text(f.title).size(scaled(18.0, fs)).font(bold()),
                    Space::new().height(8),
                    text(f.description).size(scaled(14.0, fs)).style(muted),
                ]
                .width(Length::Fill),
            )
            .padding(28)
            .width(Length::FillPortion(1))
            .style(card_style)
            .into()
        })
        .collect::<Vec<_>>())
    .spacing(20);

    section(
        column![
            text("Industrial Grade Vision")
                .size(scaled(32.0, fs))
                .font(bold()),
            Space::new().height(10),
            text("Beyond simple classification: every face in frame, every tick.")
                .size(scaled(15.0, fs))
                .style(muted),
            Space::new().height(32),
            cards,
        ]
        .align_x(Alignment::Center)
        .max_width(1000),
    )
}
