use iced::border::Border;
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Color, Element, Length, Theme};

use crate::app::{bold, scaled, Message};

use super::{accent, card_style, muted, section};

pub struct Slide {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SLIDES: &[Slide] = &[
    Slide {
        title: "Corporate Headquarters",
        description: "Compliance monitored across every floor from the first week of deployment.",
    },
    Slide {
        title: "Public Transit Hubs",
        description: "Works alongside existing camera infrastructure for real-time alerting.",
    },
    Slide {
        title: "Healthcare Facilities",
        description: "Constant automated visual auditing for sterile environments.",
    },
];

pub fn next_slide(current: usize) -> usize {
    (current + 1) % SLIDES.len()
}

pub fn view<'a>(fs: f32, current: usize) -> Element<'a, Message> {
    let slide = &SLIDES[current % SLIDES.len()];

    let dots = row((0..SLIDES.len())
        .map(|index| {
            let active = index == current;
            button(Space::new().width(if active { 28 } else { 8 }).height(6))
                .on_press(Message::CarouselSelect(index))
                .padding(0)
                .style(move |theme: &Theme, _status| button::Style {
                    background: Some(
                        if active {
                            theme.palette().primary
                        } else {
                            Color {
                                a: 0.25,
                                ..theme.palette().text
                            }
                        }
                        .into(),
                    ),
                    border: Border {
                        radius: 3.0.into(),
                        ..Border::default()
                    },
                    ..button::Style::default()
                })
                .into()
        })
        .collect::<Vec<_>>())
    .spacing(6);

    let card = container(
        column![
            text("IMPLEMENTATION")
                .size(scaled(11.0, fs))
                .font(bold())
                .style(accent),
            Space::new().height(10),
            text(slide.title).size(scaled(28.0, fs)).font(bold()),
            Space::new().height(10),
            text(slide.description).size(scaled(16.0, fs)).style(muted),
            Space::new().height(28),
            dots,
        ]
        .width(Length::Fill),
    )
    .padding([40, 48])
    .max_width(1000)
    .style(card_style);

    section(column![card].align_x(Alignment::Center))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_slide_wraps_around() {
        let last = SLIDES.len() - 1;
        assert_eq!(next_slide(0), 1);
        assert_eq!(next_slide(last), 0);
    }
}
