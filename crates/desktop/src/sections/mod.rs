pub mod admin;
pub mod call_to_action;
pub mod carousel;
pub mod demo_panel;
pub mod features;
pub mod footer;
pub mod gate;
pub mod hero;
pub mod navbar;

use iced::border::Border;
use iced::widget::{container, text};
use iced::{Element, Length, Theme};

use crate::app::Message;
use crate::theme::{border_color, muted_color, surface_color, tertiary_color};

const SECTION_PADDING: [u16; 2] = [48, 32];
const CARD_RADIUS: f32 = 20.0;

/// Full-width band with the page's horizontal rhythm.
fn section<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .padding(SECTION_PADDING)
        .center_x(Length::Fill)
        .into()
}

fn card_style(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(surface_color(theme).into()),
        border: Border {
            color: border_color(theme),
            width: 1.0,
            radius: CARD_RADIUS.into(),
        },
        ..container::Style::default()
    }
}

fn muted(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(muted_color(theme)),
    }
}

fn tertiary(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(tertiary_color(theme)),
    }
}

fn accent(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(theme.palette().primary),
    }
}

fn danger(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(theme.palette().danger),
    }
}
