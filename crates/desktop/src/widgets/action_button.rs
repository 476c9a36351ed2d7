use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area};
use iced::{Color, Element, Length, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::theme::{border_color, surface_color};

const HOVER_DARKEN: f32 = 0.05;
const FLOAT_HEIGHT: f32 = 1.0;
const CORNER_RADIUS: f32 = 12.0;
const SHADOW_BLUR_BASE: f32 = 10.0;
const SHADOW_BLUR_HOVER: f32 = 16.0;
const SHADOW_OFFSET_Y: f32 = 3.0;
const SHADOW_ALPHA_BASE: f32 = 0.2;
const SHADOW_ALPHA_HOVER: f32 = 0.35;
const DISABLED_ALPHA: f32 = 0.35;
const ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// Which palette entry fills the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Primary,
    Danger,
    Subtle,
}

/// Animated button that floats up slightly on hover. Passing `None` as
/// `on_press` renders it disabled.
pub fn action_button<'a, Message: Clone + 'a>(
    content: impl Fn() -> Element<'a, Message> + 'a,
    on_press: Option<Message>,
    tone: Tone,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
    padding: [u16; 2],
) -> Element<'a, Message> {
    action_button_with_width(content, on_press, tone, hovered, on_hover, padding, Length::Shrink)
}

pub fn action_button_fill<'a, Message: Clone + 'a>(
    content: impl Fn() -> Element<'a, Message> + 'a,
    on_press: Option<Message>,
    tone: Tone,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
    padding: [u16; 2],
) -> Element<'a, Message> {
    action_button_with_width(content, on_press, tone, hovered, on_hover, padding, Length::Fill)
}

fn action_button_with_width<'a, Message: Clone + 'a>(
    content: impl Fn() -> Element<'a, Message> + 'a,
    on_press: Option<Message>,
    tone: Tone,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
    padding: [u16; 2],
    width: Length,
) -> Element<'a, Message> {
    let target = if hovered && on_press.is_some() {
        1.0_f32
    } else {
        0.0
    };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        let t = t.clamp(0.0, 1.0);
        build_button(&content, on_press.as_ref(), tone, padding, width, t)
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    mouse_area(animated)
        .on_enter(on_hover(true))
        .on_exit(on_hover(false))
        .into()
}

fn build_button<'a, Message: Clone + 'a>(
    content: &dyn Fn() -> Element<'a, Message>,
    on_press: Option<&Message>,
    tone: Tone,
    padding: [u16; 2],
    width: Length,
    hover_amount: f32,
) -> Element<'a, Message> {
    let enabled = on_press.is_some();
    let btn = button(content())
        .on_press_maybe(on_press.cloned())
        .padding(padding)
        .width(width)
        .style(move |theme: &Theme, status: button::Status| {
            let amount = if status == button::Status::Pressed {
                1.0
            } else {
                hover_amount
            };
            styled(theme, tone, enabled, amount)
        });

    let rise = hover_amount * FLOAT_HEIGHT;
    container(btn)
        .padding(Padding {
            top: FLOAT_HEIGHT - rise,
            bottom: rise,
            ..Padding::ZERO
        })
        .into()
}

fn styled(theme: &Theme, tone: Tone, enabled: bool, hover_amount: f32) -> button::Style {
    let palette = theme.palette();
    let (base, text_color, border) = match tone {
        Tone::Primary => (palette.primary, Color::WHITE, Border::default()),
        Tone::Danger => (palette.danger, Color::WHITE, Border::default()),
        Tone::Subtle => (
            surface_color(theme),
            palette.text,
            Border {
                color: border_color(theme),
                width: 1.0,
                ..Border::default()
            },
        ),
    };
    let alpha = if enabled { 1.0 } else { DISABLED_ALPHA };
    let t = hover_amount;

    let shadow = if tone == Tone::Subtle || !enabled {
        Shadow::default()
    } else {
        Shadow {
            color: Color {
                a: lerp(SHADOW_ALPHA_BASE, SHADOW_ALPHA_HOVER, t),
                ..base
            },
            offset: Vector::new(0.0, SHADOW_OFFSET_Y),
            blur_radius: lerp(SHADOW_BLUR_BASE, SHADOW_BLUR_HOVER, t),
        }
    };

    button::Style {
        background: Some(
            Color {
                a: alpha,
                ..darken(base, hover_amount)
            }
            .into(),
        ),
        text_color: Color {
            a: alpha,
            ..text_color
        },
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..border
        },
        shadow,
        ..button::Style::default()
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn darken(color: Color, amount: f32) -> Color {
    let shift = HOVER_DARKEN * amount;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: 1.0,
    }
}
