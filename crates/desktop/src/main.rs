mod app;
mod sections;
mod settings;
mod theme;
mod widgets;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .title("MaskGuard \u{00B7} Live Mask Compliance")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(1100.0, 860.0),
            min_size: Some(iced::Size::new(760.0, 640.0)),
            ..Default::default()
        })
        .run()
}
