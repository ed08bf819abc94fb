use config::{Config, DisplayKind};
use device_camera::impl_fake::{DeviceCameraFake, DeviceCameraFakeConfig};
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_input::impl_channel::DeviceInputChannel;
use device_input::impl_console::DeviceInputConsole;
use device_input::interface::InputEvent;
use image_classifier::impl_fake::ModelLoaderFake;
use inference::dispatcher::InferenceDispatcher;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use preview::fit::Size;
use screen::main::Screen;
use std::sync::{Arc, Mutex};

mod capture_session;
mod config;
mod device_camera;
mod device_display;
mod device_input;
mod error;
mod image_classifier;
mod inference;
mod library;
mod model_bundle;
mod presenter;
mod preview;
mod screen;
mod still_capture;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera = Arc::new(DeviceCameraFake::new(
        DeviceCameraFakeConfig::default(),
        logger.clone(),
    ));

    let inference = config.classifier.as_ref().map(|model| {
        Arc::new(InferenceDispatcher::load(
            model,
            &ModelLoaderFake::new(logger.clone()),
            logger.clone(),
        ))
    });

    match config.display {
        DisplayKind::Console => {
            let device_display = Arc::new(Mutex::new(DeviceDisplayConsole::new(Size::new(
                640.0, 480.0,
            ))));
            let device_input = Arc::new(DeviceInputConsole::new(logger.clone()));

            let screen = Screen::new(
                config,
                logger,
                device_camera,
                device_display,
                device_input,
                inference,
            )?;
            screen.run()?;
        }
        DisplayKind::Gui => {
            // The window owns the main thread; the screen loop runs beside it.
            let (device_input, input_sender) = DeviceInputChannel::new();
            let (device_display, window) = DeviceDisplayGui::new(input_sender.clone());

            let screen = Screen::new(
                config,
                logger.clone(),
                device_camera,
                Arc::new(Mutex::new(device_display)),
                Arc::new(device_input),
                inference,
            )?;
            let screen_loop = std::thread::Builder::new()
                .name("ui-loop".to_string())
                .spawn(move || screen.run().map(|_| ()))?;

            let window_result = DeviceDisplayGui::run_window(window);
            let _ = input_sender.send(InputEvent::Quit);

            match screen_loop.join() {
                Ok(result) => result?,
                Err(_) => {
                    let _ = logger.error("Screen loop panicked");
                }
            }
            window_result?;
        }
    }

    Ok(())
}
