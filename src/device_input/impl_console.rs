use crate::device_input::interface::{DeviceInput, InputEvent};
use crate::library::logger::interface::Logger;
use std::io::BufRead;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Reads commands from stdin, one per line.
pub struct DeviceInputConsole {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceInputConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("input"),
        }
    }
}

/// Empty line or `p` takes a photo, `h` hides the screen, `s` shows it, `q` quits.
pub fn parse_command(line: &str) -> Option<InputEvent> {
    match line.trim().to_lowercase().as_str() {
        "" | "p" | "photo" => Some(InputEvent::TakePhoto),
        "h" | "hide" => Some(InputEvent::Disappear),
        "s" | "show" => Some(InputEvent::Appear),
        "q" | "quit" | "exit" => Some(InputEvent::Quit),
        _ => None,
    }
}

impl DeviceInput for DeviceInputConsole {
    fn events(&self) -> Receiver<InputEvent> {
        let (tx, rx) = channel();
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            let _ = logger.info("Commands: [enter]/p = take photo, h = hide, s = show, q = quit");
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        let _ = logger.error(&format!("stdin: {}", e));
                        break;
                    }
                };
                match parse_command(&line) {
                    Some(event) => {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                    None => {
                        let _ = logger.info(&format!("Unknown command: {:?}", line.trim()));
                    }
                }
            }
            let _ = tx.send(InputEvent::Quit);
        });

        rx
    }
}
