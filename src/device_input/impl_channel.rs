use crate::device_input::interface::{DeviceInput, InputEvent};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

/// Input fed through a plain channel, by the GUI window or by a test.
pub struct DeviceInputChannel {
    receiver: Mutex<Option<Receiver<InputEvent>>>,
}

impl DeviceInputChannel {
    pub fn new() -> (Self, Sender<InputEvent>) {
        let (sender, receiver) = channel();
        (
            Self {
                receiver: Mutex::new(Some(receiver)),
            },
            sender,
        )
    }
}

impl DeviceInput for DeviceInputChannel {
    fn events(&self) -> Receiver<InputEvent> {
        match self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(receiver) => receiver,
            None => {
                // Already subscribed: hand out a stream that is closed from the start.
                let (_, receiver) = channel();
                receiver
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceInputChannel;
    use crate::device_input::interface::{DeviceInput, InputEvent};

    #[test]
    fn test_events_are_forwarded_once() {
        let (input, sender) = DeviceInputChannel::new();

        sender.send(InputEvent::TakePhoto).unwrap();

        let events = input.events();
        assert_eq!(events.recv().unwrap(), InputEvent::TakePhoto);
        assert!(input.events().recv().is_err());
    }
}
