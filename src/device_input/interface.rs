use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    TakePhoto,
    /// The screen became visible.
    Appear,
    /// The screen is about to be hidden.
    Disappear,
    Quit,
}

pub trait DeviceInput: Send + Sync {
    /// Stream of user input. Meant to be subscribed to once.
    fn events(&self) -> Receiver<InputEvent>;
}
