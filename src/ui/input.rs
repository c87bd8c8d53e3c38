#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Tab,
    Other,
}

impl From<egui::Key> for Key {
    fn from(key: egui::Key) -> Self {
        match key {
            egui::Key::Escape => Key::Escape,
            egui::Key::ArrowLeft => Key::ArrowLeft,
            egui::Key::ArrowRight => Key::ArrowRight,
            egui::Key::Tab => Key::Tab,
            _ => Key::Other,
        }
    }
}

/// Intent produced by pointer, keyboard or touch input, already resolved to
/// what the user asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightboxEvent {
    OpenRequested(usize),
    CloseRequested,
    NextRequested,
    PreviousRequested,
    KeyPressed { key: Key, shift: bool },
    Swiped(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        self == KeyOutcome::Handled
    }
}

/// Key presses only; releases and other events yield `None`.
pub fn key_event(event: &egui::Event) -> Option<LightboxEvent> {
    match event {
        egui::Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } => Some(LightboxEvent::KeyPressed {
            key: Key::from(*key),
            shift: modifiers.shift,
        }),
        _ => None,
    }
}
