//! Terminal events to game input.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::Input;
use crate::render::Viewport;

/// Translates one terminal event. Mouse cells are mapped through `viewport`
/// into world coordinates; resize and unbound keys yield `None`.
pub fn translate(event: &Event, viewport: &Viewport) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse, viewport),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char(' ') | KeyCode::Up => Some(Input::Jump),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Input::Restart),
        _ => None,
    }
}

fn translate_mouse(mouse: &MouseEvent, viewport: &Viewport) -> Option<Input> {
    // A cell spans two pixel rows; aim between them.
    let (x, y) = viewport.to_world(mouse.column as f64, mouse.row as f64 * 2.0 + 0.5);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Input::PointerPressed { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(Input::PointerReleased),
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => Some(Input::PointerMoved { x, y }),
        _ => None,
    }
}
