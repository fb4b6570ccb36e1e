//! Windows input injection
//!
//! Uses SetCursorPos to place the pointer and SendInput for the button press.

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP,
    MOUSEINPUT, MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
};

use crate::action::{ActionKind, MouseButton};
use crate::actuator::InputActuator;
use crate::{Error, Result};

/// Clicks through the Win32 input queue
#[derive(Debug, Default)]
pub struct SendInputActuator;

impl SendInputActuator {
    pub fn new() -> Self {
        Self
    }
}

impl InputActuator for SendInputActuator {
    fn inject(&self, kind: ActionKind, x: f64, y: f64) -> Result<()> {
        let Some(button) = kind.button() else {
            return Ok(());
        };
        move_mouse(x as i32, y as i32)?;

        let (down, up) = match button {
            MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
            MouseButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
        };
        send_inputs(&[make_mouse_input(down), make_mouse_input(up)])
    }

    fn pointer_position(&self) -> Option<(f64, f64)> {
        let mut pt = POINT::default();
        unsafe { GetCursorPos(&mut pt) }.ok()?;
        Some((pt.x as f64, pt.y as f64))
    }

    fn screen_size(&self) -> Option<(f64, f64)> {
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        if w > 0 && h > 0 {
            Some((w as f64, h as f64))
        } else {
            None
        }
    }
}

/// Move the mouse to absolute coordinates
pub fn move_mouse(x: i32, y: i32) -> Result<()> {
    unsafe {
        SetCursorPos(x, y)
            .map_err(|e| Error::action_failed("Move pointer", &format!("{:?}", e)))?;
    }
    Ok(())
}

fn make_mouse_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send_inputs(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };

    if sent as usize != inputs.len() {
        return Err(Error::action_failed(
            "SendInput",
            &format!("sent {} of {} inputs", sent, inputs.len()),
        ));
    }

    Ok(())
}
