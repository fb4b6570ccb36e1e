//! macOS platform implementation
//!
//! Posts CoreGraphics mouse events at the HID tap via cidre.

use crate::action::{ActionKind, MouseButton};
use crate::actuator::InputActuator;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

use cidre::cg;

// Raw FFI for CGEventPost (not exposed by cidre)
#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventPost(tap: u32, event: *const std::ffi::c_void);
}

const HID_EVENT_TAP: u32 = 0;

fn post_event(event: &cg::Event) {
    unsafe {
        CGEventPost(HID_EVENT_TAP, event as *const _ as *const std::ffi::c_void);
    }
}

pub fn actuator() -> Result<Arc<dyn InputActuator>> {
    Ok(Arc::new(CgEventActuator))
}

/// Clicks by posting mouse down/up pairs
#[derive(Debug, Default)]
pub struct CgEventActuator;

impl InputActuator for CgEventActuator {
    fn inject(&self, kind: ActionKind, x: f64, y: f64) -> Result<()> {
        let Some(button) = kind.button() else {
            return Ok(());
        };
        let pos = cg::Point { x, y };

        let (btn, down_type, up_type) = match button {
            MouseButton::Left => (
                cg::MouseButton::Left,
                cg::EventType::LEFT_MOUSE_DOWN,
                cg::EventType::LEFT_MOUSE_UP,
            ),
            MouseButton::Right => (
                cg::MouseButton::Right,
                cg::EventType::RIGHT_MOUSE_DOWN,
                cg::EventType::RIGHT_MOUSE_UP,
            ),
            MouseButton::Middle => (
                cg::MouseButton::Center,
                cg::EventType::OHTER_MOUSE_DOWN,
                cg::EventType::OHTER_MOUSE_UP,
            ),
        };

        if let Some(evt) = cg::Event::mouse(None, cg::EventType::MOUSE_MOVED, pos, cg::MouseButton::Left) {
            post_event(&evt);
        }
        // Built up front so a click is never left half pressed
        let down = cg::Event::mouse(None, down_type, pos, btn)
            .ok_or_else(|| Error::action_failed(kind.label(), "could not create mouse down event"))?;
        let up = cg::Event::mouse(None, up_type, pos, btn)
            .ok_or_else(|| Error::action_failed(kind.label(), "could not create mouse up event"))?;

        post_event(&down);
        std::thread::sleep(Duration::from_millis(10));
        post_event(&up);
        Ok(())
    }
}
