// src/platform/backends/x11/event.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use crate::platform::backends::PlatformEvent;

use anyhow::Result;
use log::trace;
use std::mem;

use x11::xlib;

/// Drains every event currently queued on the connection.
///
/// `XPending` is sampled before each `XNextEvent`, so this never blocks
/// waiting for events that have not arrived yet. Events are returned in
/// delivery order.
pub fn process_pending_events(connection: &Connection) -> Result<Vec<PlatformEvent>> {
    let mut events = Vec::new();
    let display = connection.display();

    // SAFETY: `display` is a valid pointer from an open `Connection`.
    while unsafe { xlib::XPending(display) } > 0 {
        let mut xevent: xlib::XEvent = unsafe { mem::zeroed() };
        // SAFETY: at least one event is queued, so XNextEvent returns at once.
        unsafe { xlib::XNextEvent(display, &mut xevent) };

        let event = translate_event(&xevent);
        trace!("XEvent -> {:?}", event);
        events.push(event);
    }
    Ok(events)
}

/// Maps a native event onto the closed `PlatformEvent` set.
pub fn translate_event(xevent: &xlib::XEvent) -> PlatformEvent {
    // SAFETY: `type_` is the common discriminant of every XEvent variant, and
    // each arm reads only the union member that matches it.
    let event_type = unsafe { xevent.type_ };
    match event_type {
        xlib::DestroyNotify => {
            let e = unsafe { xevent.destroy_window };
            PlatformEvent::Destroyed {
                window: e.window as u64,
            }
        }
        xlib::ClientMessage => {
            let e = unsafe { xevent.client_message };
            PlatformEvent::ClientMessage {
                window: e.window as u64,
                data0: e.data.get_long(0) as u64,
            }
        }
        xlib::ConfigureNotify => {
            let e = unsafe { xevent.configure };
            PlatformEvent::Configured {
                window: e.window as u64,
                width: e.width.max(0) as u32,
                height: e.height.max(0) as u32,
            }
        }
        xlib::KeyPress => {
            let e = unsafe { xevent.key };
            PlatformEvent::KeyPressed { keycode: e.keycode }
        }
        xlib::KeyRelease => {
            let e = unsafe { xevent.key };
            PlatformEvent::KeyReleased { keycode: e.keycode }
        }
        other => PlatformEvent::Other { kind: other },
    }
}
