//! WebSocket client for the tracking push channel

use gloo_timers::callback::Timeout;
use leptos::*;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::model::ServerFrame;

/// Delay before reopening a dropped connection
const RECONNECT_DELAY_MS: u32 = 3_000;

/// WebSocket connection state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WsState {
    Connecting,
    Connected,
    Disconnected,
    Error,
}

/// Tracking WebSocket hook for /ws/events
///
/// Reopens the socket after it closes, until the owning component unmounts.
pub fn use_tracking_websocket() -> (ReadSignal<WsState>, ReadSignal<Option<ServerFrame>>) {
    let (state, set_state) = create_signal(WsState::Disconnected);
    let (last_frame, set_last_frame) = create_signal::<Option<ServerFrame>>(None);
    let (ws, set_ws) = create_signal::<Option<WebSocket>>(None);
    let (attempt, set_attempt) = create_signal(0u32);
    let disposed = Rc::new(Cell::new(false));

    let effect_disposed = Rc::clone(&disposed);
    create_effect(move |_| {
        attempt.track();
        let disposed = Rc::clone(&effect_disposed);
        if disposed.get() {
            return;
        }

        let Some(url) = events_websocket_url() else {
            set_state.set(WsState::Error);
            return;
        };

        set_state.set(WsState::Connecting);

        match WebSocket::new(&url) {
            Ok(socket) => {
                let onopen = Closure::wrap(Box::new(move |_: JsValue| {
                    gloo_console::log!("Connected to server");
                    set_state.set(WsState::Connected);
                }) as Box<dyn Fn(JsValue)>);
                socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
                onopen.forget();

                let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
                    if let Ok(text) = e.data().dyn_into::<js_sys::JsString>() {
                        let text_string: String = text.into();
                        match serde_json::from_str::<ServerFrame>(&text_string) {
                            Ok(frame) => set_last_frame.set(Some(frame)),
                            Err(err) => {
                                gloo_console::error!(
                                    "Failed to parse server frame:",
                                    err.to_string()
                                );
                            }
                        }
                    }
                }) as Box<dyn Fn(MessageEvent)>);
                socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
                onmessage.forget();

                let onerror = Closure::wrap(Box::new(move |e: ErrorEvent| {
                    gloo_console::error!("Tracking WebSocket error:", e.message());
                    set_state.set(WsState::Error);
                }) as Box<dyn Fn(ErrorEvent)>);
                socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
                onerror.forget();

                let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
                    gloo_console::log!("Disconnected from server:", e.code(), e.reason());
                    let _ = set_state.try_set(WsState::Disconnected);
                    if !disposed.get() {
                        let disposed = Rc::clone(&disposed);
                        Timeout::new(RECONNECT_DELAY_MS, move || {
                            if !disposed.get() {
                                set_attempt.update(|n| *n += 1);
                            }
                        })
                        .forget();
                    }
                }) as Box<dyn Fn(CloseEvent)>);
                socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
                onclose.forget();

                set_ws.set(Some(socket));
            }
            Err(e) => {
                gloo_console::error!("Failed to create tracking WebSocket:", format!("{:?}", e));
                set_state.set(WsState::Error);
            }
        }
    });

    on_cleanup(move || {
        disposed.set(true);
        if let Some(socket) = ws.get_untracked() {
            let _ = socket.close();
        }
    });

    (state, last_frame)
}

/// WebSocket URL for the events channel on the page's host
fn events_websocket_url() -> Option<String> {
    let location = web_sys::window()?.location();

    let protocol = if location.protocol().unwrap_or_default() == "https:" {
        "wss:"
    } else {
        "ws:"
    };

    let host = location
        .host()
        .unwrap_or_else(|_| "localhost:8080".to_string());

    Some(format!("{}//{}/ws/events", protocol, host))
}
