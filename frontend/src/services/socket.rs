//! Push-channel connection manager.
//!
//! One `ChatSocket` exists per authenticated session; chat views borrow it
//! rather than opening their own connections. It owns the reconnect loop
//! (bounded attempts, fixed delay) and guarantees that after `close()` no
//! further callback fires, so a torn-down component never sees a stale event.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use gloo::net::websocket::{futures::WebSocket, Message as WsMessage, State};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use shared::chat::{ConnectionStatus, ReconnectPolicy};
use shared::{ClientEvent, ServerEvent};

use crate::services::config::{MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY_MS, WS_URL};
use crate::services::logging::Logger;

const COMPONENT: &str = "chat-socket";

struct Inner {
    outbound: Option<mpsc::UnboundedSender<ClientEvent>>,
    status: ConnectionStatus,
    closed: bool,
}

#[derive(Clone)]
pub struct ChatSocket {
    url: String,
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for ChatSocket {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ChatSocket {
    /// The token rides in the connection URL; the server authenticates the
    /// handshake before admitting the socket to any room.
    pub fn new(token: &str) -> Self {
        Self {
            url: format!("{}?token={}", WS_URL, token),
            inner: Rc::new(RefCell::new(Inner {
                outbound: None,
                status: ConnectionStatus::Disconnected,
                closed: false,
            })),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.borrow().status
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    /// Queue an event on the push channel. Fire-and-forget: there is no ack
    /// tracking. Errors when the channel is not connected so the caller can
    /// take its REST fallback.
    pub fn send(&self, event: ClientEvent) -> Result<()> {
        let inner = self.inner.borrow();
        if inner.status != ConnectionStatus::Connected {
            return Err(anyhow!("push channel is not connected"));
        }
        match &inner.outbound {
            Some(sender) => sender
                .unbounded_send(event)
                .map_err(|e| anyhow!("push channel send failed: {}", e)),
            None => Err(anyhow!("push channel is not connected")),
        }
    }

    /// Open the channel and keep it alive until `close()`. Lifecycle
    /// transitions go to `on_status`, decoded server events to `on_event`.
    pub fn connect(&self, on_status: Callback<ConnectionStatus>, on_event: Callback<ServerEvent>) {
        let socket = self.clone();
        spawn_local(async move {
            socket.run(on_status, on_event).await;
        });
    }

    /// Tear the channel down unconditionally. No callback fires after this.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.closed = true;
        inner.status = ConnectionStatus::Disconnected;
        // Dropping the sender ends the write pump, which closes the socket.
        inner.outbound = None;
    }

    async fn run(self, on_status: Callback<ConnectionStatus>, on_event: Callback<ServerEvent>) {
        let mut policy = ReconnectPolicy::new(MAX_RECONNECT_ATTEMPTS);
        loop {
            if self.inner.borrow().closed {
                break;
            }
            self.set_status(policy.connecting_status(), &on_status);

            match WebSocket::open(&self.url) {
                Ok(mut ws) => {
                    // open() only validates the URL and returns while the
                    // handshake is still in flight; Connected must wait for
                    // the socket to actually reach the open state.
                    let opened = wait_until_open(&mut ws).await;
                    if self.inner.borrow().closed {
                        break;
                    }
                    if opened {
                        policy.connected();
                        Logger::info_with_component(COMPONENT, "push channel connected");
                        self.set_status(ConnectionStatus::Connected, &on_status);
                        self.pump(ws, &on_event).await;
                        self.inner.borrow_mut().outbound = None;
                        if self.inner.borrow().closed {
                            break;
                        }
                        Logger::warn_with_component(
                            COMPONENT,
                            "push channel dropped, scheduling reconnect",
                        );
                    } else {
                        Logger::warn_with_component(
                            COMPONENT,
                            "push channel refused, scheduling reconnect",
                        );
                    }
                    self.set_status(ConnectionStatus::Disconnected, &on_status);
                }
                Err(e) => {
                    Logger::warn_with_component(
                        COMPONENT,
                        &format!("failed to open push channel: {:?}", e),
                    );
                    self.set_status(ConnectionStatus::Disconnected, &on_status);
                }
            }

            if !policy.failed() {
                Logger::error_with_component(COMPONENT, "reconnect attempts exhausted");
                break;
            }
            TimeoutFuture::new(RECONNECT_DELAY_MS).await;
        }
    }

    /// Run the write and read pumps until either side ends.
    async fn pump(&self, ws: WebSocket, on_event: &Callback<ServerEvent>) {
        let (mut sink, mut stream) = ws.split();
        let (sender, mut receiver) = mpsc::unbounded::<ClientEvent>();
        self.inner.borrow_mut().outbound = Some(sender);

        let write = async {
            while let Some(event) = receiver.next().await {
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        Logger::error_with_component(
                            COMPONENT,
                            &format!("failed to encode client event: {}", e),
                        );
                        continue;
                    }
                };
                if sink.send(WsMessage::Text(text)).await.is_err() {
                    break;
                }
            }
        };

        let read = async {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(WsMessage::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            if self.inner.borrow().closed {
                                break;
                            }
                            on_event.emit(event);
                        }
                        Err(e) => Logger::warn_with_component(
                            COMPONENT,
                            &format!("undecodable server event: {}", e),
                        ),
                    },
                    Ok(WsMessage::Bytes(_)) => {
                        // The protocol is text-only JSON.
                    }
                    Err(_) => break,
                }
            }
        };

        futures::pin_mut!(write, read);
        futures::future::select(write, read).await;
    }

    fn set_status(&self, status: ConnectionStatus, on_status: &Callback<ConnectionStatus>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.status == status {
                return;
            }
            inner.status = status;
        }
        if !self.inner.borrow().closed {
            on_status.emit(status);
        }
    }
}

/// Wait for the handshake to settle. Sink readiness fires once the socket
/// leaves CONNECTING, on the open and the refused case alike; only an actual
/// OPEN state counts as success.
async fn wait_until_open(ws: &mut WebSocket) -> bool {
    let _ = futures::future::poll_fn(|cx| ws.poll_ready_unpin(cx)).await;
    matches!(ws.state(), State::Open)
}
