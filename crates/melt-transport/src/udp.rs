//! UDP transport implementation

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use melt_core::{MeltError, MeltResult};
use melt_wire::{decode_messages, OscMessage, MAX_PACKET_SIZE};

/// Port the Kinect bridge sends to by default
pub const DEFAULT_TRACKING_PORT: u16 = 12345;

/// Bound UDP socket for the tracking feed
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind to a local address
    pub async fn bind(addr: SocketAddr) -> MeltResult<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| MeltError::TransportError(e.to_string()))?;

        let local_addr = socket
            .local_addr()
            .map_err(|e| MeltError::TransportError(e.to_string()))?;

        Ok(UdpTransport {
            socket: Arc::new(socket),
            local_addr,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get a clone of the socket for concurrent operations
    pub fn socket(&self) -> Arc<UdpSocket> {
        Arc::clone(&self.socket)
    }
}

/// Datagram receiver channel
pub type PacketReceiver = mpsc::Receiver<(Vec<u8>, SocketAddr)>;

/// Start a background receive loop
pub fn start_receive_loop(socket: Arc<UdpSocket>, buffer_size: usize) -> PacketReceiver {
    let (tx, rx) = mpsc::channel(buffer_size);

    tokio::spawn(async move {
        let mut buf = vec![0u8; MAX_PACKET_SIZE];
        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, addr)) => {
                    let packet = buf[..len].to_vec();
                    if tx.send((packet, addr)).await.is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(e) => {
                    tracing::warn!("UDP receive error: {}", e);
                }
            }
        }
    });

    rx
}

/// Frame-loop side of the tracking feed
pub struct TrackingReceiver {
    rx: PacketReceiver,
    closed: bool,
    dropped_packets: u64,
    skipped_elements: u64,
}

impl TrackingReceiver {
    pub fn new(rx: PacketReceiver) -> Self {
        TrackingReceiver {
            rx,
            closed: false,
            dropped_packets: 0,
            skipped_elements: 0,
        }
    }

    /// Bind, start the receive loop and wrap its channel
    pub async fn listen(addr: SocketAddr, buffer_size: usize) -> MeltResult<(Self, SocketAddr)> {
        let transport = UdpTransport::bind(addr).await?;
        let local_addr = transport.local_addr();
        let rx = start_receive_loop(transport.socket(), buffer_size);
        Ok((TrackingReceiver::new(rx), local_addr))
    }

    /// Take every message that has arrived, without waiting.
    ///
    /// Undecodable packets are logged and dropped. Unreadable bundle
    /// elements are skipped without losing their siblings.
    pub fn drain(&mut self) -> Vec<OscMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok((bytes, addr)) => match decode_messages(&bytes) {
                    Ok(decoded) => {
                        if decoded.skipped > 0 {
                            self.skipped_elements += decoded.skipped as u64;
                            tracing::debug!(%addr, skipped = decoded.skipped, "skipped bundle elements");
                        }
                        messages.extend(decoded.messages);
                    }
                    Err(e) => {
                        self.dropped_packets += 1;
                        tracing::warn!(%addr, "dropping OSC packet: {}", e);
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        tracing::warn!("tracking receive loop stopped");
                        self.closed = true;
                    }
                    break;
                }
            }
        }
        messages
    }

    pub fn dropped_packets(&self) -> u64 {
        self.dropped_packets
    }

    pub fn skipped_elements(&self) -> u64 {
        self.skipped_elements
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
