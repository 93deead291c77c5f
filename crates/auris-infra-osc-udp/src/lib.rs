use auris_ports::command::{ChannelError, CommandChannel, EngineCommand};
use auris_ports::storage::EngineProfile;
use rosc::{OscMessage, OscPacket, OscType};
use std::io;
use std::net::{SocketAddr, UdpSocket};

/// Sends engine commands as OSC messages over a connected UDP socket.
///
/// Each command becomes one datagram carrying a single int argument. Nothing
/// is acknowledged, so a send only fails when the local socket refuses it.
pub struct OscUdpChannel {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl OscUdpChannel {
    pub fn new(profile: &EngineProfile) -> Result<Self, ChannelError> {
        Self::connect(&profile.bind_addr, &profile.engine_addr())
    }

    pub fn connect(bind_addr: &str, engine_addr: &str) -> Result<Self, ChannelError> {
        let socket =
            UdpSocket::bind(bind_addr).map_err(|e| ChannelError::Backend(e.to_string()))?;
        socket
            .connect(engine_addr)
            .map_err(|e| ChannelError::Unreachable(format!("{}: {}", engine_addr, e)))?;
        let peer = socket
            .peer_addr()
            .map_err(|e| ChannelError::Backend(e.to_string()))?;
        log::info!("osc channel {} -> {}", bind_addr, peer);
        Ok(Self { socket, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ChannelError> {
        self.socket
            .local_addr()
            .map_err(|e| ChannelError::Backend(e.to_string()))
    }

    pub fn encode(command: &EngineCommand) -> Result<Vec<u8>, ChannelError> {
        let packet = OscPacket::Message(OscMessage {
            addr: command.address.clone(),
            args: vec![OscType::Int(command.value)],
        });
        rosc::encoder::encode(&packet).map_err(|e| ChannelError::Encode(format!("{:?}", e)))
    }

    fn map_io(&self, err: io::Error) -> ChannelError {
        match err.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable => {
                ChannelError::Unreachable(format!("{}: {}", self.peer, err))
            }
            _ => ChannelError::Backend(err.to_string()),
        }
    }
}

impl CommandChannel for OscUdpChannel {
    fn send(&self, command: &EngineCommand) -> Result<(), ChannelError> {
        let datagram = Self::encode(command)?;
        let written = self.socket.send(&datagram).map_err(|e| self.map_io(e))?;
        if written != datagram.len() {
            return Err(ChannelError::Backend(format!(
                "short datagram: {} of {} bytes",
                written,
                datagram.len()
            )));
        }
        log::trace!("osc {} ({} bytes)", command, written);
        Ok(())
    }
}
