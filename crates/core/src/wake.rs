//! Wake-on-LAN magic packets.

use std::fmt::{Display, Formatter};
use std::net::UdpSocket;
use std::str::FromStr;

use log::info;

use crate::error::{Error, Result};
use crate::host_definitions::HostDefinition;

const SYNC_STREAM: [u8; 6] = [0xFF; 6];
const MAC_REPETITIONS: usize = 16;

pub const MAGIC_PACKET_LEN: usize = SYNC_STREAM.len() + 6 * MAC_REPETITIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    #[must_use]
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    /// Accepts six hex octets separated by `:` or `-`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMacAddress(s.to_string());

        let parts: Vec<&str> = s.trim().split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(parts) {
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }

        Ok(Self(octets))
    }
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Six `0xFF` bytes followed by the MAC address sixteen times.
#[must_use]
pub fn magic_packet(mac_address: &MacAddress) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0u8; MAGIC_PACKET_LEN];
    packet[..SYNC_STREAM.len()].copy_from_slice(&SYNC_STREAM);

    for chunk in packet[SYNC_STREAM.len()..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac_address.0);
    }

    packet
}

/// Broadcasts a magic packet for `mac_address` to `broadcast:port` over UDP.
///
/// # Errors
///
/// Returns an error if the socket cannot be opened or the send fails.
pub fn send_magic_packet(mac_address: &MacAddress, broadcast: &str, port: u16) -> Result<usize> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.set_broadcast(true)?;

    let sent = socket.send_to(&magic_packet(mac_address), (broadcast, port))?;
    info!("Sent {sent} byte magic packet for {mac_address} to {broadcast}:{port}");

    Ok(sent)
}

/// The parsed MAC address of a configured host.
///
/// # Errors
///
/// Returns [`Error::MissingMacAddress`] if the host has no MAC configured, or
/// [`Error::InvalidMacAddress`] if it does not parse.
pub fn host_mac_address(host: &HostDefinition) -> Result<MacAddress> {
    host.mac_address
        .as_deref()
        .ok_or_else(|| Error::MissingMacAddress(host.id.clone()))?
        .parse()
}
