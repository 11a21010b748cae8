use crate::frames::mac_addr::{mac_from_slice, MacAddr, MAC_LEN};

/// EtherType identifying probe frames on the link.
pub const ETHERTYPE: u16 = 0x8950;

/// Current protocol version; frames carrying any other value are rejected.
pub const VERSION: u8 = 0x0A;

/// Size of the fixed header (Ethernet header included).
pub const HEADER_LEN: usize = 32;

/// Largest frame ever sent or read (jumbo-frame MTU).
pub const MAX_FRAME_LEN: usize = 9220;

// field offsets
const DST: usize = 0;
const SRC: usize = 6;
const ETHERTYPE_AT: usize = 12;
const VERSION_AT: usize = 14;
const KIND_AT: usize = 15;
const SEQUENCE_AT: usize = 16;
const ORIGIN: usize = 18;
const TIMESTAMP_AT: usize = 24;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameKind {
    Echo = 0x01,
    Reply = 0x02,
}

impl TryFrom<u8> for FrameKind {
    type Error = RejectReason;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Echo),
            0x02 => Ok(Self::Reply),
            other => Err(RejectReason::Kind(other)),
        }
    }
}

/// Why a buffer was not accepted as a probe frame.
///
/// Rejections are expected background noise on a shared link: they are only ever logged.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RejectReason {
    #[error("frame too short ({0} bytes)")]
    TooShort(usize),
    #[error("unexpected ethertype {0:#06x}")]
    EtherType(u16),
    #[error("unsupported version {0:#04x}")]
    Version(u8),
    #[error("unknown frame type {0:#04x}")]
    Kind(u8),
}

/// Fixed header of a probe frame.
///
/// Bytes following the header are opaque padding and are never interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProbeFrame {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub kind: FrameKind,
    pub sequence: u16,
    /// Address of the prober that emitted the echo; survives the reply unchanged.
    pub origin: MacAddr,
    /// Sender-side send time, opaque to the responder.
    pub timestamp: u64,
}

impl ProbeFrame {
    /// Builds an echo request from `src` to `dst`.
    pub fn echo(dst: MacAddr, src: MacAddr, sequence: u16, timestamp: u64) -> Self {
        Self {
            dst,
            src,
            kind: FrameKind::Echo,
            sequence,
            origin: src,
            timestamp,
        }
    }

    /// Returns the reply to this echo as sent from `local_mac`.
    pub fn reply_from(&self, local_mac: MacAddr) -> Self {
        Self {
            dst: self.origin,
            src: local_mac,
            kind: FrameKind::Reply,
            ..*self
        }
    }

    /// Serializes the frame padded with zeroes to `size` bytes (never less than the header).
    pub fn encode(&self, size: usize) -> Vec<u8> {
        let mut buf = vec![0; size.max(HEADER_LEN)];
        self.write_header(&mut buf);
        buf
    }

    /// Overwrites the header region of `buf`, leaving the trailing bytes as they are.
    ///
    /// `buf` must be at least [`HEADER_LEN`] bytes long.
    pub fn write_header(&self, buf: &mut [u8]) {
        buf[DST..DST + MAC_LEN].copy_from_slice(&self.dst.octets());
        buf[SRC..SRC + MAC_LEN].copy_from_slice(&self.src.octets());
        buf[ETHERTYPE_AT..VERSION_AT].copy_from_slice(&ETHERTYPE.to_be_bytes());
        buf[VERSION_AT] = VERSION;
        buf[KIND_AT] = self.kind as u8;
        buf[SEQUENCE_AT..ORIGIN].copy_from_slice(&self.sequence.to_be_bytes());
        buf[ORIGIN..ORIGIN + MAC_LEN].copy_from_slice(&self.origin.octets());
        buf[TIMESTAMP_AT..HEADER_LEN].copy_from_slice(&self.timestamp.to_be_bytes());
    }

    /// Parses and validates the fixed header of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, RejectReason> {
        if bytes.len() < HEADER_LEN {
            return Err(RejectReason::TooShort(bytes.len()));
        }

        let ethertype = u16::from_be_bytes([bytes[ETHERTYPE_AT], bytes[ETHERTYPE_AT + 1]]);
        if ethertype != ETHERTYPE {
            return Err(RejectReason::EtherType(ethertype));
        }
        if bytes[VERSION_AT] != VERSION {
            return Err(RejectReason::Version(bytes[VERSION_AT]));
        }
        let kind = FrameKind::try_from(bytes[KIND_AT])?;

        let mut timestamp = [0; 8];
        timestamp.copy_from_slice(&bytes[TIMESTAMP_AT..HEADER_LEN]);

        Ok(Self {
            dst: mac_from_slice(&bytes[DST..]),
            src: mac_from_slice(&bytes[SRC..]),
            kind,
            sequence: u16::from_be_bytes([bytes[SEQUENCE_AT], bytes[SEQUENCE_AT + 1]]),
            origin: mac_from_slice(&bytes[ORIGIN..]),
            timestamp: u64::from_be_bytes(timestamp),
        })
    }
}
