//! Data contract shared by every layer: the relayed [`Message`], the per-command
//! defaults ([`CommandConfig`]) and the fixed-capacity [`Frame`] byte buffer.

/// Wire marker meaning "not specified, infer from the command defaults".
/// Applies to `priority` and `body_size`.
pub const INFERRED: u8 = 255;

/// Length of a message body in bytes.
pub const BODY_LEN: usize = 7;

/// `priority`, `sender`, `recipient`, `command`.
pub const HEADER_LEN: usize = 4;

/// Header + body, no trailer.
pub const COMPACT_FRAME_LEN: usize = HEADER_LEN + BODY_LEN;

/// Header + body + `body_size` + `is_ack`.
pub const EXTENDED_FRAME_LEN: usize = COMPACT_FRAME_LEN + 2;

/// Largest frame any layout produces.
pub const MAX_FRAME_LEN: usize = EXTENDED_FRAME_LEN;

/// Unit of exchange between the bus and the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Bus priority (lower wins arbitration). [`INFERRED`] until resolved.
    pub priority: u8,
    /// Emitting endpoint.
    pub sender: u8,
    /// Addressed endpoint.
    pub recipient: u8,
    /// Selects the interpretation of `body`.
    pub command: u8,
    /// Meaningful bytes in `body`. [`INFERRED`] until resolved.
    pub body_size: u8,
    /// Raw body, always [`BODY_LEN`] bytes on the wire.
    pub body: [u8; BODY_LEN],
    /// Acknowledgement flag, only carried by the extended layout.
    pub is_ack: bool,
}

impl Message {
    /// Message for `command` with every inferable field left to the command defaults.
    pub const fn new(command: u8) -> Self {
        Self {
            priority: INFERRED,
            sender: 0,
            recipient: 0,
            command,
            body_size: INFERRED,
            body: [0; BODY_LEN],
            is_ack: false,
        }
    }

    pub fn with_route(mut self, sender: u8, recipient: u8) -> Self {
        self.sender = sender;
        self.recipient = recipient;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Copies up to [`BODY_LEN`] bytes into the body and sets `body_size` accordingly.
    pub fn with_body(mut self, body: &[u8]) -> Self {
        let clamped = body.len().min(BODY_LEN);
        self.body = [0; BODY_LEN];
        self.body[..clamped].copy_from_slice(&body[..clamped]);
        self.body_size = clamped as u8;
        self
    }

    pub fn with_ack(mut self, is_ack: bool) -> Self {
        self.is_ack = is_ack;
        self
    }

    /// `true` once neither `priority` nor `body_size` holds the [`INFERRED`] marker.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.priority != INFERRED && self.body_size != INFERRED
    }

    /// The meaningful part of the body.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let len = (self.body_size as usize).min(BODY_LEN);
        &self.body[..len]
    }
}

/// Defaults applied to a command's inferred fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandConfig {
    pub priority: u8,
    pub body_size: u8,
}

impl CommandConfig {
    pub const fn new(priority: u8, body_size: u8) -> Self {
        Self {
            priority,
            body_size,
        }
    }
}

/// Encoded frame. Fixed capacity so encoding never touches the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub len: usize,
    pub data: [u8; MAX_FRAME_LEN],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create an empty frame.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_FRAME_LEN],
        }
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the frame is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
