//! Fixed-layout binary wire protocol (spec §4.1, §6).
//!
//! Every packet is little-endian, 32-bit-field encoded explicitly rather than
//! transmuted from a `#[repr(C)]` struct — per spec.md §9's design note that
//! portable implementations must not rely on structure layout. The decoder
//! is a strict length-dispatch reader: it never consumes bytes it cannot
//! parse in full.

use thiserror::Error;

/// Number of i32 fields in a game packet (movement, snapshot, effect, frame
/// marker all share this shape); the tag is the first of the 13, not an
/// extra field on top.
pub const GAME_PACKET_FIELDS: usize = 13;
pub const GAME_PACKET_BYTES: usize = GAME_PACKET_FIELDS * 4;

pub const LOGIN_FIELD_LEN: usize = 32;
pub const LOGIN_REQUEST_BYTES: usize = 4 + LOGIN_FIELD_LEN * 2;
pub const LOGIN_RESPONSE_BYTES: usize = 4 + 4 + 4 + 64;
pub const ROOM_CONTROL_BYTES: usize = 4 * 4;
pub const ROOM_STATE_SLOT_BYTES: usize = 4 * 4; // owner, ready, team, hero_id
pub const ROOM_STATE_BYTES: usize = 4 + 4 + 4 + ROOM_STATE_SLOT_BYTES * super::constants::ROOM_SLOTS;
pub const BARE_TAG_BYTES: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown packet tag {0}")]
    UnknownTag(u32),
    #[error("packet of tag {tag} needs {needed} bytes, only {available} available")]
    Truncated {
        tag: u32,
        needed: usize,
        available: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Tag {
    LobbyList = 1,
    LobbyMatch = 2,
    LobbyCreate = 3,
    LobbyLeave = 4,
    LobbyStart = 5,
    LoginRequest = 10,
    RegisterRequest = 11,
    LoginResponse = 12,
    RoomReady = 20,
    RoomChangeSlot = 21,
    RoomKick = 22,
    RoomState = 23,
    RoomStart = 24,
    Move = 30,
    Attack = 31,
    Skill = 32,
    Purchase = 33,
    HeroSelect = 34,
    PlayerSnapshot = 40,
    TowerSnapshot = 41,
    MinionSnapshot = 42,
    JungleSnapshot = 43,
    EffectSnapshot = 44,
    FrameMarker = 45,
}

impl Tag {
    pub fn from_u32(v: u32) -> Option<Tag> {
        use Tag::*;
        Some(match v {
            1 => LobbyList,
            2 => LobbyMatch,
            3 => LobbyCreate,
            4 => LobbyLeave,
            5 => LobbyStart,
            10 => LoginRequest,
            11 => RegisterRequest,
            12 => LoginResponse,
            20 => RoomReady,
            21 => RoomChangeSlot,
            22 => RoomKick,
            23 => RoomState,
            24 => RoomStart,
            30 => Move,
            31 => Attack,
            32 => Skill,
            33 => Purchase,
            34 => HeroSelect,
            40 => PlayerSnapshot,
            41 => TowerSnapshot,
            42 => MinionSnapshot,
            43 => JungleSnapshot,
            44 => EffectSnapshot,
            45 => FrameMarker,
            _ => return None,
        })
    }

    /// Exact byte length the dispatcher expects for this tag, per the
    /// type-length table in spec.md §6.
    pub fn wire_len(self) -> usize {
        use Tag::*;
        match self {
            LobbyList | LobbyMatch | LobbyCreate | LobbyLeave | LobbyStart => BARE_TAG_BYTES,
            LoginRequest | RegisterRequest => LOGIN_REQUEST_BYTES,
            LoginResponse => LOGIN_RESPONSE_BYTES,
            RoomReady | RoomChangeSlot | RoomKick | RoomStart => ROOM_CONTROL_BYTES,
            RoomState => ROOM_STATE_BYTES,
            Move | Attack | Skill | Purchase | HeroSelect | PlayerSnapshot | TowerSnapshot
            | MinionSnapshot | JungleSnapshot | EffectSnapshot | FrameMarker => GAME_PACKET_BYTES,
        }
    }
}

/// The 13-integer record shared by movement commands, entity snapshots,
/// effect packets and the frame-boundary marker (spec §4.1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamePacket {
    pub tag: u32,
    pub id: i32,
    pub x: i32,
    pub y: i32,
    pub input: i32,
    pub extra: i32,
    pub color: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attack_range: i32,
    pub effect: i32,
    pub attack_target_id: i32,
    pub gold: i32,
}

impl GamePacket {
    pub fn encode(&self) -> [u8; GAME_PACKET_BYTES] {
        let mut buf = [0u8; GAME_PACKET_BYTES];
        let fields = [
            self.tag as i32,
            self.id,
            self.x,
            self.y,
            self.input,
            self.extra,
            self.color,
            self.hp,
            self.max_hp,
            self.attack_range,
            self.effect,
            self.attack_target_id,
            self.gold,
        ];
        for (i, f) in fields.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&f.to_le_bytes());
        }
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<GamePacket, ProtocolError> {
        if bytes.len() < GAME_PACKET_BYTES {
            return Err(ProtocolError::Truncated {
                tag: read_u32(bytes).unwrap_or(0),
                needed: GAME_PACKET_BYTES,
                available: bytes.len(),
            });
        }
        let mut f = [0i32; GAME_PACKET_FIELDS];
        for (i, slot) in f.iter_mut().enumerate() {
            *slot = i32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap());
        }
        Ok(GamePacket {
            tag: f[0] as u32,
            id: f[1],
            x: f[2],
            y: f[3],
            input: f[4],
            extra: f[5],
            color: f[6],
            hp: f[7],
            max_hp: f[8],
            attack_range: f[9],
            effect: f[10],
            attack_target_id: f[11],
            gold: f[12],
        })
    }
}

fn read_u32(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < 4 {
        return None;
    }
    Some(u32::from_le_bytes(bytes[0..4].try_into().unwrap()))
}

/// Per-connection byte ring that tolerates partial reads and never consumes
/// bytes it cannot parse in full (spec §4.1).
#[derive(Debug, Default)]
pub struct PacketReader {
    buf: Vec<u8>,
}

impl PacketReader {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() > super::constants::CONNECTION_RING_CAPACITY {
            log::warn!("connection ring overflow, resetting");
            self.buf.clear();
        }
    }

    /// Pop the next fully-buffered packet, if any. Returns `Ok(None)` when
    /// more bytes are needed. A malformed/unknown tag is a hard
    /// `ProtocolError` — the caller must close the connection.
    pub fn try_next(&mut self) -> Result<Option<GamePacketOrControl>, ProtocolError> {
        if self.buf.len() < 4 {
            return Ok(None);
        }
        let tag_val = read_u32(&self.buf).unwrap();
        let tag = Tag::from_u32(tag_val).ok_or(ProtocolError::UnknownTag(tag_val))?;
        let needed = tag.wire_len();
        if self.buf.len() < needed {
            return Ok(None);
        }
        let frame: Vec<u8> = self.buf.drain(..needed).collect();
        let parsed = match tag {
            Tag::LobbyList | Tag::LobbyMatch | Tag::LobbyCreate | Tag::LobbyLeave | Tag::LobbyStart => {
                GamePacketOrControl::Bare(tag)
            }
            Tag::RoomReady | Tag::RoomChangeSlot | Tag::RoomKick | Tag::RoomStart => {
                GamePacketOrControl::RoomControl(RoomControlPacket::decode(tag, &frame))
            }
            Tag::LoginRequest | Tag::RegisterRequest => {
                GamePacketOrControl::Credentials(CredentialsPacket::decode(tag, &frame))
            }
            Tag::LoginResponse => GamePacketOrControl::LoginResponse(LoginResponsePacket::decode(&frame)),
            Tag::RoomState => GamePacketOrControl::RoomState(RoomStatePacket::decode(&frame)),
            _ => GamePacketOrControl::Game(GamePacket::decode(&frame)?),
        };
        Ok(Some(parsed))
    }
}

fn encode_fixed_str(s: &str, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    let bytes = s.as_bytes();
    let n = bytes.len().min(len - 1);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf
}

fn decode_fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Login and register share this shape: a bare tag followed by two
/// fixed-width, nul-terminated strings.
#[derive(Debug, Clone)]
pub struct CredentialsPacket {
    pub tag: Tag,
    pub username: String,
    pub password: String,
}

impl CredentialsPacket {
    pub fn encode(&self) -> [u8; LOGIN_REQUEST_BYTES] {
        let mut buf = [0u8; LOGIN_REQUEST_BYTES];
        buf[0..4].copy_from_slice(&(self.tag as u32).to_le_bytes());
        buf[4..4 + LOGIN_FIELD_LEN].copy_from_slice(&encode_fixed_str(&self.username, LOGIN_FIELD_LEN));
        buf[4 + LOGIN_FIELD_LEN..].copy_from_slice(&encode_fixed_str(&self.password, LOGIN_FIELD_LEN));
        buf
    }

    fn decode(tag: Tag, bytes: &[u8]) -> CredentialsPacket {
        CredentialsPacket {
            tag,
            username: decode_fixed_str(&bytes[4..4 + LOGIN_FIELD_LEN]),
            password: decode_fixed_str(&bytes[4 + LOGIN_FIELD_LEN..4 + LOGIN_FIELD_LEN * 2]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LoginStatus {
    Success = 0,
    WrongPassword = 1,
    UnknownUser = 2,
    AlreadyRegistered = 3,
}

#[derive(Debug, Clone)]
pub struct LoginResponsePacket {
    pub status: LoginStatus,
    pub message: String,
}

impl LoginResponsePacket {
    pub fn encode(&self) -> [u8; LOGIN_RESPONSE_BYTES] {
        let mut buf = [0u8; LOGIN_RESPONSE_BYTES];
        buf[0..4].copy_from_slice(&(Tag::LoginResponse as u32).to_le_bytes());
        buf[4..8].copy_from_slice(&(self.status as i32).to_le_bytes());
        buf[12..].copy_from_slice(&encode_fixed_str(&self.message, 64));
        buf
    }

    fn decode(bytes: &[u8]) -> LoginResponsePacket {
        let status = match i32::from_le_bytes(bytes[4..8].try_into().unwrap()) {
            1 => LoginStatus::WrongPassword,
            2 => LoginStatus::UnknownUser,
            3 => LoginStatus::AlreadyRegistered,
            _ => LoginStatus::Success,
        };
        LoginResponsePacket {
            status,
            message: decode_fixed_str(&bytes[12..]),
        }
    }
}

/// One lobby-room seat as carried in a `RoomState` broadcast.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomStateSlot {
    pub occupied: bool,
    pub ready: bool,
    pub team: i32,
    pub hero_id: i32,
}

#[derive(Debug, Clone)]
pub struct RoomStatePacket {
    pub room_id: i32,
    pub status: i32,
    pub slots: Vec<RoomStateSlot>,
}

impl RoomStatePacket {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; ROOM_STATE_BYTES];
        buf[0..4].copy_from_slice(&(Tag::RoomState as u32).to_le_bytes());
        buf[4..8].copy_from_slice(&self.room_id.to_le_bytes());
        buf[8..12].copy_from_slice(&self.status.to_le_bytes());
        for (i, slot) in self.slots.iter().enumerate() {
            let base = 12 + i * ROOM_STATE_SLOT_BYTES;
            buf[base..base + 4].copy_from_slice(&(slot.occupied as i32).to_le_bytes());
            buf[base + 4..base + 8].copy_from_slice(&(slot.ready as i32).to_le_bytes());
            buf[base + 8..base + 12].copy_from_slice(&slot.team.to_le_bytes());
            buf[base + 12..base + 16].copy_from_slice(&slot.hero_id.to_le_bytes());
        }
        buf
    }

    fn decode(bytes: &[u8]) -> RoomStatePacket {
        let room_id = i32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let status = i32::from_le_bytes(bytes[8..12].try_into().unwrap());
        let mut slots = Vec::with_capacity(super::constants::ROOM_SLOTS);
        for i in 0..super::constants::ROOM_SLOTS {
            let base = 12 + i * ROOM_STATE_SLOT_BYTES;
            slots.push(RoomStateSlot {
                occupied: i32::from_le_bytes(bytes[base..base + 4].try_into().unwrap()) != 0,
                ready: i32::from_le_bytes(bytes[base + 4..base + 8].try_into().unwrap()) != 0,
                team: i32::from_le_bytes(bytes[base + 8..base + 12].try_into().unwrap()),
                hero_id: i32::from_le_bytes(bytes[base + 12..base + 16].try_into().unwrap()),
            });
        }
        RoomStatePacket { room_id, status, slots }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RoomControlPacket {
    pub tag: Tag,
    pub room_id: i32,
    pub slot: i32,
    pub extra: i32,
}

impl RoomControlPacket {
    fn decode(tag: Tag, bytes: &[u8]) -> RoomControlPacket {
        let room_id = i32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let slot = i32::from_le_bytes(bytes[8..12].try_into().unwrap());
        let extra = i32::from_le_bytes(bytes[12..16].try_into().unwrap());
        RoomControlPacket {
            tag,
            room_id,
            slot,
            extra,
        }
    }
}

#[derive(Debug)]
pub enum GamePacketOrControl {
    Bare(Tag),
    RoomControl(RoomControlPacket),
    Credentials(CredentialsPacket),
    LoginResponse(LoginResponsePacket),
    RoomState(RoomStatePacket),
    Game(GamePacket),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_packet_roundtrips() {
        let p = GamePacket {
            tag: Tag::Move as u32,
            id: 5,
            x: 1,
            y: -1,
            input: 0,
            extra: 0,
            color: 1,
            hp: 100,
            max_hp: 100,
            attack_range: 2,
            effect: 0,
            attack_target_id: 0,
            gold: 0,
        };
        let bytes = p.encode();
        let back = GamePacket::decode(&bytes).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn reader_waits_for_full_frame() {
        let mut r = PacketReader::new();
        let bytes = GamePacket {
            tag: Tag::Move as u32,
            ..Default::default()
        }
        .encode();
        r.feed(&bytes[..10]);
        assert!(r.try_next().unwrap().is_none());
        r.feed(&bytes[10..]);
        assert!(matches!(r.try_next().unwrap(), Some(GamePacketOrControl::Game(_))));
    }

    #[test]
    fn unknown_tag_is_protocol_error() {
        let mut r = PacketReader::new();
        r.feed(&999u32.to_le_bytes());
        assert_eq!(r.try_next().unwrap_err(), ProtocolError::UnknownTag(999));
    }
}
