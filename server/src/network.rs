//! Per-connection dispatch: reads raw bytes off a socket, turns them into
//! `Command`s routed to the owning room, and lets a room's tick output find
//! its way back to the right sockets (spec §4.1, §5).
//!
//! Grounded on the teacher's `network_manager.rs`, which also keeps one
//! accept/read loop per connection and hands parsed input to the shared
//! simulation rather than touching game state itself.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use arena_core::protocol::{
    CredentialsPacket, GamePacketOrControl, LoginResponsePacket, LoginStatus, PacketReader, Tag,
};

use crate::lobby::Lobby;
use crate::room::Command;
use crate::users::{LoginResult, RegisterResult, UserRegistry};

/// Live output sockets, keyed by username. Kept separate from `Lobby`
/// because it is a pure transport concern: which room a player sits in is
/// simulation state, but which socket currently speaks for them is not.
#[derive(Default)]
pub struct Connections {
    streams: Mutex<HashMap<String, TcpStream>>,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, username: &str, stream: TcpStream) {
        self.streams.lock().unwrap().insert(username.to_string(), stream);
    }

    pub fn unregister(&self, username: &str) {
        self.streams.lock().unwrap().remove(username);
    }

    pub fn send(&self, username: &str, bytes: &[u8]) {
        let mut streams = self.streams.lock().unwrap();
        if let Some(stream) = streams.get_mut(username) {
            if stream.write_all(bytes).is_err() {
                streams.remove(username);
            }
        }
    }
}

struct Session {
    conn_id: i32,
    username: Option<String>,
}

pub fn handle_connection(
    mut stream: TcpStream,
    conn_id: i32,
    start: Instant,
    lobby: Arc<Mutex<Lobby>>,
    users: Arc<UserRegistry>,
    connections: Arc<Connections>,
) {
    let peer = stream.try_clone().expect("clone tcp stream for this connection");
    let mut reader = PacketReader::new();
    let mut session = Session { conn_id, username: None };
    let mut buf = [0u8; 4096];

    loop {
        let n = match peer.try_clone().unwrap().read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(_) => break,
        };
        reader.feed(&buf[..n]);

        loop {
            match reader.try_next() {
                Ok(None) => break,
                Ok(Some(packet)) => {
                    let now = start.elapsed().as_secs_f64();
                    dispatch(packet, &mut session, now, &mut stream, &lobby, &users, &connections);
                }
                Err(e) => {
                    log::debug!("closing connection {conn_id}: {e}");
                    close(&session, &lobby, &users, &connections);
                    return;
                }
            }
        }
    }

    close(&session, &lobby, &users, &connections);
}

fn close(session: &Session, lobby: &Arc<Mutex<Lobby>>, users: &Arc<UserRegistry>, connections: &Arc<Connections>) {
    users.logout(session.conn_id);
    if let Some(name) = &session.username {
        lobby.lock().unwrap().leave_room(name);
        connections.unregister(name);
    }
}

fn dispatch(
    packet: GamePacketOrControl,
    session: &mut Session,
    now: f64,
    stream: &mut TcpStream,
    lobby: &Arc<Mutex<Lobby>>,
    users: &Arc<UserRegistry>,
    connections: &Arc<Connections>,
) {
    match packet {
        GamePacketOrControl::Credentials(creds) => handle_credentials(creds, session, stream, lobby, users, connections),
        GamePacketOrControl::Bare(Tag::LobbyList) => {
            let rooms = lobby.lock().unwrap().list_rooms();
            log::debug!("lobby list requested: {} rooms", rooms.len());
        }
        GamePacketOrControl::Bare(Tag::LobbyMatch) => {
            if let Some(name) = &session.username {
                lobby.lock().unwrap().enqueue_for_match(name, now);
            }
        }
        GamePacketOrControl::Bare(Tag::LobbyCreate) => {
            if let Some(name) = &session.username {
                let id = lobby.lock().unwrap().create_room(name);
                log::info!("{name} created room {id}");
            }
        }
        GamePacketOrControl::Bare(Tag::LobbyLeave) => {
            if let Some(name) = &session.username {
                lobby.lock().unwrap().leave_room(name);
            }
        }
        GamePacketOrControl::Bare(_) => {}
        GamePacketOrControl::RoomControl(ctrl) => {
            route_to_room(&session.username, lobby, |room| match ctrl.tag {
                Tag::RoomReady => room.push_command(Command::SetReady {
                    slot: ctrl.slot as usize,
                    ready: ctrl.extra != 0,
                }),
                Tag::RoomStart => room.push_command(Command::StartGame { slot: ctrl.slot as usize }),
                _ => {}
            });
        }
        GamePacketOrControl::LoginResponse(_) | GamePacketOrControl::RoomState(_) => {
            // Server-to-client packets; a well-behaved client never sends these.
        }
        GamePacketOrControl::Game(pkt) => match Tag::from_u32(pkt.tag) {
            Some(Tag::HeroSelect) => route_to_room(&session.username, lobby, |room| {
                room.push_command(Command::HeroSelect {
                    slot: pkt.id as usize,
                    hero_id: pkt.extra,
                });
            }),
            Some(Tag::Move) => route_to_room(&session.username, lobby, |room| {
                room.push_command(Command::Move {
                    player_id: pkt.id,
                    dx: pkt.x,
                    dy: pkt.y,
                });
            }),
            Some(Tag::Attack) => route_to_room(&session.username, lobby, |room| {
                room.push_command(Command::Attack { player_id: pkt.id });
            }),
            Some(Tag::Skill) => route_to_room(&session.username, lobby, |room| {
                room.push_command(Command::Skill { player_id: pkt.id });
            }),
            Some(Tag::Purchase) => route_to_room(&session.username, lobby, |room| {
                room.push_command(Command::Purchase {
                    player_id: pkt.id,
                    item_idx: pkt.extra,
                });
            }),
            _ => {}
        },
    }
}

fn handle_credentials(
    creds: CredentialsPacket,
    session: &mut Session,
    stream: &mut TcpStream,
    lobby: &Arc<Mutex<Lobby>>,
    users: &Arc<UserRegistry>,
    connections: &Arc<Connections>,
) {
    let _ = lobby; // registration/login never touches room state directly
    match creds.tag {
        Tag::RegisterRequest => {
            let status = match users.register(&creds.username, &creds.password) {
                RegisterResult::Success => LoginStatus::Success,
                RegisterResult::AlreadyExists => LoginStatus::AlreadyRegistered,
            };
            reply_login(stream, status);
        }
        Tag::LoginRequest => {
            let status = match users.login(session.conn_id, &creds.username, &creds.password) {
                LoginResult::Success => {
                    session.username = Some(creds.username.clone());
                    if let Ok(clone) = stream.try_clone() {
                        connections.register(&creds.username, clone);
                    }
                    LoginStatus::Success
                }
                LoginResult::WrongPassword => LoginStatus::WrongPassword,
                LoginResult::UnknownUser => LoginStatus::UnknownUser,
            };
            reply_login(stream, status);
        }
        _ => {}
    }
}

fn reply_login(stream: &mut TcpStream, status: LoginStatus) {
    let message = match status {
        LoginStatus::Success => "ok",
        LoginStatus::WrongPassword => "wrong password",
        LoginStatus::UnknownUser => "unknown user",
        LoginStatus::AlreadyRegistered => "username taken",
    };
    let response = LoginResponsePacket {
        status,
        message: message.to_string(),
    };
    let _ = stream.write_all(&response.encode());
}

fn route_to_room(username: &Option<String>, lobby: &Arc<Mutex<Lobby>>, f: impl FnOnce(&mut crate::room::Room)) {
    let Some(name) = username else { return };
    let mut guard = lobby.lock().unwrap();
    let Some(room_id) = guard.room_of(name) else { return };
    if let Some(room) = guard.room_mut(room_id) {
        f(room);
    }
}
