//! Process entry point: binds the listener, runs the fixed-tick scheduler,
//! and wires the shared registries together (spec §5, §6).
//!
//! The tick loop's drift compensation follows the teacher's `Server::tick`:
//! accumulate elapsed time since an anchor `Instant`, step the simulation
//! in whole `tick_ms` chunks, and only reset the anchor once the backlog is
//! drained, so a slow tick doesn't compound into permanent lag.

use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::lobby::Lobby;
use crate::network::{self, Connections};
use crate::users::UserRegistry;

pub fn run(config: Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.port))?;
    log::info!("listening on port {}", config.port);

    let users = UserRegistry::load(&config.persist_path);
    let lobby = Arc::new(Mutex::new(Lobby::new(0x9e3779b97f4a7c15)));
    let connections = Arc::new(Connections::new());
    let shutdown = Arc::new(AtomicBool::new(false));

    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            log::info!("shutdown signal received");
            shutdown.store(true, Ordering::SeqCst);
        })?;
    }

    let _persister = crate::users::spawn_persister(Arc::clone(&users), Duration::from_secs(5));

    let tick_handle = {
        let lobby = Arc::clone(&lobby);
        let connections = Arc::clone(&connections);
        let shutdown = Arc::clone(&shutdown);
        let tick_ms = config.tick_ms;
        thread::spawn(move || tick_loop(lobby, connections, shutdown, tick_ms))
    };

    listener.set_nonblocking(true)?;
    let start = Instant::now();
    let mut next_conn_id: i32 = 1;

    while !shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, addr)) => {
                log::info!("accepted connection from {addr}");
                let _ = stream.set_nonblocking(false);
                let conn_id = next_conn_id;
                next_conn_id += 1;
                let lobby = Arc::clone(&lobby);
                let users = Arc::clone(&users);
                let connections = Arc::clone(&connections);
                thread::spawn(move || {
                    network::handle_connection(stream, conn_id, start, lobby, users, connections)
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => {
                log::warn!("accept failed: {e}");
            }
        }
    }

    let _ = tick_handle.join();
    log::info!("shutdown complete");
    Ok(())
}

fn tick_loop(lobby: Arc<Mutex<Lobby>>, connections: Arc<Connections>, shutdown: Arc<AtomicBool>, tick_ms: u64) {
    let tick = Duration::from_millis(tick_ms);
    let anchor = Instant::now();
    let mut ticks_run: u64 = 0;

    while !shutdown.load(Ordering::SeqCst) {
        let due = anchor.elapsed().as_secs_f64() / tick.as_secs_f64();
        while (ticks_run as f64) < due {
            let now = anchor.elapsed().as_secs_f64();
            let frames = lobby.lock().unwrap().tick_all(now, tick.as_secs_f64());
            broadcast(&lobby, &connections, frames);
            ticks_run += 1;
        }
        thread::sleep(Duration::from_millis(1));
    }
}

fn broadcast(lobby: &Arc<Mutex<Lobby>>, connections: &Arc<Connections>, frames: Vec<(u32, crate::broadcast::Frame)>) {
    let guard = lobby.lock().unwrap();
    for (room_id, frame) in frames {
        let Some(room) = guard.room(room_id) else { continue };
        let bytes = frame.encode();
        for slot in &room.slots {
            if let Some(name) = &slot.owner_name {
                connections.send(name, &bytes);
            }
        }
    }
}
