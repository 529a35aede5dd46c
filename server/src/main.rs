//! Binary entry point. Thin by design: argument parsing, logger init, and a
//! call into `server::run` — everything testable lives in the library
//! crate (spec §6, mirroring the teacher's own `main.rs`/`lib.rs` split).

use server::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level)).init();

    if let Err(e) = server::server::run(config) {
        log::error!("server exited with error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
