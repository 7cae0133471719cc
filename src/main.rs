#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

use crossbeam::channel::{self, RecvTimeoutError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod model;
mod protocol;
mod services;

use config::CoreConfig;
use services::api::HttpApi;
use services::store::{FileStore, RemoteStore};

fn init_logging() {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    init_logging();

    let config = CoreConfig::load();
    tracing::info!(
        "wordy-core v{} (api {}, data {})",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url,
        config.data_dir.display()
    );

    let api = match HttpApi::new(&config.api_base_url, config.request_timeout()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("failed to build HTTP client: {e}");
            return;
        }
    };

    let data_dir = config.data_dir.clone();
    let open_store: protocol::StoreFactory = Box::new(move |uid: &str| {
        let store: Box<dyn RemoteStore> = Box::new(FileStore::open(&data_dir, uid)?);
        Ok(store)
    });

    let mut core = protocol::Core::new(config, Box::new(api), open_store);

    // Lines arrive on a reader thread so the main loop can wake for the
    // suggestion debounce deadline.
    let (tx, rx) = channel::unbounded::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => continue,
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();

    loop {
        let received = match core.next_deadline() {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let response = match received {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let result =
                    panic::catch_unwind(AssertUnwindSafe(|| core.handle(&line, Instant::now())));

                match result {
                    Ok(resp) => resp,
                    Err(_) => {
                        tracing::error!("handler panicked");
                        serde_json::json!({
                            "status": "error",
                            "message": "internal core error"
                        })
                        .to_string()
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => match core.poll(Instant::now()) {
                Some(event) => event,
                None => continue,
            },
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }

    tracing::info!("stdin closed, exiting");
}
