use crate::events::AppEvent;
use crate::sys::server;
use async_channel::Sender;
use std::thread::{self, JoinHandle};
use tokio::runtime::Builder;

/// Runs the control socket and the config watcher on their own thread. They
/// reach the UI only through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("glasspath-services".into())
        .spawn(move || {
            let rt = match Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create background runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let control = tokio::spawn(server::run_server(tx.clone()));
                let watcher = tokio::spawn(crate::config::run_async_watcher(tx));
                let (control, watcher) = tokio::join!(control, watcher);
                if let Err(e) = control.and(watcher) {
                    log::error!("Background service failed: {}", e);
                }
                log::debug!("Background services stopped");
            });
        })
}
