use parley_core::prelude::StopHandle;
use tokio::signal;

pub(crate) fn start_stop_listener(
    runtime: &tokio::runtime::Runtime,
) -> anyhow::Result<StopHandle> {
    let handle = StopHandle::default();

    let listener_handle = handle.clone();
    runtime.spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {e}");
            return;
        }
        listener_handle.stop();
        println!("Received stop signal, shutting down...");
    });

    Ok(handle)
}
