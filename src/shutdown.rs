use tokio_util::sync::CancellationToken;

/// Returns a token cancelled once, on the first operator interrupt (SIGINT).
///
/// Must be called from within the runtime.
pub fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("SIGINT received"),
            Err(err) => {
                tracing::error!("cannot listen for SIGINT: {err}");
                return;
            }
        }
        on_interrupt.cancel();
    });

    cancel
}
