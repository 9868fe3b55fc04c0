//! # Example: watch_clipboard
//!
//! Connects a client to an in-process clipboard service, attaches observers to
//! the change relay, and walks through reads, writes and a failing call.
//!
//! Shows how to:
//! - Attach [`LogObserver`] and a closure observer to the client's relay.
//! - Read and write through [`ClipboardController`] / [`HistoryManager`].
//! - Inspect how a failure is classified before it is returned.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example watch_clipboard
//! ```

use std::sync::Arc;
use std::time::Duration;

use klipper_client::{
    ClientConfig, KlipperClient, LogObserver, MemoryTransport, Method, ObserverFn, TransportError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let transport = Arc::new(MemoryTransport::with_content("first copy"));
    let client = Arc::new(KlipperClient::new(
        ClientConfig::default().with_app_id("demo"),
        transport.clone(),
    ));

    client.relay().subscribe(Arc::new(LogObserver::new()));
    client.relay().subscribe(ObserverFn::arc("console", |n| {
        println!("[change] {} (weight {})", n.payload, n.weight);
        Ok(())
    }));

    client.connect().await?;
    println!("current: {:?}", client.clipboard().get_text().await);

    client.clipboard().set_text("second copy").await?;
    transport.copy_external("copied in another app");
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("recent: {:?}", client.history().recent().await?);

    transport.fail_on(
        Method::GetClipboardContents,
        TransportError::Remote {
            name: "org.freedesktop.DBus.Error.NoReply".into(),
            message: "service went away".into(),
        },
    );
    if let Err(err) = client.get_clipboard_contents().await {
        let outcome = client.classifier().classify(&err);
        println!("failure [{}]: {:?}", err.as_label(), outcome.diagnostic);
    }

    client.shutdown().await;
    Ok(())
}
