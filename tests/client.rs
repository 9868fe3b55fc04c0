use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use klipper_client::{
    ChangeSender, ClientConfig, ClientError, Classifier, EntropyKind, KlipperClient,
    MemoryTransport, Method, Notification, ObserverFn, Routing, Transport, TransportError,
};
use serde_json::Value;

/// Transport that holds on to its sink and keeps the default `disconnect`.
#[derive(Default)]
struct StickySink {
    sink: Mutex<Option<ChangeSender>>,
}

impl StickySink {
    fn push(&self, content: &str) -> bool {
        match self.sink.lock().unwrap().as_ref() {
            Some(sink) => sink.send(content.to_string()).is_ok(),
            None => false,
        }
    }
}

impl Transport for StickySink {
    fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn invoke(&self, _method: Method, _args: &[Value]) -> Result<Value, TransportError> {
        Ok(Value::Null)
    }

    fn watch(&self, sink: ChangeSender) -> Result<(), TransportError> {
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }
}

fn client_with(transport: &Arc<MemoryTransport>) -> Arc<KlipperClient> {
    let config = ClientConfig::default().with_app_id("test-node");
    Arc::new(KlipperClient::new(config, transport.clone()))
}

fn watch(client: &KlipperClient) -> mpsc::Receiver<Notification> {
    let (tx, rx) = mpsc::channel();
    client.relay().subscribe(ObserverFn::arc("probe", move |n| {
        tx.send(n.clone())?;
        Ok(())
    }));
    rx
}

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn get_and_set_round_trip() {
    let transport = Arc::new(MemoryTransport::with_content("initial"));
    let client = client_with(&transport);

    assert_eq!(client.get_clipboard_contents().await.unwrap(), "initial");
    assert!(client.is_connected());

    client.set_clipboard_contents("Hello World").await.unwrap();
    assert_eq!(transport.current(), "Hello World");
    assert_eq!(client.get_clipboard_contents().await.unwrap(), "Hello World");

    client.shutdown().await;
}

#[tokio::test]
async fn error_looking_text_is_returned_verbatim() {
    let transport = Arc::new(MemoryTransport::with_content("Error: disk full"));
    let client = client_with(&transport);

    assert_eq!(
        client.get_clipboard_contents().await.unwrap(),
        "Error: disk full"
    );
    let raw = client
        .call(Method::GetClipboardContents, Vec::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw["diagnostic"], "textual entropy detected");

    client.shutdown().await;
}

#[tokio::test]
async fn clipboard_changes_reach_observers() {
    let transport = Arc::new(MemoryTransport::new());
    let client = client_with(&transport);
    let rx = watch(&client);
    client.connect().await.unwrap();

    transport.copy_external("copied elsewhere");
    let n = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(n.payload, "copied elsewhere");
    assert_eq!(n.routing, Routing::channel("clipboard_change"));
    assert_eq!(n.weight, 0.8);
    assert_eq!(n.origin, "test-node");

    client.set_clipboard_contents("from client").await.unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap().payload, "from client");

    client.shutdown().await;
}

#[tokio::test]
async fn faulty_observer_does_not_stop_the_pump() {
    let transport = Arc::new(MemoryTransport::new());
    let client = client_with(&transport);
    client
        .relay()
        .subscribe(ObserverFn::arc("faulty", |_| panic!("observer down")));
    let rx = watch(&client);
    client.connect().await.unwrap();

    transport.copy_external("one");
    transport.copy_external("two");
    assert_eq!(rx.recv_timeout(WAIT).unwrap().payload, "one");
    assert_eq!(rx.recv_timeout(WAIT).unwrap().payload, "two");

    client.shutdown().await;
}

#[tokio::test]
async fn failures_are_returned_unchanged() {
    let transport = Arc::new(MemoryTransport::new());
    let fault = TransportError::Remote {
        name: "org.freedesktop.DBus.Error.NoReply".into(),
        message: "no reply".into(),
    };
    transport.fail_on(Method::GetClipboardContents, fault.clone());
    let client = client_with(&transport);

    match client.get_clipboard_contents().await {
        Err(ClientError::Transport { method, source }) => {
            assert_eq!(method, "getClipboardContents");
            assert_eq!(source, fault);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // the history view swallows read failures
    assert!(client.get_history().await.unwrap().is_empty());
    assert_eq!(client.clipboard().get_text().await, "");

    client.shutdown().await;
}

#[tokio::test]
async fn slow_calls_time_out() {
    let transport = Arc::new(MemoryTransport::with_content("late"));
    let config = ClientConfig::default().with_call_timeout(Duration::from_millis(20));
    let client = KlipperClient::new(config, transport.clone());
    client.connect().await.unwrap();

    transport.set_latency(Duration::from_millis(300));
    let err = client.get_clipboard_contents().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Timeout {
            method: "getClipboardContents",
            ..
        }
    ));
    assert!(err.is_retryable());

    let outcome = Classifier::new().classify(&err);
    assert_eq!(outcome.kind(), Some(EntropyKind::Exception));
    assert_eq!(outcome.factual_content.unwrap()["error_type"], "ClientError");

    transport.set_latency(Duration::ZERO);
    client.shutdown().await;
}

#[tokio::test]
async fn unreachable_service_fails_to_connect() {
    let transport = Arc::new(MemoryTransport::unavailable("no session bus"));
    let client = client_with(&transport);

    let err = client.connect().await.unwrap_err();
    assert_eq!(err.as_label(), "client_connect_failed");
    assert!(!client.is_connected());
    assert!(client.get_history().await.is_err());
}

#[tokio::test]
async fn connect_is_idempotent_and_shutdown_stops_signals() {
    let transport = Arc::new(MemoryTransport::new());
    let client = client_with(&transport);
    let rx = watch(&client);

    client.connect().await.unwrap();
    client.connect().await.unwrap();
    assert_eq!(transport.watcher_count(), 1);

    client.shutdown().await;
    assert!(!client.is_connected());
    assert_eq!(transport.watcher_count(), 0);

    transport.copy_external("after shutdown");
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[tokio::test]
async fn history_follows_current_content() {
    let transport = Arc::new(MemoryTransport::new());
    let client = client_with(&transport);

    assert!(client.get_history().await.unwrap().is_empty());

    client.clipboard().set_text("alpha").await.unwrap();
    let history = client.history();
    assert_eq!(history.get_recent_items(10).await.unwrap(), ["alpha"]);
    assert_eq!(history.search("ALP").await.unwrap(), ["alpha"]);
    assert!(history.page(1, 10).await.unwrap().is_empty());

    history.clear_all().await.unwrap();
    assert!(transport.history().is_empty());
    assert_eq!(client.clipboard().get_text().await, "");

    client.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_pump_when_transport_keeps_its_sink() {
    let transport = Arc::new(StickySink::default());
    let client = KlipperClient::new(ClientConfig::default(), transport.clone());
    let rx = watch(&client);
    client.connect().await.unwrap();

    assert!(transport.push("before"));
    assert_eq!(rx.recv_timeout(WAIT).unwrap().payload, "before");

    tokio::time::timeout(WAIT, client.shutdown())
        .await
        .expect("shutdown must not wait on the transport's sink");
    assert!(!client.is_connected());

    // the pump is gone: the sink is dead and nothing is relayed
    assert!(!transport.push("after"));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[tokio::test]
async fn dropping_a_connected_client_releases_the_pump() {
    let transport = Arc::new(MemoryTransport::new());
    let client = client_with(&transport);
    let rx = watch(&client);
    client.connect().await.unwrap();
    assert_eq!(transport.watcher_count(), 1);

    drop(client);
    assert_eq!(transport.watcher_count(), 0);

    transport.copy_external("after drop");
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[tokio::test]
async fn dropping_a_client_over_a_sticky_transport_stops_relaying() {
    let transport = Arc::new(StickySink::default());
    let client = KlipperClient::new(ClientConfig::default(), transport.clone());
    let rx = watch(&client);
    client.connect().await.unwrap();

    drop(client);
    transport.push("after drop");
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}
