//! End-to-end client/server tests.

use std::{sync::Arc, time::Duration};

use phttp_client::{ClientConfig, ClientEndpoint};
use phttp_proto::{Headers, Request, RequestLine, Response, ResponseLine};
use phttp_server::{FnHandler, PhttpServer, ServerConfig};

fn marker_handler() -> Arc<FnHandler<impl Fn(Request) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>> + Send + Sync>>
{
    Arc::new(FnHandler(|request: Request| {
        Box::pin(async move {
            let marker = request.headers.get("Marker").unwrap_or_default().to_string();
            let delay_ms: u64 = request.headers.get("DelayMs").and_then(|v| v.parse().ok()).unwrap_or(0);
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            let mut headers = Headers::new();
            headers.set("Marker", marker);
            Response::new(ResponseLine::new(200, "OK"), headers)
        }) as std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
    }))
}

async fn start_echo_server() -> std::net::SocketAddr {
    let server = PhttpServer::bind("127.0.0.1:0".parse().unwrap(), marker_handler(), ServerConfig::default())
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

fn marker_request(marker: &str, delay_ms: u64) -> Request {
    let mut headers = Headers::new();
    headers.set("Marker", marker);
    headers.set("DelayMs", delay_ms.to_string());
    Request::new(RequestLine::new("ECHO", "/"), headers)
}

/// Properties P3/P4: two overlapping `exec` calls receive their own
/// responses regardless of which handler finishes first.
#[tokio::test]
async fn concurrent_requests_resolve_to_their_own_response() {
    let addr = start_echo_server().await;
    let client = ClientEndpoint::connect(addr, ClientConfig::default()).await.unwrap();

    let slow = client.exec(marker_request("slow", 50));
    let fast = client.exec(marker_request("fast", 0));

    let (slow, fast) = tokio::join!(slow, fast);
    assert_eq!(slow.unwrap().headers.get("Marker"), Some("slow"));
    assert_eq!(fast.unwrap().headers.get("Marker"), Some("fast"));
}

/// Firing many concurrent requests never lets two in-flight requests
/// collide on the same id — every marker comes back intact.
#[tokio::test]
async fn many_concurrent_requests_do_not_cross_wires() {
    let addr = start_echo_server().await;
    let client = Arc::new(ClientEndpoint::connect(addr, ClientConfig::default()).await.unwrap());

    let mut tasks = Vec::new();
    for i in 0..64 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let marker = format!("m{i}");
            let response = client.exec(marker_request(&marker, 0)).await.unwrap();
            assert_eq!(response.headers.get("Marker"), Some(marker.as_str()));
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}

/// Two concurrent callers share one connection, 100 requests each, and
/// every response correlates to its own request by marker.
#[tokio::test]
async fn two_callers_share_one_connection() {
    let addr = start_echo_server().await;
    let client = Arc::new(ClientEndpoint::connect(addr, ClientConfig::default()).await.unwrap());

    let caller = |client: Arc<ClientEndpoint>, prefix: &'static str| {
        tokio::spawn(async move {
            for i in 0..100 {
                let marker = format!("{prefix}-{i}");
                let response = client.exec(marker_request(&marker, 0)).await.unwrap();
                assert_eq!(response.headers.get("Marker"), Some(marker.as_str()));
            }
        })
    };

    let a = caller(client.clone(), "a");
    let b = caller(client.clone(), "b");
    a.await.unwrap();
    b.await.unwrap();
}

/// Closing the client while requests are in flight fails every one of
/// them with channel-closed, and the server's `run` loop returns once it
/// observes the shutdown frame.
#[tokio::test]
async fn close_drains_in_flight_requests() {
    // Run a single connection's ServerEndpoint directly, rather than going
    // through PhttpServer's infinite accept loop, so we can await its
    // completion.
    let endpoint = phttp_transport::PhttpListener::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let accept_addr = endpoint.local_addr().unwrap();

    let server_endpoint_task = tokio::spawn(async move {
        let transport = endpoint.accept().await.unwrap();
        let server_endpoint = phttp_server::ServerEndpoint::new(
            Arc::new(transport),
            marker_handler(),
            ServerConfig::default(),
        );
        server_endpoint.run().await
    });

    let client = ClientEndpoint::connect(accept_addr, ClientConfig::default()).await.unwrap();

    let mut in_flight = Vec::new();
    for i in 0..3 {
        let request = marker_request(&format!("pending-{i}"), 500);
        in_flight.push(client.exec(request));
    }
    // Give the requests time to be sent before closing underneath them.
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.close().await.unwrap();

    for result in futures::future::join_all(in_flight).await {
        assert!(matches!(result, Err(phttp_client::ClientError::ChannelClosed)));
    }

    tokio::time::timeout(Duration::from_secs(2), server_endpoint_task).await.unwrap().unwrap().unwrap();
}
