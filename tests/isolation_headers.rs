//! End-to-end checks that every response carries the isolation headers.

use reqwest::StatusCode;

mod common;

use common::{assert_isolated_wire, client, get, header_lines, raw_request, start_server};

fn assert_isolated(response: &reqwest::Response) {
    let headers = response.headers();
    let coep: Vec<_> = headers.get_all("cross-origin-embedder-policy").iter().collect();
    let coop: Vec<_> = headers.get_all("cross-origin-opener-policy").iter().collect();
    assert_eq!(coep, ["require-corp"], "status {}", response.status());
    assert_eq!(coop, ["same-origin"], "status {}", response.status());
}

#[tokio::test]
async fn test_existing_file_is_served_with_headers() {
    let server = start_server().await;

    let res = client().get(server.url("/index.html")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_isolated(&res);
    assert_eq!(res.headers()["content-type"], "text/html");
    assert_eq!(res.content_length(), Some(common::INDEX_HTML.len() as u64));
    assert_eq!(res.text().await.unwrap(), common::INDEX_HTML);

    server.stop().await;
}

#[tokio::test]
async fn test_missing_file_is_404_with_headers() {
    let server = start_server().await;

    let res = client().get(server.url("/missing.html")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_isolated(&res);

    server.stop().await;
}

#[tokio::test]
async fn test_every_method_gets_headers() {
    let server = start_server().await;
    let client = client();

    for method in [
        reqwest::Method::GET,
        reqwest::Method::HEAD,
        reqwest::Method::POST,
        reqwest::Method::PUT,
        reqwest::Method::DELETE,
        reqwest::Method::OPTIONS,
    ] {
        let res = client
            .request(method.clone(), server.url("/worker.js"))
            .send()
            .await
            .unwrap();
        assert_isolated(&res);
        if method == reqwest::Method::GET || method == reqwest::Method::HEAD {
            assert_eq!(res.status(), StatusCode::OK, "{method}");
        } else {
            assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        }
    }

    server.stop().await;
}

#[tokio::test]
async fn test_headers_do_not_accumulate_across_requests() {
    let server = start_server().await;

    // Same connection, three exchanges.
    let request = "GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n\
                   GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n\
                   GET /index.html HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    let response = raw_request(server.addr, request).await;

    let exchanges: Vec<&str> = response
        .split("HTTP/1.1 ")
        .filter(|part| !part.is_empty())
        .collect();
    assert_eq!(exchanges.len(), 3, "{response}");
    for exchange in exchanges {
        assert_isolated_wire(&format!("HTTP/1.1 {exchange}"));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_headers_are_appended_after_service_headers() {
    let server = start_server().await;

    let response = raw_request(server.addr, &get("/index.html")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert_isolated_wire(&response);

    let lines = header_lines(&response);
    let content_type = lines
        .iter()
        .position(|line| *line == "Content-Type: text/html")
        .expect("content type line");
    let coep = lines
        .iter()
        .position(|line| *line == common::COEP_LINE)
        .unwrap();
    assert!(content_type < coep, "{response}");

    let body = response.split_once("\r\n\r\n").unwrap().1;
    assert_eq!(body, common::INDEX_HTML);

    server.stop().await;
}

#[tokio::test]
async fn test_isolation_headers_close_the_header_block() {
    let server = start_server().await;

    let requests = [
        ("200 OK", get("/index.html")),
        ("404 Not Found", get("/missing.html")),
        (
            "405 Method Not Allowed",
            "POST /index.html HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        ),
        (
            "200 OK",
            "HEAD /worker.js HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_string(),
        ),
    ];
    for (status, request) in requests {
        let response = raw_request(server.addr, &request).await;
        assert!(response.starts_with(&format!("HTTP/1.1 {status}\r\n")), "{response}");
        assert_isolated_wire(&response);

        let lines = header_lines(&response);
        let coep = lines.iter().position(|line| *line == common::COEP_LINE).unwrap();
        for framing in ["Date: ", "Content-Length: "] {
            let at = lines
                .iter()
                .position(|line| line.starts_with(framing))
                .unwrap_or_else(|| panic!("no {framing:?} line in:\n{response}"));
            assert!(at < coep, "{framing:?} after COEP in:\n{response}");
        }
    }

    server.stop().await;
}

#[tokio::test]
async fn test_unparseable_request_is_rejected_before_the_hook() {
    let server = start_server().await;

    // hyper answers this itself; the router never sees it.
    let response = raw_request(server.addr, "GARBAGE\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
    assert!(!response.contains(common::COEP_LINE), "{response}");

    server.stop().await;
}

#[tokio::test]
async fn test_http_1_0_request() {
    let server = start_server().await;

    let response = raw_request(server.addr, "GET /worker.js HTTP/1.0\r\n\r\n").await;
    assert!(response.contains(" 200 OK\r\n"), "{response}");
    assert_isolated_wire(&response);

    server.stop().await;
}

#[tokio::test]
async fn test_path_traversal_is_rejected_with_headers() {
    let server = start_server().await;

    for path in ["/../secret.txt", "/%2e%2e/secret.txt"] {
        let response = raw_request(server.addr, &get(path)).await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{path}: {response}");
        assert!(!response.contains("outside the root"), "{path}: {response}");
        assert_isolated_wire(&response);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_connections_each_get_headers() {
    let server = start_server().await;
    let addr = server.addr;

    let req_a = get("/index.html");
    let req_b = get("/missing.html");
    let (a, b) = tokio::join!(raw_request(addr, &req_a), raw_request(addr, &req_b),);

    assert!(a.starts_with("HTTP/1.1 200 OK\r\n"), "{a}");
    assert!(b.starts_with("HTTP/1.1 404 Not Found\r\n"), "{b}");
    assert_isolated_wire(&a);
    assert_isolated_wire(&b);

    let client = client();
    let requests = (0..16).map(|i| {
        let client = client.clone();
        let url = if i % 2 == 0 {
            server.url("/index.html")
        } else {
            server.url("/nope")
        };
        tokio::spawn(async move { client.get(url).send().await.unwrap() })
    });
    for handle in requests.collect::<Vec<_>>() {
        assert_isolated(&handle.await.unwrap());
    }

    server.stop().await;
}
