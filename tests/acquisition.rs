use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use squad_matrix::binding::{BindingConfig, MatrixBinding, PresentationState, Selection};
use squad_matrix::error::AcquireError;
use squad_matrix::matrix_fetch::{HttpMatrixSource, MatrixSource, Scope};

/// Serves exactly one canned response and reports the request head it saw.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut head = Vec::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            head.push(line);
        }
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
        let _ = tx.send(head);
    });

    (format!("http://{addr}"), rx)
}

fn request_head(rx: &mpsc::Receiver<Vec<String>>) -> Vec<String> {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("server saw a request")
}

#[test]
fn team_scope_sends_team_id_and_session_cookie() {
    let body = r#"{"players":[{"id":1,"first_name":"Alice"},{"id":2,"first_name":"Bob"}],"matrix":[[2,3],[3,2]],"max_value":3}"#;
    let (base, rx) = serve_once("HTTP/1.1 200 OK", body);
    let source = HttpMatrixSource::new(&base, Some("abc123".to_string()), 5);

    let matrix = source.fetch(&Scope::Team(5)).expect("matrix");
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.max_value(), 3.0);

    let head = request_head(&rx);
    assert_eq!(head[0], "GET /team/api/player-matrix/?team_id=5 HTTP/1.1");
    assert!(
        head.iter()
            .any(|line| line.eq_ignore_ascii_case("cookie: sessionid=abc123")),
        "cookie header missing in {head:?}"
    );
}

#[test]
fn all_players_scope_sends_no_query() {
    let (base, rx) = serve_once("HTTP/1.1 200 OK", r#"{"players":[],"matrix":[]}"#);
    let source = HttpMatrixSource::new(&base, None, 5);

    let matrix = source.fetch(&Scope::AllPlayers).expect("matrix");
    assert!(matrix.is_empty());
    assert_eq!(request_head(&rx)[0], "GET /team/api/player-matrix/ HTTP/1.1");
}

#[test]
fn server_error_is_a_fetch_error() {
    let (base, _rx) = serve_once("HTTP/1.1 500 Internal Server Error", "boom");
    let source = HttpMatrixSource::new(&base, None, 5);

    match source.fetch(&Scope::Team(1)) {
        Err(AcquireError::Fetch { status, message }) => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "boom");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[test]
fn html_body_is_malformed() {
    let (base, _rx) = serve_once("HTTP/1.1 200 OK", "<html>login</html>");
    let source = HttpMatrixSource::new(&base, None, 5);
    let err = source.fetch(&Scope::Team(1)).unwrap_err();
    assert!(err.is_malformed(), "unexpected error {err:?}");
}

#[test]
fn refused_connection_is_a_fetch_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let source = HttpMatrixSource::new(&format!("http://127.0.0.1:{port}"), None, 5);
    match source.fetch(&Scope::AllPlayers) {
        Err(AcquireError::Fetch { status: None, .. }) => {}
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn http_500_drives_binding_to_error() {
    let (base, _rx) = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
    let source = HttpMatrixSource::new(&base, None, 5);
    let mut binding = MatrixBinding::new(BindingConfig::default());

    let ticket = binding
        .select(Selection::scope(Scope::Team(3), "U19"))
        .expect("ticket");
    let outcome = source.fetch(&ticket.scope);
    binding.resolve(&ticket, outcome);

    assert!(matches!(binding.state(), PresentationState::Error { .. }));
    assert!(binding.table().is_none());
    assert!(binding.visibility().message);
}
