//! Real HTTP backends for tests.
//!
//! A [`MockBackend`] binds `127.0.0.1:0`, serves any custom routes the test
//! registers, and answers everything else with an echo handler that records
//! the request and returns it as JSON. Tests use the recordings to check what
//! actually crossed the wire.

use std::net::{SocketAddr, TcpListener};

use actix_web::dev::ServerHandle;
use actix_web::web::{self, Bytes, ServiceConfig};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Header the echo handler adds to every response it produces.
pub const ECHO_MARKER_HEADER: &str = "x-mock-backend";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercase; repeated headers keep one entry per value.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    fn capture(req: &HttpRequest, body: &Bytes) -> Self {
        let headers = req
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Self {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query: req.uri().query().map(str::to_string),
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// First value of a header, by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<RecordedRequest>>,
}

async fn echo(req: HttpRequest, body: Bytes, recorder: web::Data<Recorder>) -> HttpResponse {
    let recorded = RecordedRequest::capture(&req, &body);
    recorder.requests.lock().push(recorded.clone());

    HttpResponse::Ok()
        .insert_header((ECHO_MARKER_HEADER, "echo"))
        .json(recorded)
}

pub struct MockBackend {
    addr: SocketAddr,
    handle: ServerHandle,
    recorder: web::Data<Recorder>,
}

impl MockBackend {
    /// Backend that echoes every request.
    pub async fn echo() -> std::io::Result<Self> {
        Self::start(|_| {}).await
    }

    /// Backend with custom routes; anything unmatched falls through to the echo handler.
    pub async fn start<F>(configure: F) -> std::io::Result<Self>
    where
        F: Fn(&mut ServiceConfig) + Send + Clone + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let recorder = web::Data::new(Recorder::default());
        let app_recorder = recorder.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_recorder.clone())
                .configure(configure.clone())
                .default_service(web::to(echo))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)?
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            addr,
            handle,
            recorder,
        })
    }

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests seen by the echo handler, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorder.requests.lock().clone()
    }

    pub fn hits(&self) -> usize {
        self.recorder.requests.lock().len()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// URL of a local port with nothing listening on it.
pub fn unused_local_url() -> String {
    let addr = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("bind ephemeral port");
    format!("http://{addr}")
}
