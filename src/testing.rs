//! Fakes for the pipeline's external collaborators.

use std::{
    cell::RefCell,
    io::{Read, Write},
    net::TcpListener,
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use crate::{
    model::{ActivityEvent, CommitRecord},
    preview::{PreviewError, PreviewFetcher},
    publish::{PublishError, Publisher},
    source::{EventSource, FetchError},
};

/// Event source returning a canned page or failure, recording requests.
pub struct FakeEvents {
    result: Result<Vec<ActivityEvent>, FetchError>,
    requests: RefCell<Vec<(String, usize)>>,
}

impl FakeEvents {
    pub fn page(events: Vec<ActivityEvent>) -> Self {
        Self {
            result: Ok(events),
            requests: RefCell::default(),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            result: Err(error),
            requests: RefCell::default(),
        }
    }

    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.borrow().clone()
    }
}

impl EventSource for FakeEvents {
    fn public_events(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, FetchError> {
        self.requests
            .borrow_mut()
            .push((username.to_string(), limit));
        self.result.clone()
    }
}

/// Preview service returning a fixed image or failing.
pub struct FakePreview {
    image: Option<String>,
    requests: RefCell<Vec<String>>,
}

impl FakePreview {
    pub fn image(url: &str) -> Self {
        Self {
            image: Some(url.to_string()),
            requests: RefCell::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            image: None,
            requests: RefCell::default(),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PreviewFetcher for FakePreview {
    fn fetch_image(&self, commit_url: &str) -> Result<String, PreviewError> {
        self.requests.borrow_mut().push(commit_url.to_string());
        self.image.clone().ok_or(PreviewError::Status(503))
    }
}

/// Publisher that records what it was asked to publish.
#[derive(Default)]
pub struct RecordingPublisher {
    published: RefCell<Vec<(PathBuf, String, CommitRecord)>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(PathBuf, String, CommitRecord)> {
        self.published.borrow().clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(
        &self,
        path: &Path,
        contents: &str,
        commit: &CommitRecord,
    ) -> Result<(), PublishError> {
        self.published
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_string(), commit.clone()));
        Ok(())
    }
}

/// Serve one HTTP response on a local port.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and a handle yielding
/// the raw request head once the exchange is over.
pub fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base, handle)
}
