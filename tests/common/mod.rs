//! In-memory decoders and encoders shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Mutex;
use std::thread;

use framex::{FrameDecoder, ProgressCallback, ProgressInfo};

/// Observable counters shared between a test and its decoder.
#[derive(Debug, Clone, Default)]
pub struct DecoderProbe {
    reads: Rc<Cell<u64>>,
    closes: Rc<Cell<u32>>,
}

impl DecoderProbe {
    /// Successful `read_next_frame` calls.
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }

    /// `close` calls.
    pub fn closes(&self) -> u32 {
        self.closes.get()
    }
}

/// Yields frames `0..frame_count`, each frame being its own index.
pub struct ScriptedDecoder {
    frame_count: u64,
    next: u64,
    frame_rate: Option<f64>,
    probe: DecoderProbe,
}

impl ScriptedDecoder {
    pub fn new(frame_count: u64, frame_rate: Option<f64>) -> (Self, DecoderProbe) {
        let probe = DecoderProbe::default();
        let decoder = Self {
            frame_count,
            next: 0,
            frame_rate,
            probe: probe.clone(),
        };
        (decoder, probe)
    }
}

impl FrameDecoder for ScriptedDecoder {
    type Frame = u64;

    fn frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    fn read_next_frame(&mut self) -> Option<u64> {
        if self.next >= self.frame_count {
            return None;
        }
        let frame = self.next;
        self.next += 1;
        self.probe.reads.set(self.probe.reads.get() + 1);
        Some(frame)
    }

    fn close(&mut self) {
        self.probe.closes.set(self.probe.closes.get() + 1);
    }
}

/// Encodes a frame as `"<format>:<index>"`.
pub fn label_encoder(frame: &u64, format: &str) -> Option<Vec<u8>> {
    Some(format!("{format}:{frame}").into_bytes())
}

/// Fails every frame.
pub fn failing_encoder(_frame: &u64, _format: &str) -> Option<Vec<u8>> {
    None
}

/// Records every progress notification.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.events.lock().unwrap().push(info.clone());
    }
}

/// Answer a single HTTP request on a loopback port with `status` and `body`.
///
/// Returns the URL to fetch.
pub fn serve_once(status: &str, body: &[u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let address = listener.local_addr().unwrap();

    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: video/mp4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(&chunk[..read]),
            }
        }
        let _ = stream.write_all(&response);
    });

    format!("http://{address}/clip.mp4")
}
