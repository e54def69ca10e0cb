use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::{ClientError, Result};

/// In-memory transport that replays canned responses and records requests
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl RecordingTransport {
    pub fn with_bodies(bodies: &[&str]) -> Self {
        Self::with_responses(bodies.iter().map(|body| (200, *body)).collect())
    }

    pub fn with_responses(responses: Vec<(u16, &str)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(status, body)| {
                Ok(TransportResponse {
                    status,
                    body: body.to_string(),
                })
            })
            .collect();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(ClientError::Transport(
                message.to_string(),
            ))])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no canned response left".into())))
    }
}
