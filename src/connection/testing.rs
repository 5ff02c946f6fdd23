//! Hand-written doubles for the external collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::{ChannelError, ConnectionRegistry, IdGenerator, NegotiatorError};

use super::channel::{ChannelEventSink, ChannelInitializer, DataChannel};
use super::negotiator::{IceCandidate, NegotiationPayload, Negotiator, SdpType, SessionDescription};

/// Session description advertising `size`, or no size attribute at all.
pub fn description_with_size(size: Option<usize>) -> String {
    let mut sdp = String::from(
        "v=0\r\n\
         s=-\r\n\
         m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
         a=sctp-port:5000\r\n",
    );
    if let Some(size) = size {
        sdp.push_str(&format!("a=max-message-size:{size}\r\n"));
    }
    sdp
}

#[derive(Debug, Default)]
pub struct ChannelLog {
    pub sent: Vec<Vec<u8>>,
    pub sink: Option<ChannelEventSink>,
    pub binds: usize,
    pub unbinds: usize,
    pub description_reads: usize,
    pub fail_sends: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    pub label: String,
    pub local: Option<String>,
    pub remote: Option<String>,
    pub log: Arc<Mutex<ChannelLog>>,
}

impl MockChannel {
    pub fn with_sizes(local: Option<usize>, remote: Option<usize>) -> Self {
        Self {
            label: "mock".into(),
            local: Some(description_with_size(local)),
            remote: Some(description_with_size(remote)),
            log: Arc::default(),
        }
    }

    /// Sink bound by the connection, if any.
    pub fn sink(&self) -> Option<ChannelEventSink> {
        self.log.lock().unwrap().sink.clone()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.log.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl DataChannel for MockChannel {
    fn label(&self) -> &str {
        &self.label
    }

    fn bind(&mut self, sink: ChannelEventSink) {
        let mut log = self.log.lock().unwrap();
        log.sink = Some(sink);
        log.binds += 1;
    }

    fn unbind(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.sink = None;
        log.unbinds += 1;
    }

    fn send(&mut self, frame: Vec<u8>) -> Result<(), ChannelError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_sends {
            return Err(ChannelError::SendFailed("buffer full".into()));
        }
        log.sent.push(frame);
        Ok(())
    }

    async fn local_description(&self) -> Option<String> {
        self.log.lock().unwrap().description_reads += 1;
        self.local.clone()
    }

    async fn remote_description(&self) -> Option<String> {
        self.log.lock().unwrap().description_reads += 1;
        self.remote.clone()
    }
}

#[derive(Debug, Default)]
pub struct NegotiatorLog {
    pub started: Vec<NegotiationPayload>,
    pub sdps: Vec<(SdpType, SessionDescription)>,
    pub candidates: Vec<IceCandidate>,
    pub cleanups: usize,
}

/// Negotiator that hands over `channel` as soon as it is started.
#[derive(Debug, Default)]
pub struct MockNegotiator {
    pub channel: Option<MockChannel>,
    pub fail_start: bool,
    pub log: Arc<Mutex<NegotiatorLog>>,
}

impl MockNegotiator {
    pub fn with_channel(channel: MockChannel) -> Self {
        Self {
            channel: Some(channel),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Negotiator for MockNegotiator {
    async fn start_connection(
        &mut self,
        payload: NegotiationPayload,
        initializer: ChannelInitializer,
    ) -> Result<(), NegotiatorError> {
        self.log.lock().unwrap().started.push(payload);
        if self.fail_start {
            return Err(NegotiatorError::new("no route to peer"));
        }
        if let Some(channel) = self.channel.take() {
            initializer.initialize(Box::new(channel));
        }
        Ok(())
    }

    async fn handle_sdp(
        &mut self,
        kind: SdpType,
        description: SessionDescription,
    ) -> Result<(), NegotiatorError> {
        self.log.lock().unwrap().sdps.push((kind, description));
        Ok(())
    }

    async fn handle_candidate(&mut self, candidate: IceCandidate) -> Result<(), NegotiatorError> {
        self.log.lock().unwrap().candidates.push(candidate);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.log.lock().unwrap().cleanups += 1;
    }
}

#[derive(Debug, Default)]
pub struct MockRegistry {
    pub removed: Mutex<Vec<(String, String)>>,
}

impl MockRegistry {
    pub fn removals(&self) -> usize {
        self.removed.lock().unwrap().len()
    }
}

impl ConnectionRegistry for MockRegistry {
    fn remove_connection(&self, peer_id: &str, connection_id: &str) {
        self.removed
            .lock()
            .unwrap()
            .push((peer_id.to_owned(), connection_id.to_owned()));
    }
}

pub struct FixedIdGenerator(pub &'static str);

impl IdGenerator for FixedIdGenerator {
    fn generate(&self) -> String {
        self.0.to_owned()
    }
}
