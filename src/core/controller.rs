//! Chat session controller: one submission at a time, driven from the user's
//! text through the completion request and the reveal of the reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::completion::{CompletionClient, CompletionError};
use crate::core::constants::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_REVEAL_INTERVAL, ERROR_MARKER};
use crate::core::message::ChatMessage;
use crate::core::reveal::{RevealEvent, RevealParams, RevealScheduler};
use crate::core::session::{ChatSession, SessionSnapshot};

/// What happened to a submission. Purely informational: failures have
/// already been turned into transcript state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input; nothing changed.
    Ignored,
    /// A turn was already pending, or the session has ended; nothing changed.
    Rejected,
    /// The reply arrived and is being revealed into the last message.
    Revealing,
    /// The request failed; the error marker was appended.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealProgress {
    /// The trailing assistant message now holds this prefix.
    Frame(String),
    /// The reply is fully shown and the turn is over.
    Finished,
    /// No reveal is running.
    Idle,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub reveal_interval: Duration,
    /// `None` leaves the request unbounded.
    pub request_timeout: Option<Duration>,
    pub greeting: Option<String>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            greeting: None,
        }
    }
}

struct ActiveReveal {
    id: u64,
    cancel_token: CancellationToken,
}

pub struct ChatController {
    session: ChatSession,
    client: Arc<dyn CompletionClient>,
    scheduler: RevealScheduler,
    reveal_rx: mpsc::UnboundedReceiver<(RevealEvent, u64)>,
    active_reveal: Option<ActiveReveal>,
    next_reveal_id: u64,
    request_timeout: Option<Duration>,
    /// Set while `submit` awaits the completion client. Still set on entry
    /// to a later call means that `submit` future was dropped mid-request.
    request_in_flight: bool,
    lifetime: CancellationToken,
}

impl ChatController {
    pub fn new(client: Arc<dyn CompletionClient>, options: ControllerOptions) -> Self {
        let (scheduler, reveal_rx) = RevealScheduler::new(options.reveal_interval);
        let session = match options.greeting {
            Some(greeting) => ChatSession::with_greeting(greeting),
            None => ChatSession::new(),
        };
        Self {
            session,
            client,
            scheduler,
            reveal_rx,
            active_reveal: None,
            next_reveal_id: 0,
            request_timeout: options.request_timeout,
            request_in_flight: false,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Token that ends the session when cancelled, usable while `submit` is
    /// awaiting a reply. The in-flight request then fails with the error
    /// marker and later submissions are rejected.
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub fn current_state(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn draft(&self) -> &str {
        self.session.draft()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.session.set_draft(draft);
    }

    /// Submit whatever is in the draft buffer.
    pub async fn submit_draft(&mut self) -> SubmitOutcome {
        let draft = self.session.draft().to_string();
        self.submit(&draft).await
    }

    pub async fn submit(&mut self, user_text: &str) -> SubmitOutcome {
        self.settle_abandoned_request();
        if user_text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.session.is_pending() || self.is_closed() {
            debug!("submission rejected while a turn is pending or after shutdown");
            return SubmitOutcome::Rejected;
        }

        self.session.push(ChatMessage::user(user_text));
        self.session.clear_draft();
        self.session.set_pending(true);

        let history = self.session.messages().to_vec();
        self.request_in_flight = true;
        let result = self.request_completion(&history).await;
        self.request_in_flight = false;

        match result {
            Ok(reply) => {
                self.session.push(ChatMessage::assistant(""));
                self.start_reveal(reply);
                SubmitOutcome::Revealing
            }
            Err(err) => {
                warn!("chat turn failed: {err}");
                self.fail_turn();
                SubmitOutcome::Failed
            }
        }
    }

    fn fail_turn(&mut self) {
        self.session.push(ChatMessage::assistant(ERROR_MARKER));
        self.session.set_pending(false);
    }

    /// Close out a turn whose `submit` future was dropped before the reply
    /// arrived, so the user message still gets exactly one assistant reply.
    fn settle_abandoned_request(&mut self) {
        if !self.request_in_flight {
            return;
        }
        self.request_in_flight = false;
        warn!("previous chat turn was abandoned before a reply arrived");
        self.fail_turn();
    }

    async fn request_completion(&self, history: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = async {
            match self.request_timeout {
                Some(limit) => tokio::time::timeout(limit, self.client.complete(history))
                    .await
                    .unwrap_or_else(|_| Err(CompletionError::Timeout(limit))),
                None => self.client.complete(history).await,
            }
        };

        tokio::select! {
            result = request => result,
            _ = self.lifetime.cancelled() => Err(CompletionError::Cancelled),
        }
    }

    fn start_reveal(&mut self, reply: String) {
        self.next_reveal_id += 1;
        let cancel_token = self.lifetime.child_token();
        self.active_reveal = Some(ActiveReveal {
            id: self.next_reveal_id,
            cancel_token: cancel_token.clone(),
        });
        debug!(
            reveal_id = self.next_reveal_id,
            chars = reply.chars().count(),
            "starting reveal"
        );
        self.scheduler.spawn_reveal(RevealParams {
            text: reply,
            cancel_token,
            reveal_id: self.next_reveal_id,
        });
    }

    pub fn is_current_reveal(&self, reveal_id: u64) -> bool {
        self.active_reveal
            .as_ref()
            .is_some_and(|active| active.id == reveal_id)
    }

    /// Wait for the next step of the active reveal and apply it.
    pub async fn advance_reveal(&mut self) -> RevealProgress {
        self.settle_abandoned_request();
        while self.active_reveal.is_some() {
            let Some((event, reveal_id)) = self.reveal_rx.recv().await else {
                break;
            };
            if let Some(progress) = self.apply_reveal_event(event, reveal_id) {
                return progress;
            }
        }
        RevealProgress::Idle
    }

    /// Drive the active reveal until the reply is fully shown.
    pub async fn finish_reveal(&mut self) {
        while let RevealProgress::Frame(_) = self.advance_reveal().await {}
    }

    /// Returns `None` for events from a reveal that is no longer current.
    pub fn apply_reveal_event(
        &mut self,
        event: RevealEvent,
        reveal_id: u64,
    ) -> Option<RevealProgress> {
        if !self.is_current_reveal(reveal_id) {
            debug!(reveal_id, "dropping stale reveal event");
            return None;
        }

        match event {
            RevealEvent::Frame(prefix) => {
                if !self.session.replace_trailing_assistant_text(&prefix) {
                    warn!(reveal_id, "reveal target is no longer the trailing message");
                    self.cancel_reveal();
                    self.session.set_pending(false);
                    return Some(RevealProgress::Finished);
                }
                Some(RevealProgress::Frame(prefix))
            }
            RevealEvent::Done => {
                self.active_reveal = None;
                self.session.set_pending(false);
                Some(RevealProgress::Finished)
            }
        }
    }

    fn cancel_reveal(&mut self) {
        if let Some(active) = self.active_reveal.take() {
            active.cancel_token.cancel();
        }
    }

    /// End the session: stop any active reveal. Later submissions are
    /// rejected. Use [`shutdown_handle`](Self::shutdown_handle) to abort a
    /// request that `submit` is still awaiting.
    pub fn shutdown(&mut self) {
        self.settle_abandoned_request();
        self.cancel_reveal();
        self.lifetime.cancel();
        self.session.set_pending(false);
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
