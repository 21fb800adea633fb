//! Incremental disclosure of an already-complete reply.
//!
//! A reveal runs as its own task and reports progress over a channel, tagged
//! with the reveal id it was started with. The receiver decides whether the
//! id is still current, so a cancelled or superseded reveal can never write
//! into a slot it no longer owns.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    /// The next, strictly longer prefix of the reply.
    Frame(String),
    /// The full reply has been shown.
    Done,
}

pub struct RevealParams {
    pub text: String,
    pub cancel_token: CancellationToken,
    pub reveal_id: u64,
}

#[derive(Clone)]
pub struct RevealScheduler {
    tx: mpsc::UnboundedSender<(RevealEvent, u64)>,
    interval: Duration,
}

/// Every non-empty prefix of `text` that ends on a grapheme boundary, in
/// increasing length. The last item is `text` itself.
pub fn reveal_prefixes(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.grapheme_indices(true)
        .map(move |(start, grapheme)| &text[..start + grapheme.len()])
}

impl RevealScheduler {
    pub fn new(interval: Duration) -> (Self, mpsc::UnboundedReceiver<(RevealEvent, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, interval }, rx)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start revealing `params.text`. The first prefix is sent immediately,
    /// each following one after `interval`. Cancelling the token stops the
    /// task without sending `Done`.
    pub fn spawn_reveal(&self, params: RevealParams) {
        let tx = self.tx.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            let RevealParams {
                text,
                cancel_token,
                reveal_id,
            } = params;

            let mut ticker = (!interval.is_zero()).then(|| {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            });

            for prefix in reveal_prefixes(&text) {
                match ticker.as_mut() {
                    Some(ticker) => {
                        tokio::select! {
                            _ = cancel_token.cancelled() => return,
                            _ = ticker.tick() => {}
                        }
                    }
                    None if cancel_token.is_cancelled() => return,
                    None => {}
                }

                if tx
                    .send((RevealEvent::Frame(prefix.to_string()), reveal_id))
                    .is_err()
                {
                    return;
                }
            }

            if !cancel_token.is_cancelled() {
                let _ = tx.send((RevealEvent::Done, reveal_id));
            }
        });
    }
}
