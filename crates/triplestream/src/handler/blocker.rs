//! Conditional output suppression without reordering.
//!
//! [`ContextBlocker`] lets a filter decide, *after* seeing some of a
//! context's statements, whether that context's output should exist at all
//! (drop a page-title statement unless the document produced anything
//! else), without reordering statements relative to each other and without
//! breaking the open/close framing contract.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use ahash::AHashSet;
use indexmap::IndexMap;
use oxrdf::{NamedNode, Subject, Term};

enum QueuedEvent {
    Namespace {
        prefix: String,
        iri: String,
    },
    Triple {
        subject: Subject,
        predicate: NamedNode,
        object: Term,
        graph: Option<NamedNode>,
    },
    Close,
}

struct BlockedQueue {
    context: ExtractionContext,
    events: Vec<QueuedEvent>,
}

/// Buffering decorator implementing per-context blocking.
///
/// While a context is blocked, its namespace/triple/close events queue in
/// arrival order instead of being forwarded. `open_context` is never
/// queued: the wrapped handler always sees a context open, even if its
/// content is later suppressed entirely.
///
/// [`unblock_context`](Self::unblock_context) flushes one context's queue
/// in original arrival order (a queued close flushes last, since it arrived
/// last) and forwards subsequent calls live.
/// [`unblock_document`](Self::unblock_document) flushes every blocked
/// context, in the order their first event was queued.
///
/// A context closed while blocked and never unblocked has its statements
/// dropped permanently at `end_document`; its queued close is still
/// forwarded there so the downstream open/close framing stays balanced.
pub struct ContextBlocker<H> {
    inner: H,
    blocked: AHashSet<String>,
    // Keyed by context id; entries appear when a context's first event
    // queues, so iteration order is first-queued-event order.
    queues: IndexMap<String, BlockedQueue>,
}

impl<H: TripleHandler> ContextBlocker<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            blocked: AHashSet::new(),
            queues: IndexMap::new(),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    /// Start queueing events for this context.
    pub fn block_context(&mut self, context: &ExtractionContext) {
        self.blocked.insert(context.unique_id().to_string());
    }

    pub fn is_blocked(&self, context: &ExtractionContext) -> bool {
        self.blocked.contains(context.unique_id())
    }

    /// Release one context: flush its queue in arrival order, then forward
    /// subsequent calls live.
    pub fn unblock_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        self.blocked.remove(context.unique_id());
        if let Some(queue) = self.queues.shift_remove(context.unique_id()) {
            self.flush(queue)?;
        }
        Ok(())
    }

    /// Release every blocked context of the current document. Queues flush
    /// in the order their first event arrived.
    pub fn unblock_document(&mut self) -> Result<(), HandlerError> {
        self.blocked.clear();
        let queues = std::mem::take(&mut self.queues);
        for (_, queue) in queues {
            self.flush(queue)?;
        }
        Ok(())
    }

    fn flush(&mut self, queue: BlockedQueue) -> Result<(), HandlerError> {
        for event in queue.events {
            match event {
                QueuedEvent::Namespace { prefix, iri } => {
                    self.inner.receive_namespace(&prefix, &iri, &queue.context)?;
                }
                QueuedEvent::Triple {
                    subject,
                    predicate,
                    object,
                    graph,
                } => {
                    self.inner.receive_triple(
                        &subject,
                        &predicate,
                        &object,
                        graph.as_ref(),
                        &queue.context,
                    )?;
                }
                QueuedEvent::Close => {
                    self.inner.close_context(&queue.context)?;
                }
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, context: &ExtractionContext, event: QueuedEvent) {
        self.queues
            .entry(context.unique_id().to_string())
            .or_insert_with(|| BlockedQueue {
                context: context.clone(),
                events: Vec::new(),
            })
            .events
            .push(event);
    }
}

impl<H: TripleHandler> TripleHandler for ContextBlocker<H> {
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        self.blocked.clear();
        self.queues.clear();
        self.inner.start_document(document_iri)
    }

    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        // Never queued: downstream must always see the context open.
        self.inner.open_context(context)
    }

    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        if self.is_blocked(context) {
            self.enqueue(
                context,
                QueuedEvent::Namespace {
                    prefix: prefix.to_string(),
                    iri: iri.to_string(),
                },
            );
            return Ok(());
        }
        self.inner.receive_namespace(prefix, iri, context)
    }

    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        if self.is_blocked(context) {
            self.enqueue(
                context,
                QueuedEvent::Triple {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object: object.clone(),
                    graph: graph.cloned(),
                },
            );
            return Ok(());
        }
        self.inner
            .receive_triple(subject, predicate, object, graph, context)
    }

    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        if self.is_blocked(context) {
            self.enqueue(context, QueuedEvent::Close);
            return Ok(());
        }
        self.inner.close_context(context)
    }

    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        // Contexts still blocked here are suppressed for good: drop their
        // statements, but forward the queued close so framing balances.
        let queues = std::mem::take(&mut self.queues);
        for (_, queue) in queues {
            if queue.events.iter().any(|e| matches!(e, QueuedEvent::Close)) {
                self.inner.close_context(&queue.context)?;
            }
        }
        self.blocked.clear();
        self.inner.end_document(document_iri)
    }

    fn set_content_length(&mut self, content_length: u64) -> Result<(), HandlerError> {
        self.inner.set_content_length(content_length)
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        self.queues.clear();
        self.blocked.clear();
        self.inner.close()
    }
}
