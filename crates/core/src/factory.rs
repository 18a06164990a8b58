use crate::auction::Auction;
use crate::config::Settings;
use crate::error::DispatchError;
use crate::filter;
use crate::item::{ItemSerializer, JsonItemSerializer};
use crate::messages::{Message, MessageCatalog, MessagePath};
use crate::placeholder::replace_auction_placeholders;
use crate::recipient::{GroupRegistry, MessageGroup, MessageRecipient};
use crate::render::{split_and_format, RenderedLine};
use auctions_text::translate_alternate_color_codes;
use rustc_hash::FxHashSet;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

/// `Dispatch` gets sent from the submitting thread to the message worker.
enum Dispatch {
    /// Send a message to one recipient.
    Single {
        recipient: Arc<dyn MessageRecipient>,
        message: Message,
        auction: Option<Arc<dyn Auction>>,
    },
    /// Send a message to every registered group and the console.
    Broadcast {
        message: Message,
        auction: Option<Arc<dyn Auction>>,
    },
}

struct Task {
    dispatch: Dispatch,
    done: Sender<Result<(), DispatchError>>,
}

/// Completion of one submitted message.
///
/// The handle resolves once every line was handed to every recipient. Failed
/// deliveries to single recipients are logged by the worker and do not show
/// up here.
#[derive(Debug)]
pub struct DispatchHandle {
    receiver: Receiver<Result<(), DispatchError>>,
    outcome: Option<Result<(), DispatchError>>,
}

impl DispatchHandle {
    fn resolved(outcome: Result<(), DispatchError>) -> DispatchHandle {
        let (_, receiver) = mpsc::channel();
        DispatchHandle {
            receiver,
            outcome: Some(outcome),
        }
    }

    /// Blocks until the message has been dispatched.
    pub fn wait(self) -> Result<(), DispatchError> {
        match self.outcome {
            Some(outcome) => outcome,
            None => self
                .receiver
                .recv()
                .unwrap_or(Err(DispatchError::WorkerStopped)),
        }
    }

    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<(), DispatchError>> {
        if self.outcome.is_none() {
            match self.receiver.recv_timeout(timeout) {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(mpsc::RecvTimeoutError::Timeout) => return None,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    self.outcome = Some(Err(DispatchError::WorkerStopped))
                }
            }
        }
        self.outcome.clone()
    }

    /// Returns the outcome if the message has been dispatched, without blocking.
    pub fn try_wait(&mut self) -> Option<Result<(), DispatchError>> {
        if self.outcome.is_none() {
            match self.receiver.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(Err(DispatchError::WorkerStopped))
                }
            }
        }
        self.outcome.clone()
    }
}

/// Everything the worker needs to format and deliver a message.
struct Pipeline {
    settings: Arc<dyn Settings>,
    catalog: Arc<MessageCatalog>,
    serializer: Arc<dyn ItemSerializer>,
    console: Arc<dyn MessageRecipient>,
    registry: Arc<GroupRegistry>,
}

impl Pipeline {
    fn run(&self, dispatch: Dispatch) {
        match dispatch {
            Dispatch::Single {
                recipient,
                message,
                auction,
            } => {
                for line in self.format(&message, auction.as_deref()) {
                    send_message_if_applicable(recipient.as_ref(), &line, &message);
                }
            }
            Dispatch::Broadcast { message, auction } => {
                let lines = self.format(&message, auction.as_deref());
                let recipients = self.broadcast_recipients();
                for line in &lines {
                    for recipient in &recipients {
                        send_message_if_applicable(recipient.as_ref(), line, &message);
                    }
                    deliver_isolated(self.console.as_ref(), line);
                }
            }
        }
    }

    fn format(&self, message: &Message, auction: Option<&dyn Auction>) -> Vec<RenderedLine> {
        let colored = translate_alternate_color_codes('&', &message.text);
        let formatted = replace_auction_placeholders(&colored, auction, self.settings.as_ref());
        split_and_format(
            &formatted,
            auction,
            self.catalog.item_format(),
            self.serializer.as_ref(),
        )
    }

    /// Members of every registered group, each once. The console is not part
    /// of this list, even if a group holds a recipient with the same uuid.
    fn broadcast_recipients(&self) -> Vec<Arc<dyn MessageRecipient>> {
        let mut seen = FxHashSet::default();
        let mut recipients = Vec::new();
        for group in self.registry.snapshot() {
            for recipient in group.recipients() {
                if seen.insert(recipient.uuid()) {
                    recipients.push(recipient);
                }
            }
        }
        recipients
    }
}

fn send_message_if_applicable(
    recipient: &dyn MessageRecipient,
    line: &RenderedLine,
    origin: &Message,
) {
    if !filter::may_deliver(recipient, origin) {
        debug!("{} is ignoring this message", recipient.name());
        return;
    }
    deliver_isolated(recipient, line);
}

/// Delivers one line, logging a failure or panic instead of passing it on.
fn deliver_isolated(recipient: &dyn MessageRecipient, line: &RenderedLine) {
    match panic::catch_unwind(AssertUnwindSafe(|| recipient.deliver(line))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("Failed to send message to {}: {}", recipient.name(), err),
        Err(payload) => error!(
            "Sending message to {} panicked: {}",
            recipient.name(),
            panic_message(payload)
        ),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct MessageFactoryBuilder {
    settings: Arc<dyn Settings>,
    catalog: Arc<MessageCatalog>,
    serializer: Arc<dyn ItemSerializer>,
    console: Arc<dyn MessageRecipient>,
    registry: Arc<GroupRegistry>,
}

impl MessageFactoryBuilder {
    pub fn new(settings: Arc<dyn Settings>, console: Arc<dyn MessageRecipient>) -> Self {
        Self {
            settings,
            catalog: Default::default(),
            serializer: Arc::new(JsonItemSerializer),
            console,
            registry: Default::default(),
        }
    }

    pub fn catalog(mut self, catalog: Arc<MessageCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn serializer(mut self, serializer: Arc<dyn ItemSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Shares an existing registry instead of starting with an empty one.
    pub fn registry(mut self, registry: Arc<GroupRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Spawns the message worker.
    pub fn finish(self) -> std::io::Result<MessageFactory> {
        let pipeline = Pipeline {
            settings: self.settings,
            catalog: self.catalog.clone(),
            serializer: self.serializer,
            console: self.console,
            registry: self.registry.clone(),
        };
        let (sender, receiver) = mpsc::channel::<Task>();
        let worker = thread::Builder::new()
            .name("auctions-messages".to_string())
            .spawn(move || {
                for task in receiver {
                    let result =
                        panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(task.dispatch)))
                            .map_err(|payload| {
                                let message = panic_message(payload);
                                error!("Message task panicked: {}", message);
                                DispatchError::Panicked(message)
                            });
                    // The submitter may have dropped its handle
                    let _ = task.done.send(result);
                }
                debug!("Message worker stopped");
            })?;

        Ok(MessageFactory {
            catalog: self.catalog,
            registry: self.registry,
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

/// Formats auction messages and delivers them on a single background thread.
///
/// Messages are processed strictly in the order they were submitted, one at
/// a time. Submitting never blocks.
pub struct MessageFactory {
    catalog: Arc<MessageCatalog>,
    registry: Arc<GroupRegistry>,
    sender: Option<Sender<Task>>,
    worker: Option<JoinHandle<()>>,
}

impl MessageFactory {
    pub fn builder(
        settings: Arc<dyn Settings>,
        console: Arc<dyn MessageRecipient>,
    ) -> MessageFactoryBuilder {
        MessageFactoryBuilder::new(settings, console)
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    pub fn add_recipient_group(&self, group: Arc<dyn MessageGroup>) -> bool {
        self.registry.add(group)
    }

    pub fn remove_recipient_group(&self, name: &str) -> bool {
        self.registry.remove(name)
    }

    fn enqueue(&self, dispatch: Dispatch) -> DispatchHandle {
        let Some(sender) = &self.sender else {
            return DispatchHandle::resolved(Err(DispatchError::WorkerStopped));
        };
        let (done, receiver) = mpsc::channel();
        match sender.send(Task { dispatch, done }) {
            Ok(()) => DispatchHandle {
                receiver,
                outcome: None,
            },
            Err(_) => {
                error!("Message worker is gone, dropping message");
                DispatchHandle::resolved(Err(DispatchError::WorkerStopped))
            }
        }
    }

    pub fn submit(
        &self,
        recipient: Arc<dyn MessageRecipient>,
        message: Message,
        auction: Option<Arc<dyn Auction>>,
    ) -> DispatchHandle {
        self.enqueue(Dispatch::Single {
            recipient,
            message,
            auction,
        })
    }

    pub fn submit_broadcast(
        &self,
        message: Message,
        auction: Option<Arc<dyn Auction>>,
    ) -> DispatchHandle {
        self.enqueue(Dispatch::Broadcast { message, auction })
    }

    /// Sends the configured text of `path` to one recipient.
    pub fn submit_message(
        &self,
        recipient: Arc<dyn MessageRecipient>,
        path: MessagePath,
        auction: Option<Arc<dyn Auction>>,
    ) -> DispatchHandle {
        self.submit(recipient, self.catalog.get(path), auction)
    }

    /// Broadcasts the configured text of `path`.
    pub fn broadcast_message(
        &self,
        path: MessagePath,
        auction: Option<Arc<dyn Auction>>,
    ) -> DispatchHandle {
        self.submit_broadcast(self.catalog.get(path), auction)
    }

    /// Finishes every queued message, then stops the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel ends the worker loop once the queue is drained
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Message worker panicked while shutting down");
            }
        }
    }
}

impl Drop for MessageFactory {
    fn drop(&mut self) {
        self.stop();
    }
}
