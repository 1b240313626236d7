use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::domain::{BoardListing, Item, ItemsQuery, OpsError, TranslationMiss};

use super::board_catalog::BoardCatalog;
use super::board_query::BoardQueryWorker;
use super::translator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardFailure {
    pub board_id: String,
    pub board_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub boards_searched: usize,
    pub boards_skipped: Vec<String>,
    pub failures: Vec<BoardFailure>,
    pub items_delivered: usize,
    pub cancelled: bool,
}

struct WorkerResult {
    board_id: String,
    board_name: String,
    outcome: WorkerOutcome,
}

enum WorkerOutcome {
    Items(Vec<Item>),
    Skipped(TranslationMiss),
    Failed(OpsError),
}

enum SearchEvent {
    Item(Item),
    Done(SearchSummary),
}

/// Dropping the stream cancels any board query still in flight.
pub struct ItemStream {
    events: ReceiverStream<SearchEvent>,
    summary: Option<SearchSummary>,
    _cancel_on_drop: DropGuard,
}

impl ItemStream {
    fn new(events: mpsc::Receiver<SearchEvent>, cancel_on_drop: DropGuard) -> Self {
        Self {
            events: ReceiverStream::new(events),
            summary: None,
            _cancel_on_drop: cancel_on_drop,
        }
    }

    pub fn summary(&self) -> Option<&SearchSummary> {
        self.summary.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.summary.is_some()
    }
}

impl Stream for ItemStream {
    type Item = Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Item>> {
        let this = self.get_mut();
        if this.summary.is_some() {
            return Poll::Ready(None);
        }

        match ready!(this.events.poll_next_unpin(cx)) {
            Some(SearchEvent::Item(item)) => Poll::Ready(Some(item)),
            Some(SearchEvent::Done(summary)) => {
                this.summary = Some(summary);
                Poll::Ready(None)
            }
            None => Poll::Ready(None),
        }
    }
}

#[derive(Clone)]
pub struct Aggregator {
    catalog: BoardCatalog,
    worker: BoardQueryWorker,
    max_concurrency: Option<usize>,
}

impl Aggregator {
    pub fn new(catalog: BoardCatalog, worker: BoardQueryWorker) -> Self {
        Self {
            catalog,
            worker,
            max_concurrency: None,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency.filter(|cap| *cap > 0);
        self
    }

    /// Fails only if the board listing fails.
    pub async fn search_all_boards(
        &self,
        cancel: &CancellationToken,
        query: ItemsQuery,
    ) -> Result<ItemStream, OpsError> {
        let boards = self.catalog.list_boards(cancel).await?;
        let board_count = boards.len();
        tracing::info!(boards = board_count, "Searching boards");

        let search_token = cancel.child_token();
        let (fan_tx, fan_rx) = mpsc::channel::<WorkerResult>(board_count.max(1));
        let (out_tx, out_rx) = mpsc::channel::<SearchEvent>(1);

        let query = Arc::new(query);
        let permits = self.max_concurrency.map(|cap| Arc::new(Semaphore::new(cap)));

        let mut workers = JoinSet::new();
        for board in boards {
            workers.spawn(run_board(
                self.worker.clone(),
                board,
                Arc::clone(&query),
                search_token.clone(),
                permits.clone(),
                fan_tx.clone(),
            ));
        }

        tokio::spawn(supervise(workers, fan_tx));
        tokio::spawn(merge(fan_rx, out_tx, board_count));

        Ok(ItemStream::new(out_rx, search_token.drop_guard()))
    }
}

async fn run_board(
    worker: BoardQueryWorker,
    board: BoardListing,
    query: Arc<ItemsQuery>,
    cancel: CancellationToken,
    permits: Option<Arc<Semaphore>>,
    fan_tx: mpsc::Sender<WorkerResult>,
) {
    let outcome = match translator::translate(&query, &board) {
        Err(miss) => WorkerOutcome::Skipped(miss),
        Ok(translated) => {
            let _permit = match permits {
                Some(semaphore) => tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    permit = semaphore.acquire_owned() => permit.ok(),
                },
                None => None,
            };

            match worker.query(&cancel, &board.id, &translated).await {
                Ok(items) => {
                    tracing::debug!(
                        board = board.name.as_str(),
                        items = items.len(),
                        "Board query finished"
                    );
                    WorkerOutcome::Items(items)
                }
                Err(err) => WorkerOutcome::Failed(err),
            }
        }
    };

    let result = WorkerResult {
        board_id: board.id,
        board_name: board.name,
        outcome,
    };
    // Capacity covers every board, so this never waits on the merge stage.
    if fan_tx.send(result).await.is_err() {
        tracing::trace!("Search dropped before board result was merged");
    }
}

async fn supervise(mut workers: JoinSet<()>, fan_tx: mpsc::Sender<WorkerResult>) {
    while let Some(joined) = workers.join_next().await {
        if let Err(err) = joined {
            tracing::error!(error = %err, "Board worker did not finish");
        }
    }
    // Last sender: the merge stage sees the channel close.
    drop(fan_tx);
}

async fn merge(
    mut fan_rx: mpsc::Receiver<WorkerResult>,
    out_tx: mpsc::Sender<SearchEvent>,
    board_count: usize,
) {
    let mut summary = SearchSummary {
        boards_searched: board_count,
        ..SearchSummary::default()
    };

    while let Some(result) = fan_rx.recv().await {
        match result.outcome {
            WorkerOutcome::Items(items) => {
                for item in items {
                    if out_tx.send(SearchEvent::Item(item)).await.is_err() {
                        tracing::debug!("Item stream dropped by consumer, stopping merge");
                        return;
                    }
                    summary.items_delivered += 1;
                }
            }
            WorkerOutcome::Skipped(miss) => {
                tracing::debug!(
                    board = result.board_name.as_str(),
                    reason = %miss,
                    "Board skipped"
                );
                summary.boards_skipped.push(result.board_name);
            }
            WorkerOutcome::Failed(OpsError::Cancelled) => {
                summary.cancelled = true;
            }
            WorkerOutcome::Failed(err) => {
                tracing::warn!(
                    board_id = result.board_id.as_str(),
                    board = result.board_name.as_str(),
                    error = %err,
                    "Board query failed"
                );
                summary.failures.push(BoardFailure {
                    board_id: result.board_id,
                    board_name: result.board_name,
                    error: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        items = summary.items_delivered,
        failed = summary.failures.len(),
        skipped = summary.boards_skipped.len(),
        "Search finished"
    );
    let _ = out_tx.send(SearchEvent::Done(summary)).await;
}
