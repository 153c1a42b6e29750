use std::marker::PhantomData;

use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

use crate::document::{Document, SnapshotReceiver, StoreError};

use super::{decode_entity, Operation, RepositoryError, TenantDocument};

/// Live, cancelable sequence of full-collection snapshots.
///
/// Each item is the complete current list; there is no diffing contract.
/// Nothing is delivered after [`Subscription::cancel`].
pub struct Subscription<E> {
    rx: SnapshotReceiver,
    cancelled: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: TenantDocument> Subscription<E> {
    pub(crate) fn new(rx: SnapshotReceiver) -> Self {
        Self {
            rx,
            cancelled: false,
            _entity: PhantomData,
        }
    }

    /// Next snapshot, or `None` once cancelled or the store ends the watch.
    pub async fn next(&mut self) -> Option<Result<Vec<E>, RepositoryError>> {
        if self.cancelled {
            return None;
        }
        self.rx.recv().await.map(decode_snapshot::<E>)
    }

    /// Stop the watch and discard snapshots that were already buffered.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// A cancelled subscription becomes an empty stream.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<E>, RepositoryError>> + Send + 'static {
        UnboundedReceiverStream::new(self.rx).map(decode_snapshot::<E>)
    }
}

fn decode_snapshot<E: TenantDocument>(
    snapshot: Result<Vec<Document>, StoreError>,
) -> Result<Vec<E>, RepositoryError> {
    snapshot
        .map_err(RepositoryError::store(E::KIND, Operation::Subscribe))?
        .iter()
        .map(decode_entity::<E>)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use planboard_core::{SystemClock, TenantId};
    use planboard_planning::{HexColor, NewTeam, RequiredText, Team, TeamDisplayName};
    use tokio_stream::StreamExt;

    use crate::document::InMemoryDocumentStore;
    use crate::path::PathScheme;
    use crate::repository::TenantRepository;

    fn team(name: &str) -> NewTeam {
        NewTeam {
            full_name: RequiredText::parse("fullName", name).unwrap(),
            display_name: TeamDisplayName::parse(name).unwrap(),
            color: HexColor::parse("#000").unwrap(),
            manager_id: None,
        }
    }

    fn teams() -> TenantRepository<Team, InMemoryDocumentStore> {
        TenantRepository::new(
            Arc::new(InMemoryDocumentStore::new()),
            PathScheme::default(),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn snapshots_follow_writes_in_order() {
        let repo = teams();
        let demo = TenantId::new("demo").unwrap();
        let mut sub = repo.subscribe(&demo);

        assert!(sub.next().await.unwrap().unwrap().is_empty());

        repo.create(&demo, &team("OPS")).await.unwrap();
        repo.create(&demo, &team("DEV")).await.unwrap();

        let first = sub.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        let second = sub.next().await.unwrap().unwrap();
        let names: Vec<_> = second.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, ["DEV", "OPS"]);
    }

    #[tokio::test]
    async fn nothing_arrives_after_cancel() {
        let repo = teams();
        let demo = TenantId::new("demo").unwrap();
        let mut sub = repo.subscribe(&demo);

        repo.create(&demo, &team("OPS")).await.unwrap();
        sub.cancel();
        repo.create(&demo, &team("DEV")).await.unwrap();

        assert!(sub.is_cancelled());
        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn cancelled_subscription_streams_nothing() {
        let repo = teams();
        let demo = TenantId::new("demo").unwrap();
        let mut sub = repo.subscribe(&demo);

        repo.create(&demo, &team("OPS")).await.unwrap();
        sub.cancel();
        repo.create(&demo, &team("DEV")).await.unwrap();

        let delivered: Vec<_> = sub.into_stream().collect().await;
        assert!(delivered.is_empty());
    }

    #[tokio::test]
    async fn stream_view_yields_snapshots() {
        let repo = teams();
        let demo = TenantId::new("demo").unwrap();
        let stream = repo.subscribe(&demo).into_stream();
        tokio::pin!(stream);

        repo.create(&demo, &team("OPS")).await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().len(), 0);
        let latest = stream.next().await.unwrap().unwrap();
        assert_eq!(latest[0].display_name, "OPS");
        assert!(latest[0].created_at <= Utc::now());
    }
}
