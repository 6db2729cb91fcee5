use {
  crate::{
    lifecycle::{self, Filter},
    CampaignStore,
    FetchError,
  },
  blockfund_primitives::{Campaign, CampaignId, Donation},
  parking_lot::Mutex,
  std::sync::Arc,
  time::OffsetDateTime,
  tokio::sync::watch,
  tracing::{debug, info, warn},
};

/// Load state of the campaign collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
  #[default]
  Idle,
  Loading,
  Ready(Vec<Campaign>),
  Failed(FetchError),
}

/// What a campaign listing shows for a given load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
  Loading,

  /// "No campaigns found". Both an empty ledger and a failed
  /// fetch end up here.
  Empty,

  /// Campaigns admitted by the selected filter, in ledger order.
  Campaigns(Vec<Campaign>),
}

impl LoadState {
  pub fn campaigns(&self) -> &[Campaign] {
    match self {
      LoadState::Ready(campaigns) => campaigns,
      _ => &[],
    }
  }

  pub fn listing(&self, selection: Filter, now: OffsetDateTime) -> Listing {
    match self {
      LoadState::Idle | LoadState::Loading => Listing::Loading,
      LoadState::Failed(_) => Listing::Empty,
      LoadState::Ready(campaigns) if campaigns.is_empty() => Listing::Empty,
      LoadState::Ready(campaigns) => {
        Listing::Campaigns(lifecycle::filter(campaigns, selection, now))
      }
    }
  }
}

/// Identifies one fetch issued by the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

#[derive(Debug)]
struct Requests {
  latest: RequestId,
  mounted: bool,
}

struct Shared {
  store: Arc<dyn CampaignStore>,
  requests: Mutex<Requests>,
  state: watch::Sender<LoadState>,
}

/// Per-session cache of campaign records fetched from the ledger.
///
/// The cache never changes records on its own. After any acknowledged
/// write the owner of that write asks for a [`CampaignCache::refresh`], so
/// every total shown comes from the ledger.
///
/// Each fetch is tagged with a [`RequestId`]. Fetches may complete in any
/// order, only the completion of the most recently issued one is applied,
/// and nothing is applied while the cache is unmounted.
#[derive(Clone)]
pub struct CampaignCache {
  shared: Arc<Shared>,
}

impl CampaignCache {
  pub fn new(store: Arc<dyn CampaignStore>) -> Self {
    Self {
      shared: Arc::new(Shared {
        store,
        requests: Mutex::new(Requests {
          latest: RequestId::default(),
          mounted: true,
        }),
        state: watch::channel(LoadState::Idle).0,
      }),
    }
  }

  pub fn state(&self) -> LoadState {
    self.shared.state.borrow().clone()
  }

  /// Notified on every load state transition.
  pub fn subscribe(&self) -> watch::Receiver<LoadState> {
    self.shared.state.subscribe()
  }

  /// Fetches the collection if it was never requested, otherwise
  /// returns the current state.
  pub async fn load(&self) -> LoadState {
    match self.state() {
      LoadState::Idle => self.refresh().await,
      current => current,
    }
  }

  /// Drops the current collection and fetches it again.
  ///
  /// Returns the state after this fetch completed, which is the state
  /// of a newer fetch if this one was superseded in the meantime.
  pub async fn refresh(&self) -> LoadState {
    let Some(request) = self.begin() else {
      debug!("refresh requested on an unmounted campaign cache");
      return self.state();
    };

    let result = self.shared.store.fetch_campaigns().await;
    self.complete(request, result)
  }

  /// Attaches the cache to a view. Does not fetch by itself.
  pub fn mount(&self) {
    self.shared.requests.lock().mounted = true;
  }

  /// Detaches the cache from its view. Fetches still in flight are
  /// discarded when they complete and the collection is dropped.
  pub fn unmount(&self) {
    let mut requests = self.shared.requests.lock();
    requests.mounted = false;
    requests.latest.0 += 1;
    self.shared.state.send_replace(LoadState::Idle);
  }

  pub fn is_mounted(&self) -> bool {
    self.shared.requests.lock().mounted
  }

  /// Donation history of a campaign. Read failures show as no donations.
  pub async fn donations(&self, campaign: CampaignId) -> Vec<Donation> {
    match self.shared.store.fetch_donations(campaign).await {
      Ok(donations) => donations,
      Err(e) => {
        warn!("failed to fetch donations for campaign {campaign}: {e}");
        vec![]
      }
    }
  }

  fn begin(&self) -> Option<RequestId> {
    let mut requests = self.shared.requests.lock();
    if !requests.mounted {
      return None;
    }

    requests.latest.0 += 1;
    let request = requests.latest;
    self.shared.state.send_replace(LoadState::Loading);
    debug!("fetching campaigns, request {request:?}");
    Some(request)
  }

  fn complete(
    &self,
    request: RequestId,
    result: Result<Vec<Campaign>, FetchError>,
  ) -> LoadState {
    let requests = self.shared.requests.lock();
    if !requests.mounted || requests.latest != request {
      debug!(
        "discarding stale campaigns response {request:?}, latest is {:?}",
        requests.latest
      );
      return self.shared.state.borrow().clone();
    }

    let next = match result {
      Ok(campaigns) => {
        info!("loaded {} campaigns", campaigns.len());
        LoadState::Ready(campaigns)
      }
      Err(e) => {
        warn!("failed to fetch campaigns: {e}");
        LoadState::Failed(e)
      }
    };

    self.shared.state.send_replace(next.clone());
    next
  }
}
