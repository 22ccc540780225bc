//! Process-wide request caches shared by every wizard.
//!
//! Reference options (characteristics, proximities, users) are memoized for
//! the lifetime of the cache because they are not property-specific. Step
//! reads are only deduplicated while in flight and never served from memory.
//!
//! The cache is constructed once and injected into each wizard through
//! [`crate::WizardBuilder::with_cache`]; [`SessionCache::reset`] clears it.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::warn;

use crate::{
    api::PropertyApi,
    dedup::{ReadCache, RequestDeduplicator},
    error::Result,
    models::{CaracteristicaEscopo, OptionItem, PropertyId, StepId, StepPayload},
};

/// Which reference list a memoized entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionList {
    Caracteristicas(CaracteristicaEscopo),
    Proximidades,
    Usuarios,
}

fn option_request(
    api: &Arc<dyn PropertyApi>,
    list: OptionList,
) -> impl FnOnce() -> BoxFuture<'static, Result<Vec<OptionItem>>> {
    let api = Arc::clone(api);
    move || {
        async move {
            match list {
                OptionList::Caracteristicas(escopo) => api.caracteristicas(escopo).await,
                OptionList::Proximidades => api.proximidades().await,
                OptionList::Usuarios => api.usuarios().await,
            }
        }
        .boxed()
    }
}

#[derive(Default)]
struct SessionCacheInner {
    options: ReadCache<OptionList, Vec<OptionItem>>,
    step_reads: RequestDeduplicator<(PropertyId, StepId), Option<StepPayload>>,
}

/// Shared option caches and step-read deduplication.
#[derive(Clone, Default)]
pub struct SessionCache {
    inner: Arc<SessionCacheInner>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an option list, memoizing it after the first success.
    ///
    /// Failures are logged and degrade to an empty list.
    pub async fn options(&self, api: &Arc<dyn PropertyApi>, list: OptionList) -> Vec<OptionItem> {
        let fetched = self
            .inner
            .options
            .get_or_fetch(list, option_request(api, list))
            .await;
        Self::or_empty(list, fetched)
    }

    /// Fetches an option list again, bypassing and dropping the memoized one.
    pub async fn refresh_options(
        &self,
        api: &Arc<dyn PropertyApi>,
        list: OptionList,
    ) -> Vec<OptionItem> {
        let fetched = self
            .inner
            .options
            .fetch_fresh(list, option_request(api, list))
            .await;
        Self::or_empty(list, fetched)
    }

    fn or_empty(list: OptionList, fetched: Result<Vec<OptionItem>>) -> Vec<OptionItem> {
        fetched.unwrap_or_else(|e| {
            warn!("Failed to load {list:?} options: {e}");
            Vec::new()
        })
    }

    pub async fn caracteristicas(
        &self,
        api: &Arc<dyn PropertyApi>,
        escopo: CaracteristicaEscopo,
    ) -> Vec<OptionItem> {
        self.options(api, OptionList::Caracteristicas(escopo)).await
    }

    pub async fn proximidades(&self, api: &Arc<dyn PropertyApi>) -> Vec<OptionItem> {
        self.options(api, OptionList::Proximidades).await
    }

    pub async fn usuarios(&self, api: &Arc<dyn PropertyApi>) -> Vec<OptionItem> {
        self.options(api, OptionList::Usuarios).await
    }

    /// Reads one step, sharing the request with concurrent readers of the
    /// same property and step.
    pub async fn fetch_step(
        &self,
        api: &Arc<dyn PropertyApi>,
        id: PropertyId,
        step: StepId,
    ) -> Result<Option<StepPayload>> {
        let api = Arc::clone(api);
        self.inner
            .step_reads
            .dedupe((id, step), move || async move { api.get_step(id, step).await })
            .await
    }

    pub fn is_step_read_in_flight(&self, id: PropertyId, step: StepId) -> bool {
        self.inner.step_reads.is_in_flight(&(id, step))
    }

    /// Forgets every memoized option list.
    pub fn reset(&self) {
        self.inner.options.clear();
    }
}
