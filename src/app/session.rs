use crate::core::identifier::{clamp_to_catalog, daily_id, random_id};
use crate::core::store::{LoadOutcome, ViewModelStore};
use crate::domain::model::PokemonQuery;
use crate::domain::ports::{Calendar, PokemonCatalog, RandomSource};
use crate::utils::error::FetchError;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;

/// 三個觸發動作（隨機、今日、最愛）的入口
pub struct Session<C: PokemonCatalog, R: RandomSource, K: Calendar> {
    store: ViewModelStore<C>,
    random: Mutex<R>,
    calendar: K,
    fallback_species_count: u32,
    favorite: u32,
    fetch_timeout: Duration,
    species_count: OnceCell<u32>,
}

impl<C: PokemonCatalog, R: RandomSource, K: Calendar> Session<C, R, K> {
    pub fn new(
        store: ViewModelStore<C>,
        random: R,
        calendar: K,
        fallback_species_count: u32,
        favorite: u32,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            random: Mutex::new(random),
            calendar,
            fallback_species_count: fallback_species_count.max(1),
            favorite,
            fetch_timeout,
            species_count: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &ViewModelStore<C> {
        &self.store
    }

    pub async fn request_random(&self) -> Result<LoadOutcome, FetchError> {
        let species_count = self.species_count().await;
        let id = {
            let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
            random_id(&mut *random, species_count)
        };
        tracing::info!("🎲 Random pick: #{}", id);
        self.store.load(PokemonQuery::Id(id)).await
    }

    pub async fn request_of_the_day(&self) -> Result<LoadOutcome, FetchError> {
        let today = self.calendar.today();
        let species_count = self.species_count().await;
        let id = clamp_to_catalog(daily_id(today), species_count);
        tracing::info!("📅 Pokemon of the day for {}: #{}", today, id);
        self.store.load(PokemonQuery::Id(id)).await
    }

    pub async fn request_favorite(&self) -> Result<LoadOutcome, FetchError> {
        let species_count = self.species_count().await;
        let id = clamp_to_catalog(self.favorite, species_count);
        tracing::info!("⭐ Favorite: #{}", id);
        self.store.load(PokemonQuery::Id(id)).await
    }

    pub async fn request_named(&self, query: PokemonQuery) -> Result<LoadOutcome, FetchError> {
        self.store.load(query).await
    }

    /// 第一次需要時向目錄查詢物種總數，失敗就用設定值；結果快取到 session 結束
    pub async fn species_count(&self) -> u32 {
        *self
            .species_count
            .get_or_init(|| async {
                let catalog = self.store.catalog();
                match tokio::time::timeout(self.fetch_timeout, catalog.species_count()).await {
                    Ok(Ok(count)) => {
                        tracing::debug!("Catalog reports {} species", count);
                        count
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            "⚠️ Species count unavailable ({}), using {}",
                            e,
                            self.fallback_species_count
                        );
                        self.fallback_species_count
                    }
                    Err(_) => {
                        tracing::warn!(
                            "⚠️ Species count timed out, using {}",
                            self.fallback_species_count
                        );
                        self.fallback_species_count
                    }
                }
            })
            .await
    }
}
