use crate::domain::model::{HeldItemReference, PokemonQuery, PrimaryRecord, ResolvedHeldItem};
use crate::utils::error::{FetchError, ItemFetchError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

/// 遠端寶可夢目錄（唯讀）
#[async_trait]
pub trait PokemonCatalog: Send + Sync + 'static {
    /// 抓取一筆完整且已驗證的主要紀錄
    async fn fetch_pokemon(&self, query: &PokemonQuery) -> Result<PrimaryRecord, FetchError>;

    /// 依參照網址抓取單一持有道具的名稱與圖片
    async fn fetch_item(
        &self,
        reference: &HeldItemReference,
    ) -> Result<ResolvedHeldItem, ItemFetchError>;

    /// 目錄目前已知的物種總數
    async fn species_count(&self) -> Result<u32, FetchError>;
}

/// 可注入的亂數來源，回傳 `[low, high]` 內的整數
pub trait RandomSource: Send {
    fn pick(&mut self, low: u32, high: u32) -> u32;
}

/// 可注入的「今天」
pub trait Calendar: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn fetch_timeout(&self) -> Duration;
    fn species_count(&self) -> u32;
    fn favorite_id(&self) -> u32;
}
