use crate::domain::model::{HeldItemReference, ResolvedHeldItem};
use crate::domain::ports::PokemonCatalog;
use crate::utils::error::{HeldItemsError, ItemFetchError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// 持有道具解析器：每個參照一個並行請求，全部成功才算成功
pub struct HeldItemResolver<C: PokemonCatalog> {
    catalog: Arc<C>,
    fetch_timeout: Duration,
}

impl<C: PokemonCatalog> Clone for HeldItemResolver<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<C: PokemonCatalog> HeldItemResolver<C> {
    pub fn new(catalog: Arc<C>, fetch_timeout: Duration) -> Self {
        Self {
            catalog,
            fetch_timeout,
        }
    }

    /// 結果順序與輸入順序一致，與完成順序無關。
    /// 任何一個子請求失敗，其餘的請求會被中止，整批回傳錯誤。
    pub async fn resolve_all(
        &self,
        references: &[HeldItemReference],
    ) -> Result<Vec<ResolvedHeldItem>, HeldItemsError> {
        let total = references.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        tracing::debug!("📦 Resolving {} held items", total);

        let mut join_set = JoinSet::new();
        for (index, reference) in references.iter().cloned().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            let fetch_timeout = self.fetch_timeout;
            join_set.spawn(async move {
                let result =
                    match tokio::time::timeout(fetch_timeout, catalog.fetch_item(&reference)).await
                    {
                        Ok(result) => result,
                        Err(_) => Err(ItemFetchError::network(
                            reference.url.clone(),
                            format!("timed out after {:?}", fetch_timeout),
                        )),
                    };
                (index, result)
            });
        }

        let mut slots: Vec<Option<ResolvedHeldItem>> = vec![None; total];
        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined.map_err(|e| HeldItemsError::Interrupted {
                total,
                message: e.to_string(),
            })?;

            match result {
                Ok(item) => slots[index] = Some(item),
                Err(source) => {
                    // 提早返回時 JoinSet 被 drop，剩下的任務一併中止
                    return Err(HeldItemsError::PartialFailure {
                        index,
                        total,
                        source,
                    });
                }
            }
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| HeldItemsError::Interrupted {
                total,
                message: "a held item task finished without a result".to_string(),
            })
    }
}
