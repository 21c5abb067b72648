#![allow(dead_code)]

use async_trait::async_trait;
use pokeview::core::PokemonCatalog;
use pokeview::domain::model::{
    ElementType, HeldItemReference, PokemonQuery, PrimaryRecord, ResolvedHeldItem, SpriteSet,
    StatEntry, StatName, TypeSlot,
};
use pokeview::domain::ports::RandomSource;
use pokeview::{FetchError, ItemFetchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// In-memory catalog with optional gates so tests control completion order.
#[derive(Default)]
pub struct ScriptedCatalog {
    pokemon: HashMap<PokemonQuery, Result<PrimaryRecord, FetchError>>,
    items: HashMap<String, Result<ResolvedHeldItem, ItemFetchError>>,
    pokemon_gates: HashMap<PokemonQuery, Arc<Notify>>,
    item_gates: HashMap<String, Arc<Notify>>,
    species_count: Option<Result<u32, FetchError>>,
    pub pokemon_calls: AtomicUsize,
    pub item_calls: AtomicUsize,
    pub items_completed: AtomicUsize,
    pub species_count_calls: AtomicUsize,
    pub requested: Mutex<Vec<PokemonQuery>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pokemon(mut self, record: PrimaryRecord) -> Self {
        self.pokemon
            .insert(PokemonQuery::Id(record.id), Ok(record.clone()));
        self.pokemon
            .insert(PokemonQuery::Name(record.name.clone()), Ok(record));
        self
    }

    pub fn with_pokemon_error(mut self, query: PokemonQuery, error: FetchError) -> Self {
        self.pokemon.insert(query, Err(error));
        self
    }

    pub fn with_item(mut self, url: &str, item: ResolvedHeldItem) -> Self {
        self.items.insert(url.to_string(), Ok(item));
        self
    }

    pub fn with_item_error(mut self, url: &str) -> Self {
        self.items.insert(
            url.to_string(),
            Err(ItemFetchError::network(url, "HTTP 500 Internal Server Error")),
        );
        self
    }

    pub fn with_pokemon_gate(mut self, query: PokemonQuery, gate: Arc<Notify>) -> Self {
        self.pokemon_gates.insert(query, gate);
        self
    }

    pub fn with_item_gate(mut self, url: &str, gate: Arc<Notify>) -> Self {
        self.item_gates.insert(url.to_string(), gate);
        self
    }

    pub fn with_species_count(mut self, count: Result<u32, FetchError>) -> Self {
        self.species_count = Some(count);
        self
    }

    pub fn requested(&self) -> Vec<PokemonQuery> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PokemonCatalog for ScriptedCatalog {
    async fn fetch_pokemon(&self, query: &PokemonQuery) -> Result<PrimaryRecord, FetchError> {
        self.pokemon_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(query.clone());

        if let Some(gate) = self.pokemon_gates.get(query) {
            gate.notified().await;
        }

        self.pokemon
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::network(query.to_string(), "HTTP 404 Not Found")))
    }

    async fn fetch_item(
        &self,
        reference: &HeldItemReference,
    ) -> Result<ResolvedHeldItem, ItemFetchError> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = self.item_gates.get(&reference.url) {
            gate.notified().await;
        }

        let result = self
            .items
            .get(&reference.url)
            .cloned()
            .unwrap_or_else(|| Err(ItemFetchError::network(reference.url.clone(), "HTTP 404")));
        self.items_completed.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn species_count(&self) -> Result<u32, FetchError> {
        self.species_count_calls.fetch_add(1, Ordering::SeqCst);
        self.species_count
            .clone()
            .unwrap_or_else(|| Err(FetchError::network("pokemon-species", "not scripted")))
    }
}

/// Random source that always returns the same value and remembers the bounds.
pub struct FixedRandom {
    pub value: u32,
    pub bounds: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl FixedRandom {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            bounds: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RandomSource for FixedRandom {
    fn pick(&mut self, low: u32, high: u32) -> u32 {
        self.bounds.lock().unwrap().push((low, high));
        self.value
    }
}

pub fn record(id: u32, name: &str, types: &[ElementType], held_items: &[&str]) -> PrimaryRecord {
    PrimaryRecord {
        id,
        name: name.to_string(),
        types: types
            .iter()
            .enumerate()
            .map(|(i, element)| TypeSlot {
                slot: (i + 1) as u8,
                element: *element,
            })
            .collect(),
        stats: vec![
            StatEntry {
                name: StatName::Hp,
                base_value: 45,
            },
            StatEntry {
                name: StatName::Speed,
                base_value: 90,
            },
        ],
        weight: 100,
        height: 7,
        sprites: SpriteSet {
            front_default: Some(format!("https://img.example.com/{}.png", id)),
            ..SpriteSet::default()
        },
        held_items: held_items
            .iter()
            .map(|url| HeldItemReference::new(*url))
            .collect(),
    }
}

pub fn item(name: &str) -> ResolvedHeldItem {
    ResolvedHeldItem {
        name: name.to_string(),
        sprite: format!("https://img.example.com/items/{}.png", name),
    }
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
