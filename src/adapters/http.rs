use crate::domain::model::{
    ElementType, HeldItemReference, PokemonQuery, PrimaryRecord, ResolvedHeldItem, SpriteSet,
    StatEntry, StatName, TypeSlot,
};
use crate::domain::ports::PokemonCatalog;
use crate::utils::error::{AppError, FetchError, ItemFetchError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<TypeSlotResponse>,
    stats: Vec<StatSlotResponse>,
    sprites: SpritesResponse,
    held_items: Vec<HeldItemSlotResponse>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeSlotResponse {
    slot: u8,
    #[serde(rename = "type")]
    type_info: TypeName,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeName {
    name: ElementType,
}

#[derive(Clone, Debug, Deserialize)]
struct StatSlotResponse {
    base_stat: u16,
    stat: StatNameResponse,
}

#[derive(Clone, Debug, Deserialize)]
struct StatNameResponse {
    name: StatName,
}

#[derive(Clone, Debug, Deserialize)]
struct SpritesResponse {
    front_default: Option<String>,
    front_shiny: Option<String>,
    front_female: Option<String>,
    front_shiny_female: Option<String>,
    back_default: Option<String>,
    back_shiny: Option<String>,
    back_female: Option<String>,
    back_shiny_female: Option<String>,
    other: Option<OtherSprites>,
}

#[derive(Clone, Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<ArtworkSprites>,
}

#[derive(Clone, Debug, Deserialize)]
struct ArtworkSprites {
    front_default: Option<String>,
    front_shiny: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct HeldItemSlotResponse {
    item: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct ItemResponse {
    name: String,
    sprites: ItemSprites,
}

#[derive(Clone, Debug, Deserialize)]
struct ItemSprites {
    default: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesListResponse {
    count: u32,
}

impl PokemonResponse {
    /// 驗證必要欄位後轉成領域模型
    fn into_record(self) -> std::result::Result<PrimaryRecord, String> {
        if self.id == 0 {
            return Err("id must be positive".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        if self.stats.is_empty() {
            return Err("no stats".to_string());
        }

        let mut types: Vec<TypeSlot> = self
            .types
            .into_iter()
            .map(|t| TypeSlot {
                slot: t.slot,
                element: t.type_info.name,
            })
            .collect();
        types.sort_by_key(|t| t.slot);

        if types.is_empty() {
            return Err("no types".to_string());
        }
        if types.iter().any(|t| t.slot != 1 && t.slot != 2) {
            return Err("type slot outside 1..=2".to_string());
        }
        if types.first().map(|t| t.slot) != Some(1) {
            return Err("missing primary type (slot 1)".to_string());
        }
        if types.windows(2).any(|pair| pair[0].slot == pair[1].slot) {
            return Err("duplicate type slot".to_string());
        }

        let artwork = self.sprites.other.and_then(|other| other.official_artwork);
        let sprites = SpriteSet {
            front_default: self.sprites.front_default,
            front_shiny: self.sprites.front_shiny,
            front_female: self.sprites.front_female,
            front_shiny_female: self.sprites.front_shiny_female,
            back_default: self.sprites.back_default,
            back_shiny: self.sprites.back_shiny,
            back_female: self.sprites.back_female,
            back_shiny_female: self.sprites.back_shiny_female,
            artwork_default: artwork.as_ref().and_then(|a| a.front_default.clone()),
            artwork_shiny: artwork.and_then(|a| a.front_shiny),
        };

        Ok(PrimaryRecord {
            id: self.id,
            name: self.name,
            types,
            stats: self
                .stats
                .into_iter()
                .map(|s| StatEntry {
                    name: s.stat.name,
                    base_value: s.base_stat,
                })
                .collect(),
            weight: self.weight,
            height: self.height,
            sprites,
            held_items: self
                .held_items
                .into_iter()
                .map(|h| HeldItemReference::new(h.item.url))
                .collect(),
        })
    }
}

/// PokeAPI 相容目錄的 HTTP 實作
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    client: Client,
    base_url: Url,
}

impl PokeApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("api_base", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| AppError::InvalidConfigValueError {
            field: "api_base".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder()
            .user_agent(concat!("pokeview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self { client, base_url })
    }

    /// 在基底路徑後面接上各段路徑，每段都做路徑百分比編碼
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http/https 一定可以當基底，不會走到 Err
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn pokemon_url(&self, query: &PokemonQuery) -> Url {
        match query {
            PokemonQuery::Id(id) => self.endpoint(&["pokemon", &id.to_string()]),
            PokemonQuery::Name(name) => self.endpoint(&["pokemon", name]),
        }
    }

    /// 單次 GET；非 2xx 也視為傳輸失敗
    async fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PokemonCatalog for PokeApiClient {
    async fn fetch_pokemon(&self, query: &PokemonQuery) -> std::result::Result<PrimaryRecord, FetchError> {
        let identifier = query.to_string();
        let body = self
            .get_bytes(self.pokemon_url(query).as_str())
            .await
            .map_err(|message| FetchError::network(identifier.clone(), message))?;

        let response: PokemonResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::malformed(identifier.clone(), e.to_string()))?;

        response
            .into_record()
            .map_err(|message| FetchError::malformed(identifier, message))
    }

    async fn fetch_item(
        &self,
        reference: &HeldItemReference,
    ) -> std::result::Result<ResolvedHeldItem, ItemFetchError> {
        let body = self
            .get_bytes(&reference.url)
            .await
            .map_err(|message| ItemFetchError::network(reference.url.clone(), message))?;

        let response: ItemResponse = serde_json::from_slice(&body)
            .map_err(|e| ItemFetchError::malformed(reference.url.clone(), e.to_string()))?;

        let sprite = response
            .sprites
            .default
            .ok_or_else(|| ItemFetchError::malformed(reference.url.clone(), "item has no sprite"))?;

        Ok(ResolvedHeldItem {
            name: response.name,
            sprite,
        })
    }

    async fn species_count(&self) -> std::result::Result<u32, FetchError> {
        let mut url = self.endpoint(&["pokemon-species"]);
        url.query_pairs_mut().append_pair("limit", "1");
        let body = self
            .get_bytes(url.as_str())
            .await
            .map_err(|message| FetchError::network("pokemon-species", message))?;

        let response: SpeciesListResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::malformed("pokemon-species", e.to_string()))?;

        if response.count == 0 {
            return Err(FetchError::malformed("pokemon-species", "catalog reports zero species"));
        }
        Ok(response.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur_json() -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "types": [
                {"slot": 2, "type": {"name": "poison", "url": "https://pokeapi.co/api/v2/type/4/"}},
                {"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}}
            ],
            "stats": [
                {"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": ""}},
                {"base_stat": 65, "effort": 1, "stat": {"name": "special-attack", "url": ""}}
            ],
            "sprites": {
                "front_default": "https://img/1.png",
                "front_shiny": "https://img/shiny/1.png",
                "front_female": null,
                "other": {
                    "official-artwork": {
                        "front_default": "https://img/art/1.png",
                        "front_shiny": "https://img/art/shiny/1.png"
                    }
                }
            },
            "held_items": []
        })
    }

    #[test]
    fn test_into_record_sorts_types_and_keeps_artwork() {
        let response: PokemonResponse = serde_json::from_value(bulbasaur_json()).unwrap();
        let record = response.into_record().unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.types[0].element, ElementType::Grass);
        assert_eq!(record.types[1].element, ElementType::Poison);
        assert_eq!(record.stats[1].name, StatName::SpecialAttack);
        assert_eq!(record.sprites.artwork_default.as_deref(), Some("https://img/art/1.png"));
        assert_eq!(record.sprites.back_default, None);
    }

    #[test]
    fn test_into_record_rejects_missing_primary_slot() {
        let mut json = bulbasaur_json();
        json["types"] = serde_json::json!([
            {"slot": 2, "type": {"name": "poison", "url": ""}}
        ]);
        let response: PokemonResponse = serde_json::from_value(json).unwrap();
        assert!(response.into_record().is_err());
    }

    #[test]
    fn test_into_record_rejects_empty_stats() {
        let mut json = bulbasaur_json();
        json["stats"] = serde_json::json!([]);
        let response: PokemonResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.into_record().unwrap_err(), "no stats");
    }

    #[test]
    fn test_missing_sprites_fails_to_decode() {
        let mut json = bulbasaur_json();
        json.as_object_mut().unwrap().remove("sprites");
        assert!(serde_json::from_value::<PokemonResponse>(json).is_err());
    }

    #[test]
    fn test_pokemon_url_trims_trailing_slash() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2/").unwrap();
        assert_eq!(
            client.pokemon_url(&PokemonQuery::Id(25)).as_str(),
            "https://pokeapi.co/api/v2/pokemon/25"
        );
        assert_eq!(
            client
                .pokemon_url(&PokemonQuery::Name("mr-mime".to_string()))
                .as_str(),
            "https://pokeapi.co/api/v2/pokemon/mr-mime"
        );
    }

    #[test]
    fn test_pokemon_url_percent_encodes_name_as_path_segment() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2").unwrap();
        assert_eq!(
            client
                .pokemon_url(&PokemonQuery::Name("mr mime".to_string()))
                .as_str(),
            "https://pokeapi.co/api/v2/pokemon/mr%20mime"
        );
        assert_eq!(
            client
                .pokemon_url(&PokemonQuery::Name("a+b/c".to_string()))
                .as_str(),
            "https://pokeapi.co/api/v2/pokemon/a+b%2Fc"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let client = PokeApiClient::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            client.endpoint(&["pokemon-species"]).as_str(),
            "http://127.0.0.1:8080/pokemon-species"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        assert!(PokeApiClient::new("not a url").is_err());
    }
}
