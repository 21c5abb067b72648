use serde::{Deserialize, Serialize};
use std::fmt;

/// 元素屬性（固定列舉）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    Stellar,
    Shadow,
    Unknown,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Electric => "electric",
            Self::Grass => "grass",
            Self::Ice => "ice",
            Self::Fighting => "fighting",
            Self::Poison => "poison",
            Self::Ground => "ground",
            Self::Flying => "flying",
            Self::Psychic => "psychic",
            Self::Bug => "bug",
            Self::Rock => "rock",
            Self::Ghost => "ghost",
            Self::Dragon => "dragon",
            Self::Dark => "dark",
            Self::Steel => "steel",
            Self::Fairy => "fairy",
            Self::Stellar => "stellar",
            Self::Shadow => "shadow",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    /// 1 = 主屬性，2 = 副屬性
    pub slot: u8,
    pub element: ElementType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl StatName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpecialAttack => "special-attack",
            Self::SpecialDefense => "special-defense",
            Self::Speed => "speed",
            Self::Accuracy => "accuracy",
            Self::Evasion => "evasion",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: StatName,
    pub base_value: u16,
}

/// 圖片網址集合，每個欄位都可能缺少
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub front_female: Option<String>,
    pub front_shiny_female: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
    pub back_female: Option<String>,
    pub back_shiny_female: Option<String>,
    pub artwork_default: Option<String>,
    pub artwork_shiny: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldItemReference {
    pub url: String,
}

impl HeldItemReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHeldItem {
    pub name: String,
    pub sprite: String,
}

/// 一隻寶可夢的完整紀錄；抓取後不可變，每次新抓取整筆替換
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryRecord {
    pub id: u32,
    pub name: String,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatEntry>,
    /// 單位：0.1 公斤（hectograms）
    pub weight: u32,
    /// 單位：0.1 公尺（decimeters）
    pub height: u32,
    pub sprites: SpriteSet,
    pub held_items: Vec<HeldItemReference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePair {
    pub main: ElementType,
    pub sub: ElementType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    IX,
}

impl Generation {
    pub const ALL: [Generation; 9] = [
        Self::I,
        Self::II,
        Self::III,
        Self::IV,
        Self::V,
        Self::VI,
        Self::VII,
        Self::VIII,
        Self::IX,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::I => "Generation I (Kanto)",
            Self::II => "Generation II (Johto)",
            Self::III => "Generation III (Hoenn)",
            Self::IV => "Generation IV (Sinnoh)",
            Self::V => "Generation V (Unova)",
            Self::VI => "Generation VI (Kalos)",
            Self::VII => "Generation VII (Alola)",
            Self::VIII => "Generation VIII (Galar)",
            Self::IX => "Generation IX (Paldea)",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weight {
    pub kilograms: f64,
    pub pounds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Height {
    pub centimeters: u32,
    pub inches: u32,
}

/// 要向目錄查詢的寶可夢：數字 id 或名稱
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokemonQuery {
    Id(u32),
    Name(String),
}

impl PokemonQuery {
    /// 解析使用者輸入：純數字視為 id，其餘視為名稱（轉小寫）
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u32>() {
            Ok(0) => None,
            Ok(id) => Some(Self::Id(id)),
            Err(_) => Some(Self::Name(trimmed.to_lowercase())),
        }
    }
}

impl From<u32> for PokemonQuery {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for PokemonQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => f.write_str(name),
        }
    }
}
