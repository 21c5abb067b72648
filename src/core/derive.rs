//! 由主要紀錄推導出的展示用狀態。全部是純函式。

use crate::domain::model::{ElementType, Generation, Height, SpriteSet, ThemePair, TypeSlot, Weight};

const POUNDS_PER_HECTOGRAM: f64 = 0.22046226;
const INCHES_PER_DECIMETER: f64 = 3.93700787;

/// 各世代 id 的上界（含）
const GENERATION_UPPER_BOUNDS: [(u32, Generation); 9] = [
    (151, Generation::I),
    (251, Generation::II),
    (386, Generation::III),
    (493, Generation::IV),
    (649, Generation::V),
    (721, Generation::VI),
    (809, Generation::VII),
    (905, Generation::VIII),
    (1021, Generation::IX),
];

/// 主題色：slot 1 為主，slot 2 為副；只有一個屬性時副 = 主
pub fn theme_pair(types: &[TypeSlot]) -> ThemePair {
    let main = types
        .iter()
        .find(|t| t.slot == 1)
        .or_else(|| types.iter().min_by_key(|t| t.slot))
        .map(|t| t.element)
        .unwrap_or(ElementType::Unknown);

    let sub = types
        .iter()
        .find(|t| t.slot == 2)
        .map(|t| t.element)
        .unwrap_or(main);

    ThemePair { main, sub }
}

/// 超出最後一個上界的 id 回傳 `None`，不視為錯誤
pub fn generation_label(id: u32) -> Option<Generation> {
    if id == 0 {
        return None;
    }
    GENERATION_UPPER_BOUNDS
        .iter()
        .find(|(upper, _)| id <= *upper)
        .map(|(_, generation)| *generation)
}

pub fn format_weight(hectograms: u32) -> Weight {
    let kilograms = f64::from(hectograms) / 10.0;
    let pounds = (f64::from(hectograms) * POUNDS_PER_HECTOGRAM * 10.0).round() / 10.0;
    Weight { kilograms, pounds }
}

pub fn format_height(decimeters: u32) -> Height {
    // 遠端資料可能是任意大小，乘法不可溢位
    let centimeters = decimeters.saturating_mul(10);
    let inches = (f64::from(decimeters) * INCHES_PER_DECIMETER).ceil() as u32;
    Height {
        centimeters,
        inches,
    }
}

pub fn has_distinct_gender_sprites(sprites: &SpriteSet) -> bool {
    sprites.front_female.is_some()
}
