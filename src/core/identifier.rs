use crate::domain::ports::RandomSource;
use chrono::{Datelike, NaiveDate};

/// 固定的最愛寶可夢（Pikachu）
pub const FAVORITE_ID: u32 = 25;

/// 在 `[1, species_count]` 內均勻抽一個 id
pub fn random_id<R: RandomSource + ?Sized>(random: &mut R, species_count: u32) -> u32 {
    let upper = species_count.max(1);
    random.pick(1, upper)
}

/// 「今日寶可夢」：星期（週一 = 1）× 日 × 季，每天換一次，大約一年一個循環。
///
/// 不保證分布均勻，也不避免碰撞；只求每天不同。
pub fn daily_id(date: NaiveDate) -> u32 {
    let weekday = date.weekday().number_from_monday();
    let day_of_month = date.day();
    let quarter = date.month0() / 3 + 1;
    weekday * day_of_month * quarter
}

pub const fn favorite_id() -> u32 {
    FAVORITE_ID
}

/// 呼叫端在抓取前把 id 夾回目錄範圍
pub fn clamp_to_catalog(id: u32, species_count: u32) -> u32 {
    id.clamp(1, species_count.max(1))
}
