use crate::core::derive::{format_height, format_weight, has_distinct_gender_sprites};
use crate::core::store::{HeldItemsStatus, Snapshot};
use crate::domain::model::{
    Height, PrimaryRecord, ResolvedHeldItem, SpriteSet, StatEntry, ThemePair, TypeSlot, Weight,
};
use serde::Serialize;
use std::fmt;

/// 快照的可序列化視圖（`--json`）
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub id: u32,
    pub name: &'a str,
    pub generation: Option<&'static str>,
    pub theme: ThemePair,
    pub types: &'a [TypeSlot],
    pub stats: &'a [StatEntry],
    pub weight: Weight,
    pub height: Height,
    pub sprites: &'a SpriteSet,
    pub distinct_gender_sprites: bool,
    pub held_items_status: HeldItemsStatus,
    pub held_items: &'a [ResolvedHeldItem],
}

impl<'a> Report<'a> {
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Option<Self> {
        let record: &PrimaryRecord = snapshot.record()?;
        Some(Self {
            id: record.id,
            name: &record.name,
            generation: snapshot.generation().map(|g| g.label()),
            theme: snapshot.theme()?,
            types: &record.types,
            stats: &record.stats,
            weight: format_weight(record.weight),
            height: format_height(record.height),
            sprites: &record.sprites,
            distinct_gender_sprites: has_distinct_gender_sprites(&record.sprites),
            held_items_status: snapshot.held_items_status()?,
            held_items: snapshot.held_items(),
        })
    }
}

pub fn render_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    match Report::from_snapshot(snapshot) {
        Some(report) => serde_json::to_string_pretty(&report),
        None => Ok("null".to_string()),
    }
}

pub fn render_text(snapshot: &Snapshot) -> String {
    match Report::from_snapshot(snapshot) {
        Some(report) => report.to_string(),
        None => "No pokemon loaded yet.".to_string(),
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.id, self.name)?;
        writeln!(f, "{}", self.generation.unwrap_or("Unknown generation"))?;

        let types: Vec<&str> = self.types.iter().map(|t| t.element.as_str()).collect();
        writeln!(f, "Types: {}", types.join(" / "))?;
        writeln!(f, "Theme: {} / {}", self.theme.main, self.theme.sub)?;

        writeln!(f, "Base stats:")?;
        for stat in self.stats {
            writeln!(f, "  {:<16}{:>3}", format!("{}:", stat.name), stat.base_value)?;
        }

        writeln!(
            f,
            "Weight: {} kg ({:.1} lbs)",
            self.weight.kilograms, self.weight.pounds
        )?;
        writeln!(
            f,
            "Height: {} cm ({} inches)",
            self.height.centimeters, self.height.inches
        )?;

        if let Some(artwork) = &self.sprites.artwork_default {
            writeln!(f, "Artwork: {}", artwork)?;
        }
        if let Some(shiny) = &self.sprites.artwork_shiny {
            writeln!(f, "Shiny artwork: {}", shiny)?;
        }
        if self.distinct_gender_sprites {
            writeln!(f, "Has distinct female sprites")?;
        }

        // 失敗或沒有道具時整段不顯示
        match self.held_items_status {
            HeldItemsStatus::Loading => writeln!(f, "Held items: loading...")?,
            HeldItemsStatus::Failed => {}
            HeldItemsStatus::Ready if self.held_items.is_empty() => {}
            HeldItemsStatus::Ready => {
                writeln!(f, "Held items:")?;
                for item in self.held_items {
                    writeln!(f, "  {} ({})", item.name, item.sprite)?;
                }
            }
        }
        Ok(())
    }
}
