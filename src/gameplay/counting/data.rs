use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::part::CountingPart;
use crate::activity::part::PartKind;
use crate::core::config::{ActivityConfig, CountingConfig, SkinConfig};

/// Skins and the orders in which they get counted.
#[derive(Debug, Clone, Default)]
pub struct CountingActivityData {
    skins: Vec<SkinConfig>,
    orderings: Vec<Vec<String>>,
    cursor: usize,
}

impl CountingActivityData {
    pub fn new(skins: Vec<SkinConfig>, orderings: Vec<Vec<String>>) -> Self {
        Self {
            skins,
            orderings,
            cursor: 0,
        }
    }

    pub fn from_config(cfg: &ActivityConfig) -> Self {
        Self::new(cfg.skins.clone(), cfg.orderings.clone())
    }

    pub fn skins(&self) -> &[SkinConfig] {
        &self.skins
    }

    /// Next ordering of skins. The list is reshuffled each time a cycle restarts.
    pub fn next_ordering<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<String> {
        if self.orderings.is_empty() {
            error!(target: "counting", "no orderings defined for the counting activity");
            return Vec::new();
        }
        if self.cursor == 0 {
            self.orderings.shuffle(rng);
        }
        let ordering = self.orderings[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.orderings.len();
        ordering
    }

    /// Visuals for a skin, falling back to the first skin when the name is unknown.
    pub fn visuals_for_skin(&self, name: &str) -> SkinConfig {
        let Some(first) = self.skins.first() else {
            error!(target: "counting", "no skins defined; using the default skin");
            return SkinConfig::default();
        };
        match self.skins.iter().find(|s| s.name == name) {
            Some(skin) => skin.clone(),
            None => {
                let available: Vec<&str> = self.skins.iter().map(|s| s.name.as_str()).collect();
                error!(
                    target: "counting",
                    "skin '{name}' is not defined; available: {}", available.join(", ")
                );
                first.clone()
            }
        }
    }
}

/// One counting part per skin in `ordering`, each with its own seed.
pub fn build_counting_parts<K: PartKind, R: Rng + ?Sized>(
    data: &CountingActivityData,
    ordering: &[String],
    kind: K,
    config: &CountingConfig,
    object_count: usize,
    rng: &mut R,
) -> Vec<Box<CountingPart<K>>> {
    ordering
        .iter()
        .map(|name| {
            let skin = data.visuals_for_skin(name);
            let mut part = CountingPart::new(kind, config.clone(), rng.gen());
            part.set_initial_data(object_count, skin.center_visual, skin.palette);
            Box::new(part)
        })
        .collect()
}
