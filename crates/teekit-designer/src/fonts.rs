//! Font resolution for text layers.
//!
//! Families are resolved through the system font database. Resolution is
//! cached per family; a family that cannot be matched falls back to the
//! generic sans-serif face, and only if that also fails does rendering
//! surface `RenderError::FontUnavailable`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use rusttype::Font;
use tracing::warn;

use teekit_core::RenderError;

/// Session-owned font database and resolution cache.
pub struct FontStore {
    db: Database,
    cache: Mutex<HashMap<String, Option<Arc<Font<'static>>>>>,
}

impl FontStore {
    /// Loads the system font database.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self {
            db,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// A store with no faces at all. Every resolution fails; used to test
    /// the error path deterministically.
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// All distinct family names known to the database, sorted. Feeds the
    /// font family picker.
    pub fn list_font_families(&self) -> Vec<String> {
        let mut set = HashSet::new();
        for face in self.db.faces() {
            for (name, _) in &face.families {
                set.insert(name.clone());
            }
        }
        let mut out: Vec<_> = set.into_iter().collect();
        out.sort();
        out
    }

    /// Resolves a family name to a loaded font face.
    pub fn resolve(&self, family: &str) -> Result<Arc<Font<'static>>, RenderError> {
        let key = family.trim().to_string();
        if let Some(cached) = self
            .cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&key)
        {
            return cached.clone().ok_or_else(|| RenderError::FontUnavailable {
                family: key.clone(),
            });
        }

        let loaded = self
            .load(&key)
            .or_else(|| {
                warn!(family = %key, "family not found, falling back to sans-serif");
                self.load("Sans")
            })
            .map(Arc::new);

        self.cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.clone(), loaded.clone());

        loaded.ok_or(RenderError::FontUnavailable { family: key })
    }

    fn load(&self, family: &str) -> Option<Font<'static>> {
        let families: Vec<Family<'_>> = match family {
            "" | "Sans" => vec![Family::SansSerif],
            "Serif" => vec![Family::Serif],
            "Monospace" => vec![Family::Monospace],
            other => vec![Family::Name(other), Family::SansSerif],
        };

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;

        match &face.source {
            Source::File(path) | Source::SharedFile(path, _) => {
                let bytes = std::fs::read(path).ok()?;
                Font::try_from_vec(bytes)
            }
            Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
        }
    }
}

impl std::fmt::Debug for FontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontStore")
            .field("faces", &self.db.len())
            .finish()
    }
}
