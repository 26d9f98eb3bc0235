use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use tracing::warn;

/// Font bytes plus the face index within them (non-zero for collections).
#[derive(Clone, Debug)]
pub struct FontHandle {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
}

/// Process-wide registry of font files, keyed by path.
///
/// Populated on first use, never evicted. Registration is idempotent; a
/// concurrent first-use race costs at most one redundant file read.
static REGISTERED_FONTS: OnceLock<Mutex<HashMap<PathBuf, Arc<Vec<u8>>>>> = OnceLock::new();

static FALLBACK_SERIF: OnceLock<Option<FontHandle>> = OnceLock::new();

/// Register (or look up) the font file at `path`.
///
/// Returns `None` when the file cannot be read; the failure is logged and
/// the caller falls back to the generic serif.
pub fn register_font(path: &Path) -> Option<FontHandle> {
    let map = REGISTERED_FONTS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = map.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(bytes) = guard.get(path) {
        return Some(FontHandle {
            bytes: bytes.clone(),
            index: 0,
        });
    }

    match std::fs::read(path) {
        Ok(bytes) => {
            let bytes = Arc::new(bytes);
            guard.insert(path.to_path_buf(), bytes.clone());
            Some(FontHandle { bytes, index: 0 })
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "font file unreadable; using fallback serif");
            None
        }
    }
}

/// Resolve a generic system serif face once per process.
///
/// Used whenever a brand declares no custom font or its file is unreadable.
pub fn fallback_serif() -> Option<FontHandle> {
    FALLBACK_SERIF
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();

            let families = [
                usvg::fontdb::Family::Serif,
                usvg::fontdb::Family::SansSerif,
            ];
            let id = families
                .iter()
                .find_map(|family| {
                    db.query(&usvg::fontdb::Query {
                        families: &[*family],
                        weight: usvg::fontdb::Weight(400),
                        stretch: usvg::fontdb::Stretch::Normal,
                        style: usvg::fontdb::Style::Normal,
                    })
                })
                .or_else(|| db.faces().next().map(|f| f.id));

            let id = match id {
                Some(id) => id,
                None => {
                    warn!("no system fonts available; text layers will be skipped");
                    return None;
                }
            };

            db.with_face_data(id, |data, index| FontHandle {
                bytes: Arc::new(data.to_vec()),
                index,
            })
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn registration_is_idempotent_per_path() {
        let dir = std::env::temp_dir().join("plakat_font_reg_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fake-font.ttf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"\x00\x01\x00\x00fontish").unwrap();

        let a = register_font(&path).unwrap();
        // Mutate the file; the registry must keep serving the first read.
        std::fs::write(&path, b"changed").unwrap();
        let b = register_font(&path).unwrap();
        assert!(Arc::ptr_eq(&a.bytes, &b.bytes));
    }

    #[test]
    fn missing_font_returns_none() {
        assert!(register_font(Path::new("/definitely/not/here.ttf")).is_none());
    }
}
