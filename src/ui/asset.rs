/// Asset provider: text sprites loaded from `<assets_dir>/<name>.txt`.
///
/// A sprite file is plain text, one row per line; a space is transparent.
/// The sprite is stretched to whatever pixel size the caller asks for, so
/// the same file serves the 100px selection card and the 50px player.
///
/// Loading never fails from the caller's point of view: any problem is
/// logged at debug level and reported as `Asset::Unavailable`, and the
/// scene draws a primitive instead.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset file {0} not found")]
    Missing(PathBuf),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("asset file {0} has no visible glyphs")]
    Empty(PathBuf),
    #[error("cannot scale to {w}x{h}")]
    BadSize { w: f32, h: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    cols: usize,
    /// Target size in logical pixels.
    pub size: (f32, f32),
}

impl Sprite {
    /// Parse sprite text. Rows are padded to the widest line.
    /// Returns `None` if nothing visible remains.
    pub fn parse(text: &str, size: (f32, f32)) -> Option<Sprite> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|l| l.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(|r| r.iter().all(|c| *c == ' ')) {
            rows.pop();
        }
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if cols == 0 || rows.iter().flatten().all(|c| *c == ' ') {
            return None;
        }
        for row in &mut rows {
            row.resize(cols, ' ');
        }
        Some(Sprite { rows, cols, size })
    }

    /// Glyph at normalised coordinates `(u, v)` in `[0, 1)`.
    /// `None` for transparent cells or out-of-range coordinates.
    pub fn sample(&self, u: f32, v: f32) -> Option<char> {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let col = ((u * self.cols as f32) as usize).min(self.cols - 1);
        let row = ((v * self.rows.len() as f32) as usize).min(self.rows.len() - 1);
        match self.rows[row][col] {
            ' ' => None,
            ch => Some(ch),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Asset {
    Image(Rc<Sprite>),
    Unavailable,
}

pub struct AssetProvider {
    dir: PathBuf,
    cache: HashMap<(String, u32, u32), Asset>,
}

impl AssetProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        AssetProvider {
            dir: dir.as_ref().to_path_buf(),
            cache: HashMap::new(),
        }
    }

    /// Load `name` scaled to `size`. Cached per (name, size), including failures.
    pub fn load(&mut self, name: &str, size: (f32, f32)) -> Asset {
        let key = (name.to_string(), size.0.round() as u32, size.1.round() as u32);
        if let Some(asset) = self.cache.get(&key) {
            return asset.clone();
        }
        let asset = match self.read(name, size) {
            Ok(sprite) => Asset::Image(Rc::new(sprite)),
            Err(e) => {
                log::debug!("asset '{name}' unavailable: {e}");
                Asset::Unavailable
            }
        };
        self.cache.insert(key, asset.clone());
        asset
    }

    fn read(&self, name: &str, size: (f32, f32)) -> Result<Sprite, AssetError> {
        if !(size.0 >= 1.0 && size.1 >= 1.0) {
            return Err(AssetError::BadSize { w: size.0, h: size.1 });
        }
        let path = self.dir.join(format!("{name}.txt"));
        let text = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::Missing(path.clone()),
            _ => AssetError::Io { path: path.clone(), source },
        })?;
        Sprite::parse(&text, size).ok_or(AssetError::Empty(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("coin-collector-assets-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parse_pads_rows_and_drops_trailing_blank_lines() {
        let s = Sprite::parse("ab\na\n   \n", (10.0, 10.0)).unwrap();
        assert_eq!((s.cols, s.rows.len()), (2, 2));
        assert_eq!(s.sample(0.75, 0.75), None);
        assert_eq!(s.sample(0.25, 0.75), Some('a'));
    }

    #[test]
    fn blank_text_is_not_a_sprite() {
        assert!(Sprite::parse("", (10.0, 10.0)).is_none());
        assert!(Sprite::parse("   \n  ", (10.0, 10.0)).is_none());
    }

    #[test]
    fn sample_outside_unit_square_is_transparent() {
        let s = Sprite::parse("#", (10.0, 10.0)).unwrap();
        assert_eq!(s.sample(0.5, 0.5), Some('#'));
        assert_eq!(s.sample(1.0, 0.5), None);
        assert_eq!(s.sample(-0.1, 0.5), None);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = scratch_dir("missing");
        let mut assets = AssetProvider::new(&dir);
        assert_eq!(assets.load("coin", (45.0, 45.0)), Asset::Unavailable);
    }

    #[test]
    fn existing_file_loads_and_is_cached() {
        let dir = scratch_dir("cached");
        fs::write(dir.join("coin.txt"), " o \n(o)\n o \n").unwrap();
        let mut assets = AssetProvider::new(&dir);
        let first = assets.load("coin", (45.0, 45.0));
        let Asset::Image(sprite) = &first else { panic!("expected image") };
        assert_eq!(sprite.size, (45.0, 45.0));

        // Removing the file does not affect the cached entry
        fs::remove_file(dir.join("coin.txt")).unwrap();
        assert_eq!(assets.load("coin", (45.0, 45.0)), first);
        // but a different size is a separate entry
        assert_eq!(assets.load("coin", (90.0, 90.0)), Asset::Unavailable);
    }

    #[test]
    fn empty_file_and_zero_size_are_unavailable() {
        let dir = scratch_dir("empty");
        fs::write(dir.join("cat.txt"), "\n\n").unwrap();
        fs::write(dir.join("cute.txt"), "^_^").unwrap();
        let mut assets = AssetProvider::new(&dir);
        assert_eq!(assets.load("cat", (50.0, 50.0)), Asset::Unavailable);
        assert_eq!(assets.load("cute", (0.0, 50.0)), Asset::Unavailable);
        assert!(matches!(assets.load("cute", (50.0, 50.0)), Asset::Image(_)));
    }
}
