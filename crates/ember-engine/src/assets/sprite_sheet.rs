//! Texture-atlas description (TexturePacker "JSON (Array)" layout).
//!
//! ```json
//! {
//!   "frames": [
//!     { "frame": {"x":0,"y":0,"w":32,"h":48}, "rotated": false,
//!       "sourceSize": {"w":40,"h":48}, "spriteSourceSize": {"x":4,"y":0},
//!       "pivot": {"x":0.5,"y":0.5} }
//!   ],
//!   "meta": { "image": "hero.png", "size": {"w":256,"h":256} }
//! }
//! ```
//!
//! Unknown keys are ignored. `pivot` defaults to the frame center.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::coords::{Rect, Size2, Vec2};

use super::LoadError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpriteSheet {
    pub frames: Vec<SheetFrame>,
    pub meta: SheetMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetMeta {
    /// Atlas image name, resolved through the resource cache.
    pub image: String,
    /// Atlas size in pixels.
    pub size: SheetSize,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct SheetSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct SheetRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct SheetOffset {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct SheetPivot {
    pub x: f32,
    pub y: f32,
}

impl Default for SheetPivot {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetFrame {
    #[serde(default)]
    pub filename: Option<String>,
    /// Pixel rectangle inside the atlas. For rotated frames `w`/`h` are the
    /// unrotated sprite dimensions.
    pub frame: SheetRect,
    pub rotated: bool,
    #[serde(rename = "sourceSize")]
    pub source_size: SheetSize,
    #[serde(rename = "spriteSourceSize")]
    pub sprite_source_size: SheetOffset,
    #[serde(default)]
    pub pivot: SheetPivot,
}

impl SheetFrame {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.frame.x as f32,
            self.frame.y as f32,
            self.frame.w as f32,
            self.frame.h as f32,
        )
    }

    pub fn source_size(&self) -> Size2 {
        Size2::new(self.source_size.w as f32, self.source_size.h as f32)
    }

    /// Trim offset of the packed pixels inside the original image.
    pub fn source_offset(&self) -> Vec2 {
        Vec2::new(self.sprite_source_size.x as f32, self.sprite_source_size.y as f32)
    }

    pub fn pivot(&self) -> Vec2 {
        Vec2::new(self.pivot.x, self.pivot.y)
    }
}

impl SpriteSheet {
    /// Parses a sheet from JSON text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads and parses a sheet file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })
    }

    /// Component-wise maximum of every frame's untrimmed size.
    pub fn max_source_size(&self) -> Size2 {
        self.frames
            .iter()
            .map(SheetFrame::source_size)
            .fold(Size2::default(), Size2::max)
    }

    pub fn atlas_size(&self) -> Size2 {
        Size2::new(self.meta.size.w as f32, self.meta.size.h as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "frames": [
            { "filename": "a", "frame": {"x":0,"y":0,"w":16,"h":32}, "rotated": false, "trimmed": true,
              "sourceSize": {"w":20,"h":32}, "spriteSourceSize": {"x":2,"y":0,"w":16,"h":32},
              "pivot": {"x":0.25,"y":1.0} },
            { "frame": {"x":16,"y":0,"w":24,"h":8}, "rotated": true,
              "sourceSize": {"w":24,"h":40}, "spriteSourceSize": {"x":0,"y":3} }
        ],
        "meta": { "app": "packer", "image": "atlas.png", "size": {"w":64,"h":64} }
    }"#;

    #[test]
    fn parses_frames_and_meta() {
        let sheet = SpriteSheet::parse(SHEET).unwrap();
        assert_eq!(sheet.frames.len(), 2);
        assert_eq!(sheet.meta.image, "atlas.png");
        assert_eq!(sheet.atlas_size(), Size2::new(64.0, 64.0));

        let a = &sheet.frames[0];
        assert_eq!(a.filename.as_deref(), Some("a"));
        assert_eq!(a.rect(), Rect::new(0.0, 0.0, 16.0, 32.0));
        assert_eq!(a.source_offset(), Vec2::new(2.0, 0.0));
        assert_eq!(a.pivot(), Vec2::new(0.25, 1.0));
        assert!(sheet.frames[1].rotated);
    }

    #[test]
    fn missing_pivot_defaults_to_center() {
        let sheet = SpriteSheet::parse(SHEET).unwrap();
        assert_eq!(sheet.frames[1].pivot(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn max_source_size_is_component_wise() {
        let sheet = SpriteSheet::parse(SHEET).unwrap();
        assert_eq!(sheet.max_source_size(), Size2::new(24.0, 40.0));
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let text = r#"{ "frames": [ { "frame": {"x":0,"y":0,"w":1,"h":1}, "rotated": false,
                       "spriteSourceSize": {"x":0,"y":0} } ],
                       "meta": { "image": "a.png", "size": {"w":1,"h":1} } }"#;
        assert!(SpriteSheet::parse(text).is_err());
    }

    #[test]
    fn missing_meta_is_an_error() {
        assert!(SpriteSheet::parse(r#"{ "frames": [] }"#).is_err());
    }

    #[test]
    fn load_reports_io_and_parse_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(SpriteSheet::load(&missing), Err(LoadError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(SpriteSheet::load(&broken), Err(LoadError::Parse { .. })));

        let good = dir.path().join("good.json");
        std::fs::write(&good, SHEET).unwrap();
        assert_eq!(SpriteSheet::load(&good).unwrap().frames.len(), 2);
    }
}
