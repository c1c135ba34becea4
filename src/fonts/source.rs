// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font file data held by a face under construction

use super::FontError;
use crate::conv::{LineMetrics, DPU};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::fmt;

/// Raw data of a font file
///
/// A [`Face`](super::Face) holds its source only while it is active (between
/// [`Font::start_face`](super::Font::start_face) and
/// [`FaceBuilder::finish`](super::FaceBuilder::finish)); the source is passed
/// to the [`GlyphBaker`](super::GlyphBaker) for each bake.
///
/// The data is opaque to this library except for reading underline metrics,
/// which is attempted when the data parses as an OpenType font.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FaceSource {
    data: Vec<u8>,
    index: u32,
}

impl fmt::Debug for FaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceSource")
            .field("len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FaceSource {
    /// Construct from file contents and a face index within the file
    pub fn new(data: Vec<u8>, index: u32) -> Self {
        FaceSource { data, index }
    }

    /// Load the best match for `family` and style from a font database
    ///
    /// Matching follows `fontdb`'s CSS-like rules; the file contents of the
    /// matched face are copied.
    pub fn from_database(
        db: &Database,
        family: Family<'_>,
        bold: bool,
        italic: bool,
    ) -> Result<Self, FontError> {
        let families = [family];
        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: if italic { Style::Italic } else { Style::Normal },
        };
        let id = db.query(&query).ok_or(FontError::NoFontMatch)?;
        if let Some(face) = db.face(id) {
            log::debug!("matched font face: {:?}", face.post_script_name);
        }
        db.with_face_data(id, |data, index| FaceSource::new(data.to_vec(), index))
            .ok_or(FontError::NoFontMatch)
    }

    /// File contents
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Face index within a font collection file
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Parse the data as an OpenType face
    pub fn parse(&self) -> Result<ttf_parser::Face<'_>, FontError> {
        Ok(ttf_parser::Face::parse(&self.data, self.index)?)
    }

    /// Underline metrics scaled to a face of `size` points
    ///
    /// Returns `None` if the data is not a parseable font or has no metrics.
    pub fn underline_metrics(&self, size: i32) -> Option<LineMetrics> {
        let face = match self.parse() {
            Ok(face) => face,
            Err(err) => {
                log::debug!("no underline metrics from font source: {err}");
                return None;
            }
        };
        let dpu = DPU::for_size(size, face.units_per_em());
        face.underline_metrics().map(|m| dpu.to_line_metrics(m))
    }
}
