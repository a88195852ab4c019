//! Geographic -> projected coordinate transformation.
//!
//! The projection maths is delegated to `proj4rs`. This module only builds
//! the source/destination definitions for the supported EPSG codes and calls
//! the library with the axis order it expects: (longitude, latitude) in
//! radians for geographic systems, (easting, northing) in metres back.

use crate::config::Epsg;
use crate::errors::TransformError;
use log::debug;
use proj4rs::proj::Proj;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Narrow seam around the projection library.
pub trait CoordinateTransformer {
    /// Returns (X, Y) in metres in `to` for a point given in degrees in `from`.
    fn transform(&mut self, from: Epsg, to: Epsg, latitude: f64, longitude: f64) -> Result<(f64, f64), TransformError>;
}

/// PROJ.4 definitions of the coordinate systems this tool handles.
pub fn proj_definition(epsg: Epsg) -> Option<&'static str> {
    match epsg.0 {
        4258 => Some("+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs"),
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs"),
        25829 => Some("+proj=utm +zone=29 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"),
        25830 => Some("+proj=utm +zone=30 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"),
        25831 => Some("+proj=utm +zone=31 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"),
        _ => None,
    }
}

fn build_proj(epsg: Epsg) -> Result<Proj, TransformError> {
    let definition = proj_definition(epsg).ok_or(TransformError::UnknownCrs(epsg))?;
    Proj::from_proj_string(definition).map_err(|e| TransformError::Definition {
        epsg,
        message: e.to_string(),
    })
}

struct TransformContext {
    from: Proj,
    to: Proj,
}

/// `proj4rs`-backed transformer. Contexts are built lazily and cached per
/// (source, destination) pair for the lifetime of the value; a failed
/// construction is not cached and is retried on the next row.
#[derive(Default)]
pub struct Proj4Transformer {
    contexts: HashMap<(Epsg, Epsg), TransformContext>,
}

impl Proj4Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct (source, destination) pairs built so far.
    pub fn cached_pairs(&self) -> usize {
        self.contexts.len()
    }

    fn context(&mut self, from: Epsg, to: Epsg) -> Result<&TransformContext, TransformError> {
        match self.contexts.entry((from, to)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!("Building transformation context {} -> {}", from, to);
                let context = TransformContext {
                    from: build_proj(from)?,
                    to: build_proj(to)?,
                };
                Ok(entry.insert(context))
            }
        }
    }
}

impl CoordinateTransformer for Proj4Transformer {
    fn transform(&mut self, from: Epsg, to: Epsg, latitude: f64, longitude: f64) -> Result<(f64, f64), TransformError> {
        let context = self.context(from, to)?;

        let mut point = (longitude.to_radians(), latitude.to_radians(), 0.0);
        proj4rs::transform::transform(&context.from, &context.to, &mut point).map_err(|e| {
            TransformError::Failed {
                from,
                to,
                message: e.to_string(),
            }
        })?;

        let (x, y, _) = point;
        if x.is_finite() && y.is_finite() {
            Ok((x, y))
        } else {
            Err(TransformError::NonFinite { from, to })
        }
    }
}
