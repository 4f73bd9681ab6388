//! On-disk geometry cache and source contract for country boundaries.
//!
//! Downloading administrative boundaries is a collaborator concern; this
//! module pins down the boundary between that collaborator and the coverage
//! core. A [`CountryGeometrySource`] is whatever can produce a boundary
//! multipolygon for an ISO3 code; [`GeometryCache`] is an explicit object
//! with an init/lookup/store contract (no hidden process-wide state), so
//! coverage computation itself stays a pure function of its inputs.
//!
//! Cache entries are plain GeoJSON geometries, one file per
//! `(code, admin_level)` pair, readable by any GIS tool.

use std::fs;
use std::path::{Path, PathBuf};

use geo::MultiPolygon;
use geojson::GeoJson;
use log::debug;

use crate::error::{GeocoverError, Result};

/// Anything that can produce a country boundary in lon/lat degrees.
///
/// Implemented by downloading collaborators outside this crate; the core
/// only ever consumes the returned geometry.
pub trait CountryGeometrySource {
    /// Fetch the boundary multipolygon for an ISO3 country code at the
    /// given administrative level.
    fn fetch(&self, iso3: &str, admin_level: u8) -> Result<MultiPolygon<f64>>;
}

/// Directory-backed GeoJSON cache keyed by `(ISO3 code, admin level)`.
#[derive(Debug, Clone)]
pub struct GeometryCache {
    dir: PathBuf,
}

impl GeometryCache {
    /// Open (and create if needed) a cache directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, iso3: &str, admin_level: u8) -> PathBuf {
        self.dir.join(format!(
            "{}_adm{}.geojson",
            iso3.to_ascii_uppercase(),
            admin_level
        ))
    }

    /// Look up a cached boundary, if present.
    ///
    /// A missing entry is `Ok(None)`; an entry that exists but cannot be
    /// parsed back into a multipolygon is a [`GeocoverError::Cache`] error
    /// rather than a silent miss, so corruption never causes re-downloads
    /// to mask it.
    pub fn lookup(&self, iso3: &str, admin_level: u8) -> Result<Option<MultiPolygon<f64>>> {
        let path = self.entry_path(iso3, admin_level);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let geojson: GeoJson = raw
            .parse()
            .map_err(|e| GeocoverError::Cache(format!("{}: {}", path.display(), e)))?;
        let GeoJson::Geometry(geometry) = geojson else {
            return Err(GeocoverError::Cache(format!(
                "{}: expected a bare GeoJSON geometry",
                path.display()
            )));
        };
        let multipolygon = MultiPolygon::try_from(geometry.value)
            .map_err(|e| GeocoverError::Cache(format!("{}: {}", path.display(), e)))?;
        Ok(Some(multipolygon))
    }

    /// Write a boundary into the cache, replacing any previous entry.
    pub fn store(&self, iso3: &str, admin_level: u8, geometry: &MultiPolygon<f64>) -> Result<()> {
        let path = self.entry_path(iso3, admin_level);
        let geojson = GeoJson::Geometry(geojson::Geometry::new(geojson::Value::from(geometry)));
        let raw = serde_json::to_string(&geojson)
            .map_err(|e| GeocoverError::Cache(format!("{}: {}", path.display(), e)))?;
        fs::write(&path, raw)?;
        Ok(())
    }
}

/// A source wrapped with lookup-then-fetch-then-store caching.
#[derive(Debug, Clone)]
pub struct CachedCountrySource<S> {
    source: S,
    cache: GeometryCache,
}

impl<S> CachedCountrySource<S> {
    /// Wrap a source with a cache.
    pub fn new(source: S, cache: GeometryCache) -> Self {
        Self { source, cache }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }
}

impl<S: CountryGeometrySource> CountryGeometrySource for CachedCountrySource<S> {
    fn fetch(&self, iso3: &str, admin_level: u8) -> Result<MultiPolygon<f64>> {
        if let Some(geometry) = self.cache.lookup(iso3, admin_level)? {
            debug!("geometry cache hit for {iso3} adm{admin_level}");
            return Ok(geometry);
        }
        debug!("geometry cache miss for {iso3} adm{admin_level}, fetching");
        let geometry = self.source.fetch(iso3, admin_level)?;
        self.cache.store(iso3, admin_level, &geometry)?;
        Ok(geometry)
    }
}
