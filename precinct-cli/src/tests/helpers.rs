//! Test helpers: manifests on disk and scripted transports.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use precinct_data::test_support::StubTransport;
use precinct_data::{HttpTransportConfig, Transport};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::CliError;
use crate::demo::sample_collection;
use crate::fetch::FetchTransportBuilder;

pub(super) fn partition_url(id: &str) -> String {
    format!("https://example.test/mn-{id}-precincts.json")
}

/// A scratch directory holding a manifest.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write a manifest whose `precincts` layer lists `ids` as partitions.
    pub(super) fn write_manifest(&self, ids: &[&str]) -> Utf8PathBuf {
        let sources: Vec<Value> = ids
            .iter()
            .map(|id| json!({"id": id, "url": partition_url(id)}))
            .collect();
        let manifest = json!({
            "state": {"code": "MN", "name": "Minnesota"},
            "version": "1.0.0",
            "layers": {
                "precincts": {
                    "available": true,
                    "sources": sources,
                    "schema": {
                        "propertyMap": {
                            "precinct_id": "PrecinctID",
                            "county": "County",
                            "us_house": "CongDist",
                            "mn_senate": "MNSenDist"
                        },
                        "geometryTransform": "geometryCollection_to_multiPolygon"
                    }
                }
            }
        });
        let path = self.path("manifest.json");
        write_utf8(&path, manifest.to_string().as_bytes());
        path
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace").field("root", &self.root).finish()
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    precinct_fs::write_utf8(path, contents).expect("write test file");
}

/// Script `transport` so each partition in `ids` serves one sample precinct.
pub(super) fn serve_samples(transport: StubTransport, ids: &[&str]) -> StubTransport {
    ids.iter().fold(transport, |transport, id| {
        let district = id.trim_start_matches("cd");
        transport.with_json(partition_url(id), sample_collection(district))
    })
}

/// Hands out a scripted [`StubTransport`] and records the requested config.
#[derive(Debug, Default)]
pub(super) struct StubTransportBuilder {
    transport: RefCell<Option<StubTransport>>,
    seen: RefCell<Option<HttpTransportConfig>>,
}

impl StubTransportBuilder {
    pub(super) fn new(transport: StubTransport) -> Self {
        Self {
            transport: RefCell::new(Some(transport)),
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> Option<HttpTransportConfig> {
        self.seen.borrow().clone()
    }
}

impl FetchTransportBuilder for StubTransportBuilder {
    fn build(&self, config: &HttpTransportConfig) -> Result<Box<dyn Transport>, CliError> {
        self.seen.replace(Some(config.clone()));
        Ok(Box::new(self.transport.take().unwrap_or_default()))
    }
}
