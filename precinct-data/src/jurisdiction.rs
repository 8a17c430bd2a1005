//! Jurisdiction profiles: provenance and built-in partition lists.

use precinct_core::{
    GeometryTransform, PartitionSource, PropertyMap, SchemaDescriptor, SourceMetadata,
};

/// Static facts about a publishing jurisdiction.
pub trait Jurisdiction {
    /// Provenance attached to every collection fetched for this jurisdiction.
    fn metadata(&self) -> SourceMetadata;

    /// Partition list used when a layer names neither a statewide URL nor
    /// its own sources.
    fn fallback_sources(&self) -> Vec<PartitionSource>;
}

const MN_SOURCE_URL: &str =
    "https://www.sos.mn.gov/election-administration-campaigns/data-maps/voting-precincts/";
const MN_DISTRICTS: u32 = 8;
const MN_FIRST_MEDIA_ID: u32 = 2785;

/// Minnesota Secretary of State precinct boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minnesota;

impl Minnesota {
    /// The statewide attribute schema used by the Secretary of State files.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_data::Minnesota;
    ///
    /// let schema = Minnesota::default_schema();
    /// assert_eq!(schema.property_map.targets().next(), Some("precinct_id"));
    /// assert_eq!(schema.property_map.len(), 7);
    /// ```
    #[must_use]
    pub fn default_schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            PropertyMap::new()
                .with("precinct_id", "PrecinctID")
                .with("precinct_name", "Precinct")
                .with("county", "County")
                .with("us_house", "CongDist")
                .with("mn_senate", "MNSenDist")
                .with("mn_house", "MNLegDist")
                .with("county_commission", "CtyComDist"),
            GeometryTransform::GeometryCollectionToMultiPolygon,
        )
    }
}

impl Jurisdiction for Minnesota {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            state: "MN".to_owned(),
            state_name: "Minnesota".to_owned(),
            source: "Minnesota Secretary of State".to_owned(),
            source_url: MN_SOURCE_URL.to_owned(),
            license: "No explicit license - Terms & Conditions apply".to_owned(),
            layers: vec!["precincts".to_owned()],
            note: Some(
                "Data must be fetched directly from official source, not redistributed".to_owned(),
            ),
        }
    }

    fn fallback_sources(&self) -> Vec<PartitionSource> {
        (1..=MN_DISTRICTS)
            .zip(MN_FIRST_MEDIA_ID..)
            .map(|(district, media_id)| {
                PartitionSource::new(
                    format!("cd{district}"),
                    format!(
                        "https://www.sos.mn.gov/media/{media_id}/mn-cd{district}-precincts.json"
                    ),
                )
            })
            .collect()
    }
}
