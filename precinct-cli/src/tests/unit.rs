//! Focused unit tests covering fetch configuration and manifest loading.

use super::helpers::{Workspace, write_utf8};
use super::*;
use crate::fetch::{FetchArgs, FetchConfig, config_from_layers_for_test, load_layer, resolve_plan};
use crate::report::Checks;
use ortho_config::MergeComposer;
use precinct_data::{ConfigurationError, FetchPlan, HttpTransportConfig, Minnesota};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

#[rstest]
fn converting_default_args_uses_precincts_layer_and_direct_transport() {
    let config = FetchConfig::try_from(FetchArgs::default()).expect("defaults convert");

    assert_eq!(config.layer, DEFAULT_LAYER);
    assert_eq!(config.manifest, None);
    assert_eq!(config.output, None);
    assert_eq!(config.transport, HttpTransportConfig::new());
    assert_eq!(config.checks, Checks::default());
}

#[rstest]
fn transport_options_flow_into_the_http_config() {
    let args = FetchArgs {
        proxy: Some("https://proxy.example/?url=".to_owned()),
        timeout_secs: Some(5),
        user_agent: Some("precinct-tests/1.0".to_owned()),
        ..FetchArgs::default()
    };

    let config = FetchConfig::try_from(args).expect("config should build");

    let expected = HttpTransportConfig::new()
        .with_proxy("https://proxy.example/?url=")
        .with_timeout(Duration::from_secs(5))
        .with_user_agent("precinct-tests/1.0");
    assert_eq!(config.transport, expected);
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn blank_proxies_mean_direct_requests(#[case] proxy: &str) {
    let args = FetchArgs {
        proxy: Some(proxy.to_owned()),
        ..FetchArgs::default()
    };
    let config = FetchConfig::try_from(args).expect("config should build");
    assert_eq!(config.transport.proxy_base, None);
}

#[rstest]
#[case::zero_timeout(FetchArgs { timeout_secs: Some(0), ..FetchArgs::default() }, ARG_TIMEOUT_SECS)]
#[case::blank_layer(FetchArgs { layer: Some(" ".to_owned()), ..FetchArgs::default() }, ARG_LAYER)]
fn unusable_values_are_rejected(#[case] args: FetchArgs, #[case] expected: &'static str) {
    match FetchConfig::try_from(args) {
        Err(CliError::InvalidArgument { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
#[case::none(None, &[])]
#[case::single(Some("precinct_id"), &["precinct_id"])]
#[case::padded(Some(" precinct_id , county,,"), &["precinct_id", "county"])]
fn required_keys_are_split_on_commas(#[case] raw: Option<&str>, #[case] expected: &[&str]) {
    let checks = Checks::new(raw, true);
    assert_eq!(checks.required, expected);
    assert!(checks.strict);
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "layer": "wards",
            "user_agent": "from-file/1.0",
        }),
        None,
    );
    composer.push_environment(json!({
        "layer": "counties",
        "timeout_secs": 10,
    }));
    composer.push_cli(json!({
        "layer": "precincts",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.layer, "precincts");
    assert_eq!(config.transport.timeout, Duration::from_secs(10));
    assert_eq!(config.transport.user_agent, "from-file/1.0");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    match config_from_layers_for_test(composer.layers()) {
        Err(CliError::Configuration(_)) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn missing_manifests_report_the_path() {
    let workspace = Workspace::new();
    let path = workspace.path("absent.json");

    match load_layer(&path, DEFAULT_LAYER) {
        Err(CliError::ReadManifest { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ReadManifest, found {other:?}"),
    }
}

#[rstest]
fn manifests_without_the_layer_are_rejected() {
    let workspace = Workspace::new();
    let path = workspace.write_manifest(&["cd1"]);

    match load_layer(&path, "wards") {
        Err(CliError::Manifest {
            source: ConfigurationError::MissingLayer { layer },
            ..
        }) => assert_eq!(layer, "wards"),
        other => panic!("expected MissingLayer, found {other:?}"),
    }
}

#[rstest]
fn unparseable_manifests_are_rejected() {
    let workspace = Workspace::new();
    let path = workspace.path("manifest.json");
    write_utf8(&path, b"{ not json");

    assert!(matches!(
        load_layer(&path, DEFAULT_LAYER),
        Err(CliError::Manifest {
            source: ConfigurationError::ParseManifest { .. },
            ..
        })
    ));
}

#[rstest]
fn manifest_layers_resolve_to_their_partitions() {
    let workspace = Workspace::new();
    let config = FetchConfig {
        manifest: Some(workspace.write_manifest(&["cd1", "cd2"])),
        ..FetchConfig::try_from(FetchArgs::default()).expect("defaults convert")
    };

    let plan = resolve_plan(&config).expect("plan resolves");

    let ids: Vec<&str> = plan
        .plan()
        .partitions()
        .expect("partitioned plan")
        .iter()
        .map(|source| source.id.as_str())
        .collect();
    assert_eq!(ids, ["cd1", "cd2"]);
    assert!(matches!(plan.plan(), FetchPlan::Partitioned(_)));
    assert!(plan.schema().is_some());
}

#[rstest]
fn missing_manifest_uses_built_in_partitions_and_schema() {
    let config = FetchConfig::try_from(FetchArgs::default()).expect("defaults convert");

    let plan = resolve_plan(&config).expect("plan resolves");

    assert!(matches!(plan.plan(), FetchPlan::PartitionedFallback(sources) if sources.len() == 8));
    assert_eq!(plan.schema(), Some(&Minnesota::default_schema()));
}
