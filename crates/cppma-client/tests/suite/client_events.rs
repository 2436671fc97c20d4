//! End-to-end push-event flows: JSON payloads in, view and virtual-document
//! state out.

use std::sync::Arc;

use cppma_client::{
    AnalyserConfig, PUBLISH_MODULES_INFO_METHOD, PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
};
use cppma_modules::ModuleName;
use cppma_vfs::TokenView;
use cppma_views::{pending_message, ViewModeId, STALE_MESSAGE};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::support::{new_client, EmptySearch, LogBuffer, SurfaceCall};

#[test]
fn a_full_analysis_round_trip_updates_views_and_documents() {
    let mut client = new_client(AnalyserConfig::default(), Arc::new(EmptySearch));

    // Construction presents the default mode with the quiet pending text.
    assert_eq!(
        client.views().surface().calls,
        vec![SurfaceCall::Present {
            display_name: "Basic Info".to_string(),
            message: Some(pending_message(false)),
        }]
    );

    client.handle_notification(PUBLISH_MODULES_INFO_METHOD, json!({ "event": "pending" }));
    client.handle_notification(
        PUBLISH_MODULES_INFO_METHOD,
        json!({
            "event": "update",
            "modules": [
                { "name": "app.core", "imports": ["std.io"] },
                { "name": "app.util", "imports": ["app.core"] }
            ],
            "translationUnits": [
                { "source": "/ws/src/core.cppm", "provides": "app.core", "imports": ["std.io"] }
            ]
        }),
    );

    assert_eq!(
        client.modules().importers_of(&ModuleName::new("app.core")),
        vec![ModuleName::new("app.util")]
    );
    for mode in ViewModeId::ALL {
        assert_eq!(client.views().message(mode), None);
    }

    client.handle_notification(
        PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
        json!({
            "event": "update",
            "uri": "file:///ws/src/core.cppm",
            "ppTokens": ["export", "module", "app.core"],
            "tokens": ["export", "module", "app.core", ";"]
        }),
    );

    assert_eq!(
        client.resolve("cpp-ma:///ws/src/core.cppm.processed?view=pp-tokens"),
        Some("export module app.core".to_string())
    );
    assert_eq!(
        client.resolve("cpp-ma:///ws/src/core.cppm.processed?view=preprocessed"),
        Some("export module app.core ;".to_string())
    );
}

#[test]
fn translation_unit_updates_notify_only_open_processed_documents() {
    let mut client = new_client(AnalyserConfig::default(), Arc::new(EmptySearch));
    let address = client
        .processed_document_uri("file:///ws/a.cpp", TokenView::PpTokens)
        .expect("local source");
    assert_eq!(address, "cpp-ma:///ws/a.cpp.processed?view=pp-tokens");

    // Opening before any data arrives is fine; there is just nothing to
    // show yet.
    assert_eq!(client.resolve(&address), None);

    client.handle_notification(
        PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
        json!({
            "event": "update",
            "uri": "file:///ws/a.cpp",
            "ppTokens": ["int"],
            "tokens": ["int", "x", ";"]
        }),
    );

    let notified: Vec<String> = client
        .docs()
        .changes()
        .try_iter()
        .filter_map(|path| path.to_uri())
        .collect();
    assert_eq!(notified, vec![address.clone()]);
    assert_eq!(client.resolve(&address), Some("int".to_string()));

    client.document_closed(&address);
    client.handle_notification(
        PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
        json!({
            "event": "update",
            "uri": "file:///ws/a.cpp",
            "ppTokens": ["long"],
            "tokens": ["long", "x", ";"]
        }),
    );
    assert_eq!(client.docs().changes().try_iter().count(), 0);
}

#[test]
fn pending_translation_units_lose_their_cached_text() {
    let mut client = new_client(AnalyserConfig::default(), Arc::new(EmptySearch));
    let address = client
        .processed_document_uri("file:///ws/a.cpp", TokenView::Preprocessed)
        .expect("local source");

    client.handle_notification(
        PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
        json!({
            "event": "update",
            "uri": "file:///ws/a.cpp",
            "ppTokens": ["int"],
            "tokens": ["int", "x", ";"]
        }),
    );
    assert_eq!(client.resolve(&address), Some("int x ;".to_string()));

    client.handle_notification(
        PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
        json!({ "event": "pending", "uri": "file:///ws/a.cpp" }),
    );
    assert_eq!(client.resolve(&address), None);
    assert!(client.docs().store().is_empty());

    // The open document was still told to refresh.
    let notified: Vec<String> = client
        .docs()
        .changes()
        .try_iter()
        .filter_map(|path| path.to_uri())
        .collect();
    assert_eq!(notified, vec![address]);
}

#[test]
fn failed_analysis_passes_keep_the_last_good_graph_and_mark_views_stale() {
    let mut client = new_client(AnalyserConfig::default(), Arc::new(EmptySearch));
    client.handle_notification(
        PUBLISH_MODULES_INFO_METHOD,
        json!({
            "event": "update",
            "modules": [{ "name": "app.core", "imports": [] }],
            "translationUnits": []
        }),
    );
    client.handle_notification(PUBLISH_MODULES_INFO_METHOD, json!({ "event": "update" }));

    assert!(!client.modules().is_empty());
    for mode in ViewModeId::ALL {
        assert_eq!(client.views().message(mode), Some(STALE_MESSAGE));
    }

    // Switching modes republishes the stale banner with the new title.
    client.activate_view(ViewModeId::Importers);
    assert_eq!(
        client.views().surface().calls.last(),
        Some(&SurfaceCall::Present {
            display_name: "Imports".to_string(),
            message: Some(STALE_MESSAGE.to_string()),
        })
    );
}

#[test]
fn pending_after_committed_data_warns_that_the_display_is_outdated() {
    let mut client = new_client(AnalyserConfig::default(), Arc::new(EmptySearch));

    client.handle_notification(PUBLISH_MODULES_INFO_METHOD, json!({ "event": "pending" }));
    assert_eq!(
        client.views().message(ViewModeId::Modules),
        Some(pending_message(false).as_str())
    );

    client.handle_notification(
        PUBLISH_MODULES_INFO_METHOD,
        json!({
            "event": "update",
            "modules": [{ "name": "app.core" }],
            "translationUnits": []
        }),
    );
    client.handle_notification(PUBLISH_MODULES_INFO_METHOD, json!({ "event": "pending" }));

    let expected = pending_message(true);
    for mode in ViewModeId::ALL {
        assert_eq!(client.views().message(mode), Some(expected.as_str()));
    }
}

#[test]
fn malformed_payloads_warn_and_leave_state_untouched() {
    let mut client = new_client(AnalyserConfig::default(), Arc::new(EmptySearch));
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::WARN)
        .with_writer(logs.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        client.handle_notification(
            PUBLISH_TRANSLATION_UNIT_INFO_METHOD,
            json!({ "event": "update", "uri": "file:///ws/a.cpp" }),
        );
    });

    assert!(client.docs().store().is_empty());
    assert!(logs
        .as_string()
        .contains("dropping malformed notification payload"));
}
