use super::*;
use shared::protocol::{ControllerCall, UiControls};
use std::io::Write;

fn layers() -> Vec<LayerRecord> {
    vec![
        LayerRecord::new("L1", "Schools"),
        LayerRecord::new("L2", "Parks").with_caption("Green spaces"),
    ]
}

fn options() -> EmbedOptions {
    EmbedOptions {
        ui_controls: UiControls {
            cooperative_gestures: false,
            show_legend: true,
            full_screen_button: false,
        },
    }
}

#[tokio::test]
async fn missing_embedder_rejects() {
    let err = MissingMapEmbedder
        .embed(MountSurface::new("map"), MapId::from("abc"), options())
        .await
        .err()
        .expect("embed should fail");
    assert!(err.to_string().contains("unavailable"));
}

#[tokio::test]
async fn in_memory_embedder_records_each_request() {
    let embedder = InMemoryEmbedder::new(layers());
    let controller = embedder
        .embed(MountSurface::new("map"), MapId::from("abc"), options())
        .await
        .expect("embed");

    assert_eq!(controller.get_layers().await.expect("layers").len(), 2);
    assert_eq!(
        embedder.embed_calls(),
        vec![ControllerCall::Embed {
            map_id: MapId::from("abc"),
            surface: "map".to_string(),
            options: options(),
        }]
    );
}

#[tokio::test]
async fn layers_start_visible_and_follow_commands() {
    let controller = InMemoryMapController::new(layers());
    let l1 = LayerId::from("L1");
    assert!(controller.is_visible(&l1));
    assert!(controller.is_legend_visible(&l1));

    controller
        .set_layer_visibility(VisibilityRequest::Hide(vec![l1.clone()]))
        .await
        .expect("hide");
    assert!(!controller.is_visible(&l1));
    assert!(controller.is_legend_visible(&l1));

    controller
        .set_layer_legend_visibility(VisibilityRequest::Hide(vec![l1.clone()]))
        .await
        .expect("hide legend");
    assert!(!controller.is_legend_visible(&l1));

    controller
        .set_layer_visibility(VisibilityRequest::Show(vec![l1.clone()]))
        .await
        .expect("show");
    assert!(controller.is_visible(&l1));
}

#[tokio::test]
async fn unknown_ids_are_rejected_but_logged() {
    let controller = InMemoryMapController::new(layers());
    let request = VisibilityRequest::Show(vec![LayerId::from("nope")]);

    assert!(controller.set_layer_visibility(request.clone()).await.is_err());
    assert_eq!(
        controller.calls(),
        vec![ControllerCall::SetLayerVisibility(request)]
    );
}

#[test]
fn data_table_tracks_last_shown_layer() {
    let controller = InMemoryMapController::new(layers());
    controller
        .show_layer_data_table(&LayerId::from("L2"))
        .expect("show table");
    assert_eq!(controller.data_table_layer(), Some(LayerId::from("L2")));

    controller.hide_layer_data_table().expect("hide table");
    assert_eq!(controller.data_table_layer(), None);
    assert!(controller
        .show_layer_data_table(&LayerId::from("missing"))
        .is_err());
}

#[test]
fn catalog_file_loads_records_in_order() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"[{{"id":"L3","name":"Clinics"}},{{"id":"L1","name":"Schools","caption":"K-12"}}]"#
    )
    .expect("write catalog");

    let records = catalog::load_catalog(file.path()).expect("load");
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["L3", "L1"]);
}

#[test]
fn malformed_catalog_reports_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "not json").expect("write");

    let err = catalog::load_catalog(file.path()).expect_err("parse error");
    assert!(matches!(err, catalog::CatalogError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}
