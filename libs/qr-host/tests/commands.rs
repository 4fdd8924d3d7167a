//! Command runs against a fresh document, through the registry the way the
//! add-in drives them.

use approx::assert_relative_eq;
use glam::DVec3;
use qr_host::addin::{self, QR_CODE_COMMAND_ID, SIGNBOARD_COMMAND_ID};
use qr_host::commands::{QrCodeCommand, QrCodeInputs, SignboardCommand, SignboardInputs};
use qr_host::{messages, CacheKey, CommandError, CommandRegistry, Document, GenerationCache};
use qr_solid::{GenerateError, InputError, SceneError, SourceError};

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    addin::run(&mut registry);
    registry
}

#[test]
fn test_addin_lifecycle() {
    let mut registry = CommandRegistry::new();
    addin::run(&mut registry);
    assert!(registry.is_registered(QR_CODE_COMMAND_ID));
    assert!(registry.is_registered(SIGNBOARD_COMMAND_ID));

    // a second load replaces the stale commands instead of duplicating them
    addin::run(&mut registry);
    assert_eq!(registry.len(), 2);

    addin::stop(&mut registry);
    assert!(registry.is_empty());
    let err = registry
        .execute(QR_CODE_COMMAND_ID, "{}", &mut Document::new())
        .unwrap_err();
    assert!(matches!(err, CommandError::UnknownCommand(_)));
}

#[test]
fn test_global_registry_is_shared() {
    assert!(std::ptr::eq(
        qr_host::registry::global(),
        qr_host::registry::global()
    ));
}

#[test]
fn test_qr_command_places_one_component() {
    let mut registry = registry();
    let mut doc = Document::new();
    let outcome = registry
        .execute(
            QR_CODE_COMMAND_ID,
            r#"{"text": "hello", "size": 21.0, "create_base": false}"#,
            &mut doc,
        )
        .unwrap();

    assert_eq!(outcome.components.len(), 1);
    assert_eq!(doc.len(), 1);
    let component = doc.component("QR_Code").unwrap();
    assert!(component.placement.is_identity());

    // version 1: 21 modules at 1 mm
    let bounds = component.world_bounds().unwrap();
    assert_relative_eq!(bounds.min.x, -10.5, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.y, 10.5, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.z, 1.0, epsilon = 1e-9);

    let mesh = doc.to_mesh().unwrap();
    assert!(mesh.triangle_count() > 0);
    assert_relative_eq!(mesh.signed_volume(), component.bodies[0].volume(), epsilon = 1e-6);
}

#[test]
fn test_real_codes_export_closed_meshes() {
    for text in ["hello", "https://example.com/menu?table=12"] {
        let inputs = QrCodeInputs {
            text: text.to_string(),
            ..QrCodeInputs::default()
        };
        let mut doc = Document::new();
        QrCodeCommand::new().run(&inputs, &mut doc).unwrap();

        let body = &doc.components()[0].bodies[0];
        assert_eq!(body.lump_count(), 1);
        let mesh = doc.to_mesh().unwrap();
        assert!(mesh.is_closed(), "{text:?} meshed open");
        assert_relative_eq!(mesh.signed_volume(), body.volume(), epsilon = 1e-6);
    }
}

#[test]
fn test_signboard_places_three_components_at_offsets() {
    let mut registry = registry();
    let mut doc = Document::new();
    let outcome = registry
        .execute(SIGNBOARD_COMMAND_ID, "{}", &mut doc)
        .unwrap();
    assert_eq!(outcome.components.len(), 3);

    let names: Vec<_> = doc.components().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Signboard", "QR_Code", "Instagram_Icon"]);

    let board = doc.component("Signboard").unwrap();
    assert!(board.placement.is_identity());
    let board_bounds = board.world_bounds().unwrap();
    assert_eq!(board_bounds.min, DVec3::new(-50.0, -75.0, 0.0));
    assert_eq!(board_bounds.max, DVec3::new(50.0, 75.0, 5.0));

    let qr = doc.component("QR_Code").unwrap();
    assert_eq!(qr.placement.offset, DVec3::new(0.0, 40.0, 5.0));
    let qr_bounds = qr.world_bounds().unwrap();
    // no plate: the code sits directly on the board
    assert_relative_eq!(qr_bounds.min.z, 5.0, epsilon = 1e-9);
    assert_relative_eq!(qr_bounds.max.z, 6.0, epsilon = 1e-9);
    assert_relative_eq!((qr_bounds.min.y + qr_bounds.max.y) / 2.0, 40.0, epsilon = 1e-9);

    let icon = doc.component("Instagram_Icon").unwrap();
    assert_eq!(icon.placement.offset, DVec3::new(0.0, -40.0, 5.0));
    let icon_bounds = icon.world_bounds().unwrap();
    assert_relative_eq!(icon_bounds.min.y, -50.0, epsilon = 1e-9);
    assert_relative_eq!(icon_bounds.max.y, -30.0, epsilon = 1e-9);

    // parts are kept separate
    for component in doc.components() {
        assert_eq!(component.bodies.len(), 1);
    }
}

#[test]
fn test_signboard_without_icon() {
    let mut inputs = SignboardInputs::default();
    inputs.icon.enabled = false;
    let mut doc = Document::new();
    let ids = SignboardCommand::new().run(&inputs, &mut doc).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(doc.component("Instagram_Icon").is_none());
}

#[test]
fn test_failed_signboard_places_nothing() {
    let mut inputs = SignboardInputs::default();
    inputs.qr.min_version = 41;
    let mut doc = Document::new();
    let err = SignboardCommand::new().run(&inputs, &mut doc).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Generate(GenerateError::Source(SourceError::InvalidVersion(41)))
    ));
    assert!(doc.is_empty());
}

#[test]
fn test_cache_hit_on_repeated_inputs() {
    let inputs = QrCodeInputs {
        text: "cached".to_string(),
        ..QrCodeInputs::default()
    };
    let mut command = QrCodeCommand::new().with_cache(GenerationCache::new(4));
    let mut doc = Document::new();

    command.run(&inputs, &mut doc).unwrap();
    command.run(&inputs, &mut doc).unwrap();

    let stats = command.cache().unwrap().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(doc.len(), 2);
    assert_relative_eq!(
        doc.components()[0].bodies[0].volume(),
        doc.components()[1].bodies[0].volume(),
        epsilon = 1e-12
    );

    let changed = QrCodeInputs {
        margin: 3.0,
        ..inputs.clone()
    };
    assert_ne!(CacheKey::qr(&inputs), CacheKey::qr(&changed));
}

#[test]
fn test_messages_per_error_kind() {
    let cases: Vec<(CommandError, &str)> = vec![
        (CommandError::UnknownCommand("x".into()), "not registered"),
        (
            CommandError::InvalidParameter {
                name: "thickness",
                value: 0.0,
            },
            "thickness must be a positive number",
        ),
        (
            CommandError::Generate(InputError::NothingToGenerate.into()),
            "No geometry generated",
        ),
        (
            CommandError::Generate(GenerateError::Source(SourceError::DataTooLong {
                len: 9000,
                min_version: 1,
            })),
            "too long",
        ),
        (
            CommandError::Scene(SceneError::DuplicateName("QR_Code".into())),
            "already exists",
        ),
    ];
    for (err, expected) in cases {
        let message = messages::user_message(&err);
        assert!(message.contains(expected), "{message:?} lacks {expected:?}");
        assert!(!messages::title(&err).is_empty());
    }

    let err = serde_json::from_str::<QrCodeInputs>("[").unwrap_err();
    let err = CommandError::from(err);
    assert_eq!(messages::title(&err), "Invalid Input");
}
