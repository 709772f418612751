use farm_core::projection::position_to_screen;
use farm_core::{
    AvatarInput, CameraDelta, GameConfig, ScreenPoint, SurfaceKind, TilePosition, Tool, ToolError,
    ToolUse,
};
use farm_runtime::{Runtime, RuntimeConfig, RuntimeError, SessionId};

fn avatar() -> farm_core::Avatar {
    AvatarInput {
        name: Some("  Fern ".into()),
        body_type: Some("average".into()),
        hair_style: Some("curly".into()),
        hair_color: Some("auburn".into()),
        skin_tone: Some("olive".into()),
    }
    .validate()
    .expect("valid avatar")
}

fn runtime() -> Runtime {
    let config = RuntimeConfig {
        session_idle_ttl: None,
        ..RuntimeConfig::default()
    };
    Runtime::builder().config(config).build().expect("runtime builds")
}

#[tokio::test]
async fn new_session_starts_with_default_resources() {
    let runtime = runtime();
    let handle = runtime.handle();

    let created = handle.create_session(avatar()).await.unwrap();
    assert_eq!(created.player.avatar.name, "Fern");
    assert_eq!(created.game.resources.energy, 100);
    assert_eq!(created.game.resources.money, 100);
    assert_eq!(created.game.resources.seeds, 5);
    assert_eq!(created.game.resources.day, 1);
    assert_eq!(created.game.resources.current_tool, Tool::Till);
    assert_eq!(created.game.farm.width(), GameConfig::DEFAULT_FARM_WIDTH);
    assert_eq!(created.game.farm.height(), GameConfig::DEFAULT_FARM_HEIGHT);

    let fetched = handle.get_session(created.id()).await.unwrap();
    assert_eq!(fetched.game, created.game);
    assert!(fetched.player.last_active >= created.player.last_active);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let runtime = runtime();
    let handle = runtime.handle();
    let missing = SessionId::new();

    let err = handle.get_session(missing).await.unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound(id) if id == missing));

    let err = handle
        .use_tool(missing, ToolUse::new(Tool::Till, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound(_)));
}

#[tokio::test]
async fn full_farming_cycle() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = handle.create_session(avatar()).await.unwrap().id();
    let origin = TilePosition::ORIGIN;

    let till = handle.use_tool(id, ToolUse::new(Tool::Till, 0, 0)).await.unwrap();
    assert!(till.result.applied);
    assert_eq!(till.result.energy_cost, 5);
    assert_eq!(till.snapshot.game.resources.energy, 95);

    let water = handle.use_tool(id, ToolUse::new(Tool::Water, 0, 0)).await.unwrap();
    assert!(water.snapshot.game.farm.tile(origin).unwrap().is_watered());

    let plant = handle.use_tool(id, ToolUse::new(Tool::Plant, 0, 0)).await.unwrap();
    let tile = plant.snapshot.game.farm.tile(origin).unwrap();
    assert_eq!(tile.surface(), SurfaceKind::Planted);
    assert_eq!(tile.growth_stage(), 1);
    assert_eq!(plant.snapshot.game.resources.seeds, 4);
    assert_eq!(plant.snapshot.game.resources.current_tool, Tool::Plant);

    // Not mature yet.
    let early = handle
        .use_tool(id, ToolUse::new(Tool::Harvest, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(
        early.tool_error(),
        Some(ToolError::ToolNotApplicable { .. })
    ));

    let ticks = u32::from(GameConfig::MAX_GROWTH_STAGE - 1) * GameConfig::PLANT_GROWTH_TICKS;
    let mut latest = None;
    for _ in 0..ticks {
        latest = Some(handle.advance_crops(id).await.unwrap());
    }
    let grown = latest.unwrap();
    assert_eq!(
        grown.game.farm.tile(origin).unwrap().growth_stage(),
        GameConfig::MAX_GROWTH_STAGE
    );

    let harvest = handle
        .use_tool(id, ToolUse::new(Tool::Harvest, 0, 0))
        .await
        .unwrap();
    assert_eq!(harvest.result.harvest_value, 25);
    assert_eq!(harvest.snapshot.game.resources.money, 125);
    assert_eq!(
        harvest.snapshot.game.farm.tile(origin).unwrap().surface(),
        SurfaceKind::Grass
    );
    assert_eq!(harvest.snapshot.game.resources.energy, 100 - 5 - 3 - 2 - 3);
}

#[tokio::test]
async fn rejected_tool_use_leaves_session_unchanged() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = handle.create_session(avatar()).await.unwrap().id();

    let err = handle
        .use_tool(id, ToolUse::new(Tool::Water, 0, 0))
        .await
        .unwrap_err();
    match err {
        RuntimeError::Tool { error, snapshot } => {
            assert!(matches!(error, ToolError::ToolNotApplicable { .. }));
            assert_eq!(snapshot.game.resources.energy, 100);
            assert_eq!(snapshot.game.resources.current_tool, Tool::Till);
        }
        other => panic!("expected tool rejection, got {other:?}"),
    }

    let err = handle
        .use_tool(id, ToolUse::new(Tool::Till, 999, 999))
        .await
        .unwrap_err();
    assert!(matches!(
        err.tool_error(),
        Some(ToolError::InvalidCoordinates { .. })
    ));

    let session = handle.get_session(id).await.unwrap();
    assert_eq!(session.game.resources.energy, 100);
    assert!(session.game.farm.iter().all(|(_, tile)| !tile.is_planted()));
}

#[tokio::test]
async fn concurrent_tool_uses_are_serialized() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = handle.create_session(avatar()).await.unwrap().id();

    // 25 tills at 5 energy each against a 100 energy budget.
    let mut tasks = Vec::new();
    for i in 0..25 {
        let handle = handle.clone();
        let (x, y) = (i % 20, i / 20);
        tasks.push(tokio::spawn(async move {
            handle.use_tool(id, ToolUse::new(Tool::Till, x, y)).await
        }));
    }

    let mut applied = 0;
    let mut out_of_energy = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(report) => {
                assert!(report.result.applied);
                applied += 1;
            }
            Err(err) => {
                assert!(matches!(
                    err.tool_error(),
                    Some(ToolError::InsufficientEnergy { .. })
                ));
                out_of_energy += 1;
            }
        }
    }
    assert_eq!(applied, 20);
    assert_eq!(out_of_energy, 5);

    let session = handle.get_session(id).await.unwrap();
    assert_eq!(session.game.resources.energy, 0);
    let tilled = session
        .game
        .farm
        .iter()
        .filter(|(_, tile)| tile.surface() == SurfaceKind::Tilled)
        .count();
    assert_eq!(tilled, 20);
}

#[tokio::test]
async fn camera_tool_selection_and_rest() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = handle.create_session(avatar()).await.unwrap().id();

    let moved = handle
        .update_camera(
            id,
            CameraDelta {
                x: Some(-40.0),
                y: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.game.camera, ScreenPoint::new(-40.0, 0.0));

    let moved = handle
        .update_camera(
            id,
            CameraDelta {
                x: None,
                y: Some(12.5),
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.game.camera, ScreenPoint::new(-40.0, 12.5));

    let selected = handle.select_tool(id, Tool::Harvest).await.unwrap();
    assert_eq!(selected.game.resources.current_tool, Tool::Harvest);
    assert_eq!(selected.game.resources.energy, 100);

    handle.use_tool(id, ToolUse::new(Tool::Till, 1, 1)).await.unwrap();
    let rested = handle.rest(id).await.unwrap();
    assert_eq!(rested.game.resources.day, 2);
    assert_eq!(rested.game.resources.energy, rested.game.resources.max_energy);
}

#[tokio::test]
async fn pick_tile_uses_session_camera() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = handle.create_session(avatar()).await.unwrap().id();

    let camera = ScreenPoint::new(24.0, -8.0);
    handle
        .update_camera(
            id,
            CameraDelta {
                x: Some(camera.x),
                y: Some(camera.y),
            },
        )
        .await
        .unwrap();

    let origin = ScreenPoint::new(400.0, 100.0);
    let target = TilePosition::new(7, 3);
    let screen = position_to_screen(target, origin, camera);

    let picked = handle.pick_tile(id, screen, origin).await.unwrap();
    assert_eq!(picked, Some(target));

    let far_away = ScreenPoint::new(-10_000.0, -10_000.0);
    assert_eq!(handle.pick_tile(id, far_away, origin).await.unwrap(), None);
}

#[tokio::test]
async fn patch_applies_camera_and_tool_together() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = handle.create_session(avatar()).await.unwrap().id();

    let patched = handle
        .patch_session(
            id,
            Some(CameraDelta {
                x: Some(16.0),
                y: Some(-8.0),
            }),
            Some(Tool::Water),
        )
        .await
        .unwrap();
    assert_eq!(patched.game.camera, ScreenPoint::new(16.0, -8.0));
    assert_eq!(patched.game.resources.current_tool, Tool::Water);

    let unchanged = handle.patch_session(id, None, None).await.unwrap();
    assert_eq!(unchanged.game, patched.game);

    let missing = SessionId::new();
    assert!(matches!(
        handle.patch_session(missing, None, Some(Tool::Plant)).await,
        Err(RuntimeError::SessionNotFound(_))
    ));
    assert!(handle.session_exists(id).await);
    assert!(!handle.session_exists(missing).await);
}
