//! Camera Rig Demo
//!
//! Run with: `cargo run --bin rig-demo`
//!
//! Headless walkthrough of the adaptive follow camera. Builds a small test
//! arena (floor, a corridor of walls, an occlusion-reactive billboard),
//! scripts a few seconds of player input against it, and prints what the
//! rig does each phase: zoom pulled in by walls, surfaces flagged for
//! transparency, a jump, a camera hint region, and a paused cinematic
//! return.
//!
//! Set `RUST_LOG=debug` to see hint and pause events from the engine.

use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orbitcam_engine::camera::{CameraHint, OcclusionTracker};
use orbitcam_engine::input::{KeyCode, MovementKeys};
use orbitcam_engine::physics::{AabbScene, SceneBox, SurfaceId, SurfaceTag};
use orbitcam_engine::rig::{AgentState, CameraRig, RigBuilder, RigError};
use orbitcam_engine::sequence::{CameraReturn, PauseSignal, ReturnStatus};

const DT: f32 = 1.0 / 60.0;

/// The demo arena: a floor, a wall corridor, and a reactive billboard.
fn build_arena() -> (AabbScene, SurfaceId) {
    let mut scene = AabbScene::new();

    // Floor
    scene.add(SceneBox::from_center(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(200.0, 0.5, 200.0),
        0,
        SurfaceTag::Normal,
    ));

    // Corridor walls flanking the path the player walks down (-Z)
    scene.add(SceneBox::from_center(
        Vec3::new(-3.0, 3.0, -20.0),
        Vec3::new(0.5, 3.0, 15.0),
        0,
        SurfaceTag::Normal,
    ));
    scene.add(SceneBox::from_center(
        Vec3::new(3.0, 3.0, -20.0),
        Vec3::new(0.5, 3.0, 15.0),
        0,
        SurfaceTag::Normal,
    ));
    // Low ceiling over the middle of the corridor
    scene.add(SceneBox::from_center(
        Vec3::new(0.0, 6.5, -20.0),
        Vec3::new(3.5, 0.5, 15.0),
        0,
        SurfaceTag::Normal,
    ));

    // Billboard behind the spawn point: occludes the camera on the way
    // out of the corridor but should fade, not force a zoom
    let billboard = scene.add(SceneBox::from_center(
        Vec3::new(0.0, 4.0, 12.0),
        Vec3::new(6.0, 4.0, 0.25),
        0,
        SurfaceTag::OcclusionReactive,
    ));

    (scene, billboard)
}

fn report_occlusion(tracker: &mut OcclusionTracker, occluded: &std::collections::HashSet<SurfaceId>) {
    let diff = tracker.update(occluded);
    for surface in &diff.newly_occluded {
        info!(surface = surface.0, "surface occluding, fade out");
    }
    for surface in &diff.newly_revealed {
        info!(surface = surface.0, "surface clear, fade back in");
    }
}

fn run_phase(
    name: &str,
    ticks: u32,
    rig: &mut CameraRig,
    keys: &mut MovementKeys,
    scene: &AabbScene,
    pause: &PauseSignal,
    tracker: &mut OcclusionTracker,
) {
    for _ in 0..ticks {
        let out = rig.tick(pause.context(DT), keys, scene);
        report_occlusion(tracker, &out.occluded);
    }
    let agent = rig.agent();
    info!(
        phase = name,
        position = ?agent.position,
        heading = agent.heading_deg,
        camera = ?rig.camera_world_position(),
        "phase complete"
    );
}

fn main() -> Result<(), RigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (scene, billboard) = build_arena();
    info!(boxes = scene.len(), "arena built");

    let mut rig = RigBuilder::new()
        .agent(AgentState::at(Vec3::new(0.0, 0.4, 0.0)))
        .eye_offset(Vec3::new(0.0, 1.5, 0.0))
        .ground_detector(Vec3::new(0.4, 0.5, 0.4))
        .build()?;

    // Print the rig tuning the way a config dump would look
    let tuning = serde_json::to_string_pretty(rig.pitch_solver_mut().config())
        .expect("pitch config serializes");
    info!("pitch tuning:\n{tuning}");

    let mut pause = PauseSignal::new();
    pause.on_pause(|| info!("cinematic started"));
    pause.on_resume(|| info!("cinematic over, gameplay resumed"));

    let mut keys = MovementKeys::new();
    let mut tracker = OcclusionTracker::new();

    // Phase 1: stand still, the billboard behind the spawn occludes the
    // default boom and gets flagged
    run_phase("settle", 120, &mut rig, &mut keys, &scene, &pause, &mut tracker);
    assert!(tracker.occluded().contains(&billboard));

    // Phase 2: walk forward into the corridor; the walls pull the zoom in
    keys.handle_key(KeyCode::W, true);
    run_phase("enter corridor", 180, &mut rig, &mut keys, &scene, &pause, &mut tracker);

    // Phase 3: a hint region inside the corridor wants a tight camera
    let mut hint = CameraHint::new(4.0, 5.0, 30.0, 30.0);
    let (zoom, pitch) = rig.hint_targets();
    hint.apply(zoom, pitch);
    run_phase("hint region", 120, &mut rig, &mut keys, &scene, &pause, &mut tracker);
    let (zoom, pitch) = rig.hint_targets();
    hint.restore(zoom, pitch);

    // Phase 4: jump while running
    keys.handle_key(KeyCode::Space, true);
    run_phase("jump", 90, &mut rig, &mut keys, &scene, &pause, &mut tracker);
    keys.handle_key(KeyCode::Space, false);
    keys.handle_key(KeyCode::W, false);

    // Phase 5: cinematic pause; the detached camera lerps back to the rig
    pause.pause();
    let mut transition = CameraReturn::new(rig.camera_world_position() + Vec3::new(30.0, 20.0, 0.0));
    let mut frames = 0u32;
    loop {
        let ctx = pause.context(DT);
        rig.tick(ctx, &mut keys, &scene);
        if transition.step(rig.camera_world_position(), ctx) == ReturnStatus::Complete {
            break;
        }
        frames += 1;
        if frames > 10_000 {
            break;
        }
    }
    info!(frames, "camera returned to rig");
    pause.resume();

    info!("demo complete");
    Ok(())
}
