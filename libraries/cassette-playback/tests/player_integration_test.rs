//! Player facade and now-playing bridge, end to end
//!
//! Drives a `Player` with the three kinds of input (user commands, device
//! signals, surface actions) and checks what the surface ends up showing.

mod common;

use cassette_playback::{
    Command, DeviceSignal, Input, PlaybackError, PlaybackEvent, PlaybackState, Player,
    SurfacePlaybackState, TrackId, TransportAction,
};
use common::{current_title, import_all, session, RecordingOutput, RecordingSurface};

fn player() -> Player<RecordingOutput, RecordingSurface> {
    Player::new(session(), RecordingSurface::default())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn surface_follows_a_listening_session() {
    init_tracing();
    let mut player = player();
    let q = import_all(player.session_mut(), &["Intro", "Verse", "Outro"]);

    assert_eq!(player.bridge().surface().state, Some(SurfacePlaybackState::None));

    let (_, result) = player.handle(Input::Command(Command::Play {
        track: q[0].clone(),
        queue: Some(q.clone()),
    }));
    result.unwrap();

    let surface = player.bridge().surface();
    assert_eq!(surface.state, Some(SurfacePlaybackState::Playing));
    assert_eq!(surface.metadata.as_ref().map(|m| m.title.as_str()), Some("Intro"));
    assert_eq!(surface.registered, TransportAction::ALL.to_vec());

    // Media key: next
    player
        .handle(Input::Transport(TransportAction::NextTrack))
        .1
        .unwrap();
    assert_eq!(
        player.bridge().surface().metadata.as_ref().map(|m| m.title.as_str()),
        Some("Verse")
    );

    // Track runs out
    player.handle(Input::Device(DeviceSignal::Ended)).1.unwrap();
    assert_eq!(current_title(player.session()), Some("Outro"));
    assert_eq!(
        player.bridge().surface().metadata.as_ref().map(|m| m.title.as_str()),
        Some("Outro")
    );

    // Last track ends: paused, still showing the track
    player.handle(Input::Device(DeviceSignal::Ended)).1.unwrap();
    assert_eq!(player.session().state(), PlaybackState::Paused);
    assert_eq!(
        player.bridge().surface().state,
        Some(SurfacePlaybackState::Paused)
    );
    assert_eq!(
        player.bridge().surface().metadata.as_ref().map(|m| m.title.as_str()),
        Some("Outro")
    );
}

#[test]
fn play_by_id_uses_library_and_history() {
    let mut player = player();
    let q = import_all(player.session_mut(), &["A", "B", "C"]);

    let (events, result) = player.handle(Input::Command(Command::PlayById {
        id: q[1].id.clone(),
        queue: Some(q.iter().map(|t| t.id.clone()).collect()),
    }));

    result.unwrap();
    assert!(events.contains(&PlaybackEvent::QueueChanged { length: 3 }));
    assert_eq!(current_title(player.session()), Some("B"));

    let (_, result) = player.handle(Input::Command(Command::PlayFromHistory(q[1].id.clone())));
    result.unwrap();
    // Same track: toggles pause
    assert!(!player.session().is_playing());
    assert_eq!(player.session().queue().len(), 1);
}

#[test]
fn unknown_id_is_reported() {
    let mut player = player();

    let (events, result) = player.handle(Input::Command(Command::PlayById {
        id: TrackId::new("missing"),
        queue: None,
    }));

    assert!(events.is_empty());
    assert!(matches!(result, Err(PlaybackError::TrackNotFound(_))));
}

#[test]
fn media_keys_play_and_pause_are_idempotent() {
    let mut player = player();
    let q = import_all(player.session_mut(), &["A"]);
    player
        .handle(Input::Command(Command::Play {
            track: q[0].clone(),
            queue: None,
        }))
        .1
        .unwrap();
    let plays = player.session().device().calls.len();

    player.handle(Input::Transport(TransportAction::Play)).1.unwrap();
    assert_eq!(player.session().device().calls.len(), plays);

    player.handle(Input::Transport(TransportAction::Pause)).1.unwrap();
    player.handle(Input::Transport(TransportAction::Pause)).1.unwrap();
    assert_eq!(player.session().device().calls.len(), plays + 1);
    assert_eq!(
        player.bridge().surface().state,
        Some(SurfacePlaybackState::Paused)
    );
}

#[test]
fn view_commands_do_not_resync_surface() {
    let mut player = player();
    let q = import_all(player.session_mut(), &["A"]);
    player
        .handle(Input::Command(Command::Play {
            track: q[0].clone(),
            queue: None,
        }))
        .1
        .unwrap();
    let syncs = player.bridge().surface().syncs;

    let (events, _) = player.handle(Input::Command(Command::OpenFullView));
    assert_eq!(events, vec![PlaybackEvent::FullViewChanged { open: true }]);
    player.handle(Input::Command(Command::Seek(12.0))).1.unwrap();
    player
        .handle(Input::Device(DeviceSignal::DurationKnown(200.0)))
        .1
        .unwrap();

    assert_eq!(player.bridge().surface().syncs, syncs);
    assert_eq!(player.session().progress_secs(), 12.0);
    assert_eq!(player.session().duration_secs(), 200.0);
    assert!(player.session().is_full_view_open());
}

#[test]
fn mode_toggles_resync_surface() {
    let mut player = player();
    let q = import_all(player.session_mut(), &["A", "B"]);
    player
        .handle(Input::Command(Command::Play {
            track: q[0].clone(),
            queue: Some(q.clone()),
        }))
        .1
        .unwrap();
    let syncs = player.bridge().surface().syncs;

    player.handle(Input::Command(Command::ToggleShuffle)).1.unwrap();
    player.handle(Input::Command(Command::ToggleRepeat)).1.unwrap();

    assert_eq!(player.bridge().surface().syncs, syncs + 2);
}

#[test]
fn async_rejection_shows_paused_on_surface() {
    let mut player = player();
    let q = import_all(player.session_mut(), &["A"]);
    player
        .handle(Input::Command(Command::Play {
            track: q[0].clone(),
            queue: None,
        }))
        .1
        .unwrap();

    let attempt = player.session().device().last_attempt();
    let (events, result) = player.handle(Input::Device(DeviceSignal::PlayRejected {
        attempt,
        reason: "NotAllowedError".to_string(),
    }));

    assert!(result.is_ok());
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { .. })));
    assert_eq!(
        player.bridge().surface().state,
        Some(SurfacePlaybackState::Paused)
    );
}
