use super::*;
use std::sync::mpsc;

fn player() -> PlayerState {
    PlayerState {
        status: PlayerStatus::Playing,
        track_name: "Test Title".to_string(),
        artist_name: "Test Artist".to_string(),
        album_name: "Test Album".to_string(),
        cover_url: "http://127.0.0.1:23330/cover.jpg".to_string(),
        duration: 200.5,
        ..PlayerState::default()
    }
}

#[test]
fn set_player_mirrors_snapshot_into_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.set_player(&player());
    {
        let s = state.lock().unwrap();
        assert_eq!(s.status, PlayerStatus::Playing);
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert!(s.art_url.as_deref().unwrap().ends_with("cover.jpg"));
        assert_eq!(s.length_micros, Some(200_500_000));
    }

    handle.set_player(&PlayerState::default());
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
    }
}

#[test]
fn playback_status_maps_remote_status_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<MediaKey>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    for (status, expected) in [
        (PlayerStatus::Stopped, "Stopped"),
        (PlayerStatus::Playing, "Playing"),
        (PlayerStatus::Paused, "Paused"),
        (PlayerStatus::Error, "Stopped"),
    ] {
        state.lock().unwrap().status = status;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<MediaKey>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    MprisHandle {
        state: state.clone(),
    }
    .set_player(&player());

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_media_keys() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<MediaKey>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let keys: Vec<MediaKey> = rx.try_iter().collect();
    assert_eq!(
        keys,
        vec![
            MediaKey::PlayPause,
            MediaKey::Next,
            MediaKey::Prev,
            MediaKey::Stop
        ]
    );
}

#[test]
fn disabled_bridge_still_records_state() {
    let (tx, _rx) = mpsc::channel::<MediaKey>();
    let handle = spawn_mpris(tx, false);
    handle.set_player(&player());
    assert_eq!(
        handle.state.lock().unwrap().title.as_deref(),
        Some("Test Title")
    );
}
