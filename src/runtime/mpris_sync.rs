use crate::app::App;
use crate::mpris::{MediaKey, MprisHandle};
use crate::remote::ControlCmd;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    if let Some(player) = &app.player {
        mpris.set_player(player);
    }
}

/// Control request for a media key; `None` for keys handled locally (quit).
pub fn media_key_command(key: &MediaKey, app: &App) -> Option<ControlCmd> {
    match key {
        MediaKey::Quit => None,
        MediaKey::Play => Some(ControlCmd::Play),
        // The remote API has no stop; pausing is the closest.
        MediaKey::Pause | MediaKey::Stop => Some(ControlCmd::Pause),
        MediaKey::PlayPause => Some(app.play_toggle()),
        MediaKey::Next => Some(ControlCmd::SkipNext),
        MediaKey::Prev => Some(ControlCmd::SkipPrev),
    }
}
