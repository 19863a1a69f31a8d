//! 音声プレイヤー
//!
//! 状態遷移は `AudioController` が決め、ここではその結果のコマンドを
//! `<audio>` 要素に適用する。

use gloo::events::EventListener;
use gloo::utils::document;
use leptos::ev;
use leptos::html::Audio;
use leptos::prelude::*;
use leptos::task::spawn_local;
use scene_guide_common::playlist::track_url;
use scene_guide_common::{AudioCommand, AudioController, AudioEvent, Playlist};
use wasm_bindgen_futures::JsFuture;

use crate::dom;

pub const PLAYER_AREA_ID: &str = "player-area";

#[component]
pub fn AudioPlayer(playlist: Playlist, label: String) -> impl IntoView {
    let first_src = track_url(playlist.current(), dom::now_ms());
    let controller = RwSignal::new(AudioController::new(playlist));
    let audio_ref = NodeRef::<Audio>::new();

    // コマンドを <audio> に適用。play() の拒否は PlayRejected として戻す
    let dispatch = move |event: AudioEvent| {
        let command = controller
            .try_update(|c| c.handle(event))
            .flatten();
        let Some(command) = command else {
            return;
        };
        let Some(audio) = audio_ref.get_untracked() else {
            return;
        };
        let play = move |audio: web_sys::HtmlAudioElement| match audio.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("play rejected: {:?}", e);
                    controller.update(|c| {
                        c.handle(AudioEvent::PlayRejected);
                    });
                }
            }),
            Err(e) => log::debug!("play failed: {:?}", e),
        };
        match command {
            AudioCommand::Play => play(audio),
            AudioCommand::Pause => {
                if let Err(e) = audio.pause() {
                    log::debug!("pause failed: {:?}", e);
                }
            }
            AudioCommand::Switch(track) => {
                log::warn!("track failed, switching to {}", track);
                audio.set_src(&track_url(&track, dom::now_ms()));
                play(audio);
            }
            AudioCommand::Exhausted => log::warn!("no playable track left"),
        }
    };

    // 最初の操作で一度だけ自動再生を試す
    let gesture = StoredValue::new_local(Vec::<EventListener>::new());
    for kind in ["pointerdown", "keydown", "touchstart"] {
        let listener = EventListener::once(&document(), kind, move |e| {
            let on_player = dom::event_within(e, PLAYER_AREA_ID);
            dispatch(AudioEvent::FirstGesture { on_player });
        });
        gesture.update_value(|ls| ls.push(listener));
    }

    let keydown = window_event_listener(ev::keydown, move |e| {
        let space = e.code() == "Space" || e.key() == " ";
        let in_text_input = dom::focus_in_text_input();
        if space && !in_text_input {
            e.prevent_default();
        }
        dispatch(AudioEvent::Key { space, in_text_input });
    });

    let visibility = StoredValue::new_local(Some(EventListener::new(
        &document(),
        "visibilitychange",
        move |_| {
            if dom::document_hidden() {
                dispatch(AudioEvent::DocumentHidden);
            }
        },
    )));

    on_cleanup(move || {
        keydown.remove();
        gesture.update_value(|ls| ls.clear());
        visibility.update_value(|v| {
            v.take();
        });
    });

    let button_label = move || controller.with(|c| c.button_label());
    let hint = move || controller.with(|c| c.needs_hint());

    view! {
        <div id=PLAYER_AREA_ID>
            <span id="audio-label">{label}</span>
            <audio
                id="scene-audio"
                preload="auto"
                src=first_src
                node_ref=audio_ref
                on:error=move |_| dispatch(AudioEvent::TrackError)
                on:playing=move |_| dispatch(AudioEvent::Playing)
                on:pause=move |_| dispatch(AudioEvent::Paused)
            ></audio>
            <button
                class="btn"
                id="btnPlay"
                class:hint=hint
                on:click=move |e| {
                    e.stop_propagation();
                    dispatch(AudioEvent::ToggleClicked);
                }
            >
                {button_label}
            </button>
        </div>
    }
}
