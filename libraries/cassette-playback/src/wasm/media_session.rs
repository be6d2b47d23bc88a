//! `navigator.mediaSession` surface
//!
//! The Media Session API is reached through `js_sys::Reflect` so that browsers
//! without it (and web-sys builds without unstable APIs) simply get a no-op.

use crate::bridge::{NowPlayingMetadata, NowPlayingSurface, SurfacePlaybackState, TransportAction};
use js_sys::{Array, Function, Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

/// Receives transport actions (the player's dispatcher)
pub type ActionSink = Rc<dyn Fn(TransportAction)>;

/// [`NowPlayingSurface`] over the browser Media Session API
pub struct MediaSessionSurface {
    session: Option<JsValue>,
    handlers: Vec<(TransportAction, Closure<dyn FnMut()>)>,
}

impl MediaSessionSurface {
    /// Bind to `navigator.mediaSession`, routing actions to `sink`
    pub fn new(sink: ActionSink) -> Self {
        let session = web_sys::window()
            .and_then(|window| Reflect::get(&window.navigator(), &"mediaSession".into()).ok())
            .filter(|session| !session.is_undefined() && !session.is_null());

        if session.is_none() {
            tracing::debug!("media session API not available");
        }

        let handlers = TransportAction::ALL
            .into_iter()
            .map(|action| {
                let sink = Rc::clone(&sink);
                let closure = Closure::wrap(Box::new(move || sink(action)) as Box<dyn FnMut()>);
                (action, closure)
            })
            .collect();

        Self { session, handlers }
    }

    /// Whether the browser exposes a media session
    pub fn is_available(&self) -> bool {
        self.session.is_some()
    }

    fn set(&self, property: &str, value: &JsValue) {
        if let Some(session) = &self.session {
            if let Err(e) = Reflect::set(session, &property.into(), value) {
                tracing::warn!(property, error = ?e, "failed to update media session");
            }
        }
    }

    fn set_action_handler(&self, action: TransportAction, handler: &JsValue) {
        let Some(session) = &self.session else {
            return;
        };

        let setter = Reflect::get(session, &"setActionHandler".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());

        if let Some(setter) = setter {
            // Browsers throw for actions they do not support
            if let Err(e) = setter.call2(session, &action.as_str().into(), handler) {
                tracing::debug!(action = action.as_str(), error = ?e, "action handler rejected");
            }
        }
    }
}

impl NowPlayingSurface for MediaSessionSurface {
    fn set_metadata(&mut self, metadata: &NowPlayingMetadata) {
        match build_metadata(metadata) {
            Ok(value) => self.set("metadata", &value),
            Err(e) => tracing::warn!(error = ?e, "could not build media metadata"),
        }
    }

    fn set_playback_state(&mut self, state: SurfacePlaybackState) {
        self.set("playbackState", &state.as_str().into());
    }

    fn register_actions(&mut self, actions: &[TransportAction]) {
        for (action, closure) in &self.handlers {
            if actions.contains(action) {
                self.set_action_handler(*action, closure.as_ref());
            }
        }
    }

    fn clear(&mut self) {
        self.set("metadata", &JsValue::NULL);
    }
}

impl Drop for MediaSessionSurface {
    fn drop(&mut self) {
        for action in TransportAction::ALL {
            self.set_action_handler(action, &JsValue::NULL);
        }
    }
}

/// `new MediaMetadata({ title, artist, artwork: [{ src }] })`
fn build_metadata(metadata: &NowPlayingMetadata) -> Result<JsValue, JsValue> {
    let init = Object::new();
    Reflect::set(&init, &"title".into(), &metadata.title.as_str().into())?;
    Reflect::set(&init, &"artist".into(), &metadata.artist.as_str().into())?;

    let artwork = Array::new();
    if let Some(src) = &metadata.artwork {
        let image = Object::new();
        Reflect::set(&image, &"src".into(), &src.as_str().into())?;
        artwork.push(&image);
    }
    Reflect::set(&init, &"artwork".into(), &artwork)?;

    let constructor: Function = Reflect::get(&js_sys::global(), &"MediaMetadata".into())?.dyn_into()?;
    Reflect::construct(&constructor, &Array::of1(&init))
}
