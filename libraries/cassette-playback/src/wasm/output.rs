//! `<audio>` element output device

use crate::device::{AudioOutput, DeviceSignal, PlayAttempt};
use crate::error::{PlaybackError, Result};
use crate::types::AudioHandle;
use std::rc::Rc;
use js_sys::{Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::HtmlAudioElement;

/// Receives device signals (the player's dispatcher)
pub type SignalSink = Rc<dyn Fn(DeviceSignal)>;

/// [`AudioOutput`] over a single `HTMLAudioElement`
///
/// Element events are forwarded to the sink as [`DeviceSignal`]s. The
/// listener closures live as long as the output.
///
/// Each `play()` promise gets the rejection handler bound to its attempt id,
/// so an `AbortError` from a play interrupted by a newer load or a pause
/// names the attempt it belongs to.
pub struct HtmlAudioOutput {
    element: HtmlAudioElement,
    plays: u64,
    on_rejected: Closure<dyn FnMut(JsValue, JsValue)>,
    _listeners: Vec<Closure<dyn FnMut()>>,
}

impl HtmlAudioOutput {
    /// Create a detached `<audio>` element and wire its events to `sink`
    pub fn create(sink: SignalSink) -> std::result::Result<Self, JsValue> {
        let element = HtmlAudioElement::new()?;
        element.set_preload("metadata");
        Ok(Self::attach(element, sink))
    }

    /// Wire the events of an existing element to `sink`
    pub fn attach(element: HtmlAudioElement, sink: SignalSink) -> Self {
        let time_closure = {
            let audio = element.clone();
            let sink = Rc::clone(&sink);
            Closure::wrap(Box::new(move || sink(DeviceSignal::TimeUpdate(audio.current_time())))
                as Box<dyn FnMut()>)
        };
        element.set_ontimeupdate(Some(time_closure.as_ref().unchecked_ref()));

        let duration_closure = {
            let audio = element.clone();
            let sink = Rc::clone(&sink);
            Closure::wrap(Box::new(move || {
                let duration = audio.duration();
                // Live streams report NaN / Infinity
                if duration.is_finite() {
                    sink(DeviceSignal::DurationKnown(duration));
                }
            }) as Box<dyn FnMut()>)
        };
        element.set_onloadedmetadata(Some(duration_closure.as_ref().unchecked_ref()));

        let ended_closure = {
            let sink = Rc::clone(&sink);
            Closure::wrap(Box::new(move || sink(DeviceSignal::Ended)) as Box<dyn FnMut()>)
        };
        element.set_onended(Some(ended_closure.as_ref().unchecked_ref()));

        let on_rejected = Closure::wrap(Box::new(move |attempt: JsValue, reason: JsValue| {
            let attempt = PlayAttempt::new(attempt.as_f64().unwrap_or_default() as u64);
            sink(DeviceSignal::PlayRejected {
                attempt,
                reason: describe(&reason),
            });
        }) as Box<dyn FnMut(JsValue, JsValue)>);

        Self {
            element,
            plays: 0,
            on_rejected,
            _listeners: vec![time_closure, duration_closure, ended_closure],
        }
    }

    /// The wrapped element
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }
}

impl AudioOutput for HtmlAudioOutput {
    fn set_source(&mut self, source: &AudioHandle) {
        self.element.set_src(source.as_str());
    }

    fn play(&mut self) -> Result<PlayAttempt> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::DeviceRejected(describe(&e)))?;
        self.plays += 1;
        let attempt = PlayAttempt::new(self.plays);

        // Autoplay refusals arrive as a rejected promise
        let handler = self
            .on_rejected
            .as_ref()
            .unchecked_ref::<Function>()
            .bind1(&JsValue::NULL, &JsValue::from_f64(attempt.id() as f64));
        let catch = Reflect::get(&promise, &"catch".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        match catch {
            Some(catch) => {
                if let Err(e) = catch.call1(&promise, &handler) {
                    tracing::warn!(error = %describe(&e), "could not watch play() promise");
                }
            }
            None => tracing::warn!("play() promise has no catch method"),
        }
        Ok(attempt)
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            tracing::warn!(error = %describe(&e), "audio element refused to pause");
        }
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }
}

impl Drop for HtmlAudioOutput {
    fn drop(&mut self) {
        self.element.set_ontimeupdate(None);
        self.element.set_onloadedmetadata(None);
        self.element.set_onended(None);
    }
}

/// Human-readable text for a JS error value
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
