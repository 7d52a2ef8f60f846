use std::cell::RefCell;
use std::rc::Rc;

use crumbs_core::{CaptureError, CaptureFlow, CaptureState, Challenge, Snapshot};
use yew::prelude::*;

use crate::camera::MediaCapture;

#[derive(Properties, Clone, PartialEq)]
pub struct CameraPageProps {
    /// Photo challenge being attempted, if the camera was opened for one.
    #[prop_or_default]
    pub challenge: Option<Challenge>,
    pub on_close: Callback<()>,
    pub on_accept: Callback<Snapshot>,
}

type Flow = Rc<RefCell<CaptureFlow<MediaCapture>>>;

fn sync(view: &UseStateHandle<CaptureState>, flow: &Flow) {
    view.set(flow.borrow().state().clone());
}

#[function_component(CameraPage)]
pub fn camera_page(props: &CameraPageProps) -> Html {
    let video = use_node_ref();
    let canvas = use_node_ref();
    let view = use_state(CaptureState::default);
    let error = use_state(|| None::<AttrValue>);

    let flow: Flow = use_mut_ref({
        let video = video.clone();
        let canvas = canvas.clone();
        let report = error.setter();
        move || {
            CaptureFlow::new(MediaCapture::new(
                video,
                canvas,
                Rc::new(move |err: CaptureError| {
                    report.set(Some(AttrValue::from(err.to_string())));
                }),
            ))
        }
    });

    #[cfg(target_arch = "wasm32")]
    {
        let flow = flow.clone();
        let view = view.clone();
        let error = error.clone();
        use_effect_with((), move |()| {
            if let Err(err) = flow.borrow_mut().open() {
                error.set(Some(AttrValue::from(err.to_string())));
            }
            sync(&view, &flow);
            move || flow.borrow_mut().close()
        });
    }

    let on_shutter = {
        let flow = flow.clone();
        let view = view.clone();
        let error = error.clone();
        Callback::from(move |_| {
            let shot = flow.borrow_mut().shutter();
            if let Err(err) = shot {
                error.set(Some(AttrValue::from(err.to_string())));
            }
            sync(&view, &flow);
        })
    };
    let on_retake = {
        let flow = flow.clone();
        let view = view.clone();
        let error = error.clone();
        Callback::from(move |_| {
            error.set(None);
            let restarted = flow.borrow_mut().retake();
            if let Err(err) = restarted {
                error.set(Some(AttrValue::from(err.to_string())));
            }
            sync(&view, &flow);
        })
    };
    let on_save = {
        let flow = flow.clone();
        let on_accept = props.on_accept.clone();
        Callback::from(move |_| {
            let kept = flow.borrow_mut().accept();
            if let Some(snapshot) = kept {
                on_accept.emit(snapshot);
            }
        })
    };
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| {
            flow.borrow_mut().close();
            on_close.emit(());
        })
    };

    let captured = match &*view {
        CaptureState::Captured(snapshot) => Some(snapshot.data_url.clone()),
        CaptureState::Closed | CaptureState::Live => None,
    };
    let video_class = classes!(
        "w-full", "h-full", "object-cover",
        captured.is_some().then_some("hidden")
    );

    html! {
        <section class="relative w-full h-full bg-black" data-testid="camera-screen">
            <video ref={video} class={video_class} autoplay="true" playsinline="true" muted="true"></video>
            if let Some(src) = captured.clone() {
                <img src={src} alt="Captured photo" class="w-full h-full object-cover" />
            }
            <canvas ref={canvas} class="hidden"></canvas>

            <div class="absolute top-4 inset-x-4 flex items-center justify-between text-white">
                <button type="button" class="p-2 rounded-full bg-black/50" aria-label="Close camera" onclick={on_close}>
                    { "✕" }
                </button>
                if let Some(challenge) = props.challenge.as_ref() {
                    <span class="px-3 py-1 rounded-full bg-black/50 text-sm">{ challenge.title.clone() }</span>
                }
            </div>

            if let Some(message) = (*error).clone() {
                <p class="absolute top-20 inset-x-8 text-center text-sm text-red-300" role="alert">{ message }</p>
            }

            <div class="absolute bottom-8 inset-x-0 flex justify-center gap-6">
                if captured.is_some() {
                    <button type="button" class="px-6 py-3 rounded-full bg-white/20 text-white" onclick={on_retake}>
                        { "Retake" }
                    </button>
                    <button type="button" class="px-6 py-3 rounded-full bg-blue-500 text-white font-semibold" onclick={on_save}>
                        { "Save" }
                    </button>
                } else {
                    <button
                        type="button"
                        class="w-16 h-16 rounded-full border-4 border-white bg-white/30"
                        aria-label="Take photo"
                        onclick={on_shutter}
                        data-testid="shutter"
                    ></button>
                }
            </div>
        </section>
    }
}
