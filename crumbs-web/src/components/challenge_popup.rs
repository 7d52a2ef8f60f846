use crumbs_core::Challenge;
use yew::prelude::*;

use super::kind_icon::{KindIcon, kind_badge};

#[derive(Properties, Clone, PartialEq)]
pub struct ChallengePopupProps {
    pub challenge: Challenge,
    pub on_close: Callback<()>,
    pub on_start: Callback<()>,
}

#[function_component(ChallengePopup)]
pub fn challenge_popup(props: &ChallengePopupProps) -> Html {
    let challenge = &props.challenge;
    let on_close = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_start = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div
            class="absolute inset-x-4 bottom-24 bg-white rounded-2xl shadow-xl p-4"
            role="dialog"
            aria-labelledby="challenge-popup-title"
            data-testid="challenge-popup"
        >
            <div class="flex items-start gap-3">
                <span class={classes!("p-2", "rounded-full", kind_badge(challenge.kind))}>
                    <KindIcon kind={challenge.kind} class="h-6 w-6" />
                </span>
                <div class="flex-1">
                    <h3 id="challenge-popup-title" class="font-bold text-gray-900">{ challenge.title.clone() }</h3>
                    <p class="text-sm text-gray-600">{ challenge.description.clone() }</p>
                    <p class="text-sm font-semibold text-blue-600 mt-1">{ format!("{} points", challenge.points) }</p>
                </div>
            </div>
            <div class="flex gap-2 mt-4">
                <button type="button" class="flex-1 py-2 rounded-xl bg-gray-100 text-gray-700" onclick={on_close}>
                    { "Close" }
                </button>
                <button type="button" class="flex-1 py-2 rounded-xl bg-blue-500 text-white font-semibold" onclick={on_start}>
                    { "Start Challenge" }
                </button>
            </div>
        </div>
    }
}
