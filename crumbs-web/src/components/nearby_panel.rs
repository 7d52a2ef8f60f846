use crumbs_core::{Challenge, ChallengeId};
use std::rc::Rc;
use yew::prelude::*;

use super::challenge_row::ChallengeRow;

/// A challenge with its distance from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyEntry {
    pub challenge: Challenge,
    pub distance_km: Option<f64>,
}

#[derive(Properties, Clone, PartialEq)]
pub struct NearbyPanelProps {
    pub entries: Rc<Vec<NearbyEntry>>,
    pub open: bool,
    /// Rows are disabled while a challenge is active.
    pub locked: bool,
    pub on_toggle: Callback<()>,
    pub on_select: Callback<ChallengeId>,
}

#[function_component(NearbyPanel)]
pub fn nearby_panel(props: &NearbyPanelProps) -> Html {
    let on_handle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_| on_toggle.emit(()))
    };
    let sheet = classes!(
        "absolute", "bottom-0", "left-0", "right-0", "bg-white", "rounded-t-3xl", "shadow-lg",
        "transition-transform", "duration-300",
        if props.open { "translate-y-0" } else { "translate-y-[calc(100%-3rem)]" }
    );

    html! {
        <section class={sheet} aria-label="Nearby Challenges" data-testid="nearby-panel" data-open={props.open.to_string()}>
            <button
                type="button"
                class="w-full flex justify-center py-3"
                aria-expanded={props.open.to_string()}
                aria-label="Toggle nearby challenges"
                onclick={on_handle}
            >
                <span class="w-12 h-1.5 bg-gray-300 rounded-full"></span>
            </button>
            <div class="px-4 pb-4">
                <h2 class="text-lg font-bold text-gray-900 mb-2">{ "Nearby Challenges" }</h2>
                if props.entries.is_empty() {
                    <p class="text-sm text-gray-500">{ "No challenges nearby yet." }</p>
                } else {
                    <ul class="space-y-1">
                        { for props.entries.iter().map(|entry| html! {
                            <li key={entry.challenge.id.to_string()}>
                                <ChallengeRow
                                    challenge={entry.challenge.clone()}
                                    distance_km={entry.distance_km}
                                    disabled={props.locked}
                                    on_select={props.on_select.clone()}
                                />
                            </li>
                        }) }
                    </ul>
                }
            </div>
        </section>
    }
}
