use crumbs_core::{Challenge, ChallengeId};
use std::rc::Rc;
use yew::prelude::*;

use crate::components::active_banner::ActiveBanner;
use crate::components::challenge_popup::ChallengePopup;
use crate::components::nearby_panel::{NearbyEntry, NearbyPanel};

#[derive(Properties, Clone, PartialEq)]
pub struct MapPageProps {
    pub nearby: Rc<Vec<NearbyEntry>>,
    pub selected: Option<Challenge>,
    pub active: Option<Challenge>,
    pub show_nearby: bool,
    pub score: u32,
    /// Short-lived message, e.g. a completed challenge.
    #[prop_or_default]
    pub notice: Option<AttrValue>,
    /// The map itself; kept out of this component so pages render without a browser.
    #[prop_or_default]
    pub children: Html,
    pub on_select: Callback<ChallengeId>,
    pub on_toggle_nearby: Callback<()>,
    pub on_dismiss: Callback<()>,
    pub on_start: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(MapPage)]
pub fn map_page(props: &MapPageProps) -> Html {
    html! {
        <section class="relative w-full h-full overflow-hidden" data-testid="map-screen">
            <div class="absolute inset-0">{ props.children.clone() }</div>

            if let Some(active) = props.active.clone() {
                <ActiveBanner challenge={active} on_cancel={props.on_cancel.clone()} />
            } else {
                <header class="absolute top-4 inset-x-4 flex items-center justify-between">
                    <h1 class="px-3 py-1 rounded-xl bg-white shadow font-bold text-gray-900">{ "Crumbs" }</h1>
                    <span class="px-3 py-1 rounded-xl bg-white shadow text-sm font-semibold text-blue-600" data-testid="score">
                        { format!("{} pts", props.score) }
                    </span>
                </header>
            }

            if let Some(notice) = props.notice.clone() {
                <div class="absolute top-20 inset-x-8 bg-green-500 text-white text-center rounded-xl py-2 shadow" role="status">
                    { notice }
                </div>
            }

            if let Some(selected) = props.selected.clone() {
                <ChallengePopup
                    challenge={selected}
                    on_close={props.on_dismiss.clone()}
                    on_start={props.on_start.clone()}
                />
            }

            <NearbyPanel
                entries={props.nearby.clone()}
                open={props.show_nearby}
                locked={props.active.is_some()}
                on_toggle={props.on_toggle_nearby.clone()}
                on_select={props.on_select.clone()}
            />
        </section>
    }
}
