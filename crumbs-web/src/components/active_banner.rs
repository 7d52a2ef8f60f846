use crumbs_core::Challenge;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ActiveBannerProps {
    pub challenge: Challenge,
    pub on_cancel: Callback<()>,
}

#[function_component(ActiveBanner)]
pub fn active_banner(props: &ActiveBannerProps) -> Html {
    let on_cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div
            class="absolute top-4 inset-x-4 bg-white rounded-xl shadow-lg p-3 flex items-center justify-between"
            role="status"
            data-testid="active-banner"
        >
            <div>
                <p class="text-xs text-gray-500">{ "Following directions to:" }</p>
                <p class="font-semibold text-gray-900">{ props.challenge.title.clone() }</p>
            </div>
            <button type="button" class="px-3 py-1 rounded-lg bg-red-50 text-red-600 text-sm" onclick={on_cancel}>
                { "Cancel" }
            </button>
        </div>
    }
}
