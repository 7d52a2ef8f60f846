use crumbs_core::{Challenge, ChallengeId};
use yew::prelude::*;

use super::kind_icon::{KindIcon, kind_badge};

#[derive(Properties, Clone, PartialEq)]
pub struct ChallengeRowProps {
    pub challenge: Challenge,
    /// Live distance; falls back to the precomputed one.
    #[prop_or_default]
    pub distance_km: Option<f64>,
    #[prop_or_default]
    pub disabled: bool,
    pub on_select: Callback<ChallengeId>,
}

#[must_use]
pub fn format_distance(km: Option<f64>) -> String {
    km.map_or_else(|| "Distance unknown".to_string(), |km| format!("{km:.1}km away"))
}

#[function_component(ChallengeRow)]
pub fn challenge_row(props: &ChallengeRowProps) -> Html {
    let challenge = &props.challenge;
    let onclick = {
        let on_select = props.on_select.clone();
        let id = challenge.id.clone();
        Callback::from(move |_| on_select.emit(id.clone()))
    };
    let class = classes!(
        "w-full", "flex", "items-center", "gap-3", "p-3", "rounded-xl", "text-left",
        if props.disabled { "opacity-50 cursor-not-allowed" } else { "hover:bg-gray-50" }
    );
    let distance = format_distance(props.distance_km.or(challenge.distance));

    html! {
        <button
            type="button"
            {class}
            disabled={props.disabled}
            {onclick}
            data-testid={format!("challenge-row-{}", challenge.id)}
        >
            <span class={classes!("p-2", "rounded-full", kind_badge(challenge.kind))}>
                <KindIcon kind={challenge.kind} />
            </span>
            <span class="flex-1">
                <span class="block font-semibold text-gray-900">{ challenge.title.clone() }</span>
                <span class="block text-sm text-gray-500">{ distance }</span>
            </span>
            <span class="text-sm font-semibold text-blue-600">{ format!("{}pts", challenge.points) }</span>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::format_distance;

    #[test]
    fn distances_use_one_decimal() {
        assert_eq!(format_distance(Some(0.5)), "0.5km away");
        assert_eq!(format_distance(Some(1.24)), "1.2km away");
        assert_eq!(format_distance(None), "Distance unknown");
    }
}
