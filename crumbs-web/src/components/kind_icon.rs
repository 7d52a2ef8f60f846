use crumbs_core::ChallengeKind;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct KindIconProps {
    pub kind: ChallengeKind,
    #[prop_or(AttrValue::Static("h-5 w-5"))]
    pub class: AttrValue,
}

/// Camera glyph for photo challenges, map pin for location challenges.
#[function_component(KindIcon)]
pub fn kind_icon(props: &KindIconProps) -> Html {
    let paths = match props.kind {
        ChallengeKind::Photo => html! {
            <>
                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M3 9a2 2 0 012-2h.93a2 2 0 001.664-.89l.812-1.22A2 2 0 0110.07 4h3.86a2 2 0 011.664.89l.812 1.22A2 2 0 0018.07 7H19a2 2 0 012 2v9a2 2 0 01-2 2H5a2 2 0 01-2-2V9z" />
                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 13a3 3 0 11-6 0 3 3 0 016 0z" />
            </>
        },
        ChallengeKind::Location => html! {
            <>
                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M17.657 16.657L13.414 20.9a1.998 1.998 0 01-2.827 0l-4.244-4.243a8 8 0 1111.314 0z" />
                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 11a3 3 0 11-6 0 3 3 0 016 0z" />
            </>
        },
    };
    html! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            class={props.class.clone()}
            fill="none"
            viewBox="0 0 24 24"
            stroke="currentColor"
            aria-hidden="true"
            data-kind={props.kind.label()}
        >
            { paths }
        </svg>
    }
}

/// Badge background for a challenge kind.
#[must_use]
pub const fn kind_badge(kind: ChallengeKind) -> &'static str {
    match kind {
        ChallengeKind::Photo => "bg-purple-100 text-purple-600",
        ChallengeKind::Location => "bg-green-100 text-green-600",
    }
}
