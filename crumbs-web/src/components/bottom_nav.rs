use yew::prelude::*;

use crate::router::Route;

#[derive(Properties, Clone, PartialEq)]
pub struct BottomNavProps {
    pub current: Route,
    pub on_navigate: Callback<Route>,
}

fn tab_icon(route: Route) -> Html {
    let d = match route {
        Route::Map => "M9 20l-5.447-2.724A1 1 0 013 16.382V5.618a1 1 0 011.447-.894L9 7m0 13l6-3m-6 3V7m6 10l4.553 2.276A1 1 0 0021 18.382V7.618a1 1 0 00-.553-.894L15 4m0 13V4m0 0L9 7",
        Route::Camera => "M3 9a2 2 0 012-2h.93a2 2 0 001.664-.89l.812-1.22A2 2 0 0110.07 4h3.86a2 2 0 011.664.89l.812 1.22A2 2 0 0018.07 7H19a2 2 0 012 2v9a2 2 0 01-2 2H5a2 2 0 01-2-2V9z",
        Route::Settings | Route::NotFound => "M10.325 4.317c.426-1.756 2.924-1.756 3.35 0a1.724 1.724 0 002.573 1.066c1.543-.94 3.31.826 2.37 2.37a1.724 1.724 0 001.065 2.572c1.756.426 1.756 2.924 0 3.35a1.724 1.724 0 00-1.066 2.573c.94 1.543-.826 3.31-2.37 2.37a1.724 1.724 0 00-2.572 1.065c-.426 1.756-2.924 1.756-3.35 0a1.724 1.724 0 00-2.573-1.066c-1.543.94-3.31-.826-2.37-2.37a1.724 1.724 0 00-1.065-2.572c-1.756-.426-1.756-2.924 0-3.35a1.724 1.724 0 001.066-2.573c-.94-1.543.826-3.31 2.37-2.37.996.608 2.296.07 2.572-1.065z",
    };
    html! {
        <svg xmlns="http://www.w3.org/2000/svg" class="h-6 w-6" fill="none" viewBox="0 0 24 24" stroke="currentColor" aria-hidden="true">
            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" {d} />
        </svg>
    }
}

#[function_component(BottomNav)]
pub fn bottom_nav(props: &BottomNavProps) -> Html {
    html! {
        <nav class="absolute bottom-0 inset-x-0 bg-white border-t border-gray-200 flex justify-around py-2" aria-label="Main">
            { for Route::TABS.into_iter().map(|route| {
                let current = route == props.current;
                let onclick = {
                    let on_navigate = props.on_navigate.clone();
                    Callback::from(move |_| on_navigate.emit(route))
                };
                let class = classes!(
                    "flex", "flex-col", "items-center", "text-xs", "px-4",
                    if current { "text-blue-600" } else { "text-gray-500" }
                );
                html! {
                    <button
                        type="button"
                        {class}
                        {onclick}
                        aria-current={current.then_some("page")}
                        data-testid={format!("nav-{}", route.label().to_lowercase())}
                    >
                        { tab_icon(route) }
                        <span>{ route.label() }</span>
                    </button>
                }
            }) }
        </nav>
    }
}
