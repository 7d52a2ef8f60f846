use yew::prelude::*;

/// Shown when no route matches.
#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_go_home: Callback<()>,
}

#[function_component(NotFound)]
pub fn not_found(props: &Props) -> Html {
    let go_home = {
        let cb = props.on_go_home.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="flex flex-col items-center justify-center h-full gap-4 p-8 text-center" aria-live="assertive">
            <h1 class="text-2xl font-bold text-gray-900">{ "Nothing here" }</h1>
            <p class="text-gray-500">{ "That trail has gone cold." }</p>
            <button type="button" class="px-4 py-2 rounded-xl bg-blue-500 text-white" onclick={go_home}>
                { "Back to the map" }
            </button>
        </section>
    }
}
