use crumbs_core::MAP_STYLES;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct StylePickerProps {
    /// Id of the style in use.
    pub current: AttrValue,
    pub on_select: Callback<&'static str>,
}

#[function_component(StylePicker)]
pub fn style_picker(props: &StylePickerProps) -> Html {
    html! {
        <div class="grid grid-cols-2 gap-3" role="radiogroup" aria-label="Map Style">
            { for MAP_STYLES.iter().map(|style| {
                let selected = props.current.as_str() == style.id;
                let onclick = {
                    let on_select = props.on_select.clone();
                    let id = style.id;
                    Callback::from(move |_| on_select.emit(id))
                };
                let class = classes!(
                    "p-2", "rounded-xl", "border-2", "text-left",
                    if selected { "border-blue-500" } else { "border-transparent" }
                );
                html! {
                    <button
                        type="button"
                        role="radio"
                        {class}
                        {onclick}
                        aria-checked={selected.to_string()}
                        data-style={style.id}
                    >
                        <span class={classes!("block", "h-16", "rounded-lg", style.preview)}></span>
                        <span class="block mt-1 text-sm font-medium text-gray-900">{ style.name }</span>
                    </button>
                }
            }) }
        </div>
    }
}
