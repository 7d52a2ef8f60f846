use yew::prelude::*;

use crate::components::style_picker::StylePicker;

/// A read-only settings row: label and current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingRow {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingGroup {
    pub title: &'static str,
    pub rows: &'static [SettingRow],
}

pub const SETTING_GROUPS: &[SettingGroup] = &[
    SettingGroup {
        title: "Account",
        rows: &[
            SettingRow { label: "Profile Information", value: "Edit" },
            SettingRow { label: "Language", value: "English" },
        ],
    },
    SettingGroup {
        title: "Notifications",
        rows: &[
            SettingRow { label: "Push Notifications", value: "On" },
            SettingRow { label: "Email Notifications", value: "Off" },
        ],
    },
    SettingGroup {
        title: "Privacy",
        rows: &[
            SettingRow { label: "Location Services", value: "On" },
            SettingRow { label: "Data Sharing", value: "Off" },
        ],
    },
];

#[derive(Properties, Clone, PartialEq)]
pub struct SettingsPageProps {
    pub current_style: AttrValue,
    pub on_select_style: Callback<&'static str>,
}

#[function_component(SettingsPage)]
pub fn settings_page(props: &SettingsPageProps) -> Html {
    html! {
        <section class="h-full overflow-y-auto p-4 pb-24 space-y-6" data-testid="settings-screen">
            <h1 class="text-2xl font-bold text-gray-900">{ "Settings" }</h1>

            { for SETTING_GROUPS.iter().map(|group| html! {
                <div class="bg-white rounded-2xl shadow-sm" key={group.title}>
                    <h2 class="px-4 pt-3 text-xs uppercase tracking-wide text-gray-500">{ group.title }</h2>
                    <ul class="divide-y divide-gray-100">
                        { for group.rows.iter().map(|row| html! {
                            <li class="flex justify-between px-4 py-3">
                                <span class="text-gray-900">{ row.label }</span>
                                <span class="text-gray-500">{ row.value }</span>
                            </li>
                        }) }
                    </ul>
                </div>
            }) }

            <div class="bg-white rounded-2xl shadow-sm p-4 space-y-3">
                <h2 class="text-xs uppercase tracking-wide text-gray-500">{ "Map Style" }</h2>
                <StylePicker current={props.current_style.clone()} on_select={props.on_select_style.clone()} />
            </div>

            <button type="button" class="w-full py-3 rounded-2xl bg-red-50 text-red-600 font-semibold" disabled=true>
                { "Sign Out" }
            </button>
        </section>
    }
}
