//! Form Fields
//!
//! Labeled inputs shared by the form pages.

use leptos::*;

const INPUT_CLASS: &str = "w-full border border-gray-300 p-2 rounded-xl";

/// Centered card with a title, wrapping a form
#[component]
pub fn FormCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-100 px-4">
            <div class="bg-white p-6 rounded-2xl shadow-md w-full max-w-md">
                <h1 class="text-3xl font-bold text-center mb-6">{title}</h1>
                {children()}
            </div>
        </div>
    }
}

/// Required single-line input bound to a signal
#[component]
pub fn TextField(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")]
    input_type: &'static str,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm font-medium">{label}</label>
            <input
                type=input_type
                class=INPUT_CLASS
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                required
            />
        </div>
    }
}

/// Required multi-line input bound to a signal
#[component]
pub fn TextArea(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = 3)]
    rows: u32,
    #[prop(optional)]
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm font-medium">{label}</label>
            <textarea
                class=INPUT_CLASS
                rows=rows
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                required
            />
        </div>
    }
}

/// Required select with a disabled placeholder option
#[component]
pub fn SelectField(
    label: &'static str,
    value: RwSignal<String>,
    placeholder: &'static str,
    /// (value, label) pairs
    #[prop(into)]
    options: MaybeSignal<Vec<(String, String)>>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm font-medium">{label}</label>
            <select
                class=INPUT_CLASS
                prop:value=move || value.get()
                on:change=move |ev| value.set(event_target_value(&ev))
                required
            >
                <option value="" disabled>{placeholder}</option>
                {move || {
                    options.get()
                        .into_iter()
                        .map(|(v, l)| view! { <option value=v>{l}</option> })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

/// Optional image upload
#[component]
pub fn FileField(label: &'static str, input_ref: NodeRef<html::Input>) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm font-medium mb-1">{label}</label>
            <input type="file" accept="image/*" node_ref=input_ref class="w-full" />
        </div>
    }
}

/// First file chosen in a file input
pub fn selected_file(input_ref: NodeRef<html::Input>) -> Option<web_sys::File> {
    input_ref.get_untracked()?.files()?.get(0)
}

/// Full-width submit button, disabled while busy
#[component]
pub fn SubmitButton(
    label: &'static str,
    #[prop(into)]
    busy: MaybeSignal<bool>,
    #[prop(default = "bg-green-500 hover:bg-green-600")]
    color: &'static str,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            disabled=move || busy.get()
            class=format!(
                "w-full {} disabled:bg-gray-400 text-white py-2 rounded-xl transition",
                color
            )
        >
            {move || if busy.get() { "Please wait..." } else { label }}
        </button>
    }
}
