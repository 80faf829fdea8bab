use leptos::prelude::*;

use crate::components::pull_request_item::PullRequestItem;
use crate::server_fn::get_pull_requests;

#[component]
pub fn PullRequestList() -> impl IntoView {
    let pull_requests = Resource::new(|| (), |_| get_pull_requests());

    view! {
        <div class="container mx-auto p-4">
            <h2 class="text-2xl font-semibold mb-6 text-teal-600 dark:text-aqua-400">
                "Merged Pull Requests"
            </h2>
            <Suspense fallback=|| {
                view! { <p class="text-center text-teal-600 dark:text-aqua-400">"Loading..."</p> }
            }>
                {move || {
                    match pull_requests.get() {
                        Some(Ok(prs)) if prs.is_empty() => {
                            view! {
                                <div class="text-center text-gray-500 dark:text-gray-400">
                                    "No pull requests found"
                                </div>
                            }
                                .into_any()
                        }
                        Some(Ok(prs)) => {
                            view! {
                                <div>
                                    <For
                                        each=move || prs.clone()
                                        key=|pr| pr.id.clone()
                                        children=move |pr| view! { <PullRequestItem pr=pr /> }
                                    />
                                </div>
                            }
                                .into_any()
                        }
                        Some(Err(e)) => {
                            log::error!("Error loading pull requests: {e:?}");
                            view! {
                                <div class="text-center text-red-500">
                                    "Error loading pull requests"
                                </div>
                            }
                                .into_any()
                        }
                        None => {
                            view! {
                                <div class="text-center text-gray-500 dark:text-gray-400">
                                    "Loading..."
                                </div>
                            }
                                .into_any()
                        }
                    }
                }}
            </Suspense>
        </div>
    }
}
