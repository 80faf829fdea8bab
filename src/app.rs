use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};

use crate::components::pull_request_list::PullRequestList;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/diff-digest.css" />
        <Title text="Diff Digest | Developer & Marketing Release Notes" />
        <Router>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <div class="w-full min-h-screen mx-auto bg-gray-100 dark:bg-teal-900">
            <div class="max-w-5xl mx-auto p-8">
                <h1 class="text-5xl font-bold mb-6 text-center text-seafoam-600 dark:text-mint-400">
                    "Diff Digest"
                </h1>
                <p class="text-lg text-center text-gray-600 dark:text-gray-300 mb-12">
                    "Transforming Git diffs into dual-tone release notes with AI"
                </p>
                <PullRequestList />
            </div>
        </div>
    }
}
