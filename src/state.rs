use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::LeptosOptions;
        use std::path::PathBuf;
        use std::sync::Arc;

        use crate::services::GenerationBackend;

        /// Everything the relay needs per request. Holds no per-request state.
        #[derive(Clone)]
        pub struct RelayState {
            pub backend: Arc<dyn GenerationBackend>,
        }

        impl RelayState {
            pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
                Self { backend }
            }
        }

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub relay: RelayState,
            pub pull_requests_path: Option<PathBuf>,
        }

        impl AppState {
            pub fn new(
                leptos_options: LeptosOptions,
                relay: RelayState,
                pull_requests_path: Option<PathBuf>,
            ) -> Self {
                Self {
                    leptos_options,
                    relay,
                    pull_requests_path,
                }
            }
        }
    }
}
