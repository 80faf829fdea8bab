use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::{
            body::Body as AxumBody,
            extract::State,
            http::Request,
            middleware,
            response::IntoResponse,
            routing::{get, post},
            Router,
        };
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
        use diff_digest::app::*;
        use diff_digest::config::Config;
        use diff_digest::handlers::generate_notes;
        use diff_digest::middleware::tracing::trace_requests;
        use diff_digest::services::OpenAiBackend;
        use diff_digest::state::{AppState, RelayState};
        use std::net::SocketAddr;
        use std::sync::Arc;
        use tracing_subscriber::EnvFilter;

        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));
            tracing_subscriber::fmt()
                .with_target(false)
                .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                .init();

            let config = Config::from_env()?;

            let conf = get_configuration(None)?;
            let addr = conf.leptos_options.site_addr;
            let leptos_options = conf.leptos_options;

            let routes = generate_route_list(App);

            log::info!("Using model {}", config.relay.model);
            let relay = RelayState::new(Arc::new(OpenAiBackend::new(&config.relay)));
            let app_state = AppState::new(leptos_options.clone(), relay, config.pull_requests_path);

            async fn server_fn_handler(
                State(app_state): State<AppState>,
                request: Request<AxumBody>,
            ) -> impl IntoResponse {
                handle_server_fns_with_context(
                    move || {
                        provide_context(app_state.clone());
                    },
                    request,
                )
                .await
            }

            let relay_routes = Router::new()
                .route("/api/generate-notes", post(generate_notes))
                .layer(middleware::from_fn(trace_requests));

            let app = Router::new()
                .route(
                    "/api/{*fn_name}",
                    get(server_fn_handler).post(server_fn_handler),
                )
                .merge(relay_routes)
                .leptos_routes_with_handler(routes, get(|State(app_state): State<AppState>, request: Request<AxumBody>| async move {
                    let handler = leptos_axum::render_app_to_stream_with_context(
                        move || {
                            provide_context(app_state.clone());
                        },
                        move || shell(leptos_options.clone())
                    );
                    handler(request).await.into_response()
                }))
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .with_state(app_state);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            log::info!("listening on http://{}", &addr);
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
            Ok(())
        }
    } else {
        pub fn main() {
            // no client-side main function
            // see lib.rs for hydration function instead
        }
    }
}
