use leptos::{prelude::*, task::spawn_local};
use log::{error, info, warn};

use crate::client::stream_notes;
use crate::error::ClientError;
use crate::notes::{ExtractedNotes, KeyValueStore, NotesCache, Section};
use crate::protocol::GenerationOutcome;
use crate::types::{GenerationRequest, PullRequest};

const INCOMPLETE_MESSAGE: &str =
    "The stream ended before generation finished. These notes may be incomplete and were not saved.";

/// What an item shows once a generation has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub notes: Option<ExtractedNotes>,
    pub error: Option<String>,
}

/// Applies the save rules to a finished generation.
///
/// A complete result replaces the cached entry. A truncated one is shown with
/// a warning and leaves the cache alone. A failure shows the error next to
/// whatever was cached before.
pub fn settle<S: KeyValueStore>(
    cache: Option<&NotesCache<S>>,
    id: &str,
    result: Result<GenerationOutcome, ClientError>,
) -> Settled {
    match result {
        Ok(outcome) if outcome.is_complete() => {
            info!("Generated notes for PR {id}");
            if let Some(cache) = cache {
                if let Err(e) = cache.set(id, &outcome.notes) {
                    error!("Failed to save notes for PR {id}: {e}");
                }
            }
            Settled {
                notes: Some(outcome.notes),
                error: None,
            }
        }
        Ok(outcome) => {
            warn!("Notes for PR {id} may be incomplete");
            Settled {
                notes: Some(outcome.notes),
                error: Some(INCOMPLETE_MESSAGE.to_string()),
            }
        }
        Err(e) => {
            error!("Failed to generate notes for PR {id}: {e}");
            Settled {
                notes: cache.and_then(|cache| cache.get(id)),
                error: Some(e.to_string()),
            }
        }
    }
}

/// One pull request with its generate / regenerate / clear controls.
///
/// Only one generation runs per item at a time; the button stays disabled
/// while `is_generating` is set.
#[component]
pub fn PullRequestItem(pr: PullRequest) -> impl IntoView {
    let (is_generating, set_is_generating) = signal(false);
    let (notes, set_notes) = signal(None::<ExtractedNotes>);
    let (error, set_error) = signal(None::<String>);
    let (streaming_content, set_streaming_content) = signal(String::new());

    let heading = format!("PR #{}: {}", pr.id, pr.description);
    let url = pr.url.clone();
    let pr = StoredValue::new(pr);

    // Effects only run in the browser, where the cache lives.
    Effect::new(move |_| {
        let id = pr.with_value(|pr| pr.id.clone());
        if let Some(saved) = NotesCache::browser().and_then(|cache| cache.get(&id)) {
            set_notes.set(Some(saved));
        }
    });

    let generate = move |_: leptos::ev::MouseEvent| {
        if is_generating.get_untracked() {
            return;
        }
        let request = pr.with_value(|pr| GenerationRequest::from(pr));

        set_is_generating.set(true);
        set_error.set(None);
        set_streaming_content.set(String::new());
        set_notes.set(None);

        spawn_local(async move {
            let result = stream_notes(&request, |text| {
                set_streaming_content.set(text.to_string());
            })
            .await;

            let settled = settle(NotesCache::browser().as_ref(), &request.id, result);
            set_error.set(settled.error);
            set_notes.set(settled.notes);
            set_is_generating.set(false);
        });
    };

    let clear = move |_: leptos::ev::MouseEvent| {
        let id = pr.with_value(|pr| pr.id.clone());
        if let Some(cache) = NotesCache::browser() {
            if let Err(e) = cache.delete(&id) {
                error!("Failed to clear notes for PR {id}: {e}");
            }
        }
        set_notes.set(None);
        set_error.set(None);
    };

    view! {
        <div class="border border-gray-300 dark:border-teal-700 rounded-lg p-4 mb-4">
            <div class="flex justify-between items-start mb-2">
                <h3 class="text-lg font-semibold">
                    <a
                        href=url
                        target="_blank"
                        rel="noopener noreferrer"
                        class="text-seafoam-600 dark:text-mint-400 hover:underline"
                    >
                        {heading}
                    </a>
                </h3>
                <div class="flex space-x-2">
                    <button
                        on:click=generate
                        disabled=move || is_generating.get()
                        class="px-3 py-1 bg-teal-500 hover:bg-teal-600 disabled:opacity-50 text-white rounded transition-colors text-sm"
                    >
                        {move || {
                            if notes.with(Option::is_some) { "Regenerate" } else { "Generate Notes" }
                        }}
                    </button>
                    <Show when=move || notes.with(Option::is_some) && !is_generating.get()>
                        <button
                            on:click=clear
                            class="px-3 py-1 bg-gray-600 hover:bg-gray-700 text-white rounded transition-colors text-sm"
                        >
                            "Clear"
                        </button>
                    </Show>
                </div>
            </div>

            {move || {
                error
                    .get()
                    .map(|message| {
                        view! {
                            <div class="text-red-600 dark:text-red-400 bg-red-100 dark:bg-red-900/30 p-3 rounded mb-4">
                                "Error: "
                                {message}
                            </div>
                        }
                    })
            }}

            <Show when=move || is_generating.get()>
                <div class="mt-4">
                    <p class="text-gray-600 dark:text-gray-400 mb-2">"Generating release notes..."</p>
                    <Show when=move || streaming_content.with(|text| !text.is_empty())>
                        <div class="bg-gray-100 dark:bg-teal-900 p-3 rounded border border-gray-300 dark:border-teal-700 whitespace-pre-wrap font-mono text-sm">
                            {move || streaming_content.get()}
                        </div>
                    </Show>
                </div>
            </Show>

            {move || notes.get().map(|notes| view! { <NotesPanel notes=notes /> })}
        </div>
    }
}

/// Developer and marketing notes are always shown; contributors and related
/// issues only when the model produced them.
#[component]
fn NotesPanel(notes: ExtractedNotes) -> impl IntoView {
    let sections = Section::CANONICAL
        .into_iter()
        .filter(|section| {
            matches!(section, Section::Developer | Section::Marketing) || notes.is_generated(*section)
        })
        .map(|section| {
            let body = notes.get(section).to_string();
            view! {
                <div>
                    <h4 class="font-medium text-gray-800 dark:text-gray-200 mb-1">
                        {section.heading()}
                    </h4>
                    <div class="bg-gray-100 dark:bg-teal-900 p-3 rounded border border-gray-300 dark:border-teal-700 whitespace-pre-wrap">
                        {body}
                    </div>
                </div>
            }
        })
        .collect_view();

    view! { <div class="mt-4 space-y-4">{sections}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{extract, MemoryStore};
    use crate::protocol::Completion;

    fn outcome(text: &str, completion: Completion) -> GenerationOutcome {
        GenerationOutcome {
            notes: extract(text),
            completion,
            text: text.to_string(),
        }
    }

    fn cache_with_prior(store: &MemoryStore) -> (NotesCache<&MemoryStore>, ExtractedNotes) {
        let cache = NotesCache::new(store);
        let prior = extract("DEVELOPER_NOTES: old dev\nMARKETING_NOTES: old marketing");
        cache.set("7", &prior).unwrap();
        (cache, prior)
    }

    #[test]
    fn complete_result_replaces_cached_notes() {
        let store = MemoryStore::new();
        let (cache, _) = cache_with_prior(&store);

        let fresh = outcome("DEVELOPER_NOTES: new dev", Completion::Done);
        let settled = settle(Some(&cache), "7", Ok(fresh.clone()));

        assert_eq!(settled.error, None);
        assert_eq!(settled.notes.as_ref(), Some(&fresh.notes));
        assert_eq!(cache.get("7"), Some(fresh.notes));
    }

    #[test]
    fn truncated_result_is_shown_but_not_saved() {
        let store = MemoryStore::new();
        let (cache, prior) = cache_with_prior(&store);

        let partial = outcome("DEVELOPER_NOTES: half", Completion::Truncated);
        let settled = settle(Some(&cache), "7", Ok(partial.clone()));

        assert_eq!(settled.notes, Some(partial.notes));
        assert_eq!(settled.error.as_deref(), Some(INCOMPLETE_MESSAGE));
        assert_eq!(cache.get("7"), Some(prior));
    }

    #[test]
    fn failure_restores_cached_notes() {
        let store = MemoryStore::new();
        let (cache, prior) = cache_with_prior(&store);

        let failure = ClientError::Server {
            error: "Failed to generate notes".into(),
            details: Some("timeout".into()),
        };
        let settled = settle(Some(&cache), "7", Err(failure));

        assert_eq!(settled.notes, Some(prior.clone()));
        assert_eq!(
            settled.error.as_deref(),
            Some("Failed to generate notes: timeout")
        );
        assert_eq!(cache.get("7"), Some(prior));
    }

    #[test]
    fn failure_without_cached_notes_shows_nothing() {
        let store = MemoryStore::new();
        let cache = NotesCache::new(&store);

        let settled = settle(Some(&cache), "9", Err(ClientError::EmptyBody));

        assert_eq!(settled.notes, None);
        assert_eq!(settled.error.as_deref(), Some("Response body is empty"));
    }
}
