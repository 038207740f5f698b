// Fetches the calendar in the background so the UI never blocks on storage.
use crate::source::EventSource;
use crate::store::EventStore;
use crate::tui::action::{Action, AppEvent};
use tokio::sync::mpsc::{Receiver, Sender};

async fn load<S: EventSource>(source: &S, event_tx: &Sender<AppEvent>) {
    let _ = event_tx.send(AppEvent::Status("Loading events...".to_string())).await;
    match source.fetch_all_events().await {
        Ok(raw) => {
            let store = EventStore::from_raw(raw);
            let _ = event_tx.send(AppEvent::EventsLoaded(store)).await;
        }
        Err(e) => {
            log::error!("Failed to fetch events: {:#}", e);
            // Show an empty calendar rather than a spinner forever.
            let _ = event_tx.send(AppEvent::EventsLoaded(EventStore::new())).await;
            let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
        }
    }
}

/// Loads once on start, then again for every [`Action::Refresh`].
pub async fn run_loader_actor<S: EventSource>(
    source: S,
    mut action_rx: Receiver<Action>,
    event_tx: Sender<AppEvent>,
) {
    load(&source, &event_tx).await;

    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Refresh => load(&source, &event_tx).await,
            Action::Quit => break,
        }
    }
}
