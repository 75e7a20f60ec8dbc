use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::warn;

use super::state::AppState;
use crate::complaint::ComplaintEvent;

/// GET /api/admin/events: live complaint feed for the admin dashboard.
pub async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let rx = state.store.subscribe();
    let stream = BroadcastStream::new(rx);

    let stream = stream.filter_map(|result| match result {
        Ok(event) => to_sse_event(&event).map(Ok),
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &ComplaintEvent) -> Option<Event> {
    match event_payload(event) {
        Ok((name, data)) => Some(Event::default().event(name).data(data)),
        Err(e) => {
            warn!("Failed to encode SSE event: {}", e);
            None
        }
    }
}

/// Event name and JSON body of the complaint snapshot.
fn event_payload(event: &ComplaintEvent) -> serde_json::Result<(&'static str, String)> {
    Ok((event.kind(), serde_json::to_string(event.complaint())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{classify, Priority};
    use crate::complaint::{Complaint, NewComplaint, Status};
    use chrono::Utc;

    fn complaint() -> Complaint {
        let text = "pohon tumbang, bahaya bagi pejalan kaki";
        Complaint::new(
            "TG-2025-0009".to_string(),
            NewComplaint {
                name: "Dewi".to_string(),
                phone: None,
                email: None,
                category: "Taman".to_string(),
                location: "Lapangan Merdeka".to_string(),
                description: text.to_string(),
            },
            classify(text),
            Utc::now(),
        )
    }

    #[test]
    fn created_event_carries_snapshot_json() {
        let event = ComplaintEvent::Created {
            complaint: complaint(),
        };
        let (name, data) = event_payload(&event).unwrap();
        assert_eq!(name, "created");

        let parsed: Complaint = serde_json::from_str(&data).unwrap();
        assert_eq!(&parsed, event.complaint());
        let raw: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(raw["id"], "TG-2025-0009");
        assert_eq!(raw["status"], "Diterima");
        assert_eq!(raw["priority"], "Sangat Mendesak");
        assert!(to_sse_event(&event).is_some());
    }

    #[test]
    fn status_update_event_is_named_and_reflects_new_status() {
        let mut c = complaint();
        c.update_status(Status::InProgress, Some("tim taman dikirim".to_string()), Utc::now());
        let event = ComplaintEvent::StatusUpdated { complaint: c };

        let (name, data) = event_payload(&event).unwrap();
        assert_eq!(name, "status_updated");
        let parsed: Complaint = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed.status, Status::InProgress);
        assert_eq!(parsed.admin_notes.as_deref(), Some("tim taman dikirim"));
        assert_eq!(parsed.priority, Priority::Urgent);
    }
}
