use crate::FetchState;

/// Pure text rendering of a request slot, for status panes and logs.
///
/// Always renders the loading indicator and the loaded marker. An error adds
/// a block with the message, the serialized error and the request status.
/// The children render only when the slot is settled without an error, so a
/// caller can pass its real content unconditionally.
pub fn status_view<T: Clone>(state: &FetchState<T>, children: &str) -> String {
    let mut out = String::new();
    out.push_str(if state.loading { "loading\n" } else { "not loading\n" });
    out.push_str(if state.loaded {
        "loaded: check\n"
    } else {
        "loaded:\n"
    });

    if let Some(error) = &state.error {
        let status = state
            .request
            .as_ref()
            .map(|request| request.status.to_string())
            .unwrap_or_default();
        out.push_str(&format!("An error has occurred (status:{status})\n"));
        let serialized =
            serde_json::to_string_pretty(error).unwrap_or_else(|_| error.to_string());
        out.push_str(&serialized);
        out.push('\n');
    }

    if state.error.is_none() && !state.loading && state.loaded {
        out.push_str("This is the data!\n");
        out.push_str(children);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reduce, FetchAction, FetchError};

    type TestState = FetchState<i32>;

    #[test]
    fn test_pristine_renders_neither_error_nor_children() {
        let rendered = status_view(&TestState::pristine(), "content");
        assert!(rendered.contains("not loading"));
        assert!(rendered.contains("loaded:\n"));
        assert!(!rendered.contains("error"));
        assert!(!rendered.contains("content"));
    }

    #[test]
    fn test_loading_renders_indicator_only() {
        let state = reduce(
            TestState::pristine(),
            FetchAction::StartLoad {
                url: "foo".to_string(),
                generation: 1,
                handle: None,
            },
        );
        let rendered = status_view(&state, "content");
        assert!(rendered.starts_with("loading\n"));
        assert!(!rendered.contains("content"));
    }

    #[test]
    fn test_settled_success_renders_children() {
        let state = reduce(
            TestState::pristine(),
            FetchAction::EndLoad {
                generation: 0,
                status: 200,
                data: Some(1),
                error: None,
            },
        );
        let rendered = status_view(&state, "content");
        assert!(rendered.contains("loaded: check"));
        assert!(rendered.contains("This is the data!\ncontent"));
    }

    #[test]
    fn test_error_block_carries_status_and_cause() {
        let state = reduce(
            TestState::pristine(),
            FetchAction::EndLoad {
                generation: 0,
                status: 404,
                data: None,
                error: Some(FetchError::HttpStatus(404)),
            },
        );
        let rendered = status_view(&state, "content");
        assert!(rendered.contains("An error has occurred (status:404)"));
        assert!(rendered.contains("HttpStatus"));
        assert!(!rendered.contains("content"));
    }

    #[test]
    fn test_aborted_renders_empty_status() {
        let state = reduce(TestState::pristine(), FetchAction::Abort);
        let rendered = status_view(&state, "content");
        // No request in the aborted snapshot, so the status slot is empty.
        assert!(rendered.contains("An error has occurred (status:)"));
        assert!(rendered.contains("Aborted"));
    }

    #[test]
    fn test_error_with_data_still_hides_children() {
        let state = reduce(
            TestState::pristine(),
            FetchAction::EndLoad {
                generation: 0,
                status: 404,
                data: Some(3),
                error: Some(FetchError::HttpStatus(404)),
            },
        );
        let rendered = status_view(&state, "content");
        assert!(rendered.contains("An error has occurred"));
        assert!(!rendered.contains("This is the data!"));
    }
}
