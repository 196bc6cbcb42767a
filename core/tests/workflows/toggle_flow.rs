// SPDX-FileCopyrightText: 2025-2026 Tempo contributors
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end completion toggle workflow tests.
//!
//! These tests validate the optimistic completion surface: toggling an open
//! todo records a completion on the service, toggling it again reverts the
//! completion, and the local cache tracks both outcomes.

use std::sync::Arc;

use tempo_core::{Error, Tempo, ToggleResult};

use crate::common::{FakeRemote, collect_emissions, test_config, test_window, todo_fixture};

async fn in_memory_engine(remote: &Arc<FakeRemote>) -> Tempo {
    Tempo::with_remote(test_config(None), remote.clone())
        .await
        .unwrap()
}

#[tokio::test]
async fn toggle_flow_complete_then_revert_round_trip() {
    // Arrange
    let remote = Arc::new(FakeRemote::default());
    let tempo = in_memory_engine(&remote).await;
    tempo.save_todo(&todo_fixture("todo-1")).await.unwrap();

    // Act - first toggle completes
    let result = tempo.toggle_todo("todo-1").await.unwrap();

    // Assert
    let Some(ToggleResult::Completed(done)) = result else {
        panic!("first toggle should complete the todo");
    };
    assert_eq!(done.done_id, "done-1");
    assert!(done.todo.is_done());
    assert!(
        remote.todo("todo-1").unwrap().is_done(),
        "the service should hold the completion"
    );

    // Assert - the cached copy reflects the completion
    let emissions = collect_emissions(tempo.list_todos(test_window())).await;
    assert!(emissions[0].as_ref().unwrap()[0].is_done());

    // Act - second toggle reverts
    let result = tempo.toggle_todo("todo-1").await.unwrap();

    // Assert
    let Some(ToggleResult::Reverted(todo)) = result else {
        panic!("second toggle should revert the completion");
    };
    assert!(!todo.is_done());
    assert!(!remote.todo("todo-1").unwrap().is_done());
}

#[tokio::test]
async fn toggle_flow_unknown_todo_is_an_error() {
    // Arrange
    let remote = Arc::new(FakeRemote::default());
    let tempo = in_memory_engine(&remote).await;

    // Act
    let err = tempo.toggle_todo("ghost").await.unwrap_err();

    // Assert
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn toggle_flow_works_before_the_first_upload() {
    // Arrange - the todo exists locally only; the worker never ran
    let remote = Arc::new(FakeRemote::default());
    let tempo = in_memory_engine(&remote).await;
    tempo.save_todo(&todo_fixture("todo-1")).await.unwrap();

    // Act
    let result = tempo.toggle_todo("todo-1").await.unwrap();

    // Assert - completion carried the full todo to the service
    assert!(matches!(result, Some(ToggleResult::Completed(_))));
    assert!(remote.todo("todo-1").unwrap().is_done());
    assert_eq!(
        tempo.pending_upload_count(false).await.unwrap(),
        1,
        "the original save should still be queued"
    );
}
