mod common;

use common::*;
use lineup::core::board_client::{ClientError, ErrorAction};
use lineup::core::page::{Coord, Document, PageError, POINTER_CLASS};
use lineup::core::protocol::{ErrorPayload, IdentityScheme};
use lineup::core::session::Identity;
use lineup::core::socket::SocketError;
use serde_json::json;

fn cell_html(client: &lineup::BoardClient<lineup::Page, RecordingSocket>, row: usize, col: usize) -> String {
    client.document().cell(Coord::new(row, col)).unwrap().inner_html().to_string()
}

#[test]
fn test_render_board_writes_each_cell() {
    let mut client = mounted_client(3);
    client.set_message("Opponent's turn.").unwrap();
    client.render_board(&board(&[&["X", "O"], &["", "X"]])).unwrap();

    assert_eq!(cell_html(&client, 0, 0), "X");
    assert_eq!(cell_html(&client, 0, 1), "O");
    assert_eq!(cell_html(&client, 1, 0), "");
    assert_eq!(cell_html(&client, 1, 1), "X");
    // Nodes outside the given board are left alone
    assert_eq!(cell_html(&client, 2, 2), "");
    assert_eq!(client.document().message().as_deref(), Some("Opponent's turn."));
}

#[test]
fn test_render_board_keeps_markup() {
    let mut client = mounted_client(3);
    client.render_board(&board(&[&["&#x2b1c;", "&#x274c;"]])).unwrap();

    let cell = client.document().cell(Coord::new(0, 0)).unwrap();
    assert_eq!(cell.inner_html(), "&#x2b1c;");
    assert_eq!(cell.text_content(), "\u{2b1c}");
    assert_eq!(client.document().cell(Coord::new(0, 1)).unwrap().text_content(), "\u{274c}");
}

#[test]
fn test_render_board_missing_cell_stops_with_error() {
    let mut client = mounted_client(3);
    let err = client
        .render_board(&board(&[&["a", "b", "c", "d"], &["e"]]))
        .unwrap_err();

    assert_eq!(err, PageError::MissingNode("game_board_0_3".into()));
    assert_eq!(cell_html(&client, 0, 2), "c");
    // Rendering stopped before the second row
    assert_eq!(cell_html(&client, 1, 0), "");
}

#[test]
fn test_set_message_replaces_text() {
    let mut client = mounted_client(3);
    client.set_message("Your turn.").unwrap();
    assert_eq!(client.document().message().as_deref(), Some("Your turn."));

    client.set_message("").unwrap();
    assert_eq!(client.document().message().as_deref(), Some(""));
}

#[test]
fn test_set_message_is_not_markup() {
    let mut client = mounted_client(3);
    client.set_message("<b>&amp;</b>").unwrap();
    assert_eq!(client.document().message().as_deref(), Some("<b>&amp;</b>"));
}

#[test]
fn test_set_message_without_node_fails() {
    let mut client = mounted_client(3);
    client.document_mut().remove("message");
    assert_eq!(client.set_message("hi"), Err(PageError::MissingNode("message".into())));
}

#[test]
fn test_handle_error_missing_game_navigates_home() {
    let mut client = mounted_client(3);
    let mut session = player_session();

    let action = client
        .handle_error(&mut session, &ErrorPayload::new("No game with game_uuid."))
        .unwrap();

    assert_eq!(action, ErrorAction::Navigate("/".into()));
    assert_eq!(client.document().location(), "/");
    assert_eq!(client.document().message().as_deref(), Some("No game with game_uuid."));
    assert_eq!(session.identity(), Some(&Identity::new(ME)));
}

#[test]
fn test_handle_error_missing_game_uses_scheme_wording() {
    let mut client = client(IdentityScheme::PlayerName);
    let mut session = player_session();

    let action = client
        .handle_error(&mut session, &ErrorPayload::new("No game with game_id."))
        .unwrap();
    assert_eq!(action, ErrorAction::Navigate("/".into()));

    let mut client = common::client(IdentityScheme::PlayerName);
    let action = client
        .handle_error(&mut session, &ErrorPayload::new("No game with game_uuid."))
        .unwrap();
    assert_eq!(action, ErrorAction::Display);
    assert_eq!(client.document().location(), "/play/g-1");
}

#[test]
fn test_handle_error_join_refused_drops_identity() {
    let mut client = mounted_client(3);
    let mut session = player_session();
    session.set_player_index(Some(0));

    let action = client
        .handle_error(&mut session, &ErrorPayload::new("Could not join game."))
        .unwrap();

    assert_eq!(action, ErrorAction::ResetIdentity);
    assert_eq!(session.identity(), None);
    assert_eq!(session.player_index(), None);
    assert_eq!(client.document().location(), "/play/g-1");
    assert_eq!(client.document().message().as_deref(), Some("Could not join game."));
}

#[test]
fn test_handle_error_other_only_displays() {
    let mut client = mounted_client(3);
    let mut session = player_session();

    let action = client
        .handle_error(&mut session, &ErrorPayload::new("Not your turn."))
        .unwrap();

    assert_eq!(action, ErrorAction::Display);
    assert_eq!(session.identity(), Some(&Identity::new(ME)));
    assert_eq!(client.document().location(), "/play/g-1");
    assert_eq!(client.document().message().as_deref(), Some("Not your turn."));
}

#[test]
fn test_join_emits_one_human_join() {
    let mut client = mounted_client(3);
    client.join(&player_session()).unwrap();

    assert_eq!(client.socket().emitted.len(), 1);
    let (name, payload) = client.socket().last().unwrap();
    assert_eq!(name, "join");
    assert_eq!(
        payload,
        &json!({"player_uuid": ME, "player_type": "human", "game_uuid": GAME})
    );
}

#[test]
fn test_join_without_identity_emits_nothing() {
    let mut client = mounted_client(3);
    let mut session = player_session();
    session.clear_identity();

    assert!(matches!(client.join(&session), Err(ClientError::NoIdentity)));
    assert!(client.socket().emitted.is_empty());
}

#[test]
fn test_play_sends_column_then_row() {
    let mut client = mounted_client(3);
    client.play(&player_session(), Coord::new(2, 1)).unwrap();

    let (name, payload) = client.socket().last().unwrap();
    assert_eq!(name, "play");
    assert_eq!(payload, &json!({"player_uuid": ME, "move": [1, 2]}));
}

#[test]
fn test_play_without_identity_is_refused_when_scheme_names_mover() {
    let mut session = player_session();
    session.clear_identity();

    for scheme in [IdentityScheme::PlayerUuid, IdentityScheme::PlayerId] {
        let mut client = common::client(scheme);
        let err = client.play(&session, Coord::new(0, 0)).unwrap_err();
        assert!(matches!(err, ClientError::NoIdentity));
        assert!(client.socket().emitted.is_empty());
    }

    // The name scheme never sends the mover, so there is nothing missing
    let mut client = common::client(IdentityScheme::PlayerName);
    client.play(&session, Coord::new(0, 0)).unwrap();
    assert_eq!(client.socket().last().unwrap().1, json!({"move": [0, 0]}));
}

#[test]
fn test_play_on_closed_socket_fails() {
    let mut client = mounted_client(3);
    client.socket_mut().closed = true;

    let err = client.play(&player_session(), Coord::new(0, 0)).unwrap_err();
    assert!(matches!(err, ClientError::Socket(SocketError::Closed)));
}

#[test]
fn test_enable_then_disable_board_input() {
    let mut client = mounted_client(3);
    let (handler, clicked) = click_recorder();

    client.enable_board_input(handler);
    for row in 0..3 {
        for col in 0..3 {
            let cell = client.document().cell(Coord::new(row, col)).unwrap();
            assert!(cell.has_onclick());
            assert!(cell.has_class(POINTER_CLASS));
        }
    }
    assert!(!client.document().element("message").unwrap().has_onclick());

    assert!(client.document().click("game_board_1_2"));
    assert_eq!(*clicked.lock().unwrap(), vec![Coord::new(1, 2)]);

    client.disable_board_input();
    for row in 0..3 {
        for col in 0..3 {
            let cell = client.document().cell(Coord::new(row, col)).unwrap();
            assert!(!cell.has_onclick());
            assert!(!cell.has_class(POINTER_CLASS));
        }
    }
    assert!(!client.document().click("game_board_1_2"));
    assert_eq!(clicked.lock().unwrap().len(), 1);
}

#[test]
fn test_enable_twice_fires_once_per_click() {
    let mut client = mounted_client(3);
    let (handler, clicked) = click_recorder();

    client.enable_board_input(handler.clone());
    client.enable_board_input(handler);
    client.document().click("game_board_0_0");

    assert_eq!(clicked.lock().unwrap().len(), 1);
}

#[test]
fn test_mount_board_checks_size() {
    let mut client = common::client(IdentityScheme::PlayerUuid);
    assert_eq!(client.mount_board(2), Err(PageError::InvalidBoardSize(2)));
    assert_eq!(client.mount_board(11), Err(PageError::InvalidBoardSize(11)));

    client.mount_board(10).unwrap();
    assert_eq!(client.document().dimensions(), Some((10, 10)));
    client.mount_board(3).unwrap();
    assert_eq!(client.document().dimensions(), Some((3, 3)));
}

// A refusal that lands after the player already re-joined under a new
// identity still clears the new one: refusals carry no identity to match.
#[test]
fn test_late_join_refusal_clears_fresh_identity() {
    let mut client = mounted_client(3);
    let mut session = player_session();
    client.join(&session).unwrap();

    let refused = ErrorPayload::new("Could not join game.");
    client.handle_error(&mut session, &refused).unwrap();
    assert_eq!(session.identity(), None);

    session.set_identity(Identity::new("p1-again"));
    client.join(&session).unwrap();
    assert_eq!(client.socket().events(), vec!["join", "join"]);

    // Second refusal arrives for the first join
    client.handle_error(&mut session, &refused).unwrap();
    assert_eq!(session.identity(), None);
}
